//! Erros da fronteira de construção (léxico e configuração).
//!
//! O reconhecimento em si nunca falha: "nada encontrado aqui" é `None`.
//! Apenas a montagem do [`Lexicon`](crate::lexicon::Lexicon) e a leitura da
//! [`EngineConfig`](crate::config::EngineConfig) podem produzir um [`Error`].

use thiserror::Error;

/// Result alias do crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Erros possíveis ao construir o motor.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Entrada de léxico inválida (termo vazio, perfil desconhecido...).
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// Configuração inválida (limiar não finito, profundidade zero...).
    #[error("Config error: {0}")]
    Config(String),

    /// JSON malformado na extensão do léxico ou na configuração.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Cria um erro de léxico.
    #[must_use]
    pub fn lexicon(msg: impl Into<String>) -> Self {
        Error::Lexicon(msg.into())
    }

    /// Cria um erro de configuração.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
