//! # org-core — Reconhecimento de Organizações Baseado em Regras
//!
//! Este crate reconhece menções de **organizações** (órgãos de Estado, empresas,
//! partidos, unidades militares, veículos de imprensa, clubes...) em textos em
//! russo e inglês já tokenizados, e constrói um grafo de entidades com nomes,
//! tipos, números, perfis, geografia e hierarquia de subordinação.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui em duas passagens sobre o mesmo fluxo de tokens:
//!
//! 1.  **Entrada**: texto bruto, tokenizado por [`tokenizer`] com morfologia de um
//!     [`morph::MorphAnalyzer`] externo; referentes geográficos e pessoas vêm de um
//!     [`referent::ExternalResolver`].
//! 2.  **Classificadores de token** ([`type_token`], [`name_token`], [`number_token`],
//!     [`eponym_token`], [`bracket`], [`global_token`]): cada um devolve um
//!     [`candidate::MatchCandidate`].
//! 3.  **Montador** ([`assembler`]): estende a âncora, pontua com a tabela
//!     declarativa de [`scoring`] e recua por uma pilha explícita quando o
//!     candidato fica abaixo do limiar do modo.
//! 4.  **Registro** ([`registry`]): arena de entidades; candidatos equivalentes
//!     ([`equivalence`]) são fundidos.
//! 5.  **Hierarquia e apelidos** ([`hierarchy`], [`alias`]): ligam subdivisões aos
//!     superiores sem criar ciclos e resolvem "(далее — X)".
//! 6.  **Saída**: [`AnalysisResult`] com entidades, menções e apelidos, e o fluxo
//!     com cada organização embutida como token atômico.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use org_core::corpus::{demo_morphology, demo_resolver};
//! use org_core::OrganizationAnalyzer;
//!
//! // 1. Instancia o analisador (léxico embutido, configuração padrão)
//! let analyzer = OrganizationAnalyzer::with_defaults();
//!
//! // 2. Analisa o texto
//! let result = analyzer.analyze_text(
//!     "В ООО «Ромашка» отдел кадров объявил набор сотрудников.",
//!     &demo_morphology(),
//!     &demo_resolver(),
//! );
//!
//! // 3. A subdivisão fica subordinada à empresa
//! let company = result.find_by_name("Ромашка").unwrap();
//! let office = result.find_by_name("кадров").unwrap();
//! assert_eq!(office.higher, Some(company.id));
//! ```
//!
//! ## Módulos Principais
//!
//! - [`analyzer`]: orquestrador das passagens, com eventos observáveis.
//! - [`lexicon`]: tipos, organizações globais, nomes-padrão e marcadores.
//! - [`entity`]: o modelo de entidade e a fusão.
//! - [`corpus`]: documentos, morfologia e geografia de demonstração.

pub mod alias;
pub mod analyzer;
pub mod assembler;
pub mod bracket;
pub mod candidate;
pub mod config;
pub mod corpus;
pub mod department;
pub mod entity;
pub mod eponym_token;
pub mod equivalence;
pub mod error;
pub mod global_token;
pub mod hierarchy;
pub mod kind;
pub mod lexicon;
pub mod morph;
pub mod name_token;
pub mod number_token;
pub mod ownership;
pub mod referent;
pub mod registry;
pub mod scoring;
pub mod termin;
pub mod token;
pub mod tokenizer;
pub mod type_token;

pub use analyzer::{AnalysisResult, AnalyzerEvent, EntityRecord, OrganizationAnalyzer};
pub use config::{EngineConfig, Thresholds};
pub use entity::{OrgId, OrganizationEntity};
pub use equivalence::{can_be_equal, EqualityMode};
pub use error::{Error, Result};
pub use kind::{OrgKind, OrgProfile};
pub use lexicon::Lexicon;
pub use scoring::{AttachMode, ScoreRule};
pub use token::{Token, TokenKind, TokenStream};
