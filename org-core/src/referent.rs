//! # Referentes Externos
//!
//! Geografia, pessoas e endereços são reconhecidos por outros analisadores. O
//! motor de organizações só os consulta através de [`ExternalResolver`], tratado
//! como caixa-preta: `resolve(tipo, posição) -> Option<Referent>`.
//!
//! [`GazetteerResolver`] é uma implementação por tabela de frases (à maneira de
//! uma base de conhecimento simples), usada em testes e demonstrações.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::token::{normalize_term, TokenStream};

/// Tipos de referente que o motor pode solicitar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferentKind {
    Geo,
    Person,
    Address,
    Date,
}

/// Nível administrativo de uma entidade geográfica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoLevel {
    State,
    Region,
    City,
    Other,
}

/// Referência a uma entidade geográfica.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoRef {
    /// Nome canônico normalizado (ex: "РОССИЯ").
    pub name: String,
    pub level: GeoLevel,
    /// Nome canônico da entidade superior, se conhecida.
    pub parent: Option<String>,
}

impl GeoRef {
    pub fn new(name: &str, level: GeoLevel) -> Self {
        GeoRef {
            name: normalize_term(name),
            level,
            parent: None,
        }
    }

    pub fn state(name: &str) -> Self {
        GeoRef::new(name, GeoLevel::State)
    }

    pub fn region(name: &str, parent: &str) -> Self {
        GeoRef {
            parent: Some(normalize_term(parent)),
            ..GeoRef::new(name, GeoLevel::Region)
        }
    }

    pub fn city(name: &str, parent: &str) -> Self {
        GeoRef {
            parent: Some(normalize_term(parent)),
            ..GeoRef::new(name, GeoLevel::City)
        }
    }

    /// Duas referências denotam o mesmo lugar.
    pub fn can_be_equal(&self, other: &GeoRef) -> bool {
        self.name == other.name
    }
}

/// Referência a uma pessoa.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonRef {
    pub last_name: String,
    pub first_name: Option<String>,
}

impl PersonRef {
    pub fn new(last_name: &str) -> Self {
        PersonRef {
            last_name: normalize_term(last_name),
            first_name: None,
        }
    }
}

/// Entidade reconhecida por outro analisador.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Referent {
    Geo(GeoRef),
    Person(PersonRef),
    Address(String),
    Date(String),
}

impl Referent {
    pub fn kind(&self) -> ReferentKind {
        match self {
            Referent::Geo(_) => ReferentKind::Geo,
            Referent::Person(_) => ReferentKind::Person,
            Referent::Address(_) => ReferentKind::Address,
            Referent::Date(_) => ReferentKind::Date,
        }
    }

    pub fn as_geo(&self) -> Option<&GeoRef> {
        match self {
            Referent::Geo(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_person(&self) -> Option<&PersonRef> {
        match self {
            Referent::Person(p) => Some(p),
            _ => None,
        }
    }
}

/// Resultado de uma consulta: o referente e o último token consumido.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalMatch {
    pub referent: Referent,
    pub end: usize,
}

/// Capacidade de resolução fornecida pelos analisadores vizinhos.
pub trait ExternalResolver {
    fn resolve(&self, kind: ReferentKind, tokens: &TokenStream, pos: usize) -> Option<ExternalMatch>;
}

/// Consulta um referente em `pos`: primeiro o já anexado ao token, depois o resolvedor.
pub fn resolve_at(
    resolver: &dyn ExternalResolver,
    kind: ReferentKind,
    tokens: &TokenStream,
    pos: usize,
) -> Option<ExternalMatch> {
    let token = tokens.get(pos)?;
    if let Some(r) = token.referent() {
        return (r.kind() == kind).then(|| ExternalMatch {
            referent: r.clone(),
            end: pos,
        });
    }
    resolver.resolve(kind, tokens, pos)
}

/// Resolvedor que nunca encontra nada.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl ExternalResolver for NoResolver {
    fn resolve(&self, _kind: ReferentKind, _tokens: &TokenStream, _pos: usize) -> Option<ExternalMatch> {
        None
    }
}

/// Resolvedor por tabela de frases.
///
/// Cada entrada é uma sequência de palavras normalizadas; a maior sequência que
/// casa a partir da posição vence. Formas flexionadas devem ser registradas
/// explicitamente (ou vir como lema do analisador morfológico).
#[derive(Debug, Clone, Default)]
pub struct GazetteerResolver {
    entries: Vec<(Vec<String>, Referent)>,
    by_first: HashMap<String, Vec<usize>>,
}

impl GazetteerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, phrase: &str, referent: Referent) -> &mut Self {
        let words: Vec<String> = phrase.split_whitespace().map(normalize_term).collect();
        if let Some(first) = words.first() {
            self.by_first
                .entry(first.clone())
                .or_default()
                .push(self.entries.len());
            self.entries.push((words, referent));
        }
        self
    }

    /// Registra várias formas de um mesmo lugar.
    pub fn add_geo(&mut self, forms: &[&str], geo: GeoRef) -> &mut Self {
        for form in forms {
            self.add(form, Referent::Geo(geo.clone()));
        }
        self
    }

    pub fn add_person(&mut self, forms: &[&str], person: PersonRef) -> &mut Self {
        for form in forms {
            self.add(form, Referent::Person(person.clone()));
        }
        self
    }

    fn matches(tokens: &TokenStream, pos: usize, words: &[String]) -> Option<usize> {
        for (i, w) in words.iter().enumerate() {
            let t = tokens.get(pos + i)?;
            if (i > 0 && t.newline_before) || !t.is_word() || !t.is_value(w) {
                return None;
            }
        }
        Some(pos + words.len() - 1)
    }
}

impl ExternalResolver for GazetteerResolver {
    fn resolve(&self, kind: ReferentKind, tokens: &TokenStream, pos: usize) -> Option<ExternalMatch> {
        let first = tokens.get(pos)?;
        let mut keys = vec![first.term.as_str()];
        if let Some(lemma) = first.morph.lemma.as_deref() {
            keys.push(lemma);
        }

        let mut best: Option<ExternalMatch> = None;
        for key in keys {
            for &idx in self.by_first.get(key).map(Vec::as_slice).unwrap_or(&[]) {
                let (words, referent) = &self.entries[idx];
                if referent.kind() != kind {
                    continue;
                }
                if let Some(end) = Self::matches(tokens, pos, words) {
                    if best.as_ref().map_or(true, |b| end > b.end) {
                        best = Some(ExternalMatch {
                            referent: referent.clone(),
                            end,
                        });
                    }
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_plain;

    fn resolver() -> GazetteerResolver {
        let mut r = GazetteerResolver::new();
        r.add_geo(&["России", "Российской Федерации"], GeoRef::state("Россия"));
        r.add_person(&["Пушкина"], PersonRef::new("Пушкин"));
        r
    }

    #[test]
    fn test_longest_geo_match() {
        let s = tokenize_plain("юстиции Российской Федерации");
        let m = resolver().resolve(ReferentKind::Geo, &s, 1).unwrap();
        assert_eq!(m.end, 2);
        assert_eq!(m.referent.as_geo().unwrap().name, "РОССИЯ");
    }

    #[test]
    fn test_kind_filter() {
        let s = tokenize_plain("имени Пушкина");
        assert!(resolver().resolve(ReferentKind::Geo, &s, 1).is_none());
        let p = resolver().resolve(ReferentKind::Person, &s, 1).unwrap();
        assert_eq!(p.referent.as_person().unwrap().last_name, "ПУШКИН");
    }

    #[test]
    fn test_resolve_at_prefers_attached_referent() {
        let mut s = tokenize_plain("Москва");
        let city = GeoRef::city("Москва", "Россия");
        s.embed(0, 0, crate::token::TokenKind::Referent(Referent::Geo(city.clone())));
        let m = resolve_at(&NoResolver, ReferentKind::Geo, &s, 0).unwrap();
        assert_eq!(m.referent, Referent::Geo(city));
        assert!(resolve_at(&NoResolver, ReferentKind::Person, &s, 0).is_none());
    }
}
