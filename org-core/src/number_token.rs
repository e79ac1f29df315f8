//! Números de organização ("№ 15", "школа 1234") e identificadores legais
//! (ИНН/ОГРН) validados por expressão regular.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::token::{Token, TokenStream};

static INN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}(?:\d{2})?$").unwrap());
static OGRN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{13}(?:\d{2})?$").unwrap());
static ORG_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,6}[A-Za-zА-Яа-яЁё]?$").unwrap());

/// Tipo de identificador legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalIdKind {
    /// ИНН: 10 dígitos (pessoa jurídica) ou 12.
    Inn,
    /// ОГРН: 13 dígitos ou 15 (ОГРНИП).
    Ogrn,
}

impl LegalIdKind {
    pub fn is_valid(&self, value: &str) -> bool {
        match self {
            LegalIdKind::Inn => INN_RE.is_match(value),
            LegalIdKind::Ogrn => OGRN_RE.is_match(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberMatch {
    pub begin: usize,
    pub end: usize,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegalIdMatch {
    pub begin: usize,
    pub end: usize,
    pub kind: LegalIdKind,
    pub value: String,
}

/// Número de organização: dígitos com sufixo opcional de uma letra ("15", "15А").
fn org_number_text(token: &Token) -> Option<&str> {
    if token.number().is_some() || token.is_word() {
        ORG_NUMBER_RE.is_match(&token.text).then_some(token.text.as_str())
    } else {
        None
    }
}

/// Número após marcador ("№ 15", "N 15", "номер 15") ou, se `allow_bare`, número solto.
pub fn try_number(tokens: &TokenStream, lexicon: &Lexicon, pos: usize, allow_bare: bool) -> Option<NumberMatch> {
    let first = tokens.get(pos)?;
    if let Some(m) = lexicon.number_markers.try_parse(tokens, pos) {
        let t = tokens.get(m.end + 1)?;
        if t.newline_before {
            return None;
        }
        let value = org_number_text(t)?;
        return Some(NumberMatch {
            begin: pos,
            end: m.end + 1,
            value: value.to_string(),
        });
    }
    if allow_bare && !first.newline_before {
        let value = org_number_text(first)?;
        return Some(NumberMatch {
            begin: pos,
            end: pos,
            value: value.to_string(),
        });
    }
    None
}

/// "ИНН 7707083893", "ОГРН: 1027700132195".
pub fn try_legal_id(tokens: &TokenStream, lexicon: &Lexicon, pos: usize) -> Option<LegalIdMatch> {
    let m = lexicon.legal_markers.try_parse(tokens, pos)?;
    let kind = m.termin.tag;
    let mut at = m.end + 1;
    if tokens.get(at).map_or(false, |t| t.is_punct(':') || t.is_hyphen()) {
        at += 1;
    }
    let t = tokens.get(at)?;
    if !kind.is_valid(&t.text) {
        return None;
    }
    Some(LegalIdMatch {
        begin: pos,
        end: at,
        kind,
        value: t.text.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_plain;

    #[test]
    fn test_legal_id_shapes() {
        assert!(LegalIdKind::Inn.is_valid("7707083893"));
        assert!(LegalIdKind::Inn.is_valid("500100732259"));
        assert!(!LegalIdKind::Inn.is_valid("77070838"));
        assert!(LegalIdKind::Ogrn.is_valid("1027700132195"));
        assert!(!LegalIdKind::Ogrn.is_valid("7707083893"));
    }

    #[test]
    fn test_try_legal_id_keeps_leading_zero() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("ИНН: 0274062111");
        let m = try_legal_id(&s, &lex, 0).unwrap();
        assert_eq!(m.kind, LegalIdKind::Inn);
        assert_eq!(m.value, "0274062111");
        assert_eq!(m.end, 2);
    }

    #[test]
    fn test_number_with_marker() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("школа № 15");
        let m = try_number(&s, &lex, 1, false).unwrap();
        assert_eq!((m.begin, m.end, m.value.as_str()), (1, 2, "15"));
        assert!(try_number(&s, &lex, 2, false).is_none());
        assert_eq!(try_number(&s, &lex, 2, true).unwrap().value, "15");
    }
}
