//! # Token de Tipo
//!
//! Reconhece o sintagma de tipo de organização a partir de uma posição:
//! marcadores militares e adjetivos puros ("государственный") seguidos do
//! substantivo de tipo ("университет"), ou uma sigla ("ГУВД").
//!
//! O resultado informa se o tipo é só um prefixo, se está no plural e se exige
//! âncora geográfica; quem decide o que fazer com isso é o montador.

use serde::Serialize;

use crate::lexicon::{Lexicon, OrgTypeInfo, TypeClass};
use crate::morph::{Morph, Number};
use crate::token::{CharsInfo, TokenStream};

/// Limite de modificadores antes do substantivo de tipo.
const MAX_MODIFIERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeMatch {
    pub begin: usize,
    pub end: usize,
    /// Rótulo final ("государственный университет").
    pub label: String,
    pub info: OrgTypeInfo,
    pub via_acronym: bool,
    /// Sigla do tipo, quando reconhecido por ela ou quando a tem.
    pub acronym: Option<String>,
    pub markers: Vec<String>,
    /// Capitalização do primeiro token.
    pub chars: CharsInfo,
    /// Morfologia do substantivo de tipo.
    pub morph: Morph,
    pub sentence_start: bool,
}

impl TypeMatch {
    pub fn is_plural(&self) -> bool {
        self.morph.number == Number::Plural
    }

    pub fn is_department(&self) -> bool {
        self.info.class == TypeClass::Dep
    }

    pub fn is_legal_form(&self) -> bool {
        self.info.class == TypeClass::Prefix
    }

    pub fn requires_geo(&self) -> bool {
        self.info.requires_geo
    }
}

/// Tipo que começa em `pos`. Um adjetivo puro sozinho não é tipo.
pub fn try_type(tokens: &TokenStream, lexicon: &Lexicon, pos: usize) -> Option<TypeMatch> {
    let first = tokens.get(pos)?;
    if !first.is_letter_word() {
        return None;
    }

    let mut markers = Vec::new();
    let mut prefixes: Vec<String> = Vec::new();
    let mut at = pos;
    for _ in 0..=MAX_MODIFIERS {
        if let Some(m) = lexicon.types.try_parse(tokens, at) {
            if !m.termin.tag.pure_prefix {
                let info = m.termin.tag.clone();
                let head = tokens.get(m.begin)?;
                let mut label = prefixes.clone();
                label.push(info.label.clone());
                return Some(TypeMatch {
                    begin: pos,
                    end: m.end,
                    label: label.join(" "),
                    acronym: m.termin.acronym.clone(),
                    via_acronym: m.via_acronym,
                    info,
                    markers,
                    chars: first.chars,
                    morph: head.morph.clone(),
                    sentence_start: tokens.is_sentence_start(pos),
                });
            }
            prefixes.push(m.termin.tag.label.clone());
            at = m.end + 1;
            continue;
        }
        if let Some(m) = lexicon.markers.try_parse(tokens, at) {
            markers.push(m.termin.canonic.clone());
            at = m.end + 1;
            continue;
        }
        break;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morph::{Case, DictionaryMorphology};
    use crate::tokenizer::{tokenize, tokenize_plain};

    #[test]
    fn test_simple_type() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("Министерство юстиции");
        let t = try_type(&s, &lex, 0).unwrap();
        assert_eq!(t.label, "министерство");
        assert_eq!(t.end, 0);
        assert!(t.sentence_start && t.chars.capital_upper);
        assert!(t.info.pluralizable);
    }

    #[test]
    fn test_prefix_and_longest_type() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("Государственный комитет");
        assert_eq!(try_type(&s, &lex, 0).unwrap().label, "государственный комитет");

        let s = tokenize_plain("национальный университет");
        let t = try_type(&s, &lex, 0).unwrap();
        assert_eq!(t.label, "национальный университет");
        assert_eq!(t.end, 1);

        let s = tokenize_plain("государственный флаг");
        assert!(try_type(&s, &lex, 0).is_none());
    }

    #[test]
    fn test_markers_and_acronym() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("танковая дивизия");
        // Sem lema o adjetivo feminino não casa o marcador
        assert!(try_type(&s, &lex, 0).is_none());

        let mut dict = DictionaryMorphology::new();
        dict.insert("танковая", Morph::adjective(&[Case::Nominative], Number::Singular).with_lemma("танковый"));
        let s = tokenize("танковая дивизия", &dict);
        let t = try_type(&s, &lex, 0).unwrap();
        assert_eq!(t.markers, vec!["ТАНКОВЫЙ".to_string()]);
        assert_eq!(t.label, "дивизия");

        let s = tokenize_plain("ГУВД");
        let t = try_type(&s, &lex, 0).unwrap();
        assert!(t.via_acronym && t.is_department() && t.requires_geo());
    }

    #[test]
    fn test_plural_type() {
        let lex = Lexicon::builtin();
        let mut dict = DictionaryMorphology::new();
        dict.insert(
            "министерства",
            Morph::noun(&[Case::Nominative], Number::Plural).with_lemma("министерство"),
        );
        let s = tokenize("Министерства", &dict);
        assert!(try_type(&s, &lex, 0).unwrap().is_plural());
    }
}
