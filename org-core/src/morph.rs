//! # Morfologia por Token
//!
//! O analisador morfológico é um colaborador externo: ele fornece lema, classe
//! gramatical, caso e número de cada palavra. Este módulo define apenas o
//! contrato ([`MorphAnalyzer`]) e duas implementações simples:
//!
//! - [`NullMorphology`]: não sabe nada (todas as categorias indefinidas).
//! - [`DictionaryMorphology`]: tabela palavra → análise, semeada com as
//!   palavras funcionais (preposições, conjunções, pronomes) do russo e do inglês.
//!
//! Categoria indefinida significa "concorda com qualquer coisa": o motor nunca
//! rejeita uma concordância por falta de informação.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::token::normalize_term;

/// Caso gramatical (russo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    Nominative,
    Genitive,
    Dative,
    Accusative,
    Instrumental,
    Prepositional,
}

impl Case {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Conjunto de casos possíveis de uma forma (formas russas são ambíguas).
///
/// O conjunto vazio significa "caso desconhecido".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseSet(u8);

impl CaseSet {
    pub const UNDEFINED: CaseSet = CaseSet(0);

    pub fn of(cases: &[Case]) -> Self {
        CaseSet(cases.iter().fold(0, |acc, c| acc | c.bit()))
    }

    pub fn is_undefined(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, case: Case) -> bool {
        self.0 & case.bit() != 0
    }

    /// Interseção que preserva a informação quando um dos lados é indefinido.
    pub fn narrow(self, other: CaseSet) -> CaseSet {
        if self.is_undefined() {
            other
        } else if other.is_undefined() {
            self
        } else {
            CaseSet(self.0 & other.0)
        }
    }

    /// Duas formas concordam se algum caso é comum ou se um lado é indefinido.
    pub fn agrees(self, other: CaseSet) -> bool {
        self.is_undefined() || other.is_undefined() || self.0 & other.0 != 0
    }
}

/// Número gramatical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Number {
    #[default]
    Undefined,
    Singular,
    Plural,
}

impl Number {
    pub fn agrees(self, other: Number) -> bool {
        self == Number::Undefined || other == Number::Undefined || self == other
    }
}

/// Classe gramatical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    #[default]
    Unknown,
    Noun,
    Adjective,
    Verb,
    Adverb,
    Preposition,
    Conjunction,
    Pronoun,
}

/// Análise morfológica de uma palavra.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Morph {
    pub pos: PartOfSpeech,
    pub case: CaseSet,
    pub number: Number,
    /// Lema normalizado (maiúsculas, Ё→Е).
    pub lemma: Option<String>,
}

impl Morph {
    pub fn new(pos: PartOfSpeech) -> Self {
        Morph {
            pos,
            ..Default::default()
        }
    }

    pub fn noun(cases: &[Case], number: Number) -> Self {
        Morph::new(PartOfSpeech::Noun).with_case(cases).with_number(number)
    }

    pub fn adjective(cases: &[Case], number: Number) -> Self {
        Morph::new(PartOfSpeech::Adjective).with_case(cases).with_number(number)
    }

    pub fn with_case(mut self, cases: &[Case]) -> Self {
        self.case = CaseSet::of(cases);
        self
    }

    pub fn with_number(mut self, number: Number) -> Self {
        self.number = number;
        self
    }

    pub fn with_lemma(mut self, lemma: &str) -> Self {
        self.lemma = Some(normalize_term(lemma));
        self
    }

    pub fn is_noun(&self) -> bool {
        self.pos == PartOfSpeech::Noun
    }
}

/// Contrato do analisador morfológico externo.
pub trait MorphAnalyzer {
    fn analyze(&self, word: &str) -> Morph;
}

/// Analisador vazio: tudo indefinido.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMorphology;

impl MorphAnalyzer for NullMorphology {
    fn analyze(&self, _word: &str) -> Morph {
        Morph::default()
    }
}

/// Preposições conhecidas (russo e inglês)
const PREPOSITIONS: &[&str] = &[
    "В", "ВО", "НА", "ПО", "ПРИ", "С", "СО", "ЗА", "О", "ОБ", "ИЗ", "ДЛЯ", "ОТ", "ДО", "К", "КО",
    "У", "ПОД", "НАД", "ПРО", "ЧЕРЕЗ", "OF", "FOR", "IN", "AT", "ON", "BY", "WITH", "ABOUT",
];

const CONJUNCTIONS: &[&str] = &["И", "ИЛИ", "А", "НО", "AND", "OR", "BUT"];

const PRONOUNS: &[&str] = &["ОН", "ОНА", "ОНО", "ОНИ", "ЭТО", "ЕГО", "ЕЕ", "ИХ", "IT", "THEY", "HE", "SHE"];

/// Analisador baseado em tabela.
///
/// Útil para testes e demonstrações: o chamador registra explicitamente as formas
/// que interessam. Palavras ausentes recebem análise indefinida.
#[derive(Debug, Clone, Default)]
pub struct DictionaryMorphology {
    entries: HashMap<String, Morph>,
}

impl DictionaryMorphology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabela já contendo as palavras funcionais.
    pub fn with_function_words() -> Self {
        let mut dict = Self::new();
        for w in PREPOSITIONS {
            dict.insert(w, Morph::new(PartOfSpeech::Preposition));
        }
        for w in CONJUNCTIONS {
            dict.insert(w, Morph::new(PartOfSpeech::Conjunction));
        }
        for w in PRONOUNS {
            dict.insert(w, Morph::new(PartOfSpeech::Pronoun));
        }
        dict
    }

    pub fn insert(&mut self, word: &str, morph: Morph) -> &mut Self {
        self.entries.insert(normalize_term(word), morph);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MorphAnalyzer for DictionaryMorphology {
    fn analyze(&self, word: &str) -> Morph {
        self.entries
            .get(&normalize_term(word))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_agreement_with_undefined() {
        let gen = CaseSet::of(&[Case::Genitive]);
        assert!(gen.agrees(CaseSet::UNDEFINED));
        assert!(!gen.agrees(CaseSet::of(&[Case::Dative])));
        assert_eq!(gen.narrow(CaseSet::UNDEFINED), gen);
    }

    #[test]
    fn test_dictionary_lookup_is_case_insensitive() {
        let mut dict = DictionaryMorphology::with_function_words();
        dict.insert("юстиции", Morph::noun(&[Case::Genitive], Number::Singular).with_lemma("юстиция"));

        let m = dict.analyze("Юстиции");
        assert!(m.is_noun());
        assert!(m.case.contains(Case::Genitive));
        assert_eq!(m.lemma.as_deref(), Some("ЮСТИЦИЯ"));
        assert_eq!(dict.analyze("по").pos, PartOfSpeech::Preposition);
        assert_eq!(dict.analyze("неизвестно"), Morph::default());
    }
}
