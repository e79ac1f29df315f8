//! # Coleção de Termos (Trie de Palavras)
//!
//! Dicionário de frases de várias palavras com busca pelo **maior casamento**
//! a partir de uma posição do fluxo de tokens.
//!
//! - A trie é indexada por palavra normalizada; cada token pode casar pela forma
//!   de superfície ou pelo lema, por isso a busca percorre uma pilha explícita de
//!   estados `(nó, posição)`.
//! - Siglas (ex: "ГУВД") são indexadas à parte e só casam com um token em
//!   maiúsculas, salvo indicação contrária.
//! - Um casamento nunca atravessa uma quebra de linha, a menos que o termo seja
//!   marcado como `cross_line`.
//!
//! A coleção é genérica sobre o dado carregado por cada termo (a "tag").

use std::collections::HashMap;

use crate::token::{normalize_term, TokenStream};

/// Um termo do dicionário.
#[derive(Debug, Clone)]
pub struct Termin<T> {
    /// Forma canônica normalizada.
    pub canonic: String,
    /// Sequências de palavras aceitas (a canônica é a primeira).
    pub variants: Vec<Vec<String>>,
    pub acronym: Option<String>,
    pub acronym_can_be_lower: bool,
    pub cross_line: bool,
    pub tag: T,
}

/// Divide uma frase em palavras normalizadas, separando pontos e hífens.
pub fn split_phrase(phrase: &str) -> Vec<String> {
    let mut words = Vec::new();
    for chunk in phrase.split_whitespace() {
        let mut current = String::new();
        for ch in chunk.chars() {
            if ch == '.' || ch == '-' || ch == '/' {
                if !current.is_empty() {
                    words.push(normalize_term(&current));
                    current.clear();
                }
                words.push(ch.to_string());
            } else {
                current.push(ch);
            }
        }
        if !current.is_empty() {
            words.push(normalize_term(&current));
        }
    }
    words
}

impl<T> Termin<T> {
    pub fn new(canonic: &str, tag: T) -> Self {
        let words = split_phrase(canonic);
        Termin {
            canonic: words.join(" "),
            variants: vec![words],
            acronym: None,
            acronym_can_be_lower: false,
            cross_line: false,
            tag,
        }
    }

    /// Termo que só casa pela sigla.
    pub fn acronym_only(acronym: &str, tag: T) -> Self {
        let acr = normalize_term(acronym);
        Termin {
            canonic: acr.clone(),
            variants: Vec::new(),
            acronym: Some(acr),
            acronym_can_be_lower: false,
            cross_line: false,
            tag,
        }
    }

    pub fn with_variant(mut self, variant: &str) -> Self {
        let words = split_phrase(variant);
        if !words.is_empty() && !self.variants.contains(&words) {
            self.variants.push(words);
        }
        self
    }

    pub fn with_acronym(mut self, acronym: &str) -> Self {
        self.acronym = Some(normalize_term(acronym));
        self
    }

    pub fn acronym_lower(mut self) -> Self {
        self.acronym_can_be_lower = true;
        self
    }

    pub fn cross_line(mut self) -> Self {
        self.cross_line = true;
        self
    }
}

/// Resultado de um casamento.
#[derive(Debug)]
pub struct TerminMatch<'a, T> {
    pub termin: &'a Termin<T>,
    /// Índice do termo na coleção.
    pub index: usize,
    pub begin: usize,
    pub end: usize,
    pub via_acronym: bool,
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<String, usize>,
    terminals: Vec<usize>,
}

/// Coleção imutável após a construção.
#[derive(Debug, Clone)]
pub struct TerminCollection<T> {
    termins: Vec<Termin<T>>,
    nodes: Vec<TrieNode>,
    acronyms: HashMap<String, Vec<usize>>,
}

impl<T> Default for TerminCollection<T> {
    fn default() -> Self {
        TerminCollection {
            termins: Vec::new(),
            nodes: vec![TrieNode::default()],
            acronyms: HashMap::new(),
        }
    }
}

impl<T> TerminCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.termins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.termins.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Termin<T>> {
        self.termins.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Termin<T>> {
        self.termins.iter()
    }

    pub fn add(&mut self, termin: Termin<T>) -> usize {
        let index = self.termins.len();
        for variant in &termin.variants {
            let mut node = 0;
            for word in variant {
                node = match self.nodes[node].children.get(word) {
                    Some(&child) => child,
                    None => {
                        let child = self.nodes.len();
                        self.nodes.push(TrieNode::default());
                        self.nodes[node].children.insert(word.clone(), child);
                        child
                    }
                };
            }
            if !self.nodes[node].terminals.contains(&index) {
                self.nodes[node].terminals.push(index);
            }
        }
        if let Some(acr) = &termin.acronym {
            self.acronyms.entry(acr.clone()).or_default().push(index);
        }
        self.termins.push(termin);
        index
    }

    /// Maior casamento começando em `pos`.
    ///
    /// Empates de comprimento são resolvidos pelo termo adicionado primeiro.
    pub fn try_parse(&self, tokens: &TokenStream, pos: usize) -> Option<TerminMatch<'_, T>> {
        let first = tokens.get(pos)?;
        let mut best: Option<(usize, usize, bool)> = None;

        let consider = |index: usize, end: usize, via_acronym: bool, best: &mut Option<(usize, usize, bool)>| {
            let better = match best {
                None => true,
                Some((bi, be, _)) => end > *be || (end == *be && index < *bi),
            };
            if better {
                *best = Some((index, end, via_acronym));
            }
        };

        // Siglas: um único token
        if first.is_word() {
            if let Some(list) = self.acronyms.get(&first.term) {
                for &index in list {
                    let termin = &self.termins[index];
                    if first.chars.all_upper || termin.acronym_can_be_lower {
                        consider(index, pos, true, &mut best);
                    }
                }
            }
        }

        // Trie: pilha explícita de (nó, próxima posição)
        let mut stack: Vec<(usize, usize)> = vec![(0, pos)];
        while let Some((node, at)) = stack.pop() {
            if at > pos {
                for &index in &self.nodes[node].terminals {
                    consider(index, at - 1, false, &mut best);
                }
            }
            let Some(token) = tokens.get(at) else { continue };
            if token.organization().is_some() || token.referent().is_some() {
                continue;
            }
            let mut keys: Vec<&str> = vec![token.term.as_str()];
            if let Some(lemma) = token.morph.lemma.as_deref() {
                if lemma != token.term {
                    keys.push(lemma);
                }
            }
            for key in keys {
                if let Some(&child) = self.nodes[node].children.get(key) {
                    stack.push((child, at + 1));
                }
            }
        }

        let (index, end, via_acronym) = best?;
        let termin = &self.termins[index];
        if !termin.cross_line && (pos + 1..=end).any(|i| tokens.get(i).map_or(false, |t| t.newline_before)) {
            return None;
        }
        Some(TerminMatch {
            termin,
            index,
            begin: pos,
            end,
            via_acronym,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morph::{DictionaryMorphology, Morph, PartOfSpeech};
    use crate::tokenizer::{tokenize, tokenize_plain};

    fn collection() -> TerminCollection<&'static str> {
        let mut c = TerminCollection::new();
        c.add(Termin::new("УПРАВЛЕНИЕ", "управление"));
        c.add(Termin::new("ГЛАВНОЕ УПРАВЛЕНИЕ ВНУТРЕННИХ ДЕЛ", "гувд").with_acronym("ГУВД"));
        c.add(Termin::new("ИМ.", "им").with_variant("ИМЕНИ"));
        c
    }

    #[test]
    fn test_longest_match_wins() {
        let c = collection();
        let s = tokenize_plain("Главное управление внутренних дел");
        let m = c.try_parse(&s, 0).unwrap();
        assert_eq!(m.termin.tag, "гувд");
        assert_eq!(m.end, 3);

        let s = tokenize_plain("управление кадров");
        assert_eq!(c.try_parse(&s, 0).unwrap().end, 0);
    }

    #[test]
    fn test_acronym_requires_upper_case() {
        let c = collection();
        let s = tokenize_plain("ГУВД гувд");
        let m = c.try_parse(&s, 0).unwrap();
        assert!(m.via_acronym);
        assert!(c.try_parse(&s, 1).is_none());

        let mut c = TerminCollection::new();
        c.add(Termin::acronym_only("ООН", "оон").acronym_lower());
        let s = tokenize_plain("оон");
        assert_eq!(c.try_parse(&s, 0).unwrap().termin.tag, "оон");
    }

    #[test]
    fn test_abridge_with_dot() {
        let c = collection();
        let s = tokenize_plain("им. Пушкина");
        assert_eq!(c.try_parse(&s, 0).unwrap().end, 1);
    }

    #[test]
    fn test_no_match_across_newline() {
        let c = collection();
        let s = tokenize_plain("Главное управление\nвнутренних дел");
        assert!(c.try_parse(&s, 0).is_none());
    }

    #[test]
    fn test_match_by_lemma() {
        let mut dict = DictionaryMorphology::new();
        dict.insert("управления", Morph::new(PartOfSpeech::Noun).with_lemma("управление"));
        let s = tokenize("управления", &dict);
        assert!(collection().try_parse(&s, 0).is_some());
    }
}
