//! # Fluxo de Tokens
//!
//! O motor trabalha sobre uma sequência indexada de [`Token`]s. Cada token expõe
//! o texto de superfície, a forma normalizada (`term`), a morfologia fornecida
//! pelo analisador externo e, opcionalmente, um referente já anexado por outro
//! analisador (geografia, pessoa...).
//!
//! A sequência é imutável exceto pelo **embutimento**: quando uma organização é
//! reconhecida, o trecho correspondente é substituído por um único token composto
//! ([`TokenKind::Organization`]), preservando os offsets originais. As passagens
//! seguintes tratam esse token como atômico.

use serde::{Deserialize, Serialize};

use crate::entity::OrgId;
use crate::morph::{Morph, PartOfSpeech};
use crate::referent::Referent;

/// Normaliza um termo para comparação: maiúsculas, Ё→Е e sem diacríticos latinos.
pub fn normalize_term(text: &str) -> String {
    text.chars()
        .flat_map(char::to_uppercase)
        .map(|c| match c {
            'Ё' => 'Е',
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
            'Ç' => 'C',
            'È' | 'É' | 'Ê' | 'Ë' => 'E',
            'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
            'Ñ' => 'N',
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
            'Ý' => 'Y',
            other => other,
        })
        .collect()
}

/// Padrão de capitalização de um token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharsInfo {
    pub is_letter: bool,
    pub all_upper: bool,
    pub all_lower: bool,
    /// Primeira letra maiúscula, demais minúsculas.
    pub capital_upper: bool,
    pub is_latin: bool,
    pub is_cyrillic: bool,
}

impl CharsInfo {
    pub fn of(text: &str) -> Self {
        let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            return CharsInfo::default();
        }
        let all_upper = letters.iter().all(|c| c.is_uppercase());
        let all_lower = letters.iter().all(|c| c.is_lowercase());
        let capital_upper = letters[0].is_uppercase()
            && (letters.len() == 1 || letters[1..].iter().all(|c| c.is_lowercase()));
        CharsInfo {
            is_letter: true,
            all_upper,
            all_lower,
            capital_upper,
            is_latin: letters.iter().all(|c| c.is_ascii_alphabetic()),
            is_cyrillic: letters.iter().all(|c| ('\u{0400}'..='\u{04FF}').contains(c)),
        }
    }

    /// Maiúscula inicial ou toda em maiúsculas.
    pub fn is_capitalized(&self) -> bool {
        self.capital_upper || self.all_upper
    }
}

/// Natureza do token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TokenKind {
    Word,
    Number(u64),
    Punct(char),
    /// Referente anexado por um analisador externo.
    Referent(Referent),
    /// Organização reconhecida e embutida.
    Organization(OrgId),
}

/// Um token do fluxo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Texto de superfície.
    pub text: String,
    /// Forma normalizada (ver [`normalize_term`]).
    pub term: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    pub morph: Morph,
    pub chars: CharsInfo,
    /// Há quebra de linha entre o token anterior e este.
    pub newline_before: bool,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: &str, start: usize, end: usize, kind: TokenKind) -> Self {
        Token {
            text: text.to_string(),
            term: normalize_term(text),
            start,
            end,
            morph: Morph::default(),
            chars: CharsInfo::of(text),
            newline_before: false,
            kind,
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Word)
    }

    pub fn is_letter_word(&self) -> bool {
        self.is_word() && self.chars.is_letter
    }

    pub fn is_punct(&self, c: char) -> bool {
        matches!(self.kind, TokenKind::Punct(p) if p == c)
    }

    pub fn is_hyphen(&self) -> bool {
        matches!(self.kind, TokenKind::Punct('-' | '–' | '—'))
    }

    pub fn is_comma(&self) -> bool {
        self.is_punct(',')
    }

    /// Pontuação que encerra uma sentença ou oração.
    pub fn is_sentence_end(&self) -> bool {
        matches!(self.kind, TokenKind::Punct('.' | '!' | '?' | ';'))
    }

    pub fn number(&self) -> Option<u64> {
        match self.kind {
            TokenKind::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn organization(&self) -> Option<OrgId> {
        match self.kind {
            TokenKind::Organization(id) => Some(id),
            _ => None,
        }
    }

    pub fn referent(&self) -> Option<&Referent> {
        match &self.kind {
            TokenKind::Referent(r) => Some(r),
            _ => None,
        }
    }

    /// Compara com uma palavra normalizada pela forma ou pelo lema.
    pub fn is_value(&self, word: &str) -> bool {
        self.term == word || self.morph.lemma.as_deref() == Some(word)
    }

    pub fn is_preposition(&self) -> bool {
        self.is_word() && self.morph.pos == PartOfSpeech::Preposition
    }

    pub fn is_conjunction(&self) -> bool {
        self.is_word() && self.morph.pos == PartOfSpeech::Conjunction
    }

    /// Conjunção coordenativa usada em enumerações.
    pub fn is_and(&self) -> bool {
        self.is_value("И") || self.is_value("AND") || self.is_punct('&')
    }
}

/// Sequência indexada de tokens sobre um texto fonte.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenStream {
    source: String,
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(source: &str, tokens: Vec<Token>) -> Self {
        TokenStream {
            source: source.to_string(),
            tokens,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn prev(&self, index: usize) -> Option<&Token> {
        index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn next(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index + 1)
    }

    /// O token inicia uma sentença (início do texto, nova linha ou após pontuação final).
    pub fn is_sentence_start(&self, index: usize) -> bool {
        match (self.get(index), self.prev(index)) {
            (Some(t), Some(p)) => t.newline_before || p.is_sentence_end(),
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Texto original coberto pelos tokens `begin..=end`.
    pub fn span_text(&self, begin: usize, end: usize) -> &str {
        match (self.tokens.get(begin), self.tokens.get(end)) {
            (Some(b), Some(e)) if b.start <= e.end => self.source.get(b.start..e.end).unwrap_or(""),
            _ => "",
        }
    }

    /// Substitui `begin..=end` por um único token composto.
    ///
    /// Retorna `false` (sem alterar nada) se o intervalo for inválido.
    pub fn embed(&mut self, begin: usize, end: usize, kind: TokenKind) -> bool {
        if begin > end || end >= self.tokens.len() {
            return false;
        }
        let first = &self.tokens[begin];
        let last = &self.tokens[end];
        let text = self.source.get(first.start..last.end).unwrap_or(&first.text).to_string();
        let mut composite = Token::new(&text, first.start, last.end, kind);
        composite.newline_before = first.newline_before;
        composite.morph = Morph {
            pos: PartOfSpeech::Noun,
            case: first.morph.case,
            number: first.morph.number,
            lemma: None,
        };
        self.tokens.splice(begin..=end, std::iter::once(composite));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(words: &[&str]) -> TokenStream {
        let source = words.join(" ");
        let mut tokens = Vec::new();
        let mut offset = 0;
        for w in words {
            tokens.push(Token::new(w, offset, offset + w.len(), TokenKind::Word));
            offset += w.len() + 1;
        }
        TokenStream::new(&source, tokens)
    }

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("Ёлка"), "ЕЛКА");
        assert_eq!(normalize_term("Société"), "SOCIETE");
    }

    #[test]
    fn test_chars_info() {
        let c = CharsInfo::of("Газпром");
        assert!(c.capital_upper && !c.all_upper && c.is_cyrillic);
        let c = CharsInfo::of("ГУВД");
        assert!(c.all_upper && c.is_capitalized());
        let c = CharsInfo::of("bank");
        assert!(c.all_lower && c.is_latin);
    }

    #[test]
    fn test_embed_preserves_offsets() {
        let mut s = stream(&["В", "ООО", "Ромашка", "работают"]);
        assert!(s.embed(1, 2, TokenKind::Organization(OrgId(0))));
        assert_eq!(s.len(), 3);
        let composite = s.get(1).unwrap();
        assert_eq!(composite.text, "ООО Ромашка");
        assert_eq!(composite.organization(), Some(OrgId(0)));
        assert_eq!(s.span_text(1, 1), "ООО Ромашка");
        assert!(!s.embed(2, 5, TokenKind::Word));
    }
}
