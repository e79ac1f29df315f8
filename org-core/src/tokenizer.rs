//! # Tokenizador
//!
//! Divide o texto bruto em tokens (palavras, números, pontuações) preservando os
//! offsets originais. A segmentação segue as fronteiras de palavra Unicode
//! (UAX #29, via `unicode-segmentation`), o que separa naturalmente hífens,
//! aspas angulares e pontos de abreviação ("им." → "им", ".").
//!
//! A morfologia de cada palavra é preenchida por um [`MorphAnalyzer`] externo.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use org_core::morph::NullMorphology;
//! use org_core::tokenizer::tokenize;
//!
//! let stream = tokenize("ООО «Ромашка»", &NullMorphology);
//! // "ООО", "«", "Ромашка", "»"
//! assert_eq!(stream.len(), 4);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::morph::{MorphAnalyzer, NullMorphology};
use crate::token::{Token, TokenKind, TokenStream};

/// Tokeniza sem morfologia (todas as categorias indefinidas).
pub fn tokenize_plain(text: &str) -> TokenStream {
    tokenize(text, &NullMorphology)
}

/// Tokeniza o texto e consulta o analisador morfológico para cada palavra.
pub fn tokenize(text: &str, morph: &dyn MorphAnalyzer) -> TokenStream {
    let mut tokens = Vec::new();
    let mut newline_pending = false;

    for (offset, segment) in text.split_word_bound_indices() {
        if segment.chars().all(char::is_whitespace) {
            if segment.contains('\n') {
                newline_pending = true;
            }
            continue;
        }

        if segment.chars().any(char::is_alphanumeric) {
            let kind = if segment.chars().all(|c| c.is_ascii_digit()) {
                match segment.parse::<u64>() {
                    Ok(v) => TokenKind::Number(v),
                    Err(_) => TokenKind::Word,
                }
            } else {
                TokenKind::Word
            };
            let mut token = Token::new(segment, offset, offset + segment.len(), kind);
            if matches!(token.kind, TokenKind::Word) {
                token.morph = morph.analyze(segment);
            }
            push_token(&mut tokens, token, &mut newline_pending);
        } else {
            // Pontuação: um token por caractere
            for (i, ch) in segment.char_indices() {
                let start = offset + i;
                let token = Token::new(
                    &ch.to_string(),
                    start,
                    start + ch.len_utf8(),
                    TokenKind::Punct(ch),
                );
                push_token(&mut tokens, token, &mut newline_pending);
            }
        }
    }

    TokenStream::new(text, tokens)
}

/// Adiciona o token aplicando a marca de quebra de linha pendente
fn push_token(tokens: &mut Vec<Token>, mut token: Token, newline_pending: &mut bool) {
    token.newline_before = *newline_pending;
    *newline_pending = false;
    tokens.push(token);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morph::{Case, DictionaryMorphology, Morph, Number, PartOfSpeech};

    #[test]
    fn test_tokenize_basic() {
        let s = tokenize_plain("Газпром России увеличил добычу.");
        let texts: Vec<&str> = s.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Газпром", "России", "увеличил", "добычу", "."]);
        assert!(s.get(4).unwrap().is_sentence_end());
    }

    #[test]
    fn test_tokenize_quotes_and_dashes() {
        let s = tokenize_plain("комитет (далее — Комитет)");
        let texts: Vec<&str> = s.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["комитет", "(", "далее", "—", "Комитет", ")"]);
        assert!(s.get(3).unwrap().is_hyphen());
    }

    #[test]
    fn test_tokenize_numbers_and_newlines() {
        let s = tokenize_plain("школа № 15\nИНН 7707083893");
        assert_eq!(s.get(2).unwrap().number(), Some(15));
        assert!(s.get(3).unwrap().newline_before);
        assert_eq!(s.get(4).unwrap().number(), Some(7707083893));
        assert_eq!(&s.source()[s.get(4).unwrap().start..s.get(4).unwrap().end], "7707083893");
    }

    #[test]
    fn test_tokenize_fills_morphology() {
        let mut dict = DictionaryMorphology::with_function_words();
        dict.insert("кадров", Morph::noun(&[Case::Genitive], Number::Plural));
        let s = tokenize("отдел кадров по", &dict);
        assert!(s.get(1).unwrap().morph.case.contains(Case::Genitive));
        assert_eq!(s.get(2).unwrap().morph.pos, PartOfSpeech::Preposition);
        assert_eq!(s.get(0).unwrap().morph, Morph::default());
    }
}
