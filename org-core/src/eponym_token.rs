//! Epônimos: "имени Пушкина", "им. А.С. Пушкина", "named after Lomonosov".
//!
//! O sobrenome vem do resolvedor de pessoas; sem ele, da última palavra
//! capitalizada depois das iniciais. Vários epônimos podem ser unidos por "и"/"and".

use serde::Serialize;

use crate::lexicon::Lexicon;
use crate::referent::{resolve_at, ExternalResolver, ReferentKind};
use crate::token::TokenStream;

/// Palavras capitalizadas aceitas em um nome completo (nome, patronímico, sobrenome).
const MAX_PERSON_WORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EponymMatch {
    pub begin: usize,
    pub end: usize,
    pub eponyms: Vec<String>,
}

/// Uma pessoa a partir de `pos`: (sobrenome, último token).
fn person_at(tokens: &TokenStream, resolver: &dyn ExternalResolver, pos: usize) -> Option<(String, usize)> {
    if let Some(m) = resolve_at(resolver, ReferentKind::Person, tokens, pos) {
        let person = m.referent.as_person()?;
        return Some((person.last_name.clone(), m.end));
    }

    let mut at = pos;
    // Iniciais "А." / "А.С." (o segmentador junta "А.С" numa palavra)
    while let (Some(t), Some(dot)) = (tokens.get(at), tokens.get(at + 1)) {
        let letters = t.text.chars().filter(|c| c.is_alphabetic()).count();
        let initials = t.text.chars().all(|c| c.is_alphabetic() || c == '.');
        if t.is_letter_word() && t.chars.all_upper && initials && letters <= 2 && dot.is_punct('.') {
            at += 2;
        } else {
            break;
        }
    }

    let mut last = None;
    for i in at..at + MAX_PERSON_WORDS {
        let Some(t) = tokens.get(i) else { break };
        if (i > pos && t.newline_before) || !t.is_letter_word() || !t.chars.capital_upper {
            break;
        }
        last = Some(i);
    }
    let last = last?;
    let surname = tokens.get(last)?.text.clone();
    Some((surname, last))
}

pub fn try_eponym(
    tokens: &TokenStream,
    lexicon: &Lexicon,
    resolver: &dyn ExternalResolver,
    pos: usize,
) -> Option<EponymMatch> {
    let marker = lexicon.eponym_markers.try_parse(tokens, pos)?;
    let (first, mut end) = person_at(tokens, resolver, marker.end + 1)?;
    let mut eponyms = vec![first];

    while tokens.get(end + 1).map_or(false, |t| t.is_and()) {
        match person_at(tokens, resolver, end + 2) {
            Some((name, e)) => {
                eponyms.push(name);
                end = e;
            }
            None => break,
        }
    }
    Some(EponymMatch {
        begin: pos,
        end,
        eponyms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::referent::{GazetteerResolver, NoResolver, PersonRef};
    use crate::tokenizer::tokenize_plain;

    #[test]
    fn test_eponym_from_resolver() {
        let lex = Lexicon::builtin();
        let mut persons = GazetteerResolver::new();
        persons.add_person(&["Пушкина", "А.С. Пушкина"], PersonRef::new("Пушкин"));
        let s = tokenize_plain("школа имени Пушкина");
        let m = try_eponym(&s, &lex, &persons, 1).unwrap();
        assert_eq!(m.eponyms, vec!["ПУШКИН".to_string()]);
        assert_eq!(m.end, 2);
    }

    #[test]
    fn test_eponym_fallback_with_initials() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("университет им. М.В. Ломоносова");
        let m = try_eponym(&s, &lex, &NoResolver, 1).unwrap();
        assert_eq!(m.eponyms, vec!["Ломоносова".to_string()]);
        assert_eq!(m.end, s.len() - 1);
    }

    #[test]
    fn test_several_eponyms() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("театр имени Кирилла и Мефодия");
        let m = try_eponym(&s, &lex, &NoResolver, 1).unwrap();
        assert_eq!(m.eponyms, vec!["Кирилла".to_string(), "Мефодия".to_string()]);
    }
}
