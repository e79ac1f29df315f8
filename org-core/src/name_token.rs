//! # Token de Nome
//!
//! Candidatos a nome próprio de organização:
//!
//! | Forma | Exemplo | Regra |
//! |-------|---------|-------|
//! | Entre aspas | «Ромашка» | fecha com a aspa correspondente |
//! | Nome-padrão | Единая Россия | dicionário com perfil |
//! | Sintagma nominal | юстиции, по делам молодежи | minúsculas após o tipo |
//! | Próprio | Восток, Acme Systems | sequência capitalizada |
//! | Sufixo-padrão | Ltd, GmbH | fecha um nome latino |
//!
//! Uma sequência para em fronteiras de oração, em outro tipo de organização, em
//! referentes (geografia) e em organizações já reconhecidas.

use serde::Serialize;

use crate::kind::OrgProfile;
use crate::lexicon::Lexicon;
use crate::morph::{Case, PartOfSpeech};
use crate::referent::{resolve_at, ExternalResolver, ReferentKind};
use crate::token::{Token, TokenStream};

/// Comprimento máximo de um nome entre aspas, em tokens.
const MAX_QUOTED: usize = 12;
/// Comprimento máximo de uma sequência capitalizada.
const MAX_PROPER: usize = 4;
/// Comprimento máximo de um sintagma nominal.
const MAX_PHRASE: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NameKind {
    Quoted,
    Std { profile: OrgProfile, type_hint: Option<String> },
    NounPhrase,
    Proper,
    Latin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameMatch {
    pub begin: usize,
    pub end: usize,
    /// Texto do nome, sem aspas.
    pub value: String,
    pub kind: NameKind,
    /// Todas as palavras em maiúsculas (provável sigla).
    pub is_abbr: bool,
    pub sentence_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StdTailMatch {
    pub begin: usize,
    pub end: usize,
    pub type_label: String,
}

fn closing_quote(open: char) -> Option<char> {
    match open {
        '«' => Some('»'),
        '"' => Some('"'),
        '“' => Some('”'),
        '„' => Some('“'),
        '\'' => Some('\''),
        _ => None,
    }
}

fn is_quote(token: &Token) -> bool {
    matches!(token.kind, crate::token::TokenKind::Punct(c) if closing_quote(c).is_some() || c == '»' || c == '”')
}

/// O token inicia outra coisa que encerra um nome.
fn is_name_stop(tokens: &TokenStream, lexicon: &Lexicon, resolver: &dyn ExternalResolver, pos: usize) -> bool {
    let Some(t) = tokens.get(pos) else { return true };
    if t.organization().is_some() || t.referent().is_some() {
        return true;
    }
    if !t.is_letter_word() || t.is_preposition() || t.is_conjunction() || t.morph.pos == PartOfSpeech::Verb {
        return true;
    }
    if lexicon
        .types
        .try_parse(tokens, pos)
        .map_or(false, |m| !m.termin.tag.pure_prefix)
    {
        return true;
    }
    if lexicon.global_terms.try_parse(tokens, pos).is_some() && t.chars.is_capitalized() {
        return true;
    }
    resolve_at(resolver, ReferentKind::Geo, tokens, pos).is_some()
}

/// «Ромашка», "Acme", “Вектор”.
pub fn try_quoted(tokens: &TokenStream, pos: usize) -> Option<NameMatch> {
    let open = tokens.get(pos)?;
    let crate::token::TokenKind::Punct(c) = open.kind else { return None };
    let close = closing_quote(c)?;
    let mut depth = 0usize;
    for i in pos + 1..=pos + MAX_QUOTED + 1 {
        let t = tokens.get(i)?;
        if t.newline_before {
            return None;
        }
        if c == '«' && t.is_punct('«') {
            depth += 1;
            continue;
        }
        if t.is_punct(close) {
            if depth > 0 {
                depth -= 1;
                continue;
            }
            if i == pos + 1 {
                return None;
            }
            let value = tokens.span_text(pos + 1, i - 1).trim().to_string();
            let letters: Vec<char> = value.chars().filter(|c| c.is_alphabetic()).collect();
            if letters.is_empty() {
                return None;
            }
            return Some(NameMatch {
                begin: pos,
                end: i,
                is_abbr: !value.contains(' ') && letters.iter().all(|c| c.is_uppercase()),
                value,
                kind: NameKind::Quoted,
                sentence_start: false,
            });
        }
    }
    None
}

/// Nome do dicionário de nomes-padrão, opcionalmente entre aspas.
pub fn try_std_name(tokens: &TokenStream, lexicon: &Lexicon, pos: usize) -> Option<NameMatch> {
    let first = tokens.get(pos)?;
    if is_quote(first) {
        let quoted = try_quoted(tokens, pos)?;
        let inner = try_std_name(tokens, lexicon, pos + 1)?;
        return (inner.end + 1 == quoted.end).then(|| NameMatch {
            begin: pos,
            end: quoted.end,
            ..inner
        });
    }
    if !first.chars.is_capitalized() {
        return None;
    }
    let m = lexicon.std_names.try_parse(tokens, pos)?;
    Some(NameMatch {
        begin: pos,
        end: m.end,
        value: tokens.span_text(pos, m.end).to_string(),
        kind: NameKind::Std {
            profile: m.termin.tag.profile,
            type_hint: m.termin.tag.type_hint.clone(),
        },
        is_abbr: first.chars.all_upper && m.end == pos,
        sentence_start: tokens.is_sentence_start(pos),
    })
}

/// Sintagma nominal em minúsculas após o tipo.
///
/// "юстиции" (genitivo), "кадров", "по делам молодежи" (ПО + dativo), "of Justice".
/// Conjunções só continuam o sintagma quando `allow_conjunction` é verdadeiro.
pub fn try_noun_phrase(
    tokens: &TokenStream,
    lexicon: &Lexicon,
    resolver: &dyn ExternalResolver,
    pos: usize,
    allow_conjunction: bool,
) -> Option<NameMatch> {
    let first = tokens.get(pos)?;
    let mut at = pos;

    // Preposição introdutória: ПО + dativo, OF/FOR + nome latino
    if first.is_value("ПО") || first.is_value("OF") || first.is_value("FOR") {
        let next = tokens.get(pos + 1)?;
        if next.newline_before || !next.is_letter_word() {
            return None;
        }
        if next.chars.is_latin && next.chars.is_capitalized() {
            let run = try_proper(tokens, lexicon, resolver, pos + 1)?;
            return Some(NameMatch {
                begin: pos,
                end: run.end,
                value: tokens.span_text(pos, run.end).to_string(),
                kind: NameKind::NounPhrase,
                is_abbr: false,
                sentence_start: false,
            });
        }
        if !next.chars.all_lower || !(next.morph.case.is_undefined() || next.morph.case.contains(Case::Dative)) {
            return None;
        }
        at = pos + 1;
    } else if !first.chars.all_lower
        || !(first.morph.case.is_undefined() || first.morph.case.contains(Case::Genitive))
    {
        return None;
    }

    let mut end = None;
    let mut i = at;
    while i < at + MAX_PHRASE {
        let Some(t) = tokens.get(i) else { break };
        if t.newline_before && i > pos {
            break;
        }
        if t.is_and() {
            let continues = allow_conjunction
                && end.is_some()
                && tokens
                    .get(i + 1)
                    .map_or(false, |n| n.chars.all_lower && n.is_letter_word() && !is_name_stop(tokens, lexicon, resolver, i + 1));
            if continues {
                i += 1;
                continue;
            }
            break;
        }
        if !t.chars.all_lower || is_name_stop(tokens, lexicon, resolver, i) {
            break;
        }
        end = Some(i);
        i += 1;
    }
    let end = end?;
    Some(NameMatch {
        begin: pos,
        end,
        value: tokens.span_text(pos, end).to_string(),
        kind: NameKind::NounPhrase,
        is_abbr: false,
        sentence_start: false,
    })
}

/// Sequência de palavras capitalizadas (ou em maiúsculas).
pub fn try_proper(
    tokens: &TokenStream,
    lexicon: &Lexicon,
    resolver: &dyn ExternalResolver,
    pos: usize,
) -> Option<NameMatch> {
    let first = tokens.get(pos)?;
    if !first.is_letter_word() || !first.chars.is_capitalized() {
        return None;
    }
    let latin = first.chars.is_latin;
    let mut end = None;
    let mut i = pos;
    while i < pos + MAX_PROPER {
        let Some(t) = tokens.get(i) else { break };
        if i > pos && t.newline_before {
            break;
        }
        // "Johnson & Johnson"
        if latin && t.is_punct('&') && end.is_some() {
            if tokens.get(i + 1).map_or(false, |n| n.chars.is_latin && n.chars.is_capitalized()) {
                i += 1;
                continue;
            }
            break;
        }
        if !t.is_letter_word() || !t.chars.is_capitalized() || t.chars.is_latin != latin {
            break;
        }
        if lexicon.std_tails.try_parse(tokens, i).is_some() && end.is_some() {
            break;
        }
        if is_name_stop(tokens, lexicon, resolver, i) {
            break;
        }
        end = Some(i);
        i += 1;
    }
    let end = end?;
    let value = tokens.span_text(pos, end).to_string();
    let is_abbr = end == pos && first.chars.all_upper && first.text.chars().count() > 1;
    Some(NameMatch {
        begin: pos,
        end,
        value,
        kind: if latin { NameKind::Latin } else { NameKind::Proper },
        is_abbr,
        sentence_start: tokens.is_sentence_start(pos),
    })
}

/// "Ltd", "Inc.", "GmbH" após um nome latino.
pub fn try_std_tail(tokens: &TokenStream, lexicon: &Lexicon, pos: usize) -> Option<StdTailMatch> {
    let mut at = pos;
    if tokens.get(at).map_or(false, Token::is_comma) {
        at += 1;
    }
    let m = lexicon.std_tails.try_parse(tokens, at)?;
    Some(StdTailMatch {
        begin: pos,
        end: m.end,
        type_label: m.termin.tag.clone(),
    })
}

/// Qualquer nome a partir de `pos`, na ordem: aspas, nome-padrão, sintagma, próprio.
pub fn try_name(
    tokens: &TokenStream,
    lexicon: &Lexicon,
    resolver: &dyn ExternalResolver,
    pos: usize,
    allow_conjunction: bool,
) -> Option<NameMatch> {
    if let Some(std) = try_std_name(tokens, lexicon, pos) {
        return Some(std);
    }
    if let Some(q) = try_quoted(tokens, pos) {
        return Some(q);
    }
    if let Some(np) = try_noun_phrase(tokens, lexicon, resolver, pos, allow_conjunction) {
        return Some(np);
    }
    try_proper(tokens, lexicon, resolver, pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morph::{DictionaryMorphology, Morph, Number};
    use crate::referent::{GazetteerResolver, GeoRef, NoResolver};
    use crate::tokenizer::{tokenize, tokenize_plain};

    #[test]
    fn test_quoted_name() {
        let s = tokenize_plain("ООО «Ромашка» объявило");
        let n = try_quoted(&s, 1).unwrap();
        assert_eq!(n.value, "Ромашка");
        assert_eq!((n.begin, n.end), (1, 3));
        assert!(try_quoted(&s, 0).is_none());
    }

    #[test]
    fn test_nested_quotes() {
        let s = tokenize_plain("«Завод «Прогресс»» работает");
        let n = try_quoted(&s, 0).unwrap();
        assert_eq!(n.value, "Завод «Прогресс»");
    }

    #[test]
    fn test_std_name_in_quotes() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("партия «Единая Россия»");
        let n = try_std_name(&s, &lex, 1).unwrap();
        assert!(matches!(n.kind, NameKind::Std { profile: OrgProfile::Policy, .. }));
        assert_eq!(n.end, 4);
    }

    #[test]
    fn test_noun_phrase_stops_at_geo() {
        let lex = Lexicon::builtin();
        let mut geo = GazetteerResolver::new();
        geo.add_geo(&["Российской Федерации"], GeoRef::state("Россия"));
        let s = tokenize_plain("Министерство юстиции Российской Федерации");
        let n = try_noun_phrase(&s, &lex, &geo, 1, false).unwrap();
        assert_eq!((n.begin, n.end), (1, 1));
        assert_eq!(n.value, "юстиции");
    }

    #[test]
    fn test_noun_phrase_with_po() {
        let lex = Lexicon::builtin();
        let dict = DictionaryMorphology::with_function_words();
        let s = tokenize("Комитет по делам молодежи (далее", &dict);
        let n = try_noun_phrase(&s, &lex, &NoResolver, 1, false).unwrap();
        assert_eq!(n.value, "по делам молодежи");
        assert_eq!(n.end, 3);
    }

    #[test]
    fn test_noun_phrase_conjunction() {
        let lex = Lexicon::builtin();
        let dict = DictionaryMorphology::with_function_words();
        let s = tokenize("отдел кадров и учета", &dict);
        assert_eq!(try_noun_phrase(&s, &lex, &NoResolver, 1, false).unwrap().end, 1);
        assert_eq!(try_noun_phrase(&s, &lex, &NoResolver, 1, true).unwrap().end, 3);
    }

    #[test]
    fn test_noun_phrase_rejects_verbs_and_wrong_case() {
        let lex = Lexicon::builtin();
        let mut dict = DictionaryMorphology::with_function_words();
        dict.insert("утвердило", Morph::new(PartOfSpeech::Verb));
        dict.insert("правила", Morph::noun(&[Case::Nominative, Case::Accusative], Number::Plural));
        let s = tokenize("министерство утвердило правила", &dict);
        assert!(try_noun_phrase(&s, &lex, &NoResolver, 1, false).is_none());
        assert!(try_noun_phrase(&s, &lex, &NoResolver, 2, false).is_none());
    }

    #[test]
    fn test_proper_and_latin_runs() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("банк Восток сообщил");
        let n = try_proper(&s, &lex, &NoResolver, 1).unwrap();
        assert_eq!((n.value.as_str(), n.kind.clone()), ("Восток", NameKind::Proper));

        let s = tokenize_plain("Acme Systems Ltd");
        let n = try_proper(&s, &lex, &NoResolver, 0).unwrap();
        assert_eq!(n.value, "Acme Systems");
        assert_eq!(n.kind, NameKind::Latin);
        assert_eq!(try_std_tail(&s, &lex, 2).unwrap().type_label, "company");
    }

    #[test]
    fn test_proper_stops_at_type() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("Acme Bank");
        let n = try_proper(&s, &lex, &NoResolver, 0).unwrap();
        assert_eq!(n.end, 0);
    }
}
