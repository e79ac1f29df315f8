//! Cláusulas entre parênteses após uma organização:
//! "(далее — Комитет)", "(МВД)", "(<organização já reconhecida>)".

use serde::Serialize;

use crate::entity::OrgId;
use crate::lexicon::Lexicon;
use crate::name_token::try_quoted;
use crate::token::TokenStream;

/// Palavras aceitas num apelido sem aspas.
const MAX_ALIAS_WORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BracketContent {
    /// "далее — X": X passa a designar a organização no resto do documento.
    Alias(String),
    /// Sigla do nome ("(МВД)").
    Acronym(String),
    /// Organização já reconhecida: candidata a superior.
    Organization(OrgId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketMatch {
    pub begin: usize,
    pub end: usize,
    pub content: BracketContent,
}

pub fn try_bracket(tokens: &TokenStream, lexicon: &Lexicon, pos: usize) -> Option<BracketMatch> {
    if !tokens.get(pos)?.is_punct('(') {
        return None;
    }
    let inner = pos + 1;
    let first = tokens.get(inner)?;
    let closes_at = |i: usize| tokens.get(i).map_or(false, |t| t.is_punct(')'));

    if let Some(id) = first.organization() {
        return closes_at(inner + 1).then(|| BracketMatch {
            begin: pos,
            end: inner + 1,
            content: BracketContent::Organization(id),
        });
    }

    if let Some(m) = lexicon.alias_markers.try_parse(tokens, inner) {
        let mut at = m.end + 1;
        while tokens
            .get(at)
            .map_or(false, |t| t.is_hyphen() || t.is_punct(':') || t.is_comma())
        {
            at += 1;
        }
        let value = if let Some(q) = try_quoted(tokens, at) {
            at = q.end + 1;
            q.value
        } else {
            let start = at;
            while at < start + MAX_ALIAS_WORDS && tokens.get(at).map_or(false, |t| t.is_letter_word()) {
                at += 1;
            }
            if at == start {
                return None;
            }
            tokens.span_text(start, at - 1).to_string()
        };
        return closes_at(at).then(|| BracketMatch {
            begin: pos,
            end: at,
            content: BracketContent::Alias(value),
        });
    }

    let len = first.text.chars().count();
    if first.is_letter_word() && first.chars.all_upper && (2..=8).contains(&len) && closes_at(inner + 1) {
        return Some(BracketMatch {
            begin: pos,
            end: inner + 1,
            content: BracketContent::Acronym(first.text.clone()),
        });
    }
    None
}
