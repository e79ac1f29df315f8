//! # Candidatos de Casamento
//!
//! Todo classificador de token devolve um [`MatchCandidate`]. O montador
//! consome a sequência de candidatos com `match` exaustivo, tanto para montar a
//! entidade quanto para pontuar.
//!
//! [`MatchContext`] agrupa o que os classificadores leem: o fluxo de tokens, o
//! léxico, o resolvedor externo, o registro da passagem atual e a configuração.

use serde::Serialize;

use crate::bracket::BracketMatch;
use crate::config::EngineConfig;
use crate::eponym_token::EponymMatch;
use crate::global_token::{try_global, GlobalMatch};
use crate::lexicon::Lexicon;
use crate::name_token::{try_proper, try_quoted, try_std_name, NameKind, NameMatch, StdTailMatch};
use crate::number_token::{LegalIdMatch, NumberMatch};
use crate::referent::{resolve_at, ExternalResolver, GeoRef, Referent, ReferentKind};
use crate::registry::Registry;
use crate::scoring::ScoreTable;
use crate::token::TokenStream;
use crate::type_token::{try_type, TypeMatch};

/// Tudo o que o montador consulta, somente leitura.
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    pub tokens: &'a TokenStream,
    pub lexicon: &'a Lexicon,
    pub resolver: &'a dyn ExternalResolver,
    pub registry: &'a Registry,
    pub config: &'a EngineConfig,
    pub scores: &'a ScoreTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoMatch {
    pub begin: usize,
    pub end: usize,
    pub geo: GeoRef,
}

/// Pessoa dona da organização ("ИП Пушкин").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerMatch {
    pub begin: usize,
    pub end: usize,
    pub owner: Referent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "match", rename_all = "snake_case")]
pub enum MatchCandidate {
    Type(TypeMatch),
    Name(NameMatch),
    Number(NumberMatch),
    Eponym(EponymMatch),
    Bracketed(BracketMatch),
    Global(GlobalMatch),
    Geo(GeoMatch),
    LegalId(LegalIdMatch),
    StdTail(StdTailMatch),
    Owner(OwnerMatch),
}

impl MatchCandidate {
    pub fn begin(&self) -> usize {
        match self {
            MatchCandidate::Type(m) => m.begin,
            MatchCandidate::Name(m) => m.begin,
            MatchCandidate::Number(m) => m.begin,
            MatchCandidate::Eponym(m) => m.begin,
            MatchCandidate::Bracketed(m) => m.begin,
            MatchCandidate::Global(m) => m.begin,
            MatchCandidate::Geo(m) => m.begin,
            MatchCandidate::LegalId(m) => m.begin,
            MatchCandidate::StdTail(m) => m.begin,
            MatchCandidate::Owner(m) => m.begin,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            MatchCandidate::Type(m) => m.end,
            MatchCandidate::Name(m) => m.end,
            MatchCandidate::Number(m) => m.end,
            MatchCandidate::Eponym(m) => m.end,
            MatchCandidate::Bracketed(m) => m.end,
            MatchCandidate::Global(m) => m.end,
            MatchCandidate::Geo(m) => m.end,
            MatchCandidate::LegalId(m) => m.end,
            MatchCandidate::StdTail(m) => m.end,
            MatchCandidate::Owner(m) => m.end,
        }
    }

    pub fn as_type(&self) -> Option<&TypeMatch> {
        match self {
            MatchCandidate::Type(t) => Some(t),
            _ => None,
        }
    }
}

/// Âncora geográfica em `pos`, opcionalmente precedida de "по"/"в"/"of"/"in".
pub fn try_geo(ctx: &MatchContext<'_>, pos: usize) -> Option<GeoMatch> {
    let first = ctx.tokens.get(pos)?;
    let at = if ["ПО", "В", "OF", "IN"].iter().any(|w| first.is_value(w)) {
        pos + 1
    } else {
        pos
    };
    let m = resolve_at(ctx.resolver, ReferentKind::Geo, ctx.tokens, at)?;
    let geo = m.referent.as_geo()?.clone();
    Some(GeoMatch {
        begin: pos,
        end: m.end,
        geo,
    })
}

pub fn try_owner(ctx: &MatchContext<'_>, pos: usize) -> Option<OwnerMatch> {
    let m = resolve_at(ctx.resolver, ReferentKind::Person, ctx.tokens, pos)?;
    Some(OwnerMatch {
        begin: pos,
        end: m.end,
        owner: m.referent,
    })
}

/// Token que pode iniciar uma organização.
///
/// Ordem: registro global, nome-padrão, tipo, nome entre aspas, sequência latina.
pub fn anchor_at(ctx: &MatchContext<'_>, pos: usize) -> Option<MatchCandidate> {
    let token = ctx.tokens.get(pos)?;
    if token.organization().is_some() || token.referent().is_some() {
        return None;
    }
    if let Some(g) = try_global(ctx.tokens, ctx.lexicon, pos) {
        return Some(MatchCandidate::Global(g));
    }
    if let Some(n) = try_std_name(ctx.tokens, ctx.lexicon, pos) {
        return Some(MatchCandidate::Name(n));
    }
    if let Some(t) = try_type(ctx.tokens, ctx.lexicon, pos) {
        return Some(MatchCandidate::Type(t));
    }
    if let Some(q) = try_quoted(ctx.tokens, pos) {
        return Some(MatchCandidate::Name(q));
    }
    try_proper(ctx.tokens, ctx.lexicon, ctx.resolver, pos)
        .filter(|n| n.kind == NameKind::Latin)
        .map(MatchCandidate::Name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::referent::{GazetteerResolver, NoResolver, PersonRef};
    use crate::tokenizer::tokenize_plain;

    fn with_ctx<R>(text: &str, resolver: &dyn ExternalResolver, f: impl FnOnce(&MatchContext<'_>) -> R) -> R {
        let tokens = tokenize_plain(text);
        let lexicon = Lexicon::builtin();
        let registry = Registry::new();
        let config = EngineConfig::default();
        let scores = ScoreTable::default();
        let ctx = MatchContext {
            tokens: &tokens,
            lexicon: &lexicon,
            resolver,
            registry: &registry,
            config: &config,
            scores: &scores,
        };
        f(&ctx)
    }

    #[test]
    fn test_anchor_kinds() {
        with_ctx("Газпром и банк «Восток» и Acme Bank", &NoResolver, |ctx| {
            assert!(matches!(anchor_at(ctx, 0), Some(MatchCandidate::Global(_))));
            assert!(matches!(anchor_at(ctx, 1), None));
            assert!(matches!(anchor_at(ctx, 2), Some(MatchCandidate::Type(_))));
            assert!(matches!(anchor_at(ctx, 3), Some(MatchCandidate::Name(_))));
            let latin = anchor_at(ctx, 7).unwrap();
            assert_eq!((latin.begin(), latin.end()), (7, 7));
        });
    }

    #[test]
    fn test_geo_with_preposition() {
        let mut geo = GazetteerResolver::new();
        geo.add_geo(&["Московской области"], GeoRef::region("Московская область", "Россия"));
        with_ctx("ГУВД по Московской области", &geo, |ctx| {
            let g = try_geo(ctx, 1).unwrap();
            assert_eq!((g.begin, g.end), (1, 3));
            assert!(try_geo(ctx, 0).is_none());
        });
    }

    #[test]
    fn test_owner_is_a_person() {
        let mut people = GazetteerResolver::new();
        people.add_person(&["Пушкин"], PersonRef::new("Пушкин"));
        with_ctx("ИП Пушкин", &people, |ctx| {
            let o = try_owner(ctx, 1).unwrap();
            assert_eq!((o.begin, o.end), (1, 1));
            assert_eq!(o.owner.as_person().map(|p| p.last_name.as_str()), Some("ПУШКИН"));
            assert!(try_owner(ctx, 0).is_none());
        });
    }
}
