//! # Montador de Candidatos
//!
//! A partir de uma âncora (tipo, nome global, nome-padrão, nome latino ou entre
//! aspas), o montador:
//!
//! 1. acumula até três tipos consecutivos, parando em tipos antagônicos,
//!    desacordo de caso/número ou plural;
//! 2. descarta tipos nus em contextos que não admitem nome ("о компании",
//!    "Компания сообщила");
//! 3. consome a cauda: geografia, ИНН/ОГРН, parênteses, epônimo, número, dono
//!    (só depois de "ИП") e nome;
//! 4. monta a entidade, procura o superior de subdivisões e pontua o candidato
//!    com a tabela declarativa de regras;
//! 5. se o candidato não passa do limiar do modo, recua por uma pilha explícita
//!    de prefixos (menos itens de cauda, depois menos tipos).
//!
//! Nada aqui altera o registro nem o fluxo de tokens: o resultado é um
//! [`Attachment`] completo ou `None`. A recursão (procura de superior que
//! começa logo depois) é limitada por `EngineConfig::max_depth`.

use std::cell::RefCell;

use serde::Serialize;
use tracing::debug;

use crate::bracket::{try_bracket, BracketContent};
use crate::candidate::{anchor_at, try_geo, try_owner, MatchCandidate, MatchContext};
use crate::department::{find_parent, ParentLink};
use crate::entity::{OrgId, OrganizationEntity, ParentHint};
use crate::eponym_token::try_eponym;
use crate::global_token::{entity_from_global, try_global};
use crate::kind::types_antagonistic;
use crate::lexicon::Lexicon;
use crate::morph::PartOfSpeech;
use crate::name_token::{try_name, try_std_tail, NameKind, NameMatch};
use crate::number_token::{try_legal_id, try_number};
use crate::scoring::{AttachMode, Score, ScoreRule};
use crate::type_token::{try_type, TypeMatch};

/// Tipos consecutivos aceitos num candidato.
const MAX_TYPES: usize = 3;
/// Itens de cauda aceitos num candidato.
const MAX_TAIL: usize = 8;
/// Avaliações por âncora durante o recuo.
const MAX_STEPS: usize = 32;

/// Candidato montado e pontuado.
#[derive(Debug, Clone, Serialize)]
pub struct Assembly {
    pub begin: usize,
    pub end: usize,
    pub items: Vec<MatchCandidate>,
    pub entity: OrganizationEntity,
    pub score: Score,
    pub mode: AttachMode,
    pub threshold: f64,
    pub parent: ParentLink,
    /// Apelido declarado em "(далее — X)".
    pub alias: Option<String>,
}

impl Assembly {
    pub fn accepted(&self) -> bool {
        self.score.accepts(self.threshold)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Attachment {
    Single(Assembly),
    /// Um tipo no plural com vários nomes: uma entidade por nome, mesmo span.
    Multiple(Vec<Assembly>),
}

impl Attachment {
    pub fn assemblies(&self) -> &[Assembly] {
        match self {
            Attachment::Single(a) => std::slice::from_ref(a),
            Attachment::Multiple(list) => list,
        }
    }

    pub fn into_assemblies(self) -> Vec<Assembly> {
        match self {
            Attachment::Single(a) => vec![a],
            Attachment::Multiple(list) => list,
        }
    }

    pub fn begin(&self) -> usize {
        self.assemblies().first().map_or(0, |a| a.begin)
    }

    pub fn end(&self) -> usize {
        self.assemblies().first().map_or(0, |a| a.end)
    }
}

/// Decisão registrada para cada âncora avaliada.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub begin: usize,
    pub end: usize,
    pub text: String,
    pub coef: f64,
    pub threshold: f64,
    pub mode: AttachMode,
    pub accepted: bool,
    pub rules: Vec<ScoreRule>,
}

pub struct Assembler<'a> {
    ctx: MatchContext<'a>,
    evaluations: RefCell<Vec<Evaluation>>,
}

impl<'a> Assembler<'a> {
    pub fn new(ctx: MatchContext<'a>) -> Self {
        Assembler {
            ctx,
            evaluations: RefCell::new(Vec::new()),
        }
    }

    pub fn context(&self) -> &MatchContext<'a> {
        &self.ctx
    }

    /// Avaliações acumuladas desde a última chamada.
    pub fn take_evaluations(&self) -> Vec<Evaluation> {
        self.evaluations.take()
    }

    /// Tenta reconhecer uma organização ancorada em `pos`.
    pub fn try_attach(&self, pos: usize, mode: AttachMode, depth: usize) -> Option<Attachment> {
        if depth > self.ctx.config.max_depth {
            debug!(pos, depth, "recursion depth exceeded");
            return None;
        }
        match anchor_at(&self.ctx, pos)? {
            MatchCandidate::Type(_) => self.attach_typed(pos, mode, depth),
            anchor @ MatchCandidate::Global(_) => self.search(vec![vec![anchor]], mode, depth),
            MatchCandidate::Name(name) => {
                let head = if matches!(name.kind, NameKind::Std { .. }) {
                    vec![MatchCandidate::Name(name)]
                } else {
                    self.name_first(name)?
                };
                self.search(vec![head], mode, depth)
            }
            _ => None,
        }
    }

    fn attach_typed(&self, pos: usize, mode: AttachMode, depth: usize) -> Option<Attachment> {
        let types = self.accumulate_types(pos);
        let first = types.first()?;
        let mode = if first.is_plural() {
            if !first.info.pluralizable || mode == AttachMode::HighConfidence {
                return None;
            }
            AttachMode::Multiple
        } else {
            mode
        };
        if self.bare_type_rejected(first, types.len()) {
            debug!(pos, label = %first.label, "bare type rejected by context");
            return None;
        }
        let heads = (1..=types.len())
            .rev()
            .map(|n| types[..n].iter().cloned().map(MatchCandidate::Type).collect())
            .collect();
        self.search(heads, mode, depth)
    }

    fn accumulate_types(&self, pos: usize) -> Vec<TypeMatch> {
        let tokens = self.ctx.tokens;
        let mut types: Vec<TypeMatch> = Vec::new();
        let mut at = pos;
        while types.len() < MAX_TYPES {
            let Some(t) = try_type(tokens, self.ctx.lexicon, at) else { break };
            if let Some(prev) = types.last() {
                let antagonistic = types.iter().any(|p| types_antagonistic(&p.label, &t.label));
                let agrees = prev.morph.case.agrees(t.morph.case) && prev.morph.number.agrees(t.morph.number);
                let crosses_line = tokens.get(at).map_or(true, |tok| tok.newline_before);
                if antagonistic
                    || !agrees
                    || crosses_line
                    || t.is_plural()
                    || t.is_department() != prev.is_department()
                {
                    break;
                }
            }
            at = t.end + 1;
            types.push(t);
        }
        types
    }

    /// Tipo ambíguo sozinho onde não pode vir um nome.
    fn bare_type_rejected(&self, first: &TypeMatch, n_types: usize) -> bool {
        if n_types > 1 || first.begin != first.end || !first.info.is_doubt_word {
            return false;
        }
        let tokens = self.ctx.tokens;
        let after_topic_preposition = first
            .begin
            .checked_sub(1)
            .and_then(|i| tokens.get(i))
            .map_or(false, |p| ["О", "ОБ", "ПРО", "ABOUT"].iter().any(|w| p.is_value(w)));
        if after_topic_preposition {
            return true;
        }
        first.sentence_start
            && tokens
                .get(first.end + 1)
                .map_or(true, |n| n.morph.pos == PartOfSpeech::Verb || n.is_sentence_end())
    }

    /// Nome antes do tipo: «Ромашка» ООО, Acme Bank, Acme Systems Ltd.
    fn name_first(&self, name: NameMatch) -> Option<Vec<MatchCandidate>> {
        let at = name.end + 1;
        if let Some(t) = try_type(self.ctx.tokens, self.ctx.lexicon, at) {
            let fits = match name.kind {
                NameKind::Latin => t.info.name_first,
                NameKind::Quoted => t.info.name_first || t.is_legal_form(),
                _ => false,
            };
            return (fits && !t.is_plural()).then(|| vec![MatchCandidate::Name(name), MatchCandidate::Type(t)]);
        }
        if name.kind == NameKind::Latin {
            let tail = try_std_tail(self.ctx.tokens, self.ctx.lexicon, at)?;
            return Some(vec![MatchCandidate::Name(name), MatchCandidate::StdTail(tail)]);
        }
        None
    }

    /// Avalia cabeças em ordem, cada uma com prefixos decrescentes de cauda.
    fn search(&self, heads: Vec<Vec<MatchCandidate>>, mode: AttachMode, depth: usize) -> Option<Attachment> {
        let mut tails: Vec<Option<Vec<MatchCandidate>>> = vec![None; heads.len()];
        let mut stack: Vec<(usize, usize)> = vec![(0, usize::MAX)];
        let mut rejected: Option<Assembly> = None;
        let mut steps = 0;

        while let Some((h, n_tail)) = stack.pop() {
            if steps == MAX_STEPS {
                break;
            }
            steps += 1;
            let head = &heads[h];
            let tail = tails[h].get_or_insert_with(|| self.consume_tail(head, mode));
            let n_tail = n_tail.min(tail.len());
            let items: Vec<MatchCandidate> = head.iter().chain(&tail[..n_tail]).cloned().collect();

            let assembly = self.evaluate(items, mode, depth);
            if assembly.accepted() {
                self.record(&assembly);
                return Some(self.finish(assembly));
            }
            if rejected.is_none() {
                rejected = Some(assembly);
            }
            if n_tail > 0 {
                stack.push((h, n_tail - 1));
            } else if h + 1 < heads.len() {
                stack.push((h + 1, usize::MAX));
            }
        }
        if let Some(assembly) = rejected {
            self.record(&assembly);
        }
        None
    }

    fn consume_tail(&self, head: &[MatchCandidate], mode: AttachMode) -> Vec<MatchCandidate> {
        let ctx = &self.ctx;
        let tokens = ctx.tokens;
        let Some(last) = head.last() else {
            return Vec::new();
        };
        let types: Vec<&TypeMatch> = head.iter().filter_map(MatchCandidate::as_type).collect();
        let typed = !types.is_empty();
        let is_dept = types.iter().any(|t| t.is_department());
        let bare_numbers = types.iter().any(|t| t.info.can_has_number);
        let person_owned = types.iter().any(|t| t.info.person_owned);

        let mut has_name = head
            .iter()
            .any(|c| matches!(c, MatchCandidate::Name(_) | MatchCandidate::Global(_)));
        let mut latin_open = matches!(last, MatchCandidate::Name(n) if n.kind == NameKind::Latin);
        let (mut has_geo, mut has_legal, mut has_bracket, mut has_eponym, mut has_number) =
            (false, false, false, false, false);

        let mut tail = Vec::new();
        let mut at = last.end() + 1;
        while tail.len() < MAX_TAIL {
            let Some(token) = tokens.get(at) else { break };
            if token.newline_before || token.is_sentence_end() {
                break;
            }

            let mut item = None;
            if !has_geo {
                item = try_geo(ctx, at).map(MatchCandidate::Geo);
            }
            if item.is_none() && !has_legal {
                let from = if token.is_comma() { at + 1 } else { at };
                item = try_legal_id(tokens, ctx.lexicon, from).map(|mut m| {
                    m.begin = at;
                    MatchCandidate::LegalId(m)
                });
            }
            if item.is_none() && !has_bracket {
                item = try_bracket(tokens, ctx.lexicon, at)
                    .filter(|b| match b.content {
                        BracketContent::Alias(_) => ctx.config.aliases,
                        BracketContent::Acronym(_) => true,
                        BracketContent::Organization(_) => is_dept,
                    })
                    .map(MatchCandidate::Bracketed);
            }
            if item.is_none() && typed && !has_eponym {
                item = try_eponym(tokens, ctx.lexicon, ctx.resolver, at).map(MatchCandidate::Eponym);
            }
            if item.is_none() && typed && !has_number {
                item = try_number(tokens, ctx.lexicon, at, bare_numbers).map(MatchCandidate::Number);
            }
            if item.is_none() && latin_open {
                item = try_std_tail(tokens, ctx.lexicon, at).map(MatchCandidate::StdTail);
            }
            if item.is_none() && person_owned && !has_name {
                item = try_owner(ctx, at).map(MatchCandidate::Owner);
            }
            if item.is_none() && typed && !has_name {
                item = try_global(tokens, ctx.lexicon, at).map(MatchCandidate::Global).or_else(|| {
                    try_name(tokens, ctx.lexicon, ctx.resolver, at, mode == AttachMode::Multiple)
                        .filter(|n| n.kind == NameKind::Quoted || !(has_geo || has_number || has_eponym))
                        .map(MatchCandidate::Name)
                });
            }
            let Some(item) = item else { break };

            match &item {
                MatchCandidate::Geo(_) => has_geo = true,
                MatchCandidate::LegalId(_) => has_legal = true,
                MatchCandidate::Bracketed(_) => has_bracket = true,
                MatchCandidate::Eponym(_) => has_eponym = true,
                MatchCandidate::Number(_) => has_number = true,
                MatchCandidate::StdTail(_) => latin_open = false,
                MatchCandidate::Name(n) => {
                    has_name = true;
                    latin_open = n.kind == NameKind::Latin;
                }
                MatchCandidate::Global(_) | MatchCandidate::Owner(_) => has_name = true,
                MatchCandidate::Type(_) => {}
            }
            at = item.end() + 1;
            let closes = matches!(&item, MatchCandidate::Bracketed(b) if matches!(b.content, BracketContent::Alias(_)));
            tail.push(item);
            // "(далее — X)" encerra a menção
            if closes {
                break;
            }
        }
        tail
    }

    fn evaluate(&self, items: Vec<MatchCandidate>, mode: AttachMode, depth: usize) -> Assembly {
        let begin = items.first().map_or(0, MatchCandidate::begin);
        let end = items.last().map_or(begin, MatchCandidate::end);
        let (mut entity, alias, bracket_org) = build_entity(self.ctx.lexicon, &items);

        let types: Vec<&TypeMatch> = items.iter().filter_map(MatchCandidate::as_type).collect();
        let parent = if types.iter().any(|t| t.is_department()) {
            find_parent(self, &entity, &types, bracket_org, begin, end, depth)
        } else {
            ParentLink::None
        };
        match &parent {
            ParentLink::Known(id) => entity.set_temp_parent(ParentHint::Known(*id)),
            ParentLink::Global(key) => entity.set_temp_parent(ParentHint::Global(key.clone())),
            ParentLink::Sibling(_) | ParentLink::None => {}
        }
        let score = self.score(&items, &types, &parent, begin, end);

        Assembly {
            begin,
            end,
            items,
            entity,
            score,
            mode,
            threshold: self.ctx.config.thresholds.get(mode),
            parent,
            alias,
        }
    }

    fn score(
        &self,
        items: &[MatchCandidate],
        types: &[&TypeMatch],
        parent: &ParentLink,
        begin: usize,
        end: usize,
    ) -> Score {
        let table = self.ctx.scores;
        let tokens = self.ctx.tokens;
        let mut score = Score::new();
        let mut strong = false;
        let mut has_geo = false;

        for item in items {
            match item {
                MatchCandidate::Type(_) => {}
                MatchCandidate::Name(n) => {
                    match n.kind {
                        NameKind::Quoted => {
                            score.fire(table, ScoreRule::QuotedName);
                            strong = true;
                        }
                        NameKind::Std { .. } => {
                            score.fire(table, ScoreRule::StdNameHit);
                            strong = true;
                        }
                        NameKind::NounPhrase => score.fire(table, ScoreRule::NounPhraseName),
                        NameKind::Proper => score.fire(table, ScoreRule::ProperName),
                        NameKind::Latin => score.fire(table, ScoreRule::LatinName),
                    }
                    if n.sentence_start && matches!(n.kind, NameKind::Proper | NameKind::Latin) {
                        score.fire(table, ScoreRule::SentenceStartName);
                    }
                }
                MatchCandidate::Number(_) => {
                    score.fire(table, ScoreRule::NumberIdentifier);
                    strong = true;
                }
                MatchCandidate::Eponym(_) => score.fire(table, ScoreRule::Eponym),
                MatchCandidate::Bracketed(b) => {
                    if matches!(b.content, BracketContent::Alias(_)) {
                        score.fire(table, ScoreRule::AliasClause);
                    }
                }
                MatchCandidate::Global(_) => {
                    score.fire(table, ScoreRule::GlobalRegistryHit);
                    strong = true;
                }
                MatchCandidate::Geo(_) => {
                    score.fire(table, ScoreRule::GeoCooccurrence);
                    has_geo = true;
                }
                MatchCandidate::LegalId(_) => {
                    score.fire(table, ScoreRule::LegalIdentifier);
                    strong = true;
                }
                MatchCandidate::StdTail(_) => {
                    score.fire(table, ScoreRule::StdTail);
                    strong = true;
                }
                MatchCandidate::Owner(_) => {
                    score.fire(table, ScoreRule::PersonOwner);
                    strong = true;
                }
            }
        }

        if let Some(first) = types.first() {
            let coeff = types.iter().map(|t| t.info.coeff).fold(0.0, f64::max);
            score.fire_scaled(table, ScoreRule::TypeCoefficient, coeff);
            if first.chars.is_capitalized() && !first.sentence_start {
                score.fire(table, ScoreRule::CapitalizedType);
            }
            if types.iter().any(|t| t.via_acronym) {
                score.fire(table, ScoreRule::AcronymType);
            }
            if types.len() == 1 && first.chars.all_lower && first.info.is_doubt_word && !strong {
                score.fire(table, ScoreRule::LowercaseDoubtType);
            }
            if items.len() == types.len() {
                score.fire(table, ScoreRule::BareType);
            }
            if types.iter().any(|t| t.requires_geo()) && !has_geo {
                score.fire(table, ScoreRule::MissingRequiredGeo);
            }
            if types.iter().any(|t| t.is_department()) {
                let rule = if parent.is_some() {
                    ScoreRule::DepartmentWithParent
                } else {
                    ScoreRule::DepartmentWithoutParent
                };
                score.fire(table, rule);
            }
        }

        let before = begin.checked_sub(1).and_then(|i| tokens.get(i));
        let after = tokens.get(end + 1);
        if before.into_iter().chain(after).any(|t| t.organization().is_some()) {
            score.fire(table, ScoreRule::AdjacentOrganization);
        }
        score
    }

    /// No modo `Multiple`, divide o sintagma "юстиции и финансов" em uma entidade por nome.
    fn finish(&self, assembly: Assembly) -> Attachment {
        if assembly.mode != AttachMode::Multiple {
            return Attachment::Single(assembly);
        }
        let position = assembly
            .items
            .iter()
            .position(|c| matches!(c, MatchCandidate::Name(n) if n.kind == NameKind::NounPhrase));
        let Some(idx) = position else {
            return Attachment::Single(assembly);
        };
        let segments = match assembly.items.get(idx) {
            Some(MatchCandidate::Name(name)) => self.split_on_and(name),
            _ => Vec::new(),
        };
        if segments.len() < 2 {
            return Attachment::Single(assembly);
        }
        let list = segments
            .into_iter()
            .map(|segment| {
                let mut items = assembly.items.clone();
                items[idx] = MatchCandidate::Name(segment);
                let (entity, alias, _) = build_entity(self.ctx.lexicon, &items);
                Assembly {
                    items,
                    entity,
                    alias,
                    ..assembly.clone()
                }
            })
            .collect();
        Attachment::Multiple(list)
    }

    fn split_on_and(&self, name: &NameMatch) -> Vec<NameMatch> {
        let tokens = self.ctx.tokens;
        let segment = |b: usize, e: usize| NameMatch {
            begin: b,
            end: e,
            value: tokens.span_text(b, e).to_string(),
            ..name.clone()
        };
        let mut segments = Vec::new();
        let mut start = name.begin;
        for i in name.begin..=name.end {
            if tokens.get(i).map_or(false, |t| t.is_and()) {
                if i > start {
                    segments.push(segment(start, i - 1));
                }
                start = i + 1;
            }
        }
        if start <= name.end {
            segments.push(segment(start, name.end));
        }
        segments
    }

    fn record(&self, assembly: &Assembly) {
        let accepted = assembly.accepted();
        debug!(
            begin = assembly.begin,
            end = assembly.end,
            coef = assembly.score.coef,
            threshold = assembly.threshold,
            mode = ?assembly.mode,
            accepted,
            "candidate scored"
        );
        self.evaluations.borrow_mut().push(Evaluation {
            begin: assembly.begin,
            end: assembly.end,
            text: self.ctx.tokens.span_text(assembly.begin, assembly.end).to_string(),
            coef: assembly.score.coef,
            threshold: assembly.threshold,
            mode: assembly.mode,
            accepted,
            rules: assembly.score.fired.clone(),
        });
    }
}

/// Entidade a partir dos itens; devolve também o apelido e a organização entre parênteses.
fn build_entity(lexicon: &Lexicon, items: &[MatchCandidate]) -> (OrganizationEntity, Option<String>, Option<OrgId>) {
    let mut entity = OrganizationEntity::new();
    let mut alias = None;
    let mut bracket_org = None;
    for item in items {
        match item {
            MatchCandidate::Type(t) => {
                entity.add_type(&t.label);
                for p in &t.info.profiles {
                    entity.add_profile(*p);
                }
                for m in &t.markers {
                    entity.add_marker(m);
                }
            }
            MatchCandidate::Name(n) => {
                entity.add_name(&n.value, n.is_abbr);
                if let NameKind::Std { profile, type_hint } = &n.kind {
                    entity.add_profile(*profile);
                    if let Some(hint) = type_hint {
                        entity.add_type(hint);
                    }
                }
            }
            MatchCandidate::Number(n) => entity.set_number(&n.value),
            MatchCandidate::Eponym(e) => {
                for name in &e.eponyms {
                    entity.add_eponym(name);
                }
            }
            MatchCandidate::Bracketed(b) => match &b.content {
                BracketContent::Alias(a) => alias = Some(a.clone()),
                BracketContent::Acronym(a) => entity.add_name(a, true),
                BracketContent::Organization(id) => bracket_org = Some(*id),
            },
            MatchCandidate::Global(g) => {
                if let Some(global) = lexicon.global_at(g.index) {
                    entity.merge_from(&entity_from_global(global));
                }
            }
            MatchCandidate::Geo(g) => entity.add_geo(g.geo.clone()),
            MatchCandidate::LegalId(l) => entity.set_legal_id(l.kind, &l.value),
            MatchCandidate::StdTail(t) => entity.add_type(&t.type_label),
            MatchCandidate::Owner(o) => {
                if let Some(person) = o.owner.as_person() {
                    entity.add_name(&person.last_name, false);
                }
                entity.set_owner(o.owner.clone());
            }
        }
    }
    (entity, alias, bracket_org)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::kind::OrgProfile;
    use crate::morph::{Case, DictionaryMorphology, Morph, Number};
    use crate::referent::{ExternalResolver, GazetteerResolver, GeoRef, NoResolver, PersonRef, Referent};
    use crate::registry::Registry;
    use crate::scoring::ScoreTable;
    use crate::token::TokenStream;
    use crate::tokenizer::tokenize_plain;

    fn geo_resolver() -> GazetteerResolver {
        let mut geo = GazetteerResolver::new();
        geo.add_geo(&["Российской Федерации", "России"], GeoRef::state("Россия"));
        geo.add_geo(&["Московской области"], GeoRef::region("Московская область", "Россия"));
        geo
    }

    fn attach(
        tokens: &TokenStream,
        resolver: &dyn ExternalResolver,
        config: &EngineConfig,
        pos: usize,
        mode: AttachMode,
    ) -> (Option<Attachment>, Vec<Evaluation>) {
        let lexicon = Lexicon::builtin();
        let registry = Registry::new();
        let scores = ScoreTable::with_overrides(&config.weights);
        let assembler = Assembler::new(MatchContext {
            tokens,
            lexicon: &lexicon,
            resolver,
            registry: &registry,
            config,
            scores: &scores,
        });
        let result = assembler.try_attach(pos, mode, 0);
        (result, assembler.take_evaluations())
    }

    fn single(result: Option<Attachment>) -> Assembly {
        match result {
            Some(Attachment::Single(a)) => a,
            other => panic!("expected a single attachment, got {other:?}"),
        }
    }

    #[test]
    fn test_ministry_with_geo() {
        let s = tokenize_plain("Министерство юстиции Российской Федерации утвердило правила");
        let (result, evals) = attach(&s, &geo_resolver(), &EngineConfig::default(), 0, AttachMode::HighConfidence);
        let a = single(result);
        assert_eq!((a.begin, a.end), (0, 3));
        assert!((a.score.coef - 4.5).abs() < 1e-9);
        assert!(a.entity.has_type("министерство"));
        assert!(a.entity.has_name("юстиции"));
        assert!(a.entity.profiles().contains(&OrgProfile::State));
        assert_eq!(a.entity.geos()[0].name, "РОССИЯ");
        assert_eq!(evals.len(), 1);
        assert!(evals[0].accepted);
    }

    #[test]
    fn test_threshold_is_strict() {
        let s = tokenize_plain("Министерство юстиции Российской Федерации");
        let mut config = EngineConfig::default();
        config.thresholds.high_confidence = 4.5;
        let (result, evals) = attach(&s, &geo_resolver(), &config, 0, AttachMode::HighConfidence);
        assert!(result.is_none());
        assert!(evals.iter().all(|e| !e.accepted));

        config.thresholds.high_confidence = 3.5;
        let (result, _) = attach(&s, &geo_resolver(), &config, 0, AttachMode::HighConfidence);
        assert!(result.is_some());
    }

    #[test]
    fn test_backtracking_drops_tail() {
        let s = tokenize_plain("Министерство юстиции Российской Федерации");
        let mut config = EngineConfig::default();
        config.weights.insert(ScoreRule::GeoCooccurrence, -5.0);
        let a = single(attach(&s, &geo_resolver(), &config, 0, AttachMode::Normal).0);
        assert_eq!(a.end, 1);
        assert!(a.entity.geos().is_empty());
    }

    #[test]
    fn test_acronym_department_with_implied_parent() {
        let s = tokenize_plain("ГУВД Московской области сообщило");
        let a = single(attach(&s, &geo_resolver(), &EngineConfig::default(), 0, AttachMode::HighConfidence).0);
        assert!((a.score.coef - 5.5).abs() < 1e-9);
        assert!(matches!(&a.parent, ParentLink::Global(k) if k == "МВД"));
        assert_eq!(a.entity.temp_parent(), Some(&ParentHint::Global("МВД".into())));
        assert!(a.entity.has_type("главное управление внутренних дел"));
    }

    #[test]
    fn test_legal_form_with_quoted_name() {
        let s = tokenize_plain("В ООО «Ромашка», ИНН 7707083893, работают");
        let a = single(attach(&s, &NoResolver, &EngineConfig::default(), 1, AttachMode::HighConfidence).0);
        assert!(a.entity.has_name("Ромашка"));
        assert_eq!(a.entity.inn(), Some("7707083893"));
        assert!(a.score.has(ScoreRule::LegalIdentifier));
        assert!((a.score.coef - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_department_with_following_sibling() {
        let s = tokenize_plain("отдел кадров Министерства юстиции");
        let a = single(attach(&s, &NoResolver, &EngineConfig::default(), 0, AttachMode::Normal).0);
        assert_eq!(a.end, 1);
        let ParentLink::Sibling(parent) = &a.parent else {
            panic!("expected sibling parent, got {:?}", a.parent);
        };
        assert_eq!((parent.begin, parent.end), (2, 3));
        assert!(parent.entity.has_type("министерство"));
        assert_eq!(parent.mode, AttachMode::NormalAfterDepartment);
    }

    #[test]
    fn test_depth_limit() {
        let s = tokenize_plain("Министерство юстиции");
        let lexicon = Lexicon::builtin();
        let registry = Registry::new();
        let config = EngineConfig::default();
        let scores = ScoreTable::default();
        let assembler = Assembler::new(MatchContext {
            tokens: &s,
            lexicon: &lexicon,
            resolver: &NoResolver,
            registry: &registry,
            config: &config,
            scores: &scores,
        });
        assert!(assembler.try_attach(0, AttachMode::Normal, config.max_depth + 1).is_none());
        assert!(assembler.try_attach(0, AttachMode::Normal, config.max_depth).is_some());
    }

    #[test]
    fn test_bare_type_guards() {
        let mut dict = DictionaryMorphology::with_function_words();
        dict.insert(
            "компании",
            Morph::noun(&[Case::Genitive, Case::Prepositional], Number::Singular).with_lemma("компания"),
        );
        dict.insert("сообщила", Morph::new(PartOfSpeech::Verb));
        let s = crate::tokenizer::tokenize("узнали о компании вчера", &dict);
        assert!(attach(&s, &NoResolver, &EngineConfig::default(), 2, AttachMode::ExternalOntology).0.is_none());
        let s = crate::tokenizer::tokenize("акции компании «Восток»", &dict);
        assert!(attach(&s, &NoResolver, &EngineConfig::default(), 1, AttachMode::ExternalOntology).0.is_some());

        let s = crate::tokenizer::tokenize("Компания сообщила", &dict);
        assert!(attach(&s, &NoResolver, &EngineConfig::default(), 0, AttachMode::ExternalOntology).0.is_none());
    }

    #[test]
    fn test_plural_type_yields_multiple() {
        let mut dict = DictionaryMorphology::with_function_words();
        dict.insert(
            "министерства",
            Morph::noun(&[Case::Nominative], Number::Plural).with_lemma("министерство"),
        );
        dict.insert("юстиции", Morph::noun(&[Case::Genitive], Number::Singular));
        dict.insert("финансов", Morph::noun(&[Case::Genitive], Number::Plural));
        let s = crate::tokenizer::tokenize("Министерства юстиции и финансов", &dict);

        assert!(attach(&s, &NoResolver, &EngineConfig::default(), 0, AttachMode::HighConfidence).0.is_none());

        let Some(Attachment::Multiple(list)) = attach(&s, &NoResolver, &EngineConfig::default(), 0, AttachMode::Normal).0
        else {
            panic!("expected multiple attachment");
        };
        assert_eq!(list.len(), 2);
        assert!(list[0].entity.has_name("юстиции"));
        assert!(list[1].entity.has_name("финансов"));
        assert!(list.iter().all(|a| a.entity.has_type("министерство") && a.end == 3));
    }

    #[test]
    fn test_latin_name_first() {
        let s = tokenize_plain("shares of Acme Systems Ltd rose");
        let a = single(attach(&s, &NoResolver, &EngineConfig::default(), 2, AttachMode::Normal).0);
        assert!(a.entity.has_name("Acme Systems"));
        assert!(a.entity.has_type("company"));
        assert!((a.score.coef - 3.0).abs() < 1e-9);

        let s = tokenize_plain("deposit at Acme Bank today");
        let a = single(attach(&s, &NoResolver, &EngineConfig::default(), 2, AttachMode::Normal).0);
        assert_eq!((a.begin, a.end), (2, 3));
        assert!(a.entity.has_type("bank"));
    }

    #[test]
    fn test_global_with_geo() {
        let s = tokenize_plain("Газпром России увеличил добычу");
        let a = single(attach(&s, &geo_resolver(), &EngineConfig::default(), 0, AttachMode::HighConfidence).0);
        assert!((a.score.coef - 5.0).abs() < 1e-9);
        assert!(a.entity.has_name("Газпром"));
        assert_eq!(a.entity.geos().len(), 1);
    }

    #[test]
    fn test_alias_clause_scores() {
        let dict = DictionaryMorphology::with_function_words();
        let s = crate::tokenizer::tokenize("Комитет по делам молодежи (далее — Комитет) утвердил", &dict);
        let a = single(attach(&s, &NoResolver, &EngineConfig::default(), 0, AttachMode::HighConfidence).0);
        assert_eq!(a.alias.as_deref(), Some("Комитет"));
        assert!((a.score.coef - 3.5).abs() < 1e-9);
        assert_eq!(a.end, 8);
    }

    #[test]
    fn test_alias_clause_closes_the_mention() {
        let s = tokenize_plain("Было решено, что комитет (далее — Комитет) утвердит программу.");
        let a = single(attach(&s, &NoResolver, &EngineConfig::default(), 4, AttachMode::Normal).0);
        assert_eq!((a.begin, a.end), (4, 9));
        assert_eq!(a.alias.as_deref(), Some("Комитет"));
        assert!(!a.entity.has_names());
        assert!((a.score.coef - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_sole_proprietor_takes_person_owner() {
        let mut people = GazetteerResolver::new();
        people.add_person(&["Пушкин", "Пушкина"], PersonRef::new("Пушкин"));
        let s = tokenize_plain("Услуги оказывает ИП Пушкин.");
        let (result, _) = attach(&s, &people, &EngineConfig::default(), 2, AttachMode::HighConfidence);
        let a = single(result);
        assert_eq!((a.begin, a.end), (2, 3));
        assert!(a.score.has(ScoreRule::PersonOwner));
        assert!(a.entity.has_type("индивидуальный предприниматель"));
        assert!(a.entity.profiles().contains(&OrgProfile::Business));
        let owner = a.entity.owner().and_then(Referent::as_person).expect("person owner");
        assert_eq!(owner.last_name, "ПУШКИН");
        assert!(a.entity.has_name("Пушкин"));

        // Sem a pessoa no resolvedor, o sobrenome vira nome comum e não há dono
        let (result, _) = attach(&s, &NoResolver, &EngineConfig::default(), 2, AttachMode::Normal);
        let a = single(result);
        assert!(a.entity.owner().is_none());
        assert!(!a.score.has(ScoreRule::PersonOwner));
    }
}
