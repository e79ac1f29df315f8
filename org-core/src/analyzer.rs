//! # Analisador de Organizações — Orquestrador com Eventos Observáveis
//!
//! O analisador percorre o fluxo de tokens em duas passagens:
//!
//! 1. **Alta confiança** (`HighConfidence`): só aceita candidatos fortes, que
//!    passam a servir de âncora (adjacência, superiores, apelidos);
//! 2. **Normal**: aceita o restante. Logo após uma subdivisão já reconhecida o
//!    modo vira `NormalAfterDepartment`.
//!
//! Em cada posição tenta primeiro um apelido do documento, depois o
//! [`Assembler`]. Um candidato aceito é registrado (fundindo com equivalentes),
//! ganha uma menção e é embutido no fluxo como token atômico. Ao fim de cada
//! passagem roda a [`hierarchy`](crate::hierarchy).
//!
//! Cada passo é emitido como [`AnalyzerEvent`] por um canal `mpsc`, como no
//! pipeline de streaming: `process` apenas drena o canal até `Done`.

use std::sync::mpsc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::alias::{AliasEntry, AliasTable};
use crate::assembler::{Assembler, Assembly, Attachment, Evaluation};
use crate::candidate::MatchContext;
use crate::config::EngineConfig;
use crate::department::ParentLink;
use crate::entity::{OrgId, OrganizationEntity, ParentHint};
use crate::equivalence::NameThresholds;
use crate::error::Result;
use crate::hierarchy;
use crate::kind::OrgKind;
use crate::lexicon::Lexicon;
use crate::morph::MorphAnalyzer;
use crate::ownership::is_department_like;
use crate::referent::ExternalResolver;
use crate::registry::{Mention, Registry};
use crate::scoring::{AttachMode, ScoreTable};
use crate::token::{TokenKind, TokenStream};
use crate::tokenizer::tokenize;

/// Eventos emitidos durante a análise.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum AnalyzerEvent {
    PassStarted { pass: u8, mode: AttachMode },
    /// Decisão sobre um candidato, com as regras disparadas.
    CandidateScored(Evaluation),
    EntityRegistered { id: OrgId, merged: bool },
    AliasRegistered { alias: String, id: OrgId },
    HigherAssigned { lower: OrgId, higher: OrgId },
    /// **Conclusão**: entidades, menções e apelidos do documento.
    Done { result: AnalysisResult, processing_ms: u64 },
}

/// Entidade final com o rótulo de exibição e o tipo derivado.
#[derive(Debug, Clone, Serialize)]
pub struct EntityRecord {
    pub id: OrgId,
    pub display: String,
    pub kind: OrgKind,
    pub higher: Option<OrgId>,
    pub entity: OrganizationEntity,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResult {
    pub entities: Vec<EntityRecord>,
    pub mentions: Vec<Mention>,
    pub aliases: Vec<AliasEntry>,
}

impl AnalysisResult {
    fn collect(registry: &Registry, aliases: &AliasTable) -> Self {
        let entities = registry
            .entities()
            .map(|(id, e)| EntityRecord {
                id,
                display: e.display_string(false),
                kind: e.kind(),
                higher: e.higher(),
                entity: e.clone(),
            })
            .collect();
        AnalysisResult {
            entities,
            mentions: registry.mentions().to_vec(),
            aliases: aliases.entries().to_vec(),
        }
    }

    pub fn entity(&self, id: OrgId) -> Option<&EntityRecord> {
        self.entities.iter().find(|r| r.id == id)
    }

    /// Primeira entidade que tem `name` entre os nomes.
    pub fn find_by_name(&self, name: &str) -> Option<&EntityRecord> {
        self.entities.iter().find(|r| r.entity.has_name(name))
    }

    pub fn mentions_of(&self, id: OrgId) -> impl Iterator<Item = &Mention> {
        self.mentions.iter().filter(move |m| m.org == id)
    }
}

/// O analisador: léxico, configuração e tabela de pesos já resolvida.
pub struct OrganizationAnalyzer {
    lexicon: Lexicon,
    config: EngineConfig,
    scores: ScoreTable,
}

impl OrganizationAnalyzer {
    pub fn new(lexicon: Lexicon, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let scores = ScoreTable::with_overrides(&config.weights);
        Ok(OrganizationAnalyzer { lexicon, config, scores })
    }

    /// Léxico embutido e configuração padrão.
    pub fn with_defaults() -> Self {
        OrganizationAnalyzer {
            lexicon: Lexicon::builtin(),
            config: EngineConfig::default(),
            scores: ScoreTable::default(),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tokeniza `text` com `morph` e analisa.
    pub fn analyze_text(&self, text: &str, morph: &dyn MorphAnalyzer, resolver: &dyn ExternalResolver) -> AnalysisResult {
        let mut stream = tokenize(text, morph);
        self.process(&mut stream, resolver)
    }

    /// Analisa de forma síncrona; o fluxo sai com as organizações embutidas.
    pub fn process(&self, stream: &mut TokenStream, resolver: &dyn ExternalResolver) -> AnalysisResult {
        let (tx, rx) = mpsc::channel();
        self.process_streaming(stream, resolver, tx);
        let mut result = AnalysisResult::default();

        // Consome todos os eventos até o fim
        while let Ok(event) = rx.recv() {
            if let AnalyzerEvent::Done { result: done, .. } = event {
                result = done;
            }
        }
        result
    }

    /// Executa a análise enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `PassStarted` para a passagem 1;
    /// 2. `CandidateScored`, `EntityRegistered`, `AliasRegistered` e
    ///    `HigherAssigned` conforme os candidatos são decididos;
    /// 3. o mesmo para a passagem 2;
    /// 4. `Done` com o resultado consolidado.
    pub fn process_streaming(
        &self,
        stream: &mut TokenStream,
        resolver: &dyn ExternalResolver,
        tx: mpsc::Sender<AnalyzerEvent>,
    ) {
        let start = Instant::now();
        let mut registry = Registry::with_thresholds(NameThresholds::from(&self.config));
        let mut aliases = AliasTable::new();

        for (pass, mode) in [(1u8, AttachMode::HighConfidence), (2, AttachMode::Normal)] {
            let _ = tx.send(AnalyzerEvent::PassStarted { pass, mode });
            let mut state = PassState {
                registry: &mut registry,
                aliases: &mut aliases,
                pass,
                tx: &tx,
            };
            let found = self.run_pass(stream, resolver, mode, &mut state);

            for (lower, higher) in hierarchy::resolve(&mut registry, &self.lexicon, &self.config) {
                let _ = tx.send(AnalyzerEvent::HigherAssigned { lower, higher });
            }
            info!(pass, found, entities = registry.len(), "pass finished");
        }

        let result = AnalysisResult::collect(&registry, &aliases);
        let _ = tx.send(AnalyzerEvent::Done {
            result,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }

    /// Reconhecimento pedido por uma ontologia externa, ancorado em `pos`.
    ///
    /// Usa o modo `ExternalOntology` sobre um registro vazio e não altera o fluxo.
    pub fn process_ontology_item(
        &self,
        stream: &TokenStream,
        resolver: &dyn ExternalResolver,
        pos: usize,
    ) -> Option<OrganizationEntity> {
        let registry = Registry::with_thresholds(NameThresholds::from(&self.config));
        let assembler = Assembler::new(self.context(stream, resolver, &registry));
        let attachment = assembler.try_attach(pos, AttachMode::ExternalOntology, 0)?;
        let mut entity = attachment.into_assemblies().into_iter().next()?.entity;
        entity.mark_external_ontology();
        Some(entity)
    }

    fn context<'a>(
        &'a self,
        tokens: &'a TokenStream,
        resolver: &'a dyn ExternalResolver,
        registry: &'a Registry,
    ) -> MatchContext<'a> {
        MatchContext {
            tokens,
            lexicon: &self.lexicon,
            resolver,
            registry,
            config: &self.config,
            scores: &self.scores,
        }
    }

    fn run_pass(
        &self,
        stream: &mut TokenStream,
        resolver: &dyn ExternalResolver,
        mode: AttachMode,
        state: &mut PassState<'_>,
    ) -> usize {
        let mut found = 0;
        let mut pos = 0;
        while pos < stream.len() {
            if let Some((id, end)) = state.aliases.lookup(stream, pos) {
                debug!(pos, %id, "alias mention");
                state.mention(stream, id, pos, end);
                stream.embed(pos, end, TokenKind::Organization(id));
                found += 1;
                pos += 1;
                continue;
            }

            let after_department = mode == AttachMode::Normal
                && stream
                    .prev(pos)
                    .and_then(|t| t.organization())
                    .and_then(|id| state.registry.get(id))
                    .map_or(false, is_department_like);
            let mode_here = if after_department {
                AttachMode::NormalAfterDepartment
            } else {
                mode
            };

            let attachment = {
                let assembler = Assembler::new(self.context(stream, resolver, state.registry));
                let attachment = assembler.try_attach(pos, mode_here, 0);
                for evaluation in assembler.take_evaluations() {
                    let _ = state.tx.send(AnalyzerEvent::CandidateScored(evaluation));
                }
                attachment
            };
            if let Some(attachment) = attachment {
                self.commit(stream, state, attachment);
                found += 1;
            }
            pos += 1;
        }
        found
    }

    /// Registra as entidades do casamento e embute o trecho no fluxo.
    ///
    /// Num casamento `Multiple` todas as entidades dividem o mesmo trecho:
    /// cada uma ganha sua menção, mas o token composto leva só o id da
    /// primeira.
    fn commit(&self, stream: &mut TokenStream, state: &mut PassState<'_>, attachment: Attachment) {
        let mut spans: Vec<(usize, usize, OrgId)> = Vec::new();
        for assembly in attachment.into_assemblies() {
            self.register(stream, state, assembly, &mut spans);
        }
        // Do fim para o começo, para que os índices continuem válidos
        spans.sort_by(|a, b| b.0.cmp(&a.0));
        spans.dedup_by_key(|s| s.0);
        for (begin, end, id) in spans {
            stream.embed(begin, end, TokenKind::Organization(id));
        }
    }

    /// Registra o superior irmão antes, depois a própria entidade.
    fn register(
        &self,
        stream: &TokenStream,
        state: &mut PassState<'_>,
        assembly: Assembly,
        spans: &mut Vec<(usize, usize, OrgId)>,
    ) -> OrgId {
        let Assembly {
            begin,
            end,
            mut entity,
            parent,
            alias,
            ..
        } = assembly;
        if let ParentLink::Sibling(sibling) = parent {
            let higher = self.register(stream, state, *sibling, spans);
            entity.set_temp_parent(ParentHint::Known(higher));
        }

        let (id, merged) = state.registry.register(entity);
        let _ = state.tx.send(AnalyzerEvent::EntityRegistered { id, merged });

        let pending = state.registry.get(id).and_then(|e| e.temp_parent().cloned());
        if let Some(ParentHint::Known(higher)) = pending {
            state.registry.update(id, |e| {
                e.take_temp_parent();
            });
            let free = state.registry.get(id).map_or(false, |e| e.higher().is_none());
            if free && state.registry.set_higher(id, higher) {
                let _ = state.tx.send(AnalyzerEvent::HigherAssigned { lower: id, higher });
            }
        }

        state.mention(stream, id, begin, end);
        if let Some(alias) = alias.filter(|_| self.config.aliases) {
            if state.aliases.register(&alias, id) {
                let _ = state.tx.send(AnalyzerEvent::AliasRegistered { alias, id });
            }
        }
        spans.push((begin, end, id));
        id
    }
}

/// Estado mutável de uma passagem.
struct PassState<'a> {
    registry: &'a mut Registry,
    aliases: &'a mut AliasTable,
    pass: u8,
    tx: &'a mpsc::Sender<AnalyzerEvent>,
}

impl PassState<'_> {
    fn mention(&mut self, stream: &TokenStream, org: OrgId, begin: usize, end: usize) {
        let (Some(first), Some(last)) = (stream.get(begin), stream.get(end)) else {
            return;
        };
        self.registry.add_mention(Mention {
            org,
            start: first.start,
            end: last.end,
            text: stream.span_text(begin, end).to_string(),
            pass: self.pass,
        });
    }
}
