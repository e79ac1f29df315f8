//! # Detecção de Subdivisões
//!
//! Uma subdivisão ("отдел кадров", "ГУВД") procura o superior nesta ordem:
//!
//! 1. organização entre parênteses logo após ela;
//! 2. organização já reconhecida imediatamente depois;
//! 3. organização que começa logo depois, reconhecida agora por recursão
//!    (modo `NormalAfterDepartment`, profundidade + 1);
//! 4. organização já reconhecida imediatamente antes (opcionalmente antes de uma vírgula);
//! 5. superior implícito do tipo no registro global (ГУВД → МВД).
//!
//! Cada candidato passa por [`can_be_higher`].

use serde::Serialize;

use crate::assembler::{Assembler, Assembly, Attachment};
use crate::entity::{OrgId, OrganizationEntity};
use crate::global_token::entity_from_global;
use crate::ownership::can_be_higher;
use crate::scoring::AttachMode;
use crate::type_token::TypeMatch;

/// Superior encontrado para um candidato.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParentLink {
    None,
    /// Organização já registrada.
    Known(OrgId),
    /// Organização reconhecida junto com a subdivisão; registrada antes dela.
    Sibling(Box<Assembly>),
    /// Organização do registro global, materializada pela hierarquia.
    Global(String),
}

impl ParentLink {
    pub fn is_some(&self) -> bool {
        !matches!(self, ParentLink::None)
    }
}

pub(crate) fn find_parent(
    assembler: &Assembler<'_>,
    entity: &OrganizationEntity,
    types: &[&TypeMatch],
    bracket_org: Option<OrgId>,
    begin: usize,
    end: usize,
    depth: usize,
) -> ParentLink {
    let ctx = assembler.context();
    let known_ok = |id: OrgId| ctx.registry.get(id).map_or(false, |h| can_be_higher(h, entity));

    if let Some(id) = bracket_org.filter(|id| known_ok(*id)) {
        return ParentLink::Known(id);
    }

    if let Some(id) = ctx.tokens.get(end + 1).and_then(|t| t.organization()) {
        if known_ok(id) {
            return ParentLink::Known(id);
        }
    }

    if let Some(Attachment::Single(sibling)) = assembler.try_attach(end + 1, AttachMode::NormalAfterDepartment, depth + 1) {
        if can_be_higher(&sibling.entity, entity) {
            return ParentLink::Sibling(Box::new(sibling));
        }
    }

    if begin > 0 {
        let mut at = begin - 1;
        if ctx.tokens.get(at).map_or(false, |t| t.is_comma()) && at > 0 {
            at -= 1;
        }
        if let Some(id) = ctx.tokens.get(at).and_then(|t| t.organization()) {
            if known_ok(id) {
                return ParentLink::Known(id);
            }
        }
    }

    for t in types {
        let Some(key) = t.info.implied_parent.as_deref() else { continue };
        let Some(global) = ctx.lexicon.global(key) else { continue };
        if can_be_higher(&entity_from_global(global), entity) {
            return ParentLink::Global(global.key.clone());
        }
    }
    ParentLink::None
}
