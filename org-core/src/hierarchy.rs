//! # Resolução de Hierarquia
//!
//! Executada ao fim de cada passagem, sobre o registro inteiro:
//!
//! 1. superiores pendentes (`temp_parent`) viram arestas `higher`; os globais
//!    (ГУВД → МВД) são materializados sob demanda;
//! 2. subdivisões ainda sem superior herdam o superior comum de subdivisões do
//!    mesmo tipo ou, na falta dele, a menção anterior mais próxima que possa
//!    subordiná-las. Candidatos ambíguos são descartados;
//! 3. subdivisões herdam a geografia do superior e recebem o perfil `Unit`.
//!
//! Toda aresta passa por [`Registry::set_higher`], que recusa ciclos.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::EngineConfig;
use crate::entity::{OrgId, ParentHint};
use crate::kind::OrgProfile;
use crate::lexicon::Lexicon;
use crate::ownership::{can_be_higher, is_department_like};
use crate::registry::Registry;

/// Resolve as arestas pendentes; devolve as atribuições `(inferior, superior)` feitas.
pub fn resolve(registry: &mut Registry, lexicon: &Lexicon, config: &EngineConfig) -> Vec<(OrgId, OrgId)> {
    let mut assigned = Vec::new();

    let ids: Vec<OrgId> = registry.ids().collect();
    for &id in &ids {
        let mut hint = None;
        registry.update(id, |e| hint = e.take_temp_parent());
        let higher = match hint {
            Some(ParentHint::Known(h)) => Some(h),
            Some(ParentHint::Global(key)) => registry.register_global(lexicon, &key),
            None => None,
        };
        if let Some(h) = higher {
            assign(registry, id, h, &mut assigned);
        }
    }

    let ids: Vec<OrgId> = registry.ids().collect();
    for &id in &ids {
        let orphan = registry
            .get(id)
            .map_or(false, |e| e.higher().is_none() && is_department_like(e));
        if !orphan {
            continue;
        }
        if let Some(h) = sibling_parent(registry, id).or_else(|| nearest_preceding(registry, id, config.hierarchy_max_gap)) {
            assign(registry, id, h, &mut assigned);
        }
    }

    propagate(registry);
    assigned
}

fn assign(registry: &mut Registry, lower: OrgId, higher: OrgId, assigned: &mut Vec<(OrgId, OrgId)>) {
    if registry.get(lower).and_then(|e| e.higher()).is_some() {
        return;
    }
    if registry.set_higher(lower, higher) {
        debug!(%lower, %higher, "higher assigned");
        assigned.push((lower, higher));
    }
}

/// Superior único das subdivisões que compartilham um tipo com `id`.
fn sibling_parent(registry: &Registry, id: OrgId) -> Option<OrgId> {
    let entity = registry.get(id)?;
    let parents: BTreeSet<OrgId> = registry
        .entities()
        .filter(|(other, e)| *other != id && is_department_like(e) && e.types().iter().any(|t| entity.has_type(t)))
        .filter_map(|(_, e)| e.higher())
        .collect();
    if parents.len() != 1 {
        return None;
    }
    let parent = parents.into_iter().next()?;
    registry
        .get(parent)
        .filter(|h| can_be_higher(h, entity))
        .map(|_| parent)
}

/// Organização mencionada logo antes da primeira menção de `id`, dentro de `max_gap` bytes.
fn nearest_preceding(registry: &Registry, id: OrgId, max_gap: usize) -> Option<OrgId> {
    let entity = registry.get(id)?;
    let start = registry.mentions_of(id).map(|m| m.start).min()?;

    let mut window: Vec<(usize, OrgId)> = registry
        .mentions()
        .iter()
        .filter(|m| m.org != id && m.end <= start && start - m.end <= max_gap)
        .filter(|m| registry.get(m.org).map_or(false, |h| can_be_higher(h, entity)))
        .map(|m| (start - m.end, m.org))
        .collect();
    window.sort();
    window.dedup_by_key(|(_, org)| *org);

    let (_, nearest) = *window.first()?;
    let nearest_entity = registry.get(nearest)?;
    let ambiguous = window
        .iter()
        .filter(|(_, org)| *org != nearest)
        .filter_map(|(_, org)| registry.get(*org))
        .any(|other| other.types().iter().any(|t| nearest_entity.has_type(t)));
    if ambiguous {
        debug!(%id, "ambiguous preceding parent skipped");
        return None;
    }
    Some(nearest)
}

fn propagate(registry: &mut Registry) {
    let ids: Vec<OrgId> = registry.ids().collect();
    for id in ids {
        let Some(entity) = registry.get(id) else { continue };
        if !is_department_like(entity) {
            continue;
        }
        let inherited = match entity.higher().and_then(|h| registry.get(h)) {
            Some(parent) if entity.geos().is_empty() => parent.geos().to_vec(),
            _ => Vec::new(),
        };
        let needs_unit = entity.profiles().is_empty();
        if inherited.is_empty() && !needs_unit {
            continue;
        }
        registry.update(id, |e| {
            for geo in inherited {
                e.add_geo(geo);
            }
            if needs_unit {
                e.add_profile(OrgProfile::Unit);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::OrganizationEntity;
    use crate::referent::GeoRef;
    use crate::registry::Mention;

    fn typed(types: &[&str], name: &str) -> OrganizationEntity {
        let mut e = OrganizationEntity::new();
        for t in types {
            e.add_type(t);
        }
        if !name.is_empty() {
            e.add_name(name, false);
        }
        e
    }

    fn mention(registry: &mut Registry, org: OrgId, start: usize, end: usize) {
        registry.add_mention(Mention {
            org,
            start,
            end,
            text: String::new(),
            pass: 2,
        });
    }

    #[test]
    fn test_global_parent_is_materialized() {
        let lexicon = Lexicon::builtin();
        let mut registry = Registry::new();
        let mut guvd = typed(&["главное управление внутренних дел"], "");
        guvd.add_geo(GeoRef::region("Московская область", "Россия"));
        guvd.set_temp_parent(ParentHint::Global("МВД".into()));
        let (id, _) = registry.register(guvd);

        let assigned = resolve(&mut registry, &lexicon, &EngineConfig::default());
        let mvd = registry.global_id("МВД").unwrap();
        assert_eq!(assigned, vec![(id, mvd)]);
        let e = registry.get(id).unwrap();
        assert_eq!(e.higher(), Some(mvd));
        assert!(e.temp_parent().is_none());
        assert!(e.profiles().contains(&OrgProfile::Unit));
        assert_eq!(e.geos().len(), 1);
    }

    #[test]
    fn test_nearest_preceding_mention() {
        let lexicon = Lexicon::builtin();
        let mut registry = Registry::new();
        let mut company = typed(&["компания"], "Вектор");
        company.add_geo(GeoRef::city("Казань", "Россия"));
        let (company, _) = registry.register(company);
        let (office, _) = registry.register(typed(&["отдел"], "кадров"));
        mention(&mut registry, company, 0, 16);
        mention(&mut registry, office, 40, 62);

        resolve(&mut registry, &lexicon, &EngineConfig::default());
        let e = registry.get(office).unwrap();
        assert_eq!(e.higher(), Some(company));
        assert_eq!(e.geos().len(), 1);
        assert!(e.profiles().contains(&OrgProfile::Unit));
    }

    #[test]
    fn test_gap_and_ambiguity() {
        let lexicon = Lexicon::builtin();
        let mut config = EngineConfig::default();
        config.hierarchy_max_gap = 10;
        let mut registry = Registry::new();
        let (company, _) = registry.register(typed(&["компания"], "Вектор"));
        let (office, _) = registry.register(typed(&["отдел"], "кадров"));
        mention(&mut registry, company, 0, 16);
        mention(&mut registry, office, 40, 62);
        resolve(&mut registry, &lexicon, &config);
        assert_eq!(registry.get(office).unwrap().higher(), None);

        let mut registry = Registry::new();
        let (a, _) = registry.register(typed(&["компания"], "Вектор"));
        let (b, _) = registry.register(typed(&["компания"], "Орбита"));
        let (office, _) = registry.register(typed(&["отдел"], "кадров"));
        mention(&mut registry, a, 0, 10);
        mention(&mut registry, b, 12, 24);
        mention(&mut registry, office, 30, 40);
        resolve(&mut registry, &lexicon, &EngineConfig::default());
        assert_eq!(registry.get(office).unwrap().higher(), None);
    }

    #[test]
    fn test_sibling_departments_share_parent() {
        let lexicon = Lexicon::builtin();
        let mut registry = Registry::new();
        let (ministry, _) = registry.register(typed(&["министерство"], "юстиции"));
        let (first, _) = registry.register(typed(&["департамент"], "кадров"));
        let (second, _) = registry.register(typed(&["департамент"], "финансов"));
        assert!(registry.set_higher(first, ministry));

        let assigned = resolve(&mut registry, &lexicon, &EngineConfig::default());
        assert_eq!(assigned, vec![(second, ministry)]);
    }

    #[test]
    fn test_known_hint_respects_cycles() {
        let lexicon = Lexicon::builtin();
        let mut registry = Registry::new();
        let (dept, _) = registry.register(typed(&["департамент"], "кадров"));
        let (office, _) = registry.register(typed(&["отдел"], "учета"));
        assert!(registry.set_higher(office, dept));
        registry.update(dept, |e| e.set_temp_parent(ParentHint::Known(office)));

        let assigned = resolve(&mut registry, &lexicon, &EngineConfig::default());
        assert!(assigned.is_empty());
        assert_eq!(registry.get(dept).unwrap().higher(), None);
        assert!(registry.get(dept).unwrap().temp_parent().is_none());
    }
}
