//! # Registro de Entidades
//!
//! Arena dona de todas as [`OrganizationEntity`] canônicas do documento. O
//! restante do motor só guarda [`OrgId`]s.
//!
//! - `register` procura entidades equivalentes (modo `ForMerging`) pelas chaves
//!   normalizadas de nome/tipo; se achar, funde e devolve o id existente.
//! - `set_higher` percorre a cadeia de superiores antes de gravar e recusa
//!   qualquer atribuição que feche um ciclo.
//! - Menções (spans no texto) ficam registradas à parte, em ordem de descoberta.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{OrgId, OrganizationEntity};
use crate::equivalence::{can_be_equal_with, EqualityMode, HigherLookup, NameThresholds};
use crate::global_token::entity_from_global;
use crate::lexicon::Lexicon;

/// Uma ocorrência de organização no texto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub org: OrgId,
    /// Offset de byte inicial (inclusive).
    pub start: usize,
    /// Offset de byte final (exclusivo).
    pub end: usize,
    pub text: String,
    /// Passagem que reconheceu a menção (1 ou 2; 0 para ontologia externa).
    pub pass: u8,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: Vec<OrganizationEntity>,
    index: HashMap<String, BTreeSet<OrgId>>,
    mentions: Vec<Mention>,
    globals: HashMap<String, OrgId>,
    thresholds: NameThresholds,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: NameThresholds) -> Self {
        Registry {
            thresholds,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: OrgId) -> Option<&OrganizationEntity> {
        self.entities.get(id.0 as usize)
    }

    pub fn ids(&self) -> impl Iterator<Item = OrgId> + '_ {
        (0..self.entities.len()).map(|i| OrgId(i as u32))
    }

    pub fn entities(&self) -> impl Iterator<Item = (OrgId, &OrganizationEntity)> {
        self.entities.iter().enumerate().map(|(i, e)| (OrgId(i as u32), e))
    }

    fn reindex(&mut self, id: OrgId) {
        let Some(entity) = self.entities.get(id.0 as usize) else {
            return;
        };
        for key in entity.index_keys() {
            self.index.entry(key).or_default().insert(id);
        }
    }

    /// Entidade existente equivalente a `candidate`, a de menor id.
    pub fn find_equivalent(&self, candidate: &OrganizationEntity, mode: EqualityMode) -> Option<OrgId> {
        let mut pool: BTreeSet<OrgId> = BTreeSet::new();
        for key in candidate.index_keys() {
            if let Some(ids) = self.index.get(&key) {
                pool.extend(ids.iter().copied());
            }
        }
        pool.into_iter().find(|id| {
            self.get(*id)
                .map_or(false, |e| can_be_equal_with(e, candidate, mode, self, &self.thresholds))
        })
    }

    /// Registra um candidato; devolve o id e se houve fusão.
    ///
    /// O `higher` trazido pelo candidato não é copiado: passa por
    /// [`Registry::set_higher`] depois da fusão ou inserção, e só vale se a
    /// entidade resultante ainda não tiver superior.
    pub fn register(&mut self, mut candidate: OrganizationEntity) -> (OrgId, bool) {
        let equivalent = self.find_equivalent(&candidate, EqualityMode::ForMerging);
        let higher = candidate.higher();
        candidate.set_higher_unchecked(None);

        let (id, merged) = match equivalent {
            Some(id) => {
                if let Some(existing) = self.entities.get_mut(id.0 as usize) {
                    existing.merge_from(&candidate);
                }
                self.reindex(id);
                debug!(%id, "candidate merged into existing entity");
                (id, true)
            }
            None => {
                let id = OrgId(self.entities.len() as u32);
                self.entities.push(candidate);
                self.reindex(id);
                debug!(%id, "new entity registered");
                (id, false)
            }
        };

        if let Some(h) = higher {
            let free = self.get(id).map_or(false, |e| e.higher().is_none());
            if free {
                self.set_higher(id, h);
            }
        }
        (id, merged)
    }

    /// Aplica uma mutação e reindexa a entidade.
    pub fn update(&mut self, id: OrgId, f: impl FnOnce(&mut OrganizationEntity)) -> bool {
        match self.entities.get_mut(id.0 as usize) {
            Some(entity) => {
                f(entity);
                self.reindex(id);
                true
            }
            None => false,
        }
    }

    /// `higher` de `id` seguindo a cadeia até o topo (sem incluir `id`).
    pub fn ancestors(&self, id: OrgId) -> Vec<OrgId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).and_then(|e| e.higher());
        while let Some(h) = current {
            if h == id || chain.contains(&h) || chain.len() > self.entities.len() {
                break;
            }
            chain.push(h);
            current = self.get(h).and_then(|e| e.higher());
        }
        chain
    }

    /// Atribui `higher` a `lower` se isso não criar ciclo.
    pub fn set_higher(&mut self, lower: OrgId, higher: OrgId) -> bool {
        if lower == higher || self.get(lower).is_none() || self.get(higher).is_none() {
            return false;
        }
        if self.ancestors(higher).contains(&lower) {
            debug!(%lower, %higher, "rejected cyclic higher assignment");
            return false;
        }
        self.update(lower, |e| e.set_higher_unchecked(Some(higher)))
    }

    pub fn add_mention(&mut self, mention: Mention) {
        self.mentions.push(mention);
    }

    pub fn mentions(&self) -> &[Mention] {
        &self.mentions
    }

    pub fn mentions_of(&self, id: OrgId) -> impl Iterator<Item = &Mention> {
        self.mentions.iter().filter(move |m| m.org == id)
    }

    pub fn global_id(&self, key: &str) -> Option<OrgId> {
        self.globals.get(key).copied()
    }

    /// Materializa (ou reaproveita) a organização global `key`.
    pub fn register_global(&mut self, lexicon: &Lexicon, key: &str) -> Option<OrgId> {
        self.register_global_at(lexicon, key, 0)
    }

    fn register_global_at(&mut self, lexicon: &Lexicon, key: &str, depth: usize) -> Option<OrgId> {
        let global = lexicon.global(key)?;
        if let Some(id) = self.globals.get(&global.key) {
            return Some(*id);
        }
        let (id, _) = self.register(entity_from_global(global));
        self.globals.insert(global.key.clone(), id);

        if let Some(parent_key) = &global.higher {
            if depth < lexicon.globals.len() {
                if let Some(parent) = self.register_global_at(lexicon, parent_key, depth + 1) {
                    self.set_higher(id, parent);
                }
            }
        }
        Some(id)
    }
}

impl HigherLookup for Registry {
    fn entity(&self, id: OrgId) -> Option<&OrganizationEntity> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::referent::GeoRef;

    fn named(typ: &str, name: &str) -> OrganizationEntity {
        let mut e = OrganizationEntity::new();
        e.add_type(typ);
        e.add_name(name, false);
        e
    }

    #[test]
    fn test_register_merges_equivalent() {
        let mut reg = Registry::new();
        let (a, merged_a) = reg.register(named("компания", "Газпром"));
        let mut second = named("компания", "Газпром");
        second.add_geo(GeoRef::state("Россия"));
        let (b, merged_b) = reg.register(second);
        assert_eq!(a, b);
        assert!(!merged_a && merged_b);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(a).unwrap().geos().len(), 1);
    }

    #[test]
    fn test_register_keeps_distinct() {
        let mut reg = Registry::new();
        let (a, _) = reg.register(named("министерство", "юстиции"));
        let (b, _) = reg.register(named("министерство", "финансов"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_set_higher_rejects_cycles() {
        let mut reg = Registry::new();
        let (a, _) = reg.register(named("министерство", "юстиции"));
        let (b, _) = reg.register(named("департамент", "кадров"));
        let (c, _) = reg.register(named("отдел", "учета"));
        assert!(reg.set_higher(b, a));
        assert!(reg.set_higher(c, b));
        assert!(!reg.set_higher(a, c));
        assert!(!reg.set_higher(a, a));
        assert_eq!(reg.ancestors(c), vec![b, a]);
        assert_eq!(reg.get(a).unwrap().higher(), None);
    }

    #[test]
    fn test_register_never_stores_self_higher() {
        let mut reg = Registry::new();
        let mut cand = named("компания", "Альфа");
        cand.set_higher_unchecked(Some(OrgId(0)));
        let (id, merged) = reg.register(cand);
        assert_eq!((id, merged), (OrgId(0), false));
        assert_eq!(reg.get(id).unwrap().higher(), None);
    }

    #[test]
    fn test_register_merge_rejects_cyclic_higher() {
        let mut reg = Registry::new();
        let (a, _) = reg.register(named("компания", "Альфа"));
        let (b, _) = reg.register(named("компания", "Бета"));
        assert!(reg.set_higher(b, a));

        let mut cand = named("компания", "Альфа");
        cand.set_higher_unchecked(Some(b));
        let (id, merged) = reg.register(cand);
        assert_eq!((id, merged), (a, true));
        assert_eq!(reg.get(a).unwrap().higher(), None);
        assert_eq!(reg.get(b).unwrap().higher(), Some(a));
    }

    #[test]
    fn test_register_applies_valid_higher() {
        let mut reg = Registry::new();
        let (parent, _) = reg.register(named("министерство", "юстиции"));
        let mut cand = named("департамент", "кадров");
        cand.set_higher_unchecked(Some(parent));
        let (id, _) = reg.register(cand);
        assert_eq!(reg.get(id).unwrap().higher(), Some(parent));
    }

    #[test]
    fn test_register_global_is_reused() {
        let lex = Lexicon::builtin();
        let mut reg = Registry::new();
        let id = reg.register_global(&lex, "МВД").unwrap();
        assert_eq!(reg.register_global(&lex, "мвд"), Some(id));
        let e = reg.get(id).unwrap();
        assert!(e.has_type("министерство"));
        assert_eq!(e.geos()[0].name, "РОССИЯ");
        assert!(reg.register_global(&lex, "НЕСУЩЕСТВУЮЩЕЕ").is_none());
    }
}
