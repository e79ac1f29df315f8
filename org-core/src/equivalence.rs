//! # Equivalência entre Organizações
//!
//! [`can_be_equal`] decide se duas entidades podem denotar a mesma organização.
//! A comparação é em camadas; cada camada pode vetar:
//!
//! 1. **Geografia**: se ambas têm âncoras, pelo menos um par deve ser compatível.
//! 2. **Marcadores**: se ambas têm, os conjuntos devem ser iguais.
//! 3. **ИНН/ОГРН**: se ambas têm, decidem sozinhos (iguais → sim, diferentes → não).
//! 4. **Superiores**: se ambas têm, devem ser recursivamente equivalentes.
//! 5. **Dono**, **tipos antagônicos**, **kind** e **número**.
//! 6. **Nomes**: interseção das variantes com comprimento mínimo.
//! 7. **Epônimos** e a regra final para entidades sem nome.
//!
//! A função é simétrica por construção: a comparação dirigida roda nos dois
//! sentidos e ambos precisam concordar.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::entity::{OrgId, OrganizationEntity, ParentHint};
use crate::kind::{types_antagonistic, OrgKind};
use crate::referent::GeoRef;

/// Nível máximo de recursão pela cadeia de superiores.
const MAX_LEVEL: usize = 4;

/// Contexto da comparação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EqualityMode {
    /// Duas menções no mesmo documento.
    WithinOneText,
    /// Documentos diferentes: exige mais evidência.
    AcrossTexts,
    /// Registro de um candidato: tolera número ausente de um lado.
    ForMerging,
}

/// Acesso às entidades referidas por id (superiores).
pub trait HigherLookup {
    fn entity(&self, id: OrgId) -> Option<&OrganizationEntity>;
}

/// Nenhuma entidade conhecida: superiores ficam "não resolvidos".
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl HigherLookup for NoLookup {
    fn entity(&self, _id: OrgId) -> Option<&OrganizationEntity> {
        None
    }
}

/// Limites da comparação de nomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameThresholds {
    /// Abaixo disso, uma variante compartilhada só vale se algum lado tiver um único nome curto.
    pub min_shared_len: usize,
    /// Abaixo disso, a variante compartilhada é ignorada.
    pub min_name_len: usize,
}

impl Default for NameThresholds {
    fn default() -> Self {
        NameThresholds {
            min_shared_len: 4,
            min_name_len: 2,
        }
    }
}

impl From<&EngineConfig> for NameThresholds {
    fn from(config: &EngineConfig) -> Self {
        NameThresholds {
            min_shared_len: config.min_shared_name_len,
            min_name_len: config.min_name_len,
        }
    }
}

pub fn can_be_equal(
    a: &OrganizationEntity,
    b: &OrganizationEntity,
    mode: EqualityMode,
    lookup: &dyn HigherLookup,
) -> bool {
    can_be_equal_with(a, b, mode, lookup, &NameThresholds::default())
}

pub fn can_be_equal_with(
    a: &OrganizationEntity,
    b: &OrganizationEntity,
    mode: EqualityMode,
    lookup: &dyn HigherLookup,
    thresholds: &NameThresholds,
) -> bool {
    let cmp = Comparison {
        mode,
        lookup,
        thresholds,
    };
    cmp.equal(a, b, 0)
}

/// Duas âncoras denotam o mesmo lugar ou uma contém a outra.
fn geo_compatible(g1: &GeoRef, g2: &GeoRef) -> bool {
    g1.can_be_equal(g2)
        || g1.parent.as_deref() == Some(g2.name.as_str())
        || g2.parent.as_deref() == Some(g1.name.as_str())
}

fn shares_type(a: &OrganizationEntity, b: &OrganizationEntity) -> bool {
    a.types().iter().any(|t| b.types().contains(t))
}

enum Parent<'a> {
    Entity(OrgId, Option<&'a OrganizationEntity>),
    Global(&'a str),
}

struct Comparison<'a> {
    mode: EqualityMode,
    lookup: &'a dyn HigherLookup,
    thresholds: &'a NameThresholds,
}

impl<'a> Comparison<'a> {
    fn equal(&self, a: &OrganizationEntity, b: &OrganizationEntity, level: usize) -> bool {
        if level > MAX_LEVEL {
            return false;
        }
        self.directed(a, b, level) && self.directed(b, a, level)
    }

    fn parent_of<'e>(&'e self, e: &'e OrganizationEntity) -> Option<Parent<'e>> {
        if let Some(id) = e.higher() {
            return Some(Parent::Entity(id, self.lookup.entity(id)));
        }
        match e.temp_parent()? {
            ParentHint::Known(id) => Some(Parent::Entity(*id, self.lookup.entity(*id))),
            ParentHint::Global(key) => Some(Parent::Global(key)),
        }
    }

    /// Eponímos coincidem (com tolerância ao genitivo em "-а").
    fn eponyms_equal(a: &OrganizationEntity, b: &OrganizationEntity) -> bool {
        let (ea, eb) = (a.eponyms(), b.eponyms());
        if ea.is_empty() && eb.is_empty() {
            return false;
        }
        let shared = |x: &BTreeSet<String>, y: &BTreeSet<String>| {
            x.iter().any(|e| y.contains(e) || (!e.ends_with('а') && y.contains(&format!("{e}а"))))
        };
        if shared(ea, eb) || shared(eb, ea) {
            return true;
        }
        if !ea.is_empty() && !eb.is_empty() {
            return false;
        }
        let mentions = |x: &BTreeSet<String>, other: &OrganizationEntity| {
            let s = other.display_string(true).to_uppercase();
            x.iter().any(|e| s.contains(&e.to_uppercase()))
        };
        mentions(ea, b) || mentions(eb, a)
    }

    fn directed(&self, a: &OrganizationEntity, b: &OrganizationEntity, level: usize) -> bool {
        let mode = self.mode;
        let mut empty = true;
        let (k1, k2) = (a.kind(), b.kind());

        // Geografia
        if !a.geos().is_empty() && !b.geos().is_empty() {
            let any = a.geos().iter().any(|g1| b.geos().iter().any(|g2| geo_compatible(g1, g2)));
            if !any {
                return false;
            }
        }

        // Marcadores
        if !a.markers().is_empty() && !b.markers().is_empty() && a.markers() != b.markers() {
            return false;
        }

        // Identificadores legais decidem sozinhos
        if let (Some(x), Some(y)) = (a.inn(), b.inn()) {
            return x == y;
        }
        if let (Some(x), Some(y)) = (a.ogrn(), b.ogrn()) {
            return x == y;
        }

        // Superiores
        let (h1, h2) = (self.parent_of(a), self.parent_of(b));
        let mut hi_eq = false;
        if let (Some(p1), Some(p2)) = (&h1, &h2) {
            match (p1, p2) {
                (Parent::Entity(i1, _), Parent::Entity(i2, _)) if i1 == i2 => hi_eq = true,
                (Parent::Entity(_, Some(e1)), Parent::Entity(_, Some(e2))) => {
                    if !self.equal(e1, e2, level + 1) {
                        return false;
                    }
                    hi_eq = true;
                }
                (Parent::Global(g1), Parent::Global(g2)) => {
                    if g1 != g2 {
                        return false;
                    }
                    hi_eq = true;
                }
                // Algum lado ainda não resolvido
                _ => {}
            }
        }

        // Dono
        if a.owner().is_some() || b.owner().is_some() {
            if a.owner() != b.owner() {
                return false;
            }
            hi_eq = true;
        }

        if mode == EqualityMode::AcrossTexts && !hi_eq && (a.higher().is_some() || b.higher().is_some()) {
            return false;
        }

        // Tipos antagônicos sem tipo em comum
        if !shares_type(a, b)
            && a
                .types()
                .iter()
                .any(|ta| b.types().iter().any(|tb| types_antagonistic(ta, tb)))
        {
            return false;
        }

        if mode == EqualityMode::AcrossTexts {
            if k1 == OrgKind::Department || k2 == OrgKind::Department {
                if h1.is_some() != h2.is_some() {
                    return false;
                }
            } else if k1 != k2 {
                return false;
            }
        }

        // Número
        let eq_eponyms = Self::eponyms_equal(a, b);
        let mut eq_number = false;
        if a.number().is_some() || b.number().is_some() {
            if a.number() != b.number() {
                let one_missing = a.number().is_none() || b.number().is_none();
                if !(one_missing && (eq_eponyms || mode == EqualityMode::ForMerging)) {
                    return false;
                }
            } else {
                empty = false;
                eq_number = shares_type(a, b);
            }
        }
        if mode == EqualityMode::AcrossTexts
            && (a.number().is_some() || b.number().is_some())
            && !eq_number
            && !eq_eponyms
        {
            return false;
        }

        // Kind
        let k = if k1 == OrgKind::Undefined { k2 } else { k1 };
        if k1 != OrgKind::Undefined && k2 != OrgKind::Undefined {
            if k1 != k2 && !shares_type(a, b) && a.profiles().is_disjoint(b.profiles()) {
                return false;
            }
        } else if matches!(k, OrgKind::Bank | OrgKind::Medical | OrgKind::Party | OrgKind::Culture)
            && !a.types().is_empty()
            && !b.types().is_empty()
        {
            if mode != EqualityMode::ForMerging {
                return false;
            }
            if !a.names().any(|(n, _)| b.has_name(n)) {
                return false;
            }
        }
        if matches!(k1, OrgKind::Government | OrgKind::Military)
            || matches!(k2, OrgKind::Government | OrgKind::Military)
        {
            if !shares_type(a, b) {
                return false;
            }
        }

        // Nomes
        if a.has_names() || b.has_names() {
            let one_unnamed = !a.has_names() || !b.has_names();
            if !((eq_number || eq_eponyms) && one_unnamed) {
                empty = false;
                if !self.names_match(a, b, k1) {
                    return false;
                }
            }
        }

        // Epônimos
        if eq_eponyms {
            return true;
        }
        let (ea, eb) = (!a.eponyms().is_empty(), !b.eponyms().is_empty());
        if (ea || eb) && !(mode == EqualityMode::ForMerging && !(ea && eb)) {
            if ea && eb {
                return false;
            }
            if empty {
                return false;
            }
        }

        // Regra final
        if k != OrgKind::Department {
            if !empty {
                return true;
            }
            if hi_eq && shares_type(a, b) {
                return true;
            }
        }
        if mode == EqualityMode::AcrossTexts {
            return a.display_string(false) == b.display_string(false);
        }
        if empty {
            let both_geo = !a.geos().is_empty() && !b.geos().is_empty();
            if (both_geo || matches!(k, OrgKind::Department | OrgKind::Justice)) && shares_type(a, b) {
                return true;
            }
            if a.slot_content() == b.slot_content() {
                return true;
            }
        } else if k == OrgKind::Department {
            return true;
        }
        mode == EqualityMode::ForMerging
    }

    fn names_match(&self, a: &OrganizationEntity, b: &OrganizationEntity, k1: OrgKind) -> bool {
        let mode = self.mode;
        let th = self.thresholds;
        let (va, vb) = (a.name_variants(), b.name_variants());
        let (na, nb) = (a.names().count(), b.names().count());

        let mut max_len = 0;
        for (v, &abbr_a) in va {
            if mode == EqualityMode::AcrossTexts && abbr_a {
                continue;
            }
            let Some(&abbr_b) = vb.get(v) else { continue };
            if mode == EqualityMode::AcrossTexts && abbr_b {
                continue;
            }
            if abbr_a && abbr_b {
                continue;
            }
            let len = v.chars().count();
            if (abbr_b && na > 1 && len < 4) || (abbr_a && nb > 1 && len < 4) {
                continue;
            }
            max_len = max_len.max(len);
        }
        if mode != EqualityMode::AcrossTexts {
            let hb = b.name_hashes();
            for h in a.name_hashes() {
                if hb.contains(&h) {
                    max_len = max_len.max(h.chars().count());
                }
            }
        }

        if max_len < th.min_name_len
            && (k1 == OrgKind::Government || mode == EqualityMode::ForMerging)
            && mode != EqualityMode::AcrossTexts
            && a.geos().len() == b.geos().len()
        {
            let pool = |e: &'_ OrganizationEntity| -> Vec<String> {
                if mode == EqualityMode::ForMerging {
                    e.name_variants().keys().cloned().collect()
                } else {
                    e.names().map(|(n, _)| n.to_string()).collect()
                }
            };
            let (pa, pb) = (pool(a), pool(b));
            for n in &pa {
                for nn in &pb {
                    if n.starts_with(nn.as_str()) {
                        max_len = max_len.max(nn.chars().count());
                    } else if nn.starts_with(n.as_str()) {
                        max_len = max_len.max(n.chars().count());
                    }
                }
            }
        }

        if max_len < th.min_name_len {
            return false;
        }
        if max_len < th.min_shared_len {
            let short_single = |e: &OrganizationEntity, count: usize| {
                count == 1 && e.names().all(|(n, _)| n.chars().count() < th.min_shared_len)
            };
            return short_single(a, na) || short_single(b, nb);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::OrgProfile;
    use crate::number_token::LegalIdKind;

    fn org(types: &[&str], names: &[&str]) -> OrganizationEntity {
        let mut e = OrganizationEntity::new();
        for t in types {
            e.add_type(t);
        }
        for n in names {
            e.add_name(n, false);
        }
        e
    }

    fn eq(a: &OrganizationEntity, b: &OrganizationEntity, mode: EqualityMode) -> bool {
        can_be_equal(a, b, mode, &NoLookup)
    }

    #[test]
    fn test_same_name_is_equal() {
        let a = org(&["компания"], &["Газпром"]);
        let mut b = org(&["компания"], &["Газпром"]);
        b.add_geo(GeoRef::state("Россия"));
        assert!(eq(&a, &b, EqualityMode::WithinOneText));
        assert!(eq(&a, &b, EqualityMode::ForMerging));
    }

    #[test]
    fn test_owner_must_match() {
        use crate::referent::{PersonRef, Referent};

        let mut a = org(&["фонд"], &["Наследие"]);
        let mut b = org(&["фонд"], &["Наследие"]);
        a.set_owner(Referent::Person(PersonRef::new("Пушкин")));
        assert!(!eq(&a, &b, EqualityMode::WithinOneText));
        b.set_owner(Referent::Person(PersonRef::new("Пушкин")));
        assert!(eq(&a, &b, EqualityMode::WithinOneText));
    }

    #[test]
    fn test_different_ministries_are_not_equal() {
        let a = org(&["министерство"], &["юстиции"]);
        let b = org(&["министерство"], &["финансов"]);
        assert!(!eq(&a, &b, EqualityMode::ForMerging));
        assert!(!eq(&a, &b, EqualityMode::WithinOneText));
    }

    #[test]
    fn test_geo_conflict() {
        let mut a = org(&["банк"], &["Восток"]);
        let mut b = org(&["банк"], &["Восток"]);
        a.add_geo(GeoRef::state("Россия"));
        b.add_geo(GeoRef::state("Украина"));
        assert!(!eq(&a, &b, EqualityMode::WithinOneText));

        // Região contida no estado é compatível
        b.add_geo(GeoRef::region("Московская область", "Россия"));
        assert!(eq(&a, &b, EqualityMode::WithinOneText));
    }

    #[test]
    fn test_legal_ids_short_circuit() {
        let mut a = org(&["компания"], &["Ромашка"]);
        let mut b = org(&["банк"], &["Лютик"]);
        a.set_legal_id(LegalIdKind::Inn, "7707083893");
        b.set_legal_id(LegalIdKind::Inn, "7707083893");
        assert!(eq(&a, &b, EqualityMode::WithinOneText));
        b.set_legal_id(LegalIdKind::Inn, "5408131553");
        let c = org(&["компания"], &["Ромашка"]);
        let mut c2 = c.clone();
        c2.set_legal_id(LegalIdKind::Inn, "5408131553");
        assert!(!eq(&a, &c2, EqualityMode::WithinOneText));
    }

    #[test]
    fn test_number_mismatch() {
        let mut a = org(&["школа"], &[]);
        let mut b = org(&["школа"], &[]);
        a.set_number("15");
        b.set_number("16");
        assert!(!eq(&a, &b, EqualityMode::ForMerging));
        b.set_number("15");
        assert!(eq(&a, &b, EqualityMode::ForMerging));
    }

    #[test]
    fn test_antagonistic_types() {
        let a = org(&["банк"], &["Россия"]);
        let b = org(&["партия"], &["Россия"]);
        assert!(!eq(&a, &b, EqualityMode::WithinOneText));
    }

    #[test]
    fn test_markers_must_match() {
        let mut a = org(&["дивизия"], &[]);
        let mut b = org(&["дивизия"], &[]);
        a.set_number("76");
        b.set_number("76");
        a.add_marker("десантный");
        b.add_marker("танковый");
        assert!(!eq(&a, &b, EqualityMode::ForMerging));
    }

    #[test]
    fn test_eponyms_with_genitive_tolerance() {
        let mut a = org(&["школа"], &[]);
        let mut b = org(&["школа"], &[]);
        a.add_eponym("Пушкин");
        b.add_eponym("Пушкина");
        assert!(eq(&a, &b, EqualityMode::WithinOneText));
        let mut c = org(&["школа"], &[]);
        c.add_eponym("Толстого");
        assert!(!eq(&a, &c, EqualityMode::WithinOneText));
    }

    #[test]
    fn test_short_shared_name_needs_single_name() {
        let mut a = org(&["компания"], &["ЛЮК"]);
        let b = org(&["компания"], &["ЛЮК"]);
        assert!(eq(&a, &b, EqualityMode::WithinOneText));
        a.add_name("Люкс Энерго", false);
        let mut b2 = b.clone();
        b2.add_name("Люк Ойл", false);
        assert!(!eq(&a, &b2, EqualityMode::WithinOneText));
    }

    #[test]
    fn test_across_texts_requires_same_kind() {
        let mut a = org(&["компания"], &["Восход"]);
        let b = org(&["театр"], &["Восход"]);
        a.add_profile(OrgProfile::Industry);
        assert!(!eq(&a, &b, EqualityMode::AcrossTexts));
        assert!(eq(&a, &a.clone(), EqualityMode::AcrossTexts));
    }

    #[test]
    fn test_symmetry_on_fixed_pairs() {
        let a = org(&["министерство"], &["юстиции"]);
        let mut b = org(&["министерство"], &["юстиции"]);
        b.add_geo(GeoRef::state("Россия"));
        let c = org(&["отдел"], &["кадров"]);
        for mode in [EqualityMode::WithinOneText, EqualityMode::AcrossTexts, EqualityMode::ForMerging] {
            for (x, y) in [(&a, &b), (&a, &c), (&b, &c)] {
                assert_eq!(eq(x, y, mode), eq(y, x, mode));
            }
        }
    }
}
