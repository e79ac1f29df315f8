//! # Entidade Organização
//!
//! [`OrganizationEntity`] é o referente reconhecido: nomes (multiconjunto com
//! contagem), tipos (conjunto ordenado), número, perfis, epônimos, âncoras
//! geográficas, superior (`higher`) e dono (`owner`), identificadores legais
//! (ИНН/ОГРН) e marcadores.
//!
//! ## Caches derivados
//!
//! `kind` e as variantes de nome são calculados sob demanda e guardados em
//! `OnceCell`. **Toda** mutação de slot passa por métodos que limpam os caches,
//! então nenhum valor obsoleto é observável.
//!
//! ## Arena
//!
//! Entidades vivem no [`Registry`](crate::registry::Registry) e se referem umas
//! às outras por [`OrgId`]. A atribuição de `higher` com verificação de ciclo é
//! responsabilidade do registro.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::{derive_kind, OrgKind, OrgProfile};
use crate::number_token::LegalIdKind;
use crate::referent::{GeoRef, Referent};
use crate::token::normalize_term;

/// Identificador de uma organização na arena do registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrgId(pub u32);

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "org#{}", self.0)
    }
}

/// Ocorrências de um nome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSlot {
    pub count: u32,
    /// O nome é uma sigla.
    pub is_abbr: bool,
}

/// Superior provisório, resolvido pela hierarquia depois da passagem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParentHint {
    Known(OrgId),
    /// Chave de uma organização do registro global ainda não materializada.
    Global(String),
}

/// Retrato dos slots sem contagens nem caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotContent {
    pub names: BTreeSet<String>,
    pub types: Vec<String>,
    pub number: Option<String>,
    pub profiles: BTreeSet<OrgProfile>,
    pub eponyms: BTreeSet<String>,
    pub geos: Vec<String>,
    pub higher: Option<OrgId>,
    pub owner: Option<Referent>,
    pub inn: Option<String>,
    pub ogrn: Option<String>,
    pub markers: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationEntity {
    names: BTreeMap<String, NameSlot>,
    types: Vec<String>,
    number: Option<String>,
    profiles: BTreeSet<OrgProfile>,
    eponyms: BTreeSet<String>,
    geos: Vec<GeoRef>,
    higher: Option<OrgId>,
    owner: Option<Referent>,
    inn: Option<String>,
    ogrn: Option<String>,
    markers: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temp_parent: Option<ParentHint>,
    from_external_ontology: bool,
    #[serde(skip)]
    kind_cache: OnceCell<OrgKind>,
    #[serde(skip)]
    variants_cache: OnceCell<BTreeMap<String, bool>>,
}

/// Maiúsculas, espaços colapsados.
pub fn normalize_name(name: &str) -> String {
    normalize_term(name).split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_quotes(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '«' | '»' | '"' | '„' | '“' | '”' | '\''))
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sigla pelas iniciais das palavras ("ЕДИНАЯ РОССИЯ" → "ЕР").
pub fn abbreviation(phrase: &str) -> Option<String> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() < 2 {
        return None;
    }
    let acr: String = words
        .iter()
        .filter_map(|w| w.chars().find(|c| c.is_alphabetic()))
        .flat_map(char::to_uppercase)
        .collect();
    (acr.chars().count() > 1).then_some(acr)
}

/// Primeira letra maiúscula, demais minúsculas.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl OrganizationEntity {
    pub fn new() -> Self {
        Self::default()
    }

    fn invalidate(&mut self) {
        self.kind_cache = OnceCell::new();
        self.variants_cache = OnceCell::new();
    }

    // ===== Nomes =====

    pub fn names(&self) -> impl Iterator<Item = (&str, &NameSlot)> {
        self.names.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn has_names(&self) -> bool {
        !self.names.is_empty()
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.contains_key(&normalize_name(name))
    }

    pub fn add_name(&mut self, name: &str, is_abbr: bool) {
        let key = normalize_name(name);
        if key.is_empty() {
            return;
        }
        let slot = self.names.entry(key).or_default();
        slot.count += 1;
        slot.is_abbr |= is_abbr;
        self.invalidate();
    }

    /// Nome dominante: prefere nomes completos, depois o mais frequente, depois o mais longo.
    pub fn dominant_name(&self) -> Option<&str> {
        self.names
            .iter()
            .max_by(|(a, sa), (b, sb)| {
                (!sa.is_abbr, sa.count, a.chars().count())
                    .cmp(&(!sb.is_abbr, sb.count, b.chars().count()))
                    .then_with(|| b.cmp(a))
            })
            .map(|(n, _)| n.as_str())
    }

    // ===== Tipos, número, perfis =====

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn has_type(&self, typ: &str) -> bool {
        let typ = typ.to_lowercase();
        self.types.iter().any(|t| *t == typ)
    }

    pub fn add_type(&mut self, typ: &str) {
        let typ = typ.trim().to_lowercase();
        if typ.is_empty() || self.types.contains(&typ) {
            return;
        }
        self.types.push(typ);
        self.invalidate();
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn set_number(&mut self, number: &str) {
        self.number = Some(number.trim().to_string());
        self.invalidate();
    }

    pub fn profiles(&self) -> &BTreeSet<OrgProfile> {
        &self.profiles
    }

    pub fn add_profile(&mut self, profile: OrgProfile) {
        if self.profiles.insert(profile) {
            self.invalidate();
        }
    }

    // ===== Epônimos, geografia, marcadores =====

    pub fn eponyms(&self) -> &BTreeSet<String> {
        &self.eponyms
    }

    pub fn add_eponym(&mut self, eponym: &str) {
        let e = capitalize(eponym.trim());
        if !e.is_empty() && self.eponyms.insert(e) {
            self.invalidate();
        }
    }

    pub fn geos(&self) -> &[GeoRef] {
        &self.geos
    }

    pub fn add_geo(&mut self, geo: GeoRef) {
        if !self.geos.iter().any(|g| g.can_be_equal(&geo)) {
            self.geos.push(geo);
            self.invalidate();
        }
    }

    pub fn markers(&self) -> &BTreeSet<String> {
        &self.markers
    }

    pub fn add_marker(&mut self, marker: &str) {
        if self.markers.insert(normalize_term(marker)) {
            self.invalidate();
        }
    }

    // ===== Identificadores legais =====

    pub fn inn(&self) -> Option<&str> {
        self.inn.as_deref()
    }

    pub fn ogrn(&self) -> Option<&str> {
        self.ogrn.as_deref()
    }

    pub fn set_legal_id(&mut self, kind: LegalIdKind, value: &str) {
        match kind {
            LegalIdKind::Inn => self.inn = Some(value.to_string()),
            LegalIdKind::Ogrn => self.ogrn = Some(value.to_string()),
        }
        self.invalidate();
    }

    // ===== Hierarquia =====

    pub fn higher(&self) -> Option<OrgId> {
        self.higher
    }

    /// Atribuição crua; a verificação de ciclo fica em
    /// [`Registry::set_higher`](crate::registry::Registry::set_higher).
    pub(crate) fn set_higher_unchecked(&mut self, higher: Option<OrgId>) {
        self.higher = higher;
        self.invalidate();
    }

    pub fn owner(&self) -> Option<&Referent> {
        self.owner.as_ref()
    }

    pub fn set_owner(&mut self, owner: Referent) {
        self.owner = Some(owner);
        self.invalidate();
    }

    pub fn temp_parent(&self) -> Option<&ParentHint> {
        self.temp_parent.as_ref()
    }

    pub fn set_temp_parent(&mut self, hint: ParentHint) {
        self.temp_parent = Some(hint);
        self.invalidate();
    }

    pub fn take_temp_parent(&mut self) -> Option<ParentHint> {
        let hint = self.temp_parent.take();
        self.invalidate();
        hint
    }

    pub fn is_from_external_ontology(&self) -> bool {
        self.from_external_ontology
    }

    pub fn mark_external_ontology(&mut self) {
        self.from_external_ontology = true;
    }

    // ===== Derivados =====

    pub fn kind(&self) -> OrgKind {
        *self.kind_cache.get_or_init(|| {
            let profiles: Vec<OrgProfile> = self.profiles.iter().copied().collect();
            derive_kind(&self.types, &profiles, self.higher.is_some() || self.temp_parent.is_some())
        })
    }

    pub fn is_department(&self) -> bool {
        self.kind() == OrgKind::Department
    }

    /// Variantes de nome usadas na equivalência: variante → é sigla.
    pub fn name_variants(&self) -> &BTreeMap<String, bool> {
        self.variants_cache.get_or_init(|| self.compute_variants())
    }

    fn compute_variants(&self) -> BTreeMap<String, bool> {
        let mut vars: BTreeMap<String, bool> = BTreeMap::new();
        for (n, slot) in &self.names {
            vars.entry(n.clone()).or_insert(slot.is_abbr);
        }
        let kind = self.kind();
        for n in self.names.keys() {
            let stripped = strip_quotes(n);
            if !stripped.is_empty() {
                vars.entry(stripped).or_insert(false);
            }
            if kind == OrgKind::Bank && !n.contains("БАНК") {
                vars.entry(format!("{n}БАНК")).or_insert(false);
            }
            if let Some(acr) = abbreviation(n) {
                vars.entry(acr.clone()).or_insert(true);
                for geo in &self.geos {
                    if let Some(initial) = geo.name.chars().next() {
                        vars.entry(format!("{acr}{initial}")).or_insert(true);
                    }
                }
            }
            let words: Vec<&str> = n.split_whitespace().collect();
            if words.len() == 2 {
                vars.entry(words.concat()).or_insert(false);
            }
        }
        for e in &self.eponyms {
            for t in &self.types {
                vars.entry(normalize_name(&format!("{t} {e}"))).or_insert(false);
            }
        }
        let base: Vec<String> = vars.keys().cloned().collect();
        for t in &self.types {
            let upper = normalize_name(t);
            let acr = abbreviation(&upper);
            for v in &base {
                if let Some(a) = &acr {
                    if !v.starts_with(a.as_str()) {
                        vars.entry(format!("{a}{v}")).or_insert(true);
                        vars.entry(format!("{a} {v}")).or_insert(true);
                    }
                }
                vars.entry(format!("{upper} {v}")).or_insert(true);
            }
        }
        vars
    }

    /// Formas compactas (só letras e dígitos) das variantes completas, com mais de 4 caracteres.
    pub fn name_hashes(&self) -> BTreeSet<String> {
        self.name_variants()
            .iter()
            .filter(|(_, abbr)| !**abbr)
            .map(|(v, _)| v.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
            .filter(|h| h.chars().count() > 4)
            .collect()
    }

    /// Chaves de indexação no registro.
    pub fn index_keys(&self) -> BTreeSet<String> {
        let mut keys: BTreeSet<String> = self.names.keys().cloned().collect();
        for n in self.names.keys() {
            if let Some(acr) = abbreviation(n) {
                keys.insert(acr);
            }
            let stripped = strip_quotes(n);
            if !stripped.is_empty() {
                keys.insert(stripped);
            }
        }
        for t in &self.types {
            keys.insert(format!("@{t}"));
        }
        keys
    }

    // ===== Fusão =====

    /// Incorpora os slots de `other`; `higher`, `owner`, número e ids legais já presentes são mantidos.
    pub fn merge_from(&mut self, other: &OrganizationEntity) {
        for (n, slot) in &other.names {
            let mine = self.names.entry(n.clone()).or_default();
            mine.count += slot.count;
            mine.is_abbr |= slot.is_abbr;
        }
        for t in &other.types {
            if !self.types.contains(t) {
                self.types.push(t.clone());
            }
        }
        if self.number.is_none() {
            self.number = other.number.clone();
        }
        self.profiles.extend(other.profiles.iter().copied());
        self.eponyms.extend(other.eponyms.iter().cloned());
        for g in &other.geos {
            if !self.geos.iter().any(|mine| mine.can_be_equal(g)) {
                self.geos.push(g.clone());
            }
        }
        if self.higher.is_none() {
            self.higher = other.higher;
        }
        if self.owner.is_none() {
            self.owner = other.owner.clone();
        }
        if self.inn.is_none() {
            self.inn = other.inn.clone();
        }
        if self.ogrn.is_none() {
            self.ogrn = other.ogrn.clone();
        }
        self.markers.extend(other.markers.iter().cloned());
        if self.temp_parent.is_none() && self.higher.is_none() {
            self.temp_parent = other.temp_parent.clone();
        }
        self.from_external_ontology |= other.from_external_ontology;
        self.absorb_redundant_names();
        self.invalidate();
    }

    /// Siglas iguais às iniciais de outro nome do mesmo conjunto são absorvidas por ele.
    fn absorb_redundant_names(&mut self) {
        let derived: BTreeMap<String, String> = self
            .names
            .keys()
            .filter_map(|n| abbreviation(n).map(|a| (a, n.clone())))
            .collect();
        let redundant: Vec<(String, String)> = self
            .names
            .iter()
            .filter(|(_, slot)| slot.is_abbr)
            .filter_map(|(n, _)| derived.get(n).map(|full| (n.clone(), full.clone())))
            .collect();
        for (abbr, full) in redundant {
            if let Some(slot) = self.names.remove(&abbr) {
                if let Some(target) = self.names.get_mut(&full) {
                    target.count += slot.count;
                }
            }
        }
    }

    pub fn slot_content(&self) -> SlotContent {
        SlotContent {
            names: self.names.keys().cloned().collect(),
            types: self.types.clone(),
            number: self.number.clone(),
            profiles: self.profiles.clone(),
            eponyms: self.eponyms.clone(),
            geos: self.geos.iter().map(|g| g.name.clone()).collect(),
            higher: self.higher,
            owner: self.owner.clone(),
            inn: self.inn.clone(),
            ogrn: self.ogrn.clone(),
            markers: self.markers.clone(),
        }
    }

    // ===== Exibição =====

    /// `"Tipo Nome (Alt) №N им. Epônimo, Geo"`; a forma curta para após o nome.
    pub fn display_string(&self, short: bool) -> String {
        let mut out = String::new();
        if let Some(t) = self.types.iter().find(|t| t.contains(' ') || t.chars().any(char::is_lowercase)) {
            out.push_str(&capitalize(t));
        } else if let Some(t) = self.types.first() {
            out.push_str(t);
        }
        let dominant = self.dominant_name();
        if let Some(name) = dominant {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(name);
        }
        if short {
            return out;
        }
        let alternates: Vec<&str> = self
            .names
            .keys()
            .map(String::as_str)
            .filter(|n| Some(*n) != dominant)
            .collect();
        if !alternates.is_empty() {
            out.push_str(&format!(" ({})", alternates.join(", ")));
        }
        if let Some(num) = &self.number {
            out.push_str(&format!(" №{num}"));
        }
        if !self.eponyms.is_empty() {
            let eps: Vec<&str> = self.eponyms.iter().map(String::as_str).collect();
            out.push_str(&format!(" им. {}", eps.join(" и ")));
        }
        if let Some(geo) = self.geos.first() {
            out.push_str(&format!(", {}", capitalize(&geo.name)));
        }
        out
    }
}

/// `a` unida a `b`, preservando `higher`/`owner` de `a`.
pub fn merge(a: &OrganizationEntity, b: &OrganizationEntity) -> OrganizationEntity {
    let mut merged = a.clone();
    merged.merge_from(b);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ministry() -> OrganizationEntity {
        let mut e = OrganizationEntity::new();
        e.add_type("министерство");
        e.add_name("юстиции", false);
        e.add_profile(OrgProfile::State);
        e
    }

    #[test]
    fn test_names_are_normalized_and_counted() {
        let mut e = ministry();
        e.add_name("Юстиции  ", false);
        let (name, slot) = e.names().next().unwrap();
        assert_eq!(name, "ЮСТИЦИИ");
        assert_eq!(slot.count, 2);
        assert!(e.has_name("юстиции"));
    }

    #[test]
    fn test_kind_cache_invalidated_on_mutation() {
        let mut e = OrganizationEntity::new();
        e.add_type("комитет");
        assert_eq!(e.kind(), OrgKind::Government);
        e.set_higher_unchecked(Some(OrgId(3)));
        assert_eq!(e.kind(), OrgKind::Department);
        e.set_higher_unchecked(None);
        e.add_type("банк");
        assert_eq!(e.kind(), OrgKind::Government);
    }

    #[test]
    fn test_name_variants() {
        let mut e = OrganizationEntity::new();
        e.add_type("партия");
        e.add_name("Единая Россия", false);
        let vars = e.name_variants();
        assert_eq!(vars.get("ЕДИНАЯ РОССИЯ"), Some(&false));
        assert_eq!(vars.get("ЕР"), Some(&true));
        assert_eq!(vars.get("ЕДИНАЯРОССИЯ"), Some(&false));
        assert_eq!(vars.get("ПАРТИЯ ЕДИНАЯ РОССИЯ"), Some(&true));
    }

    #[test]
    fn test_variants_refresh_after_add_name() {
        let mut e = ministry();
        assert!(!e.name_variants().contains_key("ФИНАНСОВ"));
        e.add_name("финансов", false);
        assert!(e.name_variants().contains_key("ФИНАНСОВ"));
    }

    #[test]
    fn test_dominant_name_prefers_full_names() {
        let mut e = OrganizationEntity::new();
        e.add_name("МВД", true);
        e.add_name("МВД", true);
        e.add_name("Министерство внутренних дел", false);
        assert_eq!(e.dominant_name(), Some("МИНИСТЕРСТВО ВНУТРЕННИХ ДЕЛ"));
    }

    #[test]
    fn test_merge_keeps_first_higher_and_is_idempotent() {
        let mut a = ministry();
        a.set_higher_unchecked(Some(OrgId(1)));
        let mut b = ministry();
        b.set_higher_unchecked(Some(OrgId(2)));
        b.add_geo(GeoRef::state("Россия"));
        b.set_number("15");

        let m = merge(&a, &b);
        assert_eq!(m.higher(), Some(OrgId(1)));
        assert_eq!(m.geos().len(), 1);
        assert_eq!(m.number(), Some("15"));
        assert_eq!(merge(&m, &b).slot_content(), m.slot_content());
    }

    #[test]
    fn test_merge_absorbs_redundant_abbreviation() {
        let mut a = OrganizationEntity::new();
        a.add_name("Министерство внутренних дел", false);
        let mut b = OrganizationEntity::new();
        b.add_name("МВД", true);
        let m = merge(&a, &b);
        assert_eq!(m.names().count(), 1);
        assert!(m.name_variants().contains_key("МВД"));
    }

    #[test]
    fn test_display_string() {
        let mut e = OrganizationEntity::new();
        e.add_type("школа");
        e.set_number("15");
        e.add_eponym("ПУШКИН");
        e.add_geo(GeoRef::city("Москва", "Россия"));
        assert_eq!(e.display_string(false), "Школа №15 им. Пушкин, Москва");
        assert_eq!(e.display_string(true), "Школа");
    }
}
