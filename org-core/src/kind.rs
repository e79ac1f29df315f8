//! # Taxonomias: Perfil e Tipo Funcional (Kind)
//!
//! Vocabulários fechados usados na equivalência e na pontuação:
//!
//! - [`OrgProfile`]: marcação temática (estado, finanças, mídia, esporte...).
//! - [`OrgKind`]: categoria funcional derivada dos tipos/perfis por uma tabela
//!   declarativa ordenada ([`KIND_BY_TYPE`]), com poucas regras especiais.
//!
//! Também aqui: a lista de combinações de tipos **antagônicas** (ex: "ministério"
//! seguido de "clube"), usada tanto na acumulação de tipos quanto na equivalência.

use serde::{Deserialize, Serialize};

/// Perfil temático de uma organização.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgProfile {
    Unit,
    Union,
    Holding,
    State,
    Finance,
    Religion,
    Education,
    Science,
    Industry,
    Trade,
    Medicine,
    Policy,
    Justice,
    Enforcement,
    Army,
    Sport,
    Media,
    Press,
    Culture,
    Transport,
    Hotel,
    Business,
}

impl OrgProfile {
    pub fn name(&self) -> &'static str {
        match self {
            OrgProfile::Unit => "UNIT",
            OrgProfile::Union => "UNION",
            OrgProfile::Holding => "HOLDING",
            OrgProfile::State => "STATE",
            OrgProfile::Finance => "FINANCE",
            OrgProfile::Religion => "RELIGION",
            OrgProfile::Education => "EDUCATION",
            OrgProfile::Science => "SCIENCE",
            OrgProfile::Industry => "INDUSTRY",
            OrgProfile::Trade => "TRADE",
            OrgProfile::Medicine => "MEDICINE",
            OrgProfile::Policy => "POLICY",
            OrgProfile::Justice => "JUSTICE",
            OrgProfile::Enforcement => "ENFORCEMENT",
            OrgProfile::Army => "ARMY",
            OrgProfile::Sport => "SPORT",
            OrgProfile::Media => "MEDIA",
            OrgProfile::Press => "PRESS",
            OrgProfile::Culture => "CULTURE",
            OrgProfile::Transport => "TRANSPORT",
            OrgProfile::Hotel => "HOTEL",
            OrgProfile::Business => "BUSINESS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        const ALL: &[OrgProfile] = &[
            OrgProfile::Unit,
            OrgProfile::Union,
            OrgProfile::Holding,
            OrgProfile::State,
            OrgProfile::Finance,
            OrgProfile::Religion,
            OrgProfile::Education,
            OrgProfile::Science,
            OrgProfile::Industry,
            OrgProfile::Trade,
            OrgProfile::Medicine,
            OrgProfile::Policy,
            OrgProfile::Justice,
            OrgProfile::Enforcement,
            OrgProfile::Army,
            OrgProfile::Sport,
            OrgProfile::Media,
            OrgProfile::Press,
            OrgProfile::Culture,
            OrgProfile::Transport,
            OrgProfile::Hotel,
            OrgProfile::Business,
        ];
        ALL.iter().copied().find(|p| p.name().eq_ignore_ascii_case(s))
    }
}

/// Categoria funcional de uma organização.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgKind {
    #[default]
    Undefined,
    Government,
    Party,
    Study,
    Science,
    Press,
    Media,
    Factory,
    Bank,
    Culture,
    Medical,
    Church,
    Military,
    Airport,
    Seaport,
    Festival,
    Federation,
    Hotel,
    Justice,
    Department,
}

/// Fragmento de tipo → kind, em ordem de prioridade.
///
/// Um fragmento casa quando alguma palavra de algum tipo começa por ele
/// ("банк" casa "банка", mas "суд" não casa "государственный").
pub const KIND_BY_TYPE: &[(&str, OrgKind)] = &[
    ("следственный комитет", OrgKind::Justice),
    ("воинская часть", OrgKind::Military),
    ("главное управление", OrgKind::Department),
    ("факультет", OrgKind::Department),
    ("кафедра", OrgKind::Department),
    ("отдел", OrgKind::Department),
    ("сектор", OrgKind::Department),
    ("филиал", OrgKind::Department),
    ("лаборатория", OrgKind::Department),
    ("департамент", OrgKind::Department),
    ("управление", OrgKind::Department),
    ("department", OrgKind::Department),
    ("division", OrgKind::Department),
    ("министерство", OrgKind::Government),
    ("правительство", OrgKind::Government),
    ("администрация", OrgKind::Government),
    ("агентство", OrgKind::Government),
    ("служба", OrgKind::Government),
    ("комитет", OrgKind::Government),
    ("комиссия", OrgKind::Government),
    ("посольство", OrgKind::Government),
    ("консульство", OrgKind::Government),
    ("ministry", OrgKind::Government),
    ("government", OrgKind::Government),
    ("agency", OrgKind::Government),
    ("committee", OrgKind::Government),
    ("commission", OrgKind::Government),
    ("embassy", OrgKind::Government),
    ("прокуратура", OrgKind::Justice),
    ("суд", OrgKind::Justice),
    ("court", OrgKind::Justice),
    ("партия", OrgKind::Party),
    ("party", OrgKind::Party),
    ("университет", OrgKind::Study),
    ("академия", OrgKind::Study),
    ("школа", OrgKind::Study),
    ("лицей", OrgKind::Study),
    ("гимназия", OrgKind::Study),
    ("колледж", OrgKind::Study),
    ("university", OrgKind::Study),
    ("college", OrgKind::Study),
    ("school", OrgKind::Study),
    ("институт", OrgKind::Science),
    ("institute", OrgKind::Science),
    ("газета", OrgKind::Press),
    ("журнал", OrgKind::Press),
    ("newspaper", OrgKind::Press),
    ("телеканал", OrgKind::Media),
    ("радиостанция", OrgKind::Media),
    ("информагентство", OrgKind::Media),
    ("завод", OrgKind::Factory),
    ("фабрика", OrgKind::Factory),
    ("комбинат", OrgKind::Factory),
    ("factory", OrgKind::Factory),
    ("банк", OrgKind::Bank),
    ("bank", OrgKind::Bank),
    ("театр", OrgKind::Culture),
    ("музей", OrgKind::Culture),
    ("theatre", OrgKind::Culture),
    ("museum", OrgKind::Culture),
    ("больница", OrgKind::Medical),
    ("поликлиника", OrgKind::Medical),
    ("hospital", OrgKind::Medical),
    ("церковь", OrgKind::Church),
    ("church", OrgKind::Church),
    ("полк", OrgKind::Military),
    ("дивизия", OrgKind::Military),
    ("бригада", OrgKind::Military),
    ("аэропорт", OrgKind::Airport),
    ("airport", OrgKind::Airport),
    ("морской порт", OrgKind::Seaport),
    ("фестиваль", OrgKind::Festival),
    ("festival", OrgKind::Festival),
    ("федерация", OrgKind::Federation),
    ("federation", OrgKind::Federation),
    ("гостиница", OrgKind::Hotel),
    ("hotel", OrgKind::Hotel),
];

/// Perfil → kind, usado quando nenhum tipo decide.
pub const KIND_BY_PROFILE: &[(OrgProfile, OrgKind)] = &[
    (OrgProfile::Policy, OrgKind::Party),
    (OrgProfile::Press, OrgKind::Press),
    (OrgProfile::Media, OrgKind::Media),
    (OrgProfile::Education, OrgKind::Study),
    (OrgProfile::Science, OrgKind::Science),
    (OrgProfile::Army, OrgKind::Military),
    (OrgProfile::Justice, OrgKind::Justice),
    (OrgProfile::Religion, OrgKind::Church),
    (OrgProfile::Medicine, OrgKind::Medical),
    (OrgProfile::Finance, OrgKind::Bank),
    (OrgProfile::State, OrgKind::Government),
];

/// Pares de tipos que não podem designar a mesma organização.
pub const ANTAGONISTIC_TYPES: &[(&str, &str)] = &[
    ("министерство", "клуб"),
    ("министерство", "банк"),
    ("министерство", "завод"),
    ("банк", "партия"),
    ("банк", "суд"),
    ("банк", "больница"),
    ("банк", "театр"),
    ("партия", "клуб"),
    ("школа", "завод"),
    ("университет", "завод"),
    ("суд", "партия"),
    ("ministry", "club"),
    ("bank", "party"),
    ("bank", "court"),
];

/// Alguma palavra de `typ` começa por `fragment` (fragmentos de várias palavras casam por conteúdo).
fn fragment_matches(typ: &str, fragment: &str) -> bool {
    if fragment.contains(' ') {
        return typ.contains(fragment);
    }
    typ.split_whitespace().any(|w| w.starts_with(fragment))
}

/// Kind sugerido por um único rótulo de tipo.
pub fn kind_of_type(typ: &str) -> OrgKind {
    let typ = typ.to_lowercase();
    KIND_BY_TYPE
        .iter()
        .find(|(frag, _)| fragment_matches(&typ, frag))
        .map(|(_, k)| *k)
        .unwrap_or_default()
}

/// Deriva o kind de uma organização a partir de tipos, perfis e da existência de superior.
pub fn derive_kind(types: &[String], profiles: &[OrgProfile], has_higher: bool) -> OrgKind {
    let lowered: Vec<String> = types.iter().map(|t| t.to_lowercase()).collect();
    let mut kind = KIND_BY_TYPE
        .iter()
        .find(|(frag, _)| lowered.iter().any(|t| fragment_matches(t, frag)))
        .map(|(_, k)| *k)
        .unwrap_or_default();

    if kind == OrgKind::Undefined {
        kind = KIND_BY_PROFILE
            .iter()
            .find(|(p, _)| profiles.contains(p))
            .map(|(_, k)| *k)
            .unwrap_or_default();
    }

    // Comitê/comissão subordinado funciona como departamento
    if kind == OrgKind::Government
        && has_higher
        && lowered
            .iter()
            .any(|t| fragment_matches(t, "комитет") || fragment_matches(t, "комиссия"))
    {
        return OrgKind::Department;
    }
    // Departamento/administração de topo, sem superior e com perfil estatal
    if kind == OrgKind::Department
        && !has_higher
        && profiles.contains(&OrgProfile::State)
        && lowered
            .iter()
            .all(|t| !fragment_matches(t, "отдел") && !fragment_matches(t, "главное управление"))
    {
        return OrgKind::Government;
    }
    kind
}

/// Dois rótulos de tipo são mutuamente exclusivos.
pub fn types_antagonistic(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return false;
    }
    let listed = ANTAGONISTIC_TYPES.iter().any(|(x, y)| {
        (fragment_matches(&a, x) && fragment_matches(&b, y))
            || (fragment_matches(&a, y) && fragment_matches(&b, x))
    });
    if listed {
        return true;
    }
    let (ka, kb) = (kind_of_type(&a), kind_of_type(&b));
    ka != kb
        && ka != OrgKind::Undefined
        && kb != OrgKind::Undefined
        && ka != OrgKind::Department
        && kb != OrgKind::Department
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_kind_from_types() {
        assert_eq!(derive_kind(&types(&["министерство"]), &[], false), OrgKind::Government);
        assert_eq!(derive_kind(&types(&["отдел"]), &[], true), OrgKind::Department);
        assert_eq!(derive_kind(&types(&["государственный университет"]), &[], false), OrgKind::Study);
        assert_eq!(derive_kind(&types(&["компания"]), &[OrgProfile::Industry], false), OrgKind::Undefined);
    }

    #[test]
    fn test_word_prefix_matching() {
        // "государственный" contém "суд", mas não começa por ele
        assert_eq!(kind_of_type("государственный комитет"), OrgKind::Government);
        assert_eq!(kind_of_type("суд"), OrgKind::Justice);
    }

    #[test]
    fn test_committee_with_higher_is_department() {
        assert_eq!(derive_kind(&types(&["комитет"]), &[], true), OrgKind::Department);
        assert_eq!(derive_kind(&types(&["комитет"]), &[], false), OrgKind::Government);
    }

    #[test]
    fn test_antagonistic_types() {
        assert!(types_antagonistic("министерство", "футбольный клуб"));
        assert!(types_antagonistic("банк", "партия"));
        assert!(types_antagonistic("университет", "банк"));
        assert!(!types_antagonistic("отдел", "министерство"));
        assert!(!types_antagonistic("банк", "банк"));
    }

    #[test]
    fn test_profile_round_trip_name() {
        assert_eq!(OrgProfile::from_str("state"), Some(OrgProfile::State));
        assert_eq!(OrgProfile::State.name(), "STATE");
        assert_eq!(OrgProfile::from_str("nope"), None);
    }
}
