//! # Léxico
//!
//! Todos os dicionários do motor reunidos num valor imutável, construído uma vez
//! e passado por referência a cada classificador:
//!
//! - **Tipos** de organização ("министерство", "ООО", "отдел"...) com seus
//!   atributos ([`OrgTypeInfo`]).
//! - **Registro global** de organizações conhecidas (МВД, Газпром, ООН...).
//! - **Nomes-padrão** (partidos, mídia, clubes) com perfil.
//! - **Sufixos-padrão** latinos (Inc, Ltd, GmbH...).
//! - Marcadores: ramos militares, "имени", "далее", "№", "ИНН"/"ОГРН".
//!
//! O léxico embutido cobre russo e inglês. Entradas adicionais podem ser
//! carregadas de JSON via [`LexiconBuilder::extend_json`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kind::OrgProfile;
use crate::number_token::LegalIdKind;
use crate::referent::GeoRef;
use crate::termin::{Termin, TerminCollection};
use crate::token::normalize_term;

/// Classe de um termo de tipo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeClass {
    /// Organização completa ("министерство", "банк").
    #[default]
    Org,
    /// Subdivisão ("отдел", "кафедра").
    Dep,
    /// Forma jurídica que precede o nome ("ООО", "ОАО").
    Prefix,
}

/// Atributos de um tipo de organização.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgTypeInfo {
    /// Rótulo em minúsculas gravado na entidade.
    pub label: String,
    pub class: TypeClass,
    /// Contribuição do tipo para a pontuação.
    pub coeff: f64,
    pub profiles: Vec<OrgProfile>,
    /// Adjetivo que só qualifica outro tipo ("государственный").
    pub pure_prefix: bool,
    pub can_has_number: bool,
    pub can_has_latin_name: bool,
    /// Pode aparecer sozinho com maiúscula ("Правительство").
    pub is_top: bool,
    /// Substantivo comum ambíguo ("компания", "школа").
    pub is_doubt_word: bool,
    /// Exige âncora geográfica (embaixadas, consulados).
    pub requires_geo: bool,
    /// Admite plural numa enumeração ("министерства юстиции и финансов").
    pub pluralizable: bool,
    /// Pode vir depois do nome ("Acme Bank").
    pub name_first: bool,
    /// Chave da organização global que é superior implícita ("МВД" para "ГУВД").
    pub implied_parent: Option<String>,
    /// Nome é uma pessoa, que vira dona da entidade ("ИП Пушкин").
    pub person_owned: bool,
}

impl Default for OrgTypeInfo {
    fn default() -> Self {
        OrgTypeInfo {
            label: String::new(),
            class: TypeClass::Org,
            coeff: 1.0,
            profiles: Vec::new(),
            pure_prefix: false,
            can_has_number: false,
            can_has_latin_name: false,
            is_top: false,
            is_doubt_word: false,
            requires_geo: false,
            pluralizable: false,
            name_first: false,
            implied_parent: None,
            person_owned: false,
        }
    }
}

impl OrgTypeInfo {
    pub fn new(label: &str, class: TypeClass, coeff: f64) -> Self {
        OrgTypeInfo {
            label: label.to_string(),
            class,
            coeff,
            ..Default::default()
        }
    }

    pub fn profile(mut self, p: OrgProfile) -> Self {
        self.profiles.push(p);
        self
    }

    pub fn number(mut self) -> Self {
        self.can_has_number = true;
        self
    }

    pub fn latin(mut self) -> Self {
        self.can_has_latin_name = true;
        self
    }

    pub fn top(mut self) -> Self {
        self.is_top = true;
        self
    }

    pub fn doubt(mut self) -> Self {
        self.is_doubt_word = true;
        self
    }

    pub fn geo(mut self) -> Self {
        self.requires_geo = true;
        self
    }

    pub fn plural(mut self) -> Self {
        self.pluralizable = true;
        self
    }

    pub fn suffix(mut self) -> Self {
        self.name_first = true;
        self
    }

    pub fn person(mut self) -> Self {
        self.person_owned = true;
        self
    }

    pub fn parent(mut self, key: &str) -> Self {
        self.implied_parent = Some(normalize_term(key));
        self
    }
}

/// Organização do registro global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalOrg {
    pub key: String,
    pub names: Vec<String>,
    #[serde(default)]
    pub acronyms: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub profiles: Vec<OrgProfile>,
    #[serde(default)]
    pub geo: Option<GeoRef>,
    /// Chave de outra organização global que a subordina.
    #[serde(default)]
    pub higher: Option<String>,
}

impl GlobalOrg {
    fn new(key: &str, names: &[&str], types: &[&str], profiles: &[OrgProfile]) -> Self {
        GlobalOrg {
            key: normalize_term(key),
            names: names.iter().map(|n| normalize_term(n)).collect(),
            acronyms: Vec::new(),
            types: types.iter().map(|t| t.to_string()).collect(),
            profiles: profiles.to_vec(),
            geo: None,
            higher: None,
        }
    }

    fn acronym(mut self, acr: &str) -> Self {
        self.acronyms.push(normalize_term(acr));
        self
    }

    fn located(mut self, geo: GeoRef) -> Self {
        self.geo = Some(geo);
        self
    }
}

/// Dados de um nome-padrão.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdName {
    pub profile: OrgProfile,
    /// Tipo implícito ("партия" para "Единая Россия").
    #[serde(default)]
    pub type_hint: Option<String>,
}

/// Entrada de tipo no JSON de extensão.
#[derive(Debug, Clone, Deserialize)]
struct TypeEntry {
    canonic: String,
    #[serde(default)]
    acronym: Option<String>,
    #[serde(default)]
    variants: Vec<String>,
    #[serde(flatten)]
    info: OrgTypeInfo,
}

#[derive(Debug, Clone, Deserialize)]
struct StdNameEntry {
    name: String,
    #[serde(default)]
    variants: Vec<String>,
    #[serde(flatten)]
    data: StdName,
}

/// Formato do JSON de extensão.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LexiconExtension {
    types: Vec<TypeEntry>,
    globals: Vec<GlobalOrg>,
    std_names: Vec<StdNameEntry>,
}

/// Dicionários do motor, imutáveis após a construção.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    pub types: TerminCollection<OrgTypeInfo>,
    pub globals: Vec<GlobalOrg>,
    /// Nomes e siglas das organizações globais → índice em `globals`.
    pub global_terms: TerminCollection<usize>,
    pub std_names: TerminCollection<StdName>,
    /// Sufixos latinos → rótulo de tipo.
    pub std_tails: TerminCollection<String>,
    pub markers: TerminCollection<()>,
    pub eponym_markers: TerminCollection<()>,
    pub alias_markers: TerminCollection<()>,
    pub number_markers: TerminCollection<()>,
    pub legal_markers: TerminCollection<LegalIdKind>,
}

impl Lexicon {
    /// Léxico embutido (russo e inglês).
    pub fn builtin() -> Self {
        let mut b = LexiconBuilder::new();
        builtin_types(&mut b);
        builtin_globals(&mut b);
        builtin_std_names(&mut b);
        builtin_markers(&mut b);
        b.build()
    }

    pub fn builder() -> LexiconBuilder {
        LexiconBuilder::new()
    }

    pub fn global(&self, key: &str) -> Option<&GlobalOrg> {
        let key = normalize_term(key);
        self.globals.iter().find(|g| g.key == key)
    }

    pub fn global_at(&self, index: usize) -> Option<&GlobalOrg> {
        self.globals.get(index)
    }
}

/// Construtor do [`Lexicon`].
#[derive(Debug, Default)]
pub struct LexiconBuilder {
    lexicon: Lexicon,
}

impl LexiconBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona um termo de tipo; o rótulo vazio vira o canônico em minúsculas.
    pub fn add_type(&mut self, mut termin: Termin<OrgTypeInfo>) -> &mut Self {
        if termin.tag.label.is_empty() {
            termin.tag.label = termin.canonic.to_lowercase();
        }
        self.lexicon.types.add(termin);
        self
    }

    pub fn add_global(&mut self, global: GlobalOrg) -> &mut Self {
        let index = self.lexicon.globals.len();
        for name in &global.names {
            self.lexicon.global_terms.add(Termin::new(name, index));
        }
        for acr in &global.acronyms {
            self.lexicon
                .global_terms
                .add(Termin::acronym_only(acr, index));
        }
        self.lexicon.globals.push(global);
        self
    }

    pub fn add_std_name(&mut self, termin: Termin<StdName>) -> &mut Self {
        self.lexicon.std_names.add(termin);
        self
    }

    pub fn add_std_tail(&mut self, tail: &str, type_label: &str) -> &mut Self {
        self.lexicon
            .std_tails
            .add(Termin::new(tail, type_label.to_string()));
        self
    }

    /// Carrega tipos, organizações globais e nomes-padrão de um JSON.
    pub fn extend_json(&mut self, json: &str) -> Result<&mut Self> {
        let ext: LexiconExtension = serde_json::from_str(json)?;

        for entry in ext.types {
            if entry.canonic.trim().is_empty() {
                return Err(Error::lexicon("type entry with empty canonic form"));
            }
            if !entry.info.coeff.is_finite() {
                return Err(Error::lexicon(format!("non-finite coeff for type '{}'", entry.canonic)));
            }
            let mut termin = Termin::new(&entry.canonic, entry.info);
            for v in &entry.variants {
                termin = termin.with_variant(v);
            }
            if let Some(acr) = &entry.acronym {
                termin = termin.with_acronym(acr);
            }
            self.add_type(termin);
        }

        for mut global in ext.globals {
            if global.names.is_empty() && global.acronyms.is_empty() {
                return Err(Error::lexicon(format!("global '{}' has no names", global.key)));
            }
            global.key = normalize_term(&global.key);
            global.names = global.names.iter().map(|n| normalize_term(n)).collect();
            global.acronyms = global.acronyms.iter().map(|n| normalize_term(n)).collect();
            self.add_global(global);
        }

        for entry in ext.std_names {
            if entry.name.trim().is_empty() {
                return Err(Error::lexicon("std name entry with empty name"));
            }
            let mut termin = Termin::new(&entry.name, entry.data);
            for v in &entry.variants {
                termin = termin.with_variant(v);
            }
            self.add_std_name(termin);
        }
        Ok(self)
    }

    pub fn build(self) -> Lexicon {
        self.lexicon
    }
}

fn ty(canonic: &str, class: TypeClass, coeff: f64, f: impl FnOnce(OrgTypeInfo) -> OrgTypeInfo) -> Termin<OrgTypeInfo> {
    Termin::new(canonic, f(OrgTypeInfo::new("", class, coeff)))
}

fn builtin_types(b: &mut LexiconBuilder) {
    use OrgProfile::*;
    use TypeClass::{Dep, Org, Prefix};

    // ===== Órgãos de Estado =====
    b.add_type(ty("МИНИСТЕРСТВО", Org, 3.0, |i| i.profile(State).top().plural()));
    b.add_type(ty("ПРАВИТЕЛЬСТВО", Org, 3.0, |i| i.profile(State).top()));
    b.add_type(ty("АДМИНИСТРАЦИЯ", Org, 2.0, |i| i.profile(State).top().doubt()));
    b.add_type(ty("ФЕДЕРАЛЬНАЯ СЛУЖБА", Org, 3.0, |i| i.profile(State).top()));
    b.add_type(ty("СЛУЖБА", Org, 1.0, |i| i.doubt()));
    b.add_type(ty("ФЕДЕРАЛЬНОЕ АГЕНТСТВО", Org, 3.0, |i| i.profile(State).top()));
    b.add_type(ty("АГЕНТСТВО", Org, 2.0, |i| i));
    b.add_type(ty("КОМИТЕТ", Org, 2.0, |i| i.plural()));
    b.add_type(ty("ГОСУДАРСТВЕННЫЙ КОМИТЕТ", Org, 3.0, |i| i.profile(State)));
    b.add_type(ty("СЛЕДСТВЕННЫЙ КОМИТЕТ", Org, 3.0, |i| i.profile(Justice).profile(Enforcement).top()));
    b.add_type(ty("КОМИССИЯ", Org, 2.0, |i| i.plural()));
    b.add_type(ty("ПРОКУРАТУРА", Org, 3.0, |i| i.profile(Justice).top()));
    b.add_type(ty("СУД", Org, 2.0, |i| i.profile(Justice)));
    b.add_type(ty("ВЕРХОВНЫЙ СУД", Org, 3.0, |i| i.profile(Justice).top()));
    b.add_type(ty("АРБИТРАЖНЫЙ СУД", Org, 3.0, |i| i.profile(Justice)));
    b.add_type(ty("ПОСОЛЬСТВО", Org, 3.0, |i| i.profile(State).geo()));
    b.add_type(ty("КОНСУЛЬСТВО", Org, 3.0, |i| i.profile(State).geo()));
    b.add_type(ty("ПАРТИЯ", Org, 2.0, |i| i.profile(Policy)));

    // ===== Economia =====
    b.add_type(ty("БАНК", Org, 2.0, |i| i.profile(Finance).latin().suffix()));
    b.add_type(ty("КОМПАНИЯ", Org, 1.0, |i| i.doubt().latin()));
    b.add_type(ty("КОРПОРАЦИЯ", Org, 2.0, |i| i.latin()));
    b.add_type(ty("ХОЛДИНГ", Org, 2.0, |i| i.profile(Holding).latin()));
    b.add_type(ty("ЗАВОД", Org, 2.0, |i| i.profile(Industry).number()));
    b.add_type(ty("ФАБРИКА", Org, 2.0, |i| i.profile(Industry).number()));
    b.add_type(ty("КОМБИНАТ", Org, 2.0, |i| i.profile(Industry)));
    b.add_type(ty("ФОНД", Org, 1.0, |i| i.profile(Finance).doubt()));
    b.add_type(ty("ОРГАНИЗАЦИЯ", Org, 1.0, |i| i.doubt()));
    b.add_type(ty("ПРЕДПРИЯТИЕ", Org, 1.0, |i| i.doubt().number()));
    b.add_type(ty("АЭРОПОРТ", Org, 2.0, |i| i.profile(Transport)));
    b.add_type(ty("ГОСТИНИЦА", Org, 2.0, |i| i.profile(Hotel)));

    // ===== Educação, ciência, cultura, saúde =====
    b.add_type(ty("УНИВЕРСИТЕТ", Org, 3.0, |i| i.profile(Education)));
    b.add_type(ty("АКАДЕМИЯ", Org, 2.0, |i| i.profile(Education)));
    b.add_type(ty("ИНСТИТУТ", Org, 2.0, |i| i.profile(Science)));
    b.add_type(ty("ШКОЛА", Org, 2.0, |i| i.profile(Education).number().doubt()));
    b.add_type(ty("ЛИЦЕЙ", Org, 2.0, |i| i.profile(Education).number()));
    b.add_type(ty("ГИМНАЗИЯ", Org, 2.0, |i| i.profile(Education).number()));
    b.add_type(ty("БОЛЬНИЦА", Org, 2.0, |i| i.profile(Medicine).number()));
    b.add_type(ty("ПОЛИКЛИНИКА", Org, 2.0, |i| i.profile(Medicine).number()));
    b.add_type(ty("ТЕАТР", Org, 2.0, |i| i.profile(Culture)));
    b.add_type(ty("МУЗЕЙ", Org, 2.0, |i| i.profile(Culture)));
    b.add_type(ty("ФЕСТИВАЛЬ", Org, 2.0, |i| i.profile(Culture)));
    b.add_type(ty("ЦЕРКОВЬ", Org, 2.0, |i| i.profile(Religion)));

    // ===== Mídia e esporte =====
    b.add_type(ty("ГАЗЕТА", Org, 2.0, |i| i.profile(Press)));
    b.add_type(ty("ЖУРНАЛ", Org, 1.0, |i| i.profile(Press).doubt()));
    b.add_type(ty("ТЕЛЕКАНАЛ", Org, 2.0, |i| i.profile(Media)));
    b.add_type(ty("ИНФОРМАГЕНТСТВО", Org, 2.0, |i| i.profile(Media)));
    b.add_type(ty("КЛУБ", Org, 1.0, |i| i.doubt()));
    b.add_type(ty("ФУТБОЛЬНЫЙ КЛУБ", Org, 3.0, |i| i.profile(Sport)).with_acronym("ФК"));

    // ===== Forças armadas =====
    b.add_type(ty("ВОИНСКАЯ ЧАСТЬ", Org, 3.0, |i| i.profile(Army).number()));
    b.add_type(ty("ПОЛК", Org, 2.0, |i| i.profile(Army).number()));
    b.add_type(ty("ДИВИЗИЯ", Org, 2.0, |i| i.profile(Army).number()));
    b.add_type(ty("БРИГАДА", Org, 2.0, |i| i.profile(Army).number()));

    // ===== Adjetivos que só qualificam =====
    for adj in [
        "ГОСУДАРСТВЕННЫЙ",
        "ФЕДЕРАЛЬНЫЙ",
        "МУНИЦИПАЛЬНЫЙ",
        "МЕЖДУНАРОДНЫЙ",
        "НАЦИОНАЛЬНЫЙ",
        "ОБЛАСТНОЙ",
        "ГОРОДСКОЙ",
        "STATE",
        "FEDERAL",
        "NATIONAL",
        "INTERNATIONAL",
    ] {
        b.add_type(ty(adj, Org, 0.0, |mut i| {
            i.pure_prefix = true;
            i
        }));
    }

    // ===== Formas jurídicas =====
    b.add_type(ty("ОБЩЕСТВО С ОГРАНИЧЕННОЙ ОТВЕТСТВЕННОСТЬЮ", Prefix, 3.0, |i| i.profile(Business)).with_acronym("ООО"));
    b.add_type(ty("ОТКРЫТОЕ АКЦИОНЕРНОЕ ОБЩЕСТВО", Prefix, 3.0, |i| i.profile(Business)).with_acronym("ОАО"));
    b.add_type(ty("ЗАКРЫТОЕ АКЦИОНЕРНОЕ ОБЩЕСТВО", Prefix, 3.0, |i| i.profile(Business)).with_acronym("ЗАО"));
    b.add_type(ty("ПУБЛИЧНОЕ АКЦИОНЕРНОЕ ОБЩЕСТВО", Prefix, 3.0, |i| i.profile(Business)).with_acronym("ПАО"));
    b.add_type(ty("АКЦИОНЕРНОЕ ОБЩЕСТВО", Prefix, 3.0, |i| i.profile(Business)).with_acronym("АО"));
    b.add_type(ty("ИНДИВИДУАЛЬНЫЙ ПРЕДПРИНИМАТЕЛЬ", Prefix, 3.0, |i| i.profile(Business).person()).with_acronym("ИП"));
    b.add_type(ty("АВТОНОМНАЯ НЕКОММЕРЧЕСКАЯ ОРГАНИЗАЦИЯ", Prefix, 3.0, |i| i).with_acronym("АНО"));
    b.add_type(ty("АКЦИОНЕРНЫЙ КОММЕРЧЕСКИЙ БАНК", Prefix, 3.0, |i| i.profile(Finance)).with_acronym("АКБ"));
    b.add_type(ty("LIMITED LIABILITY COMPANY", Prefix, 3.0, |i| i.profile(Business)).with_acronym("LLC"));
    b.add_type(ty("JOINT STOCK COMPANY", Prefix, 3.0, |i| i.profile(Business)).with_acronym("JSC"));

    // ===== Subdivisões =====
    b.add_type(ty("ОТДЕЛ", Dep, 2.0, |i| i));
    b.add_type(ty("ОТДЕЛЕНИЕ", Dep, 2.0, |i| i.number()));
    b.add_type(ty("УПРАВЛЕНИЕ", Dep, 1.0, |i| i.doubt()));
    b.add_type(ty("ДЕПАРТАМЕНТ", Dep, 2.0, |i| i));
    b.add_type(ty("СЕКТОР", Dep, 1.0, |i| i.doubt()));
    b.add_type(ty("ФИЛИАЛ", Dep, 2.0, |i| i));
    b.add_type(ty("ФАКУЛЬТЕТ", Dep, 2.0, |i| i.profile(Education)));
    b.add_type(ty("КАФЕДРА", Dep, 2.0, |i| i.profile(Education)));
    b.add_type(ty("ЛАБОРАТОРИЯ", Dep, 1.0, |i| i.profile(Science)));
    b.add_type(ty("ГЛАВНОЕ УПРАВЛЕНИЕ ВНУТРЕННИХ ДЕЛ", Dep, 3.0, |i| i.profile(Enforcement).geo().parent("МВД")).with_acronym("ГУВД"));
    b.add_type(ty("УПРАВЛЕНИЕ ВНУТРЕННИХ ДЕЛ", Dep, 3.0, |i| i.profile(Enforcement).geo().parent("МВД")).with_acronym("УВД"));
    b.add_type(ty("ОТДЕЛ ВНУТРЕННИХ ДЕЛ", Dep, 3.0, |i| i.profile(Enforcement).geo().parent("МВД")).with_acronym("ОВД"));
    b.add_type(ty("УПРАВЛЕНИЕ ФЕДЕРАЛЬНОЙ СЛУЖБЫ БЕЗОПАСНОСТИ", Dep, 3.0, |i| i.profile(Enforcement).geo().parent("ФСБ")).with_acronym("УФСБ"));

    // ===== Inglês =====
    b.add_type(ty("MINISTRY", Org, 3.0, |i| i.profile(State).top().plural()).with_variant("MINISTRIES"));
    b.add_type(ty("GOVERNMENT", Org, 3.0, |i| i.profile(State).top()));
    b.add_type(ty("AGENCY", Org, 2.0, |i| i.suffix()));
    b.add_type(ty("COMMITTEE", Org, 2.0, |i| i.plural()));
    b.add_type(ty("COMMISSION", Org, 2.0, |i| i));
    b.add_type(ty("COURT", Org, 2.0, |i| i.profile(Justice)));
    b.add_type(ty("EMBASSY", Org, 3.0, |i| i.profile(State).geo()));
    b.add_type(ty("PARTY", Org, 2.0, |i| i.profile(Policy).doubt().suffix()));
    b.add_type(ty("BANK", Org, 2.0, |i| i.profile(Finance).latin().suffix()));
    b.add_type(ty("COMPANY", Org, 1.0, |i| i.doubt().latin().suffix()));
    b.add_type(ty("CORPORATION", Org, 2.0, |i| i.latin().suffix()));
    b.add_type(ty("UNIVERSITY", Org, 3.0, |i| i.profile(Education).suffix()));
    b.add_type(ty("COLLEGE", Org, 2.0, |i| i.profile(Education).suffix()));
    b.add_type(ty("INSTITUTE", Org, 2.0, |i| i.profile(Science).suffix()));
    b.add_type(ty("HOSPITAL", Org, 2.0, |i| i.profile(Medicine).suffix()));
    b.add_type(ty("NEWSPAPER", Org, 2.0, |i| i.profile(Press)));
    b.add_type(ty("FOOTBALL CLUB", Org, 3.0, |i| i.profile(Sport).suffix()).with_acronym("FC"));
    b.add_type(ty("DEPARTMENT", Dep, 2.0, |i| i));
    b.add_type(ty("DIVISION", Dep, 1.0, |i| i.doubt()));
}

fn builtin_globals(b: &mut LexiconBuilder) {
    use OrgProfile::*;
    let russia = GeoRef::state("РОССИЯ");

    b.add_global(GlobalOrg::new("МВД", &["МИНИСТЕРСТВО ВНУТРЕННИХ ДЕЛ"], &["министерство"], &[State, Enforcement]).acronym("МВД").located(russia.clone()));
    b.add_global(GlobalOrg::new("ФСБ", &["ФЕДЕРАЛЬНАЯ СЛУЖБА БЕЗОПАСНОСТИ"], &["федеральная служба"], &[State, Enforcement]).acronym("ФСБ").located(russia.clone()));
    b.add_global(GlobalOrg::new("МИД", &["МИНИСТЕРСТВО ИНОСТРАННЫХ ДЕЛ"], &["министерство"], &[State]).acronym("МИД").located(russia.clone()));
    b.add_global(GlobalOrg::new("МЧС", &["МИНИСТЕРСТВО ПО ЧРЕЗВЫЧАЙНЫМ СИТУАЦИЯМ"], &["министерство"], &[State]).acronym("МЧС").located(russia.clone()));
    b.add_global(GlobalOrg::new("ЦБ", &["ЦЕНТРАЛЬНЫЙ БАНК", "БАНК РОССИИ"], &["банк"], &[Finance, State]).acronym("ЦБ").located(russia.clone()));
    b.add_global(GlobalOrg::new("ГАЗПРОМ", &["ГАЗПРОМ"], &["компания"], &[Industry]));
    b.add_global(GlobalOrg::new("СБЕРБАНК", &["СБЕРБАНК"], &["банк"], &[Finance]));
    b.add_global(GlobalOrg::new("РОСНЕФТЬ", &["РОСНЕФТЬ"], &["компания"], &[Industry]));
    b.add_global(GlobalOrg::new("ЛУКОЙЛ", &["ЛУКОЙЛ"], &["компания"], &[Industry]));
    b.add_global(GlobalOrg::new("АЭРОФЛОТ", &["АЭРОФЛОТ"], &["компания"], &[Transport]));
    b.add_global(GlobalOrg::new("ООН", &["ОРГАНИЗАЦИЯ ОБЪЕДИНЕННЫХ НАЦИЙ", "UNITED NATIONS"], &["организация"], &[Union]).acronym("ООН").acronym("UN"));
    b.add_global(GlobalOrg::new("НАТО", &["НАТО", "NATO"], &["организация"], &[Army, Union]));
    b.add_global(GlobalOrg::new("ЮНЕСКО", &["ЮНЕСКО", "UNESCO"], &["организация"], &[Union, Culture]));
    b.add_global(GlobalOrg::new("GOOGLE", &["GOOGLE"], &["company"], &[Business]));
    b.add_global(GlobalOrg::new("MICROSOFT", &["MICROSOFT"], &["company"], &[Business]));
}

fn builtin_std_names(b: &mut LexiconBuilder) {
    use OrgProfile::*;
    let rows: &[(&str, OrgProfile, &str)] = &[
        ("ЕДИНАЯ РОССИЯ", Policy, "партия"),
        ("СПРАВЕДЛИВАЯ РОССИЯ", Policy, "партия"),
        ("КПРФ", Policy, "партия"),
        ("ЛДПР", Policy, "партия"),
        ("ЯБЛОКО", Policy, "партия"),
        ("КОММЕРСАНТЪ", Press, "газета"),
        ("ВЕДОМОСТИ", Press, "газета"),
        ("ИЗВЕСТИЯ", Press, "газета"),
        ("НОВАЯ ГАЗЕТА", Press, "газета"),
        ("ИНТЕРФАКС", Media, "информагентство"),
        ("ТАСС", Media, "информагентство"),
        ("РИА НОВОСТИ", Media, "информагентство"),
        ("REUTERS", Media, "agency"),
        ("BBC", Media, "company"),
        ("СПАРТАК", Sport, "клуб"),
        ("ЦСКА", Sport, "клуб"),
        ("ЗЕНИТ", Sport, "клуб"),
        ("ДИНАМО", Sport, "клуб"),
        ("ЛОКОМОТИВ", Sport, "клуб"),
    ];
    for (name, profile, hint) in rows {
        b.add_std_name(Termin::new(
            name,
            StdName {
                profile: *profile,
                type_hint: Some(hint.to_string()),
            },
        ));
    }
}

fn builtin_markers(b: &mut LexiconBuilder) {
    for tail in ["INC", "INC.", "LTD", "LTD.", "LIMITED", "LLC", "CORP", "CORP.", "GMBH", "AG", "PLC", "CO."] {
        b.add_std_tail(tail, "company");
    }

    let lex = &mut b.lexicon;
    for m in [
        "МОРСКОЙ",
        "ВОЗДУШНЫЙ",
        "ДЕСАНТНЫЙ",
        "ТАНКОВЫЙ",
        "АРТИЛЛЕРИЙСКИЙ",
        "АВИАЦИОННЫЙ",
        "РАКЕТНЫЙ",
        "МОТОСТРЕЛКОВЫЙ",
        "СТРЕЛКОВЫЙ",
        "ПЕХОТНЫЙ",
    ] {
        lex.markers.add(Termin::new(m, ()));
    }
    lex.eponym_markers.add(Termin::new("ИМЕНИ", ()).with_variant("ИМ."));
    lex.eponym_markers.add(Termin::new("NAMED AFTER", ()));

    lex.alias_markers.add(Termin::new("ДАЛЕЕ", ()));
    lex.alias_markers.add(Termin::new("ДАЛЕЕ ПО ТЕКСТУ", ()));
    lex.alias_markers.add(Termin::new("HEREINAFTER", ()));
    lex.alias_markers.add(Termin::new("HEREINAFTER REFERRED TO AS", ()));
    lex.alias_markers.add(Termin::new("HEREINAFTER CALLED", ()));

    lex.number_markers.add(Termin::new("№", ()).with_variant("N").with_variant("#"));
    lex.number_markers.add(Termin::new("НОМЕР", ()));
    lex.number_markers.add(Termin::new("NO.", ()).with_variant("NO"));

    lex.legal_markers.add(Termin::new("ИНН", LegalIdKind::Inn).with_variant("INN"));
    lex.legal_markers.add(Termin::new("ОГРН", LegalIdKind::Ogrn).with_variant("OGRN"));
}
