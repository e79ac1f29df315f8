//! # Pontuação Declarativa
//!
//! A confiança de um candidato (`coef`) é a soma dos pesos das regras que
//! dispararam. Cada regra é um item de [`ScoreRule`]; os pesos padrão estão em
//! [`DEFAULT_WEIGHTS`] e podem ser sobrescritos pela configuração.
//!
//! O candidato é aceito quando `coef` fica **estritamente acima** do limiar do
//! modo de anexação ([`AttachMode`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Modo de anexação: define o limiar de aceitação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachMode {
    Normal,
    NormalAfterDepartment,
    Multiple,
    HighConfidence,
    ExternalOntology,
}

/// Regras de pontuação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRule {
    /// Peso multiplicado pelo coeficiente do tipo no léxico.
    TypeCoefficient,
    /// Tipo com maiúscula fora do início de sentença.
    CapitalizedType,
    /// Tipo reconhecido pela sigla ("ГУВД").
    AcronymType,
    /// Tipo ambíguo em minúsculas sem contexto de apoio.
    LowercaseDoubtType,
    /// Tipo sem nome, número, epônimo nem geografia.
    BareType,
    ProperName,
    QuotedName,
    /// Sintagma nominal em genitivo/dativo depois do tipo ("юстиции").
    NounPhraseName,
    LatinName,
    StdNameHit,
    GlobalRegistryHit,
    /// Nome capitalizado apenas por estar no início da sentença.
    SentenceStartName,
    GeoCooccurrence,
    MissingRequiredGeo,
    AdjacentOrganization,
    NumberIdentifier,
    Eponym,
    AliasClause,
    LegalIdentifier,
    DepartmentWithParent,
    DepartmentWithoutParent,
    StdTail,
    /// Pessoa dona depois de uma forma como "ИП".
    PersonOwner,
}

/// Pesos padrão.
pub const DEFAULT_WEIGHTS: &[(ScoreRule, f64)] = &[
    (ScoreRule::TypeCoefficient, 1.0),
    (ScoreRule::CapitalizedType, 0.5),
    (ScoreRule::AcronymType, 0.5),
    (ScoreRule::LowercaseDoubtType, -2.0),
    (ScoreRule::BareType, -2.0),
    (ScoreRule::ProperName, 1.0),
    (ScoreRule::QuotedName, 2.0),
    (ScoreRule::NounPhraseName, 0.5),
    (ScoreRule::LatinName, 1.0),
    (ScoreRule::StdNameHit, 3.0),
    (ScoreRule::GlobalRegistryHit, 4.0),
    (ScoreRule::SentenceStartName, -0.5),
    (ScoreRule::GeoCooccurrence, 1.0),
    (ScoreRule::MissingRequiredGeo, -3.0),
    (ScoreRule::AdjacentOrganization, 1.0),
    (ScoreRule::NumberIdentifier, 1.0),
    (ScoreRule::Eponym, 1.0),
    (ScoreRule::AliasClause, 1.0),
    (ScoreRule::LegalIdentifier, 2.0),
    (ScoreRule::DepartmentWithParent, 1.0),
    (ScoreRule::DepartmentWithoutParent, -1.0),
    (ScoreRule::StdTail, 2.0),
    (ScoreRule::PersonOwner, 2.0),
];

/// Tabela regra → peso já resolvida.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    weights: BTreeMap<ScoreRule, f64>,
}

impl Default for ScoreTable {
    fn default() -> Self {
        ScoreTable {
            weights: DEFAULT_WEIGHTS.iter().copied().collect(),
        }
    }
}

impl ScoreTable {
    /// Pesos padrão com as sobrescritas aplicadas.
    pub fn with_overrides(overrides: &BTreeMap<ScoreRule, f64>) -> Self {
        let mut table = ScoreTable::default();
        for (rule, w) in overrides {
            table.weights.insert(*rule, *w);
        }
        table
    }

    pub fn weight(&self, rule: ScoreRule) -> f64 {
        self.weights.get(&rule).copied().unwrap_or(0.0)
    }
}

/// Pontuação acumulada de um candidato.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub coef: f64,
    /// Regras disparadas, na ordem.
    pub fired: Vec<ScoreRule>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispara `rule` com o peso da tabela.
    pub fn fire(&mut self, table: &ScoreTable, rule: ScoreRule) {
        self.fire_scaled(table, rule, 1.0);
    }

    /// Dispara `rule` com o peso multiplicado por `factor`.
    pub fn fire_scaled(&mut self, table: &ScoreTable, rule: ScoreRule, factor: f64) {
        let delta = table.weight(rule) * factor;
        trace!(?rule, delta, "score rule fired");
        self.coef += delta;
        self.fired.push(rule);
    }

    pub fn has(&self, rule: ScoreRule) -> bool {
        self.fired.contains(&rule)
    }

    /// `coef` estritamente acima do limiar.
    pub fn accepts(&self, threshold: f64) -> bool {
        self.coef > threshold
    }
}
