//! Configuração do motor: limiares por modo, pesos das regras e limites.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scoring::{AttachMode, ScoreRule};

/// Limiar de aceitação por modo de anexação.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub normal: f64,
    pub normal_after_department: f64,
    pub multiple: f64,
    pub high_confidence: f64,
    pub external_ontology: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            normal: 1.0,
            normal_after_department: 0.0,
            multiple: 1.0,
            high_confidence: 3.0,
            external_ontology: -1.0,
        }
    }
}

impl Thresholds {
    pub fn get(&self, mode: AttachMode) -> f64 {
        match mode {
            AttachMode::Normal => self.normal,
            AttachMode::NormalAfterDepartment => self.normal_after_department,
            AttachMode::Multiple => self.multiple,
            AttachMode::HighConfidence => self.high_confidence,
            AttachMode::ExternalOntology => self.external_ontology,
        }
    }

    fn all(&self) -> [f64; 5] {
        [
            self.normal,
            self.normal_after_department,
            self.multiple,
            self.high_confidence,
            self.external_ontology,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: Thresholds,
    /// Sobrescritas de peso por regra.
    pub weights: BTreeMap<ScoreRule, f64>,
    /// Profundidade máxima de recursão/backtracking.
    pub max_depth: usize,
    /// Distância máxima (em bytes) entre uma subdivisão e a menção do superior.
    pub hierarchy_max_gap: usize,
    /// Comprimento mínimo de uma variante de nome compartilhada.
    pub min_shared_name_len: usize,
    pub min_name_len: usize,
    /// Habilita o reconhecimento de "далее — X".
    pub aliases: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            thresholds: Thresholds::default(),
            weights: BTreeMap::new(),
            max_depth: 4,
            hierarchy_max_gap: 160,
            min_shared_name_len: 4,
            min_name_len: 2,
            aliases: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.thresholds.all().iter().any(|t| !t.is_finite()) {
            return Err(Error::config("thresholds must be finite"));
        }
        if let Some((rule, _)) = self.weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(Error::config(format!("weight for {rule:?} must be finite")));
        }
        if self.max_depth == 0 {
            return Err(Error::config("max_depth must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.max_depth, 4);
        assert_eq!(c.thresholds.get(AttachMode::HighConfidence), 3.0);
        assert_eq!(c.thresholds.get(AttachMode::ExternalOntology), -1.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let c = EngineConfig::from_json(
            r#"{"thresholds": {"normal": 2.0}, "weights": {"capitalized_type": 1.0}, "aliases": false}"#,
        )
        .unwrap();
        assert_eq!(c.thresholds.normal, 2.0);
        assert_eq!(c.thresholds.multiple, 1.0);
        assert_eq!(c.weights.get(&ScoreRule::CapitalizedType), Some(&1.0));
        assert!(!c.aliases);
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let err = EngineConfig::from_json(r#"{"max_depth": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
