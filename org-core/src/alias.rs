//! Apelidos declarados no documento: "(далее — Комитет)".
//!
//! Cada apelido vira um termo do dicionário do próprio documento, ligado ao id
//! da entidade. Menções posteriores do apelido resolvem direto para esse id.

use serde::Serialize;
use tracing::debug;

use crate::entity::OrgId;
use crate::termin::{Termin, TerminCollection};
use crate::token::{normalize_term, TokenStream};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasEntry {
    pub alias: String,
    pub org: OrgId,
}

#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    terms: TerminCollection<OrgId>,
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra `alias` para `org`. O primeiro dono de um apelido prevalece.
    pub fn register(&mut self, alias: &str, org: OrgId) -> bool {
        let key = normalize_term(alias);
        if key.is_empty() || self.entries.iter().any(|e| normalize_term(&e.alias) == key) {
            return false;
        }
        debug!(alias, %org, "alias registered");
        self.terms.add(Termin::new(alias, org));
        self.entries.push(AliasEntry {
            alias: alias.to_string(),
            org,
        });
        true
    }

    /// Apelido que começa em `pos`: devolve o id e o último token.
    pub fn lookup(&self, tokens: &TokenStream, pos: usize) -> Option<(OrgId, usize)> {
        let first = tokens.get(pos)?;
        if first.organization().is_some() || !first.chars.is_capitalized() {
            return None;
        }
        let m = self.terms.try_parse(tokens, pos)?;
        Some((m.termin.tag, m.end))
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_plain;

    #[test]
    fn test_lookup_capitalized_only() {
        let mut table = AliasTable::new();
        assert!(table.register("Комитет", OrgId(3)));
        let s = tokenize_plain("Комитет решил, что комитет прав");
        assert_eq!(table.lookup(&s, 0), Some((OrgId(3), 0)));
        assert_eq!(table.lookup(&s, 4), None);
    }

    #[test]
    fn test_first_owner_wins() {
        let mut table = AliasTable::new();
        assert!(table.register("Фонд развития", OrgId(1)));
        assert!(!table.register("ФОНД РАЗВИТИЯ", OrgId(2)));
        let s = tokenize_plain("Фонд развития");
        assert_eq!(table.lookup(&s, 0), Some((OrgId(1), 1)));
        assert_eq!(table.entries().len(), 1);
    }
}
