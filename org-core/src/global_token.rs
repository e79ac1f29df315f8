//! Organizações do registro global reconhecidas por nome ou sigla
//! ("Газпром", "МВД", "ООН").

use serde::Serialize;

use crate::entity::OrganizationEntity;
use crate::lexicon::{GlobalOrg, Lexicon};
use crate::token::TokenStream;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalMatch {
    pub begin: usize,
    pub end: usize,
    /// Índice em `Lexicon::globals`.
    pub index: usize,
    pub key: String,
    pub via_acronym: bool,
}

/// Nome ou sigla global em `pos`; exige maiúscula inicial.
pub fn try_global(tokens: &TokenStream, lexicon: &Lexicon, pos: usize) -> Option<GlobalMatch> {
    let first = tokens.get(pos)?;
    if !first.is_letter_word() || !first.chars.is_capitalized() {
        return None;
    }
    let m = lexicon.global_terms.try_parse(tokens, pos)?;
    let global = lexicon.global_at(m.termin.tag)?;
    Some(GlobalMatch {
        begin: pos,
        end: m.end,
        index: m.termin.tag,
        key: global.key.clone(),
        via_acronym: m.via_acronym,
    })
}

/// Entidade com todos os slots conhecidos da organização global.
pub fn entity_from_global(global: &GlobalOrg) -> OrganizationEntity {
    let mut entity = OrganizationEntity::new();
    for n in &global.names {
        entity.add_name(n, false);
    }
    for a in &global.acronyms {
        entity.add_name(a, true);
    }
    for t in &global.types {
        entity.add_type(t);
    }
    for p in &global.profiles {
        entity.add_profile(*p);
    }
    if let Some(geo) = &global.geo {
        entity.add_geo(geo.clone());
    }
    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::OrgProfile;
    use crate::tokenizer::tokenize_plain;

    #[test]
    fn test_global_by_name_and_acronym() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("Газпром и МВД");
        let g = try_global(&s, &lex, 0).unwrap();
        assert_eq!(g.key, "ГАЗПРОМ");
        let m = try_global(&s, &lex, 2).unwrap();
        assert!(m.via_acronym);
        assert_eq!(m.key, "МВД");
    }

    #[test]
    fn test_global_requires_capital() {
        let lex = Lexicon::builtin();
        let s = tokenize_plain("газпром");
        assert!(try_global(&s, &lex, 0).is_none());
    }

    #[test]
    fn test_entity_from_global() {
        let lex = Lexicon::builtin();
        let e = entity_from_global(lex.global("ЦБ").unwrap());
        assert!(e.has_type("банк"));
        assert!(e.profiles().contains(&OrgProfile::Finance));
        assert!(e.has_name("ЦБ"));
        assert_eq!(e.geos().len(), 1);
    }
}
