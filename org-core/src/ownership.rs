//! Quem pode ser superior de quem.

use crate::entity::OrganizationEntity;
use crate::kind::OrgKind;

/// Posição de subdivisões na escala отдел < отделение < управление.
const DEPARTMENT_RANKS: &[(&str, u8)] = &[
    ("главное управление", 3),
    ("управление", 3),
    ("департамент", 3),
    ("филиал", 3),
    ("department", 3),
    ("отделение", 2),
    ("факультет", 2),
    ("division", 2),
    ("отдел", 1),
    ("сектор", 1),
    ("лаборатория", 1),
    ("кафедра", 1),
];

/// Maior posição entre os tipos; 0 quando nenhum é subdivisão.
pub fn department_rank(types: &[String]) -> u8 {
    types
        .iter()
        .filter_map(|t| {
            let t = t.to_lowercase();
            DEPARTMENT_RANKS
                .iter()
                .find(|(frag, _)| t.split_whitespace().next() == frag.split_whitespace().next() && t.starts_with(frag))
                .map(|(_, rank)| *rank)
        })
        .max()
        .unwrap_or(0)
}

pub fn is_department_like(entity: &OrganizationEntity) -> bool {
    department_rank(entity.types()) > 0 || entity.kind() == OrgKind::Department
}

pub fn can_be_higher(higher: &OrganizationEntity, lower: &OrganizationEntity) -> bool {
    let higher_rank = department_rank(higher.types());
    if (higher_rank > 0 || higher.kind() == OrgKind::Department) && lower.kind() == OrgKind::Government {
        return false;
    }
    if is_department_like(lower) {
        let lower_rank = department_rank(lower.types()).max(1);
        return higher_rank == 0 || higher_rank > lower_rank;
    }
    higher.kind() == OrgKind::Military && lower.kind() == OrgKind::Military
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(types: &[&str]) -> OrganizationEntity {
        let mut e = OrganizationEntity::new();
        for t in types {
            e.add_type(t);
        }
        e
    }

    #[test]
    fn test_department_rank() {
        assert_eq!(department_rank(&["отдел".to_string()]), 1);
        assert_eq!(department_rank(&["отделение".to_string()]), 2);
        assert_eq!(department_rank(&["главное управление внутренних дел".to_string()]), 3);
        assert_eq!(department_rank(&["министерство".to_string()]), 0);
    }

    #[test]
    fn test_department_nesting() {
        let ministry = typed(&["министерство"]);
        let dept = typed(&["департамент"]);
        let office = typed(&["отдел"]);
        assert!(can_be_higher(&ministry, &dept));
        assert!(can_be_higher(&dept, &office));
        assert!(!can_be_higher(&office, &dept));
        assert!(!can_be_higher(&office, &office));
    }

    #[test]
    fn test_non_departments() {
        let university = typed(&["университет"]);
        let faculty = typed(&["факультет"]);
        assert!(can_be_higher(&university, &faculty));
        assert!(!can_be_higher(&university, &typed(&["банк"])));
        assert!(can_be_higher(&typed(&["дивизия"]), &typed(&["полк"])));
        assert!(!can_be_higher(&typed(&["отдел"]), &typed(&["министерство"])));
    }
}
