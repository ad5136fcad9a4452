use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for malformed or dangling references in a `CaseDef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate basic invariants and cross-references in a `CaseDef`.
///
/// Checks that every clue has a usable title and a unique effective id, that
/// slot symbols are unique, and that every slot's expected clue resolves to a
/// catalog entry by id or title.
///
/// ```
/// use casebook_data::{CaseDef, ClueDef, SlotDef, validate_case};
///
/// let case = CaseDef {
///     title: "Demo".into(),
///     clues: vec![ClueDef {
///         title: "The Letter".into(),
///         description: "A torn letter.".into(),
///         ..ClueDef::default()
///     }],
///     slots: vec![SlotDef {
///         symbol: "slot_letter".into(),
///         expected_clue: "The Letter".into(),
///     }],
/// };
/// assert!(validate_case(&case).is_empty());
/// ```
pub fn validate_case(case: &CaseDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut clue_ids = HashSet::new();
    let mut titles = HashSet::new();
    for clue in &case.clues {
        if clue.title.trim().is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: "clue with empty title".to_string(),
            });
            continue;
        }
        let id = clue.effective_id();
        if !clue_ids.insert(id.clone()) {
            errors.push(ValidationError::DuplicateId { kind: "clue", id });
        }
        titles.insert(clue.title.clone());
    }

    let mut slot_symbols = HashSet::new();
    for slot in &case.slots {
        if slot.symbol.trim().is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: "slot with empty symbol".to_string(),
            });
        } else if !slot_symbols.insert(slot.symbol.clone()) {
            errors.push(ValidationError::DuplicateId {
                kind: "slot",
                id: slot.symbol.clone(),
            });
        }

        if slot.expected_clue.trim().is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: format!("slot '{}' expected clue missing", slot.symbol),
            });
            continue;
        }

        // slots may name a clue by id, by exact title, or by a title whose
        // derived id matches -- mirror all three lookups here
        let resolvable = clue_ids.contains(&slot.expected_clue)
            || titles.contains(&slot.expected_clue)
            || clue_ids.contains(&derive_clue_id(&slot.expected_clue));
        if !resolvable {
            errors.push(ValidationError::MissingReference {
                kind: "clue",
                id: slot.expected_clue.clone(),
                context: format!("slot '{}' expected clue", slot.symbol),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clue(title: &str) -> ClueDef {
        ClueDef {
            id: None,
            title: title.to_string(),
            description: format!("About {title}."),
            icon: None,
            category: ClueCategory::Object,
        }
    }

    fn slot(symbol: &str, expected: &str) -> SlotDef {
        SlotDef {
            symbol: symbol.to_string(),
            expected_clue: expected.to_string(),
        }
    }

    fn base_case() -> CaseDef {
        CaseDef {
            title: "Test Case".into(),
            clues: vec![clue("The Letter"), clue("Brass Key")],
            slots: vec![slot("s1", "clue_the_letter"), slot("s2", "Brass Key")],
        }
    }

    #[test]
    fn valid_case_has_no_errors() {
        assert!(validate_case(&base_case()).is_empty());
    }

    #[test]
    fn duplicate_derived_ids_are_reported() {
        let mut case = base_case();
        case.clues.push(clue("The Letter"));

        let errors = validate_case(&case);
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::DuplicateId { kind, id } if *kind == "clue" && id == "clue_the_letter"))
        );
    }

    #[test]
    fn duplicate_slot_symbols_are_reported() {
        let mut case = base_case();
        case.slots.push(slot("s1", "Brass Key"));

        let errors = validate_case(&case);
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::DuplicateId { kind, id } if *kind == "slot" && id == "s1"))
        );
    }

    #[test]
    fn unresolvable_expected_clue_is_reported() {
        let mut case = base_case();
        case.slots.push(slot("s3", "The Candlestick"));

        let errors = validate_case(&case);
        assert!(errors.iter().any(
            |err| matches!(err, ValidationError::MissingReference { kind, id, .. } if *kind == "clue" && id == "The Candlestick")
        ));
    }

    #[test]
    fn expected_clue_by_title_with_derivable_id_is_accepted() {
        let case = CaseDef {
            title: "T".into(),
            clues: vec![clue("Muddy Boot")],
            slots: vec![slot("s1", "Muddy Boot")],
        };
        assert!(validate_case(&case).is_empty());
    }

    #[test]
    fn empty_title_is_reported() {
        let mut case = base_case();
        case.clues.push(clue("  "));

        let errors = validate_case(&case);
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::InvalidValue { .. }))
        );
    }
}
