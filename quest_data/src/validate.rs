use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for malformed or conflicting entries in a set of `LookupTables`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} '{id}'")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate uniqueness and basic shape invariants of a set of lookup tables.
///
/// Template syntax beyond brace balance is checked when the tables are
/// compiled into a catalog; this pass only catches what can be seen without
/// building patterns.
///
/// ```
/// use quest_data::{ActionDef, LookupTables, StaticMessageDef, validate_tables};
///
/// let tables = LookupTables {
///     actions: vec![ActionDef {
///         category: Default::default(),
///         overloads: vec!["end quest".into()],
///         summary: "Ends the quest.".into(),
///         obsolete: false,
///         source_name: None,
///     }],
///     static_messages: vec![StaticMessageDef { alias: "QuestorOffer".into(), id: 1000 }],
///     ..LookupTables::default()
/// };
/// assert!(validate_tables(&tables).is_empty());
/// ```
pub fn validate_tables(tables: &LookupTables) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    track_ids(
        "global variable",
        tables.global_vars.iter().map(|v| v.name.clone()),
        &mut errors,
    );
    track_ids(
        "global variable index",
        tables.global_vars.iter().map(|v| v.index.to_string()),
        &mut errors,
    );
    track_ids(
        "static message alias",
        tables.static_messages.iter().map(|m| m.alias.clone()),
        &mut errors,
    );
    track_ids(
        "static message id",
        tables.static_messages.iter().map(|m| m.id.to_string()),
        &mut errors,
    );
    track_ids("macro", tables.macros.iter().map(|m| m.name.clone()), &mut errors);
    track_ids(
        "quest",
        tables.quests.iter().map(|q| q.name.to_ascii_lowercase()),
        &mut errors,
    );

    for definition in &tables.symbols {
        let context = format!("{} definition '{}'", definition.kind, definition.signature);
        match definition.signature.split_whitespace().next() {
            Some(first) if first == definition.kind.keyword() => {},
            _ => errors.push(ValidationError::InvalidValue {
                context: format!("{context}: must start with '{}'", definition.kind.keyword()),
            }),
        }
        check_template(&definition.signature, &context, &mut errors);
    }

    for (idx, action) in tables.actions.iter().enumerate() {
        let name = action.source_name.clone().unwrap_or_else(|| format!("#{idx}"));
        if action.overloads.is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: format!("action '{name}' has no overloads"),
            });
        }
        for overload in &action.overloads {
            let context = format!("action '{name}' overload '{overload}'");
            match overload.split_whitespace().next() {
                None => errors.push(ValidationError::InvalidValue {
                    context: format!("action '{name}' has an empty overload"),
                }),
                Some(first) if first.contains("${") => errors.push(ValidationError::InvalidValue {
                    context: format!("{context}: first word must be literal"),
                }),
                Some(_) => check_template(overload, &context, &mut errors),
            }
        }
    }

    for (kind, values) in &tables.values {
        if values.is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: format!("value table '{kind}' is empty"),
            });
        }
    }

    errors
}


fn track_ids(kind: &'static str, ids: impl Iterator<Item = String>, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            errors.push(ValidationError::DuplicateId { kind, id });
        }
    }
}

fn check_template(template: &str, context: &str, errors: &mut Vec<ValidationError>) {
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => rest = &after[end + 1..],
            None => {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{context}: unterminated placeholder"),
                });
                return;
            },
        }
    }
}
