//! `when` conditions decide per parent object whether a hydration applies.
use apollo_compiler::ast::Type;
use apollo_compiler::ast::Value;
use apollo_compiler::schema::ExtendedType;
use regex::Regex;

use crate::schema::definitions::is_list_type;
use crate::schema::directives::ConditionPredicate;
use crate::schema::directives::WhenCondition;
use crate::validation::element::ServiceField;
use crate::validation::hydration::source_field_type;
use crate::validation::ServiceContext;
use crate::validation::ValidationError;

pub(super) fn check_condition(
    context: &ServiceContext,
    field: &ServiceField,
    underlying_parent: &ExtendedType,
    condition: &WhenCondition,
) -> Vec<ValidationError> {
    let source_field = || {
        condition
            .source_field
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
    };
    let Some(source_type) = source_field_type(
        context.underlying,
        underlying_parent,
        &condition.source_field,
    ) else {
        return vec![ValidationError::HydrationConditionSourceFieldDoesNotExist {
            field: field.clone(),
            source_field: source_field(),
        }];
    };
    let scalar = scalar_name(&source_type);
    let supported = match &condition.predicate {
        ConditionPredicate::StartsWith(_) | ConditionPredicate::Matches(_) => {
            matches!(scalar, Some("String" | "ID"))
        }
        ConditionPredicate::Equals(_) => {
            matches!(scalar, Some("String" | "ID" | "Int" | "Boolean"))
        }
    };
    if !supported {
        return vec![ValidationError::HydrationConditionUnsupportedFieldType {
            field: field.clone(),
            source_field: source_field(),
            source_type,
        }];
    }
    match &condition.predicate {
        ConditionPredicate::Equals(value) if !literal_matches(scalar, value) => {
            vec![
                ValidationError::HydrationConditionPredicateDoesNotMatchSourceFieldType {
                    field: field.clone(),
                    source_field: source_field(),
                    source_type,
                },
            ]
        }
        ConditionPredicate::Matches(pattern) => match Regex::new(pattern) {
            Ok(_) => Vec::new(),
            Err(error) => vec![ValidationError::HydrationConditionInvalidRegex {
                field: field.clone(),
                regex: pattern.clone(),
                reason: error.to_string(),
            }],
        },
        _ => Vec::new(),
    }
}

/// Name of a non-list source field type. Conditions compare single values only.
fn scalar_name(ty: &Type) -> Option<&str> {
    (!is_list_type(ty)).then(|| ty.inner_named_type().as_str())
}

fn literal_matches(scalar: Option<&str>, value: &Value) -> bool {
    match scalar {
        Some("String") => matches!(value, Value::String(_)),
        Some("ID") => matches!(value, Value::String(_) | Value::Int(_)),
        Some("Int") => matches!(value, Value::Int(_)),
        Some("Boolean") => matches!(value, Value::Boolean(_)),
        _ => false,
    }
}
