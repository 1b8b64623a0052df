use apollo_compiler::ast::Directive;
use apollo_compiler::ast::Value;
use apollo_compiler::Name;
use apollo_compiler::Node;

use crate::error::SchemaError;

fn argument<'directive>(
    application: &'directive Directive,
    name: &str,
) -> Option<&'directive Node<Value>> {
    application
        .arguments
        .iter()
        .find(|a| a.name.as_str() == name)
        .map(|a| &a.value)
        .filter(|value| !value.is_null())
}

fn wrong_type(
    application: &Directive,
    coordinate: &str,
    name: &str,
    expected: &str,
) -> SchemaError {
    SchemaError::invalid_directive(
        coordinate,
        application.name.as_str(),
        format!("argument \"{name}\" must be {expected}"),
    )
}

fn missing(application: &Directive, coordinate: &str, name: &str) -> SchemaError {
    SchemaError::invalid_directive(
        coordinate,
        application.name.as_str(),
        format!("required argument \"{name}\" was not present"),
    )
}

pub(crate) fn directive_optional_string_argument<'directive>(
    application: &'directive Directive,
    coordinate: &str,
    name: &str,
) -> Result<Option<&'directive str>, SchemaError> {
    match argument(application, name) {
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| wrong_type(application, coordinate, name, "a string")),
        None => Ok(None),
    }
}

pub(crate) fn directive_required_string_argument<'directive>(
    application: &'directive Directive,
    coordinate: &str,
    name: &str,
) -> Result<&'directive str, SchemaError> {
    directive_optional_string_argument(application, coordinate, name)?
        .ok_or_else(|| missing(application, coordinate, name))
}

pub(crate) fn directive_optional_boolean_argument(
    application: &Directive,
    coordinate: &str,
    name: &str,
) -> Result<Option<bool>, SchemaError> {
    match argument(application, name).map(|value| &**value) {
        Some(Value::Boolean(value)) => Ok(Some(*value)),
        Some(_) => Err(wrong_type(application, coordinate, name, "a boolean")),
        None => Ok(None),
    }
}

/// Accepts a single string where a list is expected, following GraphQL input coercion.
pub(crate) fn directive_required_string_list_argument(
    application: &Directive,
    coordinate: &str,
    name: &str,
) -> Result<Vec<String>, SchemaError> {
    match argument(application, name).map(|value| &**value) {
        Some(Value::List(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| wrong_type(application, coordinate, name, "a list of strings"))
            })
            .collect(),
        Some(value) if value.as_str().is_some() => {
            Ok(value.as_str().map(str::to_owned).into_iter().collect())
        }
        Some(_) => Err(wrong_type(application, coordinate, name, "a list of strings")),
        None => Err(missing(application, coordinate, name)),
    }
}

/// Returns the elements of a list of input objects, coercing a lone object into a list of one.
pub(crate) fn directive_object_list_argument<'directive>(
    application: &'directive Directive,
    coordinate: &str,
    name: &str,
) -> Result<Vec<&'directive [(Name, Node<Value>)]>, SchemaError> {
    let as_object = |value: &'directive Node<Value>| match &**value {
        Value::Object(fields) => Ok(fields.as_slice()),
        _ => Err(wrong_type(application, coordinate, name, "a list of input objects")),
    };
    match argument(application, name) {
        Some(value) => match &**value {
            Value::List(items) => items.iter().map(as_object).collect(),
            _ => Ok(vec![as_object(value)?]),
        },
        None => Ok(Vec::new()),
    }
}

pub(crate) fn directive_optional_object_argument<'directive>(
    application: &'directive Directive,
    coordinate: &str,
    name: &str,
) -> Result<Option<&'directive [(Name, Node<Value>)]>, SchemaError> {
    match argument(application, name).map(|value| &**value) {
        Some(Value::Object(fields)) => Ok(Some(fields.as_slice())),
        Some(_) => Err(wrong_type(application, coordinate, name, "an input object")),
        None => Ok(None),
    }
}

/// Looks up a field of an input object literal, treating an explicit `null` as absent.
pub(crate) fn object_field<'value>(
    fields: &'value [(Name, Node<Value>)],
    name: &str,
) -> Option<&'value Node<Value>> {
    fields
        .iter()
        .find(|(field_name, _)| field_name.as_str() == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_null())
}
