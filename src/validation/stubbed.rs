//! `@stubbed` types and fields exist only in the overall schema and always resolve to null.
use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::schema::ExtendedType;
use itertools::Itertools;

use crate::schema::directives::FieldAnnotations;
use crate::schema::directives::HYDRATED_DIRECTIVE_NAME;
use crate::schema::directives::RENAMED_DIRECTIVE_NAME;
use crate::schema::NadelSchemas;
use crate::schema::ServiceName;
use crate::validation::element::ServiceField;
use crate::validation::ServiceContext;
use crate::validation::ValidationError;

/// Whether the field has no underlying counterpart because it or its output type is stubbed.
pub(crate) fn is_stubbed_field(
    context: &ServiceContext,
    definition: &FieldDefinition,
    annotations: &FieldAnnotations,
) -> bool {
    annotations.stubbed
        || context
            .schemas
            .is_stubbed_type(definition.ty.inner_named_type())
}

pub(crate) fn check_field(
    context: &ServiceContext,
    field: &ServiceField,
    definition: &FieldDefinition,
    annotations: &FieldAnnotations,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if annotations.stubbed {
        if annotations.renamed_from.is_some() {
            errors.push(ValidationError::StubbedMustBeUsedExclusively {
                field: field.clone(),
                other_directive: RENAMED_DIRECTIVE_NAME,
            });
        }
        if annotations.is_hydrated() {
            errors.push(ValidationError::StubbedMustBeUsedExclusively {
                field: field.clone(),
                other_directive: HYDRATED_DIRECTIVE_NAME,
            });
        }
    }
    if is_stubbed_field(context, definition, annotations) && definition.ty.is_non_null() {
        errors.push(ValidationError::StubbedMustBeNullable {
            field: field.clone(),
            output_type: definition.ty.clone(),
        });
    }
    errors
}

pub(crate) fn check_declaration(
    schemas: &NadelSchemas,
    service: &ServiceName,
    ty: &ExtendedType,
) -> Option<ValidationError> {
    let ExtendedType::Object(object) = ty else {
        return None;
    };
    if !schemas.is_stubbed_type(&object.name) || object.implements_interfaces.is_empty() {
        return None;
    }
    Some(ValidationError::StubbedTypeMustNotImplement {
        service: service.clone(),
        ty: object.name.clone(),
        interfaces: object
            .implements_interfaces
            .iter()
            .map(|interface| interface.name.clone())
            .sorted()
            .collect(),
    })
}
