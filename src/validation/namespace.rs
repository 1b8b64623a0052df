use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::schema::ExtendedType;

use crate::schema::definitions::TypeKind;
use crate::validation::element::ServiceField;
use crate::validation::ServiceContext;
use crate::validation::ValidationError;

/// A `@namespaced` field groups the fields of an object type under one root field.
pub(crate) fn check_field(
    context: &ServiceContext,
    field: &ServiceField,
    definition: &FieldDefinition,
) -> Option<ValidationError> {
    let output_type = definition.ty.inner_named_type();
    match context.engine().types.get(output_type) {
        Some(ExtendedType::Object(_)) | None => None,
        Some(ty) => Some(ValidationError::NamespacedTypeMustBeObject {
            field: field.clone(),
            output_type: output_type.clone(),
            kind: TypeKind::from(ty),
        }),
    }
}
