//! `@partition` splits one call into several, each taking a slice of a list argument.
use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::ast::Type;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Name;

use crate::schema::definitions::is_list_type;
use crate::schema::definitions::root_kind_of;
use crate::schema::definitions::root_type_name;
use crate::schema::definitions::RootKind;
use crate::schema::directives::FieldAnnotations;
use crate::schema::directives::PartitionDefinition;
use crate::validation::element::ServiceField;
use crate::validation::matcher::argument_definition;
use crate::validation::matcher::input_field_definition;
use crate::validation::ServiceContext;
use crate::validation::ValidationError;

/// Reports the first partition problem of a field only.
pub(crate) fn check_field(
    context: &ServiceContext,
    field: &ServiceField,
    definition: &FieldDefinition,
    annotations: &FieldAnnotations,
    partition: &PartitionDefinition,
) -> Option<ValidationError> {
    let placement = operation_kind(context, &field.field.ty);
    match placement {
        Some(RootKind::Subscription) => {
            return Some(ValidationError::PartitionAppliedToSubscriptionField {
                field: field.clone(),
            })
        }
        None => {
            return Some(ValidationError::PartitionAppliedToUnsupportedField {
                field: field.clone(),
            })
        }
        Some(RootKind::Query | RootKind::Mutation) => {}
    }
    if annotations.renamed_from.is_some() {
        return Some(ValidationError::CannotRenamePartitionedField {
            field: field.clone(),
        });
    }
    let supported_output = match placement {
        Some(RootKind::Mutation) => {
            is_list_type(&definition.ty) || is_mutation_payload(context, &definition.ty)
        }
        _ => is_list_type(&definition.ty),
    };
    if !supported_output {
        return Some(
            ValidationError::PartitionAppliedToFieldWithUnsupportedOutputType {
                field: field.clone(),
                output_type: definition.ty.clone(),
            },
        );
    }
    if !is_list_argument_path(context, definition, &partition.path_to_partition_arg) {
        return Some(ValidationError::InvalidPartitionArgument {
            field: field.clone(),
            path: partition.path_to_partition_arg.clone(),
        });
    }
    None
}

/// Operation a field of `parent` is a top level field of, directly or one `@namespaced` field
/// down.
fn operation_kind(context: &ServiceContext, parent: &Name) -> Option<RootKind> {
    use strum::IntoEnumIterator;

    let engine = context.engine();
    if let Some(kind) = root_kind_of(engine, parent) {
        return Some(kind);
    }
    RootKind::iter().find(|kind| {
        let Some(ExtendedType::Object(root)) =
            root_type_name(engine, *kind).and_then(|name| engine.types.get(name))
        else {
            return false;
        };
        root.fields.values().any(|field| {
            field.ty.inner_named_type() == parent
                && context
                    .schemas
                    .field_annotations(&root.name, &field.name)
                    .is_some_and(|annotations| annotations.namespaced)
        })
    })
}

/// A mutation payload carries per item results: every field is a list, except a `success` flag.
fn is_mutation_payload(context: &ServiceContext, ty: &Type) -> bool {
    let Some(ExtendedType::Object(payload)) = context.engine().types.get(ty.inner_named_type())
    else {
        return false;
    };
    payload.fields.values().all(|field| {
        is_list_type(&field.ty)
            || (field.name.as_str() == "success"
                && field.ty.inner_named_type().as_str() == "Boolean")
    })
}

/// Whether the argument name followed by input field names leads to a list.
fn is_list_argument_path(
    context: &ServiceContext,
    definition: &FieldDefinition,
    path: &[String],
) -> bool {
    let Some((argument_name, input_fields)) = path.split_first() else {
        return false;
    };
    let Some(argument) = argument_definition(definition, argument_name) else {
        return false;
    };
    let mut ty: &Type = &argument.ty;
    for input_field in input_fields {
        if is_list_type(ty) {
            return false;
        }
        let Some(field) = context
            .engine()
            .types
            .get(ty.inner_named_type())
            .and_then(|input| input_field_definition(input, input_field))
        else {
            return false;
        };
        ty = &*field.ty;
    }
    is_list_type(ty)
}
