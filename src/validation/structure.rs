//! Structural checks of plain fields, arguments, input objects and enums.
use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::schema::ExtendedType;

use crate::schema::definitions::is_required_input;
use crate::validation::assignable::is_assignable;
use crate::validation::assignable::Position;
use crate::validation::element::FieldCoordinate;
use crate::validation::element::FieldRef;
use crate::validation::element::TypeRef;
use crate::validation::matcher::argument_definition;
use crate::validation::matcher::has_enum_value;
use crate::validation::matcher::input_field_definition;
use crate::validation::matcher::match_field;
use crate::validation::matcher::FieldMatch;
use crate::validation::ServiceContext;
use crate::validation::ValidationError;

/// Checks an overall field against the underlying field it maps to.
pub(crate) fn check_field(
    context: &ServiceContext,
    parent: &TypeRef,
    underlying_parent: &ExtendedType,
    field: &FieldDefinition,
) -> Vec<ValidationError> {
    let path = context
        .renames
        .underlying_field_path(&parent.overall, &field.name);
    let (underlying_type, underlying_field) =
        match match_field(context.underlying, underlying_parent, &path) {
            FieldMatch::Found { parent, field } => (parent, field),
            FieldMatch::Missing(underlying_path) => {
                return vec![ValidationError::MissingUnderlyingField {
                    parent: parent.clone(),
                    field: field.name.clone(),
                    underlying_path,
                }]
            }
            FieldMatch::ThroughList(list_field) => {
                return vec![ValidationError::CannotRenameThroughListField {
                    parent: parent.clone(),
                    field: field.name.clone(),
                    list_field,
                }]
            }
        };

    let field_ref = FieldRef {
        service: parent.service.clone(),
        overall: FieldCoordinate::new(&parent.overall, &field.name),
        underlying: FieldCoordinate::new(underlying_type, &underlying_field.name),
    };
    let names_equal = context.names_equal();
    let mut errors = Vec::new();
    if !is_assignable(
        &underlying_field.ty,
        &field.ty,
        Position::Output,
        &names_equal,
    ) {
        errors.push(ValidationError::IncompatibleFieldOutputType {
            field: field_ref.clone(),
            overall_type: field.ty.clone(),
            underlying_type: underlying_field.ty.clone(),
        });
    }
    errors.extend(check_arguments(context, &field_ref, field, underlying_field));
    errors
}

fn check_arguments(
    context: &ServiceContext,
    field_ref: &FieldRef,
    field: &FieldDefinition,
    underlying_field: &FieldDefinition,
) -> Vec<ValidationError> {
    let names_equal = context.names_equal();
    let mut errors = Vec::new();
    for argument in &field.arguments {
        match argument_definition(underlying_field, &argument.name) {
            // The gateway can leave out an argument it knows a default for.
            None if argument.default_value.is_some() => {}
            None => errors.push(ValidationError::MissingArgumentOnUnderlying {
                field: field_ref.clone(),
                argument: argument.name.clone(),
            }),
            Some(underlying_argument) => {
                if !is_assignable(
                    &argument.ty,
                    &underlying_argument.ty,
                    Position::Input,
                    &names_equal,
                ) {
                    errors.push(ValidationError::IncompatibleArgumentInputType {
                        field: field_ref.clone(),
                        argument: argument.name.clone(),
                        overall_type: (*argument.ty).clone(),
                        underlying_type: (*underlying_argument.ty).clone(),
                    });
                }
            }
        }
    }
    for underlying_argument in &underlying_field.arguments {
        if is_required_input(
            &underlying_argument.ty,
            underlying_argument.default_value.is_some(),
        ) && argument_definition(field, &underlying_argument.name).is_none()
        {
            errors.push(ValidationError::MissingRequiredUnderlyingArgument {
                field: field_ref.clone(),
                argument: underlying_argument.name.clone(),
                underlying_type: (*underlying_argument.ty).clone(),
            });
        }
    }
    errors
}

/// Checks the input fields `context.service` declares on an input object type.
pub(crate) fn check_input_object(
    context: &ServiceContext,
    ty: &TypeRef,
    overall: &ExtendedType,
    underlying: &ExtendedType,
) -> Vec<ValidationError> {
    let names_equal = context.names_equal();
    let mut errors = Vec::new();
    for name in context.schemas.members_for(context.service, &ty.overall) {
        let Some(field) = input_field_definition(overall, &name) else {
            continue;
        };
        match input_field_definition(underlying, &name) {
            None => errors.push(ValidationError::MissingUnderlyingInputField {
                ty: ty.clone(),
                field: name,
            }),
            Some(underlying_field) => {
                if !is_assignable(
                    &field.ty,
                    &underlying_field.ty,
                    Position::Input,
                    &names_equal,
                ) {
                    errors.push(ValidationError::IncompatibleInputFieldType {
                        ty: ty.clone(),
                        field: name,
                        overall_type: (*field.ty).clone(),
                        underlying_type: (*underlying_field.ty).clone(),
                    });
                }
            }
        }
    }
    if let ExtendedType::InputObject(underlying) = underlying {
        for (name, underlying_field) in &underlying.fields {
            if is_required_input(
                &underlying_field.ty,
                underlying_field.default_value.is_some(),
            ) && input_field_definition(overall, name).is_none()
            {
                errors.push(ValidationError::MissingRequiredUnderlyingInputField {
                    ty: ty.clone(),
                    field: name.clone(),
                });
            }
        }
    }
    errors
}

/// Overall enum values must exist underlying. Extra underlying values are never exposed.
pub(crate) fn check_enum(
    context: &ServiceContext,
    ty: &TypeRef,
    underlying: &ExtendedType,
) -> Vec<ValidationError> {
    context
        .schemas
        .members_for(context.service, &ty.overall)
        .into_iter()
        .filter(|value| !has_enum_value(underlying, value))
        .map(|value| ValidationError::MissingUnderlyingEnumValue {
            ty: ty.clone(),
            value,
        })
        .collect()
}
