//! `@virtualType` types mirror the output type of a hydration's backing field.
//!
//! They have no underlying counterpart, so instead of the usual covariance rules every field must
//! match its backing field exactly.
use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Name;
use indexmap::IndexSet;

use crate::schema::definitions::same_type;
use crate::schema::definitions::same_wrapping;
use crate::schema::definitions::TypeKind;
use crate::schema::NadelSchemas;
use crate::schema::ServiceName;
use crate::validation::element::FieldCoordinate;
use crate::validation::matcher::argument_definition;
use crate::validation::matcher::field_definition;
use crate::validation::ServiceContext;
use crate::validation::ValidationError;

pub(crate) fn check_declaration(
    schemas: &NadelSchemas,
    service: &ServiceName,
    ty: &ExtendedType,
) -> Option<ValidationError> {
    if !schemas.is_virtual_type(ty.name()) || matches!(ty, ExtendedType::Object(_)) {
        return None;
    }
    Some(ValidationError::VirtualTypeIllegalType {
        service: service.clone(),
        ty: ty.name().clone(),
        kind: TypeKind::from(ty),
    })
}

/// Compares virtual type `virtual_type` against `backing_type`, both overall types.
pub(crate) fn check_against_backing_type(
    context: &ServiceContext,
    virtual_type: &Name,
    backing_type: &Name,
) -> Vec<ValidationError> {
    let mut checker = VirtualTypeChecker {
        context,
        compared: IndexSet::new(),
        errors: Vec::new(),
    };
    checker.compare_types(virtual_type, backing_type);
    checker.errors
}

struct VirtualTypeChecker<'c, 'a> {
    context: &'c ServiceContext<'a>,
    compared: IndexSet<(Name, Name)>,
    errors: Vec<ValidationError>,
}

impl VirtualTypeChecker<'_, '_> {
    fn compare_types(&mut self, virtual_type: &Name, backing_type: &Name) {
        if !self
            .compared
            .insert((virtual_type.clone(), backing_type.clone()))
        {
            return;
        }
        let engine = self.context.engine();
        let (Some(virtual_definition), Some(backing_definition)) = (
            engine.types.get(virtual_type),
            engine.types.get(backing_type),
        ) else {
            return;
        };
        let ExtendedType::Object(virtual_object) = virtual_definition else {
            return;
        };
        for virtual_field in virtual_object.fields.values() {
            let coordinate = FieldCoordinate::new(virtual_type, &virtual_field.name);
            match field_definition(backing_definition, &virtual_field.name) {
                Some(backing_field) => self.compare_fields(
                    coordinate,
                    virtual_field,
                    FieldCoordinate::new(backing_type, &backing_field.name),
                    backing_field,
                ),
                None => self
                    .errors
                    .push(ValidationError::VirtualTypeMissingBackingField {
                        service: self.context.service_name().clone(),
                        virtual_field: coordinate,
                        backing_type: backing_type.clone(),
                    }),
            }
        }
    }

    fn compare_fields(
        &mut self,
        virtual_coordinate: FieldCoordinate,
        virtual_field: &FieldDefinition,
        backing_coordinate: FieldCoordinate,
        backing_field: &FieldDefinition,
    ) {
        let service = self.context.service_name();
        for argument in &virtual_field.arguments {
            match argument_definition(backing_field, &argument.name) {
                None => self
                    .errors
                    .push(ValidationError::VirtualTypeMissingBackingFieldArgument {
                        service: service.clone(),
                        virtual_field: virtual_coordinate.clone(),
                        backing_field: backing_coordinate.clone(),
                        argument: argument.name.clone(),
                    }),
                Some(backing_argument) if !same_type(&argument.ty, &backing_argument.ty) => self
                    .errors
                    .push(ValidationError::VirtualTypeIncompatibleFieldArgument {
                        service: service.clone(),
                        virtual_field: virtual_coordinate.clone(),
                        backing_field: backing_coordinate.clone(),
                        argument: argument.name.clone(),
                        virtual_type: (*argument.ty).clone(),
                        backing_type: (*backing_argument.ty).clone(),
                    }),
                Some(_) => {}
            }
        }

        let virtual_output = virtual_field.ty.inner_named_type();
        let nested_virtual = self.context.schemas.is_virtual_type(virtual_output);
        let matches = if nested_virtual {
            same_wrapping(&virtual_field.ty, &backing_field.ty)
        } else {
            same_type(&virtual_field.ty, &backing_field.ty)
        };
        if !matches {
            self.errors
                .push(ValidationError::VirtualTypeIncompatibleFieldOutputType {
                    service: service.clone(),
                    virtual_field: virtual_coordinate,
                    backing_field: backing_coordinate,
                    virtual_type: virtual_field.ty.clone(),
                    backing_type: backing_field.ty.clone(),
                });
        } else if nested_virtual {
            self.compare_types(virtual_output, backing_field.ty.inner_named_type());
        }
    }
}
