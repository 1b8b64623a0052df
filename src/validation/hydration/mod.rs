//! `@hydrated` fields take their value from a backing field, usually of another service.
//!
//! A hydrated field has no underlying counterpart. Instead its backing field must exist on the
//! overall query type, every backing argument must be fed from a source field, a field argument or
//! a literal of a fitting type, and the backing field must produce what the hydrated field
//! declares.
use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::ast::Type;
use apollo_compiler::schema::Component;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Name;
use apollo_compiler::Schema;
use itertools::Itertools;
use tracing::trace;

use crate::schema::definitions::is_list_type;
use crate::schema::definitions::root_type_name;
use crate::schema::definitions::wrap_in_lists;
use crate::schema::definitions::RootKind;
use crate::schema::directives::FieldAnnotations;
use crate::schema::directives::HydrationDefinition;
use crate::validation::element::ServiceField;
use crate::validation::element::TypeRef;
use crate::validation::matcher::argument_definition;
use crate::validation::matcher::field_definition;
use crate::validation::matcher::is_union_member;
use crate::validation::virtual_type;
use crate::validation::ServiceContext;
use crate::validation::ValidationError;

mod arguments;
mod condition;

pub(crate) fn check_field(
    context: &ServiceContext,
    parent: &TypeRef,
    underlying_parent: &ExtendedType,
    definition: &FieldDefinition,
    annotations: &FieldAnnotations,
) -> Vec<ValidationError> {
    let field = context.service_field(&parent.overall, &definition.name);
    let mut errors = Vec::new();
    if annotations.renamed_from.is_some() {
        errors.push(ValidationError::CannotRenameHydratedField {
            field: field.clone(),
        });
    }
    if definition.ty.is_non_null() {
        errors.push(ValidationError::HydrationFieldMustBeNullable {
            field: field.clone(),
            output_type: definition.ty.clone(),
        });
    }
    if annotations.hydrations.len() > 1 {
        errors.extend(check_polymorphism(context, &field, definition, annotations));
    }
    for hydration in &annotations.hydrations {
        trace!(
            "Checking hydration of {} through {}",
            field,
            hydration.backing_field_path()
        );
        let checker = HydrationChecker {
            context,
            field: &field,
            definition,
            underlying_parent,
            hydration,
        };
        errors.extend(checker.check());
    }
    errors
}

/// Several hydrations on one field pick among the members of an abstract output type, and must
/// agree on how they are executed.
fn check_polymorphism(
    context: &ServiceContext,
    field: &ServiceField,
    definition: &FieldDefinition,
    annotations: &FieldAnnotations,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let output_type = definition.ty.inner_named_type();
    if !matches!(
        context.engine().types.get(output_type),
        Some(ExtendedType::Union(_) | ExtendedType::Interface(_))
    ) {
        errors.push(ValidationError::PolymorphicHydrationMustOutputUnion {
            field: field.clone(),
            output_type: output_type.clone(),
        });
    }
    if !annotations
        .hydrations
        .iter()
        .map(|hydration| is_batched(context.engine(), hydration))
        .all_equal()
    {
        errors.push(ValidationError::HydrationTypeMismatch {
            field: field.clone(),
        });
    }
    if !annotations
        .hydrations
        .iter()
        .map(|hydration| hydration.indexed)
        .all_equal()
    {
        errors.push(ValidationError::MixedIndexHydration {
            field: field.clone(),
        });
    }
    errors
}

/// Resolves a dotted backing field path from the overall query type.
pub(crate) fn backing_field<'s>(
    engine: &'s Schema,
    path: &[String],
) -> Option<&'s Component<FieldDefinition>> {
    let mut current = engine.types.get(root_type_name(engine, RootKind::Query)?)?;
    let (last, intermediate) = path.split_last()?;
    for segment in intermediate {
        let field = field_definition(current, segment)?;
        current = engine.types.get(field.ty.inner_named_type())?;
    }
    field_definition(current, last)
}

/// A batched hydration resolves many parents with one backing call taking a list of inputs.
pub(crate) fn is_batched(engine: &Schema, hydration: &HydrationDefinition) -> bool {
    hydration.identified_by.is_some()
        || hydration.indexed
        || takes_source_list(engine, hydration)
}

/// Whether a `$source` value is passed to a list argument of the backing field.
fn takes_source_list(engine: &Schema, hydration: &HydrationDefinition) -> bool {
    let Some(backing) = backing_field(engine, &hydration.backing_field) else {
        return false;
    };
    hydration.source_arguments().any(|(argument, _)| {
        argument_definition(backing, argument).is_some_and(|argument| is_list_type(&argument.ty))
    })
}

/// Type of the underlying field at `path` from `parent`.
///
/// Stepping through a list field yields a list of what follows it.
pub(crate) fn source_field_type(
    underlying: &Schema,
    parent: &ExtendedType,
    path: &[Name],
) -> Option<Type> {
    let (last, intermediate) = path.split_last()?;
    let mut current = parent;
    let mut lists = 0;
    for segment in intermediate {
        let field = field_definition(current, segment)?;
        if is_list_type(&field.ty) {
            lists += 1;
        }
        current = underlying.types.get(field.ty.inner_named_type())?;
    }
    let field = field_definition(current, last)?;
    Some(wrap_in_lists(field.ty.clone(), lists))
}

struct HydrationChecker<'c, 'a> {
    context: &'c ServiceContext<'a>,
    field: &'c ServiceField,
    definition: &'c FieldDefinition,
    underlying_parent: &'c ExtendedType,
    hydration: &'c HydrationDefinition,
}

impl HydrationChecker<'_, '_> {
    fn check(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Some(service) = &self.hydration.backing_service {
            if self.context.schemas.service(service).is_none() {
                errors.push(ValidationError::MissingHydrationBackingService {
                    field: self.field.clone(),
                    backing_service: service.clone(),
                });
            }
        }
        let engine = self.context.engine();
        let Some(backing) = backing_field(engine, &self.hydration.backing_field) else {
            errors.push(ValidationError::HydrationReferencesNonExistentBackingField {
                field: self.field.clone(),
                backing_field: self.hydration.backing_field.clone(),
            });
            return errors;
        };
        let batched = is_batched(engine, self.hydration);

        errors.extend(
            arguments::ArgumentChecker {
                context: self.context,
                field: self.field,
                definition: self.definition,
                underlying_parent: self.underlying_parent,
                hydration: self.hydration,
                backing,
                batched,
            }
            .check(),
        );
        errors.extend(self.check_batching(batched));
        errors.extend(self.check_output_type(backing));
        if let Some(condition) = &self.hydration.condition {
            errors.extend(condition::check_condition(
                self.context,
                self.field,
                self.underlying_parent,
                condition,
            ));
        }
        errors
    }

    fn check_batching(&self, batched: bool) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if batched && self.hydration.source_arguments().count() > 1 {
            errors.push(ValidationError::BatchHydrationArgumentMultipleSourceFields {
                field: self.field.clone(),
                backing_field: self.hydration.backing_field.clone(),
            });
        }
        if takes_source_list(self.context.engine(), self.hydration)
            && !self.hydration.indexed
            && self.hydration.identified_by.is_none()
        {
            errors.push(ValidationError::BatchHydrationMissingIdentifiedBy {
                field: self.field.clone(),
                backing_field: self.hydration.backing_field.clone(),
            });
        }
        errors
    }

    fn check_output_type(&self, backing: &FieldDefinition) -> Vec<ValidationError> {
        let output_type = self.definition.ty.inner_named_type();
        let backing_type = backing.ty.inner_named_type();
        if self.context.schemas.is_virtual_type(output_type) {
            return virtual_type::check_against_backing_type(
                self.context,
                output_type,
                backing_type,
            );
        }
        if self.produces(output_type, backing_type) {
            return Vec::new();
        }
        vec![ValidationError::HydrationIncompatibleOutputType {
            field: self.field.clone(),
            backing_field: self.hydration.backing_field.clone(),
            backing_type: backing_type.clone(),
            output_type: output_type.clone(),
        }]
    }

    /// Whether values of `backing_type` can be returned where `output_type` is declared.
    fn produces(&self, output_type: &Name, backing_type: &Name) -> bool {
        if output_type == backing_type {
            return true;
        }
        let engine = self.context.engine();
        match engine.types.get(output_type) {
            Some(union @ ExtendedType::Union(_)) => is_union_member(union, backing_type),
            Some(ExtendedType::Interface(_)) => match engine.types.get(backing_type) {
                Some(ExtendedType::Object(object)) => object
                    .implements_interfaces
                    .iter()
                    .any(|interface| interface.name == *output_type),
                Some(ExtendedType::Interface(interface)) => interface
                    .implements_interfaces
                    .iter()
                    .any(|implemented| implemented.name == *output_type),
                _ => false,
            },
            _ => false,
        }
    }
}
