//! Wiring of hydration arguments into backing field arguments.
use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::ast::Type;
use apollo_compiler::ast::Value;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::InputObjectType;
use apollo_compiler::Name;
use apollo_compiler::Schema;
use indexmap::IndexSet;

use crate::schema::definitions::is_required_input;
use crate::schema::definitions::list_depth;
use crate::schema::directives::HydrationArgumentValue;
use crate::schema::directives::HydrationDefinition;
use crate::validation::assignable::is_assignable;
use crate::validation::assignable::is_field_argument_assignable;
use crate::validation::assignable::is_id_coercible;
use crate::validation::assignable::is_source_assignable;
use crate::validation::assignable::Position;
use crate::validation::element::ServiceField;
use crate::validation::hydration::source_field_type;
use crate::validation::matcher::argument_definition;
use crate::validation::matcher::field_definition;
use crate::validation::ServiceContext;
use crate::validation::ValidationError;

pub(super) struct ArgumentChecker<'c, 'a> {
    pub(super) context: &'c ServiceContext<'a>,
    pub(super) field: &'c ServiceField,
    /// The hydrated field.
    pub(super) definition: &'c FieldDefinition,
    pub(super) underlying_parent: &'c ExtendedType,
    pub(super) hydration: &'c HydrationDefinition,
    pub(super) backing: &'c FieldDefinition,
    pub(super) batched: bool,
}

impl ArgumentChecker<'_, '_> {
    pub(super) fn check(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen = IndexSet::new();
        for argument in &self.hydration.arguments {
            if !seen.insert(&argument.name) {
                errors.push(ValidationError::DuplicatedHydrationArgument {
                    field: self.field.clone(),
                    argument: argument.name.clone(),
                });
                continue;
            }
            let Some(backing_argument) = argument_definition(self.backing, &argument.name) else {
                errors.push(ValidationError::NonExistentHydrationBackingFieldArgument {
                    field: self.field.clone(),
                    backing_field: self.hydration.backing_field.clone(),
                    argument: argument.name.clone(),
                });
                continue;
            };
            match &argument.value {
                HydrationArgumentValue::SourceField(path) => {
                    match source_field_type(self.context.underlying, self.underlying_parent, path) {
                        Some(supplied) => errors.extend(self.check_source_value(
                            &argument.name,
                            &supplied,
                            &backing_argument.ty,
                        )),
                        None => errors.push(ValidationError::MissingHydrationFieldValueSource {
                            field: self.field.clone(),
                            argument: argument.name.clone(),
                            source_path: path.iter().map(Name::to_string).collect(),
                        }),
                    }
                }
                HydrationArgumentValue::FieldArgument(name) => {
                    match argument_definition(self.definition, name) {
                        Some(field_argument) => errors.extend(self.check_field_argument(
                            &argument.name,
                            &field_argument.ty,
                            &backing_argument.ty,
                        )),
                        None => {
                            errors.push(ValidationError::MissingHydrationArgumentValueSource {
                                field: self.field.clone(),
                                argument: argument.name.clone(),
                                field_argument: name.clone(),
                            })
                        }
                    }
                }
                HydrationArgumentValue::StaticValue(value) => {
                    if !value_fits(self.context.engine(), value, &backing_argument.ty) {
                        errors.push(ValidationError::StaticHydrationArgumentNotAssignable {
                            field: self.field.clone(),
                            argument: argument.name.clone(),
                            required_type: (*backing_argument.ty).clone(),
                        });
                    }
                }
            }
        }

        for backing_argument in &self.backing.arguments {
            let supplied = self
                .hydration
                .arguments
                .iter()
                .any(|argument| argument.name == backing_argument.name);
            if !supplied
                && is_required_input(
                    &backing_argument.ty,
                    backing_argument.default_value.is_some(),
                )
            {
                errors.push(ValidationError::MissingRequiredHydrationBackingFieldArgument {
                    field: self.field.clone(),
                    backing_field: self.hydration.backing_field.clone(),
                    argument: backing_argument.name.clone(),
                });
            }
        }
        errors
    }

    fn id_coercion(&self) -> bool {
        self.context.options.hydration_id_coercion
    }

    /// Compares an underlying source field type with an overall argument type.
    fn source_names_compatible(&self, overall: &Name, underlying: &Name) -> bool {
        self.context.renames.names_equal(overall, underlying)
            || (self.id_coercion() && is_id_coercible(overall, underlying))
    }

    /// Compares two overall types.
    fn overall_names_compatible(&self, supplied: &Name, required: &Name) -> bool {
        supplied == required || (self.id_coercion() && is_id_coercible(supplied, required))
    }

    fn incompatible(&self, argument: &Name, supplied: &Type, required: &Type) -> ValidationError {
        ValidationError::IncompatibleHydrationArgumentType {
            field: self.field.clone(),
            argument: argument.clone(),
            supplied_type: supplied.clone(),
            required_type: required.clone(),
        }
    }

    fn check_source_value(
        &self,
        argument: &Name,
        supplied: &Type,
        required: &Type,
    ) -> Vec<ValidationError> {
        let engine = self.context.engine();
        let names_compatible =
            |overall: &Name, underlying: &Name| self.source_names_compatible(overall, underlying);
        if let Some(ExtendedType::InputObject(input)) =
            engine.types.get(required.inner_named_type())
        {
            if !is_source_assignable(supplied, required, self.batched, &|_: &Name, _: &Name| true) {
                return vec![self.incompatible(argument, supplied, required)];
            }
            let mut errors = Vec::new();
            self.check_source_object(
                argument,
                input,
                supplied.inner_named_type(),
                &mut IndexSet::new(),
                &mut errors,
            );
            return errors;
        }
        if is_source_assignable(supplied, required, self.batched, &names_compatible) {
            Vec::new()
        } else {
            vec![self.incompatible(argument, supplied, required)]
        }
    }

    /// An underlying object passed as an input object must carry every required input field.
    fn check_source_object(
        &self,
        argument: &Name,
        input: &InputObjectType,
        source_type: &Name,
        visited: &mut IndexSet<(Name, Name)>,
        errors: &mut Vec<ValidationError>,
    ) {
        if !visited.insert((input.name.clone(), source_type.clone())) {
            return;
        }
        let Some(source) = self.context.underlying.types.get(source_type) else {
            return;
        };
        let names_compatible =
            |overall: &Name, underlying: &Name| self.source_names_compatible(overall, underlying);
        for (name, input_field) in &input.fields {
            let Some(source_field) = field_definition(source, name) else {
                if is_required_input(&input_field.ty, input_field.default_value.is_some()) {
                    errors.push(ValidationError::MissingFieldInHydratedInputObject {
                        field: self.field.clone(),
                        argument: argument.clone(),
                        input_type: input.name.clone(),
                        input_field: name.clone(),
                    });
                }
                continue;
            };
            let compatible = match self
                .context
                .engine()
                .types
                .get(input_field.ty.inner_named_type())
            {
                Some(ExtendedType::InputObject(nested)) => {
                    let same_depth = list_depth(&source_field.ty) == list_depth(&input_field.ty);
                    if same_depth {
                        self.check_source_object(
                            argument,
                            nested,
                            source_field.ty.inner_named_type(),
                            visited,
                            errors,
                        );
                    }
                    same_depth
                }
                _ => is_source_assignable(
                    &source_field.ty,
                    &input_field.ty,
                    false,
                    &names_compatible,
                ),
            };
            if !compatible {
                errors.push(ValidationError::IncompatibleFieldInHydratedInputObject {
                    field: self.field.clone(),
                    argument: argument.clone(),
                    input_type: input.name.clone(),
                    input_field: name.clone(),
                });
            }
        }
    }

    fn check_field_argument(
        &self,
        argument: &Name,
        supplied: &Type,
        required: &Type,
    ) -> Vec<ValidationError> {
        let engine = self.context.engine();
        let names_compatible =
            |supplied: &Name, required: &Name| self.overall_names_compatible(supplied, required);
        if let (
            Some(ExtendedType::InputObject(required_input)),
            Some(ExtendedType::InputObject(supplied_input)),
        ) = (
            engine.types.get(required.inner_named_type()),
            engine.types.get(supplied.inner_named_type()),
        ) {
            if required_input.name != supplied_input.name {
                if !is_field_argument_assignable(
                    supplied,
                    required,
                    self.batched,
                    &|_: &Name, _: &Name| true,
                ) {
                    return vec![self.incompatible(argument, supplied, required)];
                }
                let mut errors = Vec::new();
                self.check_argument_object(
                    argument,
                    supplied_input,
                    required_input,
                    &mut IndexSet::new(),
                    &mut errors,
                );
                return errors;
            }
        }
        if is_field_argument_assignable(supplied, required, self.batched, &names_compatible) {
            Vec::new()
        } else {
            vec![self.incompatible(argument, supplied, required)]
        }
    }

    /// Input objects of different names are compatible when the supplied one carries every
    /// required field of the other.
    fn check_argument_object(
        &self,
        argument: &Name,
        supplied: &InputObjectType,
        required: &InputObjectType,
        visited: &mut IndexSet<(Name, Name)>,
        errors: &mut Vec<ValidationError>,
    ) {
        if !visited.insert((supplied.name.clone(), required.name.clone())) {
            return;
        }
        let engine = self.context.engine();
        let names_compatible =
            |supplied: &Name, required: &Name| self.overall_names_compatible(supplied, required);
        for (name, required_field) in &required.fields {
            let Some(supplied_field) = supplied.fields.get(name) else {
                if is_required_input(&required_field.ty, required_field.default_value.is_some()) {
                    errors.push(ValidationError::MissingFieldInHydratedInputObject {
                        field: self.field.clone(),
                        argument: argument.clone(),
                        input_type: required.name.clone(),
                        input_field: name.clone(),
                    });
                }
                continue;
            };
            let compatible = match (
                engine.types.get(supplied_field.ty.inner_named_type()),
                engine.types.get(required_field.ty.inner_named_type()),
            ) {
                (
                    Some(ExtendedType::InputObject(supplied_nested)),
                    Some(ExtendedType::InputObject(required_nested)),
                ) if supplied_nested.name != required_nested.name => {
                    let shape_fits = is_assignable(
                        &supplied_field.ty,
                        &required_field.ty,
                        Position::Input,
                        &|_: &Name, _: &Name| true,
                    );
                    if shape_fits {
                        self.check_argument_object(
                            argument,
                            supplied_nested,
                            required_nested,
                            visited,
                            errors,
                        );
                    }
                    shape_fits
                }
                _ => is_assignable(
                    &supplied_field.ty,
                    &required_field.ty,
                    Position::Input,
                    &names_compatible,
                ),
            };
            if !compatible {
                errors.push(ValidationError::IncompatibleFieldInHydratedInputObject {
                    field: self.field.clone(),
                    argument: argument.clone(),
                    input_type: required.name.clone(),
                    input_field: name.clone(),
                });
            }
        }
    }
}

/// Whether a literal is a valid value of `ty`, following input coercion rules.
pub(crate) fn value_fits(engine: &Schema, value: &Value, ty: &Type) -> bool {
    match (value, ty) {
        (Value::Null, _) => !ty.is_non_null(),
        (Value::Variable(_), _) => true,
        (Value::List(items), Type::List(item_type) | Type::NonNullList(item_type)) => items
            .iter()
            .all(|item| value_fits(engine, item, item_type)),
        // A single value is coerced into a list of one.
        (_, Type::List(item_type) | Type::NonNullList(item_type)) => {
            value_fits(engine, value, item_type)
        }
        _ => named_value_fits(engine, value, ty.inner_named_type()),
    }
}

fn named_value_fits(engine: &Schema, value: &Value, type_name: &Name) -> bool {
    match engine.types.get(type_name) {
        Some(ExtendedType::Scalar(_)) => match type_name.as_str() {
            "Int" => matches!(value, Value::Int(_)),
            "Float" => matches!(value, Value::Int(_) | Value::Float(_)),
            "String" => matches!(value, Value::String(_)),
            "Boolean" => matches!(value, Value::Boolean(_)),
            "ID" => matches!(value, Value::String(_) | Value::Int(_)),
            // Custom scalars accept any literal but a list.
            _ => !matches!(value, Value::List(_)),
        },
        Some(ExtendedType::Enum(enum_type)) => match value {
            Value::Enum(name) => enum_type.values.contains_key(name.as_str()),
            _ => false,
        },
        Some(ExtendedType::InputObject(input)) => match value {
            Value::Object(fields) => {
                fields.iter().all(|(name, value)| {
                    input
                        .fields
                        .get(name.as_str())
                        .is_some_and(|field| value_fits(engine, value, &field.ty))
                }) && input.fields.iter().all(|(name, field)| {
                    !is_required_input(&field.ty, field.default_value.is_some())
                        || fields.iter().any(|(provided, _)| provided == name)
                })
            }
            _ => false,
        },
        _ => false,
    }
}
