use apollo_compiler::ast::Type;
use apollo_compiler::Name;
use itertools::Itertools;
use serde_json::json;
use serde_json::Value as JsonValue;

use crate::schema::definitions::TypeKind;
use crate::schema::ServiceName;
use crate::validation::element::FieldCoordinate;
use crate::validation::element::FieldRef;
use crate::validation::element::SchemaCoordinate;
use crate::validation::element::ServiceField;
use crate::validation::element::TypeRef;

fn join(names: &[Name]) -> String {
    names.iter().map(|name| format!("`{name}`")).join(", ")
}

fn dotted(segments: &[String]) -> String {
    segments.join(".")
}

/// A single inconsistency between the overall schema and an underlying schema.
///
/// Every variant is a hard failure: an empty set of errors means the mapping is accepted.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    #[error("Type `{overall_type}` of service `{service}` has no underlying type `{underlying_type}`")]
    MissingUnderlyingType {
        service: ServiceName,
        overall_type: Name,
        underlying_type: Name,
    },
    #[error(
        "Types {} of service `{service}` all map to the same underlying type `{underlying_type}`",
        join(.overall_types)
    )]
    DuplicatedUnderlyingType {
        service: ServiceName,
        underlying_type: Name,
        overall_types: Vec<Name>,
    },
    #[error(
        "Overall {overall_kind} `{}` of service `{}` maps to underlying {underlying_kind} `{}`",
        .ty.overall, .ty.service, .ty.underlying
    )]
    IncompatibleType {
        ty: TypeRef,
        overall_kind: TypeKind,
        underlying_kind: TypeKind,
    },
    #[error(
        "Field `{}.{field}` of service `{}` has no underlying field `{}.{}`",
        .parent.overall, .parent.service, .parent.underlying, dotted(.underlying_path)
    )]
    MissingUnderlyingField {
        parent: TypeRef,
        field: Name,
        underlying_path: Vec<String>,
    },
    #[error(
        "Field `{}.{field}` of service `{}` is renamed through list field `{list_field}`, deep renames may only traverse non-list fields",
        .parent.overall, .parent.service
    )]
    CannotRenameThroughListField {
        parent: TypeRef,
        field: Name,
        list_field: FieldCoordinate,
    },
    #[error(
        "Field `{}` of service `{}` has type `{overall_type}` which is incompatible with underlying type `{underlying_type}`",
        .field.overall, .field.service
    )]
    IncompatibleFieldOutputType {
        field: FieldRef,
        overall_type: Type,
        underlying_type: Type,
    },
    #[error(
        "Argument `{argument}` of field `{}` in service `{}` does not exist on underlying field `{}`",
        .field.overall, .field.service, .field.underlying
    )]
    MissingArgumentOnUnderlying { field: FieldRef, argument: Name },
    #[error(
        "Argument `{argument}` of field `{}` in service `{}` has type `{overall_type}` which cannot be passed to underlying type `{underlying_type}`",
        .field.overall, .field.service
    )]
    IncompatibleArgumentInputType {
        field: FieldRef,
        argument: Name,
        overall_type: Type,
        underlying_type: Type,
    },
    #[error(
        "Underlying field `{}` in service `{}` requires argument `{argument}: {underlying_type}` which overall field `{}` does not declare",
        .field.underlying, .field.service, .field.overall
    )]
    MissingRequiredUnderlyingArgument {
        field: FieldRef,
        argument: Name,
        underlying_type: Type,
    },
    #[error(
        "Input field `{}.{field}` of service `{}` does not exist on underlying input type `{}`",
        .ty.overall, .ty.service, .ty.underlying
    )]
    MissingUnderlyingInputField { ty: TypeRef, field: Name },
    #[error(
        "Input field `{}.{field}` of service `{}` has type `{overall_type}` which cannot be passed to underlying type `{underlying_type}`",
        .ty.overall, .ty.service
    )]
    IncompatibleInputFieldType {
        ty: TypeRef,
        field: Name,
        overall_type: Type,
        underlying_type: Type,
    },
    #[error(
        "Underlying input type `{}` in service `{}` requires field `{field}` which overall input type `{}` does not declare",
        .ty.underlying, .ty.service, .ty.overall
    )]
    MissingRequiredUnderlyingInputField { ty: TypeRef, field: Name },
    #[error(
        "Enum value `{}.{value}` of service `{}` does not exist on underlying enum `{}`",
        .ty.overall, .ty.service, .ty.underlying
    )]
    MissingUnderlyingEnumValue { ty: TypeRef, value: Name },
    #[error("Interface `{interface}` has no implementing object type in service `{service}`")]
    MissingConcreteTypes {
        service: ServiceName,
        interface: Name,
    },
    #[error(
        "Union `{}` of service `{}` declares member `{member}` which underlying union `{}` does not have",
        .union.overall, .union.service, .union.underlying
    )]
    UnionHasExtraType { union: TypeRef, member: Name },
    #[error(
        "Namespaced field `{field}` must output an object type, but `{output_type}` is {kind}"
    )]
    NamespacedTypeMustBeObject {
        field: ServiceField,
        output_type: Name,
        kind: TypeKind,
    },

    #[error("Hydrated field `{field}` references service `{backing_service}` which does not exist")]
    MissingHydrationBackingService {
        field: ServiceField,
        backing_service: String,
    },
    #[error(
        "Hydrated field `{field}` references backing field `{}` which does not exist",
        dotted(.backing_field)
    )]
    HydrationReferencesNonExistentBackingField {
        field: ServiceField,
        backing_field: Vec<String>,
    },
    #[error("Hydrated field `{field}` has type `{output_type}` but hydrated fields must be nullable")]
    HydrationFieldMustBeNullable {
        field: ServiceField,
        output_type: Type,
    },
    #[error("Field `{field}` cannot be both @renamed and @hydrated")]
    CannotRenameHydratedField { field: ServiceField },
    #[error(
        "Hydration argument `{argument}` of field `{field}` reads `$source.{}` which does not exist on the underlying type",
        dotted(.source_path)
    )]
    MissingHydrationFieldValueSource {
        field: ServiceField,
        argument: Name,
        source_path: Vec<String>,
    },
    #[error(
        "Hydration argument `{argument}` of field `{field}` reads `$argument.{field_argument}` which the field does not declare"
    )]
    MissingHydrationArgumentValueSource {
        field: ServiceField,
        argument: Name,
        field_argument: Name,
    },
    #[error(
        "Hydrated field `{field}` passes argument `{argument}` which backing field `{}` does not declare",
        dotted(.backing_field)
    )]
    NonExistentHydrationBackingFieldArgument {
        field: ServiceField,
        backing_field: Vec<String>,
        argument: Name,
    },
    #[error("Hydrated field `{field}` passes argument `{argument}` more than once")]
    DuplicatedHydrationArgument { field: ServiceField, argument: Name },
    #[error(
        "Hydrated field `{field}` does not pass required argument `{argument}` of backing field `{}`",
        dotted(.backing_field)
    )]
    MissingRequiredHydrationBackingFieldArgument {
        field: ServiceField,
        backing_field: Vec<String>,
        argument: Name,
    },
    #[error(
        "Batched hydration of field `{field}` through `{}` may only take a single $source argument",
        dotted(.backing_field)
    )]
    BatchHydrationArgumentMultipleSourceFields {
        field: ServiceField,
        backing_field: Vec<String>,
    },
    #[error(
        "Batched hydration of field `{field}` through `{}` must declare identifiedBy or be indexed",
        dotted(.backing_field)
    )]
    BatchHydrationMissingIdentifiedBy {
        field: ServiceField,
        backing_field: Vec<String>,
    },
    #[error(
        "Hydration argument `{argument}` of field `{field}` supplies `{supplied_type}` but the backing argument expects `{required_type}`"
    )]
    IncompatibleHydrationArgumentType {
        field: ServiceField,
        argument: Name,
        supplied_type: Type,
        required_type: Type,
    },
    #[error(
        "Hydration argument `{argument}` of field `{field}` does not supply field `{input_field}` required by input type `{input_type}`"
    )]
    MissingFieldInHydratedInputObject {
        field: ServiceField,
        argument: Name,
        input_type: Name,
        input_field: Name,
    },
    #[error(
        "Hydration argument `{argument}` of field `{field}` supplies field `{input_field}` of input type `{input_type}` with an incompatible type"
    )]
    IncompatibleFieldInHydratedInputObject {
        field: ServiceField,
        argument: Name,
        input_type: Name,
        input_field: Name,
    },
    #[error(
        "Hydration argument `{argument}` of field `{field}` has a static value which is not a valid `{required_type}`"
    )]
    StaticHydrationArgumentNotAssignable {
        field: ServiceField,
        argument: Name,
        required_type: Type,
    },
    #[error(
        "Hydrated field `{field}` outputs `{output_type}` but backing field `{}` outputs `{backing_type}`",
        dotted(.backing_field)
    )]
    HydrationIncompatibleOutputType {
        field: ServiceField,
        backing_field: Vec<String>,
        backing_type: Name,
        output_type: Name,
    },
    #[error(
        "Field `{field}` declares several hydrations so it must output a union or interface, not `{output_type}`"
    )]
    PolymorphicHydrationMustOutputUnion {
        field: ServiceField,
        output_type: Name,
    },
    #[error("Hydrations of field `{field}` must either all be batched or none be batched")]
    HydrationTypeMismatch { field: ServiceField },
    #[error("Hydrations of field `{field}` must either all be indexed or none be indexed")]
    MixedIndexHydration { field: ServiceField },
    #[error(
        "Hydration condition of field `{field}` reads source field `{}` which does not exist on the underlying type",
        dotted(.source_field)
    )]
    HydrationConditionSourceFieldDoesNotExist {
        field: ServiceField,
        source_field: Vec<String>,
    },
    #[error(
        "Hydration condition of field `{field}` cannot be applied to source field `{}` of type `{source_type}`",
        dotted(.source_field)
    )]
    HydrationConditionUnsupportedFieldType {
        field: ServiceField,
        source_field: Vec<String>,
        source_type: Type,
    },
    #[error(
        "Hydration condition of field `{field}` compares source field `{}` of type `{source_type}` with a value of another type",
        dotted(.source_field)
    )]
    HydrationConditionPredicateDoesNotMatchSourceFieldType {
        field: ServiceField,
        source_field: Vec<String>,
        source_type: Type,
    },
    #[error("Hydration condition of field `{field}` uses invalid regex `{regex}`: {reason}")]
    HydrationConditionInvalidRegex {
        field: ServiceField,
        regex: String,
        reason: String,
    },

    #[error("@partition cannot be applied to subscription field `{field}`")]
    PartitionAppliedToSubscriptionField { field: ServiceField },
    #[error(
        "@partition can only be applied to top level query and mutation fields, not `{field}`"
    )]
    PartitionAppliedToUnsupportedField { field: ServiceField },
    #[error("Field `{field}` cannot be both @renamed and @partition")]
    CannotRenamePartitionedField { field: ServiceField },
    #[error("@partition cannot be applied to field `{field}` which outputs `{output_type}`")]
    PartitionAppliedToFieldWithUnsupportedOutputType {
        field: ServiceField,
        output_type: Type,
    },
    #[error(
        "@partition path `{}` of field `{field}` does not lead to a list argument",
        dotted(.path)
    )]
    InvalidPartitionArgument {
        field: ServiceField,
        path: Vec<String>,
    },

    #[error("@virtualType can only be applied to object types but `{ty}` is {kind}")]
    VirtualTypeIllegalType {
        service: ServiceName,
        ty: Name,
        kind: TypeKind,
    },
    #[error(
        "Virtual field `{virtual_field}` of service `{service}` has no counterpart on backing type `{backing_type}`"
    )]
    VirtualTypeMissingBackingField {
        service: ServiceName,
        virtual_field: FieldCoordinate,
        backing_type: Name,
    },
    #[error(
        "Argument `{argument}` of virtual field `{virtual_field}` does not exist on backing field `{backing_field}`"
    )]
    VirtualTypeMissingBackingFieldArgument {
        service: ServiceName,
        virtual_field: FieldCoordinate,
        backing_field: FieldCoordinate,
        argument: Name,
    },
    #[error(
        "Argument `{argument}` of virtual field `{virtual_field}` has type `{virtual_type}` but backing field `{backing_field}` declares `{backing_type}`"
    )]
    VirtualTypeIncompatibleFieldArgument {
        service: ServiceName,
        virtual_field: FieldCoordinate,
        backing_field: FieldCoordinate,
        argument: Name,
        virtual_type: Type,
        backing_type: Type,
    },
    #[error(
        "Virtual field `{virtual_field}` has type `{virtual_type}` but backing field `{backing_field}` has type `{backing_type}`"
    )]
    VirtualTypeIncompatibleFieldOutputType {
        service: ServiceName,
        virtual_field: FieldCoordinate,
        backing_field: FieldCoordinate,
        virtual_type: Type,
        backing_type: Type,
    },

    #[error("Stubbed type `{ty}` of service `{service}` cannot implement interfaces {}", join(.interfaces))]
    StubbedTypeMustNotImplement {
        service: ServiceName,
        ty: Name,
        interfaces: Vec<Name>,
    },
    #[error("Field `{field}` is stubbed so it must be nullable, but has type `{output_type}`")]
    StubbedMustBeNullable {
        field: ServiceField,
        output_type: Type,
    },
    #[error("Field `{field}` cannot be both @stubbed and @{other_directive}")]
    StubbedMustBeUsedExclusively {
        field: ServiceField,
        other_directive: &'static str,
    },
}

impl ValidationError {
    /// Stable identifier of the error kind, e.g. `MISSING_UNDERLYING_FIELD`.
    pub fn code(&self) -> &'static str {
        self.into()
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The service whose mapping is inconsistent.
    pub fn service(&self) -> &ServiceName {
        use ValidationError as E;

        match self {
            E::MissingUnderlyingType { service, .. }
            | E::DuplicatedUnderlyingType { service, .. }
            | E::MissingConcreteTypes { service, .. }
            | E::VirtualTypeIllegalType { service, .. }
            | E::VirtualTypeMissingBackingField { service, .. }
            | E::VirtualTypeMissingBackingFieldArgument { service, .. }
            | E::VirtualTypeIncompatibleFieldArgument { service, .. }
            | E::VirtualTypeIncompatibleFieldOutputType { service, .. }
            | E::StubbedTypeMustNotImplement { service, .. } => service,
            E::IncompatibleType { ty, .. }
            | E::MissingUnderlyingInputField { ty, .. }
            | E::IncompatibleInputFieldType { ty, .. }
            | E::MissingRequiredUnderlyingInputField { ty, .. }
            | E::MissingUnderlyingEnumValue { ty, .. } => &ty.service,
            E::MissingUnderlyingField { parent, .. }
            | E::CannotRenameThroughListField { parent, .. } => &parent.service,
            E::UnionHasExtraType { union, .. } => &union.service,
            E::IncompatibleFieldOutputType { field, .. }
            | E::MissingArgumentOnUnderlying { field, .. }
            | E::IncompatibleArgumentInputType { field, .. }
            | E::MissingRequiredUnderlyingArgument { field, .. } => &field.service,
            E::NamespacedTypeMustBeObject { field, .. }
            | E::MissingHydrationBackingService { field, .. }
            | E::HydrationReferencesNonExistentBackingField { field, .. }
            | E::HydrationFieldMustBeNullable { field, .. }
            | E::CannotRenameHydratedField { field }
            | E::MissingHydrationFieldValueSource { field, .. }
            | E::MissingHydrationArgumentValueSource { field, .. }
            | E::NonExistentHydrationBackingFieldArgument { field, .. }
            | E::DuplicatedHydrationArgument { field, .. }
            | E::MissingRequiredHydrationBackingFieldArgument { field, .. }
            | E::BatchHydrationArgumentMultipleSourceFields { field, .. }
            | E::BatchHydrationMissingIdentifiedBy { field, .. }
            | E::IncompatibleHydrationArgumentType { field, .. }
            | E::MissingFieldInHydratedInputObject { field, .. }
            | E::IncompatibleFieldInHydratedInputObject { field, .. }
            | E::StaticHydrationArgumentNotAssignable { field, .. }
            | E::HydrationIncompatibleOutputType { field, .. }
            | E::PolymorphicHydrationMustOutputUnion { field, .. }
            | E::HydrationTypeMismatch { field }
            | E::MixedIndexHydration { field }
            | E::HydrationConditionSourceFieldDoesNotExist { field, .. }
            | E::HydrationConditionUnsupportedFieldType { field, .. }
            | E::HydrationConditionPredicateDoesNotMatchSourceFieldType { field, .. }
            | E::HydrationConditionInvalidRegex { field, .. }
            | E::PartitionAppliedToSubscriptionField { field }
            | E::PartitionAppliedToUnsupportedField { field }
            | E::CannotRenamePartitionedField { field }
            | E::PartitionAppliedToFieldWithUnsupportedOutputType { field, .. }
            | E::InvalidPartitionArgument { field, .. }
            | E::StubbedMustBeNullable { field, .. }
            | E::StubbedMustBeUsedExclusively { field, .. } => &field.service,
        }
    }

    /// The overall schema element the error is primarily about.
    pub fn subject(&self) -> SchemaCoordinate {
        use ValidationError as E;

        let member = |ty: &Name, member: &Name| {
            SchemaCoordinate::Member(FieldCoordinate::new(ty, member))
        };
        match self {
            E::MissingUnderlyingType { overall_type, .. } => {
                SchemaCoordinate::Type(overall_type.clone())
            }
            E::DuplicatedUnderlyingType {
                overall_types,
                underlying_type,
                ..
            } => SchemaCoordinate::Type(overall_types.first().unwrap_or(underlying_type).clone()),
            E::IncompatibleType { ty, .. } => SchemaCoordinate::Type(ty.overall.clone()),
            E::MissingConcreteTypes { interface, .. } => SchemaCoordinate::Type(interface.clone()),
            E::UnionHasExtraType { union, .. } => SchemaCoordinate::Type(union.overall.clone()),
            E::VirtualTypeIllegalType { ty, .. } | E::StubbedTypeMustNotImplement { ty, .. } => {
                SchemaCoordinate::Type(ty.clone())
            }
            E::MissingUnderlyingField { parent, field, .. }
            | E::CannotRenameThroughListField { parent, field, .. } => {
                member(&parent.overall, field)
            }
            E::MissingUnderlyingInputField { ty, field }
            | E::IncompatibleInputFieldType { ty, field, .. }
            | E::MissingRequiredUnderlyingInputField { ty, field } => member(&ty.overall, field),
            E::MissingUnderlyingEnumValue { ty, value } => member(&ty.overall, value),
            E::IncompatibleFieldOutputType { field, .. }
            | E::MissingRequiredUnderlyingArgument { field, .. } => {
                SchemaCoordinate::Member(field.overall.clone())
            }
            E::MissingArgumentOnUnderlying { field, argument }
            | E::IncompatibleArgumentInputType { field, argument, .. } => {
                SchemaCoordinate::Argument(field.overall.argument(argument))
            }
            E::VirtualTypeMissingBackingField { virtual_field, .. }
            | E::VirtualTypeIncompatibleFieldOutputType { virtual_field, .. } => {
                SchemaCoordinate::Member(virtual_field.clone())
            }
            E::VirtualTypeMissingBackingFieldArgument {
                virtual_field,
                argument,
                ..
            }
            | E::VirtualTypeIncompatibleFieldArgument {
                virtual_field,
                argument,
                ..
            } => SchemaCoordinate::Argument(virtual_field.argument(argument)),
            E::MissingHydrationArgumentValueSource {
                field, field_argument, ..
            } => SchemaCoordinate::Argument(field.field.argument(field_argument)),
            E::NamespacedTypeMustBeObject { field, .. }
            | E::MissingHydrationBackingService { field, .. }
            | E::HydrationReferencesNonExistentBackingField { field, .. }
            | E::HydrationFieldMustBeNullable { field, .. }
            | E::CannotRenameHydratedField { field }
            | E::MissingHydrationFieldValueSource { field, .. }
            | E::NonExistentHydrationBackingFieldArgument { field, .. }
            | E::DuplicatedHydrationArgument { field, .. }
            | E::MissingRequiredHydrationBackingFieldArgument { field, .. }
            | E::BatchHydrationArgumentMultipleSourceFields { field, .. }
            | E::BatchHydrationMissingIdentifiedBy { field, .. }
            | E::IncompatibleHydrationArgumentType { field, .. }
            | E::MissingFieldInHydratedInputObject { field, .. }
            | E::IncompatibleFieldInHydratedInputObject { field, .. }
            | E::StaticHydrationArgumentNotAssignable { field, .. }
            | E::HydrationIncompatibleOutputType { field, .. }
            | E::PolymorphicHydrationMustOutputUnion { field, .. }
            | E::HydrationTypeMismatch { field }
            | E::MixedIndexHydration { field }
            | E::HydrationConditionSourceFieldDoesNotExist { field, .. }
            | E::HydrationConditionUnsupportedFieldType { field, .. }
            | E::HydrationConditionPredicateDoesNotMatchSourceFieldType { field, .. }
            | E::HydrationConditionInvalidRegex { field, .. }
            | E::PartitionAppliedToSubscriptionField { field }
            | E::PartitionAppliedToUnsupportedField { field }
            | E::CannotRenamePartitionedField { field }
            | E::PartitionAppliedToFieldWithUnsupportedOutputType { field, .. }
            | E::InvalidPartitionArgument { field, .. }
            | E::StubbedMustBeNullable { field, .. }
            | E::StubbedMustBeUsedExclusively { field, .. } => {
                SchemaCoordinate::Member(field.field.clone())
            }
        }
    }

    /// Renders the error for tooling such as CI annotations.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "code": self.code(),
            "message": self.message(),
            "service": self.service().as_str(),
            "subject": self.subject().to_string(),
        })
    }
}
