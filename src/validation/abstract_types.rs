use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Name;

use crate::validation::element::TypeRef;
use crate::validation::matcher::is_union_member;
use crate::validation::ServiceContext;
use crate::validation::ValidationError;

/// Object types implementing `interface` that the service can see.
pub(crate) fn implementers(context: &ServiceContext, interface: &Name) -> Vec<Name> {
    context
        .engine()
        .types
        .iter()
        .filter(|(name, ty)| match ty {
            ExtendedType::Object(object) => {
                object
                    .implements_interfaces
                    .iter()
                    .any(|implemented| implemented.name == *interface)
                    && context.schemas.is_visible_to(context.service, name)
            }
            _ => false,
        })
        .map(|(name, _)| name.clone())
        .collect()
}

pub(crate) fn check_interface(
    context: &ServiceContext,
    interface: &Name,
) -> Option<ValidationError> {
    implementers(context, interface)
        .is_empty()
        .then(|| ValidationError::MissingConcreteTypes {
            service: context.service_name().clone(),
            interface: interface.clone(),
        })
}

/// A union only ever produced by hydrations has no underlying counterpart: its members come from
/// the backing fields.
pub(crate) fn is_synthetic_union(context: &ServiceContext, union: &Name) -> bool {
    let mut returning_fields = context
        .engine()
        .types
        .iter()
        .filter_map(|(type_name, ty)| match ty {
            ExtendedType::Object(object) => Some((type_name, &object.fields)),
            ExtendedType::Interface(interface) => Some((type_name, &interface.fields)),
            _ => None,
        })
        .flat_map(|(type_name, fields)| {
            fields
                .iter()
                .filter(|(_, field)| field.ty.inner_named_type() == union)
                .map(move |(field_name, _)| (type_name, field_name))
        })
        .peekable();
    returning_fields.peek().is_some()
        && returning_fields.all(|(type_name, field_name)| {
            context
                .schemas
                .field_annotations(type_name, field_name)
                .is_some_and(|annotations| annotations.is_hydrated())
        })
}

/// Every overall member of a union must be a member of the underlying union.
///
/// Object types the service defines itself are exempt: the walker checks them on their own, so
/// one missing underlying is reported as a missing type instead.
pub(crate) fn check_union(
    context: &ServiceContext,
    union: &TypeRef,
    underlying: &ExtendedType,
) -> Vec<ValidationError> {
    context
        .schemas
        .members_for(context.service, &union.overall)
        .into_iter()
        .filter(|member| !is_own_object_type(context, member))
        .filter(|member| {
            !is_union_member(
                underlying,
                &context.renames.underlying_type_name(member),
            )
        })
        .map(|member| ValidationError::UnionHasExtraType {
            union: union.clone(),
            member,
        })
        .collect()
}

fn is_own_object_type(context: &ServiceContext, name: &Name) -> bool {
    context.service.defines(name)
        && matches!(
            context.engine().types.get(name),
            Some(ExtendedType::Object(_))
        )
}
