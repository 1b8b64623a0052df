use apollo_compiler::ast::OperationType;
use apollo_compiler::ast::Type;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Name;
use apollo_compiler::Schema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
pub enum TypeKind {
    #[strum(to_string = "scalar")]
    Scalar,
    #[strum(to_string = "object")]
    Object,
    #[strum(to_string = "interface")]
    Interface,
    #[strum(to_string = "union")]
    Union,
    #[strum(to_string = "enum")]
    Enum,
    #[strum(to_string = "input object")]
    InputObject,
}

impl From<&ExtendedType> for TypeKind {
    fn from(value: &ExtendedType) -> Self {
        match value {
            ExtendedType::Scalar(_) => TypeKind::Scalar,
            ExtendedType::Object(_) => TypeKind::Object,
            ExtendedType::Interface(_) => TypeKind::Interface,
            ExtendedType::Union(_) => TypeKind::Union,
            ExtendedType::Enum(_) => TypeKind::Enum,
            ExtendedType::InputObject(_) => TypeKind::InputObject,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum RootKind {
    #[strum(to_string = "query")]
    Query,
    #[strum(to_string = "mutation")]
    Mutation,
    #[strum(to_string = "subscription")]
    Subscription,
}

impl From<RootKind> for OperationType {
    fn from(value: RootKind) -> Self {
        match value {
            RootKind::Query => OperationType::Query,
            RootKind::Mutation => OperationType::Mutation,
            RootKind::Subscription => OperationType::Subscription,
        }
    }
}

pub(crate) fn root_type_name(schema: &Schema, kind: RootKind) -> Option<&Name> {
    schema.root_operation(kind.into())
}

pub(crate) fn root_kind_of(schema: &Schema, type_name: &str) -> Option<RootKind> {
    use strum::IntoEnumIterator;

    RootKind::iter().find(|kind| {
        root_type_name(schema, *kind).is_some_and(|name| name.as_str() == type_name)
    })
}

pub(crate) const BUILT_IN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

pub(crate) fn is_built_in_scalar(name: &str) -> bool {
    BUILT_IN_SCALARS.contains(&name)
}

pub(crate) fn is_introspection_type(name: &str) -> bool {
    name.starts_with("__")
}

/// Number of list wrappers around the named type, ignoring non-null wrappers.
pub(crate) fn list_depth(ty: &Type) -> usize {
    match ty {
        Type::Named(_) | Type::NonNullNamed(_) => 0,
        Type::List(inner) | Type::NonNullList(inner) => 1 + list_depth(inner),
    }
}

/**
 * Tests whether 2 types are the "same" type.
 *
 * To be the same type, for this method, is defined as having the same name for named types
 * or, for wrapper types, the same wrapper type and recursively same wrapped one.
 *
 * This method does not check that both types are from the same schema and does not validate
 * that the structure of named types is the same.
 */
pub(crate) fn same_type(t1: &Type, t2: &Type) -> bool {
    same_wrapping(t1, t2) && t1.inner_named_type() == t2.inner_named_type()
}

/// Whether both types have identical list and non-null wrappers, whatever their named types.
pub(crate) fn same_wrapping(t1: &Type, t2: &Type) -> bool {
    match (t1, t2) {
        (Type::Named(_), Type::Named(_)) | (Type::NonNullNamed(_), Type::NonNullNamed(_)) => true,
        (Type::List(i1), Type::List(i2)) | (Type::NonNullList(i1), Type::NonNullList(i2)) => {
            same_wrapping(i1, i2)
        }
        _ => false,
    }
}

/// Whether the field or argument type is a list once the outermost non-null is removed.
pub(crate) fn is_list_type(ty: &Type) -> bool {
    matches!(ty, Type::List(_) | Type::NonNullList(_))
}

/// Wraps `ty` in `depth` nullable lists.
pub(crate) fn wrap_in_lists(ty: Type, depth: usize) -> Type {
    (0..depth).fold(ty, |ty, _| ty.list())
}

pub(crate) fn is_required_input(ty: &Type, has_default: bool) -> bool {
    ty.is_non_null() && !has_default
}

#[cfg(test)]
mod tests {
    use apollo_compiler::ty;

    use super::*;

    #[test]
    fn same_type_compares_wrappers_and_names() {
        assert!(same_type(&ty!([String!]), &ty!([String!])));
        assert!(!same_type(&ty!([String!]), &ty!([String])));
        assert!(!same_type(&ty!([String]), &ty!([[String]])));
        assert!(!same_type(&ty!(String), &ty!(ID)));
    }

    #[test]
    fn same_wrapping_ignores_names() {
        assert!(same_wrapping(&ty!([User!]!), &ty!([Account!]!)));
        assert!(!same_wrapping(&ty!([User!]!), &ty!([Account]!)));
    }

    #[test]
    fn list_depth_ignores_non_null() {
        assert_eq!(list_depth(&ty!(Int!)), 0);
        assert_eq!(list_depth(&ty!([[Int!]!])), 2);
    }
}
