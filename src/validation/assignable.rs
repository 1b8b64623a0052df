//! Type substitutability between overall and underlying type references.
use apollo_compiler::ast::Type;
use apollo_compiler::Name;

use crate::schema::definitions::list_depth;

/// Where a type reference is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Field output. The underlying type supplies values the overall type promises.
    Output,
    /// Arguments and input fields. The overall type supplies values the underlying type accepts.
    Input,
}

/// Whether `supplied` may stand in for `required`.
///
/// In output position `supplied` is the underlying type and `required` the overall one; in input
/// position it is the other way around. `names_equal` always receives the overall name first.
///
/// List wrappers must line up exactly. A non-null `required` needs a non-null `supplied`, a
/// nullable `required` accepts either.
pub fn is_assignable<F>(
    supplied: &Type,
    required: &Type,
    position: Position,
    names_equal: &F,
) -> bool
where
    F: Fn(&Name, &Name) -> bool,
{
    if required.is_non_null() && !supplied.is_non_null() {
        return false;
    }
    match (supplied, required) {
        (
            Type::Named(supplied) | Type::NonNullNamed(supplied),
            Type::Named(required) | Type::NonNullNamed(required),
        ) => match position {
            Position::Output => names_equal(required, supplied),
            Position::Input => names_equal(supplied, required),
        },
        (
            Type::List(supplied) | Type::NonNullList(supplied),
            Type::List(required) | Type::NonNullList(required),
        ) => is_assignable(supplied, required, position, names_equal),
        _ => false,
    }
}

/// `ID` serializes as either a string or an integer, so hydration lets it meet `String` and `Int`.
pub(crate) fn is_id_coercible(a: &str, b: &str) -> bool {
    matches!(
        (a, b),
        ("ID", "String") | ("String", "ID") | ("ID", "Int") | ("Int", "ID")
    )
}

/// Compatibility of a `$source` value with a backing field argument.
///
/// Nullability is not checked: a null source value simply yields no hydration. A batched argument
/// takes values of any wrapping, so only the named types are compared then.
pub(crate) fn is_source_assignable<F>(
    supplied: &Type,
    required: &Type,
    batched: bool,
    names_compatible: &F,
) -> bool
where
    F: Fn(&Name, &Name) -> bool,
{
    (batched || list_depth(supplied) == list_depth(required))
        && names_compatible(required.inner_named_type(), supplied.inner_named_type())
}

/// Compatibility of a hydrated field argument, passed through as `$argument`, with a backing field
/// argument.
pub(crate) fn is_field_argument_assignable<F>(
    supplied: &Type,
    required: &Type,
    batched: bool,
    names_compatible: &F,
) -> bool
where
    F: Fn(&Name, &Name) -> bool,
{
    if batched {
        names_compatible(supplied.inner_named_type(), required.inner_named_type())
    } else {
        is_assignable(supplied, required, Position::Input, names_compatible)
    }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::ty;

    use super::*;

    fn same_name(overall: &Name, underlying: &Name) -> bool {
        overall == underlying
    }

    #[test]
    fn output_position_accepts_stricter_underlying_types() {
        assert!(is_assignable(&ty!(String!), &ty!(String), Position::Output, &same_name));
        assert!(is_assignable(&ty!([String!]!), &ty!([String]), Position::Output, &same_name));
        assert!(!is_assignable(&ty!(String), &ty!(String!), Position::Output, &same_name));
        assert!(!is_assignable(&ty!([String]), &ty!([String!]), Position::Output, &same_name));
    }

    #[test]
    fn input_position_accepts_stricter_overall_types() {
        // supplied is the overall argument, required the underlying one
        assert!(is_assignable(&ty!([[Boolean]!]), &ty!([[Boolean]]), Position::Input, &same_name));
        assert!(is_assignable(&ty!(ID!), &ty!(ID), Position::Input, &same_name));
        assert!(!is_assignable(&ty!(ID), &ty!(ID!), Position::Input, &same_name));
    }

    #[test]
    fn list_depth_must_match() {
        for position in [Position::Output, Position::Input] {
            assert!(!is_assignable(&ty!([String]), &ty!(String), position, &same_name));
            assert!(!is_assignable(&ty!(String), &ty!([String]), position, &same_name));
            assert!(!is_assignable(&ty!([[String]]), &ty!([String]), position, &same_name));
        }
    }

    #[test]
    fn names_are_compared_overall_first() {
        let renamed = |overall: &Name, underlying: &Name| {
            overall.as_str() == "Account" && underlying.as_str() == "User"
        };
        assert!(is_assignable(&ty!(User), &ty!(Account), Position::Output, &renamed));
        assert!(is_assignable(&ty!(Account), &ty!(User), Position::Input, &renamed));
        assert!(!is_assignable(&ty!(Account), &ty!(User), Position::Output, &renamed));
    }

    #[test]
    fn source_values_ignore_nullability() {
        assert!(is_source_assignable(&ty!(ID), &ty!(ID!), false, &same_name));
        assert!(!is_source_assignable(&ty!([ID]), &ty!(ID!), false, &same_name));
        assert!(is_source_assignable(&ty!(ID), &ty!([ID!]!), true, &same_name));
        assert!(is_source_assignable(&ty!([[ID]]), &ty!([ID!]!), true, &same_name));
    }

    #[test]
    fn id_meets_string_and_int() {
        assert!(is_id_coercible("ID", "String"));
        assert!(is_id_coercible("Int", "ID"));
        assert!(!is_id_coercible("String", "Int"));
        assert!(!is_id_coercible("ID", "ID"));
    }
}
