//! Locates the underlying counterpart of overall schema elements.
use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::ast::InputValueDefinition;
use apollo_compiler::schema::Component;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;

use crate::schema::definitions::is_list_type;
use crate::schema::definitions::root_type_name;
use crate::schema::definitions::RootKind;
use crate::validation::element::FieldCoordinate;
use crate::validation::rename::RenameResolver;

/// Field of an object or interface type.
pub(crate) fn field_definition<'s>(
    ty: &'s ExtendedType,
    name: &str,
) -> Option<&'s Component<FieldDefinition>> {
    match ty {
        ExtendedType::Object(object) => object.fields.get(name),
        ExtendedType::Interface(interface) => interface.fields.get(name),
        _ => None,
    }
}

pub(crate) fn argument_definition<'f>(
    field: &'f FieldDefinition,
    name: &str,
) -> Option<&'f Node<InputValueDefinition>> {
    field
        .arguments
        .iter()
        .find(|argument| argument.name.as_str() == name)
}

pub(crate) fn input_field_definition<'s>(
    ty: &'s ExtendedType,
    name: &str,
) -> Option<&'s Component<InputValueDefinition>> {
    match ty {
        ExtendedType::InputObject(input) => input.fields.get(name),
        _ => None,
    }
}

pub(crate) fn has_enum_value(ty: &ExtendedType, value: &str) -> bool {
    match ty {
        ExtendedType::Enum(enum_type) => enum_type.values.contains_key(value),
        _ => false,
    }
}

pub(crate) fn is_union_member(ty: &ExtendedType, member: &str) -> bool {
    match ty {
        ExtendedType::Union(union) => union
            .members
            .iter()
            .any(|candidate| candidate.name.as_str() == member),
        _ => false,
    }
}

pub(crate) enum TypeMatch<'u> {
    Found {
        name: Name,
        definition: &'u ExtendedType,
    },
    Missing {
        name: Name,
    },
}

/// Underlying type for an overall type, through its `@renamed` mapping.
pub(crate) fn match_type<'u>(
    underlying: &'u Schema,
    renames: &RenameResolver,
    overall: &Name,
) -> TypeMatch<'u> {
    let name = renames.underlying_type_name(overall);
    match underlying.types.get(&name) {
        Some(definition) => TypeMatch::Found { name, definition },
        None => TypeMatch::Missing { name },
    }
}

/// Underlying root operation type of the same kind as an overall root type, whatever its name.
pub(crate) fn match_root_type<'u>(
    underlying: &'u Schema,
    renames: &RenameResolver,
    overall: &Name,
    kind: RootKind,
) -> TypeMatch<'u> {
    match root_type_name(underlying, kind) {
        Some(name) => match underlying.types.get(name) {
            Some(definition) => TypeMatch::Found {
                name: name.clone(),
                definition,
            },
            None => TypeMatch::Missing { name: name.clone() },
        },
        None => TypeMatch::Missing {
            name: renames.underlying_type_name(overall),
        },
    }
}

pub(crate) enum FieldMatch<'u> {
    Found {
        /// Type declaring the field, the last type stepped into for a deep rename.
        parent: &'u Name,
        field: &'u Component<FieldDefinition>,
    },
    /// The path segments as written, up to the segment that could not be found.
    Missing(Vec<String>),
    /// A deep rename stepping through a list-typed field.
    ThroughList(FieldCoordinate),
}

/// Walks `path` from `parent` through underlying object fields.
///
/// Every segment but the last must be a singular field whose type has fields itself.
pub(crate) fn match_field<'u>(
    underlying: &'u Schema,
    parent: &'u ExtendedType,
    path: &[Name],
) -> FieldMatch<'u> {
    let missing = |index: usize| {
        FieldMatch::Missing(
            path[..=index]
                .iter()
                .map(|segment| segment.to_string())
                .collect(),
        )
    };
    let mut current = parent;
    for (index, segment) in path.iter().enumerate() {
        let Some(field) = field_definition(current, segment) else {
            return missing(index);
        };
        if index + 1 == path.len() {
            return FieldMatch::Found {
                parent: current.name(),
                field,
            };
        }
        if is_list_type(&field.ty) {
            return FieldMatch::ThroughList(FieldCoordinate::new(current.name(), segment));
        }
        let Some(next) = underlying.types.get(field.ty.inner_named_type()) else {
            return missing(index);
        };
        current = next;
    }
    FieldMatch::Missing(Vec::new())
}

#[cfg(test)]
mod tests {
    use apollo_compiler::name;

    use super::*;

    fn underlying() -> Schema {
        Schema::parse(
            r#"
            type Query { user: User users: [User] }
            type User { id: ID! details: Details teams: [Team] }
            type Details { team: Team }
            type Team { name: String }
            "#,
            "underlying.graphqls",
        )
        .unwrap()
    }

    #[test]
    fn walks_deep_rename_paths() {
        let schema = underlying();
        let user = schema.types.get("User").unwrap();

        let team_name = [name!("details"), name!("team"), name!("name")];
        let FieldMatch::Found { parent, field } = match_field(&schema, user, &team_name) else {
            panic!("expected the path to resolve");
        };
        assert_eq!(parent.as_str(), "Team");
        assert_eq!(field.name.as_str(), "name");

        let owner_name = [name!("details"), name!("owner"), name!("name")];
        let FieldMatch::Missing(path) = match_field(&schema, user, &owner_name) else {
            panic!("expected the path to be missing");
        };
        assert_eq!(path, ["details", "owner"]);
    }

    #[test]
    fn refuses_to_step_through_lists() {
        let schema = underlying();
        let user = schema.types.get("User").unwrap();

        let FieldMatch::ThroughList(coordinate) =
            match_field(&schema, user, &[name!("teams"), name!("name")])
        else {
            panic!("expected the list field to be reported");
        };
        assert_eq!(coordinate.to_string(), "User.teams");
    }
}
