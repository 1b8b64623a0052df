//! Nadel directive definitions, and their applications resolved into typed annotations.
//!
//! Every directive application is read exactly once, while [`crate::schema::NadelSchemas`] is
//! built. Validation then works on the closed set of annotations below and never inspects raw
//! directive arguments again.
use apollo_compiler::ast::Directive;
use apollo_compiler::ast::DirectiveList;
use apollo_compiler::ast::Value;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Name;
use apollo_compiler::Node;

use crate::error::SchemaError;
use crate::schema::argument::directive_object_list_argument;
use crate::schema::argument::directive_optional_boolean_argument;
use crate::schema::argument::directive_optional_object_argument;
use crate::schema::argument::directive_optional_string_argument;
use crate::schema::argument::directive_required_string_argument;
use crate::schema::argument::directive_required_string_list_argument;
use crate::schema::argument::object_field;

pub(crate) const RENAMED_DIRECTIVE_NAME: &str = "renamed";
pub(crate) const HYDRATED_DIRECTIVE_NAME: &str = "hydrated";
pub(crate) const PARTITION_DIRECTIVE_NAME: &str = "partition";
pub(crate) const VIRTUAL_TYPE_DIRECTIVE_NAME: &str = "virtualType";
pub(crate) const STUBBED_DIRECTIVE_NAME: &str = "stubbed";
pub(crate) const NAMESPACED_DIRECTIVE_NAME: &str = "namespaced";
pub(crate) const HIDDEN_DIRECTIVE_NAME: &str = "hidden";

const SOURCE_PREFIX: &str = "$source.";
const ARGUMENT_PREFIX: &str = "$argument.";

/// Definitions added to the overall schema when no overall document declares them itself.
pub const NADEL_DIRECTIVE_DEFINITIONS: &str = r#"
directive @renamed(from: String!) on FIELD_DEFINITION | OBJECT | INTERFACE | UNION | INPUT_OBJECT | SCALAR | ENUM

directive @hydrated(
  service: String
  field: String!
  arguments: [NadelHydrationArgument!]! = []
  identifiedBy: String
  indexed: Boolean = false
  batchSize: Int = 200
  timeout: Int = -1
  when: NadelHydrationCondition
) repeatable on FIELD_DEFINITION

directive @partition(pathToPartitionArg: [String!]!) on FIELD_DEFINITION

directive @virtualType on OBJECT | INTERFACE

directive @stubbed on FIELD_DEFINITION | OBJECT

directive @namespaced on FIELD_DEFINITION

directive @hidden on FIELD_DEFINITION

scalar JSON

input NadelHydrationArgument {
  name: String!
  value: JSON!
}

input NadelHydrationCondition {
  result: NadelHydrationResultCondition!
}

input NadelHydrationResultCondition {
  sourceField: String!
  predicate: NadelHydrationResultFieldPredicate!
}

input NadelHydrationResultFieldPredicate {
  startsWith: String
  equals: JSON
  matches: String
}
"#;

/// Names of the definitions in [`NADEL_DIRECTIVE_DEFINITIONS`].
pub(crate) const NADEL_DEFINITION_NAMES: [&str; 12] = [
    RENAMED_DIRECTIVE_NAME,
    HYDRATED_DIRECTIVE_NAME,
    PARTITION_DIRECTIVE_NAME,
    VIRTUAL_TYPE_DIRECTIVE_NAME,
    STUBBED_DIRECTIVE_NAME,
    NAMESPACED_DIRECTIVE_NAME,
    HIDDEN_DIRECTIVE_NAME,
    "JSON",
    "NadelHydrationArgument",
    "NadelHydrationCondition",
    "NadelHydrationResultCondition",
    "NadelHydrationResultFieldPredicate",
];

/// Annotations read off a type definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeAnnotations {
    /// Underlying name given by `@renamed(from:)`.
    pub renamed_from: Option<Name>,
    pub virtual_type: bool,
    pub stubbed: bool,
}

impl TypeAnnotations {
    pub(crate) fn from_type(ty: &ExtendedType) -> Result<Self, SchemaError> {
        let coordinate = ty.name().as_str();
        let renamed_from = ty
            .directives()
            .get(RENAMED_DIRECTIVE_NAME)
            .map(|directive| {
                let from = directive_required_string_argument(directive, coordinate, "from")?;
                Name::new(from).map_err(|_| {
                    SchemaError::invalid_directive(
                        coordinate,
                        RENAMED_DIRECTIVE_NAME,
                        format!("\"{from}\" is not a valid type name"),
                    )
                })
            })
            .transpose()?;
        Ok(Self {
            renamed_from,
            virtual_type: ty.directives().has(VIRTUAL_TYPE_DIRECTIVE_NAME),
            stubbed: ty.directives().has(STUBBED_DIRECTIVE_NAME),
        })
    }
}

/// Annotations read off an object or interface field definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAnnotations {
    /// Underlying field path given by `@renamed(from:)`, more than one segment for a deep rename.
    pub renamed_from: Option<Vec<Name>>,
    pub hydrations: Vec<HydrationDefinition>,
    pub partition: Option<PartitionDefinition>,
    pub stubbed: bool,
    pub namespaced: bool,
    /// Field is left out of the public schema but still resolved by its service.
    pub hidden: bool,
}

impl FieldAnnotations {
    pub(crate) fn from_directives(
        directives: &DirectiveList,
        coordinate: &str,
    ) -> Result<Self, SchemaError> {
        let renamed_from = directives
            .get(RENAMED_DIRECTIVE_NAME)
            .map(|directive| {
                let from = directive_required_string_argument(directive, coordinate, "from")?;
                parse_path(from).ok_or_else(|| {
                    SchemaError::invalid_directive(
                        coordinate,
                        RENAMED_DIRECTIVE_NAME,
                        format!("\"{from}\" is not a valid field path"),
                    )
                })
            })
            .transpose()?;
        let hydrations = directives
            .get_all(HYDRATED_DIRECTIVE_NAME)
            .map(|directive| HydrationDefinition::from_directive(directive, coordinate))
            .collect::<Result<Vec<_>, _>>()?;
        let partition = directives
            .get(PARTITION_DIRECTIVE_NAME)
            .map(|directive| {
                Ok::<_, SchemaError>(PartitionDefinition {
                    path_to_partition_arg: directive_required_string_list_argument(
                        directive,
                        coordinate,
                        "pathToPartitionArg",
                    )?,
                })
            })
            .transpose()?;
        Ok(Self {
            renamed_from,
            hydrations,
            partition,
            stubbed: directives.has(STUBBED_DIRECTIVE_NAME),
            namespaced: directives.has(NAMESPACED_DIRECTIVE_NAME),
            hidden: directives.has(HIDDEN_DIRECTIVE_NAME),
        })
    }

    pub fn is_hydrated(&self) -> bool {
        !self.hydrations.is_empty()
    }
}

/// One `@hydrated` application.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrationDefinition {
    pub backing_service: Option<String>,
    /// Path from the query root to the backing field, e.g. `["jira", "issuesByIds"]`.
    pub backing_field: Vec<String>,
    pub arguments: Vec<HydrationArgument>,
    pub identified_by: Option<String>,
    pub indexed: bool,
    pub condition: Option<WhenCondition>,
}

impl HydrationDefinition {
    fn from_directive(directive: &Directive, coordinate: &str) -> Result<Self, SchemaError> {
        let backing_field = directive_required_string_argument(directive, coordinate, "field")?
            .split('.')
            .map(str::to_owned)
            .collect();
        let arguments = directive_object_list_argument(directive, coordinate, "arguments")?
            .into_iter()
            .map(|fields| HydrationArgument::from_object(fields, coordinate))
            .collect::<Result<Vec<_>, _>>()?;
        let condition = directive_optional_object_argument(directive, coordinate, "when")?
            .map(|fields| WhenCondition::from_object(fields, coordinate))
            .transpose()?;
        Ok(Self {
            backing_service: directive_optional_string_argument(directive, coordinate, "service")?
                .map(str::to_owned),
            backing_field,
            arguments,
            identified_by: directive_optional_string_argument(
                directive,
                coordinate,
                "identifiedBy",
            )?
            .map(str::to_owned),
            indexed: directive_optional_boolean_argument(directive, coordinate, "indexed")?
                .unwrap_or(false),
            condition,
        })
    }

    pub fn backing_field_path(&self) -> String {
        self.backing_field.join(".")
    }

    pub fn source_arguments(&self) -> impl Iterator<Item = (&Name, &[Name])> {
        self.arguments
            .iter()
            .filter_map(|argument| match &argument.value {
                HydrationArgumentValue::SourceField(path) => {
                    Some((&argument.name, path.as_slice()))
                }
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HydrationArgument {
    /// Name of the backing field argument this value is passed to.
    pub name: Name,
    pub value: HydrationArgumentValue,
}

impl HydrationArgument {
    fn from_object(fields: &[(Name, Node<Value>)], coordinate: &str) -> Result<Self, SchemaError> {
        let invalid = |message: String| {
            SchemaError::invalid_directive(coordinate, HYDRATED_DIRECTIVE_NAME, message)
        };
        let name = object_field(fields, "name")
            .and_then(|value| value.as_str())
            .ok_or_else(|| invalid("hydration argument is missing its \"name\"".to_owned()))?;
        let name = Name::new(name)
            .map_err(|_| invalid(format!("\"{name}\" is not a valid argument name")))?;
        let value = object_field(fields, "value")
            .ok_or_else(|| invalid(format!("hydration argument \"{name}\" has no \"value\"")))?;
        let value = HydrationArgumentValue::from_value(value).ok_or_else(|| {
            invalid(format!("hydration argument \"{name}\" has a malformed value"))
        })?;
        Ok(Self { name, value })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HydrationArgumentValue {
    /// `$source.a.b`: a field path on the underlying parent type.
    SourceField(Vec<Name>),
    /// `$argument.x`: an argument of the hydrated field itself.
    FieldArgument(Name),
    StaticValue(Node<Value>),
}

impl HydrationArgumentValue {
    fn from_value(value: &Node<Value>) -> Option<Self> {
        let text = value.as_str().unwrap_or_default();
        if let Some(path) = text.strip_prefix(SOURCE_PREFIX) {
            parse_path(path).map(HydrationArgumentValue::SourceField)
        } else if let Some(name) = text.strip_prefix(ARGUMENT_PREFIX) {
            Name::new(name)
                .ok()
                .map(HydrationArgumentValue::FieldArgument)
        } else {
            Some(HydrationArgumentValue::StaticValue(value.clone()))
        }
    }
}

/// `when: { result: { sourceField: "...", predicate: { ... } } }`
#[derive(Debug, Clone, PartialEq)]
pub struct WhenCondition {
    pub source_field: Vec<Name>,
    pub predicate: ConditionPredicate,
}

impl WhenCondition {
    fn from_object(fields: &[(Name, Node<Value>)], coordinate: &str) -> Result<Self, SchemaError> {
        let invalid = |message: &str| {
            SchemaError::invalid_directive(coordinate, HYDRATED_DIRECTIVE_NAME, message)
        };
        let Some(Value::Object(result)) = object_field(fields, "result").map(|value| &**value)
        else {
            return Err(invalid("\"when\" condition needs a \"result\" object"));
        };
        let source_field = object_field(result, "sourceField")
            .and_then(|value| value.as_str())
            .and_then(parse_path)
            .ok_or_else(|| invalid("\"when\" condition needs a valid \"sourceField\""))?;
        let Some(Value::Object(predicate)) =
            object_field(result, "predicate").map(|value| &**value)
        else {
            return Err(invalid("\"when\" condition needs a \"predicate\" object"));
        };
        let predicate = match predicate.as_slice() {
            [(name, value)] => match (name.as_str(), value.as_str()) {
                ("equals", _) => ConditionPredicate::Equals(value.clone()),
                ("startsWith", Some(prefix)) => ConditionPredicate::StartsWith(prefix.to_owned()),
                ("matches", Some(regex)) => ConditionPredicate::Matches(regex.to_owned()),
                _ => return Err(invalid("unsupported \"when\" predicate")),
            },
            _ => {
                return Err(invalid(
                    "\"when\" predicate must set exactly one of equals, startsWith or matches",
                ))
            }
        };
        Ok(Self {
            source_field,
            predicate,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionPredicate {
    Equals(Node<Value>),
    StartsWith(String),
    Matches(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDefinition {
    /// Argument name followed by nested input field names.
    pub path_to_partition_arg: Vec<String>,
}

fn parse_path(path: &str) -> Option<Vec<Name>> {
    path.split('.')
        .map(|segment| Name::new(segment).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use apollo_compiler::Schema;

    use super::*;

    fn field_annotations(sdl: &str, field: &str) -> Result<FieldAnnotations, SchemaError> {
        let schema = Schema::builder()
            .parse(NADEL_DIRECTIVE_DEFINITIONS, "nadel.graphqls")
            .parse(sdl, "test.graphqls")
            .build()
            .expect("schema should build");
        let query = schema.get_object("Query").expect("Query is defined");
        let field = query.fields.get(field).expect("field is defined");
        FieldAnnotations::from_directives(
            &field.directives,
            &format!("Query.{field}", field = field.name),
        )
    }

    #[test]
    fn reads_hydration_arguments() {
        let annotations = field_annotations(
            r#"
            type Query {
              issue(id: ID): String
                @hydrated(
                  service: "Issues"
                  field: "jira.issueById"
                  arguments: [
                    {name: "id", value: "$source.issue.id"}
                    {name: "site", value: "$argument.id"}
                    {name: "limit", value: 10}
                  ]
                  indexed: true
                )
            }
            "#,
            "issue",
        )
        .unwrap();

        let [hydration] = annotations.hydrations.as_slice() else {
            panic!("expected a single hydration");
        };
        assert_eq!(hydration.backing_service.as_deref(), Some("Issues"));
        assert_eq!(hydration.backing_field, vec!["jira", "issueById"]);
        assert!(hydration.indexed);
        assert!(matches!(
            &hydration.arguments[0].value,
            HydrationArgumentValue::SourceField(path) if path.len() == 2
        ));
        assert!(matches!(
            &hydration.arguments[1].value,
            HydrationArgumentValue::FieldArgument(name) if name.as_str() == "id"
        ));
        assert!(matches!(
            &hydration.arguments[2].value,
            HydrationArgumentValue::StaticValue(_)
        ));
    }

    #[test]
    fn reads_deep_renames() {
        let annotations = field_annotations(
            r#"
            type Query {
              name: String @renamed(from: "details.name")
            }
            "#,
            "name",
        )
        .unwrap();

        let path = annotations.renamed_from.unwrap();
        assert_eq!(
            path.iter().map(Name::as_str).collect::<Vec<_>>(),
            vec!["details", "name"]
        );
    }

    #[test]
    fn reads_hidden_fields() {
        let annotations = field_annotations(
            r#"
            type Query {
              internalId: ID @hidden
            }
            "#,
            "internalId",
        )
        .unwrap();

        assert!(annotations.hidden);
        assert_eq!(annotations.renamed_from, None);
    }

    #[test]
    fn reads_when_conditions() {
        let annotations = field_annotations(
            r#"
            type Query {
              owner: String
                @hydrated(
                  field: "user"
                  arguments: [{name: "id", value: "$source.ownerId"}]
                  when: {result: {sourceField: "type", predicate: {matches: "^user-.*"}}}
                )
            }
            "#,
            "owner",
        )
        .unwrap();

        let condition = annotations.hydrations[0].condition.as_ref().unwrap();
        assert_eq!(condition.source_field.len(), 1);
        assert_eq!(condition.source_field[0].as_str(), "type");
        assert_eq!(
            condition.predicate,
            ConditionPredicate::Matches("^user-.*".to_owned())
        );
    }

    #[test]
    fn rejects_hydration_arguments_without_names() {
        let error = field_annotations(
            r#"
            type Query {
              owner: String @hydrated(field: "user", arguments: [{value: "$source.id"}])
            }
            "#,
            "owner",
        )
        .unwrap_err();

        assert!(matches!(error, SchemaError::InvalidDirective { .. }));
    }
}
