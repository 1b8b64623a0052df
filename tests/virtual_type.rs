use nadel_validation::ValidationError;
use pretty_assertions::assert_eq;

use crate::common::codes;
use crate::common::validate;

const USERS: &str = r#"
    type Query { user(id: ID!): User }
    type User {
        id: ID!
        name: String
        avatar(size: Int): String
        manager: User
    }
"#;

fn validate_virtual_type(definitions: &str) -> Vec<ValidationError> {
    let overall = format!(
        r#"
        type Query {{ issue: Issue }}
        type Issue {{
            id: ID!
            assignee: UserSummary @hydrated(
                service: "Users"
                field: "user"
                arguments: [{{name: "id", value: "$source.assigneeId"}}]
            )
        }}
        {definitions}
        "#
    );
    validate(&[
        ("Users", USERS, USERS),
        (
            "Issues",
            overall.as_str(),
            "type Query { issue: Issue } type Issue { id: ID! assigneeId: ID }",
        ),
    ])
}

#[test]
fn virtual_type_mirrors_part_of_the_backing_type() {
    let errors = validate_virtual_type(
        r#"
        type UserSummary @virtualType {
            id: ID!
            avatar(size: Int): String
            manager: ManagerSummary
        }
        type ManagerSummary @virtualType { name: String }
        "#,
    );

    assert_eq!(errors, vec![]);
}

#[test]
fn virtual_fields_must_match_backing_fields_exactly() {
    let errors = validate_virtual_type(
        r#"
        type UserSummary @virtualType {
            id: ID
            email: String
            avatar(size: Int!, format: String): String
            manager: [ManagerSummary]
        }
        type ManagerSummary @virtualType { name: String }
        "#,
    );

    assert_eq!(
        codes(&errors),
        vec![
            "VIRTUAL_TYPE_INCOMPATIBLE_FIELD_ARGUMENT",
            "VIRTUAL_TYPE_INCOMPATIBLE_FIELD_OUTPUT_TYPE",
            "VIRTUAL_TYPE_INCOMPATIBLE_FIELD_OUTPUT_TYPE",
            "VIRTUAL_TYPE_MISSING_BACKING_FIELD",
            "VIRTUAL_TYPE_MISSING_BACKING_FIELD_ARGUMENT",
        ]
    );
}

#[test]
fn nested_virtual_types_are_compared_too() {
    let errors = validate_virtual_type(
        r#"
        type UserSummary @virtualType { id: ID! manager: ManagerSummary }
        type ManagerSummary @virtualType { name: String title: String }
        "#,
    );

    assert_eq!(codes(&errors), vec!["VIRTUAL_TYPE_MISSING_BACKING_FIELD"]);
    assert_eq!(errors[0].subject().to_string(), "ManagerSummary.title");
}

#[test]
fn virtual_type_must_be_an_object() {
    let errors = validate_virtual_type(
        r#"
        type UserSummary @virtualType { id: ID! }
        interface Summary @virtualType { id: ID! }
        "#,
    );

    assert_eq!(codes(&errors), vec!["VIRTUAL_TYPE_ILLEGAL_TYPE"]);
}
