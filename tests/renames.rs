use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::common::codes;
use crate::common::validate_service;

#[test]
fn renamed_types_and_fields_match_their_underlying_names() {
    let errors = validate_service(
        r#"
        type Query {
            me: Account
            accounts(filter: AccountFilter): [Account] @renamed(from: "users")
        }
        type Account @renamed(from: "User") {
            id: ID!
            displayName: String @renamed(from: "name")
            kind: AccountKind
        }
        enum AccountKind @renamed(from: "UserKind") { HUMAN BOT }
        input AccountFilter @renamed(from: "UserFilter") { kind: AccountKind }
        "#,
        r#"
        type Query {
            me: User
            users(filter: UserFilter): [User]
        }
        type User {
            id: ID!
            name: String
            kind: UserKind
        }
        enum UserKind { HUMAN BOT APP }
        input UserFilter { kind: UserKind }
        "#,
    );

    assert_eq!(errors, vec![]);
}

#[test]
fn deep_rename_checks_the_last_field_of_the_path() {
    let overall = r#"
        type Query { me: User }
        type User {
            id: ID!
            teamName: String @renamed(from: "details.team.name")
        }
    "#;

    let errors = validate_service(
        overall,
        r#"
        type Query { me: User }
        type User { id: ID! details: Details }
        type Details { team: Team }
        type Team { name: String }
        "#,
    );
    assert_eq!(errors, vec![]);

    let errors = validate_service(
        overall,
        r#"
        type Query { me: User }
        type User { id: ID! details: Details }
        type Details { team: Team }
        type Team { name: [String] }
        "#,
    );
    assert_eq!(codes(&errors), vec!["INCOMPATIBLE_FIELD_OUTPUT_TYPE"]);
}

#[test]
fn deep_rename_cannot_step_through_a_list() {
    let errors = validate_service(
        r#"
        type Query { me: User }
        type User { id: ID! teamName: String @renamed(from: "teams.name") }
        "#,
        r#"
        type Query { me: User }
        type User { id: ID! teams: [Team] }
        type Team { name: String }
        "#,
    );

    assert_eq!(codes(&errors), vec!["CANNOT_RENAME_THROUGH_LIST_FIELD"]);
}

#[test]
fn reports_rename_to_a_missing_field() {
    let errors = validate_service(
        r#"
        type Query { me: User }
        type User { id: ID! teamName: String @renamed(from: "details.team") }
        "#,
        r#"
        type Query { me: User }
        type User { id: ID! details: Details }
        type Details { name: String }
        "#,
    );

    assert_eq!(codes(&errors), vec!["MISSING_UNDERLYING_FIELD"]);
    assert_snapshot!(
        errors[0].message(),
        @"Field `User.teamName` of service `MyService` has no underlying field `User.details.team`"
    );
}

#[test]
fn reports_rename_to_a_missing_type() {
    let errors = validate_service(
        r#"
        type Query { me: Account }
        type Account @renamed(from: "Person") { id: ID! }
        "#,
        r#"
        type Query { me: User }
        type User { id: ID! }
        "#,
    );

    assert_eq!(
        codes(&errors),
        vec!["INCOMPATIBLE_FIELD_OUTPUT_TYPE", "MISSING_UNDERLYING_TYPE"]
    );
}

#[test]
fn reports_overall_types_sharing_an_underlying_type() {
    let errors = validate_service(
        r#"
        type Query { me: User owner: Owner }
        type User @renamed(from: "Account") { id: ID! }
        type Owner @renamed(from: "Account") { id: ID! }
        "#,
        r#"
        type Query { me: Account owner: Account }
        type Account { id: ID! }
        "#,
    );

    assert_eq!(codes(&errors), vec!["DUPLICATED_UNDERLYING_TYPE"]);
    assert_snapshot!(
        errors[0].message(),
        @"Types `User`, `Owner` of service `MyService` all map to the same underlying type `Account`"
    );
}
