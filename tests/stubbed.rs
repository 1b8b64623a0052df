use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::common::codes;
use crate::common::validate_service;

const UNDERLYING: &str = r#"
    type Query { issue: Issue }
    type Issue { id: ID! }
"#;

#[test]
fn stubbed_fields_need_no_underlying_field() {
    let errors = validate_service(
        r#"
        type Query { issue: Issue }
        type Issue {
            id: ID!
            summary: String @stubbed
            details: Details
        }
        type Details @stubbed { text: String }
        "#,
        UNDERLYING,
    );

    assert_eq!(errors, vec![]);
}

#[test]
fn stubbed_type_output_must_be_nullable() {
    let errors = validate_service(
        r#"
        type Query { issue: Issue }
        type Issue { id: ID! details: Details! }
        type Details @stubbed { text: String }
        "#,
        UNDERLYING,
    );

    assert_eq!(codes(&errors), vec!["STUBBED_MUST_BE_NULLABLE"]);
    assert_snapshot!(
        errors[0].message(),
        @"Field `Issue.details` is stubbed so it must be nullable, but has type `Details!`"
    );
}

#[test]
fn stubbed_field_cannot_be_renamed() {
    let errors = validate_service(
        r#"
        type Query { issue: Issue }
        type Issue { id: ID! summary: String @stubbed @renamed(from: "title") }
        "#,
        UNDERLYING,
    );

    assert_eq!(codes(&errors), vec!["STUBBED_MUST_BE_USED_EXCLUSIVELY"]);
    assert_snapshot!(
        errors[0].message(),
        @"Field `Issue.summary` cannot be both @stubbed and @renamed"
    );
}

#[test]
fn stubbed_type_cannot_implement_interfaces() {
    let errors = validate_service(
        r#"
        type Query { issue: Issue }
        type Issue { id: ID! details: Details }
        interface Node { id: ID! }
        type Details implements Node @stubbed { id: ID! }
        "#,
        UNDERLYING,
    );

    assert_eq!(codes(&errors), vec!["STUBBED_TYPE_MUST_NOT_IMPLEMENT"]);
}

#[test]
fn stubbed_field_cannot_be_hydrated() {
    let errors = validate_service(
        r#"
        type Query { issue: Issue }
        type Issue {
            id: ID!
            parent: Issue @stubbed @hydrated(
                service: "MyService"
                field: "issue"
            )
        }
        "#,
        UNDERLYING,
    );

    assert_eq!(codes(&errors), vec!["STUBBED_MUST_BE_USED_EXCLUSIVELY"]);
    assert_snapshot!(
        errors[0].message(),
        @"Field `Issue.parent` cannot be both @stubbed and @hydrated"
    );
}
