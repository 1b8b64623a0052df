use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::common::codes;
use crate::common::validate;
use crate::common::validate_service;

#[test]
fn namespaced_field_outputs_an_object() {
    let sdl = r#"
        type Query { jira: JiraQuery @namespaced }
        type JiraQuery { issue: String }
    "#;

    let errors = validate_service(sdl, &sdl.replace("@namespaced", ""));

    assert_eq!(errors, vec![]);
}

#[test]
fn rejects_namespaced_field_of_scalar_type() {
    let errors = validate_service(
        "type Query { jira: String @namespaced }",
        "type Query { jira: String }",
    );

    assert_eq!(codes(&errors), vec!["NAMESPACED_TYPE_MUST_BE_OBJECT"]);
    assert_snapshot!(
        errors[0].message(),
        @"Namespaced field `Query.jira` must output an object type, but `String` is scalar"
    );
}

#[test]
fn services_share_a_namespace() {
    let errors = validate(&[
        (
            "Issues",
            r#"
            type Query { jira: JiraQuery @namespaced }
            type JiraQuery { issue: String }
            "#,
            r#"
            type Query { jira: JiraQuery }
            type JiraQuery { issue: String }
            "#,
        ),
        (
            "Boards",
            r#"
            type Query { jira: JiraQuery @namespaced }
            extend type JiraQuery { board: String sprint: String }
            "#,
            r#"
            type Query { jira: JiraQuery }
            type JiraQuery { board: String }
            "#,
        ),
    ]);

    // `JiraQuery.issue` belongs to Issues, so Boards only misses its own field
    assert_eq!(codes(&errors), vec!["MISSING_UNDERLYING_FIELD"]);
    assert_eq!(errors[0].service().as_str(), "Boards");
    assert_eq!(errors[0].subject().to_string(), "JiraQuery.sprint");
}
