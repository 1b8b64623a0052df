use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::common::codes;
use crate::common::validate_service;

#[test]
fn accepts_partitioned_query_field() {
    let errors = validate_service(
        r#"
        type Query {
            issues(ids: [ID!]!): [Issue] @partition(pathToPartitionArg: ["ids"])
            search(filter: IssueFilter!): [Issue] @partition(pathToPartitionArg: ["filter", "ids"])
        }
        type Issue { id: ID! }
        input IssueFilter { ids: [ID!]! project: String }
        "#,
        r#"
        type Query {
            issues(ids: [ID!]!): [Issue]
            search(filter: IssueFilter!): [Issue]
        }
        type Issue { id: ID! }
        input IssueFilter { ids: [ID!]! project: String }
        "#,
    );

    assert_eq!(errors, vec![]);
}

#[test]
fn rejects_partition_of_non_list_output() {
    let errors = validate_service(
        r#"
        type Query {
            issueKey(ids: [ID!]!): String @partition(pathToPartitionArg: ["ids"])
        }
        "#,
        "type Query { issueKey(ids: [ID!]!): String }",
    );

    assert_eq!(
        codes(&errors),
        vec!["PARTITION_APPLIED_TO_FIELD_WITH_UNSUPPORTED_OUTPUT_TYPE"]
    );
    assert_snapshot!(
        errors[0].message(),
        @"@partition cannot be applied to field `Query.issueKey` which outputs `String`"
    );
}

#[test]
fn rejects_partition_of_subscription_field() {
    let sdl = r#"
        type Query { issue: Issue }
        type Subscription {
            issueUpdates(ids: [ID!]!): [Issue] @partition(pathToPartitionArg: ["ids"])
        }
        type Issue { id: ID! }
    "#;

    let errors = validate_service(
        sdl,
        &sdl.replace("@partition(pathToPartitionArg: [\"ids\"])", ""),
    );

    assert_eq!(
        codes(&errors),
        vec!["PARTITION_APPLIED_TO_SUBSCRIPTION_FIELD"]
    );
}

#[test]
fn rejects_partition_of_nested_field() {
    let errors = validate_service(
        r#"
        type Query { issue: Issue }
        type Issue {
            id: ID!
            comments(ids: [ID!]!): [String] @partition(pathToPartitionArg: ["ids"])
        }
        "#,
        r#"
        type Query { issue: Issue }
        type Issue { id: ID! comments(ids: [ID!]!): [String] }
        "#,
    );

    assert_eq!(
        codes(&errors),
        vec!["PARTITION_APPLIED_TO_UNSUPPORTED_FIELD"]
    );
}

#[test]
fn accepts_partition_one_namespace_down() {
    let sdl = r#"
        type Query { jira: JiraQuery @namespaced }
        type JiraQuery {
            issues(ids: [ID!]!): [Issue] @partition(pathToPartitionArg: ["ids"])
        }
        type Issue { id: ID! }
    "#;

    let errors = validate_service(
        sdl,
        r#"
        type Query { jira: JiraQuery }
        type JiraQuery { issues(ids: [ID!]!): [Issue] }
        type Issue { id: ID! }
        "#,
    );

    assert_eq!(errors, vec![]);
}

#[test]
fn reports_only_the_first_partition_problem() {
    let errors = validate_service(
        r#"
        type Query {
            issues(ids: [ID!]!): String @renamed(from: "allIssues") @partition(pathToPartitionArg: ["nope"])
        }
        "#,
        "type Query { allIssues(ids: [ID!]!): String }",
    );

    assert_eq!(codes(&errors), vec!["CANNOT_RENAME_PARTITIONED_FIELD"]);
}

#[test]
fn partition_path_must_lead_to_a_list() {
    let errors = validate_service(
        r#"
        type Query {
            search(filter: IssueFilter!): [Issue] @partition(pathToPartitionArg: ["filter", "project"])
        }
        type Issue { id: ID! }
        input IssueFilter { ids: [ID!]! project: String }
        "#,
        r#"
        type Query { search(filter: IssueFilter!): [Issue] }
        type Issue { id: ID! }
        input IssueFilter { ids: [ID!]! project: String }
        "#,
    );

    assert_eq!(codes(&errors), vec!["INVALID_PARTITION_ARGUMENT"]);
    assert_snapshot!(
        errors[0].message(),
        @"@partition path `filter.project` of field `Query.search` does not lead to a list argument"
    );
}

#[test]
fn mutation_may_return_a_payload_of_lists() {
    let overall = |payload: &str| {
        format!(
            r#"
            type Query {{ issue: String }}
            type Mutation {{
                archive(ids: [ID!]!): ArchivePayload @partition(pathToPartitionArg: ["ids"])
            }}
            type ArchivePayload {{ {payload} }}
            "#
        )
    };
    let underlying = |payload: &str| {
        format!(
            r#"
            type Query {{ issue: String }}
            type Mutation {{ archive(ids: [ID!]!): ArchivePayload }}
            type ArchivePayload {{ {payload} }}
            "#
        )
    };

    let payload = "success: Boolean! errors: [String]";
    let errors = validate_service(&overall(payload), &underlying(payload));
    assert_eq!(errors, vec![]);

    let payload = "success: Boolean! message: String";
    let errors = validate_service(&overall(payload), &underlying(payload));
    assert_eq!(
        codes(&errors),
        vec!["PARTITION_APPLIED_TO_FIELD_WITH_UNSUPPORTED_OUTPUT_TYPE"]
    );
}
