use nadel_validation::validate;
use pretty_assertions::assert_eq;

use crate::common::schemas;
use crate::common::validate_service;
use crate::common::SERVICE;

#[test]
fn terminates_on_cyclic_types() {
    let sdl = r#"
        type Query { echo: Echo }
        type Echo { world: World self: Echo }
        type World { echo: Echo name: String }
    "#;

    let errors = validate_service(sdl, sdl);

    assert_eq!(errors, vec![]);
}

#[test]
fn reports_each_error_once_on_cyclic_types() {
    let errors = validate_service(
        r#"
        type Query { echo: Echo }
        type Echo { world: World self: Echo }
        type World { echo: Echo name: String }
        "#,
        r#"
        type Query { echo: Echo }
        type Echo { world: World self: Echo }
        type World { echo: Echo }
        "#,
    );

    assert_eq!(errors.len(), 1);
}

#[test]
fn validation_is_repeatable() {
    let schemas = schemas(&[(
        SERVICE,
        r#"
        type Query { issue: Issue count: Int }
        type Issue { id: ID! status: Status }
        enum Status { OPEN DONE }
        "#,
        r#"
        type Query { issue: Issue count: String }
        type Issue { id: ID }
        enum Status { OPEN }
        "#,
    )]);

    let first = validate(&schemas);
    let second = validate(&schemas);

    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}
