use nadel_validation::NadelSchemas;
use nadel_validation::ValidationError;

pub(crate) const SERVICE: &str = "MyService";

/// Builds schemas from `(service, overall, underlying)` triples.
pub(crate) fn schemas(services: &[(&str, &str, &str)]) -> NadelSchemas {
    services
        .iter()
        .fold(
            NadelSchemas::builder(),
            |builder, (service, overall, underlying)| {
                builder
                    .overall_schema(*service, *overall)
                    .underlying_schema(*service, *underlying)
            },
        )
        .build()
        .unwrap()
}

pub(crate) fn validate(services: &[(&str, &str, &str)]) -> Vec<ValidationError> {
    nadel_validation::validate(&schemas(services))
        .into_iter()
        .collect()
}

pub(crate) fn validate_service(overall: &str, underlying: &str) -> Vec<ValidationError> {
    validate(&[(SERVICE, overall, underlying)])
}

/// Sorted error codes, for order independent assertions.
pub(crate) fn codes(errors: &[ValidationError]) -> Vec<&'static str> {
    let mut codes: Vec<_> = errors.iter().map(ValidationError::code).collect();
    codes.sort_unstable();
    codes
}
