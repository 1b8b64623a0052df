use apollo_compiler::validation::WithErrors;

use crate::schema::ServiceName;

/// Errors raised while assembling [`crate::schema::NadelSchemas`].
///
/// These are failures of the input documents themselves. Inconsistencies between the overall and
/// underlying schemas are never reported here: see [`crate::validation::ValidationError`].
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Could not parse {kind} schema of service `{service}`:\n{message}")]
    Parse {
        service: ServiceName,
        kind: SchemaKind,
        message: String,
    },
    #[error("Could not build the {kind} schema:\n{message}")]
    Build { kind: SchemaKind, message: String },
    #[error("Service `{service}` declares an overall schema but no underlying schema")]
    MissingUnderlyingSchema { service: ServiceName },
    #[error("Underlying schema given for service `{service}` which has no overall schema")]
    UnknownService { service: ServiceName },
    #[error("Invalid @{directive} on `{coordinate}`: {message}")]
    InvalidDirective {
        coordinate: String,
        directive: String,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SchemaKind {
    #[strum(to_string = "overall")]
    Overall,
    #[strum(to_string = "underlying")]
    Underlying,
}

impl SchemaError {
    pub(crate) fn parse<T>(service: &ServiceName, kind: SchemaKind, error: WithErrors<T>) -> Self {
        SchemaError::Parse {
            service: service.clone(),
            kind,
            message: error.errors.to_string(),
        }
    }

    pub(crate) fn build<T>(kind: SchemaKind, error: WithErrors<T>) -> Self {
        SchemaError::Build {
            kind,
            message: error.errors.to_string(),
        }
    }

    pub(crate) fn invalid_directive(
        coordinate: impl ToString,
        directive: &str,
        message: impl Into<String>,
    ) -> Self {
        SchemaError::InvalidDirective {
            coordinate: coordinate.to_string(),
            directive: directive.to_owned(),
            message: message.into(),
        }
    }
}
