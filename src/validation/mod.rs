//! Checks that every overall schema element a service declares maps onto its underlying schema.
//!
//! Each service is walked on its own, from the root types it contributes to and the types it
//! extends. Findings of all services are merged into one deduplicated set.
use apollo_compiler::Name;
use apollo_compiler::Schema;
use indexmap::IndexSet;
use serde::Deserialize;
use tracing::debug;

use crate::schema::NadelSchemas;
use crate::schema::ServiceName;
use crate::schema::ServiceSchema;
use crate::validation::element::FieldCoordinate;
use crate::validation::element::ServiceField;
use crate::validation::element::TypeRef;
use crate::validation::rename::RenameResolver;
use crate::validation::walker::ServiceWalker;

mod abstract_types;
pub mod assignable;
pub mod element;
mod error;
mod hydration;
mod matcher;
mod namespace;
mod partition;
mod rename;
mod structure;
mod stubbed;
mod virtual_type;
mod walker;

pub use error::ValidationError;

/// Knobs of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidationOptions {
    /// Only validate these services. Empty means all of them.
    pub services: Vec<String>,
    /// Let hydration arguments pass `ID` values to `String` or `Int` arguments and back.
    pub hydration_id_coercion: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            services: Vec::new(),
            hydration_id_coercion: true,
        }
    }
}

impl ValidationOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn includes(&self, service: &ServiceName) -> bool {
        self.services.is_empty() || self.services.iter().any(|name| name == service.as_str())
    }
}

/// Validates the mapping of every service with default options.
pub fn validate(schemas: &NadelSchemas) -> IndexSet<ValidationError> {
    NadelSchemaValidation::new(schemas).validate()
}

pub struct NadelSchemaValidation<'a> {
    schemas: &'a NadelSchemas,
    options: ValidationOptions,
}

impl<'a> NadelSchemaValidation<'a> {
    pub fn new(schemas: &'a NadelSchemas) -> Self {
        Self {
            schemas,
            options: ValidationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn validate(&self) -> IndexSet<ValidationError> {
        let mut errors = IndexSet::new();
        for service in self.schemas.services() {
            if !self.options.includes(service.name()) {
                continue;
            }
            errors.extend(self.validate_declarations(service));

            let Some(underlying) = service.underlying() else {
                continue;
            };
            debug!("Validating service {}", service.name());
            let context = ServiceContext {
                schemas: self.schemas,
                options: &self.options,
                service,
                underlying,
                renames: RenameResolver::new(self.schemas),
            };
            let found = ServiceWalker::new(context).walk();
            debug!(
                "Validated service {} with {} errors",
                service.name(),
                found.len()
            );
            errors.extend(found);
        }
        errors
    }

    /// Type level directive checks that need no underlying schema.
    fn validate_declarations(&self, service: &ServiceSchema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (type_name, declaration) in &service.declarations.types {
            if !declaration.defines {
                continue;
            }
            let Some(ty) = self.schemas.engine_schema().types.get(type_name) else {
                continue;
            };
            errors.extend(virtual_type::check_declaration(
                self.schemas,
                service.name(),
                ty,
            ));
            errors.extend(stubbed::check_declaration(self.schemas, service.name(), ty));
        }
        errors
    }
}

/// What a construct check sees of the service being validated.
pub(crate) struct ServiceContext<'a> {
    pub(crate) schemas: &'a NadelSchemas,
    pub(crate) options: &'a ValidationOptions,
    pub(crate) service: &'a ServiceSchema,
    pub(crate) underlying: &'a Schema,
    pub(crate) renames: RenameResolver<'a>,
}

impl<'a> ServiceContext<'a> {
    pub(crate) fn engine(&self) -> &'a Schema {
        self.schemas.engine_schema()
    }

    pub(crate) fn service_name(&self) -> &'a ServiceName {
        self.service.name()
    }

    pub(crate) fn service_field(&self, ty: &Name, field: &Name) -> ServiceField {
        ServiceField {
            service: self.service_name().clone(),
            field: FieldCoordinate::new(ty, field),
        }
    }

    pub(crate) fn type_ref(&self, overall: &Name, underlying: &Name) -> TypeRef {
        TypeRef {
            service: self.service_name().clone(),
            overall: overall.clone(),
            underlying: underlying.clone(),
        }
    }

    /// Overall names compare equal to underlying names once renames are applied.
    pub(crate) fn names_equal(&self) -> impl Fn(&Name, &Name) -> bool + 'a {
        let renames = self.renames;
        move |overall: &Name, underlying: &Name| renames.names_equal(overall, underlying)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_options_from_json() {
        let options = ValidationOptions::from_json(
            r#"{ "services": ["Users"], "hydrationIdCoercion": false }"#,
        )
        .unwrap();
        assert_eq!(
            options,
            ValidationOptions {
                services: vec!["Users".to_owned()],
                hydration_id_coercion: false,
            }
        );
        assert!(options.includes(&ServiceName::new("Users")));
        assert!(!options.includes(&ServiceName::new("Issues")));
    }

    #[test]
    fn options_default_to_every_service() {
        let options = ValidationOptions::from_json("{}").unwrap();
        assert!(options.hydration_id_coercion);
        assert!(options.includes(&ServiceName::new("Issues")));
    }
}
