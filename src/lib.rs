//! Validates a Nadel overall schema against the underlying schemas of the services behind it.
//!
//! ```
//! use nadel_validation::NadelSchemas;
//!
//! let schemas = NadelSchemas::builder()
//!     .overall_schema("Users", "type Query { me: Account } type Account @renamed(from: \"User\") { id: ID! }")
//!     .underlying_schema("Users", "type Query { me: User } type User { id: ID! name: String }")
//!     .build()
//!     .unwrap();
//! assert!(nadel_validation::validate(&schemas).is_empty());
//! ```
pub mod error;
pub mod schema;
pub mod validation;

pub use crate::error::SchemaError;
pub use crate::schema::NadelSchemas;
pub use crate::schema::ServiceName;
pub use crate::validation::validate;
pub use crate::validation::NadelSchemaValidation;
pub use crate::validation::ValidationError;
pub use crate::validation::ValidationOptions;
