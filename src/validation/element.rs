use std::fmt;

use apollo_compiler::Name;

use crate::schema::ServiceName;

/// A schema element on both sides of a mapping, and the service owning the mapping.
///
/// `overall` and `underlying` name the same logical element, possibly renamed. Only the matcher
/// builds these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaElementRef<T> {
    pub service: ServiceName,
    pub overall: T,
    pub underlying: T,
}

pub type TypeRef = SchemaElementRef<Name>;

pub type FieldRef = SchemaElementRef<FieldCoordinate>;

impl<T: fmt::Display> fmt::Display for SchemaElementRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.overall.to_string() == self.underlying.to_string() {
            write!(f, "{}", self.overall)
        } else {
            write!(f, "{} (underlying {})", self.overall, self.underlying)
        }
    }
}

/// `Type.field`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldCoordinate {
    pub ty: Name,
    pub field: Name,
}

impl FieldCoordinate {
    pub fn new(ty: &Name, field: &Name) -> Self {
        Self {
            ty: ty.clone(),
            field: field.clone(),
        }
    }

    pub fn argument(&self, argument: &Name) -> ArgumentCoordinate {
        ArgumentCoordinate {
            ty: self.ty.clone(),
            field: self.field.clone(),
            argument: argument.clone(),
        }
    }
}

impl fmt::Display for FieldCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.ty, self.field)
    }
}

/// `Type.field(argument:)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgumentCoordinate {
    pub ty: Name,
    pub field: Name,
    pub argument: Name,
}

impl fmt::Display for ArgumentCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({}:)", self.ty, self.field, self.argument)
    }
}

/// An overall field, seen from the service that declared it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceField {
    pub service: ServiceName,
    pub field: FieldCoordinate,
}

impl fmt::Display for ServiceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field)
    }
}

/// The overall schema element an error is primarily about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaCoordinate {
    Type(Name),
    /// A field, an input field or an enum value.
    Member(FieldCoordinate),
    Argument(ArgumentCoordinate),
}

impl fmt::Display for SchemaCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaCoordinate::Type(name) => write!(f, "{name}"),
            SchemaCoordinate::Member(coordinate) => write!(f, "{coordinate}"),
            SchemaCoordinate::Argument(coordinate) => write!(f, "{coordinate}"),
        }
    }
}
