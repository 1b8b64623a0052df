use apollo_compiler::Name;

use crate::schema::NadelSchemas;

/// Maps overall names to underlying names, following `@renamed(from:)`.
///
/// Without a rename, the underlying element is expected under the overall name.
#[derive(Clone, Copy)]
pub(crate) struct RenameResolver<'a> {
    schemas: &'a NadelSchemas,
}

impl<'a> RenameResolver<'a> {
    pub(crate) fn new(schemas: &'a NadelSchemas) -> Self {
        Self { schemas }
    }

    pub(crate) fn underlying_type_name(&self, overall: &Name) -> Name {
        self.schemas
            .type_annotations(overall)
            .and_then(|annotations| annotations.renamed_from.clone())
            .unwrap_or_else(|| overall.clone())
    }

    /// Path of underlying fields the overall field reads, more than one segment for a deep rename.
    pub(crate) fn underlying_field_path(
        &self,
        overall_type: &Name,
        overall_field: &Name,
    ) -> Vec<Name> {
        self.schemas
            .field_annotations(overall_type, overall_field)
            .and_then(|annotations| annotations.renamed_from.clone())
            .unwrap_or_else(|| vec![overall_field.clone()])
    }

    /// Whether the overall type name denotes the underlying type name.
    pub(crate) fn names_equal(&self, overall: &Name, underlying: &Name) -> bool {
        self.underlying_type_name(overall) == *underlying
    }
}
