//! The schema object model the validator works on.
//!
//! Parsing is delegated to `apollo-compiler`. [`NadelSchemas`] keeps the merged overall ("engine")
//! schema, each service's underlying schema, which service declared which type members, and the
//! typed annotations read off Nadel directives.
use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use indexmap::IndexMap;
use indexmap::IndexSet;
use multimap::MultiMap;

use crate::error::SchemaError;
use crate::error::SchemaKind;
use crate::schema::directives::FieldAnnotations;
use crate::schema::directives::TypeAnnotations;
use crate::schema::directives::NADEL_DEFINITION_NAMES;
use crate::schema::directives::NADEL_DIRECTIVE_DEFINITIONS;

pub(crate) mod argument;
pub mod definitions;
pub mod directives;

/// Name of the pseudo-service holding type definitions no service owns.
pub const SHARED_SERVICE_NAME: &str = "shared";

/// Opaque name of one federated service.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display, derive_more::From,
)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn shared() -> Self {
        Self(SHARED_SERVICE_NAME.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_shared(&self) -> bool {
        self.0 == SHARED_SERVICE_NAME
    }
}

impl From<&str> for ServiceName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Type members (fields, input fields, enum values or union members) one service declared.
#[derive(Debug, Clone, Default)]
pub(crate) struct TypeDeclaration {
    /// Whether the service holds the definition rather than only extensions.
    pub(crate) defines: bool,
    pub(crate) members: IndexSet<Name>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ServiceDeclarations {
    pub(crate) types: IndexMap<Name, TypeDeclaration>,
}

impl ServiceDeclarations {
    fn record(&mut self, name: &Name, defines: bool, members: impl IntoIterator<Item = Name>) {
        let declaration = self.types.entry(name.clone()).or_default();
        declaration.defines |= defines;
        declaration.members.extend(members);
    }

    fn add_document(&mut self, document: &ast::Document) {
        use ast::Definition as D;

        for definition in &document.definitions {
            match definition {
                D::ObjectTypeDefinition(def) => {
                    self.record(&def.name, true, field_names(&def.fields))
                }
                D::ObjectTypeExtension(ext) => {
                    self.record(&ext.name, false, field_names(&ext.fields))
                }
                D::InterfaceTypeDefinition(def) => {
                    self.record(&def.name, true, field_names(&def.fields))
                }
                D::InterfaceTypeExtension(ext) => {
                    self.record(&ext.name, false, field_names(&ext.fields))
                }
                D::InputObjectTypeDefinition(def) => {
                    self.record(&def.name, true, input_names(&def.fields))
                }
                D::InputObjectTypeExtension(ext) => {
                    self.record(&ext.name, false, input_names(&ext.fields))
                }
                D::EnumTypeDefinition(def) => self.record(
                    &def.name,
                    true,
                    def.values.iter().map(|value| value.value.clone()),
                ),
                D::EnumTypeExtension(ext) => self.record(
                    &ext.name,
                    false,
                    ext.values.iter().map(|value| value.value.clone()),
                ),
                D::UnionTypeDefinition(def) => {
                    self.record(&def.name, true, def.members.iter().cloned())
                }
                D::UnionTypeExtension(ext) => {
                    self.record(&ext.name, false, ext.members.iter().cloned())
                }
                D::ScalarTypeDefinition(def) => self.record(&def.name, true, []),
                D::ScalarTypeExtension(ext) => self.record(&ext.name, false, []),
                _ => {}
            }
        }
    }
}

fn field_names(fields: &[Node<ast::FieldDefinition>]) -> Vec<Name> {
    fields.iter().map(|field| field.name.clone()).collect()
}

fn input_names(fields: &[Node<ast::InputValueDefinition>]) -> Vec<Name> {
    fields.iter().map(|field| field.name.clone()).collect()
}

const ROOT_TYPE_NAMES: [&str; 3] = ["Query", "Mutation", "Subscription"];

/// Root types and root fields merged into the engine schema so far. `None` stands for the type
/// definition itself.
type MergedRootFields = IndexSet<(Name, Option<Name>)>;

/// Every service may define the root types, and namespaced root fields are declared by each
/// service using them. Root definitions after the first become extensions and root fields already
/// merged are left out, so the engine schema holds each of them once.
fn merge_root_definitions(
    document: &ast::Document,
    merged: &mut MergedRootFields,
) -> ast::Document {
    let mut document = document.clone();
    for definition in &mut document.definitions {
        let merged_definition = match &*definition {
            ast::Definition::ObjectTypeDefinition(root)
                if ROOT_TYPE_NAMES.contains(&root.name.as_str()) =>
            {
                let fields = unmerged_fields(&root.name, &root.fields, merged);
                if merged.insert((root.name.clone(), None)) {
                    let mut root = (**root).clone();
                    root.fields = fields;
                    ast::Definition::ObjectTypeDefinition(Node::new(root))
                } else {
                    ast::Definition::ObjectTypeExtension(Node::new(ast::ObjectTypeExtension {
                        name: root.name.clone(),
                        implements_interfaces: root.implements_interfaces.clone(),
                        directives: root.directives.clone(),
                        fields,
                    }))
                }
            }
            ast::Definition::ObjectTypeExtension(root)
                if ROOT_TYPE_NAMES.contains(&root.name.as_str()) =>
            {
                let mut root = (**root).clone();
                root.fields = unmerged_fields(&root.name, &root.fields, merged);
                ast::Definition::ObjectTypeExtension(Node::new(root))
            }
            _ => continue,
        };
        *definition = merged_definition;
    }
    document
}

fn unmerged_fields(
    root: &Name,
    fields: &[Node<ast::FieldDefinition>],
    merged: &mut MergedRootFields,
) -> Vec<Node<ast::FieldDefinition>> {
    fields
        .iter()
        .filter(|field| merged.insert((root.clone(), Some(field.name.clone()))))
        .cloned()
        .collect()
}

/// One service: what it contributes to the overall schema, and its own underlying schema.
#[derive(Debug)]
pub struct ServiceSchema {
    pub(crate) name: ServiceName,
    pub(crate) declarations: ServiceDeclarations,
    /// `None` only for the shared pseudo-service.
    pub(crate) underlying: Option<Schema>,
}

impl ServiceSchema {
    pub fn name(&self) -> &ServiceName {
        &self.name
    }

    pub fn underlying(&self) -> Option<&Schema> {
        self.underlying.as_ref()
    }

    pub(crate) fn declares(&self, type_name: &str) -> bool {
        self.declarations.types.contains_key(type_name)
    }

    /// Whether the service holds the definition of `type_name` rather than only extensions.
    pub(crate) fn defines(&self, type_name: &str) -> bool {
        self.declarations
            .types
            .get(type_name)
            .is_some_and(|declaration| declaration.defines)
    }

    /// Types the service only contributes extensions to.
    pub(crate) fn extended_types(&self) -> impl Iterator<Item = &Name> {
        self.declarations
            .types
            .iter()
            .filter(|(_, declaration)| !declaration.defines)
            .map(|(name, _)| name)
    }

    pub(crate) fn declared_members(&self, type_name: &str) -> Option<&IndexSet<Name>> {
        self.declarations
            .types
            .get(type_name)
            .map(|declaration| &declaration.members)
    }
}

/// The overall schema, split per declaring service, alongside every service's underlying schema.
#[derive(Debug)]
pub struct NadelSchemas {
    engine_schema: Schema,
    services: IndexMap<ServiceName, ServiceSchema>,
    /// Services holding a type's definition.
    definers: MultiMap<Name, ServiceName>,
    type_annotations: IndexMap<Name, TypeAnnotations>,
    field_annotations: IndexMap<(Name, Name), FieldAnnotations>,
}

impl NadelSchemas {
    pub fn builder() -> NadelSchemasBuilder {
        NadelSchemasBuilder::default()
    }

    /// The merged overall schema, as exposed by the gateway.
    pub fn engine_schema(&self) -> &Schema {
        &self.engine_schema
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceSchema> {
        self.services.values()
    }

    pub fn service(&self, name: &str) -> Option<&ServiceSchema> {
        self.services.get(&ServiceName::new(name))
    }

    pub(crate) fn shared_service(&self) -> Option<&ServiceSchema> {
        self.service(SHARED_SERVICE_NAME)
    }

    pub(crate) fn definers(&self, type_name: &str) -> &[ServiceName] {
        self.definers
            .get_vec(type_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn type_annotations(&self, type_name: &str) -> Option<&TypeAnnotations> {
        self.type_annotations.get(type_name)
    }

    pub(crate) fn is_virtual_type(&self, type_name: &str) -> bool {
        self.type_annotations(type_name)
            .is_some_and(|annotations| annotations.virtual_type)
    }

    pub(crate) fn is_stubbed_type(&self, type_name: &str) -> bool {
        self.type_annotations(type_name)
            .is_some_and(|annotations| annotations.stubbed)
    }

    pub fn field_annotations(
        &self,
        type_name: &Name,
        field_name: &Name,
    ) -> Option<&FieldAnnotations> {
        self.field_annotations
            .get(&(type_name.clone(), field_name.clone()))
    }

    /// Member names of `type_name` that `service` is accountable for.
    ///
    /// That is the members `service` declared plus those declared by the shared pseudo-service. A
    /// service that does not declare the type at all is accountable for what its definers declare.
    pub(crate) fn members_for(&self, service: &ServiceSchema, type_name: &str) -> IndexSet<Name> {
        let mut members = IndexSet::new();
        if let Some(declared) = service.declared_members(type_name) {
            members.extend(declared.iter().cloned());
        } else {
            for definer in self.definers(type_name) {
                if let Some(declared) = self
                    .services
                    .get(definer)
                    .and_then(|definer| definer.declared_members(type_name))
                {
                    members.extend(declared.iter().cloned());
                }
            }
        }
        if !service.name.is_shared() {
            if let Some(declared) = self
                .shared_service()
                .and_then(|shared| shared.declared_members(type_name))
            {
                members.extend(declared.iter().cloned());
            }
        }
        members
    }

    /// Whether `service` can see `type_name`, by declaring it itself or through the shared
    /// pseudo-service.
    pub(crate) fn is_visible_to(&self, service: &ServiceSchema, type_name: &str) -> bool {
        service.declares(type_name)
            || self
                .shared_service()
                .is_some_and(|shared| shared.declares(type_name))
    }
}

#[derive(Debug, Default)]
pub struct NadelSchemasBuilder {
    overall: IndexMap<ServiceName, Vec<String>>,
    underlying: IndexMap<ServiceName, String>,
}

impl NadelSchemasBuilder {
    /// Adds an overall schema document for `service`. Can be called several times per service.
    pub fn overall_schema(
        mut self,
        service: impl Into<ServiceName>,
        sdl: impl Into<String>,
    ) -> Self {
        self.overall
            .entry(service.into())
            .or_default()
            .push(sdl.into());
        self
    }

    /// Adds a document to the shared pseudo-service.
    pub fn shared_schema(self, sdl: impl Into<String>) -> Self {
        self.overall_schema(ServiceName::shared(), sdl)
    }

    pub fn underlying_schema(
        mut self,
        service: impl Into<ServiceName>,
        sdl: impl Into<String>,
    ) -> Self {
        self.underlying.insert(service.into(), sdl.into());
        self
    }

    pub fn build(self) -> Result<NadelSchemas, SchemaError> {
        if let Some(service) = self
            .underlying
            .keys()
            .find(|service| !self.overall.contains_key(*service))
        {
            return Err(SchemaError::UnknownService {
                service: service.clone(),
            });
        }

        let mut documents = Vec::new();
        for (service, sources) in &self.overall {
            for (index, source) in sources.iter().enumerate() {
                let path = format!("{service}/overall-{index}.graphqls");
                let document = ast::Document::parse(source.as_str(), path.as_str())
                    .map_err(|error| SchemaError::parse(service, SchemaKind::Overall, error))?;
                documents.push((service.clone(), document));
            }
        }

        let declares_nadel_definitions = documents.iter().any(|(_, document)| {
            document.definitions.iter().any(|definition| {
                definition
                    .name()
                    .is_some_and(|name| NADEL_DEFINITION_NAMES.contains(&name.as_str()))
            })
        });
        let mut builder = Schema::builder().adopt_orphan_extensions();
        if !declares_nadel_definitions {
            builder = builder.parse(NADEL_DIRECTIVE_DEFINITIONS, "nadel-directives.graphqls");
        }
        let mut merged_roots = MergedRootFields::new();
        for (_, document) in &documents {
            builder = builder.add_ast(&merge_root_definitions(document, &mut merged_roots));
        }
        let engine_schema = builder
            .build()
            .map_err(|error| SchemaError::build(SchemaKind::Overall, error))?;

        let mut services: IndexMap<ServiceName, ServiceSchema> = IndexMap::new();
        let mut definers = MultiMap::new();
        for (service, document) in &documents {
            let entry = services
                .entry(service.clone())
                .or_insert_with(|| ServiceSchema {
                    name: service.clone(),
                    declarations: ServiceDeclarations::default(),
                    underlying: None,
                });
            entry.declarations.add_document(document);
        }
        for service in services.values_mut() {
            for (type_name, declaration) in &service.declarations.types {
                if declaration.defines {
                    definers.insert(type_name.clone(), service.name.clone());
                }
            }
            if service.name.is_shared() {
                continue;
            }
            let Some(sdl) = self.underlying.get(&service.name) else {
                return Err(SchemaError::MissingUnderlyingSchema {
                    service: service.name.clone(),
                });
            };
            let underlying = Schema::builder()
                .adopt_orphan_extensions()
                .parse(
                    sdl.as_str(),
                    format!("{}/underlying.graphqls", service.name),
                )
                .build()
                .map_err(|error| SchemaError::parse(&service.name, SchemaKind::Underlying, error))?;
            service.underlying = Some(underlying);
        }

        let mut type_annotations = IndexMap::new();
        let mut field_annotations = IndexMap::new();
        for (type_name, ty) in &engine_schema.types {
            if ty.is_built_in() {
                continue;
            }
            type_annotations.insert(type_name.clone(), TypeAnnotations::from_type(ty)?);
            let fields = match ty {
                ExtendedType::Object(object) => &object.fields,
                ExtendedType::Interface(interface) => &interface.fields,
                _ => continue,
            };
            for (field_name, field) in fields {
                let coordinate = format!("{type_name}.{field_name}");
                field_annotations.insert(
                    (type_name.clone(), field_name.clone()),
                    FieldAnnotations::from_directives(&field.directives, &coordinate)?,
                );
            }
        }

        Ok(NadelSchemas {
            engine_schema,
            services,
            definers,
            type_annotations,
            field_annotations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_extensions_to_declaring_service() {
        let schemas = NadelSchemas::builder()
            .overall_schema(
                "Users",
                r#"
                type Query { user(id: ID!): User }
                type User { id: ID! name: String }
                "#,
            )
            .underlying_schema(
                "Users",
                "type Query { user(id: ID!): User } type User { id: ID! name: String }",
            )
            .overall_schema(
                "Issues",
                r#"
                extend type Query { issue: String }
                extend type User { issues: [String] }
                "#,
            )
            .underlying_schema("Issues", "type Query { issue: String }")
            .build()
            .unwrap();

        let users = schemas.service("Users").unwrap();
        let issues = schemas.service("Issues").unwrap();
        assert_eq!(schemas.definers("User"), &[ServiceName::new("Users")]);
        assert_eq!(
            schemas
                .members_for(issues, "User")
                .iter()
                .map(Name::as_str)
                .collect::<Vec<_>>(),
            vec!["issues"]
        );
        assert_eq!(
            schemas.members_for(users, "User").len(),
            2,
            "Users is only accountable for the fields it declared"
        );
    }

    #[test]
    fn requires_an_underlying_schema_per_service() {
        let error = NadelSchemas::builder()
            .overall_schema("Users", "type Query { me: String }")
            .build()
            .unwrap_err();

        assert!(matches!(error, SchemaError::MissingUnderlyingSchema { .. }));
    }

    #[test]
    fn merges_root_types_defined_by_several_services() {
        let schemas = NadelSchemas::builder()
            .overall_schema("Users", "type Query { me: String }")
            .underlying_schema("Users", "type Query { me: String }")
            .overall_schema("Issues", "type Query { issue: String }")
            .underlying_schema("Issues", "type Query { issue: String }")
            .build()
            .unwrap();

        let query = schemas.engine_schema().get_object("Query").unwrap();
        assert_eq!(query.fields.len(), 2);
        assert_eq!(schemas.definers("Query").len(), 2);
    }

    #[test]
    fn keeps_namespaced_root_fields_of_every_service() {
        let schemas = NadelSchemas::builder()
            .overall_schema(
                "Issues",
                "type Query { jira: JiraQuery @namespaced } type JiraQuery { issue: String }",
            )
            .underlying_schema(
                "Issues",
                "type Query { jira: JiraQuery } type JiraQuery { issue: String }",
            )
            .overall_schema(
                "Boards",
                "type Query { jira: JiraQuery @namespaced } extend type JiraQuery { board: String }",
            )
            .underlying_schema(
                "Boards",
                "type Query { jira: JiraQuery } type JiraQuery { board: String }",
            )
            .build()
            .unwrap();

        let boards = schemas.service("Boards").unwrap();
        assert_eq!(
            schemas
                .engine_schema()
                .get_object("Query")
                .unwrap()
                .fields
                .len(),
            1
        );
        assert!(schemas.members_for(boards, "Query").contains("jira"));
    }

    #[test]
    fn shared_service_needs_no_underlying_schema() {
        let schemas = NadelSchemas::builder()
            .shared_schema("scalar DateTime")
            .overall_schema("Users", "type Query { me: DateTime }")
            .underlying_schema("Users", "scalar DateTime type Query { me: DateTime }")
            .build()
            .unwrap();

        assert!(schemas.shared_service().unwrap().underlying().is_none());
    }
}
