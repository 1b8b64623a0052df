use apollo_compiler::ast::FieldDefinition;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Name;
use indexmap::IndexMap;
use indexmap::IndexSet;
use strum::IntoEnumIterator;
use tracing::trace;

use crate::schema::definitions::is_built_in_scalar;
use crate::schema::definitions::is_introspection_type;
use crate::schema::definitions::root_type_name;
use crate::schema::definitions::RootKind;
use crate::schema::definitions::TypeKind;
use crate::schema::directives::FieldAnnotations;
use crate::validation::abstract_types;
use crate::validation::element::TypeRef;
use crate::validation::hydration;
use crate::validation::matcher::field_definition;
use crate::validation::matcher::match_root_type;
use crate::validation::matcher::match_type;
use crate::validation::matcher::TypeMatch;
use crate::validation::namespace;
use crate::validation::partition;
use crate::validation::structure;
use crate::validation::stubbed;
use crate::validation::ServiceContext;
use crate::validation::ValidationError;

/// Walks the overall types one service contributes to, in lock-step with its underlying schema.
///
/// The walk starts from the root types the service declares and from the types it extends. Each
/// type is visited once, however many fields lead to it, which also ends the walk on cyclic type
/// graphs.
pub(crate) struct ServiceWalker<'a> {
    context: ServiceContext<'a>,
    visited: IndexSet<Name>,
    /// Overall types found for each underlying type.
    underlying_types: IndexMap<Name, IndexSet<Name>>,
    errors: Vec<ValidationError>,
}

impl<'a> ServiceWalker<'a> {
    pub(crate) fn new(context: ServiceContext<'a>) -> Self {
        Self {
            context,
            visited: IndexSet::new(),
            underlying_types: IndexMap::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn walk(mut self) -> Vec<ValidationError> {
        let engine = self.context.engine();
        for kind in RootKind::iter() {
            let Some(root) = root_type_name(engine, kind) else {
                continue;
            };
            if self.context.service.declares(root) {
                self.visit_root(root, kind);
            }
        }
        // Extensions may add fields to types the service's own fields never lead to.
        let service = self.context.service;
        for extended in service.extended_types() {
            self.visit_type(extended);
        }
        self.report_duplicated_types();
        self.errors
    }

    fn visit_root(&mut self, root: &Name, kind: RootKind) {
        if !self.visited.insert(root.clone()) {
            return;
        }
        let service = self.context.service_name();
        trace!("Visiting {kind} root {root} of {service}");
        match match_root_type(self.context.underlying, &self.context.renames, root, kind) {
            TypeMatch::Found { name, definition } => {
                self.record_mapping(root, &name);
                let ty = self.context.type_ref(root, &name);
                self.visit_fields(&ty, definition);
            }
            TypeMatch::Missing { name } => {
                self.errors.push(ValidationError::MissingUnderlyingType {
                    service: self.context.service_name().clone(),
                    overall_type: root.clone(),
                    underlying_type: name,
                });
            }
        }
    }

    fn visit_type(&mut self, name: &Name) {
        if is_built_in_scalar(name) || is_introspection_type(name) {
            return;
        }
        if !self.visited.insert(name.clone()) {
            return;
        }
        let schemas = self.context.schemas;
        let Some(overall) = self.context.engine().types.get(name) else {
            return;
        };
        if schemas.is_virtual_type(name) || schemas.is_stubbed_type(name) {
            trace!("Skipping overall only type {}", name);
            return;
        }
        if matches!(overall, ExtendedType::Union(_))
            && abstract_types::is_synthetic_union(&self.context, name)
        {
            trace!("Skipping union {} only produced by hydrations", name);
            return;
        }
        trace!("Visiting {} of {}", name, self.context.service_name());

        let (underlying_name, underlying) =
            match match_type(self.context.underlying, &self.context.renames, name) {
                TypeMatch::Found { name, definition } => (name, definition),
                TypeMatch::Missing {
                    name: underlying_name,
                } => {
                    self.errors.push(ValidationError::MissingUnderlyingType {
                        service: self.context.service_name().clone(),
                        overall_type: name.clone(),
                        underlying_type: underlying_name,
                    });
                    return;
                }
            };
        self.record_mapping(name, &underlying_name);
        let ty = self.context.type_ref(name, &underlying_name);
        let (overall_kind, underlying_kind) = (TypeKind::from(overall), TypeKind::from(underlying));
        if overall_kind != underlying_kind {
            self.errors.push(ValidationError::IncompatibleType {
                ty,
                overall_kind,
                underlying_kind,
            });
            return;
        }

        match overall {
            ExtendedType::Object(object) => {
                self.visit_fields(&ty, underlying);
                for interface in &object.implements_interfaces {
                    if schemas.is_visible_to(self.context.service, &interface.name) {
                        self.visit_type(&interface.name);
                    }
                }
            }
            ExtendedType::Interface(_) => {
                self.errors
                    .extend(abstract_types::check_interface(&self.context, name));
                self.visit_fields(&ty, underlying);
                for implementer in abstract_types::implementers(&self.context, name) {
                    self.visit_type(&implementer);
                }
            }
            ExtendedType::Union(_) => {
                self.errors
                    .extend(abstract_types::check_union(&self.context, &ty, underlying));
                for member in schemas.members_for(self.context.service, name) {
                    self.visit_type(&member);
                }
            }
            ExtendedType::InputObject(input) => {
                self.errors.extend(structure::check_input_object(
                    &self.context,
                    &ty,
                    overall,
                    underlying,
                ));
                for field_name in schemas.members_for(self.context.service, name) {
                    if let Some(field) = input.fields.get(&field_name) {
                        self.visit_type(field.ty.inner_named_type());
                    }
                }
            }
            ExtendedType::Enum(_) => {
                self.errors
                    .extend(structure::check_enum(&self.context, &ty, underlying));
            }
            ExtendedType::Scalar(_) => {}
        }
    }

    fn visit_fields(&mut self, parent: &TypeRef, underlying: &ExtendedType) {
        let Some(overall) = self.context.engine().types.get(&parent.overall) else {
            return;
        };
        let default_annotations = FieldAnnotations::default();
        for field_name in self
            .context
            .schemas
            .members_for(self.context.service, &parent.overall)
        {
            let Some(field) = field_definition(overall, &field_name) else {
                continue;
            };
            let annotations = self
                .context
                .schemas
                .field_annotations(&parent.overall, &field_name)
                .unwrap_or(&default_annotations);
            self.visit_field(parent, underlying, field, annotations);
        }
    }

    fn visit_field(
        &mut self,
        parent: &TypeRef,
        underlying: &ExtendedType,
        field: &FieldDefinition,
        annotations: &FieldAnnotations,
    ) {
        let context = &self.context;
        let service_field = context.service_field(&parent.overall, &field.name);
        if annotations.hidden {
            trace!("Validating hidden field {}", service_field);
        }
        if annotations.namespaced {
            self.errors
                .extend(namespace::check_field(context, &service_field, field));
        }
        if let Some(partition) = &annotations.partition {
            self.errors.extend(partition::check_field(
                context,
                &service_field,
                field,
                annotations,
                partition,
            ));
        }
        self.errors.extend(stubbed::check_field(
            context,
            &service_field,
            field,
            annotations,
        ));
        if stubbed::is_stubbed_field(context, field, annotations) {
            trace!("Skipping stubbed field {}", service_field);
            return;
        }
        if annotations.is_hydrated() {
            self.errors.extend(hydration::check_field(
                context,
                parent,
                underlying,
                field,
                annotations,
            ));
            return;
        }

        self.errors.extend(structure::check_field(
            context, parent, underlying, field,
        ));
        self.visit_type(field.ty.inner_named_type());
        for argument in &field.arguments {
            self.visit_type(argument.ty.inner_named_type());
        }
    }

    fn record_mapping(&mut self, overall: &Name, underlying: &Name) {
        self.underlying_types
            .entry(underlying.clone())
            .or_default()
            .insert(overall.clone());
    }

    fn report_duplicated_types(&mut self) {
        for (underlying_type, overall_types) in &self.underlying_types {
            if overall_types.len() > 1 {
                self.errors.push(ValidationError::DuplicatedUnderlyingType {
                    service: self.context.service_name().clone(),
                    underlying_type: underlying_type.clone(),
                    overall_types: overall_types.iter().cloned().collect(),
                });
            }
        }
    }
}
