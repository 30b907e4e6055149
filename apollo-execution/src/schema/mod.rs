//! GraphQL schema.
//!
//! A [`Schema`] is built once through [`SchemaBuilder`], validated, and then shared
//! read-only by every request.

mod scalars;
mod types;

use std::collections::HashMap;

use indexmap::IndexMap;
pub use types::*;

use crate::error::SchemaError;
use crate::introspection;
use crate::spec::FieldType;
use crate::spec::OperationKind;
use crate::spec::INCLUDE_DIRECTIVE_NAME;
use crate::spec::SKIP_DIRECTIVE_NAME;

/// A GraphQL schema.
#[derive(Debug)]
pub struct Schema {
    query: String,
    mutation: Option<String>,
    subscription: Option<String>,
    types: IndexMap<String, NamedType>,
    directives: IndexMap<String, DirectiveDefinition>,
    /// Object types implementing each interface, in registration order.
    implementers: HashMap<String, Vec<String>>,
    pub(crate) schema_meta_field: FieldDefinition,
    pub(crate) type_meta_field: FieldDefinition,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn query_type(&self) -> Option<&ObjectType> {
        self.get_object(&self.query)
    }

    pub fn mutation_type(&self) -> Option<&ObjectType> {
        self.mutation.as_deref().and_then(|name| self.get_object(name))
    }

    pub fn subscription_type(&self) -> Option<&ObjectType> {
        self.subscription
            .as_deref()
            .and_then(|name| self.get_object(name))
    }

    pub(crate) fn query_type_name(&self) -> &str {
        &self.query
    }

    /// The root type operations of `kind` execute against.
    pub fn root_type(&self, kind: OperationKind) -> Option<&ObjectType> {
        match kind {
            OperationKind::Query => self.query_type(),
            OperationKind::Mutation => self.mutation_type(),
            OperationKind::Subscription => self.subscription_type(),
        }
    }

    pub fn get_type(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    pub fn get_object(&self, name: &str) -> Option<&ObjectType> {
        match self.types.get(name) {
            Some(NamedType::Object(object)) => Some(object),
            _ => None,
        }
    }

    /// Every registered type, built-in ones included, in registration order.
    pub fn types(&self) -> impl Iterator<Item = &NamedType> {
        self.types.values()
    }

    pub fn directives(&self) -> impl Iterator<Item = &DirectiveDefinition> {
        self.directives.values()
    }

    /// The object types a value of type `name` may have at runtime.
    ///
    /// Union members in declaration order, interface implementers in registration order,
    /// or the object type itself.
    pub fn possible_types(&self, name: &str) -> Vec<&str> {
        match self.types.get(name) {
            Some(NamedType::Union(union)) => union.types.iter().map(String::as_str).collect(),
            Some(NamedType::Interface(_)) => self
                .implementers
                .get(name)
                .map(|objects| objects.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            Some(NamedType::Object(object)) => vec![object.name.as_str()],
            _ => Vec::new(),
        }
    }

    /// Returns whether `object` is a possible type of the abstract type `abstract_type`.
    pub fn is_possible_type(&self, abstract_type: &str, object: &str) -> bool {
        match self.types.get(abstract_type) {
            Some(NamedType::Union(union)) => union.types.iter().any(|member| member == object),
            Some(NamedType::Interface(_)) => self
                .implementers
                .get(abstract_type)
                .is_some_and(|objects| objects.iter().any(|o| o == object)),
            _ => false,
        }
    }

    /// Returns whether `sub` can stand where `sup` is expected (covariant field types).
    pub(crate) fn is_sub_type(&self, sub: &FieldType, sup: &FieldType) -> bool {
        match (sub, sup) {
            _ if sub == sup => true,
            (FieldType::NonNull(sub), FieldType::NonNull(sup)) => self.is_sub_type(sub, sup),
            (_, FieldType::NonNull(_)) => false,
            (FieldType::NonNull(sub), sup) => self.is_sub_type(sub, sup),
            (FieldType::List(sub), FieldType::List(sup)) => self.is_sub_type(sub, sup),
            (_, FieldType::List(_)) | (FieldType::List(_), _) => false,
            (FieldType::Named(sub), FieldType::Named(sup)) => self.is_possible_type(sup, sub),
        }
    }

    fn validate(&self) -> Result<(), SchemaError> {
        for ty in self.types.values() {
            match ty {
                NamedType::Scalar(_) | NamedType::Enum(_) => {}
                NamedType::Object(object) => {
                    self.validate_fields(&object.name, &object.fields)?;
                    self.validate_implementations(object)?;
                }
                NamedType::Interface(interface) => {
                    self.validate_fields(&interface.name, &interface.fields)?;
                }
                NamedType::Union(union) => {
                    if union.types.is_empty() {
                        return Err(SchemaError::EmptyUnion(union.name.clone()));
                    }
                    for member in &union.types {
                        match self.types.get(member) {
                            Some(NamedType::Object(_)) => {}
                            Some(_) => {
                                return Err(SchemaError::InvalidUnionMember {
                                    name: union.name.clone(),
                                    member: member.clone(),
                                });
                            }
                            None => return Err(SchemaError::UnknownType(member.clone())),
                        }
                    }
                }
                NamedType::InputObject(input) => {
                    for field in input.fields.values() {
                        self.validate_input_type(&format!("{}.{}", input.name, field.name), &field.ty)?;
                    }
                }
            }
        }
        for field in [&self.schema_meta_field, &self.type_meta_field] {
            self.validate_fields(&self.query, std::iter::once((&field.name, field)))?;
        }
        Ok(())
    }

    fn validate_fields<'a>(
        &self,
        parent: &str,
        fields: impl IntoIterator<Item = (&'a String, &'a FieldDefinition)>,
    ) -> Result<(), SchemaError> {
        for (name, field) in fields {
            let coordinate = format!("{parent}.{name}");
            let named = self.validate_type_reference(&field.ty)?;
            if !named.is_output_type() {
                return Err(SchemaError::NotAnOutputType {
                    coordinate,
                    ty: field.ty.to_string(),
                });
            }
            for argument in field.arguments.values() {
                self.validate_input_type(&format!("{coordinate}({}:)", argument.name), &argument.ty)?;
            }
        }
        Ok(())
    }

    fn validate_input_type(&self, coordinate: &str, ty: &FieldType) -> Result<(), SchemaError> {
        if !self.validate_type_reference(ty)?.is_input_type() {
            return Err(SchemaError::NotAnInputType {
                coordinate: coordinate.to_string(),
                ty: ty.to_string(),
            });
        }
        Ok(())
    }

    fn validate_type_reference(&self, ty: &FieldType) -> Result<&NamedType, SchemaError> {
        if ty.has_nested_non_null() {
            return Err(SchemaError::NestedNonNull(ty.to_string()));
        }
        let name = ty.inner_type_name();
        self.types
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    fn validate_implementations(&self, object: &ObjectType) -> Result<(), SchemaError> {
        for interface_name in &object.interfaces {
            let interface = match self.types.get(interface_name) {
                Some(NamedType::Interface(interface)) => interface,
                Some(_) => {
                    return Err(SchemaError::NotAnInterface {
                        object: object.name.clone(),
                        interface: interface_name.clone(),
                    });
                }
                None => return Err(SchemaError::UnknownType(interface_name.clone())),
            };
            for (name, interface_field) in &interface.fields {
                let Some(field) = object.fields.get(name) else {
                    return Err(SchemaError::MissingInterfaceField {
                        object: object.name.clone(),
                        interface: interface.name.clone(),
                        field: name.clone(),
                    });
                };
                if !self.is_sub_type(&field.ty, &interface_field.ty) {
                    return Err(SchemaError::InvalidInterfaceFieldType {
                        object: object.name.clone(),
                        interface: interface.name.clone(),
                        field: name.clone(),
                        expected: interface_field.ty.to_string(),
                        found: field.ty.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Builder for a [`Schema`].
///
/// Types are registered in the order they are added, followed by the root types; the
/// order of interface implementers follows it.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    query: Option<ObjectType>,
    mutation: Option<ObjectType>,
    subscription: Option<ObjectType>,
    types: Vec<NamedType>,
}

impl SchemaBuilder {
    pub fn query(mut self, query: ObjectType) -> Self {
        self.query = Some(query);
        self
    }

    pub fn mutation(mut self, mutation: ObjectType) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn subscription(mut self, subscription: ObjectType) -> Self {
        self.subscription = Some(subscription);
        self
    }

    /// Registers a type that is not a root type.
    pub fn add_type(mut self, ty: impl Into<NamedType>) -> Self {
        self.types.push(ty.into());
        self
    }

    pub fn types<T>(mut self, types: impl IntoIterator<Item = T>) -> Self
    where
        T: Into<NamedType>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    /// Registers the types and checks the structure of the schema.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let query = self.query.ok_or(SchemaError::MissingQueryRoot)?;
        let query_name = query.name.clone();
        let mutation_name = self.mutation.as_ref().map(|ty| ty.name.clone());
        let subscription_name = self.subscription.as_ref().map(|ty| ty.name.clone());

        let mut types = IndexMap::new();
        for ty in scalars::built_in()
            .into_iter()
            .map(NamedType::from)
            .chain(introspection::types())
        {
            types.insert(ty.name().to_string(), ty);
        }

        let user_types = self
            .types
            .into_iter()
            .chain(
                [Some(query), self.mutation, self.subscription]
                    .into_iter()
                    .flatten()
                    .map(NamedType::from),
            );
        for ty in user_types {
            let name = ty.name().to_string();
            if name.starts_with("__") {
                return Err(SchemaError::ReservedName(name));
            }
            if types.contains_key(&name) {
                return Err(SchemaError::DuplicateType(name));
            }
            types.insert(name, ty);
        }

        let mut implementers: HashMap<String, Vec<String>> = HashMap::new();
        for ty in types.values() {
            if let NamedType::Object(object) = ty {
                for interface in &object.interfaces {
                    implementers
                        .entry(interface.clone())
                        .or_default()
                        .push(object.name.clone());
                }
            }
        }

        let schema = Schema {
            query: query_name,
            mutation: mutation_name,
            subscription: subscription_name,
            types,
            directives: built_in_directives(),
            implementers,
            schema_meta_field: introspection::schema_meta_field(),
            type_meta_field: introspection::type_meta_field(),
        };
        schema.validate()?;
        tracing::debug!(types = schema.types.len(), "schema built");
        Ok(schema)
    }
}

fn built_in_directives() -> IndexMap<String, DirectiveDefinition> {
    [
        (
            INCLUDE_DIRECTIVE_NAME,
            "Directs the executor to include this field or fragment only when the `if` argument is true.",
            "Included when true.",
        ),
        (
            SKIP_DIRECTIVE_NAME,
            "Directs the executor to skip this field or fragment when the `if` argument is true.",
            "Skipped when true.",
        ),
    ]
    .into_iter()
    .map(|(name, description, if_description)| {
        let condition = InputValueDefinition::new(
            "if",
            FieldType::named(scalars::BOOLEAN).into_non_null(),
        )
        .description(if_description);
        let directive = DirectiveDefinition {
            name: name.to_string(),
            description: Some(description.to_string()),
            locations: ["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"]
                .into_iter()
                .map(String::from)
                .collect(),
            arguments: IndexMap::from([(condition.name.clone(), condition)]),
        };
        (name.to_string(), directive)
    })
    .collect()
}
