//! Named types of the type system.
//!
//! Wrapping kinds (list and non null) are expressed by [`FieldType`] references; every
//! type here is addressed by its unique name.

use std::sync::Arc;

use apollo_compiler::ast;
use derivative::Derivative;
use indexmap::IndexMap;

use crate::Context;
use crate::json_ext::Value;
use crate::json_ext::ValueExt;
use crate::resolver::IsTypeOf;
use crate::resolver::ResolveInfo;
use crate::resolver::ResolveType;
use crate::resolver::ResolvedValue;
use crate::resolver::Resolver;
use crate::resolver::ResolverParams;
use crate::schema::scalars;
use crate::spec::FieldType;

/// Result coercion of a scalar: internal value to response value.
pub type SerializeFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;
/// Input coercion of a scalar: variable value to internal value.
pub type ParseValueFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;
/// Literal coercion of a scalar: document literal to internal value.
pub type ParseLiteralFn = Arc<dyn Fn(&ast::Value) -> Result<Value, String> + Send + Sync>;

/// A type registered in a [`Schema`](crate::Schema).
#[derive(Clone, Debug)]
pub enum NamedType {
    Scalar(ScalarType),
    Enum(EnumType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    InputObject(InputObjectType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            NamedType::Scalar(ty) => &ty.name,
            NamedType::Enum(ty) => &ty.name,
            NamedType::Object(ty) => &ty.name,
            NamedType::Interface(ty) => &ty.name,
            NamedType::Union(ty) => &ty.name,
            NamedType::InputObject(ty) => &ty.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            NamedType::Scalar(ty) => ty.description.as_deref(),
            NamedType::Enum(ty) => ty.description.as_deref(),
            NamedType::Object(ty) => ty.description.as_deref(),
            NamedType::Interface(ty) => ty.description.as_deref(),
            NamedType::Union(ty) => ty.description.as_deref(),
            NamedType::InputObject(ty) => ty.description.as_deref(),
        }
    }

    /// The introspection `__TypeKind` of this type.
    pub fn kind(&self) -> &'static str {
        match self {
            NamedType::Scalar(_) => "SCALAR",
            NamedType::Enum(_) => "ENUM",
            NamedType::Object(_) => "OBJECT",
            NamedType::Interface(_) => "INTERFACE",
            NamedType::Union(_) => "UNION",
            NamedType::InputObject(_) => "INPUT_OBJECT",
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, NamedType::Scalar(_) | NamedType::Enum(_))
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, NamedType::Interface(_) | NamedType::Union(_))
    }

    pub fn is_input_type(&self) -> bool {
        matches!(
            self,
            NamedType::Scalar(_) | NamedType::Enum(_) | NamedType::InputObject(_)
        )
    }

    pub fn is_output_type(&self) -> bool {
        !matches!(self, NamedType::InputObject(_))
    }

    /// Output fields of object and interface types.
    pub fn fields(&self) -> Option<&IndexMap<String, FieldDefinition>> {
        match self {
            NamedType::Object(ty) => Some(&ty.fields),
            NamedType::Interface(ty) => Some(&ty.fields),
            _ => None,
        }
    }
}

macro_rules! impl_from_named_type {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for NamedType {
                fn from(ty: $ty) -> Self {
                    NamedType::$variant(ty)
                }
            }
        )+
    };
}

impl_from_named_type!(
    Scalar(ScalarType),
    Enum(EnumType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    InputObject(InputObjectType),
);

/// A leaf type with custom coercion rules.
///
/// Without explicit coercion functions, values are passed through unchanged.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    #[derivative(Debug = "ignore")]
    pub(crate) serialize: SerializeFn,
    #[derivative(Debug = "ignore")]
    pub(crate) parse_value: ParseValueFn,
    #[derivative(Debug = "ignore")]
    pub(crate) parse_literal: ParseLiteralFn,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            serialize: Arc::new(scalars::identity),
            parse_value: Arc::new(scalars::identity),
            parse_literal: Arc::new(scalars::literal_to_value),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn serialize<F>(mut self, serialize: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.serialize = Arc::new(serialize);
        self
    }

    pub fn parse_value<F>(mut self, parse_value: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.parse_value = Arc::new(parse_value);
        self
    }

    pub fn parse_literal<F>(mut self, parse_literal: F) -> Self
    where
        F: Fn(&ast::Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.parse_literal = Arc::new(parse_literal);
        self
    }

    pub(crate) fn serialize_value(&self, value: &Value) -> Result<Value, String> {
        (self.serialize)(value)
    }

    pub(crate) fn parse_input_value(&self, value: &Value) -> Result<Value, String> {
        (self.parse_value)(value)
    }

    pub(crate) fn parse_literal_value(&self, value: &ast::Value) -> Result<Value, String> {
        (self.parse_literal)(value)
    }
}

/// One value of an [`EnumType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    /// The internal value resolvers produce and arguments receive.
    pub value: Value,
    pub deprecation_reason: Option<String>,
}

impl EnumValue {
    /// An enum value whose internal value is its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: Value::String(name.clone().into()),
            name,
            description: None,
            deprecation_reason: None,
        }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

/// A leaf type with a closed set of values.
#[derive(Clone, Debug)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: IndexMap<String, EnumValue>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: IndexMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a value mapped to an internal value.
    pub fn value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.enum_value(EnumValue::new(name).value(value))
    }

    pub fn enum_value(mut self, value: EnumValue) -> Self {
        self.values.insert(value.name.clone(), value);
        self
    }

    /// Maps an internal value back to the name of the enum value.
    pub(crate) fn serialize(&self, value: &Value) -> Result<Value, String> {
        self.values
            .values()
            .find(|enum_value| &enum_value.value == value)
            .map(|enum_value| Value::String(enum_value.name.clone().into()))
            .ok_or_else(|| {
                format!(
                    "Enum \"{}\" cannot represent value: {}",
                    self.name,
                    value.describe()
                )
            })
    }

    pub(crate) fn parse_value(&self, value: &Value) -> Result<Value, String> {
        value
            .as_str()
            .and_then(|name| self.values.get(name))
            .map(|enum_value| enum_value.value.clone())
            .ok_or_else(|| {
                format!(
                    "Value {} does not exist in \"{}\" enum.",
                    value.describe(),
                    self.name
                )
            })
    }

    pub(crate) fn parse_literal(&self, value: &ast::Value) -> Result<Value, String> {
        match value {
            ast::Value::Enum(name) => self
                .values
                .get(name.as_str())
                .map(|enum_value| enum_value.value.clone())
                .ok_or_else(|| {
                    format!(
                        "Value \"{}\" does not exist in \"{}\" enum.",
                        name.as_str(),
                        self.name
                    )
                }),
            other => Err(format!(
                "Enum \"{}\" cannot represent non-enum value: {other}.",
                self.name
            )),
        }
    }
}

/// A concrete composite type.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldDefinition>,
    /// Names of the interfaces this type implements.
    pub interfaces: Vec<String>,
    #[derivative(Debug = "ignore")]
    pub(crate) is_type_of: Option<IsTypeOf>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
            interfaces: Vec::new(),
            is_type_of: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Sets the runtime check used to recognize values of this type.
    pub fn is_type_of<F>(mut self, is_type_of: F) -> Self
    where
        F: Fn(&Value, &Context, &ResolveInfo) -> bool + Send + Sync + 'static,
    {
        self.is_type_of = Some(Arc::new(is_type_of));
        self
    }
}

/// An abstract type defined by a set of fields.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldDefinition>,
    #[derivative(Debug = "ignore")]
    pub(crate) resolve_type: Option<ResolveType>,
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
            resolve_type: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Sets the function naming the concrete type of a value.
    pub fn resolve_type<F>(mut self, resolve_type: F) -> Self
    where
        F: Fn(&Value, &Context, &ResolveInfo) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(resolve_type));
        self
    }
}

/// An abstract type defined by a list of member object types.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    /// Member type names, in declaration order.
    pub types: Vec<String>,
    #[derivative(Debug = "ignore")]
    pub(crate) resolve_type: Option<ResolveType>,
}

impl UnionType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            types: Vec::new(),
            resolve_type: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn member(mut self, object: impl Into<String>) -> Self {
        self.types.push(object.into());
        self
    }

    /// Sets the function naming the concrete type of a value.
    pub fn resolve_type<F>(mut self, resolve_type: F) -> Self
    where
        F: Fn(&Value, &Context, &ResolveInfo) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(resolve_type));
        self
    }
}

/// A structured argument type.
#[derive(Clone, Debug)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, InputValueDefinition>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: InputValueDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

/// A field of an object or interface type.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: FieldType,
    pub arguments: IndexMap<String, InputValueDefinition>,
    pub deprecation_reason: Option<String>,
    #[derivative(Debug = "ignore")]
    pub(crate) resolver: Option<Arc<dyn Resolver>>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            arguments: IndexMap::new(),
            deprecation_reason: None,
            resolver: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    /// Resolves the field with a closure.
    pub fn resolver<F, R>(mut self, resolver: F) -> Self
    where
        F: Fn(ResolverParams) -> R + Send + Sync + 'static,
        R: Into<ResolvedValue>,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Resolves the field with a shared [`Resolver`] implementation.
    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }
}

/// An argument, or a field of an input object type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: FieldType,
    /// Internal value used when no value is provided.
    pub default_value: Option<Value>,
}

impl InputValueDefinition {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            default_value: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A directive available in executable documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<String>,
    pub arguments: IndexMap<String, InputValueDefinition>,
}
