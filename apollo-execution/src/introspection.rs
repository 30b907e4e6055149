//! Introspection types and meta fields.
//!
//! The `__Schema` and `__Type` values are resolved on demand from the schema handed to
//! every resolver. A `__Type` value is the serialized [`FieldType`] reference it
//! describes; `__Field`, `__InputValue`, `__EnumValue` and `__Directive` values are
//! plain objects read by the default resolver.

use serde_json_bytes::json;

use crate::FieldError;
use crate::ResolverParams;
use crate::Schema;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::schema::DirectiveDefinition;
use crate::schema::EnumType;
use crate::schema::EnumValue;
use crate::schema::FieldDefinition;
use crate::schema::InputValueDefinition;
use crate::schema::NamedType;
use crate::schema::ObjectType;
use crate::spec::FieldType;

pub(crate) const SCHEMA_FIELD: &str = "__schema";
pub(crate) const TYPE_FIELD: &str = "__type";

fn named(name: &str) -> FieldType {
    FieldType::named(name)
}

fn required(name: &str) -> FieldType {
    FieldType::named(name).into_non_null()
}

/// `[T!]!`
fn required_list(name: &str) -> FieldType {
    required(name).into_list().into_non_null()
}

/// `[T!]`
fn list(name: &str) -> FieldType {
    required(name).into_list()
}

fn include_deprecated() -> InputValueDefinition {
    InputValueDefinition::new("includeDeprecated", named("Boolean")).default_value(false)
}

/// The `__schema` meta field, available on the query root.
pub(crate) fn schema_meta_field() -> FieldDefinition {
    FieldDefinition::new(SCHEMA_FIELD, required("__Schema"))
        .description("Access the current type schema of this server.")
        .resolver(|_params: ResolverParams| Value::Object(Object::new()))
}

/// The `__type(name:)` meta field, available on the query root.
pub(crate) fn type_meta_field() -> FieldDefinition {
    FieldDefinition::new(TYPE_FIELD, named("__Type"))
        .description("Request the type information of a single type.")
        .argument(InputValueDefinition::new("name", required("String")))
        .resolver(resolve_type_by_name)
}

fn resolve_type_by_name(params: ResolverParams) -> Result<Value, FieldError> {
    let name = params.args.get("name").and_then(Value::as_str).unwrap_or_default();
    match params.info.schema.get_type(name) {
        Some(ty) => type_value(&FieldType::named(ty.name())),
        None => Ok(Value::Null),
    }
}

/// Introspection types registered in every schema.
pub(crate) fn types() -> Vec<NamedType> {
    vec![
        ObjectType::new("__Schema")
            .description(
                "A GraphQL Schema defines the capabilities of a GraphQL server. It exposes all \
                 available types and directives on the server, as well as the entry points for \
                 query, mutation, and subscription operations.",
            )
            .field(
                FieldDefinition::new("types", required_list("__Type"))
                    .description("A list of all types supported by this server.")
                    .resolver(schema_types),
            )
            .field(
                FieldDefinition::new("queryType", required("__Type"))
                    .description("The type that query operations will be rooted at.")
                    .resolver(|params: ResolverParams| {
                        let schema = &params.info.schema;
                        type_value(&FieldType::named(schema.query_type_name()))
                    }),
            )
            .field(
                FieldDefinition::new("mutationType", named("__Type"))
                    .description(
                        "If this server supports mutation, the type that mutation operations \
                         will be rooted at.",
                    )
                    .resolver(|params: ResolverParams| {
                        optional_type(params.info.schema.mutation_type())
                    }),
            )
            .field(
                FieldDefinition::new("subscriptionType", named("__Type"))
                    .description(
                        "If this server support subscription, the type that subscription \
                         operations will be rooted at.",
                    )
                    .resolver(|params: ResolverParams| {
                        optional_type(params.info.schema.subscription_type())
                    }),
            )
            .field(
                FieldDefinition::new("directives", required_list("__Directive"))
                    .description("A list of all directives supported by this server.")
                    .resolver(schema_directives),
            )
            .into(),
        ObjectType::new("__Type")
            .description(
                "The fundamental unit of any GraphQL Schema is the type. There are many kinds of \
                 types in GraphQL as represented by the `__TypeKind` enum.",
            )
            .field(FieldDefinition::new("kind", required("__TypeKind")).resolver(type_kind))
            .field(FieldDefinition::new("name", named("String")).resolver(type_name))
            .field(FieldDefinition::new("description", named("String")).resolver(type_description))
            .field(
                FieldDefinition::new("fields", list("__Field"))
                    .argument(include_deprecated())
                    .resolver(type_fields),
            )
            .field(FieldDefinition::new("interfaces", list("__Type")).resolver(type_interfaces))
            .field(
                FieldDefinition::new("possibleTypes", list("__Type")).resolver(type_possible_types),
            )
            .field(
                FieldDefinition::new("enumValues", list("__EnumValue"))
                    .argument(include_deprecated())
                    .resolver(type_enum_values),
            )
            .field(
                FieldDefinition::new("inputFields", list("__InputValue")).resolver(type_input_fields),
            )
            .field(FieldDefinition::new("ofType", named("__Type")).resolver(type_of_type))
            .into(),
        ObjectType::new("__Field")
            .description(
                "Object and Interface types are described by a list of Fields, each of which has \
                 a name, potentially a list of arguments, and a return type.",
            )
            .field(FieldDefinition::new("name", required("String")))
            .field(FieldDefinition::new("description", named("String")))
            .field(FieldDefinition::new("args", required_list("__InputValue")))
            .field(FieldDefinition::new("type", required("__Type")))
            .field(FieldDefinition::new("isDeprecated", required("Boolean")))
            .field(FieldDefinition::new("deprecationReason", named("String")))
            .into(),
        ObjectType::new("__InputValue")
            .description(
                "Arguments provided to Fields or Directives and the input fields of an \
                 InputObject are represented as Input Values which describe their type and \
                 optionally a default value.",
            )
            .field(FieldDefinition::new("name", required("String")))
            .field(FieldDefinition::new("description", named("String")))
            .field(FieldDefinition::new("type", required("__Type")))
            .field(
                FieldDefinition::new("defaultValue", named("String")).description(
                    "A GraphQL-formatted string representing the default value for this input \
                     value.",
                ),
            )
            .into(),
        ObjectType::new("__EnumValue")
            .description(
                "One possible value for a given Enum. Enum values are unique values, not a \
                 placeholder for a string or numeric value.",
            )
            .field(FieldDefinition::new("name", required("String")))
            .field(FieldDefinition::new("description", named("String")))
            .field(FieldDefinition::new("isDeprecated", required("Boolean")))
            .field(FieldDefinition::new("deprecationReason", named("String")))
            .into(),
        ObjectType::new("__Directive")
            .description(
                "A Directive provides a way to describe alternate runtime execution and type \
                 validation behavior in a GraphQL document.",
            )
            .field(FieldDefinition::new("name", required("String")))
            .field(FieldDefinition::new("description", named("String")))
            .field(FieldDefinition::new("locations", required_list("__DirectiveLocation")))
            .field(FieldDefinition::new("args", required_list("__InputValue")))
            .into(),
        [
            ("SCALAR", "Indicates this type is a scalar."),
            ("OBJECT", "Indicates this type is an object. `fields` and `interfaces` are valid fields."),
            ("INTERFACE", "Indicates this type is an interface. `fields` and `possibleTypes` are valid fields."),
            ("UNION", "Indicates this type is a union. `possibleTypes` is a valid field."),
            ("ENUM", "Indicates this type is an enum. `enumValues` is a valid field."),
            ("INPUT_OBJECT", "Indicates this type is an input object. `inputFields` is a valid field."),
            ("LIST", "Indicates this type is a list. `ofType` is a valid field."),
            ("NON_NULL", "Indicates this type is a non-null. `ofType` is a valid field."),
        ]
        .into_iter()
        .fold(
            EnumType::new("__TypeKind")
                .description("An enum describing what kind of type a given `__Type` is."),
            |kind, (name, description)| kind.enum_value(EnumValue::new(name).description(description)),
        )
        .into(),
        [
            "QUERY",
            "MUTATION",
            "SUBSCRIPTION",
            "FIELD",
            "FRAGMENT_DEFINITION",
            "FRAGMENT_SPREAD",
            "INLINE_FRAGMENT",
        ]
        .into_iter()
        .fold(
            EnumType::new("__DirectiveLocation").description(
                "A Directive can be adjacent to many parts of the GraphQL language, a \
                 __DirectiveLocation describes one such possible adjacencies.",
            ),
            |location, name| location.enum_value(EnumValue::new(name)),
        )
        .into(),
    ]
}

fn type_value(ty: &FieldType) -> Result<Value, FieldError> {
    serde_json_bytes::to_value(ty).map_err(|e| FieldError::new(e.to_string()))
}

fn optional_type(object: Option<&ObjectType>) -> Result<Value, FieldError> {
    match object {
        Some(object) => type_value(&FieldType::named(&object.name)),
        None => Ok(Value::Null),
    }
}

/// Reads the type reference a `__Type` value stands for.
fn type_ref(source: &Value) -> Result<FieldType, FieldError> {
    serde_json_bytes::from_value(source.clone())
        .map_err(|e| FieldError::new(format!("invalid __Type value: {e}")))
}

/// The named type a `__Type` value stands for, when it is not a wrapping type.
fn named_type<'s>(schema: &'s Schema, source: &Value) -> Result<Option<&'s NamedType>, FieldError> {
    match type_ref(source)? {
        FieldType::Named(name) => schema
            .get_type(&name)
            .map(Some)
            .ok_or_else(|| FieldError::new(format!("unknown type '{name}'"))),
        _ => Ok(None),
    }
}

fn include_deprecated_arg(args: &Object) -> bool {
    args.get("includeDeprecated")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn schema_types(params: ResolverParams) -> Result<Value, FieldError> {
    params
        .info
        .schema
        .types()
        .map(|ty| type_value(&FieldType::named(ty.name())))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn schema_directives(params: ResolverParams) -> Result<Value, FieldError> {
    let schema = &params.info.schema;
    schema
        .directives()
        .map(|directive| directive_value(schema, directive))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn type_kind(params: ResolverParams) -> Result<Value, FieldError> {
    let kind = match type_ref(&params.source)? {
        FieldType::NonNull(_) => "NON_NULL",
        FieldType::List(_) => "LIST",
        FieldType::Named(_) => named_type(&params.info.schema, &params.source)?
            .map(NamedType::kind)
            .unwrap_or_default(),
    };
    Ok(Value::from(kind))
}

fn type_name(params: ResolverParams) -> Result<Value, FieldError> {
    Ok(named_type(&params.info.schema, &params.source)?
        .map(|ty| Value::from(ty.name()))
        .unwrap_or(Value::Null))
}

fn type_description(params: ResolverParams) -> Result<Value, FieldError> {
    Ok(named_type(&params.info.schema, &params.source)?
        .and_then(NamedType::description)
        .map(Value::from)
        .unwrap_or(Value::Null))
}

fn type_fields(params: ResolverParams) -> Result<Value, FieldError> {
    let schema = &params.info.schema;
    let Some(fields) = named_type(schema, &params.source)?.and_then(NamedType::fields) else {
        return Ok(Value::Null);
    };
    let include_deprecated = include_deprecated_arg(&params.args);
    fields
        .values()
        .filter(|field| !field.name.starts_with("__"))
        .filter(|field| include_deprecated || field.deprecation_reason.is_none())
        .map(|field| field_value(schema, field))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn type_interfaces(params: ResolverParams) -> Result<Value, FieldError> {
    match named_type(&params.info.schema, &params.source)? {
        Some(NamedType::Object(object)) => object
            .interfaces
            .iter()
            .map(|interface| type_value(&FieldType::named(interface)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        _ => Ok(Value::Null),
    }
}

fn type_possible_types(params: ResolverParams) -> Result<Value, FieldError> {
    let schema = &params.info.schema;
    match named_type(schema, &params.source)? {
        Some(ty) if ty.is_abstract() => schema
            .possible_types(ty.name())
            .into_iter()
            .map(|object| type_value(&FieldType::named(object)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        _ => Ok(Value::Null),
    }
}

fn type_enum_values(params: ResolverParams) -> Result<Value, FieldError> {
    let Some(NamedType::Enum(enum_type)) = named_type(&params.info.schema, &params.source)? else {
        return Ok(Value::Null);
    };
    let include_deprecated = include_deprecated_arg(&params.args);
    Ok(Value::Array(
        enum_type
            .values
            .values()
            .filter(|value| include_deprecated || value.deprecation_reason.is_none())
            .map(|value| {
                json!({
                    "name": value.name,
                    "description": value.description,
                    "isDeprecated": value.deprecation_reason.is_some(),
                    "deprecationReason": value.deprecation_reason,
                })
            })
            .collect(),
    ))
}

fn type_input_fields(params: ResolverParams) -> Result<Value, FieldError> {
    let schema = &params.info.schema;
    match named_type(schema, &params.source)? {
        Some(NamedType::InputObject(input)) => input
            .fields
            .values()
            .map(|field| input_value(schema, field))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        _ => Ok(Value::Null),
    }
}

fn type_of_type(params: ResolverParams) -> Result<Value, FieldError> {
    match type_ref(&params.source)? {
        FieldType::List(inner) | FieldType::NonNull(inner) => type_value(&inner),
        FieldType::Named(_) => Ok(Value::Null),
    }
}

fn field_value(schema: &Schema, field: &FieldDefinition) -> Result<Value, FieldError> {
    let args = field
        .arguments
        .values()
        .map(|argument| input_value(schema, argument))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({
        "name": field.name,
        "description": field.description,
        "args": args,
        "type": type_value(&field.ty)?,
        "isDeprecated": field.deprecation_reason.is_some(),
        "deprecationReason": field.deprecation_reason,
    }))
}

fn input_value(schema: &Schema, input: &InputValueDefinition) -> Result<Value, FieldError> {
    Ok(json!({
        "name": input.name,
        "description": input.description,
        "type": type_value(&input.ty)?,
        "defaultValue": input
            .default_value
            .as_ref()
            .map(|value| print_value(schema, &input.ty, value)),
    }))
}

fn directive_value(schema: &Schema, directive: &DirectiveDefinition) -> Result<Value, FieldError> {
    let args = directive
        .arguments
        .values()
        .map(|argument| input_value(schema, argument))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({
        "name": directive.name,
        "description": directive.description,
        "locations": directive.locations,
        "args": args,
    }))
}

/// Prints an internal input value as a GraphQL literal of type `ty`.
fn print_value(schema: &Schema, ty: &FieldType, value: &Value) -> String {
    match (ty, value) {
        (_, Value::Null) => "null".to_string(),
        (FieldType::NonNull(inner), _) => print_value(schema, inner, value),
        (FieldType::List(inner), Value::Array(items)) => format!(
            "[{}]",
            items
                .iter()
                .map(|item| print_value(schema, inner, item))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        (FieldType::List(inner), _) => print_value(schema, inner, value),
        (FieldType::Named(name), _) => match (schema.get_type(name), value) {
            (Some(NamedType::Enum(enum_type)), _) => match enum_type.serialize(value) {
                Ok(Value::String(name)) => name.as_str().to_string(),
                _ => print_json(value),
            },
            (Some(NamedType::InputObject(input)), Value::Object(object)) => format!(
                "{{{}}}",
                input
                    .fields
                    .values()
                    .filter_map(|field| {
                        let value = object.get(field.name.as_str())?;
                        Some(format!(
                            "{}: {}",
                            field.name,
                            print_value(schema, &field.ty, value)
                        ))
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            _ => print_json(value),
        },
    }
}

fn print_json(value: &Value) -> String {
    match value {
        Value::Object(object) => format!(
            "{{{}}}",
            object
                .iter()
                .map(|(key, value)| format!("{}: {}", key.as_str(), print_json(value)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(print_json).collect::<Vec<_>>().join(", ")
        ),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
