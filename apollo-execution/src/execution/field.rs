//! Field execution.

use apollo_compiler::Node;
use apollo_compiler::ast;
use futures::future::join_all;

use crate::ResolveInfo;
use crate::ResolverParams;
use crate::execution::InvalidValue;
use crate::execution::arguments::argument_values;
use crate::execution::collect::FieldsByKey;
use crate::execution::complete::complete_value;
use crate::execution::context::ExecutionContext;
use crate::execution::path::ResponsePath;
use crate::introspection::SCHEMA_FIELD;
use crate::introspection::TYPE_FIELD;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::schema::FieldDefinition;
use crate::schema::ObjectType;
use crate::spec::FieldType;
use crate::spec::TYPENAME;

/// Executes every field of a selection set concurrently.
///
/// All fields are started before any is awaited; the output keeps the order of `fields`
/// whatever the completion order.
pub(crate) async fn execute_fields<'a>(
    ctx: &'a ExecutionContext,
    object: &'a ObjectType,
    source: &'a Value,
    path: &'a ResponsePath,
    fields: &'a FieldsByKey<'a>,
) -> Result<Value, InvalidValue> {
    let results = join_all(fields.iter().map(|(key, field_nodes)| async move {
        let result = execute_field(ctx, object, source, field_nodes, path.key(key)).await;
        (*key, result)
    }))
    .await;

    let mut output = Object::new();
    let mut invalid = false;
    for (key, result) in results {
        match result {
            Some(Ok(value)) => {
                output.insert(key, value);
            }
            Some(Err(InvalidValue)) => invalid = true,
            None => {}
        }
    }
    if invalid {
        Err(InvalidValue)
    } else {
        Ok(Value::Object(output))
    }
}

/// Executes the fields of a mutation root one after the other.
///
/// A field starts only once the previous one is fully completed. When a field nullifies
/// the whole result, the remaining fields are not executed.
pub(crate) async fn execute_fields_serially<'a>(
    ctx: &'a ExecutionContext,
    object: &'a ObjectType,
    source: &'a Value,
    path: &'a ResponsePath,
    fields: &'a FieldsByKey<'a>,
) -> Result<Value, InvalidValue> {
    let mut output = Object::new();
    for (key, field_nodes) in fields {
        match execute_field(ctx, object, source, field_nodes, path.key(key)).await {
            Some(Ok(value)) => {
                output.insert(*key, value);
            }
            Some(Err(InvalidValue)) => {
                tracing::debug!(field = %key, "mutation field nullified the result");
                return Err(InvalidValue);
            }
            None => {}
        }
    }
    Ok(Value::Object(output))
}

/// Looks up the definition of a field selected on `object`, meta fields included.
fn field_definition<'a>(
    ctx: &'a ExecutionContext,
    object: &'a ObjectType,
    name: &str,
) -> Option<&'a FieldDefinition> {
    let schema = &ctx.schema;
    let on_query_root =
        ctx.configuration.introspection && object.name == schema.query_type_name();
    match name {
        SCHEMA_FIELD if on_query_root => Some(&schema.schema_meta_field),
        TYPE_FIELD if on_query_root => Some(&schema.type_meta_field),
        _ => object.fields.get(name),
    }
}

/// Resolves and completes one response key.
///
/// Returns `None` when the field is not defined on `object`; the key is then left out of
/// the response. An `Err` means the field is non null and its value could not be
/// completed, so the parent is nullified in turn.
async fn execute_field<'a>(
    ctx: &'a ExecutionContext,
    object: &'a ObjectType,
    source: &'a Value,
    field_nodes: &'a [&'a Node<ast::Field>],
    path: ResponsePath,
) -> Option<Result<Value, InvalidValue>> {
    let node = field_nodes.first()?;
    let name = node.name.as_str();
    if name == TYPENAME {
        return Some(Ok(Value::from(object.name.as_str())));
    }
    let Some(definition) = field_definition(ctx, object, name) else {
        if matches!(name, SCHEMA_FIELD | TYPE_FIELD) && !ctx.configuration.introspection {
            tracing::debug!(field = name, "introspection is disabled");
            return None;
        }
        failfast_debug!("cannot query field \"{name}\" on type \"{}\"", object.name);
        return None;
    };

    let info = ResolveInfo {
        field_name: name.to_string(),
        response_key: node.response_name().to_string(),
        parent_type: object.name.clone(),
        return_type: definition.ty.clone(),
        path: path.to_path(),
        schema: ctx.schema.clone(),
        root_value: ctx.root_value.clone(),
        variables: ctx.variables.clone(),
        operation_kind: ctx.operation_kind,
    };

    let completed = match argument_values(&ctx.schema, definition, node, &ctx.variables) {
        Err(message) => {
            ctx.field_error(message, &path, field_nodes);
            Err(InvalidValue)
        }
        Ok(args) => {
            let resolved = match &definition.resolver {
                Some(resolver) => {
                    resolver
                        .resolve(ResolverParams {
                            source: source.clone(),
                            args,
                            context: ctx.context.clone(),
                            info: info.clone(),
                        })
                        .into_result()
                        .await
                }
                None => Ok(default_resolve(source, name)),
            };
            match resolved {
                Err(error) => {
                    tracing::debug!(%error, path = %info.path, "resolver error");
                    let locations = ctx.locations(field_nodes);
                    ctx.push_error(error.into_graphql_error(info.path.clone(), locations));
                    Err(InvalidValue)
                }
                Ok(value) => {
                    complete_value(ctx, &definition.ty, field_nodes, &info, path, value).await
                }
            }
        }
    };

    Some(null_if_nullable(&definition.ty, completed))
}

/// Reads the property named after the field on the parent value.
fn default_resolve(source: &Value, name: &str) -> Value {
    source
        .as_object()
        .and_then(|object| object.get(name))
        .cloned()
        .unwrap_or(Value::Null)
}

/// An invalid value stops at the first nullable position.
pub(crate) fn null_if_nullable(
    ty: &FieldType,
    completed: Result<Value, InvalidValue>,
) -> Result<Value, InvalidValue> {
    match completed {
        Err(InvalidValue) if !ty.is_non_null() => Ok(Value::Null),
        other => other,
    }
}
