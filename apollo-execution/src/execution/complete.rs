//! Value completion.
//!
//! Shapes a resolved value according to its declared output type. Errors are recorded
//! where they occur; an `Err(InvalidValue)` then travels up to the closest nullable
//! position, which becomes null.

use apollo_compiler::Node;
use apollo_compiler::ast;
use futures::FutureExt;
use futures::future::BoxFuture;
use futures::future::join_all;

use crate::ResolveInfo;
use crate::execution::InvalidValue;
use crate::execution::collect::collect_subfields;
use crate::execution::context::ExecutionContext;
use crate::execution::field::execute_fields;
use crate::execution::field::null_if_nullable;
use crate::execution::path::ResponsePath;
use crate::json_ext::Value;
use crate::json_ext::ValueExt;
use crate::schema::NamedType;
use crate::schema::ObjectType;
use crate::spec::FieldType;
use crate::spec::TYPENAME;

pub(crate) fn complete_value<'a>(
    ctx: &'a ExecutionContext,
    return_type: &'a FieldType,
    field_nodes: &'a [&'a Node<ast::Field>],
    info: &'a ResolveInfo,
    path: ResponsePath,
    result: Value,
) -> BoxFuture<'a, Result<Value, InvalidValue>> {
    async move {
        match return_type {
            FieldType::NonNull(inner) => {
                let completed =
                    complete_value(ctx, inner, field_nodes, info, path.clone(), result).await?;
                if completed.is_null() {
                    ctx.field_error(
                        format!(
                            "Cannot return null for non-nullable field {}.{}.",
                            info.parent_type, info.field_name
                        ),
                        &path,
                        field_nodes,
                    );
                    return Err(InvalidValue);
                }
                Ok(completed)
            }
            _ if result.is_null() => Ok(Value::Null),
            FieldType::List(item_type) => {
                complete_list_value(ctx, item_type, field_nodes, info, path, result).await
            }
            FieldType::Named(name) => match ctx.schema.get_type(name) {
                Some(NamedType::Scalar(scalar)) => scalar
                    .serialize_value(&result)
                    .map_err(|message| invalid(ctx, message, &path, field_nodes)),
                Some(NamedType::Enum(enum_type)) => enum_type
                    .serialize(&result)
                    .map_err(|message| invalid(ctx, message, &path, field_nodes)),
                Some(NamedType::Object(object)) => {
                    complete_object_value(ctx, object, field_nodes, info, path, result).await
                }
                Some(abstract_type @ (NamedType::Interface(_) | NamedType::Union(_))) => {
                    let object =
                        resolve_runtime_type(ctx, abstract_type, field_nodes, info, &path, &result)?;
                    complete_object_value(ctx, object, field_nodes, info, path, result).await
                }
                Some(NamedType::InputObject(_)) | None => Err(invalid(
                    ctx,
                    format!("Cannot complete value of unexpected output type \"{name}\"."),
                    &path,
                    field_nodes,
                )),
            },
        }
    }
    .boxed()
}

fn invalid(
    ctx: &ExecutionContext,
    message: String,
    path: &ResponsePath,
    field_nodes: &[&Node<ast::Field>],
) -> InvalidValue {
    ctx.field_error(message, path, field_nodes);
    InvalidValue
}

/// Completes every item concurrently and joins them in index order.
async fn complete_list_value<'a>(
    ctx: &'a ExecutionContext,
    item_type: &'a FieldType,
    field_nodes: &'a [&'a Node<ast::Field>],
    info: &'a ResolveInfo,
    path: ResponsePath,
    result: Value,
) -> Result<Value, InvalidValue> {
    let Value::Array(items) = result else {
        return Err(invalid(
            ctx,
            format!(
                "Expected Iterable, but did not find one for field \"{}.{}\".",
                info.parent_type, info.field_name
            ),
            &path,
            field_nodes,
        ));
    };

    let completed = join_all(items.into_iter().enumerate().map(|(index, item)| {
        let item_path = path.index(index);
        async move {
            let completed = complete_value(ctx, item_type, field_nodes, info, item_path, item).await;
            null_if_nullable(item_type, completed)
        }
    }))
    .await;

    completed
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

async fn complete_object_value<'a>(
    ctx: &'a ExecutionContext,
    object: &'a ObjectType,
    field_nodes: &'a [&'a Node<ast::Field>],
    info: &'a ResolveInfo,
    path: ResponsePath,
    result: Value,
) -> Result<Value, InvalidValue> {
    if let Some(is_type_of) = &object.is_type_of {
        if !is_type_of(&result, &ctx.context, info) {
            return Err(invalid(
                ctx,
                format!(
                    "Expected value of type \"{}\" but got: {}.",
                    object.name,
                    result.describe()
                ),
                &path,
                field_nodes,
            ));
        }
    }

    let fields = collect_subfields(ctx, object, field_nodes);
    execute_fields(ctx, object, &result, &path, &fields).await
}

/// Determines the object type of a value of an abstract type.
///
/// The abstract type's `resolve_type` decides when present. Otherwise the first possible
/// type whose `is_type_of` accepts the value wins, and as a last resort a `__typename`
/// property on the value names the type.
fn resolve_runtime_type<'a>(
    ctx: &'a ExecutionContext,
    abstract_type: &'a NamedType,
    field_nodes: &[&Node<ast::Field>],
    info: &ResolveInfo,
    path: &ResponsePath,
    result: &Value,
) -> Result<&'a ObjectType, InvalidValue> {
    let schema = &ctx.schema;
    let abstract_name = abstract_type.name();
    let resolve_type = match abstract_type {
        NamedType::Interface(interface) => interface.resolve_type.as_ref(),
        NamedType::Union(union) => union.resolve_type.as_ref(),
        _ => None,
    };

    let runtime_type = match resolve_type {
        Some(resolve_type) => resolve_type(result, &ctx.context, info),
        None => schema
            .possible_types(abstract_name)
            .into_iter()
            .filter_map(|name| schema.get_object(name))
            .find(|object| {
                object
                    .is_type_of
                    .as_ref()
                    .is_some_and(|is_type_of| is_type_of(result, &ctx.context, info))
            })
            .map(|object| object.name.clone())
            .or_else(|| {
                result
                    .as_object()
                    .and_then(|object| object.get(TYPENAME))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            }),
    };

    let must_resolve = || {
        format!(
            "Abstract type \"{abstract_name}\" must resolve to an Object type at runtime for \
             field \"{}.{}\".",
            info.parent_type, info.field_name
        )
    };
    let Some(runtime_type) = runtime_type else {
        let message = format!(
            "{} Either the \"{abstract_name}\" type should provide a \"resolveType\" function \
             or each possible type should provide an \"isTypeOf\" function.",
            must_resolve()
        );
        return Err(invalid(ctx, message, path, field_nodes));
    };
    let Some(object) = schema.get_object(&runtime_type) else {
        let message = format!("{} Received \"{runtime_type}\".", must_resolve());
        return Err(invalid(ctx, message, path, field_nodes));
    };

    if !schema.is_possible_type(abstract_name, &object.name) {
        return Err(invalid(
            ctx,
            format!(
                "Runtime Object type \"{runtime_type}\" is not a possible type for \
                 \"{abstract_name}\"."
            ),
            path,
            field_nodes,
        ));
    }
    Ok(object)
}
