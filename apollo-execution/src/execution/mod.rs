//! Operation execution.

mod arguments;
mod collect;
mod complete;
mod context;
mod field;
mod path;
mod variables;

use std::collections::HashSet;
use std::sync::Arc;

use serde_json_bytes::ByteString;
use serde_json_bytes::Map as JsonMap;

use crate::Configuration;
use crate::Context;
use crate::Schema;
use crate::execution::collect::FieldsByKey;
use crate::execution::collect::collect_fields;
use crate::execution::context::ExecutionContext;
use crate::execution::field::execute_fields;
use crate::execution::field::execute_fields_serially;
use crate::execution::path::ResponsePath;
use crate::execution::variables::coerce_variable_values;
use crate::graphql::IntoGraphQLError;
use crate::graphql::Response;
use crate::json_ext::Value;
use crate::spec::OperationKind;
use crate::spec::Query;
use crate::spec::SpecError;

/// Marks a value that could not be completed.
///
/// The error behind it is already recorded; the value is replaced by null at the closest
/// nullable position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct InvalidValue;

/// One operation to run.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct ExecutionRequest {
    pub query: Arc<Query>,
    pub operation_name: Option<String>,
    pub variables: JsonMap<ByteString, Value>,
    pub root_value: Value,
    pub context: Context,
}

#[buildstructor::buildstructor]
impl ExecutionRequest {
    /// Returns a builder for an [`ExecutionRequest`].
    ///
    /// Only `query` is required: without variables, root value or context, empty ones
    /// are used.
    #[builder(visibility = "pub")]
    fn new(
        query: Arc<Query>,
        operation_name: Option<String>,
        // Skip the `Object` type alias in order to use buildstructor's map special-casing
        variables: JsonMap<ByteString, Value>,
        root_value: Option<Value>,
        context: Option<Context>,
    ) -> Self {
        Self {
            query,
            operation_name,
            variables,
            root_value: root_value.unwrap_or(Value::Null),
            context: context.unwrap_or_default(),
        }
    }
}

/// Executes operations against a [`Schema`].
#[derive(Clone, Debug)]
pub struct Executor {
    schema: Arc<Schema>,
    configuration: Arc<Configuration>,
}

impl Executor {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            configuration: Default::default(),
        }
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Arc::new(configuration);
        self
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Runs one operation.
    ///
    /// Request-level failures (unknown operation, invalid variables, ...) produce a
    /// response without `data`. Field errors never do: they end up in `errors` next to
    /// partial data, which is null only when a non null field failed at the root.
    #[tracing::instrument(
        skip_all,
        level = "debug",
        name = "execute",
        fields(
            operation.name = request.operation_name.as_deref().unwrap_or_default(),
            operation.kind = tracing::field::Empty,
        )
    )]
    pub async fn execute(&self, request: ExecutionRequest) -> Response {
        let ExecutionRequest {
            query,
            operation_name,
            variables,
            root_value,
            context,
        } = request;

        let operation = match query.operation(operation_name.as_deref()) {
            Ok(operation) => operation.clone(),
            Err(err) => return Response::from_errors(vec![err.to_graphql_error()]),
        };
        let kind = OperationKind::from(operation.operation_type);
        tracing::Span::current().record("operation.kind", kind.as_str());

        let Some(root_type) = self.schema.root_type(kind) else {
            return Response::from_errors(vec![
                SpecError::UnsupportedOperation(kind).to_graphql_error(),
            ]);
        };

        let depth = query.selection_depth(&operation.selection_set, &mut Vec::new());
        if depth > self.configuration.limits.max_depth {
            tracing::debug!(depth, "selection depth limit exceeded");
            return Response::from_errors(vec![SpecError::RecursionLimitExceeded.to_graphql_error()]);
        }

        let variables =
            match coerce_variable_values(&self.schema, &query, &operation.variables, &variables) {
                Ok(variables) => variables,
                Err(errors) => return Response::from_errors(errors),
            };

        let ctx = ExecutionContext::new(
            self.schema.clone(),
            self.configuration.clone(),
            query,
            operation,
            root_value,
            context,
            variables,
        );

        let data = {
            let mut fields = FieldsByKey::new();
            collect_fields(
                &ctx,
                root_type,
                &ctx.operation.selection_set,
                &mut fields,
                &mut HashSet::new(),
            );
            let root_value = &ctx.root_value;
            let path = ResponsePath::root();
            let result = match kind {
                OperationKind::Mutation => {
                    execute_fields_serially(&ctx, root_type, root_value, &path, &fields).await
                }
                // A subscription executes as a query against its first event.
                OperationKind::Query | OperationKind::Subscription => {
                    execute_fields(&ctx, root_type, root_value, &path, &fields).await
                }
            };
            result.unwrap_or(Value::Null)
        };

        Response::builder()
            .data(data)
            .errors(ctx.into_errors())
            .build()
    }
}
