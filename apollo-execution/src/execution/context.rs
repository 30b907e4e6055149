use std::sync::Arc;

use apollo_compiler::Node;
use apollo_compiler::ast;
use parking_lot::Mutex;

use crate::Configuration;
use crate::Context;
use crate::Schema;
use crate::execution::path::ResponsePath;
use crate::graphql::Error;
use crate::graphql::Location;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::spec::OperationKind;
use crate::spec::Query;

/// State shared by every field of one request.
///
/// Everything but the error list is read-only once execution starts.
pub(crate) struct ExecutionContext {
    pub(crate) schema: Arc<Schema>,
    pub(crate) configuration: Arc<Configuration>,
    pub(crate) query: Arc<Query>,
    pub(crate) operation: Node<ast::OperationDefinition>,
    pub(crate) operation_kind: OperationKind,
    pub(crate) root_value: Arc<Value>,
    pub(crate) context: Context,
    pub(crate) variables: Arc<Object>,
    errors: Mutex<Vec<Error>>,
}

impl ExecutionContext {
    pub(crate) fn new(
        schema: Arc<Schema>,
        configuration: Arc<Configuration>,
        query: Arc<Query>,
        operation: Node<ast::OperationDefinition>,
        root_value: Value,
        context: Context,
        variables: Object,
    ) -> Self {
        let operation_kind = operation.operation_type.into();
        Self {
            schema,
            configuration,
            query,
            operation,
            operation_kind,
            root_value: Arc::new(root_value),
            context,
            variables: Arc::new(variables),
            errors: Mutex::new(Vec::new()),
        }
    }

    /// Source locations of the field nodes merged under one response key.
    pub(crate) fn locations(&self, field_nodes: &[&Node<ast::Field>]) -> Vec<Location> {
        field_nodes
            .iter()
            .flat_map(|node| self.query.locations(node.location()))
            .collect()
    }

    pub(crate) fn push_error(&self, error: Error) {
        self.errors.lock().push(error);
    }

    /// Records an error raised while executing the field at `path`.
    pub(crate) fn field_error(
        &self,
        message: impl Into<String>,
        path: &ResponsePath,
        field_nodes: &[&Node<ast::Field>],
    ) {
        let message = message.into();
        tracing::debug!(%message, path = %path.to_path(), "field error");
        self.push_error(
            Error::builder()
                .message(message)
                .path(path.to_path())
                .locations(self.locations(field_nodes))
                .build(),
        );
    }

    pub(crate) fn into_errors(self) -> Vec<Error> {
        self.errors.into_inner()
    }
}
