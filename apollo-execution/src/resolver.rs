//! The resolver seam between the executor and user code.

use std::future::Future;
use std::sync::Arc;

use derivative::Derivative;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json_bytes::ByteString;
use thiserror::Error;

use crate::Context;
use crate::Schema;
use crate::graphql;
use crate::graphql::Location;
use crate::json_ext::Object;
use crate::json_ext::Path;
use crate::json_ext::Value;
use crate::spec::FieldType;
use crate::spec::OperationKind;

/// Everything a resolver receives for one field of one object.
#[derive(Debug)]
pub struct ResolverParams {
    /// The parent value the field is resolved on.
    pub source: Value,
    /// Coerced arguments, by argument name.
    pub args: Object,
    /// The per-request context value.
    pub context: Context,
    /// Execution state for this field.
    pub info: ResolveInfo,
}

/// Execution state handed to resolvers and type resolution callables.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ResolveInfo {
    pub field_name: String,
    pub response_key: String,
    pub parent_type: String,
    pub return_type: FieldType,
    pub path: Path,
    #[derivative(Debug = "ignore")]
    pub schema: Arc<Schema>,
    #[derivative(Debug = "ignore")]
    pub root_value: Arc<Value>,
    pub variables: Arc<Object>,
    pub operation_kind: OperationKind,
}

/// The outcome of a resolver: either available right away or still pending.
///
/// Pending values are awaited at the end of the selection set or list they belong to,
/// without holding back the resolution of their siblings.
pub enum ResolvedValue {
    Ready(Result<Value, FieldError>),
    Pending(BoxFuture<'static, Result<Value, FieldError>>),
}

impl ResolvedValue {
    pub fn ready(value: impl Into<Value>) -> Self {
        ResolvedValue::Ready(Ok(value.into()))
    }

    pub fn error(error: impl Into<FieldError>) -> Self {
        ResolvedValue::Ready(Err(error.into()))
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value, FieldError>> + Send + 'static,
    {
        ResolvedValue::Pending(future.boxed())
    }

    pub(crate) async fn into_result(self) -> Result<Value, FieldError> {
        match self {
            ResolvedValue::Ready(result) => result,
            ResolvedValue::Pending(future) => future.await,
        }
    }
}

impl std::fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedValue::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            ResolvedValue::Pending(_) => f.write_str("Pending"),
        }
    }
}

impl From<Value> for ResolvedValue {
    fn from(value: Value) -> Self {
        ResolvedValue::Ready(Ok(value))
    }
}

impl From<Result<Value, FieldError>> for ResolvedValue {
    fn from(result: Result<Value, FieldError>) -> Self {
        ResolvedValue::Ready(result)
    }
}

impl From<FieldError> for ResolvedValue {
    fn from(error: FieldError) -> Self {
        ResolvedValue::Ready(Err(error))
    }
}

/// Resolves the value of a field.
///
/// Fields without a resolver read the property named after the field on their parent
/// value.
pub trait Resolver: Send + Sync + 'static {
    fn resolve(&self, params: ResolverParams) -> ResolvedValue;
}

impl<F, R> Resolver for F
where
    F: Fn(ResolverParams) -> R + Send + Sync + 'static,
    R: Into<ResolvedValue>,
{
    fn resolve(&self, params: ResolverParams) -> ResolvedValue {
        self(params).into()
    }
}

/// Decides whether a value belongs to an object type.
pub type IsTypeOf = Arc<dyn Fn(&Value, &Context, &ResolveInfo) -> bool + Send + Sync>;

/// Names the concrete object type of a value of an abstract type.
pub type ResolveType = Arc<dyn Fn(&Value, &Context, &ResolveInfo) -> Option<String> + Send + Sync>;

/// An error returned by a resolver.
///
/// It ends up in the response `errors`, tagged with the path and locations of the field.
#[derive(Clone, Debug, PartialEq, Eq, Error, Default)]
#[error("{message}")]
pub struct FieldError {
    pub message: String,
    pub extensions: Object,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: Object::new(),
        }
    }

    /// Adds an entry to the error extensions.
    pub fn extension(mut self, key: impl Into<ByteString>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub(crate) fn into_graphql_error(self, path: Path, locations: Vec<Location>) -> graphql::Error {
        graphql::Error::builder()
            .message(self.message)
            .path(path)
            .locations(locations)
            .extensions(self.extensions)
            .build()
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        FieldError::new(message)
    }
}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        FieldError::new(message)
    }
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::json;

    use super::*;

    #[tokio::test]
    async fn ready_and_pending_values() {
        assert_eq!(
            ResolvedValue::ready("a").into_result().await,
            Ok(json!("a"))
        );
        assert_eq!(
            ResolvedValue::pending(async { Ok(json!(1)) }).into_result().await,
            Ok(json!(1))
        );
        assert_eq!(
            ResolvedValue::error("boom").into_result().await,
            Err(FieldError::new("boom"))
        );
    }

    #[test]
    fn field_error_to_graphql_error() {
        let error = FieldError::new("boom")
            .extension("code", "BOOM")
            .into_graphql_error(Path::from("a/0"), vec![Location { line: 1, column: 3 }]);
        assert_eq!(
            serde_json_bytes::to_value(&error).unwrap(),
            json!({
                "message": "boom",
                "locations": [{ "line": 1, "column": 3 }],
                "path": ["a", 0],
                "extensions": { "code": "BOOM" }
            })
        );
    }
}
