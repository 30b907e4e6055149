mod field_type;
mod fragments;
pub(crate) mod query;
mod selection;

use displaydoc::Display;
pub use field_type::*;
pub(crate) use fragments::*;
pub use query::OperationKind;
pub use query::Query;
pub(crate) use query::TYPENAME;
pub(crate) use selection::*;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::graphql::ErrorExtension;
use crate::json_ext::Object;

/// Request-level document errors.
///
/// These abort a request before any field executes.
#[derive(Error, Debug, Display, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SpecError {
    /// parsing error: {0}
    ParsingError(String),
    /// Must provide an operation.
    NoOperation,
    /// Must provide operation name if query contains multiple operations.
    MultipleOperations,
    /// Unknown operation named "{0}".
    UnknownOperation(String),
    /// Schema is not configured for {0}s.
    UnsupportedOperation(OperationKind),
    /// selection processing recursion limit exceeded
    RecursionLimitExceeded,
}

impl ErrorExtension for SpecError {
    fn extension_code(&self) -> String {
        match self {
            SpecError::ParsingError(_) => "PARSING_ERROR",
            SpecError::NoOperation
            | SpecError::MultipleOperations
            | SpecError::UnknownOperation(_) => "GRAPHQL_VALIDATION_FAILED",
            SpecError::UnsupportedOperation(_) => "OPERATION_NOT_SUPPORTED",
            SpecError::RecursionLimitExceeded => "RECURSION_LIMIT_EXCEEDED",
        }
        .to_string()
    }

    fn custom_extension_details(&self) -> Option<Object> {
        let mut obj = Object::new();
        match self {
            SpecError::UnknownOperation(name) => {
                obj.insert("operationName", name.clone().into());
            }
            SpecError::UnsupportedOperation(kind) => {
                obj.insert("operationKind", kind.to_string().into());
            }
            _ => (),
        }

        (!obj.is_empty()).then_some(obj)
    }
}
