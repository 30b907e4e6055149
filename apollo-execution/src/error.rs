//! Execution errors.
use displaydoc::Display;
use thiserror::Error;

pub use crate::graphql::Error;
use crate::graphql::ErrorExtension;
pub use crate::resolver::FieldError;
pub use crate::spec::SpecError;

/// Error in the schema.
///
/// Raised while building a [`Schema`](crate::Schema); a schema that builds
/// successfully satisfies every structural invariant the executor relies on.
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// schema must define a query root type
    MissingQueryRoot,
    /// type '{0}' is defined more than once
    DuplicateType(String),
    /// type '{0}' is referenced but not defined
    UnknownType(String),
    /// type reference '{0}' wraps a non-null type in a non-null type
    NestedNonNull(String),
    /// '{coordinate}' must be an output type but '{ty}' is an input type
    NotAnOutputType { coordinate: String, ty: String },
    /// '{coordinate}' must be an input type but '{ty}' is not
    NotAnInputType { coordinate: String, ty: String },
    /// type '{object}' cannot implement '{interface}' which is not an interface
    NotAnInterface { object: String, interface: String },
    /// type '{object}' must define field '{field}' required by interface '{interface}'
    MissingInterfaceField {
        object: String,
        interface: String,
        field: String,
    },
    /// field '{object}.{field}' has type '{found}' which is not a valid subtype of '{expected}' required by interface '{interface}'
    InvalidInterfaceFieldType {
        object: String,
        interface: String,
        field: String,
        expected: String,
        found: String,
    },
    /// union '{name}' can only include object types but includes '{member}'
    InvalidUnionMember { name: String, member: String },
    /// union '{0}' must include at least one member type
    EmptyUnion(String),
    /// name '{0}' is reserved for introspection
    ReservedName(String),
}

impl ErrorExtension for SchemaError {
    fn extension_code(&self) -> String {
        "INVALID_SCHEMA".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_messages() {
        assert_eq!(
            SchemaError::MissingInterfaceField {
                object: "Dog".to_string(),
                interface: "Named".to_string(),
                field: "name".to_string(),
            }
            .to_string(),
            "type 'Dog' must define field 'name' required by interface 'Named'"
        );
        assert_eq!(
            SchemaError::UnknownType("Cat".to_string()).to_string(),
            "type 'Cat' is referenced but not defined"
        );
    }
}
