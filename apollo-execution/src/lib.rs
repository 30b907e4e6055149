//! GraphQL operation execution.
//!
//! Runs an already parsed (and validated) operation against a resolver-backed [`Schema`]
//! and a root value, producing a [`graphql::Response`] with partial data and an isolated
//! list of field errors.
//!
//! ```ignore
//! let schema = Arc::new(Schema::builder().query(query_type).build()?);
//! let query = Arc::new(Query::parse("{ hello }")?);
//! let response = Executor::new(schema)
//!     .execute(ExecutionRequest::builder().query(query).build())
//!     .await;
//! ```

#![cfg_attr(feature = "failfast", allow(unreachable_code))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

macro_rules! failfast_debug {
    ($($tokens:tt)+) => {{
        tracing::debug!($($tokens)+);
        #[cfg(feature = "failfast")]
        panic!(
            "failfast triggered. \
            Please remove the feature failfast if you don't want to see these panics"
        );
    }};
}

pub mod configuration;
mod context;
pub mod error;
mod execution;
pub mod graphql;
mod introspection;
pub mod json_ext;
mod resolver;
pub mod schema;
mod spec;

pub use configuration::Configuration;
pub use context::Context;
pub use execution::ExecutionRequest;
pub use execution::Executor;
pub use resolver::FieldError;
pub use resolver::IsTypeOf;
pub use resolver::ResolveInfo;
pub use resolver::ResolveType;
pub use resolver::ResolvedValue;
pub use resolver::Resolver;
pub use resolver::ResolverParams;
pub use schema::Schema;
pub use spec::FieldType;
pub use spec::OperationKind;
pub use spec::Query;
pub use spec::SpecError;
