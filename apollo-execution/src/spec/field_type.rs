use apollo_compiler::ast;
use serde::Deserialize;
use serde::Serialize;

/// A reference to a type, as found on fields, arguments and variables.
///
/// Wrapping kinds recurse structurally: `[Pet!]!` is
/// `NonNull(List(NonNull(Named("Pet"))))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Named type {0}
    Named(String),
    /// List type {0}
    List(Box<FieldType>),
    /// Non null type {0}
    NonNull(Box<FieldType>),
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Named(ty) => write!(f, "{ty}"),
            FieldType::List(ty) => write!(f, "[{ty}]"),
            FieldType::NonNull(ty) => write!(f, "{ty}!"),
        }
    }
}

impl FieldType {
    pub fn named(name: impl Into<String>) -> Self {
        FieldType::Named(name.into())
    }

    pub fn list(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    pub fn non_null(inner: FieldType) -> Self {
        FieldType::NonNull(Box::new(inner))
    }

    /// Wraps this type in a list.
    pub fn into_list(self) -> Self {
        Self::list(self)
    }

    /// Wraps this type in a non null.
    pub fn into_non_null(self) -> Self {
        Self::non_null(self)
    }

    /// return the name of the type on which selections happen
    ///
    /// Example if we get the field `list: [User!]!`, it will return "User"
    pub fn inner_type_name(&self) -> &str {
        match self {
            FieldType::Named(name) => name.as_str(),
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.inner_type_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, FieldType::NonNull(_))
    }

    /// The type with its outermost non null layer removed.
    pub fn nullable(&self) -> &FieldType {
        match self {
            FieldType::NonNull(inner) => inner,
            _ => self,
        }
    }

    /// Returns whether a non null directly wraps another non null anywhere in this reference.
    pub(crate) fn has_nested_non_null(&self) -> bool {
        match self {
            FieldType::Named(_) => false,
            FieldType::NonNull(inner) => inner.is_non_null() || inner.has_nested_non_null(),
            FieldType::List(inner) => inner.has_nested_non_null(),
        }
    }
}

impl From<&'_ ast::Type> for FieldType {
    // Spec: https://spec.graphql.org/draft/#sec-Type-References
    fn from(ty: &'_ ast::Type) -> Self {
        match ty {
            ast::Type::Named(name) => Self::Named(name.as_str().to_string()),
            ast::Type::NonNullNamed(name) => Self::non_null(Self::Named(name.as_str().to_string())),
            ast::Type::List(inner) => Self::list((&**inner).into()),
            ast::Type::NonNullList(inner) => Self::non_null(Self::list((&**inner).into())),
        }
    }
}
