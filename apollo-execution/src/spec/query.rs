//! Query processing.
//!
//! Access to the operations, fragments and source locations of a parsed document.

use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::parser::SourceSpan;
use serde::Deserialize;
use serde::Serialize;

use crate::graphql::Location;
use crate::spec::Fragments;
use crate::spec::SpecError;

pub(crate) const TYPENAME: &str = "__typename";

/// The kind of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ast::OperationType> for OperationKind {
    // Spec: https://spec.graphql.org/draft/#OperationType
    fn from(operation_type: ast::OperationType) -> Self {
        match operation_type {
            ast::OperationType::Query => Self::Query,
            ast::OperationType::Mutation => Self::Mutation,
            ast::OperationType::Subscription => Self::Subscription,
        }
    }
}

/// A parsed GraphQL document, ready for execution.
///
/// The document is trusted to have passed validation: the executor does not re-check
/// field existence or argument types.
#[derive(Debug)]
pub struct Query {
    document: ast::Document,
    fragments: Fragments,
}

impl Query {
    /// Parses an executable document.
    pub fn parse(query: impl Into<String>) -> Result<Self, SpecError> {
        let document = ast::Document::parse(query.into(), "query.graphql")
            .map_err(|invalid| SpecError::ParsingError(invalid.errors.to_string()))?;
        Ok(Self::from_document(document))
    }

    /// Wraps an already parsed document.
    pub fn from_document(document: ast::Document) -> Self {
        let fragments = Fragments::from_ast(&document);
        Query {
            document,
            fragments,
        }
    }

    pub fn document(&self) -> &ast::Document {
        &self.document
    }

    pub(crate) fn fragments(&self) -> &Fragments {
        &self.fragments
    }

    fn operations(&self) -> impl Iterator<Item = &Node<ast::OperationDefinition>> {
        self.document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                ast::Definition::OperationDefinition(operation) => Some(operation),
                _ => None,
            })
    }

    /// Selects the operation to execute.
    ///
    /// Without a name, the document must contain exactly one operation.
    pub(crate) fn operation(
        &self,
        operation_name: Option<&str>,
    ) -> Result<&Node<ast::OperationDefinition>, SpecError> {
        match operation_name {
            Some(name) => self
                .operations()
                .find(|op| op.name.as_ref().is_some_and(|n| n.as_str() == name))
                .ok_or_else(|| SpecError::UnknownOperation(name.to_string())),
            None => {
                let mut operations = self.operations();
                let operation = operations.next().ok_or(SpecError::NoOperation)?;
                if operations.next().is_some() {
                    return Err(SpecError::MultipleOperations);
                }
                Ok(operation)
            }
        }
    }

    /// Source locations of a node, for error reporting.
    pub(crate) fn locations(&self, location: Option<SourceSpan>) -> Vec<Location> {
        location
            .and_then(|location| location.line_column_range(&self.document.sources))
            .map(|range| Location {
                line: range.start.line as u32,
                column: range.start.column as u32,
            })
            .into_iter()
            .collect()
    }

    /// Maximum selection nesting depth below `selection_set`, with fragments expanded.
    ///
    /// Recursive fragment spreads are not followed a second time.
    pub(crate) fn selection_depth<'q>(
        &'q self,
        selection_set: &'q [ast::Selection],
        visiting: &mut Vec<&'q str>,
    ) -> usize {
        selection_set
            .iter()
            .map(|selection| match selection {
                ast::Selection::Field(field) => {
                    if field.selection_set.is_empty() {
                        1
                    } else {
                        1 + self.selection_depth(&field.selection_set, visiting)
                    }
                }
                ast::Selection::InlineFragment(inline_fragment) => {
                    self.selection_depth(&inline_fragment.selection_set, visiting)
                }
                ast::Selection::FragmentSpread(spread) => {
                    let name = spread.fragment_name.as_str();
                    if visiting.contains(&name) {
                        return 0;
                    }
                    match self.fragments.get(name) {
                        Some(fragment) => {
                            visiting.push(name);
                            let depth = self.selection_depth(&fragment.selection_set, visiting);
                            visiting.pop();
                            depth
                        }
                        None => 0,
                    }
                }
            })
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error() {
        let err = Query::parse("{ a ").unwrap_err();
        assert!(matches!(err, SpecError::ParsingError(_)));
    }

    #[test]
    fn single_anonymous_operation() {
        let query = Query::parse("{ a }").unwrap();
        let operation = query.operation(None).unwrap();
        assert!(operation.name.is_none());
        assert_eq!(OperationKind::from(operation.operation_type), OperationKind::Query);
    }

    #[test]
    fn operation_selection() {
        let query = Query::parse("query A { a } mutation B { b }").unwrap();
        assert_eq!(query.operation(None).unwrap_err(), SpecError::MultipleOperations);
        let operation = query.operation(Some("B")).unwrap();
        assert_eq!(
            OperationKind::from(operation.operation_type),
            OperationKind::Mutation
        );
        assert_eq!(
            query.operation(Some("C")).unwrap_err(),
            SpecError::UnknownOperation("C".to_string())
        );
    }

    #[test]
    fn no_operation() {
        let query = Query::parse("fragment F on Query { a }").unwrap();
        assert_eq!(query.operation(None).unwrap_err(), SpecError::NoOperation);
        assert_eq!(query.fragments().len(), 1);
    }

    #[test]
    fn depth_follows_fragments_once() {
        let query = Query::parse(
            r#"
            { a { b { ...F } } }
            fragment F on B { c { d } ... on B { e { f { g } } } }
            "#,
        )
        .unwrap();
        let operation = query.operation(None).unwrap();
        assert_eq!(
            query.selection_depth(&operation.selection_set, &mut Vec::new()),
            5
        );

        let query = Query::parse("{ a { ...F } } fragment F on A { b { ...F } }").unwrap();
        let operation = query.operation(None).unwrap();
        assert_eq!(
            query.selection_depth(&operation.selection_set, &mut Vec::new()),
            2
        );
    }

    #[test]
    fn field_locations() {
        let query = Query::parse("{\n  hello\n}").unwrap();
        let operation = query.operation(None).unwrap();
        let ast::Selection::Field(field) = &operation.selection_set[0] else {
            panic!("expected a field");
        };
        assert_eq!(
            query.locations(field.location()),
            vec![Location { line: 2, column: 3 }]
        );
    }
}
