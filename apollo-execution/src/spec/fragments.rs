use std::collections::HashMap;

use apollo_compiler::Node;
use apollo_compiler::ast;

/// Fragment definitions of a document, by name.
#[derive(Debug, Default)]
pub(crate) struct Fragments {
    map: HashMap<String, Node<ast::FragmentDefinition>>,
}

impl Fragments {
    pub(crate) fn from_ast(document: &ast::Document) -> Self {
        let map = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                // Spec: https://spec.graphql.org/draft/#FragmentDefinition
                ast::Definition::FragmentDefinition(fragment) => {
                    Some((fragment.name.as_str().to_string(), fragment.clone()))
                }
                _ => None,
            })
            .collect();
        Fragments { map }
    }

    pub(crate) fn get(&self, key: impl AsRef<str>) -> Option<&Node<ast::FragmentDefinition>> {
        self.map.get(key.as_ref())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}
