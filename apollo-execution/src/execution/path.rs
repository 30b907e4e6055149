use std::sync::Arc;

use crate::json_ext::Path;
use crate::json_ext::PathElement;

/// Path of a value in the response being built.
///
/// Sibling fields and list items share their parent prefix instead of copying it.
#[derive(Clone, Debug, Default)]
pub(crate) struct ResponsePath(Option<Arc<Segment>>);

#[derive(Debug)]
struct Segment {
    parent: ResponsePath,
    element: PathElement,
}

impl ResponsePath {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    fn push(&self, element: PathElement) -> Self {
        ResponsePath(Some(Arc::new(Segment {
            parent: self.clone(),
            element,
        })))
    }

    pub(crate) fn key(&self, key: &str) -> Self {
        self.push(PathElement::Key(key.to_string()))
    }

    pub(crate) fn index(&self, index: usize) -> Self {
        self.push(PathElement::Index(index))
    }

    pub(crate) fn to_path(&self) -> Path {
        let mut elements = Vec::new();
        let mut current = &self.0;
        while let Some(segment) = current {
            elements.push(segment.element.clone());
            current = &segment.parent.0;
        }
        elements.into_iter().rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_prefixes() {
        let pets = ResponsePath::root().key("pets");
        let first = pets.index(0).key("name");
        let second = pets.index(1).key("name");
        assert_eq!(first.to_path(), Path::from("pets/0/name"));
        assert_eq!(second.to_path(), Path::from("pets/1/name"));
        assert_eq!(pets.to_path().to_string(), "/pets");
        assert!(ResponsePath::root().to_path().is_empty());
    }
}
