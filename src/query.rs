//! Path queries over child names.
use crate::{EntityId, EntityTree};

/// Returns the open tags of the entities reached by following `path` from the root.
///
/// `path` is a `/`-separated list of plain entity names, matched against the root's children first:
/// each step keeps the children of the current entities whose name equals the segment.
/// Empty segments are ignored, so `"/a//b"` is the same as `"a/b"`.
///
/// A segment that matches nothing yields an empty result, as does an empty path.
///
/// # Example
/// ```rust
/// use xmlentity::{EntityTree, query_path};
///
/// let mut tree = EntityTree::new("plano").unwrap();
/// let fuc = tree.create_entity("fuc", tree.root()).unwrap();
/// let component = tree.create_entity("componente", fuc).unwrap();
/// tree.get_mut(component).unwrap().add_attribute("peso", "60%").unwrap();
///
/// assert_eq!(query_path(&tree, "fuc/componente"), [r#"<componente peso="60%"/>"#]);
/// assert!(query_path(&tree, "fuc/missing").is_empty());
/// ```
#[must_use]
pub fn query_path(tree: &EntityTree, path: &str) -> Vec<String> {
    query_ids(tree, path)
        .into_iter()
        .filter_map(|id| tree.get(id))
        .map(crate::Entity::open_tag)
        .collect()
}

/// Like [`query_path`], but returns the handles of the matched entities.
#[must_use]
pub fn query_ids(tree: &EntityTree, path: &str) -> Vec<EntityId> {
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
    if segments.peek().is_none() {
        return vec![];
    }

    let mut candidates = vec![tree.root()];
    for segment in segments {
        candidates = candidates
            .iter()
            .filter_map(|id| tree.get(*id))
            .flat_map(|entity| entity.children().iter().copied())
            .filter(|child| tree.get(*child).is_some_and(|c| c.name() == segment))
            .collect();

        if candidates.is_empty() {
            break;
        }
    }
    candidates
}
