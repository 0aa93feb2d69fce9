//! The entity tree: a root entity and every entity below it.
use crate::{
    Entity, EntityArena, EntityId,
    error::{XmlErrorKind, XmlResult},
    operator::EntityCollector,
    visitor::{self, Visitor, VisitorMut},
};

/// A tree of entities with a single root.
///
/// The tree owns every entity through an [`EntityArena`]; entities point at their parent and children by [`EntityId`].
/// For every entity other than the root, the parent's child list contains the entity exactly once.
///
/// # Example
/// ```rust
/// use xmlentity::EntityTree;
///
/// let mut tree = EntityTree::new("a").unwrap();
/// let b = tree.create_entity("b", tree.root()).unwrap();
/// tree.create_entity("c", tree.root()).unwrap();
/// tree.create_entity("d", b).unwrap();
///
/// assert_eq!(tree.to_tree(), "a\n├── b\n│   └── d\n└── c");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTree {
    arena: EntityArena,
    root: EntityId,
}
impl EntityTree {
    /// Creates a tree holding only a root entity with the given name.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidName`] if the name is not valid.
    pub fn new(root_name: &str) -> XmlResult<Self> {
        let root = Entity::new(root_name, None)?;
        let mut arena = EntityArena::new();
        let root = arena.alloc(root);
        Ok(Self { arena, root })
    }

    /// The handle of the root entity.
    #[must_use]
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Returns the entity for a handle, if it is part of this tree.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.arena.get(id)
    }

    /// Returns the entity for a handle, if it is part of this tree.
    ///
    /// Through the returned reference the entity can be renamed and its attributes and text changed.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.arena.get_mut(id)
    }

    /// Returns true if the handle refers to an entity of this tree.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.arena.contains(id)
    }

    /// Number of entities in the tree, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// A tree always has a root, so it is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    fn require(&self, id: EntityId) -> XmlResult<&Entity> {
        self.get(id)
            .ok_or_else(|| XmlErrorKind::UnknownEntity(id).into())
    }

    fn require_mut(&mut self, id: EntityId) -> XmlResult<&mut Entity> {
        self.get_mut(id)
            .ok_or_else(|| XmlErrorKind::UnknownEntity(id).into())
    }

    /// Creates a new entity as the last child of `parent`.
    ///
    /// # Errors
    /// - [`XmlErrorKind::InvalidName`] if the name is not valid
    /// - [`XmlErrorKind::UnknownEntity`] if `parent` is not part of this tree
    ///
    /// Nothing is allocated on error.
    pub fn create_entity(&mut self, name: &str, parent: EntityId) -> XmlResult<EntityId> {
        self.require(parent)?;
        let entity = Entity::new(name, Some(parent))?;

        let id = self.arena.alloc(entity);
        self.require_mut(parent)?.push_child(id);
        Ok(id)
    }

    /// Detaches an entity from its parent and drops it, along with everything below it.
    ///
    /// # Errors
    /// - [`XmlErrorKind::RootRemoval`] if `id` is the root
    /// - [`XmlErrorKind::UnknownEntity`] if `id` is not part of this tree
    pub fn remove_entity(&mut self, id: EntityId) -> XmlResult<()> {
        if id == self.root {
            return Err(XmlErrorKind::RootRemoval.into());
        }

        let parent = self.require(id)?.parent();
        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.unlink_child(id);
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(mut entity) = self.arena.free(next) {
                pending.extend(entity.take_children());
            }
        }
        Ok(())
    }

    /// Moves an entity, with its subtree, to the end of the child list of `new_parent`.
    ///
    /// # Errors
    /// - [`XmlErrorKind::UnknownEntity`] if either handle is not part of this tree
    /// - [`XmlErrorKind::InvalidReparent`] if `id` is the root, or `new_parent` is `id` or below it
    pub fn reparent(&mut self, id: EntityId, new_parent: EntityId) -> XmlResult<()> {
        self.require(new_parent)?;
        let old_parent = self.require(id)?.parent();

        let Some(old_parent) = old_parent else {
            return Err(XmlErrorKind::InvalidReparent {
                entity: id,
                parent: new_parent,
            }
            .into());
        };
        if self.is_ancestor_or_self(id, new_parent) {
            return Err(XmlErrorKind::InvalidReparent {
                entity: id,
                parent: new_parent,
            }
            .into());
        }

        self.require_mut(old_parent)?.unlink_child(id);
        self.require_mut(new_parent)?.push_child(id);
        self.require_mut(id)?.set_parent(Some(new_parent));
        Ok(())
    }

    /// True if `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(next) = current {
            if next == ancestor {
                return true;
            }
            current = self.get(next).and_then(Entity::parent);
        }
        false
    }

    /// Copies every entity of `other` below `parent`, keeping their order.
    /// Returns the handle of the copied root.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::UnknownEntity`] if `parent` is not part of this tree.
    pub fn graft(&mut self, parent: EntityId, other: &EntityTree) -> XmlResult<EntityId> {
        self.require(parent)?;

        let mut copied_root = None;
        let mut pending = vec![(other.root, parent)];
        while let Some((source, target)) = pending.pop() {
            let Some(entity) = other.get(source) else {
                continue;
            };

            let id = self.arena.alloc(entity.shallow_copy(Some(target)));
            self.require_mut(target)?.push_child(id);
            copied_root.get_or_insert(id);

            for child in entity.children().iter().rev() {
                pending.push((*child, id));
            }
        }

        copied_root.ok_or_else(|| XmlErrorKind::UnknownEntity(other.root).into())
    }

    /// Returns the first direct child of `id` with the given name.
    #[must_use]
    pub fn child(&self, id: EntityId, name: &str) -> Option<EntityId> {
        self.get(id)?
            .children()
            .iter()
            .copied()
            .find(|c| self.get(*c).is_some_and(|e| e.name() == name))
    }

    /// Returns every entity matching `predicate`, in document order.
    pub fn entities<F>(&self, predicate: F) -> Vec<EntityId>
    where
        F: FnMut(&Entity) -> bool,
    {
        let mut collector = EntityCollector::new(predicate);
        self.accept(&mut collector);
        collector.into_matches()
    }

    /// Returns every entity with the given name, in document order.
    #[must_use]
    pub fn entities_named(&self, name: &str) -> Vec<EntityId> {
        self.entities(|e| e.name() == name)
    }

    /// Walks the whole tree with a read-only visitor.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor::walk(self, self.root, visitor);
    }

    /// Walks the subtree below `id` (inclusive) with a read-only visitor.
    /// Does nothing if `id` is not part of this tree.
    pub fn accept_from<V: Visitor + ?Sized>(&self, id: EntityId, visitor: &mut V) {
        visitor::walk(self, id, visitor);
    }

    /// Walks the whole tree with a mutating visitor.
    ///
    /// # Errors
    /// Returns the first error raised by the visitor; the walk stops there.
    pub fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) -> XmlResult<()> {
        let root = self.root;
        visitor::walk_mut(self, root, visitor)
    }

    /// Returns the open tags of the entities reached by a `/`-separated path of child names.
    ///
    /// See [`crate::query_path`].
    #[must_use]
    pub fn query(&self, path: &str) -> Vec<String> {
        crate::query::query_path(self, path)
    }

    /// Renders the tree as an indented outline of entity names.
    ///
    /// See [`crate::TreePrinter`].
    #[must_use]
    pub fn to_tree(&self) -> String {
        let mut printer = crate::TreePrinter::default();
        self.accept(&mut printer);
        printer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_entity_links_parent() {
        let mut tree = EntityTree::new("a").unwrap();
        let b = tree.create_entity("b", tree.root()).unwrap();

        assert_eq!(tree.get(b).unwrap().parent(), Some(tree.root()));
        assert_eq!(tree.get(tree.root()).unwrap().children(), &[b]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_create_entity_invalid() {
        let mut tree = EntityTree::new("a").unwrap();
        let err = tree.create_entity("b c", tree.root()).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::InvalidName(_)));
        assert_eq!(tree.len(), 1);
        assert!(tree.get(tree.root()).unwrap().children().is_empty());

        assert!(EntityTree::new("1root").is_err());
    }

    #[test]
    fn test_create_entity_unknown_parent() {
        let mut tree = EntityTree::new("a").unwrap();
        let b = tree.create_entity("b", tree.root()).unwrap();
        tree.remove_entity(b).unwrap();

        let err = tree.create_entity("c", b).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::UnknownEntity(_)));
    }

    #[test]
    fn test_remove_entity_drops_subtree() {
        let mut tree = EntityTree::new("a").unwrap();
        let b = tree.create_entity("b", tree.root()).unwrap();
        let c = tree.create_entity("c", tree.root()).unwrap();
        let d = tree.create_entity("d", b).unwrap();

        tree.remove_entity(b).unwrap();
        assert!(!tree.contains(b));
        assert!(!tree.contains(d));
        assert_eq!(tree.get(tree.root()).unwrap().children(), &[c]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_remove_root() {
        let mut tree = EntityTree::new("a").unwrap();
        let err = tree.remove_entity(tree.root()).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::RootRemoval));
    }

    #[test]
    fn test_reparent() {
        let mut tree = EntityTree::new("a").unwrap();
        let b = tree.create_entity("b", tree.root()).unwrap();
        let c = tree.create_entity("c", tree.root()).unwrap();
        let d = tree.create_entity("d", b).unwrap();

        tree.reparent(d, c).unwrap();
        assert!(tree.get(b).unwrap().children().is_empty());
        assert_eq!(tree.get(c).unwrap().children(), &[d]);
        assert_eq!(tree.get(d).unwrap().parent(), Some(c));
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let mut tree = EntityTree::new("a").unwrap();
        let b = tree.create_entity("b", tree.root()).unwrap();
        let d = tree.create_entity("d", b).unwrap();

        assert!(tree.reparent(b, d).is_err());
        assert!(tree.reparent(b, b).is_err());
        assert!(tree.reparent(tree.root(), b).is_err());
        assert_eq!(tree.get(d).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_graft() {
        let mut other = EntityTree::new("x").unwrap();
        let y = other.create_entity("y", other.root()).unwrap();
        other.get_mut(y).unwrap().add_attribute("k", "a&b").unwrap();
        other.create_entity("z", other.root()).unwrap();

        let mut tree = EntityTree::new("a").unwrap();
        let x = tree.graft(tree.root(), &other).unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.get(x).unwrap().parent(), Some(tree.root()));
        let y = tree.child(x, "y").unwrap();
        assert_eq!(tree.get(y).unwrap().attribute("k"), Some("a&amp;b"));
        assert_eq!(tree.to_tree(), "a\n└── x\n    ├── y\n    └── z");
    }

    #[test]
    fn test_entities() {
        let mut tree = EntityTree::new("a").unwrap();
        let b = tree.create_entity("b", tree.root()).unwrap();
        let b2 = tree.create_entity("b", b).unwrap();
        tree.create_entity("c", tree.root()).unwrap();

        assert_eq!(tree.entities_named("b"), vec![b, b2]);
        assert_eq!(tree.entities(|_| true).len(), 4);
        assert_eq!(tree.child(tree.root(), "b"), Some(b));
        assert_eq!(tree.child(tree.root(), "zz"), None);
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut tree = EntityTree::new("a").unwrap();
        let root = tree.root();
        let b = tree.create_entity("b", root).unwrap();
        tree.remove_entity(b).unwrap();
        let z = tree.create_entity("z", root).unwrap();

        assert_eq!(b.index(), z.index());
        assert!(tree.get(b).is_none());
        assert!(!tree.contains(b));

        let err = tree.remove_entity(b).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::UnknownEntity(_)));
        assert_eq!(tree.to_tree(), "a\n└── z");
    }
}
