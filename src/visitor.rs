//! Two-phase traversal of an entity tree.
//!
//! Every read and bulk-mutation operation of the crate is a visitor driven by [`EntityTree::accept`]
//! or [`EntityTree::accept_mut`]. The order is fixed:
//! - `enter` is called on a parent before any of its children (pre-order)
//! - `leave` is called on a parent after all of its children (post-order)
//!
//! Visitors keep state across calls, so an instance should drive a single traversal.
use crate::{Entity, EntityId, EntityTree, error::XmlResult};

/// A read-only visitor.
pub trait Visitor {
    /// Called before the children of `entity` are visited.
    fn enter(&mut self, entity: EntityRef<'_>);

    /// Called after the children of `entity` are visited.
    fn leave(&mut self, entity: EntityRef<'_>) {
        let _ = entity;
    }
}

/// A visitor that can change the tree while it is being walked.
///
/// The child list of an entity is captured before `enter` is called on it:
/// - children added to an entity during its `enter` are not visited in the same pass
/// - children freed during the pass are skipped, even if their slot is reused by a new entity
///
/// Removing entities mid-walk skips them for the rest of the pass; to visit every sibling,
/// collect removals and apply them after the walk instead (see [`crate::EntityOperator`]).
pub trait VisitorMut {
    /// Called before the children of `id` are visited.
    ///
    /// # Errors
    /// An error stops the traversal and is returned from [`EntityTree::accept_mut`].
    fn enter(&mut self, tree: &mut EntityTree, id: EntityId) -> XmlResult<()>;

    /// Called after the children of `id` are visited.
    ///
    /// # Errors
    /// An error stops the traversal and is returned from [`EntityTree::accept_mut`].
    fn leave(&mut self, tree: &mut EntityTree, id: EntityId) -> XmlResult<()> {
        let _ = (tree, id);
        Ok(())
    }
}

/// A borrowed entity together with its position in the tree.
///
/// Dereferences to [`Entity`].
#[derive(Debug, Clone, Copy)]
pub struct EntityRef<'a> {
    tree: &'a EntityTree,
    id: EntityId,
    entity: &'a Entity,
}
impl<'a> EntityRef<'a> {
    pub(crate) fn new(tree: &'a EntityTree, id: EntityId) -> Option<Self> {
        let entity = tree.get(id)?;
        Some(Self { tree, id, entity })
    }

    /// The handle of this entity.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The tree this entity belongs to.
    #[must_use]
    pub fn tree(&self) -> &'a EntityTree {
        self.tree
    }

    /// The entity itself, with the lifetime of the tree.
    #[must_use]
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    /// True if this is the root of the tree.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.entity.parent().is_none()
    }

    /// True if this is the last child of its parent. The root counts as a last child.
    #[must_use]
    pub fn is_last_child(&self) -> bool {
        match self.entity.parent().and_then(|p| self.tree.get(p)) {
            Some(parent) => parent.children().last() == Some(&self.id),
            None => true,
        }
    }

    /// Number of ancestors of this entity; 0 for the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.entity.parent();
        while let Some(id) = current {
            depth += 1;
            current = self.tree.get(id).and_then(Entity::parent);
        }
        depth
    }
}
impl std::ops::Deref for EntityRef<'_> {
    type Target = Entity;

    fn deref(&self) -> &Self::Target {
        self.entity
    }
}

enum VisitTask {
    Enter(EntityId),
    Leave(EntityId),
}

pub(crate) fn walk<V: Visitor + ?Sized>(tree: &EntityTree, start: EntityId, visitor: &mut V) {
    let mut stack = vec![VisitTask::Enter(start)];
    while let Some(task) = stack.pop() {
        match task {
            VisitTask::Enter(id) => {
                let Some(entity) = EntityRef::new(tree, id) else {
                    continue;
                };

                visitor.enter(entity);
                stack.push(VisitTask::Leave(id));
                for child in entity.entity().children().iter().rev() {
                    stack.push(VisitTask::Enter(*child));
                }
            }

            VisitTask::Leave(id) => {
                if let Some(entity) = EntityRef::new(tree, id) {
                    visitor.leave(entity);
                }
            }
        }
    }
}

pub(crate) fn walk_mut<V: VisitorMut + ?Sized>(
    tree: &mut EntityTree,
    start: EntityId,
    visitor: &mut V,
) -> XmlResult<()> {
    let mut stack = vec![VisitTask::Enter(start)];
    while let Some(task) = stack.pop() {
        match task {
            VisitTask::Enter(id) => {
                let Some(entity) = tree.get(id) else {
                    continue;
                };
                let children = entity.children().to_vec();

                visitor.enter(tree, id)?;
                stack.push(VisitTask::Leave(id));
                for child in children.into_iter().rev() {
                    stack.push(VisitTask::Enter(child));
                }
            }

            VisitTask::Leave(id) => {
                if tree.contains(id) {
                    visitor.leave(tree, id)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace(Vec<String>);
    impl Visitor for Trace {
        fn enter(&mut self, entity: EntityRef<'_>) {
            self.0.push(format!("+{}", entity.name()));
        }

        fn leave(&mut self, entity: EntityRef<'_>) {
            self.0.push(format!("-{}", entity.name()));
        }
    }

    fn sample() -> EntityTree {
        let mut tree = EntityTree::new("a").unwrap();
        let root = tree.root();
        let b = tree.create_entity("b", root).unwrap();
        tree.create_entity("c", root).unwrap();
        tree.create_entity("d", b).unwrap();
        tree
    }

    #[test]
    fn test_enter_leave_order() {
        let tree = sample();
        let mut trace = Trace::default();
        tree.accept(&mut trace);
        assert_eq!(trace.0, ["+a", "+b", "+d", "-d", "-b", "+c", "-c", "-a"]);
    }

    #[test]
    fn test_entity_ref_position() {
        let tree = sample();
        let root = EntityRef::new(&tree, tree.root()).unwrap();
        assert!(root.is_root());
        assert_eq!(root.depth(), 0);

        let c = tree.child(tree.root(), "c").unwrap();
        let c = EntityRef::new(&tree, c).unwrap();
        assert!(c.is_last_child());
        assert_eq!(c.depth(), 1);

        let b = tree.child(tree.root(), "b").unwrap();
        let d = tree.child(b, "d").unwrap();
        let b = EntityRef::new(&tree, b).unwrap();
        assert!(!b.is_last_child());
        assert_eq!(EntityRef::new(&tree, d).unwrap().depth(), 2);
    }

    struct Grow;
    impl VisitorMut for Grow {
        fn enter(&mut self, tree: &mut EntityTree, id: EntityId) -> XmlResult<()> {
            tree.create_entity("grown", id)?;
            Ok(())
        }
    }

    #[test]
    fn test_added_children_not_visited() {
        let mut tree = sample();
        tree.accept_mut(&mut Grow).unwrap();

        // 4 entities before the walk, one new child each
        assert_eq!(tree.len(), 8);
        let grown = tree.entities(|e| e.name() == "grown");
        assert_eq!(grown.len(), 4);
        for id in grown {
            assert!(tree.get(id).unwrap().children().is_empty());
        }
    }

    /// Removes `c` and adds `n` under the root while entering `b`.
    #[derive(Default)]
    struct Swap(Vec<String>);
    impl VisitorMut for Swap {
        fn enter(&mut self, tree: &mut EntityTree, id: EntityId) -> XmlResult<()> {
            let name = tree.get(id).map(|e| e.name().to_string()).unwrap_or_default();
            if name == "b" {
                let root = tree.root();
                if let Some(c) = tree.child(root, "c") {
                    tree.remove_entity(c)?;
                }
                tree.create_entity("n", root)?;
            }
            self.0.push(name);
            Ok(())
        }
    }

    #[test]
    fn test_remove_then_add_in_one_walk() {
        let mut tree = EntityTree::new("a").unwrap();
        let root = tree.root();
        tree.create_entity("b", root).unwrap();
        tree.create_entity("c", root).unwrap();

        let mut swap = Swap::default();
        tree.accept_mut(&mut swap).unwrap();

        // `n` takes the slot of `c`, but is still new to this walk
        assert_eq!(swap.0, ["a", "b"]);
        assert_eq!(tree.to_tree(), "a\n├── b\n└── n");
    }
}
