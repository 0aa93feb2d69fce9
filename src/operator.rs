//! Predicate-driven bulk operations over an entity tree.
//!
//! Each operator is a visitor carrying one tagged operation and a selection predicate.
//! The predicate receives the [`Entity::full_name`] of each entity at the time it is visited,
//! so it can select on the name and on the current attributes:
//!
//! ```rust
//! use xmlentity::{EntityOperator, EntityTree};
//!
//! let mut tree = EntityTree::new("plan").unwrap();
//! let fuc = tree.create_entity("fuc", tree.root()).unwrap();
//! tree.get_mut(fuc).unwrap().add_attribute("codigo", "M4310").unwrap();
//!
//! let mut operator = EntityOperator::add("avaliacao", |name: &str| name.contains("M4310")).unwrap();
//! tree.accept_mut(&mut operator).unwrap();
//! assert_eq!(operator.finalize(&mut tree).unwrap(), 1);
//! assert!(tree.child(fuc, "avaliacao").is_some());
//! ```
use crate::{
    Entity, EntityId, EntityTree,
    error::{XmlErrorKind, XmlResult},
    node::validate_name,
    visitor::{EntityRef, Visitor, VisitorMut},
};
use tracing::{trace, warn};

/// Collects the handles of the entities matching a predicate, in document order.
pub struct EntityCollector<F> {
    predicate: F,
    matches: Vec<EntityId>,
}
impl<F> EntityCollector<F>
where
    F: FnMut(&Entity) -> bool,
{
    /// Create a collector for the given predicate.
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            matches: vec![],
        }
    }

    /// The matches collected so far.
    pub fn matches(&self) -> &[EntityId] {
        &self.matches
    }

    /// Consume the collector, returning its matches.
    pub fn into_matches(self) -> Vec<EntityId> {
        self.matches
    }
}
impl<F> Visitor for EntityCollector<F>
where
    F: FnMut(&Entity) -> bool,
{
    fn enter(&mut self, entity: EntityRef<'_>) {
        if (self.predicate)(entity.entity()) {
            self.matches.push(entity.id());
        }
    }
}

/// A structural change applied to every matching entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityOperation {
    /// Append a new child with this name
    Add(String),

    /// Replace the name of the entity
    Rename(String),

    /// Detach the entity, and everything below it
    Remove,
}

/// Applies an [`EntityOperation`] to every entity whose full name matches the predicate.
///
/// - `Add` and `Rename` happen as each entity is entered. Children added this way are not visited in the same pass.
/// - `Remove` only records matches during the walk; [`EntityOperator::finalize`] detaches them afterwards,
///   so siblings of a removed entity are still visited in order.
///
/// The root is never removed; a root match is skipped with a warning.
pub struct EntityOperator<F> {
    operation: EntityOperation,
    predicate: F,
    pending: Vec<EntityId>,
    applied: usize,
}
impl<F> EntityOperator<F>
where
    F: FnMut(&str) -> bool,
{
    fn new(operation: EntityOperation, predicate: F) -> Self {
        Self {
            operation,
            predicate,
            pending: vec![],
            applied: 0,
        }
    }

    /// Adds a child named `name` to every match.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidName`] if the name is not valid.
    pub fn add(name: &str, predicate: F) -> XmlResult<Self> {
        validate_name(name)?;
        Ok(Self::new(EntityOperation::Add(name.to_string()), predicate))
    }

    /// Renames every match to `name`.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidName`] if the name is not valid.
    pub fn rename(name: &str, predicate: F) -> XmlResult<Self> {
        validate_name(name)?;
        Ok(Self::new(EntityOperation::Rename(name.to_string()), predicate))
    }

    /// Removes every match once [`EntityOperator::finalize`] is called.
    pub fn remove(predicate: F) -> Self {
        Self::new(EntityOperation::Remove, predicate)
    }

    /// The operation this operator applies.
    pub fn operation(&self) -> &EntityOperation {
        &self.operation
    }

    /// Entities waiting to be detached by [`EntityOperator::finalize`].
    pub fn pending(&self) -> &[EntityId] {
        &self.pending
    }

    /// Completes the operation, and returns the number of entities affected.
    ///
    /// For `Remove`, this detaches every recorded entity from its parent.
    /// Entities already dropped with a removed ancestor are skipped, so each entity is detached at most once.
    ///
    /// # Errors
    /// Fails if a recorded entity cannot be detached.
    pub fn finalize(mut self, tree: &mut EntityTree) -> XmlResult<usize> {
        for id in std::mem::take(&mut self.pending) {
            if tree.contains(id) {
                tree.remove_entity(id)?;
                self.applied += 1;
            }
        }
        Ok(self.applied)
    }
}
impl<F> VisitorMut for EntityOperator<F>
where
    F: FnMut(&str) -> bool,
{
    fn enter(&mut self, tree: &mut EntityTree, id: EntityId) -> XmlResult<()> {
        let Some(entity) = tree.get(id) else {
            return Ok(());
        };
        if !(self.predicate)(&entity.full_name()) {
            return Ok(());
        }

        trace!(entity = %id, operation = ?self.operation, "entity matched");
        match &self.operation {
            EntityOperation::Add(name) => {
                tree.create_entity(name, id)?;
                self.applied += 1;
            }

            EntityOperation::Rename(name) => {
                let entity = tree
                    .get_mut(id)
                    .ok_or(XmlErrorKind::UnknownEntity(id))?;
                entity.rename(name)?;
                self.applied += 1;
            }

            EntityOperation::Remove => {
                if id == tree.root() {
                    warn!("Remove operator matched the root entity; skipping it");
                } else {
                    self.pending.push(id);
                }
            }
        }
        Ok(())
    }
}

/// An attribute change applied to every matching entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOperation {
    /// Add the attribute to every match; fails without writing if a match already has the key
    Add {
        /// Attribute key
        key: String,

        /// Unescaped attribute value
        value: String,
    },

    /// Overwrite the attribute; entities without the key are skipped
    Edit {
        /// Attribute key
        key: String,

        /// Unescaped attribute value
        value: String,
    },

    /// Remove the attribute; entities without the key are skipped
    Remove {
        /// Attribute key
        key: String,
    },
}

/// Applies an [`AttributeOperation`] to every entity whose full name matches the predicate.
///
/// - `Edit` and `Remove` happen as each entity is entered.
/// - `Add` only records matches during the walk; [`AttributeOperator::finalize`] then writes the attribute
///   to every match, or to none of them if any match already has the key.
///
/// The predicate is called once per visited entity.
pub struct AttributeOperator<F> {
    operation: AttributeOperation,
    predicate: F,
    pending: Vec<EntityId>,
    applied: usize,
}
impl<F> AttributeOperator<F>
where
    F: FnMut(&str) -> bool,
{
    fn new(operation: AttributeOperation, predicate: F) -> Self {
        Self {
            operation,
            predicate,
            pending: vec![],
            applied: 0,
        }
    }

    /// Adds `key="value"` to every match once [`AttributeOperator::finalize`] is called.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidName`] if the key is not valid.
    pub fn add(key: &str, value: &str, predicate: F) -> XmlResult<Self> {
        validate_name(key)?;
        let operation = AttributeOperation::Add {
            key: key.to_string(),
            value: value.to_string(),
        };
        Ok(Self::new(operation, predicate))
    }

    /// Sets `key` to `value` on every match that has the key.
    pub fn edit(key: &str, value: &str, predicate: F) -> Self {
        let operation = AttributeOperation::Edit {
            key: key.to_string(),
            value: value.to_string(),
        };
        Self::new(operation, predicate)
    }

    /// Removes `key` from every match that has it.
    pub fn remove(key: &str, predicate: F) -> Self {
        let operation = AttributeOperation::Remove {
            key: key.to_string(),
        };
        Self::new(operation, predicate)
    }

    /// The operation this operator applies.
    pub fn operation(&self) -> &AttributeOperation {
        &self.operation
    }

    /// Number of entities changed so far.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Entities waiting for the attribute added by [`AttributeOperator::finalize`].
    pub fn pending(&self) -> &[EntityId] {
        &self.pending
    }

    /// Completes the operation, and returns the number of entities changed.
    ///
    /// For `Add`, every recorded entity is checked before any is written.
    /// Entities removed since they were recorded are skipped.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::DuplicateAttribute`] if a recorded entity already has the key; nothing is written in that case.
    pub fn finalize(mut self, tree: &mut EntityTree) -> XmlResult<usize> {
        let AttributeOperation::Add { key, value } = &self.operation else {
            return Ok(self.applied);
        };

        let pending = std::mem::take(&mut self.pending);
        let conflict = pending
            .iter()
            .filter_map(|id| tree.get(*id))
            .any(|entity| entity.attribute(key).is_some());
        if conflict {
            return Err(XmlErrorKind::DuplicateAttribute(key.clone()).into());
        }

        for id in pending {
            if let Some(entity) = tree.get_mut(id) {
                entity.add_attribute(key, value)?;
                self.applied += 1;
            }
        }
        Ok(self.applied)
    }
}
impl<F> VisitorMut for AttributeOperator<F>
where
    F: FnMut(&str) -> bool,
{
    fn enter(&mut self, tree: &mut EntityTree, id: EntityId) -> XmlResult<()> {
        let Some(entity) = tree.get_mut(id) else {
            return Ok(());
        };
        if !(self.predicate)(&entity.full_name()) {
            return Ok(());
        }

        match &self.operation {
            AttributeOperation::Add { .. } => {
                trace!(entity = %id, "attribute add recorded");
                self.pending.push(id);
            }

            AttributeOperation::Edit { key, value } => {
                if entity.attribute(key).is_some() {
                    entity.edit_attribute(key, value)?;
                    self.applied += 1;
                } else {
                    trace!(entity = %id, %key, "no attribute to edit");
                }
            }

            AttributeOperation::Remove { key } => {
                if entity.remove_attribute(key).is_some() {
                    self.applied += 1;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a
    /// ├── b (k="1")
    /// │   └── d
    /// ├── c
    /// └── b
    fn sample() -> EntityTree {
        let mut tree = EntityTree::new("a").unwrap();
        let root = tree.root();
        let b = tree.create_entity("b", root).unwrap();
        tree.get_mut(b).unwrap().add_attribute("k", "1").unwrap();
        tree.create_entity("d", b).unwrap();
        tree.create_entity("c", root).unwrap();
        tree.create_entity("b", root).unwrap();
        tree
    }

    #[test]
    fn test_collector() {
        let tree = sample();
        let mut collector = EntityCollector::new(|e: &Entity| e.name() == "b");
        tree.accept(&mut collector);
        assert_eq!(collector.matches().len(), 2);
    }

    #[test]
    fn test_add_operator_matches_on_attributes() {
        let mut tree = sample();
        let mut op = EntityOperator::add("new", |n: &str| n == r#"b k="1""#).unwrap();
        tree.accept_mut(&mut op).unwrap();
        assert_eq!(op.finalize(&mut tree).unwrap(), 1);
        assert_eq!(tree.to_tree(), "a\n├── b\n│   ├── d\n│   └── new\n├── c\n└── b");
    }

    #[test]
    fn test_add_operator_does_not_revisit_new_children() {
        let mut tree = sample();
        let mut op = EntityOperator::add("x", |_: &str| true).unwrap();
        tree.accept_mut(&mut op).unwrap();
        assert_eq!(op.finalize(&mut tree).unwrap(), 5);
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.entities_named("x").len(), 5);
    }

    #[test]
    fn test_add_operator_invalid_name() {
        assert!(EntityOperator::add("no good", |_: &str| true).is_err());
        assert!(EntityOperator::rename("<x>", |_: &str| true).is_err());
    }

    #[test]
    fn test_rename_operator() {
        let mut tree = sample();
        let mut op = EntityOperator::rename("e", |n: &str| n.starts_with('b')).unwrap();
        tree.accept_mut(&mut op).unwrap();
        assert_eq!(op.finalize(&mut tree).unwrap(), 2);
        assert_eq!(tree.to_tree(), "a\n├── e\n│   └── d\n├── c\n└── e");
    }

    #[test]
    fn test_remove_operator_is_deferred() {
        let mut tree = sample();
        let mut op = EntityOperator::remove(|n: &str| n.starts_with('b'));
        tree.accept_mut(&mut op).unwrap();

        // Nothing is detached until finalize
        assert_eq!(op.pending().len(), 2);
        assert_eq!(tree.len(), 5);

        assert_eq!(op.finalize(&mut tree).unwrap(), 2);
        assert_eq!(tree.to_tree(), "a\n└── c");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_remove_operator_nested_matches() {
        let mut tree = sample();
        let mut op = EntityOperator::remove(|n: &str| n != "a" && n != "c");
        tree.accept_mut(&mut op).unwrap();
        assert_eq!(op.pending().len(), 3);

        // `d` goes away with its parent, and is not detached a second time
        assert_eq!(op.finalize(&mut tree).unwrap(), 2);
        assert_eq!(tree.to_tree(), "a\n└── c");
    }

    #[test]
    fn test_remove_operator_skips_root() {
        let mut tree = sample();
        let mut op = EntityOperator::remove(|_: &str| true);
        tree.accept_mut(&mut op).unwrap();
        assert_eq!(op.finalize(&mut tree).unwrap(), 3);
        assert_eq!(tree.to_tree(), "a");
    }

    #[test]
    fn test_attribute_add() {
        let mut tree = sample();
        let mut op = AttributeOperator::add("seen", "yes", |n: &str| n == "c").unwrap();
        tree.accept_mut(&mut op).unwrap();
        assert_eq!(op.applied(), 0);
        assert_eq!(op.pending().len(), 1);
        assert_eq!(op.finalize(&mut tree).unwrap(), 1);

        let c = tree.child(tree.root(), "c").unwrap();
        assert_eq!(tree.get(c).unwrap().full_name(), r#"c seen="yes""#);
    }

    #[test]
    fn test_attribute_add_duplicate() {
        let mut tree = sample();
        let before = tree.clone();

        // Matches the first `b`, which has the key, and the last `b`, which does not
        let mut op = AttributeOperator::add("k", "2", |n: &str| n.starts_with('b')).unwrap();
        tree.accept_mut(&mut op).unwrap();
        assert_eq!(op.pending().len(), 2);

        let err = op.finalize(&mut tree).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::DuplicateAttribute(_)));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_attribute_add_calls_predicate_once_per_entity() {
        let mut tree = sample();
        let mut calls = vec![];
        let mut op = AttributeOperator::add("seen", "yes", |n: &str| {
            calls.push(n.to_string());
            n == "c"
        })
        .unwrap();
        tree.accept_mut(&mut op).unwrap();
        assert_eq!(op.finalize(&mut tree).unwrap(), 1);
        assert_eq!(calls, ["a", r#"b k="1""#, "d", "c", "b"]);
    }

    #[test]
    fn test_attribute_edit_skips_missing() {
        let mut tree = sample();
        let mut op = AttributeOperator::edit("k", "<2>", |_: &str| true);
        tree.accept_mut(&mut op).unwrap();
        assert_eq!(op.applied(), 1);

        let b = tree.child(tree.root(), "b").unwrap();
        assert_eq!(tree.get(b).unwrap().attribute("k"), Some("&lt;2&gt;"));
    }

    #[test]
    fn test_attribute_remove() {
        let mut tree = sample();
        let mut op = AttributeOperator::remove("k", |_: &str| true);
        tree.accept_mut(&mut op).unwrap();
        assert_eq!(op.applied(), 1);
        assert!(tree.entities(|e| !e.attributes().is_empty()).is_empty());
    }
}
