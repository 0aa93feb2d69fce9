//! Closure-based construction of entity trees.
use crate::{
    Document, Entity, EntityId, EntityTree,
    error::{XmlError, XmlErrorKind, XmlResult},
};

/// Builds the entity at one position of a tree.
///
/// Every method returns the builder so calls can be chained. The first error is kept and returned
/// from [`EntityTree::build`]; later calls on a failed builder do nothing.
///
/// # Example
/// ```rust
/// use xmlentity::EntityTree;
///
/// let tree = EntityTree::build("Regular-Show", |show| {
///     show.child("Mordecai", |m| {
///         m.attribute("Mordequices", "1");
///     })
///     .leaf("Rigby")
///     .attribute("Eggcelent", "1");
/// })
/// .unwrap();
///
/// assert_eq!(tree.to_tree(), "Regular-Show\n├── Mordecai\n└── Rigby");
/// ```
pub struct EntityBuilder<'t> {
    tree: &'t mut EntityTree,
    id: EntityId,
    error: Option<XmlError>,
}
impl<'t> EntityBuilder<'t> {
    fn new(tree: &'t mut EntityTree, id: EntityId) -> Self {
        Self {
            tree,
            id,
            error: None,
        }
    }

    /// The handle of the entity being built.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Add an attribute to the entity.
    pub fn attribute(&mut self, key: &str, value: &str) -> &mut Self {
        self.apply(|entity| entity.add_attribute(key, value))
    }

    /// Set the text of the entity.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.apply(|entity| entity.set_text(text))
    }

    /// Add a child entity, built by `build`.
    pub fn child<F>(&mut self, name: &str, build: F) -> &mut Self
    where
        F: FnOnce(&mut EntityBuilder<'_>),
    {
        if self.error.is_some() {
            return self;
        }

        match self.tree.create_entity(name, self.id) {
            Ok(id) => {
                let mut child = EntityBuilder::new(&mut *self.tree, id);
                build(&mut child);
                self.error = child.error;
            }
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Add a child entity with no attributes, text or children.
    pub fn leaf(&mut self, name: &str) -> &mut Self {
        self.child(name, |_| {})
    }

    /// Copy every entity of `other` below this entity.
    pub fn graft(&mut self, other: &EntityTree) -> &mut Self {
        if self.error.is_none() {
            if let Err(e) = self.tree.graft(self.id, other) {
                self.error = Some(e);
            }
        }
        self
    }

    fn apply<F>(&mut self, change: F) -> &mut Self
    where
        F: FnOnce(&mut Entity) -> XmlResult<()>,
    {
        if self.error.is_some() {
            return self;
        }

        let result = match self.tree.get_mut(self.id) {
            Some(entity) => change(entity),
            None => Err(XmlErrorKind::UnknownEntity(self.id).into()),
        };
        if let Err(e) = result {
            self.error = Some(e);
        }
        self
    }
}

impl EntityTree {
    /// Build a tree from a root name and a closure describing the root entity.
    ///
    /// # Errors
    /// Returns the first error raised while building: an invalid name or a duplicate attribute.
    pub fn build<F>(root_name: &str, build: F) -> XmlResult<Self>
    where
        F: FnOnce(&mut EntityBuilder<'_>),
    {
        let mut tree = Self::new(root_name)?;
        let root = tree.root();

        let error = {
            let mut builder = EntityBuilder::new(&mut tree, root);
            build(&mut builder);
            builder.error
        };
        match error {
            Some(e) => Err(e),
            None => Ok(tree),
        }
    }
}

impl Document {
    /// Build a document with a default declaration. See [`EntityTree::build`].
    ///
    /// # Errors
    /// Returns the first error raised while building.
    pub fn build<F>(root_name: &str, build: F) -> XmlResult<Self>
    where
        F: FnOnce(&mut EntityBuilder<'_>),
    {
        EntityTree::build(root_name, build).map(Document::new)
    }
}
