//! Building entities from plain Rust values.
//!
//! A type describes itself by implementing [`ToEntity`]: each field is classified as an attribute,
//! a child entity, a list of child entities, or ignored.
//!
//! ```rust
//! use xmlentity::{Field, ToEntity};
//! use std::borrow::Cow;
//!
//! struct Address {
//!     street: String,
//!     number: u32,
//! }
//! impl ToEntity for Address {
//!     fn fields(&self) -> Vec<(&'static str, Field<'_>)> {
//!         vec![
//!             ("street", Field::attribute(&self.street)),
//!             ("number", Field::attribute(self.number)),
//!         ]
//!     }
//! }
//!
//! struct Person {
//!     name: String,
//!     password: String,
//!     address: Address,
//! }
//! impl ToEntity for Person {
//!     fn entity_name(&self) -> Cow<'static, str> {
//!         "persona".into()
//!     }
//!
//!     fn fields(&self) -> Vec<(&'static str, Field<'_>)> {
//!         vec![
//!             ("name", Field::attribute(&self.name)),
//!             ("password", Field::Ignore),
//!             ("address", Field::Entity(&self.address)),
//!         ]
//!     }
//! }
//!
//! let person = Person {
//!     name: "John Doe".into(),
//!     password: "secret".into(),
//!     address: Address { street: "Main St".into(), number: 123 },
//! };
//! let tree = person.to_entity().unwrap();
//! assert_eq!(tree.get(tree.root()).unwrap().full_name(), r#"persona name="John Doe""#);
//! assert_eq!(tree.to_tree(), "persona\n└── Address");
//! ```
use crate::{EntityId, EntityTree, error::XmlErrorKind, error::XmlResult};
use std::borrow::Cow;

/// How one field of a value is represented in its entity.
pub enum Field<'a> {
    /// An attribute with this (unescaped) value
    Attribute(String),

    /// A child entity
    Entity(&'a dyn ToEntity),

    /// One child entity per element, in order
    Entities(Vec<&'a dyn ToEntity>),

    /// Not represented
    Ignore,
}
impl<'a> Field<'a> {
    /// An attribute holding the `Display` form of `value`.
    pub fn attribute(value: impl std::fmt::Display) -> Self {
        Self::Attribute(value.to_string())
    }

    /// One child entity per element of `values`.
    pub fn entities<T, I>(values: I) -> Self
    where
        T: ToEntity + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        Self::Entities(values.into_iter().map(|v| v as &dyn ToEntity).collect())
    }
}

/// A value that can describe itself as an entity.
///
/// The entity is named after the type unless [`ToEntity::entity_name`] is overridden.
/// Fields are added in the order [`ToEntity::fields`] returns them.
pub trait ToEntity {
    /// The name of the entity. Defaults to the unqualified type name, without generics.
    fn entity_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(short_type_name(std::any::type_name::<Self>()))
    }

    /// The fields of the value, in declaration order.
    fn fields(&self) -> Vec<(&'static str, Field<'_>)>;

    /// Build a tree from this value.
    ///
    /// # Errors
    /// - [`XmlErrorKind::InvalidName`] if the entity name or a field name is not valid
    /// - [`XmlErrorKind::DuplicateAttribute`] if two attribute fields share a name
    fn to_entity(&self) -> XmlResult<EntityTree> {
        let mut tree = EntityTree::new(&self.entity_name())?;
        let root = tree.root();
        fill(&mut tree, root, self.fields())?;
        Ok(tree)
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn fill(tree: &mut EntityTree, id: EntityId, fields: Vec<(&'static str, Field<'_>)>) -> XmlResult<()> {
    for (name, field) in fields {
        match field {
            Field::Attribute(value) => {
                let entity = tree.get_mut(id).ok_or(XmlErrorKind::UnknownEntity(id))?;
                entity.add_attribute(name, &value)?;
            }

            Field::Entity(value) => add_child(tree, id, value)?,

            Field::Entities(values) => {
                for value in values {
                    add_child(tree, id, value)?;
                }
            }

            Field::Ignore => (),
        }
    }
    Ok(())
}

fn add_child(tree: &mut EntityTree, parent: EntityId, value: &dyn ToEntity) -> XmlResult<()> {
    let child = tree.create_entity(&value.entity_name(), parent)?;
    fill(tree, child, value.fields())
}
