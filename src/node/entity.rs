use super::validate_name;
use crate::{
    EntityId,
    error::{XmlErrorKind, XmlResult},
    escape::escape,
};
use indexmap::IndexMap;

/// An element of the tree, with a name, attributes, optional text and children:
/// `<name key="value">text</name>`
///
/// Attribute keys are unique and keep their insertion order.
/// Attribute values and text are stored already escaped.
///
/// The structural fields (parent and children) can only be changed through [`crate::EntityTree`],
/// so a `&mut Entity` can rename the entity and change its attributes or text, but never detach it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    name: String,
    parent: Option<EntityId>,
    attributes: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<EntityId>,
}
impl Entity {
    pub(crate) fn new(name: &str, parent: Option<EntityId>) -> XmlResult<Self> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            parent,
            attributes: IndexMap::new(),
            text: None,
            children: vec![],
        })
    }

    /// Get the name of the entity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the name of the entity.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidName`] if the new name is not valid; the entity is unchanged.
    pub fn rename(&mut self, name: &str) -> XmlResult<()> {
        validate_name(name)?;
        self.name = name.to_string();
        Ok(())
    }

    /// Get the id of the parent entity, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Get the children of the entity, in document order.
    #[must_use]
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Get the escaped text content of the entity, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set the text content of the entity. The text is escaped before it is stored.
    ///
    /// An empty string clears the text.
    ///
    /// # Errors
    /// Fails if the text cannot be escaped.
    pub fn set_text(&mut self, text: &str) -> XmlResult<()> {
        self.text = if text.is_empty() {
            None
        } else {
            Some(escape(text)?)
        };
        Ok(())
    }

    /// Remove the text content of the entity.
    pub fn clear_text(&mut self) {
        self.text = None;
    }

    /// Get the attributes of the entity, in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Get a copy of the attributes matching `predicate`, in insertion order.
    pub fn get_attributes<F>(&self, mut predicate: F) -> IndexMap<String, String>
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.attributes
            .iter()
            .filter(|(k, v)| predicate(k.as_str(), v.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Add an attribute to the end of the attribute list.
    ///
    /// # Errors
    /// - [`XmlErrorKind::InvalidName`] if the key is not valid
    /// - [`XmlErrorKind::DuplicateAttribute`] if the key is already present
    ///
    /// The entity is unchanged on error.
    pub fn add_attribute(&mut self, key: &str, value: &str) -> XmlResult<()> {
        validate_name(key)?;
        if self.attributes.contains_key(key) {
            return Err(XmlErrorKind::DuplicateAttribute(key.to_string()).into());
        }

        let value = escape(value)?;
        self.attributes.insert(key.to_string(), value);
        Ok(())
    }

    /// Add every attribute of `attributes`, or none of them.
    ///
    /// # Errors
    /// - [`XmlErrorKind::InvalidName`] if any key is not valid
    /// - [`XmlErrorKind::DuplicateAttribute`] if any key is already present, or repeated in `attributes`
    pub fn add_all_attributes<I, K, V>(&mut self, attributes: I) -> XmlResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut staged: IndexMap<String, String> = IndexMap::new();
        for (key, value) in attributes {
            let key = key.as_ref();
            validate_name(key)?;
            if self.attributes.contains_key(key) || staged.contains_key(key) {
                return Err(XmlErrorKind::DuplicateAttribute(key.to_string()).into());
            }
            staged.insert(key.to_string(), escape(value.as_ref())?);
        }

        self.attributes.extend(staged);
        Ok(())
    }

    /// Overwrite the value of an existing attribute, keeping its position.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::AttributeNotFound`] if the key is not present.
    pub fn edit_attribute(&mut self, key: &str, value: &str) -> XmlResult<()> {
        let Some(slot) = self.attributes.get_mut(key) else {
            return Err(XmlErrorKind::AttributeNotFound(key.to_string()).into());
        };

        *slot = escape(value)?;
        Ok(())
    }

    /// Set every attribute matching `predicate` to `value`.
    /// Returns the number of attributes changed.
    ///
    /// # Errors
    /// Fails if the value cannot be escaped; no attribute is changed in that case.
    pub fn edit_all_attributes<F>(&mut self, mut predicate: F, value: &str) -> XmlResult<usize>
    where
        F: FnMut(&str, &str) -> bool,
    {
        let value = escape(value)?;
        let mut edited = 0;
        for (key, slot) in &mut self.attributes {
            if predicate(key.as_str(), slot.as_str()) {
                slot.clone_from(&value);
                edited += 1;
            }
        }
        Ok(edited)
    }

    /// Remove an attribute, keeping the order of the others.
    /// Removing a missing key does nothing and returns `None`.
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }

    /// Remove every attribute matching `predicate`.
    /// Returns the number of attributes removed.
    pub fn remove_all_attributes<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&str, &str) -> bool,
    {
        let before = self.attributes.len();
        self.attributes.retain(|k, v| !predicate(k.as_str(), v.as_str()));
        before - self.attributes.len()
    }

    /// The name followed by every attribute as ` key="value"`, in order.
    ///
    /// This is the string bulk operators match their predicates against.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut full_name = self.name.clone();
        for (key, value) in &self.attributes {
            full_name.push_str(&format!(r#" {key}="{value}""#));
        }
        full_name
    }

    /// True when the entity has no children and no text.
    #[must_use]
    pub fn is_self_closing(&self) -> bool {
        self.children.is_empty() && self.text.is_none()
    }

    /// `<full name/>` for self-closing entities, `<full name>` otherwise.
    #[must_use]
    pub fn open_tag(&self) -> String {
        if self.is_self_closing() {
            format!("<{}/>", self.full_name())
        } else {
            format!("<{}>", self.full_name())
        }
    }

    /// `</name>`, or an empty string for self-closing entities.
    #[must_use]
    pub fn close_tag(&self) -> String {
        if self.is_self_closing() {
            String::new()
        } else {
            format!("</{}>", self.name)
        }
    }

    /// Same name, attributes and text, with a new parent and no children.
    pub(crate) fn shallow_copy(&self, parent: Option<EntityId>) -> Self {
        Self {
            name: self.name.clone(),
            parent,
            attributes: self.attributes.clone(),
            text: self.text.clone(),
            children: vec![],
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: EntityId) {
        self.children.push(child);
    }

    pub(crate) fn unlink_child(&mut self, child: EntityId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != child);
        before != self.children.len()
    }

    pub(crate) fn take_children(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.children)
    }
}
