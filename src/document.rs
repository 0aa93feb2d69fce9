use crate::{
    Entity, EntityId, EntityTree,
    error::{XmlError, XmlErrorKind, XmlResult},
    operator::{AttributeOperator, EntityOperator},
};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Versions accepted in the `<?xml` declaration.
pub const SUPPORTED_VERSIONS: &[&str] = &["1.0", "1.1"];

/// Encodings accepted in the `<?xml` declaration. Compared case-insensitively.
pub const SUPPORTED_ENCODINGS: &[&str] = &[
    "UTF-8",
    "UTF-16",
    "UTF-16BE",
    "UTF-16LE",
    "UTF-32",
    "ISO-8859-1",
    "US-ASCII",
    "ASCII",
    "WINDOWS-1252",
];

/// The XML declaration of a document: `<?xml version="1.0" encoding="UTF-8"?>`
///
/// Both values are checked before they are stored, so a declaration is always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    version: String,
    encoding: String,
}
impl Declaration {
    /// Create a new declaration.
    ///
    /// # Errors
    /// - [`XmlErrorKind::InvalidVersion`] if the version is not one of [`SUPPORTED_VERSIONS`]
    /// - [`XmlErrorKind::InvalidEncoding`] if the encoding is not one of [`SUPPORTED_ENCODINGS`]
    pub fn new(version: &str, encoding: &str) -> XmlResult<Self> {
        check_version(version)?;
        check_encoding(encoding)?;
        Ok(Self {
            version: version.to_string(),
            encoding: encoding.to_string(),
        })
    }

    /// The XML version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The character encoding, as it was given.
    #[must_use]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Replace the version. The declaration is unchanged on error.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidVersion`] if the version is not supported.
    pub fn set_version(&mut self, version: &str) -> XmlResult<()> {
        check_version(version)?;
        self.version = version.to_string();
        Ok(())
    }

    /// Replace the encoding. The declaration is unchanged on error.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidEncoding`] if the encoding is not supported.
    pub fn set_encoding(&mut self, encoding: &str) -> XmlResult<()> {
        check_encoding(encoding)?;
        self.encoding = encoding.to_string();
        Ok(())
    }
}
impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: "UTF-8".to_string(),
        }
    }
}

fn check_version(version: &str) -> XmlResult<()> {
    if SUPPORTED_VERSIONS.contains(&version) {
        Ok(())
    } else {
        Err(XmlErrorKind::InvalidVersion(version.to_string()).into())
    }
}

fn check_encoding(encoding: &str) -> XmlResult<()> {
    if SUPPORTED_ENCODINGS
        .iter()
        .any(|e| e.eq_ignore_ascii_case(encoding))
    {
        Ok(())
    } else {
        Err(XmlErrorKind::InvalidEncoding(encoding.to_string()).into())
    }
}

/// An XML document: a tree of entities and the `<?xml` declaration.
///
/// Every bulk operation of the document builds an operator and walks it over the tree from the root.
/// Predicates receive the [`Entity::full_name`] of each entity (`name key="value" ...`).
///
/// # Example
/// ```rust
/// use xmlentity::{Document, EntityTree};
///
/// let mut tree = EntityTree::new("root").unwrap();
/// let child = tree.create_entity("child", tree.root()).unwrap();
/// tree.get_mut(child).unwrap().set_text("hello").unwrap();
///
/// let mut document = Document::new(tree);
/// document.add_attributes(|name| name == "child", "lang", "en").unwrap();
///
/// assert_eq!(
///     document.to_xml(None),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n\t<child lang=\"en\">hello</child>\n</root>"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    declaration: Declaration,
    tree: EntityTree,
}
impl Document {
    /// Creates a new document around a tree, with a `1.0` / `UTF-8` declaration.
    #[must_use]
    pub fn new(tree: EntityTree) -> Self {
        Self {
            declaration: Declaration::default(),
            tree,
        }
    }

    /// Creates a new document with the given declaration values.
    ///
    /// # Errors
    /// Fails if the version or encoding is not supported. See [`Declaration::new`].
    pub fn with_declaration(tree: EntityTree, version: &str, encoding: &str) -> XmlResult<Self> {
        Ok(Self {
            declaration: Declaration::new(version, encoding)?,
            tree,
        })
    }

    /// The `<?xml` declaration.
    #[must_use]
    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// The XML version.
    #[must_use]
    pub fn version(&self) -> &str {
        self.declaration.version()
    }

    /// The character encoding.
    #[must_use]
    pub fn encoding(&self) -> &str {
        self.declaration.encoding()
    }

    /// Replace the version. The document is unchanged on error.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidVersion`] if the version is not supported.
    pub fn set_version(&mut self, version: &str) -> XmlResult<()> {
        self.declaration.set_version(version)
    }

    /// Replace the encoding. The document is unchanged on error.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidEncoding`] if the encoding is not supported.
    pub fn set_encoding(&mut self, encoding: &str) -> XmlResult<()> {
        self.declaration.set_encoding(encoding)
    }

    /// The entity tree.
    #[must_use]
    pub fn tree(&self) -> &EntityTree {
        &self.tree
    }

    /// The entity tree.
    pub fn tree_mut(&mut self) -> &mut EntityTree {
        &mut self.tree
    }

    /// Consumes the document, returning its tree.
    #[must_use]
    pub fn into_tree(self) -> EntityTree {
        self.tree
    }

    /// The handle of the root entity.
    #[must_use]
    pub fn root(&self) -> EntityId {
        self.tree.root()
    }

    /// Returns the entity for a handle, if it is part of this document.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.tree.get(id)
    }

    /// Adds a child named `name` to every entity matching `predicate`.
    /// Returns the number of children added.
    ///
    /// New children are not matched against the predicate in the same call.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidName`] if the name is not valid; nothing is added in that case.
    pub fn add_entities<F>(&mut self, predicate: F, name: &str) -> XmlResult<usize>
    where
        F: FnMut(&str) -> bool,
    {
        let mut operator = EntityOperator::add(name, predicate)?;
        self.tree.accept_mut(&mut operator)?;
        let added = operator.finalize(&mut self.tree)?;

        debug!(name, added, "added entities");
        Ok(added)
    }

    /// Renames every entity matching `predicate`.
    /// Returns the number of entities renamed.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidName`] if the name is not valid; nothing is renamed in that case.
    pub fn rename_entities<F>(&mut self, predicate: F, name: &str) -> XmlResult<usize>
    where
        F: FnMut(&str) -> bool,
    {
        let mut operator = EntityOperator::rename(name, predicate)?;
        self.tree.accept_mut(&mut operator)?;
        let renamed = operator.finalize(&mut self.tree)?;

        debug!(name, renamed, "renamed entities");
        Ok(renamed)
    }

    /// Removes every entity matching `predicate`, with everything below it.
    /// The root is never removed. Returns the number of entities detached from their parent.
    ///
    /// # Errors
    /// Fails if a matched entity cannot be detached.
    pub fn remove_entities<F>(&mut self, predicate: F) -> XmlResult<usize>
    where
        F: FnMut(&str) -> bool,
    {
        let mut operator = EntityOperator::remove(predicate);
        self.tree.accept_mut(&mut operator)?;
        let removed = operator.finalize(&mut self.tree)?;

        debug!(removed, "removed entities");
        Ok(removed)
    }

    /// Adds `key="value"` to every entity matching `predicate`.
    /// Returns the number of entities changed.
    ///
    /// The change is all-or-nothing.
    ///
    /// # Errors
    /// - [`XmlErrorKind::InvalidName`] if the key is not valid
    /// - [`XmlErrorKind::DuplicateAttribute`] if a matching entity already has the key
    pub fn add_attributes<F>(&mut self, predicate: F, key: &str, value: &str) -> XmlResult<usize>
    where
        F: FnMut(&str) -> bool,
    {
        let mut operator = AttributeOperator::add(key, value, predicate)?;
        self.tree.accept_mut(&mut operator)?;
        let added = operator.finalize(&mut self.tree)?;

        debug!(key, added, "added attributes");
        Ok(added)
    }

    /// Sets `key` to `value` on every entity matching `predicate` that has the key.
    /// Returns the number of entities changed.
    ///
    /// # Errors
    /// Fails if the value cannot be escaped.
    pub fn edit_attributes<F>(&mut self, predicate: F, key: &str, value: &str) -> XmlResult<usize>
    where
        F: FnMut(&str) -> bool,
    {
        let mut operator = AttributeOperator::edit(key, value, predicate);
        self.tree.accept_mut(&mut operator)?;

        debug!(key, edited = operator.applied(), "edited attributes");
        Ok(operator.applied())
    }

    /// Removes `key` from every entity matching `predicate`.
    /// Returns the number of entities changed.
    ///
    /// # Errors
    /// Removing attributes does not fail; the result type matches the other bulk operations.
    pub fn remove_attributes<F>(&mut self, predicate: F, key: &str) -> XmlResult<usize>
    where
        F: FnMut(&str) -> bool,
    {
        let mut operator = AttributeOperator::remove(key, predicate);
        self.tree.accept_mut(&mut operator)?;

        debug!(key, removed = operator.applied(), "removed attributes");
        Ok(operator.applied())
    }

    /// Returns every entity matching `predicate`, in document order.
    pub fn entities<F>(&self, predicate: F) -> Vec<EntityId>
    where
        F: FnMut(&Entity) -> bool,
    {
        self.tree.entities(predicate)
    }

    /// Returns every entity with the given name, in document order.
    #[must_use]
    pub fn entities_named(&self, name: &str) -> Vec<EntityId> {
        self.tree.entities_named(name)
    }

    /// Returns the open tags of the entities reached by a `/`-separated path of child names.
    ///
    /// See [`crate::query_path`].
    #[must_use]
    pub fn query(&self, path: &str) -> Vec<String> {
        self.tree.query(path)
    }

    /// Renders the tree as an outline of entity names.
    #[must_use]
    pub fn to_tree(&self) -> String {
        self.tree.to_tree()
    }

    /// Create a formatted XML string from this document.
    ///
    /// `tab_char` is used to indent the XML. If `None`, a tab is used.
    #[must_use]
    pub fn to_xml(&self, tab_char: Option<&str>) -> String {
        crate::to_xml::render_xml(self, tab_char)
    }

    /// Write this document as a formatted XML string using the given writer.
    ///
    /// See [`Document::to_xml`] for more details.
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    pub fn to_xml_with_writer<W: Write>(
        &self,
        writer: &mut W,
        tab_char: Option<&str>,
    ) -> XmlResult<()> {
        crate::to_xml::write_xml(writer, self, tab_char)
    }

    /// Write this document to a file, indented with tabs.
    ///
    /// The XML is rendered in full first, then written to a uniquely named temporary file next to `path`
    /// and moved over `path`, so the target is either fully replaced or left as it was.
    /// The temporary file is removed if anything fails.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::Io`], tagged with the path, if the file cannot be written.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> XmlResult<()> {
        let path = path.as_ref();
        let text = self.to_xml(None);

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let write = || -> std::io::Result<()> {
            let mut staging = NamedTempFile::new_in(dir)?;
            staging.write_all(text.as_bytes())?;
            staging.as_file().sync_all()?;
            staging.persist(path).map_err(|e| e.error)?;
            Ok(())
        };
        write().map_err(|e| XmlError::from(e).with_path(path.to_path_buf()))?;

        debug!(bytes = text.len(), "document written");
        Ok(())
    }
}
