//! Error handling for entity trees and documents
use crate::EntityId;
use std::path::PathBuf;

/// A result type for tree operations, which can be either a successful value or an error.
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// An error that occurred while building, mutating or exporting a document.
#[derive(Debug)]
pub struct XmlError {
    /// The file the error relates to, if any
    pub path: Option<PathBuf>,

    /// The kind of error that occurred
    pub kind: XmlErrorKind,
}
impl XmlError {
    /// Creates a new `XmlError`
    #[must_use]
    pub fn new(kind: XmlErrorKind) -> Self {
        Self { path: None, kind }
    }

    /// Adds a path to the error.
    #[must_use]
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Returns true if this error was raised by an invalid `<?xml` declaration value.
    #[must_use]
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self.kind,
            XmlErrorKind::InvalidVersion(_) | XmlErrorKind::InvalidEncoding(_)
        )
    }
}
impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            writeln!(f, "= In {}", path.display())?;
        }

        for line in self.kind.to_string().lines() {
            writeln!(f, "= {line}")?;
        }
        Ok(())
    }
}
impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            XmlErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }
}
impl From<XmlErrorKind> for XmlError {
    fn from(kind: XmlErrorKind) -> Self {
        Self::new(kind)
    }
}
impl From<std::io::Error> for XmlError {
    fn from(err: std::io::Error) -> Self {
        Self::new(XmlErrorKind::Io(err))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum XmlErrorKind {
    /// An entity name or attribute key does not match the name pattern
    #[error("Invalid name: `{0}`")]
    InvalidName(String),

    /// An attribute with this key already exists on the entity
    #[error("Duplicate attribute: `{0}`")]
    DuplicateAttribute(String),

    /// An attribute was edited that does not exist on the entity
    #[error("Attribute not found: `{0}`")]
    AttributeNotFound(String),

    /// The declaration version is not `1.0` or `1.1`
    #[error("Invalid XML version `{0}`; expected 1.0 or 1.1")]
    InvalidVersion(String),

    /// The declaration encoding is not one of the supported encodings
    #[error("Unsupported encoding `{0}`")]
    InvalidEncoding(String),

    /// An id does not refer to a live entity of the tree
    #[error("No entity with id {0} in this tree")]
    UnknownEntity(EntityId),

    /// The root entity cannot be detached from its tree
    #[error("The root entity cannot be removed")]
    RootRemoval,

    /// A re-parent would move the root, or create a cycle
    #[error("Cannot move entity {entity} under {parent}")]
    InvalidReparent {
        /// The entity being moved
        entity: EntityId,

        /// The requested new parent
        parent: EntityId,
    },

    /// A string could not be entity encoded or decoded
    #[error("Entity encoding failed: {0}")]
    Encoding(String),

    /// IO error occurred while writing a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
