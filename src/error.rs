//! Error types for JSON encoding and decoding.
//!
//! Every failure aborts the enclosing call; no partial results are returned.
//! Errors carry enough context to locate the problem:
//!
//! - **Malformed text**: byte offset plus line and column
//! - **Shape errors**: a [`Path`] into the document (`$[1].birthdate`)
//!
//! ## Examples
//!
//! ```rust
//! use json_mapper::{Codec, Error, Shape};
//!
//! let codec = Codec::new();
//! let err = codec.decode("[1, 2", &Shape::sequence(Shape::Integer)).unwrap_err();
//! assert!(matches!(err, Error::Malformed { .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// One step into a JSON document: an object member or an array element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A location inside a JSON document, rendered JSONPath-style.
///
/// # Examples
///
/// ```rust
/// use json_mapper::Path;
///
/// let mut path = Path::root();
/// path.push_index(1);
/// path.push_key("birthdate");
/// assert_eq!(path.to_string(), "$[1].birthdate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The document root, `$`.
    #[must_use]
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn push_key(&mut self, key: &str) {
        self.0.push(Segment::Key(key.to_string()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.0.push(Segment::Index(index));
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Key(key) if is_plain_key(key) => write!(f, ".{}", key)?,
                Segment::Key(key) => write!(f, "[{:?}]", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Represents all possible errors raised while encoding or decoding JSON.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The text is not syntactically valid JSON
    #[error("Malformed JSON at line {line}, column {column} (offset {offset}): {message}")]
    Malformed {
        offset: usize,
        line: usize,
        column: usize,
        message: String,
    },

    /// A JSON node's kind does not match what the target shape requires
    #[error("Shape mismatch at {path}: expected {expected}, found {found}")]
    ShapeMismatch {
        path: Path,
        expected: String,
        found: String,
    },

    /// An all-arguments record is missing one of its required fields
    #[error("Missing required field `{field}` at {path}")]
    RequiredFieldMissing { path: Path, field: String },

    /// An object member has no matching declared field
    #[error("Unknown property `{property}` at {path}")]
    UnknownProperty { path: Path, property: String },

    /// An encode target revisits itself (nesting exceeded the configured depth)
    #[error("Cyclic reference detected at {path}")]
    CyclicReference { path: Path },

    /// A date has the right JSON kind but no valid calendar value
    #[error("Invalid date at {path}: {message}")]
    InvalidDate { path: Path, message: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a malformed-text error at the given byte offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::Error;
    ///
    /// let err = Error::malformed(7, 1, 8, "unterminated string");
    /// assert!(err.to_string().contains("offset 7"));
    /// ```
    pub fn malformed(offset: usize, line: usize, column: usize, message: &str) -> Self {
        Error::Malformed {
            offset,
            line,
            column,
            message: message.to_string(),
        }
    }

    /// Creates a shape mismatch naming the expected and actual kinds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::{Error, Path};
    ///
    /// let err = Error::shape_mismatch(&Path::root(), "integer", "string");
    /// assert!(err.to_string().contains("expected integer"));
    /// ```
    pub fn shape_mismatch(path: &Path, expected: &str, found: &str) -> Self {
        Error::ShapeMismatch {
            path: path.clone(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn required_field_missing(path: &Path, field: &str) -> Self {
        Error::RequiredFieldMissing {
            path: path.clone(),
            field: field.to_string(),
        }
    }

    pub fn unknown_property(path: &Path, property: &str) -> Self {
        Error::UnknownProperty {
            path: path.clone(),
            property: property.to_string(),
        }
    }

    pub fn cyclic_reference(path: &Path) -> Self {
        Error::CyclicReference { path: path.clone() }
    }

    pub fn invalid_date(path: &Path, message: &str) -> Self {
        Error::InvalidDate {
            path: path.clone(),
            message: message.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// The document location this error refers to, if it has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::ShapeMismatch { path, .. }
            | Error::RequiredFieldMissing { path, .. }
            | Error::UnknownProperty { path, .. }
            | Error::CyclicReference { path }
            | Error::InvalidDate { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_rendering() {
        let mut path = Path::root();
        assert_eq!(path.to_string(), "$");

        path.push_key("people");
        path.push_index(0);
        path.push_key("birth date");
        assert_eq!(path.to_string(), "$.people[0][\"birth date\"]");

        path.pop();
        assert_eq!(path.to_string(), "$.people[0]");
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn test_error_path_accessor() {
        let mut path = Path::root();
        path.push_key("hobbies");
        let err = Error::unknown_property(&path, "hobbies");
        assert_eq!(err.path(), Some(&path));
        assert!(Error::custom("boom").path().is_none());
    }
}
