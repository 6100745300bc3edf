//! Configuration options for the codec.
//!
//! - [`CodecOptions`]: main configuration struct
//! - [`DateEncoding`]: how calendar dates are written
//!
//! Options are captured by value when a [`Codec`](crate::Codec) is built and
//! never change afterwards.
//!
//! ## Examples
//!
//! ```rust
//! use json_mapper::{CodecOptions, DateEncoding};
//!
//! let options = CodecOptions::new()
//!     .with_fail_on_unknown_properties(false)
//!     .with_date_encoding(DateEncoding::Iso8601);
//! assert!(!options.fail_on_unknown_properties);
//! ```

/// How [`Value::Date`](crate::Value::Date) is encoded.
///
/// Decoding always accepts both forms.
///
/// # Examples
///
/// ```rust
/// use json_mapper::DateEncoding;
///
/// assert_eq!(DateEncoding::default(), DateEncoding::Array);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DateEncoding {
    /// `[year, month, day]` as bare numbers
    #[default]
    Array,
    /// ISO-8601 `"YYYY-MM-DD"` string
    Iso8601,
}

/// Configuration options for encoding and decoding.
#[derive(Clone, Debug)]
pub struct CodecOptions {
    /// Fail when an object member has no matching record field.
    pub fail_on_unknown_properties: bool,
    pub date_encoding: DateEncoding,
    pub pretty: bool,
    /// Spaces per nesting level; only used when `pretty` is set.
    pub indent: usize,
    /// Deepest nesting accepted by the parser and the encoder.
    pub max_depth: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            fail_on_unknown_properties: true,
            date_encoding: DateEncoding::default(),
            pretty: false,
            indent: 2,
            max_depth: 128,
        }
    }
}

impl CodecOptions {
    /// Creates default options (compact output, strict unknown properties,
    /// array dates).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::CodecOptions;
    ///
    /// let options = CodecOptions::new();
    /// assert!(options.fail_on_unknown_properties);
    /// assert!(!options.pretty);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output.
    #[must_use]
    pub fn pretty() -> Self {
        CodecOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size. Only affects pretty-printed output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::CodecOptions;
    ///
    /// let options = CodecOptions::pretty().with_indent(4);
    /// assert_eq!(options.indent, 4);
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn with_date_encoding(mut self, date_encoding: DateEncoding) -> Self {
        self.date_encoding = date_encoding;
        self
    }

    /// When `false`, object members without a matching record field are
    /// dropped instead of failing the decode.
    #[must_use]
    pub fn with_fail_on_unknown_properties(mut self, fail: bool) -> Self {
        self.fail_on_unknown_properties = fail;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
