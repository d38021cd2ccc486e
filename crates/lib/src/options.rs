//! Encoding and decoding options.
//!
//! [`Options`] is plain data: it can be built in code with the `with_*`
//! methods or loaded from any serde format. Missing fields take their
//! defaults.

use serde::{Deserialize, Serialize};

use crate::tree::{LEVEL_SEPARATOR, LIST_SEPARATOR, WORD_SEPARATOR};

/// Nesting limit applied when no other is configured.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// How keys are written when a subtree is decoded into a [`Dynamic`](crate::Dynamic).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStyle {
    /// Path segments are used as keys unchanged
    #[default]
    Verbatim,
    /// Path segments are lower-cased with word separators turned into `_`
    Snake,
}

/// Options shared by the encoder, the decoder and the [`Mapper`](crate::Mapper).
///
/// ```
/// # use envtree::Options;
/// let options: Options = serde_json::from_str(r#"{ "upper_case_names": false }"#).unwrap();
/// assert!(!options.upper_case_names);
/// assert_eq!(options.level_separator, '_');
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Separates path segments
    pub level_separator: char,
    /// Separates words inside a segment derived from an identifier
    pub word_separator: char,
    /// Joins the elements of a scalar sequence into one value
    pub list_separator: char,
    /// Upper-case field segments and prefixes
    pub upper_case_names: bool,
    /// Deepest nesting the encoder and decoder will follow
    pub max_depth: usize,
    /// Reject sequences of aggregates instead of using `[i]` segments
    pub strict_sequences: bool,
    /// Turn text that looks like a number or boolean into one in dynamic values
    pub guess_scalar_types: bool,
    /// Key style of dynamic values
    pub key_style: KeyStyle,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            level_separator: LEVEL_SEPARATOR,
            word_separator: WORD_SEPARATOR,
            list_separator: LIST_SEPARATOR,
            upper_case_names: true,
            max_depth: DEFAULT_MAX_DEPTH,
            strict_sequences: false,
            guess_scalar_types: false,
            key_style: KeyStyle::Verbatim,
        }
    }
}

impl Options {
    /// Sets the separator between path segments.
    pub fn with_level_separator(mut self, separator: char) -> Self {
        self.level_separator = separator;
        self
    }

    /// Sets the separator between words inside one segment.
    pub fn with_word_separator(mut self, separator: char) -> Self {
        self.word_separator = separator;
        self
    }

    /// Sets the separator used to join scalar sequences into one value.
    pub fn with_list_separator(mut self, separator: char) -> Self {
        self.list_separator = separator;
        self
    }

    /// Sets whether generated names and prefixes are upper-cased.
    pub fn with_upper_case_names(mut self, upper_case: bool) -> Self {
        self.upper_case_names = upper_case;
        self
    }

    /// Sets the nesting limit for encoding and decoding.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets whether sequences of aggregates fail instead of using `[i]` paths.
    pub fn with_strict_sequences(mut self, strict: bool) -> Self {
        self.strict_sequences = strict;
        self
    }

    /// Sets whether dynamic targets guess integer, float and boolean values.
    pub fn with_guess_scalar_types(mut self, guess: bool) -> Self {
        self.guess_scalar_types = guess;
        self
    }

    /// Sets how map keys are written for dynamic targets.
    pub fn with_key_style(mut self, style: KeyStyle) -> Self {
        self.key_style = style;
        self
    }
}
