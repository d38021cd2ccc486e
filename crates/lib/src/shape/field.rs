//! Record fields and their tags.

use crate::{naming, options::Options};

/// A declared field of a record: its identifier and its raw tag text.
///
/// The tag is a comma-separated list of tokens:
///
/// - `-` excludes the field
/// - `omitempty` skips the field while it holds its zero value
/// - the first other non-empty token replaces the derived segment name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Identifier as declared
    pub ident: &'static str,
    /// Raw tag text, empty when the field is untagged
    pub tag: &'static str,
}

impl Field {
    /// Creates a field description.
    pub const fn new(ident: &'static str, tag: &'static str) -> Self {
        Self { ident, tag }
    }

    /// Parses the tag of this field.
    pub fn parsed_tag(&self) -> FieldTag<'static> {
        FieldTag::parse(self.tag)
    }

    /// Path segment for this field under `options`.
    ///
    /// An explicit tag name is used as-is; otherwise the identifier is
    /// converted to kebab case. Either is upper-cased when the options ask
    /// for upper-case names.
    pub fn segment(&self, options: &Options) -> String {
        let tag = self.parsed_tag();
        let segment = match tag.name {
            Some(name) => name.to_string(),
            None => naming::to_kebab(self.ident, options.word_separator),
        };
        if options.upper_case_names {
            segment.to_uppercase()
        } else {
            segment
        }
    }
}

/// Parsed form of a field tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldTag<'a> {
    /// Explicit segment name
    pub name: Option<&'a str>,
    /// Field is excluded entirely
    pub skip: bool,
    /// Field is skipped while it holds its zero value
    pub omit_empty: bool,
}

impl<'a> FieldTag<'a> {
    /// Parses tag text.
    ///
    /// ```
    /// # use envtree::FieldTag;
    /// let tag = FieldTag::parse("port,omitempty");
    /// assert_eq!(tag.name, Some("port"));
    /// assert!(tag.omit_empty);
    ///
    /// assert!(FieldTag::parse("-").skip);
    /// assert_eq!(FieldTag::parse(",omitempty").name, None);
    /// ```
    pub fn parse(tag: &'a str) -> Self {
        let mut parsed = FieldTag::default();
        for token in tag.split(',').map(str::trim) {
            match token {
                "" => {}
                "-" => parsed.skip = true,
                "omitempty" => parsed.omit_empty = true,
                name => {
                    if parsed.name.is_none() {
                        parsed.name = Some(name);
                    }
                }
            }
        }
        parsed
    }
}
