//! Tag and attribute names recognized by the resolver
//!
//! Options are a plain value handed to every resolution, so documents resolved
//! side by side never see each other's settings. They can be built in code or
//! loaded from a TOML file:
//!
//! ```toml
//! ext-point-tag = "slot-point"
//! extends-attr = "inherits"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or validating options
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read options file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse options TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("option '{option}' must not be empty")]
    Empty { option: &'static str },

    #[error("option '{option}' is not a valid tag or attribute name: '{value}'")]
    InvalidName { option: &'static str, value: String },

    #[error("options '{first}' and '{second}' must name different tags (both are '{value}')")]
    DuplicateTag {
        first: &'static str,
        second: &'static str,
        value: String,
    },
}

/// Configuration for template inheritance resolution
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ResolverOptions {
    /// Tag of a named placeholder in an ancestor template
    pub ext_point_tag: String,

    /// Tag of the container holding a descendant's overrides
    pub extensions_tag: String,

    /// Tag of a single override inside the container
    pub extension_tag: String,

    /// Attribute naming an extension point
    pub ext_point_name_attr: String,

    /// Attribute on an extension naming the point it fills
    pub ext_point_ref_attr: String,

    /// Template attribute marking a merged template whose open points stay visible
    pub extendable_attr: String,

    /// Template attribute holding the relative path of the ancestor document
    pub extends_attr: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            ext_point_tag: "extension-point".to_string(),
            extensions_tag: "extensions".to_string(),
            extension_tag: "extension".to_string(),
            ext_point_name_attr: "name".to_string(),
            ext_point_ref_attr: "point".to_string(),
            extendable_attr: "extendable".to_string(),
            extends_attr: "extends".to_string(),
        }
    }
}

impl ResolverOptions {
    /// Create options with the default names
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load options from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let options: ResolverOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_ext_point_tag(mut self, tag: impl Into<String>) -> Self {
        self.ext_point_tag = tag.into();
        self
    }

    pub fn with_extensions_tag(mut self, tag: impl Into<String>) -> Self {
        self.extensions_tag = tag.into();
        self
    }

    pub fn with_extension_tag(mut self, tag: impl Into<String>) -> Self {
        self.extension_tag = tag.into();
        self
    }

    pub fn with_ext_point_name_attr(mut self, attr: impl Into<String>) -> Self {
        self.ext_point_name_attr = attr.into();
        self
    }

    pub fn with_ext_point_ref_attr(mut self, attr: impl Into<String>) -> Self {
        self.ext_point_ref_attr = attr.into();
        self
    }

    pub fn with_extendable_attr(mut self, attr: impl Into<String>) -> Self {
        self.extendable_attr = attr.into();
        self
    }

    pub fn with_extends_attr(mut self, attr: impl Into<String>) -> Self {
        self.extends_attr = attr.into();
        self
    }

    /// Check that every name is usable in markup and the tags are distinct
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("ext-point-tag", &self.ext_point_tag),
            ("extensions-tag", &self.extensions_tag),
            ("extension-tag", &self.extension_tag),
            ("ext-point-name-attr", &self.ext_point_name_attr),
            ("ext-point-ref-attr", &self.ext_point_ref_attr),
            ("extendable-attr", &self.extendable_attr),
            ("extends-attr", &self.extends_attr),
        ];
        for (option, value) in names {
            validate_name(option, value)?;
        }

        let tags = &names[..3];
        for (i, (first, a)) in tags.iter().enumerate() {
            for (second, b) in &tags[i + 1..] {
                if a.eq_ignore_ascii_case(b) {
                    return Err(ConfigError::DuplicateTag {
                        first: *first,
                        second: *second,
                        value: a.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn validate_name(option: &'static str, value: &str) -> Result<(), ConfigError> {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return Err(ConfigError::Empty { option });
    };
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidName {
            option,
            value: value.to_string(),
        })
    }
}
