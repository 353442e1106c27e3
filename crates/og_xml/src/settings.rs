use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use og_reflect::access::ExclusionRules;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::convert::TypeNameStyle;

// -----------------------------------------------------------------------------
// SerializerSettings

/// Configuration of a [`Serializer`](crate::Serializer).
///
/// Every field has a default, so a settings file only names what it changes.
///
/// # Examples
///
/// ```
/// use og_xml::SerializerSettings;
/// use og_xml::convert::TypeNameStyle;
///
/// let settings = SerializerSettings::from_ron(
///     r#"(
///         root_name: "Graph",
///         type_names: Short,
///         properties_to_ignore: { "app::Person": ["password"] },
///     )"#,
/// )
/// .unwrap();
///
/// assert_eq!(settings.root_name, "Graph");
/// assert_eq!(settings.type_names, TypeNameStyle::Short);
/// assert_eq!(settings.indent, Some(2));
/// assert!(settings.exclusion_rules().is_property_ignored("app::Person", "password"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerSettings {
    /// The name written on the root element.
    pub root_name: String,
    pub type_names: TypeNameStyle,
    /// Spaces per nesting level, `None` writes a single line.
    pub indent: Option<usize>,
    /// Property names to skip, per owner type. Derived types inherit them.
    pub properties_to_ignore: BTreeMap<String, Vec<String>>,
    /// Fields carrying one of these attributes are skipped.
    pub attributes_to_ignore: Vec<String>,
    /// Fail on container items that cannot be added back instead of
    /// dropping them with a warning.
    pub strict_containers: bool,
}

impl Default for SerializerSettings {
    fn default() -> Self {
        Self {
            root_name: String::from("Root"),
            type_names: TypeNameStyle::Full,
            indent: Some(2),
            properties_to_ignore: BTreeMap::new(),
            attributes_to_ignore: Vec::new(),
            strict_containers: false,
        }
    }
}

impl SerializerSettings {
    /// Reads settings written in RON.
    pub fn from_ron(text: &str) -> Result<Self, SettingsError> {
        ron::from_str(text).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String, SettingsError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SettingsError::Write(e.to_string()))
    }

    #[inline]
    pub fn with_root_name(mut self, name: &str) -> Self {
        self.root_name = String::from(name);
        self
    }

    #[inline]
    pub fn with_type_names(mut self, style: TypeNameStyle) -> Self {
        self.type_names = style;
        self
    }

    #[inline]
    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    #[inline]
    pub fn with_strict_containers(mut self, strict: bool) -> Self {
        self.strict_containers = strict;
        self
    }

    pub fn ignore_property(mut self, ty: &str, name: &str) -> Self {
        self.properties_to_ignore
            .entry(String::from(ty))
            .or_default()
            .push(String::from(name));
        self
    }

    pub fn ignore_attribute(mut self, name: &str) -> Self {
        self.attributes_to_ignore.push(String::from(name));
        self
    }

    /// Builds the exclusion rules the property accessor applies.
    pub fn exclusion_rules(&self) -> ExclusionRules {
        let mut rules = ExclusionRules::new();
        for (ty, names) in &self.properties_to_ignore {
            for name in names {
                rules.ignore_property(ty.as_str(), name);
            }
        }
        for name in &self.attributes_to_ignore {
            rules.ignore_attribute(name);
        }
        rules
    }
}

/// An error reading or writing [`SerializerSettings`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("invalid settings: {0}")]
    Parse(String),

    #[error("cannot write settings: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use super::{SerializerSettings, SettingsError};
    use crate::convert::TypeNameStyle;

    #[test]
    fn defaults_fill_missing_fields() {
        assert_eq!(
            SerializerSettings::from_ron("()").unwrap(),
            SerializerSettings::default()
        );
        let settings = SerializerSettings::from_ron("(indent: None, strict_containers: true)").unwrap();
        assert_eq!(settings.indent, None);
        assert!(settings.strict_containers);
        assert_eq!(settings.root_name, "Root");
    }

    #[test]
    fn written_settings_read_back() {
        let settings = SerializerSettings::default()
            .with_root_name("Graph")
            .with_type_names(TypeNameStyle::Short)
            .ignore_property("app::Person", "password")
            .ignore_attribute("NonSerialized");
        let text = settings.to_ron().unwrap();
        assert_eq!(SerializerSettings::from_ron(&text).unwrap(), settings);

        let rules = settings.exclusion_rules();
        assert!(rules.is_property_ignored("app::Person", "password"));
        assert!(!rules.is_property_ignored("app::Person", "name"));
    }

    #[test]
    fn invalid_settings() {
        assert!(matches!(
            SerializerSettings::from_ron("(type_names: Medium)"),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            SerializerSettings::from_ron("(unknown: 1"),
            Err(SettingsError::Parse(_))
        ));
    }
}
