//! Layered enable/disable policy for discovered plugins.
//!
//! One policy instance exists per plugin category. The wildcard entry of
//! the configured mapping supplies the category-wide default; per-name
//! overrides win outright.

use std::collections::HashMap;

/// Wildcard key standing in for "every plugin of this category".
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPolicy {
    default_enabled: bool,
    overrides: HashMap<String, bool>,
}

impl PluginPolicy {
    /// Policy with no wildcard and no overrides: everything is admitted.
    pub fn allow_all() -> Self {
        Self {
            default_enabled: true,
            overrides: HashMap::new(),
        }
    }

    /// Builds a policy from a name→enabled mapping. The wildcard entry is
    /// consumed as the category default; an absent wildcard means enabled.
    /// The remaining entries are per-name overrides.
    pub fn from_map(mut mapping: HashMap<String, bool>) -> Self {
        let default_enabled = mapping.remove(WILDCARD).unwrap_or(true);
        Self {
            default_enabled,
            overrides: mapping,
        }
    }

    /// Parses a comma-separated property string of `name` or `name=bool`
    /// tokens. A bare token enables the named plugin; the `*` token
    /// addresses the category default.
    pub fn parse(property: &str) -> Self {
        let mut mapping = HashMap::new();
        for token in property.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.split_once('=') {
                Some((name, value)) => {
                    mapping.insert(
                        name.trim().to_string(),
                        value.trim().eq_ignore_ascii_case("true"),
                    );
                }
                None => {
                    mapping.insert(token.to_string(), true);
                }
            }
        }
        Self::from_map(mapping)
    }

    pub fn default_enabled(&self) -> bool {
        self.default_enabled
    }

    /// An override for the name wins outright; otherwise the category
    /// default applies.
    pub fn admits(&self, name: &str) -> bool {
        self.overrides
            .get(name)
            .copied()
            .unwrap_or(self.default_enabled)
    }
}

impl Default for PluginPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}

impl<'de> serde::Deserialize<'de> for PluginPolicy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::Deserialize::deserialize(deserializer).map(Self::from_map)
    }
}
