use crate::types::InterpretationSet;

// -----------------------------------------------------------------------------
// ObjectToTreeConfig

/// Options for [`ObjectToTreeMapper`](crate::ObjectToTreeMapper).
///
/// All flags are off by default: absent fields and collection items are
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct ObjectToTreeConfig {
    /// Emit absent fields, map entries and collection items as `Null`.
    pub include_null_fields: bool,
    /// Emit absent collection and map items as `Null` even when
    /// `include_null_fields` is off.
    pub always_include_null_collection_elements: bool,
    /// Emit required fields even when `include_null_fields` is off.
    pub always_include_required: bool,
    pub enabled_interpretations: InterpretationSet,
}

impl ObjectToTreeConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_null_fields(mut self, value: bool) -> Self {
        self.include_null_fields = value;
        self
    }

    pub fn with_always_include_null_collection_elements(mut self, value: bool) -> Self {
        self.always_include_null_collection_elements = value;
        self
    }

    pub fn with_always_include_required(mut self, value: bool) -> Self {
        self.always_include_required = value;
        self
    }

    pub fn with_interpretation(mut self, name: impl Into<String>) -> Self {
        self.enabled_interpretations.insert(name);
        self
    }

    #[inline]
    pub(crate) fn includes_null_items(&self) -> bool {
        self.include_null_fields || self.always_include_null_collection_elements
    }
}

// -----------------------------------------------------------------------------
// TreeToObjectConfig

/// Options for [`TreeToObjectMapper`](crate::TreeToObjectMapper).
#[derive(Debug, Clone)]
pub struct TreeToObjectConfig {
    /// Ignore map keys that match no field of the target record.
    /// Defaults to `true`.
    pub allow_unknown_fields: bool,
    /// Convert out-of-range numbers with `as` casts instead of failing.
    /// Defaults to `false`.
    pub allow_lossy_numbers: bool,
    pub enabled_interpretations: InterpretationSet,
}

impl Default for TreeToObjectConfig {
    fn default() -> Self {
        Self {
            allow_unknown_fields: true,
            allow_lossy_numbers: false,
            enabled_interpretations: InterpretationSet::new(),
        }
    }
}

impl TreeToObjectConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_unknown_fields(mut self, value: bool) -> Self {
        self.allow_unknown_fields = value;
        self
    }

    pub fn with_allow_lossy_numbers(mut self, value: bool) -> Self {
        self.allow_lossy_numbers = value;
        self
    }

    pub fn with_interpretation(mut self, name: impl Into<String>) -> Self {
        self.enabled_interpretations.insert(name);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectToTreeConfig, TreeToObjectConfig};

    #[test]
    fn defaults_and_builders() {
        let config = ObjectToTreeConfig::new();
        assert!(!config.include_null_fields);
        assert!(!config.includes_null_items());

        let config = config
            .with_always_include_null_collection_elements(true)
            .with_interpretation("hex");
        assert!(config.includes_null_items());
        assert!(config.enabled_interpretations.contains("hex"));

        let config = TreeToObjectConfig::default();
        assert!(config.allow_unknown_fields);
        assert!(!config.allow_lossy_numbers);
    }
}
