//! Decoder configuration.

/// What to do when two fields of a schema share bits.
///
/// Fields placed at the running offset can never overlap; only clauses with an
/// explicit offset can produce an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OverlapPolicy {
    /// Accept the schema and log a warning.
    #[default]
    Allow,
    /// Fail with [crate::errors::SchemaError::OverlappingFields].
    Reject,
}

/// Options applied when building and using a [crate::decoder::Decoder].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    /// Verify every decoded value against the field's range.
    pub strict: bool,
    pub overlap: OverlapPolicy,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the range check on every decoded value.
    pub fn set_strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }

    pub fn set_overlap(&mut self, overlap: OverlapPolicy) -> &mut Self {
        self.overlap = overlap;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_permissive() {
        let config = DecoderConfig::default();
        assert!(!config.strict);
        assert_eq!(config.overlap, OverlapPolicy::Allow);
    }

    #[test]
    fn test_setters() {
        let mut config = DecoderConfig::new();
        config.set_strict(true).set_overlap(OverlapPolicy::Reject);
        assert!(config.strict);
        assert_eq!(config.overlap, OverlapPolicy::Reject);
    }
}
