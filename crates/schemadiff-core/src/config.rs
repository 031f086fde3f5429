//! Diff configuration.

use serde::Deserialize;

pub use crate::migration::rename::RENAME_THRESHOLD;

/// Rename detection is on unless disabled.
pub const DEFAULT_DETECT_RENAMES: bool = true;

/// Options for a single [`diff`](crate::diff) call.
///
/// Can be loaded from JSON or TOML by a host tool; missing keys take their
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiffOptions {
    /// Pair removed and added fields into renames.
    pub detect_renames: bool,

    /// Populate `migration_strategies` in the result.
    pub include_strategies: bool,

    /// Attach a data migration hint to every change.
    pub generate_migration: bool,
}

impl DiffOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self {
            detect_renames: DEFAULT_DETECT_RENAMES,
            include_strategies: false,
            generate_migration: false,
        }
    }

    /// Options for a full analysis: strategies and migration hints included.
    pub fn full() -> Self {
        Self::new()
            .with_strategies(true)
            .with_migration(true)
    }

    /// Enable or disable rename detection.
    pub fn with_renames(mut self, enabled: bool) -> Self {
        self.detect_renames = enabled;
        self
    }

    /// Enable or disable strategy synthesis.
    pub fn with_strategies(mut self, enabled: bool) -> Self {
        self.include_strategies = enabled;
        self
    }

    /// Enable or disable migration hints.
    pub fn with_migration(mut self, enabled: bool) -> Self {
        self.generate_migration = enabled;
        self
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = DiffOptions::default();
        assert!(options.detect_renames);
        assert!(!options.include_strategies);
        assert!(!options.generate_migration);
    }

    #[test]
    fn test_options_builder() {
        let options = DiffOptions::new()
            .with_renames(false)
            .with_strategies(true);

        assert!(!options.detect_renames);
        assert!(options.include_strategies);
        assert!(!options.generate_migration);
    }

    #[test]
    fn test_full_options() {
        let options = DiffOptions::full();
        assert!(options.detect_renames);
        assert!(options.include_strategies);
        assert!(options.generate_migration);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: DiffOptions =
            serde_json::from_str(r#"{"includeStrategies": true}"#).unwrap();
        assert_eq!(options, DiffOptions::new().with_strategies(true));

        let empty: DiffOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DiffOptions::default());
    }
}
