use serde::{Deserialize, Serialize};

use crate::purity::{Markers, DEFAULT_MAX_CALL_DEPTH};

/// Root configuration structure for purecheck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PurityConfig {
    /// Marker annotation names
    pub markers: Markers,

    /// Additions to the built-in known-signature table
    pub signatures: SignatureConfig,

    /// Analysis limits
    pub analysis: AnalysisSettings,
}

/// Extra known-signature entries, by fully-qualified name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SignatureConfig {
    pub pure: Vec<String>,
    pub impure: Vec<String>,
    /// Namespace prefixes whose members are impure unless listed exactly
    pub impure_namespaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Longest call chain followed before a callee is treated as impure
    pub max_call_depth: usize,
    /// Analyze top-level functions in parallel
    pub parallel: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            parallel: true,
        }
    }
}

impl PurityConfig {
    // Pure function: Collect all validation results
    fn collect_validations(&self) -> Vec<Result<(), String>> {
        vec![
            Self::validate_marker(&self.markers.enforce_pure, "enforce_pure"),
            Self::validate_marker(&self.markers.allow_synchronization, "allow_synchronization"),
            Self::validate_call_depth(self.analysis.max_call_depth),
        ]
    }

    pub fn validate_marker(name: &str, key: &str) -> Result<(), String> {
        if name.trim().is_empty() {
            Err(format!("markers.{} must not be empty", key))
        } else {
            Ok(())
        }
    }

    pub fn validate_call_depth(depth: usize) -> Result<(), String> {
        if depth == 0 {
            Err("analysis.max_call_depth must be positive".to_string())
        } else {
            Ok(())
        }
    }

    /// Check the configuration, reporting the first problem found
    pub fn validate(&self) -> Result<(), String> {
        self.collect_validations().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PurityConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_call_depth_rejected() {
        let config = PurityConfig {
            analysis: AnalysisSettings {
                max_call_depth: 0,
                parallel: true,
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("max_call_depth"));
    }

    #[test]
    fn test_blank_marker_rejected() {
        let mut config = PurityConfig::default();
        config.markers.allow_synchronization = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("allow_synchronization"));
    }
}
