use crate::constants::{DEFAULT_OUTPUT_SUFFIX, DEFAULT_PROGRESS_INTERVAL};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for combining a document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombineOptions {
    /// Report progress every N pairs (plus the first and last pair)
    pub progress_interval: usize,

    /// Flate-compress content streams when serializing
    pub compress_streams: bool,

    /// Fail on pages whose size differs from page 0 instead of warning
    pub strict_page_size: bool,

    /// Appended to the input file stem to name the output
    pub output_suffix: String,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            compress_streams: true,
            strict_page_size: false,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl CombineOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| StackError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StackError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.progress_interval == 0 {
            return Err(StackError::Config(
                "Progress interval must be at least 1".to_string(),
            ));
        }

        if self
            .output_suffix
            .chars()
            .any(|c| std::path::is_separator(c) || c.is_control())
        {
            return Err(StackError::Config(format!(
                "Output suffix {:?} must not contain path separators",
                self.output_suffix
            )));
        }

        Ok(())
    }

    /// Whether the pair numbered `completed` (1-based) should be reported
    pub fn should_report(&self, completed: usize, total: usize) -> bool {
        completed == 1 || completed == total || completed % self.progress_interval.max(1) == 0
    }
}
