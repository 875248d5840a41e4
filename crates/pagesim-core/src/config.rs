//! Simulator configuration.
//!
//! A [`PagerConfig`] is fixed for the lifetime of a [`JobRegistry`](crate::JobRegistry).
//! It is either built in code with [`PagerConfig::new`] or loaded from a JSON file:
//!
//! ```json
//! { "page_size": 1024, "total_frames": 8, "policy": "scatter", "seed": 42 }
//! ```

use crate::error::Error as PagerError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Strategy used to pick free frames for a new job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Randomized selection from the free set, see [`Scatter`](crate::selector::Scatter)
    #[default]
    Scatter,
    /// Lowest free frame index first, see [`LowestFirst`](crate::selector::LowestFirst)
    LowestFirst,
}

/// Upper bound on the number of frames in one pool.
pub const MAX_TOTAL_FRAMES: usize = 1 << 20;

/// Immutable simulator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagerConfig {
    page_size: usize,
    total_frames: usize,
    policy: SelectionPolicy,
    seed: Option<u64>,
}

/// Unvalidated configuration as it appears in a config file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    page_size: i64,
    total_frames: i64,
    #[serde(default)]
    policy: SelectionPolicy,
    #[serde(default)]
    seed: Option<u64>,
}

impl PagerConfig {
    /// Creates a configuration using the default [`SelectionPolicy`] and no fixed seed.
    ///
    /// # Errors
    ///
    /// Returns [`PagerError::InvalidConfiguration`] if either value is not positive,
    /// if `total_frames` exceeds [`MAX_TOTAL_FRAMES`], or if the memory size
    /// `page_size * total_frames` overflows `usize`.
    pub fn new(page_size: i64, total_frames: i64) -> Result<Self, PagerError> {
        let invalid = PagerError::InvalidConfiguration {
            page_size,
            total_frames,
        };
        if page_size <= 0 || total_frames <= 0 {
            return Err(invalid);
        }
        let (Ok(page_size), Ok(total_frames)) = (usize::try_from(page_size), usize::try_from(total_frames)) else {
            return Err(invalid);
        };
        if total_frames > MAX_TOTAL_FRAMES || page_size.checked_mul(total_frames).is_none() {
            return Err(invalid);
        }
        Ok(PagerConfig {
            page_size,
            total_frames,
            policy: SelectionPolicy::default(),
            seed: None,
        })
    }

    /// Pins the seed of the randomized frame selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Selects the frame selection policy.
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bytes per page and per frame.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of frames in the pool.
    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Size of the simulated physical memory in bytes.
    ///
    /// Never overflows, [`PagerConfig::new`] rejects such configurations.
    pub fn memory_size(&self) -> usize {
        self.page_size * self.total_frames
    }

    /// Frame selection policy.
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Fixed seed for randomized selection, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// describes a non-positive page size or frame count.
    pub fn from_jsonfile(filepath: impl AsRef<Path>) -> Result<PagerConfig, ConfigError> {
        let mut file = File::open(filepath.as_ref())?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let raw: RawConfig = serde_json::from_str(&contents)?;
        Ok(raw.validate()?)
    }
}

impl RawConfig {
    fn validate(self) -> Result<PagerConfig, PagerError> {
        let mut config = PagerConfig::new(self.page_size, self.total_frames)?.with_policy(self.policy);
        config.seed = self.seed;
        Ok(config)
    }
}

impl<'de> Deserialize<'de> for PagerConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawConfig::deserialize(deserializer)?
            .validate()
            .map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when loading a configuration file.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] PagerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_values() {
        assert_eq!(
            PagerConfig::new(0, 4),
            Err(PagerError::InvalidConfiguration {
                page_size: 0,
                total_frames: 4
            })
        );
        assert!(PagerConfig::new(1024, -1).is_err());
        assert!(PagerConfig::new(1, 1).is_ok());
    }

    #[test]
    fn test_rejects_unrepresentable_memory() {
        let too_large = PagerConfig::new(i64::MAX, 4);
        assert_eq!(
            too_large,
            Err(PagerError::InvalidConfiguration {
                page_size: i64::MAX,
                total_frames: 4
            })
        );
        assert!(PagerConfig::new(1, i64::MAX).is_err());
        assert!(PagerConfig::new(1, MAX_TOTAL_FRAMES as i64 + 1).is_err());

        let largest_pages = PagerConfig::new(i64::MAX / 4, 4).expect("fits in usize");
        assert_eq!(largest_pages.memory_size(), (i64::MAX / 4) as usize * 4);
        let most_frames = PagerConfig::new(1, MAX_TOTAL_FRAMES as i64).expect("frame limit is inclusive");
        assert_eq!(most_frames.memory_size(), MAX_TOTAL_FRAMES);
    }

    #[test]
    fn test_memory_size() {
        let config = PagerConfig::new(100, 2).expect("valid config");
        assert_eq!(config.memory_size(), 200);
        assert_eq!(config.policy(), SelectionPolicy::Scatter);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_deserialize() {
        let config: PagerConfig =
            serde_json::from_str(r#"{"page_size": 4096, "total_frames": 16, "policy": "lowest-first", "seed": 3}"#)
                .expect("valid json");
        assert_eq!(config.page_size(), 4096);
        assert_eq!(config.total_frames(), 16);
        assert_eq!(config.policy(), SelectionPolicy::LowestFirst);
        assert_eq!(config.seed(), Some(3));

        let invalid = serde_json::from_str::<PagerConfig>(r#"{"page_size": 0, "total_frames": 16}"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_from_jsonfile() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("pagesim-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"page_size": 512, "total_frames": 3}"#)?;
        let config = PagerConfig::from_jsonfile(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(config.memory_size(), 1536);

        let missing = PagerConfig::from_jsonfile(path.with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
        Ok(())
    }

    #[test]
    fn test_from_jsonfile_invalid() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("pagesim-invalid-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"page_size": -5, "total_frames": 3}"#)?;
        let result = PagerConfig::from_jsonfile(&path);
        std::fs::remove_file(&path)?;
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(PagerError::InvalidConfiguration { .. }))
        ));
        Ok(())
    }
}
