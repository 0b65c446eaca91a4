use crate::dashboard::layout::UnsupportedPolicy;
use crate::dashboard::resolver::{DefaultResolver, DEFAULT_SPLIT_RIGHT_ACCOUNT_ID};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_version() -> u32 {
    1
}

fn default_split_right_account_id() -> String {
    DEFAULT_SPLIT_RIGHT_ACCOUNT_ID.to_string()
}

fn default_animate() -> bool {
    true
}

/// What a width change alone does to the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContextPolicy {
    /// Keep section membership, recompute layout hints only.
    RefreshLayout,
    /// Re-run the partition with the last module list.
    Repartition,
}

impl Default for ContextPolicy {
    fn default() -> Self {
        Self::RefreshLayout
    }
}

/// Dashboard settings stored in `dashboard.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Wallet account placed on the right of the split wallet area.
    #[serde(default = "default_split_right_account_id")]
    pub split_right_account_id: String,
    #[serde(default)]
    pub context_policy: ContextPolicy,
    /// Falls back to fail-fast in debug builds and full width in release
    /// builds when absent.
    #[serde(default)]
    pub unsupported_policy: Option<UnsupportedPolicy>,
    #[serde(default = "default_animate")]
    pub animate: bool,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            split_right_account_id: default_split_right_account_id(),
            context_policy: ContextPolicy::default(),
            unsupported_policy: None,
            animate: default_animate(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl DashboardSettings {
    /// Load settings from disk. A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: DashboardSettings = serde_json::from_str(&content)?;
        for w in settings.sanitize() {
            tracing::warn!("{w}");
        }
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Replace unusable values with defaults.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        let trimmed = self.split_right_account_id.trim();
        if trimmed.is_empty() {
            warnings.push(format!(
                "empty split_right_account_id replaced with '{DEFAULT_SPLIT_RIGHT_ACCOUNT_ID}'"
            ));
            self.split_right_account_id = default_split_right_account_id();
        } else if trimmed.len() != self.split_right_account_id.len() {
            self.split_right_account_id = trimmed.to_string();
        }
        if self.version != default_version() {
            warnings.push(format!(
                "dashboard settings version {} is not supported; reading as version {}",
                self.version,
                default_version()
            ));
            self.version = default_version();
        }
        warnings
    }

    pub fn path_for(base: &str) -> PathBuf {
        let base = Path::new(base);
        if base.is_dir() {
            base.join("dashboard.json")
        } else {
            PathBuf::from(base)
        }
    }

    pub fn resolver(&self) -> DefaultResolver {
        DefaultResolver::new(self.split_right_account_id.clone())
    }

    pub fn unsupported_policy(&self) -> UnsupportedPolicy {
        self.unsupported_policy.unwrap_or_default()
    }
}
