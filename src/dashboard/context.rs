use crate::dashboard::error::Anomaly;
use serde::{Deserialize, Deserializer, Serialize};

/// Horizontal size class the dashboard is laid out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthClass {
    Regular,
    Compact,
    /// Anything the host reported that is neither regular nor compact.
    Unspecified,
}

impl Default for WidthClass {
    fn default() -> Self {
        WidthClass::Compact
    }
}

impl WidthClass {
    pub fn try_parse(label: &str) -> Result<Self, Anomaly> {
        match label.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(WidthClass::Regular),
            "compact" => Ok(WidthClass::Compact),
            "unspecified" => Ok(WidthClass::Unspecified),
            _ => Err(Anomaly::MalformedContext {
                label: label.to_string(),
            }),
        }
    }

    /// Parse a host-supplied label. Unknown labels map to `Unspecified`
    /// and take the non-split layout branch.
    pub fn parse(label: &str) -> Self {
        Self::try_parse(label).unwrap_or_else(|anomaly| {
            tracing::warn!(%anomaly, "using default layout branch");
            WidthClass::Unspecified
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WidthClass::Regular => "regular",
            WidthClass::Compact => "compact",
            WidthClass::Unspecified => "unspecified",
        }
    }

    pub fn is_regular(&self) -> bool {
        matches!(self, WidthClass::Regular)
    }
}

impl std::fmt::Display for WidthClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WidthClass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(WidthClass::parse(&label))
    }
}

/// Viewing context supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutContext {
    #[serde(default)]
    pub width: WidthClass,
}

impl LayoutContext {
    pub const fn new(width: WidthClass) -> Self {
        Self { width }
    }

    pub const fn regular() -> Self {
        Self::new(WidthClass::Regular)
    }

    pub const fn compact() -> Self {
        Self::new(WidthClass::Compact)
    }
}
