use serde::{Deserialize, Serialize};

/// Named area of the dashboard a module is routed into.
///
/// The derived ordering is the default render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticSection {
    Header,
    MainWalletNonSplit,
    MainWalletSplit,
    Footer,
}

impl SemanticSection {
    pub const ALL: [SemanticSection; 4] = [
        SemanticSection::Header,
        SemanticSection::MainWalletNonSplit,
        SemanticSection::MainWalletSplit,
        SemanticSection::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticSection::Header => "header",
            SemanticSection::MainWalletNonSplit => "main_wallet_non_split",
            SemanticSection::MainWalletSplit => "main_wallet_split",
            SemanticSection::Footer => "footer",
        }
    }
}

impl std::fmt::Display for SemanticSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
