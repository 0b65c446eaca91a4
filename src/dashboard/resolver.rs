//! Routing of modules into sections and the layout hints for each.
//!
//! Everything here is a pure function of its arguments; the snapshot engine
//! owns all mutable state.

use crate::dashboard::context::{LayoutContext, WidthClass};
use crate::dashboard::layout::{SectionLayout, SplitPlacement};
use crate::dashboard::module::Module;
use crate::dashboard::section::SemanticSection;

/// Account id whose wallet card is placed on the right of a split section.
pub const DEFAULT_SPLIT_RIGHT_ACCOUNT_ID: &str = "456";

pub trait SectionResolver: Send + Sync {
    /// Every section the dashboard may show under `ctx`, in render order.
    fn candidate_sections(&self, ctx: &LayoutContext) -> Vec<SemanticSection>;

    /// Section `module` belongs to under `ctx`.
    fn preferred_section(&self, module: &Module, ctx: &LayoutContext) -> SemanticSection;

    fn section_layout(&self, section: SemanticSection, ctx: &LayoutContext) -> SectionLayout;

    /// Placement of an item inside a split-eligible section. Independent of
    /// context and position.
    fn item_split_placement(&self, module: &Module) -> SplitPlacement;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultResolver {
    split_right_account_id: String,
}

impl Default for DefaultResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SPLIT_RIGHT_ACCOUNT_ID)
    }
}

impl DefaultResolver {
    pub fn new(split_right_account_id: impl Into<String>) -> Self {
        Self {
            split_right_account_id: split_right_account_id.into(),
        }
    }

    pub fn split_right_account_id(&self) -> &str {
        &self.split_right_account_id
    }
}

impl SectionResolver for DefaultResolver {
    fn candidate_sections(&self, _ctx: &LayoutContext) -> Vec<SemanticSection> {
        SemanticSection::ALL.to_vec()
    }

    fn preferred_section(&self, module: &Module, _ctx: &LayoutContext) -> SemanticSection {
        match module {
            Module::Greeting(_) | Module::Snapshot(_) => SemanticSection::Header,
            Module::Wallet(_) => SemanticSection::MainWalletSplit,
            Module::Disclosures(_) => SemanticSection::Footer,
        }
    }

    fn section_layout(&self, section: SemanticSection, ctx: &LayoutContext) -> SectionLayout {
        match ctx.width {
            WidthClass::Regular => match section {
                SemanticSection::Header => SectionLayout::FullWidth,
                SemanticSection::MainWalletNonSplit => SectionLayout::Unsupported,
                SemanticSection::MainWalletSplit => SectionLayout::SplitEligible,
                SemanticSection::Footer => SectionLayout::FullWidth,
            },
            WidthClass::Compact | WidthClass::Unspecified => SectionLayout::FullWidth,
        }
    }

    fn item_split_placement(&self, module: &Module) -> SplitPlacement {
        match module {
            Module::Greeting(_) | Module::Snapshot(_) | Module::Disclosures(_) => {
                SplitPlacement::None
            }
            Module::Wallet(account) if account.account_id == self.split_right_account_id => {
                SplitPlacement::Right
            }
            Module::Wallet(_) => SplitPlacement::Left,
        }
    }
}
