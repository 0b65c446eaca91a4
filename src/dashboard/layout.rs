use crate::dashboard::context::WidthClass;
use crate::dashboard::error::LayoutError;
use crate::dashboard::section::SemanticSection;
use serde::{Deserialize, Serialize};

/// Section-level layout hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLayout {
    FullWidth,
    SplitEligible,
    /// The section has no valid rendering in the active context.
    Unsupported,
}

/// Item-level placement inside a split-eligible section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPlacement {
    Left,
    Right,
    None,
}

/// What a renderer does with a populated section whose layout is
/// [`SectionLayout::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedPolicy {
    FailFast,
    FullWidth,
}

impl Default for UnsupportedPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            UnsupportedPolicy::FailFast
        } else {
            UnsupportedPolicy::FullWidth
        }
    }
}

/// Final placement of an item once section and item hints are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveLayout {
    FullWidth,
    SplitLeft,
    SplitRight,
}

/// Layout hints resolved for one item position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedLayout {
    pub section: SemanticSection,
    pub width: WidthClass,
    pub section_layout: SectionLayout,
    pub placement: SplitPlacement,
}

impl ResolvedLayout {
    /// Combine the hints. Split placement only applies inside split-eligible
    /// sections; everywhere else the item spans the full width.
    pub fn effective(&self, policy: UnsupportedPolicy) -> Result<EffectiveLayout, LayoutError> {
        match self.section_layout {
            SectionLayout::FullWidth => Ok(EffectiveLayout::FullWidth),
            SectionLayout::SplitEligible => Ok(match self.placement {
                SplitPlacement::Left => EffectiveLayout::SplitLeft,
                SplitPlacement::Right => EffectiveLayout::SplitRight,
                SplitPlacement::None => EffectiveLayout::FullWidth,
            }),
            SectionLayout::Unsupported => match policy {
                UnsupportedPolicy::FailFast => Err(LayoutError::UnsupportedSection {
                    section: self.section,
                    width: self.width,
                }),
                UnsupportedPolicy::FullWidth => {
                    tracing::warn!(
                        section = %self.section,
                        width = %self.width,
                        "unsupported section rendered full width"
                    );
                    Ok(EffectiveLayout::FullWidth)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(section_layout: SectionLayout, placement: SplitPlacement) -> ResolvedLayout {
        ResolvedLayout {
            section: SemanticSection::MainWalletSplit,
            width: WidthClass::Regular,
            section_layout,
            placement,
        }
    }

    #[test]
    fn placement_ignored_outside_split_sections() {
        let layout = resolved(SectionLayout::FullWidth, SplitPlacement::Right);
        assert_eq!(
            layout.effective(UnsupportedPolicy::FailFast),
            Ok(EffectiveLayout::FullWidth)
        );
    }

    #[test]
    fn split_section_honors_placement() {
        let left = resolved(SectionLayout::SplitEligible, SplitPlacement::Left);
        let right = resolved(SectionLayout::SplitEligible, SplitPlacement::Right);
        let none = resolved(SectionLayout::SplitEligible, SplitPlacement::None);
        assert_eq!(left.effective(UnsupportedPolicy::FailFast), Ok(EffectiveLayout::SplitLeft));
        assert_eq!(right.effective(UnsupportedPolicy::FailFast), Ok(EffectiveLayout::SplitRight));
        assert_eq!(none.effective(UnsupportedPolicy::FailFast), Ok(EffectiveLayout::FullWidth));
    }

    #[test]
    fn unsupported_follows_policy() {
        let layout = resolved(SectionLayout::Unsupported, SplitPlacement::None);
        assert!(matches!(
            layout.effective(UnsupportedPolicy::FailFast),
            Err(LayoutError::UnsupportedSection { .. })
        ));
        assert_eq!(
            layout.effective(UnsupportedPolicy::FullWidth),
            Ok(EffectiveLayout::FullWidth)
        );
    }
}
