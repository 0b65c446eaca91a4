use crate::dashboard::context::WidthClass;
use crate::dashboard::module::{ModuleId, ModuleKind};
use crate::dashboard::section::SemanticSection;
use crate::dashboard::structure::IndexPath;
use serde::Serialize;
use thiserror::Error;

/// Recoverable inconsistency met while building a structure.
///
/// Anomalies are logged and counted; the offending input is left out and
/// processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "anomaly", rename_all = "snake_case")]
pub enum Anomaly {
    #[error("{module} module routed to {section}, which has no layout for {width} width; dropped")]
    UnsupportedSectionLayout {
        module: ModuleKind,
        section: SemanticSection,
        width: WidthClass,
    },
    #[error("duplicate module {id}; later occurrence dropped")]
    DuplicateModule { id: ModuleId },
    #[error("unrecognized width class '{label}'")]
    MalformedContext { label: String },
}

impl Anomaly {
    pub fn kind(&self) -> AnomalyKind {
        match self {
            Anomaly::UnsupportedSectionLayout { .. } => AnomalyKind::UnsupportedSectionLayout,
            Anomaly::DuplicateModule { .. } => AnomalyKind::DuplicateModule,
            Anomaly::MalformedContext { .. } => AnomalyKind::MalformedContext,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    UnsupportedSectionLayout,
    DuplicateModule,
    MalformedContext,
}

/// Raised to a renderer that asks for the effective layout of a section
/// with no valid rendering in the active context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("section {section} has no valid layout for {width} width")]
    UnsupportedSection {
        section: SemanticSection,
        width: WidthClass,
    },
    #[error("no item at section {section}, item {item}")]
    OutOfBounds { section: usize, item: usize },
}

/// A mutation sequence replayed against a structure it was not computed
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("no section at index {index}")]
    SectionOutOfBounds { index: usize },
    #[error("no item at section {}, item {}", .path.section, .path.item)]
    ItemOutOfBounds { path: IndexPath },
    #[error("expected {expected} at section {}, item {}", .path.section, .path.item)]
    IdentityMismatch {
        expected: ModuleId,
        path: IndexPath,
    },
}
