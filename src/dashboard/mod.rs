pub mod config;
pub mod context;
pub mod diagnostics;
pub mod diff;
pub mod driver;
pub mod engine;
pub mod error;
pub mod layout;
pub mod module;
pub mod resolver;
pub mod section;
pub mod sink;
pub mod structure;

pub use config::{ContextPolicy, DashboardSettings};
pub use context::{LayoutContext, WidthClass};
pub use diff::{diff, Mutation, MutationSequence};
pub use driver::{DashboardEvent, Driver, Handled};
pub use engine::{ApplyOutcome, LayoutSnapshot, SnapshotEngine};
pub use error::{Anomaly, AnomalyKind, LayoutError, ReplayError};
pub use layout::{EffectiveLayout, ResolvedLayout, SectionLayout, SplitPlacement, UnsupportedPolicy};
pub use module::{Module, ModuleId, ModuleKind};
pub use resolver::{DefaultResolver, SectionResolver};
pub use section::SemanticSection;
pub use sink::{RenderSink, ReplicaSink};
pub use structure::{IndexPath, Structure, StructureBuilder};
