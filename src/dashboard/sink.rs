use crate::dashboard::diff::MutationSequence;
use crate::dashboard::engine::LayoutSnapshot;
use crate::dashboard::error::ReplayError;
use crate::dashboard::structure::Structure;

/// Receiver of structural updates, typically a view layer.
///
/// Sequences arrive in the order they were computed and each one is only
/// valid against the state left by the previous one.
pub trait RenderSink {
    fn apply(&mut self, mutations: &MutationSequence, animate: bool);

    /// Layout hints changed without a membership change.
    fn relayout(&mut self, _layout: &LayoutSnapshot) {}
}

/// Sink that replays every sequence onto its own copy of the structure.
#[derive(Debug, Default)]
pub struct ReplicaSink {
    structure: Structure,
    applied: usize,
    animated: usize,
    last_layout: Option<LayoutSnapshot>,
    last_error: Option<ReplayError>,
}

impl ReplicaSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Sequences applied so far, and how many of them were animated.
    pub fn applied(&self) -> (usize, usize) {
        (self.applied, self.animated)
    }

    pub fn last_layout(&self) -> Option<&LayoutSnapshot> {
        self.last_layout.as_ref()
    }

    pub fn last_error(&self) -> Option<&ReplayError> {
        self.last_error.as_ref()
    }
}

impl RenderSink for ReplicaSink {
    fn apply(&mut self, mutations: &MutationSequence, animate: bool) {
        match mutations.apply_to(&self.structure) {
            Ok(next) => {
                self.structure = next;
                self.applied += 1;
                if animate {
                    self.animated += 1;
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "replica out of sync with engine");
                self.last_error = Some(err);
            }
        }
    }

    fn relayout(&mut self, layout: &LayoutSnapshot) {
        self.last_layout = Some(layout.clone());
    }
}
