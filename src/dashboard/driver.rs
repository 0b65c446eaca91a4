use crate::dashboard::config::{ContextPolicy, DashboardSettings};
use crate::dashboard::context::{LayoutContext, WidthClass};
use crate::dashboard::engine::{ApplyOutcome, LayoutSnapshot, SnapshotEngine};
use crate::dashboard::module::Module;
use crate::dashboard::sink::RenderSink;
use serde::{Deserialize, Serialize};

/// Input from the module feed or the context source.
///
/// A `context_changed` event read from JSON whose width label is not
/// recognised becomes [`DashboardEvent::WidthLabel`], so it is counted like
/// any other malformed context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "snake_case",
    from = "EventRecord"
)]
pub enum DashboardEvent {
    /// Complete replacement module list.
    Modules(Vec<Module>),
    ContextChanged(LayoutContext),
    /// Width reported as a raw host label.
    WidthLabel(String),
}

#[derive(Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
enum EventRecord {
    Modules(Vec<Module>),
    ContextChanged(ContextRecord),
    WidthLabel(String),
}

#[derive(Deserialize)]
struct ContextRecord {
    #[serde(default)]
    width: Option<String>,
}

impl From<EventRecord> for DashboardEvent {
    fn from(record: EventRecord) -> Self {
        match record {
            EventRecord::Modules(modules) => DashboardEvent::Modules(modules),
            EventRecord::WidthLabel(label) => DashboardEvent::WidthLabel(label),
            EventRecord::ContextChanged(ContextRecord { width: None }) => {
                DashboardEvent::ContextChanged(LayoutContext::default())
            }
            EventRecord::ContextChanged(ContextRecord { width: Some(label) }) => {
                match WidthClass::try_parse(&label) {
                    Ok(width) => DashboardEvent::ContextChanged(LayoutContext::new(width)),
                    Err(_) => DashboardEvent::WidthLabel(label),
                }
            }
        }
    }
}

/// What handling one event did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Handled {
    Applied(ApplyOutcome),
    Relayout(LayoutSnapshot),
    Unchanged,
}

/// Serialised intake in front of a [`SnapshotEngine`].
///
/// Events are handled one at a time in arrival order and the sink has
/// received the full result of an event before the next one is looked at.
pub struct Driver<S: RenderSink> {
    engine: SnapshotEngine,
    sink: S,
    policy: ContextPolicy,
}

impl<S: RenderSink> Driver<S> {
    pub fn new(engine: SnapshotEngine, sink: S, policy: ContextPolicy) -> Self {
        Self {
            engine,
            sink,
            policy,
        }
    }

    pub fn from_settings(settings: &DashboardSettings, sink: S) -> Self {
        Self::new(
            SnapshotEngine::from_settings(settings),
            sink,
            settings.context_policy,
        )
    }

    pub fn handle(&mut self, event: DashboardEvent) -> Handled {
        match event {
            DashboardEvent::Modules(modules) => {
                let ctx = self.engine.context();
                Handled::Applied(self.apply(modules, ctx))
            }
            DashboardEvent::ContextChanged(ctx) => self.context_changed(ctx),
            DashboardEvent::WidthLabel(label) => self.handle_width_label(&label),
        }
    }

    /// Context change reported as a raw width label. Unknown labels are
    /// counted as anomalies and take the default layout branch.
    pub fn handle_width_label(&mut self, label: &str) -> Handled {
        let width = WidthClass::try_parse(label).unwrap_or_else(|anomaly| {
            self.engine.record_anomaly(&anomaly);
            WidthClass::Unspecified
        });
        self.context_changed(LayoutContext::new(width))
    }

    /// Handle every event from `events`, e.g. an `mpsc::Receiver`, until it
    /// is exhausted.
    pub fn run<I>(&mut self, events: I) -> Vec<Handled>
    where
        I: IntoIterator<Item = DashboardEvent>,
    {
        events.into_iter().map(|event| self.handle(event)).collect()
    }

    fn context_changed(&mut self, ctx: LayoutContext) -> Handled {
        if ctx == self.engine.context() {
            tracing::debug!(width = %ctx.width, "context unchanged");
            return Handled::Unchanged;
        }
        match self.policy {
            ContextPolicy::RefreshLayout if !self.engine.stranded_sections(&ctx).is_empty() => {
                tracing::debug!(width = %ctx.width, "sections lose their layout; repartitioning");
                let modules = self.engine.modules().to_vec();
                Handled::Applied(self.apply(modules, ctx))
            }
            ContextPolicy::RefreshLayout => {
                let layout = self.engine.refresh_layout(ctx);
                self.sink.relayout(&layout);
                Handled::Relayout(layout)
            }
            ContextPolicy::Repartition => {
                let modules = self.engine.modules().to_vec();
                Handled::Applied(self.apply(modules, ctx))
            }
        }
    }

    fn apply(&mut self, modules: Vec<Module>, ctx: LayoutContext) -> ApplyOutcome {
        let outcome = self.engine.apply(modules, ctx);
        if !outcome.mutations.is_empty() {
            self.sink.apply(&outcome.mutations, outcome.animate);
        }
        self.sink.relayout(&self.engine.layout_snapshot());
        outcome
    }

    pub fn engine(&self) -> &SnapshotEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (SnapshotEngine, S) {
        (self.engine, self.sink)
    }
}
