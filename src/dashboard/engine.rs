use crate::dashboard::config::DashboardSettings;
use crate::dashboard::context::LayoutContext;
use crate::dashboard::diagnostics::{Diagnostics, DiagnosticsSnapshot};
use crate::dashboard::diff::{diff, MutationSequence};
use crate::dashboard::error::{Anomaly, LayoutError};
use crate::dashboard::layout::{ResolvedLayout, SectionLayout, SplitPlacement};
use crate::dashboard::module::{Module, ModuleId};
use crate::dashboard::resolver::{DefaultResolver, SectionResolver};
use crate::dashboard::section::SemanticSection;
use crate::dashboard::structure::{IndexPath, Structure, StructureBuilder};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Instant;

/// Result of [`SnapshotEngine::apply`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyOutcome {
    pub mutations: MutationSequence,
    /// False for the first adoption, which has nothing to animate from.
    pub animate: bool,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemLayout {
    pub id: ModuleId,
    pub placement: SplitPlacement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionLayoutEntry {
    pub section: SemanticSection,
    pub layout: SectionLayout,
    pub items: Vec<ItemLayout>,
}

/// Layout hints for every section and item of a structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutSnapshot {
    pub context: LayoutContext,
    pub sections: Vec<SectionLayoutEntry>,
}

/// Owns the structure currently on screen and turns new module lists into
/// mutation sequences against it.
pub struct SnapshotEngine {
    resolver: Box<dyn SectionResolver>,
    current: Structure,
    modules: Vec<Module>,
    context: LayoutContext,
    presented: bool,
    animate: bool,
    diagnostics: Diagnostics,
}

impl SnapshotEngine {
    pub fn new(resolver: Box<dyn SectionResolver>) -> Self {
        Self {
            resolver,
            current: Structure::empty(),
            modules: Vec::new(),
            context: LayoutContext::default(),
            presented: false,
            animate: true,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn from_settings(settings: &DashboardSettings) -> Self {
        let mut engine = Self::new(Box::new(settings.resolver()));
        engine.animate = settings.animate;
        engine
    }

    pub fn set_animate(&mut self, animate: bool) {
        self.animate = animate;
    }

    /// Partition `modules` for `ctx`, diff against the current structure and
    /// adopt the result.
    pub fn apply(&mut self, modules: Vec<Module>, ctx: LayoutContext) -> ApplyOutcome {
        let started = Instant::now();
        let (draft, anomalies) = self.build(&modules, &ctx);
        let mutations = diff(&self.current, &draft);
        let animate = self.presented && self.animate;

        for anomaly in &anomalies {
            self.record_anomaly(anomaly);
        }
        tracing::debug!(
            width = %ctx.width,
            modules = modules.len(),
            sections = draft.len(),
            mutations = mutations.len(),
            animate,
            "dashboard structure adopted"
        );

        self.current = draft;
        self.modules = modules;
        self.context = ctx;
        self.presented = true;
        self.diagnostics.record_apply(started, mutations.len());

        ApplyOutcome {
            mutations,
            animate,
            anomalies,
        }
    }

    fn build(&self, modules: &[Module], ctx: &LayoutContext) -> (Structure, Vec<Anomaly>) {
        let mut builder = StructureBuilder::new(self.resolver.candidate_sections(ctx));
        let mut anomalies = Vec::new();
        let mut seen: HashSet<ModuleId> = HashSet::new();

        for module in modules {
            let section = self.resolver.preferred_section(module, ctx);
            if self.resolver.section_layout(section, ctx) == SectionLayout::Unsupported {
                anomalies.push(Anomaly::UnsupportedSectionLayout {
                    module: module.kind(),
                    section,
                    width: ctx.width,
                });
                continue;
            }
            let id = module.id();
            if seen.contains(&id) {
                anomalies.push(Anomaly::DuplicateModule { id });
                continue;
            }
            if let Err(module) = builder.append(section, module.clone()) {
                // A resolver routing outside its own candidates is a bug in
                // that resolver; the module is skipped.
                tracing::error!(
                    kind = %module.kind(),
                    %section,
                    "preferred section is not a candidate section"
                );
                continue;
            }
            seen.insert(id);
        }

        (builder.build(), anomalies)
    }

    pub fn current_structure(&self) -> &Structure {
        &self.current
    }

    /// Module list behind the current structure, as last received.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn context(&self) -> LayoutContext {
        self.context
    }

    /// Adopt `ctx` for layout queries without touching section membership.
    ///
    /// Items left in a section that has no layout under `ctx` are reported
    /// as anomalies; [`SnapshotEngine::stranded_sections`] lets callers
    /// repartition instead.
    pub fn refresh_layout(&mut self, ctx: LayoutContext) -> LayoutSnapshot {
        if ctx != self.context {
            tracing::debug!(from = %self.context.width, to = %ctx.width, "layout context changed");
        }
        let stranded: Vec<Anomaly> = self
            .current
            .entries()
            .iter()
            .filter(|entry| {
                self.resolver.section_layout(entry.section, &ctx) == SectionLayout::Unsupported
            })
            .flat_map(|entry| {
                entry
                    .items
                    .iter()
                    .map(move |module| Anomaly::UnsupportedSectionLayout {
                        module: module.kind(),
                        section: entry.section,
                        width: ctx.width,
                    })
            })
            .collect();
        for anomaly in &stranded {
            self.record_anomaly(anomaly);
        }
        self.context = ctx;
        self.layout_snapshot()
    }

    /// Sections of the current structure with no valid layout under `ctx`.
    pub fn stranded_sections(&self, ctx: &LayoutContext) -> Vec<SemanticSection> {
        self.current
            .sections()
            .filter(|section| {
                self.resolver.section_layout(*section, ctx) == SectionLayout::Unsupported
            })
            .collect()
    }

    pub fn layout_snapshot(&self) -> LayoutSnapshot {
        let sections = self
            .current
            .entries()
            .iter()
            .map(|entry| SectionLayoutEntry {
                section: entry.section,
                layout: self.resolver.section_layout(entry.section, &self.context),
                items: entry
                    .items
                    .iter()
                    .map(|module| ItemLayout {
                        id: module.id(),
                        placement: self.resolver.item_split_placement(module),
                    })
                    .collect(),
            })
            .collect();
        LayoutSnapshot {
            context: self.context,
            sections,
        }
    }

    pub fn section_layout_at(&self, index: usize) -> Option<SectionLayout> {
        self.current
            .section_at(index)
            .map(|section| self.resolver.section_layout(section, &self.context))
    }

    pub fn item_layout_at(&self, path: IndexPath) -> Result<ResolvedLayout, LayoutError> {
        let section = self.current.section_at(path.section);
        let module = self.current.item_at(path);
        match (section, module) {
            (Some(section), Some(module)) => Ok(ResolvedLayout {
                section,
                width: self.context.width,
                section_layout: self.resolver.section_layout(section, &self.context),
                placement: self.resolver.item_split_placement(module),
            }),
            _ => Err(LayoutError::OutOfBounds {
                section: path.section,
                item: path.item,
            }),
        }
    }

    /// Count an anomaly noticed outside of `apply`.
    pub fn record_anomaly(&mut self, anomaly: &Anomaly) {
        tracing::warn!(%anomaly, "dashboard anomaly");
        self.diagnostics.record_anomaly(anomaly);
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }
}

impl Default for SnapshotEngine {
    fn default() -> Self {
        Self::new(Box::new(DefaultResolver::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::diff::Mutation;
    use crate::dashboard::error::AnomalyKind;

    fn sample() -> Vec<Module> {
        vec![
            Module::greeting("Hi"),
            Module::wallet("456"),
            Module::wallet("1"),
            Module::disclosures(["Not FDIC insured"]),
        ]
    }

    /// Routes wallets to the non-split area.
    struct NonSplitWallets;

    impl SectionResolver for NonSplitWallets {
        fn candidate_sections(&self, ctx: &LayoutContext) -> Vec<SemanticSection> {
            DefaultResolver::default().candidate_sections(ctx)
        }

        fn preferred_section(&self, module: &Module, ctx: &LayoutContext) -> SemanticSection {
            match module {
                Module::Wallet(_) => SemanticSection::MainWalletNonSplit,
                Module::Greeting(_) | Module::Snapshot(_) | Module::Disclosures(_) => {
                    DefaultResolver::default().preferred_section(module, ctx)
                }
            }
        }

        fn section_layout(&self, section: SemanticSection, ctx: &LayoutContext) -> SectionLayout {
            DefaultResolver::default().section_layout(section, ctx)
        }

        fn item_split_placement(&self, module: &Module) -> SplitPlacement {
            DefaultResolver::default().item_split_placement(module)
        }
    }

    #[test]
    fn first_apply_is_not_animated() {
        let mut engine = SnapshotEngine::default();
        let first = engine.apply(sample(), LayoutContext::regular());
        assert!(!first.animate);
        assert_eq!(first.mutations, MutationSequence::full_adoption(engine.current_structure()));

        let second = engine.apply(vec![Module::greeting("Hi")], LayoutContext::regular());
        assert!(second.animate);
    }

    #[test]
    fn animation_can_be_disabled() {
        let mut engine = SnapshotEngine::default();
        engine.set_animate(false);
        engine.apply(sample(), LayoutContext::regular());
        let outcome = engine.apply(Vec::new(), LayoutContext::regular());
        assert!(!outcome.animate);
    }

    #[test]
    fn reapply_is_a_no_op() {
        let mut engine = SnapshotEngine::default();
        engine.apply(sample(), LayoutContext::regular());
        let outcome = engine.apply(sample(), LayoutContext::regular());
        assert!(outcome.mutations.is_empty());
        assert!(outcome.anomalies.is_empty());
    }

    #[test]
    fn unsupported_routing_is_dropped_under_regular() {
        let mut engine = SnapshotEngine::new(Box::new(NonSplitWallets));
        let outcome = engine.apply(sample(), LayoutContext::regular());
        let structure = engine.current_structure();
        assert_eq!(structure.index_of(SemanticSection::MainWalletNonSplit), None);
        assert_eq!(structure.item_count(), 2);
        assert_eq!(outcome.anomalies.len(), 2);
        assert!(outcome
            .anomalies
            .iter()
            .all(|a| a.kind() == AnomalyKind::UnsupportedSectionLayout));
        assert_eq!(
            engine
                .diagnostics()
                .anomaly_count(AnomalyKind::UnsupportedSectionLayout),
            2
        );
    }

    #[test]
    fn unsupported_routing_allowed_when_compact() {
        let mut engine = SnapshotEngine::new(Box::new(NonSplitWallets));
        let outcome = engine.apply(sample(), LayoutContext::compact());
        assert!(outcome.anomalies.is_empty());
        assert_eq!(
            engine.current_structure().items(SemanticSection::MainWalletNonSplit).len(),
            2
        );
    }

    #[test]
    fn duplicate_identity_keeps_first() {
        let mut engine = SnapshotEngine::default();
        let outcome = engine.apply(
            vec![Module::wallet("1"), Module::wallet("2"), Module::wallet("1")],
            LayoutContext::regular(),
        );
        assert_eq!(
            outcome.anomalies,
            vec![Anomaly::DuplicateModule {
                id: ModuleId::Wallet("1".into())
            }]
        );
        let ids: Vec<ModuleId> = engine
            .current_structure()
            .items(SemanticSection::MainWalletSplit)
            .iter()
            .map(Module::id)
            .collect();
        assert_eq!(ids, vec![ModuleId::Wallet("1".into()), ModuleId::Wallet("2".into())]);
    }

    #[test]
    fn refresh_layout_keeps_membership() {
        let mut engine = SnapshotEngine::default();
        engine.apply(sample(), LayoutContext::regular());
        let before = engine.current_structure().clone();

        let layout = engine.refresh_layout(LayoutContext::compact());
        assert_eq!(engine.current_structure(), &before);
        assert!(layout
            .sections
            .iter()
            .all(|s| s.layout == SectionLayout::FullWidth));
        assert_eq!(engine.section_layout_at(1), Some(SectionLayout::FullWidth));

        engine.refresh_layout(LayoutContext::regular());
        assert_eq!(engine.section_layout_at(1), Some(SectionLayout::SplitEligible));
    }

    #[test]
    fn refresh_into_unsupported_layout_is_counted() {
        let mut engine = SnapshotEngine::new(Box::new(NonSplitWallets));
        engine.apply(sample(), LayoutContext::compact());
        assert!(engine.stranded_sections(&LayoutContext::compact()).is_empty());
        assert_eq!(
            engine.stranded_sections(&LayoutContext::regular()),
            vec![SemanticSection::MainWalletNonSplit]
        );

        let layout = engine.refresh_layout(LayoutContext::regular());
        assert!(layout
            .sections
            .iter()
            .any(|s| s.layout == SectionLayout::Unsupported));
        assert_eq!(
            engine
                .diagnostics()
                .anomaly_count(AnomalyKind::UnsupportedSectionLayout),
            2
        );
    }

    #[test]
    fn item_layout_queries_use_current_structure() {
        let mut engine = SnapshotEngine::default();
        engine.apply(sample(), LayoutContext::regular());

        let right = engine.item_layout_at(IndexPath::new(1, 0)).unwrap();
        assert_eq!(right.section, SemanticSection::MainWalletSplit);
        assert_eq!(right.section_layout, SectionLayout::SplitEligible);
        assert_eq!(right.placement, SplitPlacement::Right);

        assert_eq!(
            engine.item_layout_at(IndexPath::new(9, 0)),
            Err(LayoutError::OutOfBounds { section: 9, item: 0 })
        );
        assert_eq!(engine.section_layout_at(3), None);
    }

    #[test]
    fn emptying_deletes_prior_sections() {
        let mut engine = SnapshotEngine::default();
        engine.apply(sample(), LayoutContext::regular());
        let outcome = engine.apply(Vec::new(), LayoutContext::regular());
        assert!(engine.current_structure().is_empty());
        assert_eq!(outcome.mutations.len(), 3);
        assert!(outcome
            .mutations
            .iter()
            .all(|m| matches!(m, Mutation::DeleteSection { .. })));
    }
}
