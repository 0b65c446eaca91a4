use crate::dashboard::module::{Module, ModuleId};
use crate::dashboard::section::SemanticSection;
use serde::Serialize;

/// Position of an item: section index, then item index within the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub section: SemanticSection,
    pub items: Vec<Module>,
}

/// Ordered section to items mapping that is, or is about to be, on screen.
///
/// Built through [`StructureBuilder`], which keeps sections unique, drops
/// empty ones and preserves item append order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Structure {
    entries: Vec<SectionEntry>,
}

impl Structure {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    pub fn sections(&self) -> impl Iterator<Item = SemanticSection> + '_ {
        self.entries.iter().map(|e| e.section)
    }

    /// Section identity at a position.
    pub fn section_at(&self, index: usize) -> Option<SemanticSection> {
        self.entries.get(index).map(|e| e.section)
    }

    pub fn index_of(&self, section: SemanticSection) -> Option<usize> {
        self.entries.iter().position(|e| e.section == section)
    }

    pub fn items(&self, section: SemanticSection) -> &[Module] {
        self.entries
            .iter()
            .find(|e| e.section == section)
            .map(|e| e.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn item_at(&self, path: IndexPath) -> Option<&Module> {
        self.entries
            .get(path.section)
            .and_then(|e| e.items.get(path.item))
    }

    pub fn path_of(&self, id: &ModuleId) -> Option<IndexPath> {
        self.entries.iter().enumerate().find_map(|(s, entry)| {
            entry
                .items
                .iter()
                .position(|m| &m.id() == id)
                .map(|i| IndexPath::new(s, i))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.entries.iter().map(|e| e.items.len()).sum()
    }

    /// Crate-internal constructor for replayed structures; callers keep
    /// the invariants themselves.
    pub(crate) fn from_entries(entries: Vec<SectionEntry>) -> Self {
        Self { entries }
    }
}

/// Draft used while routing modules. Starts with every candidate section
/// and an empty item list for each.
#[derive(Debug)]
pub struct StructureBuilder {
    entries: Vec<SectionEntry>,
}

impl StructureBuilder {
    pub fn new(candidates: impl IntoIterator<Item = SemanticSection>) -> Self {
        let mut entries: Vec<SectionEntry> = Vec::new();
        for section in candidates {
            if entries.iter().any(|e| e.section == section) {
                tracing::debug!(%section, "duplicate candidate section ignored");
                continue;
            }
            entries.push(SectionEntry {
                section,
                items: Vec::new(),
            });
        }
        Self { entries }
    }

    /// Append `module` to `section`. Returns the module back when the
    /// section is not one of the candidates.
    pub fn append(&mut self, section: SemanticSection, module: Module) -> Result<(), Module> {
        match self.entries.iter_mut().find(|e| e.section == section) {
            Some(entry) => {
                entry.items.push(module);
                Ok(())
            }
            None => Err(module),
        }
    }

    pub fn build(mut self) -> Structure {
        self.entries.retain(|e| !e.items.is_empty());
        Structure {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_drops_empty_sections() {
        let mut builder = StructureBuilder::new(SemanticSection::ALL);
        builder
            .append(SemanticSection::Footer, Module::disclosures(["x"]))
            .unwrap();
        let structure = builder.build();
        assert_eq!(structure.len(), 1);
        assert_eq!(structure.section_at(0), Some(SemanticSection::Footer));
        assert_eq!(structure.section_at(1), None);
    }

    #[test]
    fn append_outside_candidates_is_rejected() {
        let mut builder = StructureBuilder::new([SemanticSection::Header]);
        let rejected = builder.append(SemanticSection::Footer, Module::greeting("hi"));
        assert_eq!(rejected, Err(Module::greeting("hi")));
    }

    #[test]
    fn duplicate_candidates_collapse() {
        let builder = StructureBuilder::new([SemanticSection::Header, SemanticSection::Header]);
        assert_eq!(builder.entries.len(), 1);
    }

    #[test]
    fn lookups() {
        let mut builder = StructureBuilder::new(SemanticSection::ALL);
        builder
            .append(SemanticSection::Header, Module::greeting("hi"))
            .unwrap();
        builder
            .append(SemanticSection::MainWalletSplit, Module::wallet("1"))
            .unwrap();
        builder
            .append(SemanticSection::MainWalletSplit, Module::wallet("2"))
            .unwrap();
        let structure = builder.build();

        assert_eq!(structure.index_of(SemanticSection::MainWalletSplit), Some(1));
        assert_eq!(structure.items(SemanticSection::Footer), &[] as &[Module]);
        assert_eq!(
            structure.path_of(&ModuleId::Wallet("2".into())),
            Some(IndexPath::new(1, 1))
        );
        assert_eq!(structure.item_at(IndexPath::new(0, 0)), Some(&Module::greeting("hi")));
        assert_eq!(structure.item_count(), 3);
    }
}
