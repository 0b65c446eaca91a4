//! Structural diff between two [`Structure`]s.
//!
//! Mutations use batch semantics: deletes and move sources are old
//! positions, inserts, move targets and reloads are new positions. A sink
//! removes everything first, then inserts in ascending order, which is
//! what [`MutationSequence::apply_to`] does.

use crate::dashboard::error::ReplayError;
use crate::dashboard::module::{Module, ModuleId};
use crate::dashboard::section::SemanticSection;
use crate::dashboard::structure::{IndexPath, SectionEntry, Structure};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    DeleteSection {
        section: SemanticSection,
        index: usize,
    },
    DeleteItem {
        id: ModuleId,
        at: IndexPath,
    },
    InsertSection {
        section: SemanticSection,
        index: usize,
        items: Vec<Module>,
    },
    InsertItem {
        module: Module,
        at: IndexPath,
    },
    MoveSection {
        section: SemanticSection,
        from: usize,
        to: usize,
    },
    MoveItem {
        id: ModuleId,
        from: IndexPath,
        to: IndexPath,
    },
    /// Same entity, new content.
    ReloadItem {
        module: Module,
        at: IndexPath,
    },
}

/// Ordered mutations turning one rendering into the next.
///
/// Order: section deletes (descending), item deletes (descending), section
/// inserts (ascending), item inserts (ascending), section moves, item moves,
/// reloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MutationSequence {
    mutations: Vec<Mutation>,
}

impl MutationSequence {
    /// Sequence that builds `structure` from nothing.
    pub fn full_adoption(structure: &Structure) -> Self {
        diff(&Structure::empty(), structure)
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mutation> {
        self.mutations.iter()
    }

    pub fn as_slice(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Replay the batch on a copy of `base`, the structure it was computed
    /// against.
    pub fn apply_to(&self, base: &Structure) -> Result<Structure, ReplayError> {
        let old = base.entries();
        let mut removed_items: HashSet<IndexPath> = HashSet::new();
        let mut removed_sections: HashSet<usize> = HashSet::new();
        let mut section_inserts: Vec<(usize, SectionEntry)> = Vec::new();
        let mut item_inserts: Vec<(IndexPath, Module)> = Vec::new();
        let mut moved_sections: Vec<(usize, usize)> = Vec::new();
        let mut reloads: Vec<(IndexPath, &Module)> = Vec::new();

        for mutation in &self.mutations {
            match mutation {
                Mutation::DeleteSection { index, .. } => {
                    check_section(old, *index)?;
                    removed_sections.insert(*index);
                }
                Mutation::DeleteItem { id, at } => {
                    check_item(old, *at, id)?;
                    removed_items.insert(*at);
                }
                Mutation::InsertSection {
                    section,
                    index,
                    items,
                } => section_inserts.push((
                    *index,
                    SectionEntry {
                        section: *section,
                        items: items.clone(),
                    },
                )),
                Mutation::InsertItem { module, at } => item_inserts.push((*at, module.clone())),
                Mutation::MoveSection { from, to, .. } => {
                    check_section(old, *from)?;
                    removed_sections.insert(*from);
                    moved_sections.push((*from, *to));
                }
                Mutation::MoveItem { id, from, to } => {
                    let module = check_item(old, *from, id)?;
                    removed_items.insert(*from);
                    item_inserts.push((*to, module.clone()));
                }
                Mutation::ReloadItem { module, at } => reloads.push((*at, module)),
            }
        }

        let mut remaining: Vec<SectionEntry> = old
            .iter()
            .enumerate()
            .map(|(s, entry)| SectionEntry {
                section: entry.section,
                items: entry
                    .items
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !removed_items.contains(&IndexPath::new(s, *i)))
                    .map(|(_, m)| m.clone())
                    .collect(),
            })
            .collect();

        for (from, to) in moved_sections {
            section_inserts.push((to, remaining[from].clone()));
        }
        let mut entries: Vec<SectionEntry> = remaining
            .drain(..)
            .enumerate()
            .filter(|(s, _)| !removed_sections.contains(s))
            .map(|(_, entry)| entry)
            .collect();

        section_inserts.sort_by_key(|(index, _)| *index);
        for (index, entry) in section_inserts {
            if index > entries.len() {
                return Err(ReplayError::SectionOutOfBounds { index });
            }
            entries.insert(index, entry);
        }

        item_inserts.sort_by_key(|(at, _)| *at);
        for (at, module) in item_inserts {
            let entry = entries
                .get_mut(at.section)
                .ok_or(ReplayError::SectionOutOfBounds { index: at.section })?;
            if at.item > entry.items.len() {
                return Err(ReplayError::ItemOutOfBounds { path: at });
            }
            entry.items.insert(at.item, module);
        }

        for (at, module) in reloads {
            let slot = entries
                .get_mut(at.section)
                .and_then(|entry| entry.items.get_mut(at.item))
                .ok_or(ReplayError::ItemOutOfBounds { path: at })?;
            if slot.id() != module.id() {
                return Err(ReplayError::IdentityMismatch {
                    expected: module.id(),
                    path: at,
                });
            }
            *slot = module.clone();
        }

        Ok(Structure::from_entries(entries))
    }
}

impl<'a> IntoIterator for &'a MutationSequence {
    type Item = &'a Mutation;
    type IntoIter = std::slice::Iter<'a, Mutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.iter()
    }
}

fn check_section(old: &[SectionEntry], index: usize) -> Result<(), ReplayError> {
    if index < old.len() {
        Ok(())
    } else {
        Err(ReplayError::SectionOutOfBounds { index })
    }
}

fn check_item<'a>(
    old: &'a [SectionEntry],
    at: IndexPath,
    id: &ModuleId,
) -> Result<&'a Module, ReplayError> {
    let module = old
        .get(at.section)
        .and_then(|entry| entry.items.get(at.item))
        .ok_or(ReplayError::ItemOutOfBounds { path: at })?;
    if &module.id() != id {
        return Err(ReplayError::IdentityMismatch {
            expected: id.clone(),
            path: at,
        });
    }
    Ok(module)
}

/// Compute the mutations turning `old` into `new`.
///
/// Item identities must be unique within each structure. Moves are kept
/// to a minimum: entities whose relative order is unchanged stay put.
pub fn diff(old: &Structure, new: &Structure) -> MutationSequence {
    let old_entries = old.entries();
    let new_entries = new.entries();

    let old_section_index: HashMap<SemanticSection, usize> = old_entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.section, i))
        .collect();
    let new_section_index: HashMap<SemanticSection, usize> = new_entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.section, i))
        .collect();
    let kept = |section: SemanticSection| {
        old_section_index.contains_key(&section) && new_section_index.contains_key(&section)
    };

    let old_paths = paths_by_id(old_entries);
    let new_paths = paths_by_id(new_entries);
    // Present on both sides, in sections that exist on both sides.
    let stays = |id: &ModuleId| match (old_paths.get(id), new_paths.get(id)) {
        (Some(from), Some(to)) => {
            kept(old_entries[from.section].section) && kept(new_entries[to.section].section)
        }
        _ => false,
    };

    let mut section_deletes = Vec::new();
    for (index, entry) in old_entries.iter().enumerate().rev() {
        if !new_section_index.contains_key(&entry.section) {
            section_deletes.push(Mutation::DeleteSection {
                section: entry.section,
                index,
            });
        }
    }

    let mut item_deletes = Vec::new();
    for (s, entry) in old_entries.iter().enumerate().rev() {
        if !kept(entry.section) {
            continue;
        }
        for (i, module) in entry.items.iter().enumerate().rev() {
            let id = module.id();
            if !stays(&id) {
                item_deletes.push(Mutation::DeleteItem {
                    id,
                    at: IndexPath::new(s, i),
                });
            }
        }
    }

    let mut section_inserts = Vec::new();
    let mut item_inserts = Vec::new();
    let mut section_moves = Vec::new();
    let mut item_moves: Vec<(IndexPath, ModuleId, IndexPath)> = Vec::new();
    let mut reloads = Vec::new();

    let kept_sections: Vec<(SemanticSection, usize, usize)> = new_entries
        .iter()
        .enumerate()
        .filter_map(|(to, e)| {
            old_section_index
                .get(&e.section)
                .map(|from| (e.section, *from, to))
        })
        .collect();
    let section_anchors =
        longest_increasing(&kept_sections.iter().map(|(_, from, _)| *from).collect::<Vec<_>>());
    for ((section, from, to), anchored) in kept_sections.iter().zip(section_anchors) {
        if !anchored {
            section_moves.push(Mutation::MoveSection {
                section: *section,
                from: *from,
                to: *to,
            });
        }
    }

    for (s, entry) in new_entries.iter().enumerate() {
        if !kept(entry.section) {
            section_inserts.push(Mutation::InsertSection {
                section: entry.section,
                index: s,
                items: entry.items.clone(),
            });
            continue;
        }

        let mut same_section: Vec<(usize, usize)> = Vec::new();
        for (i, module) in entry.items.iter().enumerate() {
            let id = module.id();
            let at = IndexPath::new(s, i);
            if !stays(&id) {
                item_inserts.push(Mutation::InsertItem {
                    module: module.clone(),
                    at,
                });
                continue;
            }
            let from = old_paths[&id];
            if old_entries[from.section].items[from.item] != *module {
                reloads.push(Mutation::ReloadItem {
                    module: module.clone(),
                    at,
                });
            }
            if old_entries[from.section].section == entry.section {
                same_section.push((i, from.item));
            } else {
                item_moves.push((at, id, from));
            }
        }

        let anchors =
            longest_increasing(&same_section.iter().map(|(_, from)| *from).collect::<Vec<_>>());
        let old_s = old_section_index[&entry.section];
        for ((i, from), anchored) in same_section.into_iter().zip(anchors) {
            if !anchored {
                item_moves.push((
                    IndexPath::new(s, i),
                    entry.items[i].id(),
                    IndexPath::new(old_s, from),
                ));
            }
        }
    }
    item_moves.sort_by_key(|(to, _, _)| *to);

    let mut mutations = section_deletes;
    mutations.append(&mut item_deletes);
    mutations.append(&mut section_inserts);
    mutations.append(&mut item_inserts);
    mutations.append(&mut section_moves);
    mutations.extend(
        item_moves
            .into_iter()
            .map(|(to, id, from)| Mutation::MoveItem { id, from, to }),
    );
    mutations.append(&mut reloads);
    MutationSequence { mutations }
}

fn paths_by_id(entries: &[SectionEntry]) -> HashMap<ModuleId, IndexPath> {
    let mut paths = HashMap::new();
    for (s, entry) in entries.iter().enumerate() {
        for (i, module) in entry.items.iter().enumerate() {
            paths.insert(module.id(), IndexPath::new(s, i));
        }
    }
    paths
}

/// Membership mask of one longest strictly increasing subsequence.
fn longest_increasing(seq: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];
    for (i, &value) in seq.iter().enumerate() {
        let pos = tails.partition_point(|&t| seq[t] < value);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }
    let mut mask = vec![false; seq.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        mask[i] = true;
        cursor = prev[i];
    }
    mask
}
