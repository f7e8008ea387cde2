//! Document-level consolidation of entities sharing a normalized form.
//!
//! All mentions of the same software in a document describe the same thing:
//! disambiguation knowledge resolved for one mention and reference callouts
//! attached to one mention are shared with the others. Consolidation only
//! adds information; it never merges or removes entities.

use ahash::AHashMap;
use tracing::debug;

use mentis_common::Entity;

/// Share knowledge and reference callouts among entities with the same
/// normalized form.
pub fn consolidate(entities: &mut [Entity]) {
    let mut groups: AHashMap<String, Vec<usize>> = AHashMap::new();
    for (i, entity) in entities.iter().enumerate() {
        if entity.normalized_form.is_empty() {
            continue;
        }
        groups.entry(entity.normalized_form.clone()).or_default().push(i);
    }

    for (form, members) in groups {
        if members.len() < 2 {
            continue;
        }

        let knowledge = members
            .iter()
            .find_map(|&i| entities[i].knowledge.clone());
        let bib_refs = members
            .iter()
            .map(|&i| &entities[i].bib_refs)
            .find(|refs| !refs.is_empty())
            .cloned();

        if knowledge.is_none() && bib_refs.is_none() {
            continue;
        }
        debug!("consolidating {} mentions of {form:?}", members.len());

        for &i in &members {
            let entity = &mut entities[i];
            if entity.knowledge.is_none() {
                entity.knowledge = knowledge.clone();
            }
            if entity.bib_refs.is_empty() {
                if let Some(refs) = &bib_refs {
                    entity.bib_refs = refs.clone();
                }
            }
        }
    }
}
