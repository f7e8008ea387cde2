//! Attachment of bibliographical reference callouts to entities.
//!
//! A citation marker like "[12]" or "(Smith 2019)" directly following a
//! software mention almost always cites the software itself. Callouts are
//! attached when they start within a small gap after the mention's last
//! component; each attached callout extends the reach so chained markers
//! ("[12] [13]") all attach.

use tracing::debug;

use mentis_common::{BiblioRef, Entity, OffsetRange};

/// Attach reference callouts to the entities they follow.
///
/// Entity component offsets may be sentence-relative (after context
/// rebasing); `context_offset` shifts them back into the document-global
/// space the callouts live in. A callout attaches when it starts at most
/// `max_gap` characters after the entity's last component or after the
/// previously attached callout.
pub fn attach_refs(entities: &mut [Entity], bib_refs: &[BiblioRef], max_gap: usize) {
    if bib_refs.is_empty() {
        return;
    }
    let mut sorted: Vec<&BiblioRef> = bib_refs.iter().collect();
    sorted.sort_by_key(|r| (r.start, r.end));

    for entity in entities.iter_mut() {
        let shift = entity.context_offset.unwrap_or(0);
        let Some(mut anchor_end) = entity.components().map(|c| c.end + shift).max() else {
            continue;
        };

        for bib_ref in &sorted {
            if bib_ref.start < anchor_end {
                continue;
            }
            if bib_ref.start > anchor_end + max_gap {
                break;
            }
            debug!(
                "attaching reference {:?} to {:?}",
                bib_ref.raw_form, entity.name.raw_text
            );
            entity.bib_refs.push((*bib_ref).clone());
            anchor_end = bib_ref.end;
        }
        entity.bib_refs.sort_by_key(|r| (r.start, r.end));
    }
}

/// Null out version slots that are actually mis-tagged reference callouts.
///
/// When a callout interval falls entirely inside an entity's version span,
/// the tagger has absorbed the citation marker into the version; the
/// version is spurious and dropped.
pub fn filter_spurious_versions(entities: &mut [Entity], bib_refs: &[BiblioRef]) {
    if bib_refs.is_empty() {
        return;
    }
    for entity in entities.iter_mut() {
        let Some(version) = &entity.version else {
            continue;
        };
        let shift = entity.context_offset.unwrap_or(0);
        let global = OffsetRange::new(version.start + shift, version.end + shift);
        let spurious = bib_refs
            .iter()
            .any(|r| global.start <= r.start && r.end <= global.end);
        if spurious {
            debug!(
                "dropping version {:?} of {:?}: contains a reference callout",
                version.raw_text, entity.name.raw_text
            );
            entity.version = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentis_common::{ComponentLabel, Span};

    fn entity(name_start: usize, name_end: usize, context_offset: Option<usize>) -> Entity {
        let name = Span {
            label: ComponentLabel::Software,
            raw_text: "Tool".to_string(),
            start: name_start,
            end: name_end,
            doc_range: OffsetRange::new(name_start, name_end),
            token_range: OffsetRange::new(0, 1),
        };
        let mut e = Entity::new(name, "tool".to_string());
        e.context_offset = context_offset;
        e
    }

    fn bib_ref(key: usize, start: usize, end: usize) -> BiblioRef {
        BiblioRef {
            ref_key: key,
            start,
            end,
            raw_form: format!("[{key}]"),
        }
    }

    #[test]
    fn test_ref_within_gap_attaches() {
        let mut entities = vec![entity(0, 4, None)];
        let refs = vec![bib_ref(1, 9, 12)];
        attach_refs(&mut entities, &refs, 5);
        assert_eq!(entities[0].bib_refs.len(), 1);
        assert_eq!(entities[0].bib_refs[0].ref_key, 1);
    }

    #[test]
    fn test_ref_beyond_gap_ignored() {
        let mut entities = vec![entity(0, 4, None)];
        let refs = vec![bib_ref(1, 10, 13)];
        attach_refs(&mut entities, &refs, 5);
        assert!(entities[0].bib_refs.is_empty());
    }

    #[test]
    fn test_chained_refs_all_attach() {
        // "[1] [2]": the second starts 1 char after the first ends
        let mut entities = vec![entity(0, 4, None)];
        let refs = vec![bib_ref(1, 5, 8), bib_ref(2, 9, 12)];
        attach_refs(&mut entities, &refs, 5);
        assert_eq!(entities[0].bib_refs.len(), 2);
    }

    #[test]
    fn test_context_offset_shifts_anchor() {
        // name at [3,7) within its sentence, sentence starts at 100;
        // the callout at [108,111) is 1 char after the global name end
        let mut entities = vec![entity(3, 7, Some(100))];
        let refs = vec![bib_ref(4, 108, 111)];
        attach_refs(&mut entities, &refs, 5);
        assert_eq!(entities[0].bib_refs.len(), 1);
    }

    #[test]
    fn test_anchor_is_last_component() {
        // version ends after the name; the gap counts from the version
        let mut entities = vec![entity(0, 4, None)];
        entities[0].version = Some(Span {
            label: ComponentLabel::Version,
            raw_text: "2.0".to_string(),
            start: 5,
            end: 8,
            doc_range: OffsetRange::new(5, 8),
            token_range: OffsetRange::new(2, 3),
        });
        let refs = vec![bib_ref(7, 12, 15)];
        attach_refs(&mut entities, &refs, 5);
        assert_eq!(entities[0].bib_refs.len(), 1);
    }

    #[test]
    fn test_ref_before_anchor_never_attaches() {
        let mut entities = vec![entity(10, 14, None)];
        let refs = vec![bib_ref(1, 2, 5)];
        attach_refs(&mut entities, &refs, 5);
        assert!(entities[0].bib_refs.is_empty());
    }

    #[test]
    fn test_spurious_version_dropped() {
        let mut entities = vec![entity(0, 4, None)];
        entities[0].version = Some(Span {
            label: ComponentLabel::Version,
            raw_text: "[12]".to_string(),
            start: 5,
            end: 9,
            doc_range: OffsetRange::new(5, 9),
            token_range: OffsetRange::new(2, 5),
        });
        let refs = vec![bib_ref(12, 5, 9)];
        filter_spurious_versions(&mut entities, &refs);
        assert!(entities[0].version.is_none());
    }

    #[test]
    fn test_real_version_survives_filter() {
        let mut entities = vec![entity(0, 4, None)];
        entities[0].version = Some(Span {
            label: ComponentLabel::Version,
            raw_text: "3.4".to_string(),
            start: 5,
            end: 8,
            doc_range: OffsetRange::new(5, 8),
            token_range: OffsetRange::new(2, 3),
        });
        let refs = vec![bib_ref(12, 20, 24)];
        filter_spurious_versions(&mut entities, &refs);
        assert!(entities[0].version.is_some());
    }
}
