//! Grouping of labeled spans into software-mention entities.
//!
//! The process anchors on software-name spans: one entity per name, in
//! document order, then every other component (version, creator, URL) is
//! attached to the nearest plausible anchor with a strong bias toward the
//! entity on the left. Components without any name anchor in the sequence
//! are dropped, as they carry no meaning alone.

use tracing::debug;

use mentis_common::{ComponentLabel, Entity, Span};

/// Decides whether a candidate component may replace an already-filled
/// entity slot. The replacement heuristic of the original system is not
/// specified; implementations can plug in distance or confidence based
/// policies.
pub trait SlotPolicy: Send + Sync {
    fn accepts(&self, existing: &Span, candidate: &Span) -> bool;
}

/// Conservative default: a filled slot is never replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepExisting;

impl SlotPolicy for KeepExisting {
    fn accepts(&self, _existing: &Span, _candidate: &Span) -> bool {
        false
    }
}

/// Distance factor favoring the left anchor when a component sits between
/// two names.
const LEFT_BIAS: usize = 2;

/// Group labeled spans into entities.
///
/// `normalize` derives each entity's normalized form from its raw name.
pub fn group(
    spans: &[Span],
    policy: &dyn SlotPolicy,
    normalize: &dyn Fn(&str) -> String,
) -> Vec<Entity> {
    // first pass: one entity per software name, in order
    let mut entities: Vec<Entity> = spans
        .iter()
        .filter(|s| s.label == ComponentLabel::Software)
        .map(|s| Entity::new(s.clone(), normalize(&s.raw_text)))
        .collect();
    if entities.is_empty() {
        return entities;
    }

    // second pass: attach the other components with a prev/curr walk over
    // the anchors
    let mut prev = 0usize;
    let mut curr = if entities.len() > 1 { Some(1usize) } else { None };

    for component in spans {
        if matches!(component.label, ComponentLabel::Software | ComponentLabel::Other) {
            continue;
        }

        while let Some(c) = curr {
            if component.start >= entities[c].name.end {
                prev = c;
                curr = if c + 1 < entities.len() { Some(c + 1) } else { None };
            } else {
                break;
            }
        }

        match curr {
            None => {
                try_attach(&mut entities[prev], component, policy);
            }
            Some(c) => {
                let curr_name_start = entities[c].name.start;
                let curr_name_end = entities[c].name.end;
                if component.end < entities[prev].name.start {
                    // fully before prev's own name: prev is still the
                    // nearest anchor, curr is even farther
                    try_attach(&mut entities[prev], component, policy);
                } else if component.end < curr_name_start {
                    // strictly between the two anchors: proximity decides,
                    // with the left-bias factor
                    let dist_curr = curr_name_start - component.end;
                    let dist_prev = component.start.saturating_sub(entities[prev].name.end);
                    if dist_prev <= dist_curr * LEFT_BIAS {
                        try_attach(&mut entities[prev], component, policy);
                    } else {
                        try_attach(&mut entities[c], component, policy);
                    }
                } else if component.end >= curr_name_end {
                    try_attach(&mut entities[c], component, policy);
                } else {
                    // overlapping curr's own name: attach to curr
                    try_attach(&mut entities[c], component, policy);
                }
            }
        }
    }
    entities
}

fn try_attach(entity: &mut Entity, component: &Span, policy: &dyn SlotPolicy) -> bool {
    match entity.slot(component.label) {
        None => {
            entity.set_slot(component.clone());
            true
        }
        Some(existing) => {
            if policy.accepts(existing, component) {
                entity.set_slot(component.clone());
                true
            } else {
                debug!(
                    "discarding {} component {:?}: slot already filled",
                    component.label.as_str(),
                    component.raw_text
                );
                false
            }
        }
    }
}
