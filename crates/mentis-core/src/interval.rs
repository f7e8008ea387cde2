//! Half-open interval bookkeeping for already-annotated document regions.
//!
//! Propagation must not re-annotate text covered by a directly tagged
//! component, so every accepted span registers its document-global range
//! here and every candidate match is tested first. Pure functions over a
//! caller-owned list; no other state.

use mentis_common::OffsetRange;

/// True if `candidate` shares an endpoint with, partially or fully contains,
/// or is contained by any registered interval.
///
/// Deliberately conservative: two intervals that merely touch at a boundary
/// count as overlapping, so propagation never annotates text flush against
/// an existing component.
pub fn overlaps(occupied: &[OffsetRange], candidate: OffsetRange) -> bool {
    for taken in occupied {
        if taken.start == candidate.start || taken.end == candidate.end {
            return true;
        }
        if candidate.start <= taken.start && taken.start <= candidate.end {
            return true;
        }
        if taken.start <= candidate.start && candidate.start <= taken.end {
            return true;
        }
    }
    false
}

/// Register an interval as occupied.
pub fn register(occupied: &mut Vec<OffsetRange>, interval: OffsetRange) {
    occupied.push(interval);
}
