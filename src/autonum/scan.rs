//! Seed computation: one read-only pass over everything that references the
//! target container.

use crate::error::Result;
use crate::host::ObjectModel;
use crate::model::TargetSpec;

/// Value contributed by an attribute whose text does not parse as an
/// integer. Legacy tie-break: non-numeric text counts as 1, never 0.
const UNPARSED_VALUE: i64 = 1;

/// Computes the first value the assigner should hand out: one greater than
/// the maximum value currently assigned under the target tag.
///
/// Per reference, the first attribute carrying the tag (case-insensitively)
/// is the one that counts. A container with no matching attributes reduces
/// to 0, so the seed is 1.
pub fn compute_seed<M: ObjectModel>(model: &M, spec: &TargetSpec) -> Result<i64> {
    let mut max_seen: i64 = 0;
    for attributes in model.references(spec.container())? {
        let Some(attr) = attributes.iter().find(|a| spec.matches_tag(&a.tag)) else {
            continue;
        };
        let value = attr.text.trim().parse::<i64>().unwrap_or(UNPARSED_VALUE);
        max_seen = max_seen.max(value);
    }
    Ok(max_seen + 1)
}
