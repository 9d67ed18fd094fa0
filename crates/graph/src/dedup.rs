use crate::types::SymbolRef;
use std::collections::HashSet;

/// Keep the first reference for every `(referencing, original)` pair.
///
/// Locations do not take part in identity, so several sites between the same
/// two members collapse into one edge.
#[must_use]
pub fn dedup_references(refs: Vec<SymbolRef>) -> Vec<SymbolRef> {
    let total = refs.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<SymbolRef> = refs
        .into_iter()
        .filter(|r| {
            let (referencing, original) = r.endpoints();
            seen.insert((referencing.clone(), original.clone()))
        })
        .collect();

    log::debug!("Deduplicated {} refs into {}", total, unique.len());
    unique
}
