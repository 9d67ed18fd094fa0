use crate::types::{Symbol, SymbolId, SymbolRef};
use std::collections::HashMap;

/// Fold accessor-level edges into their properties.
///
/// An edge `get_P -> M` (the accessor body uses `M`) paired with the
/// ownership link `P -> get_P` becomes `P -> M`. A property that uses a
/// method directly (`int Total => Compute();`) keeps that edge. Both source edges are
/// removed, so accessors vanish from the reference set. Surviving edges keep
/// their relative order; rewritten edges follow them.
#[must_use]
pub fn absorb_accessors(refs: Vec<SymbolRef>) -> Vec<SymbolRef> {
    let mut owners: HashMap<SymbolId, Vec<Symbol>> = HashMap::new();
    for reference in refs.iter().filter(|r| r.is_accessor_link()) {
        owners
            .entry(reference.original.id.clone())
            .or_default()
            .push(reference.referencing.clone());
    }

    let total = refs.len();
    let mut kept = Vec::with_capacity(total);
    let mut rewritten = Vec::new();

    for reference in refs {
        if reference.is_accessor_link() {
            continue;
        }

        match owners.get(&reference.referencing.id) {
            Some(properties) => {
                for property in properties {
                    rewritten.push(SymbolRef::new(
                        property.clone(),
                        reference.original.clone(),
                        reference.location.clone(),
                    ));
                }
            }
            None => kept.push(reference),
        }
    }

    log::debug!(
        "Absorbed accessors of {} properties: {} refs -> {} kept + {} rewritten",
        owners.len(),
        total,
        kept.len(),
        rewritten.len()
    );

    kept.extend(rewritten);
    kept
}
