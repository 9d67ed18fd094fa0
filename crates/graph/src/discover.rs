use crate::error::Result;
use crate::provider::SemanticModel;
use crate::types::Symbol;
use std::collections::HashSet;

/// Collect the explicitly declared members of every class in the unit.
///
/// Keeps provider order; repeated ids are dropped so downstream stages never
/// see the same member twice.
pub fn discover_members(model: &dyn SemanticModel) -> Result<Vec<Symbol>> {
    let declared = model.declared_members()?;
    let mut seen = HashSet::with_capacity(declared.len());
    let members: Vec<Symbol> = declared
        .into_iter()
        .filter(|symbol| seen.insert(symbol.id.clone()))
        .collect();

    log::debug!(
        "Discovered {} members in {}",
        members.len(),
        model.document()
    );

    Ok(members)
}
