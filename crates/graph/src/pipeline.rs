use crate::absorb::absorb_accessors;
use crate::assemble::GraphAssembler;
use crate::config::GraphConfig;
use crate::dedup::dedup_references;
use crate::discover::discover_members;
use crate::error::Result;
use crate::graph::MemberGraph;
use crate::provider::SemanticModel;
use crate::resolve::ReferenceResolver;
use crate::trim::{check_selection, trim, Selection};
use crate::types::SymbolRef;

/// Discover, resolve, absorb and deduplicate: the final reference set
pub fn collect_references(
    model: &dyn SemanticModel,
    config: &GraphConfig,
) -> Result<Vec<SymbolRef>> {
    let members = discover_members(model)?;
    let resolved = ReferenceResolver::new(model)
        .with_threads(config.resolver_threads)?
        .run(&members)?;
    let absorbed = absorb_accessors(resolved);
    let refs = dedup_references(absorbed);

    log::info!(
        "Collected {} member references from {} members in {}",
        refs.len(),
        members.len(),
        model.document()
    );

    Ok(refs)
}

/// Build the full member graph of one source unit
pub fn build_member_graph(model: &dyn SemanticModel, config: &GraphConfig) -> Result<MemberGraph> {
    let refs = collect_references(model, config)?;
    Ok(GraphAssembler::new(config.keying).assemble(&refs))
}

/// Owns the full graph across interactive selections.
///
/// Every selection trims a fresh copy; the full graph stays as built.
#[derive(Debug, Clone)]
pub struct ExplorerSession {
    full: MemberGraph,
}

impl ExplorerSession {
    #[must_use]
    pub const fn new(full: MemberGraph) -> Self {
        Self { full }
    }

    pub fn build(model: &dyn SemanticModel, config: &GraphConfig) -> Result<Self> {
        Ok(Self::new(build_member_graph(model, config)?))
    }

    #[must_use]
    pub const fn full_graph(&self) -> &MemberGraph {
        &self.full
    }

    /// Trimmed copy for `selection`; an empty seed set yields the full graph.
    ///
    /// Stop selectors are checked even when there are no seeds.
    pub fn select(&self, selection: &Selection) -> Result<MemberGraph> {
        check_selection(&self.full, selection)?;
        if selection.is_empty() {
            return Ok(self.full.clone());
        }
        trim(&self.full, selection)
    }

    #[must_use]
    pub fn into_full_graph(self) -> MemberGraph {
        self.full
    }
}
