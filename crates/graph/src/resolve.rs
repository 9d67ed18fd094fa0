use crate::error::Result;
use crate::provider::{SearchScope, SemanticModel};
use crate::types::{DeclarationKind, PendingRef, Symbol, SymbolKind, SymbolRef};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Declarations that count as the referencing member of a site
pub const TRACKED_DECLARATIONS: [DeclarationKind; 3] = [
    DeclarationKind::Accessor,
    DeclarationKind::Method,
    DeclarationKind::Property,
];

/// Finds reference sites between members and maps each site to the member
/// whose declaration encloses it.
pub struct ReferenceResolver<'a> {
    model: &'a dyn SemanticModel,
    scope: SearchScope,
    pool: Option<ThreadPool>,
}

impl<'a> ReferenceResolver<'a> {
    /// Resolver restricted to the model's own document
    pub fn new(model: &'a dyn SemanticModel) -> Self {
        Self {
            scope: SearchScope::Document(model.document().clone()),
            model,
            pool: None,
        }
    }

    /// Run resolution on a dedicated pool instead of the global one
    pub fn with_threads(mut self, threads: Option<usize>) -> Result<Self> {
        self.pool = match threads {
            Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            None => None,
        };
        Ok(self)
    }

    /// Full resolution: collect sites for every member, then resolve them
    pub fn run(&self, members: &[Symbol]) -> Result<Vec<SymbolRef>> {
        let pending = self.collect_pending(members)?;
        self.resolve(pending)
    }

    /// One pending reference per site, `referencing` still unknown.
    ///
    /// Accessor methods and backing fields with an owner get one site per
    /// declaration of that owner: the owner's declaration refers to them.
    /// Every other member gets its usage sites from the provider.
    pub fn collect_pending(&self, members: &[Symbol]) -> Result<Vec<PendingRef>> {
        let mut pending = Vec::new();

        for member in members {
            let owner = match member.kind {
                SymbolKind::Method | SymbolKind::Field => self.model.associated_symbol(member)?,
                SymbolKind::Property => None,
            };

            match owner {
                Some(owner) => {
                    pending.extend(
                        owner
                            .locations
                            .iter()
                            .filter(|loc| self.scope.includes(loc))
                            .map(|loc| PendingRef::ownership(member.clone(), loc.clone())),
                    );
                }
                None => {
                    pending.extend(
                        self.model
                            .find_references(member, &self.scope)?
                            .into_iter()
                            .map(|loc| PendingRef::new(member.clone(), loc)),
                    );
                }
            }
        }

        log::debug!("Collected {} reference sites", pending.len());
        Ok(pending)
    }

    /// Resolve the referencing member of every site in parallel.
    ///
    /// Each site is resolved on its own and writes to its own output slot;
    /// sites without an enclosing tracked declaration are dropped. Output
    /// order follows input order.
    pub fn resolve(&self, pending: Vec<PendingRef>) -> Result<Vec<SymbolRef>> {
        let total = pending.len();
        let model = self.model;
        let work = move || -> Result<Vec<Option<SymbolRef>>> {
            pending
                .into_par_iter()
                .map(|site| resolve_site(model, site))
                .collect()
        };

        let slots = match &self.pool {
            Some(pool) => pool.install(work)?,
            None => work()?,
        };

        let resolved: Vec<SymbolRef> = slots.into_iter().flatten().collect();
        log::debug!(
            "Resolved {} of {} reference sites ({} outside tracked members)",
            resolved.len(),
            total,
            total - resolved.len()
        );
        Ok(resolved)
    }
}

fn resolve_site(model: &dyn SemanticModel, site: PendingRef) -> Result<Option<SymbolRef>> {
    let referencing = model.enclosing_declaration(&site.location, &TRACKED_DECLARATIONS)?;
    Ok(referencing.map(|symbol| site.resolve(symbol)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryModel;
    use crate::types::{DocumentId, Location, RefOrigin, Span};

    fn sample() -> (MemoryModel, Vec<Symbol>) {
        let field = Symbol::new("A", "_x", SymbolKind::Field);
        let prop = Symbol::new("A", "X", SymbolKind::Property)
            .with_location(Location::new(DocumentId::new("a.cs"), Span::new(30, 31)));
        let getter = Symbol::new("A", "get_X", SymbolKind::Method);
        let method = Symbol::new("A", "Bump", SymbolKind::Method);

        let model = MemoryModel::new("a.cs")
            .member(field.clone())
            .member(prop.clone())
            .member(getter.clone())
            .member(method.clone())
            .associate(&getter.id, &prop.id)
            .body(&prop.id, DeclarationKind::Property, Span::new(20, 80))
            .body(&getter.id, DeclarationKind::Accessor, Span::new(40, 60))
            .body(&method.id, DeclarationKind::Method, Span::new(100, 150))
            // read of _x inside the getter
            .reference(&field.id, Span::new(50, 52))
            // field initializer, outside any tracked member
            .reference(&field.id, Span::new(5, 7))
            // X used inside Bump
            .reference(&prop.id, Span::new(120, 121));

        (model, vec![field, prop, getter, method])
    }

    #[test]
    fn accessor_sites_come_from_owner_declaration() {
        let (model, members) = sample();
        let resolver = ReferenceResolver::new(&model);

        let pending = resolver.collect_pending(&members).unwrap();
        let accessor_sites: Vec<&PendingRef> = pending
            .iter()
            .filter(|p| p.original.name == "get_X")
            .collect();

        assert_eq!(accessor_sites.len(), 1);
        assert_eq!(accessor_sites[0].location.span, Span::new(30, 31));
        assert_eq!(accessor_sites[0].origin, RefOrigin::Ownership);
        assert!(pending
            .iter()
            .filter(|p| p.original.name != "get_X")
            .all(|p| p.origin == RefOrigin::Usage));
    }

    #[test]
    fn sites_outside_tracked_members_are_dropped() {
        let (model, members) = sample();
        let refs = ReferenceResolver::new(&model).run(&members).unwrap();

        let pairs: Vec<(String, String)> = refs
            .iter()
            .map(|r| (r.referencing.name.clone(), r.original.name.clone()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("get_X".to_string(), "_x".to_string()),
                ("Bump".to_string(), "X".to_string()),
                ("X".to_string(), "get_X".to_string()),
            ]
        );
    }

    #[test]
    fn dedicated_pool_gives_same_result() {
        let (model, members) = sample();
        let global = ReferenceResolver::new(&model).run(&members).unwrap();
        let pooled = ReferenceResolver::new(&model)
            .with_threads(Some(3))
            .unwrap()
            .run(&members)
            .unwrap();

        assert_eq!(global, pooled);
    }
}
