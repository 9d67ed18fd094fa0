use crate::error::{GraphError, Result};
use crate::provider::{SearchScope, SemanticModel};
use crate::types::{DeclarationKind, DocumentId, Location, Span, Symbol, SymbolId};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct DeclarationBody {
    symbol: SymbolId,
    kind: DeclarationKind,
    location: Location,
}

/// In-memory semantic model assembled by hand.
///
/// Useful when semantic data already exists elsewhere, and for tests. Spans
/// passed to the builder methods refer to the model's own document.
#[derive(Debug, Clone)]
pub struct MemoryModel {
    document: DocumentId,
    members: Vec<Symbol>,
    index: HashMap<SymbolId, usize>,
    associations: HashMap<SymbolId, SymbolId>,
    references: HashMap<SymbolId, Vec<Location>>,
    bodies: Vec<DeclarationBody>,
}

impl MemoryModel {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: DocumentId::new(document),
            members: Vec::new(),
            index: HashMap::new(),
            associations: HashMap::new(),
            references: HashMap::new(),
            bodies: Vec::new(),
        }
    }

    /// Location inside this model's document
    #[must_use]
    pub fn location(&self, start: usize, end: usize) -> Location {
        Location::new(self.document.clone(), Span::new(start, end))
    }

    /// Register a declared member; a later member with the same id replaces it
    #[must_use]
    pub fn member(mut self, symbol: Symbol) -> Self {
        if let Some(&slot) = self.index.get(&symbol.id) {
            self.members[slot] = symbol;
        } else {
            self.index.insert(symbol.id.clone(), self.members.len());
            self.members.push(symbol);
        }
        self
    }

    /// Register the syntactic extent of a declaration
    #[must_use]
    pub fn body(mut self, symbol: &SymbolId, kind: DeclarationKind, span: Span) -> Self {
        let location = Location::new(self.document.clone(), span);
        self.bodies.push(DeclarationBody {
            symbol: symbol.clone(),
            kind,
            location,
        });
        self
    }

    /// Link an accessor method or backing field to its owning member
    #[must_use]
    pub fn associate(mut self, member: &SymbolId, owner: &SymbolId) -> Self {
        self.associations.insert(member.clone(), owner.clone());
        self
    }

    /// Record a usage of `target` in this document
    #[must_use]
    pub fn reference(self, target: &SymbolId, span: Span) -> Self {
        let location = Location::new(self.document.clone(), span);
        self.reference_at(target, location)
    }

    /// Record a usage of `target` at an arbitrary location
    #[must_use]
    pub fn reference_at(mut self, target: &SymbolId, location: Location) -> Self {
        self.references
            .entry(target.clone())
            .or_default()
            .push(location);
        self
    }

    fn lookup(&self, id: &SymbolId) -> Result<&Symbol> {
        self.index
            .get(id)
            .map(|&slot| &self.members[slot])
            .ok_or_else(|| GraphError::AnalysisError(format!("Unknown symbol: {id}")))
    }
}

impl SemanticModel for MemoryModel {
    fn document(&self) -> &DocumentId {
        &self.document
    }

    fn declared_members(&self) -> Result<Vec<Symbol>> {
        Ok(self.members.clone())
    }

    fn associated_symbol(&self, member: &Symbol) -> Result<Option<Symbol>> {
        match self.associations.get(&member.id) {
            Some(owner) => self.lookup(owner).map(|s| Some(s.clone())),
            None => Ok(None),
        }
    }

    fn find_references(&self, symbol: &Symbol, scope: &SearchScope) -> Result<Vec<Location>> {
        Ok(self
            .references
            .get(&symbol.id)
            .map(|sites| {
                sites
                    .iter()
                    .filter(|loc| scope.includes(loc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn enclosing_declaration(
        &self,
        location: &Location,
        kinds: &[DeclarationKind],
    ) -> Result<Option<Symbol>> {
        let innermost = self
            .bodies
            .iter()
            .filter(|body| kinds.contains(&body.kind))
            .filter(|body| body.location.document == location.document)
            .filter(|body| body.location.span.contains(&location.span))
            .min_by_key(|body| body.location.span.len());

        match innermost {
            Some(body) => self.lookup(&body.symbol).map(|s| Some(s.clone())),
            None => Ok(None),
        }
    }
}
