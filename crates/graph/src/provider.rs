use crate::error::Result;
use crate::types::{DeclarationKind, DocumentId, Location, Symbol};

/// Where `find_references` looks for usages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Only sites inside one document
    Document(DocumentId),
    /// Every document the provider knows about
    Unit,
}

impl SearchScope {
    #[must_use]
    pub fn includes(&self, location: &Location) -> bool {
        match self {
            Self::Document(doc) => &location.document == doc,
            Self::Unit => true,
        }
    }
}

/// Semantic analysis of one source unit.
///
/// Implementations are queried concurrently during reference resolution, so
/// every method takes `&self` and the provider must be `Sync`. Errors are
/// treated as fatal by the pipeline.
pub trait SemanticModel: Send + Sync {
    /// The document under analysis
    fn document(&self) -> &DocumentId;

    /// Explicitly declared members of every class in the unit
    fn declared_members(&self) -> Result<Vec<Symbol>>;

    /// Property (or other owner) an accessor method or backing field belongs to
    fn associated_symbol(&self, member: &Symbol) -> Result<Option<Symbol>>;

    /// Every site that uses `symbol` within `scope`
    fn find_references(&self, symbol: &Symbol, scope: &SearchScope) -> Result<Vec<Location>>;

    /// Innermost declaration of one of `kinds` that contains `location`
    fn enclosing_declaration(
        &self,
        location: &Location,
        kinds: &[DeclarationKind],
    ) -> Result<Option<Symbol>>;
}
