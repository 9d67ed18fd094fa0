use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of one analysed source unit (usually its path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Half-open byte range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub document: DocumentId,
    pub span: Span,
}

impl Location {
    #[must_use]
    pub const fn new(document: DocumentId, span: Span) -> Self {
        Self { document, span }
    }
}

/// Stable composite identity of a member: `Container.Member`, methods
/// further qualified by their parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub String);

impl SymbolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Field,
    Property,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    Public,
    Protected,
    Internal,
    #[default]
    Private,
}

/// Declared class member.
///
/// Equality and hashing use `id` only; the remaining fields are metadata
/// carried along for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub container: String,
    pub kind: SymbolKind,
    pub accessibility: Accessibility,
    pub has_setter: bool,
    /// Declaration sites (the member's name token)
    pub locations: Vec<Location>,
}

impl Symbol {
    pub fn new(container: &str, name: &str, kind: SymbolKind) -> Self {
        Self {
            id: SymbolId::new(format!("{container}.{name}")),
            name: name.to_string(),
            container: container.to_string(),
            kind,
            accessibility: Accessibility::default(),
            has_setter: false,
            locations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = SymbolId::new(id);
        self
    }

    #[must_use]
    pub const fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    #[must_use]
    pub const fn with_setter(mut self, has_setter: bool) -> Self {
        self.has_setter = has_setter;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub const fn is_method(&self) -> bool {
        matches!(self.kind, SymbolKind::Method)
    }

    #[must_use]
    pub const fn is_property(&self) -> bool {
        matches!(self.kind, SymbolKind::Property)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Declaration node kinds that can own a reference site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Accessor,
    Method,
    Property,
}

/// How a reference was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefOrigin {
    /// A usage site reported by the provider
    #[default]
    Usage,
    /// Synthesized from the owner's declaration: a property refers to its
    /// accessors and backing field
    Ownership,
}

/// Reference site whose referencing member is not known yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRef {
    pub original: Symbol,
    pub location: Location,
    pub origin: RefOrigin,
}

impl PendingRef {
    #[must_use]
    pub const fn new(original: Symbol, location: Location) -> Self {
        Self {
            original,
            location,
            origin: RefOrigin::Usage,
        }
    }

    /// Site at a declaration of the member's owner
    #[must_use]
    pub const fn ownership(original: Symbol, location: Location) -> Self {
        Self {
            original,
            location,
            origin: RefOrigin::Ownership,
        }
    }

    #[must_use]
    pub fn resolve(self, referencing: Symbol) -> SymbolRef {
        SymbolRef {
            original: self.original,
            referencing,
            location: self.location,
            origin: self.origin,
        }
    }
}

/// `referencing` uses `original` at `location`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    pub original: Symbol,
    pub referencing: Symbol,
    pub location: Location,
    pub origin: RefOrigin,
}

impl SymbolRef {
    #[must_use]
    pub const fn new(referencing: Symbol, original: Symbol, location: Location) -> Self {
        Self {
            original,
            referencing,
            location,
            origin: RefOrigin::Usage,
        }
    }

    #[must_use]
    pub const fn ownership(referencing: Symbol, original: Symbol, location: Location) -> Self {
        Self {
            original,
            referencing,
            location,
            origin: RefOrigin::Ownership,
        }
    }

    /// `property -> accessor` link synthesized for an accessor's owner
    #[must_use]
    pub const fn is_accessor_link(&self) -> bool {
        matches!(self.origin, RefOrigin::Ownership)
            && self.original.is_method()
            && self.referencing.is_property()
    }

    /// Identity once locations no longer matter: `(referencing, original)`
    #[must_use]
    pub fn endpoints(&self) -> (&SymbolId, &SymbolId) {
        (&self.referencing.id, &self.original.id)
    }
}
