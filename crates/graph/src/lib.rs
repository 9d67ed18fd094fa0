//! # Member Graph
//!
//! Dependency graphs between the members of the classes in one source unit,
//! and reachability trimming of those graphs around chosen members.
//!
//! ## Architecture
//!
//! ```text
//! SemanticModel (MemoryModel | CSharpModel)
//!     │
//!     ├──> Member discovery        declared fields, properties, methods
//!     ├──> Reference resolution    sites -> enclosing member (parallel, rayon)
//!     ├──> Accessor absorption     get_P/set_P edges folded into P
//!     ├──> Deduplication           one edge per (referencing, original)
//!     │
//!     ├──> Graph assembly (petgraph)
//!     │      ├─ Nodes: members, keyed by identity or by name
//!     │      └─ Edges: referencing -> referenced
//!     │
//!     └──> Reachability trimming   seeds + stop nodes, on a fresh copy
//! ```

mod absorb;
mod assemble;
mod config;
mod csharp;
mod dedup;
mod discover;
mod error;
mod export;
mod graph;
mod memory;
mod pipeline;
mod provider;
mod resolve;
mod trim;
mod types;

pub use absorb::absorb_accessors;
pub use assemble::{GraphAssembler, NodeKeying};
pub use config::{GraphConfig, Palette};
pub use csharp::CSharpModel;
pub use dedup::dedup_references;
pub use discover::discover_members;
pub use error::{GraphError, Result};
pub use export::{
    render_dot, snapshot, to_json, GraphSnapshot, SnapshotEdge, SnapshotNode, SNAPSHOT_VERSION,
};
pub use graph::{DisplayTag, MemberGraph, MemberNode};
pub use memory::MemoryModel;
pub use pipeline::{build_member_graph, collect_references, ExplorerSession};
pub use provider::{SearchScope, SemanticModel};
pub use resolve::{ReferenceResolver, TRACKED_DECLARATIONS};
pub use trim::{check_selection, trim, trim_in_place, Selection, TrimStats};
pub use types::{
    Accessibility, DeclarationKind, DocumentId, Location, PendingRef, RefOrigin, Span, Symbol,
    SymbolId, SymbolKind, SymbolRef,
};
