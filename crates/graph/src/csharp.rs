//! Syntax-level semantic model for C# sources.
//!
//! Members and declarations come from the tree-sitter syntax tree; references
//! are bound by simple name within the declaring class. This is an
//! approximation of a compiler binder: locals or parameters named like a
//! member and members reached through other instances bind to the member.

use crate::error::{GraphError, Result};
use crate::provider::{SearchScope, SemanticModel};
use crate::types::{
    Accessibility, DeclarationKind, DocumentId, Location, Span, Symbol, SymbolId, SymbolKind,
};
use std::collections::HashMap;
use std::path::Path;
use tree_sitter::{Node, Parser};

const TYPE_DECLARATIONS: [&str; 5] = [
    "class_declaration",
    "struct_declaration",
    "interface_declaration",
    "record_declaration",
    "enum_declaration",
];

/// Parents whose `name` child introduces a new name rather than using one
const NAMING_PARENTS: [&str; 17] = [
    "class_declaration",
    "struct_declaration",
    "interface_declaration",
    "record_declaration",
    "enum_declaration",
    "enum_member_declaration",
    "delegate_declaration",
    "namespace_declaration",
    "method_declaration",
    "constructor_declaration",
    "destructor_declaration",
    "property_declaration",
    "event_declaration",
    "variable_declarator",
    "parameter",
    "type_parameter",
    "local_function_statement",
];

#[derive(Debug, Clone)]
struct Declaration {
    symbol: SymbolId,
    kind: DeclarationKind,
    span: Span,
}

#[derive(Debug, Clone)]
struct Occurrence {
    name: String,
    span: Span,
    /// Argument count when the identifier is the callee of an invocation
    arguments: Option<usize>,
}

/// Argument counts a method accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Arity {
    required: usize,
    /// `None` with a `params` array
    max: Option<usize>,
}

impl Arity {
    fn accepts(self, arguments: usize) -> bool {
        arguments >= self.required && self.max.map_or(true, |max| arguments <= max)
    }
}

/// [`SemanticModel`] over a single C# file
#[derive(Debug, Clone)]
pub struct CSharpModel {
    document: DocumentId,
    members: Vec<Symbol>,
    index: HashMap<SymbolId, usize>,
    associations: HashMap<SymbolId, SymbolId>,
    /// Extents of every declaration of a class, several for partial classes
    container_spans: HashMap<String, Vec<Span>>,
    arities: HashMap<SymbolId, Arity>,
    declarations: Vec<Declaration>,
    occurrences: Vec<Occurrence>,
}

impl CSharpModel {
    pub fn parse(document: impl Into<String>, source: &str) -> Result<Self> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_c_sharp::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| GraphError::ParseError(format!("Failed to set language: {e}")))?;

        let document = DocumentId::new(document);
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| GraphError::ParseError(format!("Failed to parse {document}")))?;

        let root = tree.root_node();
        if root.has_error() {
            log::warn!("{document} contains syntax errors; results may be incomplete");
        }

        let mut extractor = Extractor::new(source, document);
        extractor.walk(root);
        let model = extractor.finish();

        log::debug!(
            "Parsed {}: {} members, {} declarations, {} identifier sites",
            model.document,
            model.members.len(),
            model.declarations.len(),
            model.occurrences.len()
        );

        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(path.display().to_string(), &source)
    }

    fn lookup(&self, id: &SymbolId) -> Result<&Symbol> {
        self.index
            .get(id)
            .map(|&slot| &self.members[slot])
            .ok_or_else(|| GraphError::AnalysisError(format!("Unknown symbol: {id}")))
    }
}

impl SemanticModel for CSharpModel {
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
        let probe = Location::new(self.document.clone(), Span::new(0, 0));
        if !scope.includes(&probe) {
            return Ok(Vec::new());
        }
        if !self.index.contains_key(&symbol.id) {
            return Err(GraphError::AnalysisError(format!(
                "Symbol {} is not declared in {}",
                symbol.id, self.document
            )));
        }
        let spans = self
            .container_spans
            .get(&symbol.container)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let arity = self.arities.get(&symbol.id).copied();

        Ok(self
            .occurrences
            .iter()
            .filter(|occ| occ.name == symbol.name)
            .filter(|occ| spans.iter().any(|span| span.contains(&occ.span)))
            .filter(|occ| match (arity, occ.arguments) {
                (Some(arity), Some(arguments)) => arity.accepts(arguments),
                _ => true,
            })
            .map(|occ| Location::new(self.document.clone(), occ.span))
            .collect())
    }

    fn enclosing_declaration(
        &self,
        location: &Location,
        kinds: &[DeclarationKind],
    ) -> Result<Option<Symbol>> {
        if location.document != self.document {
            return Ok(None);
        }

        let innermost = self
            .declarations
            .iter()
            .filter(|decl| kinds.contains(&decl.kind) && decl.span.contains(&location.span))
            .min_by_key(|decl| decl.span.len());

        match innermost {
            Some(decl) => self.lookup(&decl.symbol).map(|s| Some(s.clone())),
            None => Ok(None),
        }
    }
}

struct Extractor<'s> {
    source: &'s str,
    model: CSharpModel,
}

impl<'s> Extractor<'s> {
    fn new(source: &'s str, document: DocumentId) -> Self {
        Self {
            source,
            model: CSharpModel {
                document,
                members: Vec::new(),
                index: HashMap::new(),
                associations: HashMap::new(),
                container_spans: HashMap::new(),
                arities: HashMap::new(),
                declarations: Vec::new(),
                occurrences: Vec::new(),
            },
        }
    }

    fn finish(self) -> CSharpModel {
        self.model
    }

    fn walk(&mut self, node: Node<'_>) {
        match node.kind() {
            "class_declaration" => self.visit_class(node),
            "identifier" if !is_introduced_name(node) => {
                let name = self.text(node).to_string();
                self.model.occurrences.push(Occurrence {
                    name,
                    span: span(node),
                    arguments: argument_count(node),
                });
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.walk(child);
        }
    }

    fn visit_class(&mut self, node: Node<'_>) {
        let container = self.container_name(node);
        if container.is_empty() {
            return;
        }
        let Some(body) = node
            .child_by_field_name("body")
            .or_else(|| find_child(node, "declaration_list"))
        else {
            return;
        };
        self.model
            .container_spans
            .entry(container.clone())
            .or_default()
            .push(span(node));

        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "field_declaration" => self.visit_field(member, &container),
                "property_declaration" => self.visit_property(member, &container),
                "method_declaration" => self.visit_method(member, &container),
                _ => {}
            }
        }
    }

    fn visit_field(&mut self, node: Node<'_>, container: &str) {
        let accessibility = self.accessibility(node).unwrap_or_default();

        let mut cursor = node.walk();
        for declaration in node.named_children(&mut cursor) {
            if declaration.kind() != "variable_declaration" {
                continue;
            }
            let mut inner = declaration.walk();
            for declarator in declaration.named_children(&mut inner) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let Some(name_node) = declarator
                    .child_by_field_name("name")
                    .or_else(|| find_child(declarator, "identifier"))
                else {
                    continue;
                };
                let symbol = Symbol::new(container, self.text(name_node), SymbolKind::Field)
                    .with_accessibility(accessibility)
                    .with_location(self.location(name_node));
                self.add_member(symbol);
            }
        }
    }

    fn visit_property(&mut self, node: Node<'_>, container: &str) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        let accessibility = self.accessibility(node).unwrap_or_default();

        let mut accessors = Vec::new();
        if let Some(list) = node
            .child_by_field_name("accessors")
            .or_else(|| find_child(node, "accessor_list"))
        {
            let mut cursor = list.walk();
            for accessor in list.named_children(&mut cursor) {
                if accessor.kind() != "accessor_declaration" {
                    continue;
                }
                let Some(keyword) = accessor_keyword(accessor, self.source) else {
                    continue;
                };
                let accessor_name = format!("{keyword}_{name}");
                let symbol = Symbol::new(container, &accessor_name, SymbolKind::Method)
                    .with_accessibility(self.accessibility(accessor).unwrap_or(accessibility))
                    .with_location(self.location(accessor));
                accessors.push((symbol, Some(span(accessor))));
            }
        } else if let Some(arrow) = find_child(node, "arrow_expression_clause") {
            // `int P => expr;` has an implicit getter with no declaration node
            let symbol = Symbol::new(container, &format!("get_{name}"), SymbolKind::Method)
                .with_accessibility(accessibility)
                .with_location(self.location(arrow));
            accessors.push((symbol, None));
        }

        let has_setter = accessors
            .iter()
            .any(|(s, _)| s.name.starts_with("set_") || s.name.starts_with("init_"));
        let property = Symbol::new(container, &name, SymbolKind::Property)
            .with_accessibility(accessibility)
            .with_setter(has_setter)
            .with_location(self.location(name_node));
        let property_id = property.id.clone();

        self.model.declarations.push(Declaration {
            symbol: property_id.clone(),
            kind: DeclarationKind::Property,
            span: span(node),
        });
        self.add_member(property);

        for (accessor, body) in accessors {
            if let Some(body) = body {
                self.model.declarations.push(Declaration {
                    symbol: accessor.id.clone(),
                    kind: DeclarationKind::Accessor,
                    span: body,
                });
            }
            self.model
                .associations
                .insert(accessor.id.clone(), property_id.clone());
            self.add_member(accessor);
        }
    }

    fn visit_method(&mut self, node: Node<'_>, container: &str) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        let signature = self.parameter_types(node).join(",");

        let symbol = Symbol::new(container, &name, SymbolKind::Method)
            .with_id(format!("{container}.{name}({signature})"))
            .with_accessibility(self.accessibility(node).unwrap_or_default())
            .with_location(self.location(name_node));

        self.model.declarations.push(Declaration {
            symbol: symbol.id.clone(),
            kind: DeclarationKind::Method,
            span: span(node),
        });
        let arity = self.arity(node);
        self.model.arities.insert(symbol.id.clone(), arity);
        self.add_member(symbol);
    }

    fn add_member(&mut self, symbol: Symbol) {
        if self.model.index.contains_key(&symbol.id) {
            log::debug!("Skipping duplicate member {}", symbol.id);
            return;
        }
        self.model
            .index
            .insert(symbol.id.clone(), self.model.members.len());
        self.model.members.push(symbol);
    }

    /// Enclosing type names from outermost to `node` itself, dot-joined
    fn container_name(&self, node: Node<'_>) -> String {
        let mut names = Vec::new();
        let mut current = Some(node);
        while let Some(n) = current {
            if TYPE_DECLARATIONS.contains(&n.kind()) {
                if let Some(name) = n.child_by_field_name("name") {
                    names.push(self.text(name).to_string());
                }
            }
            current = n.parent();
        }
        names.reverse();
        names.join(".")
    }

    fn parameter_types(&self, method: Node<'_>) -> Vec<String> {
        let Some(list) = parameter_list(method) else {
            return Vec::new();
        };

        let mut cursor = list.walk();
        let types = list
            .named_children(&mut cursor)
            .filter(|p| p.kind() == "parameter")
            .map(|p| {
                p.child_by_field_name("type")
                    .map(|t| compact(self.text(t)))
                    .unwrap_or_else(|| "?".to_string())
            })
            .collect();
        types
    }

    /// Parameters with a default value are optional; a `params` array lifts
    /// the upper bound
    fn arity(&self, method: Node<'_>) -> Arity {
        let mut arity = Arity {
            required: 0,
            max: Some(0),
        };
        let Some(list) = parameter_list(method) else {
            return arity;
        };

        let mut cursor = list.walk();
        for param in list.named_children(&mut cursor) {
            let variadic = param.kind() == "parameter_array"
                || self.text(param).trim_start().starts_with("params ");
            if variadic {
                arity.max = None;
                continue;
            }
            if param.kind() != "parameter" {
                continue;
            }
            let has_default = param.child_by_field_name("name").is_some_and(|name| {
                self.source
                    .get(name.end_byte()..param.end_byte())
                    .is_some_and(|rest| rest.contains('='))
            });
            if !has_default {
                arity.required += 1;
            }
            arity.max = arity.max.map(|max| max + 1);
        }
        arity
    }

    fn accessibility(&self, node: Node<'_>) -> Option<Accessibility> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let word = if child.kind() == "modifier" {
                self.text(child)
            } else {
                child.kind()
            };
            match word.trim() {
                "public" => return Some(Accessibility::Public),
                "protected" => return Some(Accessibility::Protected),
                "internal" => return Some(Accessibility::Internal),
                "private" => return Some(Accessibility::Private),
                _ => {}
            }
        }
        None
    }

    fn location(&self, node: Node<'_>) -> Location {
        Location::new(self.model.document.clone(), span(node))
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or("")
    }
}

fn span(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn parameter_list<'t>(method: Node<'t>) -> Option<Node<'t>> {
    method
        .child_by_field_name("parameters")
        .or_else(|| find_child(method, "parameter_list"))
}

/// Number of arguments when `node` names the method of an invocation,
/// directly (`Post(x)`) or through member access (`this.Post(x)`)
fn argument_count(node: Node<'_>) -> Option<usize> {
    let mut callee = node;
    let mut parent = node.parent()?;
    if parent.kind() == "member_access_expression" {
        if parent.child_by_field_name("name") != Some(node) {
            return None;
        }
        callee = parent;
        parent = parent.parent()?;
    }
    if parent.kind() != "invocation_expression"
        || parent.child_by_field_name("function") != Some(callee)
    {
        return None;
    }

    let arguments = parent.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let count = arguments
        .named_children(&mut cursor)
        .filter(|a| a.kind() == "argument")
        .count();
    Some(count)
}

fn find_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Identifier that names a declaration or a type rather than using a member
fn is_introduced_name(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    let is_field = |field: &str| parent.child_by_field_name(field) == Some(node);

    (NAMING_PARENTS.contains(&parent.kind()) && is_field("name"))
        || is_field("type")
        || is_field("returns")
}

fn accessor_keyword(node: Node<'_>, source: &str) -> Option<&'static str> {
    let keyword = |word: &str| match word {
        "get" => Some("get"),
        "set" => Some("set"),
        "init" => Some("init"),
        _ => None,
    };

    if let Some(name) = node.child_by_field_name("name") {
        return keyword(source.get(name.byte_range()).unwrap_or(""));
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(|c| keyword(c.kind()));
    found
}

fn compact(text: &str) -> String {
    text.split_whitespace().collect()
}
