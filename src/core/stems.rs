//! Arena-backed stem forests.
//!
//! A stem forest holds, for every owner element, the tree of term nodes
//! derived from its names: one FULL node per cleaned name, one PART child
//! per stemmed term. Nodes live in a flat arena and point at their parent
//! by index; child lists are a secondary index maintained on insertion.
//!
//! Flattening is the single traversal every consumer relies on: depth-first
//! from the owner's root, visiting children sorted by `(kind, term)`. The
//! kind enums are declared in slot order, so the derived `Ord` yields the
//! canonical sequence (name parts, then attribute subtrees, then class
//! subtrees, and the analogous order on the method side).

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::core::errors::{OntomatchError, Result};
use crate::core::model::ElementRef;

/// Stem node kinds for the concept side, in flatten slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConceptStemKind {
    /// Full cleaned concept name
    ConceptNameFull,
    /// One stemmed term of the concept name
    ConceptNamePart,
    /// Full cleaned attribute name
    AttributeNameFull,
    /// One stemmed term of an attribute name
    AttributeNamePart,
    /// Full cleaned attribute code identifier
    AttributeIdentifierFull,
    /// One stemmed term of an attribute code identifier
    AttributeIdentifierPart,
    /// Full cleaned class name
    ClassNameFull,
    /// One stemmed term of a class name
    ClassNamePart,
    /// Full cleaned class code identifier
    ClassIdentifierFull,
    /// One stemmed term of a class code identifier
    ClassIdentifierPart,
}

/// Stem node kinds for the method side, in flatten slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MethodStemKind {
    /// Full cleaned method name
    MethodNameFull,
    /// One stemmed term of the method name
    MethodNamePart,
    /// Full cleaned parameter name
    ParameterNameFull,
    /// One stemmed term of a parameter name
    ParameterNamePart,
    /// Full cleaned parameter type name
    ParameterTypeFull,
    /// One stemmed term of a parameter type name
    ParameterTypePart,
    /// Full cleaned reference name
    ReferenceNameFull,
    /// One stemmed term of a reference name
    ReferenceNamePart,
    /// Full cleaned reference type name
    ReferenceTypeFull,
    /// One stemmed term of a reference type name
    ReferenceTypePart,
}

impl ConceptStemKind {
    /// Whether this kind carries a single stemmed term rather than a full name
    pub fn is_part(&self) -> bool {
        matches!(
            self,
            Self::ConceptNamePart
                | Self::AttributeNamePart
                | Self::AttributeIdentifierPart
                | Self::ClassNamePart
                | Self::ClassIdentifierPart
        )
    }
}

impl MethodStemKind {
    /// Whether this kind carries a single stemmed term rather than a full name
    pub fn is_part(&self) -> bool {
        matches!(
            self,
            Self::MethodNamePart
                | Self::ParameterNamePart
                | Self::ParameterTypePart
                | Self::ReferenceNamePart
                | Self::ReferenceTypePart
        )
    }
}

/// One node of a stem forest
#[derive(Debug, Clone)]
pub struct StemNode<K> {
    /// The term this node carries (a full cleaned name or one stemmed term)
    pub term: String,
    /// Slot the node occupies in its owner's tree
    pub kind: K,
    /// Element the node belongs to
    pub owner: ElementRef,
    /// Arena index of the parent node; `None` for roots
    pub parent: Option<usize>,
}

/// Arena of stem nodes for one side of the matching
#[derive(Debug, Clone)]
pub struct StemForest<K> {
    nodes: Vec<StemNode<K>>,
    roots: IndexMap<ElementRef, usize>,
    children: AHashMap<usize, Vec<usize>>,
}

impl<K> Default for StemForest<K> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            roots: IndexMap::new(),
            children: AHashMap::new(),
        }
    }
}

impl<K: Copy + Ord> StemForest<K> {
    /// Create an empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a root node for an owner. An owner has at most one root.
    pub fn push_root(&mut self, owner: ElementRef, kind: K, term: impl Into<String>) -> Result<usize> {
        if self.roots.contains_key(&owner) {
            return Err(OntomatchError::validation(format!(
                "{owner} already has a stem root"
            )));
        }

        let index = self.nodes.len();
        self.nodes.push(StemNode {
            term: term.into(),
            kind,
            owner,
            parent: None,
        });
        self.roots.insert(owner, index);
        Ok(index)
    }

    /// Insert a child node under an existing parent.
    pub fn push_child(&mut self, parent: usize, kind: K, term: impl Into<String>) -> Result<usize> {
        let owner = match self.nodes.get(parent) {
            Some(node) => node.owner,
            None => {
                return Err(OntomatchError::validation_mismatch(
                    "stem parent index out of bounds",
                    "parent",
                    format!("< {}", self.nodes.len()),
                    parent.to_string(),
                ));
            }
        };

        let index = self.nodes.len();
        self.nodes.push(StemNode {
            term: term.into(),
            kind,
            owner,
            parent: Some(parent),
        });
        self.children.entry(parent).or_default().push(index);
        Ok(index)
    }

    /// Node by arena index
    pub fn node(&self, index: usize) -> &StemNode<K> {
        &self.nodes[index]
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Owners with a root, in insertion order
    pub fn owners(&self) -> impl Iterator<Item = ElementRef> + '_ {
        self.roots.keys().copied()
    }

    /// Root index of an owner, if it has one
    pub fn root_of(&self, owner: ElementRef) -> Option<usize> {
        self.roots.get(&owner).copied()
    }

    /// Child indexes of a node, sorted by `(kind, term)`
    fn sorted_children(&self, index: usize) -> Vec<usize> {
        let mut children = self
            .children
            .get(&index)
            .map(Vec::clone)
            .unwrap_or_default();
        children.sort_by(|&a, &b| {
            let na = &self.nodes[a];
            let nb = &self.nodes[b];
            na.kind.cmp(&nb.kind).then_with(|| na.term.cmp(&nb.term))
        });
        children
    }

    /// Depth-first flatten of one owner's tree into arena indexes.
    ///
    /// Children are visited sorted by `(kind, term)` at every level, so the
    /// sequence is canonical regardless of insertion order. Owners without a
    /// root flatten to an empty sequence. The forest is never mutated.
    pub fn flatten(&self, owner: ElementRef) -> Vec<usize> {
        let mut out = Vec::new();
        if let Some(root) = self.root_of(owner) {
            let mut stack = vec![root];
            while let Some(index) = stack.pop() {
                out.push(index);
                let children = self.sorted_children(index);
                // LIFO stack: push in reverse so sorted order comes out first
                for &child in children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Flatten an owner's tree into its nodes
    pub fn flatten_nodes(&self, owner: ElementRef) -> Vec<&StemNode<K>> {
        self.flatten(owner)
            .into_iter()
            .map(|index| &self.nodes[index])
            .collect()
    }
}
