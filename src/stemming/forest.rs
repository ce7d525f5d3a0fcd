//! Stem-forest construction for both sides of the matching.
//!
//! One tree per element: a FULL root carrying the concatenated stemmed
//! name, a PART child per term, and one subtree per attached name slot
//! (attributes and classes for concepts, parameters and references for
//! methods; code identifiers and type names hang under the name they
//! decorate). Slots whose name stems to nothing are skipped with their
//! subtrees, so the forest never carries empty terms.

use tracing::debug;

use crate::core::errors::Result;
use crate::core::model::{Concept, ElementRef, Method};
use crate::core::stems::{ConceptStemKind, MethodStemKind, StemForest};
use crate::stemming::TermExtractor;

/// Build the stem forest of an ontology's concepts
pub fn concept_forest(
    concepts: &[Concept],
    extractor: &TermExtractor,
) -> Result<StemForest<ConceptStemKind>> {
    let mut forest = StemForest::new();

    for concept in concepts {
        let name_terms = extractor.extract(&concept.name);
        if name_terms.is_empty() {
            debug!(concept = %concept.id, name = %concept.name, "concept name has no terms, skipped");
            continue;
        }

        let owner = ElementRef::concept(concept.id);
        let root = forest.push_root(owner, ConceptStemKind::ConceptNameFull, name_terms.concat())?;
        for term in &name_terms {
            forest.push_child(root, ConceptStemKind::ConceptNamePart, term)?;
        }

        for attribute in &concept.attributes {
            let attribute_terms = extractor.extract(&attribute.name);
            if attribute_terms.is_empty() {
                continue;
            }

            let attribute_node = forest.push_child(
                root,
                ConceptStemKind::AttributeNameFull,
                attribute_terms.concat(),
            )?;
            for term in &attribute_terms {
                forest.push_child(attribute_node, ConceptStemKind::AttributeNamePart, term)?;
            }

            if let Some(identifier) = &attribute.identifier {
                let identifier_terms = extractor.extract(identifier);
                if identifier_terms.is_empty() {
                    continue;
                }

                let identifier_node = forest.push_child(
                    attribute_node,
                    ConceptStemKind::AttributeIdentifierFull,
                    identifier_terms.concat(),
                )?;
                for term in &identifier_terms {
                    forest.push_child(
                        identifier_node,
                        ConceptStemKind::AttributeIdentifierPart,
                        term,
                    )?;
                }
            }
        }

        for class in &concept.classes {
            let class_terms = extractor.extract(&class.name);
            if class_terms.is_empty() {
                continue;
            }

            let class_node =
                forest.push_child(root, ConceptStemKind::ClassNameFull, class_terms.concat())?;
            for term in &class_terms {
                forest.push_child(class_node, ConceptStemKind::ClassNamePart, term)?;
            }

            if let Some(identifier) = &class.identifier {
                let identifier_terms = extractor.extract(identifier);
                if identifier_terms.is_empty() {
                    continue;
                }

                let identifier_node = forest.push_child(
                    class_node,
                    ConceptStemKind::ClassIdentifierFull,
                    identifier_terms.concat(),
                )?;
                for term in &identifier_terms {
                    forest.push_child(identifier_node, ConceptStemKind::ClassIdentifierPart, term)?;
                }
            }
        }
    }

    Ok(forest)
}

/// Build the stem forest of a source corpus's methods
pub fn method_forest(
    methods: &[Method],
    extractor: &TermExtractor,
) -> Result<StemForest<MethodStemKind>> {
    let mut forest = StemForest::new();

    for method in methods {
        let name_terms = extractor.extract(&method.name);
        if name_terms.is_empty() {
            debug!(method = %method.id, name = %method.name, "method name has no terms, skipped");
            continue;
        }

        let owner = ElementRef::method(method.id);
        let root = forest.push_root(owner, MethodStemKind::MethodNameFull, name_terms.concat())?;
        for term in &name_terms {
            forest.push_child(root, MethodStemKind::MethodNamePart, term)?;
        }

        for parameter in &method.parameters {
            let parameter_terms = extractor.extract(&parameter.name);
            if parameter_terms.is_empty() {
                continue;
            }

            let parameter_node = forest.push_child(
                root,
                MethodStemKind::ParameterNameFull,
                parameter_terms.concat(),
            )?;
            for term in &parameter_terms {
                forest.push_child(parameter_node, MethodStemKind::ParameterNamePart, term)?;
            }

            let type_terms = extractor.extract(&parameter.type_name);
            if type_terms.is_empty() {
                continue;
            }

            let type_node = forest.push_child(
                parameter_node,
                MethodStemKind::ParameterTypeFull,
                type_terms.concat(),
            )?;
            for term in &type_terms {
                forest.push_child(type_node, MethodStemKind::ParameterTypePart, term)?;
            }
        }

        for reference in &method.references {
            let reference_terms = extractor.extract(&reference.name);
            if reference_terms.is_empty() {
                continue;
            }

            let reference_node = forest.push_child(
                root,
                MethodStemKind::ReferenceNameFull,
                reference_terms.concat(),
            )?;
            for term in &reference_terms {
                forest.push_child(reference_node, MethodStemKind::ReferenceNamePart, term)?;
            }

            let type_terms = extractor.extract(&reference.type_name);
            if type_terms.is_empty() {
                continue;
            }

            let type_node = forest.push_child(
                reference_node,
                MethodStemKind::ReferenceTypeFull,
                type_terms.concat(),
            )?;
            for term in &type_terms {
                forest.push_child(type_node, MethodStemKind::ReferenceTypePart, term)?;
            }
        }
    }

    Ok(forest)
}
