//! Term vocabulary with a fixed, reproducible ordering.
//!
//! Matrix rows are addressed by vocabulary position, so every structure in
//! the pipeline shares one `Vocabulary` instance. Order is lexicographic by
//! term and fixed at construction; re-building from the same terms always
//! yields the same positions.

use ahash::AHashMap;

/// Ordered term list with positional lookup
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    positions: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from arbitrary terms; duplicates collapse, order
    /// becomes lexicographic
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        terms.sort();
        terms.dedup();
        Self::from_sorted(terms)
    }

    /// Build a vocabulary as the intersection of two sorted term streams
    pub fn intersect<'a, A, B>(a: A, b: B) -> Self
    where
        A: IntoIterator<Item = &'a str>,
        B: IntoIterator<Item = &'a str>,
    {
        let mut out = Vec::new();
        let mut a = a.into_iter().peekable();
        let mut b = b.into_iter().peekable();

        while let (Some(&ta), Some(&tb)) = (a.peek(), b.peek()) {
            match ta.cmp(tb) {
                std::cmp::Ordering::Less => {
                    a.next();
                }
                std::cmp::Ordering::Greater => {
                    b.next();
                }
                std::cmp::Ordering::Equal => {
                    out.push(ta.to_string());
                    a.next();
                    b.next();
                }
            }
        }
        Self::from_sorted(out)
    }

    fn from_sorted(terms: Vec<String>) -> Self {
        let positions = terms
            .iter()
            .enumerate()
            .map(|(index, term)| (term.clone(), index))
            .collect();
        Self { terms, positions }
    }

    /// Position of a term, if present
    pub fn position(&self, term: &str) -> Option<usize> {
        self.positions.get(term).copied()
    }

    /// Term at a position
    pub fn term(&self, position: usize) -> &str {
        &self.terms[position]
    }

    /// All terms in vocabulary order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_sorted_and_deduped() {
        let vocab = Vocabulary::from_terms(["bank", "account", "bank", "balanc"]);
        assert_eq!(vocab.terms(), &["account", "balanc", "bank"]);
        assert_eq!(vocab.position("balanc"), Some(1));
        assert_eq!(vocab.position("missing"), None);
        assert_eq!(vocab.term(2), "bank");
    }

    #[test]
    fn test_intersection() {
        let vocab = Vocabulary::intersect(
            ["account", "balanc", "deposit"],
            ["account", "deposit", "withdraw"],
        );
        assert_eq!(vocab.terms(), &["account", "deposit"]);
    }

    #[test]
    fn test_intersection_disjoint_is_empty() {
        let vocab = Vocabulary::intersect(["alpha"], ["beta"]);
        assert!(vocab.is_empty());
        assert_eq!(vocab.len(), 0);
    }
}
