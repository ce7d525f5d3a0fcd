//! Term-document matrices and the tf-idf arithmetic over them.
//!
//! Rows are vocabulary positions, columns are documents. Each pipeline
//! stage (tf, idf, tf-idf) produces a fresh buffer; nothing aliases, so a
//! later stage can never corrupt an earlier one.

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::core::errors::{OntomatchError, Result};

/// A dense term × document matrix with its column id list
#[derive(Debug, Clone)]
pub struct TermDocumentMatrix<D> {
    values: Array2<f64>,
    documents: Vec<D>,
}

impl<D> TermDocumentMatrix<D> {
    /// Allocate a zero matrix for the given vocabulary size and documents
    pub fn zeros(term_count: usize, documents: Vec<D>) -> Self {
        let values = Array2::zeros((term_count, documents.len()));
        Self { values, documents }
    }

    /// Wrap existing values, checking the column count against the id list
    pub fn from_values(values: Array2<f64>, documents: Vec<D>) -> Result<Self> {
        if values.ncols() != documents.len() {
            return Err(OntomatchError::validation_mismatch(
                "matrix column count does not match document list",
                "documents",
                values.ncols().to_string(),
                documents.len().to_string(),
            ));
        }
        Ok(Self { values, documents })
    }

    /// Number of vocabulary terms (rows)
    pub fn term_count(&self) -> usize {
        self.values.nrows()
    }

    /// Number of documents (columns)
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Document ids in column order
    pub fn documents(&self) -> &[D] {
        &self.documents
    }

    /// The underlying values
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// One document's vector
    pub fn column(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.column(index)
    }

    /// Euclidean norm of one document's vector
    pub fn column_norm(&self, index: usize) -> f64 {
        let column = self.column(index);
        column.dot(&column).sqrt()
    }

    /// Set a single cell
    pub(crate) fn set(&mut self, term: usize, document: usize, value: f64) {
        self.values[[term, document]] = value;
    }

    /// Add to a single cell
    pub(crate) fn add(&mut self, term: usize, document: usize, value: f64) {
        self.values[[term, document]] += value;
    }

    /// Divide one column by a scalar, leaving zero columns untouched
    pub(crate) fn scale_column(&mut self, document: usize, divisor: f64) {
        if divisor != 0.0 {
            self.values
                .column_mut(document)
                .mapv_inplace(|v| v / divisor);
        }
    }
}

/// Inverse document frequency per vocabulary term.
///
/// `idf[i] = log10(corpus_size / (1 + document_frequencies[i]))`. The `+ 1`
/// keeps the denominator positive, so the result is always finite; a term
/// present in every document goes negative, which is what lets ubiquitous
/// terms cancel out of the match scores.
pub fn idf_vector(document_frequencies: &[usize], corpus_size: usize) -> Result<Array1<f64>> {
    if corpus_size == 0 && !document_frequencies.is_empty() {
        return Err(OntomatchError::validation_mismatch(
            "idf requires a non-empty document corpus",
            "corpus_size",
            ">= 1",
            "0",
        ));
    }

    Ok(document_frequencies
        .iter()
        .map(|&df| (corpus_size as f64 / (1.0 + df as f64)).log10())
        .collect())
}

/// Element-wise tf-idf: the idf vector broadcast across every column
pub fn hadamard<D: Clone>(
    tf: &TermDocumentMatrix<D>,
    idf: &Array1<f64>,
) -> Result<TermDocumentMatrix<D>> {
    if idf.len() != tf.term_count() {
        return Err(OntomatchError::validation_mismatch(
            "idf length does not match matrix vocabulary",
            "idf",
            tf.term_count().to_string(),
            idf.len().to_string(),
        ));
    }

    let values = &tf.values * &idf.view().insert_axis(Axis(1));
    Ok(TermDocumentMatrix {
        values,
        documents: tf.documents.clone(),
    })
}

/// Cosine similarity between two vectors; 0.0 when either norm is zero
pub fn cosine(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_from_values_checks_columns() {
        let values = Array2::zeros((3, 2));
        assert!(TermDocumentMatrix::from_values(values, vec![1u32]).is_err());

        let values = Array2::zeros((3, 2));
        let matrix = TermDocumentMatrix::from_values(values, vec![1u32, 2u32]).unwrap();
        assert_eq!(matrix.term_count(), 3);
        assert_eq!(matrix.document_count(), 2);
    }

    #[test]
    fn test_idf_formula() {
        // 4 documents; df 1 and 3
        let idf = idf_vector(&[1, 3], 4).unwrap();
        assert_relative_eq!(idf[0], (4.0_f64 / 2.0).log10(), epsilon = 1e-12);
        assert_relative_eq!(idf[1], (4.0_f64 / 4.0).log10(), epsilon = 1e-12);
    }

    #[test]
    fn test_idf_is_finite_and_bounded_below() {
        let n = 5;
        let idf = idf_vector(&[0, 1, 4, 5], n).unwrap();
        let floor = (n as f64 / (n as f64 + 1.0)).log10();
        for &value in idf.iter() {
            assert!(value.is_finite());
            assert!(value >= floor - 1e-12);
        }
        // the ubiquitous term goes negative, never NaN
        assert!(idf[3] < 0.0);
    }

    #[test]
    fn test_idf_empty_corpus() {
        assert!(idf_vector(&[1], 0).is_err());
        let idf = idf_vector(&[], 0).unwrap();
        assert!(idf.is_empty());
    }

    #[test]
    fn test_hadamard_broadcast() {
        let values = array![[1.0, 0.5], [0.0, 2.0]];
        let tf = TermDocumentMatrix::from_values(values, vec![10u32, 11u32]).unwrap();
        let idf = array![2.0, -0.5];

        let tfidf = hadamard(&tf, &idf).unwrap();
        assert_relative_eq!(tfidf.values()[[0, 0]], 2.0);
        assert_relative_eq!(tfidf.values()[[0, 1]], 1.0);
        assert_relative_eq!(tfidf.values()[[1, 0]], 0.0);
        assert_relative_eq!(tfidf.values()[[1, 1]], -1.0);
        assert_eq!(tfidf.documents(), &[10, 11]);
    }

    #[test]
    fn test_hadamard_length_mismatch() {
        let tf = TermDocumentMatrix::zeros(3, vec![1u32]);
        let idf = array![1.0, 2.0];
        assert!(hadamard(&tf, &idf).is_err());
    }

    #[test]
    fn test_zero_tf_column_stays_zero() {
        let values = array![[0.0, 1.0], [0.0, 1.0]];
        let tf = TermDocumentMatrix::from_values(values, vec![1u32, 2u32]).unwrap();
        let idf = array![0.7, -0.2];

        let tfidf = hadamard(&tf, &idf).unwrap();
        assert_eq!(tfidf.column_norm(0), 0.0);
        assert!(tfidf.column_norm(1) > 0.0);
    }

    #[test]
    fn test_cosine_basics() {
        let a = array![1.0, 0.0];
        let b = array![0.0, 1.0];
        let c = array![2.0, 0.0];

        assert_relative_eq!(cosine(a.view(), b.view()), 0.0);
        assert_relative_eq!(cosine(a.view(), c.view()), 1.0);
        assert_relative_eq!(
            cosine(a.view(), b.view()),
            cosine(b.view(), a.view()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cosine_zero_norm_guard() {
        let zero = array![0.0, 0.0];
        let a = array![1.0, 2.0];
        assert_eq!(cosine(zero.view(), a.view()), 0.0);
        assert_eq!(cosine(a.view(), zero.view()), 0.0);
    }

    #[test]
    fn test_column_scaling() {
        let mut matrix = TermDocumentMatrix::zeros(2, vec![1u32]);
        matrix.set(0, 0, 3.0);
        matrix.add(1, 0, 1.0);
        matrix.scale_column(0, 4.0);

        assert_relative_eq!(matrix.values()[[0, 0]], 0.75);
        assert_relative_eq!(matrix.values()[[1, 0]], 0.25);

        // zero divisor leaves the column untouched
        matrix.scale_column(0, 0.0);
        assert_relative_eq!(matrix.values()[[0, 0]], 0.75);
    }
}
