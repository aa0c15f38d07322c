use crate::corpus::{cosine_similarity, Corpus};
use crate::persona::Philosopher;
use ndarray::Array1;

/// Passages quoted per prompt.
pub const TOP_K: usize = 3;

pub struct Retriever<'a> {
    corpus: &'a Corpus,
}

impl<'a> Retriever<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Retriever { corpus }
    }

    /// Returns the top-3 passages for `philosopher` by cosine similarity to
    /// the query embedding, most similar first. Ties keep table order (the
    /// sort is stable). If fewer than 3 passages exist for the philosopher,
    /// returns as many as there are.
    pub fn rank(&self, query_embedding: &Array1<f32>, philosopher: Philosopher) -> Vec<&'a str> {
        let mut scored: Vec<(f32, &str)> = self
            .corpus
            .records()
            .iter()
            .filter(|record| record.philosopher == philosopher)
            .map(|record| {
                let score = cosine_similarity(query_embedding, &record.embedding);
                (score, record.passage_text.as_str())
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(TOP_K)
            .map(|(_, text)| text)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::PassageRecord;
    use ndarray::array;

    fn record(philosopher: Philosopher, text: &str, embedding: Array1<f32>) -> PassageRecord {
        PassageRecord {
            philosopher,
            passage_text: text.to_string(),
            embedding,
        }
    }

    fn test_corpus() -> Corpus {
        let records = vec![
            record(Philosopher::Nietzsche, "n1", array![1.0, 0.0]),
            record(Philosopher::Nietzsche, "n2", array![0.8, 0.6]),
            record(Philosopher::Nietzsche, "n3", array![0.0, 1.0]),
            record(Philosopher::Nietzsche, "n4", array![-1.0, 0.0]),
            record(Philosopher::Kant, "k1", array![1.0, 0.0]),
            record(Philosopher::LaoTzu, "l1", array![0.5, 0.5]),
        ];
        Corpus::from_json_slice(serde_json::to_vec(&records).unwrap().as_slice()).unwrap()
    }

    #[test]
    fn returns_top_three_in_descending_similarity_order() {
        let corpus = test_corpus();
        let retriever = Retriever::new(&corpus);
        let top = retriever.rank(&array![1.0, 0.0], Philosopher::Nietzsche);
        assert_eq!(top, vec!["n1", "n2", "n3"]);
    }

    #[test]
    fn only_the_requested_philosopher_is_considered() {
        let corpus = test_corpus();
        let retriever = Retriever::new(&corpus);
        let top = retriever.rank(&array![1.0, 0.0], Philosopher::Nietzsche);
        // k1 matches the query exactly but belongs to Kant.
        assert!(!top.contains(&"k1"));
    }

    #[test]
    fn fewer_than_three_matches_returns_what_exists() {
        let corpus = test_corpus();
        let retriever = Retriever::new(&corpus);
        assert_eq!(retriever.rank(&array![1.0, 0.0], Philosopher::Kant), vec!["k1"]);
        assert!(retriever.rank(&array![1.0, 0.0], Philosopher::Mencius).is_empty());
    }

    #[test]
    fn ties_keep_table_order() {
        let records = vec![
            record(Philosopher::Kant, "first", array![1.0, 0.0]),
            record(Philosopher::Kant, "second", array![2.0, 0.0]),
            record(Philosopher::Kant, "third", array![3.0, 0.0]),
        ];
        let corpus =
            Corpus::from_json_slice(serde_json::to_vec(&records).unwrap().as_slice()).unwrap();
        let retriever = Retriever::new(&corpus);
        // All three are colinear with the query, so all similarities tie.
        let top = retriever.rank(&array![1.0, 0.0], Philosopher::Kant);
        assert_eq!(top, vec!["first", "second", "third"]);
    }
}
