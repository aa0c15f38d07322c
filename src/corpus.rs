use crate::config::Config;
use crate::persona::Philosopher;
use anyhow::{anyhow, Context, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// One pre-embedded excerpt from a philosopher's writings. Immutable after
/// load. The embedding travels as a plain JSON number list.
#[derive(Debug, Clone, Serialize)]
pub struct PassageRecord {
    pub philosopher: Philosopher,
    #[serde(rename = "paragraph")]
    pub passage_text: String,
    #[serde(serialize_with = "serialize_embedding")]
    pub embedding: Array1<f32>,
}

/// A corpus row as hosted. The table may carry philosophers the UI does not
/// offer; the column stays a plain string until rows are filtered at load.
#[derive(Deserialize)]
struct RawRecord {
    philosopher: String,
    #[serde(alias = "paragraph")]
    passage_text: String,
    #[serde(deserialize_with = "deserialize_embedding")]
    embedding: Array1<f32>,
}

fn serialize_embedding<S: serde::Serializer>(
    embedding: &Array1<f32>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(embedding.iter())
}

fn deserialize_embedding<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Array1<f32>, D::Error> {
    Vec::<f32>::deserialize(deserializer).map(Array1::from)
}

/// The in-memory corpus table, loaded once at startup and shared read-only
/// for the lifetime of the process.
pub struct Corpus {
    records: Vec<PassageRecord>,
}

impl Corpus {
    /// Parses the JSON table, keeping only rows whose philosopher is one the
    /// UI offers. The hosted table carries more philosophers than the four
    /// selectable ones; those rows are skipped, not treated as errors.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let raw: Vec<RawRecord> =
            serde_json::from_slice(bytes).context("failed to parse corpus table")?;
        let total = raw.len();

        let records: Vec<PassageRecord> = raw
            .into_iter()
            .filter_map(|row| match row.philosopher.parse::<Philosopher>() {
                Ok(philosopher) => Some(PassageRecord {
                    philosopher,
                    passage_text: row.passage_text,
                    embedding: row.embedding,
                }),
                Err(_) => {
                    debug!(philosopher = %row.philosopher, "skipping unselectable corpus row");
                    None
                }
            })
            .collect();

        if records.is_empty() {
            return Err(anyhow!(
                "corpus table has no rows for a selectable philosopher ({} rows total)",
                total
            ));
        }
        Ok(Corpus { records })
    }

    /// Fetches the corpus table, reusing a local copy under the user cache
    /// directory when one exists (download once, then reuse).
    pub async fn load(cfg: &Config) -> Result<Self> {
        let cache_path = Self::cache_path()?;
        if cache_path.exists() {
            info!(path = %cache_path.display(), "loading corpus from cache");
            let bytes = fs::read(&cache_path)
                .with_context(|| format!("failed to read corpus cache at {:?}", cache_path))?;
            return Self::from_json_slice(&bytes);
        }

        info!(url = %cfg.corpus_url, "downloading corpus table");
        let response = reqwest::get(&cfg.corpus_url)
            .await
            .context("corpus download failed")?;
        if !response.status().is_success() {
            return Err(anyhow!("corpus download failed: {}", response.status()));
        }
        let bytes = response.bytes().await.context("corpus download failed")?;

        let corpus = Self::from_json_slice(&bytes)?;
        if let Some(dir) = cache_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&cache_path, &bytes)
            .with_context(|| format!("failed to write corpus cache at {:?}", cache_path))?;
        info!(records = corpus.records.len(), "corpus loaded");
        Ok(corpus)
    }

    fn cache_path() -> Result<PathBuf> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| anyhow!("could not determine cache directory"))?
            .join("philosopher-chat");
        Ok(dir.join("corpus.json"))
    }

    pub fn records(&self) -> &[PassageRecord] {
        &self.records
    }
}

/// Normalized dot-product similarity between two vectors, in [-1, 1].
/// Zero vectors compare as 0.
pub fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let dot_product = a.dot(b);
    let norm_a = a.dot(a).sqrt();
    let norm_b = b.dot(b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
