//! Dictionary validator: one corpus fetch per session, constant-time lookup.

use async_trait::async_trait;
use reqwest::Client;
use spellkit_core::DictionaryError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Newline-delimited Dutch word list.
pub const DEFAULT_CORPUS_URL: &str =
    "https://raw.githubusercontent.com/dwyl/dutch-words/master/words.txt";

/// Characters stripped from both ends of a word before lookup.
const EDGE_PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`',
    '~', '(', ')',
];

/// Lookup form of a word: trimmed, lowercased, edge punctuation removed.
pub fn normalize(word: &str) -> String {
    word.trim()
        .to_lowercase()
        .trim_matches(EDGE_PUNCTUATION)
        .to_string()
}

// ============================================================================
// CORPUS SOURCES
// ============================================================================

/// Where the raw word list comes from.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    async fn fetch(&self) -> Result<String, DictionaryError>;

    /// Short label for logs and errors.
    fn name(&self) -> &str;
}

/// Plain-text corpus served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCorpusSource {
    client: Client,
    url: String,
}

impl HttpCorpusSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DictionaryError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DictionaryError::FetchFailed {
                source_name: url.clone(),
                reason: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl CorpusSource for HttpCorpusSource {
    async fn fetch(&self) -> Result<String, DictionaryError> {
        let fail = |reason: String| DictionaryError::FetchFailed {
            source_name: self.url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| fail(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(fail(format!("HTTP status {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| fail(format!("Failed to read body: {}", e)))
    }

    fn name(&self) -> &str {
        &self.url
    }
}

/// In-memory corpus, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    text: String,
}

impl StaticCorpus {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = words
            .into_iter()
            .map(|w| w.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self { text }
    }
}

#[async_trait]
impl CorpusSource for StaticCorpus {
    async fn fetch(&self) -> Result<String, DictionaryError> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

// ============================================================================
// DICTIONARY
// ============================================================================

/// Session-wide word set. Loading is idempotent and concurrent callers share
/// one fetch. A failed fetch leaves an empty set, so every word reads as
/// unknown.
pub struct Dictionary {
    source: Arc<dyn CorpusSource>,
    words: OnceCell<HashSet<String>>,
}

impl Dictionary {
    pub fn new(source: Arc<dyn CorpusSource>) -> Self {
        Self {
            source,
            words: OnceCell::new(),
        }
    }

    /// Dictionary already holding `words`; `ensure_loaded` is a no-op.
    pub fn preloaded<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            source: Arc::new(StaticCorpus::default()),
            words: OnceCell::new_with(Some(set)),
        }
    }

    pub async fn ensure_loaded(&self) {
        self.words
            .get_or_init(|| async {
                match self.source.fetch().await {
                    Ok(text) => {
                        let set = parse_corpus(&text);
                        tracing::info!(
                            source = self.source.name(),
                            words = set.len(),
                            "Dictionary loaded"
                        );
                        set
                    }
                    Err(e) => {
                        tracing::warn!(
                            source = self.source.name(),
                            error = %e,
                            "Dictionary unavailable, every word will read as unknown"
                        );
                        HashSet::new()
                    }
                }
            })
            .await;
    }

    pub fn is_loaded(&self) -> bool {
        self.words.initialized()
    }

    /// Case-insensitive, punctuation-trimmed membership. False before loading.
    pub fn is_known(&self, word: &str) -> bool {
        let key = normalize(word);
        if key.is_empty() {
            return false;
        }
        self.words
            .get()
            .map(|set| set.contains(&key))
            .unwrap_or(false)
    }

    /// Words from `words` the dictionary does not know, in input order.
    pub fn unknown_words<I, S>(&self, words: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .filter(|w| !self.is_known(w.as_ref()))
            .map(|w| w.as_ref().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.words.get().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("source", &self.source.name())
            .field("loaded", &self.is_loaded())
            .field("words", &self.len())
            .finish()
    }
}

fn parse_corpus(text: &str) -> HashSet<String> {
    text.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
