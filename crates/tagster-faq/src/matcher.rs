//! Retrieval matcher — the answer pipeline.
//!
//! Flow: load the FAQ store, embed every canonical question (cached per
//! source digest), embed the live question, score all pairs with cosine
//! similarity, and either return the stored answer for the best match or
//! delegate to the completion service primed with the full FAQ.
//!
//! Embedding calls run strictly in sequence — one per FAQ question plus one
//! for the live question — so latency scales linearly with FAQ size. The
//! dataset is small; the per-digest cache keeps the linear cost to the
//! first request per FAQ version.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use tagster_core::TagsterConfig;
use tagster_core::error::Result;
use tagster_core::traits::provider::{CompletionProvider, EmbeddingProvider};
use tagster_core::types::{AnswerSource, EmbeddingVector, FaqAnswer, FaqEntry, Message};

use crate::similarity::cosine_similarity;
use crate::store::FaqStore;

/// System instruction for the fallback completion.
const FALLBACK_SYSTEM_PROMPT: &str =
    "You are an FAQ assistant. Answer questions based on the available information.";

/// FAQ question embeddings, valid for one version of the source file.
struct EmbeddingCache {
    /// SHA-256 of the raw FAQ file bytes these embeddings were built from.
    digest: [u8; 32],
    /// One embedding per store entry, in store order.
    embeddings: Arc<Vec<EmbeddingVector>>,
}

/// Answers questions from the FAQ store, falling back to a completion
/// service when no entry is similar enough.
pub struct FaqMatcher {
    store_path: PathBuf,
    threshold: f32,
    embedder: Arc<dyn EmbeddingProvider>,
    completer: Arc<dyn CompletionProvider>,
    cache: Mutex<Option<EmbeddingCache>>,
}

impl FaqMatcher {
    pub fn new(
        config: &TagsterConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            store_path: PathBuf::from(&config.faq.path),
            threshold: config.faq.similarity_threshold,
            embedder,
            completer,
            cache: Mutex::new(None),
        }
    }

    /// Answer a question, returning only the text.
    pub async fn answer(&self, question: &str) -> Result<String> {
        self.answer_detailed(question).await.map(|answer| answer.text)
    }

    /// Answer a question, reporting which path produced the text.
    pub async fn answer_detailed(&self, question: &str) -> Result<FaqAnswer> {
        let (entries, digest) = FaqStore::load_with_digest(&self.store_path)?;
        let faq_embeddings = self.faq_embeddings(&entries, digest).await?;
        let query_embedding = self.embedder.embed(question).await?;

        // Strict `>` on both comparisons: the first entry in store order
        // wins ties, and a score exactly at the threshold falls through.
        let mut best: Option<(usize, f32)> = None;
        for (idx, embedding) in faq_embeddings.iter().enumerate() {
            let score = cosine_similarity(&query_embedding, embedding)?;
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((idx, score));
            }
        }

        if let Some((idx, score)) = best
            && score > self.threshold
        {
            let entry = &entries[idx];
            tracing::debug!(score, matched = %entry.question, "FAQ match above threshold");
            return Ok(FaqAnswer {
                text: entry.answer.clone(),
                source: AnswerSource::Faq {
                    question: entry.question.clone(),
                    score,
                },
            });
        }

        let best_score = best.map(|(_, score)| score).unwrap_or(-1.0);
        tracing::debug!(
            best_score,
            threshold = self.threshold,
            "no FAQ match, delegating to completion service"
        );
        let text = self.generate_fallback(&entries, question).await?;
        Ok(FaqAnswer {
            text,
            source: AnswerSource::Generated,
        })
    }

    /// FAQ question embeddings for the given source version.
    ///
    /// Rebuilt only when the source digest changes. Each question is
    /// embedded with its own sequential provider call; the live question is
    /// never cached.
    async fn faq_embeddings(
        &self,
        entries: &[FaqEntry],
        digest: [u8; 32],
    ) -> Result<Arc<Vec<EmbeddingVector>>> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref()
            && cached.digest == digest
        {
            return Ok(Arc::clone(&cached.embeddings));
        }

        tracing::debug!("embedding {} FAQ questions", entries.len());
        let mut embeddings = Vec::with_capacity(entries.len());
        for entry in entries {
            embeddings.push(self.embedder.embed(&entry.question).await?);
        }

        let embeddings = Arc::new(embeddings);
        *cache = Some(EmbeddingCache {
            digest,
            embeddings: Arc::clone(&embeddings),
        });
        Ok(embeddings)
    }

    /// Ask the completion service, primed with the full FAQ as context.
    async fn generate_fallback(&self, entries: &[FaqEntry], question: &str) -> Result<String> {
        let mut context = String::from("FAQ:\n");
        for entry in entries {
            context.push_str(&format!("Q: {}\nA: {}\n\n", entry.question, entry.answer));
        }

        let messages = [
            Message::system(FALLBACK_SYSTEM_PROMPT),
            Message::user(format!("{context}\nUser question: {question}")),
        ];
        self.completer.complete(&messages).await
    }
}
