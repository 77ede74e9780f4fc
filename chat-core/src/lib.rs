//! Document-chat orchestrator.
//!
//! Public API: [`DocChat`]. One instance owns one in-memory [`VectorIndex`]
//! generation and the conversation history. Construct it with an embedding
//! provider and a generation provider, then drive it with:
//! - [`DocChat::ingest`] — chunk → embed (batched) → swap the index
//! - [`DocChat::ask`]    — embed the question → top-K search → prompt → answer
//! - [`DocChat::reset`]  — discard index and history
//!
//! The ask path never returns an error to the caller: a failed query
//! embedding or a failed generation call degrades into a fixed user-facing
//! answer string, and the session continues. Ingestion has exactly one hard
//! failure: a document that yields no indexable text.

mod api_types;
mod cfg;
mod error;
mod generate;
mod progress;
mod prompt;
mod source;

pub use api_types::{DocumentSummary, Role, Turn};
pub use cfg::ChatConfig;
pub use error::ChatError;
pub use generate::{GeminiGenerator, Generator};
pub use progress::{IndicatifProgress, NoopProgress, Progress};
pub use prompt::{NO_CONTEXT_MARKER, SYSTEM_RULES};
pub use source::{InMemoryPages, PageSource};

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use doc_index::embed::{EmbedIntent, Embedder};
use doc_index::embed::gemini::GeminiEmbedder;
use doc_index::{VectorIndex, chunk_page, embed_segments};
use llm_service::{Backoff, GeminiService};

/// Reply used when the question itself could not be embedded. No generation
/// call is made in that case; there is nothing to retrieve with.
pub const EMBED_FAILURE_REPLY: &str =
    "I'm sorry, I had trouble processing your question (Embedding Failed). Please try again.";

/// Reply used when the generation backend fails.
pub const GENERATION_FAILURE_REPLY: &str =
    "I encountered an error while communicating with the AI model.";

/// Retrieval-augmented chat over one loaded document.
///
/// `&mut self` on every mutating operation is the concurrency model: one
/// ingest or one question at a time per instance, no partially-visible index
/// states.
pub struct DocChat {
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    cfg: ChatConfig,
    index: VectorIndex,
    history: Vec<Turn>,
}

impl DocChat {
    /// Creates an orchestrator with explicit providers (tests inject their
    /// own here).
    pub fn new(embedder: Arc<dyn Embedder>, generator: Arc<dyn Generator>, cfg: ChatConfig) -> Self {
        Self {
            embedder,
            generator,
            cfg,
            index: VectorIndex::new(),
            history: Vec::new(),
        }
    }

    /// Convenience constructor wiring both providers to one shared Gemini
    /// service, with retries on the embedding side.
    pub fn with_gemini(svc: Arc<GeminiService>, backoff: Backoff, cfg: ChatConfig) -> Self {
        Self::new(
            Arc::new(GeminiEmbedder::new(svc.clone(), backoff)),
            Arc::new(GeminiGenerator::new(svc)),
            cfg,
        )
    }

    /// Loads a document: chunk every page, embed in batches, then swap the
    /// live index generation in one step.
    ///
    /// Embedding failures degrade per segment (kept without a vector); the
    /// load as a whole still succeeds. Loading also clears the conversation
    /// history: a new document starts a new conversation.
    ///
    /// # Errors
    /// [`ChatError::EmptyDocument`] if no page produced a usable segment; the
    /// previously loaded document (if any) stays live and searchable.
    pub async fn ingest(
        &mut self,
        source: &dyn PageSource,
        progress: &dyn Progress,
    ) -> Result<DocumentSummary, ChatError> {
        let total = source.page_count();
        info!("ingest: name={} pages={}", source.name(), total);
        progress.begin(total);

        let mut segments = Vec::new();
        for i in 0..total {
            let page_no = (i + 1) as u32;
            segments.extend(chunk_page(source.page_text(i), page_no, &self.cfg.chunking));
            progress.page_chunked(i + 1, total);
        }

        if segments.is_empty() {
            warn!("ingest: no indexable text in {}", source.name());
            return Err(ChatError::EmptyDocument);
        }
        debug!("ingest: {} segments chunked", segments.len());

        progress.stage("generating embeddings");
        let embedded = embed_segments(segments, self.embedder.as_ref(), &self.cfg.batching).await;

        progress.stage("indexing vectors");
        let segment_count = embedded.len();
        self.index.reset_with(embedded);
        self.history.clear();

        progress.finish("document ready");
        info!("ingest: done, {} segments live", segment_count);

        Ok(DocumentSummary {
            name: source.name().to_string(),
            size_bytes: source.byte_size(),
            page_count: total as u32,
            segment_count,
            loaded_at: Utc::now(),
            processed: true,
        })
    }

    /// Answers a question against the loaded document.
    ///
    /// Degraded outcomes are answers, not errors: a failed query embedding
    /// returns [`EMBED_FAILURE_REPLY`] (without contacting the generation
    /// backend), a failed generation call returns
    /// [`GENERATION_FAILURE_REPLY`]. Both are recorded as regular assistant
    /// turns so the conversation continues normally.
    pub async fn ask(&mut self, question: &str) -> String {
        debug!("ask: {} indexed segments", self.index.len());

        let embedded = self.embedder.embed(question, EmbedIntent::Query, None).await;
        let query_vector = match embedded {
            Ok(v) => v,
            Err(e) => {
                warn!("ask: query embedding failed: {e}");
                return self.exchange(question, EMBED_FAILURE_REPLY.to_string());
            }
        };

        let hits = self.index.search(&query_vector, self.cfg.top_k);
        debug!("ask: {} context segments retrieved", hits.len());

        let recent_start = self.history.len().saturating_sub(self.cfg.history_turns);
        let prompt = prompt::build_prompt(question, &hits, &self.history[recent_start..]);

        let generated = self.generator.generate(&prompt, self.cfg.temperature).await;
        match generated {
            Ok(answer) => self.exchange(question, answer),
            Err(e) => {
                warn!("ask: generation failed: {e}");
                self.exchange(question, GENERATION_FAILURE_REPLY.to_string())
            }
        }
    }

    /// Discards the current index generation and the conversation history.
    pub fn reset(&mut self) {
        info!("reset: dropping index and history");
        self.index.clear();
        self.history.clear();
    }

    /// Read-only view of the conversation so far.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Number of segments currently indexed.
    pub fn indexed_segments(&self) -> usize {
        self.index.len()
    }

    /// Records one question/answer exchange and returns the answer.
    fn exchange(&mut self, question: &str, answer: String) -> String {
        self.history.push(Turn::user(question));
        self.history.push(Turn::assistant(answer.clone()));
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_index::embed::fixed::FixedEmbedder;
    use doc_index::{ChunkConfig, EmbedBatchConfig};
    use llm_service::LlmError;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Generator double: counts calls, records the last prompt, optionally
    /// fails every call.
    #[derive(Default)]
    struct RecordingGenerator {
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
        fail: bool,
    }

    impl RecordingGenerator {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_prompt(&self) -> String {
            self.last_prompt.lock().unwrap().clone().unwrap_or_default()
        }
    }

    impl Generator for RecordingGenerator {
        fn generate<'a>(
            &'a self,
            prompt: &'a str,
            _temperature: f32,
        ) -> Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
                if self.fail {
                    Err(ChatError::Generation(LlmError::Decode("backend down".into())))
                } else {
                    Ok("Here is the grounded answer.".to_string())
                }
            })
        }
    }

    fn test_cfg() -> ChatConfig {
        ChatConfig {
            top_k: 2,
            history_turns: 4,
            temperature: 0.3,
            chunking: ChunkConfig {
                window_chars: 120,
                overlap_chars: 20,
                min_chars: 10,
            },
            batching: EmbedBatchConfig {
                batch_size: 3,
                pause: Duration::ZERO,
            },
        }
    }

    fn chat(embedder: FixedEmbedder, generator: Arc<RecordingGenerator>) -> DocChat {
        DocChat::new(Arc::new(embedder), generator, test_cfg())
    }

    fn page(text: &str) -> String {
        // Pad pages so each one clears the minimum-content floor.
        format!("{text} This sentence pads the page with enough text to index.")
    }

    /// Progress double recording every per-page callback.
    #[derive(Default)]
    struct CountingProgress {
        pages: Mutex<Vec<(usize, usize)>>,
    }

    impl Progress for CountingProgress {
        fn page_chunked(&self, page: usize, total: usize) {
            self.pages.lock().unwrap().push((page, total));
        }
    }

    #[tokio::test]
    async fn ingest_reports_progress_and_summarizes() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut chat = chat(FixedEmbedder::new(), generator);

        let source = InMemoryPages::with_byte_size(
            "manual.pdf",
            vec![page("Install instructions."), page("Troubleshooting steps.")],
            4096,
        );
        let progress = CountingProgress::default();
        let summary = chat.ingest(&source, &progress).await.unwrap();

        assert_eq!(summary.name, "manual.pdf");
        assert_eq!(summary.size_bytes, 4096);
        assert_eq!(summary.page_count, 2);
        assert!(summary.processed);
        assert_eq!(summary.segment_count, chat.indexed_segments());
        assert!(summary.segment_count >= 2);

        // One callback per chunked page, in order, with the right total.
        assert_eq!(*progress.pages.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }

    #[tokio::test]
    async fn empty_document_fails_and_leaves_prior_index_live() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut chat = chat(FixedEmbedder::new(), generator.clone());

        let good = InMemoryPages::new("good.pdf", vec![page("Useful content here.")]);
        chat.ingest(&good, &NoopProgress).await.unwrap();
        let live = chat.indexed_segments();
        assert!(live > 0);

        let empty = InMemoryPages::new("blank.pdf", vec!["   ".into(), "\n\n".into()]);
        let err = chat.ingest(&empty, &NoopProgress).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyDocument));

        // The failed load must not have touched the previous generation.
        assert_eq!(chat.indexed_segments(), live);
        chat.ask("what does it say?").await;
        assert!(generator.last_prompt().contains("Useful content here."));
    }

    #[tokio::test]
    async fn new_document_replaces_the_old_generation_wholesale() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut chat = chat(FixedEmbedder::new(), generator.clone());

        let first = InMemoryPages::new("first.pdf", vec![page("Chapter about oranges.")]);
        chat.ingest(&first, &NoopProgress).await.unwrap();

        let second = InMemoryPages::new("second.pdf", vec![page("Chapter about apples.")]);
        chat.ingest(&second, &NoopProgress).await.unwrap();

        chat.ask("which fruit?").await;
        let prompt = generator.last_prompt();
        assert!(prompt.contains("apples"));
        assert!(!prompt.contains("oranges"));
    }

    #[tokio::test]
    async fn embedding_failures_degrade_but_ingest_succeeds() {
        // Every embed call fails: segments are kept, just without vectors.
        let generator = Arc::new(RecordingGenerator::default());
        let mut chat = chat(FixedEmbedder::failing_on(""), generator);

        let source = InMemoryPages::new("doc.pdf", vec![page("Some content.")]);
        let summary = chat.ingest(&source, &NoopProgress).await.unwrap();
        assert!(summary.processed);
        assert!(summary.segment_count > 0);
    }

    #[tokio::test]
    async fn vector_less_segments_lose_to_embedded_ones() {
        let generator = Arc::new(RecordingGenerator::default());
        let embedder = FixedEmbedder::failing_on("POISONMARK");
        let mut chat = DocChat::new(Arc::new(embedder), generator.clone(), test_cfg());

        let source = InMemoryPages::new(
            "doc.pdf",
            vec![
                page("Plain first page."),
                page("POISONMARK second page."),
                page("Plain third page."),
            ],
        );
        chat.ingest(&source, &NoopProgress).await.unwrap();

        chat.ask("tell me about the pages").await;
        // top_k = 2 and two segments carry vectors: the vector-less one can
        // never make the cut.
        let prompt = generator.last_prompt();
        assert!(!prompt.contains("POISONMARK"));
        assert!(prompt.contains("[Page 1]"));
        assert!(prompt.contains("[Page 3]"));
    }

    #[tokio::test]
    async fn empty_index_still_prompts_with_the_no_context_marker() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut chat = chat(FixedEmbedder::new(), generator.clone());

        let answer = chat.ask("anything at all?").await;
        assert_eq!(answer, "Here is the grounded answer.");
        assert_eq!(generator.call_count(), 1);
        assert!(generator.last_prompt().contains(NO_CONTEXT_MARKER));
    }

    #[tokio::test]
    async fn query_embedding_failure_returns_apology_without_generating() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut chat = chat(FixedEmbedder::failing_on("unembeddable"), generator.clone());

        let answer = chat.ask("this is unembeddable today").await;
        assert_eq!(answer, EMBED_FAILURE_REPLY);
        assert_eq!(generator.call_count(), 0);

        // The exchange is still part of the transcript.
        assert_eq!(chat.history().len(), 2);
        assert_eq!(chat.history()[1].content, EMBED_FAILURE_REPLY);
    }

    #[tokio::test]
    async fn generation_failure_substitutes_the_fixed_reply() {
        let generator = Arc::new(RecordingGenerator::failing());
        let mut chat = chat(FixedEmbedder::new(), generator.clone());

        let answer = chat.ask("does it work?").await;
        assert_eq!(answer, GENERATION_FAILURE_REPLY);
        assert_eq!(generator.call_count(), 1);

        // The conversation continues normally afterwards.
        let again = chat.ask("still there?").await;
        assert_eq!(again, GENERATION_FAILURE_REPLY);
        assert_eq!(chat.history().len(), 4);
    }

    #[tokio::test]
    async fn history_is_windowed_into_the_prompt() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut chat = chat(FixedEmbedder::new(), generator.clone());

        for i in 0..4 {
            chat.ask(&format!("question number {i}")).await;
        }

        // history_turns = 4 → the prompt sees the two most recent exchanges,
        // not the first question.
        let prompt = generator.last_prompt();
        assert!(prompt.contains("user: question number 2"));
        assert!(!prompt.contains("user: question number 0"));
        assert!(prompt.ends_with("User Question:\nquestion number 3"));
    }

    #[tokio::test]
    async fn reset_clears_index_and_history() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut chat = chat(FixedEmbedder::new(), generator.clone());

        let source = InMemoryPages::new("doc.pdf", vec![page("Content to forget.")]);
        chat.ingest(&source, &NoopProgress).await.unwrap();
        chat.ask("remember this").await;

        chat.reset();
        assert_eq!(chat.indexed_segments(), 0);
        assert!(chat.history().is_empty());

        chat.ask("after reset?").await;
        assert!(generator.last_prompt().contains(NO_CONTEXT_MARKER));
    }
}
