//! Request orchestration.
//!
//! The [`Analyzer`] owns the process-wide engine (classifier + corpus) and
//! drives the per-request lifecycle: validate input, run inference, run
//! normalized retrieval, assemble the combined result.
//!
//! The engine is initialized lazily behind a [`tokio::sync::OnceCell`]:
//! concurrent first requests serialize on a single initialization attempt,
//! a failed attempt leaves the cell empty so a later request retries, and
//! re-running initialization once initialized is a no-op. After
//! initialization all engine state is read-only.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::classifier::{SequenceClassifier, TractClassifier};
use crate::config::Config;
use crate::corpus::Corpus;
use crate::models::{AnalysisResult, DatasetResult};
use crate::normalize::normalize;

/// Failure taxonomy for one analysis request.
///
/// Every failure is distinguishable from a successful-but-empty result:
/// an empty match set is success (the no-match sentinel), never an error.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Query text missing or empty; the request is not processed further.
    #[error("No text provided")]
    InvalidInput,

    /// Classifier or corpus failed to initialize.
    #[error("analyzer unavailable: {0}")]
    Unavailable(String),

    /// Tokenization or forward pass failed on an initialized engine.
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Immutable engine state shared by all requests.
pub struct Engine {
    pub classifier: Arc<dyn SequenceClassifier>,
    pub corpus: Corpus,
}

/// The request-processing service.
pub struct Analyzer {
    config: Config,
    engine: OnceCell<Arc<Engine>>,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            engine: OnceCell::new(),
        }
    }

    /// Constructs an analyzer with a pre-built engine (used by tests to
    /// substitute a stub classifier).
    pub fn with_engine(config: Config, engine: Engine) -> Self {
        Self {
            config,
            engine: OnceCell::new_with(Some(Arc::new(engine))),
        }
    }

    /// Returns the engine, initializing it on first demand.
    pub async fn engine(&self) -> Result<Arc<Engine>, AnalyzeError> {
        self.engine
            .get_or_try_init(|| async { load_engine(&self.config).await.map(Arc::new) })
            .await
            .cloned()
    }

    /// Eagerly initializes the engine. Idempotent: a second call on an
    /// initialized analyzer does not reload artifacts.
    pub async fn init(&self) -> Result<(), AnalyzeError> {
        self.engine().await.map(|_| ())
    }

    /// Runs the full pipeline for one request.
    pub async fn analyze(&self, raw_text: &str) -> Result<AnalysisResult, AnalyzeError> {
        if raw_text.is_empty() {
            return Err(AnalyzeError::InvalidInput);
        }

        let engine = self.engine().await?;

        let classifier = engine.classifier.clone();
        let text = raw_text.to_string();
        let model_analysis = tokio::task::spawn_blocking(move || classifier.classify(&text))
            .await
            .map_err(|e| AnalyzeError::Inference(e.to_string()))?
            .map_err(|e| AnalyzeError::Inference(format!("{:#}", e)))?;

        let term = normalize(raw_text);
        let matches = engine.corpus.search(&term);

        Ok(AnalysisResult {
            model_analysis,
            dataset_result: DatasetResult::from_matches(matches),
        })
    }
}

/// Loads the classifier and corpus named by the configuration.
async fn load_engine(config: &Config) -> Result<Engine, AnalyzeError> {
    let model_cfg = config.model.clone();
    let classifier = tokio::task::spawn_blocking(move || {
        TractClassifier::load(&model_cfg.dir, model_cfg.max_tokens)
    })
    .await
    .map_err(|e| AnalyzeError::Unavailable(e.to_string()))?
    .map_err(|e| AnalyzeError::Unavailable(format!("{:#}", e)))?;

    let corpus =
        Corpus::load(&config.corpus.path).map_err(|e| AnalyzeError::Unavailable(format!("{:#}", e)))?;

    Ok(Engine {
        classifier: Arc::new(classifier),
        corpus,
    })
}
