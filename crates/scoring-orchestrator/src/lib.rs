use fundamental_scoring::{FundamentalScorer, MomentumScorer, ValuationScorer};
use scoring_core::{
    CompanyIdentity, CompanyObservation, ScoreComponents, ScoreResult, ScoringConfig, ScoringError,
    SubFactorScorer, TechnicalBackend,
};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use technical_scoring::LocalTechnicalBackend;
use tokio::sync::Semaphore;
use tokio::task::JoinError;

pub mod composite;
pub mod evaluator;
pub mod settings;
pub mod summary;

pub use composite::{CompositeAggregator, CompositeScores};
pub use evaluator::{SubFactorEvaluator, DEFAULT_TECHNICAL_TIMEOUT};
pub use settings::{EngineSettings, DEFAULT_MAX_CONCURRENCY};
pub use summary::{BatchSummary, NeutralCounts};


/// Per-company pipeline stage, emitted at debug level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Pending,
    ComputingSubfactors,
    Aggregating,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStage::Pending => "pending",
            PipelineStage::ComputingSubfactors => "computing_subfactors",
            PipelineStage::Aggregating => "aggregating",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Scores companies on four sub-factors and blends them into short and
/// long term composites.
///
/// Cloning is cheap; every clone shares the same scorers and backend.
#[derive(Clone)]
pub struct ScoringOrchestrator {
    technical_backend: Arc<dyn TechnicalBackend>,
    scorers: Arc<Vec<Box<dyn SubFactorScorer>>>,
    evaluator: SubFactorEvaluator,
    aggregator: CompositeAggregator,
    max_concurrency: usize,
}

impl ScoringOrchestrator {
    pub fn new(config: ScoringConfig) -> Self {
        let scorers: Vec<Box<dyn SubFactorScorer>> = vec![
            Box::new(MomentumScorer::new(&config)),
            Box::new(ValuationScorer::new(&config)),
            Box::new(FundamentalScorer::new(&config)),
        ];

        Self {
            technical_backend: Arc::new(LocalTechnicalBackend::new(&config)),
            scorers: Arc::new(scorers),
            evaluator: SubFactorEvaluator::new(&config, DEFAULT_TECHNICAL_TIMEOUT),
            aggregator: CompositeAggregator::new(&config),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Build from runtime settings, loading the threshold file if one is set.
    pub fn from_settings(settings: &EngineSettings) -> Result<Self, ScoringError> {
        settings.validate()?;
        let config = settings.load_config()?;
        Ok(Self::new(config)
            .with_technical_timeout(settings.technical_timeout)
            .with_max_concurrency(settings.max_concurrency))
    }

    /// Replace the in-process technical scorer, e.g. with a remote service
    pub fn with_technical_backend(mut self, backend: Arc<dyn TechnicalBackend>) -> Self {
        self.technical_backend = backend;
        self
    }

    pub fn with_technical_timeout(mut self, timeout: Duration) -> Self {
        self.evaluator = self.evaluator.with_technical_timeout(timeout);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn technical_backend_name(&self) -> &str {
        self.technical_backend.name()
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Score one company. Never fails: a pipeline error or a panic inside the
    /// pipeline yields the neutral fallback.
    pub async fn score_company(&self, observation: &CompanyObservation) -> ScoreResult {
        let orchestrator = self.clone();
        let owned = observation.clone();
        let outcome = tokio::spawn(async move { orchestrator.run_pipeline(&owned).await }).await;
        settle_company(observation.identity(), outcome)
    }

    async fn run_pipeline(&self, observation: &CompanyObservation) -> Result<ScoreResult, ScoringError> {
        let symbol = &observation.symbol;
        log_stage(symbol, PipelineStage::Pending);

        if symbol.trim().is_empty() {
            return Err(ScoringError::Pipeline("Observation has no symbol".to_string()));
        }

        log_stage(symbol, PipelineStage::ComputingSubfactors);
        let mut components = ScoreComponents::neutral();
        components.technical = self
            .evaluator
            .evaluate_technical(self.technical_backend.as_ref(), observation)
            .await;
        for scorer in self.scorers.iter() {
            let score = self.evaluator.evaluate(scorer.as_ref(), observation);
            components.set(scorer.factor(), score);
        }

        log_stage(symbol, PipelineStage::Aggregating);
        let composite = self.aggregator.aggregate(&components);

        log_stage(symbol, PipelineStage::Done);
        Ok(ScoreResult::new(
            observation.identity(),
            components,
            composite.short_term,
            composite.long_term,
        ))
    }

    /// Score a batch concurrently. Returns one result per input, in input order.
    pub async fn score_batch(&self, observations: Vec<CompanyObservation>) -> Vec<ScoreResult> {
        let total = observations.len();
        let started = Instant::now();
        tracing::info!(
            "Scoring {} companies ({} concurrent, technical backend: {})",
            total,
            self.max_concurrency,
            self.technical_backend.name()
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(total);

        for observation in observations {
            let identity = observation.identity();
            let orchestrator = self.clone();
            let semaphore = semaphore.clone();

            let handle = tokio::spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire().await.ok();
                orchestrator.run_pipeline(&observation).await
            });
            handles.push((identity, handle));
        }

        let mut results = Vec::with_capacity(total);
        for (identity, handle) in handles {
            results.push(settle_company(identity, handle.await));
        }

        let summary = BatchSummary::from_results(&results);
        tracing::info!(
            "Scored {} companies in {:.2?}: {} failures, {} neutral components",
            summary.companies,
            started.elapsed(),
            summary.failures,
            summary.neutral_components.total()
        );

        results
    }
}

impl Default for ScoringOrchestrator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Top-level boundary of a company pipeline: errors and panics become the fallback
fn settle_company(
    identity: CompanyIdentity,
    outcome: Result<Result<ScoreResult, ScoringError>, JoinError>,
) -> ScoreResult {
    let message = match outcome {
        Ok(Ok(result)) => return result,
        Ok(Err(e)) => e.to_string(),
        Err(e) => join_error_message(e),
    };
    log_stage(&identity.symbol, PipelineStage::Failed);
    tracing::error!("Scoring failed for {:?}: {}", identity.symbol, message);
    ScoreResult::fallback(identity, message)
}

fn log_stage(symbol: &str, stage: PipelineStage) {
    tracing::debug!("{} -> {}", symbol, stage);
}

fn join_error_message(error: JoinError) -> String {
    if !error.is_panic() {
        return format!("Scoring task cancelled: {}", error);
    }
    let payload = error.into_panic();
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    ScoringError::Pipeline(format!("Scoring task panicked: {}", detail)).to_string()
}
