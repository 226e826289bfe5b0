//! Run Council use case
//!
//! Orchestrates the full deliberation flow as a linear state machine:
//! first opinions, then (unless fast mode) anonymized cross-review, then
//! chairman synthesis. Per-call failures are absorbed into outcomes and
//! recorded; they become fatal only at the two explicit gates (quorum,
//! chairman validity).

use crate::gateway_client::{GatewayClient, RetryPolicy, Sleeper};
use crate::ports::llm_gateway::{ChatPrompt, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use chrono::{SecondsFormat, Utc};
use council_domain::{
    CouncilConfig, CouncilResult, Councilor, FailureClass, FailureRecord, IndividualAnswer,
    ModelOutcome, PeerReview, PromptTemplate, Question, ReviewAssignment, Stage, Synthesis,
    extract_payload,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort a council run
///
/// Every fatal variant carries the non-fatal failures recorded up to the
/// abort, so the caller can explain why the council could not complete.
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error("council has no councilors")]
    EmptyCouncil,

    #[error("quorum not met: only {succeeded} of {required} required councilors answered")]
    QuorumNotMet {
        succeeded: usize,
        required: usize,
        failures: Vec<FailureRecord>,
    },

    #[error("chairman call failed: {message}")]
    ChairmanFailed {
        message: String,
        failures: Vec<FailureRecord>,
    },

    #[error("chairman output invalid: {reason}")]
    ChairmanInvalid {
        reason: String,
        /// Raw chairman response, preserved for diagnostics
        raw_response: String,
        failures: Vec<FailureRecord>,
    },

    #[error("deliberation cancelled")]
    Cancelled,
}

impl RunCouncilError {
    /// Non-fatal failures accumulated before the abort
    pub fn failures(&self) -> &[FailureRecord] {
        match self {
            RunCouncilError::QuorumNotMet { failures, .. }
            | RunCouncilError::ChairmanFailed { failures, .. }
            | RunCouncilError::ChairmanInvalid { failures, .. } => failures,
            _ => &[],
        }
    }
}

/// Input for the RunCouncil use case
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    /// The question to deliberate on
    pub question: Question,
    /// Council lineup (councilors answer and review, the chairman synthesizes)
    pub council: CouncilConfig,
    /// Fast mode skips the cross-review stage entirely
    pub fast: bool,
}

impl RunCouncilInput {
    pub fn new(question: impl Into<Question>, council: CouncilConfig) -> Self {
        Self {
            question: question.into(),
            council,
            fast: false,
        }
    }

    pub fn fast(mut self) -> Self {
        self.fast = true;
        self
    }
}

/// Outcome of the synthesis stage before failures are attached
enum SynthesisFailure {
    CallFailed(String),
    Invalid { reason: String, raw: String },
    Cancelled,
}

/// Use case for running a council deliberation
pub struct RunCouncilUseCase<G: LlmGateway + 'static> {
    client: GatewayClient<G>,
    seed: Option<u64>,
    cancel: CancellationToken,
}

impl<G: LlmGateway + 'static> RunCouncilUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            client: GatewayClient::new(gateway),
            seed: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.client = self.client.with_policy(policy);
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.client = self.client.with_sleeper(sleeper);
        self
    }

    /// Fix the anonymization seed, making label permutations deterministic.
    /// Production runs leave this unset and draw from entropy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Attach an external cancellation signal. When it fires, in-flight
    /// stage barriers abort early and the run fails as cancelled.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunCouncilInput) -> Result<CouncilResult, RunCouncilError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilResult, RunCouncilError> {
        if input.council.councilors.is_empty() {
            return Err(RunCouncilError::EmptyCouncil);
        }

        let started_at = Utc::now();
        let t0 = Instant::now();

        info!(
            councilors = input.council.councilors.len(),
            fast = input.fast,
            "convening the council"
        );

        let mut failures: Vec<FailureRecord> = Vec::new();

        // Stage 1: first opinions, with the quorum gate
        let outcomes = self.first_opinions(&input, progress).await?;
        failures.extend(outcomes.iter().filter_map(ModelOutcome::failure_record));

        let successes: Vec<(Councilor, String)> = outcomes
            .iter()
            .filter_map(|o| {
                o.answer()
                    .map(|answer| (o.councilor().clone(), answer.to_string()))
            })
            .collect();

        let required = input.council.min_quorum;
        if successes.len() < required {
            warn!(
                succeeded = successes.len(),
                required, "aborting: quorum not met"
            );
            return Err(RunCouncilError::QuorumNotMet {
                succeeded: successes.len(),
                required,
                failures,
            });
        }

        // Stage 2: anonymized cross-review (optional)
        let reviews = if input.fast {
            debug!("skipping cross-review (fast mode)");
            progress.on_stage_skipped(&Stage::CrossReview);
            Vec::new()
        } else {
            let (reviews, review_failures) =
                self.cross_review(&input, &successes, progress).await?;
            failures.extend(review_failures);
            reviews
        };

        // Stage 3: chairman synthesis, with the validity gate
        let synthesis = match self
            .synthesize(&input, &successes, &reviews, progress)
            .await
        {
            Ok(synthesis) => synthesis,
            Err(SynthesisFailure::Cancelled) => return Err(RunCouncilError::Cancelled),
            Err(SynthesisFailure::CallFailed(message)) => {
                return Err(RunCouncilError::ChairmanFailed { message, failures });
            }
            Err(SynthesisFailure::Invalid { reason, raw }) => {
                return Err(RunCouncilError::ChairmanInvalid {
                    reason,
                    raw_response: raw,
                    failures,
                });
            }
        };

        let individual_answers = successes
            .iter()
            .map(|(councilor, answer)| IndividualAnswer::new(councilor.name.clone(), answer.clone()))
            .collect();

        Ok(CouncilResult::assemble(
            input.question.content(),
            synthesis,
            individual_answers,
            reviews,
            input.council.chairman.name.clone(),
            input.council.councilor_names(),
            input.fast,
            started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            t0.elapsed().as_secs_f64(),
            failures,
        ))
    }

    /// Stage 1: ask every councilor the question concurrently.
    ///
    /// The barrier waits for all calls to settle; outcomes are reported in
    /// council order regardless of completion order.
    async fn first_opinions(
        &self,
        input: &RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<ModelOutcome>, RunCouncilError> {
        if self.cancel.is_cancelled() {
            return Err(RunCouncilError::Cancelled);
        }

        let stage = Stage::FirstOpinions;
        info!("{stage}");
        progress.on_stage_start(&stage, input.council.councilors.len());

        let mut join_set = JoinSet::new();
        for (index, councilor) in input.council.councilors.iter().cloned().enumerate() {
            let client = self.client.clone();
            let prompt = ChatPrompt::new(
                PromptTemplate::opinion_system(),
                PromptTemplate::opinion_query(input.question.content()),
            );
            join_set.spawn(async move {
                let outcome = client.call(&councilor, &prompt).await;
                (index, outcome)
            });
        }

        let outcomes = self.drain(&mut join_set, &stage, progress).await?;
        progress.on_stage_complete(&stage);
        Ok(outcomes)
    }

    /// Stage 2: each successful councilor reviews the others anonymously.
    ///
    /// Reviewer failures never abort the stage; they are returned as
    /// failure records alongside the completed reviews.
    async fn cross_review(
        &self,
        input: &RunCouncilInput,
        successes: &[(Councilor, String)],
        progress: &dyn ProgressNotifier,
    ) -> Result<(Vec<PeerReview>, Vec<FailureRecord>), RunCouncilError> {
        if self.cancel.is_cancelled() {
            return Err(RunCouncilError::Cancelled);
        }

        // Each reviewer draws its own independent permutation; a fixed seed
        // keeps them deterministic for tests while still differing across
        // reviewers.
        let assignments: Vec<ReviewAssignment> = successes
            .iter()
            .enumerate()
            .filter_map(|(index, (reviewer, _))| {
                let mut rng = self.reviewer_rng(index);
                ReviewAssignment::build(reviewer, successes, &mut rng)
            })
            .collect();

        if assignments.is_empty() {
            debug!("no cross-review assignments (sole successful councilor)");
            return Ok((Vec::new(), Vec::new()));
        }

        let stage = Stage::CrossReview;
        info!("{stage}");
        progress.on_stage_start(&stage, assignments.len());

        let mut join_set = JoinSet::new();
        for (index, assignment) in assignments.into_iter().enumerate() {
            let client = self.client.clone();
            let prompt = ChatPrompt::new(
                PromptTemplate::review_system(),
                PromptTemplate::review_prompt(
                    input.question.content(),
                    &assignment.labeled_answers(),
                ),
            );
            join_set.spawn(async move {
                let outcome = client.call(assignment.reviewer(), &prompt).await;
                (index, outcome)
            });
        }

        let outcomes = self.drain(&mut join_set, &stage, progress).await?;
        progress.on_stage_complete(&stage);

        let mut reviews = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                ModelOutcome::Answered { councilor, answer } => {
                    reviews.push(PeerReview::new(councilor.name, answer));
                }
                failed => {
                    warn!(model = %failed.councilor().name, "review failed");
                    failures.extend(failed.failure_record());
                }
            }
        }
        Ok((reviews, failures))
    }

    /// Stage 3: one chairman call, then extraction and validation.
    ///
    /// Not retried at the stage level beyond the gateway client's own
    /// policy; a failed chairman call fails the whole run.
    async fn synthesize(
        &self,
        input: &RunCouncilInput,
        successes: &[(Councilor, String)],
        reviews: &[PeerReview],
        progress: &dyn ProgressNotifier,
    ) -> Result<Synthesis, SynthesisFailure> {
        if self.cancel.is_cancelled() {
            return Err(SynthesisFailure::Cancelled);
        }

        let stage = Stage::Synthesis;
        info!("{stage}");
        progress.on_stage_start(&stage, 1);

        let named: Vec<(String, String)> = successes
            .iter()
            .map(|(councilor, answer)| (councilor.name.clone(), answer.clone()))
            .collect();
        let prompt = ChatPrompt::new(
            PromptTemplate::synthesis_system(),
            PromptTemplate::synthesis_prompt(input.question.content(), &named, reviews),
        );

        let chairman = &input.council.chairman;
        let outcome = tokio::select! {
            _ = self.cancel.cancelled() => return Err(SynthesisFailure::Cancelled),
            outcome = self.client.call(chairman, &prompt) => outcome,
        };

        progress.on_task_complete(&stage, &chairman.name, outcome.is_success());
        progress.on_stage_complete(&stage);

        match outcome {
            ModelOutcome::Answered { answer, .. } => {
                debug!(raw_len = answer.len(), "chairman responded");
                match extract_payload(&answer) {
                    Some(value) => Synthesis::from_value(value).map_err(|e| {
                        SynthesisFailure::Invalid {
                            reason: e.to_string(),
                            raw: answer,
                        }
                    }),
                    None => Err(SynthesisFailure::Invalid {
                        reason: "no parsable JSON object in chairman response".to_string(),
                        raw: answer,
                    }),
                }
            }
            ModelOutcome::Failed {
                class: FailureClass::Cancelled,
                ..
            } => Err(SynthesisFailure::Cancelled),
            ModelOutcome::Failed { message, .. } => Err(SynthesisFailure::CallFailed(message)),
        }
    }

    /// Wait for every task in a stage to settle, honoring cancellation.
    /// Results come back in dispatch order.
    async fn drain(
        &self,
        join_set: &mut JoinSet<(usize, ModelOutcome)>,
        stage: &Stage,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<ModelOutcome>, RunCouncilError> {
        let mut slots: Vec<Option<ModelOutcome>> = Vec::new();
        slots.resize_with(join_set.len(), || None);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    join_set.abort_all();
                    return Err(RunCouncilError::Cancelled);
                }
                joined = join_set.join_next() => match joined {
                    None => break,
                    Some(Ok((index, outcome))) => {
                        let councilor = outcome.councilor();
                        if outcome.is_success() {
                            info!(model = %councilor.name, "{} settled", stage.as_str());
                        } else {
                            warn!(model = %councilor.name, "{} call failed", stage.as_str());
                        }
                        progress.on_task_complete(stage, &councilor.name, outcome.is_success());
                        slots[index] = Some(outcome);
                    }
                    Some(Err(e)) => {
                        warn!("task join error: {e}");
                    }
                },
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    fn reviewer_rng(&self, reviewer_index: usize) -> StdRng {
        match self.seed {
            Some(seed) => {
                StdRng::seed_from_u64(seed ^ (reviewer_index as u64).wrapping_mul(0x9E3779B97F4A7C15))
            }
            None => StdRng::from_entropy(),
        }
    }
}
