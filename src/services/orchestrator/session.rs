//! Assistant Session
//!
//! One conversation: its message log and the pipeline that turns a user
//! submission into a conversation entry (and, in auto mode, editor side
//! effects). A session processes one submission at a time.

use chrono::Utc;
use ketu_llm::{normalize, LlmProvider};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::report::{test_run_notification, TurnFailure, TurnKind, TurnReport};
use super::stage::{PipelineStage, StageTracker, PROGRESS_PROCESSING};
use crate::models::{
    all_passed, AssistantMode, ConversationMessage, GenerationRequest, GenerationResult, GuidanceTopic,
    MessageStatus, Notification, TestOutcome,
};
use crate::services::editor::{require_accepted, EditorHost, EditorOperation};
use crate::services::prompt::{chat_prompt, code_generation_prompt, guidance_question};
use crate::services::retrieval::ContextAggregator;
use crate::utils::error::{AppError, AppResult};

/// Holds the session's busy flag for the duration of a turn
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> AppResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::Busy)?;
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn require_input(input: &str) -> AppResult<()> {
    if input.trim().is_empty() {
        return Err(AppError::validation("Input must not be empty"));
    }
    Ok(())
}

/// Output of a successful code-generating turn
struct Generated {
    result: GenerationResult,
    test_results: Option<Vec<TestOutcome>>,
}

/// A single assistant conversation
pub struct Session {
    id: String,
    provider: Arc<dyn LlmProvider>,
    aggregator: Arc<ContextAggregator>,
    editor: Arc<dyn EditorHost>,
    log: RwLock<Vec<ConversationMessage>>,
    busy: AtomicBool,
}

impl Session {
    /// Create an empty session
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        aggregator: Arc<ContextAggregator>,
        editor: Arc<dyn EditorHost>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider,
            aggregator,
            editor,
            log: RwLock::new(Vec::new()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether a submission is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Snapshot of the conversation log, oldest first
    pub async fn messages(&self) -> Vec<ConversationMessage> {
        self.log.read().await.clone()
    }

    /// Look up a message by id
    pub async fn message(&self, id: &str) -> Option<ConversationMessage> {
        self.log.read().await.iter().find(|m| m.id == id).cloned()
    }

    /// Generate code for `input` and, in auto mode, insert, execute and test it.
    ///
    /// Fails only when the input is empty or another submission is in flight;
    /// pipeline failures are reported in the returned `TurnReport`.
    pub async fn submit(&self, mode: AssistantMode, input: &str) -> AppResult<TurnReport> {
        require_input(input)?;
        let _guard = BusyGuard::acquire(&self.busy)?;
        info!(session = %self.id, %mode, provider = self.provider.name(), "turn started");

        self.append(ConversationMessage::user(input)).await;
        let progress_id = if mode == AssistantMode::Auto {
            let progress = ConversationMessage::system(PROGRESS_PROCESSING).with_status(MessageStatus::Pending);
            Some(self.append(progress).await)
        } else {
            None
        };

        let mut tracker = StageTracker::new(mode);
        let kind = TurnKind::Generate(mode);
        let report = match self
            .run_generation(mode, input, &mut tracker, progress_id.as_deref())
            .await
        {
            Ok(generated) => {
                self.finish_generation(kind, generated, tracker, progress_id.as_deref())
                    .await
            }
            Err(e) => self.finish_failed(kind, e, tracker, progress_id.as_deref()).await,
        };

        info!(session = %self.id, %mode, stage = %report.final_stage(), "turn finished");
        Ok(report)
    }

    /// Answer `input` in plain text, wrapped in the prompt for `topic`.
    pub async fn ask(&self, topic: GuidanceTopic, input: &str) -> AppResult<TurnReport> {
        require_input(input)?;
        let _guard = BusyGuard::acquire(&self.busy)?;
        info!(session = %self.id, %topic, provider = self.provider.name(), "guidance turn started");

        self.append(ConversationMessage::user(input)).await;

        let mut tracker = StageTracker::new(AssistantMode::Plain);
        let kind = TurnKind::Guidance(topic);
        let report = match self.run_guidance(topic, input, &mut tracker).await {
            Ok(answer) => {
                let message = ConversationMessage::assistant(answer);
                self.append(message.clone()).await;
                TurnReport {
                    kind,
                    stages: tracker.into_history(),
                    final_message: message,
                    result: None,
                    notification: None,
                    failure: None,
                }
            }
            Err(e) => self.finish_failed(kind, e, tracker, None).await,
        };

        info!(session = %self.id, %topic, stage = %report.final_stage(), "guidance turn finished");
        Ok(report)
    }

    /// Insert the code of an earlier assistant message into the editor.
    ///
    /// Editor failures are reported through the returned notification.
    pub async fn insert_code(&self, message_id: &str) -> AppResult<Notification> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        let message = self
            .message(message_id)
            .await
            .ok_or_else(|| AppError::not_found(format!("message {}", message_id)))?;
        let code = message
            .code
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AppError::validation("Message has no code to insert"))?;

        let inserted = self
            .editor
            .insert_code(&code)
            .await
            .and_then(|accepted| require_accepted(EditorOperation::InsertCode, accepted));

        match inserted {
            Ok(()) => {
                info!(session = %self.id, message_id, "code inserted into editor");
                Ok(Notification::success("Success", "Code inserted into active editor"))
            }
            Err(e) => {
                warn!(session = %self.id, message_id, error = %e, "code insertion failed");
                Ok(Notification::error("Error", "Failed to insert code into editor"))
            }
        }
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    async fn run_generation(
        &self,
        mode: AssistantMode,
        input: &str,
        tracker: &mut StageTracker,
        progress_id: Option<&str>,
    ) -> AppResult<Generated> {
        self.enter(tracker, PipelineStage::ContextFetch, progress_id).await?;
        let context = self.aggregator.gather(input).await;

        self.enter(tracker, PipelineStage::Generating, progress_id).await?;
        let request = GenerationRequest::new(input)
            .with_docs(context.docs)
            .with_repo_context(context.repo);
        let result = self.generate(&request).await?;

        if mode != AssistantMode::Auto {
            self.enter(tracker, PipelineStage::Done, None).await?;
            return Ok(Generated {
                result,
                test_results: None,
            });
        }

        self.enter(tracker, PipelineStage::InsertCode, progress_id).await?;
        let accepted = self.editor.insert_code(&result.code).await?;
        require_accepted(EditorOperation::InsertCode, accepted)?;

        self.enter(tracker, PipelineStage::ExecuteCode, progress_id).await?;
        let accepted = self.editor.execute_code(&result.language).await?;
        require_accepted(EditorOperation::ExecuteCode, accepted)?;

        self.enter(tracker, PipelineStage::RunTests, progress_id).await?;
        let outcomes = self.editor.run_tests().await?;

        self.enter(tracker, PipelineStage::Done, None).await?;
        Ok(Generated {
            result,
            test_results: Some(outcomes),
        })
    }

    async fn run_guidance(&self, topic: GuidanceTopic, input: &str, tracker: &mut StageTracker) -> AppResult<String> {
        self.enter(tracker, PipelineStage::ContextFetch, None).await?;
        let docs = self.aggregator.aggregate(input).await;

        self.enter(tracker, PipelineStage::Generating, None).await?;
        let prompt = chat_prompt(&guidance_question(topic, input), &docs);
        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            docs = docs.len(),
            "requesting guidance"
        );
        let answer = self.provider.complete(&prompt).await?;

        self.enter(tracker, PipelineStage::Done, None).await?;
        Ok(answer)
    }

    async fn generate(&self, request: &GenerationRequest) -> AppResult<GenerationResult> {
        let prompt = code_generation_prompt(request);
        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            docs = request.context_docs.len(),
            repo_context = request.repo_context.is_some(),
            "requesting code generation"
        );
        let raw = self.provider.complete(&prompt).await?;
        Ok(normalize(&raw))
    }

    /// Advance to `stage` and mirror it onto the progress message, if any.
    async fn enter(&self, tracker: &mut StageTracker, stage: PipelineStage, progress_id: Option<&str>) -> AppResult<()> {
        tracker.advance(stage)?;
        debug!(session = %self.id, %stage, "stage entered");

        if let (Some(id), Some((status, text))) = (progress_id, stage.progress()) {
            let mut log = self.log.write().await;
            if let Some(progress) = log.iter_mut().find(|m| m.id == id) {
                progress.content = text.to_string();
                progress.status = Some(status);
                progress.timestamp = Utc::now();
            }
        }
        Ok(())
    }

    async fn finish_generation(
        &self,
        kind: TurnKind,
        generated: Generated,
        tracker: StageTracker,
        progress_id: Option<&str>,
    ) -> TurnReport {
        let Generated { result, test_results } = generated;
        let mut message = ConversationMessage::assistant(result.explanation.clone())
            .with_code(result.code.clone(), result.language.clone());

        let mut notification = None;
        if let Some(outcomes) = test_results {
            let passed = all_passed(&outcomes);
            let status = if passed {
                MessageStatus::Success
            } else {
                MessageStatus::Error
            };
            message = message.with_status(status).with_test_results(outcomes);
            notification = Some(test_run_notification(passed));
        }

        self.settle(progress_id, message.clone()).await;
        TurnReport {
            kind,
            stages: tracker.into_history(),
            final_message: message,
            result: Some(result),
            notification,
            failure: None,
        }
    }

    async fn finish_failed(
        &self,
        kind: TurnKind,
        err: AppError,
        mut tracker: StageTracker,
        progress_id: Option<&str>,
    ) -> TurnReport {
        let stage = tracker.fail();
        let failure = TurnFailure::new(stage, &err);
        error!(session = %self.id, %stage, error = %failure.message, "turn failed");

        let message =
            ConversationMessage::system(format!("Error: {}", failure.message)).with_status(MessageStatus::Error);
        self.settle(progress_id, message.clone()).await;

        TurnReport {
            kind,
            stages: tracker.into_history(),
            final_message: message,
            result: None,
            notification: Some(kind.failure_notification()),
            failure: Some(failure),
        }
    }

    async fn append(&self, message: ConversationMessage) -> String {
        let id = message.id.clone();
        self.log.write().await.push(message);
        id
    }

    /// Drop the progress message and append the terminal one under a single lock.
    async fn settle(&self, progress_id: Option<&str>, message: ConversationMessage) {
        let mut log = self.log.write().await;
        if let Some(id) = progress_id {
            log.retain(|m| m.id != id);
        }
        log.push(message);
    }
}
