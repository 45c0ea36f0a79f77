//! ProcessTurnHandler - Command handler for one inbound scammer message.
//!
//! Resolves the conversation, folds the message into its intelligence,
//! asks the provider for the persona's reply and, when the conversation has
//! yielded enough, starts report delivery in the background.
//!
//! A turn never fails. Provider errors, timeouts and empty completions fall
//! back to a canned in-character reply.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::dispatch_report::DispatchReportHandler;
use crate::application::registry::{RegistryError, SessionRegistry};
use crate::domain::engagement::{persona, ConversationAgent, HistoryTurn, Speaker};
use crate::domain::foundation::ConversationId;
use crate::ports::{
    AIProvider, CompletionRequest, DeliveryOutcome, Message, MessageRole, RequestMetadata,
};

/// Command to process one turn.
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub conversation_id: ConversationId,
    pub message: String,
    /// Earlier turns as supplied by the caller, oldest first.
    pub history: Vec<HistoryTurn>,
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Generated by the provider.
    Generated,
    /// Canned reply after a provider failure.
    Fallback,
    /// Canned reply; the conversation could not be registered.
    Refused,
}

/// Result of a processed turn.
#[derive(Debug)]
pub struct ProcessTurnResult {
    pub reply: String,
    pub source: ReplySource,
    /// Turn counter after this turn; zero when refused.
    pub turn: u32,
    /// Background delivery started by this turn, if the trigger fired.
    pub dispatch: Option<JoinHandle<DeliveryOutcome>>,
}

/// Generation settings applied to every provider request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on one provider call, retries included.
    pub provider_timeout: Duration,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 256,
            provider_timeout: Duration::from_secs(20),
        }
    }
}

/// Handler for inbound turns.
pub struct ProcessTurnHandler {
    registry: Arc<SessionRegistry>,
    provider: Arc<dyn AIProvider>,
    dispatch: Arc<DispatchReportHandler>,
    settings: TurnSettings,
}

impl ProcessTurnHandler {
    pub fn new(
        registry: Arc<SessionRegistry>,
        provider: Arc<dyn AIProvider>,
        dispatch: Arc<DispatchReportHandler>,
        settings: TurnSettings,
    ) -> Self {
        Self {
            registry,
            provider,
            dispatch,
            settings,
        }
    }

    pub async fn handle(&self, cmd: ProcessTurnCommand) -> ProcessTurnResult {
        let agent = match self.registry.resolve_or_create(&cmd.conversation_id).await {
            Ok(agent) => agent,
            Err(RegistryError::CapacityReached { capacity }) => {
                tracing::warn!(
                    session_id = %cmd.conversation_id,
                    capacity,
                    "turn refused, registry full"
                );
                return ProcessTurnResult {
                    reply: persona::FILLER_REPLY.to_string(),
                    source: ReplySource::Refused,
                    turn: 0,
                    dispatch: None,
                };
            }
        };

        // Held for the whole turn so concurrent turns of one conversation
        // apply in sequence.
        let mut guard = agent.lock().await;
        guard.record_turn(&cmd.message, &cmd.history);
        let turn = guard.turn_count();

        let (reply, source) = self.generate_reply(&guard, &cmd).await;

        let report = guard.begin_report();
        drop(guard);

        let dispatch = report.map(|report| {
            tracing::info!(
                session_id = %cmd.conversation_id,
                turn,
                "intelligence threshold reached, dispatching report"
            );
            self.dispatch.spawn(agent.clone(), report)
        });

        ProcessTurnResult {
            reply,
            source,
            turn,
            dispatch,
        }
    }

    async fn generate_reply(
        &self,
        agent: &ConversationAgent,
        cmd: &ProcessTurnCommand,
    ) -> (String, ReplySource) {
        let request = self.build_request(agent, cmd);
        let trace_id = request.metadata.trace_id;
        let provider = self.provider.provider_info().name;

        let failure = match timeout(self.settings.provider_timeout, self.provider.complete(request)).await {
            Ok(Ok(response)) => {
                let reply = response.content.trim();
                if !reply.is_empty() {
                    tracing::debug!(
                        session_id = %cmd.conversation_id,
                        turn = agent.turn_count(),
                        provider = %provider,
                        %trace_id,
                        "reply generated"
                    );
                    return (reply.to_string(), ReplySource::Generated);
                }
                "empty completion".to_string()
            }
            Ok(Err(err)) => err.to_string(),
            Err(_) => format!(
                "no reply within {}s",
                self.settings.provider_timeout.as_secs_f32()
            ),
        };

        tracing::warn!(
            session_id = %cmd.conversation_id,
            turn = agent.turn_count(),
            provider = %provider,
            %trace_id,
            error = %failure,
            "provider failed, using fallback reply"
        );
        (agent.fallback_reply().to_string(), ReplySource::Fallback)
    }

    fn build_request(&self, agent: &ConversationAgent, cmd: &ProcessTurnCommand) -> CompletionRequest {
        let mut request = CompletionRequest::new(RequestMetadata::new(cmd.conversation_id.clone()))
            .with_system_prompt(agent.persona_instructions())
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);
        request.messages = dialogue(&cmd.history, &cmd.message);
        request
    }
}

/// Converts history plus the new message into strictly alternating turns.
///
/// Consecutive turns from one side are joined with a newline.
fn dialogue(history: &[HistoryTurn], message: &str) -> Vec<Message> {
    let turns = history
        .iter()
        .map(|turn| {
            let role = match turn.speaker {
                Speaker::Scammer => MessageRole::User,
                Speaker::Agent => MessageRole::Assistant,
            };
            (role, turn.text.as_str())
        })
        .chain(std::iter::once((MessageRole::User, message)));

    let mut messages: Vec<Message> = Vec::new();
    for (role, text) in turns {
        match messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push('\n');
                last.content.push_str(text);
            }
            _ => messages.push(Message::new(role, text)),
        }
    }
    messages
}
