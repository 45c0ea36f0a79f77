//! ConversationAgent aggregate.
//!
//! Owns everything known about one conversation: the artifact accumulator,
//! the turn counter, annotation notes and the reporting status.
//!
//! # Concurrency
//!
//! The agent itself is not synchronized. The registry hands it out behind a
//! per-conversation mutex and every mutation happens while that lock is held.

use crate::domain::foundation::{ConversationId, StateMachine, Timestamp, ValidationError};
use crate::domain::intelligence::{ArtifactCategory, ArtifactExtractor, ArtifactSet};

use super::history::HistoryTurn;
use super::persona;
use super::report::Report;
use super::status::EngagementStatus;

/// Turn count at which a conversation is reported even without artifacts.
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// Notes appended the first time a category becomes non-empty.
const CATEGORY_NOTES: [(ArtifactCategory, &str); 4] = [
    (ArtifactCategory::BankAccount, "Obtained bank account number"),
    (ArtifactCategory::UpiId, "Obtained UPI ID"),
    (ArtifactCategory::PhishingLink, "Captured phishing link"),
    (ArtifactCategory::PhoneNumber, "Collected phone number"),
];

/// ConversationAgent - per-conversation intelligence state.
///
/// # Invariants
///
/// - `artifacts` only grows
/// - `notes` holds each note at most once, in first-seen order
/// - history backfill runs at most once, on the first recorded turn
/// - a report is produced only on the `Engaging -> Reporting` edge
#[derive(Debug, Clone)]
pub struct ConversationAgent {
    id: ConversationId,
    extractor: ArtifactExtractor,
    artifacts: ArtifactSet,
    turn_count: u32,
    notes: Vec<String>,
    status: EngagementStatus,
    max_turns: u32,
    created_at: Timestamp,
}

impl ConversationAgent {
    /// Creates a fresh agent that reports after `max_turns` turns at the latest.
    pub fn new(id: ConversationId, max_turns: u32) -> Self {
        Self {
            id,
            extractor: ArtifactExtractor::new(),
            artifacts: ArtifactSet::new(),
            turn_count: 0,
            notes: Vec::new(),
            status: EngagementStatus::Engaging,
            max_turns,
            created_at: Timestamp::now(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }

    /// Number of inbound turns, as last derived from the caller's history.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn status(&self) -> EngagementStatus {
        self.status
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Current intelligence digest for the persona prompt.
    pub fn intel_summary(&self) -> String {
        self.artifacts.summary()
    }

    /// Persona instruction with the current digest substituted in.
    pub fn persona_instructions(&self) -> String {
        persona::persona_instructions(&self.intel_summary())
    }

    /// Canned reply for when the provider cannot answer.
    pub fn fallback_reply(&self) -> &'static str {
        persona::fallback_reply(self.turn_count)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Turn processing
    // ─────────────────────────────────────────────────────────────────────────

    /// Folds one inbound scammer message into the conversation state.
    ///
    /// On the very first turn, scammer entries of `history` are scanned too
    /// so intelligence from before the honeypot joined is not lost. Later
    /// turns never rescan history.
    pub fn record_turn(&mut self, message: &str, history: &[HistoryTurn]) {
        if self.turn_count == 0 && !history.is_empty() {
            let scammer_turns = history
                .iter()
                .filter(|turn| turn.is_scammer())
                .map(|turn| turn.text.as_str());
            self.extractor.extract_all(scammer_turns, &mut self.artifacts);
        }

        self.extractor.extract(message, &mut self.artifacts);
        self.turn_count = u32::try_from(history.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        self.refresh_notes();
    }

    fn refresh_notes(&mut self) {
        for (category, note) in CATEGORY_NOTES {
            if self.artifacts.has(category) && !self.notes.iter().any(|n| n == note) {
                self.notes.push(note.to_string());
            }
        }
    }

    /// Returns true once enough has been gathered to end the engagement.
    ///
    /// Fires on any payment identifier, on a phone number paired with a
    /// link, or when the conversation has run `max_turns` turns.
    pub fn should_end(&self) -> bool {
        let has_payment = self.artifacts.has(ArtifactCategory::BankAccount)
            || self.artifacts.has(ArtifactCategory::UpiId);
        let has_contact_and_link = self.artifacts.has(ArtifactCategory::PhoneNumber)
            && self.artifacts.has(ArtifactCategory::PhishingLink);
        let long_conversation = self.turn_count >= self.max_turns;

        has_payment || has_contact_and_link || long_conversation
    }

    /// Snapshot of the current state as a report.
    pub fn build_report(&self) -> Report {
        Report::new(self.id.clone(), &self.artifacts, self.turn_count, &self.notes)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reporting lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves to `Reporting` and returns the report, if the trigger holds and
    /// no report is already in flight.
    pub fn begin_report(&mut self) -> Option<Report> {
        if !self.status.can_report() || !self.should_end() {
            return None;
        }
        self.status = EngagementStatus::Reporting;
        Some(self.build_report())
    }

    /// Delivery failed; the next qualifying turn may try again.
    pub fn report_failed(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(EngagementStatus::Engaging)?;
        Ok(())
    }

    /// Delivery succeeded; the conversation is finished.
    pub fn report_delivered(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(EngagementStatus::Retired)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> ConversationAgent {
        ConversationAgent::new(ConversationId::new("conv-1").unwrap(), DEFAULT_MAX_TURNS)
    }

    fn agent_at_turn(turn: u32) -> ConversationAgent {
        let mut agent = agent();
        agent.turn_count = turn;
        agent
    }

    fn history(len: usize) -> Vec<HistoryTurn> {
        (0..len)
            .map(|i| {
                if i % 2 == 0 {
                    HistoryTurn::scammer("hello")
                } else {
                    HistoryTurn::agent("yes sir")
                }
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn new_agent_starts_clean() {
        let agent = agent();
        assert_eq!(agent.turn_count(), 0);
        assert!(agent.artifacts().is_empty());
        assert!(agent.notes().is_empty());
        assert_eq!(agent.status(), EngagementStatus::Engaging);
        assert!(!agent.should_end());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // record_turn
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn turn_count_follows_history_length() {
        let mut agent = agent();
        agent.record_turn("hi", &[]);
        assert_eq!(agent.turn_count(), 1);

        agent.record_turn("hello again", &history(4));
        assert_eq!(agent.turn_count(), 5);
    }

    #[test]
    fn first_turn_backfills_scammer_history_only() {
        let mut agent = agent();
        let history = vec![
            HistoryTurn::scammer("send to fraud@ybl"),
            HistoryTurn::agent("my account is 1234567890"),
        ];
        agent.record_turn("are you there", &history);

        assert_eq!(agent.artifacts().upi_ids(), &["fraud@ybl".to_string()]);
        assert!(agent.artifacts().bank_accounts().is_empty());
    }

    #[test]
    fn later_turns_do_not_rescan_history() {
        let mut agent = agent();
        agent.record_turn("hello", &[]);

        let history = vec![HistoryTurn::scammer("send to fraud@ybl")];
        agent.record_turn("are you there", &history);

        assert!(agent.artifacts().upi_ids().is_empty());
    }

    #[test]
    fn notes_added_once_per_category() {
        let mut agent = agent();
        agent.record_turn("pay to fraud@ybl", &[]);
        agent.record_turn("or to scam@paytm", &history(2));

        assert_eq!(agent.notes(), &["Obtained UPI ID".to_string()]);
    }

    #[test]
    fn notes_follow_first_seen_order() {
        let mut agent = agent();
        agent.record_turn("open bit.ly/x", &[]);
        agent.record_turn("then pay fraud@ybl", &history(2));

        assert_eq!(
            agent.notes(),
            &["Captured phishing link".to_string(), "Obtained UPI ID".to_string()]
        );
    }

    #[test]
    fn keywords_do_not_add_notes() {
        let mut agent = agent();
        agent.record_turn("urgent kyc verify", &[]);
        assert!(agent.notes().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // should_end
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn nine_quiet_turns_do_not_end() {
        assert!(!agent_at_turn(9).should_end());
    }

    #[test]
    fn ten_turns_end_without_artifacts() {
        assert!(agent_at_turn(10).should_end());
    }

    #[test]
    fn custom_turn_limit_is_respected() {
        let mut agent = ConversationAgent::new(ConversationId::new("c").unwrap(), 3);
        agent.turn_count = 3;
        assert!(agent.should_end());
    }

    #[test]
    fn bank_account_ends_on_first_turn() {
        let mut agent = agent_at_turn(1);
        agent.artifacts.insert(ArtifactCategory::BankAccount, "9988776655");
        assert!(agent.should_end());
    }

    #[test]
    fn upi_id_ends() {
        let mut agent = agent_at_turn(1);
        agent.artifacts.insert(ArtifactCategory::UpiId, "fraud@ybl");
        assert!(agent.should_end());
    }

    #[test]
    fn phone_alone_does_not_end_until_link_arrives() {
        let mut agent = agent_at_turn(1);
        agent.artifacts.insert(ArtifactCategory::PhoneNumber, "9876543210");
        assert!(!agent.should_end());

        agent.artifacts.insert(ArtifactCategory::PhishingLink, "bit.ly/x");
        assert!(agent.should_end());
    }

    #[test]
    fn keywords_alone_do_not_end() {
        let mut agent = agent_at_turn(2);
        agent.artifacts.insert(ArtifactCategory::SuspiciousKeyword, "Urgent");
        assert!(!agent.should_end());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Reporting lifecycle
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn begin_report_requires_trigger() {
        let mut agent = agent();
        agent.record_turn("hello", &[]);
        assert!(agent.begin_report().is_none());
        assert_eq!(agent.status(), EngagementStatus::Engaging);
    }

    #[test]
    fn begin_report_fires_once_while_in_flight() {
        let mut agent = agent();
        agent.record_turn("pay to fraud@ybl", &[]);

        let report = agent.begin_report().expect("trigger holds");
        assert_eq!(report.session_id.as_str(), "conv-1");
        assert_eq!(agent.status(), EngagementStatus::Reporting);

        agent.record_turn("did you pay", &history(2));
        assert!(agent.begin_report().is_none());
    }

    #[test]
    fn failed_delivery_allows_another_attempt() {
        let mut agent = agent();
        agent.record_turn("pay to fraud@ybl", &[]);
        agent.begin_report().unwrap();

        agent.report_failed().unwrap();
        assert_eq!(agent.status(), EngagementStatus::Engaging);
        assert!(agent.begin_report().is_some());
    }

    #[test]
    fn delivered_report_retires_agent() {
        let mut agent = agent();
        agent.record_turn("pay to fraud@ybl", &[]);
        agent.begin_report().unwrap();

        agent.report_delivered().unwrap();
        assert_eq!(agent.status(), EngagementStatus::Retired);
        assert!(agent.begin_report().is_none());
    }

    #[test]
    fn delivery_outcome_without_report_is_rejected() {
        let mut agent = agent();
        assert!(agent.report_delivered().is_err());
        assert!(agent.report_failed().is_err());
    }

    #[test]
    fn report_reflects_state() {
        let mut agent = agent();
        agent.record_turn("urgent! pay 12345678901", &history(2));
        let report = agent.build_report();

        assert!(report.scam_detected);
        assert_eq!(report.total_messages_exchanged, 6);
        assert_eq!(report.agent_notes, "Obtained bank account number");
        assert_eq!(
            report.extracted_intelligence.bank_accounts(),
            &["12345678901".to_string()]
        );
    }

    #[test]
    fn persona_instructions_include_current_summary() {
        let mut agent = agent();
        agent.record_turn("pay to fraud@ybl", &[]);
        assert!(agent.persona_instructions().contains("UPI IDs: fraud@ybl"));
    }

    #[test]
    fn fallback_reply_is_never_empty() {
        assert!(!agent().fallback_reply().is_empty());
    }
}
