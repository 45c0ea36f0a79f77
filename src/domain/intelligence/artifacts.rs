//! Accumulated intelligence for one conversation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five kinds of artifact pulled out of scammer messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCategory {
    BankAccount,
    UpiId,
    PhishingLink,
    PhoneNumber,
    SuspiciousKeyword,
}

impl ArtifactCategory {
    /// All categories in report order.
    pub const ALL: [ArtifactCategory; 5] = [
        ArtifactCategory::BankAccount,
        ArtifactCategory::UpiId,
        ArtifactCategory::PhishingLink,
        ArtifactCategory::PhoneNumber,
        ArtifactCategory::SuspiciousKeyword,
    ];

    /// Label used in the human-readable intelligence summary.
    pub fn summary_label(&self) -> &'static str {
        match self {
            ArtifactCategory::BankAccount => "Bank Accounts",
            ArtifactCategory::UpiId => "UPI IDs",
            ArtifactCategory::PhishingLink => "Links",
            ArtifactCategory::PhoneNumber => "Phone Numbers",
            ArtifactCategory::SuspiciousKeyword => "Suspicious Keywords",
        }
    }

    fn case_insensitive(&self) -> bool {
        matches!(self, ArtifactCategory::SuspiciousKeyword)
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactCategory::BankAccount => "bank_account",
            ArtifactCategory::UpiId => "upi_id",
            ArtifactCategory::PhishingLink => "phishing_link",
            ArtifactCategory::PhoneNumber => "phone_number",
            ArtifactCategory::SuspiciousKeyword => "suspicious_keyword",
        };
        write!(f, "{}", s)
    }
}

/// Ordered, deduplicated artifact lists.
///
/// The set only grows. Keywords compare case-insensitively, every other
/// category compares verbatim. Serializes to the `extractedIntelligence`
/// shape of the report payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSet {
    bank_accounts: Vec<String>,
    upi_ids: Vec<String>,
    phishing_links: Vec<String>,
    phone_numbers: Vec<String>,
    suspicious_keywords: Vec<String>,
}

impl ArtifactSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bank_accounts(&self) -> &[String] {
        &self.bank_accounts
    }

    pub fn upi_ids(&self) -> &[String] {
        &self.upi_ids
    }

    pub fn phishing_links(&self) -> &[String] {
        &self.phishing_links
    }

    pub fn phone_numbers(&self) -> &[String] {
        &self.phone_numbers
    }

    pub fn suspicious_keywords(&self) -> &[String] {
        &self.suspicious_keywords
    }

    /// Returns the list for a category.
    pub fn get(&self, category: ArtifactCategory) -> &[String] {
        match category {
            ArtifactCategory::BankAccount => &self.bank_accounts,
            ArtifactCategory::UpiId => &self.upi_ids,
            ArtifactCategory::PhishingLink => &self.phishing_links,
            ArtifactCategory::PhoneNumber => &self.phone_numbers,
            ArtifactCategory::SuspiciousKeyword => &self.suspicious_keywords,
        }
    }

    fn get_mut(&mut self, category: ArtifactCategory) -> &mut Vec<String> {
        match category {
            ArtifactCategory::BankAccount => &mut self.bank_accounts,
            ArtifactCategory::UpiId => &mut self.upi_ids,
            ArtifactCategory::PhishingLink => &mut self.phishing_links,
            ArtifactCategory::PhoneNumber => &mut self.phone_numbers,
            ArtifactCategory::SuspiciousKeyword => &mut self.suspicious_keywords,
        }
    }

    /// Appends `value` unless an equal entry already exists.
    ///
    /// Returns true if the value was new.
    pub fn insert(&mut self, category: ArtifactCategory, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.contains(category, &value) {
            return false;
        }
        self.get_mut(category).push(value);
        true
    }

    /// Checks membership using the category's comparison rule.
    pub fn contains(&self, category: ArtifactCategory, value: &str) -> bool {
        let list = self.get(category);
        if category.case_insensitive() {
            list.iter().any(|existing| existing.eq_ignore_ascii_case(value))
        } else {
            list.iter().any(|existing| existing == value)
        }
    }

    /// Returns true if the category holds at least one value.
    pub fn has(&self, category: ArtifactCategory) -> bool {
        !self.get(category).is_empty()
    }

    /// Returns true if nothing at all has been collected.
    pub fn is_empty(&self) -> bool {
        ArtifactCategory::ALL.iter().all(|c| !self.has(*c))
    }

    /// Total number of values across all categories.
    pub fn total_len(&self) -> usize {
        ArtifactCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    /// One-line digest of the actionable artifacts, injected into the persona prompt.
    ///
    /// Keywords are left out; they steer detection, not the conversation.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [
            ArtifactCategory::BankAccount,
            ArtifactCategory::UpiId,
            ArtifactCategory::PhoneNumber,
            ArtifactCategory::PhishingLink,
        ]
        .iter()
        .filter(|c| self.has(**c))
        .map(|c| format!("{}: {}", c.summary_label(), self.get(*c).join(", ")))
        .collect();

        if parts.is_empty() {
            "No intelligence extracted yet".to_string()
        } else {
            parts.join("; ")
        }
    }
}
