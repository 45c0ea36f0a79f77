//! Pattern-based artifact extraction.
//!
//! A fixed, hand-authored pattern set scanned over each scammer message.
//! Nothing here can fail: text that matches no pattern simply contributes
//! nothing to the accumulator.

use once_cell::sync::Lazy;
use regex::Regex;

use super::artifacts::{ArtifactCategory, ArtifactSet};
use super::vocabulary::{PERSONAL_EMAIL_PROVIDERS, SUSPICIOUS_KEYWORDS, URL_SHORTENERS};

/// Account numbers shorter than this are treated as noise (OTPs, amounts, PINs).
pub const MIN_BANK_ACCOUNT_DIGITS: usize = 10;

static BANK_ACCOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{9,18}\b").expect("hardcoded regex"));

static UPI_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z0-9._-]+@([a-zA-Z]{2,})\b").expect("hardcoded regex"));

/// A ten-digit mobile number, optionally behind a `+91` / `91` country code
/// that may touch the number. The leading group stands in for a word boundary
/// in front of the country code.
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9+])(?:\+?91[\-\s]?)?([6-9][0-9]{9})\b").expect("hardcoded regex")
});

static LINK: Lazy<Regex> = Lazy::new(|| {
    let shorteners = URL_SHORTENERS
        .iter()
        .map(|domain| regex::escape(domain))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i)(?:https?://)?(?:www\.)?(?:(?:{shorteners})\b|(?:[a-z0-9-]+\.)+[a-z]{{2,}})(?:/[^\s]*)?"
    ))
    .expect("hardcoded regex")
});

/// Characters stripped from the end of a link match; they almost always
/// belong to the surrounding sentence.
const LINK_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', '"', '\''];

/// Stateless extractor; all accumulation happens in the caller's [`ArtifactSet`].
#[derive(Debug, Clone, Default)]
pub struct ArtifactExtractor;

impl ArtifactExtractor {
    /// Creates a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Scans one message and unions every match into `artifacts`.
    ///
    /// Values already present are skipped, so re-running on the same text
    /// leaves the set unchanged.
    pub fn extract<'a>(&self, message: &str, artifacts: &'a mut ArtifactSet) -> &'a ArtifactSet {
        for account in bank_accounts(message) {
            artifacts.insert(ArtifactCategory::BankAccount, account);
        }
        for upi in upi_ids(message) {
            artifacts.insert(ArtifactCategory::UpiId, upi);
        }
        for phone in phone_numbers(message) {
            artifacts.insert(ArtifactCategory::PhoneNumber, phone);
        }
        for link in links(message) {
            artifacts.insert(ArtifactCategory::PhishingLink, link);
        }
        for keyword in keywords(message) {
            artifacts.insert(ArtifactCategory::SuspiciousKeyword, keyword);
        }
        artifacts
    }

    /// Runs [`extract`](Self::extract) over several messages in order.
    pub fn extract_all<'m, 'a, I>(&self, messages: I, artifacts: &'a mut ArtifactSet) -> &'a ArtifactSet
    where
        I: IntoIterator<Item = &'m str>,
    {
        for message in messages {
            self.extract(message, artifacts);
        }
        artifacts
    }
}

/// Digit runs directly behind a `+` are international phone numbers, not accounts.
fn bank_accounts(message: &str) -> impl Iterator<Item = &str> {
    BANK_ACCOUNT
        .find_iter(message)
        .filter(move |m| !message[..m.start()].ends_with('+'))
        .map(|m| m.as_str())
        .filter(|digits| digits.len() >= MIN_BANK_ACCOUNT_DIGITS)
}

fn upi_ids(message: &str) -> impl Iterator<Item = &str> {
    UPI_ID.captures_iter(message).filter_map(|caps| {
        let whole = caps.get(0)?.as_str();
        let handle = caps.get(1)?.as_str().to_ascii_lowercase();
        let personal = PERSONAL_EMAIL_PROVIDERS
            .iter()
            .any(|provider| handle.starts_with(provider));
        (!personal).then_some(whole)
    })
}

/// Yields the ten national digits of every phone number.
fn phone_numbers(message: &str) -> impl Iterator<Item = &str> {
    PHONE
        .captures_iter(message)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn links(message: &str) -> impl Iterator<Item = &str> {
    LINK.find_iter(message)
        .map(|m| m.as_str().trim_end_matches(LINK_TRAILING_PUNCTUATION))
        .filter(|link| !link.is_empty())
}

fn keywords(message: &str) -> impl Iterator<Item = String> {
    let lowered = message.to_lowercase();
    SUSPICIOUS_KEYWORDS
        .iter()
        .filter(move |keyword| lowered.contains(*keyword))
        .map(|keyword| capitalize(keyword))
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn extract(message: &str) -> ArtifactSet {
        let mut set = ArtifactSet::new();
        ArtifactExtractor::new().extract(message, &mut set);
        set
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Category literals
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn finds_bank_account() {
        let set = extract("Pay to account 9988776655 now");
        assert!(set.bank_accounts().contains(&"9988776655".to_string()));
    }

    #[test]
    fn ignores_nine_digit_runs() {
        let set = extract("Reference 123456789 noted");
        assert!(set.bank_accounts().is_empty());
    }

    #[test]
    fn ignores_digit_runs_longer_than_eighteen() {
        let set = extract("id 1234567890123456789");
        assert!(set.bank_accounts().is_empty());
    }

    #[test]
    fn finds_upi_id() {
        let set = extract("Send to scammer@upi immediately");
        assert_eq!(set.upi_ids(), &["scammer@upi".to_string()]);
    }

    #[test]
    fn rejects_personal_email_as_upi() {
        let set = extract("contact me at someone@gmail.com");
        assert!(!set.upi_ids().iter().any(|u| u.starts_with("someone@")));
    }

    #[test]
    fn rejects_other_denylisted_providers() {
        let set = extract("mail a@yahoo.com or b@Outlook.com or c@hotmail.com");
        assert!(set.upi_ids().is_empty());
    }

    #[test]
    fn finds_phone_and_drops_country_code() {
        let set = extract("call +91 9876543210");
        assert_eq!(set.phone_numbers(), &["9876543210".to_string()]);
    }

    #[test]
    fn finds_phone_with_dashed_country_code() {
        let set = extract("whatsapp +91-8123456789 today");
        assert_eq!(set.phone_numbers(), &["8123456789".to_string()]);
    }

    #[test]
    fn finds_phone_with_attached_country_code() {
        let set = extract("call +919876543210");
        assert_eq!(set.phone_numbers(), &["9876543210".to_string()]);
        assert!(set.bank_accounts().is_empty());
    }

    #[test]
    fn finds_adjacent_phone_numbers() {
        let set = extract("9876543210 8765432109");
        assert_eq!(
            set.phone_numbers(),
            &["9876543210".to_string(), "8765432109".to_string()]
        );
    }

    #[test]
    fn ignores_phone_digits_inside_longer_runs() {
        let set = extract("ref 98765432101");
        assert!(set.phone_numbers().is_empty());
    }

    #[test]
    fn ignores_numbers_not_starting_six_to_nine() {
        let set = extract("call 5123456789");
        assert!(set.phone_numbers().is_empty());
    }

    #[test]
    fn finds_shortened_link() {
        let set = extract("visit bit.ly/fake-pay now");
        assert!(set.phishing_links().iter().any(|l| l.contains("bit.ly/fake-pay")));
    }

    #[test]
    fn finds_scheme_prefixed_link_case_preserved() {
        let set = extract("Open HTTPS://Secure-Bank.Example.com/Login to verify");
        assert!(set
            .phishing_links()
            .contains(&"HTTPS://Secure-Bank.Example.com/Login".to_string()));
    }

    #[test]
    fn shortener_prefix_does_not_truncate_longer_host() {
        let set = extract("see t.company-refunds.net/claim");
        assert_eq!(set.phishing_links(), &["t.company-refunds.net/claim".to_string()]);
    }

    #[test]
    fn strips_sentence_punctuation_from_links() {
        let set = extract("Go to bit.ly/abc.");
        assert_eq!(set.phishing_links(), &["bit.ly/abc".to_string()]);
    }

    #[test]
    fn finds_keywords_capitalized_once() {
        let set = extract("This is urgent, your KYC will expire. URGENT!");
        let keywords = set.suspicious_keywords();
        assert_eq!(keywords.iter().filter(|k| *k == "Urgent").count(), 1);
        assert!(keywords.contains(&"Kyc".to_string()));
        assert!(keywords.contains(&"Expire".to_string()));
    }

    #[test]
    fn multi_word_keyword_is_matched() {
        let set = extract("Act now or face legal action");
        let keywords = set.suspicious_keywords();
        assert!(keywords.contains(&"Act now".to_string()));
        assert!(keywords.contains(&"Legal action".to_string()));
    }

    #[test]
    fn plain_text_yields_nothing() {
        let set = extract("hello how are you");
        assert!(set.is_empty());
    }

    #[test]
    fn empty_message_yields_nothing() {
        assert!(extract("").is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Dedup across calls
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn repeated_values_within_message_stored_once() {
        let set = extract("pay 9988776655 or 9988776655 via fraud@ybl fraud@ybl");
        assert_eq!(set.bank_accounts().len(), 1);
        assert_eq!(set.upi_ids().len(), 1);
    }

    #[test]
    fn repeated_values_across_turns_stored_once() {
        let extractor = ArtifactExtractor::new();
        let mut set = ArtifactSet::new();
        extractor.extract("urgent: pay fraud@ybl, see bit.ly/x", &mut set);
        extractor.extract("URGENT again fraud@ybl bit.ly/x", &mut set);

        assert_eq!(set.upi_ids(), &["fraud@ybl".to_string()]);
        assert_eq!(set.phishing_links(), &["bit.ly/x".to_string()]);
        assert_eq!(
            set.suspicious_keywords()
                .iter()
                .filter(|k| k.eq_ignore_ascii_case("urgent"))
                .count(),
            1
        );
    }

    #[test]
    fn extract_all_walks_every_message() {
        let mut set = ArtifactSet::new();
        ArtifactExtractor::new().extract_all(["pay 9988776655", "to fraud@ybl"], &mut set);
        assert_eq!(set.bank_accounts().len(), 1);
        assert_eq!(set.upi_ids().len(), 1);
    }

    #[test]
    fn capitalize_handles_edge_cases() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("otp"), "Otp");
        assert_eq!(capitalize("pay now"), "Pay now");
    }

    proptest! {
        #[test]
        fn extraction_is_idempotent(message in "[ -~]{0,120}") {
            let extractor = ArtifactExtractor::new();
            let mut once = ArtifactSet::new();
            extractor.extract(&message, &mut once);

            let mut twice = once.clone();
            extractor.extract(&message, &mut twice);

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn repeated_account_is_stored_once(
            account in "[1-9][0-9]{9,17}",
            repeats in 1usize..5,
        ) {
            let message = vec![format!("pay {account}"); repeats].join(" and ");
            let mut set = ArtifactSet::new();
            ArtifactExtractor::new().extract(&message, &mut set);

            prop_assert_eq!(
                set.bank_accounts().iter().filter(|a| **a == account).count(),
                1
            );
        }
    }
}
