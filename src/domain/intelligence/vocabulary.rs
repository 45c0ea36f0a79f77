//! Fixed vocabularies used by the extractor.

/// Terms whose presence marks a message as scam-like.
///
/// Matched as case-insensitive substrings. Grouped loosely by tactic:
/// urgency, prizes, credential harvesting, payment pressure, intimidation,
/// lures, and authority impersonation.
pub const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "urgent", "immediately", "disconnection", "blocked", "suspended",
    "verify", "confirm", "expire", "limited time", "act now",
    "lottery", "winner", "prize", "congratulations", "selected",
    "kyc", "update", "link", "click", "pay now", "transfer",
    "otp", "pin", "password", "cvv", "card number",
    "arrest", "legal action", "police", "court", "warrant",
    "refund", "cashback", "bonus", "offer", "free",
    "bank", "rbi", "government", "ministry", "official",
];

/// Well-known URL shorteners, matched ahead of the generic host pattern.
pub const URL_SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "t.co",
    "goo.gl",
    "rb.gy",
    "cutt.ly",
    "is.gd",
];

/// Mail providers whose addresses look like UPI handles but are not.
pub const PERSONAL_EMAIL_PROVIDERS: &[&str] = &[
    "gmail",
    "yahoo",
    "hotmail",
    "outlook",
    "icloud",
    "protonmail",
    "rediffmail",
];
