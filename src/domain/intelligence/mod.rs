//! Intelligence module - artifact accumulation and extraction.
//!
//! - `ArtifactSet` - per-conversation, grow-only, deduplicated artifact lists
//! - `ArtifactExtractor` - fixed pattern matcher that feeds an `ArtifactSet`

mod artifacts;
mod extractor;
mod vocabulary;

pub use artifacts::{ArtifactCategory, ArtifactSet};
pub use extractor::{ArtifactExtractor, MIN_BANK_ACCOUNT_DIGITS};
pub use vocabulary::{PERSONAL_EMAIL_PROVIDERS, SUSPICIOUS_KEYWORDS, URL_SHORTENERS};
