//! Keyword-based service categorization.
//!
//! Used to fill in a credential's category when none was chosen. Not
//! security relevant.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;

/// Category a credential is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryTag {
    Google,
    Banking,
    Social,
    Work,
    Entertainment,
    Shopping,
    Other,
}

/// Keyword table, checked in order; the first category with a keyword
/// contained in the service name wins.
const KEYWORDS: &[(CategoryTag, &[&str])] = &[
    (
        CategoryTag::Google,
        &["google", "gmail", "drive", "youtube", "photos", "maps", "chrome", "play"],
    ),
    (
        CategoryTag::Banking,
        &[
            "bank", "upi", "paytm", "phonepe", "gpay", "bhim", "credit", "debit", "wallet",
            "payment", "paypal", "stripe", "venmo",
        ],
    ),
    (
        CategoryTag::Social,
        &[
            "instagram", "insta", "facebook", "fb", "twitter", "x.com", "linkedin", "tiktok",
            "snapchat", "snap", "reddit", "pinterest", "whatsapp", "telegram", "discord",
        ],
    ),
    (
        CategoryTag::Work,
        &[
            "slack", "teams", "zoom", "office", "microsoft", "github", "gitlab", "jira",
            "trello", "notion", "asana", "dropbox", "onedrive",
        ],
    ),
    (
        CategoryTag::Entertainment,
        &[
            "netflix", "spotify", "prime", "hotstar", "disney", "hulu", "twitch", "steam",
            "playstation", "xbox", "nintendo", "epic",
        ],
    ),
    (
        CategoryTag::Shopping,
        &[
            "amazon", "flipkart", "ebay", "shop", "store", "myntra", "ajio", "meesho", "swiggy",
            "zomato", "uber", "ola",
        ],
    ),
];

impl CategoryTag {
    /// All tags in display order.
    pub const ALL: [CategoryTag; 7] = [
        CategoryTag::Google,
        CategoryTag::Banking,
        CategoryTag::Social,
        CategoryTag::Work,
        CategoryTag::Entertainment,
        CategoryTag::Shopping,
        CategoryTag::Other,
    ];

    /// Name used in serialized data and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryTag::Google => "google",
            CategoryTag::Banking => "banking",
            CategoryTag::Social => "social",
            CategoryTag::Work => "work",
            CategoryTag::Entertainment => "entertainment",
            CategoryTag::Shopping => "shopping",
            CategoryTag::Other => "other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CategoryTag::Google => "Google Services",
            CategoryTag::Banking => "Banking & Finance",
            CategoryTag::Social => "Social Media",
            CategoryTag::Work => "Work & Productivity",
            CategoryTag::Entertainment => "Entertainment",
            CategoryTag::Shopping => "Shopping",
            CategoryTag::Other => "Other",
        }
    }
}

impl FromStr for CategoryTag {
    type Err = VaultError;

    /// Parse the lowercase tag name, ignoring case and surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        CategoryTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| VaultError::InvalidInput(format!("Unknown category: {}", value)))
    }
}

/// Classify a service name by keyword.
///
/// # Examples
///
/// ```
/// use vaultx_core::{categorize_service, CategoryTag};
///
/// assert_eq!(categorize_service("Gmail"), CategoryTag::Google);
/// assert_eq!(categorize_service("my-homelab"), CategoryTag::Other);
/// ```
pub fn categorize_service(service: &str) -> CategoryTag {
    let service = service.trim().to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| service.contains(keyword)))
        .map(|(tag, _)| *tag)
        .unwrap_or(CategoryTag::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_services() {
        assert_eq!(categorize_service("Instagram"), CategoryTag::Social);
        assert_eq!(categorize_service("  HDFC Bank "), CategoryTag::Banking);
        assert_eq!(categorize_service("GitHub"), CategoryTag::Work);
        assert_eq!(categorize_service("Netflix"), CategoryTag::Entertainment);
        assert_eq!(categorize_service("Amazon"), CategoryTag::Shopping);
    }

    #[test]
    fn test_first_category_wins() {
        // "play" (google) is checked before "playstation" (entertainment).
        assert_eq!(categorize_service("PlayStation"), CategoryTag::Google);
    }

    #[test]
    fn test_unknown_is_other() {
        assert_eq!(categorize_service(""), CategoryTag::Other);
        assert_eq!(categorize_service("router admin"), CategoryTag::Other);
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&CategoryTag::Entertainment).unwrap();
        assert_eq!(json, "\"entertainment\"");
        assert_eq!(CategoryTag::ALL.len(), 7);
        assert_eq!(CategoryTag::Banking.display_name(), "Banking & Finance");
    }

    #[test]
    fn test_parse_matches_serialized_name() {
        for tag in CategoryTag::ALL {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json.trim_matches('"'), tag.as_str());
            assert_eq!(tag.as_str().parse::<CategoryTag>().unwrap(), tag);
        }
        assert_eq!(" Work ".parse::<CategoryTag>().unwrap(), CategoryTag::Work);
        assert!("games".parse::<CategoryTag>().is_err());
    }
}
