//! Topic gate deciding whether a message is worth sending to the model.
//!
//! Off-topic messages never reach the network, so every classifier must be
//! cheap and local.

/// Terms that mark a message as being about L'Oréal Paris or beauty care.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "l'oréal",
    "loreal",
    "paris",
    "beauty",
    "makeup",
    "skincare",
    "routine",
    "product",
    "hair",
    "lipstick",
    "mascara",
    "foundation",
    "tips",
    "recommend",
    "cream",
    "serum",
];

/// Decides topical relevance of a user message.
pub trait TopicClassifier: Send + Sync {
    /// Returns `true` when the message belongs to the assistant's domain.
    fn is_in_domain(&self, text: &str) -> bool;
}

/// Substring match against a fixed vocabulary, ignoring case.
///
/// This is a coarse heuristic: "hairdryer" matches `hair`, and an on-topic
/// question phrased without any vocabulary term is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    /// Builds a classifier from the given terms. Terms are lower-cased and
    /// blank terms dropped, since an empty term would match every message.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

impl TopicClassifier for KeywordClassifier {
    fn is_in_domain(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}
