use crate::models::ConcernLevel;

/// Strategy seam for turning analysis prose into a coarse severity. The
/// keyword version is deliberately crude; a structured-output contract from
/// the text-generation service can replace it without touching callers.
pub trait ConcernStrategy: Send + Sync {
    fn classify(&self, text: &str) -> ConcernLevel;
}

const HIGH_KEYWORDS: &[&str] = &["urgent", "immediately", "high concern"];
const MODERATE_KEYWORDS: &[&str] = &["moderate", "consult", "monitor"];
const LOW_KEYWORDS: &[&str] = &["mild", "low concern"];

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordConcernClassifier;

impl ConcernStrategy for KeywordConcernClassifier {
    fn classify(&self, text: &str) -> ConcernLevel {
        let text = text.to_lowercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

        // First matching priority group wins, regardless of what else appears.
        if contains_any(HIGH_KEYWORDS) {
            ConcernLevel::High
        } else if contains_any(MODERATE_KEYWORDS) {
            ConcernLevel::Moderate
        } else if contains_any(LOW_KEYWORDS) {
            ConcernLevel::Low
        } else {
            ConcernLevel::None
        }
    }
}
