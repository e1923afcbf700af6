//! Policy pre-filter for incoming questions.
//!
//! The [`QuestionGate`] runs before any retrieval or model call. It holds
//! two lists an instructor maintains: questions the assistant must refuse
//! (quiz and exam material) and questions with a fixed, hand-written
//! answer. Both are matched fuzzily so students cannot dodge the filter
//! with small rewordings.

use tracing::debug;

/// The fixed refusal shown for blocklisted questions.
pub const REFUSAL_MESSAGE: &str = "❌ I'm not allowed to answer quiz/exam questions.";

/// Default similarity cutoff for fuzzy matching.
pub const DEFAULT_MATCH_CUTOFF: f32 = 0.85;

/// The outcome of gating one question.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// The question matched the blocklist and must be refused.
    Blocked,
    /// The question matched an override; reply with this canned answer.
    Canned(String),
    /// The question passed the gate and may go to retrieval.
    Pass,
}

/// Fuzzy-matching question filter: blocklist first, then canned answers.
///
/// Questions are canonicalized (trimmed, lower-cased) before matching,
/// and list entries are canonicalized as they are added. Matching uses
/// `difflib`-style sequence similarity with a configurable cutoff, so
/// "What's the answer to Q3?" still matches a blocklist entry written as
/// "what is the answer to question 3".
///
/// The blocklist always wins: a question matching both lists is refused.
#[derive(Debug, Clone)]
pub struct QuestionGate {
    blocklist: Vec<String>,
    overrides: Vec<(String, String)>,
    cutoff: f32,
}

impl Default for QuestionGate {
    fn default() -> Self {
        Self { blocklist: Vec::new(), overrides: Vec::new(), cutoff: DEFAULT_MATCH_CUTOFF }
    }
}

fn canonical(question: &str) -> String {
    question.trim().to_lowercase()
}

impl QuestionGate {
    /// Create an empty gate with the default cutoff. Every question passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the similarity cutoff in `0.0..=1.0`. Higher is stricter.
    pub fn with_cutoff(mut self, cutoff: f32) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Add one question to the blocklist.
    pub fn block(mut self, question: impl Into<String>) -> Self {
        self.blocklist.push(canonical(&question.into()));
        self
    }

    /// Add every question in the iterator to the blocklist.
    pub fn with_blocklist<I, S>(mut self, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for question in questions {
            self.blocklist.push(canonical(&question.into()));
        }
        self
    }

    /// Add a canned answer for questions matching `question`.
    pub fn with_override(
        mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        self.overrides.push((canonical(&question.into()), answer.into()));
        self
    }

    /// Number of blocklist entries.
    pub fn blocklist_len(&self) -> usize {
        self.blocklist.len()
    }

    /// Number of canned-answer overrides.
    pub fn override_len(&self) -> usize {
        self.overrides.len()
    }

    /// Gate one question. Checks the blocklist, then the overrides.
    pub fn check(&self, question: &str) -> GateDecision {
        let canonical = canonical(question);

        let blocked: Vec<&str> = self.blocklist.iter().map(String::as_str).collect();
        if !difflib::get_close_matches(&canonical, blocked, 1, self.cutoff).is_empty() {
            debug!("question matched the blocklist");
            return GateDecision::Blocked;
        }

        let keys: Vec<&str> = self.overrides.iter().map(|(key, _)| key.as_str()).collect();
        if let Some(best) = difflib::get_close_matches(&canonical, keys, 1, self.cutoff).first() {
            if let Some((_, answer)) = self.overrides.iter().find(|(key, _)| key == best) {
                debug!("question matched a canned answer");
                return GateDecision::Canned(answer.clone());
            }
        }

        GateDecision::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCKED: &str = "what is the answer to question 3 on the midterm";

    fn gate() -> QuestionGate {
        QuestionGate::new().block(BLOCKED)
    }

    #[test]
    fn blocks_fuzzy_variants_of_blocked_questions() {
        // Contractions and abbreviations still land above the cutoff.
        let decision = gate().check("What's the answer to Q3 on the midterm?");
        assert_eq!(decision, GateDecision::Blocked);
    }

    #[test]
    fn canonicalizes_case_and_whitespace() {
        let decision = gate().check("  WHAT IS THE ANSWER TO QUESTION 3 ON THE MIDTERM  ");
        assert_eq!(decision, GateDecision::Blocked);
    }

    #[test]
    fn passes_ordinary_course_questions() {
        let gate = gate();
        assert_eq!(gate.check("When is the midterm exam?"), GateDecision::Pass);
        assert_eq!(gate.check("What topics will the midterm cover?"), GateDecision::Pass);
        assert_eq!(gate.check("How should I study chapter 3?"), GateDecision::Pass);
    }

    #[test]
    fn near_matches_get_the_canned_answer() {
        let answer = "Office hours are Tuesdays at 3pm in room 204.";
        let gate = QuestionGate::new().with_override("when are office hours", answer);

        assert_eq!(
            gate.check("When are office hours?"),
            GateDecision::Canned(answer.to_string())
        );
    }

    #[test]
    fn blocklist_wins_over_overrides() {
        let gate = gate().with_override(BLOCKED, "this must never be shown");
        assert_eq!(gate.check(BLOCKED), GateDecision::Blocked);
    }

    #[test]
    fn cutoff_is_configurable() {
        // A stricter cutoff lets the fuzzy variant through.
        let gate = gate().with_cutoff(0.99);
        assert_eq!(gate.check("What's the answer to Q3 on the midterm?"), GateDecision::Pass);
    }

    #[test]
    fn empty_gate_passes_everything() {
        let gate = QuestionGate::new();
        assert_eq!(gate.check("What is the answer to question 3 on the midterm"), GateDecision::Pass);
        assert_eq!(gate.blocklist_len(), 0);
        assert_eq!(gate.override_len(), 0);
    }
}
