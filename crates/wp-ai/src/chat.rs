//! Conversational context for the career assistant.
//!
//! Each inbound message is answered from a bounded window of prior turns plus
//! a snapshot of the student's latest completed assessment. When the model
//! cannot be used the reply comes from [`fallback_reply`].

use std::fmt::Write as _;

use wp_core::entities::{Assessment, ChatMessage, ContextSnapshot, UserProfile};
use wp_core::enums::{AssessmentStatus, ChatRole};
use wp_core::errors::CoreError;

use crate::error::AiError;
use crate::model::GenerativeModel;
use crate::resilient::{Outcome, RetryPolicy, generate_or_fallback};

/// RIASEC types carried in the snapshot.
const SNAPSHOT_INTERESTS: usize = 3;

/// Build a context snapshot from the profile and, when present, the latest
/// completed assessment. Assessments in any other state contribute nothing.
#[must_use]
pub fn build_snapshot(latest: Option<&Assessment>, profile: &UserProfile) -> ContextSnapshot {
    let mut snapshot = ContextSnapshot {
        name: Some(profile.name.clone()),
        class_level: profile.class_level.clone(),
        age: profile.age,
        ..ContextSnapshot::default()
    };

    if let Some(assessment) = latest.filter(|a| a.status == AssessmentStatus::Completed) {
        snapshot.assessment_id = Some(assessment.id.clone());
        snapshot.interests = assessment
            .scores
            .riasec
            .ranked()
            .into_iter()
            .take(SNAPSHOT_INTERESTS)
            .map(|(kind, _)| kind.label().to_string())
            .collect();
        snapshot.aptitudes = Some(assessment.scores.aptitude);
    }

    snapshot
}

/// The last `window` messages, oldest first.
#[must_use]
pub fn history_window(messages: &[ChatMessage], window: usize) -> &[ChatMessage] {
    &messages[messages.len().saturating_sub(window)..]
}

/// Trim an inbound message and check it is usable.
///
/// # Errors
///
/// `Validation` for a blank message or one longer than `max_chars`.
pub fn validate_message(message: &str, max_chars: usize) -> Result<&str, CoreError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("message must not be empty".into()));
    }
    let chars = trimmed.chars().count();
    if chars > max_chars {
        return Err(CoreError::Validation(format!(
            "message is {chars} characters; the limit is {max_chars}"
        )));
    }
    Ok(trimmed)
}

fn write_snapshot(out: &mut String, snapshot: &ContextSnapshot) {
    out.push_str("Student context:\n");
    if let Some(name) = &snapshot.name {
        let _ = writeln!(out, "  - name: {name}");
    }
    if let Some(class) = &snapshot.class_level {
        let _ = writeln!(out, "  - class: {class}");
    }
    if let Some(age) = snapshot.age {
        let _ = writeln!(out, "  - age: {age}");
    }
    if snapshot.is_empty() {
        out.push_str("  - no completed assessment yet\n");
        return;
    }
    let _ = writeln!(out, "  - strongest interests: {}", snapshot.interests.join(", "));
    if let Some(aptitudes) = &snapshot.aptitudes {
        let listed: Vec<String> = aptitudes
            .entries()
            .into_iter()
            .map(|(key, value)| format!("{key} {value}"))
            .collect();
        let _ = writeln!(out, "  - aptitude scores: {}", listed.join(", "));
    }
}

/// Build the prompt for one assistant turn.
#[must_use]
pub fn build_chat_prompt(snapshot: &ContextSnapshot, history: &[ChatMessage], message: &str) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(
        "You are Waypoint, a friendly career guidance assistant for secondary-school students. \
         Keep answers short, concrete, and grounded in the student's assessment results.\n\n",
    );
    write_snapshot(&mut out, snapshot);

    if !history.is_empty() {
        out.push_str("\nConversation so far:\n");
        for turn in history {
            let _ = writeln!(out, "{}: {}", turn.role, turn.content);
        }
    }

    let _ = write!(out, "\n{}: {message}\n{}:", ChatRole::User, ChatRole::Assistant);
    out
}

/// Deterministic reply used when the model is unavailable.
#[must_use]
pub fn fallback_reply(snapshot: &ContextSnapshot, message: &str) -> String {
    let greeting = snapshot
        .name
        .as_deref()
        .map_or_else(|| "Hi!".to_string(), |name| format!("Hi {name}!"));

    if snapshot.is_empty() {
        return format!(
            "{greeting} I can't reach the career assistant right now. \
             Complete your assessment and I'll be able to give suggestions based on your \
             interests and aptitudes. You asked: \"{message}\"."
        );
    }

    let interests = if snapshot.interests.is_empty() {
        "your assessment results".to_string()
    } else {
        snapshot.interests.join(", ")
    };
    let top_aptitude = snapshot.aptitudes.and_then(|a| {
        a.entries()
            .into_iter()
            .max_by(|x, y| x.1.cmp(&y.1).then_with(|| y.0.cmp(x.0)))
            .filter(|(_, value)| *value > 0)
    });

    let mut reply = format!(
        "{greeting} I can't reach the career assistant right now, but here is what your \
         assessment shows. Your strongest interest areas are {interests}."
    );
    if let Some((aptitude, score)) = top_aptitude {
        let _ = write!(reply, " Your highest aptitude is {aptitude} ({score}/100).");
    }
    reply.push_str(
        " Careers that combine these strengths are a good place to start exploring. \
         Please ask again in a little while for a detailed answer.",
    );
    reply
}

fn parse_reply(text: &str) -> Result<String, AiError> {
    let reply = text.trim();
    if reply.is_empty() {
        return Err(AiError::Parse("model returned an empty reply".into()));
    }
    Ok(reply.to_string())
}

/// Generates assistant turns.
pub struct ChatResponder<M> {
    model: M,
    policy: RetryPolicy,
    window: usize,
}

impl<M: GenerativeModel> ChatResponder<M> {
    pub const fn new(model: M, policy: RetryPolicy, window: usize) -> Self {
        Self {
            model,
            policy,
            window,
        }
    }

    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Reply to `message` given the session's prior turns. Only the last
    /// `window` turns reach the prompt.
    pub async fn reply(
        &self,
        snapshot: &ContextSnapshot,
        history: &[ChatMessage],
        message: &str,
    ) -> Outcome<String> {
        let prompt = build_chat_prompt(snapshot, history_window(history, self.window), message);
        generate_or_fallback(&self.model, &prompt, &self.policy, parse_reply, || {
            fallback_reply(snapshot, message)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn profile() -> UserProfile {
        UserProfile {
            id: "usr-1".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            class_level: Some("10".into()),
            age: None,
            created_at: Utc::now(),
        }
    }

    fn completed() -> Assessment {
        let mut a = Assessment::new("asm-1", "usr-1", Utc::now());
        a.status = AssessmentStatus::Completed;
        a.scores.riasec.investigative = 82;
        a.scores.riasec.social = 75;
        a.scores.riasec.artistic = 60;
        a.scores.aptitude.logical = 88;
        a
    }

    fn turns(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| ChatMessage {
                role: if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant },
                content: format!("turn {i}"),
                timestamp: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn snapshot_takes_top_three_interests() {
        let snapshot = build_snapshot(Some(&completed()), &profile());
        assert_eq!(snapshot.assessment_id.as_deref(), Some("asm-1"));
        assert_eq!(snapshot.interests, vec!["Investigative", "Social", "Artistic"]);
        assert_eq!(snapshot.aptitudes.map(|a| a.logical), Some(88));
        assert_eq!(snapshot.name.as_deref(), Some("Asha"));
    }

    #[test]
    fn snapshot_ignores_unfinished_assessment() {
        let in_progress = Assessment::new("asm-2", "usr-1", Utc::now());
        let snapshot = build_snapshot(Some(&in_progress), &profile());
        assert!(snapshot.is_empty());
        assert!(snapshot.interests.is_empty());
        assert_eq!(snapshot.class_level.as_deref(), Some("10"));
    }

    #[test]
    fn window_keeps_most_recent_turns() {
        let messages = turns(14);
        let window = history_window(&messages, 10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "turn 4");
        assert_eq!(window[9].content, "turn 13");
        assert_eq!(history_window(&messages[..3], 10).len(), 3);
    }

    #[test]
    fn validate_message_rejects_blank_and_oversized() {
        assert_eq!(validate_message("  hello  ", 10).unwrap(), "hello");
        assert!(matches!(validate_message("   ", 10), Err(CoreError::Validation(_))));
        assert!(matches!(validate_message("abcdefghijk", 10), Err(CoreError::Validation(_))));
    }

    #[test]
    fn fallback_reply_is_grounded_in_snapshot() {
        let snapshot = build_snapshot(Some(&completed()), &profile());
        let reply = fallback_reply(&snapshot, "What should I study?");
        assert!(reply.starts_with("Hi Asha!"));
        assert!(reply.contains("Investigative, Social, Artistic"));
        assert!(reply.contains("logical (88/100)"));
        assert_eq!(reply, fallback_reply(&snapshot, "What should I study?"));
    }

    #[test]
    fn fallback_reply_without_assessment_nudges_completion() {
        let snapshot = build_snapshot(None, &profile());
        let reply = fallback_reply(&snapshot, "hi");
        assert!(reply.contains("Complete your assessment"));
    }

    #[tokio::test]
    async fn prompt_carries_only_the_window() {
        let responder = ChatResponder::new(ScriptedModel::always("  Try biotech.  ", 1), RetryPolicy::default(), 10);
        let snapshot = build_snapshot(Some(&completed()), &profile());

        let outcome = responder.reply(&snapshot, &turns(12), "Any ideas?").await;

        assert!(!outcome.is_fallback());
        assert_eq!(outcome.value(), "Try biotech.");
        let prompt = &responder.model().prompts()[0];
        assert!(!prompt.contains("turn 1\n"));
        assert!(prompt.contains("turn 2\n"));
        assert!(prompt.contains("turn 11\n"));
        assert!(prompt.contains("strongest interests: Investigative, Social, Artistic"));
        assert!(prompt.trim_end().ends_with("assistant:"));
    }

    #[tokio::test]
    async fn empty_model_reply_falls_back() {
        let responder = ChatResponder::new(ScriptedModel::always("   ", 1), RetryPolicy::default(), 10);
        let snapshot = build_snapshot(Some(&completed()), &profile());

        let outcome = responder.reply(&snapshot, &[], "Any ideas?").await;

        assert!(outcome.is_fallback());
        assert_eq!(responder.model().calls(), 1);
        assert!(outcome.value().contains("Investigative"));
    }
}
