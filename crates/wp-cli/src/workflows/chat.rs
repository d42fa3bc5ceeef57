use chrono::Utc;
use wp_ai::GenerativeModel;
use wp_ai::chat::{build_snapshot, validate_message};
use wp_core::entities::ChatMessage;
use wp_core::enums::ChatRole;
use wp_core::responses::ChatReplyResponse;

use crate::context::AppContext;

/// One chat turn: refresh the context snapshot, answer from the history
/// window, and append both turns to the active session.
pub async fn send<M: GenerativeModel>(
    ctx: &AppContext<M>,
    user_id: &str,
    message: &str,
) -> anyhow::Result<ChatReplyResponse> {
    let message = validate_message(message, ctx.config.chat.max_message_chars)?;
    let user = ctx.service.get_user(user_id).await?;
    let session = ctx.service.get_or_create_active_chat(user_id).await?;

    let latest = ctx.service.latest_completed_assessment(user_id).await?;
    let snapshot = build_snapshot(latest.as_ref(), &user);
    if snapshot != session.context {
        ctx.service.update_chat_context(&session.id, &snapshot).await?;
    }

    let user_turn = ChatMessage {
        role: ChatRole::User,
        content: message.to_string(),
        timestamp: Utc::now(),
    };
    let outcome = ctx.chat.reply(&snapshot, &session.messages, message).await;
    let fallback = outcome.is_fallback();
    let reply = ChatMessage {
        role: ChatRole::Assistant,
        content: outcome.into_value(),
        timestamp: Utc::now(),
    };

    ctx.service
        .append_chat_messages(&session.id, &[user_turn, reply.clone()])
        .await?;

    Ok(ChatReplyResponse {
        session_id: session.id,
        reply,
        fallback,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wp_ai::testing::ScriptedModel;
    use wp_db::error::DatabaseError;

    use super::*;
    use crate::workflows::test_support::{completed_assessment, register, test_context};

    #[tokio::test]
    async fn turns_are_appended_in_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = test_context(ScriptedModel::always("Consider biology.", 1), tmp.path()).await;
        let user = register(&ctx, "Asha").await;

        let response = send(&ctx, &user.id, "  What should I study?  ").await.unwrap();

        assert!(!response.fallback);
        assert_eq!(response.reply.content, "Consider biology.");
        let history = ctx.service.chat_history(&user.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "What should I study?");
        assert_eq!(history[1].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn snapshot_comes_from_latest_completed_assessment() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = test_context(ScriptedModel::default(), tmp.path()).await;
        let (user, assessment_id) = completed_assessment(&ctx, false).await;
        ctx.service.submit_assessment(&user.id, &assessment_id).await.unwrap();

        let response = send(&ctx, &user.id, "Which stream?").await.unwrap();

        assert!(response.fallback);
        let session = ctx.service.get_chat_session(&response.session_id).await.unwrap();
        assert_eq!(session.context.assessment_id.as_deref(), Some(assessment_id.as_str()));
        assert_eq!(session.context.interests.len(), 3);
        assert!(ctx.chat.model().prompts()[0].contains("strongest interests"));
    }

    #[tokio::test]
    async fn prompt_window_is_bounded() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = test_context(ScriptedModel::always("ok", 8), tmp.path()).await;
        let user = register(&ctx, "Asha").await;

        for i in 0..7 {
            send(&ctx, &user.id, &format!("question {i}")).await.unwrap();
        }

        let prompts = ctx.chat.model().prompts();
        let last = prompts.last().unwrap();
        // 12 prior turns, window of 10: the first exchange is dropped.
        assert!(!last.contains("question 0\n"));
        assert!(last.contains("question 1\n"));
        assert!(last.contains("question 6\n"));
        assert_eq!(ctx.service.chat_history(&user.id).await.unwrap().len(), 14);
    }

    #[tokio::test]
    async fn clear_starts_a_fresh_session() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = test_context(ScriptedModel::always("ok", 2), tmp.path()).await;
        let user = register(&ctx, "Asha").await;

        let first = send(&ctx, &user.id, "hello").await.unwrap();
        ctx.service.reset_chat(&user.id).await.unwrap();
        let second = send(&ctx, &user.id, "hello again").await.unwrap();

        assert_ne!(first.session_id, second.session_id);
        assert_eq!(ctx.service.chat_history(&user.id).await.unwrap().len(), 2);
        assert_eq!(ctx.service.list_chat_sessions(&user.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn blank_message_is_rejected_before_any_call() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = test_context(ScriptedModel::default(), tmp.path()).await;
        let user = register(&ctx, "Asha").await;

        assert!(send(&ctx, &user.id, "   ").await.is_err());
        assert_eq!(ctx.chat.model().calls(), 0);
        assert!(ctx.service.find_active_chat(&user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = test_context(ScriptedModel::default(), tmp.path()).await;

        let err = send(&ctx, "usr-missing", "hi").await.unwrap_err();

        assert!(err.downcast_ref::<DatabaseError>().is_some_and(DatabaseError::is_not_found));
    }
}
