use serde::Serialize;
use wp_core::entities::{ChatMessage, ChatSession};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ChatCommands;
use crate::context::AppContext;
use crate::output::output;
use crate::workflows;

#[derive(Debug, Serialize)]
struct ChatHistoryResponse {
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatClearResponse {
    session: ChatSession,
}

/// Handle `waypoint chat`.
pub async fn handle(action: &ChatCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ChatCommands::Send { user, message } => {
            let response = workflows::chat::send(ctx, user, message).await?;
            output(&response, flags.format)
        }
        ChatCommands::History { user } => {
            ctx.service.get_user(user).await?;
            let messages = ctx.service.chat_history(user).await?;
            output(&ChatHistoryResponse { messages }, flags.format)
        }
        ChatCommands::Clear { user } => {
            ctx.service.get_user(user).await?;
            let session = ctx.service.reset_chat(user).await?;
            output(&ChatClearResponse { session }, flags.format)
        }
    }
}
