use clap::Subcommand;

use crate::cli::subcommands::{AssessmentCommands, ChatCommands, QuestionCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the project database and seed the default question bank.
    Init,
    /// Student profiles.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Question bank.
    Question {
        #[command(subcommand)]
        action: QuestionCommands,
    },
    /// Assessments: start, answer, submit, analyse.
    Assessment {
        #[command(subcommand)]
        action: AssessmentCommands,
    },
    /// Career assistant chat.
    Chat {
        #[command(subcommand)]
        action: ChatCommands,
    },
}
