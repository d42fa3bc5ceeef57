use clap::Subcommand;

/// Career assistant commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ChatCommands {
    /// Send a message and print the assistant's reply.
    Send {
        #[arg(long)]
        user: String,
        message: String,
    },
    /// Messages in the active session.
    History {
        #[arg(long)]
        user: String,
    },
    /// Close the active session and start a fresh one.
    Clear {
        #[arg(long)]
        user: String,
    },
}
