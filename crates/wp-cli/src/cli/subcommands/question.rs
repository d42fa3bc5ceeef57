use clap::Subcommand;

/// Question bank commands.
#[derive(Clone, Debug, Subcommand)]
pub enum QuestionCommands {
    /// List questions in bank order.
    List {
        /// interest, aptitude, personality, academic
        #[arg(long)]
        category: Option<String>,
        /// Include inactive questions.
        #[arg(long)]
        all: bool,
    },
    /// Insert the default 85-question bank (idempotent).
    Seed,
}
