use clap::Subcommand;

/// Student profile commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Register a student.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// School class, e.g. 10
        #[arg(long = "class")]
        class_level: Option<String>,
        #[arg(long)]
        age: Option<u32>,
    },
    /// Get a student by ID.
    Get { id: String },
}
