use clap::Subcommand;

/// Assessment commands. Every command acts on behalf of `--user`.
#[derive(Clone, Debug, Subcommand)]
pub enum AssessmentCommands {
    /// Start an assessment, or resume the active one.
    Start {
        #[arg(long)]
        user: String,
    },
    /// Save answers into an assessment.
    Save {
        id: String,
        #[arg(long)]
        user: String,
        /// QUESTION_ID=ANSWER:SCORE, repeatable
        #[arg(long)]
        answer: Vec<String>,
        /// JSON array of {questionId, answer, score}; `-` reads stdin
        #[arg(long)]
        answers_file: Option<String>,
    },
    /// Submit a fully answered assessment for scoring.
    Submit {
        id: String,
        #[arg(long)]
        user: String,
    },
    /// Get an assessment with its responses.
    Get {
        id: String,
        #[arg(long)]
        user: String,
    },
    /// List a student's assessments, newest first.
    List {
        #[arg(long)]
        user: String,
    },
    /// Show per-category progress.
    Progress {
        id: String,
        #[arg(long)]
        user: String,
    },
    /// Abandon an unfinished assessment.
    Abandon {
        id: String,
        #[arg(long)]
        user: String,
    },
    /// Abandon every unfinished assessment idle for longer than the cutoff.
    AbandonStale {
        #[arg(long, default_value_t = 72)]
        idle_hours: u32,
    },
    /// Career analysis of a completed assessment.
    Analysis {
        id: String,
        #[arg(long)]
        user: String,
        /// Ignore any stored analysis and generate a new one.
        #[arg(long)]
        regenerate: bool,
    },
}
