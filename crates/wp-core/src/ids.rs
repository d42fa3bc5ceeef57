//! ID prefix constants.
//!
//! Every persisted entity gets a `{prefix}-{8 hex chars}` identifier generated
//! by the database layer (see `WpDb::generate_id`).

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_QUESTION: &str = "qst";
pub const PREFIX_ASSESSMENT: &str = "asm";
pub const PREFIX_CHAT: &str = "cht";
pub const PREFIX_AUDIT: &str = "aud";

/// All prefixes, for exhaustive tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_USER,
    PREFIX_QUESTION,
    PREFIX_ASSESSMENT,
    PREFIX_CHAT,
    PREFIX_AUDIT,
];
