//! Entity structs for all Waypoint domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema`; field names serialize as
//! camelCase, which is the wire contract consumed by front ends.

mod analysis;
mod assessment;
mod audit;
mod chat;
mod question;
mod user;

pub use analysis::{
    ActionPlan, CareerAnalysis, CareerPath, RecommendedStream, Resource, RiasecProfile,
};
pub use assessment::{Assessment, CategoryProgress, ProgressMap, Response, ResponseSubmission};
pub use audit::AuditEntry;
pub use chat::{ChatMessage, ChatSession, ContextSnapshot};
pub use question::{AnswerOption, Question};
pub use user::UserProfile;
