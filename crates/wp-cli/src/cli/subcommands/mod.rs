mod assessment;
mod chat;
mod question;
mod user;

pub use assessment::AssessmentCommands;
pub use chat::ChatCommands;
pub use question::QuestionCommands;
pub use user::UserCommands;
