pub mod assessment;
pub mod chat;
pub mod dispatch;
pub mod init;
pub mod question;
pub mod shared;
pub mod user;
