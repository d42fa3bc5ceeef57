//! Multi-crate operations behind the `assessment` and `chat` commands.

pub mod assessment;
pub mod chat;

#[cfg(test)]
pub(crate) mod test_support;
