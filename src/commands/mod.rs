pub mod auth;
pub mod completions;

pub use auth::AuthCommand;
pub use completions::CompletionsCommand;
