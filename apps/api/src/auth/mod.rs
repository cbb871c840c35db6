// Accounts: registration, login, session tokens, and the password-reset flow.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod password;
pub mod store;
pub mod tokens;
