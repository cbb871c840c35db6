// Email builder: template catalog, placeholder rendering, saved drafts.

pub mod handlers;
pub mod models;
pub mod templates;
