// Job board: public listing/search, admin-only posting.

pub mod handlers;
pub mod models;
pub mod store;
