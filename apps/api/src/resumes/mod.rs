// Resume builder: owner-scoped resume documents and the ATS readiness score.

pub mod ats;
pub mod handlers;
pub mod models;
pub mod store;
