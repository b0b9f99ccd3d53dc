pub mod access;
pub mod applications;
pub mod auth;
pub mod config;
pub mod error;
pub mod ids;
pub mod jobs;
pub mod profiles;
pub mod repository;
pub mod router;
pub mod store;
pub mod telemetry;

pub use router::{portal_router, API_PREFIX};
