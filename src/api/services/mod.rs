pub mod agent;
pub mod analytics;
pub mod health;
pub mod helpers;
pub mod inquiries;
pub mod properties;
pub mod routes;

pub use health::{AppStartTime, HealthResponse};
pub use routes::configure;
