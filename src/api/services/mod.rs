pub mod health;
pub mod lookup;

pub use health::{AppStartTime, HealthService, HealthStatus, health_routes};
pub use lookup::{LookupService, lookup_routes};
