pub mod geo_context;
pub mod request_id;

pub use geo_context::{AttachedGeo, GeoContextMiddleware};
pub use request_id::{RequestId, RequestIdMiddleware};
