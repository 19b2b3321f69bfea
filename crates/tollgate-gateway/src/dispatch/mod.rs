//! Lifecycle-event routing to the backend.

pub mod dispatcher;
pub mod target;

pub use dispatcher::RouteDispatcher;
pub use target::{HttpRouteTarget, RouteTarget};
