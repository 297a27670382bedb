// User profile: registration and derived energy metrics.

pub mod handlers;
pub mod metrics;
