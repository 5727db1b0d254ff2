pub mod configuration;
pub mod domain;
pub mod expiry;
pub mod registry;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod utils;
pub mod waitlist;
