pub mod authentication;
pub mod body;
pub mod configuration;
pub mod cookies;
pub mod errors;
pub mod routes;
pub mod sessions;
pub mod startup;
pub mod telemetry;
