pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod notification;
pub mod routes;
pub mod startup;
pub mod store;
pub mod submission;
pub mod telemetry;
pub mod utils;
