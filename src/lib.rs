pub mod configuration;
pub mod domains;
pub mod email_client;
pub mod routes;
pub mod startup;
pub mod storage;
pub mod telemetry;
