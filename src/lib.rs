pub mod authentication;
pub mod configuration;
pub mod dispatch;
pub mod domain;
pub mod routes;
pub mod session;
pub mod sms_client;
pub mod spreadsheet;
pub mod startup;
pub mod telemetry;
pub mod template;
