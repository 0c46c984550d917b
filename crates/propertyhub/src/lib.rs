pub mod auth;
pub mod config;
pub mod error;
pub mod listings;
pub mod moderation;
pub mod telemetry;
