pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod notify;
pub mod policy;
pub mod sensor;
pub mod supervisor;
pub mod validation;
