pub mod common;
pub mod config;
pub mod read;
pub mod run;
