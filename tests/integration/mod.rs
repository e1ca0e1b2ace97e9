//! Integration tests for sentinel
//!
//! These tests drive the supervised loop end to end with a manual clock,
//! scripted or file-backed sensors and recording notify/log backends.

pub mod cli_exit;
pub mod config_loading;
pub mod door_scenario;
pub mod helpers;
pub mod restart_recovery;
