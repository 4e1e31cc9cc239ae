//! CLI commands for conveyor
//!
//! This module contains all user-facing command implementations:
//!
//! - **init**: Write a starter conveyor.toml
//! - **doctor**: Run environment health checks
//! - **plan**: Show what a run would do for a tag, without side effects
//! - **run**: Execute the publish pipeline for a tag

pub mod doctor;
pub mod init;
pub mod plan;
pub mod run;

pub use doctor::run_doctor;
pub use init::run_init;
pub use plan::run_plan;
pub use run::{Secrets, run_publish};
