//! Workflows behind the `brau` subcommands

pub mod orchestration;

pub use orchestration::{
    run_init, run_release, InitOutcome, ReleaseArgs, ReleaseOutcome, ReleaseReport, ReleaseStatus,
};
