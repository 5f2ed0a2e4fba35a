//! taproot-build - build orchestration helpers for Taproot projects
//!
//! Two independent tools live behind one binary:
//!
//! ```text
//! subproject  → project.xml → git describe + directory fingerprint → lbuild build (on miss)
//! args        → SCons-style tokens → validated build options record
//! ```

mod build_args;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod subproject;
mod utils;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error::report(&err);
            ExitCode::FAILURE
        }
    }
}
