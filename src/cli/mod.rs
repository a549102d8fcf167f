//! # CLI Module
//!
//! Command-line entry point of the `interview-api` binary.
//!
//! ## Commands
//!
//! ### `serve` (default)
//!
//! ```bash
//! interview-api                                  # 0.0.0.0:4567, ./interview.db
//! interview-api serve --addr 127.0.0.1:8080 --database /tmp/items.db
//! interview-api --config config.yaml --skip-migrations
//! ```
//!
//! Every flag also reads an `INTERVIEW_API_*` environment variable.
//!
//! ### `routes`
//!
//! Print the routing table and exit.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands, ServeArgs};
