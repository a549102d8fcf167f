//! Unit tests for CLI parsing

use crate::cli::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_no_arguments_means_serve_with_defaults() {
    let cli = Cli::try_parse_from(["interview-api"]).unwrap();
    assert!(cli.command.is_none());
    let config = cli.serve.resolve().unwrap();
    assert_eq!(config.addr, "0.0.0.0:4567");
    assert!(!config.skip_migrations);
}

#[test]
fn test_serve_command_with_flags() {
    let cli = Cli::try_parse_from([
        "interview-api",
        "serve",
        "--addr",
        "127.0.0.1:8080",
        "--database",
        ":memory:",
        "--skip-migrations",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Serve(args)) => {
            let config = args.resolve().unwrap();
            assert_eq!(config.addr, "127.0.0.1:8080");
            assert_eq!(config.database, PathBuf::from(":memory:"));
            assert!(config.skip_migrations);
        }
        other => panic!("Expected Serve command, got {other:?}"),
    }
}

#[test]
fn test_routes_command_parses() {
    let cli = Cli::try_parse_from(["interview-api", "routes"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Routes)));
}

#[test]
fn test_unknown_flag_is_rejected() {
    assert!(Cli::try_parse_from(["interview-api", "--port", "80"]).is_err());
}
