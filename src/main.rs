//! This crate serves the telecom formula API over HTTP. The listening port and the cross-origin
//! policy are specified on the command line or through the environment (`PORT`,
//! `ALLOWED_ORIGINS`, `PREVIEW_ORIGIN_PATTERN`); log filtering follows `RUST_LOG`.
//!
//! Build the executable with `cargo build --release` and then run `./target/release/telcalc -h`
//! for help on the command-line interface.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use anyhow::Result;
use clap::{crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use telcalc::{api, CorsPolicy, ServerConfig, DEFAULT_PORT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main function
#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let matches = command_line_parser().get_matches();
    let config = server_config_from_matches(&matches)?;
    api::serve(config).await?;
    Ok(())
}

/// Installs the global tracing subscriber.
fn init_logger() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("telcalc=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Serves closed-form telecommunications engineering formulas over HTTP")
        .arg(port())
        .arg(allowed_origins())
        .arg(preview_origin_pattern())
}

/// Returns argument for listening port.
fn port() -> Arg {
    Arg::new("port")
        .short('p')
        .long("port")
        .env("PORT")
        .value_parser(value_parser!(u16))
        .help(format!("TCP port to listen on [default: {DEFAULT_PORT}]"))
}

/// Returns argument for origins admitted by exact match.
fn allowed_origins() -> Arg {
    Arg::new("allowed_origins")
        .short('o')
        .long("allowed-origins")
        .env("ALLOWED_ORIGINS")
        .action(ArgAction::Append)
        .value_delimiter(',')
        .default_value(telcalc::cors::DEFAULT_ALLOWED_ORIGIN)
        .help("Comma-separated origins admitted for cross-origin requests")
}

/// Returns argument for pattern of admitted preview-deployment origins.
fn preview_origin_pattern() -> Arg {
    Arg::new("preview_origin_pattern")
        .short('r')
        .long("preview-origin-pattern")
        .env("PREVIEW_ORIGIN_PATTERN")
        .help("Regular expression matching whole origins of preview deployments")
}

/// Returns server configuration based on command-line arguments.
fn server_config_from_matches(matches: &ArgMatches) -> Result<ServerConfig> {
    let cors = CorsPolicy::new(
        allowed_origins_from_matches(matches),
        matches
            .get_one::<String>("preview_origin_pattern")
            .map(String::as_str),
    )?;
    Ok(ServerConfig {
        port: port_from_matches(matches),
        cors,
    })
}

/// Returns listening port.
fn port_from_matches(matches: &ArgMatches) -> u16 {
    matches
        .get_one::<u16>("port")
        .copied()
        .unwrap_or(DEFAULT_PORT)
}

/// Returns origins admitted by exact match.
fn allowed_origins_from_matches(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("allowed_origins")
        .map(|origins| origins.cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_line_for_test() -> Vec<&'static str> {
        vec![
            crate_name!(),
            "-p",
            "8080",
            "-o",
            "https://calc.example.com,http://localhost:5173",
            "-r",
            r"https://calc-[a-z0-9]+\.vercel\.app",
        ]
    }

    #[test]
    fn test_command_line_parser() {
        assert!(command_line_parser()
            .try_get_matches_from(command_line_for_test())
            .is_ok());
        assert!(command_line_parser()
            .try_get_matches_from([crate_name!(), "-p", "70000"])
            .is_err());
    }

    #[test]
    fn test_server_config_from_matches() {
        let matches = command_line_parser().get_matches_from(command_line_for_test());
        let config = server_config_from_matches(&matches).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors.allowed_origins(),
            ["https://calc.example.com", "http://localhost:5173"]
        );
        assert!(config.cors.is_allowed("https://calc-a1b2.vercel.app"));
        assert!(!config.cors.is_allowed("http://localhost:3000"));
    }

    #[test]
    fn test_default_port() {
        let matches = command_line_parser().get_matches_from([crate_name!()]);
        let expected = std::env::var("PORT").map_or(DEFAULT_PORT, |port| port.parse().unwrap());
        assert_eq!(port_from_matches(&matches), expected);
    }

    #[test]
    fn test_invalid_preview_origin_pattern() {
        let matches =
            command_line_parser().get_matches_from([crate_name!(), "-p", "8080", "-r", "(oops"]);
        assert!(server_config_from_matches(&matches).is_err());
    }
}
