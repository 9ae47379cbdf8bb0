use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use ast_contract::cli::{execute_command, output, Cli};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

/// `-d` count picks the level; `RUST_LOG` takes over when set.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // config crate chatter is not ours
    let module_filter = filter_fn(|metadata| !metadata.target().starts_with("config::"));

    let span_events = if verbosity >= 3 {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .with_span_events(span_events)
        .with_filter(env_filter)
        .with_filter(module_filter);

    tracing_subscriber::registry().with(fmt_layer).init();
    tracing::debug!(verbosity, "logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast_contract::util::testing;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        testing::init_test_setup();
        Cli::command().debug_assert();
    }

    #[test]
    fn given_verify_with_kinds_when_parse_then_collects_names() {
        let cli = Cli::try_parse_from(["ast-contract", "-dd", "verify", "Block", "If"]).unwrap();
        assert_eq!(cli.debug, 2);
        match cli.command {
            Some(ast_contract::cli::Commands::Verify { kinds, verbose }) => {
                assert_eq!(kinds, vec!["Block".to_string(), "If".to_string()]);
                assert!(!verbose);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
