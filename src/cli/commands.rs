//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::VerificationReport;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{TypeDescriptor, Value};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let project_dir = cli
        .project_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let settings = Settings::load(project_dir.as_deref())?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Verify { kinds, verbose }) => cmd_verify(&container, kinds, *verbose),
        Some(Commands::Kinds { mutators }) => cmd_kinds(&container, *mutators),
        Some(Commands::Synth { descriptor }) => cmd_synth(&container, descriptor),
        Some(Commands::Compile {
            sources,
            classpath,
            dry_run,
        }) => cmd_compile(&container, sources, classpath, *dry_run),
        Some(Commands::Config { command }) => cmd_config(&container, project_dir.as_deref(), command),
        Some(Commands::Completion { .. }) => Ok(()),
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

#[instrument(level = "debug", skip(container))]
fn cmd_verify(container: &ServiceContainer, kinds: &[String], verbose: bool) -> CliResult<()> {
    let mut model = container.model();
    let report = container.verifier().verify(&mut model, kinds)?;
    print_report(&report, verbose);

    if report.is_passing() {
        output::success(&format!(
            "{} kinds, {} mutators: contract holds",
            report.kinds.len(),
            report.trial_count()
        ));
        Ok(())
    } else {
        Err(CliError::ContractFailed {
            violations: report.violations().count(),
            skipped: report.skipped.len(),
        })
    }
}

fn print_report(report: &VerificationReport, verbose: bool) {
    for kind in &report.kinds {
        if kind.is_passing() {
            if verbose {
                output::info(&kind.to_tree());
            } else {
                output::success(&kind.kind);
            }
        } else {
            output::failure(&kind.kind);
            output::info(&kind.to_tree());
        }
    }
    for kind in &report.skipped {
        output::warning(&format!("{} skipped (verify.exclude_kinds)", kind));
    }
    for name in &report.unknown_exclusions {
        output::warning(&format!("verify.exclude_kinds: no kind named {}", name));
    }
}

fn cmd_kinds(container: &ServiceContainer, mutators: bool) -> CliResult<()> {
    for kind in container.catalog.kinds() {
        let mut flags = kind.categories().iter().map(|c| c.name()).join(", ");
        if kind.is_reference() {
            flags.push_str("; not verified");
        }
        if !kind.is_instantiable() {
            flags.push_str("; abstract");
        }
        output::header(&format!("{} ({})", kind.id(), flags));
        if mutators {
            for m in kind.mutator_table() {
                let exemption = m
                    .exemption()
                    .map(|e| format!(" [{}]", e))
                    .unwrap_or_default();
                output::detail(&format!("{}({}){}", m.name(), m.parameter(), exemption));
            }
        }
    }
    Ok(())
}

fn cmd_synth(container: &ServiceContainer, descriptor: &str) -> CliResult<()> {
    let descriptor: TypeDescriptor = descriptor
        .parse()
        .map_err(|e| CliError::InvalidArgs(format!("{}", e)))?;
    let mut model = container.model();
    let value = container.synthesizer().synthesize(&mut model, &descriptor)?;
    debug!("cmd_synth: {} -> {}", descriptor, value);

    output::info(&value);
    let nodes = match &value {
        Value::Node(_) | Value::List(_) | Value::Set(_) => value.nodes(),
        _ => Vec::new(),
    };
    for node in nodes {
        output::info(&model.to_tree(node));
    }
    Ok(())
}

fn cmd_compile(
    container: &ServiceContainer,
    sources: &[PathBuf],
    classpath: &[String],
    dry_run: bool,
) -> CliResult<()> {
    let sources: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
    let compiler = container.compiler();
    let args = compiler.arguments(classpath, &sources)?;

    if dry_run {
        output::info(&format!(
            "{} {}",
            container.settings.compiler.command,
            args.join(" ")
        ));
        return Ok(());
    }
    let result = compiler.compile(&args)?;
    if !result.stdout.is_empty() {
        output::info(&result.stdout.trim_end());
    }
    output::success(&format!("compiled {} source path(s)", sources.len()));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    project_dir: Option<&Path>,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let mark = |p: &Path| if p.exists() { "(exists)" } else { "(not found)" };
            match global_config_path() {
                Some(p) => output::detail(&format!("global: {} {}", p.display(), mark(&p))),
                None => output::detail(&"global: <no config dir>"),
            }
            if let Some(dir) = project_dir {
                let p = local_config_path(dir);
                output::detail(&format!("local:  {} {}", p.display(), mark(&p)));
            }
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
