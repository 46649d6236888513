//! tscdoc - test specification generator
//!
//! Main entry point for the `tscdoc` binary.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tscdoc_common_config::{load_dotenv, ConfigLoader, ResolvedConfig};
use tscdoc_spec::{GenerationReport, Generator, Outcome};

use tscdoc_cli::output::{Banner, Printer};
use tscdoc_cli::{Cli, CliError, Exit};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let printer = Printer::new(cli.use_color(), cli.quiet);

    match run(&cli, &printer) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            match e.location() {
                Some((path, line)) => printer.error(path, line, &e.to_string()),
                None => printer.error_message(&e.to_string()),
            }
            printer.banner(Banner::Failed);
            e.exit_code()
        }
    }
}

fn run(cli: &Cli, printer: &Printer) -> Result<(), CliError> {
    // `.env` may carry TSCDOC_LOG_*, so it is loaded before logging starts.
    let dotenv = load_dotenv()?;
    tscdoc_common_log::init(cli.log_config())?;
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    printer.heading("Running oAW to RST generator");

    let config = load_config(cli)?;
    printer.line(format!("Component: {}", config.component));
    printer.line(format!("Test path: {}", config.test_path.display()));
    printer.line(format!("Spec path: {}", config.spec_path.display()));
    printer.line("");

    let component = config.component.clone();
    match Generator::new(config).run()? {
        Outcome::NoSources => {
            printer.line(format!("No oAW tests found for {component}."));
        }
        Outcome::Skipped { failures } => {
            for failure in &failures {
                if let Some(path) = failure.path() {
                    printer.error(path, failure.line(), &failure.to_string());
                }
            }
            printer.banner(Banner::Skipped);
        }
        Outcome::Generated(report) => {
            print_report(printer, &report);
            for warning in &report.warnings {
                printer.warning(&warning.path, warning.line, &warning.message);
            }
            printer.banner(Banner::for_warnings(report.warnings.len()));
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ResolvedConfig, CliError> {
    let cwd = std::env::current_dir().map_err(CliError::WorkingDir)?;
    let loader = ConfigLoader::new(cli.config_path());
    let to_cli = |e| CliError::config(loader.config_path(), e);

    // Without an explicit file, flags alone may describe the run.
    let config = if cli.config_is_explicit() {
        loader.load()
    } else {
        loader.load_or_default()
    }
    .map_err(to_cli)?;

    loader
        .resolve(config, &cli.overrides(), &cwd)
        .map_err(to_cli)
}

fn print_report(printer: &Printer, report: &GenerationReport) {
    printer.list(
        "Test (.tsc) files found:",
        report.sources.iter().map(|p| p.display()),
    );
    printer.list("Table of content rst file:", [report.toc_path.display()]);
    if !report.deleted.is_empty() {
        printer.list(
            "Deleted old test specification files:",
            report.deleted.iter().map(|p| p.display()),
        );
    }
    printer.list(
        "Generated test group rst files:",
        report.documents.iter().map(|d| d.path.display()),
    );
}
