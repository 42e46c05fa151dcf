//! kubediff CLI entrypoint.
//!
//! This is the main entrypoint for the kubediff command-line tool.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use kubediff::cli::{Cli, Commands, OutputFormatter};
use kubediff::config::{Settings, SettingsLoader};
use kubediff::diff::diff_set;
use kubediff::error::Result;
use kubediff::manifest::{render_set, Loader};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Exit status when a `diff --exit-code` run finds differences.
const EXIT_DIFFERENT: u8 = 1;
/// Exit status on any error.
const EXIT_ERROR: u8 = 2;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Settings pick the log level, so they load under a bootstrap subscriber.
    let bootstrap = subscriber(bootstrap_filter(cli.verbose));
    let loaded = tracing::subscriber::with_default(bootstrap, || {
        load_settings(cli.config.as_deref())
    });
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Initialize logging
    init_logging(cli.verbose, &settings.log_level);
    debug!("Effective settings: {settings:?}");

    match run(cli, &settings) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    subscriber(filter).init();
}

/// Filter used while settings are loading: `KUBEDIFF_LOG` from the process
/// environment, or `info`.
fn bootstrap_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("KUBEDIFF_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    subscriber_with_writer(filter, std::io::stderr)
}

fn subscriber_with_writer<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .finish()
}

/// Loads `.env` and the settings file.
fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let base = explicit
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| cwd.clone(), Path::to_path_buf);

    let loader = SettingsLoader::new().with_base_path(base);
    loader.load_dotenv()?;
    loader.resolve(explicit, &cwd)
}

/// Main entry point.
fn run(cli: Cli, settings: &Settings) -> Result<ExitCode> {
    let format = cli.output.unwrap_or(settings.output);
    let color = settings.color && !cli.no_color;
    if !color {
        colored::control::set_override(false);
    }

    let formatter = OutputFormatter::new(format, color);
    let loader = Loader::new().with_duplicates(settings.duplicates);

    match cli.command {
        Commands::Diff { a, b, exit_code } => cmd_diff(&loader, &a, &b, exit_code, &formatter),
        Commands::Export { path } => cmd_export(&loader, &path),
        Commands::List { path } => cmd_list(&loader, &path, &formatter),
    }
}

/// Compare two manifest trees.
fn cmd_diff(
    loader: &Loader,
    a: &Path,
    b: &Path,
    exit_code: bool,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let set_a = loader.load(a)?;
    let set_b = loader.load(b)?;

    let diff = diff_set(&set_a, &set_b)?;
    info!("{} object(s) differ", diff.total());

    write_stdout(&formatter.format_diff(&diff))?;

    if exit_code && diff.has_changes() {
        Ok(ExitCode::from(EXIT_DIFFERENT))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print normalised manifests.
fn cmd_export(loader: &Loader, path: &Path) -> Result<ExitCode> {
    let set = loader.load(path)?;
    let rendered = render_set(&set)?;
    debug!("Rendered {} object(s)", set.len());

    write_stdout(&rendered)?;
    Ok(ExitCode::SUCCESS)
}

/// List loaded objects.
fn cmd_list(loader: &Loader, path: &Path, formatter: &OutputFormatter) -> Result<ExitCode> {
    let set = loader.load(path)?;
    write_stdout(&formatter.format_objects(&set)?)?;
    Ok(ExitCode::SUCCESS)
}

/// Writes command output to stdout in one piece.
fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_settings_load_is_logged() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("kubediff.yaml");
        std::fs::write(&file, "color: false\n").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let bootstrap = subscriber_with_writer(bootstrap_filter(true), move || writer.clone());
        let settings =
            tracing::subscriber::with_default(bootstrap, || load_settings(Some(&file))).unwrap();
        assert!(!settings.color);

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("Loading settings from"), "logs: {logs}");
    }

    #[test]
    fn test_bootstrap_filter_verbose() {
        assert_eq!(
            bootstrap_filter(true).max_level_hint(),
            Some(tracing::level_filters::LevelFilter::DEBUG)
        );
    }
}
