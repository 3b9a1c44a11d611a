use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use super::super::args::ExtractCommand;
use super::super::exit_status::ExitStatus;
use super::super::prompt::TerminalPrompter;
use super::super::report::{ExtractSummary, FileFailure, print_extract_summary_to};
use crate::config::{Config, load_config};
use crate::extract::{AutoAccept, Prompter};
use crate::pipeline::{ExtractSettings, Pipeline};
use crate::scan::resolve_targets;
use crate::store::OutputMode;

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let cwd = env::current_dir().context("Failed to read the working directory")?;
    let loaded = load_config(&cwd)?;
    match &loaded.path {
        Some(path) => debug!(config = %path.display(), "loaded config"),
        None => debug!("no config file found, using defaults"),
    }

    let base_dir = loaded
        .path
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(cwd.as_path())
        .to_path_buf();
    let settings = settings_from(&loaded.config, &cmd, &base_dir, &cwd);

    if settings.interactive && settings.output_mode == OutputMode::Stdout {
        bail!("--interactive cannot be combined with the stdout output mode");
    }

    let targets = resolve_targets(&cmd.path, &loaded.config.ignores)?;
    debug!(
        templates = targets.files.len(),
        skipped = targets.skipped_count,
        "resolved targets"
    );

    let summary = if settings.interactive {
        run_files(&settings, &mut TerminalPrompter::stdio(), &targets.files)?
    } else {
        run_files(&settings, &mut AutoAccept, &targets.files)?
    };

    // Rewritten templates own stdout in stdout mode
    if settings.output_mode == OutputMode::Stdout {
        print_extract_summary_to(&summary, cmd.verbose, &mut io::stderr().lock());
    } else {
        print_extract_summary_to(&summary, cmd.verbose, &mut io::stdout().lock());
    }

    if summary.failures.is_empty() {
        Ok(ExitStatus::Success)
    } else {
        Ok(ExitStatus::Failure)
    }
}

/// Merge config values with command-line overrides.
fn settings_from(config: &Config, cmd: &ExtractCommand, base_dir: &Path, cwd: &Path) -> ExtractSettings {
    let from_config = |value: &str| {
        let path = Path::new(value);
        if path.is_absolute() || base_dir == cwd {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    };

    ExtractSettings {
        locale: cmd.locale.clone().unwrap_or_else(|| config.locale.clone()),
        catalog_path: cmd
            .catalog
            .clone()
            .unwrap_or_else(|| from_config(&config.catalog_path)),
        views_root: cmd
            .views_root
            .clone()
            .unwrap_or_else(|| from_config(&config.views_root)),
        exclusions_file: from_config(&config.exclusions_file),
        output_mode: cmd.output_mode.unwrap_or(config.output_mode),
        interactive: cmd.interactive,
        ignore_texts: config.ignore_texts.clone(),
        checked_attributes: config.checked_attributes.clone(),
    }
}

fn run_files<P: Prompter + ?Sized>(
    settings: &ExtractSettings,
    prompter: &mut P,
    files: &[PathBuf],
) -> Result<ExtractSummary> {
    let mut pipeline = Pipeline::new(settings, prompter)?;
    let mut summary = ExtractSummary {
        catalog_path: pipeline.catalog_path().display().to_string(),
        ..Default::default()
    };

    let mut stdout = io::stdout();
    for file in files {
        match pipeline.extract_file(file, &mut stdout) {
            Ok(report) => summary.reports.push(report),
            Err(error) => {
                warn!(path = %file.display(), error = %error, "skipping template");
                summary.failures.push(FileFailure {
                    path: file.display().to_string(),
                    error,
                });
            }
        }
    }
    let _ = stdout.flush();

    summary.traces = pipeline.into_traces();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn command(path: &str) -> ExtractCommand {
        ExtractCommand {
            path: PathBuf::from(path),
            interactive: false,
            output_mode: None,
            locale: None,
            catalog: None,
            views_root: None,
            verbose: false,
        }
    }

    #[test]
    fn test_settings_use_config_values() {
        let config = Config {
            locale: "fr".to_string(),
            output_mode: OutputMode::Dump,
            ..Default::default()
        };
        let cwd = Path::new("/project");
        let settings = settings_from(&config, &command("app/views"), cwd, cwd);

        assert_eq!(settings.locale, "fr");
        assert_eq!(settings.output_mode, OutputMode::Dump);
        assert_eq!(settings.catalog_path, PathBuf::from("config/locales/en.json"));
        assert_eq!(settings.views_root, PathBuf::from("app/views"));
    }

    #[test]
    fn test_cli_flags_override_config() {
        let mut cmd = command("app/views");
        cmd.locale = Some("de".to_string());
        cmd.catalog = Some(PathBuf::from("de.json"));
        cmd.output_mode = Some(OutputMode::Stdout);
        let cwd = Path::new("/project");
        let settings = settings_from(&Config::default(), &cmd, cwd, cwd);

        assert_eq!(settings.locale, "de");
        assert_eq!(settings.catalog_path, PathBuf::from("de.json"));
        assert_eq!(settings.output_mode, OutputMode::Stdout);
    }

    #[test]
    fn test_config_paths_are_relative_to_config_file() {
        let settings = settings_from(
            &Config::default(),
            &command("."),
            Path::new("/project"),
            Path::new("/project/app/views"),
        );

        assert_eq!(settings.views_root, PathBuf::from("/project/app/views"));
        assert_eq!(
            settings.exclusions_file,
            PathBuf::from("/project/.hamlkey-exclusions")
        );
    }
}
