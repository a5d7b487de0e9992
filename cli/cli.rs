use lineprune_core::{
    CliArgs, Command as CoreCommand, FileConfig, Mode, ProcessedFileResult, Settings,
    process_files,
};
mod interaction;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use console::style;
use std::io;
use std::path::Path;
use std::process::ExitCode;

fn print_completions_cli(shell: clap_complete::Shell) {
    let mut cmd = CliArgs::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}

fn init_logging(level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn print_report(result: &ProcessedFileResult, mode: Mode) -> bool {
    let verb = match mode {
        Mode::Apply => "removed",
        Mode::DryRun => "would remove",
    };
    match &result.outcome {
        Ok(report) => {
            println!("{}", style(report.path.display()).bold());
            for line in report.removed() {
                println!("  {} {}", style(verb).green(), line);
            }
            for line in report.not_found() {
                println!("  {} {}", style("not found").dim(), line);
            }
            true
        }
        Err(err_msg) => {
            eprintln!(
                "  {} Failed: {} - {}",
                style("⚠️").yellow(),
                style(result.path.display()).dim(),
                style(err_msg).red()
            );
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli: CliArgs = CliArgs::parse();
    run(cli, Path::new("."))
}

/// `cwd` is where `lineprune.toml` is looked up.
fn run(cli: CliArgs, cwd: &Path) -> Result<ExitCode> {
    if let Some(command_enum_val) = cli.command {
        match command_enum_val {
            CoreCommand::Completion(args) => {
                print_completions_cli(args.shell);
                return Ok(ExitCode::SUCCESS);
            }
        }
    }

    let main_app_args = cli.main_opts;
    init_logging(&main_app_args.log_level);

    let file_config = match FileConfig::discover(main_app_args.config.as_deref(), cwd) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", style(format!("Config Error: {}", e)).red());
            return Ok(ExitCode::FAILURE);
        }
    };
    let settings = Settings::resolve(&main_app_args, file_config);
    log::debug!("Resolved settings: {:?}", settings);

    let mode = if settings.dry_run {
        Mode::DryRun
    } else {
        Mode::Apply
    };

    if mode == Mode::Apply {
        match interaction::confirm_processing(&settings.paths, !settings.confirm) {
            Ok(true) => {}
            Ok(false) => return Ok(ExitCode::SUCCESS),
            Err(e) => {
                eprintln!(
                    "{}",
                    style(format!("Error during confirmation: {}", e)).red()
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    let processing_results = match process_files(settings.paths, &settings.exclusions, mode) {
        Ok(results) => results,
        Err(e) => {
            eprintln!(
                "{}",
                style(format!("Critical error during processing setup: {}", e)).red()
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut success_count = 0;
    let mut failure_count = 0;
    for result in &processing_results {
        if print_report(result, mode) {
            success_count += 1;
        } else {
            failure_count += 1;
        }
    }
    if processing_results.len() > 1 || failure_count > 0 {
        println!(
            "Result: {} {} processed successfully, {} {} failed.",
            style(success_count).green(),
            if success_count == 1 { "file" } else { "files" },
            style(failure_count).red(),
            if failure_count == 1 { "file" } else { "files" }
        );
    }

    if failure_count > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
