use crate::CoreError;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Root book file produced by the asciidoc render.
pub const ROOT_FILE: &str = "_book/book-asciidoc/R-Packages--2e-.adoc";

/// Lines dropped from the root file after render.
pub const DEFAULT_EXCLUSIONS: &[&str] = &["[appendix]", "include::R-CMD-check.adoc[]"];

/// Picked up from the working directory when `--config` is not given.
pub const PROJECT_CONFIG_FILE: &str = "lineprune.toml";

#[derive(Debug, Parser, Clone)]
#[clap(
    about = "Remove literal lines from rendered documents",
    long_about = "These are the main arguments for the exclusion pass."
)]
pub struct LinepruneArgs {
    #[clap(help = "Files to rewrite in place [default: the rendered root book file]")]
    pub paths: Vec<PathBuf>,

    #[clap( long = "exclude", value_name = "LINE", help = "Exact line to remove, without its newline [multiple allowed]", action = clap::ArgAction::Append )]
    pub exclude: Vec<String>,

    #[clap(long, value_name = "FILE", help = "TOML config file [default: ./lineprune.toml if present]")]
    pub config: Option<PathBuf>,

    #[clap(long, help = "Show what would be removed without writing")]
    pub dry_run: bool,

    #[clap(long, help = "Ask before rewriting files")]
    pub confirm: bool,

    #[clap(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

impl Default for LinepruneArgs {
    fn default() -> Self {
        LinepruneArgs {
            paths: Vec::new(),
            exclude: Vec::new(),
            config: None,
            dry_run: false,
            confirm: false,
            log_level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    #[clap(about = "Generate shell completion scripts")]
    Completion(CompletionArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct CompletionArgs {
    #[clap(value_parser = clap::value_parser!(clap_complete::Shell))]
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "lineprune",
    version,
    about = "Remove literal lines from rendered documents",
    long_about = "Post-render step: strips the first occurrence of each listed line from the generated root file and writes it back in place.",
    propagate_version = true
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[clap(flatten)]
    pub main_opts: LinepruneArgs,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub root_file: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
}

impl FileConfig {
    pub fn parse(path: &Path, text: &str) -> Result<Self, CoreError> {
        toml::from_str(text).map_err(|e| CoreError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = fs::read_to_string(path).map_err(|e| CoreError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &text)
    }

    /// An explicit path must exist; the project file in `dir` is optional.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Option<Self>, CoreError> {
        if let Some(p) = explicit {
            return Self::load(p).map(Some);
        }
        let project = dir.join(PROJECT_CONFIG_FILE);
        if project.is_file() {
            log::info!("Using config {}", project.display());
            Self::load(&project).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub paths: Vec<PathBuf>,
    pub exclusions: Vec<String>,
    pub dry_run: bool,
    pub confirm: bool,
}

impl Settings {
    /// CLI values win over the config file, which wins over the built-in defaults.
    pub fn resolve(args: &LinepruneArgs, file: Option<FileConfig>) -> Self {
        let file = file.unwrap_or_default();

        let mut paths = if !args.paths.is_empty() {
            args.paths.clone()
        } else if let Some(root) = file.root_file {
            vec![root]
        } else {
            vec![PathBuf::from(ROOT_FILE)]
        };
        paths.sort();
        let mut seen = HashSet::new();
        paths.retain(|p| seen.insert(identity_key(p)));

        let exclusions = if !args.exclude.is_empty() {
            args.exclude.clone()
        } else if let Some(list) = file.exclude {
            list
        } else {
            DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
        };

        Settings {
            paths,
            exclusions,
            dry_run: args.dry_run,
            confirm: args.confirm,
        }
    }
}

/// Key under which two spellings of the same file compare equal.
///
/// Existing files are canonicalized, so symlinks and `./` prefixes collapse. A missing file is
/// keyed by its absolute path with `.` components dropped; it will fail at read time anyway.
fn identity_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    absolute
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_no_config_is_the_render_hook() {
        let s = Settings::resolve(&LinepruneArgs::default(), None);
        assert_eq!(s.paths, vec![PathBuf::from(ROOT_FILE)]);
        assert_eq!(s.exclusions, vec!["[appendix]", "include::R-CMD-check.adoc[]"]);
        assert!(!s.dry_run);
    }

    #[test]
    fn programmatic_default_matches_parsed_default() {
        let parsed = CliArgs::parse_from(["lineprune"]).main_opts;
        let built = LinepruneArgs::default();
        assert_eq!(parsed.log_level, built.log_level);
        assert_eq!(parsed.paths, built.paths);
        assert_eq!(parsed.exclude, built.exclude);
        assert_eq!(parsed.dry_run, built.dry_run);
    }

    #[test]
    fn dot_prefixed_alias_is_deduplicated() {
        let args = CliArgs::parse_from(["lineprune", "a.adoc", "./a.adoc"]).main_opts;
        let s = Settings::resolve(&args, None);
        assert_eq!(s.paths.len(), 1);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let file = FileConfig::parse(
            Path::new("lineprune.toml"),
            "root_file = \"book.adoc\"\nexclude = [\"[preface]\"]\n",
        )
        .unwrap();
        let s = Settings::resolve(&LinepruneArgs::default(), Some(file));
        assert_eq!(s.paths, vec![PathBuf::from("book.adoc")]);
        assert_eq!(s.exclusions, vec!["[preface]"]);
    }

    #[test]
    fn cli_overrides_config_file() {
        let args = CliArgs::parse_from([
            "lineprune",
            "b.adoc",
            "a.adoc",
            "b.adoc",
            "--exclude",
            "x",
            "--dry-run",
        ])
        .main_opts;
        let file = FileConfig {
            root_file: Some(PathBuf::from("book.adoc")),
            exclude: Some(vec!["y".to_string()]),
        };
        let s = Settings::resolve(&args, Some(file));
        assert_eq!(s.paths, vec![PathBuf::from("a.adoc"), PathBuf::from("b.adoc")]);
        assert_eq!(s.exclusions, vec!["x"]);
        assert!(s.dry_run);
    }

    #[test]
    fn partial_config_keeps_default_exclusions() {
        let file = FileConfig::parse(Path::new("c.toml"), "root_file = \"book.adoc\"").unwrap();
        let s = Settings::resolve(&LinepruneArgs::default(), Some(file));
        assert_eq!(s.exclusions.len(), DEFAULT_EXCLUSIONS.len());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = FileConfig::parse(Path::new("c.toml"), "excludes = []").unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn completion_subcommand_parses() {
        let cli = CliArgs::parse_from(["lineprune", "completion", "bash"]);
        assert!(matches!(cli.command, Some(Command::Completion(_))));
    }
}
