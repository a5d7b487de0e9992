use crate::CoreError;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionOutcome {
    Removed { line: String, offset: usize },
    NotFound { line: String },
}

impl ExclusionOutcome {
    pub fn line(&self) -> &str {
        match self {
            ExclusionOutcome::Removed { line, .. } | ExclusionOutcome::NotFound { line } => line,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, ExclusionOutcome::Removed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcomes: Vec<ExclusionOutcome>,
    pub changed: bool,
    pub written: bool,
}

impl FileReport {
    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_removed())
            .map(ExclusionOutcome::line)
    }

    pub fn not_found(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_removed())
            .map(ExclusionOutcome::line)
    }
}

/// Removes the first occurrence of `line` followed by `'\n'`.
///
/// Only the first match is taken; later copies of the same line survive. Returns the byte offset
/// the removed text started at.
pub fn remove_first_line(text: &mut String, line: &str) -> Option<usize> {
    let needle = format!("{}\n", line);
    let offset = text.find(&needle)?;
    text.replace_range(offset..offset + needle.len(), "");
    Some(offset)
}

pub fn exclude_lines<S: AsRef<str>>(text: &str, exclusions: &[S]) -> String {
    exclude_lines_with_outcomes(text, exclusions).0
}

pub fn exclude_lines_with_outcomes<S: AsRef<str>>(
    text: &str,
    exclusions: &[S],
) -> (String, Vec<ExclusionOutcome>) {
    let mut contents = text.to_string();
    let outcomes = exclusions
        .iter()
        .map(|e| {
            let line = e.as_ref().to_string();
            match remove_first_line(&mut contents, &line) {
                Some(offset) => ExclusionOutcome::Removed { line, offset },
                None => ExclusionOutcome::NotFound { line },
            }
        })
        .collect();
    (contents, outcomes)
}

fn transform<S: AsRef<str>>(
    path: &Path,
    exclusions: &[S],
) -> Result<(String, FileReport), CoreError> {
    let original = fs::read_to_string(path).map_err(|source| CoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (contents, outcomes) = exclude_lines_with_outcomes(&original, exclusions);
    for o in &outcomes {
        match o {
            ExclusionOutcome::Removed { line, offset } => {
                log::debug!("{}: removed {:?} at byte {}", path.display(), line, offset)
            }
            ExclusionOutcome::NotFound { line } => {
                log::debug!("{}: no line {:?}", path.display(), line)
            }
        }
    }
    let report = FileReport {
        path: path.to_path_buf(),
        changed: contents != original,
        outcomes,
        written: false,
    };
    Ok((contents, report))
}

/// Rewrites `path` in place with `exclusions` removed.
///
/// The file is always written back, even when nothing matched. There is no temporary file and no
/// backup: a failed write leaves whatever the OS left behind.
pub fn exclude<S: AsRef<str>>(path: &Path, exclusions: &[S]) -> Result<FileReport, CoreError> {
    let (contents, mut report) = transform(path, exclusions)?;
    fs::write(path, contents).map_err(|source| CoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    report.written = true;
    Ok(report)
}

pub fn preview<S: AsRef<str>>(path: &Path, exclusions: &[S]) -> Result<FileReport, CoreError> {
    transform(path, exclusions).map(|(_, report)| report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = "intro\n[appendix]\ninclude::R-CMD-check.adoc[]\nbody\n";

    #[test]
    fn removes_default_appendix_lines() {
        let out = exclude_lines(BOOK, &["[appendix]", "include::R-CMD-check.adoc[]"]);
        assert_eq!(out, "intro\nbody\n");
    }

    #[test]
    fn only_first_occurrence_goes() {
        let out = exclude_lines("a\nx\nb\nx\n", &["x"]);
        assert_eq!(out, "a\nb\nx\n");
    }

    #[test]
    fn repeated_entry_removes_one_copy_each() {
        let out = exclude_lines("x\nx\nx\n", &["x", "x"]);
        assert_eq!(out, "x\n");
    }

    #[test]
    fn missing_line_is_a_no_op() {
        let out = exclude_lines(BOOK, &["[preface]"]);
        assert_eq!(out, BOOK);
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let out = exclude_lines("intro\n[appendix]", &["[appendix]"]);
        assert_eq!(out, "intro\n[appendix]");
    }

    #[test]
    fn crlf_is_not_matched() {
        let text = "intro\r\n[appendix]\r\nbody\r\n";
        assert_eq!(exclude_lines(text, &["[appendix]"]), text);
    }

    #[test]
    fn match_is_substring_not_whole_line() {
        // "pre[appendix]\n" contains "[appendix]\n"
        let out = exclude_lines("pre[appendix]\nbody\n", &["[appendix]"]);
        assert_eq!(out, "prebody\n");
    }

    #[test]
    fn earlier_removal_can_expose_later_match() {
        let out = exclude_lines("ab\nc\n", &["b", "ac"]);
        assert_eq!(out, "");
    }

    #[test]
    fn empty_exclusion_eats_first_newline() {
        assert_eq!(exclude_lines("a\nb\n", &[""]), "ab\n");
    }

    #[test]
    fn outcomes_record_offsets() {
        let (out, outcomes) = exclude_lines_with_outcomes(BOOK, &["[appendix]", "missing"]);
        assert_eq!(out, "intro\ninclude::R-CMD-check.adoc[]\nbody\n");
        assert_eq!(
            outcomes,
            vec![
                ExclusionOutcome::Removed {
                    line: "[appendix]".to_string(),
                    offset: 6
                },
                ExclusionOutcome::NotFound {
                    line: "missing".to_string()
                },
            ]
        );
    }

    #[test]
    fn remove_first_line_reports_none_without_touching_text() {
        let mut text = String::from("keep\n");
        assert_eq!(remove_first_line(&mut text, "gone"), None);
        assert_eq!(text, "keep\n");
    }
}
