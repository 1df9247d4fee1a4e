//! # Files Command
//!
//! Implements the file review command for the Redline CLI.
//!
//! ## Pipeline
//!
//! 1. Locate the project root and load `.redline/config.json`
//! 2. Collect candidate files under the root, applying selection and
//!    ignore patterns
//! 3. Match files against ruleset scopes and plan evaluation units
//! 4. Dispatch units to the evaluation service
//! 5. Aggregate, render, and derive the exit status
//!
//! ## Usage
//!
//! ```bash
//! redline review files                       # Review everything in scope
//! redline review files "docs/**/*.md"        # Review a subset
//! redline review files --ignore "CHANGELOG.md"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{ApiClient, ApiEvaluator};
use crate::config::{Config, find_project_root};
use crate::errors::{display_config_error, display_network_error, display_warning};
use crate::exit_codes::*;
use crate::review::matcher::match_options;
use crate::review::types::FileRecord;
use crate::review::{Dispatcher, aggregate, exit_status, match_files, plan, render, summarize};

/// Arguments for the files command
pub struct FilesArgs {
    /// Glob patterns selecting files to review (all files when empty)
    pub files: Vec<String>,
    /// Glob patterns excluding files from review
    pub ignore: Vec<String>,
    /// Verbose mode (print cache statistics)
    pub verbose: bool,
}

/// Execute the files command
///
/// Reviews the selected files against the configured rulesets and
/// displays the verdicts.
///
/// # Arguments
///
/// * `args` - Files command arguments
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - Review completed with no error-level violations
/// * `Ok(EXIT_VIOLATIONS_FOUND)` - Review completed with violations
/// * `Ok(EXIT_CONFIG_ERROR)` - Configuration error
/// * `Ok(EXIT_NETWORK_ERROR)` - No verdict could be produced for some file
pub async fn execute(args: FilesArgs) -> Result<i32> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;

    let project_root = match find_project_root(&current_dir) {
        Ok(root) => root,
        Err(e) => {
            display_config_error(&e.to_string());
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    let config = match Config::load(&project_root) {
        Ok(config) => config,
        Err(e) => {
            display_config_error(&e.to_string());
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    let selectors = match compile_patterns(&args.files, "**/*") {
        Ok(patterns) => patterns,
        Err(e) => {
            display_config_error(&e.to_string());
            return Ok(EXIT_CONFIG_ERROR);
        }
    };
    let ignore = match compile_patterns(&args.ignore, "") {
        Ok(patterns) => patterns,
        Err(e) => {
            display_config_error(&e.to_string());
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    let files = collect_files(&project_root, &selectors, &ignore)?;
    let match_results = match_files(files, &config.rulesets);

    if match_results.is_empty() {
        display_warning("No matching files to review.");
        return Ok(EXIT_SUCCESS);
    }

    let units = plan(&match_results);
    let unit_count = units.len();
    let file_count = match_results.len();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!(
        "Evaluating {} unit{} across {} file{}...",
        unit_count,
        if unit_count == 1 { "" } else { "s" },
        file_count,
        if file_count == 1 { "" } else { "s" },
    ));

    let client = ApiClient::new(config.base_url());
    let dispatcher = Dispatcher::new(ApiEvaluator::new(client));

    let file_results = match dispatcher.dispatch(units).await {
        Ok(results) => results,
        Err(e) => {
            pb.finish_and_clear();
            display_network_error(&e.to_string());
            return Ok(EXIT_NETWORK_ERROR);
        }
    };

    let stats = dispatcher.cache_stats();
    pb.finish_and_clear();

    if args.verbose {
        eprintln!(
            "{}",
            format!(
                "cache: {} hits, {} misses ({:.0}% hit rate)",
                stats.hits,
                stats.misses,
                stats.hit_rate()
            )
            .dimmed()
        );
    }

    let verdicts = aggregate(file_results);
    let summary = summarize(&verdicts);
    print!("{}", render(&verdicts, &summary));

    Ok(exit_status(&summary))
}

/// Compile CLI glob patterns, substituting a default when none are given.
///
/// An empty `default` means "no patterns" rather than a default selector.
fn compile_patterns(raw: &[String], default: &str) -> Result<Vec<Pattern>> {
    let effective: Vec<&str> = if raw.is_empty() {
        if default.is_empty() {
            Vec::new()
        } else {
            vec![default]
        }
    } else {
        raw.iter().map(String::as_str).collect()
    };

    effective
        .into_iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid glob pattern '{}'", p)))
        .collect()
}

/// Walk the project tree and read every selected file.
///
/// Paths are reported relative to the project root with `/` separators,
/// which is the form ruleset scopes match against. `.redline/` and
/// `.git/` are never descended into. Files that cannot be read as UTF-8
/// text are skipped with a logged warning.
fn collect_files(
    root: &Path,
    selectors: &[Pattern],
    ignore: &[Pattern],
) -> Result<Vec<FileRecord>> {
    let mut files = Vec::new();
    walk(root, "", selectors, ignore, &mut files)?;
    Ok(files)
}

fn walk(
    dir: &Path,
    rel_prefix: &str,
    selectors: &[Pattern],
    ignore: &[Pattern],
    out: &mut Vec<FileRecord>,
) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    // Deterministic traversal order regardless of filesystem order
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if rel_prefix.is_empty() {
            name.clone()
        } else {
            format!("{rel_prefix}/{name}")
        };
        let path = entry.path();

        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", path.display()))?;

        // A directory symlink can form a cycle, so it is never descended
        // into. Symlinked files are still read.
        if file_type.is_symlink() && path.is_dir() {
            continue;
        }

        if path.is_dir() {
            if name == ".redline" || name == ".git" {
                continue;
            }
            walk(&path, &rel, selectors, ignore, out)?;
            continue;
        }

        let options = match_options();
        if !selectors.iter().any(|p| p.matches_with(&rel, options)) {
            continue;
        }
        if ignore.iter().any(|p| p.matches_with(&rel, options)) {
            continue;
        }

        match fs::read_to_string(&path) {
            Ok(content) => out.push(FileRecord { path: rel, content }),
            Err(e) => log::warn!("skipping unreadable file {}: {}", rel, e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn paths(files: &[FileRecord]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_collect_walks_recursively_and_sorts() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b.md", "b");
        touch(temp.path(), "a.md", "a");
        touch(temp.path(), "docs/guide.md", "g");

        let selectors = compile_patterns(&[], "**/*").unwrap();
        let files = collect_files(temp.path(), &selectors, &[]).unwrap();
        assert_eq!(paths(&files), vec!["a.md", "b.md", "docs/guide.md"]);
        assert_eq!(files[0].content, "a");
    }

    #[test]
    fn test_collect_skips_redline_and_git_dirs() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.md", "a");
        touch(temp.path(), ".redline/config.json", "{}");
        touch(temp.path(), ".git/HEAD", "ref");

        let selectors = compile_patterns(&[], "**/*").unwrap();
        let files = collect_files(temp.path(), &selectors, &[]).unwrap();
        assert_eq!(paths(&files), vec!["a.md"]);
    }

    #[test]
    fn test_collect_applies_selectors_and_ignore() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.md", "a");
        touch(temp.path(), "b.ts", "b");
        touch(temp.path(), "CHANGELOG.md", "c");

        let selectors =
            compile_patterns(&["**/*.md".to_string()], "**/*").unwrap();
        let ignore = compile_patterns(&["CHANGELOG.md".to_string()], "").unwrap();
        let files = collect_files(temp.path(), &selectors, &ignore).unwrap();
        assert_eq!(paths(&files), vec!["a.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_does_not_descend_directory_symlink_cycles() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.md", "a");
        touch(temp.path(), "docs/guide.md", "g");
        // docs/loop points back at the root, forming a cycle
        std::os::unix::fs::symlink(temp.path(), temp.path().join("docs/loop")).unwrap();

        let selectors = compile_patterns(&[], "**/*").unwrap();
        let files = collect_files(temp.path(), &selectors, &[]).unwrap();
        assert_eq!(paths(&files), vec!["a.md", "docs/guide.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_reads_symlinked_files() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.md", "a");
        std::os::unix::fs::symlink(temp.path().join("a.md"), temp.path().join("link.md"))
            .unwrap();

        let selectors = compile_patterns(&[], "**/*").unwrap();
        let files = collect_files(temp.path(), &selectors, &[]).unwrap();
        assert_eq!(paths(&files), vec!["a.md", "link.md"]);
        assert_eq!(files[1].content, "a");
    }

    #[test]
    fn test_compile_patterns_default_applies_only_when_empty() {
        let compiled = compile_patterns(&[], "**/*").unwrap();
        assert_eq!(compiled.len(), 1);

        let compiled = compile_patterns(&["*.md".to_string()], "**/*").unwrap();
        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled[0].as_str(), "*.md");

        assert!(compile_patterns(&[], "").unwrap().is_empty());
    }

    #[test]
    fn test_compile_patterns_rejects_invalid_glob() {
        assert!(compile_patterns(&["[".to_string()], "**/*").is_err());
    }
}
