// mirror.rs
//! Writes a comment-free copy of a source tree next to it.
//!
//! `root/.nocomments` (by default) is rebuilt from scratch on every run with
//! the same directory layout as `root`, holding a rendered copy of every
//! `.java` file. Hidden directories are not mirrored.

use std::fs;
use std::path::{Component, Path, PathBuf};

use termcolor::WriteColor;
use walkdir::{DirEntry, WalkDir};

use crate::config::MirrorSettings;
use crate::error::AppError;
use crate::parse::parse;
use crate::render::RenderOptions;
use crate::report::Reporter;

#[derive(Debug, Clone)]
pub struct MirrorOptions {
    /// Mirror directory name, relative to the root being mirrored.
    pub destination: PathBuf,
    pub extension: String,
    pub skip_hidden: bool,
    pub follow_links: bool,
    pub continue_on_error: bool,
    pub render: RenderOptions,
}

impl MirrorOptions {
    pub fn from_settings(settings: &MirrorSettings, render: RenderOptions) -> Self {
        Self {
            destination: PathBuf::from(&settings.destination),
            extension: settings.extension.clone(),
            skip_hidden: settings.skip_hidden,
            follow_links: settings.follow_links,
            continue_on_error: settings.continue_on_error,
            render,
        }
    }
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            destination: PathBuf::from(".nocomments"),
            extension: "java".to_string(),
            skip_hidden: true,
            follow_links: true,
            continue_on_error: true,
            render: RenderOptions::stripped_tabified(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MirrorStats {
    pub directories: usize,
    pub files: usize,
    /// Files written despite a syntax error (or skipped as unreadable).
    pub failed: Vec<PathBuf>,
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Whether `destination` names a directory strictly below the mirrored root.
/// Only plain names are allowed: no root, prefix, `.` or `..` components.
pub fn is_nested_destination(destination: &Path) -> bool {
    let mut components = destination.components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

/// Mirrors `root` into `root/<destination>`, replacing any previous mirror.
pub fn mirror_tree<O: WriteColor, E: WriteColor>(
    root: &Path,
    options: &MirrorOptions,
    reporter: &mut Reporter<O, E>,
) -> Result<MirrorStats, AppError> {
    let target = root.join(&options.destination);
    // the old mirror is removed recursively, so it must never be the tree itself
    if !is_nested_destination(&options.destination)
        || target == root
        || !target.starts_with(root)
    {
        return Err(AppError::UnsafeDestination {
            destination: options.destination.clone(),
        });
    }
    if target.exists() {
        fs::remove_dir_all(&target).map_err(|e| AppError::io(&target, e))?;
    }
    reporter.mirror_started(&target);

    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        // files first, so each directory's files are reported together
        .sort_by(|a, b| {
            (a.file_type().is_dir(), a.file_name()).cmp(&(b.file_type().is_dir(), b.file_name()))
        })
        .into_iter()
        .filter_entry(|e| e.path() != target && !(options.skip_hidden && is_hidden_dir(e)));

    let mut stats = MirrorStats::default();
    let mut in_directory = false;
    for entry in walker {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let mirrored = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&mirrored).map_err(|e| AppError::io(&mirrored, e))?;
            if in_directory {
                reporter.directory_finished();
            }
            reporter.directory_started(&mirrored);
            in_directory = true;
            stats.directories += 1;
            continue;
        }

        let wanted = entry
            .path()
            .extension()
            .map(|ext| ext == options.extension.as_str())
            .unwrap_or(false);
        if !wanted {
            continue;
        }

        reporter.file_copied(&entry.file_name().to_string_lossy());
        match mirror_file(entry.path(), &mirrored, &options.render) {
            Ok(()) => stats.files += 1,
            Err(err) if options.continue_on_error => {
                reporter.warning(&err.to_string());
                stats.failed.push(entry.path().to_path_buf());
            }
            Err(err) => {
                reporter.directory_finished();
                return Err(err);
            }
        }
    }
    if in_directory {
        reporter.directory_finished();
    }
    reporter.mirror_finished();
    Ok(stats)
}

/// Renders one file into `dest`. The copy is written even when the source
/// has a syntax error; the error is returned afterwards.
fn mirror_file(source: &Path, dest: &Path, options: &RenderOptions) -> Result<(), AppError> {
    let text = fs::read_to_string(source).map_err(|e| AppError::io(source, e))?;
    let result = parse(&text);
    fs::write(dest, result.render(options)).map_err(|e| AppError::io(dest, e))?;
    match result.error() {
        None => Ok(()),
        Some(&diagnostic) => Err(AppError::Invalid {
            path: source.to_path_buf(),
            diagnostic,
        }),
    }
}
