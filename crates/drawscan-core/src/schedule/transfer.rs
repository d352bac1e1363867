//! Copying and moving scheduled files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf, is_separator};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One row of a copy/move plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferItem {
    pub source: PathBuf,
    /// Target directory or file path; rows without one are skipped.
    pub destination: Option<PathBuf>,
}

/// Whether files are copied or moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    fn verb(self) -> &'static str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            TransferMode::Copy => "copied",
            TransferMode::Move => "moved",
        }
    }

    fn title(self) -> &'static str {
        match self {
            TransferMode::Copy => "Copy",
            TransferMode::Move => "Move",
        }
    }
}

/// Outcome of a copy/move run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferReport {
    pub mode: TransferMode,
    pub succeeded: usize,
    pub total: usize,
    pub messages: Vec<String>,
}

impl TransferReport {
    /// One-line summary of the run.
    pub fn summary(&self) -> String {
        format!(
            "{} operation complete with {}/{} successes.",
            self.mode.title(),
            self.succeeded,
            self.total
        )
    }
}

/// Copy or move every file in the plan.
///
/// Existing targets are never overwritten.
pub fn transfer_files(plan: &[TransferItem], mode: TransferMode) -> TransferReport {
    let mut report = TransferReport {
        mode,
        succeeded: 0,
        total: plan.len(),
        messages: Vec::new(),
    };

    for item in plan {
        if !item.source.is_file() {
            report.messages.push(format!(
                "File at: {} does not exist. Could not {}.",
                item.source.display(),
                mode.verb()
            ));
            continue;
        }

        let Some(destination) = item.destination.as_deref().filter(|d| !d.as_os_str().is_empty())
        else {
            continue;
        };

        match transfer_one(&item.source, destination, mode) {
            Ok(target) => {
                debug!("{} {} to {}", mode.title(), item.source.display(), target.display());
                report.succeeded += 1;
            }
            Err(e) => {
                warn!("Could not {} {}: {}", mode.verb(), item.source.display(), e);
                report.messages.push(format!(
                    "File at: {} could not be {} due to {}.",
                    item.source.display(),
                    mode.past_tense(),
                    e
                ));
            }
        }
    }

    report
}

fn transfer_one(source: &Path, destination: &Path, mode: TransferMode) -> io::Result<PathBuf> {
    let (directory, target) = resolve_target(source, destination);
    if let Some(directory) = directory {
        fs::create_dir_all(directory)?;
    }

    if target.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", target.display()),
        ));
    }

    match mode {
        TransferMode::Copy => {
            fs::copy(source, &target)?;
        }
        TransferMode::Move => {
            if fs::rename(source, &target).is_err() {
                // rename cannot cross file systems
                fs::copy(source, &target)?;
                fs::remove_file(source)?;
            }
        }
    }

    Ok(target)
}

/// Directory to create and the final file path.
fn resolve_target<'a>(source: &Path, destination: &'a Path) -> (Option<&'a Path>, PathBuf) {
    let names_directory = destination.is_dir()
        || destination
            .to_string_lossy()
            .chars()
            .last()
            .is_some_and(is_separator);

    if names_directory {
        let target = match source.file_name() {
            Some(name) => destination.join(name),
            None => destination.to_path_buf(),
        };
        (Some(destination), target)
    } else {
        let directory = destination.parent().filter(|p| !p.as_os_str().is_empty());
        (directory, destination.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(source: &Path, destination: Option<PathBuf>) -> TransferItem {
        TransferItem {
            source: source.to_path_buf(),
            destination,
        }
    }

    #[test]
    fn test_copy_into_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("A-101.pdf");
        fs::write(&source, b"drawing").unwrap();
        let out = dir.path().join("issued");
        fs::create_dir(&out).unwrap();

        let report = transfer_files(&[item(&source, Some(out.clone()))], TransferMode::Copy);

        assert_eq!(report.summary(), "Copy operation complete with 1/1 successes.");
        assert!(report.messages.is_empty());
        assert_eq!(fs::read(out.join("A-101.pdf")).unwrap(), b"drawing");
        assert!(source.exists());
    }

    #[test]
    fn test_move_to_new_file_path_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("A-101.pdf");
        fs::write(&source, b"drawing").unwrap();
        let target = dir.path().join("archive").join("2024").join("A-101 rev C.pdf");

        let report = transfer_files(&[item(&source, Some(target.clone()))], TransferMode::Move);

        assert_eq!(report.succeeded, 1);
        assert!(target.exists());
        assert!(!source.exists());
    }

    #[test]
    fn test_trailing_separator_names_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("A-101.pdf");
        fs::write(&source, b"drawing").unwrap();
        let out = PathBuf::from(format!("{}/", dir.path().join("new").display()));

        let report = transfer_files(&[item(&source, Some(out))], TransferMode::Copy);

        assert_eq!(report.succeeded, 1);
        assert!(dir.path().join("new").join("A-101.pdf").exists());
    }

    #[test]
    fn test_missing_source_and_blank_destination() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.pdf");
        let present = dir.path().join("here.pdf");
        fs::write(&present, b"x").unwrap();

        let report = transfer_files(
            &[item(&missing, Some(dir.path().to_path_buf())), item(&present, None)],
            TransferMode::Move,
        );

        assert_eq!(report.summary(), "Move operation complete with 0/2 successes.");
        assert_eq!(
            report.messages,
            vec![format!("File at: {} does not exist. Could not move.", missing.display())]
        );
        assert!(present.exists());
    }

    #[test]
    fn test_existing_target_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.pdf");
        let target = dir.path().join("b.pdf");
        fs::write(&source, b"new").unwrap();
        fs::write(&target, b"old").unwrap();

        let report = transfer_files(&[item(&source, Some(target.clone()))], TransferMode::Copy);

        assert_eq!(report.succeeded, 0);
        assert_eq!(report.messages.len(), 1);
        assert!(report.messages[0].starts_with(&format!(
            "File at: {} could not be copied due to",
            source.display()
        )));
        assert_eq!(fs::read(&target).unwrap(), b"old");
    }
}
