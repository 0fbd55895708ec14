//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
///
/// A default archiver has no file behind it and silently discards records,
/// which is how modules built outside of a session (tests, benches) run.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot open the archive file: {0}")]
    FileError(std::io::Error),

    #[error("Cannot write the archive record: {0}")]
    CsvError(csv::Error)
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a timestamped csv.
///
/// To implement this trait, the struct shall have an `Archiver` member which
/// shall be setup in the struct's `init` or `new` functions. Records must be
/// flat (no nested structs) and should carry their own `time_s` column.
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let session_path = session.arch_root.join(path);

        // Create any intermediate directories
        if let Some(parent) = session_path.parent() {
            std::fs::create_dir_all(parent).map_err(ArchiveError::FileError)?;
        }

        // Create the file if it does not exist, and open it in append mode
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(session_path)
            .map_err(ArchiveError::FileError)?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Whether this archiver is backed by a file.
    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), ArchiveError> {
        if let Some(ref mut w) = self.writer {
            w.serialize(record).map_err(ArchiveError::CsvError)?;
            w.flush().map_err(ArchiveError::FileError)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        time_s: f64,
        x_in: f64,
        outcome: &'static str
    }

    #[test]
    fn test_archiver() {
        // A default archiver discards records
        let mut null = Archiver::default();
        assert!(!null.is_active());
        null.serialise(Row { time_s: 0.0, x_in: 1.0, outcome: "none" }).unwrap();

        let root = std::env::temp_dir().join(format!("util_arch_test_{}", std::process::id()));
        let session = Session::new_in(&root, "test", "sessions").unwrap();

        let mut arch = Archiver::from_path(&session, "pose_corr/report.csv").unwrap();
        assert!(arch.is_active());
        arch.serialise(Row { time_s: 0.5, x_in: 12.25, outcome: "corrected" }).unwrap();
        arch.serialise(Row { time_s: 1.0, x_in: -3.0, outcome: "no_wall" }).unwrap();

        let contents = std::fs::read_to_string(
            session.arch_root.join("pose_corr/report.csv")
        ).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec![
            "time_s,x_in,outcome",
            "0.5,12.25,corrected",
            "1.0,-3.0,no_wall"
        ]);

        session.save_json("summary.json", &vec![1, 2, 3]).unwrap();
        assert!(session.session_root.join("summary.json").exists());

        std::fs::remove_dir_all(root).unwrap();
    }
}
