//! Integration test utilities for Petrel

use anyhow::{Context, Result};
use pt_ast::Program;
use pt_driver::{DriverConfig, DriverError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::filter::LevelFilter;

/// A source program loaded from the test-programs directory
#[derive(Debug, Clone)]
pub struct TestProgram {
    /// Path relative to the directory it was loaded from
    pub name: String,
    /// Absolute path of the source file
    pub path: PathBuf,
    /// File contents
    pub source: String,
}

impl TestProgram {
    /// Lower the program through the driver
    ///
    /// # Errors
    ///
    /// Returns the driver error for programs that do not lower
    pub fn lower(&self) -> Result<Program, DriverError> {
        let config = DriverConfig::default().with_file_name(self.name.as_str());
        pt_driver::lower_source(&self.source, &config)
    }

    /// Sibling file holding the expected output, with the given extension
    #[must_use]
    pub fn expectation(&self, extension: &str) -> PathBuf {
        self.path.with_extension(extension)
    }
}

/// Directory holding the test programs
#[must_use]
pub fn test_programs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-programs")
}

/// Loads every `.py` file below `dir`, sorted by name
///
/// # Errors
///
/// Returns an error if directory traversal or file reading fails
pub fn load_programs(dir: impl AsRef<Path>) -> Result<Vec<TestProgram>> {
    let base_path = dir.as_ref();
    let mut programs = Vec::new();
    load_dir_recursive(&mut programs, base_path, base_path)?;
    programs.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(programs)
}

fn load_dir_recursive(
    programs: &mut Vec<TestProgram>,
    base_path: &Path,
    current_path: &Path,
) -> Result<()> {
    let entries = fs::read_dir(current_path)
        .with_context(|| format!("failed to read {}", current_path.display()))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_dir() {
            load_dir_recursive(programs, base_path, &path)?;
        } else if path.is_file() && path.extension().is_some_and(|ext| ext == "py") {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let name = path
                .strip_prefix(base_path)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");

            programs.push(TestProgram { name, path, source });
        }
    }

    Ok(())
}

/// Lower source text with the default configuration
///
/// # Errors
///
/// Returns the driver error when the source does not lower
pub fn lower(source: &str) -> Result<Program, DriverError> {
    pt_driver::lower_source(source, &DriverConfig::default())
}

/// Route `tracing` output to the test harness
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(LevelFilter::DEBUG)
            .init();
    });
}
