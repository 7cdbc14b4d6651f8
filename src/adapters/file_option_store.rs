//! Directory-backed screening option store.
//!
//! Every `*.ini` file in the directory is one screening option. Files that
//! fail to parse or validate are logged and skipped.

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_option_config;
use crate::domain::error::ScreenerError;
use crate::domain::screening_option::ScreeningOption;
use crate::ports::option_port::OptionPort;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct FileOptionStore {
    dir: PathBuf,
}

impl FileOptionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Loads a single option file.
    pub fn load_file(path: &Path) -> Result<ScreeningOption, ScreenerError> {
        let adapter = FileConfigAdapter::from_file(path).map_err(|e| ScreenerError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        validate_option_config(&adapter)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        ScreeningOption::from_config(&adapter, &stem)
    }
}

impl OptionPort for FileOptionStore {
    fn list_options(&self) -> Result<Vec<ScreeningOption>, ScreenerError> {
        if !self.dir.exists() {
            warn!(dir = %self.dir.display(), "options directory does not exist");
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "ini"))
            .collect();
        paths.sort();

        let mut options: Vec<ScreeningOption> = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::load_file(&path) {
                Ok(option) => {
                    if options.iter().any(|o| o.name == option.name) {
                        warn!(file = %path.display(), option = %option.name, "duplicate option name, skipping");
                        continue;
                    }
                    options.push(option);
                }
                Err(e) => warn!(file = %path.display(), error = %e, "skipping option file"),
            }
        }

        options.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(options)
    }
}
