use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{prelude::*, quantity::energy::KilowattHours};

#[derive(Copy, Clone, Serialize, Deserialize)]
struct StoredTotal {
    total_kwh: KilowattHours,
}

/// Battery energy totals preserved between the application runs, keyed by the entity unique ID.
#[must_use]
pub struct StateFile {
    path: PathBuf,
    totals: BTreeMap<String, StoredTotal>,
    is_dirty: bool,
}

impl StateFile {
    /// Read the state file, a missing file stands for an empty store.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let totals = match fs::read(path) {
            Ok(contents) => toml::from_slice(&contents)
                .with_context(|| format!("failed to parse `{}`", path.display()))?,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!("no state file yet");
                BTreeMap::new()
            }
            Err(error) => {
                return Err(error).with_context(|| format!("failed to read `{}`", path.display()));
            }
        };
        Ok(Self { path: path.to_path_buf(), totals, is_dirty: false })
    }

    pub fn get(&self, unique_id: &str) -> Option<KilowattHours> {
        self.totals.get(unique_id).map(|stored| stored.total_kwh)
    }

    pub fn set(&mut self, unique_id: &str, total: KilowattHours) {
        let previous = self.totals.insert(unique_id.to_string(), StoredTotal { total_kwh: total });
        if previous.is_none_or(|previous| previous.total_kwh != total) {
            self.is_dirty = true;
        }
    }

    /// Write the totals through a temporary file, so that a crash never leaves a truncated file.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn save(&mut self) -> Result {
        if !self.is_dirty {
            return Ok(());
        }
        let contents = toml::to_string(&self.totals)?;
        let mut temporary_path = self.path.clone().into_os_string();
        temporary_path.push(".tmp");
        fs::write(&temporary_path, contents)
            .with_context(|| format!("failed to write `{}`", self.path.display()))?;
        fs::rename(&temporary_path, &self.path)
            .with_context(|| format!("failed to replace `{}`", self.path.display()))?;
        self.is_dirty = false;
        debug!(n_totals = self.totals.len(), "saved");
        Ok(())
    }
}
