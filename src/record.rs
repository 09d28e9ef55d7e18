use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapter::AdapterPlan;
use crate::config::BuildConfig;
use crate::pipeline::BuildState;
use crate::toolchain::Toolchain;

const RECORD_DIR: &str = ".cachewrap";
const RECORD_FILE: &str = "build.json";

/// Summary of a finished build, stored next to the installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub software: String,
    pub version: String,
    pub toolchain: Toolchain,
    pub installdir: PathBuf,
    pub cache_dir: String,
    pub symlinks: BTreeSet<String>,
    pub modextravars: BTreeMap<String, String>,
    /// Hash of the config file the build was run from, if any
    pub config_hash: Option<String>,
    pub state: BuildState,
    pub finished_at: DateTime<Utc>,
}

impl BuildRecord {
    pub fn new(
        config: &BuildConfig,
        plan: &AdapterPlan,
        installdir: &Path,
        config_hash: Option<String>,
        state: BuildState,
    ) -> Self {
        Self {
            software: config.name.clone(),
            version: config.version.clone(),
            toolchain: config.toolchain.clone(),
            installdir: installdir.to_path_buf(),
            cache_dir: plan.cache_dir.clone(),
            symlinks: plan.symlinks.clone(),
            modextravars: plan.modextravars.clone(),
            config_hash,
            state,
            finished_at: Utc::now(),
        }
    }

    pub fn path(installdir: &Path) -> PathBuf {
        installdir.join(RECORD_DIR).join(RECORD_FILE)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path(&self.installdir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create record dir: {}", parent.display()))?;
        }

        fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write build record: {}", path.display()))?;

        Ok(path)
    }

    pub fn load(installdir: &Path) -> Result<Option<Self>> {
        let path = Self::path(installdir);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read build record: {}", path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse build record: {}", path.display()))?;

        Ok(Some(record))
    }
}
