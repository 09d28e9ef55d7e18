//! Configure/make/install pipeline
//!
//! A build runs as an explicit, ordered list of [`Stage`]s. Package specific
//! behaviour is injected through the narrow [`InstallHooks`] trait instead of
//! overriding stages, so the stage order and error handling stay in one place.
//!
//! ```text
//! Configure -> Build -> Install -> PostInstall -> Finalize
//!  \_______ Installed ______/     \_ Symlinked _/
//! ```
//!
//! Any stage failure aborts the run; nothing is retried.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

use crate::config::BuildConfig;
use crate::error::AdapterError;
use crate::runner::{CommandRunner, RunOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configure,
    Build,
    Install,
    PostInstall,
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Configure => "configure",
            Stage::Build => "build",
            Stage::Install => "install",
            Stage::PostInstall => "post_install",
            Stage::Finalize => "finalize",
        };
        f.write_str(s)
    }
}

/// Lifecycle of a single build invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildState {
    Unconfigured,
    /// Adapter plan derived from the configuration
    Configured,
    Installed,
    Symlinked,
}

impl BuildState {
    /// State reached once `stage` has completed
    fn after(self, stage: Stage) -> Self {
        match stage {
            Stage::Configure | Stage::Build => self,
            Stage::Install => BuildState::Installed,
            Stage::PostInstall => BuildState::Symlinked,
            Stage::Finalize => self,
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildState::Unconfigured => "unconfigured",
            BuildState::Configured => "configured",
            BuildState::Installed => "installed",
            BuildState::Symlinked => "symlinked",
        };
        f.write_str(s)
    }
}

/// Everything a stage may look at
pub struct StageContext<'a> {
    pub config: &'a BuildConfig,
    pub installdir: &'a Path,
    pub runner: &'a dyn CommandRunner,
    /// Stages log what they would do and leave the filesystem alone
    pub dry_run: bool,
}

/// Package specific behaviour plugged into the pipeline
pub trait InstallHooks {
    /// Runs after the install stage, before finalization
    fn post_install(&self, ctx: &StageContext<'_>) -> Result<(), AdapterError>;

    /// Extra checks run during finalization
    fn sanity_check(&self, _ctx: &StageContext<'_>) -> Result<(), AdapterError> {
        Ok(())
    }
}

pub struct Pipeline {
    stages: Vec<Stage>,
    initial_state: BuildState,
}

impl Pipeline {
    /// Full build from an unpacked source tree
    pub fn configure_make() -> Self {
        Self {
            stages: vec![
                Stage::Configure,
                Stage::Build,
                Stage::Install,
                Stage::PostInstall,
                Stage::Finalize,
            ],
            initial_state: BuildState::Configured,
        }
    }

    /// Wrap an already installed prefix
    pub fn post_install_only() -> Self {
        Self {
            stages: vec![Stage::PostInstall, Stage::Finalize],
            initial_state: BuildState::Installed,
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn run(
        &self,
        ctx: &StageContext<'_>,
        hooks: &dyn InstallHooks,
    ) -> Result<BuildState, AdapterError> {
        let mut state = self.initial_state;

        for &stage in &self.stages {
            info!(stage = %stage, status = "start", "starting stage");
            run_stage(stage, ctx, hooks)?;
            state = state.after(stage);
            info!(stage = %stage, status = "success", state = %state, "stage finished");
        }

        Ok(state)
    }
}

fn run_stage(
    stage: Stage,
    ctx: &StageContext<'_>,
    hooks: &dyn InstallHooks,
) -> Result<(), AdapterError> {
    let opts = RunOptions {
        log_output: true,
        ..RunOptions::in_dir(&ctx.config.srcdir)
    };

    match stage {
        Stage::Configure => {
            ctx.runner
                .run(&configure_command(ctx.config, ctx.installdir), &opts)?;
        }
        Stage::Build => {
            ctx.runner.run(&build_command(ctx.config), &opts)?;
        }
        Stage::Install => {
            ctx.runner.run(&install_command(ctx.config), &opts)?;
        }
        Stage::PostInstall => hooks.post_install(ctx)?,
        Stage::Finalize => {
            if ctx.dry_run {
                info!(stage = %stage, status = "dry_run", "skipping permission fix-ups and sanity check");
            } else {
                fix_permissions(ctx.installdir)?;
                sanity_check(ctx)?;
                hooks.sanity_check(ctx)?;
            }
        }
    }

    Ok(())
}

/// Join non-empty command line fragments with single spaces
fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn configure_command(config: &BuildConfig, installdir: &Path) -> String {
    let prefix = format!("{}{}", config.prefix_opt, installdir.display());
    join_parts(&[
        &config.preconfigopts,
        &config.configure_cmd,
        &prefix,
        &config.configopts,
    ])
}

pub fn build_command(config: &BuildConfig) -> String {
    let jobs = config
        .parallel
        .map(|n| format!("-j {}", n))
        .unwrap_or_default();
    join_parts(&[
        &config.prebuildopts,
        &config.build_cmd,
        &jobs,
        &config.buildopts,
    ])
}

pub fn install_command(config: &BuildConfig) -> String {
    join_parts(&[
        &config.preinstallopts,
        &config.install_cmd,
        &config.installopts,
    ])
}

/// Drop group/other write permission on everything below `installdir`
///
/// Symlinks are skipped; their permissions are those of the target.
#[cfg(unix)]
fn fix_permissions(installdir: &Path) -> Result<(), AdapterError> {
    use std::os::unix::fs::PermissionsExt;
    use walkdir::WalkDir;

    let mut changed = 0usize;
    for entry in WalkDir::new(installdir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(installdir).to_path_buf();
            AdapterError::io(path, e.into())
        })?;

        if entry.path_is_symlink() {
            continue;
        }

        let metadata = entry
            .metadata()
            .map_err(|e| AdapterError::io(entry.path(), e.into()))?;
        let mut perms = metadata.permissions();
        let mode = perms.mode();
        if mode & 0o022 != 0 {
            perms.set_mode(mode & !0o022);
            std::fs::set_permissions(entry.path(), perms)
                .map_err(|e| AdapterError::io(entry.path(), e))?;
            changed += 1;
        }
    }

    info!(operation = "fix_permissions", path = %installdir.display(), changed, "removed group/other write permissions");
    Ok(())
}

#[cfg(not(unix))]
fn fix_permissions(installdir: &Path) -> Result<(), AdapterError> {
    warn!(path = %installdir.display(), "permission fix-ups are only supported on unix");
    Ok(())
}

/// The installed cache binary must exist as a regular file
fn sanity_check(ctx: &StageContext<'_>) -> Result<(), AdapterError> {
    let binary = ctx.installdir.join("bin").join(&ctx.config.cache_binary);
    match std::fs::metadata(&binary) {
        Ok(meta) if meta.is_file() => {
            info!(operation = "sanity_check", status = "success", path = %binary.display(), "cache binary present");
            Ok(())
        }
        Ok(_) => Err(AdapterError::SanityCheck(format!(
            "{} is not a regular file",
            binary.display()
        ))),
        Err(e) => {
            warn!(operation = "sanity_check", status = "error", path = %binary.display(), error = %e, "cache binary missing");
            Err(AdapterError::SanityCheck(format!(
                "cache binary not found: {}",
                binary.display()
            )))
        }
    }
}
