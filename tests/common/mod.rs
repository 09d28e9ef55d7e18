// Shared helpers for the cachewrap acceptance tests
//
// Every test gets its own temporary workspace holding the config file, a
// source tree and the install prefix. HOME points into the workspace so a
// global ~/.config/cachewrap/config.toml on the machine is never picked up.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestWorkspace {
    temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("home")).unwrap();
        fs::create_dir_all(temp_dir.path().join("src")).unwrap();
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn installdir(&self) -> PathBuf {
        self.path().join("install")
    }

    pub fn srcdir(&self) -> PathBuf {
        self.path().join("src")
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("cachewrap.toml")
    }

    /// Write cachewrap.toml; `extra` is appended verbatim before any table
    pub fn write_config(&self, toolchain_name: &str, extra: &str) {
        let content = format!(
            r#"installdir = "{installdir}"
srcdir = "{srcdir}"
ccache_dir_base = "/opt/cache"
{extra}

[toolchain]
name = "{toolchain_name}"
version = "11.3"

[modextravars]
FOO = "bar"
"#,
            installdir = self.installdir().display(),
            srcdir = self.srcdir().display(),
        );
        fs::write(self.config_path(), content).unwrap();
    }

    /// Simulate an installed prefix containing only the cache binary
    pub fn fake_install(&self) {
        let bin = self.installdir().join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("ccache"), "#!/bin/sh\nexec \"$@\"\n").unwrap();
    }

    /// Source tree whose configure/build/install scripts produce bin/ccache
    pub fn write_fake_sources(&self) {
        let src = self.srcdir();
        fs::write(
            src.join("configure"),
            "#!/bin/sh\necho \"${1#--prefix=}\" > .prefix\n",
        )
        .unwrap();
        make_executable(&src.join("configure"));

        fs::write(src.join("build.sh"), "touch built\n").unwrap();
        fs::write(
            src.join("install.sh"),
            r#"prefix=$(cat .prefix)
mkdir -p "$prefix/bin"
printf '#!/bin/sh\nexec "$@"\n' > "$prefix/bin/ccache"
chmod 775 "$prefix/bin/ccache"
"#,
        )
        .unwrap();
    }

    pub fn cachewrap(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cachewrap"));
        cmd.current_dir(self.path())
            .env("HOME", self.path().join("home"))
            .env("CACHEWRAP_LOG_FORMAT", "compact")
            .env_remove("CACHEWRAP_CONFIG")
            .env_remove("CACHEWRAP_CONFIG_INSTALLDIR")
            .env_remove("CACHEWRAP_CONFIG_SRCDIR")
            .env_remove("CACHEWRAP_CONFIG_CCACHE_DIR_BASE")
            .env_remove("CACHEWRAP_CONFIG_EXTRA_COMPILER_SYMLINKS")
            .env_remove("CACHEWRAP_CONFIG_TOOLCHAIN_NAME")
            .env_remove("CACHEWRAP_CONFIG_TOOLCHAIN_VERSION")
            .env_remove("CACHEWRAP_CONFIG_PARALLEL");
        cmd
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
