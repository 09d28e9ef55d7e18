use clap::{Parser, Subcommand};

use crate::module_env::ModuleFormat;

/// cachewrap - install a compiler cache and wrap compilers with it
///
/// Builds the cache through configure/make/install, derives a per-toolchain
/// cache directory and symlinks compiler names to the cache binary.
#[derive(Parser, Debug)]
#[command(name = "cachewrap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiler cache install adapter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Common configuration arguments shared across commands
///
/// Precedence: CLI > env > config file > defaults.
#[derive(Parser, Debug, Clone, Default)]
pub struct CommonConfigArgs {
    /// Config file path (default: discover cachewrap.toml)
    #[arg(short = 'c', long, env = "CACHEWRAP_CONFIG")]
    pub config: Option<String>,

    /// Installation prefix
    #[arg(long, env = "CACHEWRAP_CONFIG_INSTALLDIR")]
    pub installdir: Option<String>,

    /// Source tree to run configure/make in
    #[arg(long, env = "CACHEWRAP_CONFIG_SRCDIR")]
    pub srcdir: Option<String>,

    /// Absolute base path for toolchain specific caches
    #[arg(long, env = "CACHEWRAP_CONFIG_CCACHE_DIR_BASE")]
    pub ccache_dir_base: Option<String>,

    /// Additional compiler names to wrap, comma-separated
    #[arg(long, env = "CACHEWRAP_CONFIG_EXTRA_COMPILER_SYMLINKS", value_delimiter = ',')]
    pub extra_compiler_symlinks: Option<Vec<String>>,

    /// Toolchain name (e.g., GCC, GCCcore)
    #[arg(long, env = "CACHEWRAP_CONFIG_TOOLCHAIN_NAME")]
    pub toolchain_name: Option<String>,

    /// Toolchain version
    #[arg(long, env = "CACHEWRAP_CONFIG_TOOLCHAIN_VERSION")]
    pub toolchain_version: Option<String>,

    /// Extra module environment variable (NAME=VALUE), repeatable
    #[arg(long = "modextravar", value_name = "NAME=VALUE")]
    pub modextravars: Vec<String>,

    /// Parallel build jobs
    #[arg(long, env = "CACHEWRAP_CONFIG_PARALLEL")]
    pub parallel: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the build options a configuration may set
    Options(OptionsArgs),

    /// Show the symlinks, cache directory and module environment for a config
    Plan(PlanArgs),

    /// Configure, build and install the cache, then wrap compilers
    Install(InstallArgs),

    /// Wrap compilers in an already installed prefix
    Link(LinkArgs),

    /// Print the module environment (shell exports or modulefile)
    Env(EnvArgs),

    /// Show the build record of an installation
    Status(StatusArgs),

    /// Configuration management utilities
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct OptionsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub common: CommonConfigArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct InstallArgs {
    #[command(flatten)]
    pub common: CommonConfigArgs,

    /// Log commands and symlinks without touching anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct LinkArgs {
    #[command(flatten)]
    pub common: CommonConfigArgs,

    /// Log symlinks without creating them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct EnvArgs {
    #[command(flatten)]
    pub common: CommonConfigArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "bash")]
    pub format: ModuleFormat,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub common: CommonConfigArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Config file path
        path: String,
    },

    /// Print an example configuration
    Generate,

    /// Show effective configuration (file plus overrides)
    Show {
        #[command(flatten)]
        common: CommonConfigArgs,
    },
}
