/// Human-readable run summaries on stderr
use std::io::IsTerminal;
use std::path::Path;

use crate::adapter::AdapterPlan;

fn prefix(color: bool) -> &'static str {
    if color {
        "\x1b[96m[cachewrap]\x1b[0m"
    } else {
        "[cachewrap]"
    }
}

/// Lines describing what an install or link run did (or would do)
pub fn run_summary(
    plan: &AdapterPlan,
    installdir: &Path,
    cache_dir_env_var: &str,
    dry_run: bool,
) -> Vec<String> {
    if dry_run {
        return vec![format!(
            "Dry run complete, {} compiler(s) would be wrapped",
            plan.symlinks.len()
        )];
    }

    vec![
        format!(
            "Wrapped {} compiler(s) in {}",
            plan.symlinks.len(),
            installdir.join("bin").display()
        ),
        format!("{}={}", cache_dir_env_var, plan.cache_dir),
    ]
}

/// Print summary lines, with a cyan prefix when stderr is a terminal
pub fn print_summary(lines: &[String]) {
    let color = std::io::stderr().is_terminal();
    for line in lines {
        eprintln!("{} {}", prefix(color), line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn plan() -> AdapterPlan {
        AdapterPlan {
            symlinks: ["cc", "gcc"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            cache_dir: "/cache/GCC-11.3".to_string(),
            modextravars: BTreeMap::new(),
            cache_binary: "ccache".to_string(),
        }
    }

    #[test]
    fn test_run_summary_after_install() {
        let lines = run_summary(&plan(), Path::new("/opt/ccache"), "CCACHE_DIR", false);
        assert_eq!(
            lines,
            vec![
                "Wrapped 2 compiler(s) in /opt/ccache/bin".to_string(),
                "CCACHE_DIR=/cache/GCC-11.3".to_string(),
            ]
        );
    }

    #[test]
    fn test_run_summary_dry_run() {
        let lines = run_summary(&plan(), Path::new("/opt/ccache"), "CCACHE_DIR", true);
        assert_eq!(lines, vec!["Dry run complete, 2 compiler(s) would be wrapped".to_string()]);
    }

    #[test]
    fn test_prefix_color() {
        assert_eq!(prefix(false), "[cachewrap]");
        assert!(prefix(true).contains("[cachewrap]"));
        assert!(prefix(true).starts_with("\x1b[96m"));
    }
}
