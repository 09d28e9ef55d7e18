//! Environment module rendering
//!
//! Turns the final `modextravars` into something a user can load: shell
//! export statements for `eval`, or an Lmod (Lua) / Environment Modules (Tcl)
//! modulefile. `{installdir}/bin` is prepended to `PATH` so the compiler
//! symlinks shadow the real compilers.

use clap::ValueEnum;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModuleFormat {
    Bash,
    Zsh,
    Fish,
    Lua,
    Tcl,
}

pub struct ModuleEnv<'a> {
    pub vars: &'a BTreeMap<String, String>,
    /// `bin` below this directory is prepended to PATH when set
    pub installdir: Option<&'a Path>,
    pub description: &'a str,
}

impl ModuleEnv<'_> {
    pub fn render(&self, format: ModuleFormat) -> String {
        let bin = self
            .installdir
            .map(|dir| dir.join("bin").display().to_string());
        let mut out = String::new();

        match format {
            ModuleFormat::Bash | ModuleFormat::Zsh => {
                for (name, value) in self.vars {
                    let _ = writeln!(out, "export {}={}", name, sh_quote(value));
                }
                if let Some(bin) = &bin {
                    let _ = writeln!(out, "export PATH={}:\"$PATH\"", sh_quote(bin));
                }
            }
            ModuleFormat::Fish => {
                for (name, value) in self.vars {
                    let _ = writeln!(out, "set -gx {} {}", name, sh_quote(value));
                }
                if let Some(bin) = &bin {
                    let _ = writeln!(out, "fish_add_path --global --prepend {}", sh_quote(bin));
                }
            }
            ModuleFormat::Lua => {
                let _ = writeln!(out, "help({})", lua_quote(self.description));
                let _ = writeln!(
                    out,
                    "whatis({})",
                    lua_quote(&format!("Description: {}", self.description))
                );
                let _ = writeln!(out);
                if let Some(bin) = &bin {
                    let _ = writeln!(out, "prepend_path(\"PATH\", {})", lua_quote(bin));
                }
                for (name, value) in self.vars {
                    let _ = writeln!(out, "setenv(\"{}\", {})", name, lua_quote(value));
                }
            }
            ModuleFormat::Tcl => {
                let _ = writeln!(out, "#%Module");
                let _ = writeln!(
                    out,
                    "module-whatis {}",
                    tcl_quote(&format!("Description: {}", self.description))
                );
                let _ = writeln!(out);
                if let Some(bin) = &bin {
                    let _ = writeln!(out, "prepend-path PATH {}", tcl_quote(bin));
                }
                for (name, value) in self.vars {
                    let _ = writeln!(out, "setenv {} {}", name, tcl_quote(value));
                }
            }
        }

        out
    }
}

/// Single-quote for POSIX shells and fish
fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn lua_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Double-quoted Tcl word with every substitution character escaped
fn tcl_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' | '[' | ']' | '{' | '}' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
