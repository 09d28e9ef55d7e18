//! Declared build options
//!
//! Every option a build configuration understands is declared here with its
//! default, help text and category. The configure/make pipeline declares the
//! base set and the compiler-cache adapter extends it (see
//! [`crate::adapter::extra_options`]).

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Option category, used for grouping in `cachewrap options`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionCategory {
    Mandatory,
    Custom,
    Build,
    Module,
}

impl fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptionCategory::Mandatory => "mandatory",
            OptionCategory::Custom => "custom",
            OptionCategory::Build => "build",
            OptionCategory::Module => "module",
        };
        f.write_str(s)
    }
}

/// Default value of a declared option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    None,
    Str(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::None => f.write_str("None"),
            OptionValue::Str(s) => write!(f, "{:?}", s),
            OptionValue::List(items) => write!(f, "{:?}", items),
            OptionValue::Map(map) => write!(f, "{:?}", map),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub name: String,
    pub default: OptionValue,
    pub help: String,
    pub category: OptionCategory,
}

impl OptionSpec {
    pub fn new(
        name: &str,
        default: OptionValue,
        help: &str,
        category: OptionCategory,
    ) -> Self {
        Self {
            name: name.to_string(),
            default,
            help: help.to_string(),
            category,
        }
    }
}

/// Ordered collection of option declarations, unique by name
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct OptionSet {
    specs: Vec<OptionSpec>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add declarations, replacing any existing one with the same name in place
    pub fn extend(&mut self, specs: impl IntoIterator<Item = OptionSpec>) {
        for spec in specs {
            match self.specs.iter_mut().find(|s| s.name == spec.name) {
                Some(existing) => *existing = spec,
                None => self.specs.push(spec),
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Options understood by the generic configure/make/install pipeline
pub fn configure_make_options() -> OptionSet {
    use OptionCategory::{Build, Module};

    let s = |v: &str| OptionValue::Str(v.to_string());

    let mut set = OptionSet::new();
    set.extend([
        OptionSpec::new("preconfigopts", s(""), "Extra options pre-passed to configure", Build),
        OptionSpec::new("configopts", s(""), "Extra options passed to configure", Build),
        OptionSpec::new("configure_cmd", s("./configure"), "Configure command to use", Build),
        OptionSpec::new("prefix_opt", s("--prefix="), "Prefix command line option for configure script", Build),
        OptionSpec::new("prebuildopts", s(""), "Extra options pre-passed to build command", Build),
        OptionSpec::new("buildopts", s(""), "Extra options passed to make step", Build),
        OptionSpec::new("build_cmd", s("make"), "Build command to use", Build),
        OptionSpec::new("parallel", OptionValue::None, "Degree of parallelism for the build command", Build),
        OptionSpec::new("preinstallopts", s(""), "Extra prefix options for installation", Build),
        OptionSpec::new("installopts", s(""), "Extra options for installation", Build),
        OptionSpec::new("install_cmd", s("make install"), "Install command to use", Build),
        OptionSpec::new(
            "modextravars",
            OptionValue::Map(BTreeMap::new()),
            "Extra environment variables to be added to module file",
            Module,
        ),
    ]);
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_make_options_declared() {
        let set = configure_make_options();
        for name in ["configopts", "buildopts", "installopts", "modextravars"] {
            assert!(set.contains(name), "missing {}", name);
        }
        assert_eq!(
            set.get("build_cmd").unwrap().default,
            OptionValue::Str("make".to_string())
        );
    }

    #[test]
    fn test_extend_replaces_in_place() {
        let mut set = configure_make_options();
        let len = set.len();
        set.extend([OptionSpec::new(
            "configopts",
            OptionValue::Str("--disable-man".to_string()),
            "overridden",
            OptionCategory::Custom,
        )]);

        assert_eq!(set.len(), len);
        assert_eq!(set.iter().nth(1).unwrap().name, "configopts");
        assert_eq!(set.get("configopts").unwrap().help, "overridden");
    }
}
