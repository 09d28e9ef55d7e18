use serde::{Deserialize, Serialize};
use std::fmt;

/// Compiler toolchain the cache is installed for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,
}

/// Lineage of a compiler suite, independent of its version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainFamily {
    /// GCC based toolchains (GCC, GCCcore, GNU, ...)
    Gnu,
    Other,
}

impl Toolchain {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Case-sensitive: "gcc" is not recognized, "GCCcore" is.
    pub fn family(&self) -> ToolchainFamily {
        if self.name.contains("GNU") || self.name.contains("GCC") {
            ToolchainFamily::Gnu
        } else {
            ToolchainFamily::Other
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gnu_family_detection() {
        assert_eq!(Toolchain::new("GCC", "11.3").family(), ToolchainFamily::Gnu);
        assert_eq!(Toolchain::new("GCCcore", "12.2.0").family(), ToolchainFamily::Gnu);
        assert_eq!(Toolchain::new("GNU", "4.9").family(), ToolchainFamily::Gnu);
        assert_eq!(Toolchain::new("iccifort", "2019").family(), ToolchainFamily::Other);
    }

    #[test]
    fn test_family_match_is_case_sensitive() {
        assert_eq!(Toolchain::new("gcc", "11.3").family(), ToolchainFamily::Other);
        assert_eq!(Toolchain::new("gnu", "4.9").family(), ToolchainFamily::Other);
    }

    #[test]
    fn test_display() {
        assert_eq!(Toolchain::new("GCC", "11.3").to_string(), "GCC-11.3");
    }
}
