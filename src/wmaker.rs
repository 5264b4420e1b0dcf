//! Reading WindowMaker's own defaults.
//!
//! WindowMaker stores its preferences in a property list, usually
//! `~/GNUstep/Defaults/WindowMaker`. Two of its keys decide whether maximized
//! windows may overlap the reserved strips:
//!
//! ```text
//! NoWindowOverIcons = YES;
//! NoWindowOverDock = NO;
//! ```

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{fs, path::Path};

/// Matches a `Key = Value;` pair with an optionally quoted value
static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*"?(?P<key>\w+)"?\s*=\s*"?(?P<value>\w+)"?\s*;"#)
        .expect("invalid WindowMaker entry regex")
});

/// The reserved-strip switches found in the WindowMaker defaults
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WmakerDefaults {
    /// `NoWindowOverIcons`
    pub(crate) no_window_over_icons: Option<bool>,
    /// `NoWindowOverDock`
    pub(crate) no_window_over_dock:  Option<bool>,
}

impl WmakerDefaults {
    /// Parse the contents of a defaults file
    pub(crate) fn parse(content: &str) -> Self {
        let flag = |value: &str| match value.to_ascii_uppercase().as_str() {
            "YES" | "Y" | "TRUE" | "1" => Some(true),
            "NO" | "N" | "FALSE" | "0" => Some(false),
            _ => None,
        };

        let mut defaults = Self::default();
        for caps in ENTRY.captures_iter(content) {
            match &caps["key"] {
                "NoWindowOverIcons" => defaults.no_window_over_icons = flag(&caps["value"]),
                "NoWindowOverDock" => defaults.no_window_over_dock = flag(&caps["value"]),
                _ => {},
            }
        }

        defaults
    }

    /// Read the defaults file at `path`. A missing file yields no switches
    pub(crate) fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            log::debug!("no WindowMaker defaults at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read WindowMaker defaults: {}", path.display()))?;
        let defaults = Self::parse(&content);
        log::debug!("WindowMaker defaults: {:?}", defaults);

        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_both_switches() {
        let content = r#"{
  AutoArrangeIcons = NO;
  NoWindowOverIcons = YES;
  "NoWindowOverDock" = "NO";
  IconPosition = blh;
}"#;

        assert_eq!(WmakerDefaults::parse(content), WmakerDefaults {
            no_window_over_icons: Some(true),
            no_window_over_dock:  Some(false),
        });
    }

    #[test]
    fn absent_keys_stay_unset() {
        assert_eq!(
            WmakerDefaults::parse("{\n  IconPosition = blh;\n}"),
            WmakerDefaults::default()
        );
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let defaults = WmakerDefaults::load("/nonexistent/GNUstep/Defaults/WindowMaker").unwrap();
        assert_eq!(defaults, WmakerDefaults::default());
    }
}
