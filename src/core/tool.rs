//! External tools a target can be handed to.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::options::OptionKind;

/// The closed set of external tools Wharf drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// webpack module bundler
    Webpack,

    /// CoffeeScript compiler
    #[serde(alias = "coffeescript")]
    Coffee,
}

const WEBPACK_MODES: &[&str] = &["development", "production", "none"];

const WEBPACK_OPTIONS: &[(&str, OptionKind)] = &[
    ("mode", OptionKind::OneOf(WEBPACK_MODES)),
    ("devtool", OptionKind::String),
    ("target", OptionKind::String),
    ("bail", OptionKind::Bool),
    ("parallelism", OptionKind::Integer),
];

const COFFEE_OPTIONS: &[(&str, OptionKind)] = &[
    ("bare", OptionKind::Bool),
    ("sourceMap", OptionKind::Bool),
    ("header", OptionKind::Bool),
    ("join", OptionKind::Bool),
    ("expand", OptionKind::Bool),
    ("flatten", OptionKind::Bool),
];

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Webpack => "webpack",
            ToolKind::Coffee => "coffee",
        }
    }

    /// Executable name looked up on `PATH` when no path is configured.
    pub fn default_program(&self) -> &'static str {
        self.as_str()
    }

    /// Options this tool understands, with their expected value kinds.
    pub fn option_schema(&self) -> &'static [(&'static str, OptionKind)] {
        match self {
            ToolKind::Webpack => WEBPACK_OPTIONS,
            ToolKind::Coffee => COFFEE_OPTIONS,
        }
    }

    /// Guess the tool from a source pattern's extension.
    ///
    /// `.coffee` and `.litcoffee` sources go to the compiler, everything else
    /// to the bundler.
    pub fn for_source(pattern: &str) -> ToolKind {
        match Path::new(pattern).extension().and_then(|e| e.to_str()) {
            Some("coffee") | Some("litcoffee") => ToolKind::Coffee,
            _ => ToolKind::Webpack,
        }
    }

    pub fn option_kind(&self, name: &str) -> Option<OptionKind> {
        self.option_schema()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webpack" => Ok(ToolKind::Webpack),
            "coffee" | "coffeescript" => Ok(ToolKind::Coffee),
            _ => Err(format!(
                "unknown tool '{}'; expected 'webpack' or 'coffee'",
                s
            )),
        }
    }
}
