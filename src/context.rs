//! The structured result of parsing one command line.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Positional arguments and flags of a single command call.
///
/// Flag keys are always canonical flag names, never short aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Context {
    /// Real arguments, excluding flags and their values.
    ///
    /// `app command --force -s="magic" 42 fairy` yields `["42", "fairy"]`.
    pub(crate) args: Vec<String>,
    /// Flags given without a value.
    pub(crate) switches: BTreeSet<String>,
    /// Flags given with a value.
    pub(crate) values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn switches(&self) -> &BTreeSet<String> {
        &self.switches
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Whether a flag with this canonical name was given, with or without a value.
    pub fn is(&self, flag_name: &str) -> bool {
        self.switches.contains(flag_name) || self.values.contains_key(flag_name)
    }

    /// The value of a value flag, if it was given.
    pub fn get(&self, flag_name: &str) -> Option<&str> {
        self.values.get(flag_name).map(String::as_str)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Context {{")?;
        writeln!(f, "\tArgs: {:?}", self.args)?;
        writeln!(f, "\tFlags:")?;
        for name in &self.switches {
            writeln!(f, "\t\t{}", name)?;
        }
        for (name, value) in &self.values {
            writeln!(f, "\t\t{}={}", name, value)?;
        }
        write!(f, "}}")
    }
}
