//! Declarative command catalogs and JSON application configuration.

use crate::app::App;
use crate::registry::{Handler, RegistryError};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or applying an application config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse JSON config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("can't construct an app without a name")]
    EmptyName,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A single command-line option accepted by a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FlagConfig {
    /// Flag label without the leading hyphens (e.g., "filter" for --filter)
    pub name: String,
    /// Short alias, usually the first letter of the name
    #[serde(default)]
    pub short: Option<String>,
    /// Suggested use case shown in help (e.g., `--filter="token"`)
    #[serde(default)]
    pub usage: Option<String>,
    /// Help text shown under the flag's usage
    #[serde(default)]
    pub help: Option<String>,
    /// Value flags carry a string value, the others are switches
    #[serde(default, alias = "variable")]
    pub takes_value: bool,
}

impl FlagConfig {
    /// A switch: present or absent, never carries a value.
    pub fn switch(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// A flag that carries a string value.
    pub fn value(name: &str) -> Self {
        Self {
            name: name.to_string(),
            takes_value: true,
            ..Self::default()
        }
    }

    pub fn with_short(mut self, short: &str) -> Self {
        self.short = Some(short.to_string());
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// The short alias; an empty one means the flag has none.
    pub fn short_alias(&self) -> Option<&str> {
        self.short.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether `signature` names this flag, either canonically or by alias.
    pub fn matches(&self, signature: &str) -> bool {
        self.name == signature || self.short_alias() == Some(signature)
    }
}

/// Find a flag in a command's catalog by canonical name or short alias.
///
/// Catalogs are small, so this is a linear scan. `None` is an ordinary
/// outcome and left for the caller to interpret.
pub fn find_flag<'a>(flags: &'a [FlagConfig], signature: &str) -> Option<&'a FlagConfig> {
    flags.iter().find(|flag| flag.matches(signature))
}

/// An annotated use case of a command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExampleConfig {
    /// Typical invocation, without the program and command names
    pub usecase: String,
    /// What the invocation does
    #[serde(default)]
    pub description: String,
}

/// Everything about a command except its handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandConfig {
    pub name: String,
    /// Short lowercase phrase shown in the command list
    #[serde(default)]
    pub brief: Option<String>,
    /// Usage hint shown after the command name (e.g., `[-o output] [packages]`)
    #[serde(default)]
    pub usage: Option<String>,
    /// Detailed reference shown in the command's help entry
    #[serde(default)]
    pub help: Option<String>,
    /// Name of the group the command is listed under
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub flags: Vec<FlagConfig>,
    #[serde(default)]
    pub examples: Vec<ExampleConfig>,
}

impl CommandConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_brief(mut self, brief: &str) -> Self {
        self.brief = Some(brief.to_string());
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn with_flag(mut self, flag: FlagConfig) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_example(mut self, usecase: &str, description: &str) -> Self {
        self.examples.push(ExampleConfig {
            usecase: usecase.to_string(),
            description: description.to_string(),
        });
        self
    }

    /// The group name, with an empty string treated as no group.
    pub fn group_name(&self) -> Option<&str> {
        self.group.as_deref().filter(|g| !g.is_empty())
    }
}

/// A free-text help entry not tied to any command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TopicConfig {
    pub name: String,
    #[serde(default)]
    pub brief: Option<String>,
    /// The actual topic content
    #[serde(default)]
    pub text: String,
}

impl TopicConfig {
    pub fn new(name: &str, brief: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            brief: Some(brief.to_string()),
            text: text.to_string(),
        }
    }
}

/// A complete application described as data.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    #[serde(default)]
    pub brief: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Group names, created before any command is registered
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
    #[serde(default)]
    pub topics: Vec<TopicConfig>,
}

impl AppConfig {
    /// Parse a JSON string into an AppConfig.
    pub fn from_json(json: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: &Path) -> Result<AppConfig, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build an [`App`], binding each command to the handler `bind` returns.
    pub fn into_app<F>(self, mut bind: F) -> Result<App, ConfigError>
    where
        F: FnMut(&CommandConfig) -> Handler,
    {
        let mut app = App::new(&self.name)?;
        if let Some(brief) = self.brief {
            app = app.with_brief(&brief);
        }
        if let Some(version) = self.version {
            app = app.with_version(&version);
        }

        for group in &self.groups {
            app.add_group(group);
        }
        for command in self.commands {
            let handler = bind(&command);
            app.add_command(command, handler)?;
        }
        for topic in self.topics {
            app.add_topic(topic);
        }

        Ok(app)
    }
}
