//! The set of declared commands, help topics and command groups.

use crate::config::{CommandConfig, ExampleConfig, FlagConfig, TopicConfig};
use crate::context::Context;
use crate::output::Console;
use std::fmt;
use thiserror::Error;

/// A command handler. The returned integer becomes the process exit status.
pub type Handler = Box<dyn Fn(&Context, &mut Console<'_>) -> i32>;

/// Errors raised while building a registry.
///
/// These are mistakes in the embedding program rather than bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command '{command}' refers to group '{group}', which doesn't exist")]
    UnknownGroup { command: String, group: String },
}

/// A registered command: its declaration plus the handler that runs it.
pub struct Command {
    config: CommandConfig,
    handler: Handler,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CommandConfig {
        &self.config
    }

    pub fn flags(&self) -> &[FlagConfig] {
        &self.config.flags
    }

    pub fn add_flag(&mut self, flag: FlagConfig) {
        self.config.flags.push(flag);
    }

    pub fn add_example(&mut self, usecase: &str, description: &str) {
        self.config.examples.push(ExampleConfig {
            usecase: usecase.to_string(),
            description: description.to_string(),
        });
    }

    /// Run the handler and return its exit code.
    pub fn run(&self, context: &Context, console: &mut Console<'_>) -> i32 {
        (self.handler)(context, console)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A named, display-only bucket of commands.
///
/// Members are stored by command name and resolved through the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    commands: Vec<String>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

/// Commands, topics and groups of one application.
///
/// Built once at startup by sequential registration, read-only afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<Command>,
    topics: Vec<TopicConfig>,
    groups: Vec<Group>,
    ungrouped_count: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty, named group and return its name.
    ///
    /// Duplicate names are accepted; lookups resolve to the first one.
    pub fn create_group(&mut self, name: &str) -> String {
        self.groups.push(Group {
            name: name.to_string(),
            commands: Vec::new(),
        });
        name.to_string()
    }

    /// Register a command with its handler.
    ///
    /// A non-empty group must already exist. On error the registry is left unchanged.
    pub fn register_command(
        &mut self,
        config: CommandConfig,
        handler: Handler,
    ) -> Result<&mut Command, RegistryError> {
        match config.group_name() {
            Some(group_name) => {
                let group = self
                    .groups
                    .iter_mut()
                    .find(|g| g.name == group_name)
                    .ok_or_else(|| RegistryError::UnknownGroup {
                        command: config.name.clone(),
                        group: group_name.to_string(),
                    })?;
                group.commands.push(config.name.clone());
            }
            None => self.ungrouped_count += 1,
        }

        self.commands.push(Command { config, handler });
        let index = self.commands.len() - 1;
        Ok(&mut self.commands[index])
    }

    pub fn register_topic(&mut self, topic: TopicConfig) {
        self.topics.push(topic);
    }

    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn find_command_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.commands.iter_mut().find(|c| c.name() == name)
    }

    pub fn find_topic(&self, name: &str) -> Option<&TopicConfig> {
        self.topics.iter().find(|t| t.name == name)
    }

    pub fn find_group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Whether no command and no topic already use `name`.
    ///
    /// Registration doesn't call this; callers wanting unique names must.
    pub fn is_name_free(&self, name: &str) -> bool {
        self.find_command(name).is_none() && self.find_topic(name).is_none()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn topics(&self) -> &[TopicConfig] {
        &self.topics
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group members in registration order, resolved to their commands.
    pub fn group_commands<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Command> {
        group
            .commands
            .iter()
            .filter_map(move |name| self.find_command(name))
    }

    /// Commands registered without a group, in registration order.
    pub fn ungrouped_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands
            .iter()
            .filter(|c| c.config.group_name().is_none())
    }

    pub fn ungrouped_count(&self) -> usize {
        self.ungrouped_count
    }
}
