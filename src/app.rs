//! The application: command registry plus top-level dispatch.

use crate::config::{CommandConfig, ConfigError, TopicConfig};
use crate::context::Context;
use crate::help::{command_help, global_help, version_line};
use crate::output::Console;
use crate::parser::{parse_args, ParseError};
use crate::registry::{Command, Handler, Registry, RegistryError};
use std::io::{self, Write};
use thiserror::Error;
use tracing::debug;

/// Exit status for usage errors.
pub const USAGE_EXIT_CODE: i32 = 1;

/// Errors caused by the command line a user typed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("unknown subcommand \"{0}\"")]
    UnknownSubcommand(String),

    #[error("no such command or help topic: {0}")]
    UnknownHelpTarget(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A subcommand-style CLI application.
///
/// The built-in `help` pseudo-command always takes precedence over a registered
/// command of that name. `version` is built in too, unless a command named
/// `version` is registered.
pub struct App {
    name: String,
    brief: Option<String>,
    version: Option<String>,
    registry: Registry,
    default: Option<Handler>,
}

impl App {
    /// Create an application. The name is required.
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        Ok(Self {
            name: name.to_string(),
            brief: None,
            version: None,
            registry: Registry::new(),
            default: None,
        })
    }

    pub fn with_brief(mut self, brief: &str) -> Self {
        self.brief = Some(brief.to_string());
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brief(&self) -> Option<&str> {
        self.brief.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Handler run when the program is invoked without arguments.
    /// Without one, the global help is shown instead.
    pub fn set_default(&mut self, handler: Handler) {
        self.default = Some(handler);
    }

    /// Add an empty group; pass the returned name to [`CommandConfig::with_group`].
    pub fn add_group(&mut self, name: &str) -> String {
        self.registry.create_group(name)
    }

    pub fn add_command(
        &mut self,
        config: CommandConfig,
        handler: Handler,
    ) -> Result<&mut Command, RegistryError> {
        self.registry.register_command(config, handler)
    }

    pub fn add_topic(&mut self, topic: TopicConfig) {
        self.registry.register_topic(topic);
    }

    /// Parse the tokens following `command` against that command's flags.
    pub fn parse(&self, command: &str, tokens: &[String]) -> Result<Context, UsageError> {
        let command = self
            .registry
            .find_command(command)
            .ok_or_else(|| UsageError::UnknownSubcommand(command.to_string()))?;
        Ok(parse_args(command.flags(), tokens)?)
    }

    /// Run the application on `args` (without the program name).
    ///
    /// Returns the exit status: the handler's return value, 0 for help and
    /// version output, [`USAGE_EXIT_CODE`] for usage errors. Only failures
    /// of the output writers are returned as errors.
    pub fn run(&self, args: &[String], out: &mut dyn Write, err: &mut dyn Write) -> io::Result<i32> {
        let mut console = Console::new(&self.name, out, err);
        let code = self.dispatch(args, &mut console)?;
        console.flush()?;
        Ok(code)
    }

    fn dispatch(&self, args: &[String], console: &mut Console<'_>) -> io::Result<i32> {
        let Some((subcommand, rest)) = args.split_first() else {
            return match &self.default {
                Some(handler) => Ok(handler(&Context::new(), console)),
                None => {
                    console.println(global_help(self))?;
                    Ok(0)
                }
            };
        };

        match (subcommand.as_str(), self.registry.find_command(subcommand)) {
            ("help", _) => self.help(rest.first(), console),
            ("version", None) => {
                console.println(version_line(self))?;
                Ok(0)
            }
            ("version", Some(command)) => Ok(self.invoke(command, &Context::new(), console)),
            (_, None) => self.fail(UsageError::UnknownSubcommand(subcommand.clone()), console),
            (_, Some(command)) => match parse_args(command.flags(), rest) {
                Ok(context) => Ok(self.invoke(command, &context, console)),
                Err(e) => self.fail(e.into(), console),
            },
        }
    }

    fn invoke(&self, command: &Command, context: &Context, console: &mut Console<'_>) -> i32 {
        debug!(command = command.name(), args = context.args().len(), "dispatching");
        let code = command.run(context, console);
        debug!(command = command.name(), code, "handler finished");
        code
    }

    fn help(&self, target: Option<&String>, console: &mut Console<'_>) -> io::Result<i32> {
        let Some(target) = target else {
            console.println(global_help(self))?;
            return Ok(0);
        };

        if let Some(command) = self.registry.find_command(target) {
            console.println(command_help(&self.name, command))?;
            return Ok(0);
        }
        if let Some(topic) = self.registry.find_topic(target) {
            console.println(&topic.text)?;
            return Ok(0);
        }

        self.fail(UsageError::UnknownHelpTarget(target.clone()), console)
    }

    fn fail(&self, error: UsageError, console: &mut Console<'_>) -> io::Result<i32> {
        debug!(error = %error, "usage error");
        console.error(error)?;
        Ok(USAGE_EXIT_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlagConfig;

    struct Run {
        code: i32,
        out: String,
        err: String,
    }

    fn run(app: &App, args: &[&str]) -> Run {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = app.run(&args, &mut out, &mut err).unwrap();
        Run {
            code,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    fn demo() -> App {
        let mut app = App::new("demo")
            .unwrap()
            .with_brief("Demo is a funky demonstration.")
            .with_version("stable");
        app.add_command(
            CommandConfig::new("join")
                .with_brief("merges the strings given")
                .with_flag(FlagConfig::value("separator").with_short("s"))
                .with_flag(FlagConfig::switch("loud")),
            Box::new(|ctx, console| {
                let joined = ctx.args().join(ctx.get("separator").unwrap_or(""));
                let joined = if ctx.is("loud") {
                    joined.to_uppercase()
                } else {
                    joined
                };
                console.println(joined).map_or(1, |_| 0)
            }),
        )
        .unwrap();
        app.add_command(
            CommandConfig::new("fail").with_brief("exits with a custom status"),
            Box::new(|_, console| {
                console.log("something went wrong");
                7
            }),
        )
        .unwrap();
        app.add_topic(TopicConfig::new("strings", "about strings", "Strings are text."));
        app
    }

    #[test]
    fn test_new_requires_name() {
        assert!(matches!(App::new(""), Err(ConfigError::EmptyName)));
    }

    #[test]
    fn test_run_command() {
        let result = run(&demo(), &["join", "-s", ".", "google", "com"]);
        assert_eq!(result.code, 0);
        assert_eq!(result.out, "google.com\n");
        assert!(result.err.is_empty());
    }

    #[test]
    fn test_run_command_with_switch_and_joined_value() {
        let result = run(&demo(), &["join", "--loud", "--separator=-", "a", "b"]);
        assert_eq!(result.out, "A-B\n");
    }

    #[test]
    fn test_handler_exit_code_and_log() {
        let result = run(&demo(), &["fail"]);
        assert_eq!(result.code, 7);
        assert_eq!(result.err, "demo: something went wrong\n");
    }

    #[test]
    fn test_no_args_shows_global_help() {
        let app = demo();
        let result = run(&app, &[]);
        assert_eq!(result.code, 0);
        assert_eq!(result.out, format!("{}\n", global_help(&app)));
    }

    #[test]
    fn test_no_args_runs_default() {
        let mut app = demo();
        app.set_default(Box::new(|ctx, console| {
            assert_eq!(ctx, &Context::new());
            console.println("default").map_or(1, |_| 3)
        }));
        let result = run(&app, &[]);
        assert_eq!(result.code, 3);
        assert_eq!(result.out, "default\n");
    }

    #[test]
    fn test_help_alone() {
        let app = demo();
        let result = run(&app, &["help"]);
        assert_eq!(result.code, 0);
        assert_eq!(result.out, format!("{}\n", global_help(&app)));
    }

    #[test]
    fn test_help_command() {
        let app = demo();
        let result = run(&app, &["help", "join"]);
        let command = app.registry().find_command("join").unwrap();
        assert_eq!(result.code, 0);
        assert_eq!(result.out, format!("{}\n", command_help("demo", command)));
    }

    #[test]
    fn test_help_topic() {
        let result = run(&demo(), &["help", "strings"]);
        assert_eq!(result.code, 0);
        assert_eq!(result.out, "Strings are text.\n");
    }

    #[test]
    fn test_help_unknown_target() {
        let result = run(&demo(), &["help", "nothing"]);
        assert_eq!(result.code, USAGE_EXIT_CODE);
        assert!(result.out.is_empty());
        assert_eq!(result.err, "demo: no such command or help topic: nothing\n");
    }

    #[test]
    fn test_help_is_always_builtin() {
        let mut app = demo();
        app.add_command(CommandConfig::new("help"), Box::new(|_, _| 42))
            .unwrap();
        let result = run(&app, &["help"]);
        assert_eq!(result.code, 0);
    }

    #[test]
    fn test_builtin_version() {
        let result = run(&demo(), &["version"]);
        assert_eq!(result.code, 0);
        assert_eq!(result.out, "demo stable\n");
    }

    #[test]
    fn test_registered_version_overrides_builtin() {
        let mut app = demo();
        app.add_command(
            CommandConfig::new("version"),
            Box::new(|ctx, console| {
                assert!(ctx.args().is_empty());
                console.println("custom version").map_or(1, |_| 5)
            }),
        )
        .unwrap();
        let result = run(&app, &["version", "ignored"]);
        assert_eq!(result.code, 5);
        assert_eq!(result.out, "custom version\n");
    }

    #[test]
    fn test_unknown_subcommand() {
        let result = run(&demo(), &["frobnicate"]);
        assert_eq!(result.code, USAGE_EXIT_CODE);
        assert_eq!(result.err, "demo: unknown subcommand \"frobnicate\"\n");
    }

    #[test]
    fn test_parse_failure_is_usage_error() {
        let result = run(&demo(), &["join", "--separator"]);
        assert_eq!(result.code, USAGE_EXIT_CODE);
        assert!(result.out.is_empty());
        assert_eq!(
            result.err,
            "demo: option -separator is missing a value or the value is invalid\n"
        );
    }

    #[test]
    fn test_parse_unknown_flag() {
        let result = run(&demo(), &["join", "-x"]);
        assert_eq!(result.code, USAGE_EXIT_CODE);
        assert_eq!(result.err, "demo: option -x does not exist\n");
    }

    #[test]
    fn test_parse_without_running() {
        let app = demo();
        let tokens = vec!["-s".to_string(), "+".to_string(), "x".to_string()];
        let context = app.parse("join", &tokens).unwrap();
        assert_eq!(context.get("separator"), Some("+"));
        assert_eq!(context.args(), &["x".to_string()]);

        assert_eq!(
            app.parse("nope", &tokens),
            Err(UsageError::UnknownSubcommand("nope".to_string()))
        );
        assert_eq!(
            app.parse("join", &["--loud=1".to_string()]),
            Err(UsageError::Parse(ParseError::ValueOnNonVariableOption(
                "loud".to_string()
            )))
        );
    }

    #[test]
    fn test_flags_appended_after_registration() {
        let mut app = demo();
        app.registry_mut()
            .find_command_mut("fail")
            .unwrap()
            .add_flag(FlagConfig::switch("quiet").with_short("q"));

        let context = app.parse("fail", &["-q".to_string()]).unwrap();
        assert!(context.is("quiet"));
    }

    #[test]
    fn test_unknown_group_rejected_before_parsing() {
        let mut app = App::new("demo").unwrap();
        let result = app.add_command(
            CommandConfig::new("init").with_group("missing"),
            Box::new(|_, _| 0),
        );
        assert!(result.is_err());
        assert!(app.registry().find_command("init").is_none());
    }
}
