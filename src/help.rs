//! Help text generation for applications, commands and topics.

use crate::app::App;
use crate::config::{CommandConfig, FlagConfig};
use crate::registry::Command;

/// Width of the name column in command and topic listings.
const NAME_WIDTH: usize = 11;

/// Indent continuation lines of multi-line help so they stay in their column.
fn indent_continuation(text: &str) -> String {
    text.replace('\n', "\n\t\t")
}

fn push_listing(out: &mut String, name: &str, brief: Option<&str>) {
    let line = format!("\t{:<width$} {}", name, brief.unwrap_or(""), width = NAME_WIDTH);
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Usage line of a flag, e.g. `-s, --separator=""`.
///
/// An explicit usage hint replaces the generated `--name` part.
pub fn flag_usage(flag: &FlagConfig) -> String {
    let short = match flag.short_alias() {
        Some(short) => format!("-{}, ", short),
        None => String::new(),
    };

    if let Some(usage) = flag.usage.as_deref().filter(|u| !u.is_empty()) {
        return format!("{}{}", short, usage);
    }

    let mut usage = format!("--{}", flag.name);
    if flag.takes_value {
        usage.push_str("=\"\"");
    }
    format!("{}{}", short, usage)
}

/// Usage line of a command, without the program name.
///
/// Without a usage hint every flag is listed in brackets.
pub fn command_usage(command: &CommandConfig) -> String {
    if let Some(usage) = command.usage.as_deref().filter(|u| !u.is_empty()) {
        return format!("{} {}", command.name, usage);
    }

    let mut usage = command.name.clone();
    for flag in &command.flags {
        usage.push_str(&format!(" [{}]", flag_usage(flag)));
    }
    usage
}

/// Generate the application overview: commands by group, then topics.
pub fn global_help(app: &App) -> String {
    let registry = app.registry();
    let mut out = String::new();

    if let Some(brief) = app.brief() {
        out.push_str(brief);
        out.push_str("\n\n");
    }

    out.push_str("Usage:\n\n");
    if registry.commands().is_empty() {
        out.push_str(&format!("\t{}\n", app.name()));
    } else {
        out.push_str(&format!("\t{} command [arguments]\n", app.name()));
        out.push_str("\nThe commands are:\n\n");

        for command in registry.ungrouped_commands() {
            push_listing(&mut out, command.name(), command.config().brief.as_deref());
        }
        for group in registry.groups() {
            let mut members = registry.group_commands(group).peekable();
            if members.peek().is_none() {
                continue;
            }
            out.push_str(&format!("\n{} COMMANDS:\n\n", group.name().to_uppercase()));
            for command in members {
                push_listing(&mut out, command.name(), command.config().brief.as_deref());
            }
        }

        out.push_str(&format!(
            "\nUse \"{} help [command]\" for more information about a command.\n",
            app.name()
        ));
    }

    if !registry.topics().is_empty() {
        out.push_str("\nAdditional help topics:\n\n");
        for topic in registry.topics() {
            push_listing(&mut out, &topic.name, topic.brief.as_deref());
        }
        out.push_str(&format!(
            "\nUse \"{} help [topic]\" for more information about a topic.\n",
            app.name()
        ));
    }

    out
}

/// Generate the help entry of a single command.
pub fn command_help(app_name: &str, command: &Command) -> String {
    let config = command.config();
    let mut out = format!("Usage: {} {}\n", app_name, command_usage(config));

    if let Some(help) = config.help.as_deref().filter(|h| !h.is_empty()) {
        out.push('\n');
        out.push_str(help.trim_end());
        out.push('\n');
    }

    if !config.flags.is_empty() {
        out.push_str("\nAvailable options:\n");
        for flag in &config.flags {
            out.push_str(&format!("\n\t{}\n", flag_usage(flag)));
            if let Some(help) = flag.help.as_deref().filter(|h| !h.is_empty()) {
                out.push_str(&format!("\t\t{}\n", indent_continuation(help)));
            }
        }
    }

    if !config.examples.is_empty() {
        out.push_str("\nExamples:\n");
        for example in &config.examples {
            out.push_str(&format!(
                "\n\t$ {} {} {}\n",
                app_name, config.name, example.usecase
            ));
            if !example.description.is_empty() {
                out.push_str(&format!("\t\t{}\n", indent_continuation(&example.description)));
            }
        }
    }

    out
}

/// Generate version string.
pub fn version_line(app: &App) -> String {
    match app.version() {
        Some(version) => format!("{} {}", app.name(), version),
        None => app.name().to_string(),
    }
}
