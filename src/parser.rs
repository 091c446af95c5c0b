//! Argument parsing for a single command's tokens.

use crate::config::{find_flag, FlagConfig};
use crate::context::Context;
use std::iter::Peekable;
use std::slice::Iter;
use thiserror::Error;
use tracing::trace;

/// Errors that can occur during argument parsing.
///
/// The payload is the flag name as it was typed, which may be a short alias.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("option -{0} does not exist")]
    UnknownOption(String),

    #[error("-{0} is not a variable option")]
    ValueOnNonVariableOption(String),

    #[error("option -{0} is missing a value or the value is invalid")]
    MissingOrInvalidValue(String),
}

/// Result of parsing arguments.
pub type ParseResult = Result<Context, ParseError>;

/// Whether a token is a flag marker: one or more leading hyphens.
pub fn looks_like_flag(arg: &str) -> bool {
    arg.starts_with('-')
}

/// Split a flag token into its name signature and inline value.
///
/// All leading hyphens are stripped, so `-name` and `--name` are the same.
/// The inline value is `None` when there is no `=` at all and `Some("")`
/// for a trailing `=`.
pub fn split_flag_signature(arg: &str) -> (&str, Option<&str>) {
    let signature = arg.trim_start_matches('-');
    match signature.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (signature, None),
    }
}

/// Parse the tokens that follow a command name against the command's flags.
///
/// Tokens that don't look like flags are kept, in order, as positional
/// arguments. A flag given twice keeps its last value.
pub fn parse_args(flags: &[FlagConfig], args: &[String]) -> ParseResult {
    Parser::new(flags).parse(args)
}

/// Internal parser state.
struct Parser<'a> {
    flags: &'a [FlagConfig],
    context: Context,
}

impl<'a> Parser<'a> {
    fn new(flags: &'a [FlagConfig]) -> Self {
        Self {
            flags,
            context: Context::new(),
        }
    }

    fn parse(mut self, args: &[String]) -> ParseResult {
        let mut args_iter = args.iter().peekable();

        while let Some(arg) = args_iter.next() {
            if looks_like_flag(arg) {
                self.parse_flag(arg, &mut args_iter)?;
            } else {
                self.context.args.push(arg.clone());
            }
        }

        Ok(self.context)
    }

    fn parse_flag(
        &mut self,
        arg: &str,
        args_iter: &mut Peekable<Iter<'_, String>>,
    ) -> Result<(), ParseError> {
        let (name, inline_value) = split_flag_signature(arg);

        let flag = find_flag(self.flags, name)
            .ok_or_else(|| ParseError::UnknownOption(name.to_string()))?;
        trace!(token = arg, flag = %flag.name, "resolved flag");

        if !flag.takes_value {
            if inline_value.is_some() {
                return Err(ParseError::ValueOnNonVariableOption(name.to_string()));
            }
            self.context.switches.insert(flag.name.clone());
            return Ok(());
        }

        let value = match inline_value {
            Some(value) => value.to_string(),
            None => args_iter
                .next_if(|next| !looks_like_flag(next))
                .ok_or_else(|| ParseError::MissingOrInvalidValue(name.to_string()))?
                .clone(),
        };
        self.context.values.insert(flag.name.clone(), value);

        Ok(())
    }
}
