//! `-v/--verbose`, counted on the command line or named through
//! `FORMBRIDGE_LOG_LEVEL`. Both forms end up as the same verbosity count.

use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ENV_LOG_LEVEL: &str = "FORMBRIDGE_LOG_LEVEL";

/// Level names indexed by verbosity count.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn parse_verbosity(level: &str) -> Result<u8, String> {
    let level = level.trim().to_ascii_lowercase();

    let index = match level.parse::<usize>() {
        Ok(count) if count < LEVEL_NAMES.len() => Some(count),
        Ok(_) => None,
        Err(_) => LEVEL_NAMES.iter().position(|name| *name == level),
    };

    index
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| {
            format!(
                "unknown log level `{level}`, expected 0-{} or one of: {}",
                LEVEL_NAMES.len() - 1,
                LEVEL_NAMES.join(", ")
            )
        })
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_verbosity)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log more: -v warn, -vv info, -vvv debug, -vvvv trace (default: error)")
            .env(ENV_LOG_LEVEL)
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::parse_verbosity;

    #[test]
    fn names_and_counts_agree() {
        assert_eq!(parse_verbosity("error"), Ok(0));
        assert_eq!(parse_verbosity("Debug"), Ok(3));
        assert_eq!(parse_verbosity(" trace "), Ok(4));
        assert_eq!(parse_verbosity("2"), Ok(2));
    }

    #[test]
    fn out_of_range_levels_are_rejected() {
        assert!(parse_verbosity("5").is_err());
        assert!(parse_verbosity("verbose").is_err());
        let err = parse_verbosity("loud").unwrap_err();
        assert!(err.contains("error, warn, info, debug, trace"));
    }
}
