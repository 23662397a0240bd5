use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";

/// Adds the two form fields. Values are taken verbatim, empty strings included.
#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long(ARG_USERNAME)
                .help("Username field")
                .env("FORMBRIDGE_USERNAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .short('p')
                .long(ARG_PASSWORD)
                .help("Password field")
                .env("FORMBRIDGE_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

/// Username and password from subcommand matches.
#[must_use]
pub fn parse(matches: &ArgMatches) -> Option<(String, SecretString)> {
    let username = matches.get_one::<String>(ARG_USERNAME)?.clone();
    let password = matches.get_one::<String>(ARG_PASSWORD)?.clone();
    Some((username, SecretString::from(password)))
}
