pub mod bridge;
pub mod credentials;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const CMD_SIGNUP: &str = "signup";
pub const CMD_LOGIN: &str = "login";
pub const CMD_TOKEN: &str = "token";
pub const CMD_LOGOUT: &str = "logout";
pub const ARG_SHOW: &str = "show";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("formbridge")
        .about("Sign up and log in against a token-issuing auth backend")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(credentials::with_args(
            Command::new(CMD_SIGNUP).about("Submit the signup form"),
        ))
        .subcommand(credentials::with_args(
            Command::new(CMD_LOGIN).about("Submit the login form and store the returned token"),
        ))
        .subcommand(
            Command::new(CMD_TOKEN)
                .about("Report whether a login token is stored")
                .arg(
                    Arg::new(ARG_SHOW)
                        .long(ARG_SHOW)
                        .help("Print the stored token")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Remove the stored login token"));

    logging::with_args(bridge::with_args(command))
}
