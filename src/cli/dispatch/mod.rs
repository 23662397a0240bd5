//! Maps validated CLI matches to an `Action`.

use crate::bridge::{Credentials, FormKind};
use crate::cli::actions::{submit, token, Action};
use crate::cli::commands::{self, bridge, credentials};
use anyhow::{anyhow, Context, Result};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let (name, sub) = matches
        .subcommand()
        .context("missing subcommand")?;

    match name {
        commands::CMD_SIGNUP | commands::CMD_LOGIN => {
            let form = if name == commands::CMD_SIGNUP {
                FormKind::Signup
            } else {
                FormKind::Login
            };
            let (username, password) = credentials::parse(sub)
                .context("missing required arguments: --username and --password")?;
            let options = bridge::Options::parse(matches)?;

            Ok(Action::Submit(submit::Args {
                form,
                credentials: Credentials { username, password },
                config: options.config,
                storage_path: options.storage_path,
            }))
        }
        commands::CMD_TOKEN | commands::CMD_LOGOUT => {
            let storage = bridge::StorageOptions::parse(matches)?;
            let args = token::Args {
                show: name == commands::CMD_TOKEN && sub.get_flag(commands::ARG_SHOW),
                storage_key: storage.storage_key,
                storage_path: storage.storage_path,
            };

            if name == commands::CMD_TOKEN {
                Ok(Action::Token(args))
            } else {
                Ok(Action::Logout(args))
            }
        }
        other => Err(anyhow!("unknown subcommand: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::path::PathBuf;

    fn clean_env() -> [(&'static str, Option<&'static str>); 6] {
        [
            ("FORMBRIDGE_BASE_URL", None),
            ("FORMBRIDGE_ENDPOINT_SIGNUP", None),
            ("FORMBRIDGE_ENDPOINT_LOGIN", None),
            ("FORMBRIDGE_STORAGE_KEY", None),
            ("FORMBRIDGE_STORAGE", None),
            ("FORMBRIDGE_TIMEOUT", None),
        ]
    }

    #[test]
    fn login_maps_to_submit_action() {
        temp_env::with_vars(clean_env(), || {
            let matches = commands::new().get_matches_from(vec![
                "formbridge",
                "--base-url",
                "https://auth.example.com/",
                "--storage",
                "/tmp/formbridge-test.json",
                "--timeout",
                "3",
                "login",
                "-u",
                "alice",
                "-p",
                "secret",
            ]);

            let Action::Submit(args) = handler(&matches).unwrap() else {
                panic!("expected submit action");
            };
            assert_eq!(args.form, FormKind::Login);
            assert_eq!(args.credentials.username, "alice");
            assert_eq!(args.credentials.password.expose_secret(), "secret");
            assert_eq!(args.config.endpoint_login, "https://auth.example.com/login");
            assert_eq!(args.config.endpoint_signup, "https://auth.example.com/signup");
            assert_eq!(args.config.storage_key, "jwt");
            assert_eq!(args.config.timeout, std::time::Duration::from_secs(3));
            assert_eq!(args.storage_path, PathBuf::from("/tmp/formbridge-test.json"));
        });
    }

    #[test]
    fn explicit_endpoint_overrides_base_url() {
        temp_env::with_vars(clean_env(), || {
            let matches = commands::new().get_matches_from(vec![
                "formbridge",
                "--storage",
                "/tmp/formbridge-test.json",
                "--endpoint-signup",
                "https://auth.example.com/v1/register",
                "signup",
                "-u",
                "alice",
                "-p",
                "secret",
            ]);

            let Action::Submit(args) = handler(&matches).unwrap() else {
                panic!("expected submit action");
            };
            assert_eq!(args.form, FormKind::Signup);
            assert_eq!(
                args.config.endpoint_signup,
                "https://auth.example.com/v1/register"
            );
            assert_eq!(args.config.endpoint_login, "http://localhost:8080/login");
        });
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        temp_env::with_vars(clean_env(), || {
            let matches = commands::new().get_matches_from(vec![
                "formbridge",
                "--base-url",
                "localhost:8080",
                "--storage",
                "/tmp/formbridge-test.json",
                "login",
                "-u",
                "alice",
                "-p",
                "secret",
            ]);

            let err = handler(&matches).unwrap_err();
            assert!(err.to_string().contains("invalid --base-url"));
        });
    }

    #[test]
    fn token_and_logout_ignore_backend_settings() {
        let mut env = clean_env();
        env[0] = ("FORMBRIDGE_BASE_URL", Some("localhost:8080"));
        temp_env::with_vars(env, || {
            for subcommand in ["token", "logout"] {
                let matches = commands::new().get_matches_from(vec![
                    "formbridge",
                    "--storage",
                    "/tmp/formbridge-test.json",
                    subcommand,
                ]);

                let action = handler(&matches).unwrap();
                assert!(
                    matches!(action, Action::Token(_) | Action::Logout(_)),
                    "{subcommand} should not need a valid base URL"
                );
            }
        });
    }

    #[test]
    fn token_and_logout_carry_storage_settings() {
        temp_env::with_vars(clean_env(), || {
            let matches = commands::new().get_matches_from(vec![
                "formbridge",
                "--storage",
                "/tmp/formbridge-test.json",
                "--storage-key",
                "auth_token",
                "token",
                "--show",
            ]);
            let Action::Token(args) = handler(&matches).unwrap() else {
                panic!("expected token action");
            };
            assert!(args.show);
            assert_eq!(args.storage_key, "auth_token");

            let matches = commands::new().get_matches_from(vec![
                "formbridge",
                "--storage",
                "/tmp/formbridge-test.json",
                "logout",
            ]);
            let Action::Logout(args) = handler(&matches).unwrap() else {
                panic!("expected logout action");
            };
            assert_eq!(args.storage_key, "jwt");
            assert_eq!(args.storage_path, PathBuf::from("/tmp/formbridge-test.json"));
        });
    }
}
