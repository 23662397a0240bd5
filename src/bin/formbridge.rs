#[cfg(not(target_arch = "wasm32"))]
use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use formbridge::cli::{actions, actions::Action, start};
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<ExitCode> {
    let action = start()?;

    let success = match action {
        Action::Submit(args) => {
            let (outcome, message) = actions::submit::execute(args).await?;
            if !message.is_empty() {
                println!("{message}");
            }
            outcome.is_success()
        }
        Action::Token(args) => match actions::token::status(&args)? {
            Some(report) => {
                println!("{report}");
                true
            }
            None => {
                println!("no token stored under `{}`", args.storage_key);
                false
            }
        },
        Action::Logout(args) => {
            if actions::token::logout(&args)? {
                println!("token removed");
            } else {
                println!("no token stored under `{}`", args.storage_key);
            }
            true
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// the browser entry point is `formbridge::browser::start`
#[cfg(target_arch = "wasm32")]
fn main() {}
