//! Shared prompt helpers for interactive CLI commands.
//!
//! Reusable utilities for TTY detection and interactive prompts using
//! dialoguer. Commands fall back to these when arguments are omitted.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input, Password};

use crate::error::{CliError, CliResult};

/// Checks if both stdin and stdout are connected to a terminal.
pub fn is_interactive_terminal() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Requires an interactive terminal, returning an error if not available.
pub fn require_interactive() -> CliResult<()> {
    if !is_interactive_terminal() {
        return Err(CliError::Validation(
            "Interactive mode requires a terminal.\n\
             Use explicit flags for scripting.\n\
             Run with --help for all options."
                .into(),
        ));
    }
    Ok(())
}

/// Prompts for text input with validation.
///
/// Loops until valid input is provided or the user cancels.
pub fn prompt_text<F>(prompt: &str, validator: F) -> CliResult<String>
where
    F: Fn(&str) -> Result<(), String>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;

        match validator(&input) {
            Ok(()) => return Ok(input),
            Err(msg) => {
                eprintln!("Error: {}", msg);
                // Loop continues for retry
            }
        }
    }
}

/// Prompts for a secret without echoing it, with confirmation.
pub fn prompt_secret(prompt: &str) -> CliResult<String> {
    let secret = Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm", "Values do not match")
        .interact()?;

    if secret.is_empty() {
        return Err(CliError::Validation("Secret must not be empty".into()));
    }
    Ok(secret)
}

/// Asks for confirmation, defaulting to no.
pub fn confirm(prompt: &str) -> CliResult<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Validator for email prompts: non-empty and carries an `@`.
pub fn email_validator(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        return Err("Email must not be empty".into());
    }
    if !input.contains('@') {
        return Err(format!("'{input}' is not a valid email address"));
    }
    Ok(())
}
