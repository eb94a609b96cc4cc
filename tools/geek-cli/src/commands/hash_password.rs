//! Hash-password command.

use anyhow::{bail, Result};
use dialoguer::Password;
use geek_auth::PasswordHasher;

use super::HashPasswordArgs;
use crate::output::Output;

pub fn run(args: HashPasswordArgs, output: &Output) -> Result<()> {
    let password = match args.password {
        Some(password) => {
            output.warn("Passwords given as arguments end up in shell history");
            password
        }
        None => {
            if !output.is_interactive() {
                bail!("No terminal to prompt on; pass --password");
            }
            Password::new()
                .with_prompt("Admin password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?
        }
    };

    PasswordHasher::validate_password(&password)?;
    let hash = PasswordHasher::new().hash(&password)?;

    if output.is_json() {
        output.json(&serde_json::json!({ "hash": hash }));
    } else {
        output.data(&hash);
        output.info("Set it as the `admin_password_hash` variable");
    }
    Ok(())
}
