//! Login, logout and credential commands

use anyhow::Result;

use folio_core::auth::CredentialSource;
use folio_core::Portfolio;

use crate::commands::prompt;
use crate::output::Output;

/// Show the auth state
pub fn show(portfolio: &Portfolio, output: &Output) -> Result<()> {
    output.print_auth_state(&portfolio.auth().state());
    Ok(())
}

/// Log in as the admin
pub fn login(
    portfolio: &Portfolio,
    email: &str,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password")?,
    };

    portfolio.auth().login(email, &password)?;
    output.success(&format!("Logged in as {}", portfolio.auth().state().email));
    Ok(())
}

/// End the admin session
pub fn logout(portfolio: &Portfolio, output: &Output) -> Result<()> {
    portfolio.auth().logout()?;
    output.success("Logged out");
    Ok(())
}

/// Store credentials in the data directory
pub fn set_credentials(
    portfolio: &Portfolio,
    email: &str,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password")?,
    };

    portfolio.auth().set_credentials(email, &password)?;
    output.success(&format!("Stored credentials for {}", email.trim()));

    // Config-sourced credentials always win over the file
    if let Some(active) = portfolio.auth().active_credentials() {
        if active.source == CredentialSource::Config {
            output.message(
                "Note: FOLIO_ADMIN_EMAIL / FOLIO_ADMIN_PASSWORD_HASH are set and take \
                 precedence over the stored credentials.",
            );
        }
    }
    Ok(())
}
