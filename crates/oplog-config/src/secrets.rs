//! Login credential resolution.
//!
//! # Contract
//! - Config YAML stores only env var NAMES under
//!   `/connection/credentials_env/{user,password}`.
//! - Callers invoke [`resolve_credentials`] once at startup and pass the
//!   result to the connector. No other code reads these env vars.
//! - `Debug` output redacts values; error messages name the variable only.
//!
//! # Pairing rule
//! | user var set | password var set | result |
//! |---|---|---|
//! | no  | no  | `Ok(None)`: unauthenticated connection |
//! | yes | yes | `Ok(Some(..))` |
//! | one of the two | | `Err(CREDENTIALS_INCOMPLETE ..)` |

use anyhow::{bail, Result};
use serde_json::Value;

/// Default env var holding the login user.
pub const DEFAULT_USER_ENV: &str = "OPLOG_LOGIN_USER";
/// Default env var holding the login password.
pub const DEFAULT_PASSWORD_ENV: &str = "OPLOG_LOGIN_PASSWORD";

/// Prefix of every pairing-rule error; the CLI maps it to a validation failure.
pub const CREDENTIALS_INCOMPLETE: &str = "CREDENTIALS_INCOMPLETE";

/// A resolved user/password pair. **Values are redacted in `Debug` output.**
#[derive(Clone)]
pub struct LoginCredentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Names of the env vars to read. These are NAMES, not values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialEnvNames {
    pub user_var: String,
    pub password_var: String,
}

impl Default for CredentialEnvNames {
    fn default() -> Self {
        Self {
            user_var: DEFAULT_USER_ENV.to_string(),
            password_var: DEFAULT_PASSWORD_ENV.to_string(),
        }
    }
}

impl CredentialEnvNames {
    /// Read names from the config, falling back to the defaults.
    pub fn from_config_json(config_json: &Value) -> Self {
        let d = Self::default();
        Self {
            user_var: read_str_at(config_json, "/connection/credentials_env/user")
                .unwrap_or(d.user_var),
            password_var: read_str_at(config_json, "/connection/credentials_env/password")
                .unwrap_or(d.password_var),
        }
    }
}

/// Non-empty trimmed string at `pointer`, or `None`.
fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Unset and blank are the same thing here.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Apply the pairing rule to already-looked-up values.
pub fn pair_credentials(
    names: &CredentialEnvNames,
    user: Option<String>,
    password: Option<String>,
) -> Result<Option<LoginCredentials>> {
    match (user, password) {
        (None, None) => Ok(None),
        (Some(user), Some(password)) => Ok(Some(LoginCredentials { user, password })),
        (Some(_), None) => bail!(
            "{CREDENTIALS_INCOMPLETE}: When supplying login arguments, both 'login_user' and \
             'login_password' must be provided (env var '{}' is not set or empty)",
            names.password_var
        ),
        (None, Some(_)) => bail!(
            "{CREDENTIALS_INCOMPLETE}: When supplying login arguments, both 'login_user' and \
             'login_password' must be provided (env var '{}' is not set or empty)",
            names.user_var
        ),
    }
}

/// Resolve login credentials from the environment.
pub fn resolve_credentials(names: &CredentialEnvNames) -> Result<Option<LoginCredentials>> {
    pair_credentials(
        names,
        resolve_env(&names.user_var),
        resolve_env(&names.password_var),
    )
}
