use std::env;

use crate::backend::{
    error::{BackendError, BackendErrorKind, configuration_error},
    types::{CredentialRef, ResolvedCredential},
};

/// Resolves a configured credential reference. Secrets only ever come from
/// the environment.
pub fn resolve_credential(
    reference: &CredentialRef,
) -> Result<Option<ResolvedCredential>, BackendError> {
    match reference {
        CredentialRef::None => Ok(None),
        CredentialRef::Env {
            username,
            password_var,
        } => {
            if username.trim().is_empty() {
                return Err(configuration_error("credential username cannot be empty"));
            }
            let password = read_var(password_var)?;
            Ok(Some(ResolvedCredential {
                username: username.clone(),
                password: Some(password),
            }))
        }
        CredentialRef::BasicEnv { var } => {
            let pair = read_var(var)?;
            let (username, password) = pair.split_once(':').ok_or_else(|| {
                configuration_error(format!(
                    "credential environment variable {var} must hold user:password"
                ))
            })?;
            Ok(Some(ResolvedCredential {
                username: username.to_string(),
                password: Some(password.to_string()),
            }))
        }
    }
}

fn read_var(var: &str) -> Result<String, BackendError> {
    env::var(var).map_err(|_| {
        BackendError::new(
            BackendErrorKind::Authentication,
            format!("missing credential environment variable {var}"),
        )
    })
}
