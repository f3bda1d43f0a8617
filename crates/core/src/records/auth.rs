use serde::{Deserialize, Serialize};

use super::validation::{is_valid_email, require_non_blank};
use super::{Document, ValidationError};

/// Credentials and role assignments for a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRecord {
    pub username: String,
    pub password: String,
    pub email: String,
    /// Role names granted to this account.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AuthRecord {
    /// Creates an account without roles.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            roles: Vec::new(),
        }
    }

    /// Adds a role to this account.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}

/// Partial update for an [`AuthRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    require_non_blank("email", email)?;
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

impl Document for AuthRecord {
    type Patch = AuthRecordPatch;

    const KIND: &'static str = "auth";
    const ENTITY_TYPE: &'static str = "AuthRecord";
    const REQUIRED_FIELDS: &'static [&'static str] = &["username", "password", "email"];

    fn apply_patch(&mut self, patch: AuthRecordPatch) {
        if let Some(username) = patch.username {
            self.username = username.trim().to_string();
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string();
        }
        if let Some(roles) = patch.roles {
            self.roles = roles;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("username", &self.username)?;
        require_non_blank("password", &self.password)?;
        validate_email(&self.email)
    }

    fn validate_patch(patch: &AuthRecordPatch) -> Result<(), ValidationError> {
        if let Some(username) = &patch.username {
            require_non_blank("username", username)?;
        }
        if let Some(password) = &patch.password {
            require_non_blank("password", password)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_string();
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![
            ("username", self.username.clone()),
            ("email", self.email.clone()),
        ]
    }
}
