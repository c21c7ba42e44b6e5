use serde::{Deserialize, Serialize};

use crate::error::TodoError;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), TodoError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(TodoError::InvalidInput(
                "username and password are required".into(),
            ));
        }
        Ok(())
    }
}

/// Sign-up form: credentials plus the repeated password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), TodoError> {
        if self.username.is_empty() || self.password.is_empty() || self.confirm_password.is_empty()
        {
            return Err(TodoError::InvalidInput("all fields are required".into()));
        }
        if self.password != self.confirm_password {
            return Err(TodoError::InvalidInput("passwords do not match".into()));
        }
        validate_password(&self.password)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

pub fn validate_password(password: &str) -> Result<(), TodoError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(TodoError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
