use std::str::FromStr;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use sqlearn_common::utils::non_blank;
use sqlearn_common::{ApiError, Role};

pub const MIN_PASSWORD_LEN: usize = 6;

/// bcrypt work factor; salts are generated per hash.
#[derive(Debug, Clone, Copy)]
pub struct HashingConfig {
    pub cost: u32,
}

impl HashingConfig {
    pub fn hash(&self, password: &str) -> Result<String, ApiError> {
        hash(password, self.cost).map_err(ApiError::internal)
    }

    pub fn verify(&self, password: &str, hashed: &str) -> Result<bool, ApiError> {
        verify(password, hashed).map_err(ApiError::internal)
    }

    /// Pays the same bcrypt cost as [`verify`](Self::verify) for an unknown
    /// account, then rejects.
    pub fn reject_unknown(&self, password: &str) -> Result<bool, ApiError> {
        hash(password, self.cost).map_err(ApiError::internal)?;
        Ok(false)
    }
}

#[derive(Deserialize, Debug)]
pub struct SignInInput {
    pub identifier: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct SignUpInput {
    pub name: String,
    pub identifier: String,
    pub password: String,
    pub role: String,
}

/// A sign-up request that passed validation.
#[derive(Debug)]
pub struct ValidSignUp {
    pub name: String,
    pub identifier: String,
    pub password: String,
    pub role: Role,
}

impl SignUpInput {
    pub fn validate(self) -> Result<ValidSignUp, ApiError> {
        let name = non_blank(&self.name)
            .ok_or_else(|| ApiError::validation("name is required"))?
            .to_string();
        let identifier = non_blank(&self.identifier)
            .ok_or_else(|| ApiError::validation("identifier is required"))?
            .to_string();
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let role = Role::from_str(self.role.trim())
            .map_err(|_| ApiError::validation("role must be 'instructor' or 'student'"))?;
        Ok(ValidSignUp {
            name,
            identifier,
            password: self.password,
            role,
        })
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignInOutput {
    pub success: bool,
    pub user_id: i32,
    pub role: Role,
    pub user_name: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignUpOutput {
    pub success: bool,
    pub user_id: i32,
    pub role: Role,
}
