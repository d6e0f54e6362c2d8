use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::user::User;

pub const MAX_NAME_LEN: usize = 100;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

// Fields are optional so a missing name is reported as a 400 with our own
// message instead of a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Trimmed, length-checked names ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, AppError> {
        let (Some(first_name), Some(last_name)) = (self.first_name, self.last_name) else {
            return Err(AppError::validation("first_name and last_name are required"));
        };

        let first_name = first_name.trim();
        let last_name = last_name.trim();

        if first_name.is_empty() || last_name.is_empty() {
            return Err(AppError::validation("first_name and last_name cannot be empty"));
        }
        if first_name.chars().count() > MAX_NAME_LEN || last_name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::validation(format!(
                "first_name and last_name must be at most {MAX_NAME_LEN} characters"
            )));
        }

        Ok(NewUser {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Effective pagination window after defaults and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl ListUsersQuery {
    pub fn page(&self) -> Result<Page, AppError> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = self.offset.unwrap_or(0);

        if limit < 0 {
            return Err(AppError::validation("limit must be a non-negative integer"));
        }
        if offset < 0 {
            return Err(AppError::validation("offset must be a non-negative integer"));
        }

        Ok(Page {
            limit: limit.min(MAX_LIMIT),
            offset,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub limit: i64,
    pub offset: i64,
}
