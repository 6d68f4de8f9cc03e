//! Database operations for users.

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::user::{Role, User};

/// Column values for a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub area_id: Option<Uuid>,
}

use super::DbPool;

impl DbPool {
    /// Find a user by email (compared lowercased).
    pub async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.connection())
            .await?;

        Ok(result.map(model_to_user))
    }

    /// Find a user by ID.
    pub async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = user::Entity::find_by_id(id).one(self.connection()).await?;

        Ok(result.map(model_to_user))
    }

    /// The signed-in user behind a session; a deleted user is `NotFound`.
    pub async fn session_user(&self, id: Uuid) -> AppResult<User> {
        self.find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// Insert a user. The email is stored lowercased.
    pub async fn insert_user(&self, new: NewUser<'_>) -> AppResult<User> {
        let now = Utc::now();

        let model = user::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(new.name.trim().to_string()),
            email: Set(new.email.trim().to_lowercase()),
            password_hash: Set(new.password_hash.to_string()),
            role: Set(new.role.as_str().to_string()),
            area_id: Set(new.area_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert user: {}", e)))?;

        Ok(model_to_user(inserted))
    }
}

fn model_to_user(m: user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        // The column only ever holds values written from `Role::as_str`.
        role: Role::parse(&m.role).unwrap_or(Role::User),
        area_id: m.area_id,
        created_at: m.created_at,
    }
}
