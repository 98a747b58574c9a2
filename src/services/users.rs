use crate::{
    db::DbPool,
    entities::user::{self, Entity as UserEntity, Model as UserModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 2, message = "Role is required"))]
    pub role: String,
    #[validate(length(min = 7, message = "Password must be at least 7 characters"))]
    pub password: String,
    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    pub first_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub first_name: String,
}

impl From<UserModel> for UserResponse {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            first_name: model.first_name,
        }
    }
}

/// Account registration and lookup. Password hashing is delegated to argon2;
/// no session state lives here.
#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register_user(
        &self,
        request: RegisterUserRequest,
    ) -> Result<UserResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let existing = UserEntity::find()
            .filter(user::Column::Email.eq(request.email.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A user with email {:?} already exists",
                request.email
            )));
        }

        let password_hash = hash_password(&request.password)?;

        let created = user::ActiveModel {
            email: Set(request.email),
            role: Set(request.role),
            password_hash: Set(password_hash),
            first_name: Set(request.first_name),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(user_id = created.id, "User registered");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::UserRegistered(created.id)).await {
                warn!(error = %e, user_id = created.id, "Failed to send user registered event");
            }
        }

        Ok(created.into())
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<UserResponse>, ServiceError> {
        Ok(UserEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .map(UserResponse::from))
    }
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::HashError(e.to_string()))?;
    Ok(hash.to_string())
}
