use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::auth::password::{hash_password, PasswordParams};
use crate::domain::{optional_text, Email, Id, UserDomainService};
use crate::error::{AppError, AppResult};
use crate::users::{
    dto::{CreateUserRequest, UpdateUserRequest, UserResponse},
    model::{validate_username, User},
    repo::UserRepository,
};

const MIN_PASSWORD_LEN: usize = 8;

fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}

fn ensure_self(caller: Id, target: Id) -> AppResult<()> {
    if caller != target {
        warn!(%caller, %target, "access to another user's account");
        return Err(AppError::forbidden("cannot access another user's account"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    rules: UserDomainService,
    password: PasswordParams,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        rules: UserDomainService,
        password: PasswordParams,
    ) -> Self {
        Self {
            users,
            rules,
            password,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: CreateUserRequest) -> AppResult<UserResponse> {
        let email = Email::parse(&req.email)?;
        let username = validate_username(&req.username)?;
        check_password(&req.password)?;

        self.rules
            .validate_unique_constraints(&email, &username, None)
            .await?;

        let hash = hash_password(&req.password, &self.password)?;
        let mut user = User::new(email, &username, hash)?;
        if let Some(first) = req.first_name {
            user.update_first_name(optional_text(Some(first)));
        }
        if let Some(last) = req.last_name {
            user.update_last_name(optional_text(Some(last)));
        }
        if let Some(tz) = req.timezone {
            user.update_timezone(&tz);
        }

        self.users.save(&user).await?;
        info!(user_id = %user.id(), "user registered");
        Ok(UserResponse::from(&user))
    }

    pub async fn get_user(&self, caller: Id, id: Id) -> AppResult<UserResponse> {
        ensure_self(caller, id)?;
        let user = self.rules.validate_user_exists(id).await?;
        Ok(UserResponse::from(&user))
    }

    /// Fields are validated in request order; the first failure aborts
    /// before anything is written.
    #[instrument(skip(self, req))]
    pub async fn update_user(
        &self,
        caller: Id,
        id: Id,
        req: UpdateUserRequest,
    ) -> AppResult<UserResponse> {
        ensure_self(caller, id)?;
        let mut user = self.rules.validate_user_exists(id).await?;

        let email = match req.email.as_deref() {
            Some(raw) => Email::parse(raw)?,
            None => user.email().clone(),
        };
        let username = match req.username.as_deref() {
            Some(raw) => validate_username(raw)?,
            None => user.username().to_string(),
        };
        if let Some(password) = req.password.as_deref() {
            check_password(password)?;
        }

        if req.email.is_some() || req.username.is_some() {
            self.rules
                .validate_unique_constraints(&email, &username, Some(user.id()))
                .await?;
        }

        if req.email.is_some() {
            user.update_email(email);
        }
        if req.username.is_some() {
            user.update_username(&username)?;
        }
        if let Some(password) = req.password.as_deref() {
            user.update_password_hash(hash_password(password, &self.password)?);
        }
        if let Some(first) = req.first_name {
            user.update_first_name(optional_text(Some(first)));
        }
        if let Some(last) = req.last_name {
            user.update_last_name(optional_text(Some(last)));
        }
        if let Some(tz) = req.timezone {
            user.update_timezone(&tz);
        }

        self.users.update(&user).await?;
        info!(user_id = %user.id(), "user updated");
        Ok(UserResponse::from(&user))
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, caller: Id, id: Id) -> AppResult<()> {
        ensure_self(caller, id)?;
        let user = self.rules.validate_user_exists(id).await?;
        self.users.delete(user.id()).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
