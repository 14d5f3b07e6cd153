use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{LoginRequest, LoginResponse},
    jwt::JwtKeys,
    password::{verify_password, PasswordParams},
};
use crate::domain::Email;
use crate::error::{AppError, AppResult};
use crate::users::{dto::UserResponse, repo::UserRepository};

const BAD_CREDENTIALS: &str = "invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: JwtKeys,
    password: PasswordParams,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: JwtKeys, password: PasswordParams) -> Self {
        Self {
            users,
            keys,
            password,
        }
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, req))]
    pub async fn login(&self, req: LoginRequest) -> AppResult<LoginResponse> {
        let email = Email::parse(&req.email)?;

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!(%email, "login unknown email");
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        };

        if !verify_password(&req.password, user.password_hash(), &self.password) {
            warn!(user_id = %user.id(), "login invalid password");
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        }

        let token = self.keys.sign(user.id())?;
        info!(user_id = %user.id(), "user logged in");
        Ok(LoginResponse {
            token,
            user: UserResponse::from(&user),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::auth::password::hash_password;
    use crate::memory::InMemoryStore;
    use crate::users::model::User;

    fn params() -> PasswordParams {
        PasswordParams {
            time_cost: 1,
            memory_kib: 1024,
            parallelism: 1,
            output_len: 32,
        }
    }

    async fn setup() -> (AuthService, JwtKeys, User) {
        let store = InMemoryStore::default();
        let hash = hash_password("password123", &params()).unwrap();
        let user = User::new(Email::parse("a@test.com").unwrap(), "alice", hash).unwrap();
        store.users().save(&user).await.unwrap();
        let keys = JwtKeys::new("test-secret", Duration::from_secs(600));
        (AuthService::new(store.users(), keys.clone(), params()), keys, user)
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn login_issues_token_for_user() {
        let (svc, keys, user) = setup().await;
        let res = svc.login(login(" A@TEST.com ", "password123")).await.unwrap();
        assert_eq!(res.user.id, user.id());
        assert_eq!(keys.verify(&res.token).unwrap(), user.id());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (svc, _, _) = setup().await;
        let wrong = svc.login(login("a@test.com", "nope-nope")).await.unwrap_err();
        let unknown = svc.login(login("b@test.com", "password123")).await.unwrap_err();
        assert!(matches!(wrong, AppError::Unauthorized(_)));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }
}
