//! Account operations: registration, login, self-service and user administration.

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, TokenService};
use crate::domain::{NewUser, Role, User, UserPatch};
use crate::error::AppError;
use crate::ports::{RepositoryError, UserRepository};
use crate::validation::{clean_text, validate_email, validate_password, NAME_MAX_LEN};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// A freshly issued token together with the account it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct SelfUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AdminUserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    /// Self-registration. New accounts are always subscribers.
    pub async fn register(&self, input: Registration) -> Result<AuthSession, AppError> {
        let user = self.create_user(input, Role::Subscriber).await?;
        let token = self.issue(&user)?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(AuthSession { token, user })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let email = validate_email(email)
            .map_err(|_| AppError::BadRequest(INVALID_CREDENTIALS.to_string()))?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::BadRequest(INVALID_CREDENTIALS.to_string()))?;

        if !self.check_password(password, &user.password_hash).await? {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
        }

        if !user.active {
            tracing::warn!(user_id = %user.id, "Login rejected: account deactivated");
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        let token = self.issue(&user)?;
        Ok(AuthSession { token, user })
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<User, AppError> {
        self.find(user_id).await
    }

    /// Name and email change freely; the password only with the current one.
    pub async fn update_self(&self, user_id: Uuid, input: SelfUpdate) -> Result<User, AppError> {
        let mut user = self.find(user_id).await?;
        let mut patch = UserPatch {
            name: non_blank(input.name)
                .map(|name| clean_text("name", &name, NAME_MAX_LEN))
                .transpose()?,
            email: non_blank(input.email)
                .map(|email| validate_email(&email))
                .transpose()?,
            ..Default::default()
        };

        if let Some(new_password) = non_blank(input.new_password) {
            let current = non_blank(input.current_password).ok_or_else(|| {
                AppError::BadRequest("Current password is required to set a new one".to_string())
            })?;
            if !self.check_password(&current, &user.password_hash).await? {
                return Err(AppError::BadRequest("Current password is incorrect".to_string()));
            }
            validate_password("newPassword", &new_password)?;
            patch.password_hash = Some(self.hash(&new_password).await?);
        }

        user.apply(patch);
        let user = self.save(&user).await?;
        tracing::info!(user_id = %user.id, "User updated own profile");
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.list().await?)
    }

    /// Admin-side account creation. Defaults to the editor role.
    pub async fn create_by_admin(
        &self,
        input: Registration,
        role: Option<Role>,
    ) -> Result<User, AppError> {
        let user = self.create_user(input, role.unwrap_or(Role::Editor)).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User created by admin");
        Ok(user)
    }

    pub async fn update_by_admin(
        &self,
        target_id: Uuid,
        input: AdminUserUpdate,
    ) -> Result<User, AppError> {
        let mut user = self.find(target_id).await?;
        let mut patch = UserPatch {
            name: non_blank(input.name)
                .map(|name| clean_text("name", &name, NAME_MAX_LEN))
                .transpose()?,
            email: non_blank(input.email)
                .map(|email| validate_email(&email))
                .transpose()?,
            role: input.role,
            ..Default::default()
        };
        if let Some(password) = non_blank(input.password) {
            validate_password("password", &password)?;
            patch.password_hash = Some(self.hash(&password).await?);
        }

        user.apply(patch);
        let user = self.save(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User updated by admin");
        Ok(user)
    }

    /// Sets `active` when given, flips it otherwise. Admins cannot target themselves.
    pub async fn toggle_active(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        active: Option<bool>,
    ) -> Result<User, AppError> {
        if actor_id == target_id {
            return Err(AppError::BadRequest(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let mut user = self.find(target_id).await?;
        let next = active.unwrap_or(!user.active);
        user.apply(UserPatch {
            active: Some(next),
            ..Default::default()
        });

        let user = self.save(&user).await?;
        tracing::info!(user_id = %user.id, active = user.active, "User activation changed");
        Ok(user)
    }

    pub async fn delete_user(&self, actor_id: Uuid, target_id: Uuid) -> Result<(), AppError> {
        if actor_id == target_id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }

        self.users.delete(target_id).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            other => other.into(),
        })?;
        tracing::info!(user_id = %target_id, "User deleted");
        Ok(())
    }

    /// Creates an administrator, or promotes and reactivates the account if the email exists.
    /// Returns the account and whether it was newly created.
    pub async fn bootstrap_admin(&self, input: Registration) -> Result<(User, bool), AppError> {
        let email = validate_email(&input.email)?;
        match self.users.find_by_email(&email).await? {
            Some(mut user) => {
                user.apply(UserPatch {
                    role: Some(Role::Admin),
                    active: Some(true),
                    ..Default::default()
                });
                Ok((self.save(&user).await?, false))
            }
            None => Ok((self.create_user(input, Role::Admin).await?, true)),
        }
    }

    async fn create_user(&self, input: Registration, role: Role) -> Result<User, AppError> {
        let name = clean_text("name", &input.name, NAME_MAX_LEN)?;
        let email = validate_email(&input.email)?;
        validate_password("password", &input.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.hash(&input.password).await?;
        let user = User::new(NewUser {
            name,
            email,
            password_hash,
            role,
        });

        self.users.insert(&user).await.map_err(email_conflict)
    }

    async fn find(&self, id: Uuid) -> Result<User, AppError> {
        self.users.get_by_id(id).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            other => other.into(),
        })
    }

    async fn save(&self, user: &User) -> Result<User, AppError> {
        self.users.update(user).await.map_err(email_conflict)
    }

    async fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password, self.bcrypt_cost)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn check_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        verify_password(password, hash)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    fn issue(&self, user: &User) -> Result<String, AppError> {
        self.tokens
            .issue(user)
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}

fn email_conflict(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::Conflict(_) => AppError::Conflict("Email already registered".to_string()),
        other => other.into(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
