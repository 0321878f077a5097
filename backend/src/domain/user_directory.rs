//! User-account registry service.
//!
//! Implements [`UserAdmin`]. Role changes, deactivation, and deletion all
//! refuse to act on the requesting administrator's own account so an
//! instance cannot lock out its last admin in one request. Deleting an
//! account first releases any equipment assigned to it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::ports::{
    AccountChangeRequest, InventoryRepository, InventoryRepositoryError, UserAdmin,
    UserRepository, UserRepositoryError,
};
use crate::domain::user::{EmailAddress, Role, User};

/// Account registry service implementing the driving port.
#[derive(Clone)]
pub struct UserDirectoryService<U, I> {
    users: Arc<U>,
    inventory: Arc<I>,
}

impl<U, I> UserDirectoryService<U, I> {
    /// Create a new service over the given repositories.
    pub fn new(users: Arc<U>, inventory: Arc<I>) -> Self {
        Self { users, inventory }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { .. } => {
            Error::invalid_request("a user with this email already exists")
        }
    }
}

fn map_inventory_error(error: InventoryRepositoryError) -> Error {
    match error {
        InventoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("inventory repository unavailable: {message}"))
        }
        InventoryRepositoryError::Query { message }
        | InventoryRepositoryError::DuplicateCode { message } => {
            Error::internal(format!("inventory repository error: {message}"))
        }
    }
}

fn guard_self(request: &AccountChangeRequest, action: &str) -> Result<(), Error> {
    if request.target_id == request.actor_id {
        return Err(Error::forbidden(format!(
            "you cannot {action} your own account"
        )));
    }
    Ok(())
}

impl<U, I> UserDirectoryService<U, I>
where
    U: UserRepository,
    I: InventoryRepository,
{
    async fn target(&self, id: Uuid) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<U, I> UserAdmin for UserDirectoryService<U, I>
where
    U: UserRepository,
    I: InventoryRepository,
{
    async fn add_user(&self, email: EmailAddress, role: Role) -> Result<User, Error> {
        let user = User {
            id: Uuid::new_v4(),
            email,
            role,
            is_active: true,
            created_at: Utc::now(),
        };
        self.users.insert(&user).await.map_err(map_user_error)?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list_newest_first().await.map_err(map_user_error)
    }

    async fn update_role(&self, request: AccountChangeRequest, role: Role) -> Result<(), Error> {
        guard_self(&request, "change the role of")?;
        let matched = self
            .users
            .update_role(request.target_id, role)
            .await
            .map_err(map_user_error)?;
        if !matched {
            return Err(Error::not_found("user not found"));
        }
        tracing::info!(user_id = %request.target_id, role = %role, "user role changed");
        Ok(())
    }

    async fn update_active(
        &self,
        request: AccountChangeRequest,
        is_active: bool,
    ) -> Result<(), Error> {
        guard_self(&request, "deactivate")?;
        let matched = self
            .users
            .set_active(request.target_id, is_active)
            .await
            .map_err(map_user_error)?;
        if !matched {
            return Err(Error::not_found("user not found"));
        }
        tracing::info!(user_id = %request.target_id, is_active, "user active state changed");
        Ok(())
    }

    async fn delete_user(&self, request: AccountChangeRequest) -> Result<(), Error> {
        guard_self(&request, "delete")?;
        let target = self.target(request.target_id).await?;
        let released = self
            .inventory
            .clear_assignments_for(&target.email)
            .await
            .map_err(map_inventory_error)?;
        if released > 0 {
            tracing::info!(
                user_id = %request.target_id,
                released,
                "released equipment before account deletion"
            );
        }
        let matched = self
            .users
            .delete(request.target_id)
            .await
            .map_err(map_user_error)?;
        if !matched {
            return Err(Error::not_found("user not found"));
        }
        tracing::info!(user_id = %request.target_id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_directory_tests.rs"]
mod tests;
