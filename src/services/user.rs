use chrono::NaiveDateTime;
use sea_orm::{DatabaseConnection, DatabaseTransaction};
use tracing::info;

use crate::{
    api::types::{
        CreateUserRequest, UpdateUserRequest, UserListQuery, UserResponse, UserRoleRequest, now,
    },
    entities::{app_user, user_role},
    error::{AppError, AppResult},
    repository::{association, user},
    services::transaction::with_transaction,
};

#[derive(Clone)]
pub struct UserService {
    db: DatabaseConnection,
    hash_cost: u32,
}

impl UserService {
    pub fn new(db: DatabaseConnection, hash_cost: u32) -> Self {
        Self { db, hash_cost }
    }

    /// Create a user together with its role assignments
    pub async fn create(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        let password_hash = self.hash_password(&request.password)?;
        let now = now();
        let params = request.to_create_params(password_hash, now)?;
        let username = request.username;

        let (user, roles) = with_transaction(&self.db, move |txn| {
            Box::pin(create_user_tx(txn, username, params, request.role, now))
        })
        .await?;

        info!("👤 Created user {} ({})", user.id, user.username);
        Ok(UserResponse::new(user, roles))
    }

    pub async fn get(&self, id: i32) -> AppResult<UserResponse> {
        let user = user::get(&self.db, id).await?.ok_or(AppError::UserNotExist)?;
        let roles = association::list_user_roles_by_user_ids(&self.db, &[id]).await?;
        Ok(UserResponse::new(user, roles))
    }

    pub async fn list(&self, query: UserListQuery) -> AppResult<Vec<UserResponse>> {
        let filter = query.filter()?;
        let (offset, limit) = query.paging();

        let users = user::list(&self.db, &filter, offset, limit).await?;
        let ids: Vec<i32> = users.iter().map(|user| user.id).collect();
        let mut roles = association::group_by_parent(
            association::list_user_roles_by_user_ids(&self.db, &ids).await?,
            |row| row.user_id,
        );

        Ok(users
            .into_iter()
            .map(|user| {
                let assigned = roles.remove(&user.id).unwrap_or_default();
                UserResponse::new(user, assigned)
            })
            .collect())
    }

    /// Update the supplied fields; a present `role` list replaces the
    /// assignments, an absent one keeps them
    pub async fn update(&self, id: i32, request: UpdateUserRequest) -> AppResult<UserResponse> {
        let password_hash = request
            .password
            .as_deref()
            .map(|password| self.hash_password(password))
            .transpose()?;
        let now = now();
        let params = request.to_update_params(id, password_hash, now)?;

        let (user, roles) = with_transaction(&self.db, move |txn| {
            Box::pin(update_user_tx(txn, id, params, request.username, request.role, now))
        })
        .await?;

        info!("👤 Updated user {}", user.id);
        Ok(UserResponse::new(user, roles))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        with_transaction(&self.db, move |txn| Box::pin(delete_user_tx(txn, id))).await?;

        info!("🗑️ Deleted user {}", id);
        Ok(())
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, self.hash_cost)
            .map_err(|err| AppError::Convert(format!("password hashing failed: {err}")))
    }
}

async fn create_user_tx(
    txn: &DatabaseTransaction,
    username: String,
    params: app_user::ActiveModel,
    role_requests: Vec<UserRoleRequest>,
    now: NaiveDateTime,
) -> AppResult<(app_user::Model, Vec<user_role::Model>)> {
    if user::exists_by_username(txn, &username).await? {
        return Err(AppError::UsernameOccupy);
    }

    let user = user::create(txn, params).await?;
    let roles = insert_roles(txn, user.id, &role_requests, now).await?;

    Ok((user, roles))
}

async fn update_user_tx(
    txn: &DatabaseTransaction,
    id: i32,
    params: app_user::ActiveModel,
    username: Option<String>,
    role_requests: Option<Vec<UserRoleRequest>>,
    now: NaiveDateTime,
) -> AppResult<(app_user::Model, Vec<user_role::Model>)> {
    let current = user::get(txn, id).await?.ok_or(AppError::UserNotExist)?;

    if let Some(username) = username.filter(|username| *username != current.username) {
        if user::exists_by_username(txn, &username).await? {
            return Err(AppError::UsernameOccupy);
        }
    }

    let user = user::update(txn, params).await?;

    let roles = match role_requests {
        Some(requests) => {
            association::delete_user_roles_by_user_id(txn, id).await?;
            insert_roles(txn, id, &requests, now).await?
        }
        None => association::list_user_roles_by_user_ids(txn, &[id]).await?,
    };

    Ok((user, roles))
}

async fn delete_user_tx(txn: &DatabaseTransaction, id: i32) -> AppResult<()> {
    if user::get(txn, id).await?.is_none() {
        return Err(AppError::UserNotExist);
    }

    association::delete_user_roles_by_user_id(txn, id).await?;
    user::delete(txn, id).await?;
    Ok(())
}

async fn insert_roles(
    txn: &DatabaseTransaction,
    user_id: i32,
    requests: &[UserRoleRequest],
    now: NaiveDateTime,
) -> AppResult<Vec<user_role::Model>> {
    let mut roles = Vec::with_capacity(requests.len());
    for request in requests {
        let params = request.to_params(user_id, now)?;
        roles.push(association::create_user_role(txn, params).await?);
    }
    Ok(roles)
}
