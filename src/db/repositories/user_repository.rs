// User persistence keyed by Farcaster id

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::db::error::DbError;
use crate::entity::prelude::Users;
use crate::entity::users;

/// Profile fields a client may change. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub evm_wallet: Option<String>,
    pub sol_wallet: Option<String>,
}

/// Repository for users
pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<users::Model>, DbError> {
        Users::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_fid(&self, fid: i64) -> Result<Option<users::Model>, DbError> {
        Users::find()
            .filter(users::Column::Fid.eq(fid))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn find_many(&self, ids: &[i32]) -> Result<Vec<users::Model>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Users::find()
            .filter(users::Column::Id.is_in(ids.to_vec()))
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Inserts a new user. A duplicate fid surfaces as `DbError::Conflict`.
    pub async fn insert(&self, fid: i64, changes: UserChanges) -> Result<users::Model, DbError> {
        let user = users::ActiveModel {
            fid: Set(fid),
            username: Set(changes.username),
            evm_wallet: Set(changes.evm_wallet),
            sol_wallet: Set(changes.sol_wallet),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        user.insert(&self.conn).await.map_err(Into::into)
    }

    /// Applies the supplied fields to an existing user
    pub async fn update(
        &self,
        existing: users::Model,
        changes: UserChanges,
    ) -> Result<users::Model, DbError> {
        if changes.username.is_none() && changes.evm_wallet.is_none() && changes.sol_wallet.is_none()
        {
            return Ok(existing);
        }

        let mut user: users::ActiveModel = existing.into();

        if let Some(username) = changes.username {
            user.username = Set(Some(username));
        }
        if let Some(evm_wallet) = changes.evm_wallet {
            user.evm_wallet = Set(Some(evm_wallet));
        }
        if let Some(sol_wallet) = changes.sol_wallet {
            user.sol_wallet = Set(Some(sol_wallet));
        }

        user.update(&self.conn).await.map_err(Into::into)
    }
}
