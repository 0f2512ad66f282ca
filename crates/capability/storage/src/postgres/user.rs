//! Postgres 用户存储实现

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::traits::UserStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const USER_COLUMNS: &str = "user_id, email, password_hash, full_name, google_id, refresh_token, \
                            created_at, updated_at";

pub struct PgUserStore {
    pub pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<UserRecord>, StorageError> {
        // column 只来自本模块内的常量
        let sql = format!("select {USER_COLUMNS} from users where {column} = $1");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| user_from_row(&row)).transpose()
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StorageError> {
    Ok(UserRecord {
        user_id: row.try_get("user_id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        full_name: row.try_get("full_name")?,
        google_id: row.try_get("google_id")?,
        refresh_token: row.try_get("refresh_token")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        self.find_one("user_id", user_id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        self.find_one("email", email).await
    }

    async fn find_by_google_id(
        &self,
        google_id: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        self.find_one("google_id", google_id).await
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        let sql = format!(
            "insert into users (user_id, email, password_hash, full_name, google_id, refresh_token, \
             created_at, updated_at) values ($1,$2,$3,$4,$5,$6,$7,$8) returning {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&record.user_id)
            .bind(&record.email)
            .bind(&record.password_hash)
            .bind(&record.full_name)
            .bind(&record.google_id)
            .bind(&record.refresh_token)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await?;
        user_from_row(&row)
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let result =
            sqlx::query("update users set password_hash = $2, updated_at = now() where user_id = $1")
                .bind(user_id)
                .bind(password_hash)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_refresh_token(&self, user_id: &str) -> Result<Option<String>, StorageError> {
        let value: Option<Option<String>> =
            sqlx::query_scalar("select refresh_token from users where user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value.flatten())
    }

    async fn set_refresh_token(
        &self,
        user_id: &str,
        refresh_token: Option<&str>,
    ) -> Result<bool, StorageError> {
        let result =
            sqlx::query("update users set refresh_token = $2, updated_at = now() where user_id = $1")
                .bind(user_id)
                .bind(refresh_token)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
