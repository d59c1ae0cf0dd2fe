//! PostgreSQL Repository Implementations
//!
//! Tables: `user_info`, `user_operation`. Every read filters
//! `deleted_at IS NULL`; delete only stamps `deleted_at`.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::error::kind::ErrorKind;
use kernel::id::Id;
use kernel::pagination::{PageWindow, fetch_page};
use kernel::repository::{Repository, not_found};
use sqlx::PgPool;

use crate::domain::entity::{operation::OperationRecord, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    operation_kind::OperationKind, user_id::OperationId, user_id::UserId, user_name::UserName,
};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

const USER_COLUMNS: &str =
    "id, user_name, password, role, is_locked, extra_info, created_at, updated_at";

impl Repository<User> for PgAuthRepository {
    async fn create(&self, mut user: User) -> AppResult<User> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO user_info (
                user_name,
                password,
                role,
                is_locked,
                extra_info,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(user.user_name.as_str())
        .bind(&user.password)
        .bind(&user.role)
        .bind(i16::from(user.is_locked))
        .bind(&user.extra_info)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| rename_conflict(e.into(), "user name already exists"))?;

        user.id = Id::from_raw(id);
        Ok(user)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE user_info SET
                user_name = $2,
                password = $3,
                role = $4,
                is_locked = $5,
                extra_info = $6,
                updated_at = $7
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user.id.value())
        .bind(user.user_name.as_str())
        .bind(&user.password)
        .bind(&user.role)
        .bind(i16::from(user.is_locked))
        .bind(&user.extra_info)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| rename_conflict(e.into(), "user name already exists"))?
        .rows_affected();

        if affected == 0 {
            return Err(not_found(user.id));
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> AppResult<()> {
        let affected = sqlx::query(
            "UPDATE user_info SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.value())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM user_info WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<User>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_info WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        fetch_page(total, || async {
            let rows = sqlx::query_as::<_, UserRow>(&format!(
                "SELECT {USER_COLUMNS} FROM user_info WHERE deleted_at IS NULL \
                 ORDER BY id ASC LIMIT $1 OFFSET $2"
            ))
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

            Ok::<_, AppError>(rows.into_iter().map(UserRow::into_user).collect())
        })
        .await
    }
}

impl UserRepository for PgAuthRepository {
    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM user_info WHERE user_name = $1 AND deleted_at IS NULL"
        ))
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }
}

// ============================================================================
// Operation Repository Implementation
// ============================================================================

const OPERATION_COLUMNS: &str = "id, user_name, operation, module, target_id, target_name, \
     ip, user_agent, extra_info, create_time";

impl Repository<OperationRecord> for PgAuthRepository {
    async fn create(&self, mut record: OperationRecord) -> AppResult<OperationRecord> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO user_operation (
                user_name,
                operation,
                module,
                target_id,
                target_name,
                ip,
                user_agent,
                extra_info,
                create_time
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&record.user_name)
        .bind(record.operation.code())
        .bind(&record.module)
        .bind(record.target_id)
        .bind(&record.target_name)
        .bind(&record.ip)
        .bind(&record.user_agent)
        .bind(&record.extra_info)
        .bind(record.create_time)
        .fetch_one(&self.pool)
        .await?;

        record.id = Id::from_raw(id);
        Ok(record)
    }

    async fn update(&self, record: &OperationRecord) -> AppResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE user_operation SET
                user_name = $2,
                operation = $3,
                module = $4,
                target_id = $5,
                target_name = $6,
                ip = $7,
                user_agent = $8,
                extra_info = $9
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(record.id.value())
        .bind(&record.user_name)
        .bind(record.operation.code())
        .bind(&record.module)
        .bind(record.target_id)
        .bind(&record.target_name)
        .bind(&record.ip)
        .bind(&record.user_agent)
        .bind(&record.extra_info)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(not_found(record.id));
        }
        Ok(())
    }

    async fn delete(&self, id: OperationId) -> AppResult<()> {
        let affected = sqlx::query(
            "UPDATE user_operation SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.value())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: OperationId) -> AppResult<Option<OperationRecord>> {
        let row = sqlx::query_as::<_, OperationRow>(&format!(
            "SELECT {OPERATION_COLUMNS} FROM user_operation WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(OperationRow::into_record).transpose()
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<OperationRecord>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_operation WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        fetch_page(total, || async {
            let rows = sqlx::query_as::<_, OperationRow>(&format!(
                "SELECT {OPERATION_COLUMNS} FROM user_operation WHERE deleted_at IS NULL \
                 ORDER BY create_time DESC, id DESC LIMIT $1 OFFSET $2"
            ))
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

            rows.into_iter()
                .map(OperationRow::into_record)
                .collect::<AppResult<Vec<_>>>()
        })
        .await
    }
}

/// Give a unique-violation a message naming the clashing field
fn rename_conflict(err: AppError, message: &'static str) -> AppError {
    if err.kind() == ErrorKind::Conflict {
        AppError::conflict(message).with_source(err)
    } else {
        err
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    user_name: String,
    password: String,
    role: String,
    is_locked: i16,
    extra_info: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: Id::from_raw(self.id),
            user_name: UserName::from_trusted(self.user_name),
            password: self.password,
            role: self.role,
            is_locked: self.is_locked != 0,
            extra_info: self.extra_info,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OperationRow {
    id: i64,
    user_name: String,
    operation: String,
    module: String,
    target_id: Option<i64>,
    target_name: Option<String>,
    ip: Option<String>,
    user_agent: Option<String>,
    extra_info: String,
    create_time: DateTime<Utc>,
}

impl OperationRow {
    fn into_record(self) -> AppResult<OperationRecord> {
        let operation = OperationKind::from_code(&self.operation).ok_or_else(|| {
            AppError::internal(format!("Unknown operation kind: {}", self.operation))
        })?;

        Ok(OperationRecord {
            id: Id::from_raw(self.id),
            user_name: self.user_name,
            operation,
            module: self.module,
            target_id: self.target_id,
            target_name: self.target_name,
            ip: self.ip,
            user_agent: self.user_agent,
            extra_info: self.extra_info,
            create_time: self.create_time,
        })
    }
}
