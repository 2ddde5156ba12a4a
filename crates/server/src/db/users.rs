//! User repository for database operations.
//!
//! `UserRepository` serves the account endpoints from the pool. The free
//! functions take a connection so the base loader can call them inside its
//! transaction.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use outpost_core::{SaveId, UserId, Username};

use super::RepositoryError;
use crate::models::User;

/// Raw `outpost.user` row.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    save_id: Option<SaveId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            username,
            save_id: row.save_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Raw row joined with the password hash.
#[derive(sqlx::FromRow)]
struct UserWithPasswordRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the username in the database is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        find_by_id(&mut conn, id).await
    }

    /// Create a new user with a password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO outpost.user (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, save_id, created_at, updated_at
            ",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "username"))?;

        row.try_into()
    }

    /// Get a user together with their password hash.
    ///
    /// Returns `None` if no user has this username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithPasswordRow>(
            r"
            SELECT id, username, save_id, created_at, updated_at, password_hash
            FROM outpost.user
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = User::try_from(row.user)?;
        Ok(Some((user, row.password_hash)))
    }
}

/// Get a user by ID on an existing connection.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
/// Returns `RepositoryError::DataCorruption` if the username in the database is invalid.
pub async fn find_by_id(
    conn: &mut PgConnection,
    id: UserId,
) -> Result<Option<User>, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
        r"
        SELECT id, username, save_id, created_at, updated_at
        FROM outpost.user
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    row.map(User::try_from).transpose()
}

/// Get a user by ID and lock the row until the transaction ends.
///
/// Concurrent base loads for the same player serialize on this lock, so only
/// one of them can create and link a default save.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
/// Returns `RepositoryError::DataCorruption` if the username in the database is invalid.
pub async fn lock_by_id(
    conn: &mut PgConnection,
    id: UserId,
) -> Result<Option<User>, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
        r"
        SELECT id, username, save_id, created_at, updated_at
        FROM outpost.user
        WHERE id = $1
        FOR UPDATE
        ",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    row.map(User::try_from).transpose()
}

/// Point a user at their active save.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user doesn't exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn link_save(
    conn: &mut PgConnection,
    user_id: UserId,
    save_id: SaveId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE outpost.user
        SET save_id = $1, updated_at = NOW()
        WHERE id = $2
        ",
    )
    .bind(save_id)
    .bind(user_id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}
