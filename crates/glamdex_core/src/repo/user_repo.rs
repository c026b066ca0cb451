//! User directory contract and SQLite implementation.

use crate::model::user::{Email, User};
use crate::repo::error::{PersistenceError, PersistenceResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

/// Persistence for email-identified user records.
pub trait UserDirectory {
    fn find_user(&self, email: &Email) -> PersistenceResult<Option<User>>;

    /// Stores a new user. Inserting an email that already exists keeps the
    /// existing record.
    fn insert_user(&self, user: &User) -> PersistenceResult<()>;

    /// Stamps the user's last sign-in time.
    fn record_login(&self, email: &Email, at_ms: i64) -> PersistenceResult<()>;
}

impl<D: UserDirectory + ?Sized> UserDirectory for &D {
    fn find_user(&self, email: &Email) -> PersistenceResult<Option<User>> {
        (**self).find_user(email)
    }

    fn insert_user(&self, user: &User) -> PersistenceResult<()> {
        (**self).insert_user(user)
    }

    fn record_login(&self, email: &Email, at_ms: i64) -> PersistenceResult<()> {
        (**self).record_login(email, at_ms)
    }
}

/// SQLite-backed user directory.
#[derive(Clone, Copy)]
pub struct SqliteUserDirectory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserDirectory<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserDirectory for SqliteUserDirectory<'_> {
    fn find_user(&self, email: &Email) -> PersistenceResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                "SELECT email, uid, created_at, last_login_at
                 FROM users
                 WHERE email = ?1;",
                [email.as_str()],
                |row| Ok(parse_user_row(row)),
            )
            .optional()?;

        row.transpose()
    }

    fn insert_user(&self, user: &User) -> PersistenceResult<()> {
        self.conn.execute(
            "INSERT INTO users (email, uid, created_at, last_login_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (email) DO NOTHING;",
            params![
                user.email.as_str(),
                user.uid.to_string(),
                user.created_at_ms,
                user.last_login_ms,
            ],
        )?;
        Ok(())
    }

    fn record_login(&self, email: &Email, at_ms: i64) -> PersistenceResult<()> {
        self.conn.execute(
            "UPDATE users SET last_login_at = ?1 WHERE email = ?2;",
            params![at_ms, email.as_str()],
        )?;
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> PersistenceResult<User> {
    let email_text: String = row.get("email")?;
    let email = Email::parse(&email_text).map_err(|_| {
        PersistenceError::InvalidData("invalid email value in users.email".to_string())
    })?;

    let uid_text: String = row.get("uid")?;
    let uid = Uuid::parse_str(&uid_text).map_err(|_| {
        PersistenceError::InvalidData(format!("invalid uid value `{uid_text}` in users.uid"))
    })?;

    Ok(User {
        email,
        uid,
        created_at_ms: row.get("created_at")?,
        last_login_ms: row.get("last_login_at")?,
    })
}
