//! Email-based identity resolution.
//!
//! # Invariants
//! - Resolution never checks a credential: presence of the email is identity.
//! - An existing user is returned unchanged; its inventory is never reset.
//! - Only persistence failures and malformed emails make resolution fail.

use crate::model::user::{now_epoch_ms, Email, InvalidEmail, User};
use crate::repo::error::PersistenceError;
use crate::repo::user_repo::UserDirectory;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum IdentityError {
    InvalidEmail(InvalidEmail),
    Store(PersistenceError),
}

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IdentityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEmail(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<InvalidEmail> for IdentityError {
    fn from(value: InvalidEmail) -> Self {
        Self::InvalidEmail(value)
    }
}

impl From<PersistenceError> for IdentityError {
    fn from(value: PersistenceError) -> Self {
        Self::Store(value)
    }
}

/// Outcome of `IdentityResolver::resolve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub user: User,
    /// `true` when this call created the user record.
    pub created: bool,
}

/// Maps an email to its user record, creating the record on first sight.
pub struct IdentityResolver<D: UserDirectory> {
    directory: D,
}

impl<D: UserDirectory> IdentityResolver<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Returns the user for `email`, creating it when absent.
    pub fn resolve_or_create(&self, email: &str) -> Result<User, IdentityError> {
        self.resolve(email).map(|resolution| resolution.user)
    }

    /// Same as `resolve_or_create`, also reporting whether a record was created.
    pub fn resolve(&self, email: &str) -> Result<Resolution, IdentityError> {
        let email = Email::parse(email)?;

        if let Some(user) = self.directory.find_user(&email)? {
            info!("event=identity_resolve module=identity status=ok created=false");
            return Ok(Resolution {
                user,
                created: false,
            });
        }

        let candidate = User::new(email);
        self.directory.insert_user(&candidate)?;

        // Another writer may have registered the same email first; its record wins.
        let stored = self.directory.find_user(&candidate.email)?;
        let created = stored
            .as_ref()
            .map_or(true, |user| user.uid == candidate.uid);
        info!("event=identity_resolve module=identity status=ok created={created}");

        Ok(Resolution {
            user: stored.unwrap_or(candidate),
            created,
        })
    }

    /// Looks up an existing user without creating one.
    pub fn find(&self, email: &str) -> Result<Option<User>, IdentityError> {
        let email = Email::parse(email)?;
        Ok(self.directory.find_user(&email)?)
    }

    /// Resolves the user and stamps the sign-in time.
    ///
    /// Failing to record the sign-in time is logged and otherwise ignored.
    pub fn sign_in(&self, email: &str) -> Result<User, IdentityError> {
        let mut user = self.resolve_or_create(email)?;
        let now = now_epoch_ms();
        match self.directory.record_login(&user.email, now) {
            Ok(()) => user.last_login_ms = Some(now),
            Err(err) => warn!(
                "event=identity_sign_in module=identity status=error error_code={} error={}",
                err.code(),
                err
            ),
        }
        Ok(user)
    }
}
