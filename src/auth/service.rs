use std::fmt;
use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::revocation::RevocationStore;
use crate::auth::token::{TokenKeys, VerifyError};
use crate::directory::{AccountDirectory, DirectoryError};
use crate::error::AppError;
use crate::models::User;

/// Why a presented token could not be resolved to an account.
///
/// Conversions into `AppError` collapse every variant except `Directory` to
/// one generic unauthenticated response, so the variant is only visible to
/// callers inside the process (and to logs).
#[derive(Debug)]
pub enum AuthError {
    /// The exact token string was revoked earlier.
    Revoked,
    /// The token itself is not trustworthy (signature, subject, expiry).
    Credential(VerifyError),
    /// The token is valid but its subject matches no account.
    UnknownSubject,
    /// The subject's account has been deactivated.
    InactiveAccount,
    /// Account lookup failed for infrastructure reasons.
    Directory(DirectoryError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::Revoked => write!(f, "token has been revoked"),
            AuthError::Credential(e) => write!(f, "credential rejected: {}", e),
            AuthError::UnknownSubject => write!(f, "token subject matches no account"),
            AuthError::InactiveAccount => write!(f, "account is inactive"),
            AuthError::Directory(e) => write!(f, "account lookup failed: {}", e),
        }
    }
}

impl From<VerifyError> for AuthError {
    fn from(error: VerifyError) -> AuthError {
        AuthError::Credential(error)
    }
}

/// Composes token verification, the revocation store, and the account
/// directory into the authentication surface the request layer uses:
/// registration, login, token issuance, identity resolution, revocation.
pub struct AuthService {
    directory: Arc<dyn AccountDirectory>,
    revocations: Arc<dyn RevocationStore>,
    keys: TokenKeys,
}

impl AuthService {
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        revocations: Arc<dyn RevocationStore>,
        keys: TokenKeys,
    ) -> Self {
        Self {
            directory,
            revocations,
            keys,
        }
    }

    /// Creates an account with a freshly hashed password.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        if self
            .directory
            .find_by_username(username)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("Username already registered".into()));
        }

        let password_hash = hash_password(password)?;
        let user = self.directory.create(username, &password_hash).await?;
        Ok(user)
    }

    /// Checks a username/password pair against the directory.
    ///
    /// Unknown usernames, wrong passwords, and deactivated accounts all get
    /// the same response; only a corrupt stored hash is surfaced differently
    /// (as a server error).
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        let invalid = || AppError::Unauthorized("Invalid username or password".into());

        let user = self
            .directory
            .find_by_username(username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }
        if !user.is_active {
            return Err(invalid());
        }

        Ok(user)
    }

    /// Mints a bearer token for an authenticated account, using the
    /// service-wide default lifetime.
    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        self.keys.issue(&user.username, None)
    }

    /// Resolves a presented token to the active account it asserts.
    ///
    /// Revocation is checked before any cryptography: a revoked token must
    /// never resolve, whatever its signature or expiry says, and the set
    /// lookup is cheaper than a signature check.
    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        if self.revocations.is_revoked(token) {
            return Err(AuthError::Revoked);
        }

        let subject = self.keys.verify(token)?;

        let user = self
            .directory
            .find_by_username(&subject)
            .await
            .map_err(AuthError::Directory)?
            .ok_or(AuthError::UnknownSubject)?;

        if !user.is_active {
            return Err(AuthError::InactiveAccount);
        }

        Ok(user)
    }

    /// Invalidates the exact token string for the rest of the process
    /// lifetime. Idempotent.
    pub fn revoke(&self, token: &str) {
        self.revocations.revoke(token);
    }
}
