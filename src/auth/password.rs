use crate::error::AppError;
use bcrypt::{hash, verify};
use std::fmt;

/// A stored password hash could not be parsed. Distinct from a verification
/// mismatch: this means the record itself is corrupt.
#[derive(Debug)]
pub struct HashFormatError(pub String);

impl fmt::Display for HashFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "malformed password hash: {}", self.0)
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, 12) // bcrypt default cost is 12
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Recomputes the hash with the salt and cost embedded in `hashed_password`
/// and compares in constant time. A mismatch is `Ok(false)`, never an error.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, HashFormatError> {
    verify(password, hashed_password).map_err(|e| HashFormatError(e.to_string()))
}
