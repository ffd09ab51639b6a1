use crate::error::{AppError, Result};

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|_| AppError::InternalError)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<()> {
    let matches =
        bcrypt::verify(password, password_hash).map_err(|_| AppError::InternalError)?;

    if !matches {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    Ok(())
}
