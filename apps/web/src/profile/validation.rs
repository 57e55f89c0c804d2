use crate::errors::AppError;
use crate::models::user::{PasswordChange, ProfileUpdate};

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Trims both fields; both must be present.
pub fn validate_profile_update(update: ProfileUpdate) -> Result<ProfileUpdate, AppError> {
    let username = update.username.trim();
    let email = update.email.trim();
    if username.is_empty() || email.is_empty() {
        return Err(AppError::Validation(
            "Username and email are required".to_string(),
        ));
    }
    Ok(ProfileUpdate {
        username: username.to_string(),
        email: email.to_string(),
    })
}

/// Checks run in order: presence, confirmation match, minimum length.
pub fn validate_password_change(change: &PasswordChange) -> Result<(), AppError> {
    let fields = [
        &change.current_password,
        &change.new_password,
        &change.confirm_password,
    ];
    if fields.iter().any(|f| f.is_empty()) {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    if change.new_password != change.confirm_password {
        return Err(AppError::Validation("New passwords do not match".to_string()));
    }
    if change.new_password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::Validation(format!(
            "New password must be at least {MIN_PASSWORD_CHARS} characters long"
        )));
    }
    Ok(())
}
