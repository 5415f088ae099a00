use crate::auth::MIN_PASSWORD_LEN;
use crate::server::response::ApiError;

const MAX_USERNAME_LEN: usize = 32;
const MIN_USERNAME_LEN: usize = 3;
const MAX_EMAIL_LEN: usize = 254;
const MAX_TITLE_LEN: usize = 100;
const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_SCORE: i64 = 100;

fn is_valid_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn check_username(name: &str) -> Result<(), String> {
    if name.len() < MIN_USERNAME_LEN {
        return Err(format!(
            "Username must be at least {MIN_USERNAME_LEN} characters"
        ));
    }
    if name.len() > MAX_USERNAME_LEN {
        return Err(format!(
            "Username cannot exceed {MAX_USERNAME_LEN} characters"
        ));
    }
    if !name.chars().all(is_valid_username_char) {
        return Err(
            "Username can only contain alphanumeric characters, hyphens, and underscores"
                .to_string(),
        );
    }
    if name.starts_with('-') || name.starts_with('_') {
        return Err("Username cannot start with a hyphen or underscore".to_string());
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), String> {
    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("Email cannot exceed {MAX_EMAIL_LEN} characters"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Email must contain '@'".to_string());
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err("Email is malformed".to_string());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Email domain is malformed".to_string());
    }
    Ok(())
}

/// Free-form display names for organizations, hackathons, teams and files.
fn check_title(title: &str, entity: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err(format!("{entity} name cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!(
            "{entity} name cannot exceed {MAX_TITLE_LEN} characters"
        ));
    }
    Ok(())
}

pub fn validate_username(name: &str) -> Result<(), ApiError> {
    check_username(name).map_err(ApiError::bad_request)
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    check_email(email).map_err(ApiError::bad_request)
}

pub fn validate_title(title: &str, entity: &str) -> Result<(), ApiError> {
    check_title(title, entity).map_err(ApiError::bad_request)
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password cannot exceed {MAX_PASSWORD_LEN} bytes"
        )));
    }
    Ok(())
}

pub fn validate_score(value: i64) -> Result<(), ApiError> {
    if !(0..=MAX_SCORE).contains(&value) {
        return Err(ApiError::bad_request(format!(
            "Score must be between 0 and {MAX_SCORE}"
        )));
    }
    Ok(())
}
