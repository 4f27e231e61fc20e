//! Authentication route handlers.
//!
//! Login, signup and logout. These handlers are the only writers of the
//! session's authentication keys; the pipeline only ever reads them.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{PageContext, establish_login};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form and Query Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page_title: String,
    pub path: String,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub page_title: String,
    pub path: String,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(context: PageContext, Query(query): Query<MessageQuery>) -> Response {
    LoginTemplate {
        page_title: "Login".to_owned(),
        path: context.path,
        is_authenticated: context.is_authenticated,
        csrf_token: context.csrf_token,
        error: query.error.map(|_| "Invalid email or password.".to_owned()),
        success: query
            .success
            .map(|_| "Account created. You can log in now.".to_owned()),
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            establish_login(&session, &user).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::Repository(e)) => Err(AppError::Database(e)),
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            Ok(Redirect::to("/login?error=credentials").into_response())
        }
    }
}

/// Display the signup page.
pub async fn signup_page(context: PageContext, Query(query): Query<MessageQuery>) -> Response {
    SignupTemplate {
        page_title: "Signup".to_owned(),
        path: context.path,
        is_authenticated: context.is_authenticated,
        csrf_token: context.csrf_token,
        error: query.error.map(signup_error_message),
    }
    .into_response()
}

/// Handle signup form submission.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    if form.password != form.password_confirm {
        return Ok(Redirect::to("/signup?error=password_mismatch").into_response());
    }

    match AuthService::new(state.pool())
        .signup(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "account created");
            Ok(Redirect::to("/login?success=account_created").into_response())
        }
        Err(AuthError::Repository(e)) => Err(AppError::Database(e)),
        Err(AuthError::AccountExists) => {
            Ok(Redirect::to("/signup?error=email_taken").into_response())
        }
        Err(AuthError::InvalidEmail(_)) => Ok(Redirect::to("/signup?error=email").into_response()),
        Err(AuthError::WeakPassword(_)) => {
            Ok(Redirect::to("/signup?error=password").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "signup failed");
            Ok(Redirect::to("/signup?error=failed").into_response())
        }
    }
}

/// Handle logout: drop the whole session.
pub async fn logout(session: Session) -> Result<Response, AppError> {
    clear_sentry_user();
    session.flush().await?;
    Ok(Redirect::to("/").into_response())
}

/// Map an error query key to a human message for the signup form.
fn signup_error_message(key: String) -> String {
    match key.as_str() {
        "password_mismatch" => "Passwords do not match.".to_owned(),
        "email_taken" => "An account with this email already exists.".to_owned(),
        "email" => "Enter a valid email address.".to_owned(),
        "password" => "Password must be at least 8 characters.".to_owned(),
        _ => "Could not create the account.".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_error_messages() {
        assert!(signup_error_message("password_mismatch".to_owned()).contains("match"));
        assert!(signup_error_message("email_taken".to_owned()).contains("exists"));
        assert!(signup_error_message("other".to_owned()).contains("Could not"));
    }
}
