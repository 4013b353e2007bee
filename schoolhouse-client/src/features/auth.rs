//! Sign-in and sign-out flows.

use crate::context::ClientContext;
use crate::error::ClientError;
use crate::validate::{validate_email, ValidateNonEmpty};
use schoolhouse_api::types::LoginRequest;
use schoolhouse_core::Session;

/// Authenticate and establish the session. On success the bearer token
/// rotates and subsequent requests are authenticated; the caller navigates
/// to `session.role()`'s landing path.
pub async fn login(
    ctx: &ClientContext,
    email: impl Into<String>,
    password: impl Into<String>,
) -> Result<Session, ClientError> {
    let request = LoginRequest {
        email: email.into(),
        password: password.into(),
    };
    validate_email(&request.email, "email")?;
    request.password.validate_non_empty("password")?;

    match ctx.rest.login(&request).await {
        Ok(response) => {
            ctx.session.establish(response);
            let session = ctx.session.current();
            ctx.notifier.success("Signed in");
            Ok(session)
        }
        Err(err) => {
            tracing::warn!(error = %err, "login failed");
            ctx.notifier.error(err.user_message());
            Err(err)
        }
    }
}

/// Tear down the session: token, session state, and every cached server
/// response. The caller navigates to the login path.
pub fn logout(ctx: &ClientContext) {
    ctx.session.logout();
    ctx.notifier.success("Signed out");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, ClientConfig};

    fn test_context() -> (ClientContext, tokio::sync::mpsc::Receiver<crate::notifications::Notification>) {
        let config = ClientConfig {
            api_base_url: "http://localhost:5000/api/v1".to_string(),
            request_timeout_ms: 5_000,
            stale_time_ms: 30_000,
            default_page_size: 10,
            auth: AuthConfig { bearer_token: None },
        };
        ClientContext::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_email_is_rejected_locally() {
        let (ctx, mut notifications) = test_context();
        let result = login(&ctx, "not-an-email", "hunter2").await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert!(!ctx.session.current().authenticated);
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_blank_password_is_rejected_locally() {
        let (ctx, _notifications) = test_context();
        let result = login(&ctx, "ada@example.edu", "").await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_logout_resets_session() {
        let (ctx, mut notifications) = test_context();
        logout(&ctx);
        assert!(!ctx.session.current().authenticated);
        assert_eq!(notifications.try_recv().unwrap().message, "Signed out");
    }
}
