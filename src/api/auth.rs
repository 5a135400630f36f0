use super::ApiClient;
use crate::domain::model::{Session, User};
use crate::forms::{FormValidate, LoginForm};
use crate::utils::error::Result;
use reqwest::Method;

impl ApiClient {
    /// Logs in and keeps the issued token on this client.
    pub async fn login(&mut self, form: &LoginForm) -> Result<Session> {
        form.validate()?;
        let session: Session = self.post("auth/login", form).await?;
        tracing::info!("Logged in as {}", form.email);
        self.set_token(Some(session.token.clone()));
        Ok(session)
    }

    /// Ends the session. The local token is dropped even if the backend call fails.
    pub async fn logout(&mut self) -> Result<()> {
        if self.token().is_none() {
            return Ok(());
        }
        let result = self.send_empty(Method::POST, "auth/logout").await;
        self.set_token(None);
        if let Err(e) = &result {
            tracing::warn!("Logout request failed: {}", e);
        }
        result
    }

    pub async fn current_user(&self) -> Result<User> {
        self.require_token()?;
        self.get("auth/me").await
    }
}
