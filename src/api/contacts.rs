use super::ApiClient;
use crate::domain::model::{ContactMessage, RecordId};
use crate::forms::{ContactForm, FormValidate};
use crate::utils::error::Result;
use reqwest::Method;

impl ApiClient {
    /// Public contact form; no session needed.
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<ContactMessage> {
        form.validate()?;
        self.post("contacts", form).await
    }

    pub async fn list_contacts(&self) -> Result<Vec<ContactMessage>> {
        self.require_token()?;
        self.get("contacts").await
    }

    pub async fn delete_contact(&self, id: &RecordId) -> Result<()> {
        self.require_token()?;
        self.send_empty(Method::DELETE, &format!("contacts/{}", id))
            .await
    }
}
