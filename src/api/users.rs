use super::ApiClient;
use crate::domain::model::{RecordId, User, UserRole};
use crate::forms::{FormValidate, UserForm};
use crate::utils::error::Result;
use reqwest::Method;

impl ApiClient {
    /// All users, or only those with `role` when given.
    pub async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>> {
        match role {
            Some(role) => self.get_query("users", &[("role", role.as_str())]).await,
            None => self.get("users").await,
        }
    }

    pub async fn list_teachers(&self) -> Result<Vec<User>> {
        self.list_users(Some(UserRole::Teacher)).await
    }

    pub async fn get_user(&self, id: &RecordId) -> Result<User> {
        self.get(&format!("users/{}", id)).await
    }

    pub async fn create_user(&self, form: &UserForm) -> Result<User> {
        form.validate()?;
        self.post("users", form).await
    }

    pub async fn update_user(&self, id: &RecordId, form: &UserForm) -> Result<User> {
        form.validate()?;
        self.put(&format!("users/{}", id), form).await
    }

    pub async fn delete_user(&self, id: &RecordId) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("users/{}", id))
            .await
    }
}
