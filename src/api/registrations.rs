use super::ApiClient;
use crate::domain::model::{RecordId, Registration};
use crate::forms::{FormValidate, RegistrationForm};
use crate::utils::error::{PortalError, Result};
use reqwest::Method;
use std::path::Path;

pub const PROFILE_PICTURE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

impl ApiClient {
    pub async fn list_registrations(&self) -> Result<Vec<Registration>> {
        self.get("registrations").await
    }

    pub async fn get_registration(&self, id: &RecordId) -> Result<Registration> {
        self.get(&format!("registrations/{}", id)).await
    }

    /// Looks a registration up by its assigned roll number.
    pub async fn find_by_roll_number(&self, roll_number: &str) -> Result<Registration> {
        let matches: Vec<Registration> = self
            .get_query("registrations", &[("rollNumber", roll_number)])
            .await?;
        matches
            .into_iter()
            .find(|r| {
                r.roll_number
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(roll_number))
            })
            .ok_or_else(|| PortalError::ApiError {
                status: 404,
                message: format!("No registration found for roll number {}", roll_number),
            })
    }

    pub async fn create_registration(&self, form: &RegistrationForm) -> Result<Registration> {
        form.validate()?;
        self.post("registrations", form).await
    }

    pub async fn update_registration(
        &self,
        id: &RecordId,
        form: &RegistrationForm,
    ) -> Result<Registration> {
        form.validate()?;
        self.put(&format!("registrations/{}", id), form).await
    }

    pub async fn delete_registration(&self, id: &RecordId) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("registrations/{}", id))
            .await
    }

    pub async fn upload_profile_picture(&self, id: &RecordId, file: &Path) -> Result<Registration> {
        self.upload(
            &format!("registrations/{}/profile-picture", id),
            file,
            &PROFILE_PICTURE_EXTENSIONS,
        )
        .await
    }
}
