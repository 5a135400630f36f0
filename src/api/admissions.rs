use super::ApiClient;
use crate::domain::model::{Admission, AdmissionSetting, RecordId};
use crate::domain::ports::SlipSource;
use crate::forms::{AdmissionForm, FormValidate};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use reqwest::Method;
use std::path::Path;

pub const PAYMENT_ATTACHMENT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "pdf"];

impl ApiClient {
    pub async fn list_admissions(&self) -> Result<Vec<Admission>> {
        self.get("admissions").await
    }

    pub async fn get_admission(&self, id: &RecordId) -> Result<Admission> {
        self.get(&format!("admissions/{}", id)).await
    }

    pub async fn create_admission(&self, form: &AdmissionForm) -> Result<Admission> {
        form.validate()?;
        self.post("admissions", form).await
    }

    pub async fn update_admission(&self, id: &RecordId, form: &AdmissionForm) -> Result<Admission> {
        form.validate()?;
        self.put(&format!("admissions/{}", id), form).await
    }

    pub async fn delete_admission(&self, id: &RecordId) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("admissions/{}", id))
            .await
    }

    pub async fn upload_payment_attachment(&self, id: &RecordId, file: &Path) -> Result<Admission> {
        self.upload(
            &format!("admissions/{}/payment-attachment", id),
            file,
            &PAYMENT_ATTACHMENT_EXTENSIONS,
        )
        .await
    }

    pub async fn list_admission_settings(&self) -> Result<Vec<AdmissionSetting>> {
        self.get("admission-settings").await
    }

    /// The setting flagged active. A 404 means none is configured.
    pub async fn active_admission_setting(&self) -> Result<Option<AdmissionSetting>> {
        match self
            .get::<Option<AdmissionSetting>>("admission-settings/active")
            .await
        {
            Ok(setting) => Ok(setting),
            Err(PortalError::ApiError { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SlipSource for ApiClient {
    async fn active_admission_setting(&self) -> Result<Option<AdmissionSetting>> {
        ApiClient::active_admission_setting(self).await
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        self.download(url).await
    }
}
