use super::ApiClient;
use crate::domain::model::{Guardian, RecordId, Student};
use crate::forms::{FormValidate, GuardianForm};
use crate::utils::error::Result;
use reqwest::Method;

impl ApiClient {
    pub async fn list_guardians(&self) -> Result<Vec<Guardian>> {
        self.get("guardians").await
    }

    pub async fn get_guardian(&self, id: &RecordId) -> Result<Guardian> {
        self.get(&format!("guardians/{}", id)).await
    }

    pub async fn guardian_students(&self, id: &RecordId) -> Result<Vec<Student>> {
        self.get(&format!("guardians/{}/students", id)).await
    }

    /// Fetches the guardian and their students concurrently.
    pub async fn guardian_with_students(&self, id: &RecordId) -> Result<Guardian> {
        let (mut guardian, students) =
            tokio::try_join!(self.get_guardian(id), self.guardian_students(id))?;
        guardian.students = students;
        Ok(guardian)
    }

    pub async fn create_guardian(&self, form: &GuardianForm) -> Result<Guardian> {
        form.validate()?;
        self.post("guardians", form).await
    }

    pub async fn update_guardian(&self, id: &RecordId, form: &GuardianForm) -> Result<Guardian> {
        form.validate()?;
        self.put(&format!("guardians/{}", id), form).await
    }

    pub async fn delete_guardian(&self, id: &RecordId) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("guardians/{}", id))
            .await
    }
}
