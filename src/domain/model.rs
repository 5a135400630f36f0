use serde::{Deserialize, Serialize};

/// Identifiers are opaque to this crate; backends hand out either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(value.to_string()),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "Male", alias = "MALE")]
    Male,
    #[serde(alias = "Female", alias = "FEMALE")]
    Female,
    #[serde(other)]
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Option<RecordId>,
    pub name: String,
    pub grade_name: Option<String>,
    pub roll_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    pub id: Option<RecordId>,
    pub name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub cnic: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    #[serde(default)]
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    Staff,
    #[serde(other)]
    Other,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Teacher => "teacher",
            UserRole::Staff => "staff",
            UserRole::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub subject: Option<String>,
    pub qualification: Option<String>,
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Option<RecordId>,
    pub name: String,
    pub father_name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<Gender>,
    pub grade_id: Option<RecordId>,
    pub grade_name: Option<String>,
    pub mobile: Option<String>,
    pub whats_app: Option<String>,
    pub email: Option<String>,
    pub roll_number: Option<String>,
    pub profile_picture_url: Option<String>,
    pub test_venue: Option<String>,
    pub test_date: Option<String>,
    pub test_time: Option<String>,
    pub status: Option<String>,
}

impl Registration {
    /// Grade label, falling back to the raw grade id.
    pub fn grade_label(&self) -> Option<String> {
        self.grade_name
            .clone()
            .or_else(|| self.grade_id.as_ref().map(|id| id.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    pub id: Option<RecordId>,
    pub registration_id: Option<RecordId>,
    pub student_name: String,
    pub grade_name: Option<String>,
    pub fee_amount: Option<f64>,
    pub payment_status: Option<String>,
    pub payment_attachment_url: Option<String>,
    pub admission_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionSetting {
    pub id: Option<RecordId>,
    pub session: Option<String>,
    pub test_venue: Option<String>,
    pub test_date: Option<String>,
    pub test_time: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(alias = "accessToken")]
    pub token: String,
    pub user: Option<User>,
}

/// Test logistics printed on a roll number slip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestLogistics {
    pub venue: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl TestLogistics {
    pub fn from_registration(registration: &Registration) -> Self {
        Self {
            venue: non_blank(&registration.test_venue),
            date: non_blank(&registration.test_date),
            time: non_blank(&registration.test_time),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.venue.is_some() && self.date.is_some() && self.time.is_some()
    }

    /// Fills only the values still missing; values already set win.
    pub fn fill_from(&mut self, setting: &AdmissionSetting) {
        if self.venue.is_none() {
            self.venue = non_blank(&setting.test_venue);
        }
        if self.date.is_none() {
            self.date = non_blank(&setting.test_date);
        }
        if self.time.is_none() {
            self.time = non_blank(&setting.test_time);
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_deserializes_camel_case() {
        let json = serde_json::json!({
            "id": 42,
            "name": "Ali Raza",
            "fatherName": "Raza Ahmed",
            "gender": "male",
            "gradeId": "7",
            "whatsApp": "03001234567",
            "rollNumber": "R-2024-0042",
            "testVenue": ""
        });
        let registration: Registration = serde_json::from_value(json).unwrap();
        assert_eq!(registration.id, Some(RecordId::Number(42)));
        assert_eq!(registration.father_name.as_deref(), Some("Raza Ahmed"));
        assert_eq!(registration.gender, Some(Gender::Male));
        assert_eq!(registration.grade_label().as_deref(), Some("7"));
        assert!(registration.profile_picture_url.is_none());
    }

    #[test]
    fn test_unknown_role_is_tolerated() {
        let user: User = serde_json::from_value(serde_json::json!({
            "name": "Sara",
            "email": "sara@example.com",
            "role": "librarian"
        }))
        .unwrap();
        assert_eq!(user.role, Some(UserRole::Other));
    }

    #[test]
    fn test_logistics_fill_keeps_explicit_values() {
        let registration = Registration {
            test_venue: Some("Main Hall".to_string()),
            test_date: Some("  ".to_string()),
            ..Default::default()
        };
        let mut logistics = TestLogistics::from_registration(&registration);
        assert!(!logistics.is_complete());

        logistics.fill_from(&AdmissionSetting {
            test_venue: Some("Campus B".to_string()),
            test_date: Some("2024-03-15".to_string()),
            test_time: Some("09:00".to_string()),
            is_active: true,
            ..Default::default()
        });

        assert_eq!(logistics.venue.as_deref(), Some("Main Hall"));
        assert_eq!(logistics.date.as_deref(), Some("2024-03-15"));
        assert_eq!(logistics.time.as_deref(), Some("09:00"));
        assert!(logistics.is_complete());
    }
}
