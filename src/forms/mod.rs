//! Form payloads sent to the backend, each with field-level validation.
//!
//! Validation mirrors what the dashboard shows inline: every failing field
//! gets one message and the request is never sent.

use crate::domain::model::{Gender, RecordId, UserRole};
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{validate_cnic, validate_email, validate_pk_phone};
use serde::Serialize;
use std::fmt;

/// Field name to message, in the order the fields appear on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<(String, String)>);

impl FieldErrors {
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    /// Keeps the first message reported for a field.
    pub fn add(&mut self, field: &str, message: &str) {
        if self.get(field).is_none() {
            self.0.push((field.to_string(), message.to_string()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PortalError::ValidationError(self))
        }
    }

    fn required(&mut self, field: &str, label: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, &format!("{} is required", label));
            false
        } else {
            true
        }
    }

    fn email(&mut self, field: &str, value: &str) {
        if !validate_email(value) {
            self.add(field, "Please enter a valid email address");
        }
    }

    fn phone(&mut self, field: &str, value: &str) {
        if !validate_pk_phone(value) {
            self.add(field, "Phone number must be 11 digits in the format 03XX-XXXXXXX");
        }
    }

    fn optional_email(&mut self, field: &str, value: &Option<String>) {
        if let Some(v) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            self.email(field, v);
        }
    }

    fn optional_phone(&mut self, field: &str, value: &Option<String>) {
        if let Some(v) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            self.phone(field, v);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

pub trait FormValidate {
    fn field_errors(&self) -> FieldErrors;

    fn validate(&self) -> Result<()> {
        self.field_errors().into_result()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl FormValidate for LoginForm {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if errors.required("email", "Email", &self.email) {
            errors.email("email", &self.email);
        }
        errors.required("password", "Password", &self.password);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianForm {
    pub name: String,
    pub email: Option<String>,
    pub mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

impl FormValidate for GuardianForm {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.required("name", "Name", &self.name);
        errors.optional_email("email", &self.email);
        if errors.required("mobile", "Mobile number", &self.mobile) {
            errors.phone("mobile", &self.mobile);
        }
        if let Some(cnic) = self.cnic.as_deref().filter(|c| !c.trim().is_empty()) {
            if !validate_cnic(cnic) {
                errors.add("cnic", "CNIC must be in the format XXXXX-XXXXXXX-X");
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    /// Only sent on create, or when the password is being changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

pub const MIN_PASSWORD_LEN: usize = 8;

impl FormValidate for UserForm {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.required("name", "Name", &self.name);
        if errors.required("email", "Email", &self.email) {
            errors.email("email", &self.email);
        }
        errors.optional_phone("phone", &self.phone);
        if self.role == UserRole::Teacher {
            let subject = self.subject.as_deref().unwrap_or_default();
            errors.required("subject", "Subject", subject);
        }
        if let Some(password) = &self.password {
            if password.chars().count() < MIN_PASSWORD_LEN {
                errors.add(
                    "password",
                    &format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
                );
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub father_name: String,
    pub dob: String,
    pub gender: Option<Gender>,
    pub grade_id: Option<RecordId>,
    pub mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whats_app: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl FormValidate for RegistrationForm {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.required("name", "Student name", &self.name);
        errors.required("fatherName", "Father name", &self.father_name);
        if errors.required("dob", "Date of birth", &self.dob)
            && chrono::NaiveDate::parse_from_str(self.dob.trim(), "%Y-%m-%d").is_err()
        {
            errors.add("dob", "Date of birth must be a valid date (YYYY-MM-DD)");
        }
        if self.gender.is_none() {
            errors.add("gender", "Gender is required");
        }
        if self.grade_id.is_none() {
            errors.add("gradeId", "Grade is required");
        }
        if errors.required("mobile", "Mobile number", &self.mobile) {
            errors.phone("mobile", &self.mobile);
        }
        errors.optional_phone("whatsApp", &self.whats_app);
        errors.optional_email("email", &self.email);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

pub const MIN_MESSAGE_LEN: usize = 10;

impl FormValidate for ContactForm {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.required("name", "Name", &self.name);
        if errors.required("email", "Email", &self.email) {
            errors.email("email", &self.email);
        }
        errors.optional_phone("phone", &self.phone);
        if errors.required("message", "Message", &self.message)
            && self.message.trim().chars().count() < MIN_MESSAGE_LEN
        {
            errors.add(
                "message",
                &format!("Message must be at least {} characters", MIN_MESSAGE_LEN),
            );
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionForm {
    pub registration_id: Option<RecordId>,
    pub student_name: String,
    pub grade_id: Option<RecordId>,
    pub fee_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,
}

impl FormValidate for AdmissionForm {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.registration_id.is_none() {
            errors.add("registrationId", "Registration is required");
        }
        errors.required("studentName", "Student name", &self.student_name);
        if self.grade_id.is_none() {
            errors.add("gradeId", "Grade is required");
        }
        match self.fee_amount {
            Some(fee) if fee.is_finite() && fee >= 0.0 => {}
            Some(_) => errors.add("feeAmount", "Fee amount must be a positive number"),
            None => errors.add("feeAmount", "Fee amount is required"),
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_registration() -> RegistrationForm {
        RegistrationForm {
            name: "Ali Raza".to_string(),
            father_name: "Raza Ahmed".to_string(),
            dob: "2012-05-04".to_string(),
            gender: Some(Gender::Male),
            grade_id: Some(RecordId::Number(6)),
            mobile: "0300-1234567".to_string(),
            whats_app: None,
            email: Some("raza@example.com".to_string()),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(valid_registration().validate().is_ok());
    }

    #[test]
    fn test_registration_reports_each_field() {
        let form = RegistrationForm {
            name: " ".to_string(),
            dob: "04/05/2012".to_string(),
            mobile: "12345".to_string(),
            whats_app: Some("0300123".to_string()),
            email: Some("not-an-email".to_string()),
            ..valid_registration()
        };
        let errors = form.field_errors();
        assert_eq!(errors.get("name"), Some("Student name is required"));
        assert!(errors.get("dob").is_some());
        assert!(errors.get("mobile").is_some());
        assert!(errors.get("whatsApp").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("fatherName").is_none());
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_first_message_per_field_wins() {
        let form = GuardianForm {
            name: "Raza Ahmed".to_string(),
            mobile: String::new(),
            ..Default::default()
        };
        let errors = form.field_errors();
        assert_eq!(errors.get("mobile"), Some("Mobile number is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_teacher_requires_subject() {
        let form = UserForm {
            name: "Sara Malik".to_string(),
            email: "sara@example.com".to_string(),
            phone: None,
            role: UserRole::Teacher,
            subject: None,
            qualification: None,
            password: Some("short".to_string()),
        };
        let errors = form.field_errors();
        assert!(errors.get("subject").is_some());
        assert!(errors.get("password").is_some());
    }

    #[test]
    fn test_contact_message_length() {
        let form = ContactForm {
            name: "Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            message: "Hi".to_string(),
            ..Default::default()
        };
        match form.validate() {
            Err(PortalError::ValidationError(errors)) => {
                assert_eq!(errors.iter().next().map(|(f, _)| f), Some("message"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_admission_fee_must_be_positive() {
        let form = AdmissionForm {
            registration_id: Some(RecordId::Number(1)),
            student_name: "Ali Raza".to_string(),
            grade_id: Some(RecordId::Number(6)),
            fee_amount: Some(-5.0),
            ..Default::default()
        };
        assert_eq!(
            form.field_errors().get("feeAmount"),
            Some("Fee amount must be a positive number")
        );
    }

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: "admin@school.edu.pk".to_string(),
            password: String::new(),
        };
        let errors = form.field_errors();
        assert_eq!(errors.get("password"), Some("Password is required"));
        assert!(errors.get("email").is_none());
    }
}
