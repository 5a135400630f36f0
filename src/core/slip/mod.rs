//! Roll number slip rendering.
//!
//! One linear pass: resolve images, resolve test logistics, lay out the page,
//! embed the verification code, save. Images and the QR code are best-effort;
//! anything else aborts with [`PortalError::SlipGeneration`].

pub mod assets;
pub mod layout;
pub mod qr;

use crate::core::{SlipSource, Storage};
use crate::domain::model::{AdmissionSetting, Registration, TestLogistics};
use crate::forms::FieldErrors;
use crate::utils::error::{PortalError, Result};
use crate::utils::format::{format_date, format_time};
use assets::EmbeddedImage;
use layout::SlipContent;
use serde::{Deserialize, Serialize};

pub const NOT_ANNOUNCED: &str = "To be announced";
const MISSING: &str = "-";

pub const INSTRUCTIONS: [&str; 4] = [
    "Bring this slip and the original B-Form to the test centre.",
    "Report at the venue 30 minutes before the test time.",
    "Bring your own stationery. Mobile phones are not allowed.",
    "This slip is valid only for the candidate whose photo appears above.",
];

/// School details printed in the slip header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolBranding {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
}

pub struct SlipGenerator<S: SlipSource, T: Storage> {
    source: S,
    storage: T,
    branding: SchoolBranding,
}

impl<S: SlipSource, T: Storage> SlipGenerator<S, T> {
    pub fn new(source: S, storage: T, branding: SchoolBranding) -> Self {
        Self {
            source,
            storage,
            branding,
        }
    }

    /// Renders the slip and saves it, returning the file name written.
    pub async fn generate(&self, registration: &Registration) -> Result<String> {
        let pdf = self.render(registration).await?;
        let file_name = slip_file_name(registration);

        tracing::debug!("Writing slip ({} bytes) to storage", pdf.len());
        self.storage
            .write_file(&file_name, &pdf)
            .await
            .map_err(|e| {
                tracing::error!("❌ Could not save {}: {}", file_name, e);
                PortalError::slip_generation(e)
            })?;

        tracing::info!("📄 Roll number slip saved: {}", file_name);
        Ok(file_name)
    }

    /// Renders the slip to PDF bytes without saving it.
    pub async fn render(&self, registration: &Registration) -> Result<Vec<u8>> {
        self.build(registration).await.map_err(|e| {
            tracing::error!("❌ Slip generation failed: {}", e);
            PortalError::slip_generation(e)
        })
    }

    async fn build(&self, registration: &Registration) -> Result<Vec<u8>> {
        check_identity(registration)?;

        let photo = self
            .load_image("profile picture", registration.profile_picture_url.as_deref())
            .await;
        let logo = self
            .load_image("school logo", self.branding.logo_url.as_deref())
            .await;

        let (logistics, setting) = self.resolve_logistics(registration).await;

        let qr = match qr::verification_payload(registration, &logistics).and_then(|p| qr::encode(&p)) {
            Ok(matrix) => Some(matrix),
            Err(e) => {
                tracing::warn!("QR code skipped: {}", e);
                None
            }
        };

        let content = SlipContent {
            school_name: self.branding.name.clone(),
            school_address: self.branding.address.clone(),
            school_phone: self.branding.phone.clone(),
            subtitle: subtitle(setting.as_ref()),
            roll_number: registration
                .roll_number
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "Pending".to_string()),
            details: candidate_rows(registration),
            logistics: logistics_rows(&logistics),
            instructions: INSTRUCTIONS.iter().map(|s| s.to_string()).collect(),
            footer: "This is a computer generated slip and does not require a signature."
                .to_string(),
            photo,
            logo,
            qr,
        };

        layout::compose(&content)
    }

    /// Fetches and decodes a remote image; any failure leaves the slip without it.
    async fn load_image(&self, what: &str, url: Option<&str>) -> Option<EmbeddedImage> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;

        let bytes = match self.source.fetch_image(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Could not load {} from {}: {}", what, url, e);
                return None;
            }
        };

        match EmbeddedImage::decode(&bytes) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!("Could not decode {} from {}: {}", what, url, e);
                None
            }
        }
    }

    /// Registration values win; gaps come from the active admission setting.
    async fn resolve_logistics(
        &self,
        registration: &Registration,
    ) -> (TestLogistics, Option<AdmissionSetting>) {
        let mut logistics = TestLogistics::from_registration(registration);

        let setting = match self.source.active_admission_setting().await {
            Ok(setting) => setting,
            Err(e) => {
                tracing::warn!("Admission setting lookup failed: {}", e);
                None
            }
        };

        if let Some(setting) = &setting {
            logistics.fill_from(setting);
        } else if !logistics.is_complete() {
            tracing::warn!("No active admission setting; missing test details left unannounced");
        }

        (logistics, setting)
    }
}

fn check_identity(registration: &Registration) -> Result<()> {
    if registration.name.trim().is_empty() {
        return Err(PortalError::ValidationError(FieldErrors::single(
            "name",
            "Student name is required",
        )));
    }
    let has_roll_number = registration
        .roll_number
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty());
    if !has_roll_number && registration.id.is_none() {
        return Err(PortalError::ValidationError(FieldErrors::single(
            "rollNumber",
            "A roll number or registration id is required",
        )));
    }
    Ok(())
}

fn subtitle(setting: Option<&AdmissionSetting>) -> String {
    match setting.and_then(|s| s.session.as_deref()) {
        Some(session) => format!("Admission Test {}", session),
        None => "Admission Test".to_string(),
    }
}

fn or_missing(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

fn candidate_rows(registration: &Registration) -> Vec<(&'static str, String)> {
    vec![
        ("Student Name", registration.name.trim().to_string()),
        ("Father Name", or_missing(registration.father_name.as_deref())),
        (
            "Date of Birth",
            registration
                .dob
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| MISSING.to_string()),
        ),
        ("Gender", or_missing(registration.gender.map(|g| g.label()))),
        ("Grade", or_missing(registration.grade_label().as_deref())),
        ("Mobile", or_missing(registration.mobile.as_deref())),
        ("WhatsApp", or_missing(registration.whats_app.as_deref())),
        ("Email", or_missing(registration.email.as_deref())),
    ]
}

fn logistics_rows(logistics: &TestLogistics) -> Vec<(&'static str, String)> {
    let show = |value: &Option<String>, format: fn(&str) -> String| {
        value
            .as_deref()
            .map(format)
            .unwrap_or_else(|| NOT_ANNOUNCED.to_string())
    };
    vec![
        ("Venue", show(&logistics.venue, str::to_string)),
        ("Date", show(&logistics.date, format_date)),
        ("Reporting Time", show(&logistics.time, format_time)),
    ]
}

/// `roll-number-slip-<roll number or name>.pdf`, restricted to safe characters.
pub fn slip_file_name(registration: &Registration) -> String {
    let key = registration
        .roll_number
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(&registration.name);

    let mut slug = String::with_capacity(key.len());
    for c in key.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "roll-number-slip.pdf".to_string()
    } else {
        format!("roll-number-slip-{}.pdf", slug)
    }
}
