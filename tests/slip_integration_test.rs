use async_trait::async_trait;
use httpmock::prelude::*;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use school_portal::core::Storage;
use school_portal::domain::model::{AdmissionSetting, RecordId, Registration};
use school_portal::domain::ports::SlipSource;
use school_portal::{ApiClient, LocalStorage, PortalError, SchoolBranding, SlipGenerator};
use serde_json::json;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockStorage {
    async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(path).cloned()
    }
}

impl Storage for MockStorage {
    async fn read_file(&self, path: &str) -> school_portal::Result<Vec<u8>> {
        self.get_file(path).await.ok_or_else(|| {
            PortalError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, path.to_string()))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> school_portal::Result<()> {
        self.files
            .lock()
            .await
            .insert(path.to_string(), data.to_vec());
        Ok(())
    }
}

/// Lookups that always fail, as when the backend is unreachable.
struct UnreachableSource;

#[async_trait]
impl SlipSource for UnreachableSource {
    async fn active_admission_setting(&self) -> school_portal::Result<Option<AdmissionSetting>> {
        Err(PortalError::ApiError {
            status: 503,
            message: "Service unavailable".to_string(),
        })
    }

    async fn fetch_image(&self, _url: &str) -> school_portal::Result<Vec<u8>> {
        Err(PortalError::ApiError {
            status: 403,
            message: "CORS".to_string(),
        })
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn branding(logo_url: Option<String>) -> SchoolBranding {
    SchoolBranding {
        name: "Green Valley School".to_string(),
        address: Some("12 Canal Road, Lahore".to_string()),
        phone: Some("042-1234567".to_string()),
        logo_url,
    }
}

fn registration() -> Registration {
    Registration {
        id: Some(RecordId::Number(42)),
        name: "Ali Raza".to_string(),
        father_name: Some("Raza Ahmed".to_string()),
        dob: Some("2012-05-04".to_string()),
        grade_name: Some("Grade 6".to_string()),
        mobile: Some("0300-1234567".to_string()),
        roll_number: Some("R-2024-0042".to_string()),
        ..Default::default()
    }
}

fn pdf_text(pdf: &[u8]) -> String {
    String::from_utf8_lossy(pdf).into_owned()
}

#[tokio::test]
async fn test_slip_without_profile_picture() {
    let server = MockServer::start();
    let setting_mock = server.mock(|when, then| {
        when.method(GET).path("/admission-settings/active");
        then.status(200).json_body(json!({
            "session": "2024-25",
            "testVenue": "Main Hall, Campus A",
            "testDate": "2024-03-15",
            "testTime": "14:05",
            "isActive": true
        }));
    });

    let api = ApiClient::new(&server.base_url(), 5).unwrap();
    let storage = MockStorage::default();
    let generator = SlipGenerator::new(api, storage.clone(), branding(None));

    let file_name = generator.generate(&registration()).await.unwrap();
    assert_eq!(file_name, "roll-number-slip-r-2024-0042.pdf");

    let pdf = storage.get_file(&file_name).await.unwrap();
    assert!(pdf.starts_with(b"%PDF-"));

    let text = pdf_text(&pdf);
    assert!(text.contains("(R-2024-0042)"));
    assert!(text.contains("(Admission Test 2024-25)"));
    assert!(text.contains("(Main Hall, Campus A)"));
    assert!(text.contains("(15/03/2024)"));
    assert!(text.contains("(02:05 PM)"));
    assert!(text.contains("(PHOTO)"));
    assert!(text.contains("(Scan to verify)"));
    assert!(!text.contains("/Photo Do"));

    setting_mock.assert();
}

#[tokio::test]
async fn test_slip_embeds_photo_and_logo() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admission-settings/active");
        then.status(404);
    });
    let photo_mock = server.mock(|when, then| {
        when.method(GET).path("/uploads/42.png");
        then.status(200)
            .header("Content-Type", "image/png")
            .body(png(30, 40));
    });
    let logo_mock = server.mock(|when, then| {
        when.method(GET).path("/static/logo.png");
        then.status(200)
            .header("Content-Type", "image/png")
            .body(png(16, 16));
    });

    let mut registration = registration();
    registration.profile_picture_url = Some(server.url("/uploads/42.png"));

    let api = ApiClient::new(&server.base_url(), 5).unwrap();
    let generator = SlipGenerator::new(
        api,
        MockStorage::default(),
        branding(Some(server.url("/static/logo.png"))),
    );

    let pdf = generator.render(&registration).await.unwrap();
    let text = pdf_text(&pdf);

    assert!(text.contains("/Photo Do"));
    assert!(text.contains("/Logo Do"));
    assert!(!text.contains("(PHOTO)"));
    assert!(text.contains("(To be announced)"));

    photo_mock.assert();
    logo_mock.assert();
}

#[tokio::test]
async fn test_registration_logistics_override_setting() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admission-settings/active");
        then.status(200).json_body(json!({
            "data": {"testVenue": "Campus B", "testDate": "2024-04-01", "testTime": "09:00"}
        }));
    });

    let mut registration = registration();
    registration.test_venue = Some("Science Block".to_string());

    let api = ApiClient::new(&server.base_url(), 5).unwrap();
    let generator = SlipGenerator::new(api, MockStorage::default(), branding(None));

    let text = pdf_text(&generator.render(&registration).await.unwrap());
    assert!(text.contains("(Science Block)"));
    assert!(!text.contains("(Campus B)"));
    assert!(text.contains("(01/04/2024)"));
    assert!(text.contains("(09:00 AM)"));
}

#[tokio::test]
async fn test_broken_image_is_skipped() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admission-settings/active");
        then.status(200).json_body(json!(null));
    });
    server.mock(|when, then| {
        when.method(GET).path("/uploads/42.png");
        then.status(200).body("<html>not an image</html>");
    });

    let mut registration = registration();
    registration.profile_picture_url = Some(server.url("/uploads/42.png"));

    let api = ApiClient::new(&server.base_url(), 5).unwrap();
    let generator = SlipGenerator::new(api, MockStorage::default(), branding(None));

    let text = pdf_text(&generator.render(&registration).await.unwrap());
    assert!(text.contains("(PHOTO)"));
}

#[tokio::test]
async fn test_unreachable_backend_still_renders() {
    let generator = SlipGenerator::new(
        UnreachableSource,
        MockStorage::default(),
        branding(Some("https://cdn.example/logo.png".to_string())),
    );

    let mut registration = registration();
    registration.profile_picture_url = Some("https://cdn.example/42.png".to_string());

    let text = pdf_text(&generator.render(&registration).await.unwrap());
    assert!(text.contains("(PHOTO)"));
    assert!(text.contains("(To be announced)"));
    assert!(text.contains("(Admission Test)"));
}

#[tokio::test]
async fn test_unencodable_qr_payload_still_renders() {
    let mut registration = registration();
    registration.father_name = Some("x".repeat(8000));

    let generator = SlipGenerator::new(UnreachableSource, MockStorage::default(), branding(None));
    let pdf = generator.render(&registration).await.unwrap();

    assert!(pdf.starts_with(b"%PDF-"));
    let text = pdf_text(&pdf);
    assert!(text.contains("(R-2024-0042)"));
    assert!(!text.contains("(Scan to verify)"));
}

#[tokio::test]
async fn test_missing_identity_fails_generically() {
    let generator = SlipGenerator::new(UnreachableSource, MockStorage::default(), branding(None));

    let err = generator
        .render(&Registration::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to generate PDF");
    assert!(matches!(err, PortalError::SlipGeneration { .. }));
}

#[tokio::test]
async fn test_slip_written_to_local_disk() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    let generator = SlipGenerator::new(UnreachableSource, storage, branding(None));

    let file_name = generator.generate(&registration()).await.unwrap();

    let full_path = temp_dir.path().join(&file_name);
    assert!(full_path.exists());
    let bytes = std::fs::read(full_path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}
