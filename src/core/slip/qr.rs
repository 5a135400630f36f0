use crate::domain::model::{Registration, TestLogistics};
use crate::utils::error::{PortalError, Result};
use qrcode::{Color, QrCode};

/// Light border around the symbol, in modules.
pub const QUIET_ZONE: usize = 4;

#[derive(Debug, Clone)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl QrMatrix {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }

    /// Coordinates of every dark module, row by row.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.width)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_dark(x, y))
    }
}

pub fn encode(payload: &str) -> Result<QrMatrix> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| PortalError::QrError {
        message: e.to_string(),
    })?;
    let width = code.width();
    let dark = code
        .to_colors()
        .into_iter()
        .map(|c| c == Color::Dark)
        .collect();
    Ok(QrMatrix { width, dark })
}

/// JSON summary a verifier reads back from the slip's QR code.
pub fn verification_payload(
    registration: &Registration,
    logistics: &TestLogistics,
) -> Result<String> {
    let summary = serde_json::json!({
        "rollNumber": registration.roll_number,
        "name": registration.name,
        "fatherName": registration.father_name,
        "grade": registration.grade_label(),
        "testDate": logistics.date,
        "testTime": logistics.time,
        "testVenue": logistics.venue,
    });
    Ok(serde_json::to_string(&summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_square_matrix() {
        let matrix = encode(r#"{"rollNumber":"R-2024-0042"}"#).unwrap();
        // Version 1 is 21 modules wide; every version adds 4.
        assert!(matrix.width() >= 21);
        assert_eq!((matrix.width() - 21) % 4, 0);
        // Finder pattern corners are always dark.
        assert!(matrix.is_dark(0, 0));
        assert!(matrix.is_dark(matrix.width() - 1, 0));
        assert!(matrix.is_dark(0, matrix.width() - 1));
        assert!(!matrix.is_dark(matrix.width(), 0));
        assert!(matrix.dark_modules().count() > 0);
    }

    #[test]
    fn test_verification_payload_fields() {
        let registration = Registration {
            name: "Ali Raza".to_string(),
            father_name: Some("Raza Ahmed".to_string()),
            grade_name: Some("Grade 6".to_string()),
            roll_number: Some("R-2024-0042".to_string()),
            ..Default::default()
        };
        let logistics = TestLogistics {
            venue: Some("Main Hall".to_string()),
            date: Some("2024-03-15".to_string()),
            time: None,
        };
        let payload = verification_payload(&registration, &logistics).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["rollNumber"], "R-2024-0042");
        assert_eq!(value["grade"], "Grade 6");
        assert_eq!(value["testVenue"], "Main Hall");
        assert!(value["testTime"].is_null());
    }

    #[test]
    fn test_oversized_payload_is_an_error() {
        let payload = "x".repeat(8000);
        assert!(matches!(encode(&payload), Err(PortalError::QrError { .. })));
    }
}
