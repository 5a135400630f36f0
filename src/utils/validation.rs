use crate::utils::error::{PortalError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

static CNIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-?\d{7}-?\d$").expect("cnic pattern compiles"));

pub const PHONE_DIGITS: usize = 11;

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PortalError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Checks an upload's extension against an allow-list, case-insensitively.
pub fn validate_file_extension(file: &Path, allowed_extensions: &[&str]) -> Result<()> {
    let name = file.display().to_string();
    let extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| PortalError::UploadError {
            file: name.clone(),
            reason: "File has no extension".to_string(),
        })?;

    if !allowed_extensions.contains(&extension.as_str()) {
        return Err(PortalError::UploadError {
            file: name,
            reason: format!(
                "Unsupported file type .{}. Allowed: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

fn phone_digits(phone: &str) -> Option<String> {
    let mut digits = String::with_capacity(PHONE_DIGITS);
    for c in phone.trim().chars() {
        match c {
            '0'..='9' => digits.push(c),
            '-' | ' ' => {}
            _ => return None,
        }
    }
    Some(digits)
}

/// Pakistani mobile numbers: exactly 11 digits starting with `03`.
/// Mask separators (`-` and spaces) are ignored.
pub fn validate_pk_phone(phone: &str) -> bool {
    match phone_digits(phone) {
        Some(digits) => digits.len() == PHONE_DIGITS && digits.starts_with("03"),
        None => false,
    }
}

/// Formats raw input as `03XX-XXXXXXX` while it is being typed.
pub fn apply_phone_mask(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .collect();

    if digits.len() > 4 {
        format!("{}-{}", &digits[..4], &digits[4..])
    } else {
        digits
    }
}

/// National identity card number, with or without dashes.
pub fn validate_cnic(cnic: &str) -> bool {
    CNIC_RE.is_match(cnic.trim())
}
