//! Thin typed wrappers around the school backend's REST API.
//!
//! Each resource lives in its own module as an `impl ApiClient` block; this
//! module owns the transport: URL building, bearer auth, response envelopes
//! and error extraction.

pub mod admissions;
pub mod auth;
pub mod contacts;
pub mod guardians;
pub mod registrations;
pub mod users;

use crate::core::ConfigProvider;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{validate_file_extension, validate_url};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

/// Backends answer either with the resource itself or wrapped in `{"data": ...}`.
///
/// Only an object that actually carries a `data` key is unwrapped, so a bare
/// resource with optional fields is never mistaken for an empty envelope.
fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let inner = match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    };
    Ok(serde_json::from_value(inner)?)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    max_upload_bytes: u64,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        validate_url("api.base_url", base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut api = Self::new(config.base_url(), config.timeout_seconds())?;
        api.max_upload_bytes = config.max_upload_bytes();
        Ok(api)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| PortalError::AuthError {
            message: "You need to log in first".to_string(),
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        decode(response).await
    }

    pub(crate) async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        decode(response).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        decode(response).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        decode(response).await
    }

    /// Sends a request whose response body is ignored.
    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> Result<()> {
        let response = self.request(method, path).send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// Multipart upload of a local file under the `file` part.
    pub(crate) async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        file: &Path,
        allowed_extensions: &[&str],
    ) -> Result<T> {
        validate_file_extension(file, allowed_extensions)?;

        let bytes = tokio::fs::read(file).await?;
        let size = bytes.len() as u64;
        if size > self.max_upload_bytes {
            return Err(PortalError::UploadError {
                file: file.display().to_string(),
                reason: format!(
                    "File is {} bytes, the limit is {} bytes",
                    size, self.max_upload_bytes
                ),
            });
        }

        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime_for(file))?;
        let form = Form::new().part("file", part);

        tracing::debug!("Uploading {} ({} bytes)", file_name, size);
        let response = self
            .request(Method::POST, path)
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    /// Downloads raw bytes. Relative URLs resolve against the API base.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let builder = if url.starts_with("http://") || url.starts_with("https://") {
            tracing::debug!("GET {}", url);
            self.client.get(url)
        } else {
            self.request(Method::GET, url)
        };
        let response = check_status(builder.send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn mime_for(file: &Path) -> &'static str {
    match file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(status.as_u16(), &body);
    tracing::debug!("API responded {}: {}", status, message);
    Err(PortalError::ApiError {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    unwrap_envelope(&body)
}

/// Pulls a human-readable message out of an API error body.
///
/// Looks at `message`, then `error`, then the first entry of `errors`
/// (either a string or an object with a `message`/`msg`).
pub fn extract_error_message(status: u16, body: &str) -> String {
    let fallback = || format!("Request failed with status {}", status);

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };

    let as_text = |v: &serde_json::Value| -> Option<String> {
        match v {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Object(obj) => obj
                .get("message")
                .or_else(|| obj.get("msg"))
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        }
    };

    if let Some(message) = value.get("message").and_then(as_text) {
        return message;
    }
    if let Some(message) = value.get("error").and_then(as_text) {
        return message;
    }
    if let Some(first) = value
        .get("errors")
        .and_then(|e| e.as_array())
        .and_then(|errors| errors.first())
        .and_then(as_text)
    {
        return first;
    }
    fallback()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AdmissionSetting, Guardian};

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(422, r#"{"message":"Email already taken"}"#),
            "Email already taken"
        );
        assert_eq!(
            extract_error_message(400, r#"{"error":{"message":"Bad grade"}}"#),
            "Bad grade"
        );
        assert_eq!(
            extract_error_message(400, r#"{"errors":[{"msg":"mobile is invalid"}]}"#),
            "mobile is invalid"
        );
        assert_eq!(
            extract_error_message(500, "<html>oops</html>"),
            "Request failed with status 500"
        );
        assert_eq!(
            extract_error_message(404, r#"{"message":""}"#),
            "Request failed with status 404"
        );
    }

    #[test]
    fn test_envelope_accepts_both_shapes() {
        let wrapped: Vec<Guardian> =
            unwrap_envelope(r#"{"data":[{"name":"Raza Ahmed"}]}"#).unwrap();
        assert_eq!(wrapped[0].name, "Raza Ahmed");

        let bare: Vec<Guardian> = unwrap_envelope(r#"[{"name":"Fatima Noor"}]"#).unwrap();
        assert_eq!(bare[0].name, "Fatima Noor");
    }

    #[test]
    fn test_bare_optional_resource_is_kept() {
        let setting: Option<AdmissionSetting> = unwrap_envelope(
            r#"{"id":1,"session":"2024-25","testVenue":"Main Hall","testDate":"2024-03-15","testTime":"14:05","isActive":true}"#,
        )
        .unwrap();
        let setting = setting.expect("bare setting should decode");
        assert_eq!(setting.session.as_deref(), Some("2024-25"));
        assert_eq!(setting.test_venue.as_deref(), Some("Main Hall"));

        let wrapped: Option<AdmissionSetting> =
            unwrap_envelope(r#"{"data":{"testVenue":"Campus B"}}"#).unwrap();
        assert_eq!(wrapped.unwrap().test_venue.as_deref(), Some("Campus B"));

        let empty: Option<AdmissionSetting> = unwrap_envelope("null").unwrap();
        assert!(empty.is_none());
        let empty_data: Option<AdmissionSetting> = unwrap_envelope(r#"{"data":null}"#).unwrap();
        assert!(empty_data.is_none());
    }

    #[test]
    fn test_url_joining() {
        let api = ApiClient::new("https://api.school.example/v1/", 5).unwrap();
        assert_eq!(api.url("/guardians/7"), "https://api.school.example/v1/guardians/7");
        assert!(ApiClient::new("not a url", 5).is_err());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("receipt.PDF")), "application/pdf");
        assert_eq!(mime_for(Path::new("photo.jpeg")), "image/jpeg");
    }
}
