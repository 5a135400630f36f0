use crate::domain::model::AdmissionSetting;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn max_upload_bytes(&self) -> u64;
}

/// Remote lookups the slip renderer depends on.
#[async_trait]
pub trait SlipSource: Send + Sync {
    /// The admission setting currently marked active, if the backend has one.
    async fn active_admission_setting(&self) -> Result<Option<AdmissionSetting>>;

    /// Raw bytes of a remote image (profile picture or school logo).
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}
