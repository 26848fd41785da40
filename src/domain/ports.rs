use crate::domain::model::RawRecord;
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

/// Yields the full ordered sequence of raw records from the tabular input.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn records(&self) -> Result<Vec<RawRecord>>;
}
