use crate::config::AppConfig;
use crate::core::normalize::FieldNormalizer;
use crate::core::payload::PayloadBuilder;
use crate::core::submit::SubmissionClient;
use crate::domain::model::{Outcome, RunSummary};
use crate::domain::ports::{RecordSource, Storage};
use crate::utils::error::Result;

/// Drives the full run: ingest, normalize, build payloads, submit one record
/// at a time in source order, aggregate outcomes.
pub struct MigrationEngine<R: RecordSource, S: Storage> {
    source: R,
    storage: S,
    config: AppConfig,
}

impl<R: RecordSource, S: Storage> MigrationEngine<R, S> {
    pub fn new(source: R, storage: S, config: AppConfig) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let normalizer = FieldNormalizer::new(self.config.column_rule);
        let builder = PayloadBuilder::new(self.config.schema_variant, self.config.column_rule);
        let client = SubmissionClient::new(&self.config)?;

        // Extract
        tracing::info!("Reading agent records from {}", self.config.input_path);
        let raw_records = self.source.records().await?;
        tracing::info!("Loaded {} agent records", raw_records.len());

        // 先構建全部 payload，缺欄位時立即中止，不送出任何壞請求
        let mut payloads = Vec::with_capacity(raw_records.len());
        for (row, record) in raw_records.iter().enumerate() {
            let clean = normalizer.normalize(record);
            payloads.push(builder.build(&clean, row)?);
        }

        if self.config.dry_run {
            for payload in &payloads {
                tracing::info!("Would submit {} ({})", payload.email, payload.name);
            }
            tracing::info!(
                "🔍 Dry run: {} payloads built, nothing submitted",
                payloads.len()
            );
            return Ok(RunSummary::default());
        }

        // Submit sequentially; a record's failure marks it, never aborts the run
        let mut summary = RunSummary::default();
        for payload in &payloads {
            let outcome = client.create_user(payload).await;
            log_outcome(&outcome);
            summary.record(&outcome);
        }

        self.persist_failed_list(&summary).await?;

        tracing::info!(
            "Run complete: {} attempted, {} created, {} failed",
            summary.attempted,
            summary.created,
            summary.failed()
        );
        Ok(summary)
    }

    async fn persist_failed_list(&self, summary: &RunSummary) -> Result<()> {
        if summary.failed_emails.is_empty() {
            return Ok(());
        }

        let filename = format!(
            "failed_emails_{}.txt",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let mut contents = summary.failed_emails.join("\n");
        contents.push('\n');

        self.storage
            .write_file(&filename, contents.as_bytes())
            .await?;
        tracing::info!("📁 Failed email list saved to {}", filename);
        Ok(())
    }
}

fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Created { email, .. } => tracing::info!("Created user {}", email),
        Outcome::SkippedDuplicate { email, .. } => {
            tracing::warn!("User already exists: {}, skipping", email)
        }
        Outcome::InvalidPhone { email, message } => {
            tracing::warn!("Invalid phone number for {}: {}", email, message)
        }
        Outcome::UnexpectedApiError {
            email,
            status,
            message,
        } => tracing::warn!("Unexpected error for {} (status {}): {}", email, status, message),
        Outcome::MalformedResponse {
            email,
            http_status,
            body,
        } => tracing::warn!("Non-JSON response for {} (status {}): {}", email, http_status, body),
        Outcome::TransportError { email, detail } => {
            tracing::error!("🚨 Request error for {}: {}", email, detail)
        }
    }
}
