//! Migration coordinator
//!
//! Sequences the pipeline: list source and target cases, resolve the
//! correspondence, list the source run's results and transform them. Only
//! then are the two side effects started, concurrently: writing the mapping
//! table and submitting the records. Both are awaited before the summary is
//! returned, whatever the other one did.

use crate::adapters::qase::{QaseApi, QaseClient};
use crate::config::MigrateConfig;
use crate::core::correspondence::resolve;
use crate::core::fetch::PagedFetcher;
use crate::core::migrate::summary::{MigrationSummary, SubmissionFailure};
use crate::core::persist::MappingPersister;
use crate::core::submit::BulkSubmitter;
use crate::core::transform::ResultTransformer;
use crate::domain::{CustomFieldId, MigrateError, ProjectCode, Result, RunId};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Validated, typed migration parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    pub source_project: ProjectCode,
    pub target_project: ProjectCode,
    pub custom_field: CustomFieldId,
    pub source_run: RunId,
    pub target_run: RunId,
    pub page_size: usize,
    pub batch_size: usize,
    pub mapping_path: PathBuf,
    pub pairs_path: Option<PathBuf>,
    pub dry_run: bool,
}

impl MigrationPlan {
    /// Build the plan from a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first missing or invalid
    /// value.
    pub fn from_config(config: &MigrateConfig) -> Result<Self> {
        let migration = &config.migration;

        let source_project = project(&migration.source_project, "source_project")?;
        let target_project = project(&migration.target_project, "target_project")?;
        let custom_field = migration
            .custom_field_id
            .map(CustomFieldId::new)
            .ok_or_else(|| missing("custom_field_id"))?;
        let source_run = migration
            .source_run_id
            .map(RunId::new)
            .ok_or_else(|| missing("source_run_id"))?;
        let target_run = migration
            .target_run_id
            .map(RunId::new)
            .ok_or_else(|| missing("target_run_id"))?;

        Ok(Self {
            source_project,
            target_project,
            custom_field,
            source_run,
            target_run,
            page_size: migration.page_size,
            batch_size: migration.batch_size,
            mapping_path: PathBuf::from(&migration.mapping_path),
            pairs_path: migration.pairs_path.as_ref().map(PathBuf::from),
            dry_run: config.application.dry_run,
        })
    }
}

fn project(value: &Option<String>, name: &str) -> Result<ProjectCode> {
    let code = value.as_deref().ok_or_else(|| missing(name))?;
    ProjectCode::new(code).map_err(|e| MigrateError::Configuration(format!("migration.{name}: {e}")))
}

fn missing(name: &str) -> MigrateError {
    MigrateError::Configuration(format!("migration.{name} is required"))
}

/// Runs one migration against a Qase API
pub struct MigrationCoordinator {
    api: Arc<dyn QaseApi>,
    plan: MigrationPlan,
}

impl MigrationCoordinator {
    /// Create a coordinator talking to the configured Qase API
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the plan is incomplete or the HTTP
    /// client cannot be built.
    pub fn new(config: &MigrateConfig) -> Result<Self> {
        let plan = MigrationPlan::from_config(config)?;
        let client = QaseClient::new(&config.qase)?;
        Ok(Self::with_api(Arc::new(client), plan))
    }

    /// Create a coordinator over any [`QaseApi`] implementation
    pub fn with_api(api: Arc<dyn QaseApi>, plan: MigrationPlan) -> Self {
        Self { api, plan }
    }

    /// The plan being executed
    pub fn plan(&self) -> &MigrationPlan {
        &self.plan
    }

    /// Execute the migration
    ///
    /// A rejected batch or a failed mapping write is reported in the
    /// returned summary.
    ///
    /// # Errors
    ///
    /// Fails before anything is written or submitted when a listing cannot
    /// be fetched ([`MigrateError::Fetch`]) or when no result has a target
    /// case ([`MigrateError::EmptyPayload`]).
    pub async fn execute(&self) -> Result<MigrationSummary> {
        let start_time = Instant::now();
        let plan = &self.plan;
        let mut summary = MigrationSummary::new(plan.mapping_path.clone(), plan.dry_run);

        tracing::info!(
            source_project = %plan.source_project,
            target_project = %plan.target_project,
            source_run = %plan.source_run,
            target_run = %plan.target_run,
            custom_field = %plan.custom_field,
            api = %self.api.base_url(),
            dry_run = plan.dry_run,
            "Starting migration"
        );

        let fetcher = PagedFetcher::new(plan.page_size);
        let source_cases = fetcher.fetch_cases(self.api.as_ref(), &plan.source_project).await?;
        let target_cases = fetcher.fetch_cases(self.api.as_ref(), &plan.target_project).await?;
        summary.source_cases = source_cases.len();
        summary.target_cases = target_cases.len();

        let correspondence = resolve(&target_cases, &source_cases, plan.custom_field);
        summary.mapped_cases = correspondence.map.len();
        summary.ambiguous_values = correspondence.duplicate_values;
        if correspondence.map.is_empty() {
            tracing::warn!(
                custom_field = %plan.custom_field,
                "No target case references a source case through the custom field"
            );
        }

        let results = fetcher
            .fetch_results(self.api.as_ref(), &plan.source_project, plan.source_run)
            .await?;
        summary.results_fetched = results.len();

        let map = Arc::new(correspondence.map);
        let outcome = ResultTransformer::new(Arc::clone(&map)).transform_all(&results)?;
        summary.results_dropped = outcome.dropped;
        summary.records_prepared = outcome.records.len();

        let persister = MappingPersister::new(plan.mapping_path.clone())
            .with_pairs_path(plan.pairs_path.clone());
        let pairs = correspondence.pairs;
        let persist_map = Arc::clone(&map);
        let persist_task = tokio::task::spawn_blocking(move || persister.persist(&persist_map, &pairs));

        let submitter = BulkSubmitter::new(
            Arc::clone(&self.api),
            plan.target_project.clone(),
            plan.target_run,
            plan.batch_size,
        )
        .with_dry_run(plan.dry_run);
        let records = outcome.records;
        let submit_task = tokio::spawn(async move { submitter.submit(&records).await });

        let (persisted, submitted) = tokio::join!(persist_task, submit_task);

        match persisted {
            Ok(report) => {
                summary.mapping_rows = report.mapping_rows;
                summary.persistence_errors = report.errors;
            }
            Err(e) => {
                tracing::error!(error = %e, "Mapping persistence task failed");
                summary.persistence_errors.push(e.to_string());
            }
        }

        match submitted {
            Ok(Ok(report)) => {
                summary.batch_count = report.batch_count;
                summary.batches_sent = report.batches_sent;
                summary.records_sent = report.records_sent;
            }
            Ok(Err(error)) => match SubmissionFailure::from_error(&error) {
                Some(failure) => {
                    summary.batch_count = failure.batch_count;
                    summary.batches_sent = failure.batch_index;
                    summary.records_sent = failure.records_sent;
                    summary.submission_failure = Some(failure);
                }
                None => return Err(error),
            },
            Err(e) => return Err(MigrateError::Task(format!("submission: {e}"))),
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn config() -> MigrateConfig {
        let mut config = MigrateConfig::default();
        config.qase.api_token = Some(secret_string("token".to_string()));
        config.migration.source_project = Some("SRC".to_string());
        config.migration.target_project = Some("TGT".to_string());
        config.migration.custom_field_id = Some(7);
        config.migration.source_run_id = Some(10);
        config.migration.target_run_id = Some(20);
        config
    }

    #[test]
    fn test_plan_from_config() {
        let mut cfg = config();
        cfg.application.dry_run = true;
        cfg.migration.pairs_path = Some("pairs.csv".to_string());

        let plan = MigrationPlan::from_config(&cfg).unwrap();
        assert_eq!(plan.source_project.as_str(), "SRC");
        assert_eq!(plan.target_project.as_str(), "TGT");
        assert_eq!(plan.custom_field, CustomFieldId::new(7));
        assert_eq!(plan.source_run, RunId::new(10));
        assert_eq!(plan.target_run, RunId::new(20));
        assert_eq!(plan.mapping_path, PathBuf::from("mapping.csv"));
        assert_eq!(plan.pairs_path, Some(PathBuf::from("pairs.csv")));
        assert!(plan.dry_run);
    }

    #[test]
    fn test_plan_requires_every_identifier() {
        let mut cfg = config();
        cfg.migration.target_run_id = None;
        let err = MigrationPlan::from_config(&cfg).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("target_run_id"));
    }

    #[test]
    fn test_coordinator_from_config() {
        let coordinator = MigrationCoordinator::new(&config()).unwrap();
        assert_eq!(coordinator.plan().batch_size, 200);
    }
}
