//! Per-document audit pipeline
//!
//! file name → cache key → cached or freshly read text → extraction → audit
//! outcome → [`AuditRecord`].

use crate::error::PipelineError;
use crate::extractor::FieldExtractor;
use crate::types::{AuditRecord, DocumentInput, DocumentReport};
use fieldaudit_domain::traits::{DocumentReader, TextGenerator, TextStore};
use fieldaudit_domain::{normalize, AuditOutcome, Timestamp};
use fieldaudit_store::ExtractionCache;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs documents through cache, extractor and audit rules
pub struct AuditPipeline<G, S, R> {
    extractor: FieldExtractor<G>,
    cache: Arc<ExtractionCache<S>>,
    reader: Arc<R>,
}

impl<G, S, R> AuditPipeline<G, S, R>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
    S: TextStore + Send + Sync + 'static,
    S::Error: Display,
    R: DocumentReader + Send + Sync + 'static,
    R::Error: Display,
{
    /// Create a new pipeline
    pub fn new(extractor: FieldExtractor<G>, cache: ExtractionCache<S>, reader: R) -> Self {
        Self {
            extractor,
            cache: Arc::new(cache),
            reader: Arc::new(reader),
        }
    }

    /// The extraction cache
    pub fn cache(&self) -> &ExtractionCache<S> {
        &self.cache
    }

    /// Audit one document against `logged_date`
    ///
    /// The reader only runs when the cache has no text for the document's key.
    pub async fn audit_document(
        &self,
        input: DocumentInput,
        logged_date: Option<Timestamp>,
    ) -> Result<AuditRecord, PipelineError> {
        let DocumentInput { file_name, bytes } = input;

        let key = normalize(&file_name);
        if key.is_empty() {
            return Err(PipelineError::EmptyKey(file_name));
        }

        info!("Auditing '{}' (key '{}')", file_name, key);

        let cache = Arc::clone(&self.cache);
        let reader = Arc::clone(&self.reader);
        let cache_key = key.clone();

        // Store backends and the reader block on disk I/O
        let lookup = tokio::task::spawn_blocking(move || {
            cache.get_or_store(&cache_key, || reader.read_text(&bytes))
        })
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))??;

        let extraction = self.extractor.extract(&lookup.text).await?;
        let outcome = AuditOutcome::assess(logged_date, &extraction.fields);

        Ok(AuditRecord {
            file_name,
            key: key.to_string(),
            cache_hit: lookup.hit,
            logged_date,
            fields: extraction.fields,
            outcome,
            summary: extraction.summary,
            warnings: extraction.warnings,
        })
    }

    /// Audit documents one after another
    ///
    /// A failing document is reported in its slot and does not stop the rest.
    pub async fn audit_batch(
        &self,
        inputs: Vec<DocumentInput>,
        logged_date: Option<Timestamp>,
    ) -> Vec<DocumentReport> {
        let total = inputs.len();
        let mut reports = Vec::with_capacity(total);

        for input in inputs {
            let file_name = input.file_name.clone();
            let result = self.audit_document(input, logged_date).await;
            if let Err(e) = &result {
                warn!("Failed to audit '{}': {}", file_name, e);
            }
            reports.push(DocumentReport { file_name, result });
        }

        let failed = reports.iter().filter(|r| !r.is_ok()).count();
        info!("Batch complete: {} audited, {} failed", total - failed, failed);

        reports
    }
}
