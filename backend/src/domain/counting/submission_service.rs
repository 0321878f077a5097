//! Count-submission engine.
//!
//! Implements [`CountSubmissionOps`]: the draft/submit state machine, draft
//! deletion, and the admin review listing with sheet references resolved to
//! item display fields.
//!
//! Concurrency: the pre-read of the existing row is advisory only. The
//! database settles races twice over, with the unique (user, period)
//! constraint rejecting a second concurrent insert and the status filter on
//! draft updates refusing to touch a row that became terminal in between.
//! Both outcomes surface to the caller as conflicts.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::counting::{
    CountSubmission, EnrichedSubmission, ItemDisplay, ResolvedEntry, SaveOutcome,
    SubmissionStatus,
};
use crate::domain::error::Error;
use crate::domain::inventory::ItemSummary;
use crate::domain::ports::{
    CountSubmissionOps, CountSubmissionRepository, CountSubmissionRepositoryError,
    InventoryRepository, InventoryRepositoryError, SaveSubmissionRequest,
};
use crate::domain::user::EmailAddress;

/// Submission engine implementing the driving port.
#[derive(Clone)]
pub struct CountSubmissionService<S, I> {
    submissions: Arc<S>,
    inventory: Arc<I>,
}

impl<S, I> CountSubmissionService<S, I> {
    /// Create a new engine over the given repositories.
    pub fn new(submissions: Arc<S>, inventory: Arc<I>) -> Self {
        Self {
            submissions,
            inventory,
        }
    }
}

fn map_submission_error(error: CountSubmissionRepositoryError) -> Error {
    match error {
        CountSubmissionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("submission repository unavailable: {message}"))
        }
        CountSubmissionRepositoryError::Query { message } => {
            Error::internal(format!("submission repository error: {message}"))
        }
        CountSubmissionRepositoryError::DuplicateSubmission { .. } => already_submitted(),
    }
}

fn map_inventory_error(error: InventoryRepositoryError) -> Error {
    match error {
        InventoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("inventory repository unavailable: {message}"))
        }
        InventoryRepositoryError::Query { message }
        | InventoryRepositoryError::DuplicateCode { message } => {
            Error::internal(format!("inventory repository error: {message}"))
        }
    }
}

fn already_submitted() -> Error {
    Error::conflict("count already submitted for this period; submissions cannot be changed")
}

fn resolve_display(id: &str, summaries: &HashMap<Uuid, ItemSummary>) -> ItemDisplay {
    // Sheet keys are opaque strings; anything that is not a known item id
    // gets the placeholder rather than failing the whole listing.
    let found = Uuid::parse_str(id).ok().and_then(|uuid| summaries.get(&uuid));
    match found {
        Some(summary) => ItemDisplay {
            id: id.to_owned(),
            product_name: summary.product_name.clone(),
            product_code: summary.product_code.clone(),
            serial_code: summary.serial_code.clone(),
        },
        None => ItemDisplay::missing(id),
    }
}

impl<S, I> CountSubmissionService<S, I>
where
    S: CountSubmissionRepository,
    I: InventoryRepository,
{
    async fn save_over_existing(
        &self,
        existing: CountSubmission,
        request: SaveSubmissionRequest,
    ) -> Result<SaveOutcome, Error> {
        if existing.status == SubmissionStatus::Submitted {
            return Err(already_submitted());
        }
        let now = Utc::now();
        let status = if request.submit {
            SubmissionStatus::Submitted
        } else {
            SubmissionStatus::Draft
        };
        let updated_row = CountSubmission {
            sheet: request.sheet,
            status,
            submitted_at: if request.submit {
                Some(now)
            } else {
                existing.submitted_at
            },
            updated_at: now,
            ..existing
        };
        let matched = self
            .submissions
            .update_draft(&updated_row)
            .await
            .map_err(map_submission_error)?;
        if !matched {
            // The row stopped being a draft between the read and the write.
            return Err(already_submitted());
        }
        tracing::info!(
            submission_id = %updated_row.id,
            period_id = %updated_row.period_id,
            submitted = request.submit,
            "count submission updated"
        );
        Ok(SaveOutcome {
            submission_id: updated_row.id,
            final_submission: request.submit,
        })
    }

    async fn save_fresh(&self, request: SaveSubmissionRequest) -> Result<SaveOutcome, Error> {
        let now = Utc::now();
        let status = if request.submit {
            SubmissionStatus::Submitted
        } else {
            SubmissionStatus::Draft
        };
        let row = CountSubmission {
            id: Uuid::new_v4(),
            user_email: request.user_email,
            period_id: request.period_id,
            sheet: request.sheet,
            status,
            submitted_at: request.submit.then_some(now),
            created_at: now,
            updated_at: now,
        };
        self.submissions
            .insert(&row)
            .await
            .map_err(map_submission_error)?;
        tracing::info!(
            submission_id = %row.id,
            period_id = %row.period_id,
            submitted = request.submit,
            "count submission created"
        );
        Ok(SaveOutcome {
            submission_id: row.id,
            final_submission: request.submit,
        })
    }

    async fn summaries_for(
        &self,
        submissions: &[CountSubmission],
    ) -> Result<HashMap<Uuid, ItemSummary>, Error> {
        let mut ids: Vec<Uuid> = submissions
            .iter()
            .flat_map(|submission| submission.sheet.item_ids())
            .filter_map(|id| Uuid::parse_str(id).ok())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let summaries = self
            .inventory
            .summaries_by_ids(&ids)
            .await
            .map_err(map_inventory_error)?;
        Ok(summaries
            .into_iter()
            .map(|summary| (summary.id, summary))
            .collect())
    }
}

#[async_trait]
impl<S, I> CountSubmissionOps for CountSubmissionService<S, I>
where
    S: CountSubmissionRepository,
    I: InventoryRepository,
{
    async fn save(&self, request: SaveSubmissionRequest) -> Result<SaveOutcome, Error> {
        let existing = self
            .submissions
            .find_by_user_and_period(&request.user_email, request.period_id)
            .await
            .map_err(map_submission_error)?;
        match existing {
            Some(row) => self.save_over_existing(row, request).await,
            None => self.save_fresh(request).await,
        }
    }

    async fn delete_draft(&self, user: &EmailAddress, period_id: Uuid) -> Result<(), Error> {
        let existing = self
            .submissions
            .find_by_user_and_period(user, period_id)
            .await
            .map_err(map_submission_error)?
            .ok_or_else(|| Error::not_found("no submission found for this period"))?;
        if existing.status == SubmissionStatus::Submitted {
            return Err(Error::conflict(
                "submitted records are permanent and cannot be deleted",
            ));
        }
        let deleted = self
            .submissions
            .delete_draft(user, period_id)
            .await
            .map_err(map_submission_error)?;
        if !deleted {
            return Err(Error::conflict(
                "submitted records are permanent and cannot be deleted",
            ));
        }
        tracing::info!(period_id = %period_id, "count draft discarded");
        Ok(())
    }

    async fn submissions_for_period(
        &self,
        period_id: Uuid,
    ) -> Result<Vec<EnrichedSubmission>, Error> {
        let rows = self
            .submissions
            .list_for_period(period_id)
            .await
            .map_err(map_submission_error)?;
        let summaries = self.summaries_for(&rows).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let entries: BTreeMap<String, ResolvedEntry> = row
                    .sheet
                    .iter()
                    .map(|(id, entry)| {
                        (
                            id.to_owned(),
                            ResolvedEntry {
                                entry: entry.clone(),
                                item: resolve_display(id, &summaries),
                            },
                        )
                    })
                    .collect();
                EnrichedSubmission {
                    id: row.id,
                    user_email: row.user_email,
                    period_id: row.period_id,
                    status: row.status,
                    submitted_at: row.submitted_at,
                    updated_at: row.updated_at,
                    entries,
                }
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "submission_service_tests.rs"]
mod tests;
