//! Log store operations: creation, owner listings, and the retention purge.

use chrono::{DateTime, Utc};

use crate::config::ServiceConfig;
use crate::errors::{Error, ValidationError, ValidationIssue};
use crate::id::generate_entity_id;
use crate::models::{FoodLog, LogView, calories_for};
use crate::store::Database;

/// Repository over immutable consumption events.
#[derive(Clone)]
pub struct LogRepo {
    db: Database,
    config: ServiceConfig,
}

impl LogRepo {
    pub fn new(db: Database, config: ServiceConfig) -> Self {
        Self { db, config }
    }

    /// Appends a log entry stamped with the current time.
    pub async fn create(&self, user_id: &str, food_id: &str, grams: f64) -> Result<FoodLog, Error> {
        self.create_at(user_id, food_id, grams, Utc::now()).await
    }

    /// Appends a log entry with an explicit timestamp (backfill path).
    pub async fn create_at(
        &self,
        user_id: &str,
        food_id: &str,
        grams: f64,
        logged_at: DateTime<Utc>,
    ) -> Result<FoodLog, Error> {
        let mut issues = Vec::new();
        if !grams.is_finite() || grams <= 0.0 {
            issues.push(ValidationIssue::new(
                "grams",
                "validation.range",
                "grams must be greater than 0",
            ));
        } else if grams > self.config.max_log_grams {
            issues.push(ValidationIssue::new(
                "grams",
                "validation.range",
                "grams amount seems unusually large",
            ));
        }
        ValidationError::new(issues).into_result()?;

        let mut state = self.db.write().await;
        if !state.user_exists(user_id) {
            return Err(Error::not_found("user", user_id));
        }
        if state.food(food_id).is_none() {
            return Err(Error::not_found("food", food_id));
        }
        let entry = FoodLog {
            id: generate_entity_id(),
            seq: state.next_seq(),
            user_id: user_id.to_string(),
            food_id: food_id.to_string(),
            grams,
            logged_at,
        };
        state.insert_log(entry.clone());
        Ok(entry)
    }

    /// All logs belonging to `user_id`, enriched with food name and computed
    /// calories, ascending by `(logged_at, seq)`.
    ///
    /// Callers may only read their own logs; feed-ordered reads across users
    /// go through the feed aggregator instead.
    pub async fn list_for_user(&self, caller_id: &str, user_id: &str) -> Result<Vec<LogView>, Error> {
        if caller_id != user_id {
            return Err(Error::Forbidden);
        }
        let state = self.db.read().await;
        let mut entries = state.logs_for_user(user_id);
        entries.sort_by_key(|entry| (entry.logged_at, entry.seq));
        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                state.food(&entry.food_id).map(|food| LogView {
                    food_name: food.name.clone(),
                    grams: entry.grams,
                    calories: calories_for(food, entry.grams),
                    log_date: entry.logged_at,
                })
            })
            .collect())
    }

    /// Deletes all logs older than `cutoff` in bounded batches, committing
    /// each batch independently so the table is never locked for the whole
    /// sweep. Returns the number of rows removed.
    ///
    /// A failure mid-purge loses nothing already committed; the next
    /// scheduled run continues from the same cutoff.
    pub async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let batch_size = self.config.purge_batch_size.max(1);
        let mut total: u64 = 0;
        loop {
            let mut state = self.db.write().await;
            let batch = state.expired_log_seqs(cutoff, batch_size);
            if batch.is_empty() {
                break;
            }
            for seq in &batch {
                state.remove_log(*seq);
            }
            total += batch.len() as u64;
            drop(state);
            log::info!("retention purge: removed batch of {} (total {total})", batch.len());
        }
        Ok(total)
    }

    /// Runs the purge with the cutoff implied by the configured retention
    /// window. This is the entry point for the external scheduler.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        self.purge_older_than(self.config.retention_cutoff()).await
    }
}
