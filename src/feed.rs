//! Feed aggregation: the merged, time-ordered view of a user's own logs and
//! the logs of everyone they follow.

use std::collections::HashSet;

use crate::config::ServiceConfig;
use crate::errors::Error;
use crate::models::{FeedEntry, calories_for};
use crate::store::Database;

/// Composes the follow graph and log store into feed reads.
#[derive(Clone)]
pub struct FeedService {
    db: Database,
    config: ServiceConfig,
}

impl FeedService {
    pub fn new(db: Database, config: ServiceConfig) -> Self {
        Self { db, config }
    }

    /// The feed for `user_id`: own logs plus followed users' logs, newest
    /// first, truncated to the configured page size.
    ///
    /// The author set always contains the user themselves, so a user with
    /// zero follows still sees their own logs. Equal timestamps tie-break on
    /// the insertion sequence, newest insert first. Calories are computed at
    /// read time and never stored. The caller is assumed to be a valid,
    /// authenticated user reference.
    pub async fn feed_for(&self, user_id: &str) -> Result<Vec<FeedEntry>, Error> {
        self.feed_for_limited(user_id, self.config.feed_page_size).await
    }

    /// Same as [`feed_for`](Self::feed_for) with an explicit page size.
    pub async fn feed_for_limited(&self, user_id: &str, limit: usize) -> Result<Vec<FeedEntry>, Error> {
        let state = self.db.read().await;

        // Author id set: followees plus self. The set makes the union
        // duplicate-free by construction.
        let mut authors: HashSet<String> = state.following_of(user_id).into_iter().collect();
        authors.insert(user_id.to_string());

        let mut entries: Vec<_> = authors
            .iter()
            .flat_map(|author| state.logs_for_user(author))
            .collect();
        entries.sort_by(|a, b| (b.logged_at, b.seq).cmp(&(a.logged_at, a.seq)));

        Ok(entries
            .into_iter()
            .take(limit)
            .filter_map(|entry| {
                let user = state.user(&entry.user_id)?;
                let food = state.food(&entry.food_id)?;
                Some(FeedEntry {
                    username: user.username.clone(),
                    food_name: food.name.clone(),
                    grams: entry.grams,
                    calories: calories_for(food, entry.grams),
                    log_date: entry.logged_at,
                })
            })
            .collect())
    }
}
