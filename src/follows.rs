//! Follow graph operations.
//!
//! Edges are directed: `(follower, followed)`. Follow and unfollow are
//! idempotent so concurrent duplicate calls reduce to a plain set insert or
//! delete-if-exists; counts are computed on demand from the committed edge
//! set, never cached.

use crate::errors::Error;
use crate::models::User;
use crate::store::Database;

/// Repository over the directed follow relation.
#[derive(Clone)]
pub struct FollowRepo {
    db: Database,
}

impl FollowRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Makes `follower_id` follow `followed_id`.
    ///
    /// Idempotent: following an already-followed user is a no-op success.
    /// Fails with `InvalidOperation` on self-follow and `NotFound` when the
    /// target does not exist.
    pub async fn follow(&self, follower_id: &str, followed_id: &str) -> Result<(), Error> {
        if follower_id == followed_id {
            return Err(Error::invalid_operation("a user cannot follow themselves"));
        }
        let mut state = self.db.write().await;
        if !state.user_exists(followed_id) {
            return Err(Error::not_found("user", followed_id));
        }
        if !state.user_exists(follower_id) {
            return Err(Error::not_found("user", follower_id));
        }
        if state.insert_edge(follower_id, followed_id)? {
            log::debug!("follow edge created: {follower_id} -> {followed_id}");
        }
        Ok(())
    }

    /// Makes `follower_id` stop following `followed_id`.
    ///
    /// Idempotent: removing a non-existent edge is a no-op success. The
    /// target must still exist.
    pub async fn unfollow(&self, follower_id: &str, followed_id: &str) -> Result<(), Error> {
        let mut state = self.db.write().await;
        if !state.user_exists(followed_id) {
            return Err(Error::not_found("user", followed_id));
        }
        if state.remove_edge(follower_id, followed_id) {
            log::debug!("follow edge removed: {follower_id} -> {followed_id}");
        }
        Ok(())
    }

    /// Whether the directed edge `follower_id -> followed_id` exists.
    pub async fn is_following(&self, follower_id: &str, followed_id: &str) -> Result<bool, Error> {
        let state = self.db.read().await;
        Ok(state.edge_exists(follower_id, followed_id))
    }

    /// Number of users following `user_id`.
    pub async fn followers_count(&self, user_id: &str) -> Result<usize, Error> {
        let state = self.db.read().await;
        Ok(state.followers_count(user_id))
    }

    /// Number of users `user_id` follows.
    pub async fn following_count(&self, user_id: &str) -> Result<usize, Error> {
        let state = self.db.read().await;
        Ok(state.following_count(user_id))
    }

    /// Ids of the users `user_id` follows. Used by the feed aggregator.
    pub async fn following_of(&self, user_id: &str) -> Result<Vec<String>, Error> {
        let state = self.db.read().await;
        Ok(state.following_of(user_id))
    }

    /// The users following `user_id`, enriched.
    pub async fn followers_of(&self, user_id: &str) -> Result<Vec<User>, Error> {
        let state = self.db.read().await;
        Ok(state
            .followers_of(user_id)
            .into_iter()
            .filter_map(|id| state.user(&id).cloned())
            .collect())
    }

    /// The users `user_id` follows, enriched.
    pub async fn following_users(&self, user_id: &str) -> Result<Vec<User>, Error> {
        let state = self.db.read().await;
        Ok(state
            .following_of(user_id)
            .into_iter()
            .filter_map(|id| state.user(&id).cloned())
            .collect())
    }
}
