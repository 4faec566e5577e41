//! In-memory storage engine.
//!
//! The persistence collaborator is abstracted behind [`Database`]: a set of
//! entity tables with unique secondary indexes, a directed follow-edge set,
//! and a monotonic sequence counter for log insertion order. Repositories
//! take short read/write critical sections and never hold the lock across an
//! await, so concurrent duplicate mutations stay safe under the idempotent
//! operation semantics.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::Error;
use crate::models::{Food, FoodLog, User};

/// Shared handle to the storage engine. Cheap to clone.
#[derive(Clone, Default)]
pub struct Database {
    inner: Arc<RwLock<State>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, State> {
        self.inner.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.inner.write().await
    }
}

#[derive(Default)]
pub(crate) struct State {
    users: HashMap<String, User>,
    username_index: HashMap<String, String>,
    email_index: HashMap<String, String>,
    /// Directed edges `(follower_id, followed_id)`, composite-unique.
    follow_edges: HashSet<(String, String)>,
    foods: HashMap<String, Food>,
    food_name_index: HashMap<String, String>,
    food_external_index: HashMap<String, String>,
    /// Logs keyed by insertion sequence, so iteration order is insertion order.
    logs: BTreeMap<u64, FoodLog>,
    logs_by_user: HashMap<String, Vec<u64>>,
    next_seq: u64,
}

impl State {
    // ── users ──────────────────────────────────────────────────────────

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.username_index.get(username).and_then(|id| self.users.get(id))
    }

    pub fn user_exists(&self, id: &str) -> bool {
        self.users.contains_key(id)
    }

    /// Inserts a user, enforcing username and email uniqueness.
    pub fn insert_user(&mut self, user: User) -> Result<(), Error> {
        if self.username_index.contains_key(&user.username) {
            return Err(Error::conflict("username", user.username));
        }
        if self.email_index.contains_key(&user.email) {
            return Err(Error::conflict("email", user.email));
        }
        self.username_index.insert(user.username.clone(), user.id.clone());
        self.email_index.insert(user.email.clone(), user.id.clone());
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    pub fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.get_mut(id)
    }

    // ── follow edges ───────────────────────────────────────────────────

    /// Inserts a directed edge. Returns `true` if the edge was new.
    ///
    /// Self-loops are rejected here as well as at the operation boundary, so
    /// no future write path can corrupt the graph.
    pub fn insert_edge(&mut self, follower_id: &str, followed_id: &str) -> Result<bool, Error> {
        if follower_id == followed_id {
            return Err(Error::invalid_operation("a user cannot follow themselves"));
        }
        Ok(self
            .follow_edges
            .insert((follower_id.to_string(), followed_id.to_string())))
    }

    /// Removes a directed edge. Returns `true` if the edge existed.
    pub fn remove_edge(&mut self, follower_id: &str, followed_id: &str) -> bool {
        self.follow_edges
            .remove(&(follower_id.to_string(), followed_id.to_string()))
    }

    pub fn edge_exists(&self, follower_id: &str, followed_id: &str) -> bool {
        self.follow_edges
            .contains(&(follower_id.to_string(), followed_id.to_string()))
    }

    pub fn followers_count(&self, user_id: &str) -> usize {
        self.follow_edges.iter().filter(|(_, b)| b == user_id).count()
    }

    pub fn following_count(&self, user_id: &str) -> usize {
        self.follow_edges.iter().filter(|(a, _)| a == user_id).count()
    }

    /// Ids of the users `user_id` follows.
    pub fn following_of(&self, user_id: &str) -> Vec<String> {
        self.follow_edges
            .iter()
            .filter(|(a, _)| a == user_id)
            .map(|(_, b)| b.clone())
            .collect()
    }

    /// Ids of the users following `user_id`.
    pub fn followers_of(&self, user_id: &str) -> Vec<String> {
        self.follow_edges
            .iter()
            .filter(|(_, b)| b == user_id)
            .map(|(a, _)| a.clone())
            .collect()
    }

    // ── foods ──────────────────────────────────────────────────────────

    pub fn food(&self, id: &str) -> Option<&Food> {
        self.foods.get(id)
    }

    pub fn food_by_name(&self, name: &str) -> Option<&Food> {
        self.food_name_index.get(name).and_then(|id| self.foods.get(id))
    }

    pub fn foods_iter(&self) -> impl Iterator<Item = &Food> {
        self.foods.values()
    }

    /// Inserts a food, enforcing name and external-id uniqueness.
    pub fn insert_food(&mut self, food: Food) -> Result<(), Error> {
        if self.food_name_index.contains_key(&food.name) {
            return Err(Error::conflict("name", food.name));
        }
        if let Some(external_id) = &food.external_id {
            if self.food_external_index.contains_key(external_id) {
                return Err(Error::conflict("external_id", external_id.clone()));
            }
            self.food_external_index.insert(external_id.clone(), food.id.clone());
        }
        self.food_name_index.insert(food.name.clone(), food.id.clone());
        self.foods.insert(food.id.clone(), food);
        Ok(())
    }

    // ── logs ───────────────────────────────────────────────────────────

    /// Claims the next insertion sequence number.
    pub fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Appends a log entry. Referential integrity is the caller's check; the
    /// engine only records the row.
    pub fn insert_log(&mut self, entry: FoodLog) {
        self.logs_by_user
            .entry(entry.user_id.clone())
            .or_default()
            .push(entry.seq);
        self.logs.insert(entry.seq, entry);
    }

    pub fn logs_for_user(&self, user_id: &str) -> Vec<&FoodLog> {
        self.logs_by_user
            .get(user_id)
            .into_iter()
            .flatten()
            .filter_map(|seq| self.logs.get(seq))
            .collect()
    }

    /// Collects up to `limit` sequence numbers of logs older than `cutoff`.
    pub fn expired_log_seqs(&self, cutoff: chrono::DateTime<chrono::Utc>, limit: usize) -> Vec<u64> {
        self.logs
            .values()
            .filter(|entry| entry.logged_at < cutoff)
            .take(limit)
            .map(|entry| entry.seq)
            .collect()
    }

    /// Removes a log row and its per-user index entry.
    pub fn remove_log(&mut self, seq: u64) -> Option<FoodLog> {
        let entry = self.logs.remove(&seq)?;
        if let Some(seqs) = self.logs_by_user.get_mut(&entry.user_id) {
            seqs.retain(|s| *s != seq);
            if seqs.is_empty() {
                self.logs_by_user.remove(&entry.user_id);
            }
        }
        Some(entry)
    }

    pub fn log_count(&self) -> usize {
        self.logs.len()
    }
}
