//! Nutrigraph core library.
//!
//! The social half of a nutrition-tracking backend: identity records, the
//! directed follow graph, the food catalog, immutable consumption logs, and
//! the aggregated feed that merges a user's own logs with those of everyone
//! they follow.
//!
//! Credential issuance, HTTP wiring, and schedulers are external
//! collaborators; this crate exposes the operations they call and the error
//! taxonomy they translate (see [`errors::Error::status_code`]).

pub mod config;
pub mod errors;
pub mod feed;
pub mod follows;
pub mod foods;
pub mod id;
pub mod logs;
pub mod models;
pub mod normalize;
pub mod store;
pub mod users;
pub mod validators;

pub use config::{Feature, FeatureSet, ServiceConfig};
pub use errors::{Error, ValidationError, ValidationIssue};
pub use feed::FeedService;
pub use follows::FollowRepo;
pub use foods::{FoodRepo, ImportReport};
pub use logs::LogRepo;
pub use models::{
    FeedEntry, Food, FoodDraft, FoodLog, FoodView, LogView, ProfilePatch, ProfileView, PublicProfileView, User,
    UserDraft,
};
pub use store::Database;
pub use users::UserRepo;
