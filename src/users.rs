//! Identity store operations: registration, lookups, and profile views.

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Error, ValidationError, ValidationIssue};
use crate::id::generate_entity_id;
use crate::models::{ProfilePatch, ProfileView, PublicProfileView, User, UserDraft};
use crate::store::Database;
use crate::validators::{is_valid_email, is_valid_url};

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,64}$").expect("valid pattern"));

const MAX_BIO_LENGTH: usize = 500;

/// Repository over user records.
#[derive(Clone)]
pub struct UserRepo {
    db: Database,
}

impl UserRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Registers a new user.
    ///
    /// The credential hash is opaque to this core; hashing belongs to the
    /// auth collaborator.
    pub async fn register(&self, draft: UserDraft) -> Result<User, Error> {
        let mut issues = Vec::new();
        if draft.username.is_empty() || draft.email.is_empty() || draft.password_hash.is_empty() {
            issues.push(ValidationIssue::new(
                "username",
                "validation.required",
                "username, email and password are required",
            ));
        }
        if !draft.username.is_empty() && !USERNAME_PATTERN.is_match(&draft.username) {
            issues.push(ValidationIssue::new(
                "username",
                "validation.regex",
                "username must be 3-64 characters of letters, digits or underscores",
            ));
        }
        if !draft.email.is_empty() && !is_valid_email(&draft.email) {
            issues.push(ValidationIssue::new(
                "email",
                "validation.email",
                "value must be a valid email address",
            ));
        }
        ValidationError::new(issues).into_result()?;

        let user = User {
            id: generate_entity_id(),
            username: draft.username,
            email: draft.email,
            password_hash: draft.password_hash,
            bio: None,
            daily_calorie_goal: None,
            weight: None,
            height: None,
            date_of_birth: None,
            joined_at: Utc::now(),
            profile_picture_url: None,
        };

        let mut state = self.db.write().await;
        state.insert_user(user.clone())?;
        log::debug!("registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn get(&self, id: &str) -> Result<Option<User>, Error> {
        let state = self.db.read().await;
        Ok(state.user(id).cloned())
    }

    pub async fn get_or_error(&self, id: &str) -> Result<User, Error> {
        self.get(id).await?.ok_or_else(|| Error::not_found("user", id))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let state = self.db.read().await;
        Ok(state.user_by_username(username).cloned())
    }

    /// Applies a partial profile update. Fields absent from the patch are
    /// left untouched.
    pub async fn update_profile(&self, id: &str, patch: ProfilePatch) -> Result<User, Error> {
        let mut issues = Vec::new();
        if let Some(bio) = &patch.bio
            && bio.chars().count() > MAX_BIO_LENGTH
        {
            issues.push(ValidationIssue::new(
                "bio",
                "validation.length",
                format!("length must be at most {MAX_BIO_LENGTH}"),
            ));
        }
        let date_of_birth = match &patch.date_of_birth {
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    issues.push(ValidationIssue::new(
                        "date_of_birth",
                        "validation.date",
                        "invalid date format, use YYYY-MM-DD",
                    ));
                    None
                }
            },
            None => None,
        };
        if let Some(picture) = &patch.profile_picture_url
            && !is_valid_url(picture)
        {
            issues.push(ValidationIssue::new(
                "profile_picture_url",
                "validation.url",
                "value must be a valid URL",
            ));
        }
        ValidationError::new(issues).into_result()?;

        let mut state = self.db.write().await;
        let user = state.user_mut(id).ok_or_else(|| Error::not_found("user", id))?;
        if let Some(bio) = patch.bio {
            user.bio = Some(bio);
        }
        if let Some(goal) = patch.daily_calorie_goal {
            user.daily_calorie_goal = Some(goal);
        }
        if let Some(weight) = patch.weight {
            user.weight = Some(weight);
        }
        if let Some(height) = patch.height {
            user.height = Some(height);
        }
        if let Some(date) = date_of_birth {
            user.date_of_birth = Some(date);
        }
        if let Some(picture) = patch.profile_picture_url {
            user.profile_picture_url = Some(picture);
        }
        Ok(user.clone())
    }

    /// The caller's own profile, with live follow-graph counts.
    pub async fn profile(&self, id: &str) -> Result<ProfileView, Error> {
        let state = self.db.read().await;
        let user = state.user(id).ok_or_else(|| Error::not_found("user", id))?;
        Ok(ProfileView {
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            daily_calorie_goal: user.daily_calorie_goal,
            weight: user.weight,
            height: user.height,
            date_of_birth: user.date_of_birth,
            joined_at: user.joined_at,
            followers_count: state.followers_count(id),
            following_count: state.following_count(id),
            profile_picture_url: user.profile_picture_url.clone(),
        })
    }

    /// Another user's public profile, as seen by `viewer_id`.
    pub async fn public_profile(&self, viewer_id: &str, id: &str) -> Result<PublicProfileView, Error> {
        let state = self.db.read().await;
        let user = state.user(id).ok_or_else(|| Error::not_found("user", id))?;
        Ok(PublicProfileView {
            username: user.username.clone(),
            bio: user.bio.clone(),
            profile_picture_url: user.profile_picture_url.clone(),
            followers_count: state.followers_count(id),
            following_count: state.following_count(id),
            is_following: state.edge_exists(viewer_id, id),
            joined_at: user.joined_at,
        })
    }
}
