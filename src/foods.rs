//! Food catalog operations: creation, lookup, search, and bulk import.

use crate::config::ServiceConfig;
use crate::errors::{Error, ValidationError, ValidationIssue};
use crate::id::generate_entity_id;
use crate::models::{Food, FoodDraft, FoodView};
use crate::normalize::{fold, folded_contains};
use crate::store::Database;

const MAX_NAME_LENGTH: usize = 100;

/// Outcome of a bulk catalog import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    /// Entries skipped because of a duplicate name/external id or a failed
    /// validation. Bulk import is best-effort; one bad row never aborts it.
    pub skipped: usize,
}

/// Repository over nutritional reference entries.
#[derive(Clone)]
pub struct FoodRepo {
    db: Database,
    config: ServiceConfig,
}

impl FoodRepo {
    pub fn new(db: Database, config: ServiceConfig) -> Self {
        Self { db, config }
    }

    /// Creates a catalog entry. Duplicate names conflict; the name match is
    /// case-sensitive and exact.
    pub async fn create(&self, draft: FoodDraft) -> Result<Food, Error> {
        let mut issues = Vec::new();
        if draft.name.is_empty() {
            issues.push(ValidationIssue::new(
                "name",
                "validation.required",
                "name and calories per 100g are required",
            ));
        }
        if draft.name.chars().count() > MAX_NAME_LENGTH {
            issues.push(ValidationIssue::new(
                "name",
                "validation.length",
                format!("length must be at most {MAX_NAME_LENGTH}"),
            ));
        }
        if !draft.calories_per_100g.is_finite() || draft.calories_per_100g <= 0.0 {
            issues.push(ValidationIssue::new(
                "calories_per_100g",
                "validation.range",
                "calories per 100g must be positive",
            ));
        } else if draft.calories_per_100g > self.config.max_calories_per_100g {
            issues.push(ValidationIssue::new(
                "calories_per_100g",
                "validation.range",
                "calories per 100g seems unreasonably high",
            ));
        }
        ValidationError::new(issues).into_result()?;

        let food = Food {
            id: generate_entity_id(),
            name: draft.name,
            calories_per_100g: draft.calories_per_100g,
            protein_per_100g: draft.protein_per_100g,
            carbs_per_100g: draft.carbs_per_100g,
            fat_per_100g: draft.fat_per_100g,
            external_id: draft.external_id,
            language: draft.language,
        };

        let mut state = self.db.write().await;
        state.insert_food(food.clone())?;
        log::debug!("catalog entry created: {} ({})", food.name, food.id);
        Ok(food)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Food>, Error> {
        let state = self.db.read().await;
        Ok(state.food(id).cloned())
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Food>, Error> {
        let state = self.db.read().await;
        Ok(state.food_by_name(name).cloned())
    }

    /// Case- and accent-insensitive substring search on the food name, with
    /// an optional language filter.
    ///
    /// Results are ordered by folded name for a stable listing. Responses are
    /// shaped by the enabled feature set; no pagination (the catalog is small
    /// in the reference deployment).
    pub async fn search(&self, query: &str, language: Option<&str>) -> Result<Vec<FoodView>, Error> {
        let state = self.db.read().await;
        let language = language.map(fold);
        let mut matches: Vec<&Food> = state
            .foods_iter()
            .filter(|food| folded_contains(&food.name, query))
            .filter(|food| match &language {
                Some(wanted) => food.language.as_deref().map(fold).as_ref() == Some(wanted),
                None => true,
            })
            .collect();
        matches.sort_by_key(|food| fold(&food.name));
        Ok(matches
            .into_iter()
            .map(|food| FoodView::shape(food, &self.config.features))
            .collect())
    }

    /// Best-effort bulk import from an external catalog. Duplicates and
    /// invalid rows are skipped and counted, never fatal.
    pub async fn import(&self, drafts: Vec<FoodDraft>) -> Result<ImportReport, Error> {
        let mut report = ImportReport::default();
        for draft in drafts {
            match self.create(draft).await {
                Ok(_) => report.created += 1,
                Err(Error::Conflict { .. }) | Err(Error::Validation(_)) => report.skipped += 1,
                Err(other) => return Err(other),
            }
        }
        log::info!("catalog import: {} created, {} skipped", report.created, report.skipped);
        Ok(report)
    }
}
