#![allow(dead_code)]

use nutrigraph::{
    Database, FeedService, FollowRepo, Food, FoodDraft, FoodRepo, LogRepo, ServiceConfig, User, UserDraft, UserRepo,
};

/// One fully wired core over a fresh in-memory database.
pub struct TestContext {
    pub db: Database,
    pub users: UserRepo,
    pub follows: FollowRepo,
    pub foods: FoodRepo,
    pub logs: LogRepo,
    pub feed: FeedService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let db = Database::new();
        Self {
            users: UserRepo::new(db.clone()),
            follows: FollowRepo::new(db.clone()),
            foods: FoodRepo::new(db.clone(), config.clone()),
            logs: LogRepo::new(db.clone(), config.clone()),
            feed: FeedService::new(db.clone(), config),
            db,
        }
    }

    pub async fn register(&self, username: &str) -> User {
        self.users
            .register(UserDraft {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "argon2-opaque".to_string(),
            })
            .await
            .expect("register user")
    }

    pub async fn add_food(&self, name: &str, calories_per_100g: f64) -> Food {
        self.foods
            .create(FoodDraft {
                name: name.to_string(),
                calories_per_100g,
                ..FoodDraft::default()
            })
            .await
            .expect("create food")
    }
}

/// A draft with realistic macro-nutrient values for shaping tests.
pub fn apple_draft() -> FoodDraft {
    FoodDraft {
        name: "Test Apple".to_string(),
        calories_per_100g: 52.0,
        protein_per_100g: Some(0.3),
        carbs_per_100g: Some(14.0),
        fat_per_100g: Some(0.2),
        ..FoodDraft::default()
    }
}
