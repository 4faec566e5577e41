mod common;

use common::{TestContext, apple_draft};
use nutrigraph::{Error, Feature, FoodDraft, ServiceConfig};

#[tokio::test]
async fn create_and_fetch_by_name() {
    let ctx = TestContext::new();
    let created = ctx.foods.create(apple_draft()).await.expect("create");

    let fetched = ctx
        .foods
        .get_by_name("Test Apple")
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.calories_per_100g, 52.0);
}

#[tokio::test]
async fn duplicate_name_is_a_conflict() {
    let ctx = TestContext::new();
    ctx.foods.create(apple_draft()).await.expect("create");

    let err = ctx.foods.create(apple_draft()).await.expect_err("duplicate");
    assert!(matches!(err, Error::Conflict { field: "name", .. }));
    assert_eq!(err.status_code(), 400);

    // Uniqueness is case-sensitive exact match, so a different casing passes.
    let mut lowered = apple_draft();
    lowered.name = "test apple".to_string();
    ctx.foods.create(lowered).await.expect("different casing");
}

#[tokio::test]
async fn duplicate_external_id_is_a_conflict() {
    let ctx = TestContext::new();
    let mut first = apple_draft();
    first.external_id = Some("usda-1102644".to_string());
    ctx.foods.create(first).await.expect("create");

    let mut second = apple_draft();
    second.name = "Other Apple".to_string();
    second.external_id = Some("usda-1102644".to_string());
    let err = ctx.foods.create(second).await.expect_err("duplicate external id");
    assert!(matches!(err, Error::Conflict { field: "external_id", .. }));
}

#[tokio::test]
async fn calorie_bounds_are_enforced() {
    let ctx = TestContext::new();

    for calories in [0.0, -10.0, 1500.0, f64::NAN] {
        let err = ctx
            .foods
            .create(FoodDraft {
                name: format!("Weird Food {calories}"),
                calories_per_100g: calories,
                ..FoodDraft::default()
            })
            .await
            .expect_err("implausible calories");
        assert!(matches!(err, Error::Validation(_)), "calories={calories} should fail");
    }

    // The ceiling itself is plausible.
    ctx.foods
        .create(FoodDraft {
            name: "Pure Fat".to_string(),
            calories_per_100g: 1000.0,
            ..FoodDraft::default()
        })
        .await
        .expect("boundary calories");
}

#[tokio::test]
async fn missing_name_fails_validation() {
    let ctx = TestContext::new();
    let err = ctx
        .foods
        .create(FoodDraft {
            calories_per_100g: 52.0,
            ..FoodDraft::default()
        })
        .await
        .expect_err("missing name");
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn search_ignores_case_and_accents_both_ways() {
    let ctx = TestContext::new();
    ctx.add_food("Crème Brûlée", 325.0).await;
    ctx.add_food("Açaí Bowl", 70.0).await;
    ctx.add_food("Apple Pie", 240.0).await;

    // Unaccented query matches accented name.
    let hits = ctx.foods.search("creme", None).await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Crème Brûlée");

    // Accented query matches regardless of case.
    let hits = ctx.foods.search("AÇAÍ", None).await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Açaí Bowl");

    // Substring match, ordered by folded name.
    let hits = ctx.foods.search("a", None).await.expect("search");
    let names: Vec<&str> = hits.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Açaí Bowl", "Apple Pie", "Crème Brûlée"]);
}

#[tokio::test]
async fn empty_query_returns_everything() {
    let ctx = TestContext::new();
    ctx.add_food("Apple", 52.0).await;
    ctx.add_food("Banana", 89.0).await;

    let hits = ctx.foods.search("", None).await.expect("search");
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn language_filter_narrows_results() {
    let ctx = TestContext::new();
    ctx.foods
        .create(FoodDraft {
            name: "Pomme".to_string(),
            calories_per_100g: 52.0,
            language: Some("fr".to_string()),
            ..FoodDraft::default()
        })
        .await
        .expect("create fr");
    ctx.foods
        .create(FoodDraft {
            name: "Pomegranate".to_string(),
            calories_per_100g: 83.0,
            language: Some("en".to_string()),
            ..FoodDraft::default()
        })
        .await
        .expect("create en");
    ctx.add_food("Pomelo", 38.0).await; // no language tag

    let hits = ctx.foods.search("pom", Some("fr")).await.expect("search");
    let names: Vec<&str> = hits.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Pomme"]);

    // Without the filter, every match comes back.
    let hits = ctx.foods.search("pom", None).await.expect("search");
    assert_eq!(hits.len(), 3);
}

#[tokio::test]
async fn nutrition_fields_follow_the_feature_flag() {
    let plain = TestContext::new();
    plain.foods.create(apple_draft()).await.expect("create");
    let hits = plain.foods.search("apple", None).await.expect("search");
    assert!(hits[0].protein_per_100g.is_none());
    assert!(hits[0].carbs_per_100g.is_none());
    assert!(hits[0].fat_per_100g.is_none());

    let mut config = ServiceConfig::default();
    config.features.enable(Feature::NutritionTracking);
    let full = TestContext::with_config(config);
    full.foods.create(apple_draft()).await.expect("create");
    let hits = full.foods.search("apple", None).await.expect("search");
    assert_eq!(hits[0].protein_per_100g, Some(0.3));
    assert_eq!(hits[0].carbs_per_100g, Some(14.0));
    assert_eq!(hits[0].fat_per_100g, Some(0.2));
}

#[tokio::test]
async fn import_skips_duplicates_and_invalid_rows() {
    let ctx = TestContext::new();
    ctx.foods.create(apple_draft()).await.expect("seed");

    let report = ctx
        .foods
        .import(vec![
            apple_draft(), // duplicate name
            FoodDraft {
                name: "Banana".to_string(),
                calories_per_100g: 89.0,
                ..FoodDraft::default()
            },
            FoodDraft {
                name: "Broken".to_string(),
                calories_per_100g: -1.0,
                ..FoodDraft::default()
            },
        ])
        .await
        .expect("import");

    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 2);
    assert!(ctx.foods.get_by_name("Banana").await.expect("lookup").is_some());
}
