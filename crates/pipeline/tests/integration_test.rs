//! Integration tests for the pipeline.
//!
//! These tests drive the public operations with realistic listing batches,
//! decoded from the same JSON the marketplace API returns.

use pipeline::{FilterCriteria, filter_posts, search_and_filter, search_posts};
use records::{ListRecord, parse_records};
use serde_json::json;

fn create_test_listings() -> Vec<ListRecord> {
    parse_records(
        &json!([
            {
                "_id": "j1",
                "title": "Logo Design",
                "description": "Brand mark for a coffee shop",
                "skills": "illustrator, branding",
                "category": "Logo Design",
                "experienceLevel": "intermediate",
                "location": "Remote",
                "budget": "300",
                "createdAt": "2024-01-01",
                "views": 12,
                "client": {"name": "Beanery"}
            },
            {
                "_id": "j2",
                "title": "3D Model",
                "description": "Product render",
                "skills": "blender",
                "category": {"name": "3D Design"},
                "experienceLevel": "expert",
                "location": "Berlin",
                "budget": "abc",
                "createdAt": "2024-02-01",
                "views": "40"
            },
            {
                "_id": "j3",
                "title": "Rust Backend",
                "description": "Build an API for invoices",
                "skills": "rust, postgres",
                "category": {"name": "Programming"},
                "owner": {"name": "Ada Lovelace"},
                "experienceLevel": "expert",
                "location": "Remote",
                "budget": 1200,
                "date": "2023-11-15T09:00:00Z",
                "views": 7
            },
            {
                "_id": "j4",
                "title": "landing page copy",
                "skills": "copywriting",
                "category": "Writing",
                "experienceLevel": "entry",
                "location": "Paris",
                "budget": 150.5,
                "createdAt": "sometime soon",
                "views": "n/a"
            }
        ])
        .to_string(),
    )
    .expect("fixture should decode")
}

fn ids(records: &[ListRecord]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|record| record.extra.get("_id").and_then(|id| id.as_str()))
        .collect()
}

fn no_op_criteria() -> FilterCriteria {
    serde_json::from_value(json!({
        "searchTerm": "",
        "category": "all",
        "experienceLevel": "all",
        "location": "all",
        "budgetMin": "",
        "budgetMax": "",
        "sortBy": "relevance",
        "sortOrder": "desc"
    }))
    .unwrap()
}

#[test]
fn test_no_op_criteria_is_identity() {
    let listings = create_test_listings();
    let result = search_and_filter(listings.clone(), &no_op_criteria()).unwrap();
    assert_eq!(result, listings);
}

#[test]
fn test_search_term_is_idempotent() {
    let criteria = FilterCriteria::default().with_search_term("design");
    let once = search_and_filter(create_test_listings(), &criteria).unwrap();
    let twice = search_and_filter(once.clone(), &criteria).unwrap();

    assert_eq!(ids(&once), vec!["j1", "j2"]);
    assert_eq!(once, twice);
}

#[test]
fn test_search_reaches_owner_and_category_object() {
    let by_owner = search_and_filter(
        create_test_listings(),
        &FilterCriteria::default().with_search_term("lovelace"),
    )
    .unwrap();
    assert_eq!(ids(&by_owner), vec!["j3"]);

    let by_category = search_and_filter(
        create_test_listings(),
        &FilterCriteria::default().with_search_term("PROGRAMMING"),
    )
    .unwrap();
    assert_eq!(ids(&by_category), vec!["j3"]);
}

#[test]
fn test_budget_sort_directions_are_reversed() {
    // Drop the non-numeric budget so there are no ties at zero.
    let listings: Vec<ListRecord> = create_test_listings()
        .into_iter()
        .filter(|record| !record.budget_value().is_nan())
        .collect();

    let asc = search_and_filter(listings.clone(), &FilterCriteria::default().with_sort("budget", "asc"))
        .unwrap();
    let desc = search_and_filter(listings, &FilterCriteria::default().with_sort("budget", "desc"))
        .unwrap();

    assert_eq!(ids(&asc), vec!["j4", "j1", "j3"]);
    let mut reversed = ids(&desc);
    reversed.reverse();
    assert_eq!(ids(&asc), reversed);
}

#[test]
fn test_non_numeric_budget_excluded_by_any_bound() {
    let min_only = search_and_filter(
        create_test_listings(),
        &FilterCriteria::default().with_budget_min("0"),
    )
    .unwrap();
    assert!(!ids(&min_only).contains(&"j2"));

    let max_only = search_and_filter(
        create_test_listings(),
        &FilterCriteria::default().with_budget_max("100000"),
    )
    .unwrap();
    assert!(!ids(&max_only).contains(&"j2"));

    let unbounded = search_and_filter(create_test_listings(), &no_op_criteria()).unwrap();
    assert!(ids(&unbounded).contains(&"j2"));
}

#[test]
fn test_combined_filters() {
    let criteria: FilterCriteria = serde_json::from_value(json!({
        "experienceLevel": "expert",
        "location": "Remote",
        "budgetMin": 1000,
        "budgetMax": "2000"
    }))
    .unwrap();

    let result = search_and_filter(create_test_listings(), &criteria).unwrap();
    assert_eq!(ids(&result), vec!["j3"]);
}

#[test]
fn test_category_filter_matches_object_name() {
    let result = search_and_filter(
        create_test_listings(),
        &FilterCriteria::default().with_category("3D Design"),
    )
    .unwrap();
    assert_eq!(ids(&result), vec!["j2"]);
}

#[test]
fn test_date_sort_uses_fallback_and_puts_unparseable_last() {
    let desc = search_and_filter(
        create_test_listings(),
        &FilterCriteria::default().with_sort("date", "desc"),
    )
    .unwrap();
    assert_eq!(ids(&desc), vec!["j2", "j1", "j3", "j4"]);

    let asc = search_and_filter(
        create_test_listings(),
        &FilterCriteria::default().with_sort("date", "asc"),
    )
    .unwrap();
    assert_eq!(ids(&asc), vec!["j3", "j1", "j2", "j4"]);
}

#[test]
fn test_views_and_title_sorts() {
    let by_views = search_and_filter(
        create_test_listings(),
        &FilterCriteria::default().with_sort("views", "desc"),
    )
    .unwrap();
    assert_eq!(ids(&by_views), vec!["j2", "j1", "j3", "j4"]);

    let by_title = search_and_filter(
        create_test_listings(),
        &FilterCriteria::default().with_sort("title", "asc"),
    )
    .unwrap();
    assert_eq!(ids(&by_title), vec!["j2", "j4", "j1", "j3"]);
}

#[test]
fn test_malformed_budget_listing_is_dropped() {
    let listings = parse_records(
        &json!([
            {"title": "Logo Design", "budget": "300", "category": "Logo Design", "createdAt": "2024-01-01"},
            {"title": "3D Model", "budget": "abc", "category": "3D Design", "createdAt": "2024-02-01"}
        ])
        .to_string(),
    )
    .unwrap();
    let criteria: FilterCriteria = serde_json::from_value(json!({
        "searchTerm": "",
        "category": "all",
        "experienceLevel": "all",
        "location": "all",
        "budgetMin": "100",
        "budgetMax": "",
        "sortBy": "date",
        "sortOrder": "desc"
    }))
    .unwrap();

    let result = search_and_filter(listings, &criteria).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].title_text().as_deref(), Some("Logo Design"));
}

#[test]
fn test_search_posts_and_filter_posts() {
    assert!(search_posts(vec![], Some("design")).unwrap().is_empty());

    let listings = create_test_listings();
    assert_eq!(search_posts(listings.clone(), Some("")).unwrap(), listings);

    // Category labels are not part of the post search.
    let matched = search_posts(listings.clone(), Some("programming")).unwrap();
    assert!(matched.is_empty());

    let matched = search_posts(listings.clone(), Some("BLENDER")).unwrap();
    assert_eq!(ids(&matched), vec!["j2"]);

    assert_eq!(filter_posts(listings.clone(), &json!({"category": "Writing"})), listings);
}

#[test]
fn test_records_round_trip_unchanged() {
    let listings = create_test_listings();
    let before = serde_json::to_value(&listings).unwrap();
    let result = search_and_filter(listings, &no_op_criteria()).unwrap();
    assert_eq!(serde_json::to_value(&result).unwrap(), before);
}

#[test]
fn test_loosely_typed_listings_pass_through_unchanged() {
    let input = json!([
        {"title": "a", "skills": ["rust", "go"], "description": null, "views": null, "location": {"city": "Paris"}},
        {"title": 42, "budget": null, "createdAt": null, "owner": null, "experienceLevel": 3}
    ]);
    let listings: Vec<ListRecord> = serde_json::from_value(input.clone()).unwrap();

    let searched = search_and_filter(listings.clone(), &no_op_criteria()).unwrap();
    assert_eq!(serde_json::to_value(&searched).unwrap(), input);

    let posts = search_posts(listings.clone(), None).unwrap();
    assert_eq!(serde_json::to_value(&posts).unwrap(), input);

    let filtered = filter_posts(listings.clone(), &json!({}));
    assert_eq!(serde_json::to_value(&filtered).unwrap(), input);

    // Array skills are searched as their comma-joined text.
    let matched = search_posts(listings, Some("rust,go")).unwrap();
    assert_eq!(serde_json::to_value(&matched).unwrap(), json!([input[0].clone()]));
}
