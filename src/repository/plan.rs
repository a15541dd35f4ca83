use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Slug of the plan every new organization starts on.
pub const DEFAULT_PLAN_SLUG: &str = "free";

/// Read-mostly catalog entry. `features` and `limits` are opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub price: f64,
    pub billing_period: String,
    pub features: Value,
    pub limits: Value,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// The seeded catalog. The SQLite migration inserts the same rows.
pub fn default_catalog(now: i64) -> Vec<Plan> {
    let plan = |id: &str, name: &str, slug: &str, price: f64, features: Value, limits: Value| Plan {
        id: id.to_owned(),
        name: name.to_owned(),
        slug: slug.to_owned(),
        price,
        billing_period: "monthly".to_owned(),
        features,
        limits,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    vec![
        plan(
            "550e8400-e29b-41d4-a716-446655440001",
            "Free",
            DEFAULT_PLAN_SLUG,
            0.0,
            json!({"api_access": false, "priority_support": false}),
            json!({"max_users": 5, "max_projects": 3}),
        ),
        plan(
            "550e8400-e29b-41d4-a716-446655440002",
            "Pro",
            "pro",
            29.0,
            json!({"api_access": true, "priority_support": false}),
            json!({"max_users": 25, "max_projects": 50}),
        ),
        plan(
            "550e8400-e29b-41d4-a716-446655440003",
            "Enterprise",
            "enterprise",
            99.0,
            json!({"api_access": true, "priority_support": true}),
            json!({"max_users": -1, "max_projects": -1}),
        ),
    ]
}
