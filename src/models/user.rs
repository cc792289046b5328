use serde::{Deserialize, Serialize};

// Persisted with the same camelCase layout the frontend stores in localStorage
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub favorite_countries: Vec<String>,
}
