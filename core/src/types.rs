//! Domain model for one location's menu on one day.
//!
//! # Design
//! These are the normalized shapes handed to callers. They are built fresh by
//! the mapper for every response and never mutated afterwards. JSON field
//! names are camelCase so the values can be re-emitted as-is.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single served item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    #[serde(rename = "isVegetarian")]
    pub vegetarian: bool,
    /// Allergens flagged true upstream, in upstream order.
    pub allergens: Vec<String>,
}

/// A serving station and the items it offers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub name: String,
    #[serde(rename = "iconURL")]
    pub icon_url: String,
    pub items: Vec<Item>,
}

/// Upstream meal status. Literals are matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealStatus {
    Open,
    Closed,
    Unavailable,
    Other(String),
}

impl MealStatus {
    pub fn from_literal(literal: &str) -> Self {
        match literal {
            "Open" => MealStatus::Open,
            "Closed" => MealStatus::Closed,
            "Unavailable" => MealStatus::Unavailable,
            other => MealStatus::Other(other.to_string()),
        }
    }
}

/// One meal service with its hours and stations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    pub open: bool,
    pub status: MealStatus,
    #[serde(rename = "type")]
    pub meal_type: String,
    /// Raw `HH:MM:SS`, empty when upstream lists no hours.
    pub starting_hours: String,
    pub ending_hours: String,
    /// Upstream order; names are unique within a meal.
    pub stations: Vec<Station>,
}

impl Meal {
    pub fn station(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|station| station.name == name)
    }
}

/// Complete menu and status snapshot for one location on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiningInfo {
    pub notes: String,
    /// True when at least one meal is not `Unavailable`.
    pub available: bool,
    pub location: String,
    pub date: NaiveDate,
    pub meals: HashMap<String, Meal>,
}
