//! Stand-in for the dining menus API, serving deterministic fixtures.
//!
//! Routes mirror upstream: `GET /locations` and `GET /{location}/{YYYY-MM-DD}`.
//! Like upstream, an unknown location is answered with 200 and an empty
//! `Location` field rather than an error status.

use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// Locations known to the mock, in the order `/locations` lists them.
pub const LOCATIONS: &[&str] = &["Earhart", "Ford", "Hillenbrand", "Wiley", "Windsor", "Pete's Za"];

/// Never serves a meal; every status is `Unavailable`.
pub const ALWAYS_UNAVAILABLE: &str = "Hillenbrand";

/// Unavailable on Saturdays and Sundays.
pub const WEEKDAYS_ONLY: &str = "Windsor";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationList {
    #[serde(rename = "Location")]
    pub location: Vec<LocationName>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationName {
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Day {
    pub location: String,
    pub notes: Option<String>,
    pub meals: Vec<Meal>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Meal {
    pub name: String,
    #[serde(rename = "Type")]
    pub meal_type: String,
    pub status: String,
    pub hours: Option<Hours>,
    pub stations: Vec<Station>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Hours {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Station {
    pub name: String,
    pub icon_url: String,
    pub items: Vec<Item>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    pub name: String,
    pub is_vegetarian: bool,
    pub allergens: Vec<Allergen>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Allergen {
    pub name: String,
    pub value: bool,
}

pub fn app() -> Router {
    Router::new()
        .route("/locations", get(list_locations))
        .route("/{location}/{date}", get(get_day))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_locations() -> Json<LocationList> {
    Json(LocationList {
        location: LOCATIONS
            .iter()
            .map(|name| LocationName {
                name: name.to_string(),
            })
            .collect(),
    })
}

async fn get_day(Path((location, date)): Path<(String, String)>) -> Result<Json<Day>, StatusCode> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| StatusCode::BAD_REQUEST)?;
    debug!(%location, %date, "serving day");
    Ok(Json(day(&location, date)))
}

/// Fixture for `location` on `date`. Matching is case-insensitive and the
/// canonical name is echoed back.
pub fn day(location: &str, date: NaiveDate) -> Day {
    let Some(canonical) = LOCATIONS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(location))
    else {
        return Day {
            location: String::new(),
            notes: None,
            meals: Vec::new(),
        };
    };

    let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
    let unavailable = *canonical == ALWAYS_UNAVAILABLE || (*canonical == WEEKDAYS_ONLY && weekend);

    let meals = [
        ("Breakfast", "07:00:00", "10:00:00"),
        ("Lunch", "11:00:00", "14:00:00"),
        ("Dinner", "17:00:00", "20:00:00"),
    ]
    .into_iter()
    .map(|(name, start, end)| {
        let status = if unavailable {
            "Unavailable"
        } else if name == "Dinner" && date.weekday() == Weekday::Fri {
            "Closed"
        } else {
            "Open"
        };
        Meal {
            name: name.to_string(),
            meal_type: name.to_string(),
            status: status.to_string(),
            hours: (!unavailable).then(|| Hours {
                start_time: start.to_string(),
                end_time: end.to_string(),
            }),
            stations: if unavailable { Vec::new() } else { stations(canonical, name) },
        }
    })
    .collect();

    Day {
        location: canonical.to_string(),
        notes: (*canonical == "Ford").then(|| "Late lunch until 15:00".to_string()),
        meals,
    }
}

fn stations(location: &str, meal: &str) -> Vec<Station> {
    vec![
        Station {
            name: "Grill".to_string(),
            icon_url: "https://example.edu/icons/grill.png".to_string(),
            items: vec![
                Item {
                    name: format!("{location} {meal} Burger"),
                    is_vegetarian: false,
                    allergens: vec![
                        allergen("Wheat", true),
                        allergen("Soy", false),
                        allergen("Milk", true),
                    ],
                },
                Item {
                    name: "Black Bean Patty".to_string(),
                    is_vegetarian: true,
                    allergens: vec![allergen("Soy", true), allergen("Egg", false)],
                },
            ],
        },
        Station {
            name: "Salad Bar".to_string(),
            icon_url: "https://example.edu/icons/salad.png".to_string(),
            items: vec![Item {
                name: "Garden Salad".to_string(),
                is_vegetarian: true,
                allergens: Vec::new(),
            }],
        },
    ]
}

fn allergen(name: &str, value: bool) -> Allergen {
    Allergen {
        name: name.to_string(),
        value,
    }
}
