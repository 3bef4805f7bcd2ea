//! Raw upstream JSON schema and its mapping onto the domain model.
//!
//! # Design
//! Upstream field casing is not consistent between endpoints, so every field
//! is declared once with its PascalCase name and the other observed spellings
//! as aliases. Strings and arrays that arrive as `null` decode as empty.
//! `map_day` is the only path from a raw payload to a `DiningInfo`.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::types::{DiningInfo, Item, Meal, MealStatus, Station};

/// Treat an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `GET {base}/locations`.
#[derive(Debug, Deserialize)]
pub struct RawLocations {
    #[serde(rename = "Location", alias = "location", alias = "Locations", alias = "locations")]
    pub locations: Vec<RawLocation>,
}

#[derive(Debug, Deserialize)]
pub struct RawLocation {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
}

/// Body of `GET {base}/{location}/{date}`.
#[derive(Debug, Default, Deserialize)]
pub struct RawDay {
    #[serde(rename = "Location", alias = "location", default, deserialize_with = "nullable")]
    pub location: String,
    #[serde(rename = "Notes", alias = "notes", default, deserialize_with = "nullable")]
    pub notes: String,
    #[serde(rename = "Meals", alias = "meals", default, deserialize_with = "nullable")]
    pub meals: Vec<RawMeal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMeal {
    #[serde(rename = "Name", alias = "name", default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "Type", alias = "type", default, deserialize_with = "nullable")]
    pub meal_type: String,
    #[serde(rename = "Status", alias = "status", default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(rename = "Hours", alias = "hours", default)]
    pub hours: Option<RawHours>,
    #[serde(rename = "Stations", alias = "stations", default, deserialize_with = "nullable")]
    pub stations: Vec<RawStation>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawHours {
    #[serde(rename = "StartTime", alias = "startTime", default, deserialize_with = "nullable")]
    pub start_time: String,
    #[serde(rename = "EndTime", alias = "endTime", default, deserialize_with = "nullable")]
    pub end_time: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawStation {
    #[serde(rename = "Name", alias = "name", default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(
        rename = "IconUrl",
        alias = "IconURL",
        alias = "iconUrl",
        alias = "iconURL",
        default,
        deserialize_with = "nullable"
    )]
    pub icon_url: String,
    #[serde(rename = "Items", alias = "items", default, deserialize_with = "nullable")]
    pub items: Vec<RawItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawItem {
    #[serde(rename = "Name", alias = "name", default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "IsVegetarian", alias = "isVegetarian", default, deserialize_with = "nullable")]
    pub vegetarian: bool,
    #[serde(rename = "Allergens", alias = "allergens", default, deserialize_with = "nullable")]
    pub allergens: Vec<RawAllergen>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAllergen {
    #[serde(rename = "Name", alias = "name", default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "Value", alias = "value", default, deserialize_with = "nullable")]
    pub value: bool,
}

/// Map a decoded day payload onto a `DiningInfo` for `date`.
///
/// Pure: the same payload always yields an equal value. The caller is
/// expected to have rejected payloads with an empty location already.
pub fn map_day(raw: &RawDay, date: NaiveDate) -> DiningInfo {
    let meals: HashMap<String, Meal> = raw
        .meals
        .iter()
        .map(|meal| (meal.name.clone(), map_meal(meal)))
        .collect();

    DiningInfo {
        notes: raw.notes.clone(),
        available: is_available(&raw.meals),
        location: raw.location.clone(),
        date,
        meals,
    }
}

/// A day is available when any meal is listed with a status other than
/// `Unavailable`. No meals at all means unavailable.
pub fn is_available(meals: &[RawMeal]) -> bool {
    meals.iter().any(|meal| meal.status != "Unavailable")
}

fn map_meal(raw: &RawMeal) -> Meal {
    let (starting_hours, ending_hours) = raw
        .hours
        .as_ref()
        .map(|hours| (hours.start_time.clone(), hours.end_time.clone()))
        .unwrap_or_default();

    let mut stations: Vec<Station> = Vec::with_capacity(raw.stations.len());
    for raw_station in &raw.stations {
        let station = map_station(raw_station);
        match stations.iter_mut().find(|s| s.name == station.name) {
            Some(existing) => *existing = station,
            None => stations.push(station),
        }
    }

    Meal {
        name: raw.name.clone(),
        open: raw.status == "Open",
        status: MealStatus::from_literal(&raw.status),
        meal_type: raw.meal_type.clone(),
        starting_hours,
        ending_hours,
        stations,
    }
}

fn map_station(raw: &RawStation) -> Station {
    Station {
        name: raw.name.clone(),
        icon_url: raw.icon_url.clone(),
        items: raw.items.iter().map(map_item).collect(),
    }
}

fn map_item(raw: &RawItem) -> Item {
    Item {
        name: raw.name.clone(),
        vegetarian: raw.vegetarian,
        allergens: flatten_allergens(&raw.allergens),
    }
}

/// Keep the names of allergens flagged true, preserving upstream order.
pub fn flatten_allergens(allergens: &[RawAllergen]) -> Vec<String> {
    allergens
        .iter()
        .filter(|allergen| allergen.value)
        .map(|allergen| allergen.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 3).unwrap()
    }

    fn decode(json: &str) -> RawDay {
        serde_json::from_str(json).unwrap()
    }

    fn day_with_statuses(statuses: &[&str]) -> RawDay {
        RawDay {
            location: "Earhart".to_string(),
            meals: statuses
                .iter()
                .enumerate()
                .map(|(i, status)| RawMeal {
                    name: format!("Meal {i}"),
                    status: status.to_string(),
                    ..RawMeal::default()
                })
                .collect(),
            ..RawDay::default()
        }
    }

    const SAMPLE: &str = r#"{
        "Location": "Earhart",
        "Notes": null,
        "Meals": [
            {
                "Name": "Lunch",
                "Type": "Lunch",
                "Status": "Open",
                "Hours": { "StartTime": "10:30:00", "EndTime": "14:00:00" },
                "Stations": [
                    {
                        "Name": "Grill",
                        "IconUrl": "https://example.com/grill.png",
                        "Items": [
                            {
                                "Name": "Veggie Burger",
                                "IsVegetarian": true,
                                "Allergens": [
                                    { "Name": "Egg", "Value": true },
                                    { "Name": "Soy", "Value": false },
                                    { "Name": "Wheat", "Value": true }
                                ]
                            }
                        ]
                    },
                    { "Name": "Deli", "IconUrl": null, "Items": [] }
                ]
            },
            { "Name": "Dinner", "Type": "Dinner", "Status": "Closed", "Hours": null, "Stations": null }
        ]
    }"#;

    #[test]
    fn allergens_keep_only_true_flags() {
        let allergens = vec![
            RawAllergen { name: "Egg".to_string(), value: true },
            RawAllergen { name: "Soy".to_string(), value: false },
        ];
        assert_eq!(flatten_allergens(&allergens), vec!["Egg".to_string()]);
    }

    #[test]
    fn allergens_preserve_source_order() {
        let info = map_day(&decode(SAMPLE), date());
        let grill = info.meals["Lunch"].station("Grill").unwrap();
        assert_eq!(grill.items[0].allergens, vec!["Egg", "Wheat"]);
        assert!(grill.items[0].vegetarian);
    }

    #[test]
    fn all_unavailable_is_unavailable() {
        let raw = day_with_statuses(&["Unavailable", "Unavailable", "Unavailable"]);
        assert!(!map_day(&raw, date()).available);
    }

    #[test]
    fn any_open_or_closed_meal_is_available() {
        assert!(map_day(&day_with_statuses(&["Unavailable", "Open"]), date()).available);
        assert!(map_day(&day_with_statuses(&["Closed", "Unavailable"]), date()).available);
    }

    #[test]
    fn no_meals_is_unavailable() {
        assert!(!map_day(&day_with_statuses(&[]), date()).available);
    }

    #[test]
    fn open_only_for_exact_literal() {
        let info = map_day(&day_with_statuses(&["Open", "open", "Closed"]), date());
        assert!(info.meals["Meal 0"].open);
        assert!(!info.meals["Meal 1"].open);
        assert_eq!(info.meals["Meal 1"].status, MealStatus::Other("open".to_string()));
        assert!(!info.meals["Meal 2"].open);
    }

    #[test]
    fn maps_hours_and_stations_in_order() {
        let info = map_day(&decode(SAMPLE), date());
        assert_eq!(info.location, "Earhart");
        assert_eq!(info.notes, "");
        assert_eq!(info.date, date());

        let lunch = &info.meals["Lunch"];
        assert_eq!(lunch.meal_type, "Lunch");
        assert_eq!(lunch.starting_hours, "10:30:00");
        assert_eq!(lunch.ending_hours, "14:00:00");
        let names: Vec<&str> = lunch.stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Grill", "Deli"]);
        assert_eq!(lunch.station("Deli").unwrap().icon_url, "");

        let dinner = &info.meals["Dinner"];
        assert!(!dinner.open);
        assert_eq!(dinner.starting_hours, "");
        assert!(dinner.stations.is_empty());
    }

    #[test]
    fn accepts_camel_case_fields() {
        let raw = decode(
            r#"{"location":"Ford","notes":"Brunch only","meals":[{"name":"Brunch","type":"Brunch","status":"Open",
                "hours":{"startTime":"09:00:00","endTime":"13:00:00"},
                "stations":[{"name":"Waffles","iconURL":"w.png","items":[{"name":"Waffle","isVegetarian":true,
                "allergens":[{"name":"Milk","value":true}]}]}]}]}"#,
        );
        let info = map_day(&raw, date());
        assert_eq!(info.location, "Ford");
        assert_eq!(info.notes, "Brunch only");
        let brunch = &info.meals["Brunch"];
        assert_eq!(brunch.starting_hours, "09:00:00");
        assert_eq!(brunch.stations[0].icon_url, "w.png");
        assert_eq!(brunch.stations[0].items[0].allergens, vec!["Milk"]);
    }

    #[test]
    fn repeated_station_name_replaces_in_place() {
        let raw = decode(
            r#"{"Location":"Wiley","Meals":[{"Name":"Lunch","Status":"Open","Stations":[
                {"Name":"Grill","Items":[{"Name":"Old"}]},
                {"Name":"Deli","Items":[]},
                {"Name":"Grill","Items":[{"Name":"New"}]}]}]}"#,
        );
        let lunch = &map_day(&raw, date()).meals["Lunch"];
        assert_eq!(lunch.stations.len(), 2);
        assert_eq!(lunch.stations[0].name, "Grill");
        assert_eq!(lunch.stations[0].items[0].name, "New");
    }

    #[test]
    fn mapping_is_idempotent() {
        let raw = decode(SAMPLE);
        assert_eq!(map_day(&raw, date()), map_day(&raw, date()));
    }

    #[test]
    fn locations_payload_keeps_names_verbatim() {
        let raw: RawLocations = serde_json::from_str(
            r#"{"Location":[{"Name":"Earhart"},{"Name":"Pete's Za"},{"Name":"earhart"}]}"#,
        )
        .unwrap();
        let names: Vec<&str> = raw.locations.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Earhart", "Pete's Za", "earhart"]);
    }

    #[test]
    fn locations_payload_requires_location_list() {
        let result: Result<RawLocations, _> = serde_json::from_str(r#"{"Name":"Earhart"}"#);
        assert!(result.is_err());
    }
}
