//! Trip and session models

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::photo::Photo;

/// Ship available to the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(rename = "type", default)]
    pub ship_type: String,
}

/// Session information returned by `capsule/sessionInfo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_info: SessionDetails,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionDetails {
    #[serde(default)]
    pub ships: Vec<Ship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripGuide {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Species sighted during a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sighting {
    pub specie_id: String,
    pub specie_name: String,
    #[serde(default)]
    pub specie_description: String,
}

/// Trip facts: date, guide, boat, sightings and weather
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub trip_date: String,
    #[serde(default)]
    pub trip_time: String,
    pub trip_guide: Option<TripGuide>,
    #[serde(default)]
    pub trip_boat: String,
    #[serde(default)]
    pub sightings: Vec<Sighting>,
    #[serde(default)]
    pub temp: String,
    #[serde(default)]
    pub wind: String,
    #[serde(default)]
    pub bright: String,
}

impl Trip {
    /// Calendar date of the trip
    ///
    /// Accepts a plain ISO date (`2025-04-16`) or an RFC 3339 timestamp.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.trip_date.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }
}

/// Collection (trip) the user belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTrip {
    #[serde(rename = "_id")]
    pub id: String,
    pub collection_name: String,
    pub trip: Trip,
    #[serde(default)]
    pub photos_amount: u32,
}

/// Response of `capsule/trips[/:userId]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTrips {
    pub user_id: String,
    #[serde(default)]
    pub collections: Vec<UserTrip>,
}

impl UserTrips {
    /// Collections ordered newest trip first; undated trips go last
    pub fn newest_first(&self) -> Vec<&UserTrip> {
        let mut trips: Vec<&UserTrip> = self.collections.iter().collect();
        trips.sort_by(|a, b| b.trip.date().cmp(&a.trip.date()));
        trips
    }
}

/// Response of `capsule/trip/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDetail {
    pub collection: CollectionDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDetail {
    pub collection_name: String,
    pub trip: Trip,
    #[serde(default)]
    pub photos_amount: u32,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(date: &str) -> Trip {
        Trip {
            trip_date: date.to_string(),
            trip_time: "09:00".to_string(),
            trip_guide: None,
            trip_boat: "Oceanus".to_string(),
            sightings: vec![],
            temp: "21".to_string(),
            wind: "NE 10".to_string(),
            bright: "sunny".to_string(),
        }
    }

    #[test]
    fn test_trip_date_formats() {
        assert_eq!(
            trip("2025-04-16").date(),
            NaiveDate::from_ymd_opt(2025, 4, 16)
        );
        assert_eq!(
            trip("2025-04-16T13:53:00.000Z").date(),
            NaiveDate::from_ymd_opt(2025, 4, 16)
        );
        assert_eq!(trip("16 April").date(), None);
    }

    #[test]
    fn test_user_trips_deserialize_and_order() {
        let json = r#"{
            "userId": "u1",
            "collections": [
                {"_id": "c1", "collectionName": "Whales", "photosAmount": 3,
                 "trip": {"tripDate": "2024-08-01", "tripGuide": {"_id": "g1", "name": "Ana", "lastName": "Silva"},
                          "sightings": [{"specieId": "s1", "specieName": "Physeter Macrocephalus", "specieDescription": "Sperm whale"}]}},
                {"_id": "c2", "collectionName": "Dolphins",
                 "trip": {"tripDate": "2025-04-16"}},
                {"_id": "c3", "collectionName": "Unknown",
                 "trip": {"tripDate": ""}}
            ]
        }"#;

        let trips: UserTrips = serde_json::from_str(json).expect("valid trips payload");
        assert_eq!(trips.collections.len(), 3);
        assert_eq!(trips.collections[0].trip.sightings[0].specie_name, "Physeter Macrocephalus");
        assert_eq!(trips.collections[1].photos_amount, 0);

        let ordered: Vec<&str> = trips.newest_first().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ordered, vec!["c2", "c1", "c3"]);
    }

    #[test]
    fn test_session_info_shape() {
        let json = r#"{"sessionInfo":{"ships":[{"_id":"s1","name":"Oceanus","capacity":40,"type":"catamaran"}]}}"#;
        let info: SessionInfo = serde_json::from_str(json).expect("valid session info");
        assert_eq!(info.session_info.ships[0].ship_type, "catamaran");

        let back = serde_json::to_string(&info).expect("serializable");
        assert_eq!(back, json);
    }
}
