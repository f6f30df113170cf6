//! Static coordinates for placing fleet rows on a map
//!
//! Lookups are offline: a fixed table of city points, falling back to a
//! per-state centroid when the city is not listed.

use serde::Serialize;

/// A WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// How a row was placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationMatch {
    /// The city is in the city table
    City(Coordinates),
    /// Only the state is known; the point is the state centroid
    State(Coordinates),
}

impl LocationMatch {
    pub fn coordinates(self) -> Coordinates {
        match self {
            LocationMatch::City(c) | LocationMatch::State(c) => c,
        }
    }
}

// (city, state, lat, lon)
const CITY_COORDINATES: &[(&str, &str, f64, f64)] = &[
    ("New York", "New York", 40.7128, -74.0060),
    ("Los Angeles", "California", 34.0522, -118.2437),
    ("Chicago", "Illinois", 41.8781, -87.6298),
    ("Houston", "Texas", 29.7604, -95.3698),
    ("Phoenix", "Arizona", 33.4484, -112.0740),
    ("Philadelphia", "Pennsylvania", 39.9526, -75.1652),
    ("San Antonio", "Texas", 29.4241, -98.4936),
    ("San Diego", "California", 32.7157, -117.1611),
    ("Dallas", "Texas", 32.7767, -96.8005),
    ("San Jose", "California", 37.3382, -121.8863),
    ("Austin", "Texas", 30.2672, -97.7431),
    ("Jacksonville", "Florida", 30.3322, -81.6557),
    ("Fort Worth", "Texas", 32.7555, -97.3308),
    ("Columbus", "Ohio", 39.9612, -82.9988),
    ("Charlotte", "North Carolina", 35.2271, -80.8431),
    ("San Francisco", "California", 37.7749, -122.4194),
    ("Indianapolis", "Indiana", 39.7684, -86.1581),
    ("Seattle", "Washington", 47.6062, -122.3321),
    ("Denver", "Colorado", 39.7392, -104.9903),
    ("Washington", "District of Columbia", 38.9072, -77.0369),
    ("Boston", "Massachusetts", 42.3601, -71.0589),
    ("El Paso", "Texas", 31.7619, -106.4850),
    ("Detroit", "Michigan", 42.3314, -83.0458),
    ("Nashville", "Tennessee", 36.1627, -86.7816),
    ("Portland", "Oregon", 45.5152, -122.6784),
    ("Memphis", "Tennessee", 35.1495, -90.0490),
    ("Oklahoma City", "Oklahoma", 35.4676, -97.5164),
    ("Las Vegas", "Nevada", 36.1699, -115.1398),
    ("Louisville", "Kentucky", 38.2027, -85.7585),
    ("Baltimore", "Maryland", 39.2904, -76.6122),
    ("Hilton Head Island", "South Carolina", 32.2163, -80.7526),
    ("O'Fallon", "Missouri", 38.8106, -90.7001),
    ("Beulah", "North Dakota", 47.2625, -101.7782),
    ("Edmonds", "Washington", 47.8107, -122.3774),
    ("Dickinson", "North Dakota", 46.8783, -102.7895),
    ("South Kingstown", "Rhode Island", 41.4732, -71.5226),
    ("Dagsboro", "Delaware", 38.5493, -75.2477),
    ("Miramar", "Florida", 25.9860, -80.2320),
    ("Springfield", "Illinois", 39.7817, -89.6501),
    ("Rochester", "New York", 43.1566, -77.6088),
    ("Cleveland", "Ohio", 41.4993, -81.6944),
    ("Athens", "Georgia", 33.9519, -83.3576),
];

// (state, lat, lon)
const STATE_CENTROIDS: &[(&str, f64, f64)] = &[
    ("Alabama", 32.7, -86.8),
    ("Alaska", 64.0, -153.0),
    ("Arizona", 34.0, -111.0),
    ("Arkansas", 35.0, -92.0),
    ("California", 36.8, -119.4),
    ("Colorado", 39.0, -105.5),
    ("Connecticut", 41.6, -72.7),
    ("Delaware", 38.9, -75.5),
    ("Florida", 27.8, -81.7),
    ("Georgia", 33.0, -83.5),
    ("Hawaii", 21.1, -157.5),
    ("Idaho", 44.2, -114.5),
    ("Illinois", 40.3, -89.0),
    ("Indiana", 39.8, -86.3),
    ("Iowa", 42.0, -93.2),
    ("Kansas", 38.5, -96.7),
    ("Kentucky", 37.7, -84.9),
    ("Louisiana", 31.0, -91.8),
    ("Maine", 44.3, -69.8),
    ("Maryland", 39.0, -76.8),
    ("Massachusetts", 42.2, -71.5),
    ("Michigan", 43.3, -84.5),
    ("Minnesota", 45.7, -93.9),
    ("Mississippi", 32.7, -89.7),
    ("Missouri", 38.4, -92.2),
    ("Montana", 47.0, -110.0),
    ("Nebraska", 41.1, -98.0),
    ("Nevada", 38.3, -117.0),
    ("New Hampshire", 43.4, -71.5),
    ("New Jersey", 40.3, -74.5),
    ("New Mexico", 34.8, -106.2),
    ("New York", 42.2, -74.9),
    ("North Carolina", 35.6, -79.8),
    ("North Dakota", 47.5, -99.8),
    ("Ohio", 40.3, -82.8),
    ("Oklahoma", 35.6, -96.9),
    ("Oregon", 44.6, -122.1),
    ("Pennsylvania", 40.5, -77.2),
    ("Rhode Island", 41.7, -71.5),
    ("South Carolina", 33.8, -80.9),
    ("South Dakota", 44.3, -99.4),
    ("Tennessee", 35.7, -86.0),
    ("Texas", 31.1, -97.6),
    ("Utah", 40.2, -111.5),
    ("Vermont", 44.0, -72.7),
    ("Virginia", 37.8, -78.2),
    ("Washington", 47.4, -121.5),
    ("West Virginia", 38.5, -80.9),
    ("Wisconsin", 44.3, -89.6),
    ("Wyoming", 42.8, -107.3),
];

/// Coordinates of a listed city. Names match ignoring ASCII case and
/// surrounding whitespace.
pub fn city_coordinates(city: &str, state: &str) -> Option<Coordinates> {
    let (city, state) = (city.trim(), state.trim());
    CITY_COORDINATES
        .iter()
        .find(|(c, s, _, _)| c.eq_ignore_ascii_case(city) && s.eq_ignore_ascii_case(state))
        .map(|&(_, _, lat, lon)| Coordinates { lat, lon })
}

/// Centroid of a state by full name
pub fn state_centroid(state: &str) -> Option<Coordinates> {
    let state = state.trim();
    STATE_CENTROIDS
        .iter()
        .find(|(s, _, _)| s.eq_ignore_ascii_case(state))
        .map(|&(_, lat, lon)| Coordinates { lat, lon })
}

/// Place a row: the city point when listed, else the state centroid.
pub fn locate(city: &str, state: &str) -> Option<LocationMatch> {
    city_coordinates(city, state)
        .map(LocationMatch::City)
        .or_else(|| state_centroid(state).map(LocationMatch::State))
}
