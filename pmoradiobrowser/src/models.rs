//! Data models for Radio Browser API responses
//!
//! The directory returns loosely typed JSON (empty strings for missing
//! values, `0`/`1` integers for booleans, comma separated tags). This module
//! deserializes the raw records and projects them into [`StationCandidate`].

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Search
// ============================================================================

/// Default number of results returned by a search
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Parameters of a station search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text station name
    pub name: String,
    /// Optional country filter (e.g., "France")
    pub country: Option<String>,
    /// Optional tag filter (e.g., "jazz")
    pub tag: Option<String>,
    /// Maximum number of results
    pub limit: u32,
}

impl SearchQuery {
    /// Create a query for a station name with the default limit
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: None,
            tag: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Restrict results to a country
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Restrict results to a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the result limit
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Query string pairs, in the order the API expects them
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("name", self.name.clone()), ("limit", self.limit.to_string())];
        if let Some(country) = self.country.as_deref().filter(|c| !c.trim().is_empty()) {
            pairs.push(("country", country.to_string()));
        }
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.trim().is_empty()) {
            pairs.push(("tag", tag.to_string()));
        }
        pairs
    }
}

// ============================================================================
// Station records
// ============================================================================

/// Raw station record as returned by `/json/stations/search`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawStation {
    name: Option<String>,
    country: Option<String>,
    language: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    bitrate: Option<u32>,
    codec: Option<String>,
    homepage: Option<String>,
    favicon: Option<String>,
    changeuuid: Option<String>,
    url: Option<String>,
    url_resolved: Option<String>,
    stationuuid: Option<String>,
    #[serde(deserialize_with = "lenient_flag")]
    lastcheckok: Option<bool>,
    tags: Option<String>,
}

/// A station found in the public directory
///
/// Read-only projection of a directory record. `url` may point at a playlist
/// or a redirect; `url_resolved` is the directory's own resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StationCandidate {
    pub name: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub bitrate: Option<u32>,
    pub codec: Option<String>,
    pub homepage: Option<String>,
    pub favicon: Option<String>,
    pub change_uuid: Option<String>,
    pub url: Option<String>,
    pub url_resolved: Option<String>,
    pub stationuuid: Option<String>,
    pub last_check_ok: Option<bool>,
    pub tags: Vec<String>,
}

impl StationCandidate {
    /// The best URL to hand to the stream resolver
    ///
    /// Prefers `url_resolved`, falls back to `url`.
    pub fn playable_url(&self) -> Option<&str> {
        self.url_resolved.as_deref().or(self.url.as_deref())
    }

    /// Human-readable name, or "Unknown station"
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown station")
    }
}

impl From<RawStation> for StationCandidate {
    fn from(raw: RawStation) -> Self {
        Self {
            name: non_empty(raw.name),
            country: non_empty(raw.country),
            language: non_empty(raw.language),
            bitrate: raw.bitrate,
            codec: non_empty(raw.codec),
            homepage: non_empty(raw.homepage),
            favicon: non_empty(raw.favicon),
            change_uuid: non_empty(raw.changeuuid),
            url: non_empty(raw.url),
            url_resolved: non_empty(raw.url_resolved),
            stationuuid: non_empty(raw.stationuuid),
            last_check_ok: raw.lastcheckok,
            tags: split_tags(raw.tags.as_deref().unwrap_or_default()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split the comma separated tag field into a set, keeping first-seen order
pub fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => Some(b),
        Some(serde_json::Value::Number(n)) => n.as_i64().map(|n| n != 0),
        Some(serde_json::Value::String(s)) => match s.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_station_normalization() {
        let raw: RawStation = serde_json::from_value(json!({
            "name": "  FIP  ",
            "country": "France",
            "language": "",
            "bitrate": 128,
            "codec": "AAC",
            "homepage": "https://www.radiofrance.fr/fip",
            "favicon": "",
            "changeuuid": "c1",
            "url": "http://icecast.radiofrance.fr/fip-midfi.mp3.m3u",
            "url_resolved": "http://icecast.radiofrance.fr/fip-midfi.mp3",
            "stationuuid": "s1",
            "lastcheckok": 1,
            "tags": "jazz,eclectic, Jazz ,,world"
        }))
        .unwrap();

        let station = StationCandidate::from(raw);
        assert_eq!(station.name.as_deref(), Some("FIP"));
        assert_eq!(station.language, None);
        assert_eq!(station.favicon, None);
        assert_eq!(station.bitrate, Some(128));
        assert_eq!(station.last_check_ok, Some(true));
        assert_eq!(station.tags, vec!["jazz", "eclectic", "world"]);
        assert_eq!(
            station.playable_url(),
            Some("http://icecast.radiofrance.fr/fip-midfi.mp3")
        );
    }

    #[test]
    fn test_playable_url_falls_back_to_url() {
        let station = StationCandidate {
            url: Some("http://example.com/stream.pls".to_string()),
            ..Default::default()
        };
        assert_eq!(station.playable_url(), Some("http://example.com/stream.pls"));
        assert_eq!(station.display_name(), "Unknown station");
    }

    #[test]
    fn test_missing_fields_are_tolerated() {
        let raw: RawStation = serde_json::from_value(json!({
            "name": "Minimal",
            "lastcheckok": "0",
            "bitrate": null
        }))
        .unwrap();
        let station = StationCandidate::from(raw);
        assert_eq!(station.last_check_ok, Some(false));
        assert_eq!(station.bitrate, None);
        assert!(station.tags.is_empty());
        assert_eq!(station.playable_url(), None);
    }

    #[test]
    fn test_query_pairs() {
        let query = SearchQuery::new("jazz").tag("bebop").limit(3);
        assert_eq!(
            query.query_pairs(),
            vec![
                ("name", "jazz".to_string()),
                ("limit", "3".to_string()),
                ("tag", "bebop".to_string()),
            ]
        );

        let blank_country = SearchQuery::new("x").country("  ");
        assert_eq!(blank_country.query_pairs().len(), 2);
    }
}
