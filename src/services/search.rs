use crate::core::constants::NEARBY_THRESHOLD_METERS;
use crate::core::geo::LonLat;
use crate::services::client::HTTP_CLIENT;
use crate::{MapError, Result};
use serde::Deserialize;

const DEFAULT_ENDPOINT: &str = "https://search-maps.yandex.ru/v1/";

/// Span of the search window around the queried point, in degrees.
const SEARCH_SPAN: &str = "0.1,0.1";

/// A business found near a queried point.
#[derive(Debug, Clone, PartialEq)]
pub struct Business {
    pub name: String,
    pub address: String,
    pub position: LonLat,
}

impl Business {
    /// Result line for the UI.
    pub fn display(&self) -> String {
        format!("{}; {}", self.name, self.address)
    }
}

/// Client for the business-search service. Returns the top-ranked result,
/// and only if it actually lies near the queried point; a miss or an empty
/// result set is `Ok(None)`.
pub struct BusinessSearch {
    api_key: String,
    endpoint: String,
    /// Response language, e.g. "ru_RU" or "en_US".
    pub lang: String,
}

impl BusinessSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            lang: "ru_RU".to_string(),
        }
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            lang: "ru_RU".to_string(),
        }
    }

    /// Searches for a business matching `text` near `origin`. The top-ranked
    /// hit is accepted only if it lies within the nearby threshold of the
    /// queried point.
    pub fn find_nearby(&self, origin: LonLat, text: &str) -> Result<Option<Business>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        log::debug!("business search {text:?} near {origin:?}");
        let resp = HTTP_CLIENT
            .get(&self.endpoint)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("lang", self.lang.as_str()),
                ("ll", &origin.to_query()),
                ("spn", SEARCH_SPAN),
                ("type", "biz"),
                ("text", text),
            ])
            .send()?;
        if !resp.status().is_success() {
            return Err(MapError::Service {
                status: resp.status(),
            });
        }

        let top = parse_response(&resp.text()?)?;
        Ok(top.filter(|business| accept_nearby(business, origin)))
    }
}

/// The top-ranked business from the service's JSON body, if any.
pub(crate) fn parse_response(body: &str) -> Result<Option<Business>> {
    let envelope: Envelope = serde_json::from_str(body)?;
    let Some(feature) = envelope.features.into_iter().next() else {
        return Ok(None);
    };

    let [lon, lat] = feature.geometry.coordinates;
    let company = feature.properties.company_meta_data;
    Ok(Some(Business {
        name: company.name,
        address: company.address,
        position: LonLat::new(lon, lat),
    }))
}

/// Distance gate for a candidate result.
pub(crate) fn accept_nearby(business: &Business, origin: LonLat) -> bool {
    let distance = business.position.distance_to(&origin);
    if distance > NEARBY_THRESHOLD_METERS {
        log::debug!(
            "rejecting {:?}: {:.0} m from the queried point",
            business.name,
            distance
        );
        return false;
    }
    true
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(rename = "CompanyMetaData")]
    company_meta_data: CompanyMetaData,
}

#[derive(Debug, Deserialize)]
struct CompanyMetaData {
    name: String,
    address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUND: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "geometry": {"type": "Point", "coordinates": [20.501, 54.721]},
                "properties": {
                    "name": "Coffee No. 1",
                    "CompanyMetaData": {
                        "id": "1",
                        "name": "Coffee No. 1",
                        "address": "Kaliningrad, Mira ave. 1"
                    }
                }
            },
            {
                "geometry": {"type": "Point", "coordinates": [20.7, 54.9]},
                "properties": {
                    "name": "Coffee No. 2",
                    "CompanyMetaData": {
                        "id": "2",
                        "name": "Coffee No. 2",
                        "address": "Somewhere far"
                    }
                }
            }
        ]
    }"#;

    const EMPTY: &str = r#"{"type": "FeatureCollection", "features": []}"#;

    #[test]
    fn test_parse_takes_top_ranked() {
        let business = parse_response(FOUND).unwrap().unwrap();
        assert_eq!(business.name, "Coffee No. 1");
        assert_eq!(business.address, "Kaliningrad, Mira ave. 1");
        assert_eq!(business.position, LonLat::new(20.501, 54.721));
        assert_eq!(business.display(), "Coffee No. 1; Kaliningrad, Mira ave. 1");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_response(EMPTY).unwrap(), None);
    }

    #[test]
    fn test_nearby_gate() {
        let origin = LonLat::new(20.5, 54.72);
        let near = parse_response(FOUND).unwrap().unwrap();
        // ~130 m away, well inside the 500 m threshold.
        assert!(accept_nearby(&near, origin));

        let far = Business {
            name: "Coffee No. 2".to_string(),
            address: "Somewhere far".to_string(),
            position: LonLat::new(20.7, 54.9),
        };
        // Tens of kilometers away.
        assert!(!accept_nearby(&far, origin));
    }
}
