use crate::core::geo::LonLat;
use crate::services::client::HTTP_CLIENT;
use crate::{MapError, Result};
use serde::Deserialize;

const DEFAULT_ENDPOINT: &str = "https://geocode-maps.yandex.ru/1.x/";

/// A single geocoder result: where the place is and what to call it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub position: LonLat,
    /// Full display name of the object, e.g. "Russia, Kaliningrad, ...".
    pub name: String,
    /// Formatted postal address.
    pub address: String,
    pub postal_code: Option<String>,
}

impl GeocodeHit {
    /// Address line for the UI, with the postal code appended when requested
    /// and known.
    pub fn display_address(&self, with_postal_code: bool) -> String {
        match (&self.postal_code, with_postal_code) {
            (Some(code), true) => format!("{}; {}", self.address, code),
            _ => self.address.clone(),
        }
    }
}

/// Forward and reverse geocoding client. Both directions hit the same
/// endpoint; reverse geocoding passes the `lon,lat` pair as the query.
///
/// An empty result set is a normal outcome, not an error: lookups return
/// `Ok(None)`.
pub struct Geocoder {
    api_key: String,
    endpoint: String,
}

impl Geocoder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Resolves a free-text place name to a coordinate and address.
    pub fn forward(&self, query: &str) -> Result<Option<GeocodeHit>> {
        if query.trim().is_empty() {
            return Ok(None);
        }
        self.request(query)
    }

    /// Finds the nearest named place or address for a coordinate.
    pub fn reverse(&self, position: LonLat) -> Result<Option<GeocodeHit>> {
        self.request(&position.to_query())
    }

    fn request(&self, geocode: &str) -> Result<Option<GeocodeHit>> {
        log::debug!("geocode query: {geocode:?}");
        let resp = HTTP_CLIENT
            .get(&self.endpoint)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("geocode", geocode),
                ("format", "json"),
            ])
            .send()?;
        if !resp.status().is_success() {
            return Err(MapError::Service {
                status: resp.status(),
            });
        }
        parse_response(&resp.text()?)
    }
}

/// Extracts the first geocoder hit from the service's JSON body, or `None`
/// when the service found nothing.
pub(crate) fn parse_response(body: &str) -> Result<Option<GeocodeHit>> {
    let envelope: Envelope = serde_json::from_str(body)?;
    let collection = envelope.response.geo_object_collection;

    if collection.meta_data_property.geocoder_response_meta_data.found == "0" {
        return Ok(None);
    }

    let Some(member) = collection.feature_member.into_iter().next() else {
        return Ok(None);
    };
    let object = member.geo_object;

    let Some(position) = parse_pos(&object.point.pos) else {
        log::warn!("geocoder returned unparseable position: {:?}", object.point.pos);
        return Ok(None);
    };

    let meta = object.meta_data_property.geocoder_meta_data;
    Ok(Some(GeocodeHit {
        position,
        name: meta.text,
        address: meta.address.formatted,
        postal_code: meta.address.postal_code,
    }))
}

/// The geocoder's `pos` field is a space-separated `lon lat` pair.
fn parse_pos(pos: &str) -> Option<LonLat> {
    let mut parts = pos.split_whitespace();
    let lon = parts.next()?.parse().ok()?;
    let lat = parts.next()?.parse().ok()?;
    Some(LonLat::new(lon, lat))
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "GeoObjectCollection")]
    geo_object_collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "metaDataProperty")]
    meta_data_property: CollectionMeta,
    #[serde(rename = "featureMember", default)]
    feature_member: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct CollectionMeta {
    #[serde(rename = "GeocoderResponseMetaData")]
    geocoder_response_meta_data: ResponseMetaData,
}

#[derive(Debug, Deserialize)]
struct ResponseMetaData {
    found: String,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "metaDataProperty")]
    meta_data_property: ObjectMeta,
    #[serde(rename = "Point")]
    point: GeoPoint,
}

#[derive(Debug, Deserialize)]
struct ObjectMeta {
    #[serde(rename = "GeocoderMetaData")]
    geocoder_meta_data: GeocoderMetaData,
}

#[derive(Debug, Deserialize)]
struct GeocoderMetaData {
    text: String,
    #[serde(rename = "Address")]
    address: Address,
}

#[derive(Debug, Deserialize)]
struct Address {
    formatted: String,
    postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeoPoint {
    pos: String,
}
