//! Imagery metadata served by the Bing Maps REST service.
//! <https://learn.microsoft.com/en-us/bingmaps/rest-services/imagery/get-imagery-metadata>

use serde::{Deserialize, Serialize};

/// Default location of the Bing Maps REST services.
pub const METADATA_URL: &str = "https://dev.virtualearth.net/REST/v1";

/// Reasons why the metadata could not be turned into a working tile source.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Metadata request timed out.")]
    Timeout,

    #[error("Could not decode metadata: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected status code: {0}.")]
    Status(u16),

    #[error("Unexpected status description: '{0}'.")]
    StatusDescription(String),

    #[error("Authentication failed: '{0}'.")]
    Authentication(String),

    #[error("Expected exactly one resource set, got {0}.")]
    ResourceSets(usize),

    #[error("Expected exactly one resource, got {0}.")]
    Resources(usize),
}

/// Top level of the metadata response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub status_code: u16,
    #[serde(default)]
    pub status_description: String,
    #[serde(default)]
    pub authentication_result_code: String,
    #[serde(default)]
    pub resource_sets: Vec<ResourceSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSet {
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// Description of a single imagery set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Template with `{subdomain}`, `{culture}` and `{quadkey}` placeholders.
    pub image_url: String,
    #[serde(default)]
    pub image_url_subdomains: Vec<String>,
    pub image_width: u32,
    pub image_height: u32,
    pub zoom_min: u8,
    pub zoom_max: u8,
    #[serde(default)]
    pub imagery_providers: Vec<ImageryProvider>,
}

/// Data provider, which needs to be credited when its imagery is visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageryProvider {
    pub attribution: String,
    #[serde(default)]
    pub coverage_areas: Vec<CoverageArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageArea {
    /// `[south, west, north, east]` in degrees.
    pub bbox: [f64; 4],
    pub zoom_min: u8,
    pub zoom_max: u8,
}

impl Metadata {
    /// Check the response and extract its only resource.
    pub fn into_resource(self) -> Result<Resource, MetadataError> {
        if self.status_code != 200 {
            return Err(MetadataError::Status(self.status_code));
        }

        if self.status_description != "OK" {
            return Err(MetadataError::StatusDescription(self.status_description));
        }

        if self.authentication_result_code != "ValidCredentials" {
            return Err(MetadataError::Authentication(
                self.authentication_result_code,
            ));
        }

        let [resource_set] = <[ResourceSet; 1]>::try_from(self.resource_sets)
            .map_err(|sets| MetadataError::ResourceSets(sets.len()))?;

        let [resource] = <[Resource; 1]>::try_from(resource_set.resources)
            .map_err(|resources| MetadataError::Resources(resources.len()))?;

        Ok(resource)
    }
}

/// Decode and validate the metadata response.
pub fn parse(bytes: &[u8]) -> Result<Resource, MetadataError> {
    serde_json::from_slice::<Metadata>(bytes)?.into_resource()
}

/// URL of the metadata of the given imagery set.
pub fn metadata_url(base: &str, imagery_set: &str, api_key: &str, culture: &str) -> String {
    format!(
        "{base}/Imagery/Metadata/{imagery_set}?uriScheme=https&include=ImageryProviders&key={api_key}&c={culture}"
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Trimmed down response for the `Aerial` imagery set.
    pub(crate) const AERIAL: &str = include_str!("../assets/aerial.json");

    fn metadata() -> Metadata {
        serde_json::from_str(AERIAL).unwrap()
    }

    #[test]
    fn decoding_aerial_metadata() {
        let resource = parse(AERIAL.as_bytes()).unwrap();

        assert_eq!(1, resource.zoom_min);
        assert_eq!(21, resource.zoom_max);
        assert_eq!(256, resource.image_width);
        assert_eq!(256, resource.image_height);
        assert_eq!(vec!["t0", "t1", "t2", "t3"], resource.image_url_subdomains);
        assert_eq!(2, resource.imagery_providers.len());
        assert_eq!(
            [27., -32., 40., -13.5],
            resource.imagery_providers[1].coverage_areas[1].bbox
        );
    }

    #[test]
    fn imagery_providers_are_optional() {
        let mut metadata = metadata();
        metadata.resource_sets[0].resources[0].imagery_providers.clear();
        let json = serde_json::to_string(&metadata)
            .unwrap()
            .replace(r#","imageryProviders":[]"#, "");
        assert!(!json.contains("imageryProviders"));

        let resource = parse(json.as_bytes()).unwrap();
        assert!(resource.imagery_providers.is_empty());
    }

    #[test]
    fn rejecting_bad_status_code() {
        let metadata = Metadata {
            status_code: 401,
            ..metadata()
        };
        assert!(matches!(
            metadata.into_resource(),
            Err(MetadataError::Status(401))
        ));
    }

    #[test]
    fn rejecting_bad_status_description() {
        let metadata = Metadata {
            status_description: "Unauthorized".to_owned(),
            ..metadata()
        };
        assert!(matches!(
            metadata.into_resource(),
            Err(MetadataError::StatusDescription(description)) if description == "Unauthorized"
        ));
    }

    #[test]
    fn rejecting_invalid_credentials() {
        let metadata = Metadata {
            authentication_result_code: "InvalidCredentials".to_owned(),
            ..metadata()
        };
        assert!(matches!(
            metadata.into_resource(),
            Err(MetadataError::Authentication(_))
        ));
    }

    #[test]
    fn rejecting_wrong_number_of_resource_sets() {
        let mut metadata = metadata();
        metadata.resource_sets.clear();
        assert!(matches!(
            metadata.into_resource(),
            Err(MetadataError::ResourceSets(0))
        ));

        let mut metadata = self::metadata();
        metadata.resource_sets.push(metadata.resource_sets[0].clone());
        assert!(matches!(
            metadata.into_resource(),
            Err(MetadataError::ResourceSets(2))
        ));
    }

    #[test]
    fn rejecting_wrong_number_of_resources() {
        let mut metadata = metadata();
        metadata.resource_sets[0].resources.clear();
        assert!(matches!(
            metadata.into_resource(),
            Err(MetadataError::Resources(0))
        ));

        let mut metadata = self::metadata();
        let resource = metadata.resource_sets[0].resources[0].clone();
        metadata.resource_sets[0].resources.push(resource);
        assert!(matches!(
            metadata.into_resource(),
            Err(MetadataError::Resources(2))
        ));
    }

    #[test]
    fn error_response_is_rejected() {
        let response = r#"{
            "authenticationResultCode": "InvalidCredentials",
            "errorDetails": ["Access was denied. You may have entered your credentials incorrectly."],
            "resourceSets": [],
            "statusCode": 401,
            "statusDescription": "Unauthorized"
        }"#;

        assert!(matches!(
            parse(response.as_bytes()),
            Err(MetadataError::Status(401))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            parse(b"definitely not json"),
            Err(MetadataError::Decode(_))
        ));
    }

    #[test]
    fn building_metadata_url() {
        assert_eq!(
            "https://dev.virtualearth.net/REST/v1/Imagery/Metadata/Aerial?uriScheme=https&include=ImageryProviders&key=secret&c=pl-pl",
            metadata_url(METADATA_URL, "Aerial", "secret", "pl-pl")
        );
    }
}
