use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;

use super::FetchError;

const DEFAULT_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Properties requested for every lookup. Isomeric SMILES is preferred
/// and the canonical form kept as a fallback.
const PROPERTY_LIST: &str = "IsomericSMILES,CanonicalSMILES,IUPACName";

/// Blocking client for the PubChem PUG REST compound API.
pub struct PubChemClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompoundProperties {
    #[serde(rename = "CID")]
    pub cid: u64,
    #[serde(rename = "IsomericSMILES")]
    pub isomeric_smiles: Option<String>,
    #[serde(rename = "CanonicalSMILES")]
    pub canonical_smiles: Option<String>,
    #[serde(rename = "IUPACName")]
    pub iupac_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PropertyTableResponse {
    #[serde(rename = "PropertyTable")]
    table: PropertyTable,
}

#[derive(Debug, Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties")]
    properties: Vec<CompoundProperties>,
}

impl CompoundProperties {
    /// The SMILES to use downstream, isomeric preferred.
    pub fn smiles(&self) -> Option<&str> {
        self.isomeric_smiles
            .as_deref()
            .or(self.canonical_smiles.as_deref())
    }
}

impl PubChemClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("mol-depict/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn lookup_cid(&self, cid: u64) -> Result<CompoundProperties, FetchError> {
        let url = self.property_url(&["compound", "cid", &cid.to_string()])?;
        self.fetch_properties(url)
    }

    pub fn lookup_name(&self, name: &str) -> Result<CompoundProperties, FetchError> {
        let url = self.property_url(&["compound", "name", name])?;
        self.fetch_properties(url)
    }

    /// Builds `<base>/compound/<ns>/<id>/property/<list>/JSON` with
    /// proper percent-encoding of the identifier segment.
    fn property_url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|_| FetchError::BadBaseUrl(self.base_url.clone()))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| FetchError::BadBaseUrl(self.base_url.clone()))?;
            for segment in segments {
                path.push(segment);
            }
            path.push("property");
            path.push(PROPERTY_LIST);
            path.push("JSON");
        }
        Ok(url)
    }

    fn fetch_properties(&self, url: Url) -> Result<CompoundProperties, FetchError> {
        let response = self.http.get(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body: PropertyTableResponse = response.json()?;
        body.table
            .properties
            .into_iter()
            .next()
            .ok_or(FetchError::EmptyResult)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_url_encodes_name() {
        let client = PubChemClient::with_base_url("https://example.org/rest/pug").unwrap();
        let url = client
            .property_url(&["compound", "name", "acetylsalicylic acid"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.org/rest/pug/compound/name/acetylsalicylic%20acid/property/IsomericSMILES,CanonicalSMILES,IUPACName/JSON"
        );
    }

    #[test]
    fn property_url_for_cid() {
        let client = PubChemClient::with_base_url("https://example.org/rest/pug").unwrap();
        let url = client.property_url(&["compound", "cid", "2244"]).unwrap();
        assert!(url.as_str().contains("/compound/cid/2244/property/"));
    }

    #[test]
    fn deserializes_property_table() {
        let raw = r#"{
            "PropertyTable": {
                "Properties": [{
                    "CID": 2244,
                    "IsomericSMILES": "CC(=O)OC1=CC=CC=C1C(=O)O",
                    "CanonicalSMILES": "CC(=O)OC1=CC=CC=C1C(=O)O",
                    "IUPACName": "2-acetyloxybenzoic acid"
                }]
            }
        }"#;
        let parsed: PropertyTableResponse = serde_json::from_str(raw).unwrap();
        let record = &parsed.table.properties[0];
        assert_eq!(record.cid, 2244);
        assert_eq!(record.smiles(), Some("CC(=O)OC1=CC=CC=C1C(=O)O"));
        assert_eq!(record.iupac_name.as_deref(), Some("2-acetyloxybenzoic acid"));
    }

    #[test]
    fn smiles_falls_back_to_canonical() {
        let record = CompoundProperties {
            cid: 1,
            isomeric_smiles: None,
            canonical_smiles: Some("CCO".into()),
            iupac_name: None,
        };
        assert_eq!(record.smiles(), Some("CCO"));
    }
}
