//! Compound identifier resolution.
//!
//! An identifier is ambiguous by design: it may be a PubChem CID, a
//! compound name, or a raw SMILES string. Resolution tries those three
//! interpretations in order, the same order the lookup database
//! resolves them: all-digit strings are CIDs, text goes through a name
//! lookup, and anything that still fails is parsed as SMILES directly.

mod pubchem;

pub use pubchem::{CompoundProperties, PubChemClient};

use thiserror::Error;

use crate::smiles;

/// Placeholder name used when the identifier was a raw SMILES string.
pub const CUSTOM_SMILES_NAME: &str = "custom_smiles";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lookup returned HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("lookup succeeded but returned no compound records")]
    EmptyResult,

    #[error("compound record for CID {cid} is missing a SMILES string")]
    MissingSmiles { cid: u64 },

    #[error("invalid lookup base URL: '{0}'")]
    BadBaseUrl(String),

    #[error(
        "could not interpret '{identifier}' as a PubChem CID, compound name, or valid SMILES"
    )]
    Unresolvable { identifier: String },
}

/// A compound identifier resolved to a concrete structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCompound {
    pub smiles: String,
    pub name: String,
    pub cid: Option<u64>,
}

/// Resolves `identifier` by trial interpretation.
///
/// A numeric identifier is treated as a CID and its lookup failure is
/// terminal. A failed name lookup is not: the identifier may still be
/// a SMILES string, so the error is swallowed and the SMILES parse
/// decides.
pub fn resolve(identifier: &str, client: &PubChemClient) -> Result<ResolvedCompound, FetchError> {
    let identifier = identifier.trim();

    if !identifier.is_empty() && identifier.chars().all(|c| c.is_ascii_digit()) {
        let cid: u64 = identifier
            .parse()
            .map_err(|_| FetchError::Unresolvable {
                identifier: identifier.to_string(),
            })?;
        let record = client.lookup_cid(cid)?;
        return resolved_from_record(record, || format!("CID_{cid}"));
    }

    if let Ok(record) = client.lookup_name(identifier) {
        return resolved_from_record(record, || identifier.to_string());
    }

    if smiles::is_valid(identifier) {
        return Ok(ResolvedCompound {
            smiles: identifier.to_string(),
            name: CUSTOM_SMILES_NAME.to_string(),
            cid: None,
        });
    }

    Err(FetchError::Unresolvable {
        identifier: identifier.to_string(),
    })
}

fn resolved_from_record(
    record: CompoundProperties,
    fallback_name: impl FnOnce() -> String,
) -> Result<ResolvedCompound, FetchError> {
    let smiles = record
        .smiles()
        .ok_or(FetchError::MissingSmiles { cid: record.cid })?
        .to_string();
    let name = record.iupac_name.clone().unwrap_or_else(fallback_name);
    Ok(ResolvedCompound {
        smiles,
        name,
        cid: Some(record.cid),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Client pointing at a dead address: every network lookup fails
    /// fast, which exercises the fallback ladder offline.
    fn offline_client() -> PubChemClient {
        PubChemClient::with_base_url("http://127.0.0.1:1/rest/pug").unwrap()
    }

    #[test]
    fn raw_smiles_resolves_without_network() {
        let resolved = resolve("CC(C)N(CCC1=CNC2=C1C(=CC=C2)OC)C(C)C", &offline_client()).unwrap();
        assert_eq!(resolved.name, CUSTOM_SMILES_NAME);
        assert_eq!(resolved.cid, None);
    }

    #[test]
    fn garbage_identifier_is_unresolvable() {
        let err = resolve("definitely not a compound!!", &offline_client()).unwrap_err();
        assert!(matches!(err, FetchError::Unresolvable { .. }));
    }

    #[test]
    fn numeric_identifier_failure_is_terminal() {
        // A CID lookup that cannot reach the server must not fall
        // through to SMILES parsing.
        let err = resolve("2244", &offline_client()).unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }

    #[test]
    fn record_without_smiles_is_an_error() {
        let record = CompoundProperties {
            cid: 7,
            isomeric_smiles: None,
            canonical_smiles: None,
            iupac_name: Some("x".into()),
        };
        let err = resolved_from_record(record, || "x".into()).unwrap_err();
        assert!(matches!(err, FetchError::MissingSmiles { cid: 7 }));
    }

    #[test]
    fn fallback_name_used_when_iupac_missing() {
        let record = CompoundProperties {
            cid: 9,
            isomeric_smiles: Some("CCO".into()),
            canonical_smiles: None,
            iupac_name: None,
        };
        let resolved = resolved_from_record(record, || "CID_9".into()).unwrap();
        assert_eq!(resolved.name, "CID_9");
        assert_eq!(resolved.cid, Some(9));
    }
}
