//! Provider backends
//!
//! Each backend speaks its own upstream protocol but resolves to the same
//! `ResolvedPackage` shape, so the assembler never needs to know which one
//! it is talking to.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use importmap_core::error::ImportmapError;
use importmap_core::Provider;

use crate::client::HttpClient;

pub mod cdnjs;
pub mod esmsh;
pub mod jsdelivr;
pub mod raw;
pub mod skypack;
pub mod unpkg;

pub use cdnjs::Cdnjs;
pub use esmsh::EsmSh;
pub use jsdelivr::JsDelivr;
pub use raw::Raw;
pub use skypack::Skypack;
pub use unpkg::Unpkg;

/// Pick the version to resolve against a backend's version list.
///
/// An exact match of `requested` wins; anything else, including a version
/// the backend has never heard of, falls back to `latest`.
pub fn negotiate_version(requested: Option<&str>, latest: &str, available: &[String]) -> String {
    match requested {
        Some(wanted) if wanted != latest => available
            .iter()
            .find(|v| v.as_str() == wanted)
            .cloned()
            .unwrap_or_else(|| latest.to_string()),
        _ => latest.to_string(),
    }
}

/// Named backends selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    #[default]
    Cdnjs,
    JsDelivr,
    JsDelivrEsm,
    EsmSh,
    Unpkg,
    Skypack,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::Cdnjs,
        ProviderKind::JsDelivr,
        ProviderKind::JsDelivrEsm,
        ProviderKind::EsmSh,
        ProviderKind::Unpkg,
        ProviderKind::Skypack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Cdnjs => "cdnjs",
            ProviderKind::JsDelivr => "jsdelivr",
            ProviderKind::JsDelivrEsm => "jsdelivr-esm",
            ProviderKind::EsmSh => "esmsh",
            ProviderKind::Unpkg => "unpkg",
            ProviderKind::Skypack => "skypack",
        }
    }

    /// Instantiate the backend with its public endpoints
    pub fn build(self, http: HttpClient) -> Arc<dyn Provider> {
        match self {
            ProviderKind::Cdnjs => Arc::new(Cdnjs::new(http)),
            ProviderKind::JsDelivr => Arc::new(JsDelivr::new(http)),
            ProviderKind::JsDelivrEsm => Arc::new(JsDelivr::esm(http)),
            ProviderKind::EsmSh => Arc::new(EsmSh::new(http)),
            ProviderKind::Unpkg => Arc::new(Unpkg::new(http)),
            ProviderKind::Skypack => Arc::new(Skypack::new(http)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ImportmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "esm.sh" => return Ok(ProviderKind::EsmSh),
            "jsdelivr+esm" => return Ok(ProviderKind::JsDelivrEsm),
            _ => {},
        }

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ImportmapError::UnknownProvider { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_negotiate_exact_match() {
        let available = versions(&["1.8.0", "1.8.5", "1.8.6"]);
        assert_eq!(negotiate_version(Some("1.8.0"), "1.8.6", &available), "1.8.0");
    }

    #[test]
    fn test_negotiate_unknown_falls_back_to_latest() {
        let available = versions(&["1.8.0", "1.8.5", "1.8.6"]);
        assert_eq!(negotiate_version(Some("9.9.9"), "1.8.6", &available), "1.8.6");
    }

    #[test]
    fn test_negotiate_unset_is_latest() {
        assert_eq!(negotiate_version(None, "1.8.6", &[]), "1.8.6");
    }

    #[test]
    fn test_provider_kind_round_trip() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
        assert_eq!("esm.sh".parse::<ProviderKind>().unwrap(), ProviderKind::EsmSh);
        assert_eq!(" CDNJS ".parse::<ProviderKind>().unwrap(), ProviderKind::Cdnjs);
    }

    #[test]
    fn test_unknown_provider_kind() {
        match "bower".parse::<ProviderKind>() {
            Err(ImportmapError::UnknownProvider { name }) => assert_eq!(name, "bower"),
            other => panic!("Expected UnknownProvider error, got {other:?}"),
        }
    }

    #[test]
    fn test_build_names_match_kind() {
        let http = HttpClient::new().unwrap();
        for kind in ProviderKind::ALL {
            assert_eq!(kind.build(http.clone()).name(), kind.as_str());
        }
    }
}
