//! Async data gateway to the compound registry.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::client::HttpClient;
use crate::config::GatewayConfig;
use crate::error::{MolSearchError, Result};
use crate::models::{
    CompoundDetail, CompoundHit, CompoundSummary, IdentifierQuery, VariantDetail,
};

/// Read-only view of the remote compound registry.
///
/// Implement this trait to plug the orchestrator into a different registry
/// transport; the search pipeline only needs the two search operations.
#[async_trait]
pub trait CompoundGateway: Send + Sync {
    /// Every registered compound.
    async fn list_compounds(&self) -> Result<Vec<CompoundSummary>>;

    /// Server-side substructure search with the raw pattern text.
    async fn search_substructure(&self, pattern: &str) -> Result<Vec<CompoundHit>>;

    /// Search by any non-empty subset of registration number, synonym and CAS.
    async fn search_identifiers(&self, query: &IdentifierQuery) -> Result<Vec<CompoundHit>>;

    /// One compound with its variants and synonyms.
    async fn compound_detail(&self, reg_number: &str) -> Result<CompoundDetail>;

    /// One variant.
    async fn variant_detail(&self, var_number: &str) -> Result<VariantDetail>;
}

/// Shared gateway handle, as stored by the orchestrator.
pub type DynGateway = Arc<dyn CompoundGateway>;

/// Gateway speaking the registry's JSON-over-HTTP API.
///
/// Endpoints, relative to the configured base URL:
/// - `GET compounds`
/// - `GET search/substructure?smiles=…`
/// - `GET search?regn=…&syn=…&cas=…`
/// - `GET compounds/{regNumber}`
/// - `GET variants/{varNumber}`
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: HttpClient,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = HttpClient::new(config)?;
        info!("Compound registry gateway at {}", client.base_url());
        Ok(Self { client })
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Build the URL for one record, percent-encoding the key as a path segment.
    fn record_url(&self, collection: &str, key: &str) -> Result<url::Url> {
        let key = key.trim();
        if key.is_empty() {
            return Err(MolSearchError::Validation {
                field: collection.to_string(),
                message: "identifier must not be empty".into(),
            });
        }
        let path = format!("{}/{}", collection, urlencoding::encode(key));
        self.client.endpoint(&path, &[])
    }

    /// The pattern is sent exactly as typed.
    fn substructure_url(&self, pattern: &str) -> Result<url::Url> {
        self.client.endpoint("search/substructure", &[("smiles", pattern)])
    }
}

#[async_trait]
impl CompoundGateway for HttpGateway {
    async fn list_compounds(&self) -> Result<Vec<CompoundSummary>> {
        let url = self.client.endpoint("compounds", &[])?;
        self.client.get_json(url).await
    }

    async fn search_substructure(&self, pattern: &str) -> Result<Vec<CompoundHit>> {
        let url = self.substructure_url(pattern)?;
        self.client.get_json(url).await
    }

    async fn search_identifiers(&self, query: &IdentifierQuery) -> Result<Vec<CompoundHit>> {
        let params = query.params();
        if params.is_empty() {
            return Err(MolSearchError::Validation {
                field: "identifier".into(),
                message: "at least one of regn, syn or cas is required".into(),
            });
        }
        let url = self.client.endpoint("search", &params)?;
        self.client.get_json(url).await
    }

    async fn compound_detail(&self, reg_number: &str) -> Result<CompoundDetail> {
        let url = self.record_url("compounds", reg_number)?;
        self.client.get_json(url).await
    }

    async fn variant_detail(&self, var_number: &str) -> Result<VariantDetail> {
        let url = self.record_url("variants", var_number)?;
        self.client.get_json(url).await
    }
}
