use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use epm_config::{ServiceResult, StorageService};
use epm_crypto::{ContentHasher, SINGLE_BLOCK_LIMIT};
use epm_types::{ContentId, ContentUri};

use crate::error::{StorageError, StorageResult};

/// Where an IPFS node's HTTP API is reachable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpfsEndpoint {
    pub host: String,
    pub port: u16,
    /// `http` or `https`.
    pub protocol: String,
}

impl IpfsEndpoint {
    pub fn new(host: impl Into<String>, port: u16, protocol: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            protocol: protocol.into(),
        }
    }

    /// Base URL of the node, e.g. `https://ipfs.infura.io:5001/`.
    pub fn base_url(&self) -> StorageResult<Url> {
        let raw = format!("{}://{}:{}/", self.protocol, self.host, self.port);
        Url::parse(&raw).map_err(|e| StorageError::Endpoint(format!("{raw}: {e}")))
    }
}

/// Response of `/api/v0/add`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AddResponse {
    hash: String,
}

/// Storage backed by an IPFS node's HTTP API.
#[derive(Clone, Debug)]
pub struct IpfsStorage {
    client: reqwest::Client,
    base: Url,
}

impl IpfsStorage {
    pub fn new(endpoint: &IpfsEndpoint) -> StorageResult<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            base: endpoint.base_url()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn api(&self, command: &str) -> StorageResult<Url> {
        self.base
            .join(&format!("api/v0/{command}"))
            .map_err(|e| StorageError::Endpoint(e.to_string()))
    }

    async fn check(response: reqwest::Response) -> StorageResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Add `payload` and return the node's content id.
    pub async fn add(&self, payload: Bytes) -> StorageResult<ContentId> {
        let local = ContentHasher::hash(&payload);
        let size = payload.len();
        let form = Form::new().part("file", Part::bytes(payload.to_vec()).file_name("manifest.json"));

        let response = self
            .client
            .post(self.api("add")?)
            .query(&[("pin", "true"), ("cid-version", "0")])
            .multipart(form)
            .send()
            .await?;
        let added: AddResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Response(e.to_string()))?;

        let remote = match ContentId::from_base58(&added.hash) {
            Ok(id) => id,
            Err(e) => {
                warn!(hash = %added.hash, error = %e, "node returned a non-CIDv0 hash; using local hash");
                return Ok(local);
            }
        };
        if remote != local {
            if size <= SINGLE_BLOCK_LIMIT {
                warn!(local = %local, remote = %remote, "ipfs node assigned a different content id");
            } else {
                debug!(local = %local, remote = %remote, size, "chunked payload hashed by node");
            }
        }
        info!(cid = %remote, size, "added payload to ipfs");
        Ok(remote)
    }

    /// Fetch the payload stored under `id`.
    pub async fn cat(&self, id: &ContentId) -> StorageResult<Bytes> {
        let response = self
            .client
            .post(self.api("cat")?)
            .query(&[("arg", id.to_base58())])
            .send()
            .await?;
        let payload = Self::check(response).await?.bytes().await?;
        if payload.len() <= SINGLE_BLOCK_LIMIT && !ContentHasher::verify(&payload, id) {
            warn!(cid = %id, "payload does not hash to its content id");
        }
        debug!(cid = %id, size = payload.len(), "read payload from ipfs");
        Ok(payload)
    }
}

#[async_trait]
impl StorageService for IpfsStorage {
    fn backend(&self) -> &str {
        "ipfs"
    }

    async fn write(&self, payload: Bytes) -> ServiceResult<ContentUri> {
        Ok(ContentUri::ipfs(self.add(payload).await?))
    }

    async fn read(&self, uri: &ContentUri) -> ServiceResult<Bytes> {
        Ok(self.cat(uri.content_id()).await?)
    }
}
