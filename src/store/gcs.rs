//! Google Cloud Storage client over the JSON API.
//!
//! Authentication is delegated: a bearer token is either given literally,
//! taken from `GOOGLE_OAUTH_ACCESS_TOKEN`, or printed by `gcloud`.

use super::{ObjectInfo, ObjectStore};
use crate::error::{AccessError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use std::io::Read;
use std::process::Command;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const API_BASE: &str = "https://storage.googleapis.com/storage/v1/";
const DOWNLOAD_BASE: &str = "https://storage.googleapis.com/download/storage/v1/";
const TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
const USER_AGENT: &str = concat!("connectome_access/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// How requests are authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// Application-default credentials of the local `gcloud` installation.
    #[default]
    GoogleDefault,
    /// Unauthenticated access to public buckets.
    Anonymous,
    /// A ready OAuth2 bearer token.
    Token(String),
}

impl FromStr for Credentials {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Err(AccessError::InvalidArgument(
                "empty credential; use google_default, anon or a bearer token".into(),
            )),
            "google_default" => Ok(Credentials::GoogleDefault),
            "anon" | "anonymous" => Ok(Credentials::Anonymous),
            token => Ok(Credentials::Token(token.to_string())),
        }
    }
}

impl Credentials {
    fn bearer_token(&self) -> Result<Option<String>> {
        match self {
            Credentials::Anonymous => Ok(None),
            Credentials::Token(token) => Ok(Some(token.clone())),
            Credentials::GoogleDefault => application_default_token().map(Some),
        }
    }
}

fn application_default_token() -> Result<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.trim().is_empty() {
            return Ok(token.trim().to_string());
        }
    }
    let output = Command::new("gcloud")
        .args(["auth", "application-default", "print-access-token"])
        .output()
        .map_err(|e| {
            AccessError::PreconditionFailed(format!(
                "no {TOKEN_ENV} set and gcloud could not be run ({e}); \
                 run `gcloud auth application-default login` or use anonymous access"
            ))
        })?;
    if !output.status.success() {
        return Err(AccessError::PreconditionFailed(format!(
            "gcloud could not print an access token: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(AccessError::PreconditionFailed(
            "gcloud printed an empty access token".into(),
        ));
    }
    Ok(token)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectResource {
    /// The JSON API encodes 64-bit integers as strings.
    size: Option<String>,
    content_type: Option<String>,
}

/// Blocking GCS client. Holds a token resolved once at connect time.
pub struct GcsClient {
    http: Client,
    token: Option<String>,
}

impl GcsClient {
    pub fn connect(credentials: Credentials) -> Result<Self> {
        let token = credentials.bearer_token()?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            // Large tables stream for minutes; no overall deadline.
            .timeout(None)
            .build()
            .map_err(|e| AccessError::PreconditionFailed(format!("failed to build http client: {e}")))?;
        tracing::debug!(anonymous = token.is_none(), "connected to gcs");
        Ok(Self { http, token })
    }

    fn object_url(base: &str, path: &str) -> Result<Url> {
        let (bucket, object) = path.split_once('/').ok_or_else(|| {
            AccessError::InvalidArgument(format!("expected bucket/object, got {path}"))
        })?;
        let mut url = Url::parse(base).map_err(|e| AccessError::remote(path, e))?;
        url.path_segments_mut()
            .map_err(|_| AccessError::remote(path, "base url cannot carry a path"))?
            .pop_if_empty()
            .extend(["b", bucket, "o", object]);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl ObjectStore for GcsClient {
    fn open(&self, path: &str) -> Result<Box<dyn Read>> {
        let mut url = Self::object_url(DOWNLOAD_BASE, path)?;
        url.query_pairs_mut().append_pair("alt", "media");
        let response = self
            .authorized(self.http.get(url))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| AccessError::remote(path, e))?;
        Ok(Box::new(response))
    }

    fn info(&self, path: &str) -> Result<ObjectInfo> {
        let url = Self::object_url(API_BASE, path)?;
        let resource: ObjectResource = self
            .authorized(self.http.get(url))
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| AccessError::remote(path, e))?;
        Ok(ObjectInfo {
            size: resource.size.and_then(|s| s.parse().ok()),
            content_type: resource.content_type,
        })
    }
}
