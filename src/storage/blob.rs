use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{FetchError, ObjectInfo, ObjectStore};

// ---------------------------------------------------------------------------
// BlobStore – HTTP blob container backend
// ---------------------------------------------------------------------------

/// Read-only client for an Azure-style blob container. The container URL
/// may carry a SAS token as its query string; it is re-applied to every
/// request.
pub struct BlobStore {
    client: reqwest::blocking::Client,
    /// Container URL without query string, no trailing slash.
    base_url: String,
    /// SAS query string without the leading `?`; empty for public containers.
    sas_query: String,
}

impl BlobStore {
    pub fn new(container_url: &str) -> Self {
        let (base_url, sas_query) = match container_url.split_once('?') {
            Some((base, query)) => (base, query),
            None => (container_url, ""),
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        BlobStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            sas_query: sas_query.to_string(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        if self.sas_query.is_empty() {
            format!("{}/{key}", self.base_url)
        } else {
            format!("{}/{key}?{}", self.base_url, self.sas_query)
        }
    }

    fn list_url(&self, prefix: &str) -> String {
        let mut url = format!(
            "{}?restype=container&comp=list&prefix={prefix}",
            self.base_url
        );
        if !self.sas_query.is_empty() {
            url.push('&');
            url.push_str(&self.sas_query);
        }
        url
    }
}

impl ObjectStore for BlobStore {
    fn fetch(&self, key: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(self.object_url(key))
            .send()
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(key.to_string()));
        }
        if !response.status().is_success() {
            return Err(FetchError::Transient(format!(
                "GET {key}: status {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Transient(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectInfo>, FetchError> {
        let response = self
            .client
            .get(self.list_url(prefix))
            .send()
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Transient(format!(
                "list {prefix}: status {}",
                response.status()
            )));
        }
        let body = response
            .text()
            .map_err(|e| FetchError::Transient(e.to_string()))?;
        Ok(parse_list_xml(&body))
    }
}

// ---------------------------------------------------------------------------
// Listing XML
// ---------------------------------------------------------------------------

/// Extract `(Name, Last-Modified)` pairs from a container listing.
///
/// The listing document is small and its schema fixed, so this scans for
/// the two known tags instead of pulling in an XML dependency. Entries
/// with a missing or unparseable timestamp are skipped with a warning.
fn parse_list_xml(body: &str) -> Vec<ObjectInfo> {
    let mut out = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find("<Blob>") {
        let after = &rest[start + "<Blob>".len()..];
        let Some(end) = after.find("</Blob>") else {
            break;
        };
        let chunk = &after[..end];
        match (tag_text(chunk, "Name"), tag_text(chunk, "Last-Modified")) {
            (Some(name), Some(modified)) => match DateTime::parse_from_rfc2822(modified) {
                Ok(dt) => out.push(ObjectInfo {
                    key: name.to_string(),
                    last_modified: dt.with_timezone(&Utc),
                }),
                Err(e) => log::warn!("listing entry {name}: bad Last-Modified ({e})"),
            },
            _ => log::warn!("listing entry without Name/Last-Modified, skipping"),
        }
        rest = &after[end..];
    }
    out
}

fn tag_text<'a>(chunk: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = chunk.find(&open)? + open.len();
    let end = chunk[start..].find(&close)? + start;
    Some(&chunk[start..end])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
