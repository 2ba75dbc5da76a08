//! Fetches a chain document over HTTP and renders each block as an HTML
//! fragment appended to a container.

use chrono::{Local, TimeZone};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

/// Shown in place of any field the document did not supply.
const MISSING_FIELD: &str = "-";

const PAGE_TEMPLATE: &str = include_str!("page.html");

/// One block as delivered by the data source. Every field is optional: the
/// document is displayed as-is and absent values degrade to a placeholder
/// instead of failing the whole page.
#[derive(Clone, Debug, Deserialize)]
pub struct BlockRecord {
    pub index: Option<u64>,
    /// Unix epoch seconds.
    pub timestamp: Option<i64>,
    /// Opaque payload, serialized for display and never interpreted.
    pub transactions: Option<Value>,
    pub previous_hash: Option<String>,
    pub hash: Option<String>,
    /// Integer or string, displayed as supplied.
    pub nonce: Option<Value>,
}

/// Everything that can go wrong while loading the chain document. All cases
/// are handled the same way at the render boundary: logged and suppressed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response body was not a block list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Append target for rendered fragments. Fragments are only ever added;
/// nothing removes, replaces, or reorders them.
pub trait Container {
    fn append(&mut self, fragment: String);
}

/// In-memory container carrying the id of the page element it stands for.
#[derive(Clone, Debug)]
pub struct HtmlContainer {
    element_id: String,
    fragments: Vec<String>,
}

impl HtmlContainer {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            fragments: Vec::new(),
        }
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Wrap the accumulated fragments in a static page shell.
    pub fn into_page(self) -> String {
        let body = self.fragments.concat();
        PAGE_TEMPLATE
            .replace("{container_id}", &self.element_id)
            .replace("{fragments}", &body)
    }
}

impl Container for HtmlContainer {
    fn append(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }
}

/// Synthesize the display fragment for one block: heading with the index,
/// then timestamp, transactions, previous hash, hash, and nonce rows.
pub fn render_fragment(block: &BlockRecord) -> String {
    let index = block
        .index
        .map(|i| i.to_string())
        .unwrap_or_else(|| MISSING_FIELD.to_string());
    let timestamp = block
        .timestamp
        .map(timestamp_text)
        .unwrap_or_else(|| MISSING_FIELD.to_string());
    let transactions = block
        .transactions
        .as_ref()
        .map(|txs| txs.to_string())
        .unwrap_or_else(|| MISSING_FIELD.to_string());
    let previous_hash = block.previous_hash.as_deref().unwrap_or(MISSING_FIELD);
    let hash = block.hash.as_deref().unwrap_or(MISSING_FIELD);
    let nonce = block
        .nonce
        .as_ref()
        .map(scalar_text)
        .unwrap_or_else(|| MISSING_FIELD.to_string());

    let mut html = String::from("<div class=\"block\">\n");
    html.push_str(&format!("  <h3>Block #{index}</h3>\n"));
    html.push_str(&format!("  <p><strong>Timestamp:</strong> {timestamp}</p>\n"));
    html.push_str(&format!(
        "  <p><strong>Transactions:</strong> {transactions}</p>\n"
    ));
    html.push_str(&format!(
        "  <p><strong>Previous Hash:</strong> {previous_hash}</p>\n"
    ));
    html.push_str(&format!("  <p><strong>Hash:</strong> {hash}</p>\n"));
    html.push_str(&format!("  <p><strong>Nonce:</strong> {nonce}</p>\n"));
    html.push_str("</div>\n");
    html
}

/// Append one fragment per block, in exactly the order the document supplies.
/// Calling this again on the same document appends the blocks again.
pub fn render_document(blocks: &[BlockRecord], container: &mut dyn Container) {
    for block in blocks {
        container.append(render_fragment(block));
    }
}

/// Epoch seconds to a local date/time string, via the milliseconds form the
/// display contract is stated in.
fn timestamp_text(secs: i64) -> String {
    secs.checked_mul(1000)
        .and_then(|millis| Local.timestamp_millis_opt(millis).single())
        .map(|dt| dt.format("%c").to_string())
        .unwrap_or_else(|| MISSING_FIELD.to_string())
}

/// Strings display verbatim; every other scalar displays as its JSON text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// HTTP client plus the fixed location of the chain document.
pub struct ChainView {
    http: Client,
    data_url: String,
}

impl ChainView {
    pub fn new(data_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            data_url: data_url.into(),
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// One GET of the document, parsed as an ordered block list. No timeout,
    /// no retry; a non-success status is an error.
    pub async fn fetch_chain(&self) -> Result<Vec<BlockRecord>, LoadError> {
        let response = self
            .http
            .get(&self.data_url)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the document and append one fragment per block to the container.
    /// On any load failure the container is left untouched and a single
    /// diagnostic entry is written; nothing is raised to the caller.
    pub async fn load_and_render(&self, container: &mut dyn Container) {
        match self.fetch_chain().await {
            Ok(blocks) => render_document(&blocks, container),
            Err(err) => error!("error loading blockchain data: {err}"),
        }
    }
}
