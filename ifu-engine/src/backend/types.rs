//! Wire-level data model of the IFU backend.

use std::fmt;
use std::str::FromStr;

use scan_payload::ResolvedIdentity;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error_handler::{EngineResult, IfuEngineError};

/// Search-dispatch discriminator.
///
/// Both modes run against the same document set with the same request and
/// response shape; for [`SearchMode::Ask`] the snippet carries a generated
/// answer instead of an extracted passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Literal keyword match.
    Search,
    /// Free-form question answering.
    Ask,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Search => "search",
            SearchMode::Ask => "ask",
        }
    }

    /// Notice shown when a successful request returned no items.
    pub fn empty_message(&self) -> &'static str {
        match self {
            SearchMode::Search => "No matching content found",
            SearchMode::Ask => "The assistant has no answer yet",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(SearchMode::Search),
            "ask" => Ok(SearchMode::Ask),
            other => Err(format!("unknown search mode `{other}`")),
        }
    }
}

/// A validated search request.
///
/// Identity fields are present only when the context carried a non-empty
/// value, so a search without a scanned device runs keyword-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub mode: SearchMode,
    pub assistantid: Option<String>,
    pub containerid: Option<String>,
}

impl SearchQuery {
    /// Builds a query from the session context and the user's keyword.
    ///
    /// # Errors
    /// [`IfuEngineError::EmptyKeyword`] when `keyword` is empty or whitespace.
    pub fn new(context: &ResolvedIdentity, keyword: &str, mode: SearchMode) -> EngineResult<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(IfuEngineError::EmptyKeyword);
        }

        Ok(Self {
            keyword: keyword.to_string(),
            mode,
            assistantid: non_empty(&context.assistantid),
            containerid: non_empty(&context.containerid),
        })
    }

    /// Query-string pairs in the order the backend documents them.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![("keyword", self.keyword.as_str()), ("mode", self.mode.as_str())];
        if let Some(a) = &self.assistantid {
            params.push(("assistantid", a.as_str()));
        }
        if let Some(c) = &self.containerid {
            params.push(("containerid", c.as_str()));
        }
        params
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Response of `GET /api/get_ifu`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub assistantid: Option<String>,
    #[serde(default)]
    pub containerid: Option<String>,
}

impl LookupResponse {
    /// Trimmed assistant id; blank counts as absent.
    pub fn assistantid(&self) -> Option<&str> {
        self.assistantid
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Trimmed container id; blank counts as absent.
    pub fn containerid(&self) -> Option<&str> {
        self.containerid
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One search hit. `page` and `snippet` are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Response of `GET /api/search_ifu`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResultItem>,
}

/// Up/down vote counts as reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    #[serde(default, deserialize_with = "lenient_count")]
    pub up: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub down: u64,
}

/// Counter values arrive as integers, floats, numeric strings or `null`.
/// Anything that is not a non-negative number counts as zero.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.max(0.0) as u64),
        _ => None,
    };
    Ok(n.unwrap_or(0))
}

/// Direction of a vote submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl FromStr for VoteDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(VoteDirection::Up),
            "down" => Ok(VoteDirection::Down),
            other => Err(format!("unknown vote direction `{other}`")),
        }
    }
}

/// Body of `POST /api/vote`.
#[derive(Debug, Serialize)]
pub(crate) struct VoteRequest {
    #[serde(rename = "type")]
    pub direction: VoteDirection,
}

/// Body of `POST /api/gaia`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// Response of `POST /api/gaia`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub content: String,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthReply {
    #[serde(default)]
    pub status: String,
}
