use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static LEADING_INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<sign>[+-]?)(?:0[xX](?P<hex>[0-9a-fA-F]*)|(?P<dec>[0-9]+))")
        .expect("static regex is valid")
});

/// Numeric conversation or thread id taken from the trailing segment of a page URL.
///
/// Parsing is lenient: only the leading integer counts, so `"42?tab=1"` is
/// `42`, `"0x1A"` is read as hex (`26`), while `"abc"`, `"0x"` or an empty
/// segment is [`TargetId::NaN`]. Ids outside `i64` are `NaN` too. A `NaN`
/// target is still sent; it shows up in the request path as the literal `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetId {
    Id(i64),
    NaN,
}

impl TargetId {
    /// Parse a single path segment.
    pub fn parse_segment(segment: &str) -> Self {
        let Some(caps) = LEADING_INTEGER.captures(segment) else {
            return TargetId::NaN;
        };

        let sign = &caps["sign"];
        let parsed = match (caps.name("hex"), caps.name("dec")) {
            (Some(hex), _) if !hex.as_str().is_empty() => {
                i64::from_str_radix(&format!("{sign}{}", hex.as_str()), 16)
            }
            (_, Some(dec)) => format!("{sign}{}", dec.as_str()).parse::<i64>(),
            _ => return TargetId::NaN,
        };

        parsed.map_or(TargetId::NaN, TargetId::Id)
    }

    /// Split the page URL on `/` and parse the last piece.
    pub fn from_page_url(url: &str) -> Self {
        let last = url.rsplit('/').next().unwrap_or_default();
        Self::parse_segment(last)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, TargetId::NaN)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Id(id) => write!(f, "{id}"),
            TargetId::NaN => f.write_str("NaN"),
        }
    }
}

/// Collection the direct messages hang off on the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    #[default]
    Conversations,
    Threads,
}

impl Resource {
    pub fn as_path(&self) -> &'static str {
        match self {
            Resource::Conversations => "conversations",
            Resource::Threads => "threads",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "conversations" | "conversation" => Ok(Resource::Conversations),
            "threads" | "thread" => Ok(Resource::Threads),
            other => Err(format!("unknown resource `{other}`")),
        }
    }
}

/// A direct message on its way to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub target_id: TargetId,
}

/// Wire body of `POST .../dm/add`.
#[derive(Debug, Serialize)]
pub struct DmBody<'a> {
    pub text: &'a str,
}

impl OutgoingMessage {
    pub fn body(&self) -> DmBody<'_> {
        DmBody { text: &self.text }
    }
}
