use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A token as listed by the upstream search/trending endpoints. Unknown
/// upstream fields are kept in `extra` so passthrough responses stay intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub chainId: String,

    #[serde(default)]
    pub tokenAddress: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usdPrice: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketCap: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolderChange {
    #[serde(default)]
    pub change: i64,

    #[serde(default)]
    pub changePercent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolderStats {
    #[serde(default)]
    pub totalHolders: i64,

    #[serde(default)]
    pub holderChange: HashMap<String, HolderChange>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderHistoryPoint {
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub totalHolders: i64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Historical holder counts for one token. Upstream does not guarantee the
/// order of `result`; callers sort it ascending before responding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderHistory {
    #[serde(default)]
    pub result: Vec<HolderHistoryPoint>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HolderHistory {
    pub fn sort_ascending(&mut self) {
        self.result.sort_by_key(|point| point.timestamp);
    }
}

/// A trending token enriched with its holder statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingEntry {
    #[serde(flatten)]
    pub token: Token,

    pub holderStats: HolderStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trends {
    pub gainers: Vec<TrendingEntry>,
    pub losers: Vec<TrendingEntry>,
}
