use serde::{Deserialize, Deserializer, Serialize};

/// Tracked tools, as persisted in the inventory YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trm_base_url: Option<String>,

    #[serde(default)]
    pub trm_entries: Vec<TrackedEntry>,
}

/// One tracked (tool, version, baseline decision) record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntry {
    /// Tool identifier on the decision page. YAML inventories often store it as an integer.
    #[serde(rename = "tid", alias = "tool_id", deserialize_with = "de_tool_id")]
    pub tool_id: String,

    /// Unquoted YAML numbers (`version: 3.10`) keep their source text, trailing zeros included.
    #[serde(default)]
    pub version: String,

    /// Baseline decision recorded on the previous scan.
    #[serde(default)]
    pub decision: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TrackedEntry {
    pub fn new(
        tool_id: impl Into<String>,
        version: impl Into<String>,
        decision: impl Into<String>,
    ) -> Self {
        Self {
            tool_id: tool_id.into(),
            version: version.into(),
            decision: decision.into(),
            name: None,
        }
    }
}

/// Plain scalars deserialize as their source text, so `tid: 0042` stays `"0042"`.
fn de_tool_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}
