// Clash detection API response types
//
// Wire models for the clash-detection REST API. Fields use `#[serde(default)]`
// liberally: list responses omit optional metadata depending on the caller's
// permissions and the `Prefer` header, and result documents are produced by
// a separate pipeline with its own notion of optional.

use serde::{Deserialize, Deserializer, Serialize};

// ── Links ────────────────────────────────────────────────────────────

/// Hyperlink reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// Paging links on list responses. `next` is surfaced but never followed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<Link>,
}

// ── Tests ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestLinks {
    #[serde(default)]
    pub created_by: Option<Link>,
    #[serde(default)]
    pub last_modified_by: Option<Link>,
    #[serde(default)]
    pub test: Option<Link>,
}

/// A configured clash-detection test definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creation_date_time: Option<String>,
    #[serde(default)]
    pub modification_date_time: Option<String>,
    #[serde(default, rename = "_links")]
    pub links: TestLinks,
}

/// `GET /tests?projectId=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestList {
    #[serde(default)]
    pub tests: Vec<Test>,
    #[serde(default, rename = "_links")]
    pub links: PageLinks,
}

// ── Suppression rules ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleLinks {
    #[serde(default)]
    pub rule: Option<Link>,
}

/// A rule that marks matching clashes as intentionally ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressionRule {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub creation_date_time: Option<String>,
    #[serde(default)]
    pub modification_date_time: Option<String>,
    #[serde(default, rename = "_links")]
    pub links: RuleLinks,
}

/// `GET /suppressionRules?projectId=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressionRuleList {
    #[serde(default)]
    pub suppression_rules: Vec<SuppressionRule>,
    #[serde(default, rename = "_links")]
    pub links: PageLinks,
}

// ── Runs ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunLinks {
    #[serde(default)]
    pub result: Option<Link>,
    #[serde(default)]
    pub test: Option<Link>,
}

/// One execution of a test. List responses and the detail endpoint share
/// this shape; the list variant may omit the execution metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub executed_date_time: Option<String>,
    /// Number of clashes. The service has sent both strings and numbers here.
    #[serde(default, deserialize_with = "string_or_number")]
    pub count: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result_id: Option<String>,
    #[serde(default, rename = "_links")]
    pub links: RunLinks,
}

impl Run {
    /// The absolute link to this run's result document, if present.
    pub fn result_href(&self) -> Option<&str> {
        self.links
            .result
            .as_ref()
            .map(|l| l.href.as_str())
            .filter(|h| !h.trim().is_empty())
    }
}

/// `GET /runs?projectId=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunList {
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(default, rename = "_links")]
    pub links: PageLinks,
}

/// `GET /runs/{runId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDetail {
    pub run: Run,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStartedLinks {
    #[serde(default)]
    pub run: Option<Link>,
}

/// Response to `POST /runs`. The `run` member is loosely specified
/// upstream (an id string or an object), so it is kept as raw JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStarted {
    #[serde(default)]
    pub run: Option<serde_json::Value>,
    #[serde(default, rename = "_links")]
    pub links: RunStartedLinks,
}

// ── Results ──────────────────────────────────────────────────────────

/// Point in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// An entry in one of the result document's lookup tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: String,
}

/// One detected interference between element A and element B.
///
/// The `*_index` fields point into the lookup tables of the enclosing
/// [`ClashResult`] and may be out of range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClashRecord {
    #[serde(default)]
    pub element_a_id: String,
    #[serde(default)]
    pub element_b_id: String,
    #[serde(default)]
    pub element_a_label: String,
    #[serde(default)]
    pub element_b_label: String,
    #[serde(default)]
    pub element_a_category_index: Option<i64>,
    #[serde(default)]
    pub element_b_category_index: Option<i64>,
    #[serde(default)]
    pub element_a_model_index: Option<i64>,
    #[serde(default)]
    pub element_b_model_index: Option<i64>,
    #[serde(default)]
    pub clash_type: Option<String>,
    #[serde(default)]
    pub suppressing_rule_index_array: Vec<i64>,
    #[serde(default)]
    pub center: Option<Point3d>,
}

/// A run's result document: the clash records plus the lookup tables they
/// reference by index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClashResult {
    /// `None` when the document carries no `result` member at all, which the
    /// service uses for results that are still being produced.
    #[serde(default)]
    pub result: Option<Vec<ClashRecord>>,
    #[serde(default)]
    pub category_list: Vec<NamedEntry>,
    #[serde(default)]
    pub model_list: Vec<NamedEntry>,
    #[serde(default)]
    pub suppressing_rule_list: Vec<NamedEntry>,
}

impl ClashResult {
    /// The clash records, or an empty slice if the document has none.
    pub fn records(&self) -> &[ClashRecord] {
        self.result.as_deref().unwrap_or_default()
    }

    pub fn category_name(&self, index: Option<i64>) -> Option<&str> {
        lookup(&self.category_list, index)
    }

    pub fn model_name(&self, index: Option<i64>) -> Option<&str> {
        lookup(&self.model_list, index)
    }

    pub fn suppressing_rule_name(&self, index: i64) -> Option<&str> {
        lookup(&self.suppressing_rule_list, Some(index))
    }
}

fn lookup(table: &[NamedEntry], index: Option<i64>) -> Option<&str> {
    let index = usize::try_from(index?).ok()?;
    table.get(index).map(|e| e.display_name.as_str())
}

// ── Helpers ──────────────────────────────────────────────────────────

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
