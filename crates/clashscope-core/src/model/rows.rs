// Table rows for tests, runs, suppression rules and clash records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clashscope_api::{ClashRecord, ClashResult, Run, SuppressionRule, Test};

/// Rendered in the suppression column when no rule name resolves.
pub const NOT_SUPPRESSED: &str = "N/A";

// ── Clash records ────────────────────────────────────────────────────

/// One clash record with its lookup indices resolved to names.
///
/// The element ids ride along so a selected row can be visualized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClashRow {
    pub element_a_id: String,
    pub element_b_id: String,
    pub element_a_label: String,
    pub element_b_label: String,
    pub element_a_category: String,
    pub element_b_category: String,
    pub element_a_model: String,
    pub element_b_model: String,
    pub clash_type: String,
    pub suppressed_by: String,
}

impl ClashRow {
    pub fn from_record(result: &ClashResult, record: &ClashRecord) -> Self {
        let names = |name: Option<&str>| name.unwrap_or_default().to_owned();

        let rules: Vec<&str> = record
            .suppressing_rule_index_array
            .iter()
            .filter_map(|&i| result.suppressing_rule_name(i))
            .collect();
        let suppressed_by = if rules.is_empty() {
            NOT_SUPPRESSED.to_owned()
        } else {
            rules.join(", ")
        };

        Self {
            element_a_id: record.element_a_id.clone(),
            element_b_id: record.element_b_id.clone(),
            element_a_label: record.element_a_label.clone(),
            element_b_label: record.element_b_label.clone(),
            element_a_category: names(result.category_name(record.element_a_category_index)),
            element_b_category: names(result.category_name(record.element_b_category_index)),
            element_a_model: names(result.model_name(record.element_a_model_index)),
            element_b_model: names(result.model_name(record.element_b_model_index)),
            clash_type: record.clash_type.clone().unwrap_or_default(),
            suppressed_by,
        }
    }

    /// All rows of a result document, in record order. A document without
    /// a `result` member yields no rows.
    pub fn from_result(result: &ClashResult) -> Vec<Self> {
        result
            .records()
            .iter()
            .map(|record| Self::from_record(result, record))
            .collect()
    }
}

// ── Tests / runs / rules ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created: String,
    pub modified: String,
}

impl From<&Test> for TestRow {
    fn from(t: &Test) -> Self {
        Self {
            id: t.id.clone(),
            name: t.display_name.clone(),
            description: t.description.clone().unwrap_or_default(),
            created: display_timestamp(t.creation_date_time.as_deref()),
            modified: display_timestamp(t.modification_date_time.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRow {
    pub id: String,
    pub name: String,
    pub executed: String,
    pub clash_count: String,
    pub run_by: String,
    pub status: String,
}

impl From<&Run> for RunRow {
    fn from(r: &Run) -> Self {
        Self {
            id: r.id.clone(),
            name: r.display_name.clone(),
            executed: display_timestamp(r.executed_date_time.as_deref()),
            clash_count: r.count.clone().unwrap_or_default(),
            run_by: r.user_name.clone().unwrap_or_default(),
            status: r.status.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuppressionRuleRow {
    pub id: String,
    pub name: String,
    pub reason: String,
    pub created: String,
    pub modified: String,
}

impl From<&SuppressionRule> for SuppressionRuleRow {
    fn from(r: &SuppressionRule) -> Self {
        Self {
            id: r.id.clone(),
            name: r.display_name.clone(),
            reason: r.reason.clone().unwrap_or_default(),
            created: display_timestamp(r.creation_date_time.as_deref()),
            modified: display_timestamp(r.modification_date_time.as_deref()),
        }
    }
}

/// RFC 3339 timestamps render as UTC `YYYY-MM-DD HH:MM:SS`. Anything else is
/// passed through untouched; a missing value renders empty.
pub fn display_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_owned(),
        |dt| dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn result() -> ClashResult {
        serde_json::from_value(json!({
            "result": [
                {
                    "elementAId": "0xa1",
                    "elementBId": "0xb1",
                    "elementALabel": "Beam [1]",
                    "elementBLabel": "Duct [7]",
                    "elementACategoryIndex": 0,
                    "elementBCategoryIndex": 1,
                    "elementAModelIndex": 0,
                    "elementBModelIndex": 0,
                    "clashType": "Collision",
                    "suppressingRuleIndexArray": [0, 1]
                },
                {
                    "elementAId": "0xa2",
                    "elementBId": "0xb2",
                    "elementACategoryIndex": 9,
                    "elementBCategoryIndex": -1,
                    "elementAModelIndex": 4,
                    "suppressingRuleIndexArray": [3]
                }
            ],
            "categoryList": [
                { "id": "0x1", "displayName": "Beams" },
                { "id": "0x2", "displayName": "Ducts" }
            ],
            "modelList": [{ "id": "0x10", "displayName": "Structure" }],
            "suppressingRuleList": [
                { "id": "sr-1", "displayName": "Caps" },
                { "id": "sr-2", "displayName": "Hangers" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn resolves_lookup_tables() {
        let rows = ClashRow::from_result(&result());
        let row = &rows[0];
        assert_eq!(row.element_a_category, "Beams");
        assert_eq!(row.element_b_category, "Ducts");
        assert_eq!(row.element_a_model, "Structure");
        assert_eq!(row.clash_type, "Collision");
        assert_eq!(row.suppressed_by, "Caps, Hangers");
        assert_eq!(row.element_a_id, "0xa1");
    }

    #[test]
    fn out_of_range_indices_render_empty_and_na() {
        let rows = ClashRow::from_result(&result());
        let row = &rows[1];
        assert_eq!(row.element_a_category, "");
        assert_eq!(row.element_b_category, "");
        assert_eq!(row.element_a_model, "");
        assert_eq!(row.element_b_model, "");
        assert_eq!(row.clash_type, "");
        assert_eq!(row.suppressed_by, NOT_SUPPRESSED);
    }

    #[test]
    fn missing_rule_list_renders_na() {
        let result: ClashResult = serde_json::from_value(json!({
            "result": [{ "elementAId": "a", "elementBId": "b", "suppressingRuleIndexArray": [0] }]
        }))
        .unwrap();
        assert_eq!(ClashRow::from_result(&result)[0].suppressed_by, "N/A");
    }

    #[test]
    fn document_without_records_has_no_rows() {
        assert!(ClashRow::from_result(&ClashResult::default()).is_empty());
    }

    #[test]
    fn run_row_fills_missing_fields_with_empty() {
        let run: Run = serde_json::from_value(json!({
            "id": "r1",
            "displayName": "Nightly",
            "count": 3
        }))
        .unwrap();
        let row = RunRow::from(&run);
        assert_eq!(row.name, "Nightly");
        assert_eq!(row.clash_count, "3");
        assert_eq!(row.executed, "");
        assert_eq!(row.run_by, "");
        assert_eq!(row.status, "");
    }

    #[test]
    fn timestamps_normalize_to_utc() {
        assert_eq!(
            display_timestamp(Some("2024-03-01T12:00:00+02:00")),
            "2024-03-01 10:00:00"
        );
        assert_eq!(display_timestamp(Some("yesterday")), "yesterday");
        assert_eq!(display_timestamp(None), "");
    }

    #[test]
    fn test_and_rule_rows() {
        let test: Test = serde_json::from_value(json!({
            "id": "t1",
            "displayName": "Walls vs Ducts",
            "creationDateTime": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        let row = TestRow::from(&test);
        assert_eq!(row.description, "");
        assert_eq!(row.created, "2024-03-01 10:00:00");
        assert_eq!(row.modified, "");

        let rule: SuppressionRule = serde_json::from_value(json!({
            "id": "sr-1",
            "displayName": "Caps",
            "reason": "Known overlap"
        }))
        .unwrap();
        let row = SuppressionRuleRow::from(&rule);
        assert_eq!(row.reason, "Known overlap");
        assert_eq!(row.created, "");
    }
}
