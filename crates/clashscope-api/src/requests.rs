// Request bodies for the mutating endpoints.

use serde::{Deserialize, Serialize};

/// Category filters used by the bundled test templates.
const TEMPLATE_SET_A_CATEGORY: &str = "0x20000000185";
const TEMPLATE_SET_B_CATEGORY: &str = "0x20000000181";
const TEMPLATE_SUPPRESSION_RULE: &str = "eFUit7iLtkC78opOrlqguvT9YUJEegxIigDi8M0IWic";

/// One side (A or B) of a clash test: which models and categories to
/// include, whether to check the set against itself, and the clearance
/// distance in meters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSet {
    pub model_ids: Vec<String>,
    pub category_ids: Vec<String>,
    pub self_check: bool,
    pub clearance: f64,
}

/// Body of `POST /tests` and `PUT /tests/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDefinition {
    /// Required on create, rejected on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub display_name: String,
    pub description: String,
    pub set_a: ElementSet,
    pub set_b: ElementSet,
    pub suppress_touching: bool,
    pub touching_tolerance: f64,
    pub include_sub_models: bool,
    /// Suppression rule ids applied to this test.
    pub suppression_rules: Vec<String>,
}

impl TestDefinition {
    /// The demonstration test created by `create test`: set A is checked
    /// against itself with a 1 mm clearance, no suppression rules.
    pub fn create_template(project_id: &str) -> Self {
        Self {
            project_id: Some(project_id.to_owned()),
            display_name: "PA-Devcon-NoSuppressionRule".into(),
            description: "Test to demonstrate clash detection".into(),
            ..Self::base()
        }
    }

    /// The update applied by `update test`: same geometry sets, with the
    /// bundled suppression rule attached.
    pub fn update_template() -> Self {
        Self {
            project_id: None,
            display_name: "PA-Devcon-SuppressionRule".into(),
            description: "Test to demonstrate clash detection with suppression rule".into(),
            suppression_rules: vec![TEMPLATE_SUPPRESSION_RULE.into()],
            ..Self::base()
        }
    }

    fn base() -> Self {
        Self {
            project_id: None,
            display_name: String::new(),
            description: String::new(),
            set_a: ElementSet {
                model_ids: Vec::new(),
                category_ids: vec![TEMPLATE_SET_A_CATEGORY.into()],
                self_check: true,
                clearance: 0.001,
            },
            set_b: ElementSet {
                model_ids: Vec::new(),
                category_ids: vec![TEMPLATE_SET_B_CATEGORY.into()],
                self_check: false,
                clearance: 0.0,
            },
            suppress_touching: false,
            touching_tolerance: 0.0,
            include_sub_models: false,
            suppression_rules: Vec::new(),
        }
    }
}

/// Body of `POST /runs`: run `test_id` against one named version of an iModel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub test_id: String,
    #[serde(rename = "iModelId")]
    pub imodel_id: String,
    pub named_version_id: String,
}

impl RunRequest {
    pub fn new(
        test_id: impl Into<String>,
        imodel_id: impl Into<String>,
        named_version_id: impl Into<String>,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            imodel_id: imodel_id.into(),
            named_version_id: named_version_id.into(),
        }
    }
}
