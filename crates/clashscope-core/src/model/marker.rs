// Map markers: one pin per clash that carries a center point. The popup
// names both elements by label; the ids are kept for visualization.

use serde::Serialize;

use clashscope_api::{ClashResult, Point3d};

pub const COLLISION_TITLE: &str = "Collision(s) found:";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClashMarker {
    pub point: Point3d,
    pub title: String,
    pub description: String,
    pub element_a_id: String,
    pub element_b_id: String,
}

/// Markers for every record with a center, in record order.
pub fn clash_markers(result: &ClashResult) -> Vec<ClashMarker> {
    result
        .records()
        .iter()
        .filter_map(|record| {
            let point = record.center?;
            Some(ClashMarker {
                point,
                title: COLLISION_TITLE.to_owned(),
                description: format!(
                    "Element A: {}\nElement B: {}",
                    record.element_a_label, record.element_b_label
                ),
                element_a_id: record.element_a_id.clone(),
                element_b_id: record.element_b_id.clone(),
            })
        })
        .collect()
}
