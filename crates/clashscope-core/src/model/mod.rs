// ── Presentation model ──
//
// Flattened, display-ready views over the wire types. Every front-end
// renders these instead of indexing into result documents itself.

mod marker;
mod rows;

pub use marker::{COLLISION_TITLE, ClashMarker, clash_markers};
pub use rows::{ClashRow, NOT_SUPPRESSED, RunRow, SuppressionRuleRow, TestRow, display_timestamp};
