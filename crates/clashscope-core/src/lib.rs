//! Caching façade between `clashscope-api` and presentation consumers.
//!
//! - **[`ClashReview`]**: memoizes tests, runs, suppression rules and clash
//!   results per project, broadcasts every cache fill, and forwards
//!   mutations straight to the service. Cheaply cloneable.
//!
//! - **[`Notifier<T>`]**: generic publish/subscribe with scoped
//!   [`Subscription`] handles. One notifier per resource kind lives on the
//!   façade.
//!
//! - **[`ResultStore`]**: the cache slots themselves, each a
//!   [`ProjectCache<T>`] over `DashMap`, plus the last-viewed result.
//!
//! - **Viewer hooks** ([`ViewHost`], [`ViewSurface`]): hosts that render a
//!   3D view implement these so clashes can be highlighted and framed.
//!
//! - **Presentation model** ([`model`]): rows and markers with lookup
//!   indices already resolved to display names.
//!
//! Read paths return `Result<_, CoreError>`. Use [`OrAbsent::or_absent`] to
//! collapse remote failures into `None` while keeping integration errors
//! such as [`CoreError::AuthNotReady`] loud.

pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod review;
pub mod store;
pub mod visualize;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ServiceConfig, TlsVerification};
pub use error::{CoreError, OrAbsent};
pub use model::{
    COLLISION_TITLE, ClashMarker, ClashRow, NOT_SUPPRESSED, RunRow, SuppressionRuleRow, TestRow,
    clash_markers,
};
pub use notify::{Notifier, Subscription};
pub use review::{ClashReview, ReviewOptions, Snapshot};
pub use store::{ProjectCache, ResultStore};
pub use visualize::{ElementColor, ViewError, ViewHost, ViewSurface};

// Wire types consumers need without depending on the transport crate.
pub use clashscope_api::{
    Authorization, ClashRecord, ClashResult, DEFAULT_ACCEPT, DEFAULT_BASE_URL, Point3d, Run,
    RunRequest, RunStarted, StaticToken, SuppressionRule, Test, TokenProvider,
};
