// ── Viewer integration ──
//
// Highlights the two elements of a clash in whatever 3D view the host
// application has focused. The core never renders anything itself; hosts
// implement `ViewHost` / `ViewSurface` over their own viewport.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

/// RGB color applied as a feature override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ElementColor {
    /// Element A of a clash.
    pub const RED: Self = Self { r: 255, g: 0, b: 0 };
    /// Element B of a clash.
    pub const BLUE: Self = Self { r: 0, g: 0, b: 255 };
}

/// Failure reported by a view while it animates.
#[derive(Debug, thiserror::Error)]
#[error("view error: {0}")]
pub struct ViewError(pub String);

/// One viewport of the host application.
pub trait ViewSurface: Send + Sync {
    fn clear_emphasized(&self);

    fn clear_overrides(&self);

    /// Color `element_id`. With `replace`, previous overrides on the view
    /// are dropped first.
    fn override_color(&self, element_id: &str, color: ElementColor, replace: bool);

    /// Emphasize `element_ids` and fade everything else.
    fn emphasize(&self, element_ids: &[String]);

    /// Move the camera to frame `element_ids`, animating when `animate` is set.
    fn zoom_to(
        &self,
        element_ids: &[String],
        animate: bool,
    ) -> BoxFuture<'_, Result<(), ViewError>>;
}

/// Source of the currently selected view.
pub trait ViewHost: Send + Sync {
    fn active_view(&self) -> Option<Arc<dyn ViewSurface>>;
}

/// Paint a clash pair and optionally frame it.
///
/// No active view means nothing happens. Zoom failures are logged, never
/// returned.
pub(crate) async fn show_clash(
    host: Option<&dyn ViewHost>,
    element_a: &str,
    element_b: &str,
    zoom: bool,
) {
    let Some(view) = host.and_then(ViewHost::active_view) else {
        debug!("no active view, skipping clash visualization");
        return;
    };

    view.clear_emphasized();
    view.clear_overrides();
    view.override_color(element_a, ElementColor::RED, true);
    view.override_color(element_b, ElementColor::BLUE, false);

    let pair = [element_a.to_owned(), element_b.to_owned()];
    view.emphasize(&pair);

    if zoom {
        if let Err(e) = view.zoom_to(&pair, true).await {
            warn!(error = %e, element_a, element_b, "zoom to clash failed");
        }
    }
}

/// Drop emphasis and color overrides from the active view.
pub(crate) fn clear_display(host: Option<&dyn ViewHost>) {
    if let Some(view) = host.and_then(ViewHost::active_view) {
        view.clear_emphasized();
        view.clear_overrides();
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::testing::{FixedHost, RecordingView};
    use super::*;

    #[tokio::test]
    async fn clash_is_painted_then_framed() {
        let view = Arc::new(RecordingView::default());
        let host = FixedHost(Some(Arc::clone(&view)));

        show_clash(Some(&host), "0xa", "0xb", true).await;

        assert_eq!(
            view.calls(),
            vec![
                "clear_emphasized",
                "clear_overrides",
                "override 0xa 255,0,0 replace=true",
                "override 0xb 0,0,255 replace=false",
                "emphasize 0xa,0xb",
                "zoom 0xa,0xb animate=true",
            ]
        );
    }

    #[tokio::test]
    async fn zoom_is_skipped_when_disabled() {
        let view = Arc::new(RecordingView::default());
        let host = FixedHost(Some(Arc::clone(&view)));

        show_clash(Some(&host), "0xa", "0xb", false).await;

        assert!(!view.calls().iter().any(|c| c.starts_with("zoom")));
    }

    #[tokio::test]
    async fn zoom_failure_is_swallowed() {
        let view = Arc::new(RecordingView {
            fail_zoom: true,
            ..RecordingView::default()
        });
        let host = FixedHost(Some(Arc::clone(&view)));

        show_clash(Some(&host), "0xa", "0xb", true).await;

        assert_eq!(view.calls().len(), 6);
    }

    #[tokio::test]
    async fn missing_view_is_a_no_op() {
        show_clash(Some(&FixedHost(None)), "0xa", "0xb", true).await;
        show_clash(None, "0xa", "0xb", true).await;
        clear_display(None);
    }

    #[test]
    fn reset_clears_both_layers() {
        let view = Arc::new(RecordingView::default());
        let host = FixedHost(Some(Arc::clone(&view)));

        clear_display(Some(&host));

        assert_eq!(view.calls(), vec!["clear_emphasized", "clear_overrides"]);
    }
}
