//! Clash result handlers.

use std::sync::Arc;

use tabled::Tabled;

use clashscope_core::{ClashMarker, ClashResult, ClashRow, OrAbsent, clash_markers};

use crate::cli::{ClashesArgs, ClashesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClashTableRow {
    #[tabled(rename = "Element A")]
    element_a: String,
    #[tabled(rename = "Category A")]
    category_a: String,
    #[tabled(rename = "Model A")]
    model_a: String,
    #[tabled(rename = "Element B")]
    element_b: String,
    #[tabled(rename = "Category B")]
    category_b: String,
    #[tabled(rename = "Model B")]
    model_b: String,
    #[tabled(rename = "Type")]
    clash_type: String,
    #[tabled(rename = "Suppressed By")]
    suppressed_by: String,
}

impl From<&ClashRow> for ClashTableRow {
    fn from(r: &ClashRow) -> Self {
        Self {
            element_a: r.element_a_label.clone(),
            category_a: r.element_a_category.clone(),
            model_a: r.element_a_model.clone(),
            element_b: r.element_b_label.clone(),
            category_b: r.element_b_category.clone(),
            model_b: r.element_b_model.clone(),
            clash_type: r.clash_type.clone(),
            suppressed_by: r.suppressed_by.clone(),
        }
    }
}

#[derive(Tabled)]
struct MarkerTableRow {
    #[tabled(rename = "X")]
    x: String,
    #[tabled(rename = "Y")]
    y: String,
    #[tabled(rename = "Z")]
    z: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&ClashMarker> for MarkerTableRow {
    fn from(m: &ClashMarker) -> Self {
        Self {
            x: format!("{:.3}", m.point.x),
            y: format!("{:.3}", m.point.y),
            z: format!("{:.3}", m.point.z),
            title: m.title.clone(),
            description: m.description.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &Context,
    args: ClashesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClashesCommand::List { run } => {
            let rows = load(ctx, run, global)
                .await?
                .map(|result| ClashRow::from_result(&result))
                .unwrap_or_default();

            let out = output::render_list(
                &global.output,
                &rows,
                |r| ClashTableRow::from(r),
                |r| format!("{} {}", r.element_a_id, r.element_b_id),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClashesCommand::Markers { run } => {
            let markers = load(ctx, run, global)
                .await?
                .map(|result| clash_markers(&result))
                .unwrap_or_default();

            let out = output::render_list(
                &global.output,
                &markers,
                |m| MarkerTableRow::from(m),
                |m| format!("{} {} {}", m.point.x, m.point.y, m.point.z),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// The selected run's result. Without an index the first run is used and
/// remote failures render as an empty listing; an explicit index that
/// does not resolve is reported.
async fn load(
    ctx: &Context,
    run: Option<usize>,
    global: &GlobalOpts,
) -> Result<Option<Arc<ClashResult>>, CliError> {
    let project = ctx.project()?;
    match run {
        Some(index) => {
            let result = util::with_spinner(
                global,
                "Loading clash result",
                ctx.review.show_run_result(project, index),
            )
            .await?;
            Ok(Some(result))
        }
        None => Ok(util::with_spinner(
            global,
            "Loading clash result",
            ctx.review.clash_result(project),
        )
        .await
        .or_absent()?),
    }
}
