//! Test run handlers.

use tabled::Tabled;

use clashscope_core::{OrAbsent, Run, RunRequest, RunRow};

use crate::cli::{GlobalOpts, OutputFormat, RunsArgs, RunsCommand, StartRunArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RunTableRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Executed")]
    executed: String,
    #[tabled(rename = "Clashes")]
    clash_count: String,
    #[tabled(rename = "Run By")]
    run_by: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl RunTableRow {
    fn new(index: usize, run: &Run) -> Self {
        let row = RunRow::from(run);
        Self {
            index,
            id: row.id,
            name: row.name,
            executed: row.executed,
            clash_count: row.clash_count,
            run_by: row.run_by,
            status: row.status,
        }
    }
}

fn detail(run: &Run) -> String {
    let row = RunRow::from(run);
    output::detail_lines(&[
        ("ID", row.id),
        ("Name", row.name),
        ("Executed", row.executed),
        ("Clashes", row.clash_count),
        ("Run by", row.run_by),
        ("Status", row.status),
        ("Result", run.result_href().unwrap_or_default().to_owned()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: RunsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RunsCommand::List => {
            let project = ctx.project()?;
            let runs = util::with_spinner(global, "Loading runs", ctx.review.runs(project))
                .await
                .or_absent()?
                .map(|r| r.to_vec())
                .unwrap_or_default();

            // Table rows carry the position that `clashes list --run` expects.
            let indexed: Vec<(usize, Run)> = runs.into_iter().enumerate().collect();
            let listed: Vec<&Run> = indexed.iter().map(|(_, r)| r).collect();
            let out = match global.output {
                OutputFormat::Table => output::render_list(
                    &global.output,
                    &indexed,
                    |(i, r)| RunTableRow::new(*i, r),
                    |(_, r)| r.id.clone(),
                ),
                _ => output::render_list(
                    &global.output,
                    &listed,
                    |r| RunTableRow::new(0, r),
                    |r| r.id.clone(),
                ),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RunsCommand::Show { run_id } => {
            let run = ctx.review.run_detail(&run_id).await?;
            let out = output::render_single(&global.output, &run, detail, |r| r.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RunsCommand::Start(start) => {
            let started = if start.is_empty() {
                ctx.review.start_test_run().await?
            } else {
                let request = merge_request(&start, ctx)?;
                ctx.review.start_run(&request).await?
            };

            let run_id = started
                .run
                .as_ref()
                .map(util::entity_id)
                .unwrap_or_default();
            util::note(global, &format!("Run started {run_id}"));
            let out = output::render_single(
                &global.output,
                &started,
                |_| run_id.clone(),
                |_| run_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

impl StartRunArgs {
    fn is_empty(&self) -> bool {
        self.test_id.is_none() && self.imodel_id.is_none() && self.named_version_id.is_none()
    }
}

/// Command-line ids over the profile's `[run]` defaults; all three must end up set.
fn merge_request(args: &StartRunArgs, ctx: &Context) -> Result<RunRequest, CliError> {
    let defaults = &ctx.run_defaults;
    let pick = |flag: &Option<String>, fallback: &Option<String>, field: &str| {
        flag.clone()
            .or_else(|| fallback.clone())
            .ok_or_else(|| CliError::Validation {
                field: field.into(),
                reason: format!("missing; pass --{field} or set it under [profiles.<name>.run]"),
            })
    };

    Ok(RunRequest::new(
        pick(&args.test_id, &defaults.test_id, "test-id")?,
        pick(&args.imodel_id, &defaults.imodel_id, "imodel-id")?,
        pick(
            &args.named_version_id,
            &defaults.named_version_id,
            "named-version-id",
        )?,
    ))
}
