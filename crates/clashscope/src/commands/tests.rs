//! Clash-detection test handlers.

use tabled::Tabled;

use clashscope_core::{OrAbsent, Test, TestRow};

use crate::cli::{GlobalOpts, TestsArgs, TestsCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TestTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

impl From<&Test> for TestTableRow {
    fn from(t: &Test) -> Self {
        let row = TestRow::from(t);
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created: row.created,
            modified: row.modified,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: TestsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TestsCommand::List { refresh } => {
            let project = ctx.project()?;
            let fetched = if refresh {
                util::with_spinner(global, "Refreshing tests", ctx.review.refresh_tests(project))
                    .await
            } else {
                util::with_spinner(global, "Loading tests", ctx.review.tests(project)).await
            };
            let tests = fetched.or_absent()?.map(|t| t.to_vec()).unwrap_or_default();

            let out = output::render_list(
                &global.output,
                &tests,
                |t| TestTableRow::from(t),
                |t| t.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TestsCommand::Create => {
            let project = ctx.project()?;
            let created = ctx.review.create_test(project).await?;
            let id = util::entity_id(&created);
            util::note(global, &format!("Test created {id}"));
            let out = output::render_single(
                &global.output,
                &created,
                |_| id.clone(),
                util::entity_id,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TestsCommand::Update { test_id } => {
            let test_id = match test_id {
                Some(id) => id,
                None => first_test_id(ctx).await?,
            };
            let updated = ctx.review.update_test(&test_id).await?;
            util::note(global, &format!("Test {test_id} updated"));
            let out = output::render_single(
                &global.output,
                &updated,
                |_| test_id.clone(),
                |_| test_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Id of the project's first listed test.
async fn first_test_id(ctx: &Context) -> Result<String, CliError> {
    let project = ctx.project()?;
    let tests = ctx.review.tests(project).await?;
    tests
        .first()
        .map(|t| t.id.clone())
        .ok_or_else(|| CliError::NoData {
            resource: "tests".into(),
            project: project.into(),
        })
}
