//! Suppression rule handlers.

use tabled::Tabled;

use clashscope_core::{OrAbsent, SuppressionRule, SuppressionRuleRow};

use crate::cli::{GlobalOpts, RulesArgs, RulesCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

impl From<&SuppressionRule> for RuleTableRow {
    fn from(r: &SuppressionRule) -> Self {
        let row = SuppressionRuleRow::from(r);
        Self {
            id: row.id,
            name: row.name,
            reason: row.reason,
            created: row.created,
            modified: row.modified,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: RulesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RulesCommand::List => {
            let project = ctx.project()?;
            let rules = util::with_spinner(
                global,
                "Loading suppression rules",
                ctx.review.suppression_rules(project),
            )
            .await
            .or_absent()?
            .map(|r| r.to_vec())
            .unwrap_or_default();

            let out = output::render_list(
                &global.output,
                &rules,
                |r| RuleTableRow::from(r),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
