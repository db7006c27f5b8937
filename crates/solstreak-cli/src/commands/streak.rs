use clap::Subcommand;
use solstreak_core::service::streaks;
use solstreak_core::Database;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Record activity for the current week
    Record,
    /// Show current and longest weekly streaks
    Show,
}

pub fn run(ctx: &Context, action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let cfg = &ctx.config.streak;

    match action {
        StreakAction::Record => {
            let recorded = streaks::record_activity(&db, cfg, &ctx.owner_id, ctx.now)?;
            print_json(&recorded)?;
        }
        StreakAction::Show => {
            let report = streaks::weekly_report(&db, cfg, &ctx.owner_id, ctx.now)?;
            print_json(&report)?;
        }
    }
    Ok(())
}
