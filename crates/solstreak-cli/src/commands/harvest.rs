use clap::Subcommand;
use solstreak_core::service::harvest;
use solstreak_core::Database;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum HarvestAction {
    /// List villagers and whether they were harvested today
    List,
    /// Harvest from a villager
    Mark {
        /// Villager name (e.g. "Lana")
        villager: String,
    },
    /// Debug: clear today's harvests
    Reset,
}

pub fn run(ctx: &Context, action: HarvestAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let cfg = &ctx.config.harvest;

    match action {
        HarvestAction::List => {
            print_json(&harvest::roster(&db, cfg, &ctx.owner_id, ctx.now)?)?;
        }
        HarvestAction::Mark { villager } => {
            if harvest::has_harvested(&db, cfg, &ctx.owner_id, &villager, ctx.now)? {
                eprintln!("{villager} was already harvested today");
            }
            print_json(&harvest::mark(&db, cfg, &ctx.owner_id, &villager, ctx.now)?)?;
        }
        HarvestAction::Reset => {
            let removed = harvest::reset(&db, cfg, &ctx.owner_id, ctx.now)?;
            println!("cleared {removed} harvest(s)");
        }
    }
    Ok(())
}
