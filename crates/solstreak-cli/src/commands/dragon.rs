use clap::Subcommand;
use solstreak_core::service::dragon;
use solstreak_core::{CoreError, Database, FeedError};

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum DragonAction {
    /// Show food slots and the current status line
    Show,
    /// Feed the dragon one slot
    Feed,
    /// Debug: add one food slot
    Grant,
    /// Debug: delete the dragon state (next access starts full)
    Reset,
}

pub fn run(ctx: &Context, action: DragonAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let cfg = &ctx.config.dragon;

    match action {
        DragonAction::Show => {
            print_json(&dragon::status(&db, cfg, &ctx.owner_id, ctx.now)?)?;
        }
        DragonAction::Feed => match dragon::feed(&db, cfg, &ctx.owner_id, ctx.now) {
            Ok(outcome) => print_json(&outcome)?,
            Err(CoreError::Feed(FeedError::NoSlotsAvailable)) => {
                let status = dragon::status(&db, cfg, &ctx.owner_id, ctx.now)?;
                match status.next_slot_in.as_deref() {
                    Some(wait) => eprintln!("No food slots available. Next in {wait}."),
                    None => eprintln!("No food slots available."),
                }
                print_json(&status)?;
            }
            Err(e) => return Err(e.into()),
        },
        DragonAction::Grant => {
            dragon::grant_slot(&db, cfg, &ctx.owner_id, ctx.now)?;
            print_json(&dragon::status(&db, cfg, &ctx.owner_id, ctx.now)?)?;
        }
        DragonAction::Reset => {
            if dragon::reset(&db, &ctx.owner_id)? {
                println!("dragon state reset");
            } else {
                println!("no dragon state for {}", ctx.owner_id);
            }
        }
    }
    Ok(())
}
