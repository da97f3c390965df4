//! Vote command.

use anyhow::{Context, Result};
use uuid::Uuid;

use verifyd::model::VoteKind;
use verifyd::votes::VoteAction;

use super::common::connect;

pub(crate) async fn cmd_vote(review_id: Uuid, user_id: Uuid, kind: VoteKind) -> Result<()> {
    let market = connect()?;
    let outcome = market
        .toggle_vote(review_id, user_id, kind)
        .await
        .with_context(|| format!("Failed to {} review {}", kind, review_id))?;

    println!("{}", describe(outcome.action));
    Ok(())
}

fn describe(action: VoteAction) -> String {
    match action {
        VoteAction::Insert(kind) => format!("Recorded your {}.", kind),
        VoteAction::Remove(kind) => format!("Removed your {}.", kind),
        VoteAction::Switch { from, to } => format!("Changed your vote from {} to {}.", from, to),
    }
}
