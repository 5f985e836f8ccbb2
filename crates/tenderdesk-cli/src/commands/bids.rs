use anyhow::Result;
use uuid::Uuid;

use tenderdesk_portal::PortalSession;

use crate::cli::{BidCommands, OutputFormat};
use crate::output;

pub async fn run(session: &PortalSession, command: &BidCommands, format: OutputFormat) -> Result<()> {
    match command {
        BidCommands::Place {
            tender_id,
            amount,
            note,
        } => {
            let tender_id: Uuid = tender_id.parse()?;
            let bid = session.place_bid(tender_id, *amount, note.clone()).await?;
            output::print_success(&format!("Placed bid {} for {} INR", bid.id, bid.amount));
            output::print_bids(std::slice::from_ref(&bid), format);
        }
        BidCommands::Update { id, amount, note } => {
            let id: Uuid = id.parse()?;
            let bid = session.update_bid(id, *amount, note.as_deref()).await?;
            output::print_success(&format!("Updated bid {}", bid.id));
            output::print_bids(std::slice::from_ref(&bid), format);
        }
        BidCommands::Mine => {
            let bids = session.my_bids().await?;
            output::print_bids(&bids, format);
        }
    }
    Ok(())
}
