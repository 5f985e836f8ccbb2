use anyhow::Result;
use uuid::Uuid;

use tenderdesk_backend::BidQuery;
use tenderdesk_core::{BidDecision, BidStatus, VerificationStatus};
use tenderdesk_portal::{BidReview, BidSort, PortalSession, SortDirection};

use crate::cli::{AdminCommands, OutputFormat, ReviewDirection, ReviewSort};
use crate::output;

fn parse_status(status: &str) -> Result<BidStatus> {
    match status {
        "draft" => Ok(BidStatus::Draft),
        "submitted" => Ok(BidStatus::Submitted),
        "under_review" => Ok(BidStatus::UnderReview),
        "accepted" => Ok(BidStatus::Accepted),
        "rejected" => Ok(BidStatus::Rejected),
        other => anyhow::bail!("Unknown bid status: {other}"),
    }
}

pub async fn run(
    session: &PortalSession,
    command: &AdminCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        AdminCommands::Review {
            status,
            sort,
            direction,
            page,
            page_size,
        } => {
            let mut filter = BidQuery::new();
            if let Some(status) = status {
                filter = filter.with_status(parse_status(status)?);
            }
            let sort = match sort {
                ReviewSort::Amount => BidSort::Amount,
                ReviewSort::SubmittedAt => BidSort::SubmittedAt,
                ReviewSort::Status => BidSort::Status,
            };
            let direction = match direction {
                ReviewDirection::Asc => SortDirection::Asc,
                ReviewDirection::Desc => SortDirection::Desc,
            };
            let review = BidReview::new()
                .with_filter(filter)
                .with_sort(sort, direction)
                .with_page(*page)
                .with_page_size(*page_size);

            let result = session.review_bids(&review).await?;
            output::print_bids(&result.bids, format);
            println!("Total: {} ({} pages)", result.total, result.page_count);
        }
        AdminCommands::Decide { id, decision } => {
            let id: Uuid = id.parse()?;
            let decision = match decision.as_str() {
                "accept" => BidDecision::Accept,
                "reject" => BidDecision::Reject,
                other => anyhow::bail!("Unknown decision: {other}. Valid: accept, reject"),
            };
            let bid = session.decide_bid(id, decision).await?;
            output::print_success(&format!("Bid {} is now {}", bid.id, bid.status));
        }
        AdminCommands::Verify { id, status } => {
            let id: Uuid = id.parse()?;
            let status = match status.as_str() {
                "pending" => VerificationStatus::Pending,
                "verified" => VerificationStatus::Verified,
                "rejected" => VerificationStatus::Rejected,
                other => anyhow::bail!("Unknown status: {other}. Valid: pending, verified, rejected"),
            };
            let doc = session.verify_document(id, status).await?;
            output::print_success(&format!("Document {} is now {}", doc.id, doc.status));
        }
        AdminCommands::PendingDocs => {
            let documents = session.pending_documents().await?;
            output::print_documents(&documents, format);
        }
        AdminCommands::Users => {
            let users = session.list_users().await?;
            output::print_users(&users, format);
        }
    }
    Ok(())
}
