use anyhow::Result;
use uuid::Uuid;

use tenderdesk_core::DocumentKind;
use tenderdesk_portal::PortalSession;

use crate::cli::{DocsCommands, OutputFormat};
use crate::output;

fn parse_kind(kind: &str) -> Result<DocumentKind> {
    match kind {
        "pan" => Ok(DocumentKind::Pan),
        "gstin" => Ok(DocumentKind::Gstin),
        "udyam" => Ok(DocumentKind::Udyam),
        "other" => Ok(DocumentKind::Other),
        other => anyhow::bail!("Unknown document kind: {other}. Valid: pan, gstin, udyam, other"),
    }
}

pub async fn run(
    session: &PortalSession,
    command: &DocsCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        DocsCommands::Upload { kind, file } => {
            let kind = parse_kind(kind)?;
            let bytes = std::fs::read(file)?;
            let doc = session.upload_document(kind, bytes).await?;
            output::print_success(&format!("Uploaded {} document {}", doc.kind, doc.id));
        }
        DocsCommands::List => {
            let documents = session.my_documents().await?;
            output::print_documents(&documents, format);
        }
        DocsCommands::Remove { id } => {
            let id: Uuid = id.parse()?;
            session.remove_document(id).await?;
            output::print_success(&format!("Removed document {id}"));
        }
    }
    Ok(())
}
