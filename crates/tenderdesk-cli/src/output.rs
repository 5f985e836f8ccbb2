use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use tenderdesk_backend::TenderPage;
use tenderdesk_core::{Bid, IdentityDocument, TenderRecord, UserProfile};

use crate::cli::OutputFormat;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => print_error(&format!("Failed to render JSON: {e}")),
    }
}

pub fn print_tenders(page: &TenderPage, page_size: u32, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table => {
            if page.is_empty() {
                println!("No tenders found.");
                return;
            }
            let mut builder = Builder::default();
            builder.push_record(["Bid Number", "Category", "Ministry", "City", "Closes"]);
            for tender in &page.rows {
                builder.push_record([
                    tender.bid_number.as_str(),
                    tender.category.as_str(),
                    tender.ministry.as_str(),
                    tender.city.as_deref().unwrap_or("-"),
                    &format_date(tender),
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));
            println!(
                "Total: {} ({} pages)",
                page.total_count,
                page.page_count(page_size)
            );
        }
    }
}

fn format_date(tender: &TenderRecord) -> String {
    tenderdesk_core::time::format_rfc3339(tender.end_date).unwrap_or_else(|_| "-".to_string())
}

pub fn print_bids(bids: &[Bid], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&bids),
        OutputFormat::Table => {
            if bids.is_empty() {
                println!("No bids found.");
                return;
            }
            let mut builder = Builder::default();
            builder.push_record(["Id", "Tender", "Amount", "Status", "Note"]);
            for bid in bids {
                builder.push_record([
                    bid.id.to_string().as_str(),
                    bid.tender_id.to_string().as_str(),
                    bid.amount.to_string().as_str(),
                    bid.status.to_string().as_str(),
                    bid.note.as_deref().unwrap_or("-"),
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));
        }
    }
}

pub fn print_documents(documents: &[IdentityDocument], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&documents),
        OutputFormat::Table => {
            if documents.is_empty() {
                println!("No documents found.");
                return;
            }
            let mut builder = Builder::default();
            builder.push_record(["Id", "Kind", "Status", "Owner"]);
            for doc in documents {
                builder.push_record([
                    doc.id.to_string().as_str(),
                    doc.kind.to_string().as_str(),
                    doc.status.to_string().as_str(),
                    doc.owner.to_string().as_str(),
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));
        }
    }
}

pub fn print_users(users: &[UserProfile], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&users),
        OutputFormat::Table => {
            if users.is_empty() {
                println!("No users found.");
                return;
            }
            let mut builder = Builder::default();
            builder.push_record(["Id", "Email", "Company", "Role"]);
            for user in users {
                builder.push_record([
                    user.id.to_string().as_str(),
                    user.email.as_str(),
                    user.company.as_deref().unwrap_or("-"),
                    user.role.to_string().as_str(),
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));
        }
    }
}

pub fn print_string_list(values: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&values),
        OutputFormat::Table => {
            if values.is_empty() {
                println!("(none)");
                return;
            }
            for value in values {
                println!("{value}");
            }
        }
    }
}
