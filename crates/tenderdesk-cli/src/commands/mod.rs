pub mod account;
pub mod admin;
pub mod bids;
pub mod documents;
pub mod tenders;
