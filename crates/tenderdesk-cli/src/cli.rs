use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tenderdesk")]
#[command(about = "TenderDesk CLI — browse tenders, place bids, run admin review")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and TENDERDESK_URL env var)
    #[arg(short, long, global = true, env = "TENDERDESK_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "TENDERDESK_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in as a portal user (stores credentials for the profile)
    Login(LoginArgs),
    /// Sign out (remove stored credentials)
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List tenders with filters
    Tenders(TendersArgs),
    /// List the distinct values of a filter column
    Options(OptionsArgs),
    /// Manage saved search keywords
    Keywords(KeywordsArgs),
    /// Place, revise and list bids
    Bid(BidArgs),
    /// Upload and manage identity documents
    Docs(DocsArgs),
    /// Administrator review operations
    Admin(AdminArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Portal user id (UUID)
    pub user_id: String,
    /// Session JWT issued by the hosted auth service
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(clap::Args)]
pub struct TendersArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub ministry: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// Free-text search over bid number and category
    #[arg(long)]
    pub search: Option<String>,
    /// Start-date lower bound (RFC 3339)
    #[arg(long)]
    pub from: Option<String>,
    /// Start-date upper bound (RFC 3339)
    #[arg(long)]
    pub to: Option<String>,
    /// Restrict to saved keywords
    #[arg(long)]
    pub keywords: bool,
}

#[derive(clap::Args)]
pub struct OptionsArgs {
    /// Filter column: ministry, department or city
    pub column: String,
}

#[derive(clap::Args)]
pub struct KeywordsArgs {
    #[command(subcommand)]
    pub command: KeywordsCommands,
}

#[derive(Subcommand)]
pub enum KeywordsCommands {
    /// Show saved keywords
    Show,
    /// Replace saved keywords
    Set {
        /// The new keyword list
        words: Vec<String>,
    },
}

#[derive(clap::Args)]
pub struct BidArgs {
    #[command(subcommand)]
    pub command: BidCommands,
}

#[derive(Subcommand)]
pub enum BidCommands {
    /// Place a bid against a tender
    Place {
        /// Tender id (UUID)
        tender_id: String,
        /// Offered amount in INR
        amount: u64,
        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },
    /// Revise an existing bid
    Update {
        /// Bid id (UUID)
        id: String,
        /// New amount in INR
        amount: u64,
        #[arg(long)]
        note: Option<String>,
    },
    /// List your bids
    Mine,
}

#[derive(clap::Args)]
pub struct DocsArgs {
    #[command(subcommand)]
    pub command: DocsCommands,
}

#[derive(Subcommand)]
pub enum DocsCommands {
    /// Upload an identity document
    Upload {
        /// Document kind: pan, gstin, udyam or other
        kind: String,
        /// Path to the file
        file: String,
    },
    /// List your documents
    List,
    /// Remove one of your documents
    Remove {
        /// Document id (UUID)
        id: String,
    },
}

#[derive(clap::Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommands,
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Review bids with sort and pagination
    Review {
        /// Filter by status: draft, submitted, under_review, accepted, rejected
        #[arg(long)]
        status: Option<String>,
        /// Sort field
        #[arg(long, default_value = "submitted-at")]
        sort: ReviewSort,
        /// Sort direction
        #[arg(long, default_value = "desc")]
        direction: ReviewDirection,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Accept or reject a bid
    Decide {
        /// Bid id (UUID)
        id: String,
        /// accept or reject
        decision: String,
    },
    /// Set the verification status of a document
    Verify {
        /// Document id (UUID)
        id: String,
        /// verified or rejected
        status: String,
    },
    /// List documents awaiting verification
    PendingDocs,
    /// List all users
    Users,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReviewSort {
    Amount,
    SubmittedAt,
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReviewDirection {
    Asc,
    Desc,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the active profile configuration
    Show,
    /// Set a configuration key
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key: server, anon-key or format
    pub key: String,
    /// Value
    pub value: String,
}
