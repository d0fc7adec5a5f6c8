//! CLI for the fundesk admin console.
//!
//! Every command runs the same way a console page did: check the
//! required permission against the stored session, then let the resource
//! context talk to the backend and render whatever state it ends up
//! with. Denied commands never issue a request.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::client::ApiClient;
use crate::config::Config;
use crate::resources::{
    amc::AmcDraft, basket::BasketDraft, course::CourseDraft, user::UserFilter, AmcContext,
    BasketContext, BasketHolding, ContactContext, CourseContext, ExploreContext,
    MutualFundContext, SettingsContext, SupportContext, TicketStatus, TransactionContext,
    UserContext,
};
use crate::rbac::{Action, Permission, Resource};
use crate::resources::transaction::TransactionFilter;
use crate::session::{self, Session};
use crate::store::Pagination;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "fundesk")]
#[command(author, version, about = "Admin console for a mutual-fund distribution platform", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "fundesk.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Backend API URL (overrides the config file)
    #[arg(long, env = "FUNDESK_API_URL")]
    pub api_url: Option<String>,

    /// Raw auth token; skips the stored session
    #[arg(long, env = "FUNDESK_TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login {
        email: String,
        /// Password (or set FUNDESK_PASSWORD)
        #[arg(long, env = "FUNDESK_PASSWORD")]
        password: String,
    },

    /// Log out and clear the stored session
    Logout,

    /// Show the logged-in user and their permissions
    Whoami,

    /// Asset Management Companies
    #[command(subcommand)]
    Amc(AmcCommands),

    /// Curated stock baskets
    #[command(subcommand)]
    Basket(BasketCommands),

    /// Investor-education courses
    #[command(subcommand)]
    Course(CourseCommands),

    /// Mutual fund catalog
    #[command(subcommand)]
    Fund(FundCommands),

    /// Platform users (investors and distributors)
    #[command(subcommand)]
    Users(UserCommands),

    /// Transaction history
    #[command(subcommand)]
    Tx(TxCommands),

    /// Support tickets
    #[command(subcommand)]
    Support(SupportCommands),

    /// Inbound contact messages
    #[command(subcommand)]
    Contact(ContactCommands),

    /// Platform settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Show the curated explore sections
    Explore,
}

#[derive(Subcommand, Debug)]
pub enum AmcCommands {
    /// List AMCs
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
        /// Filter by name or code
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Register a new AMC
    Create {
        name: String,
        #[arg(long, default_value = "")]
        code: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Update an AMC
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        code: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Delete an AMC
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum BasketCommands {
    /// List baskets
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
    /// Create a basket; holdings are a JSON array
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Monthly subscription price
        #[arg(long, default_value_t = 0.0)]
        price: f64,
        /// e.g. '[{"symbol":"TCS","weight":12.5,"targetPrice":4200}]'
        #[arg(long, default_value = "[]")]
        holdings: String,
    },
    /// Update a basket
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
        #[arg(long, default_value = "[]")]
        holdings: String,
    },
    /// Delete a basket
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    /// List courses
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
    /// Show the lesson list of a course
    Content { id: String },
    /// Create a course
    Create {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
    },
    /// Update a course
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
    },
    /// Delete a course
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum FundCommands {
    /// List mutual funds
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one fund with managers and holdings
    Show { id: String },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List platform users
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
        #[arg(long)]
        role: Option<String>,
        /// Filter by KYC status (pending, verified, rejected)
        #[arg(long)]
        kyc: Option<String>,
    },
    /// Change a user's role
    SetRole { id: String, role: String },
    /// Change a user's KYC status
    SetKyc { id: String, status: String },
}

#[derive(Subcommand, Debug)]
pub enum TxCommands {
    /// List transactions
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
        /// Filter by investor id
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// purchase, redemption, sip, subscription
        #[arg(long = "type")]
        txn_type: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SupportCommands {
    /// List support tickets
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
        #[arg(long, value_parser = TicketStatus::from_str)]
        status: Option<TicketStatus>,
    },
    /// Move a ticket to a new status
    SetStatus {
        id: String,
        #[arg(value_parser = TicketStatus::from_str)]
        status: TicketStatus,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// List contact messages
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
    /// Delete a contact message
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show all platform settings
    Show,
    /// Set one setting
    Set { key: String, value: String },
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: &Config) -> Result<()> {
    let session_path = config.session_path();
    let session = Session::load(&session_path)?;

    match &cli.command {
        Commands::Login { email, password } => cmd_login(cli, config, email, password).await,
        Commands::Logout => cmd_logout(cli, config, session.as_ref()).await,
        Commands::Whoami => cmd_whoami(session.as_ref()),
        Commands::Amc(command) => cmd_amc(cli, config, session.as_ref(), command).await,
        Commands::Basket(command) => cmd_basket(cli, config, session.as_ref(), command).await,
        Commands::Course(command) => cmd_course(cli, config, session.as_ref(), command).await,
        Commands::Fund(command) => cmd_fund(cli, config, session.as_ref(), command).await,
        Commands::Users(command) => cmd_users(cli, config, session.as_ref(), command).await,
        Commands::Tx(command) => cmd_tx(cli, config, session.as_ref(), command).await,
        Commands::Support(command) => cmd_support(cli, config, session.as_ref(), command).await,
        Commands::Contact(command) => cmd_contact(cli, config, session.as_ref(), command).await,
        Commands::Settings(command) => cmd_settings(cli, config, session.as_ref(), command).await,
        Commands::Explore => cmd_explore(cli, config, session.as_ref()).await,
    }
}

/// Build the backend client: flag token wins, then the stored session.
fn build_client(cli: &Cli, config: &Config, session: Option<&Session>) -> Result<ApiClient> {
    let base_url = cli
        .api_url
        .clone()
        .unwrap_or_else(|| config.backend.base_url.clone());
    let timeout = Duration::from_secs(config.backend.timeout_secs);

    let mut client =
        ApiClient::new(base_url, timeout).context("Failed to create HTTP client")?;
    if let Some(token) = &cli.token {
        client = client.with_token(token);
    } else if let Some(session) = session {
        client = client.with_token(&session.token);
    }
    Ok(client)
}

/// Local permission gate; denied commands never touch the network.
///
/// A raw --token carries no permission list, so with one the check is
/// left entirely to the backend.
fn require(cli: &Cli, session: Option<&Session>, permission: &Permission) -> Result<()> {
    if cli.token.is_some() {
        return Ok(());
    }
    match session {
        None => bail!("Not logged in. Run `fundesk login <email>` first."),
        Some(session) if session.can(permission) => Ok(()),
        Some(session) => bail!(
            "Access denied: this command requires `{}` (logged in as {})",
            permission,
            session.principal.email
        ),
    }
}

fn effective_limit(limit: Option<u32>, config: &Config) -> u32 {
    limit.unwrap_or(config.console.page_limit)
}

/// Read commands surface the store's inline error as the command failure.
fn check_store_error(error: Option<&str>) -> Result<()> {
    match error {
        Some(message) => bail!("{}", message),
        None => Ok(()),
    }
}

// ============================================================================
// Session commands
// ============================================================================

async fn cmd_login(cli: &Cli, config: &Config, email: &str, password: &str) -> Result<()> {
    let client = build_client(cli, config, None)?;
    let session = session::login(&client, email, password)
        .await
        .context("Login failed")?;

    session.save(&config.session_path())?;

    println!();
    println!("[OK] Logged in as {} ({})", session.principal.name, session.principal.role);
    println!("Session expires: {}", session.expires_at.format("%Y-%m-%d %H:%M UTC"));
    println!();
    Ok(())
}

async fn cmd_logout(cli: &Cli, config: &Config, session: Option<&Session>) -> Result<()> {
    if let Some(existing) = session {
        let client = build_client(cli, config, Some(existing))?;
        session::logout(&client).await;
    }
    Session::clear(&config.session_path())?;
    println!("Logged out.");
    Ok(())
}

fn cmd_whoami(session: Option<&Session>) -> Result<()> {
    let Some(session) = session else {
        println!("Not logged in.");
        return Ok(());
    };

    println!();
    println!("User:  {} <{}>", session.principal.name, session.principal.email);
    println!("Role:  {}", session.principal.role);
    println!("Expires: {}", session.expires_at.format("%Y-%m-%d %H:%M UTC"));
    println!("Permissions:");
    if session.principal.permissions.is_empty() {
        println!("  (none)");
    }
    for permission in &session.principal.permissions {
        println!("  - {}", permission);
    }
    println!();
    Ok(())
}

// ============================================================================
// Resource commands
// ============================================================================

async fn cmd_amc(
    cli: &Cli,
    config: &Config,
    session: Option<&Session>,
    command: &AmcCommands,
) -> Result<()> {
    let client = build_client(cli, config, session)?;
    let mut context = AmcContext::new(&client);

    match command {
        AmcCommands::List {
            page,
            limit,
            search,
        } => {
            require(cli, session, &Permission::of(Resource::Amc, Action::Read))?;
            context
                .fetch(*page, effective_limit(*limit, config), search.clone())
                .await;
            check_store_error(context.store().error())?;

            println!();
            println!(
                "{:<26}  {:<24}  {:<8}  {:<26}  {:<10}",
                "ID", "NAME", "CODE", "EMAIL", "STATUS"
            );
            println!("{}", "-".repeat(100));
            for amc in context.store().items() {
                println!(
                    "{:<26}  {:<24}  {:<8}  {:<26}  {:<10}",
                    truncate(&amc.id, 26),
                    truncate(&amc.name, 24),
                    amc.code,
                    truncate(&amc.email, 26),
                    amc.status
                );
            }
            print_footer(context.store().pagination());
            Ok(())
        }
        AmcCommands::Create {
            name,
            code,
            email,
            phone,
        } => {
            require(cli, session, &Permission::of(Resource::Amc, Action::Create))?;
            let draft = AmcDraft {
                name: name.clone(),
                code: code.clone(),
                email: email.clone(),
                phone: phone.clone(),
            };
            context.create(&draft).await?;
            println!("[OK] AMC created: {}", name);
            Ok(())
        }
        AmcCommands::Update {
            id,
            name,
            code,
            email,
            phone,
        } => {
            require(cli, session, &Permission::of(Resource::Amc, Action::Update))?;
            let draft = AmcDraft {
                name: name.clone(),
                code: code.clone(),
                email: email.clone(),
                phone: phone.clone(),
            };
            context.update(id, &draft).await?;
            println!("[OK] AMC updated: {}", id);
            Ok(())
        }
        AmcCommands::Delete { id } => {
            require(cli, session, &Permission::of(Resource::Amc, Action::Delete))?;
            context.delete(id).await?;
            println!("[OK] AMC deleted: {}", id);
            Ok(())
        }
    }
}

async fn cmd_basket(
    cli: &Cli,
    config: &Config,
    session: Option<&Session>,
    command: &BasketCommands,
) -> Result<()> {
    let client = build_client(cli, config, session)?;
    let mut context = BasketContext::new(&client);

    match command {
        BasketCommands::List { page, limit } => {
            require(cli, session, &Permission::of(Resource::Basket, Action::Read))?;
            context.fetch(*page, effective_limit(*limit, config)).await;
            check_store_error(context.store().error())?;

            println!();
            println!(
                "{:<26}  {:<24}  {:>9}  {:>8}  {:<10}",
                "ID", "NAME", "PRICE", "STOCKS", "STATUS"
            );
            println!("{}", "-".repeat(86));
            for basket in context.store().items() {
                println!(
                    "{:<26}  {:<24}  {:>9.2}  {:>8}  {:<10}",
                    truncate(&basket.id, 26),
                    truncate(&basket.name, 24),
                    basket.subscription_price,
                    basket.holdings.len(),
                    basket.status
                );
            }
            print_footer(context.store().pagination());
            Ok(())
        }
        BasketCommands::Create {
            name,
            description,
            price,
            holdings,
        } => {
            require(cli, session, &Permission::of(Resource::Basket, Action::Create))?;
            let draft = BasketDraft {
                name: name.clone(),
                description: description.clone(),
                subscription_price: *price,
                holdings: parse_holdings(holdings)?,
            };
            context.create(&draft).await?;
            println!("[OK] Basket created: {}", name);
            Ok(())
        }
        BasketCommands::Update {
            id,
            name,
            description,
            price,
            holdings,
        } => {
            require(cli, session, &Permission::of(Resource::Basket, Action::Update))?;
            let draft = BasketDraft {
                name: name.clone(),
                description: description.clone(),
                subscription_price: *price,
                holdings: parse_holdings(holdings)?,
            };
            context.update(id, &draft).await?;
            println!("[OK] Basket updated: {}", id);
            Ok(())
        }
        BasketCommands::Delete { id } => {
            require(cli, session, &Permission::of(Resource::Basket, Action::Delete))?;
            context.delete(id).await?;
            println!("[OK] Basket deleted: {}", id);
            Ok(())
        }
    }
}

fn parse_holdings(json: &str) -> Result<Vec<BasketHolding>> {
    serde_json::from_str(json).context("Invalid --holdings JSON")
}

async fn cmd_course(
    cli: &Cli,
    config: &Config,
    session: Option<&Session>,
    command: &CourseCommands,
) -> Result<()> {
    let client = build_client(cli, config, session)?;
    let mut context = CourseContext::new(&client);

    match command {
        CourseCommands::List { page, limit } => {
            require(cli, session, &Permission::of(Resource::Course, Action::Read))?;
            context.fetch(*page, effective_limit(*limit, config)).await;
            check_store_error(context.store().error())?;

            println!();
            println!(
                "{:<26}  {:<32}  {:>9}  {:>8}  {:<10}",
                "ID", "TITLE", "PRICE", "LESSONS", "STATUS"
            );
            println!("{}", "-".repeat(94));
            for course in context.store().items() {
                println!(
                    "{:<26}  {:<32}  {:>9.2}  {:>8}  {:<10}",
                    truncate(&course.id, 26),
                    truncate(&course.title, 32),
                    course.price,
                    course.lessons_count,
                    course.status
                );
            }
            print_footer(context.store().pagination());
            Ok(())
        }
        CourseCommands::Content { id } => {
            require(cli, session, &Permission::of(Resource::Course, Action::Read))?;
            let lessons = context.content(id).await?;

            println!();
            if lessons.is_empty() {
                println!("No lessons yet.");
            }
            for (index, lesson) in lessons.iter().enumerate() {
                let duration = lesson
                    .duration_minutes
                    .map(|m| format!("{} min", m))
                    .unwrap_or_else(|| "-".to_string());
                println!("{:>3}. {:<40}  {}", index + 1, truncate(&lesson.title, 40), duration);
            }
            println!();
            Ok(())
        }
        CourseCommands::Create {
            title,
            description,
            price,
        } => {
            require(cli, session, &Permission::of(Resource::Course, Action::Create))?;
            let draft = CourseDraft {
                title: title.clone(),
                description: description.clone(),
                price: *price,
            };
            context.create(&draft).await?;
            println!("[OK] Course created: {}", title);
            Ok(())
        }
        CourseCommands::Update {
            id,
            title,
            description,
            price,
        } => {
            require(cli, session, &Permission::of(Resource::Course, Action::Update))?;
            let draft = CourseDraft {
                title: title.clone(),
                description: description.clone(),
                price: *price,
            };
            context.update(id, &draft).await?;
            println!("[OK] Course updated: {}", id);
            Ok(())
        }
        CourseCommands::Delete { id } => {
            require(cli, session, &Permission::of(Resource::Course, Action::Delete))?;
            context.delete(id).await?;
            println!("[OK] Course deleted: {}", id);
            Ok(())
        }
    }
}

async fn cmd_fund(
    cli: &Cli,
    config: &Config,
    session: Option<&Session>,
    command: &FundCommands,
) -> Result<()> {
    let client = build_client(cli, config, session)?;
    let mut context = MutualFundContext::new(&client);

    match command {
        FundCommands::List {
            page,
            limit,
            category,
        } => {
            require(cli, session, &Permission::of(Resource::MutualFund, Action::Read))?;
            context
                .fetch(*page, effective_limit(*limit, config), category.clone())
                .await;
            check_store_error(context.store().error())?;

            println!();
            println!(
                "{:<26}  {:<32}  {:<16}  {:>10}  {:<8}",
                "ID", "NAME", "CATEGORY", "NAV", "RISK"
            );
            println!("{}", "-".repeat(102));
            for fund in context.store().items() {
                println!(
                    "{:<26}  {:<32}  {:<16}  {:>10.2}  {:<8}",
                    truncate(&fund.id, 26),
                    truncate(&fund.name, 32),
                    truncate(&fund.category, 16),
                    fund.nav,
                    fund.risk_level.as_deref().unwrap_or("-")
                );
            }
            print_footer(context.store().pagination());
            Ok(())
        }
        FundCommands::Show { id } => {
            require(cli, session, &Permission::of(Resource::MutualFund, Action::Read))?;
            let fund = context.get(id).await?;

            println!();
            println!("=== {} ===", fund.name);
            println!();
            println!("ID:        {}", fund.id);
            println!("Category:  {}", fund.category);
            println!("NAV:       {:.2}", fund.nav);
            println!("Risk:      {}", fund.risk_level.as_deref().unwrap_or("-"));
            println!(
                "Managers:  {}",
                if fund.fund_managers.is_empty() {
                    "-".to_string()
                } else {
                    fund.fund_managers.join(", ")
                }
            );
            if !fund.holdings.is_empty() {
                println!();
                println!("Holdings:");
                for holding in &fund.holdings {
                    println!(
                        "  {:<28}  {:>6.2}%  {}",
                        truncate(&holding.name, 28),
                        holding.weight,
                        holding.sector.as_deref().unwrap_or("")
                    );
                }
            }
            println!();
            Ok(())
        }
    }
}

async fn cmd_users(
    cli: &Cli,
    config: &Config,
    session: Option<&Session>,
    command: &UserCommands,
) -> Result<()> {
    let client = build_client(cli, config, session)?;
    let mut context = UserContext::new(&client);

    match command {
        UserCommands::List {
            page,
            limit,
            role,
            kyc,
        } => {
            require(cli, session, &Permission::of(Resource::User, Action::Read))?;
            let filter = UserFilter {
                role: role.clone(),
                kyc_status: kyc.clone(),
            };
            context
                .fetch(*page, effective_limit(*limit, config), filter)
                .await;
            check_store_error(context.store().error())?;

            println!();
            println!(
                "{:<26}  {:<22}  {:<28}  {:<12}  {:<10}",
                "ID", "NAME", "EMAIL", "ROLE", "KYC"
            );
            println!("{}", "-".repeat(106));
            for user in context.store().items() {
                println!(
                    "{:<26}  {:<22}  {:<28}  {:<12}  {:<10}",
                    truncate(&user.id, 26),
                    truncate(&user.name, 22),
                    truncate(&user.email, 28),
                    user.role,
                    user.kyc_status
                );
            }
            print_footer(context.store().pagination());
            Ok(())
        }
        UserCommands::SetRole { id, role } => {
            require(cli, session, &Permission::of(Resource::User, Action::Update))?;
            context.update_role(id, role).await?;
            println!("[OK] Role updated: {} -> {}", id, role);
            Ok(())
        }
        UserCommands::SetKyc { id, status } => {
            require(cli, session, &Permission::of(Resource::User, Action::Update))?;
            context.update_kyc(id, status).await?;
            println!("[OK] KYC status updated: {} -> {}", id, status);
            Ok(())
        }
    }
}

async fn cmd_tx(
    cli: &Cli,
    config: &Config,
    session: Option<&Session>,
    command: &TxCommands,
) -> Result<()> {
    let client = build_client(cli, config, session)?;
    let mut context = TransactionContext::new(&client);

    match command {
        TxCommands::List {
            page,
            limit,
            user,
            status,
            txn_type,
        } => {
            require(cli, session, &Permission::of(Resource::Transaction, Action::Read))?;
            let filter = TransactionFilter {
                user_id: user.clone(),
                status: status.clone(),
                txn_type: txn_type.clone(),
            };
            context
                .fetch(*page, effective_limit(*limit, config), &filter)
                .await;
            check_store_error(context.store().error())?;

            println!();
            println!(
                "{:<26}  {:<18}  {:<24}  {:>11}  {:<12}  {:<10}",
                "ID", "USER", "PRODUCT", "AMOUNT", "TYPE", "STATUS"
            );
            println!("{}", "-".repeat(112));
            for txn in context.store().items() {
                println!(
                    "{:<26}  {:<18}  {:<24}  {:>11.2}  {:<12}  {:<10}",
                    truncate(&txn.id, 26),
                    truncate(&txn.user_name, 18),
                    truncate(&txn.product_name, 24),
                    txn.amount,
                    txn.txn_type,
                    txn.status
                );
            }
            print_footer(context.store().pagination());
            Ok(())
        }
    }
}

async fn cmd_support(
    cli: &Cli,
    config: &Config,
    session: Option<&Session>,
    command: &SupportCommands,
) -> Result<()> {
    let client = build_client(cli, config, session)?;
    let mut context = SupportContext::new(&client);

    match command {
        SupportCommands::List {
            page,
            limit,
            status,
        } => {
            require(cli, session, &Permission::of(Resource::Support, Action::Read))?;
            context
                .fetch(*page, effective_limit(*limit, config), *status)
                .await;
            check_store_error(context.store().error())?;

            println!();
            println!(
                "{:<26}  {:<36}  {:<12}  {:<10}  {:<24}",
                "ID", "SUBJECT", "STATUS", "PRIORITY", "USER"
            );
            println!("{}", "-".repeat(116));
            for ticket in context.store().items() {
                println!(
                    "{:<26}  {:<36}  {:<12}  {:<10}  {:<24}",
                    truncate(&ticket.id, 26),
                    truncate(&ticket.subject, 36),
                    ticket.status,
                    ticket.priority,
                    truncate(&ticket.user_email, 24)
                );
            }
            print_footer(context.store().pagination());
            Ok(())
        }
        SupportCommands::SetStatus { id, status } => {
            require(cli, session, &Permission::of(Resource::Support, Action::Update))?;
            context.update_status(id, *status).await?;
            println!("[OK] Ticket {} -> {}", id, status);
            Ok(())
        }
    }
}

async fn cmd_contact(
    cli: &Cli,
    config: &Config,
    session: Option<&Session>,
    command: &ContactCommands,
) -> Result<()> {
    let client = build_client(cli, config, session)?;
    let mut context = ContactContext::new(&client);

    match command {
        ContactCommands::List { page, limit } => {
            require(cli, session, &Permission::of(Resource::Contact, Action::Read))?;
            context.fetch(*page, effective_limit(*limit, config)).await;
            check_store_error(context.store().error())?;

            println!();
            println!(
                "{:<26}  {:<20}  {:<26}  {:<40}",
                "ID", "NAME", "EMAIL", "SUBJECT"
            );
            println!("{}", "-".repeat(118));
            for message in context.store().items() {
                println!(
                    "{:<26}  {:<20}  {:<26}  {:<40}",
                    truncate(&message.id, 26),
                    truncate(&message.name, 20),
                    truncate(&message.email, 26),
                    truncate(&message.subject, 40)
                );
            }
            print_footer(context.store().pagination());
            Ok(())
        }
        ContactCommands::Delete { id } => {
            require(cli, session, &Permission::of(Resource::Contact, Action::Delete))?;
            context.delete(id).await?;
            println!("[OK] Contact message deleted: {}", id);
            Ok(())
        }
    }
}

async fn cmd_settings(
    cli: &Cli,
    config: &Config,
    session: Option<&Session>,
    command: &SettingsCommands,
) -> Result<()> {
    let client = build_client(cli, config, session)?;
    let mut context = SettingsContext::new(&client);

    match command {
        SettingsCommands::Show => {
            require(cli, session, &Permission::of(Resource::Settings, Action::Read))?;
            context.fetch().await;
            check_store_error(context.error())?;

            println!();
            for (key, value) in context.settings() {
                println!("{:<32}  {}", key, value);
            }
            println!();
            Ok(())
        }
        SettingsCommands::Set { key, value } => {
            require(cli, session, &Permission::of(Resource::Settings, Action::Update))?;
            context.update(key, value).await?;
            println!("[OK] {} updated", key);
            Ok(())
        }
    }
}

async fn cmd_explore(cli: &Cli, config: &Config, session: Option<&Session>) -> Result<()> {
    let client = build_client(cli, config, session)?;
    let mut context = ExploreContext::new(&client);

    require(cli, session, &Permission::of(Resource::Explore, Action::Read))?;
    context.fetch().await;
    check_store_error(context.store().error())?;

    println!();
    for section in context.store().items() {
        println!("=== {} ===", section.title);
        for fund in &section.funds {
            let nav = fund
                .nav
                .map(|n| format!("{:.2}", n))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<32}  {:<16}  {:>10}",
                truncate(&fund.name, 32),
                fund.category.as_deref().unwrap_or("-"),
                nav
            );
        }
        println!();
    }
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Pagination footer under every list table
fn print_footer(pagination: Pagination) {
    println!();
    println!("{}", footer_line(&pagination));
    println!();
}

fn footer_line(pagination: &Pagination) -> String {
    let (start, end) = pagination.showing();
    if pagination.total == 0 {
        "No records.".to_string()
    } else if start == 0 {
        // requested page starts past the last record
        format!(
            "Page {} is past the end ({} records, {} pages).",
            pagination.page,
            pagination.total,
            pagination.total_pages()
        )
    } else {
        format!(
            "Showing {}-{} of {} (page {}/{})",
            start,
            end,
            pagination.total,
            pagination.page,
            pagination.total_pages()
        )
    }
}

/// Truncate a string to max length with ellipsis. Counts chars, not
/// bytes: backend names are free to contain non-ASCII.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
