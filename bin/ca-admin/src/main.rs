//! Casino Admin command-line console
//!
//! Admin and affiliate back-office screens over the casino backend:
//! - Sign-in, affiliate registration and session status
//! - Player, affiliate, KYC, payout, transaction and referral listings
//! - Banner, platform fee and earnings pages

mod render;

use std::path::PathBuf;

use anyhow::{bail, Result};
use ca_config::{AppConfig, ConfigLoader};
use ca_console::screens::affiliates::{Affiliates, AffiliatesScreen};
use ca_console::screens::auth::{AuthService, LoginOutcome, RegistrationForm};
use ca_console::screens::banners::{BannerAdmin, BannerForm};
use ca_console::screens::earnings::fetch_earnings;
use ca_console::screens::fees::PlatformFees;
use ca_console::screens::kyc::{PendingKyc, PendingKycScreen};
use ca_console::screens::payouts::{
    MyPayouts, MyPayoutsScreen, PayoutRequest, PayoutRequestForm, PayoutRequests, PayoutRequestsScreen,
};
use ca_console::screens::players::{Players, PlayersScreen};
use ca_console::screens::referrals::{Referrals, ReferralsScreen};
use ca_console::screens::transactions::{Transactions, TransactionsScreen};
use ca_console::screens::{AccountStatus, ListingScreen, LoadOutcome, ScreenSpec, ScreenView};
use ca_console::table::{Order, TableState};
use ca_console::{AdminClient, Role};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{debug, info};

/// Casino Admin console
#[derive(Parser, Debug)]
#[command(name = "ca-admin")]
#[command(about = "Casino Admin console - back-office screens for administrators and affiliates")]
struct Args {
    /// Path to a TOML config file
    #[arg(long, env = "CASINO_ADMIN_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every listing
#[derive(ClapArgs, Debug)]
struct ListArgs {
    /// Case-insensitive search across the screen's text columns
    #[arg(long)]
    search: Option<String>,

    /// Column to sort by
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Page to show, starting at 1
    #[arg(long, default_value = "1")]
    page: usize,

    /// Rows per page (defaults to table.rows_per_page)
    #[arg(long)]
    rows: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long, default_value = "admin")]
        role: Role,
        #[arg(long, env = "CASINO_ADMIN_EMAIL")]
        email: String,
        #[arg(long, env = "CASINO_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new affiliate account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CASINO_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        /// Promotion method; repeat for several
        #[arg(long = "method", required = true)]
        methods: Vec<String>,
    },
    /// Drop the stored session
    Logout {
        #[arg(long, default_value = "admin")]
        role: Role,
    },
    /// Show which sessions are active and for how long
    Session,
    /// Players (admin)
    Players {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        kyc: Option<String>,
        #[command(subcommand)]
        action: Option<StatusAction>,
    },
    /// Affiliates (admin)
    Affiliates {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        status: Option<String>,
        /// Only affiliates promoting through this method
        #[arg(long)]
        method: Option<String>,
        #[command(subcommand)]
        action: Option<AffiliateAction>,
    },
    /// Pending KYC submissions (admin)
    Kyc {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        document_type: Option<String>,
        #[command(subcommand)]
        action: Option<ReviewAction>,
    },
    /// Affiliate payout requests (admin)
    Payouts {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        status: Option<String>,
        #[command(subcommand)]
        action: Option<PayoutAction>,
    },
    /// Transaction ledger (admin)
    Transactions {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Players referred by the signed-in affiliate
    Referrals {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        status: Option<String>,
    },
    /// The signed-in affiliate's payout requests
    MyPayouts {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        status: Option<String>,
        #[command(subcommand)]
        action: Option<MyPayoutAction>,
    },
    /// The signed-in affiliate's earnings summary
    Earnings,
    /// Promotional banners (admin)
    Banners {
        #[command(subcommand)]
        action: Option<BannerAction>,
    },
    /// Platform fee (admin)
    Fees {
        /// New fee in percent
        #[arg(long)]
        set: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
enum StatusAction {
    SetStatus { id: String, status: AccountStatus },
}

#[derive(Subcommand, Debug)]
enum AffiliateAction {
    SetStatus { id: String, status: AccountStatus },
    /// Commission rate in percent (0-4)
    Commission { id: String, rate: f64 },
}

#[derive(Subcommand, Debug)]
enum ReviewAction {
    Approve { id: String },
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand, Debug)]
enum PayoutAction {
    Approve { id: String },
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
    MarkPaid {
        id: String,
        #[arg(long)]
        reference: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum MyPayoutAction {
    Request {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        method: String,
        #[arg(long)]
        details: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum BannerAction {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        image_url: String,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        inactive: bool,
    },
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (JSON if LOG_FORMAT=json, text otherwise)
    ca_common::logging::init_logging("ca-admin", "warn");

    let args = Args::parse();
    let loader = match &args.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    debug!(base_url = %config.api.base_url(), "Configuration loaded");

    match run(args.command, &config).await {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<ca_console::Error>().and_then(|err| err.redirect_to()) {
            Some(redirect_to) => {
                eprintln!("Session expired. Sign in again ({}).", redirect_to);
                std::process::exit(2);
            }
            None => Err(e),
        },
    }
}

async fn run(command: Command, config: &AppConfig) -> Result<()> {
    let client = AdminClient::from_config(config)?;

    match command {
        Command::Login { role, email, password } => {
            match AuthService::new(client).login(role, &email, &password).await? {
                LoginOutcome::SignedIn { redirect_to, message } => {
                    println!("{}", message.unwrap_or_else(|| format!("Signed in as {}", role)));
                    println!("-> {}", redirect_to);
                }
                LoginOutcome::AlreadySignedIn { redirect_to } => {
                    println!("Already signed in as {}", role);
                    println!("-> {}", redirect_to);
                }
            }
        }
        Command::Register { username, full_name, email, password, methods } => {
            let form = RegistrationForm {
                username,
                full_name,
                email,
                password,
                promotion_methods: methods,
            };
            let message = AuthService::new(client).register(&form).await?;
            println!("{}", message.unwrap_or_else(|| "Registration received".into()));
            println!("-> {}", Role::Affiliate.login_route());
        }
        Command::Logout { role } => {
            let login = AuthService::new(client).logout(role)?;
            println!("Signed out of {}", role);
            println!("-> {}", login);
        }
        Command::Session => {
            let auth = AuthService::new(client);
            for role in [Role::Admin, Role::Affiliate] {
                let status = auth.status(role);
                match status.remaining {
                    Some(left) if status.signed_in => println!("{:<10} signed in, expires in {}", role, left),
                    _ => println!("{:<10} signed out", role),
                }
            }
        }
        Command::Players { list, status, kyc, action } => {
            let screen = Players::with_table(client, table_for::<PlayersScreen>(config, &list));
            if let Some(StatusAction::SetStatus { id, status }) = action {
                report(screen.set_status(&id, status).await?, "Player status updated");
                return Ok(());
            }
            load(&screen).await?;
            filter(&screen, "status", status);
            filter(&screen, "kyc_status", kyc);
            page(&screen, &list);
            render::table(
                &screen.view(),
                &["id", "username", "name", "email", "status", "kyc", "balance", "joined"],
                |p| {
                    vec![
                        p.id.clone(),
                        p.username.clone(),
                        p.full_name.clone(),
                        p.email.clone(),
                        p.status.clone(),
                        p.kyc_status.clone(),
                        render::money(p.balance, &p.currency),
                        render::date(p.created_at),
                    ]
                },
            );
        }
        Command::Affiliates { list, status, method, action } => {
            let screen = Affiliates::with_table(client, table_for::<AffiliatesScreen>(config, &list));
            match action {
                Some(AffiliateAction::SetStatus { id, status }) => {
                    report(screen.set_status(&id, status).await?, "Affiliate status updated");
                    return Ok(());
                }
                Some(AffiliateAction::Commission { id, rate }) => {
                    report(screen.set_commission(&id, rate).await?, "Commission updated");
                    return Ok(());
                }
                None => {}
            }
            load(&screen).await?;
            filter(&screen, "status", status);
            if let Some(method) = method {
                screen.set_membership_filter("promotion_methods", method);
            }
            page(&screen, &list);
            render::table(
                &screen.view(),
                &["id", "username", "email", "status", "methods", "commission", "referrals", "code"],
                |a| {
                    vec![
                        a.id.clone(),
                        a.username.clone(),
                        a.email.clone(),
                        a.status.clone(),
                        a.promotion_methods.join(","),
                        format!("{}%", a.commission_rate),
                        a.total_referrals.to_string(),
                        a.referral_code.clone(),
                    ]
                },
            );
        }
        Command::Kyc { list, document_type, action } => {
            let screen = PendingKyc::with_table(client, table_for::<PendingKycScreen>(config, &list));
            match action {
                Some(ReviewAction::Approve { id }) => {
                    report(screen.approve(&id).await?, "KYC approved");
                    return Ok(());
                }
                Some(ReviewAction::Reject { id, reason }) => {
                    report(screen.reject(&id, &reason).await?, "KYC rejected");
                    return Ok(());
                }
                None => {}
            }
            load(&screen).await?;
            filter(&screen, "document_type", document_type);
            page(&screen, &list);
            render::table(
                &screen.view(),
                &["id", "username", "email", "document", "number", "submitted"],
                |k| {
                    vec![
                        k.id.clone(),
                        k.username.clone(),
                        k.email.clone(),
                        k.document_type.clone(),
                        k.document_number.clone(),
                        render::date(k.submitted_at),
                    ]
                },
            );
        }
        Command::Payouts { list, status, action } => {
            let screen = PayoutRequests::with_table(client, table_for::<PayoutRequestsScreen>(config, &list));
            match action {
                Some(PayoutAction::Approve { id }) => {
                    report(screen.approve(&id).await?, "Payout approved");
                    return Ok(());
                }
                Some(PayoutAction::Reject { id, reason }) => {
                    report(screen.reject(&id, &reason).await?, "Payout rejected");
                    return Ok(());
                }
                Some(PayoutAction::MarkPaid { id, reference }) => {
                    report(screen.mark_paid(&id, reference.as_deref()).await?, "Payout marked as paid");
                    return Ok(());
                }
                None => {}
            }
            load(&screen).await?;
            filter(&screen, "status", status);
            page(&screen, &list);
            print_payouts(&screen.view());
        }
        Command::Transactions { list, kind, status } => {
            let screen = Transactions::with_table(client, table_for::<TransactionsScreen>(config, &list));
            load(&screen).await?;
            filter(&screen, "kind", kind);
            filter(&screen, "status", status);
            page(&screen, &list);
            render::table(
                &screen.view(),
                &["id", "username", "type", "amount", "status", "reference", "date"],
                |t| {
                    vec![
                        t.id.clone(),
                        t.username.clone(),
                        t.kind.clone(),
                        render::money(t.amount, &t.currency),
                        t.status.clone(),
                        t.reference.clone(),
                        render::date(t.created_at),
                    ]
                },
            );
        }
        Command::Referrals { list, status } => {
            let screen = Referrals::with_table(client, table_for::<ReferralsScreen>(config, &list));
            load(&screen).await?;
            filter(&screen, "status", status);
            page(&screen, &list);
            render::table(
                &screen.view(),
                &["id", "username", "email", "status", "deposits", "commission", "joined"],
                |r| {
                    vec![
                        r.id.clone(),
                        r.username.clone(),
                        r.email.clone(),
                        r.status.clone(),
                        render::money(r.total_deposits, ""),
                        render::money(r.commission_earned, ""),
                        render::date(r.joined_at),
                    ]
                },
            );
        }
        Command::MyPayouts { list, status, action } => {
            let screen = MyPayouts::with_table(client, table_for::<MyPayoutsScreen>(config, &list));
            if let Some(MyPayoutAction::Request { amount, method, details }) = action {
                let form = PayoutRequestForm {
                    amount,
                    method,
                    account_details: details,
                };
                report(screen.request_payout(&form).await?, "Payout requested");
            } else {
                load(&screen).await?;
            }
            filter(&screen, "status", status);
            page(&screen, &list);
            print_payouts(&screen.view());
        }
        Command::Earnings => {
            let summary = fetch_earnings(&client).await?;
            let c = summary.currency.as_str();
            println!("Total earned       {}", render::money(summary.total_earned, c));
            println!("Available balance  {}", render::money(summary.available_balance, c));
            println!("Pending payout     {}", render::money(summary.pending_payout, c));
            println!("Paid out           {}", render::money(summary.paid_out, c));
            println!("Commission rate    {}%", summary.commission_rate);
            println!(
                "Referrals          {} ({} active)",
                summary.total_referrals, summary.active_referrals
            );
        }
        Command::Banners { action } => {
            let banners = BannerAdmin::new(client);
            match action {
                Some(BannerAction::Create { title, image_url, link, inactive }) => {
                    let form = BannerForm {
                        title,
                        image_url,
                        link,
                        active: !inactive,
                    };
                    report(banners.create(&form).await?, "Banner created");
                }
                Some(BannerAction::Delete { id }) => {
                    report(banners.delete(&id).await?, "Banner deleted");
                }
                None => {
                    for banner in banners.list().await? {
                        let state = if banner.active { "active" } else { "hidden" };
                        println!("{}  [{}]  {}  {}", banner.id, state, banner.title, banner.image_url);
                    }
                }
            }
        }
        Command::Fees { set } => {
            let fees = PlatformFees::new(client);
            match set {
                Some(percent) => report(fees.update(percent).await?, "Platform fee updated"),
                None => {
                    let fee = fees.get().await?;
                    println!("Platform fee: {}%", fee.percent);
                    if let Some(updated_at) = fee.updated_at {
                        println!("Last changed: {}", render::date(Some(updated_at)));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Table state for a listing from the config defaults and the CLI flags
fn table_for<S: ScreenSpec>(config: &AppConfig, list: &ListArgs) -> TableState {
    let order_by = list.sort.as_deref().unwrap_or(S::DEFAULT_ORDER_BY);
    let order = match (&list.sort, list.desc) {
        (_, true) => Order::Desc,
        (Some(_), false) => Order::Asc,
        (None, false) => S::DEFAULT_ORDER,
    };

    TableState::new(order_by)
        .with_order(order)
        .with_rows_per_page(list.rows.unwrap_or(config.table.rows_per_page))
        .with_dense(config.table.dense)
}

async fn load<S: ScreenSpec>(screen: &ListingScreen<S>) -> Result<()> {
    match screen.load().await? {
        LoadOutcome::Applied { count } => {
            info!(screen = S::NAME, count, "Listing loaded");
            Ok(())
        }
        LoadOutcome::Failed { message } => bail!(message),
        LoadOutcome::Discarded => bail!("listing was superseded by a newer request"),
    }
}

fn filter<S: ScreenSpec>(screen: &ListingScreen<S>, field: &str, value: Option<String>) {
    if let Some(value) = value {
        screen.set_filter(field, value);
    }
}

fn page<S: ScreenSpec>(screen: &ListingScreen<S>, list: &ListArgs) {
    if let Some(query) = &list.search {
        screen.set_query(query.as_str());
    }
    screen.set_page(list.page.saturating_sub(1));
}

fn report(message: Option<String>, fallback: &str) {
    println!("{}", message.unwrap_or_else(|| fallback.to_string()));
}

fn print_payouts(view: &ScreenView<PayoutRequest>) {
    render::table(
        view,
        &["id", "affiliate", "amount", "method", "status", "reference", "requested"],
        |p| {
            vec![
                p.id.clone(),
                p.affiliate_username.clone(),
                render::money(p.amount, &p.currency),
                p.method.clone(),
                p.status.clone(),
                p.transaction_ref.clone().unwrap_or_default(),
                render::date(p.requested_at),
            ]
        },
    );
}
