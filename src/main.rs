use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use vocc::config::ClientConfig;
use vocc::requests::{
    derive, FilterState, Priority, PriorityFilter, RequestDraft, RequestKind, RequestPage,
    RequestRecord, RequestStatus, StatusFilter, Tab,
};
use vocc::session::reset_link;
use vocc::AppContext;

#[derive(Parser)]
#[command(
    name = "vocc",
    about = "Voice-of-Customer client — track customer requests from the terminal",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the VoC API
    #[arg(long, env = "VOCC_API_URL", global = true)]
    api_url: Option<String>,

    /// Bearer token from a previous `vocc login`
    #[arg(long, env = "VOCC_TOKEN", global = true)]
    token: Option<String>,

    /// Data directory holding config.toml
    #[arg(long, env = "VOCC_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VOCC_LOG", global = true)]
    log: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and print a bearer token for later invocations.
    ///
    /// Export it as VOCC_TOKEN (or pass --token) — each run starts logged
    /// out, the way the app always boots into an anonymous session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account (logs you in on success).
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Log out and invalidate the token server-side.
    Logout,
    /// Show the authenticated user.
    Whoami,
    /// Request a password-reset email.
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password using the link (or raw token) from the reset email.
    ResetPassword {
        /// The emailed link, a query string, or the bare token
        link: String,
        #[arg(long)]
        password: String,
    },
    /// Work with customer requests.
    Requests {
        #[command(subcommand)]
        action: RequestsAction,
    },
}

#[derive(Subcommand)]
enum RequestsAction {
    /// List requests with client-side filtering and pagination.
    List {
        /// Tab: "feature" (or 0) / "issue" (or 1)
        #[arg(long, default_value = "feature")]
        tab: String,
        /// Case-insensitive search over title, description, customer name
        #[arg(long, default_value = "")]
        search: String,
        /// "all" or an exact stored status value (e.g. pending, in-progress)
        #[arg(long, default_value = "all")]
        status: String,
        /// "all" or high/medium/low
        #[arg(long, default_value = "all")]
        priority: String,
        /// Inclusive customer-count range, "min,max"
        #[arg(long, default_value = "0,10")]
        customers: String,
        /// 1-based page number (not clamped — a page past the end is empty)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Fetch one request by id.
    Get { id: String },
    /// Create a request.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "No description")]
        description: String,
        /// "feature" or "issue"
        #[arg(long, default_value = "issue")]
        kind: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        customer: Option<String>,
    },
    /// Update fields on a request.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Delete a request.
    Delete { id: String },
    /// Advance a request's status (open → in-progress → resolved → open).
    Advance { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ClientConfig::new(args.api_url.clone(), args.data_dir.clone(), args.log.clone());
    init_logging(&config.log);

    let ctx = AppContext::new(config).context("failed to build API client")?;

    // The client always boots logged out; a token passed via flag/env stands
    // in for the in-page session of the original single-page app.
    ctx.auth_controller().initialize().await;
    if let Some(token) = args.token.as_deref() {
        ctx.credentials.set(token).await;
    }

    match args.command {
        Command::Login { email, password } => {
            let user = ctx.auth_controller().login(&email, &password).await?;
            let token = ctx.credentials.get().await.unwrap_or_default();
            if args.json {
                println!("{}", json!({ "user": user, "token": token }));
            } else {
                println!("Logged in as {}.", display_email(&user, &email));
                println!("export VOCC_TOKEN={token}");
            }
        }
        Command::Signup {
            email,
            password,
            name,
        } => {
            let user = ctx
                .auth_controller()
                .signup(&email, &password, name.as_deref())
                .await?;
            let token = ctx.credentials.get().await.unwrap_or_default();
            if args.json {
                println!("{}", json!({ "user": user, "token": token }));
            } else {
                println!("Account created for {}.", display_email(&user, &email));
                println!("export VOCC_TOKEN={token}");
            }
        }
        Command::Logout => {
            ctx.auth_controller().logout().await;
            if !args.json {
                println!("Logged out.");
            }
        }
        Command::Whoami => {
            let user = ctx.auth_controller().current_user().await?;
            if args.json {
                println!("{user}");
            } else {
                println!("{}", display_email(&user, "(unknown)"));
            }
        }
        Command::ForgotPassword { email } => {
            ctx.auth_controller().forgot_password(&email).await?;
            if !args.json {
                println!("If {email} has an account, a reset email is on its way.");
            }
        }
        Command::ResetPassword { link, password } => {
            // Accept a full link, a bare query string, or the raw token.
            let token = if link.contains('=') {
                reset_link::token_from_link(&link)
            } else {
                Some(link.clone())
            };
            ctx.auth_controller()
                .reset_password(token.as_deref(), &password)
                .await?;
            if !args.json {
                println!("Password updated. Log in with the new one.");
            }
        }
        Command::Requests { action } => run_requests(&ctx, action, args.json).await?,
    }

    Ok(())
}

async fn run_requests(ctx: &AppContext, action: RequestsAction, json_out: bool) -> Result<()> {
    let controller = ctx.request_controller();
    match action {
        RequestsAction::List {
            tab,
            search,
            status,
            priority,
            customers,
            page,
        } => {
            let filter = build_filter(&tab, &search, &status, &priority, &customers, page)?;
            controller.fetch_all().await?;
            let state = ctx.requests.read().await;
            let page = derive(&state.records, &filter);
            if json_out {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print_page(&page, &filter);
            }
        }
        RequestsAction::Get { id } => {
            let record = controller.fetch_one(&id).await?;
            print_record(&record, json_out)?;
        }
        RequestsAction::Create {
            title,
            description,
            kind,
            priority,
            customer,
        } => {
            let draft = RequestDraft {
                title,
                description,
                kind: RequestKind::from(kind.as_str()),
                priority: Priority::from(priority.as_str()),
                customer_name: customer,
            };
            let record = controller.create(&draft).await?;
            print_record(&record, json_out)?;
        }
        RequestsAction::Update {
            id,
            title,
            description,
            status,
            priority,
        } => {
            let mut patch = serde_json::Map::new();
            if let Some(title) = title {
                patch.insert("title".into(), Value::String(title));
            }
            if let Some(description) = description {
                patch.insert("description".into(), Value::String(description));
            }
            if let Some(status) = status {
                patch.insert("status".into(), Value::String(status));
            }
            if let Some(priority) = priority {
                patch.insert("priority".into(), Value::String(priority));
            }
            if patch.is_empty() {
                bail!("nothing to update — pass at least one of --title/--description/--status/--priority");
            }
            // Keep the local copy in sync so the silent-drop semantics of
            // update_by_id apply to a freshly fetched collection.
            controller.fetch_all().await?;
            let record = controller.update(&id, Value::Object(patch)).await?;
            print_record(&record, json_out)?;
        }
        RequestsAction::Delete { id } => {
            controller.fetch_all().await?;
            controller.delete(&id).await?;
            if !json_out {
                println!("Deleted {id}.");
            }
        }
        RequestsAction::Advance { id } => {
            // advance_status derives the next step from the stored record.
            controller.fetch_all().await?;
            let next = controller.advance_status(&id).await?;
            if json_out {
                println!("{}", json!({ "id": id, "status": next.as_str() }));
            } else {
                println!("{id} → {}", next.label());
            }
        }
    }
    Ok(())
}

fn build_filter(
    tab: &str,
    search: &str,
    status: &str,
    priority: &str,
    customers: &str,
    page: usize,
) -> Result<FilterState> {
    let mut filter = FilterState::default();
    filter.active_tab = parse_tab(tab)?;
    filter.search_term = search.to_string();
    filter.status_filter = if status == "all" {
        StatusFilter::All
    } else {
        StatusFilter::Is(RequestStatus::from(status))
    };
    filter.priority_filter = if priority == "all" {
        PriorityFilter::All
    } else {
        PriorityFilter::Is(Priority::from(priority))
    };
    filter.customer_count_range = parse_range(customers)?;
    filter.current_page = page.max(1);
    Ok(filter)
}

fn parse_tab(raw: &str) -> Result<Tab> {
    match raw {
        "feature" | "features" => Ok(Tab::Features),
        "issue" | "issues" => Ok(Tab::Issues),
        _ => match raw.parse::<usize>() {
            Ok(index) if index <= 1 => Ok(Tab::from_index(index)),
            _ => bail!("unknown tab {raw:?} — use \"feature\" or \"issue\""),
        },
    }
}

fn parse_range(raw: &str) -> Result<(usize, usize)> {
    let (min, max) = raw
        .split_once(',')
        .with_context(|| format!("range {raw:?} is not \"min,max\""))?;
    let min: usize = min.trim().parse().context("range min is not a number")?;
    let max: usize = max.trim().parse().context("range max is not a number")?;
    if min > max {
        bail!("range min {min} exceeds max {max}");
    }
    Ok((min, max))
}

fn print_page(page: &RequestPage, filter: &FilterState) {
    println!(
        "{:<14} {:<32} {:<12} {:<8} {:>9}  {}",
        "ID", "TITLE", "STATUS", "PRIO", "CUSTOMERS", "UPDATED"
    );
    for record in &page.visible {
        println!(
            "{:<14} {:<32} {:<12} {:<8} {:>9}  {}",
            truncate(&record.id, 14),
            truncate(&record.title, 32),
            record.status.label(),
            record.priority.as_str(),
            record
                .customer_list
                .as_ref()
                .map(|l| l.len().to_string())
                .unwrap_or_else(|| "-".to_string()),
            record.updated_at.format("%Y-%m-%d"),
        );
    }
    println!(
        "\npage {} of {} — {} matching · features {} / issues {} · in review {} · resolved {}",
        filter.current_page,
        page.total_pages,
        page.filtered_count,
        page.kind_counts.feature,
        page.kind_counts.issue,
        page.status_counts.review,
        page.status_counts.resolved,
    );
}

fn print_record(record: &RequestRecord, json_out: bool) -> Result<()> {
    if json_out {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("{} [{}]", record.title, record.id);
        println!(
            "  {} · {} · {}",
            record.kind.as_str(),
            record.status.label(),
            record.priority.as_str()
        );
        println!("  {}", record.description);
        println!(
            "  {} ({} linked)",
            record.customer_name,
            record
                .customer_list
                .as_ref()
                .map(Vec::len)
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn display_email(user: &Value, fallback: &str) -> String {
    user.get("email")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}
