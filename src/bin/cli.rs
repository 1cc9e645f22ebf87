//! Aftersales CLI
//!
//! Command-line client for the ticket server:
//! - Log in and out (session kept on disk)
//! - List, inspect, create and update tickets
//! - Dashboard statistics
//! - Manage users
//! - Generate a config file

use aftersales::client::{ApiClient, ClientError};
use aftersales::config::{generate_default_config, Config};
use aftersales::models::{
    HandleType, SystemSource, Ticket, TicketCategory, TicketPriority, TicketStatus, User,
    UserCreate, UserRole, UserUpdate,
};
use aftersales::routing::{guard, GuardDecision, Route};
use aftersales::session::{FileStorage, SessionStore};
use aftersales::views::{
    available_actions, can_edit, detail_rows, format_date, total_caption, DashboardView,
    DisplayLabel, StatusAction, TicketFormValues, TicketListState,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aftersales")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "After-sales ticket desk")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (default: from config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in (any username, fixed password)
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Log out and forget the session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Ticket commands
    #[command(subcommand)]
    Tickets(TicketCommands),

    /// Dashboard statistics
    Stats,

    /// User commands
    #[command(subcommand)]
    Users(UserCommands),

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum TicketCommands {
    /// List tickets
    List {
        #[arg(long)]
        status: Option<TicketStatus>,
        #[arg(long)]
        source: Option<SystemSource>,
        #[arg(long)]
        category: Option<TicketCategory>,
        #[arg(long)]
        priority: Option<TicketPriority>,
        /// Regular expression matched against the description
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        page_size: u32,
    },

    /// Show one ticket
    Show { id: String },

    /// Create a ticket
    Create {
        #[arg(long)]
        source: SystemSource,
        #[arg(long)]
        category: TicketCategory,
        #[arg(long)]
        handle_type: HandleType,
        #[arg(long)]
        priority: TicketPriority,
        #[arg(short, long)]
        description: String,
        #[arg(long)]
        handle_detail: Option<String>,
        /// Repeat for several tags
        #[arg(short, long)]
        tag: Vec<String>,
        #[arg(long)]
        assigned_to: Option<String>,
    },

    /// Change fields of a ticket
    Update {
        id: String,
        #[arg(long)]
        source: Option<SystemSource>,
        #[arg(long)]
        category: Option<TicketCategory>,
        #[arg(long)]
        handle_type: Option<HandleType>,
        #[arg(long)]
        priority: Option<TicketPriority>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        handle_detail: Option<String>,
        /// Replaces all tags; repeat for several
        #[arg(short, long)]
        tag: Vec<String>,
        #[arg(long)]
        assigned_to: Option<String>,
    },

    /// OPEN -> PROCESSING
    Start { id: String },

    /// PROCESSING -> COMPLETED
    Complete { id: String },

    /// Close a ticket
    Close { id: String },

    /// Delete a ticket
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List,

    /// Show one user
    Show { id: String },

    /// Create a user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: UserRole,
    },

    /// Change fields of a user
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<UserRole>,
    },
}

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult {
    let config = Config::load_or_default(cli.config.as_deref())?;

    let mut logging = config.logging.clone();
    if std::env::var("AFTERSALES_LOG_LEVEL").is_err() {
        logging.level = "warn".to_string();
    }
    aftersales::logging::init(&logging)?;

    let mut session = SessionStore::restored(FileStorage::new(config.client.session_dir()));

    let mut client_config = config.client.to_api_client_config();
    if let Some(url) = cli.api_url.clone() {
        client_config.base_url = url;
    }
    let client = ApiClient::new(client_config)?;

    match cli.command {
        Commands::Login { username, password } => {
            if session.login(&username, &password) {
                println!("Logged in as {}", username);
            } else {
                return Err("Invalid username or password".into());
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }

        Commands::Logout => {
            require_session(&session, &Route::Dashboard.to_path());
            session.logout();
            println!("Logged out");
        }

        Commands::Whoami => {
            require_session(&session, &Route::Dashboard.to_path());
            println!("{}", session.username().unwrap_or("-"));
        }

        Commands::Tickets(command) => {
            let username = session.username().map(String::from);
            run_tickets(command, &client, &session, username.as_deref(), cli.format).await?;
        }

        Commands::Stats => {
            require_session(&session, &Route::Dashboard.to_path());
            let stats = client.ticket_stats().await?;

            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            let dashboard = DashboardView::from_stats(&stats);
            println!("Total tickets: {}", dashboard.total);
            for card in &dashboard.cards {
                println!("  {:<12} {}", card.label, card.count);
            }

            println!();
            println!("{}:", dashboard.category_chart.title);
            for (point, share) in dashboard
                .category_chart
                .points
                .iter()
                .zip(dashboard.category_chart.shares())
            {
                println!("  {:<20} {:>4}  {:>5.1}%", point.label, point.value, share * 100.0);
            }

            println!();
            println!("{}:", dashboard.trend_chart.title);
            let max = dashboard.trend_chart.max_value().max(1);
            for point in &dashboard.trend_chart.points {
                let width = (point.value * 40 / max) as usize;
                println!("  {:<10} {:>4} {}", point.label, point.value, "#".repeat(width));
            }
        }

        Commands::Users(command) => {
            require_session(&session, &Route::Dashboard.to_path());
            run_users(command, &client, cli.format).await?;
        }
    }

    Ok(())
}

/// Exit with a login hint unless the guard lets `target` through
fn require_session(session: &SessionStore<FileStorage>, target: &str) {
    match guard(&session.status(), target) {
        GuardDecision::Render(_) => {}
        GuardDecision::Redirect(_) | GuardDecision::Pending => {
            eprintln!("Not logged in.");
            eprintln!();
            eprintln!("Log in first with:");
            eprintln!("  aftersales login -u <name> -p <password>");
            std::process::exit(1);
        }
    }
}

async fn run_tickets(
    command: TicketCommands,
    client: &ApiClient,
    session: &SessionStore<FileStorage>,
    username: Option<&str>,
    format: OutputFormat,
) -> CliResult {
    match command {
        TicketCommands::List {
            status,
            source,
            category,
            priority,
            search,
            page,
            page_size,
        } => {
            let mut state = TicketListState::new();
            state.set_status(status);
            state.set_system_source(source);
            state.set_category(category);
            state.set_priority(priority);
            state.set_search(search.as_deref().unwrap_or_default());
            state.set_page_size(page_size);
            state.set_page(page);

            require_session(session, &state.route().to_path());
            let result = client.list_tickets(state.params()).await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Csv => print_csv(&result.items)?,
                OutputFormat::Table => {
                    if result.items.is_empty() {
                        println!("No tickets found");
                    } else {
                        print_ticket_table(&result.items);
                    }
                    println!();
                    println!(
                        "{}  (page {}/{})",
                        total_caption(result.total),
                        result.page,
                        state.total_pages(result.total).max(1)
                    );
                }
            }
        }

        TicketCommands::Show { id } => {
            require_session(session, &Route::TicketDetail { id: id.clone() }.to_path());
            let ticket = client.get_ticket(&id).await?;
            print_ticket(&ticket, format)?;
        }

        TicketCommands::Create {
            source,
            category,
            handle_type,
            priority,
            description,
            handle_detail,
            tag,
            assigned_to,
        } => {
            require_session(session, &Route::TicketNew.to_path());

            let mut form = TicketFormValues::for_create(username);
            form.system_source = Some(source);
            form.category = Some(category);
            form.handle_type = Some(handle_type);
            form.priority = Some(priority);
            form.description = description;
            form.handle_detail = handle_detail.unwrap_or_default();
            form.assigned_to = assigned_to.unwrap_or_default();
            for t in &tag {
                form.add_tag(t);
            }

            let body = form.to_create().map_err(validation_message)?;
            let ticket = client.create_ticket(&body).await?;
            println!("Created ticket {}", ticket.id);
        }

        TicketCommands::Update {
            id,
            source,
            category,
            handle_type,
            priority,
            description,
            handle_detail,
            tag,
            assigned_to,
        } => {
            require_session(session, &Route::TicketEdit { id: id.clone() }.to_path());

            let original = client.get_ticket(&id).await?;
            let mut form = TicketFormValues::from_ticket(&original);
            if let Some(source) = source {
                form.system_source = Some(source);
            }
            if let Some(category) = category {
                form.category = Some(category);
            }
            if let Some(handle_type) = handle_type {
                form.handle_type = Some(handle_type);
            }
            if let Some(priority) = priority {
                form.priority = Some(priority);
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(detail) = handle_detail {
                form.handle_detail = detail;
            }
            if let Some(assignee) = assigned_to {
                form.assigned_to = assignee;
            }
            if !tag.is_empty() {
                form.tags.clear();
                for t in &tag {
                    form.add_tag(t);
                }
            }

            let update = form.to_update(&original).map_err(validation_message)?;
            if update.is_empty() {
                println!("Nothing to change");
                return Ok(());
            }
            let ticket = client.update_ticket(&id, &update).await?;
            println!("Updated ticket {}", ticket.id);
        }

        TicketCommands::Start { id } => {
            run_action(StatusAction::StartProcessing, &id, client, session).await?
        }
        TicketCommands::Complete { id } => {
            run_action(StatusAction::Complete, &id, client, session).await?
        }
        TicketCommands::Close { id } => run_action(StatusAction::Close, &id, client, session).await?,

        TicketCommands::Delete { id, yes } => {
            let action = StatusAction::Delete;
            if !yes && !confirm(action.confirmation().unwrap_or("Are you sure?"))? {
                println!("Cancelled");
                return Ok(());
            }
            run_action(action, &id, client, session).await?
        }
    }

    Ok(())
}

/// Carry out a detail-page action, refusing ones the ticket does not offer
async fn run_action(
    action: StatusAction,
    id: &str,
    client: &ApiClient,
    session: &SessionStore<FileStorage>,
) -> CliResult {
    require_session(session, &Route::TicketDetail { id: id.to_string() }.to_path());

    let ticket = client.get_ticket(id).await?;
    if !available_actions(ticket.status).contains(&action) {
        return Err(format!(
            "Cannot {} a ticket that is {}",
            action.label().to_lowercase(),
            ticket.status.label()
        )
        .into());
    }

    match action {
        StatusAction::Delete => {
            client.delete_ticket(id).await?;
        }
        StatusAction::Close => {
            client.close_ticket(id).await?;
        }
        StatusAction::StartProcessing | StatusAction::Complete => {
            if let Some(update) = action.to_update() {
                client.update_ticket(id, &update).await?;
            }
        }
    }

    println!("{}", action.success_message());
    Ok(())
}

async fn run_users(command: UserCommands, client: &ApiClient, format: OutputFormat) -> CliResult {
    match command {
        UserCommands::List => {
            let users = client.list_users().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&users)?),
                OutputFormat::Csv => print_csv(&users)?,
                OutputFormat::Table => print_user_table(&users),
            }
        }

        UserCommands::Show { id } => {
            let user = client.get_user(&id).await.map_err(not_found_hint("user", &id))?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
                OutputFormat::Csv => print_csv(std::slice::from_ref(&user))?,
                OutputFormat::Table => print_user_table(std::slice::from_ref(&user)),
            }
        }

        UserCommands::Create { name, email, role } => {
            let body = UserCreate { name, email, role };
            body.validate()?;
            let user = client.create_user(&body).await?;
            println!("Created user {}", user.id);
        }

        UserCommands::Update {
            id,
            name,
            email,
            role,
        } => {
            let update = UserUpdate { name, email, role };
            if update.is_empty() {
                println!("Nothing to change");
                return Ok(());
            }
            update.validate()?;
            let user = client
                .update_user(&id, &update)
                .await
                .map_err(not_found_hint("user", &id))?;
            println!("Updated user {}", user.id);
        }
    }

    Ok(())
}

fn not_found_hint<'a>(
    kind: &'a str,
    id: &'a str,
) -> impl FnOnce(ClientError) -> Box<dyn std::error::Error> + 'a {
    move |e| {
        if e.is_not_found() {
            format!("No {} with id {}", kind, id).into()
        } else {
            e.into()
        }
    }
}

fn validation_message(errors: Vec<aftersales::ValidationError>) -> Box<dyn std::error::Error> {
    let lines: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    format!("Invalid ticket:\n  {}", lines.join("\n  ")).into()
}

fn confirm(prompt: &str) -> CliResult<bool> {
    use std::io::Write;

    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Flat ticket record for tables and CSV
#[derive(Serialize)]
struct TicketRow {
    id: String,
    status: &'static str,
    priority: &'static str,
    system: &'static str,
    category: &'static str,
    description: String,
    created_by: String,
    created_at: String,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.clone(),
            status: ticket.status.as_str(),
            priority: ticket.priority.as_str(),
            system: ticket.system_source.as_str(),
            category: ticket.category.as_str(),
            description: ticket.description.clone(),
            created_by: ticket.created_by.clone().unwrap_or_default(),
            created_at: format_date(ticket.created_at),
        }
    }
}

/// Anything that flattens into CSV records
trait CsvRecord {
    type Row: Serialize;
    fn row(&self) -> Self::Row;
}

impl CsvRecord for Ticket {
    type Row = TicketRow;
    fn row(&self) -> TicketRow {
        TicketRow::from(self)
    }
}

impl CsvRecord for User {
    type Row = User;
    fn row(&self) -> User {
        self.clone()
    }
}

fn print_csv<T: CsvRecord>(items: &[T]) -> CliResult {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for item in items {
        writer.serialize(item.row())?;
    }
    writer.flush()?;
    Ok(())
}

fn print_ticket_table(tickets: &[Ticket]) {
    println!(
        "{:<10} {:<12} {:<12} {:<5} {:<20} {:<40} {}",
        "ID", "Status", "Priority", "Sys", "Category", "Description", "Created"
    );
    println!("{}", "-".repeat(120));

    for ticket in tickets {
        println!(
            "{:<10} {:<12} {:<12} {:<5} {:<20} {:<40} {}",
            ticket.short_id(),
            ticket.status.label(),
            ticket.priority.label(),
            ticket.system_source.label(),
            ticket.category.label(),
            truncate(&ticket.description, 38),
            format_date(ticket.created_at)
        );
    }
}

fn print_ticket(ticket: &Ticket, format: OutputFormat) -> CliResult {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(ticket)?),
        OutputFormat::Csv => print_csv(std::slice::from_ref(ticket))?,
        OutputFormat::Table => {
            for (label, value) in detail_rows(ticket) {
                println!("{:<12} {}", label, value);
            }
            println!();
            println!("Description:");
            println!("  {}", ticket.description);
            if !ticket.handle_detail.trim().is_empty() {
                println!();
                println!("Handling:");
                println!("  {}", ticket.handle_detail);
            }

            let actions: Vec<&str> = available_actions(ticket.status)
                .iter()
                .map(|a| a.label())
                .collect();
            println!();
            println!("Actions: {}", actions.join(", "));
            if can_edit(ticket.status) {
                println!("Edit with: aftersales tickets update {} ...", ticket.id);
            }
        }
    }
    Ok(())
}

fn print_user_table(users: &[User]) {
    if users.is_empty() {
        println!("No users yet.");
        return;
    }

    println!("{:<38} {:<20} {:<30} {:<15} {}", "ID", "Name", "Email", "Role", "Created");
    println!("{}", "-".repeat(120));
    for user in users {
        println!(
            "{:<38} {:<20} {:<30} {:<15} {}",
            user.id,
            truncate(&user.name, 18),
            truncate(&user.email, 28),
            user.role.label(),
            format_date(user.created_at)
        );
    }
}

fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let cut: String = single_line.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}
