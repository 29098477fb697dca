
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use mindmirror::config::ConfigError;
use mindmirror::net::api;
use mindmirror::net::types::{
    CheckInInput, Frequency, Habit, HabitInput, HabitSummary, JournalEntry, MoodPoint, NewJournalEntry, Registration,
    UserProfile,
};
use mindmirror::routes::Route;
use mindmirror::state::events::{Notice, NoticeLevel};
use mindmirror::util::format::{DEFAULT_TRUNCATE_LEN, format_date, format_time, mood_emoji, truncate_text};
use mindmirror::util::guard::Gate;
use mindmirror::{ApiClient, ApiError, AppEvent, AuthSession, ClientConfig, EventBus, FileTokenStore, SessionError};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

const TOKEN_FILE_NAME: &str = ".mindmirror/session.json";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no token file location; pass --token-file or set MINDMIRROR_TOKEN_FILE or HOME")]
    NoTokenFile,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("login required; run `mindmirror login` first")]
    LoginRequired,
    #[error("already signed in; run `mindmirror logout` first")]
    AlreadySignedIn,
    #[error("session did not settle")]
    Unsettled,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "mindmirror", about = "Mind Mirror journaling and habit-tracking CLI")]
struct Cli {
    #[arg(long, global = true, env = "MINDMIRROR_API_URL", default_value = mindmirror::config::DEFAULT_API_URL)]
    base_url: String,

    /// Where the session token is kept between runs.
    #[arg(long, global = true, env = "MINDMIRROR_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Print raw JSON instead of formatted text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MINDMIRROR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MINDMIRROR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    Journal(JournalCommand),
    Habits(HabitsCommand),
    Analytics(AnalyticsCommand),
}

#[derive(Args, Debug)]
struct JournalCommand {
    #[command(subcommand)]
    command: JournalSubcommand,
}

#[derive(Subcommand, Debug)]
enum JournalSubcommand {
    List,
    Read { id: i64 },
    Create(EntryArgs),
    Update {
        id: i64,
        #[command(flatten)]
        entry: EntryArgs,
    },
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct EntryArgs {
    #[arg(long)]
    text: String,
    #[arg(long)]
    mood: Option<String>,
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Args, Debug)]
struct HabitsCommand {
    #[command(subcommand)]
    command: HabitsSubcommand,
}

#[derive(Subcommand, Debug)]
enum HabitsSubcommand {
    List,
    Create(HabitArgs),
    Update {
        id: i64,
        #[command(flatten)]
        habit: HabitArgs,
    },
    Delete { id: i64 },
    CheckIn(CheckInArgs),
}

#[derive(Args, Debug)]
struct HabitArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "daily")]
    frequency: Frequency,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct CheckInArgs {
    habit_id: i64,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    mood: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    energy: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    stress: u8,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args, Debug)]
struct AnalyticsCommand {
    #[command(subcommand)]
    command: AnalyticsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AnalyticsSubcommand {
    Journal,
    Habits,
    Mood,
}

impl Command {
    /// View this command stands in for; `None` runs without a guard.
    fn route(&self) -> Option<Route> {
        match self {
            Self::Login { .. } => Some(Route::Login),
            Self::Register { .. } => Some(Route::Register),
            Self::Logout => None,
            Self::Whoami => Some(Route::Dashboard),
            Self::Journal(_) => Some(Route::Journal),
            Self::Habits(_) => Some(Route::Habits),
            Self::Analytics(_) => Some(Route::Analytics),
        }
    }
}

struct App {
    client: Arc<ApiClient>,
    session: AuthSession,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let token_file = cli.token_file.or_else(default_token_file).ok_or(CliError::NoTokenFile)?;
    let config = ClientConfig { timeouts: ClientConfig::from_env()?.timeouts, ..ClientConfig::with_base_url(&cli.base_url)? };

    let events = EventBus::default();
    let mut notices = events.subscribe();
    let client = Arc::new(ApiClient::new(config, Arc::new(FileTokenStore::new(token_file)), events)?);
    let app = App { session: AuthSession::for_client(Arc::clone(&client)), client, json: cli.json };

    let outcome = run(&app, cli.command).await;
    drain_events(&mut notices);
    outcome
}

fn default_token_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(TOKEN_FILE_NAME))
}

async fn run(app: &App, command: Command) -> Result<(), CliError> {
    if matches!(command, Command::Logout) {
        app.session.logout();
        return Ok(());
    }

    app.session.initialize().await;
    let Some(route) = command.route() else {
        return Ok(());
    };
    let command = match route.guard().wrap(command).render(&app.session.settled().await) {
        Gate::Show(command) => command,
        Gate::Redirect(Route::Login) => return Err(CliError::LoginRequired),
        Gate::Redirect(_) => return Err(CliError::AlreadySignedIn),
        Gate::Loading => return Err(CliError::Unsettled),
    };

    match command {
        Command::Login { email, password } => {
            let user = app.session.login(&email, &password).await?;
            app.print(&user, render_user)
        }
        Command::Register { username, email, password } => {
            let user = app.session.register(&Registration { username, email, password }).await?;
            app.print(&user, render_user)
        }
        Command::Whoami => match app.session.user() {
            Some(user) => app.print(&user, render_user),
            None => Err(CliError::LoginRequired),
        },
        Command::Journal(journal) => run_journal(app, journal.command).await,
        Command::Habits(habits) => run_habits(app, habits.command).await,
        Command::Analytics(analytics) => run_analytics(app, analytics.command).await,
        Command::Logout => Ok(()),
    }
}

async fn run_journal(app: &App, command: JournalSubcommand) -> Result<(), CliError> {
    let client = app.client.as_ref();
    match command {
        JournalSubcommand::List => {
            let entries = api::list_journal_entries(client).await?;
            app.print(&entries, |entries: &Vec<JournalEntry>| {
                entries.iter().map(render_entry_line).collect::<Vec<_>>().join("\n")
            })
        }
        JournalSubcommand::Read { id } => {
            let entry = api::get_journal_entry(client, id).await?;
            app.print(&entry, render_entry)
        }
        JournalSubcommand::Create(args) => {
            let entry = api::create_journal_entry(client, &args.into()).await?;
            app.print(&entry, render_entry)
        }
        JournalSubcommand::Update { id, entry } => {
            let entry = api::update_journal_entry(client, id, &entry.into()).await?;
            app.print(&entry, render_entry)
        }
        JournalSubcommand::Delete { id } => {
            api::delete_journal_entry(client, id).await?;
            println!("deleted entry #{id}");
            Ok(())
        }
    }
}

async fn run_habits(app: &App, command: HabitsSubcommand) -> Result<(), CliError> {
    let client = app.client.as_ref();
    match command {
        HabitsSubcommand::List => {
            let habits = api::list_habits(client).await?;
            app.print(&habits, |habits: &Vec<Habit>| {
                habits.iter().map(render_habit).collect::<Vec<_>>().join("\n")
            })
        }
        HabitsSubcommand::Create(args) => {
            let habit = api::create_habit(client, &args.into()).await?;
            app.print(&habit, render_habit)
        }
        HabitsSubcommand::Update { id, habit } => {
            let habit = api::update_habit(client, id, &habit.into()).await?;
            app.print(&habit, render_habit)
        }
        HabitsSubcommand::Delete { id } => {
            api::delete_habit(client, id).await?;
            println!("deleted habit #{id}");
            Ok(())
        }
        HabitsSubcommand::CheckIn(args) => {
            let input = CheckInInput { mood: args.mood, energy: args.energy, stress: args.stress, notes: args.notes };
            let recorded = api::check_in(client, args.habit_id, &input).await?;
            app.print(&recorded, |c| {
                format!("checked in #{}: mood {} energy {} stress {}", c.id, c.scores.mood, c.scores.energy, c.scores.stress)
            })
        }
    }
}

async fn run_analytics(app: &App, command: AnalyticsSubcommand) -> Result<(), CliError> {
    let client = app.client.as_ref();
    match command {
        AnalyticsSubcommand::Journal => {
            let stats = api::journal_stats(client).await?;
            print_json(&stats)
        }
        AnalyticsSubcommand::Habits => {
            let summaries = api::habit_stats(client).await?;
            app.print(&summaries, |summaries: &Vec<HabitSummary>| {
                summaries.iter().map(render_summary).collect::<Vec<_>>().join("\n")
            })
        }
        AnalyticsSubcommand::Mood => {
            let points = api::mood_trends(client).await?;
            app.print(&points, |points: &Vec<MoodPoint>| {
                points.iter().map(render_mood_point).collect::<Vec<_>>().join("\n")
            })
        }
    }
}

impl App {
    fn print<T: Serialize>(&self, value: &T, render: impl FnOnce(&T) -> String) -> Result<(), CliError> {
        if self.json {
            return print_json(value);
        }
        let text = render(value);
        if !text.is_empty() {
            println!("{text}");
        }
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

/// Print queued notices and redirect hints to stderr.
fn drain_events(rx: &mut broadcast::Receiver<AppEvent>) {
    loop {
        match rx.try_recv() {
            Ok(event) => {
                if let Some(line) = render_event(&event) {
                    eprintln!("{line}");
                }
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "dropped app events");
            }
            Err(_) => break,
        }
    }
}

// =============================================================================
// RENDERING
// =============================================================================

impl From<EntryArgs> for NewJournalEntry {
    fn from(args: EntryArgs) -> Self {
        Self { entry_text: args.text, mood: args.mood, tags: args.tags }
    }
}

impl From<HabitArgs> for HabitInput {
    fn from(args: HabitArgs) -> Self {
        Self { habit_name: args.name, frequency: args.frequency, description: args.description }
    }
}

fn render_event(event: &AppEvent) -> Option<String> {
    match event {
        AppEvent::Notify(Notice { level: NoticeLevel::Success, message }) => Some(message.clone()),
        AppEvent::Notify(Notice { level: NoticeLevel::Error, message }) => Some(format!("error: {message}")),
        AppEvent::Navigate(Route::Login) => Some("session ended; run `mindmirror login`".to_owned()),
        AppEvent::Navigate(_) => None,
    }
}

fn render_user(user: &UserProfile) -> String {
    match &user.email {
        Some(email) => format!("{} <{email}>", user.username),
        None => user.username.clone(),
    }
}

fn timestamp(raw: &str) -> String {
    match (format_date(raw), format_time(raw)) {
        (Some(date), Some(time)) => format!("{date} {time}"),
        _ => raw.to_owned(),
    }
}

fn render_entry_line(entry: &JournalEntry) -> String {
    let emoji = entry.mood.as_deref().map_or("", mood_emoji);
    format!(
        "#{} {} {emoji} {}",
        entry.id,
        timestamp(&entry.created_at),
        truncate_text(&entry.entry_text, DEFAULT_TRUNCATE_LEN)
    )
}

fn render_entry(entry: &JournalEntry) -> String {
    let mut out = format!("#{} {}\n\n{}", entry.id, timestamp(&entry.created_at), entry.entry_text);
    if let Some(mood) = &entry.mood {
        out.push_str(&format!("\n\nmood: {} {mood}", mood_emoji(mood)));
    }
    if !entry.tags.is_empty() {
        out.push_str(&format!("\ntags: {}", entry.tags.join(", ")));
    }
    if let Some(reflection) = &entry.ai_reflection {
        out.push_str(&format!("\n\nreflection: {reflection}"));
    }
    out
}

fn render_habit(habit: &Habit) -> String {
    format!("#{} {} ({}) streak {}", habit.id, habit.habit_name, habit.frequency, habit.streak)
}

fn render_summary(summary: &HabitSummary) -> String {
    match summary.completion_rate() {
        Some(rate) => format!("{}: {:.0}% ({} done, {} missed)", summary.name, rate * 100.0, summary.completed_count, summary.missed_count),
        None => format!("{}: not tracked yet", summary.name),
    }
}

fn render_mood_point(point: &MoodPoint) -> String {
    let date = format_date(&point.date).unwrap_or_else(|| point.date.clone());
    format!("{date}: {:+.2}", point.sentiment)
}
