mod app;
mod config;
mod ideas;
mod provider;
mod share;
mod storage;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;
use ideas::{parse_suggestions, Category, Favorites, IdGenerator, Idea};
use provider::{ChatCompletionProvider, IdeaProvider, ProviderKind};
use storage::{LocalStore, FAVORITES_KEY};

#[derive(Parser, Debug)]
#[command(name = "datenight")]
#[command(version)]
#[command(about = "Date night ideas from a chat-completion API, with favorites")]
struct Args {
    /// Print ideas for a category (all, indoor, outdoor, budget) and exit
    #[arg(short, long)]
    category: Option<String>,

    /// Print saved favorites as JSON and exit
    #[arg(short, long)]
    favorites: bool,

    /// Delete all saved favorites and exit
    #[arg(long)]
    clear_favorites: bool,

    /// Provider to use for this run, overriding the config file
    #[arg(short, long, value_enum)]
    provider: Option<ProviderKind>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let interactive = args.category.is_none() && !args.favorites && !args.clear_favorites;

    init_logging(interactive);

    let mut config = AppConfig::load()?;
    if let Some(kind) = args.provider {
        config.provider = kind;
    }

    // Handle CLI-only commands
    if let Some(name) = args.category {
        return print_ideas(&config, &name).await;
    }

    if args.favorites {
        return print_favorites();
    }

    if args.clear_favorites {
        return clear_favorites();
    }

    run_tui(config).await
}

/// Logs go to stderr for one-shot commands, and to a file while the TUI owns the terminal
fn init_logging(interactive: bool) {
    let log_file = if interactive {
        LocalStore::open_default().ok().and_then(|store| {
            std::fs::create_dir_all(store.root()).ok()?;
            std::fs::File::create(store.root().join("datenight.log")).ok()
        })
    } else {
        None
    };

    match log_file {
        Some(file) => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .init(),
        None if interactive => {
            // Nowhere to log without trashing the screen
        }
        None => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .init(),
    }
}

async fn print_ideas(config: &AppConfig, name: &str) -> Result<()> {
    let category = Category::from_name(name)
        .filter(|c| Category::REQUESTABLE.contains(c))
        .with_context(|| format!("Unknown category '{}' (try all, indoor, outdoor, budget)", name))?;

    let provider = ChatCompletionProvider::new(config)?;
    let content = provider.suggest(category).await?;

    let mut ids = IdGenerator::new();
    for idea in parse_suggestions(&content, category, &mut ids) {
        println!("{}", idea.text);
    }
    Ok(())
}

fn print_favorites() -> Result<()> {
    let store = LocalStore::open_default()?;
    let favorites = Favorites::from_items(store.get::<Vec<Idea>>(FAVORITES_KEY)?.unwrap_or_default());
    println!("{}", serde_json::to_string_pretty(&favorites)?);
    Ok(())
}

fn clear_favorites() -> Result<()> {
    let store = LocalStore::open_default()?;
    store.remove(FAVORITES_KEY)?;
    tracing::info!("Cleared favorites in {}", store.root().display());
    Ok(())
}

async fn run_tui(config: AppConfig) -> Result<()> {
    // Create app state before touching the terminal so setup errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key).await {
                                tracing::error!("{:#}", e);
                                app.status_message = Some(format!("Error: {}", e));
                                app.status_message_time = Some(std::time::Instant::now());
                            }
                        }
                    }
                }
            }
        }

        // Pick up finished requests, expire status messages
        let _ = app.tick().await;
    }
}
