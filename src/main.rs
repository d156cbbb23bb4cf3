use std::path::PathBuf;
use std::sync::Arc;

use canvas::doc::{Board, CardId, CardPatch, NewCard};
use canvas::geom::{Point, Size};
use canvas::hit::HitPart;
use canvas::input::{MouseInput, TouchInput};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use whiteboard::config::{ConfigError, Viewport, WhiteboardConfig};
use whiteboard::import::{ImageImport, ImportError, mime_for_path};
use whiteboard::storage::{FileStorage, MemoryStorage};
use whiteboard::store::Persistence;
use whiteboard::sync::{LocalBus, SyncError};
use whiteboard::window::Window;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no card matches {0:?}")]
    UnknownCard(String),
    #[error("{prefix:?} matches {count} cards; use more characters")]
    AmbiguousCard { prefix: String, count: usize },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "whiteboard", about = "Persistent card whiteboard")]
struct Cli {
    /// Directory holding the board file (overrides WHITEBOARD_DATA_DIR).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Storage slot name (overrides WHITEBOARD_STORAGE_KEY).
    #[arg(long)]
    storage_key: Option<String>,

    /// Viewport used to place new cards, WIDTHxHEIGHT (overrides WHITEBOARD_VIEWPORT).
    #[arg(long)]
    viewport: Option<Viewport>,

    /// Log filter directive.
    #[arg(long, env = "WHITEBOARD_LOG", default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List cards bottom to top.
    Show {
        /// Print the stored JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    AddTask {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Sub-items, one per line.
        #[arg(long)]
        sub_info: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    AddNote {
        text: String,
        #[arg(long)]
        color: Option<String>,
    },
    AddImage {
        path: PathBuf,
        /// Intrinsic pixel width.
        #[arg(long)]
        width: u32,
        /// Intrinsic pixel height.
        #[arg(long)]
        height: u32,
        /// MIME type; guessed from the extension when absent.
        #[arg(long)]
        mime: Option<String>,
    },
    /// Drag a card so its top-left corner lands on X,Y.
    Move { id: String, x: f64, y: f64 },
    /// Drag a card's resize handle to reach WIDTH x HEIGHT.
    Resize { id: String, width: f64, height: f64 },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        sub_info: Option<String>,
        #[arg(long)]
        title_color: Option<String>,
        #[arg(long)]
        desc_color: Option<String>,
        #[arg(long)]
        sub_info_color: Option<String>,
    },
    Color { id: String, color: String },
    Delete { id: String },
    /// Bring a card to the front.
    Front { id: String },
    /// Send a card to the back.
    Back { id: String },
    /// Toggle between dark and light.
    Theme,
    /// Two in-memory windows editing one board, printing each step.
    Demo,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, ".env could not be loaded");
        }
    }

    let mut config = WhiteboardConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(key) = cli.storage_key {
        config.storage_key = key;
    }
    if let Some(viewport) = cli.viewport {
        config.viewport = viewport;
    }

    if matches!(cli.command, Command::Demo) {
        return run_demo(&config).await;
    }

    let bus = LocalBus::new(config.channel_capacity);
    let mut window = Window::open(
        Arc::new(FileStorage::new(&config.data_dir)),
        Arc::new(bus.channel(&config.channel)),
        &config,
    );
    info!(data_dir = %config.data_dir.display(), "window opened");

    run_command(&mut window, cli.command)?;

    if window.store().persistence() == Persistence::SessionOnly {
        eprintln!("warning: changes could not be saved to {}", config.data_dir.display());
    }
    Ok(())
}

fn run_command(window: &mut Window, command: Command) -> Result<(), CliError> {
    match command {
        Command::Show { json } => {
            if json {
                println!("{}", window.board().to_json()?);
            } else {
                print_board(window.board());
            }
        }
        Command::AddTask { title, description, sub_info, color } => {
            let mut new = NewCard::task(title);
            new.description = description;
            new.sub_info = sub_info;
            new.color = color;
            println!("{}", window.store_mut().add_card(new));
        }
        Command::AddNote { text, color } => {
            let mut new = NewCard::note(text);
            new.color = color;
            println!("{}", window.store_mut().add_card(new));
        }
        Command::AddImage { path, width, height, mime } => {
            let bytes = std::fs::read(&path).map_err(|source| CliError::Read { path: path.clone(), source })?;
            let mime = mime.unwrap_or_else(|| mime_for_path(&path).to_string());
            let id = window.store_mut().add_image(ImageImport::new(bytes, mime, width, height))?;
            println!("{id}");
        }
        Command::Move { id, x, y } => {
            let id = resolve_card(window.board(), &id)?;
            drag_to(window, &id, Point::new(x, y));
        }
        Command::Resize { id, width, height } => {
            let id = resolve_card(window.board(), &id)?;
            resize_to(window, &id, Size::new(width, height));
        }
        Command::Edit { id, title, description, sub_info, title_color, desc_color, sub_info_color } => {
            let id = resolve_card(window.board(), &id)?;
            let patch = CardPatch { title, description, sub_info, title_color, desc_color, sub_info_color, ..CardPatch::default() };
            window.store_mut().update_card(&id, &patch);
        }
        Command::Color { id, color } => {
            let id = resolve_card(window.board(), &id)?;
            window.store_mut().update_card(&id, &CardPatch::color(color));
        }
        Command::Delete { id } => {
            let id = resolve_card(window.board(), &id)?;
            window.store_mut().delete_card(&id);
        }
        Command::Front { id } => {
            let id = resolve_card(window.board(), &id)?;
            window.store_mut().bring_to_front(&id);
        }
        Command::Back { id } => {
            let id = resolve_card(window.board(), &id)?;
            window.store_mut().send_to_back(&id);
        }
        Command::Theme => {
            window.store_mut().toggle_theme();
            println!("{}", window.board().theme.as_str());
        }
        Command::Demo => {}
    }
    Ok(())
}

/// Exact id, or the single id starting with `prefix`.
fn resolve_card(board: &Board, prefix: &str) -> Result<CardId, CliError> {
    let exact = CardId::from(prefix);
    if board.contains(&exact) {
        return Ok(exact);
    }
    let matches: Vec<CardId> = board.ids().into_iter().filter(|id| id.as_str().starts_with(prefix)).collect();
    match matches.as_slice() {
        [only] => Ok(only.clone()),
        [] => Err(CliError::UnknownCard(prefix.to_string())),
        _ => Err(CliError::AmbiguousCard { prefix: prefix.to_string(), count: matches.len() }),
    }
}

fn print_board(board: &Board) {
    println!("theme: {}  cards: {}", board.theme.as_str(), board.len());
    for (rank, card) in board.cards().iter().enumerate() {
        let size = card.size().map_or_else(|| "auto".to_string(), |s| format!("{}x{}", s.width, s.height));
        let label = card.title.as_deref().or(card.description.as_deref()).unwrap_or("");
        println!(
            "{rank:>3}  {id}  {kind:<5}  ({x:.0}, {y:.0})  {size}  {accent}  {label}",
            id = card.id,
            kind = card.kind.as_str(),
            x = card.x,
            y = card.y,
            accent = card.accent(),
        );
    }
}

/// Replay a mouse drag that grabs the card near its top-left corner.
fn drag_to(window: &mut Window, id: &CardId, target: Point) {
    let Some(origin) = window.board().get(id).map(canvas::doc::Card::position) else {
        return;
    };
    let grab = origin.offset(Point::new(10.0, 10.0));
    let drop = target.offset(Point::new(10.0, 10.0));
    window.pointer_down_on(id, HitPart::Body, &MouseInput::primary(grab.x, grab.y));
    window.pointer_move(&MouseInput::primary(drop.x, drop.y));
    let finished = window.pointer_up(&MouseInput::primary(drop.x, drop.y));
    if finished.iter().any(|a| matches!(a, canvas::engine::Action::Clicked { .. })) {
        eprintln!("moved no further than the drag threshold; card left in place");
    }
}

/// Replay a mouse drag on the resize handle.
fn resize_to(window: &mut Window, id: &CardId, target: Size) {
    let Some((_, rect)) = window.displayed_rects().into_iter().find(|(card, _)| card == id) else {
        return;
    };
    let grab = Point::new(rect.right() - 5.0, rect.bottom() - 5.0);
    let drop = grab.offset(Point::new(target.width - rect.size.width, target.height - rect.size.height));
    window.pointer_down_on(id, HitPart::ResizeHandle, &MouseInput::primary(grab.x, grab.y));
    window.pointer_move(&MouseInput::primary(drop.x, drop.y));
    window.pointer_up(&MouseInput::primary(drop.x, drop.y));
}

async fn run_demo(config: &WhiteboardConfig) -> Result<(), CliError> {
    let storage = MemoryStorage::new();
    let bus = LocalBus::new(config.channel_capacity);
    let open = || Window::open(Arc::new(storage.clone()), Arc::new(bus.channel(&config.channel)), config);
    let mut a = open().with_seed(1);
    let mut b = open().with_seed(2);

    println!("== A adds a task and a note");
    let task = a.store_mut().add_card(NewCard::task("Ship v1").with_sub_info("tests\ndocs"));
    let note = a.store_mut().add_card(NewCard::note("Remember the changelog"));
    b.pump();
    print_board(b.board());

    println!("\n== A drags the task; B only sees the result");
    drag_to(&mut a, &task, Point::new(40.0, 60.0));
    b.recv_remote().await?;
    b.pump();
    print_board(b.board());

    println!("\n== B resizes the note by touch");
    if let Some((_, rect)) = b.displayed_rects().into_iter().find(|(id, _)| *id == note) {
        let grab = Point::new(rect.right() - 5.0, rect.bottom() - 5.0);
        b.pointer_down_on(&note, HitPart::ResizeHandle, &TouchInput::start(grab.x, grab.y));
        b.pointer_move(&TouchInput::moved(grab.x + 80.0, grab.y + 40.0));
        b.pointer_up(&TouchInput::end(grab.x + 80.0, grab.y + 40.0));
    }
    a.pump();
    print_board(a.board());

    println!("\n== Concurrent: A toggles the theme while B adds a card");
    a.store_mut().toggle_theme();
    b.store_mut().add_card(NewCard::task("Late idea"));
    a.pump();
    b.pump();
    println!("A: theme {} with {} cards", a.board().theme.as_str(), a.board().len());
    println!("B: theme {} with {} cards", b.board().theme.as_str(), b.board().len());
    println!("converged: {}", a.board() == b.board());
    Ok(())
}
