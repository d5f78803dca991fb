use std::sync::Arc;

use canvas::camera::Point;
use canvas::doc::{NoteId, NoteKind};
use clap::{Args, Parser, Subcommand};
use cli::api::{ApiClient, ApiError};
use cli::desk::{Desk, DeskError};
use cli::outbox::RetryConfig;
use reqwest::Method;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing user email; pass --user-email or set ORGANIZER_USER_EMAIL")]
    MissingUserEmail,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Desk(#[from] DeskError),
    #[error("note {0} is not on the open board")]
    UnknownNote(NoteId),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "organizer-cli", about = "Organizer API client and board gesture simulator")]
struct Cli {
    #[arg(long, env = "ORGANIZER_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[arg(long, env = "ORGANIZER_USER_EMAIL")]
    user_email: Option<String>,

    #[command(subcommand)]
    command: Command,
}

struct CliContext {
    api: ApiClient,
    user_email: Option<String>,
}

impl CliContext {
    fn email(&self) -> Result<&str, CliError> {
        self.user_email.as_deref().ok_or(CliError::MissingUserEmail)
    }

    fn email_header(&self) -> Result<[(&'static str, String); 1], CliError> {
        Ok([("user-email", self.email()?.to_owned())])
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Board(BoardCommand),
    Note(NoteCommand),
    Link(LinkCommand),
    Todo(TodoCommand),
    /// Set the UI theme (`light` or `dark`).
    Theme { theme: String },
    /// Run pointer gestures through a board session and persist the result.
    Simulate(SimulateCommand),
}

#[derive(Args, Debug)]
struct BoardCommand {
    #[command(subcommand)]
    command: BoardSubcommand,
}

#[derive(Subcommand, Debug)]
enum BoardSubcommand {
    List,
    Create {
        #[arg(long, default_value = "")]
        name: String,
    },
    Delete {
        board_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct NoteCommand {
    #[command(subcommand)]
    command: NoteSubcommand,
}

#[derive(Subcommand, Debug)]
enum NoteSubcommand {
    List {
        board_id: Uuid,
    },
    Create {
        board_id: Uuid,
        #[arg(long, value_parser = parse_kind)]
        kind: Option<NoteKind>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        x: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        y: Option<f64>,
    },
    /// Send a partial update, e.g. `--data '{"x":10,"zIndex":1}'`.
    Update {
        note_id: Uuid,
        #[arg(long)]
        data: String,
    },
    Delete {
        note_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct LinkCommand {
    #[command(subcommand)]
    command: LinkSubcommand,
}

#[derive(Subcommand, Debug)]
enum LinkSubcommand {
    List {
        #[arg(long)]
        category: Option<String>,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        link_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct TodoCommand {
    #[command(subcommand)]
    command: TodoSubcommand,
}

#[derive(Subcommand, Debug)]
enum TodoSubcommand {
    List,
    Add {
        content: String,
    },
    Done {
        task_id: Uuid,
        #[arg(long, default_value_t = false)]
        undo: bool,
    },
    Edit {
        task_id: Uuid,
        content: String,
    },
    /// Set the display order to the given ids.
    Reorder {
        task_ids: Vec<Uuid>,
    },
    Delete {
        task_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct SimulateCommand {
    #[command(subcommand)]
    command: SimulateSubcommand,
}

#[derive(Subcommand, Debug)]
enum SimulateSubcommand {
    /// Drag a note by its header.
    Drag(GestureArgs),
    /// Drag a note's bottom-right resize handle.
    Resize(GestureArgs),
}

#[derive(Args, Debug)]
struct GestureArgs {
    note_id: Uuid,
    /// Board holding the note; defaults to the first board.
    #[arg(long)]
    board_id: Option<Uuid>,
    /// Pointer travel in screen pixels.
    #[arg(long, allow_hyphen_values = true)]
    dx: f64,
    #[arg(long, allow_hyphen_values = true)]
    dy: f64,
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,
    #[arg(long, default_value_t = 3)]
    attempts: u32,
}

fn parse_kind(raw: &str) -> Result<NoteKind, String> {
    serde_json::from_value(Value::String(raw.to_owned())).map_err(|_| format!("unknown note kind {raw:?}"))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = CliContext { api: ApiClient::new(&cli.base_url), user_email: cli.user_email };

    match cli.command {
        Command::Ping => {
            ctx.api.health().await?;
            println!("ok");
            Ok(())
        }
        Command::Register { name, email, password } => {
            let message = ctx.api.register(&name, &email, &password).await?;
            println!("{message}");
            Ok(())
        }
        Command::Login { email, password } => print_json(&ctx.api.login(&email, &password).await?),
        Command::Board(board) => run_board(&ctx, board).await,
        Command::Note(note) => run_note(&ctx, note).await,
        Command::Link(link) => run_link(&ctx, link).await,
        Command::Todo(todo) => run_todo(&ctx, todo).await,
        Command::Theme { theme } => {
            let body = json!({ "userEmail": ctx.email()?, "theme": theme });
            let reply = ctx.api.request(Method::PUT, "/api/settings/theme", &[], Some(&body)).await?;
            print_json(&reply)
        }
        Command::Simulate(sim) => run_simulate(&ctx, sim).await,
    }
}

async fn run_board(ctx: &CliContext, board: BoardCommand) -> Result<(), CliError> {
    let reply = match board.command {
        BoardSubcommand::List => ctx.api.request(Method::GET, "/api/boards", &ctx.email_header()?, None).await?,
        BoardSubcommand::Create { name } => {
            let body = json!({ "userEmail": ctx.email()?, "name": name });
            ctx.api.request(Method::POST, "/api/boards", &[], Some(&body)).await?
        }
        BoardSubcommand::Delete { board_id } => {
            ctx.api.request(Method::DELETE, &format!("/api/boards/{board_id}"), &[], None).await?
        }
    };
    print_json(&reply)
}

async fn run_note(ctx: &CliContext, note: NoteCommand) -> Result<(), CliError> {
    let reply = match note.command {
        NoteSubcommand::List { board_id } => {
            ctx.api.request(Method::GET, "/api/notes", &[("board-id", board_id.to_string())], None).await?
        }
        NoteSubcommand::Create { board_id, kind, content, color, x, y } => {
            let mut body = Map::new();
            body.insert("boardId".to_owned(), Value::String(board_id.to_string()));
            if let Some(kind) = kind {
                body.insert("type".to_owned(), serde_json::to_value(kind)?);
            }
            for (key, value) in [("content", content), ("color", color)] {
                if let Some(value) = value {
                    body.insert(key.to_owned(), Value::String(value));
                }
            }
            for (key, value) in [("x", x), ("y", y)] {
                if let Some(value) = value {
                    body.insert(key.to_owned(), json!(value));
                }
            }
            ctx.api.request(Method::POST, "/api/notes", &[], Some(&Value::Object(body))).await?
        }
        NoteSubcommand::Update { note_id, data } => {
            let body = serde_json::from_str::<Value>(&data)?;
            ctx.api.request(Method::PUT, &format!("/api/notes/{note_id}"), &[], Some(&body)).await?
        }
        NoteSubcommand::Delete { note_id } => {
            ctx.api.request(Method::DELETE, &format!("/api/notes/{note_id}"), &[], None).await?
        }
    };
    print_json(&reply)
}

async fn run_link(ctx: &CliContext, link: LinkCommand) -> Result<(), CliError> {
    let reply = match link.command {
        LinkSubcommand::List { category } => ctx.api.list_links(ctx.email()?, category.as_deref()).await?,
        LinkSubcommand::Create { title, url, category } => {
            let body = json!({ "userEmail": ctx.email()?, "title": title, "url": url, "category": category });
            ctx.api.request(Method::POST, "/api/links", &[], Some(&body)).await?
        }
        LinkSubcommand::Delete { link_id } => {
            ctx.api.request(Method::DELETE, &format!("/api/links/{link_id}"), &[], None).await?
        }
    };
    print_json(&reply)
}

async fn run_todo(ctx: &CliContext, todo: TodoCommand) -> Result<(), CliError> {
    let reply = match todo.command {
        TodoSubcommand::List => ctx.api.request(Method::GET, "/api/todos", &ctx.email_header()?, None).await?,
        TodoSubcommand::Add { content } => {
            let body = json!({ "userEmail": ctx.email()?, "content": content });
            ctx.api.request(Method::POST, "/api/todos", &[], Some(&body)).await?
        }
        TodoSubcommand::Done { task_id, undo } => {
            let body = json!({ "isCompleted": !undo });
            ctx.api.request(Method::PUT, &format!("/api/todos/{task_id}"), &[], Some(&body)).await?
        }
        TodoSubcommand::Edit { task_id, content } => {
            let body = json!({ "content": content });
            ctx.api.request(Method::PUT, &format!("/api/todos/{task_id}"), &[], Some(&body)).await?
        }
        TodoSubcommand::Reorder { task_ids } => {
            let body = json!({ "taskIds": task_ids.iter().map(Uuid::to_string).collect::<Vec<_>>() });
            ctx.api.request(Method::PUT, "/api/todos/reorder", &[], Some(&body)).await?
        }
        TodoSubcommand::Delete { task_id } => {
            ctx.api.request(Method::DELETE, &format!("/api/todos/{task_id}"), &[], None).await?
        }
    };
    print_json(&reply)
}

async fn run_simulate(ctx: &CliContext, sim: SimulateCommand) -> Result<(), CliError> {
    let (args, resize) = match sim.command {
        SimulateSubcommand::Drag(args) => (args, false),
        SimulateSubcommand::Resize(args) => (args, true),
    };
    let retry = RetryConfig { attempts: args.attempts, ..RetryConfig::default() };
    let mut desk = Desk::open(Arc::new(ctx.api.clone()), ctx.email()?, retry).await?;
    if let Some(board_id) = args.board_id {
        desk.switch_board(board_id).await?;
    }
    desk.zoom(args.zoom - desk.session().camera().zoom);

    let note = desk.session().note(&args.note_id).ok_or(CliError::UnknownNote(args.note_id))?;
    let grip = if resize {
        Point::new(note.x + note.width, note.y + note.height.extent())
    } else {
        Point::new(note.x + note.width / 2.0, note.y + 1.0)
    };
    let from = desk.session().camera().world_to_screen(grip);
    let to = Point::new(from.x + args.dx, from.y + args.dy);

    if resize {
        desk.resize(args.note_id, from, to).await?;
    } else {
        desk.drag(args.note_id, from, to).await?;
    }
    desk.settle().await?;

    let note = desk.session().note(&args.note_id).ok_or(CliError::UnknownNote(args.note_id))?;
    let report = json!({
        "note": note,
        "zoom": desk.session().camera().zoom,
        "unsynced": desk.session().is_unsynced(&args.note_id),
    });
    desk.close().await;
    print_json(&report)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
