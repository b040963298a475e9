//! gw: live process table built on the gridwatch engine.
//!
//! Watches local processes through a `ProcessModel`, feeds snapshots into
//! a `Table`, and drives the whole thing from a crossterm event loop.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, warn};
use ratatui::prelude::*;
use ratatui::widgets::TableState;
use simplelog::{Config, LevelFilter, WriteLogger};

use gridwatch::config::{CustomViews, Styles, ViewContext};
use gridwatch::export::{self, ExportFormat};
use gridwatch::keys::KeyCombo;
use gridwatch::model::{Grace, Propagation, Tabular};
use gridwatch::procs::ProcessModel;
use gridwatch::render;
use gridwatch::snapshot::TableData;
use gridwatch::table::Table;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// Live process table with diff highlighting, sorting, and marks.
#[derive(Parser)]
#[command(name = "gw", version, about, long_about = None)]
struct Cli {
    /// Refresh interval in milliseconds
    #[arg(short, long, default_value = "2000")]
    refresh: u64,

    /// Namespace to watch: a user name, or "all"
    #[arg(short, long, default_value = "all")]
    namespace: String,

    /// Substring filter on process names
    #[arg(short = 'l', long, default_value = "")]
    selector: String,

    /// Start with wide columns shown
    #[arg(short, long)]
    wide: bool,

    /// Path to a custom views JSON file
    #[arg(long, value_name = "PATH")]
    views: Option<PathBuf>,

    /// Directory for saved views
    #[arg(long, value_name = "DIR", default_value = "gw-dumps")]
    dump_dir: PathBuf,

    /// Format for saved views
    #[arg(long, value_enum, default_value = "csv")]
    dump_format: ExportFormat,

    /// Log file path
    #[arg(long, default_value = "gw.log")]
    log_file: PathBuf,

    /// Log level filter
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Initialize the terminal for TUI rendering.
/// Enables raw mode, enters alternate screen, and creates a Terminal instance.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
/// Disables raw mode and leaves alternate screen.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> io::Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)?;
    WriteLogger::init(cli.log_level, Config::default(), log_file)
        .expect("Failed to initialize logger");
    info!(
        "gw starting: namespace {:?}, selector {:?}, refresh {}ms",
        cli.namespace, cli.selector, cli.refresh
    );

    let views = match cli.views.as_deref() {
        Some(path) => match CustomViews::load(path) {
            Ok(v) => v,
            Err(e) => {
                warn!("could not load views from {}: {e}", path.display());
                CustomViews::default()
            }
        },
        None => CustomViews::default(),
    };
    let ctx = ViewContext::new(Styles::default(), views);

    // Model setup happens before raw mode so Ctrl+C still works during
    // the first process scan.
    let mut model = ProcessModel::new();
    model.set_namespace(&cli.namespace);
    model.set_label_selector(&cli.selector);
    model.set_refresh_rate(Duration::from_millis(cli.refresh));
    let (tx, rx) = mpsc::channel::<TableData>();
    let _listener = model.add_listener(tx);
    if let Err(e) = model.watch() {
        eprintln!("Error: failed to start process watch: {e}");
        std::process::exit(1);
    }

    let mut table = Table::new(model.source().clone());
    table.init(&ctx);
    if cli.wide {
        table.toggle_wide();
    }
    table.set_model(Box::new(model));

    // Set up panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = init_terminal()?;
    let mut table_state = TableState::default();
    let mut first_snapshot = true;

    // Main event loop
    loop {
        // Drain pending snapshots, keeping only the newest.
        let mut latest: Option<TableData> = None;
        while let Ok(next) = rx.try_recv() {
            latest = Some(next);
        }
        if let Some(next) = latest {
            let view = table.update(&next, false);
            table.update_ui(view, next);
            if first_snapshot && table.grid().data_row_count() > 0 {
                table.select_first_row();
                first_snapshot = false;
            }
        }

        terminal.draw(|frame| {
            let layout = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
                .split(frame.area());
            render::draw_table(frame, layout[0], &table, &mut table_state);
            render::render_hint_bar(frame, layout[1], &table);
        })?;

        // Poll with 250ms timeout for responsive feel
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Custom sort bindings take precedence over the builtins.
        if table.handle_key(&KeyCombo::from_event(&key)) {
            continue;
        }

        // Guarded Ctrl arms come first; the bare letter patterns below
        // match on code alone and would shadow them.
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                match export::save_view(table.grid(), &cli.dump_dir, table.source(), cli.dump_format)
                {
                    Ok(path) => info!("saved view to {}", path.display()),
                    Err(e) => error!("save failed: {e}"),
                }
            }
            KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let targets = table.selected_items();
                if let Some(model) = table.model_mut() {
                    for id in &targets {
                        info!("deleting {id}");
                        if let Err(e) = model.delete(id, Propagation::Background, Grace::Now) {
                            warn!("delete {id} failed: {e}");
                        }
                    }
                }
                table.clear_marks();
            }
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('j') | KeyCode::Down => table.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => table.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => table.select_first_row(),
            KeyCode::Char('G') | KeyCode::End => {
                let last = table.grid().data_row_count();
                table.select_row(last, 0, true);
            }
            KeyCode::Char(' ') => table.toggle_mark(),
            KeyCode::Char('w') => table.toggle_wide(),
            _ => {}
        }
    }

    // Clear terminal before exit
    terminal.clear()?;
    restore_terminal(&mut terminal)?;
    Ok(())
}
