mod app;

use anyhow::{Context, Result};
use blockview_config::{Config, OutputFormat};
use blockview_engine::{BlockDocument, EditorProfile, io, render, to_html, to_text};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{fs::OpenOptions, io::stdout, path::PathBuf};

use app::App;

#[derive(Parser)]
#[command(name = "blockview", version, about = "Render and edit Editor.js block documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a saved block document
    Render {
        /// JSON file produced by the editor's save
        file: PathBuf,

        /// Output format; defaults to the configured one
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Show the Editor.js profile card
    About,

    /// Open the interactive editor page
    Edit {
        /// Starting document; defaults to the configured one, then the welcome content
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Warning: ignoring config file: {e}");
            Config::default()
        }
    };

    match cli.command {
        Command::Render { file, format } => {
            init_stderr_logging();
            let format = format.unwrap_or(config.render.format);
            render_file(&file, format)
        }
        Command::About => {
            init_stderr_logging();
            for line in EditorProfile::editor_js().to_lines() {
                println!("{line}");
            }
            Ok(())
        }
        Command::Edit { file } => {
            if let Some(log_file) = &config.log_file {
                init_file_logging(log_file)?;
            }
            let initial = match file.or(config.initial_document) {
                Some(path) => io::read_document(&path)
                    .with_context(|| format!("Could not open {}", path.display()))?,
                None => BlockDocument::welcome(),
            };
            run_editor(initial)
        }
    }
}

fn init_stderr_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

/// The terminal UI owns stdout/stderr, so interactive logs go to a file
fn init_file_logging(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Could not open log file {}", path.display()))?;

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("blockview editor starting");
    Ok(())
}

fn render_file(file: &PathBuf, format: OutputFormat) -> Result<()> {
    let document = io::read_document(file)?;
    log::debug!("Loaded {} blocks from {}", document.len(), file.display());

    match format {
        OutputFormat::Html => println!("{}", to_html(&render(Some(&document)))),
        OutputFormat::Text => {
            for line in to_text(&render(Some(&document))) {
                println!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", document.to_pretty_json()?),
    }
    Ok(())
}

fn run_editor(initial: BlockDocument) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(initial);
    let res = app::run_app(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}
