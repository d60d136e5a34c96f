//! sectionspy: a markdown viewer whose section index follows the scroll position.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sectionspy::{app_state, config, formats, input, ui, ScrollSpy, SectionDescriptor};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sectionspy")]
#[command(about = "Scroll-synchronised section index for long documents", long_about = None)]
struct Args {
    /// Files or directories to view
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,

    /// Fraction of the viewport height at which sections activate
    #[arg(long, short = 'b')]
    boundary: Option<f64>,

    /// Rows of fixed chrome above the content
    #[arg(long)]
    offset: Option<f64>,

    /// Property holding section titles
    #[arg(long)]
    title: Option<String>,

    /// Property to descend into before reading the title
    #[arg(long)]
    dive: Option<String>,

    /// Print the section catalog as JSON instead of opening the viewer
    #[arg(long)]
    catalog: bool,
}

fn main() -> sectionspy::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut cfg = config::Config::load();

    // Override config with command line args
    if !args.ext.is_empty() {
        cfg.file_extensions = args.ext;
    }
    if let Some(boundary) = args.boundary {
        cfg.viewport_boundary = boundary;
    }
    if let Some(offset) = args.offset {
        cfg.content_top_offset = offset;
    }
    if let Some(title) = args.title {
        cfg.title_accessor = title;
    }
    if args.dive.is_some() {
        cfg.dive_accessor = args.dive;
    }
    cfg.validate()?;

    let documents = input::find_documents(args.paths, &cfg.file_extensions)?;

    if documents.is_empty() {
        eprintln!("No matching files found");
        return Ok(());
    }

    if args.catalog {
        return print_catalog(&documents, cfg);
    }

    let state = app_state::AppState::new(documents, cfg, 0)?;
    run_tui(state)
}

fn print_catalog(documents: &[PathBuf], cfg: config::Config) -> sectionspy::Result<()> {
    let format = formats::markdown::MarkdownFormat;
    let mut descriptors: Vec<SectionDescriptor> = Vec::new();
    for doc in documents {
        let sections = input::extract_sections(doc, &format)?;
        descriptors.extend(sections.iter().map(sectionspy::section::Section::descriptor));
    }

    let spy = ScrollSpy::build(descriptors, cfg)?;
    let json = serde_json::to_string_pretty(&spy.nav_items())?;
    println!("{json}");
    Ok(())
}

fn run_tui(mut app: app_state::AppState) -> sectionspy::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut app_state::AppState,
) -> sectionspy::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match event::read()? {
            Event::Mouse(mouse) if app.current_view == app_state::View::Document => {
                match mouse.kind {
                    MouseEventKind::ScrollDown => app.scroll_by(3),
                    MouseEventKind::ScrollUp => app.scroll_by(-3),
                    _ => {}
                }
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => match app.current_view {
                app_state::View::FileList => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Up => {
                        app.current_file_index = app.current_file_index.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        if app.current_file_index + 1 < app.files.len() {
                            app.current_file_index += 1;
                        }
                    }
                    KeyCode::Enter => {
                        if let Err(e) = app.open_file(app.current_file_index) {
                            app.message = Some(format!("Error opening file: {e}"));
                        }
                    }
                    _ => {}
                },
                app_state::View::Document => {
                    app.message = None;
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            if app.file_mode == app_state::FileMode::Multi {
                                app.current_view = app_state::View::FileList;
                            } else {
                                return Ok(());
                            }
                        }
                        KeyCode::Down | KeyCode::Char('j') => app.scroll_by(1),
                        KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-1),
                        KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(),
                        KeyCode::PageUp => app.page_up(),
                        KeyCode::Home | KeyCode::Char('g') => app.scroll_to_top(),
                        KeyCode::End | KeyCode::Char('G') => app.scroll_to_bottom(),
                        KeyCode::Char(']') => app.next_section(),
                        KeyCode::Char('[') => app.prev_section(),
                        KeyCode::Char('t') => app.toggle_tracking(),
                        _ => {}
                    }
                }
            },
            _ => {}
        }
    }
}
