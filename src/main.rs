mod event;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use event::{AppEvent, EventHandler};
use nnwalk::app::{App, AppScreen};
use nnwalk::config::Config;
use nnwalk::ui::components::help::HelpOverlay;
use nnwalk::ui::components::network_diagram::NetworkDiagram;
use nnwalk::ui::components::progress_bar::ProgressBar;
use nnwalk::ui::components::stepper_pane::StepperPane;
use nnwalk::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use nnwalk::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "nnwalk",
    version,
    about = "Step through one forward and backward pass of a small neural network"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Read configuration from this file")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Start at this step (1-based)")]
    step: Option<usize>,

    #[arg(long, help = "Print every step to stdout and exit")]
    transcript: bool,

    #[arg(long, help = "Print the current diagram scene as JSON and exit")]
    export_scene: bool,

    #[arg(long, default_value_t = 80.0, help = "Canvas width for --export-scene")]
    width: f64,

    #[arg(long, default_value_t = 24.0, help = "Canvas height for --export-scene")]
    height: f64,

    #[arg(long, help = "Write the effective configuration to the config directory and exit")]
    init_config: bool,

    #[arg(long, help = "Append logs to this file (or set NNWALK_LOG)")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            warn!(%err, "ignoring unreadable config file");
            Config::default()
        }),
    };
    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }

    if cli.init_config {
        let path = config.save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            theme = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let mut app = App::new(config, theme)?;
    if let Some(step) = cli.step {
        app.jump_to(step.saturating_sub(1))?;
    }

    if cli.transcript {
        print!("{}", app.transcript()?);
        return Ok(());
    }
    if cli.export_scene {
        let scene = app.scene_for(cli.width, cli.height);
        println!("{}", serde_json::to_string_pretty(&scene)?);
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new();

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Logs go to a file only; the terminal belongs to the UI.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let path = match path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("NNWALK_LOG").map(PathBuf::from))
    {
        Some(path) => path,
        None => return Ok(()),
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    info!(path = %path.display(), "logging started");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let size = terminal.size()?;
    app.on_resize(size.width, size.height);

    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key)?,
            AppEvent::Resize(width, height) => app.on_resize(width, height),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    match app.screen {
        AppScreen::Walkthrough => handle_walkthrough_key(app, key),
        AppScreen::Help => {
            match key.code {
                KeyCode::Char('q') => app.should_quit = true,
                _ => app.toggle_help(),
            }
            Ok(())
        }
    }
}

fn handle_walkthrough_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Right
        | KeyCode::Enter
        | KeyCode::Char('l')
        | KeyCode::Char('n')
        | KeyCode::Char(' ') => app.advance()?,
        KeyCode::Left | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Char('p') => {
            app.retreat()?
        }
        KeyCode::Home | KeyCode::Char('r') => app.restart()?,
        KeyCode::End => app.jump_to_end()?,
        KeyCode::Char('?') => app.toggle_help(),
        _ => {}
    }
    Ok(())
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    let session = &app.session;
    let step = session.current_step();
    let nav = session.navigator();

    render_header(frame, app, layout.header);

    frame.render_widget(
        StepperPane::new(step, nav, app.formula(), session.output(), app.theme),
        layout.stepper,
    );

    if let Some(scene) = app.scene() {
        frame.render_widget(NetworkDiagram::new(&scene, app.theme), layout.diagram);
    }

    frame.render_widget(
        ProgressBar::for_steps(nav, step.op.phase(), app.theme),
        layout.progress,
    );

    let hints = [
        "[→/n] Next",
        "[←/p] Prev",
        "[Home] Restart",
        "[End] Last",
        "[?] Help",
        "[q] Quit",
    ];
    let footer_text = pack_hint_lines(&hints, layout.footer.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.text_muted()),
    )));
    frame.render_widget(footer, layout.footer);

    if app.screen == AppScreen::Help {
        let popup = centered_rect(60, 60, area);
        frame.render_widget(HelpOverlay::new(app.theme), popup);
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let step = app.session.current_step();
    let header_info = format!(
        " {} | Step {} of {} ",
        step.op.phase().label(),
        app.session.current_index() + 1,
        app.session.total_steps(),
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " nnwalk ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.text_muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}
