mod app;
mod event;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{error, info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use milestone_quiz::bank::QuestionBank;
use milestone_quiz::config::{Config, LOCAL_BANK_FILE};
use milestone_quiz::logging;
use milestone_quiz::session::RestartMode;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::pass_summary::PassSummaryView;
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::QuestionCard;
use ui::components::score_panel::ScorePanel;
use ui::layout::{QuizLayout, pack_hints, popup_area};

const APP_TITLE: &str = "Milestone Quiz";

#[derive(Parser)]
#[command(
    name = "milestone-quiz",
    version,
    about = "Single-best-answer quiz with tag filters and missed-question review"
)]
struct Cli {
    #[arg(short, long, help = "Question bank JSON file")]
    bank: Option<PathBuf>,

    #[arg(short, long, help = "Start with this tag filter (default: all)")]
    tag: Option<String>,

    #[arg(long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Seed for reproducible question order")]
    seed: Option<u64>,

    #[arg(long, help = "Print the bank's tags with question counts and exit")]
    list_tags: bool,

    #[arg(long, help = "Print the bundled theme names and exit")]
    list_themes: bool,

    #[arg(long, help = "Write the default config file and exit")]
    init_config: bool,

    #[arg(long, help = "Log file path")]
    log_file: Option<PathBuf>,
}

/// Where the question bank comes from, in priority order.
#[derive(Debug, PartialEq)]
enum BankSource {
    File(PathBuf),
    Bundled(String),
}

impl BankSource {
    fn resolve(cli: Option<&Path>, config: &Config, local: &Path) -> Self {
        if let Some(path) = cli {
            return BankSource::File(path.to_path_buf());
        }
        if let Some(path) = &config.bank_path {
            return BankSource::File(PathBuf::from(path));
        }
        if local.exists() {
            return BankSource::File(local.to_path_buf());
        }
        BankSource::Bundled(config.bundled_bank.clone())
    }

    fn load(&self) -> Result<QuestionBank> {
        match self {
            BankSource::File(path) => Ok(QuestionBank::load(path)?),
            BankSource::Bundled(name) => Ok(QuestionBank::bundled(name)?),
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::config_path();
        Config::write_default(&path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };

    if cli.list_themes {
        for name in ui::theme::Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let log_path = cli.log_file.clone().unwrap_or_else(Config::default_log_path);
    if let Err(err) = logging::init(&log_path, &config.log_level) {
        eprintln!("warning: logging disabled: {err:#}");
    }
    if let Some(err) = config_error {
        eprintln!("warning: using default settings: {err:#}");
        warn!("using default settings: {err:#}");
    }

    let source = BankSource::resolve(cli.bank.as_deref(), &config, Path::new(LOCAL_BANK_FILE));
    let bank = source
        .load()
        .context("Could not load question bank")?;
    info!("loaded {} questions from {source:?}", bank.len());

    if cli.list_tags {
        println!("{:<14}{:>5}", "all", bank.len());
        for (tag, count) in bank.tag_counts() {
            println!("{tag:<14}{count:>5}");
        }
        return Ok(());
    }

    if let Some(tag) = cli.tag {
        config.default_filter = tag;
    }
    config.normalize_default_filter(&bank.tags());

    let theme_name = cli.theme.unwrap_or_else(|| config.theme.clone());
    let theme = ui::theme::Theme::load(&theme_name).unwrap_or_else(|| {
        warn!("theme '{theme_name}' not found, using default");
        ui::theme::Theme::default()
    });
    info!("theme: {}", theme.name);
    let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));

    let mut app = App::new(Arc::new(bank), config, theme, cli.seed);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("session ended");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    if matches!(key.code, KeyCode::Char(_))
        && key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return;
    }

    match app.screen {
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::TagSelect => handle_tag_key(app, key),
        AppScreen::Help => handle_help_key(app, key),
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('t') => app.open_tag_menu(),
        KeyCode::Char('r') => app.restart(RestartMode::Filter(None)),
        KeyCode::Char('m') => app.restart(RestartMode::ReviewMissed),
        KeyCode::Char('n') | KeyCode::Right => app.next_question(),
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if app.session.is_revealed() {
                app.next_question();
            } else {
                app.choose_at_cursor();
            }
        }
        KeyCode::Char(ch) => {
            if let Some(choice) = choice_for_key(ch) {
                app.choose(choice);
            }
        }
        _ => {}
    }
}

/// `a`-`h` (either case) and `1`-`9` pick a choice.
fn choice_for_key(ch: char) -> Option<usize> {
    match ch {
        '1'..='9' => Some(ch as usize - '1' as usize),
        'a'..='h' => Some(ch as usize - 'a' as usize),
        'A'..='H' => Some(ch as usize - 'A' as usize),
        _ => None,
    }
}

fn handle_tag_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.screen = AppScreen::Quiz,
        KeyCode::Up | KeyCode::Char('k') => app.tag_menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.tag_menu.next(),
        KeyCode::Enter => app.apply_tag_selection(),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
        app.toggle_help();
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    render_quiz(frame, app);

    match app.screen {
        AppScreen::Quiz => {}
        AppScreen::TagSelect => {
            let popup = popup_area(area, 40, 60);
            frame.render_widget(ratatui::widgets::Clear, popup);
            frame.render_widget(&app.tag_menu, popup);
        }
        AppScreen::Help => render_help(frame, app),
    }
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let session = &app.session;

    let mut hints: Vec<&str> = Vec::new();
    if session.is_complete() {
        hints.extend(["[m] Review missed", "[r] Restart all"]);
    } else if session.is_revealed() {
        hints.extend(["[n/Enter] Next question", "[r] Restart", "[m] Review missed"]);
    } else if session.is_empty() {
        hints.push("[r] Restart all");
    } else {
        hints.extend(["[a-h/1-9] Answer", "[j/k Enter] Select", "[r] Restart"]);
    }
    hints.extend(["[t] Bank", "[?] Help", "[q] Quit"]);

    let mut footer_lines: Vec<Line> = Vec::new();
    if let Some((message, _)) = &app.status {
        footer_lines.push(Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(colors.warning()),
        )));
    }
    footer_lines.extend(
        pack_hints(&hints, area.width as usize)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text_muted())))),
    );

    let layout = QuizLayout::new(area, footer_lines.len(), app.last_summary.is_some());

    let subtitle = format!(
        " Single Best Answer \u{2022} Instant feedback \u{2022} {} items",
        session.bank().len()
    );
    let mut header_spans = vec![
        Span::styled(
            format!(" {APP_TITLE} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            subtitle,
            Style::default()
                .fg(colors.text_muted())
                .bg(colors.header_bg()),
        ),
    ];
    if !layout.has_sidebar() {
        header_spans.push(Span::styled(
            format!(" | {} | {}", session.filter(), session.ratio_display()),
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans))
        .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    if let Some(row) = layout.progress {
        let progress = ProgressBar::new(
            &session.position_label(),
            session.index(),
            session.len(),
            session.progress_percent(),
            app.theme,
        );
        frame.render_widget(progress, row);
    }

    let card = QuestionCard::new(
        session,
        app.choice_cursor,
        app.config.show_rationale,
        app.theme,
    );
    frame.render_widget(card, layout.card);

    if let Some(score) = layout.score {
        frame.render_widget(ScorePanel::new(session, app.theme), score);
    }
    if let (Some(summary), Some(region)) = (&app.last_summary, layout.summary) {
        frame.render_widget(PassSummaryView::new(summary, app.theme), region);
    }

    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_help(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let popup = popup_area(area, 50, 60);

    let block = Block::bordered()
        .title(" Help ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(popup);
    frame.render_widget(ratatui::widgets::Clear, popup);
    block.render(popup, frame.buffer_mut());

    let rows = [
        ("a-h, 1-9", "Answer with that choice"),
        ("j/k, arrows", "Move the choice cursor"),
        ("Enter/Space", "Answer at cursor, or next question"),
        ("n", "Next question"),
        ("r", "Restart the current bank, or all when it is empty"),
        ("m", "Review missed questions"),
        ("t", "Choose a bank (tag filter)"),
        ("q, Esc", "Quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(
                    format!(" {keys:<14}"),
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
                ),
                Span::styled(*what, Style::default().fg(colors.fg())),
            ])
        })
        .collect();
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(inner, frame.buffer_mut());
}
