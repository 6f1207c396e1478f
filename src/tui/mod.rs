mod help;
mod state;

use crate::cli::{build_config, Cli};
use crate::model::{Alert, Session, UiEvent};
use crate::notifier::Notifier;
use crate::orchestrator::{self, UiCommand};
use crate::session::SessionController;
use crate::view::{self, Presentation, ProgressReadout};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Terminal,
};
use state::{KeyOutcome, UiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);

    // The alert surface exists before anything that can raise an alert.
    let notifier = Notifier::new();
    let alert_rx = notifier.subscribe();
    let session =
        SessionController::new(&cfg, notifier).context("failed to create session controller")?;
    let session_rx = session.subscribe();

    let (event_tx, event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let ui_state = UiState {
        in_flight_guard: cfg.in_flight_guard,
        base_url: cfg.base_url.clone(),
        ..Default::default()
    };

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || {
        run_threaded(ui_state, session_rx, alert_rx, event_rx, cmd_tx)
    });

    let res = orchestrator::run_controller(&cfg, session, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    mut state: UiState,
    mut session_rx: watch::Receiver<Session>,
    mut alert_rx: watch::Receiver<Alert>,
    mut event_rx: UnboundedReceiver<UiEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&mut state, ev);
        }
        // Only the latest snapshot matters; intermediate ones are skipped.
        if session_rx.has_changed().unwrap_or(false) {
            state.session = session_rx.borrow_and_update().clone();
        }
        if alert_rx.has_changed().unwrap_or(false) {
            state.alert = alert_rx.borrow_and_update().clone();
        }

        if last_tick.elapsed() >= tick_rate {
            state.ticks = state.ticks.wrapping_add(1);
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match state.key_outcome(k.modifiers, k.code) {
                    KeyOutcome::Command(UiCommand::Quit) => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                    KeyOutcome::Command(cmd) => {
                        if cmd_tx.send(cmd).is_err() {
                            break Err(anyhow::anyhow!("controller stopped"));
                        }
                    }
                    KeyOutcome::ToggleHelp => state.show_help = !state.show_help,
                    KeyOutcome::Ignored => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn apply_event(state: &mut UiState, ev: UiEvent) {
    match ev {
        UiEvent::Info(info) => state.info = info.to_message(),
        UiEvent::Loaded => {
            let now = time::OffsetDateTime::now_local()
                .unwrap_or_else(|_| time::OffsetDateTime::now_utc());
            state.last_loaded = now
                .format(time::macros::format_description!("[hour]:[minute]:[second]"))
                .ok();
        }
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(area);

    draw_header(rows[0], f);
    if state.show_help {
        help::draw_help(rows[1], f);
    } else {
        draw_session(rows[1], f, state);
    }
    draw_status(rows[2], f, state);

    if state.alert.visible {
        draw_alert(area, f, &state.alert);
    }
}

fn draw_header(area: Rect, f: &mut ratatui::Frame) {
    let p = Paragraph::new(vec![
        Line::from(Span::styled(
            view::TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(view::SUBTITLE, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(p, area);
}

fn draw_session(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let (message, action, notes, pending, progress) = match view::present(&state.session) {
        Presentation::Loading => {
            let spinner = SPINNER[state.ticks % SPINNER.len()];
            let p = Paragraph::new(format!("{spinner} Loading…"))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(p, area);
            return;
        }
        Presentation::Card {
            message,
            action,
            notes,
            pending,
            progress,
        } => (message, action, notes, pending, progress),
    };

    let card_area = match progress.as_ref() {
        Some(p) => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(3)])
                .split(area);
            draw_progress(split[1], f, p);
            split[0]
        }
        None => area,
    };

    let mut lines = vec![Line::from(message), Line::from("")];
    let button = if pending.is_some() && action.action().is_some() {
        let label = if state.in_flight_guard {
            "(request in flight)"
        } else {
            "(request in flight; pressing again sends another)"
        };
        Line::from(vec![
            Span::styled(
                format!("[{}] {}", action.key(), action.label()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(" "),
            Span::styled(label, Style::default().fg(Color::Yellow)),
        ])
    } else {
        Line::from(vec![
            Span::styled(
                format!("[{}]", action.key()),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw(" "),
            Span::styled(
                action.label(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])
    };
    lines.push(button);
    for note in notes {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            note,
            Style::default().fg(Color::Gray),
        )));
    }

    let email_title = state
        .session
        .state
        .email()
        .map(|e| format!("Account: {e}"))
        .unwrap_or_else(|| "Account".to_string());
    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(email_title));
    f.render_widget(card, card_area);
}

fn draw_progress(area: Rect, f: &mut ratatui::Frame, p: &ProgressReadout) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(p.ratio.clamp(0.0, 1.0))
        .label(format!(
            "{} ({} of {} threads labeled)",
            p.percent, p.num_labeled, p.num_threads
        ));
    f.render_widget(gauge, area);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let lines = vec![
        Line::from(vec![
            Span::styled("Service: ", Style::default().fg(Color::Gray)),
            Span::raw(state.base_url.as_str()),
            Span::raw("   "),
            Span::styled("Last loaded: ", Style::default().fg(Color::Gray)),
            Span::raw(state.last_loaded.as_deref().unwrap_or("-")),
            Span::raw("   "),
            Span::styled("?", Style::default().fg(Color::Magenta)),
            Span::raw(" help  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" quit"),
        ]),
        Line::from(state.info.as_str()),
    ];
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}

fn draw_alert(area: Rect, f: &mut ratatui::Frame, alert: &Alert) {
    let rect = centered_rect(60, 7, area);
    let p = Paragraph::new(vec![
        Line::from(alert.text.as_deref().unwrap_or("")),
        Line::from(""),
        Line::from(vec![
            Span::styled("[enter]", Style::default().fg(Color::Magenta)),
            Span::raw(" OK"),
        ]),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Alert")
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// A box `percent_x` wide and `height` rows tall, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
