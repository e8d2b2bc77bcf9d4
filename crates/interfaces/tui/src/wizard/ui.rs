//! Wizard rendering and event loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Flex, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Wrap};
use tokio::sync::mpsc;

use anonsetup_api::{Os, RuntimeClient};
use anonsetup_config::AppConfig;

use crate::theme::Theme;

use super::controller::{self, WizardEvent};
use super::session::{SessionState, MODEL_CATALOG, SAMPLE_LETTER};
use super::steps::{self, WizardStep};

pub fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

/// Read crossterm events on a dedicated OS thread so the async select loop
/// never blocks on synchronous `event::read()`.
fn spawn_crossterm_reader() -> mpsc::UnboundedReceiver<CrosstermEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });
    rx
}

enum Flow {
    Continue,
    Quit,
    Finished,
}

/// Run the wizard to completion (or early exit) and hand the final session
/// back to the caller.
pub async fn run_wizard(config: &AppConfig, api: Arc<dyn RuntimeClient>) -> Result<SessionState> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let theme = Theme::from_config(&config.ui.theme);
    let result = wizard_loop(&mut terminal, &theme, api).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn wizard_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    theme: &Theme,
    api: Arc<dyn RuntimeClient>,
) -> Result<SessionState> {
    let mut session = SessionState::new();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut term_rx = spawn_crossterm_reader();
    let mut tick = tokio::time::interval(Duration::from_millis(120));
    tick.tick().await; // the first tick completes immediately

    loop {
        terminal.draw(|frame| draw_wizard(frame, &session, theme))?;

        tokio::select! {
            wizard_event = event_rx.recv() => {
                if let Some(wizard_event) = wizard_event {
                    apply_event(&mut session, wizard_event);
                }
            }
            _ = tick.tick() => {}
            term_event = term_rx.recv() => {
                let Some(CrosstermEvent::Key(key)) = term_event else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(key, &mut session, &api, &event_tx) {
                    Flow::Continue => {}
                    Flow::Quit | Flow::Finished => break,
                }
            }
        }
    }

    Ok(session)
}

/// Fold a finished operation back into the session.  Terminal events clear
/// the busy flag; progress ticks do not.
fn apply_event(session: &mut SessionState, event: WizardEvent) {
    match event {
        WizardEvent::SystemChecked(info) => {
            session.record_system_check(info);
            session.finish_operation();
        }
        WizardEvent::ProbeFinished(running) => {
            session.system_info.ollama_running = running;
            session.connection_error = !running;
            session.finish_operation();
        }
        WizardEvent::PullProgress(percent) => session.record_pull_progress(percent),
        WizardEvent::PullFinished(result) => {
            match result {
                Ok(()) => session.record_pull_success(),
                Err(error) => session.record_failure(error),
            }
            session.finish_operation();
        }
        WizardEvent::AnonymizeFinished(result) => {
            match result {
                Ok(text) => session.record_anonymization(text),
                Err(error) => session.record_anonymization_failure(error),
            }
            session.finish_operation();
        }
    }
}

/// True while the current step accepts free-form typing, which reserves the
/// plain character keys for the text buffer.
fn editing(session: &SessionState) -> bool {
    session.current_step == WizardStep::TestAnonymize
}

fn enter_step(
    session: &mut SessionState,
    step: WizardStep,
    api: &Arc<dyn RuntimeClient>,
    tx: &mpsc::UnboundedSender<WizardEvent>,
) {
    session.current_step = step;
    // entering the check step re-runs it; system info is never re-derived
    // otherwise
    if step == WizardStep::SystemCheck {
        start_system_check(session, api, tx);
    }
}

fn start_system_check(
    session: &mut SessionState,
    api: &Arc<dyn RuntimeClient>,
    tx: &mpsc::UnboundedSender<WizardEvent>,
) {
    if session.begin_operation() {
        session.check_complete = false;
        controller::spawn_system_check(api.clone(), tx.clone());
    }
}

fn start_recheck(
    session: &mut SessionState,
    api: &Arc<dyn RuntimeClient>,
    tx: &mpsc::UnboundedSender<WizardEvent>,
) {
    if session.begin_operation() {
        controller::spawn_probe(api.clone(), tx.clone());
    }
}

fn start_pull(
    session: &mut SessionState,
    api: &Arc<dyn RuntimeClient>,
    tx: &mpsc::UnboundedSender<WizardEvent>,
) {
    if session.download_complete || !session.begin_operation() {
        return;
    }
    session.download_started = true;
    session.download_progress = 0;
    controller::spawn_pull(api.clone(), session.selected_model.clone(), tx.clone());
}

fn start_anonymize(
    session: &mut SessionState,
    api: &Arc<dyn RuntimeClient>,
    tx: &mpsc::UnboundedSender<WizardEvent>,
) {
    if session.sample_text.trim().is_empty() || !session.begin_operation() {
        return;
    }
    session.anonymized_text.clear();
    let model = if session.selected_model.is_empty() {
        session.system_info.recommended_model.clone()
    } else {
        session.selected_model.clone()
    };
    controller::spawn_anonymize(api.clone(), session.sample_text.clone(), model, tx.clone());
}

fn handle_key(
    key: KeyEvent,
    session: &mut SessionState,
    api: &Arc<dyn RuntimeClient>,
    tx: &mpsc::UnboundedSender<WizardEvent>,
) -> Flow {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }
    if key.code == KeyCode::Esc {
        return Flow::Quit;
    }

    // No cancellation: while an operation is in flight, every trigger is
    // disabled and only quitting works.
    if session.is_busy {
        return Flow::Continue;
    }

    // Connection failures unlock a direct jump to the install instructions.
    let jump_requested = (ctrl && key.code == KeyCode::Char('o'))
        || (!editing(session) && key.code == KeyCode::Char('i'));
    if session.connection_error && jump_requested {
        enter_step(session, steps::jump_to_install(), api, tx);
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Left => {
            enter_step(session, steps::retreat(session.current_step), api, tx);
        }
        KeyCode::Char('b') if !editing(session) => {
            enter_step(session, steps::retreat(session.current_step), api, tx);
        }
        KeyCode::Char('q') if !editing(session) => return Flow::Quit,
        KeyCode::Up if session.current_step == WizardStep::ChooseModel => {
            session.select_prev_model();
        }
        KeyCode::Down if session.current_step == WizardStep::ChooseModel => {
            session.select_next_model();
        }
        KeyCode::Enter => return handle_enter(session, api, tx),
        KeyCode::Char('r') if !editing(session) => match session.current_step {
            WizardStep::SystemCheck => start_system_check(session, api, tx),
            WizardStep::InstallOllama => start_recheck(session, api, tx),
            WizardStep::DownloadModel => start_pull(session, api, tx),
            WizardStep::Complete => session.restart(),
            _ => {}
        },
        KeyCode::Char('t') if session.current_step == WizardStep::Complete => {
            enter_step(session, steps::retreat(WizardStep::Complete), api, tx);
        }
        KeyCode::Char('l') if ctrl && editing(session) => {
            session.sample_text = SAMPLE_LETTER.to_string();
        }
        KeyCode::Char('r') if ctrl && editing(session) => {
            session.has_anonymized = false;
            start_anonymize(session, api, tx);
        }
        KeyCode::Char(ch) if editing(session) && !ctrl => {
            session.sample_text.push(ch);
        }
        KeyCode::Backspace if editing(session) => {
            session.sample_text.pop();
        }
        _ => {}
    }

    Flow::Continue
}

/// Enter is the primary action: it triggers the step's operation until the
/// completion predicate holds, then advances.
fn handle_enter(
    session: &mut SessionState,
    api: &Arc<dyn RuntimeClient>,
    tx: &mpsc::UnboundedSender<WizardEvent>,
) -> Flow {
    match session.current_step {
        WizardStep::Complete => return Flow::Finished,
        WizardStep::DownloadModel if !session.download_complete => {
            start_pull(session, api, tx);
            return Flow::Continue;
        }
        WizardStep::TestAnonymize if !session.has_anonymized => {
            start_anonymize(session, api, tx);
            return Flow::Continue;
        }
        _ => {}
    }

    if steps::can_advance(session.current_step, session) {
        enter_step(session, steps::advance(session.current_step), api, tx);
    }
    Flow::Continue
}

// ── Rendering ────────────────────────────────────────────────────────────────

fn draw_wizard(frame: &mut ratatui::Frame, session: &SessionState, theme: &Theme) {
    let area = frame.area();
    let wizard_area = center(area, Constraint::Length(100), Constraint::Length(32));
    let (step_index, step_total) = steps::progress(session.current_step);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.muted))
        .title_top(
            Line::from(Span::styled(
                " Anonymization Setup ",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ))
            .centered(),
        )
        .title_bottom(
            Line::from(Span::styled(
                format!(" Step {step_index}/{step_total} "),
                Style::default().fg(theme.muted),
            ))
            .right_aligned(),
        );
    frame.render_widget(block, wizard_area);

    let inner = wizard_area.inner(Margin {
        vertical: 1,
        horizontal: 2,
    });

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(40)])
        .split(inner);

    draw_sidebar(frame, columns[0], session, theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // overall progress
            Constraint::Length(2), // title
            Constraint::Length(4), // description
            Constraint::Min(8),    // step body
            Constraint::Length(2), // footer
        ])
        .split(columns[1]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent).bg(theme.background))
        .ratio(step_index as f64 / step_total as f64)
        .label(format!("Step {step_index} of {step_total}"));
    frame.render_widget(gauge, chunks[0]);

    let title = Paragraph::new(session.current_step.label())
        .style(
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[1]);

    let description = Paragraph::new(step_description(session))
        .style(Style::default().fg(theme.muted))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(description, chunks[2]);

    match session.current_step {
        WizardStep::Welcome => draw_welcome(frame, chunks[3], theme),
        WizardStep::SystemCheck => draw_system_check(frame, chunks[3], session, theme),
        WizardStep::InstallOllama => draw_install(frame, chunks[3], session, theme),
        WizardStep::ChooseModel => draw_models(frame, chunks[3], session, theme),
        WizardStep::DownloadModel => draw_download(frame, chunks[3], session, theme),
        WizardStep::TestAnonymize => draw_test(frame, chunks[3], session, theme),
        WizardStep::Complete => draw_complete(frame, chunks[3], session, theme),
    }

    draw_footer(frame, chunks[4], session, theme);
}

fn draw_sidebar(frame: &mut ratatui::Frame, area: Rect, session: &SessionState, theme: &Theme) {
    let sidebar = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.muted))
        .title(" Steps ");
    let inner = sidebar.inner(area);
    frame.render_widget(sidebar, area);

    let labels = WizardStep::all()
        .into_iter()
        .map(|candidate| {
            if candidate == session.current_step {
                Line::from(Span::styled(
                    format!("> {}", candidate.label()),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {}", candidate.label()),
                    Style::default().fg(theme.foreground),
                ))
            }
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(labels), inner);
}

fn step_description(session: &SessionState) -> String {
    let info = &session.system_info;
    match session.current_step {
        WizardStep::Welcome => "Set up local, private document anonymization: install Ollama, \
             download a language model, and validate it on a sample letter. \
             Your documents never leave this machine."
            .to_string(),
        WizardStep::SystemCheck => {
            "Checking your system to determine the best configuration for Ollama.".to_string()
        }
        WizardStep::InstallOllama => {
            format!("Let's install Ollama on your {} system.", info.os)
        }
        WizardStep::ChooseModel => format!(
            "Based on your system ({}, {}), we have preselected the model we \
             expect to work best. Pick another if you prefer.",
            info.os, info.arch
        ),
        WizardStep::DownloadModel => format!(
            "The {} model will be downloaded and stored locally on this computer.",
            session.selected_model
        ),
        WizardStep::TestAnonymize => "The model replaces personal information (names, addresses, \
             phone numbers) with generic placeholders, entirely on this machine."
            .to_string(),
        WizardStep::Complete => {
            "You're all set to use Ollama for document anonymization.".to_string()
        }
    }
}

fn draw_welcome(frame: &mut ratatui::Frame, area: Rect, theme: &Theme) {
    let body = Paragraph::new(
        "This wizard walks you through three things:\n\n\
         1. Installing the Ollama runtime (if it isn't already)\n\
         2. Downloading a language model suited to your machine\n\
         3. Anonymizing a sample document to confirm everything works\n\n\
         Press Enter to begin.",
    )
    .style(Style::default().fg(theme.foreground))
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center);
    frame.render_widget(body, area);
}

fn draw_system_check(
    frame: &mut ratatui::Frame,
    area: Rect,
    session: &SessionState,
    theme: &Theme,
) {
    if session.is_busy {
        let body = Paragraph::new("Scanning your system...")
            .style(Style::default().fg(theme.accent))
            .alignment(Alignment::Center);
        frame.render_widget(body, area);
        return;
    }

    let info = &session.system_info;
    let ok = Style::default().fg(theme.ok);
    let warn = Style::default().fg(theme.warn);
    let plain = Style::default().fg(theme.foreground);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("  ✓ ", ok),
            Span::styled("Operating system   ", plain),
            Span::styled(format!("detected: {}", info.os), plain),
        ]),
        Line::from(vec![
            Span::styled("  ✓ ", ok),
            Span::styled("Architecture       ", plain),
            Span::styled(format!("detected: {}", info.arch), plain),
        ]),
        Line::from(if info.ollama_running {
            vec![
                Span::styled("  ✓ ", ok),
                Span::styled("Ollama             ", plain),
                Span::styled("installed and running", ok),
            ]
        } else {
            vec![
                Span::styled("  ! ", warn),
                Span::styled("Ollama             ", plain),
                Span::styled("not installed or not running", warn),
            ]
        }),
        Line::from(""),
    ];

    if session.check_complete {
        if info.ollama_running {
            lines.push(Line::from(Span::styled(
                "Ollama is already installed; we can proceed straight to \
                 downloading a model.",
                ok,
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "We could not reach Ollama. The next step walks you through \
                 installing it.",
                warn,
            )));
        }
    }

    let body = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn install_lines(os: Os, theme: &Theme) -> Vec<Line<'static>> {
    let plain = Style::default().fg(theme.foreground);
    let code = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);

    match os {
        Os::Macos => vec![
            Line::from(Span::styled(
                "Download the installer from the official site:",
                plain,
            )),
            Line::from(Span::styled("  https://ollama.com/download/mac", code)),
            Line::from(""),
            Line::from(Span::styled(
                "Open the .dmg, drag Ollama into Applications, then launch it.",
                plain,
            )),
        ],
        Os::Windows => vec![
            Line::from(Span::styled(
                "Download the installer from the official site:",
                plain,
            )),
            Line::from(Span::styled("  https://ollama.com/download/windows", code)),
            Line::from(""),
            Line::from(Span::styled(
                "Run the installer, follow the wizard, then launch Ollama.",
                plain,
            )),
        ],
        Os::Linux => vec![
            Line::from(Span::styled("Install with the official script:", plain)),
            Line::from(Span::styled(
                "  curl -fsSL https://ollama.com/install.sh | sh",
                code,
            )),
            Line::from(""),
            Line::from(Span::styled("Then start the service:", plain)),
            Line::from(Span::styled("  ollama serve", code)),
        ],
        Os::Unknown => vec![
            Line::from(Span::styled(
                "Download the build for your system from the official site:",
                plain,
            )),
            Line::from(Span::styled("  https://ollama.com/download", code)),
        ],
    }
}

fn draw_install(frame: &mut ratatui::Frame, area: Rect, session: &SessionState, theme: &Theme) {
    let mut lines = install_lines(session.system_info.os, theme);
    lines.push(Line::from(""));
    if session.is_busy {
        lines.push(Line::from(Span::styled(
            "Checking for Ollama...",
            Style::default().fg(theme.accent),
        )));
    } else if session.system_info.ollama_running {
        lines.push(Line::from(Span::styled(
            "Ollama detected; you can continue.",
            Style::default().fg(theme.ok),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Once Ollama is running, press r to check again.",
            Style::default().fg(theme.warn),
        )));
    }

    let body = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn draw_models(frame: &mut ratatui::Frame, area: Rect, session: &SessionState, theme: &Theme) {
    let selected = session.selected_model_index();
    let mut lines = Vec::new();

    for (index, option) in MODEL_CATALOG.iter().enumerate() {
        let is_selected = index == selected;
        let marker = if is_selected { "> " } else { "  " };
        let style = if is_selected {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.foreground)
        };

        let mut spans = vec![
            Span::styled(format!("{marker}{}", option.name), style),
            Span::styled(
                format!("  ({})", option.size),
                Style::default().fg(theme.muted),
            ),
        ];
        if option.id == session.system_info.recommended_model {
            spans.push(Span::styled(
                "  recommended",
                Style::default().fg(theme.ok).add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(Span::styled(
            format!("    {}", option.blurb),
            Style::default().fg(theme.muted),
        )));
        lines.push(Line::from(""));
    }

    let body = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn draw_download(frame: &mut ratatui::Frame, area: Rect, session: &SessionState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(2),
        ])
        .split(area);

    let color = if session.download_complete {
        theme.ok
    } else {
        theme.accent
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(theme.background))
        .percent(u16::from(session.download_progress))
        .label(format!("{}%", session.download_progress));
    frame.render_widget(gauge, chunks[1]);

    let status = if session.download_complete {
        Span::styled(
            "Download complete; the model is ready for anonymization.",
            Style::default().fg(theme.ok),
        )
    } else if session.is_busy {
        Span::styled(
            format!("Downloading... {}%", session.download_progress),
            Style::default().fg(theme.accent),
        )
    } else if session.download_started {
        Span::styled(
            "Download failed. Press r to try again.",
            Style::default().fg(theme.error),
        )
    } else {
        Span::styled(
            "Press Enter to start the download. This may take several minutes \
             depending on your connection; make sure Ollama is running first.",
            Style::default().fg(theme.foreground),
        )
    };
    let body = Paragraph::new(Line::from(status))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(body, chunks[2]);
}

fn draw_test(frame: &mut ratatui::Frame, area: Rect, session: &SessionState, theme: &Theme) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let sample_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
        .title(" Sample text ");
    let sample = Paragraph::new(format!("{}▏", session.sample_text))
        .block(sample_block)
        .style(Style::default().fg(theme.foreground))
        .wrap(Wrap { trim: false });
    frame.render_widget(sample, panes[0]);

    let result_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.muted))
        .title(" Anonymized result ");
    let result_text = if session.is_busy {
        "Anonymizing...".to_string()
    } else {
        session.anonymized_text.clone()
    };
    let result = Paragraph::new(result_text)
        .block(result_block)
        .style(Style::default().fg(theme.foreground))
        .wrap(Wrap { trim: false });
    frame.render_widget(result, panes[1]);
}

fn draw_complete(frame: &mut ratatui::Frame, area: Rect, session: &SessionState, theme: &Theme) {
    let plain = Style::default().fg(theme.foreground);
    let ok = Style::default().fg(theme.ok);

    let lines = vec![
        Line::from(Span::styled("Setup summary", plain.add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Model: ", plain),
            Span::styled(session.selected_model.clone(), ok),
        ]),
        Line::from(vec![
            Span::styled("  System: ", plain),
            Span::styled(
                format!("{} / {}", session.system_info.os, session.system_info.arch),
                ok,
            ),
        ]),
        Line::from(vec![
            Span::styled("  Anonymization validated: ", plain),
            if session.has_anonymized {
                Span::styled("yes", ok)
            } else {
                Span::styled("not in this session", Style::default().fg(theme.warn))
            },
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Everything runs locally; sensitive documents never leave this \
             machine. Press Enter to finish.",
            Style::default().fg(theme.muted),
        )),
    ];

    let body = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn draw_footer(frame: &mut ratatui::Frame, area: Rect, session: &SessionState, theme: &Theme) {
    let line = if session.is_busy {
        Line::from(Span::styled(
            "Working; triggers are disabled until the operation settles...",
            Style::default().fg(theme.accent),
        ))
    } else if let Some(message) = session.last_error.as_deref() {
        let jump_hint = if session.connection_error {
            if editing(session) {
                "  (Ctrl+O: installation instructions)"
            } else {
                "  (i: installation instructions)"
            }
        } else {
            ""
        };
        Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(message.to_string(), Style::default().fg(theme.error)),
            Span::styled(jump_hint, Style::default().fg(theme.warn)),
        ])
    } else {
        let hints = match session.current_step {
            WizardStep::Welcome => "Enter=begin • Esc=quit",
            WizardStep::SystemCheck => "Enter=next • r=re-run check • ←/b=back • Esc=quit",
            WizardStep::InstallOllama => "Enter=next • r=check again • ←/b=back • Esc=quit",
            WizardStep::ChooseModel => "↑/↓=select • Enter=next • ←/b=back • Esc=quit",
            WizardStep::DownloadModel => "Enter=start/next • r=retry • ←/b=back • Esc=quit",
            WizardStep::TestAnonymize => {
                "type to edit • Ctrl+L=load sample • Enter=anonymize/next • Ctrl+R=re-run • ←=back"
            }
            WizardStep::Complete => "Enter=finish • t=test again • r=restart",
        };
        Line::from(Span::styled(hints, Style::default().fg(theme.muted)))
    };

    let footer = Paragraph::new(line)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, area);
}
