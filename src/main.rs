use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use fit_terminal::config::{self, AppConfig};
use fit_terminal::controller::FitController;
use fit_terminal::fit_api::HttpFitService;
use fit_terminal::labels::{
    analysis_summary, breakdown_rows, format_minutes, format_score, label_color,
};
use fit_terminal::provider::spawn_provider;
use fit_terminal::state::{AppState, Delta, Focus, Phase, SimulationResult, MIN_QUERY_CHARS};

struct App {
    controller: FitController,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    fn new(controller: FitController, tick_rate: Duration) -> Self {
        Self {
            controller,
            should_quit: false,
            tick_rate,
        }
    }

    fn state(&self) -> &AppState {
        &self.controller.state
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.state().help_overlay {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.controller.state.help_overlay = false;
            }
            return;
        }

        let focus = self.state().focus;
        match key.code {
            KeyCode::Tab => self.controller.state.cycle_focus_next(),
            KeyCode::BackTab => self.controller.state.cycle_focus_prev(),
            KeyCode::F(5) => self.controller.simulate_fit(),
            _ => match focus {
                Focus::Search => self.on_search_key(key),
                Focus::Teams => self.on_teams_key(key),
                Focus::Result => self.on_result_key(key),
            },
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if is_text_input(&key) => self.controller.push_query_char(c),
            KeyCode::Backspace => self.controller.pop_query_char(),
            KeyCode::Down => self.controller.state.select_next_player(),
            KeyCode::Up => self.controller.state.select_prev_player(),
            KeyCode::Enter => self.controller.select_highlighted_player(),
            KeyCode::Esc => self.controller.search_players(String::new()),
            _ => {}
        }
    }

    fn on_teams_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.controller.state.select_next_team(),
            KeyCode::Char('k') | KeyCode::Up => self.controller.state.select_prev_team(),
            KeyCode::Enter => self.controller.select_highlighted_team(),
            _ => self.on_global_key(key),
        }
    }

    fn on_result_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.controller.state.scroll_result_down(),
            KeyCode::Char('k') | KeyCode::Up => self.controller.state.scroll_result_up(),
            _ => self.on_global_key(key),
        }
    }

    fn on_global_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') | KeyCode::Char('R') => self.controller.simulate_fit(),
            KeyCode::Char('?') => self.controller.state.help_overlay = true,
            _ => {}
        }
    }
}

/// Plain or shifted characters only; Ctrl/Alt chords are not typing.
fn is_text_input(key: &KeyEvent) -> bool {
    (key.modifiers - KeyModifiers::SHIFT).is_empty()
}

fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    let cfg = AppConfig::from_env();
    let service = HttpFitService::new(&cfg.api_url)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(service, tx, cmd_rx);

    let mut controller = FitController::new(Some(cmd_tx));
    controller
        .state
        .push_log(format!("[INFO] Backend: {}", cfg.api_url));
    controller.init();

    let mut app = App::new(controller, cfg.tick_rate);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            app.controller.apply(delta);
        }

        terminal.draw(|f| ui(f, app.state()))?;

        let timeout = app
            .tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= app.tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Min(30),
        ])
        .split(chunks[1]);

    render_search(frame, columns[0], state);
    render_teams(frame, columns[1], state);
    render_result(frame, columns[2], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state.focus))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let player = state
        .selected_player
        .as_ref()
        .map(|p| p.full_name.as_str())
        .unwrap_or("-");
    let team = state
        .selected_team
        .as_ref()
        .map(|t| t.full_name.as_str())
        .unwrap_or("-");
    let line1 = format!("  (o)  FIT SIMULATOR | {}", phase_label(state.phase));
    let line2 = format!("       Player: {player} | Team: {team}");
    format!("{line1}\n{line2}")
}

fn footer_text(focus: Focus) -> &'static str {
    match focus {
        Focus::Search => "Type to search | ↑/↓ Move | Enter Select | Esc Clear | Tab Next | F5 Simulate | Ctrl-C Quit",
        Focus::Teams => "j/k/↑/↓ Move | Enter Select | r/F5 Simulate | Tab Next | ? Help | q Quit",
        Focus::Result => "j/k/↑/↓ Scroll | r/F5 Simulate | Tab Next | ? Help | q Quit",
    }
}

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::Search;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let cursor = if focused { "_" } else { "" };
    let input = Paragraph::new(format!("{}{cursor}", state.player_query))
        .block(panel_block("Player search", focused));
    frame.render_widget(input, sections[0]);

    let block = panel_block("Players", focused);
    let inner = block.inner(sections[1]);
    frame.render_widget(block, sections[1]);
    if inner.height == 0 {
        return;
    }

    if state.players.is_empty() {
        let hint = if state.player_query.chars().count() < MIN_QUERY_CHARS {
            format!("Type at least {MIN_QUERY_CHARS} characters")
        } else {
            "No players found".to_string()
        };
        let empty = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let (start, end) = visible_range(
        state.players_selected,
        state.players.len(),
        inner.height as usize,
    );
    let lines: Vec<Line> = state.players[start..end]
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let selected = start + i == state.players_selected;
            let prefix = if selected { "> " } else { "  " };
            let mut style = Style::default();
            if selected {
                style = style.fg(Color::White).bg(Color::DarkGray);
            }
            if !p.is_active {
                style = style.add_modifier(Modifier::DIM);
            }
            let status = if p.is_active { "" } else { " (inactive)" };
            Line::styled(format!("{prefix}{}{status}", p.full_name), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block("Teams", state.focus == Focus::Teams);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    if state.teams.is_empty() {
        let text = if state.teams_loading {
            "Loading teams..."
        } else {
            "No teams loaded"
        };
        let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let chosen = state.selected_team.as_ref().map(|t| t.id);
    let (start, end) = visible_range(state.teams_selected, state.teams.len(), inner.height as usize);
    let lines: Vec<Line> = state.teams[start..end]
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let highlighted = start + i == state.teams_selected;
            let prefix = if highlighted { ">" } else { " " };
            let mark = if chosen == Some(t.id) { "*" } else { " " };
            let style = if highlighted {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::styled(
                format!("{prefix}{mark} {:<4} {}", t.abbreviation, t.full_name),
                style,
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_result(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block("Fit", state.focus == Focus::Result);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    match (state.phase, &state.simulation_result) {
        (Phase::Loading, _) => {
            let text = Paragraph::new("Simulating fit...").style(Style::default().fg(Color::Cyan));
            frame.render_widget(text, inner);
        }
        (Phase::Error, _) => {
            let msg = state.error.clone().unwrap_or_default();
            let text = Paragraph::new(msg)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(text, inner);
        }
        (Phase::Success, Some(result)) => render_result_detail(frame, inner, state, result),
        _ => {
            let text = Paragraph::new("Select a player and a team, then press F5")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(text, inner);
        }
    }
}

fn render_result_detail(frame: &mut Frame, area: Rect, state: &AppState, result: &SimulationResult) {
    let rows = breakdown_rows(result);
    let chart_height = chart_height(rows.len(), area.height);
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(chart_height)])
        .split(area);

    let body = Paragraph::new(result_lines(result))
        .wrap(Wrap { trim: false })
        .scroll((state.result_scroll, 0));
    frame.render_widget(body, sections[0]);

    if chart_height > 0 {
        frame.render_widget(breakdown_chart(&rows), sections[1]);
    }
}

/// Two lines per bar plus the axis, capped at half the panel.
fn chart_height(rows: usize, area_height: u16) -> u16 {
    if rows == 0 {
        return 0;
    }
    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .saturating_mul(2)
        .saturating_add(1)
        .min(area_height / 2)
}

fn result_lines(result: &SimulationResult) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let verdict_style = bold.fg(label_color(&result.fit_label));
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Verdict: ", bold),
            Span::styled(result.fit_label.to_string(), verdict_style),
        ]),
        Line::from(format!("{} -> {}", result.player_name, result.team_name)),
        Line::from(format!("Score: {} / 100", format_score(result.fit_score))),
        Line::from(format!("Minutes: {}", format_minutes(result.estimated_minutes))),
        Line::from(format!("Role: {}", result.projected_role)),
    ];
    if !result.player_archetypes.is_empty() {
        lines.push(Line::from(format!(
            "Archetypes: {}",
            result.player_archetypes.join(", ")
        )));
    }
    if !result.team_needs_addressed.is_empty() {
        lines.push(Line::from(format!(
            "Needs addressed: {}",
            result.team_needs_addressed.join(", ")
        )));
    }

    push_section(&mut lines, "Reasons", &result.reasons, Style::default());
    push_section(
        &mut lines,
        "Warnings",
        &result.warnings,
        Style::default().fg(Color::Yellow),
    );

    if let Some(analysis) = &result.player_analysis {
        lines.push(Line::from(""));
        lines.push(Line::styled("Player analysis", bold));
        lines.push(Line::from(format!("  {}", analysis_summary(analysis))));
        if !analysis.archetypes.is_empty() {
            lines.push(Line::from(format!(
                "  Archetypes: {}",
                analysis.archetypes.join(", ")
            )));
        }
    }

    if let Some(needs) = &result.team_needs {
        lines.push(Line::from(""));
        lines.push(Line::styled(format!("Team needs: {}", needs.team_name), bold));
        if !needs.needs.is_empty() {
            lines.push(Line::from(format!("  {}", needs.needs.join(", "))));
        }
        push_section(
            &mut lines,
            "Style alerts",
            &needs.style_alerts,
            Style::default().fg(Color::Yellow),
        );
    }

    if let Some(friction) = &result.friction_result {
        if !friction.conflicts.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::styled(
                format!("Roster friction: -{} pts", friction.total_penalty),
                bold,
            ));
            for conflict in &friction.conflicts {
                lines.push(Line::styled(
                    format!(
                        "  [{}] {} (-{}) {}",
                        conflict.severity,
                        conflict.conflict_type,
                        conflict.penalty_points,
                        conflict.description
                    ),
                    Style::default().fg(Color::Red),
                ));
            }
            if !friction.suggested_role.is_empty() {
                lines.push(Line::from(format!(
                    "  Suggested role: {}",
                    friction.suggested_role
                )));
            }
            if !friction.blocking_players.is_empty() {
                lines.push(Line::from(format!(
                    "  Blocked by: {}",
                    friction.blocking_players.join(", ")
                )));
            }
        }
    }
    lines
}

fn push_section(lines: &mut Vec<Line<'static>>, title: &str, items: &[String], style: Style) {
    if items.is_empty() {
        return;
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(
        format!("{title}:"),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    for item in items {
        lines.push(Line::styled(format!("  • {item}"), style));
    }
}

fn breakdown_chart(rows: &[(String, f64)]) -> BarChart<'static> {
    let max = rows
        .iter()
        .map(|(_, v)| v.abs().round() as u64)
        .max()
        .unwrap_or(0)
        .max(100);
    let bars: Vec<Bar<'static>> = rows
        .iter()
        .map(|(name, value)| {
            let color = if *value < 0.0 { Color::Red } else { Color::Green };
            Bar::default()
                .value(value.abs().round() as u64)
                .label(Line::from(name.clone()))
                .text_value(format_score(*value))
                .style(Style::default().fg(color))
        })
        .collect();

    BarChart::default()
        .block(Block::default().title("Breakdown").borders(Borders::TOP))
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .group_gap(0)
        .max(max)
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(4);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "IDLE",
        Phase::Loading => "LOADING",
        Phase::Success => "READY",
        Phase::Error => "ERROR",
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Fit Simulator - Help",
        "",
        "Global:",
        "  Tab / Shift-Tab   Cycle panels",
        "  F5                Simulate fit",
        "  Ctrl-C            Quit",
        "",
        "Player search:",
        "  type              Search (2+ characters)",
        "  ↑/↓               Move",
        "  Enter             Select player",
        "  Esc               Clear query",
        "",
        "Teams / Fit:",
        "  j/k or ↑/↓        Move / scroll",
        "  Enter             Select team",
        "  r                 Simulate fit",
        "  ?                 Toggle help",
        "  q                 Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
