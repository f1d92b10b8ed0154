use std::collections::BTreeSet;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use hauntype::session::{Session, Target};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self.controller.session(), area, buf),
            AppState::Results => render_results(self.controller.session(), area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

/// Per-char spans for the current comparison unit: typed chars styled by
/// correctness, the cursor char underlined, the untyped tail dimmed.
fn unit_spans(unit: &str, input: &str, errors: &BTreeSet<usize>) -> Vec<Span<'static>> {
    let green_bold = bold().fg(Color::Green);
    let red_bold = bold().fg(Color::Red);
    let cursor_style = dim_bold().add_modifier(Modifier::UNDERLINED);

    let unit_chars: Vec<char> = unit.chars().collect();
    let mut spans = Vec::new();

    for (idx, typed) in input.chars().enumerate() {
        if errors.contains(&idx) {
            let shown = match typed {
                ' ' => "·".to_owned(),
                c => c.to_string(),
            };
            spans.push(Span::styled(shown, red_bold));
        } else {
            // correct chars render as the target char
            spans.push(Span::styled(unit_chars[idx].to_string(), green_bold));
        }
    }

    let typed_len = input.chars().count();
    if let Some(&cursor_char) = unit_chars.get(typed_len) {
        spans.push(Span::styled(cursor_char.to_string(), cursor_style));
        let rest: String = unit_chars[typed_len + 1..].iter().collect();
        if !rest.is_empty() {
            spans.push(Span::styled(rest, dim_bold()));
        }
    }

    spans
}

/// The full prompt line: committed words plain, the current unit styled
/// per char, upcoming words dimmed.
fn prompt_spans(session: &Session) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    match &session.target {
        Target::Words(words) => {
            let done = words[..session.cursor_word_index.min(words.len())]
                .iter()
                .join(" ");
            if !done.is_empty() {
                spans.push(Span::styled(format!("{done} "), Style::default()));
            }

            spans.extend(unit_spans(
                session.current_unit(),
                &session.current_input,
                &session.error_positions,
            ));

            if session.cursor_word_index + 1 < words.len() {
                let upcoming = words[session.cursor_word_index + 1..].iter().join(" ");
                spans.push(Span::styled(format!(" {upcoming}"), dim_bold()));
            }
        }
        Target::Passage(_) => {
            spans.extend(unit_spans(
                session.current_unit(),
                &session.current_input,
                &session.error_positions,
            ));
        }
    }

    spans
}

fn render_typing(session: &Session, area: Rect, buf: &mut Buffer) {
    let spans = prompt_spans(session);
    let prompt_width: usize = spans.iter().map(|s| s.content.width()).sum();

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut prompt_occupied_lines =
        ((prompt_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;
    if prompt_width <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(
                    ((area.height as f64 - prompt_occupied_lines as f64) / 2.0) as u16,
                ),
                Constraint::Length(2),
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(
                    ((area.height as f64 - prompt_occupied_lines as f64) / 2.0) as u16,
                ),
            ]
            .as_ref(),
        )
        .split(area);

    let header = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {}s",
            session.wpm(),
            session.accuracy(),
            session.time_remaining
        ),
        dim_bold(),
    ))
    .alignment(Alignment::Center);
    header.render(chunks[1], buf);

    let prompt = Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    prompt.render(chunks[2], buf);

    if !session.has_started() {
        let hint = Paragraph::new(Span::styled(
            "start typing to begin the countdown",
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        ))
        .alignment(Alignment::Center);
        hint.render(chunks[3], buf);
    }
}

/// X (seconds) and Y (wpm) bounds for the results chart.
fn chart_bounds(wpm_history: &[u64]) -> (f64, f64) {
    let duration = wpm_history.len().max(1) as f64;
    let peak = wpm_history.iter().copied().max().unwrap_or(0).max(1) as f64;
    (duration, peak)
}

fn render_results(session: &Session, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),    // chart
                Constraint::Length(1), // stats
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    let points: Vec<(f64, f64)> = session
        .wpm_history
        .iter()
        .enumerate()
        .map(|(i, &wpm)| ((i + 1) as f64, wpm as f64))
        .collect();
    let (duration, peak) = chart_bounds(&session.wpm_history);

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, duration])
                .labels(vec![
                    Span::styled("1", bold()),
                    Span::styled(format!("{duration}"), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, peak])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(format!("{peak}"), bold()),
                ]),
        );
    chart.render(chunks[0], buf);

    let stats = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   peak {} wpm   [{}]",
            session.wpm(),
            session.accuracy(),
            session.peak_wpm(),
            session.mode()
        ),
        bold(),
    ))
    .alignment(Alignment::Center);
    stats.render(chunks[1], buf);

    let legend = Paragraph::new(Span::styled(
        "(tab) new test   (esc) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    legend.render(chunks[3], buf);
}
