use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, List, ListItem, Paragraph};
use ratatui::Frame;
use stopwatch_core::{elapsed_ms, format_clock, format_duration, Clock, Lap};

use crate::app::StopwatchApp;

const BACKGROUND: Color = Color::Rgb(15, 16, 58);
const PANEL: Color = Color::Rgb(58, 10, 80);
const ACCENT: Color = Color::Rgb(200, 200, 255);

const HELP_TEXT: &str = "STOPWATCH HELP\n\n\
     Enter/Space  Start/Pause\n\
     F2           Start/Pause\n\
     l            Record lap\n\
     r, F3        Reset\n\
     c            Copy time\n\
     Up/Down      Scroll laps\n\
     ?, F1        This help\n\
     q, Esc, F4   Quit\n\n\
     Any key to close";

pub fn draw<C: Clock>(frame: &mut Frame, app: &StopwatchApp<C>) {
    draw_stopwatch(frame, app);
    if app.help_visible {
        draw_help(frame);
    } else if app.confirm_exit {
        draw_confirm_exit(frame);
    }
}

fn status_label<C: Clock>(app: &StopwatchApp<C>) -> &'static str {
    if app.stopwatch.is_running() {
        "RUNNING"
    } else if elapsed_ms(app.stopwatch.elapsed()) == 0 {
        "READY"
    } else {
        "PAUSED"
    }
}

/// Laps to show, most recent first, skipping `scroll_offset` newer ones.
pub fn visible_laps(laps: &[Lap], scroll_offset: usize, max_visible: usize) -> Vec<&Lap> {
    let start = laps.len().saturating_sub(scroll_offset);
    laps[..start].iter().rev().take(max_visible).collect()
}

fn draw_stopwatch<C: Clock>(frame: &mut Frame, app: &StopwatchApp<C>) {
    let area = frame.area();
    frame.render_widget(Block::new().style(Style::new().bg(BACKGROUND)), area);

    let card = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(ACCENT))
        .title(Line::from(" STOPWATCH ").bold().centered())
        .style(Style::new().bg(PANEL).fg(Color::White));
    let card_area = area.inner(Margin::new(2, 1));
    let inner = card.inner(card_area);
    frame.render_widget(card, card_area);

    let [time_area, status_area, buttons_area, laps_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    // Time display
    let time = format_clock(elapsed_ms(app.stopwatch.elapsed()));
    let time_line = Paragraph::new(vec![Line::default(), Line::from(time)])
        .alignment(Alignment::Center)
        .add_modifier(Modifier::BOLD);
    frame.render_widget(time_line, time_area);

    let mut status_spans = vec![Span::raw(status_label(app))];
    if let Some(copy) = app.copy_status() {
        status_spans.push(Span::raw("  "));
        status_spans.push(Span::styled(copy.label(), Style::new().fg(Color::White).bold()));
    }
    let status = Paragraph::new(Line::from(status_spans))
        .alignment(Alignment::Center)
        .fg(ACCENT);
    frame.render_widget(status, status_area);

    let start_pause = if app.stopwatch.is_running() { "Pause" } else { "Start" };
    let buttons = Line::from(vec![
        button("Enter", start_pause),
        Span::raw("  "),
        button("l", "Lap"),
        Span::raw("  "),
        button("r", "Reset"),
        Span::raw("  "),
        button("c", "Copy"),
    ])
    .centered();
    frame.render_widget(Paragraph::new(buttons), buttons_area);

    draw_laps(frame, app, laps_area);

    let footer = Paragraph::new("?=help  q=quit  Up/Down=scroll laps")
        .alignment(Alignment::Center)
        .add_modifier(Modifier::DIM);
    frame.render_widget(footer, footer_area);
}

fn button(key: &str, label: &str) -> Span<'static> {
    Span::styled(
        format!("[{}] {}", key, label),
        Style::new().fg(Color::Black).bg(Color::Rgb(230, 230, 240)),
    )
}

fn draw_laps<C: Clock>(frame: &mut Frame, app: &StopwatchApp<C>, area: Rect) {
    let laps = app.stopwatch.laps();
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(format!(" Laps ({}) ", laps.len()));
    let max_visible = block.inner(area).height as usize;

    let items: Vec<ListItem> = visible_laps(laps, app.lap_scroll_offset, max_visible)
        .into_iter()
        .map(|lap| {
            ListItem::new(Line::from(vec![
                Span::raw(lap.to_string()),
                Span::styled(
                    format!("  +{}", format_duration(lap.split)),
                    Style::new().add_modifier(Modifier::DIM),
                ),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(34, 14, frame.area());
    frame.render_widget(Clear, area);
    let help = Paragraph::new(HELP_TEXT).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .style(Style::new().bg(BACKGROUND).fg(Color::White)),
    );
    frame.render_widget(help, area);
}

fn draw_confirm_exit(frame: &mut Frame) {
    let area = centered_rect(34, 5, frame.area());
    frame.render_widget(Clear, area);
    let confirm = Paragraph::new(vec![
        Line::from("Stopwatch is running."),
        Line::from("Quit anyway? (y/n)").bold(),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .style(Style::new().bg(BACKGROUND).fg(Color::White)),
    );
    frame.render_widget(confirm, area);
}
