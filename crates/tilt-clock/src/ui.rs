//! Text drawn over the scene: readouts, the permission prompt, help.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Clear, Paragraph},
};
use tilt_clock_core::DigitalReadout;

const OVERLAY_BG: Color = Color::Rgb(0, 0, 0);
const PROMPT_WIDTH: u16 = 26;
const PROMPT_HEIGHT: u16 = 4;

/// Split the window into the scene area and the help line.
pub fn split(area: Rect) -> (Rect, Rect) {
    let [scene, help] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
    (scene, help)
}

/// Date at the bottom left of `area`, time at the bottom right.
pub fn render_readout(frame: &mut Frame, area: Rect, readout: &DigitalReadout, color: Color) {
    let date = format!(" {} ", readout.date);
    let time = format!(" {} ", readout.time);
    let [_, row] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
    let [date_area, _, time_area] = Layout::horizontal([
        Constraint::Length(date.len() as u16),
        Constraint::Fill(1),
        Constraint::Length(time.len() as u16),
    ])
    .horizontal_margin(1)
    .areas(row);

    let style = Style::new().fg(color).bg(OVERLAY_BG);
    frame.render_widget(Line::styled(date, style), date_area);
    frame.render_widget(Line::styled(time, style), time_area);
}

/// The "Enable Tilt" button in the middle of `area`.
pub fn render_tilt_prompt(frame: &mut Frame, area: Rect, color: Color) {
    let prompt = centered(area, PROMPT_WIDTH, PROMPT_HEIGHT);
    let text = vec![
        Line::from("Enable Tilt".bold().fg(color)),
        Line::from(vec![
            "Enter".bold().fg(color),
            " allow  ".dark_gray(),
            "n".bold().fg(color),
            " skip".dark_gray(),
        ]),
    ];
    let button = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::new().bg(OVERLAY_BG))
        .block(Block::bordered().border_style(Style::new().fg(color)));
    frame.render_widget(Clear, prompt);
    frame.render_widget(button, prompt);
}

/// Key bindings, centered on one line.
pub fn render_help(frame: &mut Frame, area: Rect, color: Color) {
    let help = Line::from(vec![
        "q".bold().fg(color),
        " quit  ".dark_gray(),
        "t".bold().fg(color),
        " 12/24h  ".dark_gray(),
        "c".bold().fg(color),
        " color  ".dark_gray(),
        "d".bold().fg(color),
        " readout  ".dark_gray(),
        "←↑↓→".bold().fg(color),
        " tilt  ".dark_gray(),
        "0".bold().fg(color),
        " level".dark_gray(),
    ])
    .centered();
    frame.render_widget(help, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
