use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn keybind(key: &'static str, pad: usize, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(what),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        keybind("r", 11, "Reload"),
        keybind("a", 11, "Authorize / reauthorize (opens a browser)"),
        keybind("e", 11, "Enable Unclog"),
        keybind("d", 11, "Disable Unclog"),
        keybind("enter", 7, "Press the button shown"),
        keybind("?", 11, "Show/hide this help"),
        Line::from(""),
        Line::from("Alerts:"),
        keybind("enter", 7, "OK"),
        keybind("esc", 9, "OK"),
        keybind("o", 11, "OK"),
        Line::from(""),
        Line::from("Only the button on screen responds; other action keys are ignored."),
        Line::from(""),
        Line::from("Repository:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "https://github.com/bobg/unclog",
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
