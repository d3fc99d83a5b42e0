use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::api::{Trail, WeatherInfo};
use crate::app::{App, PRESET_PREFERENCES};

/// Badge color for a trail difficulty rating. Matching is
/// case-insensitive and substring-based, so "Very Difficult Trail" and
/// "difficult" land on the same color; anything unrecognized stays
/// neutral.
pub fn difficulty_color(difficulty: Option<&str>) -> Color {
    let Some(difficulty) = difficulty else {
        return Color::Gray;
    };

    let lower = difficulty.to_lowercase();
    if lower.contains("easy") {
        Color::Green
    } else if lower.contains("moderate") {
        Color::Yellow
    } else if lower.contains("difficult") || lower.contains("demanding") {
        Color::Red
    } else {
        Color::Gray
    }
}

/// Weather glyph chosen by condition keyword, cloud when unrecognized.
pub fn weather_glyph(condition: &str) -> &'static str {
    let lower = condition.to_lowercase();
    if lower.contains("rain") || lower.contains("shower") {
        "☂"
    } else if lower.contains("sunny") {
        "☀"
    } else {
        "☁"
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    if !app.backend_ready {
        render_splash(app, frame, area);
        return;
    }

    let [header_area, input_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_input(app, frame, input_area);
    render_body(app, frame, body_area);
    render_footer(app, frame, footer_area);
}

fn render_splash(app: &App, frame: &mut Frame, area: Rect) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let dots = ".".repeat(app.animation_frame as usize + 1);
    let lines = vec![
        Line::from(Span::styled(
            "HikeSmart HK",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("Connecting to the trail service{}", dots),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let splash = Paragraph::new(lines).centered();
    frame.render_widget(splash, middle);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" HikeSmart HK ", Style::default().fg(Color::Green).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.is_loading() { Color::DarkGray } else { Color::Cyan };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Describe your ideal hike ");

    let input = Paragraph::new(app.preference.as_str()).block(block);
    frame.render_widget(input, area);

    // Cursor inside the box, clipped to the visible width.
    let max_x = area.width.saturating_sub(2);
    let cursor_x = (app.cursor as u16).min(max_x.saturating_sub(1));
    frame.set_cursor(area.x + 1 + cursor_x, area.y + 1);
}

fn render_body(app: &mut App, frame: &mut Frame, area: Rect) {
    let lines = body_lines(app);

    app.body_height = area.height;
    app.total_body_lines = lines.len() as u16;

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.body_scroll, 0));
    frame.render_widget(body, area);
}

/// All body content as one scrollable column: error banner on top, then
/// loading indicator, weather, trail cards, or the welcome view. The
/// banner never replaces the panels beneath it.
fn body_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    if let Some(error) = &app.error {
        lines.push(Line::from(Span::styled(
            format!(" ⚠ {} ", error),
            Style::default().fg(Color::White).bg(Color::Red),
        )));
        lines.push(Line::default());
    }

    if let Some(message) = app.loading_message() {
        let spinner = ['|', '/', '-'][app.animation_frame as usize % 3];
        lines.push(Line::from(Span::styled(
            format!("{} {}", spinner, message),
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::default());
    }

    if let Some(weather) = &app.weather {
        lines.extend(weather_lines(weather));
    }

    if app.has_results() {
        lines.push(Line::from(Span::styled(
            "Recommended Trails",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());
        for trail in &app.results {
            lines.extend(trail_lines(trail));
            lines.push(Line::default());
        }
    } else if app.show_welcome() {
        lines.extend(welcome_lines());
    }

    lines
}

fn weather_lines(weather: &WeatherInfo) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Weather {}", weather.date),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw(format!("{} {}", weather_glyph(&weather.condition), weather.condition)),
            Span::raw("   "),
            Span::styled(weather.temp.clone(), Style::default().fg(Color::Red)),
        ]),
    ];

    if let Some(humidity) = weather.humidity.as_deref().filter(|h| !h.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("Humidity: {}", humidity),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(alert) = weather.alert.as_deref().filter(|a| !a.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("⚠ {}", alert),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )));
    }

    lines.push(Line::default());
    lines
}

/// One trail card. Freeform items render as a plain paragraph; structured
/// items never mix with a description.
fn trail_lines(trail: &Trail) -> Vec<Line<'static>> {
    match trail {
        Trail::Freeform { description } => {
            vec![Line::raw(description.clone())]
        }
        Trail::Structured {
            name,
            difficulty,
            length,
            station,
            distance,
            website,
        } => {
            let mut title = vec![Span::styled(
                name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(difficulty) = difficulty {
                title.push(Span::raw("  "));
                title.push(Span::styled(
                    format!(" {} ", difficulty),
                    Style::default()
                        .fg(Color::White)
                        .bg(difficulty_color(Some(difficulty))),
                ));
            }

            let mut lines = vec![Line::from(title)];

            if let Some(length) = length {
                lines.push(Line::raw(format!("  • {} km", length)));
            }

            if let Some(station) = station {
                let detail = match distance {
                    Some(distance) => format!("  • {} ({} km walk)", station, distance),
                    None => format!("  • {}", station),
                };
                lines.push(Line::raw(detail));
            }

            if let Some(website) = website {
                lines.push(Line::from(Span::styled(
                    format!("  ↗ Trail Details: {}", website),
                    Style::default().fg(Color::Green),
                )));
            }

            lines
        }
    }
}

fn welcome_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Welcome to HikeSmart HK",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::default(),
        Line::raw("Describe the hike you are looking for and press Enter."),
        Line::raw("Mention scenery, difficulty, length, or a date for the"),
        Line::raw("weather forecast."),
        Line::default(),
        Line::raw("Or start from an example:"),
        Line::default(),
    ];

    for (i, preset) in PRESET_PREFERENCES.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} ", i + 1),
                Style::default().bg(Color::DarkGray).fg(Color::White),
            ),
            Span::raw(format!(" {}", preset)),
        ]));
    }

    lines
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = vec![
        Span::styled(" Enter ", key_style),
        Span::styled(" search ", label_style),
    ];

    if app.show_welcome() && app.preference.is_empty() {
        hints.extend(vec![
            Span::styled(" 1-3 ", key_style),
            Span::styled(" examples ", label_style),
        ]);
    }

    if app.has_results() {
        hints.extend(vec![
            Span::styled(" ↑/↓ ", key_style),
            Span::styled(" scroll ", label_style),
        ]);
    }

    hints.extend(vec![
        Span::styled(" Esc ", key_style),
        Span::styled(" home ", label_style),
        Span::styled(" Ctrl+C ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    let footer = Paragraph::new(Line::from(hints)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}
