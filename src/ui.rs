//! Terminal user interface with ratatui.

use crate::app::{App, Focus, UiColors};
use chrono::Utc;
use num_format::{Locale, ToFormattedString};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, List, ListItem, ListState,
        Paragraph, Row, Table, TableState, Wrap,
    },
};

/// Render the main UI.
pub fn render(frame: &mut Frame, app: &App) {
    let colors = app.colors;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Body
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0], &colors);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[1]);

    render_sidebar(frame, app, columns[0], &colors);
    render_main(frame, app, columns[1], &colors);

    render_footer(frame, app, chunks[2], &colors);

    if app.show_help {
        render_help_overlay(frame, &colors);
    }

    if let Some(ref error) = app.error {
        render_error(frame, error, &colors);
    }
}

/// Render the header with the selected stock, clock and tick status.
fn render_header(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let selection = app.dashboard.selection();
    let now = Utc::now();

    let header_text = vec![
        Line::from(vec![
            Span::styled(
                "STONKDASH ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "- {} stocks, {} watched  ",
                app.dashboard.catalog().len(),
                app.dashboard.watchlist().len()
            )),
            Span::styled(App::clock_label(now), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::raw(format!("{}  {}  ", selection.symbol, format_price(selection.current_price))),
            Span::styled(
                format!("{:+.2}  ", selection.change),
                Style::default().fg(colors.for_change(selection.change)),
            ),
            Span::raw(format!(
                "Last tick: {} (every {})",
                app.last_tick_label(now),
                app.tick_period_label()
            )),
        ]),
    ];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors.border)),
    );

    frame.render_widget(header, area);
}

/// Render search box, search results and watchlist.
fn render_sidebar(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let results = app.dashboard.search_results();
    let results_height = if app.dashboard.query().is_empty() {
        0
    } else {
        (results.len().max(1) as u16 + 2).min(area.height / 2)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(results_height),
            Constraint::Min(3),
        ])
        .split(area);

    render_search_box(frame, app, chunks[0], colors);
    if results_height > 0 {
        render_search_results(frame, app, chunks[1], colors);
    }
    render_watchlist(frame, app, chunks[2], colors);
}

fn focus_border(app: &App, focus: Focus, colors: &UiColors) -> Style {
    if app.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(colors.border)
    }
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let query = app.dashboard.query();
    let text = if query.is_empty() && app.focus != Focus::Search {
        Line::from(Span::styled(
            "press / to search",
            Style::default().fg(Color::DarkGray),
        ))
    } else if app.focus == Focus::Search {
        Line::from(format!("{}_", query))
    } else {
        Line::from(query.to_string())
    };

    let search = Paragraph::new(text).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(focus_border(app, Focus::Search, colors)),
    );

    frame.render_widget(search, area);
}

fn render_search_results(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let results = app.dashboard.search_results();

    let items: Vec<ListItem> = if results.is_empty() {
        vec![ListItem::new(Span::styled(
            "no matches",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        results
            .iter()
            .map(|stock| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<6} ", stock.symbol),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(truncate_string(&stock.name, 18)),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Results ({}) ", results.len()))
                .borders(Borders::ALL)
                .border_style(focus_border(app, Focus::Search, colors)),
        )
        .highlight_style(Style::default().bg(colors.selected_bg));

    let mut state = ListState::default();
    if app.focus == Focus::Search && !results.is_empty() {
        state.select(Some(app.result_cursor));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_watchlist(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let rows = app.dashboard.watchlist().iter().map(|stock| {
        let marker = if app.dashboard.is_selected(&stock.symbol) {
            "▶"
        } else {
            " "
        };
        Row::new(vec![
            Cell::from(format!("{} {}", marker, stock.symbol)),
            Cell::from(format_price(stock.current_price)),
            Cell::from(format!("{:+.2}", stock.change))
                .style(Style::default().fg(colors.for_change(stock.change))),
        ])
    });

    let widths = [
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["SYMBOL", "PRICE", "CHANGE"])
                .style(Style::default().bg(colors.header_bg)),
        )
        .block(
            Block::default()
                .title(" Watchlist ")
                .borders(Borders::ALL)
                .border_style(focus_border(app, Focus::Watchlist, colors)),
        )
        .row_highlight_style(Style::default().bg(colors.selected_bg));

    let mut state = TableState::default();
    if app.focus == Focus::Watchlist {
        state.select(Some(app.watch_cursor));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

/// Render market overview, stock card, predictions and chart.
fn render_main(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let mut constraints = Vec::new();
    if app.show_market_overview {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(9));
    if app.show_chart {
        constraints.push(Constraint::Min(6));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut next = 0;
    if app.show_market_overview {
        render_market_overview(frame, app, chunks[next], colors);
        next += 1;
    }

    let cards = if app.show_predictions {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[next])
    } else {
        Layout::default()
            .constraints([Constraint::Percentage(100)])
            .split(chunks[next])
    };
    render_stock_card(frame, app, cards[0], colors);
    if app.show_predictions {
        render_prediction(frame, app, cards[1], colors);
    }
    next += 1;

    if app.show_chart {
        render_chart(frame, app, chunks[next], colors);
    }
}

fn render_market_overview(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let mut spans = Vec::new();
    for index in &app.markets {
        spans.push(Span::styled(
            format!("{} ", index.name),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!("{:.2} ", index.value)));
        spans.push(Span::styled(
            format!("{:+.2}%   ", index.change_percent),
            Style::default().fg(colors.for_change(index.change_percent)),
        ));
    }

    let overview = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Market Overview ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border)),
    );

    frame.render_widget(overview, area);
}

fn render_stock_card(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let stock = app.dashboard.selection();
    let watch_hint = if app.dashboard.in_watchlist(&stock.symbol) {
        "★ on watchlist"
    } else {
        "a: add to watchlist"
    };
    let change_style = Style::default().fg(colors.for_change(stock.change));

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", stock.symbol),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(stock.name.clone()),
        ]),
        Line::from(Span::styled(
            stock.sector.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{}  ", format_price(stock.current_price)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{:+.2} ({:+.2}%)", stock.change, stock.change_percent),
                change_style,
            ),
        ]),
        Line::from(format!(
            "Day range: {} - {}",
            format_price(stock.day_low),
            format_price(stock.day_high)
        )),
        Line::from(format!(
            "Volume: {}   Mkt cap: {}",
            format_volume(stock.volume),
            format_market_cap(stock.market_cap)
        )),
        Line::from(Span::styled(watch_hint, Style::default().fg(Color::DarkGray))),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .title(" Stock ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border)),
    );

    frame.render_widget(card, area);
}

fn render_prediction(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let prediction = app.dashboard.prediction();

    let lines = vec![
        Line::from(vec![
            Span::raw("24h Prediction  "),
            Span::styled(
                format!("${}", prediction.day_display()),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("7d Prediction   "),
            Span::styled(
                format!("${}", prediction.week_display()),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Confidence      "),
            Span::styled(
                prediction.confidence_display(),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![
            Span::raw("Risk Level      "),
            Span::styled(
                prediction.risk.to_string(),
                Style::default().fg(Color::LightRed),
            ),
        ]),
    ];

    let summary = Paragraph::new(lines).block(
        Block::default()
            .title(" Prediction Summary ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border)),
    );

    frame.render_widget(summary, area);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let points: Vec<(f64, f64)> = app
        .dashboard
        .history()
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.price))
        .collect();

    let (low, high) = price_bounds(&points);
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;
    let first = points.first().map(|p| p.1).unwrap_or_default();
    let last = points.last().map(|p| p.1).unwrap_or_default();

    let dataset = Dataset::default()
        .name(app.dashboard.selection().symbol.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(colors.for_change(last - first)))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(format!(" Price ({} ticks) ", points.len().saturating_sub(1)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border)),
        )
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .bounds([low, high])
                .labels(vec![format!("{:.2}", low), format!("{:.2}", high)]),
        );

    frame.render_widget(chart, area);
}

/// Y bounds for the chart with a little padding so a flat line stays visible.
fn price_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let low = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let high = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if !low.is_finite() || !high.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((high - low) * 0.1).max(1.0);
    (low - pad, high + pad)
}

/// Render the footer with keybindings.
fn render_footer(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let mode = match app.focus {
        Focus::Watchlist => "Watchlist",
        Focus::Search => "Search",
    };

    let footer = Line::from(vec![
        Span::styled(" q", Style::default().fg(Color::Yellow)),
        Span::raw(":quit "),
        Span::styled("h", Style::default().fg(Color::Yellow)),
        Span::raw(":help "),
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(":search "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(":focus "),
        Span::styled("a", Style::default().fg(Color::Yellow)),
        Span::raw(":add "),
        Span::raw(format!(
            "| {} | Tick every {} | Ticks: {}",
            mode,
            app.tick_period_label(),
            app.iteration
        )),
    ]);

    let footer_widget = Paragraph::new(footer).style(Style::default().bg(colors.header_bg));

    frame.render_widget(footer_widget, area);
}

/// Render help overlay.
fn render_help_overlay(frame: &mut Frame, colors: &UiColors) {
    let area = centered_rect(60, 70, frame.area());

    let help_text = vec![
        Line::from(Span::styled(
            "STONKDASH HELP",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  ↑/k       Move up"),
        Line::from("  ↓/j       Move down"),
        Line::from("  g/Home    Go to top"),
        Line::from("  G/End     Go to bottom"),
        Line::from("  Tab       Switch between watchlist and results"),
        Line::from(""),
        Line::from("Search:"),
        Line::from("  /         Start typing a query"),
        Line::from("  Backspace Delete a character"),
        Line::from("  Esc       Back to watchlist"),
        Line::from(""),
        Line::from("Actions:"),
        Line::from("  Enter     Select highlighted stock"),
        Line::from("  a         Add selected stock to watchlist"),
        Line::from("  q/Esc     Quit"),
        Line::from("  h/?       Toggle help"),
        Line::from(""),
        Line::from("Press any key to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Render error message.
fn render_error(frame: &mut Frame, error: &str, colors: &UiColors) {
    let area = centered_rect(50, 20, frame.area());

    let error_widget = Paragraph::new(error)
        .block(
            Block::default()
                .title(" Notice ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.loss)),
        )
        .style(Style::default().fg(colors.loss))
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(error_widget, area);
}

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Format price with appropriate precision.
fn format_price(price: f64) -> String {
    let sign = if price < 0.0 { "-" } else { "" };
    if price.abs() >= 1.0 {
        format!("{}${:.2}", sign, price.abs())
    } else {
        format!("{}${:.4}", sign, price.abs())
    }
}

/// Format volume with suffixes.
fn format_volume(volume: u64) -> String {
    if volume >= 1_000_000_000 {
        format!("{:.2}B", volume as f64 / 1_000_000_000.0)
    } else if volume >= 1_000_000 {
        format!("{:.2}M", volume as f64 / 1_000_000.0)
    } else if volume >= 1_000 {
        format!("{:.2}K", volume as f64 / 1_000.0)
    } else {
        volume.to_formatted_string(&Locale::en)
    }
}

/// Format market cap with suffixes.
fn format_market_cap(market_cap: Option<u64>) -> String {
    match market_cap {
        Some(cap) if cap >= 1_000_000_000_000 => {
            format!("${:.2}T", cap as f64 / 1_000_000_000_000.0)
        }
        Some(cap) if cap >= 1_000_000_000 => format!("${:.2}B", cap as f64 / 1_000_000_000.0),
        Some(cap) if cap >= 1_000_000 => format!("${:.2}M", cap as f64 / 1_000_000.0),
        Some(cap) => format!("${}", cap.to_formatted_string(&Locale::en)),
        None => "-".to_string(),
    }
}

/// Truncate string to max length.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Render batch mode output (non-interactive).
pub fn render_batch(app: &App) {
    use chrono::Local;

    let dashboard = &app.dashboard;
    let selection = dashboard.selection();
    let prediction = dashboard.prediction();

    println!(
        "\n=== STONKDASH {} ===",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "Selected: {} {}  {}  {:+.2}",
        selection.symbol,
        truncate_string(&selection.name, 24),
        format_price(selection.current_price),
        selection.change
    );

    if app.show_predictions {
        println!(
            "Prediction: 24h ${}  7d ${}  confidence {}  risk {}",
            prediction.day_display(),
            prediction.week_display(),
            prediction.confidence_display(),
            prediction.risk
        );
    }

    if app.show_market_overview {
        let overview: Vec<String> = app
            .markets
            .iter()
            .map(|m| format!("{} {:.2} ({:+.2}%)", m.name, m.value, m.change_percent))
            .collect();
        println!("Markets: {}", overview.join("  "));
    }

    println!();
    println!(
        "{:<2}{:<8} {:<24} {:>12} {:>10} {:>12}",
        "", "SYMBOL", "NAME", "PRICE", "CHANGE", "VOLUME"
    );
    println!("{}", "-".repeat(72));
    for stock in dashboard.watchlist() {
        let marker = if dashboard.is_selected(&stock.symbol) { "*" } else { "" };
        println!(
            "{:<2}{:<8} {:<24} {:>12} {:>+10.2} {:>12}",
            marker,
            stock.symbol,
            truncate_string(&stock.name, 24),
            format_price(stock.current_price),
            stock.change,
            format_volume(stock.volume)
        );
    }

    if !dashboard.query().is_empty() {
        let matches: Vec<&str> = dashboard
            .search_results()
            .iter()
            .map(|s| s.symbol.as_str())
            .collect();
        println!();
        if matches.is_empty() {
            println!("Search \"{}\": no matches", dashboard.query());
        } else {
            println!("Search \"{}\": {}", dashboard.query(), matches.join(", "));
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(189.842), "$189.84");
        assert_eq!(format_price(0.5), "$0.5000");
        assert_eq!(format_price(-3.0), "-$3.00");
        assert_eq!(format_price(-0.25), "-$0.2500");
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(999), "999");
        assert_eq!(format_volume(52_164_300), "52.16M");
        assert_eq!(format_volume(1_500), "1.50K");
    }

    #[test]
    fn test_format_market_cap() {
        assert_eq!(format_market_cap(None), "-");
        assert_eq!(format_market_cap(Some(2_950_000_000_000)), "$2.95T");
        assert_eq!(format_market_cap(Some(12_345)), "$12,345");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Apple", 10), "Apple");
        assert_eq!(truncate_string("Microsoft Corporation", 10), "Microso...");
        assert_eq!(truncate_string("abcdef", 3), "...");
    }

    #[test]
    fn test_price_bounds_pads_flat_series() {
        assert_eq!(price_bounds(&[]), (0.0, 1.0));
        assert_eq!(price_bounds(&[(0.0, 100.0), (1.0, 100.0)]), (99.0, 101.0));
        let (low, high) = price_bounds(&[(0.0, 100.0), (1.0, 120.0)]);
        assert_eq!((low, high), (98.0, 122.0));
    }
}
