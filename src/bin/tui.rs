mod tui_app;
mod watchlist;

use std::borrow::Cow;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, Paragraph, Row,
        Table, TableState, Wrap,
    },
    Frame, Terminal,
};
use tui_app::{
    format_change, format_price, format_volume, truncate, AppState, ConnectionStatus, RsiStatus,
    TimeRange,
};
use watchlist::{Watchlist, DEFAULT_WATCHLIST_PATH};

/// Price board poll interval, matching the browser dashboard.
const PRICE_REFRESH: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let watchlist_path =
        std::env::var("WATCHLIST_PATH").unwrap_or_else(|_| DEFAULT_WATCHLIST_PATH.to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(io::Error::other)?;

    let watchlist = Watchlist::load(watchlist_path)?;
    let mut app = AppState::new(base_url, watchlist);

    // Initial fetch before rendering
    app.bootstrap(&client).await;

    let mut company_table_state = TableState::default();
    if let Some(symbol) = app.visible_companies().first().map(|c| c.symbol.clone()) {
        company_table_state.select(Some(0));
        app.load_company(&client, &symbol).await;
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &client, &mut company_table_state).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &reqwest::Client,
    table_state: &mut TableState,
) -> io::Result<()> {
    let mut last_tick = std::time::Instant::now();

    loop {
        terminal.draw(|f| render(f, app, table_state))?;

        let timeout = PRICE_REFRESH
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if app.searching {
                    match key.code {
                        KeyCode::Esc | KeyCode::Enter => app.searching = false,
                        KeyCode::Backspace => {
                            app.search.pop();
                            table_state.select(Some(0));
                        }
                        KeyCode::Char(c) => {
                            app.search.push(c);
                            table_state.select(Some(0));
                        }
                        _ => {}
                    }
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        app.refresh_prices(client).await;
                        if let Some(symbol) = selected_symbol(app, table_state) {
                            app.load_company(client, &symbol).await;
                        }
                        last_tick = std::time::Instant::now();
                    }
                    KeyCode::Char('/') => app.searching = true,
                    KeyCode::Down | KeyCode::Char('j') => {
                        let max = app.visible_companies().len().saturating_sub(1);
                        let next = table_state.selected().map_or(0, |i| (i + 1).min(max));
                        table_state.select(Some(next));
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        let prev = table_state.selected().map_or(0, |i| i.saturating_sub(1));
                        table_state.select(Some(prev));
                    }
                    KeyCode::Enter => {
                        if let Some(symbol) = selected_symbol(app, table_state) {
                            app.load_company(client, &symbol).await;
                        }
                    }
                    KeyCode::Char(c @ '1'..='5') => {
                        if let Some(range) = TimeRange::from_key(c) {
                            app.range = range;
                            if let Some(symbol) = loaded_symbol(app) {
                                app.load_company(client, &symbol).await;
                            }
                        }
                    }
                    KeyCode::Char('t') => app.horizon = app.horizon.next(),
                    KeyCode::Char('w') => {
                        if let Some(id) = selected_id(app, table_state) {
                            if let Err(e) = app.watchlist.toggle_and_save(id) {
                                app.status = ConnectionStatus::Error(format!("watchlist: {e}"));
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= PRICE_REFRESH {
            app.refresh_prices(client).await;
            last_tick = std::time::Instant::now();
        }
    }
}

fn selected_symbol(app: &AppState, state: &TableState) -> Option<String> {
    let idx = state.selected()?;
    app.visible_companies().get(idx).map(|c| c.symbol.clone())
}

fn selected_id(app: &AppState, state: &TableState) -> Option<u32> {
    let idx = state.selected()?;
    app.visible_companies().get(idx).map(|c| c.id)
}

fn loaded_symbol(app: &AppState) -> Option<String> {
    app.history.as_ref().map(|h| h.symbol.clone())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState, table_state: &mut TableState) {
    let area = f.area();

    // Outer vertical split: header | body | news | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(7), // news
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_body(f, app, table_state, chunks[1]);
    render_news(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);
}

fn panel<'a>(title: impl Into<Cow<'a, str>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

fn change_color(v: f64) -> Color {
    if v >= 0.0 {
        Color::Green
    } else {
        Color::Red
    }
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Connecting => ("◌ connecting".to_string(), Color::Yellow),
        ConnectionStatus::Error(e) => (format!("✗ {}", truncate(e, 40)), Color::Red),
    };

    let title_spans = vec![
        Span::styled(
            " Stock Dashboard  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(
            format!("{} companies", app.companies.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!("{} watched", app.watchlist.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!("prices {}s ago", app.last_refresh.elapsed().as_secs()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(title_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

fn render_body(f: &mut Frame, app: &AppState, table_state: &mut TableState, area: Rect) {
    // Horizontal split: companies | chart + stats | prediction + watchlist
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_companies_table(f, app, table_state, columns[0]);

    let center = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(columns[1]);
    render_chart(f, app, center[0]);
    render_stats(f, app, center[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[2]);
    render_prediction(f, app, right[0]);
    render_watchlist(f, app, right[1]);
}

fn render_companies_table(f: &mut Frame, app: &AppState, state: &mut TableState, area: Rect) {
    let header_cells = ["", "Symbol", "Name", "Price", "Chg%"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .visible_companies()
        .into_iter()
        .map(|c| {
            let star = if app.watchlist.contains(c.id) { "♥" } else { " " };
            let (price, pct, color) = match app.prices.get(&c.symbol) {
                Some(q) => (
                    format_price(q.price),
                    format!("{:+.2}%", q.change_percent),
                    change_color(q.change_percent),
                ),
                None => ("—".to_string(), "—".to_string(), Color::DarkGray),
            };
            Row::new(vec![
                Cell::from(star).style(Style::default().fg(Color::Red)),
                Cell::from(c.symbol.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(truncate(&c.name, 18)),
                Cell::from(price),
                Cell::from(pct).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let title = if app.searching || !app.search.is_empty() {
        format!(" COMPANIES /{} ", app.search)
    } else {
        " COMPANIES ".to_string()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Min(8),
            Constraint::Length(9),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(panel(title))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    f.render_stateful_widget(table, area, state);
}

fn render_chart(f: &mut Frame, app: &AppState, area: Rect) {
    let ranges: String = TimeRange::ALL
        .iter()
        .map(|r| {
            if *r == app.range {
                format!("[{}]", r.label())
            } else {
                r.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let Some(history) = &app.history else {
        let p = Paragraph::new("Select a company and press Enter").block(panel(" PRICE "));
        f.render_widget(p, area);
        return;
    };

    let points = app.chart_points();
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    let pad = ((hi - lo) * 0.05).max(0.5);
    let y_bounds = [lo - pad, hi + pad];
    let x_max = (points.len().saturating_sub(1) as f64).max(1.0);

    let first_date = history.historical.first().map_or("", |b| b.date.as_str());
    let last_date = history.historical.last().map_or("", |b| b.date.as_str());

    let color = history
        .stats
        .map_or(Color::Cyan, |s| change_color(s.change));

    let dataset = Dataset::default()
        .name(history.symbol.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(panel(format!(" {} PRICE  {} ", history.symbol, ranges)))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(vec![first_date.to_string(), last_date.to_string()]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.2}", y_bounds[0]),
                    format!("{:.2}", (y_bounds[0] + y_bounds[1]) / 2.0),
                    format!("{:.2}", y_bounds[1]),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_stats(f: &mut Frame, app: &AppState, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);

    let mut lines: Vec<Line> = Vec::new();
    match app.history.as_ref().and_then(|h| h.stats) {
        Some(s) => {
            lines.push(Line::from(vec![
                Span::styled(
                    format_price(s.current_price),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format_change(s.change, s.change_percent),
                    Style::default().fg(change_color(s.change)),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("52W High ", label),
                Span::raw(format_price(s.high_52_week)),
                Span::styled("   52W Low ", label),
                Span::raw(format_price(s.low_52_week)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Volume ", label),
                Span::raw(format_volume(s.volume)),
                Span::styled("   Avg Volume ", label),
                Span::raw(format_volume(s.avg_volume)),
            ]));
        }
        None => lines.push(Line::from(Span::styled("Stats unavailable", label))),
    }

    let company = app
        .history
        .as_ref()
        .and_then(|h| app.companies.iter().find(|c| c.symbol == h.symbol));
    if let Some(c) = company {
        lines.push(Line::from(vec![
            Span::styled("Mkt Cap ", label),
            Span::raw(c.market_cap.clone().unwrap_or_else(|| "—".to_string())),
            Span::styled("   P/E ", label),
            Span::raw(c.pe.map_or("—".to_string(), |v| format!("{v:.1}"))),
            Span::styled("   Div ", label),
            Span::raw(c.dividend.map_or("—".to_string(), |v| format!("{v:.2}%"))),
        ]));
        lines.push(Line::from(Span::styled(c.sector.clone(), label)));
    }

    f.render_widget(Paragraph::new(lines).block(panel(" STATS ")), area);
}

fn render_prediction(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(p) = &app.prediction else {
        f.render_widget(Paragraph::new("—").block(panel(" AI PREDICTION ")), area);
        return;
    };
    let label = Style::default().fg(Color::DarkGray);
    let forecast = app.horizon.pick(&p.predictions);
    let move_pct = (forecast.price - p.current_price) / p.current_price * 100.0;
    let dir_color = if forecast.direction == "up" { Color::Green } else { Color::Red };
    let risk_color = match p.risk_level.as_str() {
        "low" => Color::Green,
        "medium" => Color::Yellow,
        _ => Color::Red,
    };
    let ind = &p.technical_indicators;
    let rsi = RsiStatus::from_rsi(ind.rsi);

    let lines = vec![
        Line::from(Span::styled(app.horizon.label(), Style::default().fg(Color::Yellow))),
        Line::from(vec![
            Span::raw(format_price(forecast.price)),
            Span::raw("  "),
            Span::styled(format!("{move_pct:+.2}%"), Style::default().fg(dir_color)),
        ]),
        Line::from(vec![
            Span::styled("Confidence ", label),
            Span::raw(format!("{:.0}%", forecast.confidence)),
            Span::styled("  Risk ", label),
            Span::styled(p.risk_level.to_uppercase(), Style::default().fg(risk_color)),
        ]),
        Line::from(vec![
            Span::styled("RSI ", label),
            Span::raw(format!("{:.1} {}", ind.rsi, rsi.label())),
        ]),
        Line::from(vec![
            Span::styled("MACD ", label),
            Span::styled(
                if ind.macd > 0.0 { "Bullish" } else { "Bearish" },
                Style::default().fg(change_color(ind.macd)),
            ),
            Span::styled("  BB ", label),
            Span::raw(if ind.bollinger == "upper" { "Resistance" } else { "Support" }),
        ]),
        Line::from(vec![
            Span::styled("Signal ", label),
            Span::raw(if ind.sentiment == "bullish" { "Buy" } else { "Sell" }),
        ]),
        Line::from(Span::styled("Educational use only.", label)),
    ];

    let paragraph = Paragraph::new(lines)
        .block(panel(format!(" AI PREDICTION {} ", p.symbol)))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_watchlist(f: &mut Frame, app: &AppState, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);
    let mut items: Vec<ListItem> = Vec::new();

    let watched = app.watched_companies();
    if watched.is_empty() {
        items.push(ListItem::new(Span::styled("No companies in watchlist ([w] adds)", label)));
    }
    for c in watched {
        let quote = app.prices.get(&c.symbol);
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("♥ {:<6}", c.symbol), Style::default().fg(Color::Cyan)),
            Span::raw(quote.map_or("—".to_string(), |q| format_price(q.price))),
            Span::raw(" "),
            Span::styled(
                quote.map_or(String::new(), |q| format!("{:+.2}%", q.change_percent)),
                Style::default().fg(quote.map_or(Color::DarkGray, |q| change_color(q.change))),
            ),
        ])));
    }

    items.push(ListItem::new(Span::styled(
        "─ Top movers ─",
        Style::default().fg(Color::Yellow),
    )));
    for (c, q) in app.top_movers(5) {
        items.push(ListItem::new(Line::from(vec![
            Span::raw(format!("  {:<6}", c.symbol)),
            Span::styled(
                format!("{:+.2}%", q.change_percent),
                Style::default().fg(change_color(q.change_percent)),
            ),
        ])));
    }

    f.render_widget(List::new(items).block(panel(" WATCHLIST ")), area);
}

fn render_news(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .news
        .iter()
        .map(|n| {
            let impact_color = match n.impact.as_str() {
                "high" => Color::Red,
                "medium" => Color::Yellow,
                _ => Color::Green,
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<9}", n.category.to_uppercase()),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(format!("{:<7}", n.impact.to_uppercase()), Style::default().fg(impact_color)),
                Span::raw(truncate(&n.title, 50)),
                Span::styled(
                    format!("  {} · {}", n.source, n.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(panel(" MARKET NEWS ")), area);
}

fn render_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let line = if app.searching {
        Line::from(vec![
            Span::styled(" type ", key),
            Span::raw("to filter  "),
            Span::styled("[Enter/Esc] ", key),
            Span::raw("done"),
        ])
    } else {
        Line::from(vec![
            Span::styled(" [q] ", key),
            Span::raw("quit  "),
            Span::styled("[r] ", key),
            Span::raw("refresh  "),
            Span::styled("[↑↓ / j k] ", key),
            Span::raw("move  "),
            Span::styled("[Enter] ", key),
            Span::raw("load  "),
            Span::styled("[1-5] ", key),
            Span::raw("range  "),
            Span::styled("[t] ", key),
            Span::raw("horizon  "),
            Span::styled("[w] ", key),
            Span::raw("watch  "),
            Span::styled("[/] ", key),
            Span::raw("search  "),
            Span::styled(
                app.watchlist
                    .path()
                    .map_or(String::new(), |p| format!("watchlist: {}", p.display())),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    };
    f.render_widget(Paragraph::new(line).style(Style::default().fg(Color::White)), area);
}
