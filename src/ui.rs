use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::{App, PaneFocus, format_money, stars};
use crate::game::{
    CraftPhase, NoticeKind, PROGRESS_COMPLETE, Requirement, Trumpet, TuningSession,
    format_sequence,
};
use crate::tutorial::TutorialFocus;

pub fn draw(f: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(7),
        ])
        .split(f.size());

    draw_stats(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(28),
            Constraint::Percentage(37),
        ])
        .split(chunks[1]);

    draw_orders(f, main_chunks[0], app);
    draw_materials(f, main_chunks[1], app);
    draw_workshop(f, main_chunks[2], app);
    draw_footer(f, chunks[2], app);

    if app.tutorial.visible {
        draw_tutorial(f, app);
    } else if app.show_debug {
        draw_debug(f, app);
    }
}

fn spotlight(app: &App, target: TutorialFocus) -> bool {
    app.tutorial.focus() == Some(target)
}

fn draw_stats(f: &mut Frame<'_>, area: Rect, app: &App) {
    let player = &app.game.player;
    let block = Block::default()
        .title("Trumpet Shop")
        .borders(Borders::ALL)
        .border_style(highlight_style(spotlight(app, TutorialFocus::Stats), false));
    let volume = if app.audio.is_initialised() {
        format!("{:.0}%", app.audio.master_volume() * 100.0)
    } else {
        "off".to_string()
    };
    let line = Line::from(vec![
        Span::styled("Money ", Style::default().fg(Color::Gray)),
        Span::styled(format_money(player.money), Style::default().fg(Color::LightGreen)),
        Span::raw("  |  Reputation "),
        Span::styled(player.reputation.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw("  |  Level "),
        Span::styled(player.level.to_string(), Style::default().fg(Color::LightCyan)),
        Span::raw("  |  Delivered "),
        Span::styled(player.completed.to_string(), Style::default().fg(Color::White)),
        Span::raw("  |  Volume "),
        Span::styled(volume, Style::default().fg(Color::Gray)),
    ]);
    let paragraph = Paragraph::new(line).block(block);
    f.render_widget(paragraph, area);
}

fn draw_orders(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = pane_block(
        "Orders",
        app.focus == PaneFocus::Orders,
        spotlight(app, TutorialFocus::Orders),
    );
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let book = &app.game.orders;
    if book.is_empty() {
        let paragraph = Paragraph::new("No orders right now. Press n to take a new one.")
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, inner);
        return;
    }

    let items: Vec<ListItem> = book
        .orders
        .iter()
        .map(|order| {
            let selected = book.selected.as_ref() == Some(&order.id);
            let marker = if selected { "● " } else { "  " };
            let name_style = if selected {
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let lines = vec![
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(order.name.clone(), name_style),
                    Span::raw("  "),
                    Span::styled(stars(order.difficulty), Style::default().fg(Color::Yellow)),
                ]),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format_money(order.reward), Style::default().fg(Color::LightCyan)),
                    Span::styled(
                        format!("  due in {} days", order.deadline_days),
                        Style::default().fg(Color::Gray),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", order.description),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )),
            ];
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).highlight_style(Style::default().bg(Color::DarkGray));
    let mut state = ListState::default();
    state.select(Some(book.cursor));
    f.render_stateful_widget(list, inner, &mut state);
}

fn draw_materials(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = pane_block(
        "Materials",
        app.focus == PaneFocus::Materials,
        spotlight(app, TutorialFocus::Materials),
    );
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let segments = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(inner);

    let requirement = app
        .game
        .orders
        .selected_order()
        .map(|order| Requirement::for_tier(order.difficulty))
        .unwrap_or_default();

    let items: Vec<ListItem> = app
        .game
        .inventory
        .materials
        .iter()
        .map(|material| {
            let needed = requirement.quantity(material.key);
            let count_style = if needed > material.count {
                Style::default().fg(Color::LightRed)
            } else if material.count > 0 {
                Style::default().fg(Color::LightGreen)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut spans = vec![
                Span::styled(format!("{:>2}×", material.count), count_style),
                Span::raw(" "),
                Span::styled(format!("{:<8}", material.name()), Style::default().fg(Color::White)),
                Span::styled(
                    format!(" {:>5}", format_money(material.price())),
                    Style::default().fg(Color::LightCyan),
                ),
                Span::styled(
                    format!(" {}", stars(material.quality())),
                    Style::default().fg(Color::Yellow),
                ),
            ];
            if needed > 0 {
                spans.push(Span::styled(
                    format!("  need {}", needed),
                    Style::default().fg(Color::Gray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let mut state = ListState::default();
    state.select(Some(app.game.inventory.selected));
    f.render_stateful_widget(list, segments[0], &mut state);

    let help = Paragraph::new(vec![
        Line::from("Enter buy highlighted"),
        Line::from("r buy a random material"),
    ])
    .style(Style::default().fg(Color::Gray))
    .wrap(Wrap { trim: true });
    f.render_widget(help, segments[1]);
}

fn draw_workshop(f: &mut Frame<'_>, area: Rect, app: &App) {
    let spot = spotlight(app, TutorialFocus::Workshop) || spotlight(app, TutorialFocus::Tuning);
    let title = format!("Workshop · {}", app.game.phase().label());
    let block = pane_block(&title, app.focus == PaneFocus::Workshop, spot);
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let segments = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    draw_craft_button(f, segments[0], app);

    let Some(trumpet) = app.game.trumpet() else {
        let placeholder = Paragraph::new("The bench is empty. Pick an order and stock up.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(placeholder, segments[2]);
        return;
    };

    let ratio = f64::from(trumpet.progress.min(PROGRESS_COMPLETE)) / f64::from(PROGRESS_COMPLETE);
    let gauge = Gauge::default()
        .block(Block::default().title(trumpet.order.name.as_str()))
        .ratio(ratio)
        .gauge_style(
            Style::default()
                .fg(if trumpet.is_ready() {
                    Color::LightGreen
                } else {
                    Color::Yellow
                })
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .label(format!("{}%", trumpet.progress));
    f.render_widget(gauge, segments[1]);

    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(segments[2]);
    f.render_widget(Paragraph::new(trumpet_lines(trumpet)), detail[0]);
    draw_tuning(f, detail[1], app);
}

fn draw_craft_button(f: &mut Frame<'_>, area: Rect, app: &App) {
    let readiness = app.game.craft_readiness();
    let button_style = if readiness.enabled() {
        Style::default()
            .fg(Color::Black)
            .bg(Color::LightGreen)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let lines = vec![
        Line::from(Span::styled(format!(" {} ", readiness.label()), button_style)),
        Line::from(Span::styled(
            readiness.tooltip(),
            Style::default().fg(Color::Gray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn trumpet_lines(trumpet: &Trumpet) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled("Quality ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} ({})", trumpet.quality_label(), trumpet.quality),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("  |  Attempts "),
            Span::raw(format!("{}/3", trumpet.attempts_display())),
        ]),
        Line::from(vec![
            Span::styled("Pays ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_money(trumpet.final_reward()),
                Style::default().fg(Color::LightCyan),
            ),
            Span::styled(
                format!(" (base {})", format_money(trumpet.order.reward)),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ]
}

fn draw_tuning(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .title("Tuning")
        .borders(Borders::ALL)
        .border_style(highlight_style(spotlight(app, TutorialFocus::Tuning), false));
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    match (app.game.phase(), app.game.tuning()) {
        (CraftPhase::Tuning, Some(session)) => draw_session(f, inner, session),
        (CraftPhase::Ready, _) => {
            let paragraph = Paragraph::new("Finished! Press Enter to deliver.")
                .style(Style::default().fg(Color::LightGreen))
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, inner);
        }
        _ => {
            let paragraph = Paragraph::new("Press t to start tuning.")
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, inner);
        }
    }
}

fn draw_session(f: &mut Frame<'_>, area: Rect, session: &TuningSession) {
    let segments = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let played_style = if session.failure_pending() {
        Style::default().fg(Color::LightRed)
    } else {
        Style::default().fg(Color::LightGreen)
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Melody ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_sequence(session.target()),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Played ", Style::default().fg(Color::Gray)),
            Span::styled(format_sequence(session.played()), played_style),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), segments[0]);

    let gauge = Gauge::default()
        .ratio(session.completion_ratio())
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .label(format!("{}/{}", session.played().len(), session.target().len()));
    f.render_widget(gauge, segments[1]);

    let hint = if session.failure_pending() {
        "Wrong note..."
    } else {
        "a–g play notes  |  p hear the melody  |  t new melody"
    };
    f.render_widget(
        Paragraph::new(hint)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true }),
        segments[2],
    );
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Keys & News")
        .border_style(Style::default().fg(Color::Gray));
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let mut instruction_lines = vec![
        Line::from("Tab cycle focus | ↑↓ move | Enter act | q quit | h help"),
        Line::from("n new order | r random material | s craft | t tune"),
        Line::from("p hear melody | a–g notes | +/- volume"),
    ];
    if app.debug_enabled {
        instruction_lines.push(Line::from("F12 debug view"));
    }
    let instruction = Paragraph::new(instruction_lines).wrap(Wrap { trim: true });
    f.render_widget(instruction, columns[0]);

    let mut message_lines: Vec<Line> = app
        .notifications
        .iter()
        .map(|toast| {
            let color = match toast.kind {
                NoticeKind::Success => Color::LightGreen,
                NoticeKind::Error => Color::LightRed,
            };
            Line::from(Span::styled(toast.message.clone(), Style::default().fg(color)))
        })
        .collect();
    if message_lines.is_empty() {
        message_lines.push(Line::from(Span::styled(
            "The shop is quiet...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    let feed = Paragraph::new(message_lines).wrap(Wrap { trim: true });
    f.render_widget(feed, columns[1]);
}

fn draw_tutorial(f: &mut Frame<'_>, app: &App) {
    let area = centered_rect(60, 40, f.size());
    let step = app.tutorial.current();
    let block = Block::default()
        .title(format!("Tutorial {}", app.tutorial.indicator()))
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    let controls = if app.tutorial.is_last_step() {
        "← back  |  Enter start playing  |  Esc skip"
    } else {
        "← back  |  → next  |  Esc skip"
    };
    let lines = vec![
        Line::from(Span::styled(
            step.title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(step.body),
        Line::from(""),
        Line::from(Span::styled(controls, Style::default().fg(Color::Gray))),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_debug(f: &mut Frame<'_>, app: &App) {
    let area = centered_rect(70, 70, f.size());
    let block = Block::default()
        .title("Debug (Esc to close)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let lines: Vec<Line> = app
        .game
        .debug_snapshot()
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect();
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
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
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn highlight_style(spotlit: bool, focused: bool) -> Style {
    if spotlit {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn pane_block<'a>(title: &'a str, focused: bool, spotlit: bool) -> Block<'a> {
    Block::default()
        .title(Span::styled(title, Style::default().fg(Color::White)))
        .borders(Borders::ALL)
        .border_style(highlight_style(spotlit, focused))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioUnit;
    use crate::game::GameState;
    use crate::tutorial::{TutorialController, TutorialStore};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App) -> String {
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    fn app() -> App {
        App::new(
            GameState::with_seed(8),
            AudioUnit::silent(8_000),
            TutorialController::new(TutorialStore::ephemeral()),
            true,
        )
    }

    #[test]
    fn renders_every_pane() {
        let app = app();
        let screen = render(&app);
        assert!(screen.contains("Orders"));
        assert!(screen.contains("Materials"));
        assert!(screen.contains("Workshop"));
        assert!(screen.contains("1,000¥"));
    }

    #[test]
    fn renders_overlays() {
        let mut app = app();
        app.tutorial.show();
        assert!(render(&app).contains("Tutorial 1 / 5"));
        app.tutorial.hide();
        app.show_debug = true;
        assert!(render(&app).contains("Game state"));
    }
}
