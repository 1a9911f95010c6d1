use crate::app::{App, UpgradeEntry};
use crate::sim::content;
use crate::sim::game::Game;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub mod activities_view;
pub mod modal_view;
pub mod upgrades_view;

pub fn render(frame: &mut Frame, app: &App, game: &Game, upgrades: &[UpgradeEntry]) {
    let size = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(size);

    render_header(frame, layout[0], game);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[1]);

    activities_view::render(frame, columns[0], app, game);
    upgrades_view::render(frame, columns[1], app, game, upgrades);

    render_notifications(frame, layout[2], game);
    render_footer(frame, layout[3], app);

    modal_view::render(frame, game);
}

fn render_header(frame: &mut Frame, area: Rect, game: &Game) {
    let state = &game.state;
    let rank = content::rank(&state.current_rank_id)
        .unwrap_or_else(content::baseline_rank)
        .name;
    let stage = content::stage(state.current_stage_index)
        .map(|stage| stage.name)
        .unwrap_or("Unknown");
    let utopia = if game.is_utopia() { "  ★ UTOPIA" } else { "" };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                "Road to Utopia",
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  Funds: "),
            Span::styled(
                format!("{:.0}", state.funds),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(format!(" (+{:.1}/s)", game.income_per_second())),
            Span::raw("  •  Polling: "),
            Span::styled(
                format!("{:.1}%", game.polling()),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(format!("  •  Momentum: {:.0}", state.momentum)),
            Span::raw(format!("  •  Happiness: {:.0}", state.happiness)),
            Span::raw(format!("  •  Popularity: x{:.2}", state.popularity)),
        ]),
        Line::from(vec![
            Span::raw(format!(
                "Volunteers: {:.0} (+{:.0} on Run Again)",
                state.volunteers,
                (game.potential_volunteers() - state.volunteers_earned).max(0.0)
            )),
            Span::raw("  •  Rank: "),
            Span::styled(rank, Style::default().fg(Color::Magenta)),
            Span::raw("  •  Stage: "),
            Span::styled(stage, Style::default().fg(Color::LightBlue)),
            Span::styled(utopia, Style::default().fg(Color::LightGreen)),
            Span::raw(format!(
                "  •  Level {} ({} SP)  •  Buy {}",
                state.level,
                state.skill_points,
                state.buy_mode.label()
            )),
        ]),
    ];
    if let Some(policy) = game.last_policy() {
        lines.push(Line::from(Span::styled(
            format!(
                "Enacted {}: happiness {:+.0}, popularity {:+.2}",
                policy.name, policy.happiness_delta, policy.popularity_delta
            ),
            Style::default().fg(Color::LightGreen),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(paragraph, area);
}

fn render_notifications(frame: &mut Frame, area: Rect, game: &Game) {
    let visible = area.height.saturating_sub(1) as usize;
    let notifications: Vec<_> = game.notifications().collect();
    let skip = notifications.len().saturating_sub(visible);
    let lines: Vec<Line> = notifications
        .into_iter()
        .skip(skip)
        .map(|notification| Line::from(notification.message.clone()))
        .collect();
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("News").borders(Borders::TOP))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let key = |label: &'static str| Span::styled(label, Style::default().fg(Color::Yellow));
    let mut spans = vec![
        key("[C]"),
        Span::raw(" canvass  •  "),
        key("[J/K]"),
        Span::raw(" navigate  •  "),
        key("[Tab]"),
        Span::raw(" focus  •  "),
        key("[Enter]"),
        Span::raw(" buy  •  "),
        key("[H]"),
        Span::raw(" manager  •  "),
        key("[M]"),
        Span::raw(" buy mode  •  "),
        key("[D]"),
        Span::raw(" debate  •  "),
        key("[G]"),
        Span::raw(" rapid response  •  "),
        key("[P]"),
        Span::raw(" run again  •  "),
        key("[X]"),
        Span::raw(" dismiss  •  "),
        key("[E/I]"),
        Span::raw(" export/import  •  "),
        key("[Q]"),
        Span::raw(" save & quit"),
    ];
    if app.confirm_reset {
        spans.push(Span::styled(
            "  •  Press R again to hard reset",
            Style::default().fg(Color::LightRed),
        ));
    }
    let instructions = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(instructions, area);
}
