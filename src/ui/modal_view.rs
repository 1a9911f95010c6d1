//! Popups for whichever interaction currently holds the modal slot.

use crate::sim::content;
use crate::sim::debate::{Speaker, Turn};
use crate::sim::game::Game;
use crate::sim::interactions::{DebateSession, MiniGame};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap};

const LOG_LINES: usize = 8;

pub fn render(frame: &mut Frame, game: &Game) {
    if let Some(session) = game.debate() {
        render_debate(frame, game, session);
    } else if let Some(active) = &game.state.active_dilemma {
        if let Some(def) = content::dilemma(&active.id) {
            let mut lines = vec![Line::from(def.prompt), Line::from("")];
            lines.extend(def.choices.iter().enumerate().map(|(idx, choice)| {
                Line::from(vec![
                    Span::styled(
                        format!("[{}] ", idx + 1),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(choice.label),
                ])
            }));
            render_popup(frame, "Dilemma", lines, 60, 40);
        }
    } else if let Some(active) = &game.state.active_event {
        if let Some(def) = content::event(&active.id) {
            let lines = vec![
                Line::from(Span::styled(
                    def.headline,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(effect_summary(def.effect)),
                Line::from(""),
                Line::from("Enter to continue"),
            ];
            render_popup(frame, "Breaking News", lines, 50, 30);
        }
    } else if let Some(mini) = game.mini_game() {
        render_mini_game(frame, game, mini);
    }
}

fn render_popup(frame: &mut Frame, title: &str, lines: Vec<Line>, width: u16, height: u16) {
    let area = centered_rect(width, height, frame.size());
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_debate(frame: &mut Frame, game: &Game, session: &DebateSession) {
    let area = centered_rect(70, 75, frame.size());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!("Debate vs {}", session.opponent.name))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(session.moves.len() as u16 + 2),
            Constraint::Length(1),
        ])
        .split(inner);

    let battle = &session.battle;
    frame.render_widget(
        hp_gauge("You", battle.player_hp, battle.max_player_hp, Color::LightGreen),
        layout[0],
    );
    frame.render_widget(
        hp_gauge(
            session.opponent.name,
            battle.enemy_hp,
            battle.max_enemy_hp,
            Color::LightRed,
        ),
        layout[1],
    );

    let skip = battle.battle_log.len().saturating_sub(LOG_LINES);
    let log: Vec<Line> = battle
        .battle_log
        .iter()
        .skip(skip)
        .map(|entry| {
            let color = match entry.speaker {
                Speaker::Player => Color::LightGreen,
                Speaker::Opponent => Color::LightRed,
                Speaker::Moderator => Color::Gray,
            };
            Line::from(Span::styled(entry.text.clone(), Style::default().fg(color)))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(log)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::TOP)),
        layout[2],
    );

    let moves: Vec<ListItem> = session
        .moves
        .iter()
        .enumerate()
        .map(|(idx, mv)| {
            let cooldown = battle.cooldown(&mv.id);
            let usable = battle.turn == Turn::Player && !battle.is_complete && cooldown == 0;
            let style = if usable {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut spans = vec![
                Span::styled(format!("[{}] {}", idx + 1, mv.name), style),
                Span::raw(format!("  ~{:.0} dmg", game.move_damage(mv.policy_cost))),
            ];
            if cooldown > 0 {
                spans.push(Span::raw(format!("  (cooldown {cooldown})")));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    frame.render_widget(
        List::new(moves).block(Block::default().title("Moves").borders(Borders::TOP)),
        layout[3],
    );

    let status = if battle.is_complete {
        if battle.did_player_win {
            "Victory! Esc to leave."
        } else {
            "Defeated. Esc to leave."
        }
    } else if battle.turn == Turn::Enemy {
        "Your opponent is answering..."
    } else {
        "Pick a move with 1-9, Esc to walk off stage."
    };
    frame.render_widget(Paragraph::new(status), layout[4]);
}

fn hp_gauge(label: &str, hp: f64, max: f64, color: Color) -> Gauge<'static> {
    let ratio = if max > 0.0 {
        (hp / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(format!("{label}: {hp:.0}/{max:.0}"))
}

fn render_mini_game(frame: &mut Frame, game: &Game, mini: &MiniGame) {
    let total = game.config().mini_game_duration_ms.max(1);
    let lines = vec![
        Line::from("Hammer Space to answer every call before time runs out!"),
        Line::from(""),
        Line::from(Span::styled(
            format!("Hits: {}/{}", mini.hits, game.mini_game_hit_cap()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Time left: {:.1}s of {:.0}s",
            mini.remaining_ms as f64 / 1000.0,
            total as f64 / 1000.0
        )),
        Line::from(""),
        Line::from("Esc to give up"),
    ];
    render_popup(frame, "Rapid Response", lines, 50, 35);
}

fn effect_summary(effect: content::Effect) -> String {
    let mut parts = Vec::new();
    if effect.happiness != 0.0 {
        parts.push(format!("happiness {:+.0}", effect.happiness));
    }
    if effect.popularity != 0.0 {
        parts.push(format!("popularity {:+.2}", effect.popularity));
    }
    if effect.momentum != 0.0 {
        parts.push(format!("momentum {:+.0}", effect.momentum));
    }
    if effect.funds_fraction != 0.0 {
        parts.push(format!("funds {:+.0}%", effect.funds_fraction * 100.0));
    }
    if parts.is_empty() {
        "No lasting effect.".to_string()
    } else {
        parts.join(", ")
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::content::Effect;

    #[test]
    fn effect_summary_lists_nonzero_parts() {
        let effect = Effect {
            happiness: 5.0,
            popularity: 0.0,
            momentum: -10.0,
            funds_fraction: 0.0,
        };
        assert_eq!(effect_summary(effect), "happiness +5, momentum -10");
    }

    #[test]
    fn popup_is_centered() {
        let area = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(area, Rect::new(25, 10, 50, 20));
    }
}
