use crate::app::{App, FocusTarget, UpgradeEntry};
use crate::sim::game::Game;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

pub fn render(frame: &mut Frame, area: Rect, app: &App, game: &Game, upgrades: &[UpgradeEntry]) {
    let highlight = app.focus() == FocusTarget::Upgrades;
    let border_style = if highlight {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let items: Vec<ListItem> = upgrades
        .iter()
        .map(|entry| {
            let owned = entry.is_owned(game);
            let locked = match entry {
                UpgradeEntry::Policy(def) => game.state.current_stage_index < def.stage_gate,
                _ => false,
            };
            let name_style = if owned {
                Style::default().fg(Color::LightGreen)
            } else if locked {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Yellow)
            };
            let status = if owned {
                Span::styled("  [OWNED]", Style::default().fg(Color::DarkGray))
            } else if locked {
                Span::styled("  [LOCKED]", Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(format!("  [{}]", entry.price_label()))
            };
            ListItem::new(Line::from(vec![
                Span::styled(kind_label(entry), Style::default().fg(Color::Gray)),
                Span::styled(entry.name(), name_style),
                status,
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Policies & Movement")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !upgrades.is_empty() {
        state.select(Some(app.selected_upgrade.min(upgrades.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn kind_label(entry: &UpgradeEntry) -> &'static str {
    match entry {
        UpgradeEntry::Policy(_) => "policy ",
        UpgradeEntry::Structure(_) => "power  ",
        UpgradeEntry::Angel(_) => "ally   ",
        UpgradeEntry::Skill(_) => "skill  ",
    }
}
