use crate::app::{App, FocusTarget};
use crate::sim::content::ACTIVITIES;
use crate::sim::game::Game;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

const BAR_WIDTH: usize = 12;

pub fn render(frame: &mut Frame, area: Rect, app: &App, game: &Game) {
    let highlight = app.focus() == FocusTarget::Activities;
    let border_style = if highlight {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let global = game.revenue_multiplier();
    let items: Vec<ListItem> = ACTIVITIES
        .iter()
        .map(|def| {
            let entry = game.state.activities.get(def.id);
            let owned = entry.map(|entry| entry.owned).unwrap_or(0);
            let managed = entry.is_some_and(|entry| entry.manager_hired);
            let progress = entry.map(|entry| entry.progress).unwrap_or(0.0);

            let quantity = game.purchase_quantity(def);
            let cost = game.activity_cost(def, quantity.max(1));
            let affordable = quantity > 0 && game.state.funds >= cost;
            let name_style = Style::default()
                .fg(if affordable { Color::Yellow } else { Color::Gray })
                .add_modifier(Modifier::BOLD);

            let speed = game.activity_speed_multiplier(def);
            let cycle_secs = def.cycle_ms as f64 / speed.max(f64::MIN_POSITIVE) / 1000.0;
            let header = Line::from(vec![
                Span::styled(def.name, name_style),
                Span::raw(format!(" | owned {owned}")),
                Span::raw(format!(
                    " | {:.1}/cycle",
                    game.revenue_per_completion(def, global)
                )),
                Span::raw(format!(" | {cycle_secs:.2}s")),
            ]);

            let manager = if managed {
                Span::styled("managed", Style::default().fg(Color::LightGreen))
            } else {
                Span::styled(
                    format!("manager {:.0}", def.manager_cost()),
                    Style::default().fg(Color::DarkGray),
                )
            };
            let detail = Line::from(vec![
                Span::raw(progress_bar(progress / def.cycle_ms.max(1) as f64)),
                Span::raw(format!("  buy x{} for {:.0}  ", quantity.max(1), cost)),
                manager,
            ]);
            ListItem::new(vec![header, detail])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Campaign Operations")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(app.selected_activity.min(ACTIVITIES.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn progress_bar(fraction: f64) -> String {
    let filled = ((fraction.clamp(0.0, 1.0)) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_is_clamped() {
        assert_eq!(progress_bar(0.0), "[------------]");
        assert_eq!(progress_bar(0.5), "[######------]");
        assert_eq!(progress_bar(3.0), "[############]");
    }
}
