//! Assistant list pane.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::Palette;
use crate::app::{App, InputMode};

/// Render the assistant list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let filtered = app.filtered_configs();
  let total = app.configs.len();
  let filtering = app.input_mode == InputMode::Filter || !app.filter.is_empty();

  let title = if filtering || app.ui.industry_filter.is_some() {
    format!(" Assistants ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Assistants ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(palette.dim));

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|config| {
      let visibility = if config.is_public { "● " } else { "○ " };
      ListItem::new(Line::from(vec![
        Span::styled(visibility, Style::default().fg(palette.accent)),
        Span::raw(config.name.clone()),
        Span::styled(
          format!("  {}", config.usage_count),
          Style::default().fg(palette.dim),
        ),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  if filtering && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.input_mode == InputMode::Filter {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(palette.warning)),
      filter_area,
    );
  }

  let mut state = ListState::default();
  state.select(if filtered.is_empty() { None } else { Some(app.list_cursor) });

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(palette.cursor)
        .fg(palette.fg)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
