//! TUI rendering — orchestrates all panes.

pub mod config_detail;
pub mod config_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::app::{App, InputMode, Screen};

// ─── Theme ────────────────────────────────────────────────────────────────────

/// Colours for the current `dark_mode` setting.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
  pub bg:      Color,
  pub fg:      Color,
  pub dim:     Color,
  pub accent:  Color,
  pub cursor:  Color,
  pub warning: Color,
}

impl Palette {
  pub fn for_mode(dark_mode: bool) -> Self {
    if dark_mode {
      Self {
        bg:      Color::Black,
        fg:      Color::White,
        dim:     Color::DarkGray,
        accent:  Color::Cyan,
        cursor:  Color::Blue,
        warning: Color::Yellow,
      }
    } else {
      Self {
        bg:      Color::White,
        fg:      Color::Black,
        dim:     Color::Gray,
        accent:  Color::Blue,
        cursor:  Color::LightBlue,
        warning: Color::Red,
      }
    }
  }
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let palette = Palette::for_mode(app.ui.dark_mode);
  let area = f.area();
  f.render_widget(Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)), area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app, &palette);
  draw_body(f, rows[1], app, &palette);
  draw_status(f, rows[2], app, &palette);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    format!(" boltcall  workspace {}", app.workspace_id),
    Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(palette.dim));

  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(palette.dim)),
    area,
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let constraints = if app.ui.sidebar_collapsed {
    vec![Constraint::Percentage(35), Constraint::Percentage(65)]
  } else {
    vec![
      Constraint::Length(20),
      Constraint::Percentage(30),
      Constraint::Min(0),
    ]
  };
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints(constraints)
    .split(area);

  let (list_area, detail_area) = if app.ui.sidebar_collapsed {
    (cols[0], cols[1])
  } else {
    draw_sidebar(f, cols[0], app, palette);
    (cols[1], cols[2])
  };

  config_list::draw(f, list_area, app, palette);

  if app.selected_config().is_some() {
    config_detail::draw(f, detail_area, app, palette);
  } else {
    draw_empty_detail(f, detail_area, palette);
  }
}

fn draw_sidebar(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let block = Block::default()
    .title(" Industries ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(palette.dim));

  let selected = app.ui.industry_filter.as_deref();
  let entry = |label: &str, active: bool| {
    let style = if active {
      Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(palette.fg)
    };
    ListItem::new(Line::from(Span::styled(
      format!("{} {label}", if active { "›" } else { " " }),
      style,
    )))
  };

  let mut items = vec![entry("all", selected.is_none())];
  items.extend(
    app
      .industries()
      .into_iter()
      .map(|industry| entry(industry, selected == Some(industry))),
  );

  f.render_widget(List::new(items).block(block), area);
}

fn draw_empty_detail(f: &mut Frame, area: Rect, palette: &Palette) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(palette.dim));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new("Select an assistant and press Enter.")
      .style(Style::default().fg(palette.dim)),
    inner,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let (mode_label, hints) = match (&app.input_mode, &app.screen) {
    (InputMode::Filter, _) => ("FILTER", "Type to filter  Esc clear  Enter apply"),
    (InputMode::NewName, _) => ("NEW", "Type a name  Esc cancel  Enter create"),
    (InputMode::Normal, Screen::ConfigList) => (
      "LIST",
      "jk move  Enter open  / filter  i industry  n new  p public  u use  d delete  b sidebar  t theme  r reload  q quit",
    ),
    (InputMode::Normal, Screen::ConfigDetail) => (
      "DETAIL",
      "jk scroll  Esc back  p public  u use  d delete  q quit",
    ),
  };

  let status = match app.input_mode {
    InputMode::NewName => format!("name: {}_", app.new_name),
    _ if !app.toast.is_empty() => app.toast.clone(),
    _ => hints.to_string(),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(palette.bg)
      .bg(palette.accent)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(palette.dim));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span])).style(Style::default().bg(palette.bg)),
    area,
  );
}
