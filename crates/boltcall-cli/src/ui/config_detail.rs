//! Assistant detail pane.

use boltcall_core::assistant::AssistantConfig;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use super::Palette;
use crate::app::App;

/// Render the selected assistant into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let Some(config) = app.selected_config() else { return };

  let block = Block::default()
    .title(format!(" {} ", config.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(palette.dim));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let lines = detail_lines(config, palette);
  let para = Paragraph::new(lines)
    .wrap(Wrap { trim: false })
    .scroll((u16::try_from(app.detail_scroll).unwrap_or(u16::MAX), 0));
  f.render_widget(para, inner);
}

/// Number of unwrapped lines the pane renders for `config`; the last one is
/// as far as the pane scrolls.
pub fn line_count(config: &AssistantConfig) -> usize {
  detail_lines(config, &Palette::for_mode(true)).len()
}

fn field<'a>(label: &'a str, value: String, palette: &Palette) -> Line<'a> {
  Line::from(vec![
    Span::styled(
      format!("{label:<14}"),
      Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

fn heading<'a>(text: &'a str, palette: &Palette) -> Line<'a> {
  Line::from(Span::styled(
    text,
    Style::default().fg(palette.warning).add_modifier(Modifier::BOLD),
  ))
}

fn bullets<'a>(items: &[String]) -> Vec<Line<'a>> {
  items.iter().map(|item| Line::from(format!("  • {item}"))).collect()
}

fn detail_lines<'a>(config: &'a AssistantConfig, palette: &Palette) -> Vec<Line<'a>> {
  let llm = &config.llm_config;
  let mut lines = vec![
    field("id", config.id.to_string(), palette),
    field("industry", config.industry.clone(), palette),
    field(
      "visibility",
      if config.is_public { "public" } else { "private" }.into(),
      palette,
    ),
    field("usage", config.usage_count.to_string(), palette),
    field("voice", config.voice_id.clone().unwrap_or_else(|| "—".into()), palette),
    field("model", format!("{} (t={}, max {})", llm.model, llm.temperature, llm.max_tokens), palette),
    field("updated", config.updated_at.format("%Y-%m-%d %H:%M").to_string(), palette),
  ];

  if let Some(description) = &config.description {
    lines.push(Line::from(""));
    lines.push(Line::from(description.as_str()));
  }

  lines.push(Line::from(""));
  lines.push(heading("System prompt", palette));
  lines.push(Line::from(llm.system_prompt.as_str()));

  if let Some(ctx) = &llm.industry_context {
    lines.push(Line::from(""));
    lines.push(heading("Context", palette));
    lines.push(field("business", ctx.business_type.clone(), palette));
    lines.push(field("audience", ctx.target_audience.clone(), palette));
    lines.push(field("tone", ctx.tone.to_string(), palette));
    lines.push(field("language", ctx.language.clone(), palette));
    lines.extend(bullets(&ctx.services));
  }

  if let Some(flow) = &llm.conversation_flow {
    lines.push(Line::from(""));
    lines.push(heading("Conversation flow", palette));
    lines.push(field("greeting", flow.greeting.clone(), palette));
    lines.push(Line::from("questions"));
    lines.extend(bullets(&flow.qualification_questions));
    lines.push(Line::from("closing"));
    lines.extend(bullets(&flow.closing_statements));
    lines.push(Line::from("escalation"));
    lines.extend(bullets(&flow.escalation_triggers));
  }

  if let Some(kb) = &llm.knowledge_base {
    lines.push(Line::from(""));
    lines.push(heading("Knowledge base", palette));
    for faq in &kb.faqs {
      lines.push(Line::from(format!("  Q: {}", faq.question)));
      lines.push(Line::from(format!("  A: {}", faq.answer)));
    }
    lines.extend(bullets(&kb.policies));
    if let Some(hours) = &kb.business_hours {
      lines.push(field("hours", hours.clone(), palette));
    }
    if let Some(pricing) = &kb.pricing_notes {
      lines.push(field("pricing", pricing.clone(), palette));
    }
  }

  if let Some(int) = &llm.integrations {
    let enabled: Vec<&str> = [
      (int.calendar_booking, "calendar"),
      (int.crm_sync, "crm"),
      (int.sms_notifications, "sms"),
      (int.email_notifications, "email"),
      (int.call_transfer, "transfer"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    lines.push(Line::from(""));
    lines.push(field("integrations", enabled.join(", "), palette));
  }

  lines
}
