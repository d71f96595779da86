//! Assistant configuration records — the unit stored by the registry.
//!
//! A record bundles a reusable AI-receptionist behavior profile (prompt,
//! conversation flow, knowledge base) with ownership and visibility metadata.
//! Records are never hard-deleted; retiring one flips `is_active` to false.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Industry context ────────────────────────────────────────────────────────

/// Voice register the assistant should use with callers.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
  #[default]
  Professional,
  Friendly,
  Casual,
  Formal,
}

impl Tone {
  /// Parse a tone name, case-sensitively, as it appears on the wire.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownTone(s.to_owned()))
  }
}

/// Business background injected into the prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryContext {
  /// Human-readable label, e.g. "Dental Practice".
  pub business_type:   String,
  pub services:        Vec<String>,
  pub target_audience: String,
  pub tone:            Tone,
  /// BCP 47 language tag, e.g. "en-US".
  pub language:        String,
}

// ─── Conversation flow ───────────────────────────────────────────────────────

/// Scripted skeleton of a call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationFlow {
  pub greeting:                String,
  /// Asked in order to qualify the lead.
  pub qualification_questions: Vec<String>,
  pub closing_statements:      Vec<String>,
  /// Keywords that hand the call to a human.
  pub escalation_triggers:     Vec<String>,
}

// ─── Knowledge base ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Faq {
  pub question: String,
  pub answer:   String,
}

/// Business facts the assistant may quote to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
  pub faqs:           Vec<Faq>,
  pub policies:       Vec<String>,
  pub business_hours: Option<String>,
  pub pricing_notes:  Option<String>,
}

// ─── Integrations ────────────────────────────────────────────────────────────

/// Downstream actions the assistant is allowed to trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integrations {
  pub calendar_booking:    bool,
  pub crm_sync:            bool,
  pub sms_notifications:   bool,
  pub email_notifications: bool,
  pub call_transfer:       bool,
}

// ─── LlmConfig ───────────────────────────────────────────────────────────────

/// The behavior payload handed to the voice-agent LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
  pub model:             String,
  pub temperature:       f32,
  pub max_tokens:        u32,
  pub system_prompt:     String,
  pub instructions:      Option<String>,
  pub industry_context:  Option<IndustryContext>,
  pub conversation_flow: Option<ConversationFlow>,
  pub knowledge_base:    Option<KnowledgeBase>,
  pub integrations:      Option<Integrations>,
}

impl LlmConfig {
  /// Serialise for the `llm_config` storage column.
  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  pub fn from_json(s: &str) -> Result<Self> { Ok(serde_json::from_str(s)?) }
}

// ─── AssistantConfig ─────────────────────────────────────────────────────────

/// A stored assistant configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
  pub id:           Uuid,
  pub user_id:      String,
  pub workspace_id: String,
  pub name:         String,
  pub description:  Option<String>,
  /// Key into the preset table; not validated.
  pub industry:     String,
  pub llm_config:   LlmConfig,
  /// Reference to an external voice resource.
  pub voice_id:     Option<String>,
  pub is_public:    bool,
  /// `false` once soft-deleted.
  pub is_active:    bool,
  pub usage_count:  u64,
  /// Store-assigned.
  pub created_at:   DateTime<Utc>,
  /// Store-assigned; bumped by every update.
  pub updated_at:   DateTime<Utc>,
}

// ─── NewAssistantConfig ──────────────────────────────────────────────────────

/// Input to [`crate::store::ConfigStore::create`].
/// `id`, `created_at` and `updated_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssistantConfig {
  pub user_id:      String,
  pub workspace_id: String,
  pub name:         String,
  pub description:  Option<String>,
  pub industry:     String,
  pub llm_config:   LlmConfig,
  pub voice_id:     Option<String>,
  pub is_public:    bool,
  pub is_active:    bool,
  pub usage_count:  u64,
}

impl NewAssistantConfig {
  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
    self.voice_id = Some(voice_id.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tone_parse_matches_wire_names() {
    assert_eq!(Tone::parse("formal").unwrap(), Tone::Formal);
    assert!(matches!(Tone::parse("Formal"), Err(Error::UnknownTone(t)) if t == "Formal"));
    assert_eq!(Tone::Friendly.to_string(), "friendly");
  }
}
