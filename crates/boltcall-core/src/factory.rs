//! Configuration factory — builds new drafts from a preset plus overrides.
//!
//! Overrides are partial at every level: a patch leaf that is `Some` replaces
//! the base value and a `None` leaf keeps it, so overriding one field of a
//! nested block never drops its siblings.

use serde::{Deserialize, Serialize};

use crate::{
  assistant::{
    ConversationFlow, Faq, IndustryContext, Integrations, KnowledgeBase,
    LlmConfig, NewAssistantConfig, Tone,
  },
  preset::{fallback_system_prompt, preset},
};

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;

// ─── Patch types ─────────────────────────────────────────────────────────────

/// Partial [`LlmConfig`]; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfigPatch {
  pub model:             Option<String>,
  pub temperature:       Option<f32>,
  pub max_tokens:        Option<u32>,
  pub system_prompt:     Option<String>,
  pub instructions:      Option<String>,
  pub industry_context:  Option<IndustryContextPatch>,
  pub conversation_flow: Option<ConversationFlowPatch>,
  pub knowledge_base:    Option<KnowledgeBasePatch>,
  pub integrations:      Option<IntegrationsPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndustryContextPatch {
  pub business_type:   Option<String>,
  pub services:        Option<Vec<String>>,
  pub target_audience: Option<String>,
  pub tone:            Option<Tone>,
  pub language:        Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationFlowPatch {
  pub greeting:                Option<String>,
  pub qualification_questions: Option<Vec<String>>,
  pub closing_statements:      Option<Vec<String>>,
  pub escalation_triggers:     Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBasePatch {
  pub faqs:           Option<Vec<Faq>>,
  pub policies:       Option<Vec<String>>,
  pub business_hours: Option<String>,
  pub pricing_notes:  Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationsPatch {
  pub calendar_booking:    Option<bool>,
  pub crm_sync:            Option<bool>,
  pub sms_notifications:   Option<bool>,
  pub email_notifications: Option<bool>,
  pub call_transfer:       Option<bool>,
}

fn set<T>(slot: &mut T, value: Option<T>) {
  if let Some(v) = value {
    *slot = v;
  }
}

fn set_opt<T>(slot: &mut Option<T>, value: Option<T>) {
  if value.is_some() {
    *slot = value;
  }
}

impl IndustryContextPatch {
  pub fn apply_to(self, base: &mut IndustryContext) {
    set(&mut base.business_type, self.business_type);
    set(&mut base.services, self.services);
    set(&mut base.target_audience, self.target_audience);
    set(&mut base.tone, self.tone);
    set(&mut base.language, self.language);
  }
}

impl ConversationFlowPatch {
  pub fn apply_to(self, base: &mut ConversationFlow) {
    set(&mut base.greeting, self.greeting);
    set(&mut base.qualification_questions, self.qualification_questions);
    set(&mut base.closing_statements, self.closing_statements);
    set(&mut base.escalation_triggers, self.escalation_triggers);
  }
}

impl KnowledgeBasePatch {
  pub fn apply_to(self, base: &mut KnowledgeBase) {
    set(&mut base.faqs, self.faqs);
    set(&mut base.policies, self.policies);
    set_opt(&mut base.business_hours, self.business_hours);
    set_opt(&mut base.pricing_notes, self.pricing_notes);
  }
}

impl IntegrationsPatch {
  pub fn apply_to(self, base: &mut Integrations) {
    set(&mut base.calendar_booking, self.calendar_booking);
    set(&mut base.crm_sync, self.crm_sync);
    set(&mut base.sms_notifications, self.sms_notifications);
    set(&mut base.email_notifications, self.email_notifications);
    set(&mut base.call_transfer, self.call_transfer);
  }
}

impl LlmConfigPatch {
  /// Deep-merge this patch into `base`. A nested patch on an absent block
  /// fills the block in from its defaults first.
  pub fn apply_to(self, base: &mut LlmConfig) {
    set(&mut base.model, self.model);
    set(&mut base.temperature, self.temperature);
    set(&mut base.max_tokens, self.max_tokens);
    set(&mut base.system_prompt, self.system_prompt);
    set_opt(&mut base.instructions, self.instructions);

    if let Some(p) = self.industry_context {
      p.apply_to(base.industry_context.get_or_insert_with(Default::default));
    }
    if let Some(p) = self.conversation_flow {
      p.apply_to(base.conversation_flow.get_or_insert_with(Default::default));
    }
    if let Some(p) = self.knowledge_base {
      p.apply_to(base.knowledge_base.get_or_insert_with(Default::default));
    }
    if let Some(p) = self.integrations {
      p.apply_to(base.integrations.get_or_insert_with(Default::default));
    }
  }
}

// ─── Factory ─────────────────────────────────────────────────────────────────

/// The behavior payload a new configuration for `industry` starts from.
pub fn base_llm_config(industry: &str) -> LlmConfig {
  let preset = preset(industry);
  LlmConfig {
    model:             DEFAULT_MODEL.to_owned(),
    temperature:       DEFAULT_TEMPERATURE,
    max_tokens:        DEFAULT_MAX_TOKENS,
    system_prompt:     preset
      .as_ref()
      .map(|p| p.system_prompt.clone())
      .unwrap_or_else(|| fallback_system_prompt(industry)),
    instructions:      None,
    industry_context:  preset.as_ref().map(|p| p.industry_context.clone()),
    conversation_flow: preset.map(|p| p.conversation_flow),
    knowledge_base:    None,
    integrations:      None,
  }
}

/// Build a draft configuration from the preset for `industry` with
/// `overrides` deep-merged on top.
///
/// Drafts are always active, private and unused.
pub fn create_configuration(
  name: impl Into<String>,
  industry: impl Into<String>,
  workspace_id: impl Into<String>,
  user_id: impl Into<String>,
  overrides: Option<LlmConfigPatch>,
) -> NewAssistantConfig {
  let industry = industry.into();
  let mut llm_config = base_llm_config(&industry);
  if let Some(patch) = overrides {
    patch.apply_to(&mut llm_config);
  }

  NewAssistantConfig {
    user_id: user_id.into(),
    workspace_id: workspace_id.into(),
    name: name.into(),
    description: None,
    industry,
    llm_config,
    voice_id: None,
    is_public: false,
    is_active: true,
    usage_count: 0,
  }
}
