//! Built-in industry presets.
//!
//! Each preset is a partial behavior payload used as the starting point for
//! new assistant configurations. The table is static data; lookups of an
//! unknown industry return `None`.

use serde::{Deserialize, Serialize};

use crate::assistant::{ConversationFlow, IndustryContext, Tone};

/// A built-in template of default behavior for one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
  pub industry:          String,
  pub system_prompt:     String,
  pub industry_context:  IndustryContext,
  pub conversation_flow: ConversationFlow,
}

/// The prompt used when an industry has no preset.
pub fn fallback_system_prompt(industry: &str) -> String {
  format!("You are a professional AI assistant for {industry} services.")
}

/// Look up the preset for `industry`.
pub fn preset(industry: &str) -> Option<Preset> {
  TABLE
    .iter()
    .find(|p| p.key == industry)
    .map(PresetEntry::to_preset)
}

/// All industries with a preset, alphabetic.
pub fn industries() -> Vec<&'static str> {
  let mut keys: Vec<_> = TABLE.iter().map(|p| p.key).collect();
  keys.sort_unstable();
  keys
}

// ─── Table ───────────────────────────────────────────────────────────────────

struct PresetEntry {
  key:           &'static str,
  system_prompt: &'static str,
  business_type: &'static str,
  services:      &'static [&'static str],
  audience:      &'static str,
  tone:          Tone,
  language:      &'static str,
  greeting:      &'static str,
  questions:     &'static [&'static str],
  closings:      &'static [&'static str],
  triggers:      &'static [&'static str],
}

impl PresetEntry {
  fn to_preset(&self) -> Preset {
    Preset {
      industry:          self.key.to_owned(),
      system_prompt:     self.system_prompt.to_owned(),
      industry_context:  IndustryContext {
        business_type:   self.business_type.to_owned(),
        services:        owned(self.services),
        target_audience: self.audience.to_owned(),
        tone:            self.tone,
        language:        self.language.to_owned(),
      },
      conversation_flow: ConversationFlow {
        greeting:                self.greeting.to_owned(),
        qualification_questions: owned(self.questions),
        closing_statements:      owned(self.closings),
        escalation_triggers:     owned(self.triggers),
      },
    }
  }
}

fn owned(xs: &[&str]) -> Vec<String> {
  xs.iter().map(|s| (*s).to_owned()).collect()
}

const TABLE: &[PresetEntry] = &[
  PresetEntry {
    key:           "dentist",
    system_prompt: "You are a friendly and professional receptionist for a \
                    dental practice. Help callers book cleanings, check-ups \
                    and emergency visits, answer questions about services and \
                    insurance, and collect their name, phone number and \
                    preferred appointment time.",
    business_type: "Dental Practice",
    services:      &[
      "Cleanings and check-ups",
      "Fillings",
      "Crowns and bridges",
      "Teeth whitening",
      "Emergency dental care",
    ],
    audience:      "Patients of all ages looking for dental care",
    tone:          Tone::Friendly,
    language:      "en-US",
    greeting:      "Thank you for calling! How can we help you with your \
                    smile today?",
    questions:     &[
      "Are you a new or existing patient?",
      "What is the reason for your visit?",
      "Are you experiencing any pain right now?",
      "Which insurance provider do you have?",
      "What days and times work best for you?",
    ],
    closings:      &[
      "We'll send you a confirmation text shortly.",
      "Please arrive ten minutes early to complete your paperwork.",
    ],
    triggers:      &["severe pain", "bleeding", "swelling", "knocked out tooth"],
  },
  PresetEntry {
    key:           "hvac",
    system_prompt: "You are a professional dispatcher for a heating, \
                    ventilation and air-conditioning company. Qualify service \
                    requests, identify emergencies, and schedule technician \
                    visits.",
    business_type: "HVAC Services",
    services:      &[
      "AC repair",
      "Furnace repair",
      "System installation",
      "Maintenance plans",
      "Duct cleaning",
    ],
    audience:      "Homeowners and property managers",
    tone:          Tone::Professional,
    language:      "en-US",
    greeting:      "Thanks for calling! Are you calling about heating or \
                    cooling today?",
    questions:     &[
      "What problem are you seeing with your system?",
      "How old is the unit?",
      "Is this a home or a business?",
      "What is the service address?",
      "When would you like a technician to come out?",
    ],
    closings:      &[
      "A technician will call you before arriving.",
      "You'll receive a confirmation with your service window.",
    ],
    triggers:      &["gas smell", "carbon monoxide", "no heat", "smoke"],
  },
  PresetEntry {
    key:           "legal",
    system_prompt: "You are a professional intake specialist for a law firm. \
                    Gather the caller's contact details and a brief summary \
                    of their matter, never give legal advice, and schedule a \
                    consultation with an attorney.",
    business_type: "Law Firm",
    services:      &[
      "Personal injury",
      "Family law",
      "Estate planning",
      "Criminal defense",
      "Business law",
    ],
    audience:      "Individuals and businesses seeking legal representation",
    tone:          Tone::Formal,
    language:      "en-US",
    greeting:      "Thank you for calling. How may we assist you with your \
                    legal matter?",
    questions:     &[
      "What type of legal matter are you calling about?",
      "When did the incident or issue occur?",
      "Have you spoken with another attorney about this?",
      "Are there any upcoming court dates or deadlines?",
    ],
    closings:      &[
      "An attorney will review your information and contact you.",
      "Please gather any documents related to your matter before the \
       consultation.",
    ],
    triggers:      &["arrested", "court date tomorrow", "restraining order"],
  },
  PresetEntry {
    key:           "plumbing",
    system_prompt: "You are a helpful dispatcher for a plumbing company. \
                    Identify urgent leaks, collect the service address and \
                    book a plumber.",
    business_type: "Plumbing Services",
    services:      &[
      "Leak repair",
      "Drain cleaning",
      "Water heater service",
      "Pipe replacement",
      "Fixture installation",
    ],
    audience:      "Homeowners, landlords and small businesses",
    tone:          Tone::Friendly,
    language:      "en-US",
    greeting:      "Thanks for calling! What plumbing issue can we help with?",
    questions:     &[
      "Is water actively leaking right now?",
      "Where in the property is the problem?",
      "Have you shut off the water supply?",
      "What is the service address?",
    ],
    closings:      &[
      "A plumber is on the way; we'll text you their arrival time.",
    ],
    triggers:      &["flooding", "burst pipe", "sewage backup"],
  },
  PresetEntry {
    key:           "real_estate",
    system_prompt: "You are a professional assistant for a real estate \
                    agency. Qualify buyers and sellers, capture their budget \
                    and timeline, and book showings or listing consultations.",
    business_type: "Real Estate Agency",
    services:      &[
      "Home buying",
      "Home selling",
      "Property valuation",
      "Rental management",
    ],
    audience:      "Home buyers, sellers and investors",
    tone:          Tone::Professional,
    language:      "en-US",
    greeting:      "Thank you for calling! Are you looking to buy, sell or \
                    rent?",
    questions:     &[
      "Which area are you interested in?",
      "What is your budget range?",
      "Are you pre-approved for a mortgage?",
      "What is your timeline for moving?",
    ],
    closings:      &[
      "One of our agents will reach out to schedule a showing.",
    ],
    triggers:      &["offer deadline", "closing today"],
  },
  PresetEntry {
    key:           "medical_spa",
    system_prompt: "You are a warm and knowledgeable receptionist for a \
                    medical spa. Describe treatments accurately, book \
                    consultations, and never make medical claims.",
    business_type: "Medical Spa",
    services:      &[
      "Botox and fillers",
      "Laser hair removal",
      "Facials",
      "Body contouring",
    ],
    audience:      "Adults interested in aesthetic treatments",
    tone:          Tone::Friendly,
    language:      "en-US",
    greeting:      "Hi, thanks for calling! Which treatment are you \
                    interested in?",
    questions:     &[
      "Have you had this treatment before?",
      "Do you have any allergies or medical conditions we should know about?",
      "What days work best for a consultation?",
    ],
    closings:      &[
      "We'll send you pre-appointment instructions by email.",
    ],
    triggers:      &["allergic reaction", "infection", "complication"],
  },
  PresetEntry {
    key:           "roofing",
    system_prompt: "You are a professional assistant for a roofing \
                    contractor. Capture damage details, insurance status and \
                    the property address, and schedule a free inspection.",
    business_type: "Roofing Contractor",
    services:      &[
      "Roof inspection",
      "Roof repair",
      "Roof replacement",
      "Storm damage restoration",
      "Gutter installation",
    ],
    audience:      "Homeowners and commercial property owners",
    tone:          Tone::Professional,
    language:      "en-US",
    greeting:      "Thanks for calling! Are you dealing with roof damage or \
                    planning a project?",
    questions:     &[
      "Is there an active leak?",
      "Was the damage caused by a recent storm?",
      "Have you filed an insurance claim?",
      "How old is the roof?",
    ],
    closings:      &[
      "An inspector will contact you to confirm the visit.",
    ],
    triggers:      &["active leak", "tree on roof", "ceiling collapse"],
  },
  PresetEntry {
    key:           "auto_repair",
    system_prompt: "You are a friendly service advisor for an auto repair \
                    shop. Collect vehicle details and symptoms and book a \
                    diagnostic appointment.",
    business_type: "Auto Repair Shop",
    services:      &[
      "Oil changes",
      "Brake service",
      "Engine diagnostics",
      "Tire rotation",
      "Transmission repair",
    ],
    audience:      "Vehicle owners",
    tone:          Tone::Casual,
    language:      "en-US",
    greeting:      "Hey, thanks for calling! What's going on with your \
                    vehicle?",
    questions:     &[
      "What is the year, make and model?",
      "What symptoms are you noticing?",
      "Is the vehicle drivable?",
      "When can you drop it off?",
    ],
    closings:      &[
      "We'll call you once the diagnosis is done.",
    ],
    triggers:      &["brakes failed", "accident", "smoke from engine"],
  },
];

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_industry_resolves() {
    for key in industries() {
      let p = preset(key).expect("listed industry has a preset");
      assert_eq!(p.industry, key);
      assert!(!p.system_prompt.is_empty());
      assert!(!p.conversation_flow.greeting.is_empty());
      assert!(!p.conversation_flow.escalation_triggers.is_empty());
    }
  }

  #[test]
  fn industries_are_sorted_and_unique() {
    let keys = industries();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(keys, sorted);
  }

  #[test]
  fn unknown_industry_has_no_preset() {
    assert!(preset("bakery").is_none());
    assert!(preset("").is_none());
  }

  #[test]
  fn fallback_prompt_names_the_industry() {
    assert_eq!(
      fallback_system_prompt("bakery"),
      "You are a professional AI assistant for bakery services."
    );
  }

  #[test]
  fn dentist_preset_is_friendly() {
    let p = preset("dentist").unwrap();
    assert_eq!(p.industry_context.tone, Tone::Friendly);
    assert_eq!(p.industry_context.business_type, "Dental Practice");
  }
}
