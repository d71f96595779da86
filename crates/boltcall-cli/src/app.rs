//! Application state machine and event dispatcher.

use std::{path::PathBuf, sync::Arc};

use boltcall_core::{assistant::AssistantConfig, store::ConfigPatch};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use uuid::Uuid;

use crate::{
  client::{ApiClient, NewConfigRequest},
  ui::config_detail,
  ui_state::UiState,
};

/// Industry used for records created from the list when no industry filter
/// is selected.
const FALLBACK_INDUSTRY: &str = "general";

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the record list.
  ConfigList,
  /// Focus on the detail pane.
  ConfigDetail,
}

/// What the single-line input is currently collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
  Normal,
  Filter,
  NewName,
}

// ─── Filtering ────────────────────────────────────────────────────────────────

/// Records matching `text` (case-insensitive substring of name or
/// description) and `industry` (exact). Empty text matches everything.
pub fn filter_configs<'a>(
  configs: &'a [AssistantConfig],
  text: &str,
  industry: Option<&str>,
) -> Vec<&'a AssistantConfig> {
  let needle = text.trim().to_lowercase();
  configs
    .iter()
    .filter(|c| industry.is_none_or(|i| c.industry == i))
    .filter(|c| {
      needle.is_empty()
        || c.name.to_lowercase().contains(&needle)
        || c
          .description
          .as_deref()
          .is_some_and(|d| d.to_lowercase().contains(&needle))
    })
    .collect()
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,
  pub input_mode: InputMode,

  /// Workspace whose records are listed.
  pub workspace_id: String,
  /// Owner recorded on records created from the TUI.
  pub user_id: String,

  /// Every active record in the workspace, as last fetched.
  pub configs: Vec<AssistantConfig>,

  /// Free-text filter applied to `configs`.
  pub filter: String,

  /// Name being typed for a new record.
  pub new_name: String,

  /// Cursor position within the *filtered* list.
  pub list_cursor: usize,

  /// Scroll offset within the detail pane.
  pub detail_scroll: usize,

  /// Id of the record shown in the detail pane.
  pub selected_id: Option<Uuid>,

  /// Armed by the first `d`; the second `d` on the same record deletes it.
  pub pending_delete: Option<Uuid>,

  /// Transient one-line message shown in the status bar.
  pub toast: String,

  pub ui: UiState,
  ui_path: Option<PathBuf>,

  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(
    client: ApiClient,
    workspace_id: String,
    user_id: String,
    ui: UiState,
    ui_path: Option<PathBuf>,
  ) -> Self {
    Self {
      screen: Screen::ConfigList,
      input_mode: InputMode::Normal,
      workspace_id,
      user_id,
      configs: Vec::new(),
      filter: String::new(),
      new_name: String::new(),
      list_cursor: 0,
      detail_scroll: 0,
      selected_id: None,
      pending_delete: None,
      toast: String::new(),
      ui,
      ui_path,
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Re-fetch every record in the workspace.
  pub async fn reload(&mut self) -> anyhow::Result<()> {
    self.toast = "Loading…".into();
    match self.client.list_workspace(&self.workspace_id).await {
      Ok(configs) => {
        self.configs = configs;
        self.clamp_cursor();
        if let Some(id) = self.selected_id
          && !self.configs.iter().any(|c| c.id == id)
        {
          self.selected_id = None;
          self.screen = Screen::ConfigList;
        }
        self.toast.clear();
        Ok(())
      }
      Err(e) => {
        tracing::warn!(error = %e, "failed to load configs");
        self.toast = format!("Error: {e}");
        Err(e)
      }
    }
  }

  /// Run a mutation; on success re-fetch the list and show `done`, on
  /// failure keep the current state and show the error.
  async fn mutate<F, T>(&mut self, op: F, done: impl FnOnce(T) -> String)
  where
    F: Future<Output = anyhow::Result<T>>,
  {
    match op.await {
      Ok(value) => {
        let msg = done(value);
        if self.reload().await.is_ok() {
          self.toast = msg;
        }
      }
      Err(e) => {
        tracing::warn!(error = %e, "mutation failed");
        self.toast = format!("Error: {e}");
      }
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  pub fn filtered_configs(&self) -> Vec<&AssistantConfig> {
    filter_configs(&self.configs, &self.filter, self.ui.industry_filter.as_deref())
  }

  /// The record under the list cursor in the filtered view, if any.
  pub fn cursor_config(&self) -> Option<&AssistantConfig> {
    self.filtered_configs().get(self.list_cursor).copied()
  }

  /// The record shown in the detail pane.
  pub fn selected_config(&self) -> Option<&AssistantConfig> {
    let id = self.selected_id?;
    self.configs.iter().find(|c| c.id == id)
  }

  /// Distinct industries of the loaded records, sorted.
  pub fn industries(&self) -> Vec<&str> {
    let mut industries: Vec<&str> =
      self.configs.iter().map(|c| c.industry.as_str()).collect();
    industries.sort_unstable();
    industries.dedup();
    industries
  }

  fn clamp_cursor(&mut self) {
    let len = self.filtered_configs().len();
    if self.list_cursor >= len {
      self.list_cursor = len.saturating_sub(1);
    }
  }

  // ── UI preferences ────────────────────────────────────────────────────────

  fn save_ui(&mut self) {
    let Some(path) = &self.ui_path else { return };
    if let Err(e) = self.ui.save(path) {
      tracing::warn!(error = %e, "failed to save UI state");
      self.toast = format!("Error: {e}");
    }
  }

  pub fn toggle_theme(&mut self) {
    self.ui.dark_mode = !self.ui.dark_mode;
    self.save_ui();
  }

  pub fn toggle_sidebar(&mut self) {
    self.ui.sidebar_collapsed = !self.ui.sidebar_collapsed;
    self.save_ui();
  }

  /// Advance the industry filter: all → first → … → last → all.
  pub fn cycle_industry(&mut self) {
    let industries = self.industries();
    let next = match &self.ui.industry_filter {
      None => industries.first().map(|s| s.to_string()),
      Some(current) => industries
        .iter()
        .position(|i| *i == current.as_str())
        .and_then(|pos| industries.get(pos + 1))
        .map(|s| s.to_string()),
    };
    self.ui.industry_filter = next;
    self.list_cursor = 0;
    self.save_ui();
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.input_mode {
      InputMode::Filter => {
        self.handle_filter_key(key);
        return Ok(true);
      }
      InputMode::NewName => {
        self.handle_new_name_key(key).await;
        return Ok(true);
      }
      InputMode::Normal => {}
    }

    if key.code != KeyCode::Char('d') {
      self.pending_delete = None;
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Char('/') => {
        self.input_mode = InputMode::Filter;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Char('n') => {
        self.input_mode = InputMode::NewName;
        self.new_name.clear();
      }
      KeyCode::Char('i') => self.cycle_industry(),
      KeyCode::Char('b') => self.toggle_sidebar(),
      KeyCode::Char('t') => self.toggle_theme(),
      KeyCode::Char('r') => {
        self.reload().await.ok();
      }

      KeyCode::Char('p') => self.toggle_public().await,
      KeyCode::Char('u') => self.record_usage().await,
      KeyCode::Char('d') => self.delete_current().await,

      _ => match self.screen {
        Screen::ConfigList => self.handle_list_key(key),
        Screen::ConfigDetail => self.handle_detail_key(key),
      },
    }
    Ok(true)
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.input_mode = InputMode::Normal;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.input_mode = InputMode::Normal;
        self.list_cursor = 0;
        let only = match self.filtered_configs().as_slice() {
          [only] => Some(only.id),
          _ => None,
        };
        if let Some(id) = only {
          self.open_detail(id);
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }

  async fn handle_new_name_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.input_mode = InputMode::Normal;
        self.new_name.clear();
      }
      KeyCode::Enter => {
        self.input_mode = InputMode::Normal;
        let name = std::mem::take(&mut self.new_name);
        if name.trim().is_empty() {
          self.toast = "Name must not be empty".into();
          return;
        }
        let request = NewConfigRequest {
          name,
          industry: self
            .ui
            .industry_filter
            .clone()
            .unwrap_or_else(|| FALLBACK_INDUSTRY.to_string()),
          workspace_id: self.workspace_id.clone(),
          user_id: self.user_id.clone(),
          description: None,
          voice_id: None,
          overrides: None,
        };
        let client = Arc::clone(&self.client);
        self
          .mutate(async move { client.create(&request).await }, |c| {
            format!("Created {}", c.name)
          })
          .await;
      }
      KeyCode::Backspace => {
        self.new_name.pop();
      }
      KeyCode::Char(c) => self.new_name.push(c),
      _ => {}
    }
  }

  fn handle_list_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_configs().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_config().map(|c| c.id) {
          self.open_detail(id);
        }
      }
      _ => {}
    }
  }

  fn handle_detail_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::ConfigList;
        self.selected_id = None;
      }
      KeyCode::Down | KeyCode::Char('j') => {
        let last = self
          .selected_config()
          .map_or(0, |c| config_detail::line_count(c).saturating_sub(1));
        self.detail_scroll = (self.detail_scroll + 1).min(last);
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }
      _ => {}
    }
  }

  fn open_detail(&mut self, id: Uuid) {
    self.selected_id = Some(id);
    self.detail_scroll = 0;
    self.screen = Screen::ConfigDetail;
  }

  /// Record the mutation targets: the detail record, else the cursor record.
  fn target(&self) -> Option<&AssistantConfig> {
    self.selected_config().or_else(|| self.cursor_config())
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn toggle_public(&mut self) {
    let Some((id, is_public)) = self.target().map(|c| (c.id, c.is_public)) else {
      return;
    };
    let patch = ConfigPatch { is_public: Some(!is_public), ..Default::default() };
    let client = Arc::clone(&self.client);
    self
      .mutate(async move { client.update(id, &patch).await }, |c| {
        if c.is_public { "Now public".into() } else { "Now private".into() }
      })
      .await;
  }

  async fn record_usage(&mut self) {
    let Some(id) = self.target().map(|c| c.id) else { return };
    let client = Arc::clone(&self.client);
    self
      .mutate(async move { client.record_usage(id).await }, |n| {
        format!("Usage count: {n}")
      })
      .await;
  }

  async fn delete_current(&mut self) {
    let Some((id, name)) = self.target().map(|c| (c.id, c.name.clone())) else {
      return;
    };
    if self.pending_delete != Some(id) {
      self.pending_delete = Some(id);
      self.toast = format!("Press d again to delete {name}");
      return;
    }
    self.pending_delete = None;
    let client = Arc::clone(&self.client);
    self
      .mutate(async move { client.delete(id).await }, |()| format!("Deleted {name}"))
      .await;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use boltcall_core::factory::create_configuration;
  use chrono::Utc;

  use crate::client::ApiConfig;

  fn config(name: &str, industry: &str, description: Option<&str>) -> AssistantConfig {
    let draft = create_configuration(name, industry, "ws", "u", None);
    let now = Utc::now();
    AssistantConfig {
      id: Uuid::new_v4(),
      user_id: draft.user_id,
      workspace_id: draft.workspace_id,
      name: draft.name,
      description: description.map(str::to_owned),
      industry: draft.industry,
      llm_config: draft.llm_config,
      voice_id: None,
      is_public: false,
      is_active: true,
      usage_count: 0,
      created_at: now,
      updated_at: now,
    }
  }

  fn sample() -> Vec<AssistantConfig> {
    vec![
      config("Front Desk", "dentist", Some("Main reception line")),
      config("After Hours", "dentist", None),
      config("Dispatch", "hvac", Some("Emergency FRONT line")),
    ]
  }

  fn app(ui_path: Option<PathBuf>) -> App {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://127.0.0.1:9".into(),
      username: String::new(),
      password: String::new(),
    })
    .unwrap();
    let mut app = App::new(client, "ws".into(), "u".into(), UiState::default(), ui_path);
    app.configs = sample();
    app
  }

  fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
  }

  #[test]
  fn filter_matches_name_or_description_case_insensitively() {
    let configs = sample();
    let names: Vec<_> = filter_configs(&configs, "front", None)
      .into_iter()
      .map(|c| c.name.as_str())
      .collect();
    assert_eq!(names, vec!["Front Desk", "Dispatch"]);
  }

  #[test]
  fn filter_by_industry() {
    let configs = sample();
    assert_eq!(filter_configs(&configs, "", Some("dentist")).len(), 2);
    assert_eq!(filter_configs(&configs, "front", Some("dentist")).len(), 1);
    assert!(filter_configs(&configs, "", Some("legal")).is_empty());
  }

  #[test]
  fn empty_filter_matches_all() {
    let configs = sample();
    assert_eq!(filter_configs(&configs, "   ", None).len(), 3);
  }

  #[test]
  fn cycle_industry_wraps_to_all() {
    let mut app = app(None);
    app.cycle_industry();
    assert_eq!(app.ui.industry_filter.as_deref(), Some("dentist"));
    app.cycle_industry();
    assert_eq!(app.ui.industry_filter.as_deref(), Some("hvac"));
    app.cycle_industry();
    assert_eq!(app.ui.industry_filter, None);
  }

  #[tokio::test]
  async fn typing_a_filter_narrows_the_list() {
    let mut app = app(None);
    for c in "/disp".chars() {
      assert!(app.handle_key(key(c)).await.unwrap());
    }
    assert_eq!(app.input_mode, InputMode::Filter);
    assert_eq!(app.filtered_configs().len(), 1);
    assert_eq!(app.cursor_config().map(|c| c.name.as_str()), Some("Dispatch"));
  }

  #[tokio::test]
  async fn preference_keys_persist_ui_state() {
    let path = std::env::temp_dir()
      .join(format!("boltcall-app-{}", Uuid::new_v4()))
      .join("ui.toml");
    let mut app = app(Some(path.clone()));

    app.handle_key(key('t')).await.unwrap();
    app.handle_key(key('b')).await.unwrap();
    app.handle_key(key('i')).await.unwrap();

    let saved = UiState::load(&path).unwrap();
    assert!(!saved.dark_mode);
    assert!(saved.sidebar_collapsed);
    assert_eq!(saved.industry_filter.as_deref(), Some("dentist"));
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
  }

  #[tokio::test]
  async fn failed_mutation_keeps_state_and_shows_toast() {
    let mut app = app(None);
    let before = app.configs.clone();
    app.handle_key(key('u')).await.unwrap();
    assert_eq!(app.configs, before);
    assert!(app.toast.starts_with("Error"), "toast: {}", app.toast);
  }

  #[tokio::test]
  async fn delete_needs_confirmation() {
    let mut app = app(None);
    app.handle_key(key('d')).await.unwrap();
    assert!(app.pending_delete.is_some());
    assert!(app.toast.contains("again"));
    app.handle_key(key('j')).await.unwrap();
    assert!(app.pending_delete.is_none());
  }

  #[tokio::test]
  async fn detail_scroll_stops_at_last_line() {
    let mut app = app(None);
    app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).await.unwrap();
    assert_eq!(app.screen, Screen::ConfigDetail);
    let last = config_detail::line_count(app.selected_config().unwrap()) - 1;

    for _ in 0..1000 {
      app.handle_key(key('j')).await.unwrap();
    }
    assert_eq!(app.detail_scroll, last);

    app.handle_key(key('k')).await.unwrap();
    assert_eq!(app.detail_scroll, last - 1);
  }

  #[tokio::test]
  async fn q_quits() {
    let mut app = app(None);
    assert!(!app.handle_key(key('q')).await.unwrap());
  }
}
