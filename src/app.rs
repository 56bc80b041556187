//! LingoFix desktop window: egui/eframe application.
//!
//! # Architecture
//!
//! [`LingoFixApp`] is the top-level [`eframe::App`].  It owns the text the
//! user is typing and handles to the background services:
//!
//! * `pipeline`: [`CorrectionPipeline`], run on the tokio runtime for each
//!   submission; results land in the [`SharedState`] the UI reads each frame.
//! * `speech`: [`SpeechBridge`], run on the tokio runtime for each Listen
//!   click; its [`SpeechState`] drives the Listen button.
//!
//! # Layout
//!
//! | Area | Content |
//! |------|---------|
//! | Left panel | History (most recent first), Clear button |
//! | Top | Sentence input + Correct button, error banner |
//! | Centre | Active result: original, corrected sentence, Listen / Copy, fixes, translations, explanation |

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use eframe::egui;

use crate::config::UiConfig;
use crate::history::HistoryItem;
use crate::pipeline::{lock_state, CorrectionPipeline, SharedState, SubmitOutcome};
use crate::speech::{SharedSpeechState, SpeechBridge, SpeechGenerationError, SpeechState};

/// Characters of the original sentence shown in a history row.
const PREVIEW_CHARS: usize = 40;

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 80, 60);
const ACCENT_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 160, 110);

// ---------------------------------------------------------------------------
// UiAction
// ---------------------------------------------------------------------------

/// Something the user asked for during this frame, applied after rendering.
#[derive(Debug, Clone, PartialEq)]
enum UiAction {
    Submit,
    Select(String),
    ClearHistory,
    DismissError,
    Listen(String),
}

// ---------------------------------------------------------------------------
// Frame snapshot
// ---------------------------------------------------------------------------

/// Copy of the shared state taken once per frame so the lock is not held
/// while widgets are drawn.
struct Snapshot {
    rows: Vec<HistoryRow>,
    active: Option<HistoryItem>,
    is_loading: bool,
    error_message: Option<String>,
}

struct HistoryRow {
    id: String,
    preview: String,
    time: String,
}

impl Snapshot {
    fn take(state: &SharedState) -> Self {
        let st = lock_state(state);
        Self {
            rows: st
                .history
                .items()
                .iter()
                .map(|item| HistoryRow {
                    id: item.id.clone(),
                    preview: preview(&item.original_sentence, PREVIEW_CHARS),
                    time: format_time(item.timestamp_millis),
                })
                .collect(),
            active: st.history.active().cloned(),
            is_loading: st.is_loading,
            error_message: st.error_message.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// LingoFixApp
// ---------------------------------------------------------------------------

/// eframe application.
pub struct LingoFixApp {
    state: SharedState,
    pipeline: Arc<CorrectionPipeline>,
    speech: Arc<SpeechBridge>,
    speech_state: SharedSpeechState,
    /// Last Listen failure; shown next to the Listen button only.
    speech_error: Arc<Mutex<Option<String>>>,
    /// Sentence of the last successful submission, until the next frame
    /// clears it from the input box.
    completed_input: Arc<Mutex<Option<String>>>,
    runtime: tokio::runtime::Handle,

    /// Text in the input box.
    input: String,
    show_explanation: bool,
}

impl LingoFixApp {
    /// Create the app.
    ///
    /// * `pipeline`: correction pipeline; its state is what the UI renders.
    /// * `speech`: speech bridge for the Listen button.
    /// * `runtime`: handle of the tokio runtime background work runs on.
    pub fn new(
        pipeline: Arc<CorrectionPipeline>,
        speech: Arc<SpeechBridge>,
        runtime: tokio::runtime::Handle,
        ui: &UiConfig,
    ) -> Self {
        Self {
            state: Arc::clone(pipeline.state()),
            speech_state: speech.shared_state(),
            pipeline,
            speech,
            speech_error: Arc::new(Mutex::new(None)),
            completed_input: Arc::new(Mutex::new(None)),
            runtime,
            input: String::new(),
            show_explanation: ui.show_explanation,
        }
    }

    fn speech_state(&self) -> SpeechState {
        *self
            .speech_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_speech_error(&self, message: Option<String>) {
        *self
            .speech_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = message;
    }

    fn speech_error(&self) -> Option<String> {
        self.speech_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn apply(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::Submit => self.spawn_submit(ctx),
            UiAction::Select(id) => {
                if self.pipeline.select(&id) {
                    self.set_speech_error(None);
                }
            }
            UiAction::ClearHistory => {
                self.pipeline.clear_history();
                self.set_speech_error(None);
            }
            UiAction::DismissError => self.pipeline.dismiss_error(),
            UiAction::Listen(text) => self.spawn_listen(text, ctx),
        }
    }

    /// Run one submission on the runtime; repaint when it resolves.
    fn spawn_submit(&mut self, ctx: &egui::Context) {
        if self.input.trim().is_empty() {
            return;
        }
        let pipeline = Arc::clone(&self.pipeline);
        let sentence = self.input.clone();
        let completed = Arc::clone(&self.completed_input);
        let ctx = ctx.clone();
        self.set_speech_error(None);

        self.runtime.spawn(async move {
            let outcome = pipeline.submit(&sentence).await;
            log::debug!("ui: submission finished: {outcome:?}");
            record_completion(&completed, sentence, &outcome);
            ctx.request_repaint();
        });
    }

    /// Speak `text` on the runtime; failures go to the speech error slot.
    fn spawn_listen(&mut self, text: String, ctx: &egui::Context) {
        let speech = Arc::clone(&self.speech);
        let slot = Arc::clone(&self.speech_error);
        let ctx = ctx.clone();
        self.set_speech_error(None);

        self.runtime.spawn(async move {
            let message = match speech.speak(&text).await {
                Ok(()) | Err(SpeechGenerationError::Busy) => None,
                Err(e) => Some(e.user_message().to_string()),
            };
            *slot.lock().unwrap_or_else(PoisonError::into_inner) = message;
            ctx.request_repaint();
        });
    }

    // ── Panels ───────────────────────────────────────────────────────────

    /// History list with selection and a Clear button.
    fn draw_history(&self, ui: &mut egui::Ui, snapshot: &Snapshot) -> Option<UiAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading("History");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!snapshot.rows.is_empty(), egui::Button::new("Clear"))
                    .clicked()
                {
                    action = Some(UiAction::ClearHistory);
                }
            });
        });
        ui.separator();

        if snapshot.rows.is_empty() {
            ui.label(egui::RichText::new("No corrections yet.").weak());
            return action;
        }

        let active_id = snapshot.active.as_ref().map(|item| item.id.as_str());
        egui::ScrollArea::vertical().show(ui, |ui| {
            for row in &snapshot.rows {
                let selected = active_id == Some(row.id.as_str());
                let text = format!("{}  {}", row.time, row.preview);
                if ui.selectable_label(selected, text).clicked() && !selected {
                    action = Some(UiAction::Select(row.id.clone()));
                }
            }
        });

        action
    }

    /// Input line, Correct button and the error banner.
    fn draw_input(&mut self, ui: &mut egui::Ui, snapshot: &Snapshot) -> Option<UiAction> {
        let mut action = None;
        let can_submit = !snapshot.is_loading && !self.input.trim().is_empty();

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let button_width = 96.0;
            let edit = egui::TextEdit::singleline(&mut self.input)
                .hint_text("Type an English sentence...")
                .desired_width(ui.available_width() - button_width);
            let response = ui.add_enabled(!snapshot.is_loading, edit);

            let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .add_enabled(can_submit, egui::Button::new("Correct"))
                .clicked();

            if (enter || clicked) && can_submit {
                action = Some(UiAction::Submit);
            }
        });

        if snapshot.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Correcting...");
            });
        }

        if let Some(message) = &snapshot.error_message {
            ui.add_space(4.0);
            egui::Frame::new()
                .stroke(egui::Stroke::new(1.0, ERROR_COLOR))
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(egui::Margin::same(6))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(message.as_str()).color(ERROR_COLOR));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("x").clicked() {
                                action = Some(UiAction::DismissError);
                            }
                        });
                    });
                });
        }
        ui.add_space(6.0);

        action
    }

    /// The active result.
    fn draw_result(
        &self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        item: &HistoryItem,
    ) -> Option<UiAction> {
        let mut action = None;
        let result = &item.result;
        let speech_state = self.speech_state();

        ui.label(egui::RichText::new(item.original_sentence.as_str()).weak().italics());
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(result.corrected_sentence.as_str())
                .strong()
                .size(20.0)
                .color(ACCENT_COLOR),
        );

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!speech_state.is_busy(), egui::Button::new(speech_state.label()))
                .clicked()
            {
                action = Some(UiAction::Listen(result.corrected_sentence.clone()));
            }
            if ui.button("Copy").clicked() {
                ctx.copy_text(result.corrected_sentence.clone());
            }
            if let Some(message) = self.speech_error() {
                ui.label(egui::RichText::new(message).color(ERROR_COLOR).small());
            }
        });

        ui.add_space(10.0);
        ui.heading("Fixes");
        if result.corrections.is_empty() {
            ui.label(egui::RichText::new("No changes needed.").weak());
        }
        for fix in &result.corrections {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(fix.original.as_str()).strikethrough());
                ui.label("→");
                ui.label(egui::RichText::new(fix.fixed.as_str()).strong());
            });
            ui.label(egui::RichText::new(fix.reason.as_str()).weak().small());
            ui.add_space(2.0);
        }

        ui.add_space(10.0);
        ui.heading("Translations");
        egui::Grid::new("translations")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                let t = &result.translations;
                let rows = [
                    ("Telugu", Some(&t.telugu)),
                    ("Hindi", Some(&t.hindi)),
                    ("Marathi", t.marathi.as_ref()),
                    ("Kannada", t.kannada.as_ref()),
                ];
                for (language, text) in rows {
                    if let Some(text) = text {
                        ui.label(egui::RichText::new(language).weak());
                        ui.label(text.as_str());
                        ui.end_row();
                    }
                }
            });

        if self.show_explanation && !result.explanation.is_empty() {
            ui.add_space(10.0);
            ui.heading("Language Tip");
            ui.label(result.explanation.as_str());
        }

        action
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// First `max` characters of `text`, with an ellipsis when cut.
fn preview(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Remember `sentence` for the input box if the submission succeeded.
fn record_completion(slot: &Mutex<Option<String>>, sentence: String, outcome: &SubmitOutcome) {
    if matches!(outcome, SubmitOutcome::Completed(_)) {
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(sentence);
    }
}

/// Empty `input` if it still holds the sentence that just completed.
///
/// Text typed since the submission is kept. The slot is drained either way.
fn take_completed_input(slot: &Mutex<Option<String>>, input: &mut String) {
    let completed = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    if completed.is_some_and(|sentence| sentence == *input) {
        input.clear();
    }
}

/// Local `HH:MM` for a Unix-millisecond timestamp.
fn format_time(timestamp_millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_millis)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%H:%M")
                .to_string()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for LingoFixApp {
    /// Called every frame by eframe.  Snapshots shared state, renders, then
    /// applies whatever the user clicked.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        take_completed_input(&self.completed_input, &mut self.input);
        let snapshot = Snapshot::take(&self.state);
        let mut actions: Vec<UiAction> = Vec::new();

        // Background work reports through shared state; keep polling while
        // anything is in flight.
        if snapshot.is_loading || self.speech_state().is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::SidePanel::left("history")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                actions.extend(self.draw_history(ui, &snapshot));
            });

        egui::TopBottomPanel::top("input").show(ctx, |ui| {
            actions.extend(self.draw_input(ui, &snapshot));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match &snapshot.active {
                Some(item) => actions.extend(self.draw_result(ui, ctx, item)),
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            egui::RichText::new("Corrections and translations appear here.")
                                .weak(),
                        );
                    });
                }
            });
        });

        for action in actions {
            self.apply(action, ctx);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("LingoFix window closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_text() {
        assert_eq!(preview("he go to market", 40), "he go to market");
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        assert_eq!(preview("నమస్కారం", 3), "నమస...");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
    }

    #[test]
    fn format_time_is_hh_mm() {
        let text = format_time(1_700_000_000_000);
        assert_eq!(text.len(), 5);
        assert_eq!(&text[2..3], ":");
    }

    #[test]
    fn completed_submission_clears_input() {
        let slot = Mutex::new(None);
        let mut input = String::from("he go to market yesterday");

        record_completion(
            &slot,
            input.clone(),
            &SubmitOutcome::Completed("id-1".into()),
        );
        take_completed_input(&slot, &mut input);

        assert!(input.is_empty());
        assert!(slot.lock().unwrap().is_none());
    }

    #[test]
    fn failed_submission_keeps_input() {
        let slot = Mutex::new(None);
        let mut input = String::from("he go to market yesterday");

        record_completion(&slot, input.clone(), &SubmitOutcome::Failed("boom".into()));
        record_completion(&slot, input.clone(), &SubmitOutcome::Busy);
        take_completed_input(&slot, &mut input);

        assert_eq!(input, "he go to market yesterday");
    }

    #[test]
    fn edited_input_is_not_cleared() {
        let slot = Mutex::new(None);
        let mut input = String::from("she walk home");

        record_completion(
            &slot,
            "he go to market".into(),
            &SubmitOutcome::Completed("id-1".into()),
        );
        take_completed_input(&slot, &mut input);

        assert_eq!(input, "she walk home");
        assert!(slot.lock().unwrap().is_none());
    }
}
