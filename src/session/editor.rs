use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::api::{ApiError, ExecutionResult, LevelData, LevelKey, Row};
use crate::session::query_editor::QueryEditor;
use crate::session::resize::{LayoutResizer, SplitRatio};

/// How long the success banner stays up after a passing run.
pub const SUCCESS_NOTICE_DURATION: Duration = Duration::from_millis(3000);
pub const DEFAULT_PASS_MESSAGE: &str = "You passed the level! 🎉";
pub const LOADING_MESSAGE: &str = "Loading...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStatus {
    Idle,
    Executing { ticket: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    Normal,
    Fullscreen {
        instructions_visible: bool,
        results_visible: bool,
    },
}

/// Everything a single level view shows or edits. Created when the view
/// opens, dropped when the user navigates away.
pub struct EditorSession {
    pub key: LevelKey,
    pub level: Option<LevelData>,
    pub editor: QueryEditor,
    pub status: ExecutionStatus,
    pub rows: Vec<Row>,
    pub sql_error: Option<String>,
    /// Backend message for a run that did not pass. Shown under the
    /// results; the task text is left alone.
    pub verdict: Option<String>,
    pub has_run: bool,
    pub task_message: String,
    pub instructions_expanded: bool,
    pub hint_visible: bool,
    pub layout: LayoutMode,
    pub resizer: LayoutResizer,
    pub passed: bool,
    default_split: SplitRatio,
    notice_shown_at: Option<Instant>,
    next_ticket: u64,
}

impl EditorSession {
    pub fn new(key: LevelKey, default_split: SplitRatio) -> Self {
        Self {
            key,
            level: None,
            editor: QueryEditor::new(""),
            status: ExecutionStatus::Idle,
            rows: Vec::new(),
            sql_error: None,
            verdict: None,
            has_run: false,
            task_message: LOADING_MESSAGE.to_string(),
            instructions_expanded: true,
            hint_visible: false,
            layout: LayoutMode::Normal,
            resizer: LayoutResizer::new(default_split),
            passed: false,
            default_split,
            notice_shown_at: None,
            next_ticket: 1,
        }
    }

    pub fn apply_level(&mut self, result: Result<LevelData, ApiError>) {
        match result {
            Ok(level) => {
                self.editor.set_value(&level.initial_code);
                self.task_message = level.task.clone();
                self.level = Some(level);
            }
            Err(e) => {
                self.task_message = e.level_message();
            }
        }
    }

    pub fn is_executing(&self) -> bool {
        matches!(self.status, ExecutionStatus::Executing { .. })
    }

    /// Claim a ticket for a new run and return it with the query text.
    /// `None` while another run is still in flight.
    pub fn begin_execute(&mut self) -> Option<(u64, String)> {
        if self.is_executing() {
            return None;
        }
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.status = ExecutionStatus::Executing { ticket };
        self.sql_error = None;
        Some((ticket, self.editor.value().to_string()))
    }

    /// Fold a backend reply into the view. Replies for any ticket other
    /// than the one in flight are dropped; returns whether it was applied.
    pub fn apply_execution(
        &mut self,
        ticket: u64,
        result: Result<ExecutionResult, ApiError>,
        now: Instant,
    ) -> bool {
        match self.status {
            ExecutionStatus::Executing { ticket: current } if current == ticket => {}
            _ => {
                tracing::debug!(ticket, "dropping reply for a run that is no longer current");
                return false;
            }
        }
        self.status = ExecutionStatus::Idle;
        self.has_run = true;

        if let LayoutMode::Fullscreen {
            ref mut results_visible,
            ..
        } = self.layout
        {
            *results_visible = true;
        }

        match result {
            Ok(ExecutionResult::Error(message)) => {
                self.sql_error = Some(message);
                self.rows.clear();
                self.verdict = None;
            }
            Ok(ExecutionResult::Ran(outcome)) => {
                self.sql_error = None;
                self.rows = outcome.rows;
                if outcome.passed {
                    self.task_message = outcome
                        .message
                        .unwrap_or_else(|| DEFAULT_PASS_MESSAGE.to_string());
                    self.passed = true;
                    self.notice_shown_at = Some(now);
                    self.verdict = None;
                } else {
                    self.verdict = outcome.message;
                }
            }
            Err(e) => {
                self.sql_error = Some(e.execution_message());
                self.rows.clear();
                self.verdict = None;
            }
        }
        true
    }

    pub fn notice_visible(&self, now: Instant) -> bool {
        self.notice_shown_at
            .is_some_and(|shown| now.duration_since(shown) < SUCCESS_NOTICE_DURATION)
    }

    /// Any key or click hides the success banner early.
    pub fn dismiss_notice(&mut self) {
        self.notice_shown_at = None;
    }

    /// Clear the success banner once its window has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.notice_shown_at.is_some() && !self.notice_visible(now) {
            self.notice_shown_at = None;
        }
    }

    pub fn hint(&self) -> Option<&str> {
        self.level.as_ref().and_then(|l| l.hint.as_deref())
    }

    pub fn title(&self) -> Option<&str> {
        self.level
            .as_ref()
            .map(|l| l.title.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn toggle_hint(&mut self) {
        self.hint_visible = !self.hint_visible;
    }

    /// Collapse/expand the instructions in normal mode, show/hide the
    /// instructions panel in fullscreen.
    pub fn toggle_instructions(&mut self) {
        match self.layout {
            LayoutMode::Normal => self.instructions_expanded = !self.instructions_expanded,
            LayoutMode::Fullscreen {
                ref mut instructions_visible,
                ..
            } => *instructions_visible = !*instructions_visible,
        }
    }

    /// Fullscreen only. Hiding the results pane ends any divider drag.
    pub fn toggle_results_panel(&mut self) -> bool {
        let LayoutMode::Fullscreen {
            ref mut results_visible,
            ..
        } = self.layout
        else {
            return false;
        };
        *results_visible = !*results_visible;
        if !*results_visible {
            self.resizer.cancel();
        }
        true
    }

    pub fn is_fullscreen(&self) -> bool {
        matches!(self.layout, LayoutMode::Fullscreen { .. })
    }

    pub fn results_pane_visible(&self) -> bool {
        match self.layout {
            LayoutMode::Normal => true,
            LayoutMode::Fullscreen {
                results_visible, ..
            } => results_visible,
        }
    }

    /// Entering fullscreen starts with both side panels hidden and the
    /// default split.
    pub fn enter_fullscreen(&mut self) {
        self.layout = LayoutMode::Fullscreen {
            instructions_visible: false,
            results_visible: false,
        };
        self.resizer.reset(self.default_split);
    }

    pub fn exit_fullscreen(&mut self) {
        self.layout = LayoutMode::Normal;
        self.resizer.cancel();
    }

    pub fn toggle_fullscreen(&mut self) {
        if self.is_fullscreen() {
            self.exit_fullscreen();
        } else {
            self.enter_fullscreen();
        }
    }

    /// Divider press; only honoured in fullscreen with results showing.
    pub fn divider_pressed(&mut self, column: u16, on_divider: bool) -> bool {
        let enabled = self.is_fullscreen() && self.results_pane_visible();
        self.resizer.pointer_down(column, on_divider, enabled)
    }

    pub fn divider_dragged(&mut self, column: u16, container: Rect) -> bool {
        self.resizer.pointer_move(column, container)
    }

    pub fn pointer_released(&mut self, column: u16) {
        self.resizer.pointer_up(column);
    }
}
