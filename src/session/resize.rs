use ratatui::layout::Rect;

/// Neither pane may be narrower than this share of the split region.
pub const MIN_PANE_PERCENT: f64 = 20.0;

/// Editor share of the fullscreen split; the results pane gets the rest,
/// so the two always add up to 100.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRatio {
    editor: f64,
}

impl SplitRatio {
    /// Clamped into the allowed range.
    pub fn new(editor_percent: f64) -> Self {
        Self {
            editor: editor_percent.clamp(MIN_PANE_PERCENT, 100.0 - MIN_PANE_PERCENT),
        }
    }

    /// `None` when either pane would fall below the floor.
    pub fn try_new(editor_percent: f64) -> Option<Self> {
        let results = 100.0 - editor_percent;
        if !editor_percent.is_finite()
            || editor_percent < MIN_PANE_PERCENT
            || results < MIN_PANE_PERCENT
        {
            return None;
        }
        Some(Self {
            editor: editor_percent,
        })
    }

    pub fn editor_percent(&self) -> f64 {
        self.editor
    }

    pub fn results_percent(&self) -> f64 {
        100.0 - self.editor
    }

    /// Columns given to the editor out of `width`.
    pub fn editor_columns(&self, width: u16) -> u16 {
        ((f64::from(width) * self.editor / 100.0).round() as u16).min(width)
    }
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self::new(65.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { origin_column: u16 },
}

/// Divider drag between the editor and results panes.
#[derive(Clone, Debug)]
pub struct LayoutResizer {
    state: DragState,
    split: SplitRatio,
}

impl LayoutResizer {
    pub fn new(split: SplitRatio) -> Self {
        Self {
            state: DragState::Idle,
            split,
        }
    }

    pub fn split(&self) -> SplitRatio {
        self.split
    }

    pub fn reset(&mut self, split: SplitRatio) {
        self.state = DragState::Idle;
        self.split = split;
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start a drag when the press lands on the divider. `enabled` is false
    /// outside fullscreen or while the results pane is hidden.
    pub fn pointer_down(&mut self, column: u16, on_divider: bool, enabled: bool) -> bool {
        if !enabled || !on_divider {
            return false;
        }
        self.state = DragState::Dragging {
            origin_column: column,
        };
        true
    }

    /// Recompute the split from the pointer position inside `container`.
    /// Returns whether the split changed; positions that would squeeze a
    /// pane below the floor are ignored.
    pub fn pointer_move(&mut self, column: u16, container: Rect) -> bool {
        if !self.is_dragging() || container.width == 0 {
            return false;
        }
        let offset = f64::from(column.saturating_sub(container.x));
        let percent = offset / f64::from(container.width) * 100.0;
        match SplitRatio::try_new(percent) {
            Some(split) if split != self.split => {
                self.split = split;
                true
            }
            _ => false,
        }
    }

    /// End of a drag, wherever the pointer was released.
    pub fn pointer_up(&mut self, column: u16) {
        if let DragState::Dragging { origin_column } = self.state {
            tracing::debug!(
                from = origin_column,
                to = column,
                editor_percent = self.split.editor_percent(),
                "divider released"
            );
        }
        self.state = DragState::Idle;
    }

    /// Drop any drag in progress without a release event.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

impl Default for LayoutResizer {
    fn default() -> Self {
        Self::new(SplitRatio::default())
    }
}
