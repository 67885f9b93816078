use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

use crate::session::editor::{EditorSession, LayoutMode};
use crate::ui::components::instructions_panel;

/// Width of the instructions column next to the fullscreen editor.
pub const FULLSCREEN_INSTRUCTIONS_WIDTH: u16 = 32;
/// Editor share of the body in normal mode.
const NORMAL_EDITOR_PERCENT: u16 = 55;
const HEADER_HEIGHT: u16 = 4;
/// Printed in front of the level indicator.
pub const INDICATOR_LABEL: &str = " Level ";
const NOTICE_HEIGHT: u16 = 3;
const MIN_EDITOR_HEIGHT: u16 = 5;

/// Screen regions of the level view. Computed from the terminal area and
/// the session, both for drawing and for mouse hit-testing, so the two
/// always agree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    pub header: Rect,
    pub notice: Option<Rect>,
    pub instructions: Option<Rect>,
    pub editor: Rect,
    pub results: Option<Rect>,
    /// Region shared by editor and results in fullscreen; the divider
    /// drag measures against it.
    pub split_region: Option<Rect>,
    pub divider: Option<Rect>,
    pub footer: Rect,
}

impl LevelLayout {
    pub fn new(area: Rect, session: &EditorSession, notice_visible: bool, footer_height: u16) -> Self {
        let notice_height = if notice_visible { NOTICE_HEIGHT } else { 0 };
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(notice_height),
                Constraint::Min(MIN_EDITOR_HEIGHT),
                Constraint::Length(footer_height),
            ])
            .split(area);

        let header = vertical[0];
        let notice = notice_visible.then_some(vertical[1]);
        let body = vertical[2];
        let footer = vertical[3];

        if session.is_fullscreen() {
            Self::fullscreen(header, notice, body, footer, session)
        } else {
            Self::normal(header, notice, body, footer, session)
        }
    }

    fn normal(header: Rect, notice: Option<Rect>, body: Rect, footer: Rect, session: &EditorSession) -> Self {
        // Instructions take what they need, but never starve the editor.
        let wanted = instructions_panel::required_height(session, body.width);
        let max = body.height.saturating_sub(MIN_EDITOR_HEIGHT).max(3);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(wanted.min(max)), Constraint::Min(0)])
            .split(body);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(NORMAL_EDITOR_PERCENT),
                Constraint::Percentage(100 - NORMAL_EDITOR_PERCENT),
            ])
            .split(rows[1]);

        Self {
            header,
            notice,
            instructions: Some(rows[0]),
            editor: columns[0],
            results: Some(columns[1]),
            split_region: None,
            divider: None,
            footer,
        }
    }

    fn fullscreen(header: Rect, notice: Option<Rect>, body: Rect, footer: Rect, session: &EditorSession) -> Self {
        let instructions_visible = matches!(
            session.layout,
            LayoutMode::Fullscreen {
                instructions_visible: true,
                ..
            }
        );

        let (instructions, region) = if instructions_visible {
            let width = FULLSCREEN_INSTRUCTIONS_WIDTH.min(body.width / 2);
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(width), Constraint::Min(0)])
                .split(body);
            (Some(cols[0]), cols[1])
        } else {
            (None, body)
        };

        if !session.results_pane_visible() || region.width < 3 {
            return Self {
                header,
                notice,
                instructions,
                editor: region,
                results: None,
                split_region: None,
                divider: None,
                footer,
            };
        }

        let editor_width = session
            .resizer
            .split()
            .editor_columns(region.width)
            .clamp(1, region.width - 2);
        let editor = Rect::new(region.x, region.y, editor_width, region.height);
        let divider = Rect::new(region.x + editor_width, region.y, 1, region.height);
        let results = Rect::new(
            divider.x + 1,
            region.y,
            region.width - editor_width - 1,
            region.height,
        );

        Self {
            header,
            notice,
            instructions,
            editor,
            results: Some(results),
            split_region: Some(region),
            divider: Some(divider),
            footer,
        }
    }

    /// Row of the header holding the level indicator, after its label.
    pub fn indicator_area(&self) -> Rect {
        let offset = (INDICATOR_LABEL.len() as u16).min(self.header.width);
        let row = self.header.y + 2;
        if row >= self.header.y + self.header.height {
            return Rect::new(self.header.x, self.header.y, 0, 0);
        }
        Rect::new(self.header.x + offset, row, self.header.width - offset, 1)
    }

    /// Level clicked at the given cell, if any.
    pub fn level_at(&self, level_count: u32, column: u16, row: u16) -> Option<u32> {
        level_indicator_cells(self.indicator_area(), level_count)
            .into_iter()
            .find(|(_, cell)| hit(*cell, column, row))
            .map(|(level, _)| level)
    }

    /// True when `column` is on the divider or one cell either side of
    /// it; a single column is hard to hit with a mouse.
    pub fn on_divider(&self, column: u16, row: u16) -> bool {
        self.divider.is_some_and(|d| {
            row >= d.y
                && row < d.y + d.height
                && column + 1 >= d.x
                && column <= d.x + 1
        })
    }
}

/// Cells of the level indicator, one per level, laid out left to right
/// starting at `area.x`. Levels that do not fit are dropped.
pub fn level_indicator_cells(area: Rect, level_count: u32) -> Vec<(u32, Rect)> {
    const CELL_WIDTH: u16 = 3;
    const GAP: u16 = 1;

    let mut cells = Vec::new();
    let mut x = area.x;
    for level in 1..=level_count {
        if x + CELL_WIDTH > area.x + area.width {
            break;
        }
        cells.push((level, Rect::new(x, area.y, CELL_WIDTH, 1)));
        x += CELL_WIDTH + GAP;
    }
    cells
}

pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Gap between key hints on one footer row.
const HINT_GAP: &str = "  ";
/// Smallest catalog, storyline or module-complete page.
const MIN_PAGE_WIDTH: u16 = 48;
const MIN_PAGE_HEIGHT: u16 = 12;

/// Flow key hints into footer rows no wider than `width`. Empty hints are
/// skipped; a hint wider than the row gets a row to itself.
pub fn wrap_key_hints<'a>(hints: impl IntoIterator<Item = &'a str>, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut rows: Vec<String> = Vec::new();
    for hint in hints.into_iter().filter(|h| !h.is_empty()) {
        match rows.last_mut() {
            Some(row) if row.chars().count() + HINT_GAP.len() + hint.chars().count() <= width => {
                row.push_str(HINT_GAP);
                row.push_str(hint);
            }
            _ => rows.push(format!(" {hint}")),
        }
    }
    rows
}

/// A page centered in `area`, sized as a share of it but never smaller
/// than the minimum page unless the terminal itself is.
pub fn page_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let share = |total: u16, percent: u16, min: u16| {
        let wanted = u32::from(total) * u32::from(percent.min(100)) / 100;
        u16::try_from(wanted).unwrap_or(total).max(min).min(total)
    };
    let width = share(area.width, percent_x, MIN_PAGE_WIDTH);
    let height = share(area.height, percent_y, MIN_PAGE_HEIGHT);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [page] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    page
}
