use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::ui::layout::level_indicator_cells;
use crate::ui::theme::Theme;

/// One cell per level of the module: earlier levels done, the current one
/// highlighted, later ones pending. Cell positions come from
/// `level_indicator_cells` so mouse clicks map back to levels.
pub struct LevelProgress<'a> {
    pub current: u32,
    pub level_count: u32,
    pub theme: &'a Theme,
}

impl<'a> LevelProgress<'a> {
    pub fn new(current: u32, level_count: u32, theme: &'a Theme) -> Self {
        Self {
            current,
            level_count,
            theme,
        }
    }
}

impl Widget for LevelProgress<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        if area.width == 0 || area.height == 0 {
            return;
        }

        for (level, cell) in level_indicator_cells(area, self.level_count) {
            let style = if level < self.current {
                Style::default().fg(colors.bg()).bg(colors.level_done())
            } else if level == self.current {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.level_current())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg()).bg(colors.level_pending())
            };
            for x in cell.x..cell.x + cell.width {
                buf[(x, cell.y)].set_style(style);
            }
            let label = level.to_string();
            let label_x = cell.x + (cell.width.saturating_sub(label.len() as u16)) / 2;
            buf.set_string(label_x, cell.y, &label, style);
        }
    }
}
