use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::api::LevelKey;
use crate::catalog::ModuleCatalog;
use crate::session::level_picker::LevelPicker;
use crate::ui::theme::Theme;

/// Widest the sidebar gets, borders included.
pub const SIDEBAR_WIDTH: u16 = 40;

/// Sidebar over the level view listing every module; the highlighted
/// module is expanded into its level numbers.
pub struct LevelPickerPanel<'a> {
    catalog: &'a ModuleCatalog,
    picker: &'a LevelPicker,
    /// Level the view underneath has open.
    open: LevelKey,
    theme: &'a Theme,
}

impl<'a> LevelPickerPanel<'a> {
    pub fn new(catalog: &'a ModuleCatalog, picker: &'a LevelPicker, open: LevelKey, theme: &'a Theme) -> Self {
        Self {
            catalog,
            picker,
            open,
            theme,
        }
    }

    /// Left edge of `area`, full height.
    pub fn area(area: Rect) -> Rect {
        Rect::new(area.x, area.y, SIDEBAR_WIDTH.min(area.width), area.height)
    }
}

impl Widget for LevelPickerPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(" All levels [Ctrl+B] ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, module) in self.catalog.modules().enumerate() {
            let highlighted = i == self.picker.module_index();
            let marker = if highlighted { ">" } else { " " };
            let style = if highlighted {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else if module.id == self.open.module_id {
                Style::default().fg(colors.fg())
            } else {
                Style::default().fg(colors.text_muted())
            };
            lines.push(Line::from(Span::styled(
                format!(" {marker} {}. {}", module.id, module.title),
                style,
            )));

            if highlighted {
                let mut cells = vec![Span::raw("    ")];
                for level in 1..=module.level_count {
                    let key = LevelKey::new(module.id, level);
                    let mut style = if key == self.open {
                        Style::default()
                            .fg(colors.level_current())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.level_pending())
                    };
                    if level == self.picker.level() {
                        style = style.bg(colors.selection_bg());
                    }
                    cells.push(Span::styled(format!(" {level} "), style));
                }
                lines.push(Line::from(cells));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " [Up/Down] Module  [Left/Right] Level",
            Style::default().fg(colors.text_muted()),
        )));
        lines.push(Line::from(Span::styled(
            " [Enter] Open  [Esc] Close",
            Style::default().fg(colors.text_muted()),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_module_and_expands_the_highlighted_one() {
        let catalog = ModuleCatalog::bundled().unwrap();
        let theme = Theme::default();
        let open = LevelKey::new(2, 1);
        let picker = LevelPicker::new(&catalog, open);
        let area = Rect::new(0, 0, SIDEBAR_WIDTH, 30);
        let mut buf = Buffer::empty(area);
        LevelPickerPanel::new(&catalog, &picker, open, &theme).render(area, &mut buf);

        let rows: Vec<String> = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect();
        for module in catalog.modules() {
            assert!(
                rows.iter().any(|r| r.contains(&format!("{}. ", module.id))),
                "module {} missing",
                module.id
            );
        }
        let expanded = rows
            .iter()
            .position(|r| r.contains("> 2. "))
            .expect("module 2 highlighted");
        assert!(rows[expanded + 1].contains(" 1 "));
        assert!(rows[expanded + 1].contains(&format!(" {} ", catalog.level_count(2))));
    }

    #[test]
    fn sidebar_hugs_the_left_edge() {
        assert_eq!(
            LevelPickerPanel::area(Rect::new(0, 4, 120, 30)),
            Rect::new(0, 4, SIDEBAR_WIDTH, 30)
        );
        assert_eq!(LevelPickerPanel::area(Rect::new(0, 0, 20, 10)).width, 20);
    }
}
