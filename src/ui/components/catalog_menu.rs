use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::ModuleCatalog;
use crate::ui::theme::Theme;

/// Module picker shown on the catalog screen.
pub struct CatalogMenu<'a> {
    pub catalog: &'a ModuleCatalog,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> CatalogMenu<'a> {
    pub fn new(catalog: &'a ModuleCatalog, selected: usize, theme: &'a Theme) -> Self {
        Self {
            catalog,
            selected,
            theme,
        }
    }
}

impl Widget for CatalogMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.catalog.curriculum().title.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Choose a module to begin",
                Style::default().fg(colors.text_muted()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.catalog
                    .modules()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, module) in self.catalog.modules().enumerate() {
            let Some(slot) = menu_layout.get(i) else {
                break;
            };
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let levels = if module.level_count == 1 {
                "1 level".to_string()
            } else {
                format!("{} levels", module.level_count)
            };

            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let lines = vec![
                Line::from(vec![
                    Span::styled(format!(" {indicator} [{}] {}", module.id, module.title), label_style),
                    Span::styled(format!("  ({levels})"), Style::default().fg(colors.text_muted())),
                ]),
                Line::from(Span::styled(
                    format!("     {}", module.description),
                    Style::default().fg(colors.text_muted()),
                )),
            ];
            Paragraph::new(lines).render(*slot, buf);
        }
    }
}
