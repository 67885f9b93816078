use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::catalog::Module;
use crate::ui::theme::Theme;

pub struct ModuleCompleteView<'a> {
    pub module: &'a Module,
    pub next_module: Option<&'a Module>,
    pub theme: &'a Theme,
}

impl Widget for ModuleCompleteView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Module Complete ")
            .border_style(Style::default().fg(colors.success()))
            .style(Style::default().bg(colors.bg()));

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("You completed Module {}: {}", self.module.id, self.module.title),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        match self.next_module {
            Some(next) => lines.push(Line::from(vec![
                Span::styled("[Enter] ", Style::default().fg(colors.accent())),
                Span::styled(
                    format!("Continue to Module {}: {}", next.id, next.title),
                    Style::default().fg(colors.fg()),
                ),
            ])),
            None => lines.push(Line::from(Span::styled(
                "That was the final module. Well done!",
                Style::default().fg(colors.fg()),
            ))),
        }
        lines.push(Line::from(vec![
            Span::styled("[r] ", Style::default().fg(colors.accent())),
            Span::styled("Restart this module", Style::default().fg(colors.fg())),
        ]));
        lines.push(Line::from(vec![
            Span::styled("[c] ", Style::default().fg(colors.accent())),
            Span::styled("Back to the module list", Style::default().fg(colors.fg())),
        ]));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

pub struct NotFoundView<'a> {
    pub path: &'a str,
    pub theme: &'a Theme,
}

impl Widget for NotFoundView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Not Found ")
            .border_style(Style::default().fg(colors.error()))
            .style(Style::default().bg(colors.bg()));

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Module not found",
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Nothing lives at {}", self.path),
                Style::default().fg(colors.text_muted()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to return to the module list",
                Style::default().fg(colors.accent()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
