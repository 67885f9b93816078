use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::catalog::{Curriculum, Module};
use crate::ui::theme::Theme;

/// Story page shown before a module's first level. The curriculum
/// introduction leads in for the first module only.
pub struct StorylineView<'a> {
    module: &'a Module,
    introduction: Option<&'a Curriculum>,
    theme: &'a Theme,
}

impl<'a> StorylineView<'a> {
    pub fn new(module: &'a Module, introduction: Option<&'a Curriculum>, theme: &'a Theme) -> Self {
        Self {
            module,
            introduction,
            theme,
        }
    }
}

impl Widget for StorylineView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Module {}: {} ", self.module.id, self.module.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        if let Some(curriculum) = self.introduction.filter(|c| !c.introduction.is_empty()) {
            lines.push(Line::from(Span::styled(
                curriculum.title.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            for paragraph in curriculum.introduction.lines() {
                lines.push(Line::from(Span::styled(paragraph, Style::default().fg(colors.fg()))));
            }
            lines.push(Line::from(""));
        }

        match &self.module.storyline {
            Some(story) => {
                for paragraph in story.text.lines() {
                    lines.push(Line::from(Span::styled(paragraph, Style::default().fg(colors.fg()))));
                }
                if !story.image.is_empty() {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        format!("[illustration: {}]", story.image),
                        Style::default().fg(colors.text_muted()),
                    )));
                }
            }
            None => lines.push(Line::from(Span::styled(
                self.module.description.as_str(),
                Style::default().fg(colors.fg()),
            ))),
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Enter] Start the module  [Esc] Back",
            Style::default().fg(colors.accent()),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Left)
            .render(inner, buf);
    }
}
