use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct SuccessNotice<'a> {
    pub theme: &'a Theme,
}

impl Widget for SuccessNotice<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.success()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(Line::from(vec![
            Span::styled(
                "Success! ",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Ready to proceed to next level",
                Style::default().fg(colors.fg()),
            ),
        ]))
        .alignment(Alignment::Center)
        .block(block)
        .render(area, buf);
    }
}
