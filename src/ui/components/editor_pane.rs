use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::query_editor::QueryEditor;
use crate::ui::theme::Theme;

/// The SQL editor with line numbers. Scrolls so the cursor stays in view.
pub struct EditorPane<'a> {
    editor: &'a QueryEditor,
    executing: bool,
    theme: &'a Theme,
}

impl<'a> EditorPane<'a> {
    pub fn new(editor: &'a QueryEditor, executing: bool, theme: &'a Theme) -> Self {
        Self {
            editor,
            executing,
            theme,
        }
    }
}

/// First visible index so that `cursor` is inside a window of `size`.
fn scroll_offset(cursor: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    cursor.saturating_sub(size - 1)
}

impl Widget for EditorPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.executing {
            " SQL Editor (running...) "
        } else {
            " SQL Editor [F5] run "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let lines = self.editor.lines();
        let gutter = lines.len().to_string().len() + 1;
        let text_width = usize::from(inner.width).saturating_sub(gutter + 1);
        let (cursor_row, cursor_col) = self.editor.cursor_position();
        let top = scroll_offset(cursor_row, usize::from(inner.height));
        let left = scroll_offset(cursor_col, text_width);

        let rendered: Vec<Line> = lines
            .iter()
            .enumerate()
            .skip(top)
            .take(usize::from(inner.height))
            .map(|(i, line)| {
                let visible: String = line.chars().skip(left).take(text_width).collect();
                Line::from(vec![
                    Span::styled(
                        format!("{:>width$} ", i + 1, width = gutter),
                        Style::default().fg(colors.text_muted()),
                    ),
                    Span::styled(visible, Style::default().fg(colors.fg())),
                ])
            })
            .collect();
        Paragraph::new(rendered).render(inner, buf);

        if self.executing || text_width == 0 {
            return;
        }
        let x = inner.x + (gutter + 1 + cursor_col - left) as u16;
        let y = inner.y + (cursor_row - top) as u16;
        if x < inner.x + inner.width && y < inner.y + inner.height {
            buf[(x, y)].set_style(Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg()));
        }
    }
}
