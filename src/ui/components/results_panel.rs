use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Row as TableRow, Table, Widget, Wrap};

use crate::api::{self, Row};
use crate::session::editor::EditorSession;
use crate::ui::theme::Theme;

pub const EMPTY_RESULTS_MESSAGE: &str = "No results to display yet. Cast your SQL spell! ✨";

pub fn row_count_label(count: usize) -> String {
    if count == 1 {
        "1 row returned".to_string()
    } else {
        format!("{count} rows returned")
    }
}

/// Query results: the error panel, the empty state, or the table with a
/// row count and the backend's verdict.
pub struct ResultsPanel<'a> {
    session: &'a EditorSession,
    theme: &'a Theme,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(session: &'a EditorSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;

        if let Some(error) = &session.sql_error {
            let block = Block::bordered()
                .title(" Error ")
                .border_style(Style::default().fg(colors.error()))
                .style(Style::default().bg(colors.bg()));
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(colors.error())))
                .wrap(Wrap { trim: false })
                .block(block)
                .render(area, buf);
            return;
        }

        let block = Block::bordered()
            .title(" Results ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if !session.has_run {
            Paragraph::new(Span::styled(
                EMPTY_RESULTS_MESSAGE,
                Style::default().fg(colors.text_muted()),
            ))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
            return;
        }

        let verdict_height = u16::from(session.verdict.is_some());
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(verdict_height),
            ])
            .split(inner);

        render_table(&session.rows, self.theme, sections[0], buf);

        Paragraph::new(Span::styled(
            row_count_label(session.rows.len()),
            Style::default().fg(colors.text_muted()),
        ))
        .render(sections[1], buf);

        if let Some(verdict) = &session.verdict {
            Paragraph::new(Line::from(Span::styled(
                verdict.as_str(),
                Style::default().fg(colors.warning()),
            )))
            .render(sections[2], buf);
        }
    }
}

fn render_table(rows: &[Row], theme: &Theme, area: Rect, buf: &mut Buffer) {
    let colors = &theme.colors;
    let columns = api::columns(rows);
    if columns.is_empty() {
        return;
    }

    let header = TableRow::new(columns.iter().map(|c| c.to_string())).style(
        Style::default()
            .fg(colors.table_header())
            .add_modifier(Modifier::BOLD),
    );
    let body = rows.iter().map(|row| {
        TableRow::new(
            columns
                .iter()
                .map(|c| api::cell_text(row.get(*c)))
                .collect::<Vec<_>>(),
        )
        .style(Style::default().fg(colors.fg()))
    });
    let widths = vec![Constraint::Fill(1); columns.len()];

    Table::new(body, widths)
        .header(header)
        .column_spacing(2)
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ExecutionResult, LevelKey, QueryOutcome};
    use crate::session::resize::SplitRatio;
    use serde_json::json;
    use std::time::Instant;

    fn text_of(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn draw(session: &EditorSession) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        ResultsPanel::new(session, &theme).render(area, &mut buf);
        text_of(&buf)
    }

    fn ran(session: &mut EditorSession, result: ExecutionResult) {
        let (ticket, _) = session.begin_execute().unwrap();
        session.apply_execution(ticket, Ok(result), Instant::now());
    }

    #[test]
    fn row_counts_are_pluralised() {
        assert_eq!(row_count_label(0), "0 rows returned");
        assert_eq!(row_count_label(1), "1 row returned");
        assert_eq!(row_count_label(7), "7 rows returned");
    }

    #[test]
    fn shows_empty_state_before_first_run() {
        let s = EditorSession::new(LevelKey::new(1, 1), SplitRatio::default());
        assert!(draw(&s).contains("No results to display yet."));
    }

    #[test]
    fn renders_columns_in_order_with_null_cells() {
        let mut s = EditorSession::new(LevelKey::new(1, 1), SplitRatio::default());
        let row = json!({"name": "Dragon", "can_fly": 1, "lair": null});
        ran(
            &mut s,
            ExecutionResult::Ran(QueryOutcome {
                rows: vec![row.as_object().unwrap().clone()],
                passed: false,
                message: None,
            }),
        );
        let text = draw(&s);
        let header_line = text.lines().find(|l| l.contains("name")).unwrap();
        let name = header_line.find("name").unwrap();
        let can_fly = header_line.find("can_fly").unwrap();
        let lair = header_line.find("lair").unwrap();
        assert!(name < can_fly && can_fly < lair);
        assert!(text.contains("NULL"));
        assert!(text.contains("1 row returned"));
    }

    #[test]
    fn error_panel_replaces_table() {
        let mut s = EditorSession::new(LevelKey::new(1, 1), SplitRatio::default());
        ran(&mut s, ExecutionResult::Error("no such table: x".into()));
        let text = draw(&s);
        assert!(text.contains("Error"));
        assert!(text.contains("no such table: x"));
        assert!(!text.contains("rows returned"));
    }
}
