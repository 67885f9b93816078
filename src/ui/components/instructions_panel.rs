use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::editor::EditorSession;
use crate::ui::theme::Theme;

/// Height of the collapsed block: borders plus the first task line.
pub const COLLAPSED_HEIGHT: u16 = 3;

pub struct InstructionsPanel<'a> {
    session: &'a EditorSession,
    theme: &'a Theme,
}

struct PanelStyles {
    task: Style,
    toggle: Style,
    hint: Style,
}

impl PanelStyles {
    fn plain() -> Self {
        Self {
            task: Style::default(),
            toggle: Style::default(),
            hint: Style::default(),
        }
    }
}

impl<'a> InstructionsPanel<'a> {
    pub fn new(session: &'a EditorSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    fn styles(&self) -> PanelStyles {
        let colors = &self.theme.colors;
        let task = if self.session.passed {
            Style::default().fg(colors.success())
        } else {
            Style::default().fg(colors.fg())
        };
        PanelStyles {
            task,
            toggle: Style::default().fg(colors.accent()),
            hint: Style::default()
                .fg(colors.warning())
                .add_modifier(Modifier::ITALIC),
        }
    }
}

fn is_collapsed(session: &EditorSession) -> bool {
    !session.instructions_expanded && !session.is_fullscreen()
}

fn body(session: &EditorSession, styles: PanelStyles) -> Paragraph<'_> {
    let mut lines: Vec<Line> = session
        .task_message
        .split('\n')
        .map(|l| Line::from(Span::styled(l, styles.task)))
        .collect();

    if let Some(hint) = session.hint() {
        let toggle = if session.hint_visible {
            "[F2] Hide hint"
        } else {
            "[F2] Show hint"
        };
        lines.push(Line::from(Span::styled(toggle, styles.toggle)));
        if session.hint_visible {
            lines.push(Line::from(""));
            lines.extend(
                hint.split('\n')
                    .map(|l| Line::from(Span::styled(l, styles.hint))),
            );
        }
    }

    Paragraph::new(lines).wrap(Wrap { trim: true })
}

/// Rows the instructions block needs at `width` columns, borders included.
/// Counted by the same wrapper that renders the body, so the editor below
/// can take the rest without clipping the task or the hint.
pub fn required_height(session: &EditorSession, width: u16) -> u16 {
    if is_collapsed(session) {
        return COLLAPSED_HEIGHT;
    }
    let inner = width.saturating_sub(2).max(1);
    let lines = body(session, PanelStyles::plain()).line_count(inner);
    u16::try_from(lines.saturating_add(2)).unwrap_or(u16::MAX)
}

impl Widget for InstructionsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;

        let collapsed = is_collapsed(session);
        let title = if collapsed {
            " Instructions [F3] show "
        } else {
            " Instructions [F3] "
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let styles = self.styles();
        if collapsed {
            let first = session.task_message.lines().next().unwrap_or_default();
            Paragraph::new(Line::from(Span::styled(
                first,
                styles.task.add_modifier(Modifier::DIM),
            )))
            .render(inner, buf);
            return;
        }

        body(session, styles).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LevelData, LevelKey};
    use crate::session::resize::SplitRatio;

    fn session(task: &str, hint: &str) -> EditorSession {
        let mut s = EditorSession::new(LevelKey::new(1, 2), SplitRatio::default());
        s.apply_level(Ok(LevelData {
            title: "WHERE Statements".into(),
            task: task.into(),
            initial_code: "SELECT 1;".into(),
            hint: Some(hint.into()),
        }));
        s
    }

    fn rendered_text(session: &EditorSession, width: u16, height: u16) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        InstructionsPanel::new(session, &theme).render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn height_grows_with_hint_and_shrinks_when_collapsed() {
        let mut s = session("Find every creature that can fly.", "Use WHERE can_fly = 1");
        let without_hint = required_height(&s, 40);
        s.toggle_hint();
        let with_hint = required_height(&s, 40);
        assert!(with_hint > without_hint);

        s.toggle_instructions();
        assert_eq!(required_height(&s, 40), COLLAPSED_HEIGHT);
    }

    #[test]
    fn wide_panel_needs_one_row_per_line() {
        let s = session("Find every creature that can fly.", "Use WHERE");
        // Task and toggle line.
        assert_eq!(required_height(&s, 200), 4);
    }

    #[test]
    fn computed_height_never_clips_the_hint() {
        let tasks = [
            "Find every creature that can fly.",
            "SELECT  name,   power FROM creatures  WHERE  level > 3;",
            "Join   the   spells table\nto the wizards    table on wizard_id.",
            "Count the potions grouped by colour and sort them descending.",
        ];
        for task in tasks {
            let mut s = session(task, "Try   GROUP BY  colour then   ORDER BY count LASTWORD");
            s.toggle_hint();
            for width in 12..60 {
                let height = required_height(&s, width);
                let text = rendered_text(&s, width, height);
                assert!(
                    text.contains("LASTWORD"),
                    "hint clipped at width {width} for {task:?}"
                );
            }
        }
    }

    #[test]
    fn toggle_line_wrapping_is_counted() {
        let mut s = session("Fly.", "Hint");
        s.toggle_hint();
        // Borders, task, blank and hint take 5 rows; "[F2] Hide hint"
        // cannot fit on one 8-column row.
        let height = required_height(&s, 10);
        assert!(height > 6);
        assert!(rendered_text(&s, 10, height).contains("Hint"));
    }
}
