use pagecurl_core::CurlPhaseKind;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let phase = app.phase();

        let page_text = format!(
            " PAGE {}/{} ",
            app.deck.current_index() + 1,
            app.deck.len()
        );
        let detail = match &app.status_message {
            Some(msg) => format!(" {}", msg),
            None => format!(" {}", phase),
        };

        let phase_style = if phase == CurlPhaseKind::Idle {
            Style::default().fg(theme.status_fg).bg(theme.status_bg)
        } else {
            Style::default()
                .fg(theme.accent)
                .bg(theme.status_bg)
                .add_modifier(Modifier::BOLD)
        };

        let help_hint = " h/l:turn drag:curl s:status Esc:reset q:quit ";
        let used = page_text.chars().count() + detail.chars().count() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                page_text,
                Style::default()
                    .fg(theme.status_bg)
                    .bg(theme.status_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(detail, phase_style),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.status_bg)),
            Span::styled(help_hint, Style::default().fg(theme.muted).bg(theme.status_bg)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
