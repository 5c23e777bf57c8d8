use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::matcher::InputMode;
use crate::keyboard::display;
use crate::ui::screen::{FeedbackKind, ScreenModel};
use crate::ui::theme::Theme;

/// The live question: prompt, countdown, verdict line and, in buffered
/// mode, the keys collected so far.
pub struct QuizCard<'a> {
    pub model: &'a ScreenModel,
    pub input_mode: InputMode,
    pub theme: &'a Theme,
}

impl<'a> QuizCard<'a> {
    pub fn new(model: &'a ScreenModel, input_mode: InputMode, theme: &'a Theme) -> Self {
        Self {
            model,
            input_mode,
            theme,
        }
    }
}

impl Widget for QuizCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let model = self.model;

        let block = Block::bordered()
            .title(format!(" Score: {} ", model.score))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Min(2),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(inner);

        let timer = Line::from(vec![
            Span::styled("Time left: ", Style::default().fg(colors.text_dim())),
            Span::styled(
                format!("{}s", model.remaining),
                Style::default()
                    .fg(colors.urgency(model.urgency))
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(timer)
            .alignment(Alignment::Right)
            .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            "What is the shortcut for",
            Style::default().fg(colors.text_dim()),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        Paragraph::new(Line::from(Span::styled(
            &*model.prompt,
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[2], buf);

        if self.input_mode == InputMode::Buffered {
            let keys = if model.buffer.is_empty() {
                Span::styled("press keys, then F2", Style::default().fg(colors.text_dim()))
            } else {
                Span::styled(
                    display::buffer_label(&model.buffer),
                    Style::default().fg(colors.info()).add_modifier(Modifier::BOLD),
                )
            };
            Paragraph::new(Line::from(vec![
                Span::styled("Keys: ", Style::default().fg(colors.text_dim())),
                keys,
            ]))
            .alignment(Alignment::Center)
            .render(layout[3], buf);
        }

        if let Some(feedback) = &model.feedback {
            let color = match feedback.kind {
                FeedbackKind::Correct => colors.correct(),
                FeedbackKind::Incorrect => colors.incorrect(),
                FeedbackKind::Info => colors.info(),
            };
            Paragraph::new(Line::from(Span::styled(
                &*feedback.text,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(layout[4], buf);
        }
    }
}
