use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::record::Difficulty;
use crate::ui::screen::ResultsModel;
use crate::ui::theme::Theme;

pub struct ResultsCard<'a> {
    pub results: ResultsModel,
    pub difficulty: Option<Difficulty>,
    pub theme: &'a Theme,
}

impl<'a> ResultsCard<'a> {
    pub fn new(results: ResultsModel, difficulty: Option<Difficulty>, theme: &'a Theme) -> Self {
        Self {
            results,
            difficulty,
            theme,
        }
    }
}

impl Widget for ResultsCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let results = self.results;

        let block = Block::bordered()
            .title(" Quiz Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let mut title_spans = vec![Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(difficulty) = self.difficulty {
            title_spans.push(Span::styled(
                format!("  ({})", difficulty.label()),
                Style::default().fg(colors.text_dim()),
            ));
        }
        Paragraph::new(Line::from(title_spans))
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let score_line = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{} / {}", results.score, results.total),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(score_line)
            .alignment(Alignment::Center)
            .render(layout[1], buf);

        let icon = results.badge.icon();
        let badge_text = if icon.is_empty() {
            results.badge.label().to_string()
        } else {
            format!("{icon} {}", results.badge.label())
        };
        Paragraph::new(Line::from(Span::styled(
            badge_text,
            Style::default()
                .fg(colors.badge(results.badge))
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[2], buf);

        if results.offer_harder {
            Paragraph::new(Line::from(Span::styled(
                "Ready for a challenge? Press [h] to try Hard",
                Style::default().fg(colors.info()),
            )))
            .alignment(Alignment::Center)
            .render(layout[4], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::badge::BadgeTier;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_renders_score_and_offer() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        let results = ResultsModel {
            score: 8,
            total: 10,
            badge: BadgeTier::Silver,
            offer_harder: true,
        };
        ResultsCard::new(results, Some(Difficulty::Easy), &theme).render(area, &mut buf);

        let all: String = (0..area.height).map(|y| row_text(&buf, y)).collect();
        assert!(all.contains("8 / 10"));
        assert!(all.contains("Silver Medal!"));
        assert!(all.contains("try Hard"));
    }
}
