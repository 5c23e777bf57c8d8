use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::Catalog;
use crate::catalog::record::Difficulty;
use crate::engine::matcher::InputMode;
use crate::keyboard::platform::Platform;
use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub difficulty: Difficulty,
    pub description: String,
}

/// Welcome screen: difficulty picker plus the current input mode.
pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub input_mode: InputMode,
    pub platform: Platform,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(catalog: &Catalog, theme: &'a Theme) -> Self {
        let items = Difficulty::ALL
            .iter()
            .enumerate()
            .map(|(i, &difficulty)| MenuItem {
                key: (i + 1).to_string(),
                difficulty,
                description: describe(catalog, difficulty),
            })
            .collect();
        Self {
            items,
            selected: 0,
            input_mode: InputMode::Immediate,
            platform: Platform::detect(),
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        self.items
            .get(self.selected)
            .map_or(Difficulty::Easy, |item| item.difficulty)
    }

    pub fn select(&mut self, difficulty: Difficulty) {
        if let Some(i) = self.items.iter().position(|item| item.difficulty == difficulty) {
            self.selected = i;
        }
    }
}

fn describe(catalog: &Catalog, difficulty: Difficulty) -> String {
    match catalog.count(difficulty) {
        0 => "no shortcuts, falls back to Easy".to_string(),
        1 => "1 shortcut".to_string(),
        n => format!("{n} shortcuts"),
    }
}

impl Widget for &Menu<'_> {
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
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "chordquiz",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Keyboard Shortcut Quiz",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(
                " {indicator} [{key}] {label}",
                key = item.key,
                label = item.difficulty.label()
            );
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    &*label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(
                    &*desc_text,
                    Style::default().fg(colors.text_dim()),
                )),
            ];

            let p = Paragraph::new(lines);
            if i < menu_layout.len() {
                p.render(menu_layout[i], buf);
            }
        }

        let status = Line::from(vec![
            Span::styled(" Input: ", Style::default().fg(colors.text_dim())),
            Span::styled(
                self.input_mode.as_str(),
                Style::default().fg(colors.info()).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Keys: ", Style::default().fg(colors.text_dim())),
            Span::styled(self.platform.as_str(), Style::default().fg(colors.info())),
        ]);
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(layout[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_wraps_both_ways() {
        let theme = Theme::default();
        let catalog = Catalog::bundled().unwrap();
        let mut menu = Menu::new(&catalog, &theme);
        assert_eq!(menu.selected_difficulty(), Difficulty::Easy);
        menu.prev();
        assert_eq!(menu.selected_difficulty(), Difficulty::Hard);
        menu.next();
        assert_eq!(menu.selected_difficulty(), Difficulty::Easy);
        menu.select(Difficulty::Medium);
        assert_eq!(menu.selected, 1);
    }

    #[test]
    fn test_description_counts_shortcuts() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(
            describe(&catalog, Difficulty::Hard),
            format!("{} shortcuts", catalog.count(Difficulty::Hard))
        );
        let empty = Catalog::default();
        assert_eq!(describe(&empty, Difficulty::Medium), "no shortcuts, falls back to Easy");
    }
}
