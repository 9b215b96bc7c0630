//! Home screen: choose between the student application and the donor waitlist.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::action::{Action, ScreenState};
use crate::tui::app::Screen;

static MENU: &[(&str, &str, Action)] = &[
    (
        "s",
        "Apply for funding as a student",
        Action::Navigate(Screen::StudentApplication),
    ),
    (
        "d",
        "Join the donor waitlist",
        Action::Navigate(Screen::DonorWaitlist),
    ),
    ("q", "Quit", Action::Quit),
];

/// State for the home menu.
#[derive(Debug, Clone, Default)]
pub struct HomeState {
    selected: usize,
}

impl HomeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the highlighted menu index.
    pub fn selected(&self) -> usize {
        self.selected
    }
}

impl ScreenState for HomeState {
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                if self.selected + 1 < MENU.len() {
                    self.selected += 1;
                }
                Action::None
            }
            KeyCode::Enter => MENU[self.selected].2,
            KeyCode::Esc => Action::Quit,
            KeyCode::Char(ch) => MENU
                .iter()
                .find(|(shortcut, _, _)| shortcut.starts_with(ch))
                .map_or(Action::None, |(_, _, action)| *action),
            _ => Action::None,
        }
    }
}

/// Renders the home menu.
#[mutants::skip]
pub fn draw_home(state: &HomeState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Medici ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [intro_area, menu_area, footer_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let intro = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Fund the future of education",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Early access is open for students and donors."),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(intro, intro_area);

    let lines: Vec<Line> = MENU
        .iter()
        .enumerate()
        .map(|(i, (shortcut, label, _))| {
            let style = if i == state.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!(" [{shortcut}] {label} "), style))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        menu_area,
    );

    let footer = Paragraph::new("↑/↓: navigate  Enter: open  F1: help  q: quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
