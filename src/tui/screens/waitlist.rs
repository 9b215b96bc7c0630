//! Donor waitlist screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::form::{FormError, FormEvent, SubmissionStatus, WaitlistController};
use crate::model::Field;
use crate::tui::action::{Action, ScreenState};
use crate::tui::app::Screen;
use crate::tui::widgets::form::{Form, FormField, ROW_HEIGHT, draw_form};
use crate::tui::widgets::status_bar::Activity;

const FIELDS: [Field; 2] = [Field::Name, Field::Email];

/// State for the donor waitlist screen.
pub struct WaitlistScreenState {
    controller: WaitlistController,
    form: Form,
    notice: Option<String>,
}

impl WaitlistScreenState {
    pub fn new(controller: WaitlistController) -> Self {
        let form = Form::new(
            FIELDS
                .iter()
                .map(|field| FormField::new(field.label(), true))
                .collect(),
        );
        let mut state = Self {
            controller,
            form,
            notice: None,
        };
        state.sync();
        state
    }

    pub fn controller(&self) -> &WaitlistController {
        &self.controller
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub async fn next_event(&mut self) -> Option<FormEvent> {
        self.controller.next_event().await
    }

    pub fn handle_form_event(&mut self, event: FormEvent) {
        self.controller.handle_event(event);
        self.sync();
    }

    pub fn activity(&self) -> Activity {
        match self.controller.state().submission() {
            SubmissionStatus::Submitting => Activity::Busy("Joining waitlist...".into()),
            SubmissionStatus::Submitted { .. } => Activity::Done("On the waitlist".into()),
            SubmissionStatus::Failed { reason } => {
                Activity::Failed(format!("Signup failed: {reason}"))
            }
            SubmissionStatus::Idle => Activity::Idle,
        }
    }

    fn sync(&mut self) {
        let state = self.controller.state();
        self.form.set_value(0, state.name());
        self.form.set_value(1, state.email());
        for (i, field) in FIELDS.iter().enumerate() {
            self.form
                .set_error(i, state.validation_errors().get(field).cloned());
        }
    }

    fn submit(&mut self) {
        match self.controller.on_submit() {
            Ok(()) => self.notice = None,
            Err(FormError::ValidationFailed(_)) => {
                self.notice = None;
                let errors = self.controller.state().validation_errors();
                if let Some(first) = FIELDS.iter().position(|f| errors.contains_key(f)) {
                    self.form.set_focus(first);
                }
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }
}

impl ScreenState for WaitlistScreenState {
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.controller.state().submission().is_submitted() {
            return Action::Navigate(Screen::Home);
        }
        match key.code {
            KeyCode::Esc => return Action::Navigate(Screen::Home),
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Enter => self.submit(),
            code => {
                if let Some(value) = self.form.edited(code) {
                    let field = FIELDS[self.form.focus()];
                    self.controller.on_field_changed(field, value);
                    self.notice = None;
                }
            }
        }
        self.sync();
        Action::None
    }
}

/// Renders the donor waitlist screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_waitlist(state: &WaitlistScreenState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Donor Waitlist ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.controller.state().submission().is_submitted() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "You're on the list!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("We'll email you when donor accounts open."),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to return home",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        return;
    }

    let [intro_area, form_area, notice_area, _, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(ROW_HEIGHT * FIELDS.len() as u16),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new("Be the first to know when donor accounts open.")
            .style(Style::default().fg(Color::DarkGray)),
        intro_area,
    );

    draw_form(&state.form, frame, form_area);

    let notice = match (state.notice.as_deref(), state.controller.state().submission()) {
        (Some(msg), _) => Some(msg.to_string()),
        (None, SubmissionStatus::Failed { .. }) => Some(
            "There was an error joining the waitlist. Press Enter to try again.".to_string(),
        ),
        _ => None,
    };
    if let Some(msg) = notice {
        frame.render_widget(
            Paragraph::new(Span::styled(msg, Style::default().fg(Color::Red))),
            notice_area,
        );
    }

    let footer = Paragraph::new("Tab: next  Enter: join  Esc: back")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
