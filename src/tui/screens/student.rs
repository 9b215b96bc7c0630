//! Student application screen with the institution autocomplete.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::form::{
    FormError, FormEvent, SearchStatus, StudentFormController, SubmissionStatus,
};
use crate::model::{DegreeLevel, Field};
use crate::tui::action::{Action, ScreenState};
use crate::tui::app::Screen;
use crate::tui::widgets::form::{Form, FormField, ROW_HEIGHT, draw_form};
use crate::tui::widgets::status_bar::Activity;

/// Form rows in display order.
const FIELDS: [Field; 7] = [
    Field::Name,
    Field::Email,
    Field::Institution,
    Field::FieldOfStudy,
    Field::DegreeLevel,
    Field::RequestedAmount,
    Field::Country,
];

const INSTITUTION: usize = 2;

static COUNTRIES: &[&str] = &["US"];

const FAILED_NOTICE: &str = "There was an error submitting your application. Press Enter to try again.";

/// State for the student application screen.
///
/// Field values live in the controller; the [`Form`] only tracks focus and
/// mirrors values for rendering.
pub struct StudentScreenState {
    controller: StudentFormController,
    form: Form,
    /// Highlighted suggestion, if the list has focus.
    highlight: Option<usize>,
    notice: Option<String>,
}

impl StudentScreenState {
    pub fn new(controller: StudentFormController) -> Self {
        let form = Form::new(
            FIELDS
                .iter()
                .map(|field| match field {
                    Field::DegreeLevel | Field::Country => {
                        FormField::choice(field.label(), *field != Field::Country)
                    }
                    _ => FormField::new(field.label(), true),
                })
                .collect(),
        );
        let mut state = Self {
            controller,
            form,
            highlight: None,
            notice: None,
        };
        state.sync();
        state
    }

    pub fn controller(&self) -> &StudentFormController {
        &self.controller
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// Waits for the controller's next background completion.
    pub async fn next_event(&mut self) -> Option<FormEvent> {
        self.controller.next_event().await
    }

    /// Applies a background completion and refreshes the view.
    ///
    /// A lookup result replaces the list, so any highlight is dropped.
    pub fn handle_form_event(&mut self, event: FormEvent) {
        let replaces_list = matches!(event, FormEvent::LookupResolved(_));
        self.controller.handle_event(event);
        let shown = self.shown_suggestions();
        if replaces_list || self.highlight.is_some_and(|i| i >= shown) {
            self.highlight = None;
        }
        self.sync();
    }

    /// Summary of background work for the status bar.
    pub fn activity(&self) -> Activity {
        let state = self.controller.state();
        match state.submission() {
            SubmissionStatus::Submitting => {
                return Activity::Busy("Submitting application...".into());
            }
            SubmissionStatus::Submitted { .. } => {
                return Activity::Done("Application submitted".into());
            }
            SubmissionStatus::Failed { reason } => {
                return Activity::Failed(format!("Submission failed: {reason}"));
            }
            SubmissionStatus::Idle => {}
        }
        match state.suggestions().status {
            SearchStatus::Searching => Activity::Busy("Searching universities...".into()),
            SearchStatus::TimedOutOrFailed => {
                Activity::Failed("University search unavailable".into())
            }
            SearchStatus::NotSearching | SearchStatus::Succeeded => Activity::Idle,
        }
    }

    fn focused_field(&self) -> Field {
        FIELDS[self.form.focus()]
    }

    /// Suggestions the user can highlight. None once the institution is
    /// locked or accepted as typed.
    fn shown_suggestions(&self) -> usize {
        let state = self.controller.state();
        if state.selection_locked() || state.fields().is_manual_institution_entry {
            0
        } else {
            state.suggestions().items.len()
        }
    }

    /// Copies values and errors from the controller into the form.
    fn sync(&mut self) {
        let state = self.controller.state();
        for (i, field) in FIELDS.iter().enumerate() {
            self.form.set_value(i, state.fields().value(*field));
            self.form
                .set_error(i, state.validation_errors().get(field).cloned());
        }
    }

    fn edit(&mut self, code: KeyCode) {
        let Some(value) = self.form.edited(code) else {
            return;
        };
        let field = self.focused_field();
        if field == Field::Institution {
            self.highlight = None;
            self.controller.on_query_text_changed(value);
        } else {
            self.controller.on_field_changed(field, value);
        }
        self.notice = None;
    }

    fn move_highlight(&mut self, down: bool) -> bool {
        let shown = self.shown_suggestions();
        if self.focused_field() != Field::Institution || shown == 0 {
            return false;
        }
        self.highlight = match (self.highlight, down) {
            (None, true) => Some(0),
            (Some(i), true) => Some((i + 1).min(shown - 1)),
            (Some(0), false) | (None, false) => None,
            (Some(i), false) => Some(i - 1),
        };
        true
    }

    fn choose_highlighted(&mut self) -> bool {
        if self.focused_field() != Field::Institution {
            return false;
        }
        let shown = self.shown_suggestions();
        let Some(suggestion) = self
            .highlight
            .filter(|&i| i < shown)
            .and_then(|i| self.controller.state().suggestions().items.get(i))
            .cloned()
        else {
            return false;
        };
        self.highlight = None;
        self.controller.on_suggestion_selected(&suggestion)
    }

    fn cycle_choice(&mut self, forward: bool) {
        match self.focused_field() {
            Field::DegreeLevel => {
                let all = DegreeLevel::all();
                let next = match self.controller.state().fields().degree_level {
                    Some(current) => cycle(all, current, forward),
                    None if forward => all[0],
                    None => all[all.len() - 1],
                };
                self.controller.on_degree_changed(Some(next));
            }
            Field::Country => {
                let current = self.controller.state().fields().country.as_str();
                let next = cycle(COUNTRIES, current, forward).to_string();
                self.controller.on_field_changed(Field::Country, next);
            }
            _ => {}
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

impl ScreenState for StudentScreenState {
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.controller.state().submission().is_submitted() {
            return Action::Navigate(Screen::Home);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('e') && self.controller.state().manual_entry_offered() {
                self.controller.on_manual_entry_requested();
                self.highlight = None;
                self.sync();
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Esc => return Action::Navigate(Screen::Home),
            KeyCode::Tab => {
                self.highlight = None;
                self.form.focus_next();
            }
            KeyCode::BackTab => {
                self.highlight = None;
                self.form.focus_prev();
            }
            KeyCode::Down => {
                if !self.move_highlight(true) {
                    self.form.focus_next();
                }
            }
            KeyCode::Up => {
                if !self.move_highlight(false) {
                    self.form.focus_prev();
                }
            }
            KeyCode::Left => self.cycle_choice(false),
            KeyCode::Right => self.cycle_choice(true),
            KeyCode::Enter => {
                if !self.choose_highlighted() {
                    self.submit();
                }
            }
            code @ (KeyCode::Char(_) | KeyCode::Backspace) => self.edit(code),
            _ => {}
        }
        self.sync();
        Action::None
    }
}

/// Cycles through a slice to find the next or previous element.
fn cycle<T: PartialEq + Copy>(items: &[T], current: T, forward: bool) -> T {
    let pos = items.iter().position(|&x| x == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % items.len()
    } else {
        (pos + items.len() - 1) % items.len()
    };
    items[next]
}

fn suggestion_lines(state: &StudentScreenState) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let form = state.controller.state();
    let fields = form.fields();

    if form.selection_locked() {
        return vec![Line::from(Span::styled(
            format!("\u{2713} {}", fields.institution),
            Style::default().fg(Color::Green),
        ))];
    }
    if fields.is_manual_institution_entry {
        return vec![Line::from(Span::styled(
            "University will be submitted as typed",
            dim,
        ))];
    }

    let suggestions = form.suggestions();
    match suggestions.status {
        SearchStatus::Searching => vec![Line::from(Span::styled("Searching...", dim))],
        SearchStatus::Succeeded if !suggestions.items.is_empty() => suggestions
            .items
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let name_style = if state.highlight == Some(i) {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(s.display_name.clone(), name_style),
                    Span::raw("  "),
                    Span::styled(s.secondary_label.clone(), dim),
                ])
            })
            .collect(),
        SearchStatus::Succeeded | SearchStatus::TimedOutOrFailed
            if form.manual_entry_offered() =>
        {
            let lead = if suggestions.status == SearchStatus::Succeeded {
                "No universities found."
            } else {
                "Can't find your university?"
            };
            vec![Line::from(vec![
                Span::raw(format!("{lead} ")),
                Span::styled("Ctrl-E", Style::default().fg(Color::Yellow)),
                Span::raw(" to enter it manually"),
            ])]
        }
        _ => {
            let min = state.controller.settings().min_query_chars;
            let typed = fields.institution.chars().count();
            if typed > 0 && typed < min {
                vec![Line::from(Span::styled(
                    format!("Type at least {min} characters to search"),
                    dim,
                ))]
            } else {
                Vec::new()
            }
        }
    }
}

/// Renders the student application screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_student(state: &StudentScreenState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Student Application ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.controller.state().submission().is_submitted() {
        let name = state.controller.state().fields().name.trim().to_string();
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Application received!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Thank you, {name}. We'll be in touch soon.")),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to return home",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let form_height = ROW_HEIGHT * FIELDS.len() as u16;
    let [form_area, suggestion_area, notice_area, footer_area] = Layout::vertical([
        Constraint::Length(form_height),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    draw_form(&state.form, frame, form_area);

    let suggestion_block = Block::default()
        .title(" Suggestions ")
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));
    let suggestion_inner = suggestion_block.inner(suggestion_area);
    frame.render_widget(suggestion_block, suggestion_area);
    frame.render_widget(Paragraph::new(suggestion_lines(state)), suggestion_inner);

    let notice = match (state.notice.as_deref(), state.controller.state().submission()) {
        (Some(msg), _) => Some(msg.to_string()),
        (None, SubmissionStatus::Failed { .. }) => Some(FAILED_NOTICE.to_string()),
        (None, SubmissionStatus::Submitting) => Some("Submitting...".to_string()),
        _ => None,
    };
    if let Some(msg) = notice {
        frame.render_widget(
            Paragraph::new(Span::styled(msg, Style::default().fg(Color::Red))),
            notice_area,
        );
    }

    let footer = Paragraph::new(Line::from(
        "Tab: next  ↑/↓: suggestions  ←/→: choose  Enter: select/submit  Esc: back",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::config::ApplicationConfig;
    use crate::form::{LookupResult, SearchSettings};
    use crate::form::testing::{FakeDirectory, FakeSink, institution};
    use crate::model::Suggestion;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn make_state(directory: Arc<FakeDirectory>, sink: Arc<FakeSink>) -> StudentScreenState {
        let controller = StudentFormController::new(
            directory,
            sink,
            SearchSettings::default(),
            &ApplicationConfig::default(),
        );
        StudentScreenState::new(controller)
    }

    fn type_string(state: &mut StudentScreenState, s: &str) {
        for ch in s.chars() {
            state.handle_key(press(KeyCode::Char(ch)));
        }
    }

    fn focus(state: &mut StudentScreenState, field: Field) {
        while state.focused_field() != field {
            state.handle_key(press(KeyCode::Tab));
        }
    }

    async fn pump(state: &mut StudentScreenState) {
        let event = state.next_event().await.expect("controller holds a sender");
        state.handle_form_event(event);
    }

    fn stanford() -> Arc<FakeDirectory> {
        FakeDirectory::responding(vec![
            institution("1", "Stanford University"),
            institution("2", "Stanford Online High School"),
        ])
    }

    fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
        let mut s = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            s.push('\n');
        }
        s
    }

    fn render(state: &StudentScreenState) -> String {
        let backend = TestBackend::new(90, 34);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| draw_student(state, frame, frame.area()))
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    mod typing {
        use super::*;

        #[test]
        fn chars_go_to_focused_field() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            type_string(&mut state, "Ada");
            state.handle_key(press(KeyCode::Tab));
            type_string(&mut state, "ada@");
            state.handle_key(press(KeyCode::Backspace));

            let fields = state.controller().state().fields();
            assert_eq!(fields.name, "Ada");
            assert_eq!(fields.email, "ada");
            assert_eq!(state.form().value(0), "Ada");
        }

        #[test]
        fn typing_in_choice_field_is_ignored() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            focus(&mut state, Field::DegreeLevel);
            type_string(&mut state, "phd");
            assert_eq!(state.controller().state().fields().degree_level, None);
        }

        #[test]
        fn left_right_cycle_degree_level() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            focus(&mut state, Field::DegreeLevel);

            state.handle_key(press(KeyCode::Right));
            assert_eq!(
                state.controller().state().fields().degree_level,
                Some(DegreeLevel::Bachelor)
            );
            state.handle_key(press(KeyCode::Left));
            assert_eq!(
                state.controller().state().fields().degree_level,
                Some(DegreeLevel::Certificate)
            );
        }

        #[test]
        fn country_defaults_and_stays_in_options() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            focus(&mut state, Field::Country);
            state.handle_key(press(KeyCode::Right));
            assert_eq!(state.controller().state().fields().country, "US");
        }

        #[test]
        fn esc_returns_home() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            assert_eq!(
                state.handle_key(press(KeyCode::Esc)),
                Action::Navigate(Screen::Home)
            );
        }
    }

    mod suggestions {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn highlight_and_enter_selects_suggestion() {
            let directory = stanford();
            let mut state = make_state(directory.clone(), FakeSink::succeeding());
            focus(&mut state, Field::Institution);
            type_string(&mut state, "Stan");
            pump(&mut state).await;
            pump(&mut state).await;

            assert_eq!(directory.calls(), vec!["Stan"]);
            assert_eq!(state.controller().state().suggestions().items.len(), 2);

            state.handle_key(press(KeyCode::Down));
            state.handle_key(press(KeyCode::Down));
            state.handle_key(press(KeyCode::Down));
            assert_eq!(state.highlight(), Some(1));
            state.handle_key(press(KeyCode::Up));
            assert_eq!(state.highlight(), Some(0));

            assert_eq!(state.handle_key(press(KeyCode::Enter)), Action::None);
            let form = state.controller().state();
            assert!(form.selection_locked());
            assert_eq!(form.fields().institution, "Stanford University");
            assert_eq!(state.form().value(INSTITUTION), "Stanford University");
            assert_eq!(state.highlight(), None);
            assert!(form.validation_errors().is_empty(), "Enter selected, not submitted");
        }

        #[tokio::test(start_paused = true)]
        async fn up_from_first_suggestion_leaves_list() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            focus(&mut state, Field::Institution);
            type_string(&mut state, "Stan");
            pump(&mut state).await;
            pump(&mut state).await;

            state.handle_key(press(KeyCode::Down));
            state.handle_key(press(KeyCode::Up));
            assert_eq!(state.highlight(), None);
            assert_eq!(state.focused_field(), Field::Institution);
        }

        #[tokio::test(start_paused = true)]
        async fn editing_clears_highlight() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            focus(&mut state, Field::Institution);
            type_string(&mut state, "Stan");
            pump(&mut state).await;
            pump(&mut state).await;

            state.handle_key(press(KeyCode::Down));
            type_string(&mut state, "f");
            assert_eq!(state.highlight(), None);
        }

        #[tokio::test(start_paused = true)]
        async fn ctrl_e_accepts_typed_text_after_failure() {
            let mut state = make_state(FakeDirectory::failing(), FakeSink::succeeding());
            focus(&mut state, Field::Institution);
            type_string(&mut state, "Hogwarts");
            pump(&mut state).await;
            pump(&mut state).await;

            assert!(state.controller().state().manual_entry_offered());
            assert!(matches!(state.activity(), Activity::Failed(_)));
            assert!(render(&state).contains("Ctrl-E"));

            state.handle_key(ctrl('e'));
            let fields = state.controller().state().fields();
            assert!(fields.is_manual_institution_entry);
            assert_eq!(fields.institution, "Hogwarts");
        }

        #[tokio::test(start_paused = true)]
        async fn manual_entry_hides_later_results() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            focus(&mut state, Field::Institution);
            type_string(&mut state, "Sta");
            pump(&mut state).await;
            pump(&mut state).await;
            state.controller.on_manual_entry_requested();

            type_string(&mut state, "n");
            pump(&mut state).await;
            pump(&mut state).await;
            assert_eq!(state.controller().state().suggestions().items.len(), 2);

            state.handle_key(press(KeyCode::Down));
            assert_eq!(state.highlight(), None);
            state.handle_key(press(KeyCode::Enter));
            let form = state.controller().state();
            assert!(form.fields().is_manual_institution_entry);
            assert!(!form.selection_locked());
            assert_eq!(form.fields().institution, "Stan");
            assert!(render(&state).contains("submitted as typed"));
        }

        #[tokio::test(start_paused = true)]
        async fn new_results_drop_highlight() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            focus(&mut state, Field::Institution);
            type_string(&mut state, "Stan");
            pump(&mut state).await;
            pump(&mut state).await;
            state.handle_key(press(KeyCode::Down));
            state.handle_key(press(KeyCode::Down));
            assert_eq!(state.highlight(), Some(1));

            state.handle_form_event(FormEvent::LookupResolved(LookupResult {
                query: "Stan".into(),
                outcome: Ok(vec![
                    Suggestion::from(institution("3", "Stanbridge Academy")),
                    Suggestion::from(institution("4", "Stanford Law School")),
                ]),
            }));
            assert_eq!(state.highlight(), None);
        }

        #[test]
        fn ctrl_e_without_offer_is_ignored() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            state.handle_key(ctrl('e'));
            assert!(!state.controller().state().fields().is_manual_institution_entry);
        }

        #[test]
        fn short_query_shows_hint() {
            let mut state = make_state(stanford(), FakeSink::succeeding());
            focus(&mut state, Field::Institution);
            type_string(&mut state, "St");
            assert!(render(&state).contains("Type at least 3 characters"));
        }
    }

    mod submission {
        use super::*;

        async fn fill_valid(state: &mut StudentScreenState) {
            type_string(state, "Ada Lovelace");
            state.handle_key(press(KeyCode::Tab));
            type_string(state, "ada@example.com");
            state.handle_key(press(KeyCode::Tab));
            type_string(state, "Stan");
            pump(state).await;
            pump(state).await;
            state.handle_key(press(KeyCode::Down));
            state.handle_key(press(KeyCode::Enter));
            state.handle_key(press(KeyCode::Tab));
            type_string(state, "Mathematics");
            state.handle_key(press(KeyCode::Tab));
            state.handle_key(press(KeyCode::Right));
            state.handle_key(press(KeyCode::Tab));
            type_string(state, "5000");
        }

        #[test]
        fn enter_on_empty_form_shows_errors_and_focuses_first() {
            let sink = FakeSink::succeeding();
            let mut state = make_state(stanford(), sink.clone());
            focus(&mut state, Field::RequestedAmount);

            state.handle_key(press(KeyCode::Enter));
            assert!(state.form().has_errors());
            assert_eq!(state.focused_field(), Field::Name);
            assert_eq!(
                state.form().fields()[0].error.as_deref(),
                Some("Full Name is required")
            );
            assert!(sink.applications().is_empty());
        }

        #[tokio::test(start_paused = true)]
        async fn submit_then_any_key_returns_home() {
            let sink = FakeSink::succeeding();
            let mut state = make_state(stanford(), sink.clone());
            fill_valid(&mut state).await;

            state.handle_key(press(KeyCode::Enter));
            assert_eq!(
                state.activity(),
                Activity::Busy("Submitting application...".into())
            );
            pump(&mut state).await;

            let sent = sink.applications();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].university, "Stanford University");
            assert_eq!(sent[0].degree, DegreeLevel::Bachelor);
            assert_eq!(sent[0].funds_requested, "5000");
            assert!(!sent[0].is_manual_institution_entry);

            assert!(render(&state).contains("Application received"));
            assert_eq!(
                state.handle_key(press(KeyCode::Char('x'))),
                Action::Navigate(Screen::Home)
            );
        }

        #[tokio::test(start_paused = true)]
        async fn failed_submit_shows_notice_and_allows_retry() {
            let sink = FakeSink::failing();
            let mut state = make_state(stanford(), sink.clone());
            fill_valid(&mut state).await;

            state.handle_key(press(KeyCode::Enter));
            pump(&mut state).await;
            assert!(render(&state).contains("There was an error submitting"));
            assert_eq!(state.controller().state().fields().name, "Ada Lovelace");

            state.handle_key(press(KeyCode::Enter));
            pump(&mut state).await;
            assert_eq!(sink.applications().len(), 2);
        }
    }
}
