use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::layout::{Constraint, Layout};
use ratatui::{Frame, Terminal};
use tracing::{debug, info};

use crate::api::{ApplicationSink, InstitutionDirectory};
use crate::config::Config;
use crate::form::{FormEvent, SearchSettings, StudentFormController, WaitlistController};

use super::action::{Action, ScreenState};
use super::error::AppError;
use super::screens::{
    HelpState, HomeState, StudentScreenState, WaitlistScreenState, draw_help, draw_home,
    draw_student, draw_waitlist,
};
use super::widgets::status_bar::{StatusBarContext, draw_status_bar};

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Choose between the two forms.
    Home,
    /// Apply for funding as a student.
    StudentApplication,
    /// Join the donor waitlist.
    DonorWaitlist,
    /// Show keybinding help.
    Help,
}

impl Screen {
    /// Human-readable name used in titles.
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::StudentApplication => "Student Application",
            Self::DonorWaitlist => "Donor Waitlist",
            Self::Help => "Help",
        }
    }
}

/// Top-level application state.
///
/// A form screen's controller is mounted when the screen is entered from
/// home and dropped when the user goes back home, which cancels its timers
/// and requests. Visiting help keeps it mounted.
pub struct App {
    screen: Screen,
    config: Config,
    directory: Arc<dyn InstitutionDirectory>,
    sink: Arc<dyn ApplicationSink>,
    home: HomeState,
    help: HelpState,
    student: Option<StudentScreenState>,
    waitlist: Option<WaitlistScreenState>,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` starting on the [`Screen::Home`] screen.
    pub fn new(
        config: Config,
        directory: Arc<dyn InstitutionDirectory>,
        sink: Arc<dyn ApplicationSink>,
    ) -> Self {
        Self {
            screen: Screen::Home,
            config,
            directory,
            sink,
            home: HomeState::new(),
            help: HelpState::new(),
            student: None,
            waitlist: None,
            should_quit: false,
        }
    }

    /// Main event loop: draw, then wait for a key or a form completion.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub async fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut events = EventStream::new();
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => self.handle_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                event = self.next_form_event() => self.handle_form_event(event),
            }
        }
        Ok(())
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let [main_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        match self.screen {
            Screen::Home => draw_home(&self.home, frame, main_area),
            Screen::StudentApplication => {
                if let Some(student) = &self.student {
                    draw_student(student, frame, main_area);
                }
            }
            Screen::DonorWaitlist => {
                if let Some(waitlist) = &self.waitlist {
                    draw_waitlist(waitlist, frame, main_area);
                }
            }
            Screen::Help => draw_help(&self.help, frame, main_area),
        }

        draw_status_bar(&self.status(), frame, status_area);
    }

    /// Handles a key event: global keys first, then screen-specific.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if key.code == KeyCode::F(1) {
            if self.screen != Screen::Help {
                self.help.set_origin(self.screen);
                self.help.reset();
                self.screen = Screen::Help;
            }
            return;
        }

        let action = match self.screen {
            Screen::Home => self.home.handle_key(key),
            Screen::StudentApplication => self
                .student
                .as_mut()
                .map_or(Action::None, |s| s.handle_key(key)),
            Screen::DonorWaitlist => self
                .waitlist
                .as_mut()
                .map_or(Action::None, |s| s.handle_key(key)),
            Screen::Help => self.help.handle_key(key),
        };
        self.apply(action);
    }

    /// Waits for a completion from the mounted form.
    ///
    /// Pending forever when no form is mounted.
    pub async fn next_form_event(&mut self) -> FormEvent {
        let next = match (&mut self.student, &mut self.waitlist) {
            (Some(student), _) => student.next_event().await,
            (None, Some(waitlist)) => waitlist.next_event().await,
            (None, None) => None,
        };
        match next {
            Some(event) => event,
            None => std::future::pending().await,
        }
    }

    /// Applies a completion to the mounted form.
    pub fn handle_form_event(&mut self, event: FormEvent) {
        if let Some(student) = self.student.as_mut() {
            student.handle_form_event(event);
        } else if let Some(waitlist) = self.waitlist.as_mut() {
            waitlist.handle_form_event(event);
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::Navigate(target) => self.navigate(target),
        }
    }

    fn navigate(&mut self, target: Screen) {
        match target {
            Screen::Home => {
                let student = self.student.take();
                let waitlist = self.waitlist.take();
                if student.is_some() || waitlist.is_some() {
                    debug!("form unmounted");
                }
            }
            Screen::StudentApplication if self.student.is_none() => {
                info!("opening student application");
                let controller = StudentFormController::new(
                    Arc::clone(&self.directory),
                    Arc::clone(&self.sink),
                    SearchSettings::from(&self.config.search),
                    &self.config.application,
                );
                self.student = Some(StudentScreenState::new(controller));
            }
            Screen::DonorWaitlist if self.waitlist.is_none() => {
                info!("opening donor waitlist");
                let controller = WaitlistController::new(Arc::clone(&self.sink));
                self.waitlist = Some(WaitlistScreenState::new(controller));
            }
            _ => {}
        }
        self.screen = target;
    }

    /// Status bar content for the current state.
    pub fn status(&self) -> StatusBarContext {
        let activity = match (&self.student, &self.waitlist) {
            (Some(student), _) => student.activity(),
            (None, Some(waitlist)) => waitlist.activity(),
            (None, None) => Default::default(),
        };
        StatusBarContext {
            api_url: self.config.api.base_url.clone(),
            activity,
        }
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the mounted student form, if any.
    pub fn student(&self) -> Option<&StudentScreenState> {
        self.student.as_ref()
    }

    /// Returns the mounted waitlist form, if any.
    pub fn waitlist(&self) -> Option<&WaitlistScreenState> {
        self.waitlist.as_ref()
    }
}
