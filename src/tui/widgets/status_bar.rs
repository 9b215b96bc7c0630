//! Status bar widget: API endpoint and background activity.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// What the mounted form is doing in the background.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    /// Work in flight, e.g. a lookup or submission.
    Busy(String),
    /// The last operation completed.
    Done(String),
    /// The last operation failed.
    Failed(String),
}

/// Data passed to the status bar widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBarContext {
    /// Base URL of the platform API.
    pub api_url: String,
    pub activity: Activity,
}

/// Renders a one-line status bar.
///
/// Display format: `<api_url>  <activity>`, with the activity colored
/// yellow while busy, green when done, red on failure.
#[mutants::skip]
pub fn draw_status_bar(ctx: &StatusBarContext, frame: &mut Frame, area: Rect) {
    let cyan = Style::default().fg(Color::Cyan);

    let mut spans = vec![Span::styled(ctx.api_url.clone(), cyan)];
    let activity = match &ctx.activity {
        Activity::Idle => None,
        Activity::Busy(msg) => Some((msg, Color::Yellow)),
        Activity::Done(msg) => Some((msg, Color::Green)),
        Activity::Failed(msg) => Some((msg, Color::Red)),
    };
    if let Some((msg, color)) = activity {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(msg.clone(), Style::default().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
