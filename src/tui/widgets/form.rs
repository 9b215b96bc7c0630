//! Form widget: focus tracking and rendering for screens whose values live
//! in a controller.

use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// How a field takes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, edited with printable keys and Backspace.
    Text,
    /// A fixed set of options cycled with Left/Right.
    Choice,
}

/// A single field within a [`Form`].
#[derive(Debug, Clone)]
pub struct FormField {
    /// Display label shown in the field's border.
    pub label: String,
    /// Current value, as last synced from the owner.
    pub value: String,
    /// Validation error message, if any.
    pub error: Option<String>,
    /// Whether the label is marked as required.
    pub required: bool,
    pub kind: FieldKind,
}

impl FormField {
    /// Creates a new free-text field.
    pub fn new(label: impl Into<String>, required: bool) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            error: None,
            required,
            kind: FieldKind::Text,
        }
    }

    /// Creates a new choice field.
    pub fn choice(label: impl Into<String>, required: bool) -> Self {
        Self {
            kind: FieldKind::Choice,
            ..Self::new(label, required)
        }
    }
}

/// A multi-field form with focus management.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

impl Form {
    /// Creates a new form with the given fields. Focus starts on the first field.
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    /// Returns the index of the currently focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves focus to `index` if it exists.
    pub fn set_focus(&mut self, index: usize) {
        if index < self.fields.len() {
            self.focus = index;
        }
    }

    /// Moves focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + 1) % self.fields.len();
    }

    /// Moves focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Returns what the focused text field would contain after `key`.
    ///
    /// `None` if the key is not an edit or the focused field is a choice.
    pub fn edited(&self, key: KeyCode) -> Option<String> {
        let field = self.fields.get(self.focus)?;
        if field.kind != FieldKind::Text {
            return None;
        }
        let mut value = field.value.clone();
        match key {
            KeyCode::Char(ch) => value.push(ch),
            KeyCode::Backspace => {
                value.pop()?;
            }
            _ => return None,
        }
        Some(value)
    }

    /// Replaces the value of the field at `index`.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    /// Sets or clears the error message on a field by index.
    pub fn set_error(&mut self, index: usize, error: Option<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.error = error;
        }
    }

    /// Returns `true` if any field has an error set.
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }

    /// Returns the value of the field at `index`, or an empty string if out of bounds.
    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    /// Returns a reference to the fields.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }
}

/// Height of one rendered field row.
pub const ROW_HEIGHT: u16 = 3;

/// Renders a form within the given area.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(form: &Form, frame: &mut Frame, area: Rect) {
    let constraints: Vec<Constraint> = form
        .fields
        .iter()
        .map(|_| Constraint::Length(ROW_HEIGHT))
        .collect();

    let rows = Layout::vertical(constraints).split(area);

    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = i == form.focus;

        let border_color = if field.error.is_some() {
            Color::Red
        } else if is_focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let label = if field.required {
            format!("{} *", field.label)
        } else {
            field.label.clone()
        };

        let block = Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let spans = match field.kind {
            FieldKind::Text => {
                let mut spans = vec![Span::raw(&field.value)];
                if is_focused {
                    spans.push(Span::styled(
                        "\u{2588}",
                        Style::default().add_modifier(Modifier::SLOW_BLINK),
                    ));
                }
                spans
            }
            FieldKind::Choice => {
                let shown = if field.value.is_empty() {
                    Span::styled("select", Style::default().fg(Color::DarkGray))
                } else {
                    Span::raw(&field.value)
                };
                if is_focused {
                    vec![Span::raw("\u{25c0} "), shown, Span::raw(" \u{25b6}")]
                } else {
                    vec![shown]
                }
            }
        };

        let paragraph = Paragraph::new(Line::from(spans)).block(block);
        frame.render_widget(paragraph, rows[i]);

        if let Some(ref err) = field.error {
            let error_line = Paragraph::new(Span::styled(err, Style::default().fg(Color::Red)));
            // Overlaps the bottom border of the row
            let err_area = Rect {
                x: rows[i].x + 2,
                y: rows[i].y + ROW_HEIGHT.saturating_sub(1),
                width: rows[i].width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(error_line, err_area);
        }
    }
}
