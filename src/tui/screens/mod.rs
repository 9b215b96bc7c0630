//! TUI screen implementations.

pub mod help;
pub mod home;
pub mod student;
pub mod waitlist;

pub use help::{HelpState, draw_help};
pub use home::{HomeState, draw_home};
pub use student::{StudentScreenState, draw_student};
pub use waitlist::{WaitlistScreenState, draw_waitlist};
