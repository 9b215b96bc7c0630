mod application;
mod degree;
mod field;
mod institution;
mod validation;

pub use application::{DonorSignup, StudentApplication};
pub use degree::DegreeLevel;
pub use field::Field;
pub use institution::{Institution, Suggestion};
pub use validation::{ValidationError, validate_amount, validate_email, validate_required};
