mod form;
mod mailto;
mod sender;
mod validation;

pub use form::{ContactForm, ContactMessage, FormInput, SubmitOutcome};
