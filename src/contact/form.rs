use crate::app_config::Contact;
use crate::contact::mailto::mailto_link;
use crate::contact::sender::{EmailJsSender, EmailSender, SendError};
use crate::contact::validation::{is_spam, is_valid_email, sanitize_input};
use reqwest::Client;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

const NAME_LENGTH: RangeInclusive<usize> = 2..=100;
const SUBJECT_LENGTH: RangeInclusive<usize> = 3..=200;
const MESSAGE_LENGTH: RangeInclusive<usize> = 10..=2000;

/// Raw field values as submitted.
#[derive(Clone, Default, Debug)]
pub struct FormInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Hidden field that humans leave empty.
    pub honeypot: String,
}

/// A sanitized and validated message.
#[derive(Clone, PartialEq, Debug)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Clone, PartialEq, Debug)]
pub enum SubmitOutcome {
    Sent,
    /// No email service is configured; the visitor should open this link instead.
    Fallback(String),
}

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("{0}")]
    Validation(ValidationError),
    #[error("Your message was flagged as spam. Please try again with different content.")]
    SpamDetected,
    #[error("{0}")]
    BotSuspected(BotSignal),
    #[error("Failed to send message: {0}")]
    Send(#[from] SendError),
}

#[derive(Error, Clone, Copy, PartialEq, Debug)]
pub enum ValidationError {
    #[error("Please enter a valid name (2-100 characters)")]
    Name,
    #[error("Please enter a valid email address")]
    Email,
    #[error("Please enter a valid subject (3-200 characters)")]
    Subject,
    #[error("Please enter a valid message (10-2000 characters)")]
    Message,
}

#[derive(Error, Clone, Copy, PartialEq, Debug)]
pub enum BotSignal {
    #[error("Security validation failed")]
    Honeypot,
    #[error("Please wait a moment before submitting")]
    TooFast,
}

#[derive(Debug)]
pub struct ContactForm {
    sender: Option<Arc<dyn EmailSender>>,
    recipient: String,
    min_fill_time: Duration,
    opened_at: Mutex<Instant>,
}

impl ContactForm {
    pub fn new(sender: Option<Arc<dyn EmailSender>>, recipient: impl Into<String>, min_fill_time: Duration) -> Self {
        ContactForm {
            sender,
            recipient: recipient.into(),
            min_fill_time,
            opened_at: Mutex::new(Instant::now()),
        }
    }

    /// Sends through EmailJS when it is fully configured, otherwise falls back to `mailto:` links.
    pub fn from_config(config: &Contact, client: Client) -> Self {
        let sender = config.emailjs().map(|credentials| {
            Arc::new(EmailJsSender::new(client, config.api_url(), credentials)) as Arc<dyn EmailSender>
        });

        if sender.is_none() {
            warn!("⚠️ EmailJS is not configured, contact messages fall back to mailto links");
        }

        ContactForm::new(sender, config.recipient(), config.min_fill_time())
    }

    /// Restarts the fill timer, as if the form was just opened.
    pub fn reset(&self) {
        *self.lock() = Instant::now();
    }

    /// Runs the bot checks, sanitizes every field and validates the result.
    pub fn validate(&self, input: &FormInput) -> Result<ContactMessage, ContactError> {
        if !input.honeypot.is_empty() {
            warn!("⚠️ Bot detected via honeypot");
            return Err(ContactError::BotSuspected(BotSignal::Honeypot));
        }

        if self.lock().elapsed() < self.min_fill_time {
            warn!("⚠️ Bot detected: submitted too fast");
            return Err(ContactError::BotSuspected(BotSignal::TooFast));
        }

        let message = ContactMessage {
            name: sanitize_input(&input.name),
            email: sanitize_input(&input.email),
            subject: sanitize_input(&input.subject),
            message: sanitize_input(&input.message),
        };

        check_length(&message.name, NAME_LENGTH, ValidationError::Name)?;
        if !is_valid_email(&message.email) {
            return Err(ContactError::Validation(ValidationError::Email));
        }
        check_length(&message.subject, SUBJECT_LENGTH, ValidationError::Subject)?;
        check_length(&message.message, MESSAGE_LENGTH, ValidationError::Message)?;

        if [&message.name, &message.subject, &message.message].into_iter().any(|text| is_spam(text)) {
            warn!("⚠️ Spam content detected");
            return Err(ContactError::SpamDetected);
        }

        Ok(message)
    }

    #[instrument(skip_all)]
    pub async fn submit(&self, input: &FormInput) -> Result<SubmitOutcome, ContactError> {
        let message = self.validate(input)?;

        let outcome = match &self.sender {
            Some(sender) => {
                sender.send(&message).await?;
                info!("✉️ Contact message from {} sent", message.name);
                SubmitOutcome::Sent
            }
            None => SubmitOutcome::Fallback(mailto_link(&self.recipient, &message)),
        };

        self.reset();
        Ok(outcome)
    }

    fn lock(&self) -> MutexGuard<'_, Instant> {
        self.opened_at.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_length(value: &str, range: RangeInclusive<usize>, error: ValidationError) -> Result<(), ContactError> {
    if range.contains(&value.chars().count()) {
        Ok(())
    } else {
        Err(ContactError::Validation(error))
    }
}
