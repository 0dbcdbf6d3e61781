use tokio::time::Instant;

/// A message shown in the form until `expires`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub expires: Instant,
}

/// Headless model of the rendered search form.
#[derive(Debug, Default)]
pub struct FormState {
    pub input: String,
    /// The container carries the `active` class
    pub open: bool,
    message: Option<Message>,
}

impl FormState {
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn message_expiry(&self) -> Option<Instant> {
        self.message.as_ref().map(|message| message.expires)
    }

    /// Show `text` until `expires`, replacing any current message.
    pub fn show_message(&mut self, text: &str, expires: Instant) {
        self.message = Some(Message {
            text: text.to_owned(),
            expires,
        });
    }

    /// Drop the message if it has expired by `now`.
    pub fn expire_message(&mut self, now: Instant) -> bool {
        if self.message_expiry().is_some_and(|expires| expires <= now) {
            self.message = None;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.input.clear();
        self.open = false;
        self.message = None;
    }
}
