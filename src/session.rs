//! Session state and its transitions.
//!
//! The whole controller is a value: [`Session::apply`] takes the current
//! state and one [`Event`] and returns the next state plus, at most, one
//! [`Request`] for the caller to run. Nothing here does I/O.

pub const LOADING_MESSAGE: &str = "Loading your answer... \n It might take up to 10 seconds";
pub const FAILURE_MESSAGE: &str = "Sorry - Something went wrong. Please try again!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Main,
    History,
    Socials,
    About,
}

impl View {
    pub const ALL: [View; 4] = [View::Main, View::History, View::Socials, View::About];

    pub fn label(self) -> &'static str {
        match self {
            View::Main => "Prabhu AI",
            View::History => "History",
            View::Socials => "Developer's Socials",
            View::About => "About Developer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaEntry {
    pub question: String,
    pub answer: String,
}

/// Result of one call to the answering service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answer(String),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    QuestionChanged(String),
    Submit,
    Resolved(Outcome),
    SetView(View),
    ToggleSidebar,
}

/// Emitted when a submission is accepted; the caller sends `prompt` upstream
/// and feeds the result back as [`Event::Resolved`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Generating { prompt: String },
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    question: String,
    answer: String,
    phase: Phase,
    history: Vec<QaEntry>,
    active_view: View,
    sidebar_open: bool,
}

impl Session {
    pub fn apply(mut self, event: Event) -> (Self, Option<Request>) {
        let request = match event {
            Event::QuestionChanged(text) => {
                self.question = text;
                None
            }
            Event::Submit => self.submit(),
            Event::Resolved(outcome) => {
                self.resolve(outcome);
                None
            }
            Event::SetView(view) => {
                self.active_view = view;
                None
            }
            Event::ToggleSidebar => {
                self.sidebar_open = !self.sidebar_open;
                None
            }
        };
        (self, request)
    }

    fn submit(&mut self) -> Option<Request> {
        if self.question.is_empty() || self.is_generating() {
            return None;
        }

        let prompt = self.question.clone();
        self.phase = Phase::Generating { prompt: prompt.clone() };
        self.answer = LOADING_MESSAGE.to_string();
        Some(Request { prompt })
    }

    fn resolve(&mut self, outcome: Outcome) {
        // A result with nothing outstanding has no question to pair with.
        let Phase::Generating { prompt } = std::mem::take(&mut self.phase) else {
            return;
        };

        match outcome {
            Outcome::Answer(text) => {
                self.answer = text.clone();
                self.history.push(QaEntry { question: prompt, answer: text });
            }
            Outcome::Failure(_) => {
                self.answer = FAILURE_MESSAGE.to_string();
            }
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating { .. })
    }

    pub fn history(&self) -> &[QaEntry] {
        &self.history
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }
}
