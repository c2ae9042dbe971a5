#[macro_use]
mod diagnostics;
mod config;
mod gemini;
mod markdown;
mod panels;
mod session;

use iced::{
    widget::{column, container, row, text_editor},
    Element, Length, Size, Subscription, Task, Theme,
    time, clipboard,
    window,
};
use std::time::Duration;

use diagnostics::Kind;
use gemini::GeminiClient;
use session::{Event, Outcome, Session, View};

fn main() -> iced::Result {
    let config = config::Config::load();
    let window = window::Settings {
        size: Size::new(config.window.width as f32, config.window.height as f32),
        min_size: Some(Size::new(config.window.min_width as f32, config.window.min_height as f32)),
        position: window::Position::Centered,
        ..Default::default()
    };

    iced::application(panels::APP_TITLE, App::update, App::view)
        .theme(App::theme)
        .subscription(App::subscription)
        .window(window)
        .run_with(move || App::new(config))
}

#[derive(Debug, Clone)]
pub enum Message {
    QuestionEdited(text_editor::Action),
    Submit,
    Answered(Outcome),
    ShowView(View),
    ToggleSidebar,
    OpenLink(String),
    CopyAnswer,
    ClearDiagnostics,
    Tick,
}

struct App {
    session: Session,
    editor: text_editor::Content,
    client: GeminiClient,
    loading_frame: usize,
    show_diagnostics: bool,
}

impl App {
    fn new(config: config::Config) -> (Self, Task<Message>) {
        let client = GeminiClient::with_config(&config.gemini);
        debug_eprintln!("Using model {} at {}", client.get_model(), config.gemini.endpoint);

        let app = App {
            session: Session::default(),
            editor: text_editor::Content::new(),
            client,
            loading_frame: 0,
            show_diagnostics: diagnostics::enabled(),
        };

        (app, Task::none())
    }

    /// Runs one session transition and, if it asked for one, the remote call.
    fn dispatch(&mut self, event: Event) -> Task<Message> {
        let (next, request) = std::mem::take(&mut self.session).apply(event);
        self.session = next;

        match request {
            Some(request) => {
                self.loading_frame = 0;
                let client = self.client.clone();
                Task::future(async move { Message::Answered(client.answer(&request.prompt).await) })
            }
            None => Task::none(),
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QuestionEdited(action) => {
                let is_edit = action.is_edit();
                self.editor.perform(action);
                if is_edit {
                    let question = panels::question_from_editor(self.editor.text());
                    return self.dispatch(Event::QuestionChanged(question));
                }
                Task::none()
            }
            Message::Submit => self.dispatch(Event::Submit),
            Message::Answered(outcome) => self.dispatch(Event::Resolved(outcome)),
            Message::ShowView(view) => {
                diagnostics::log_with(Kind::Ui, format!("view -> {}", view.label()));
                self.dispatch(Event::SetView(view))
            }
            Message::ToggleSidebar => {
                let task = self.dispatch(Event::ToggleSidebar);
                diagnostics::log_with(Kind::Ui, format!("sidebar open: {}", self.session.sidebar_open()));
                task
            }
            Message::OpenLink(url) => {
                if !panels::is_openable(&url) {
                    diagnostics::log_with(Kind::Ui, format!("ignored link {}", url));
                } else if let Err(e) = open::that(&url) {
                    diagnostics::log_with(Kind::Failure, format!("could not open {}: {}", url, e));
                }
                Task::none()
            }
            Message::CopyAnswer => clipboard::write(self.session.answer().to_string()),
            Message::ClearDiagnostics => {
                diagnostics::clear();
                Task::none()
            }
            Message::Tick => {
                if self.session.is_generating() {
                    self.loading_frame = self.loading_frame.wrapping_add(1);
                }
                Task::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.session.is_generating() {
            time::every(Duration::from_millis(80)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn view(&self) -> Element<Message> {
        let panel = panels::active_panel(&self.session, &self.editor, self.loading_frame);

        let body: Element<Message> = if self.session.sidebar_open() {
            row![panels::sidebar(&self.session), panel].spacing(12).into()
        } else {
            panel
        };

        let mut page = column![panels::header(), body].spacing(16).padding(16);
        if self.show_diagnostics {
            page = page.push(panels::diagnostics_footer(&diagnostics::recent(5)));
        }

        container(page)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::GruvboxLight
    }
}
