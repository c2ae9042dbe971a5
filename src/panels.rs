use iced::{
    alignment, font,
    widget::{button, column, container, horizontal_rule, row, scrollable, text, text_editor, Column, Row},
    Element, Font, Length,
};

use crate::diagnostics::Entry;
use crate::markdown;
use crate::session::{Session, View};
use crate::Message;

pub const APP_TITLE: &str = "Prabhu AI";
pub const DEVELOPER_HANDLE: &str = "@prabesh.paudell";
pub const ABOUT_TEXT: &str = "There is nothing you need to know about the developer.";
pub const EMPTY_HISTORY_TEXT: &str = "No questions asked yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Social {
    pub name: &'static str,
    pub url: &'static str,
}

pub static SOCIALS: [Social; 4] = [
    Social { name: "Twitter", url: "https://twitter.com/PrabeshPaudell" },
    Social { name: "GitHub", url: "https://github.com/virtualprabesh" },
    Social { name: "LinkedIn", url: "https://www.linkedin.com/in/prabesh-paudel-42b690252/" },
    Social { name: "Facebook", url: "https://www.facebook.com/https.prabesh/" },
];

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn bold() -> Font {
    Font {
        weight: font::Weight::Bold,
        ..Font::DEFAULT
    }
}

fn title<'a>(label: &'a str) -> Element<'a, Message> {
    text(label).size(22).font(bold()).into()
}

pub fn submit_label(generating: bool) -> &'static str {
    if generating {
        "Generating..."
    } else {
        "Generate answer"
    }
}

/// The submit button is the only way to start a request, so it is the
/// guard against a second one while the first is outstanding.
pub fn can_submit(generating: bool, question: &str) -> bool {
    !generating && !question.is_empty()
}

/// The editor always reports a trailing newline; the question does not
/// include it.
pub fn question_from_editor(mut raw: String) -> String {
    if raw.ends_with('\n') {
        raw.pop();
    }
    raw
}

/// Only web and mail links are handed to the system opener.
pub fn is_openable(url: &str) -> bool {
    ["https://", "http://", "mailto:"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

pub fn format_entry(entry: &Entry) -> String {
    format!("[{:?}] {}", entry.kind, entry.text)
}

pub fn header<'a>() -> Element<'a, Message> {
    let toggle = button(text("☰").size(20))
        .on_press(Message::ToggleSidebar)
        .padding(8);

    let heading = column![
        text(APP_TITLE).size(32).font(bold()),
        text(DEVELOPER_HANDLE).size(14),
    ]
    .spacing(4)
    .align_x(alignment::Horizontal::Center);

    row![toggle, container(heading).width(Length::Fill).align_x(alignment::Horizontal::Center)]
        .spacing(10)
        .align_y(alignment::Vertical::Center)
        .into()
}

pub fn sidebar(session: &Session) -> Element<'_, Message> {
    let items = View::ALL.into_iter().map(|view| {
        let label = if view == session.active_view() {
            format!("▸ {}", view.label())
        } else {
            view.label().to_string()
        };
        button(text(label).size(16))
            .on_press(Message::ShowView(view))
            .width(Length::Fill)
            .padding(12)
            .style(button::text)
            .into()
    });

    container(Column::with_children(items).spacing(4))
        .width(Length::Fixed(220.0))
        .height(Length::Fill)
        .padding(10)
        .style(container::rounded_box)
        .into()
}

pub fn active_panel<'a>(
    session: &'a Session,
    editor: &'a text_editor::Content,
    loading_frame: usize,
) -> Element<'a, Message> {
    match session.active_view() {
        View::Main => main_panel(session, editor, loading_frame),
        View::History => history_panel(session),
        View::Socials => socials_panel(),
        View::About => about_panel(),
    }
}

fn main_panel<'a>(
    session: &'a Session,
    editor: &'a text_editor::Content,
    loading_frame: usize,
) -> Element<'a, Message> {
    let generating = session.is_generating();

    let input = text_editor(editor)
        .placeholder("Ask anything to PrabhuAI")
        .on_action(Message::QuestionEdited)
        .height(Length::Fixed(160.0))
        .padding(12)
        .size(18);

    let submit = button(
        container(text(submit_label(generating)).size(16))
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Center),
    )
    .on_press_maybe(can_submit(generating, session.question()).then_some(Message::Submit))
    .width(Length::Fill)
    .padding(12);

    let mut answer = column![].spacing(10);
    if generating {
        answer = answer.push(text(SPINNER_FRAMES[loading_frame % SPINNER_FRAMES.len()]).size(28));
    }
    answer = answer.push(markdown::view(session.answer()).map(Message::OpenLink));

    let mut content = column![input, submit].spacing(10);
    if !session.answer().is_empty() {
        content = content.push(
            scrollable(container(answer).padding(15).width(Length::Fill)).height(Length::Fill),
        );
    }

    if !session.answer().is_empty() && !generating {
        let copy_button = container(
            button(text("[Copy]").size(14))
                .on_press(Message::CopyAnswer)
                .padding(10),
        )
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Right);

        content = content.push(copy_button);
    }

    content.into()
}

fn history_panel(session: &Session) -> Element<'_, Message> {
    let mut entries = column![title("Chat History")].spacing(14);

    if session.history().is_empty() {
        entries = entries.push(text(EMPTY_HISTORY_TEXT).size(16));
    }

    for entry in session.history() {
        entries = entries.push(
            column![
                row![text("Q:").font(bold()).size(16), text(entry.question.as_str()).size(16)].spacing(6),
                row![
                    text("A:").font(bold()).size(16),
                    markdown::view(&entry.answer).map(Message::OpenLink),
                ]
                .spacing(6),
                horizontal_rule(1),
            ]
            .spacing(8),
        );
    }

    scrollable(container(entries).padding(15).width(Length::Fill))
        .height(Length::Fill)
        .into()
}

fn socials_panel<'a>() -> Element<'a, Message> {
    let links = SOCIALS.iter().map(|social| {
        button(text(social.name).size(18))
            .on_press(Message::OpenLink(social.url.to_string()))
            .padding(10)
            .into()
    });

    column![title("Developer's Socials"), Row::with_children(links).spacing(12)]
        .spacing(14)
        .padding(15)
        .align_x(alignment::Horizontal::Center)
        .width(Length::Fill)
        .into()
}

fn about_panel<'a>() -> Element<'a, Message> {
    column![title("About Developer"), text(ABOUT_TEXT).size(16)]
        .spacing(14)
        .padding(15)
        .width(Length::Fill)
        .into()
}

/// Developer-only strip listing the newest diagnostic entries.
pub fn diagnostics_footer<'a>(entries: &[Entry]) -> Element<'a, Message> {
    let lines = entries
        .iter()
        .map(|entry| text(format_entry(entry)).size(12).font(Font::MONOSPACE).into());

    row![
        Column::with_children(lines).spacing(2).width(Length::Fill),
        button(text("Clear").size(12))
            .on_press(Message::ClearDiagnostics)
            .padding(6),
    ]
    .spacing(10)
    .align_y(alignment::Vertical::Bottom)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Kind;
    use crate::session::{Event, Outcome};

    fn answered(pairs: &[(&str, &str)]) -> Session {
        let mut session = Session::default();
        for (q, a) in pairs {
            session = session.apply(Event::QuestionChanged(q.to_string())).0;
            session = session.apply(Event::Submit).0;
            session = session.apply(Event::Resolved(Outcome::Answer(a.to_string()))).0;
        }
        session
    }

    #[test]
    fn test_submit_label_follows_generating() {
        assert_eq!(submit_label(false), "Generate answer");
        assert_eq!(submit_label(true), "Generating...");
    }

    #[test]
    fn test_can_submit_combinations() {
        assert!(can_submit(false, "What is 2+2?"));
        assert!(!can_submit(true, "What is 2+2?"));
        assert!(!can_submit(false, ""));
        assert!(!can_submit(true, ""));
    }

    #[test]
    fn test_can_submit_tracks_session() {
        let (session, _) = Session::default().apply(Event::QuestionChanged("hi".to_string()));
        assert!(can_submit(session.is_generating(), session.question()));

        let (session, _) = session.apply(Event::Submit);
        assert!(!can_submit(session.is_generating(), session.question()));

        let (session, _) = session.apply(Event::Resolved(Outcome::Failure("down".to_string())));
        assert!(can_submit(session.is_generating(), session.question()));
    }

    #[test]
    fn test_question_from_editor() {
        assert_eq!(question_from_editor("\n".to_string()), "");
        assert_eq!(question_from_editor("line one\nline two\n".to_string()), "line one\nline two");
        assert_eq!(question_from_editor("no newline".to_string()), "no newline");
    }

    #[test]
    fn test_is_openable() {
        assert!(is_openable("https://github.com/virtualprabesh"));
        assert!(is_openable("http://example.com"));
        assert!(is_openable("mailto:someone@example.com"));
        assert!(!is_openable("file:///etc/passwd"));
        assert!(!is_openable("javascript:alert(1)"));
        assert!(!is_openable("relative/path"));
    }

    #[test]
    fn test_socials_are_https_links() {
        let names: Vec<&str> = SOCIALS.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Twitter", "GitHub", "LinkedIn", "Facebook"]);
        assert!(SOCIALS.iter().all(|s| is_openable(s.url)));
    }

    #[test]
    fn test_format_entry() {
        let entry = Entry { text: "HTTP 503".to_string(), kind: Kind::Failure };
        assert_eq!(format_entry(&entry), "[Failure] HTTP 503");
    }

    #[test]
    fn test_panels_build_with_populated_session() {
        let session = answered(&[("What is 2+2?", "4"), ("Links?", "See [docs](https://docs.rs)")]);
        assert_eq!(session.history().len(), 2);

        let _history = history_panel(&session);
        let _sidebar = sidebar(&session);
        let _socials = socials_panel();
        let _about = about_panel();
        let _header = header();
        let _footer = diagnostics_footer(&[Entry { text: "x".to_string(), kind: Kind::Ui }]);
    }
}
