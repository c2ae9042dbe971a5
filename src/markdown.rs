use iced::{
    font,
    widget::{container, horizontal_rule, rich_text, span, text, Column},
    Color, Element, Font, Length, Padding,
};
use pulldown_cmark::{Event, Options, Parser, Tag};

/// A run of inline text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inline {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
    pub strike: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl Inline {
    pub fn plain(text: &str) -> Self {
        Inline {
            text: text.to_string(),
            ..Inline::default()
        }
    }

    fn same_style(&self, other: &Inline) -> bool {
        self.strong == other.strong
            && self.emphasis == other.emphasis
            && self.strike == other.strike
            && self.code == other.code
            && self.link == other.link
    }
}

pub fn plain_text(inlines: &[Inline]) -> String {
    inlines.iter().map(|i| i.text.as_str()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(Vec<Inline>),
    ListItem { depth: usize, marker: String, content: Vec<Inline> },
    Code(String),
    Quote(Vec<Inline>),
    Rule,
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    inlines: Vec<Inline>,
    code: String,
    // Next ordinal per open list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    item: Option<(usize, String)>,
    quote_depth: usize,
    in_code: bool,
    strong: usize,
    emphasis: usize,
    strike: usize,
    link: Option<String>,
}

impl Builder {
    fn push_text(&mut self, text: &str, code: bool) {
        let next = Inline {
            text: text.to_string(),
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            strike: self.strike > 0,
            code,
            link: self.link.clone(),
        };
        match self.inlines.last_mut() {
            Some(last) if last.same_style(&next) => last.text.push_str(&next.text),
            _ => self.inlines.push(next),
        }
    }

    fn take_inlines(&mut self) -> Vec<Inline> {
        let mut inlines = std::mem::take(&mut self.inlines);
        if let Some(first) = inlines.first_mut() {
            first.text = first.text.trim_start().to_string();
        }
        if let Some(last) = inlines.last_mut() {
            last.text = last.text.trim_end().to_string();
        }
        inlines.retain(|i| !i.text.is_empty());
        inlines
    }

    fn flush_item(&mut self) {
        if let Some((depth, marker)) = self.item.take() {
            let content = self.take_inlines();
            self.blocks.push(Block::ListItem { depth, marker, content });
        }
    }

    fn start_item(&mut self) {
        self.flush_item();
        let depth = self.lists.len().saturating_sub(1);
        let marker = match self.lists.last_mut() {
            Some(Some(n)) => {
                let marker = format!("{}.", n);
                *n += 1;
                marker
            }
            _ => "•".to_string(),
        };
        self.item = Some((depth, marker));
    }

    fn end_paragraph(&mut self) {
        if self.item.is_some() {
            return;
        }
        let inlines = self.take_inlines();
        if inlines.is_empty() {
            return;
        }
        if self.quote_depth > 0 {
            self.blocks.push(Block::Quote(inlines));
        } else {
            self.blocks.push(Block::Paragraph(inlines));
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Paragraph) => {
                if self.item.is_some() && !plain_text(&self.inlines).trim().is_empty() {
                    self.push_text("\n", false);
                }
            }
            Event::End(Tag::Paragraph) => self.end_paragraph(),
            // Inside a list item the heading text becomes the item's text.
            Event::Start(Tag::Heading(..)) => {
                if self.item.is_none() {
                    self.inlines.clear();
                }
            }
            Event::End(Tag::Heading(level, ..)) => {
                if self.item.is_none() {
                    let text = plain_text(&self.take_inlines());
                    self.blocks.push(Block::Heading { level: level as u8, text });
                }
            }
            Event::Start(Tag::BlockQuote) => self.quote_depth += 1,
            Event::End(Tag::BlockQuote) => self.quote_depth = self.quote_depth.saturating_sub(1),
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_item();
                self.code.clear();
                self.in_code = true;
            }
            Event::End(Tag::CodeBlock(_)) => {
                let code = std::mem::take(&mut self.code);
                self.blocks.push(Block::Code(code.trim_end_matches('\n').to_string()));
                self.in_code = false;
            }
            Event::Start(Tag::List(start)) => {
                self.flush_item();
                self.lists.push(start);
            }
            Event::End(Tag::List(_)) => {
                self.flush_item();
                self.lists.pop();
            }
            Event::Start(Tag::Item) => self.start_item(),
            Event::End(Tag::Item) => self.flush_item(),
            Event::Start(Tag::Strong) => self.strong += 1,
            Event::End(Tag::Strong) => self.strong = self.strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => self.emphasis += 1,
            Event::End(Tag::Emphasis) => self.emphasis = self.emphasis.saturating_sub(1),
            Event::Start(Tag::Strikethrough) => self.strike += 1,
            Event::End(Tag::Strikethrough) => self.strike = self.strike.saturating_sub(1),
            Event::Start(Tag::Link(_, url, _)) => self.link = Some(url.to_string()),
            Event::End(Tag::Link(..)) => self.link = None,
            Event::Text(t) => {
                if self.in_code {
                    self.code.push_str(&t);
                } else {
                    self.push_text(&t, false);
                }
            }
            Event::Code(code) => self.push_text(&code, true),
            Event::Html(html) => self.push_text(&html, false),
            Event::SoftBreak => self.push_text(" ", false),
            Event::HardBreak => self.push_text("\n", false),
            Event::Rule => {
                self.flush_item();
                self.blocks.push(Block::Rule);
            }
            Event::TaskListMarker(done) => {
                self.push_text(if done { "[x] " } else { "[ ] " }, false);
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_item();
        let rest = self.take_inlines();
        if !rest.is_empty() {
            self.blocks.push(Block::Paragraph(rest));
        }
        self.blocks
    }
}

pub fn parse(markdown: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut builder = Builder::default();
    for event in Parser::new_ext(markdown, options) {
        builder.event(event);
    }
    builder.finish()
}

fn heading_size(level: u8) -> u16 {
    match level {
        1 => 26,
        2 => 22,
        3 => 19,
        _ => 17,
    }
}

fn inline_font(inline: &Inline) -> Font {
    let mut font = if inline.code { Font::MONOSPACE } else { Font::DEFAULT };
    if inline.strong {
        font.weight = font::Weight::Bold;
    }
    if inline.emphasis {
        font.style = font::Style::Italic;
    }
    font
}

/// Clicking a link emits its URL.
fn rich<'a>(inlines: Vec<Inline>, size: u16, italic: bool) -> Element<'a, String> {
    let spans: Vec<text::Span<'a, String>> = inlines
        .into_iter()
        .map(|inline| {
            let mut font = inline_font(&inline);
            if italic {
                font.style = font::Style::Italic;
            }
            let mut piece = span(inline.text).font(font);
            if inline.strike {
                piece = piece.color(Color::from_rgb(0.55, 0.55, 0.55));
            }
            if let Some(url) = inline.link {
                piece = piece.color(Color::from_rgb(0.16, 0.42, 0.78)).link(url);
            }
            piece
        })
        .collect();

    let paragraph: text::Rich<'a, String> = rich_text(spans).size(size);
    paragraph.into()
}

pub fn view<'a>(markdown: &str) -> Element<'a, String> {
    let bold = Font {
        weight: font::Weight::Bold,
        ..Font::DEFAULT
    };

    let children = parse(markdown).into_iter().map(|block| -> Element<'a, String> {
        match block {
            Block::Heading { level, text: body } => {
                text(body).size(heading_size(level)).font(bold).into()
            }
            Block::Paragraph(inlines) => rich(inlines, 16, false),
            Block::ListItem { depth, marker, content } => {
                let mut line = vec![Inline::plain(&format!("{} ", marker))];
                line.extend(content);
                container(rich(line, 16, false))
                    .padding(Padding {
                        left: 18.0 * depth as f32,
                        ..Padding::ZERO
                    })
                    .into()
            }
            Block::Code(code) => container(text(code).size(14).font(Font::MONOSPACE))
                .padding(10)
                .width(Length::Fill)
                .style(container::rounded_box)
                .into(),
            Block::Quote(inlines) => container(rich(inlines, 16, true))
                .padding(Padding {
                    left: 16.0,
                    ..Padding::ZERO
                })
                .into(),
            Block::Rule => horizontal_rule(1).into(),
        }
    });

    Column::with_children(children).spacing(10).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Block {
        Block::Paragraph(vec![Inline::plain(text)])
    }

    fn item(depth: usize, marker: &str, text: &str) -> Block {
        Block::ListItem {
            depth,
            marker: marker.to_string(),
            content: vec![Inline::plain(text)],
        }
    }

    #[test]
    fn test_plain_text_is_one_paragraph() {
        assert_eq!(parse("4"), vec![para("4")]);
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let blocks = parse("# Title\n\nFirst line\nsame paragraph.\n\n### Small");
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 1, text: "Title".to_string() },
                para("First line same paragraph."),
                Block::Heading { level: 3, text: "Small".to_string() },
            ]
        );
    }

    #[test]
    fn test_emphasis_and_inline_code_are_styled() {
        let blocks = parse("Use **bold**, *italic*, ~~old~~ and `cargo build`.");
        let Block::Paragraph(inlines) = &blocks[0] else {
            panic!("expected a paragraph, got {:?}", blocks);
        };
        assert_eq!(plain_text(inlines), "Use bold, italic, old and cargo build.");

        let bold = inlines.iter().find(|i| i.text == "bold").unwrap();
        assert!(bold.strong && !bold.emphasis);
        let italic = inlines.iter().find(|i| i.text == "italic").unwrap();
        assert!(italic.emphasis && !italic.strong);
        let struck = inlines.iter().find(|i| i.text == "old").unwrap();
        assert!(struck.strike);
        let code = inlines.iter().find(|i| i.text == "cargo build").unwrap();
        assert!(code.code);
        assert!(!inlines[0].strong && !inlines[0].code);
    }

    #[test]
    fn test_nested_emphasis() {
        let blocks = parse("***both***");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![Inline {
                text: "both".to_string(),
                strong: true,
                emphasis: true,
                ..Inline::default()
            }])]
        );
    }

    #[test]
    fn test_links_keep_target() {
        let blocks = parse("See [the docs](https://example.com/x) and **this**.");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![
                Inline::plain("See "),
                Inline {
                    text: "the docs".to_string(),
                    link: Some("https://example.com/x".to_string()),
                    ..Inline::default()
                },
                Inline::plain(" and "),
                Inline {
                    text: "this".to_string(),
                    strong: true,
                    ..Inline::default()
                },
                Inline::plain("."),
            ])]
        );
    }

    #[test]
    fn test_autolink_keeps_target() {
        let blocks = parse("<https://rust-lang.org>");
        let Block::Paragraph(inlines) = &blocks[0] else {
            panic!("expected a paragraph");
        };
        assert_eq!(inlines[0].text, "https://rust-lang.org");
        assert_eq!(inlines[0].link.as_deref(), Some("https://rust-lang.org"));
    }

    #[test]
    fn test_bullet_list_with_nesting() {
        let blocks = parse("* one\n* two\n  * inner\n* three\n");
        assert_eq!(
            blocks,
            vec![
                item(0, "•", "one"),
                item(0, "•", "two"),
                item(1, "•", "inner"),
                item(0, "•", "three"),
            ]
        );
    }

    #[test]
    fn test_ordered_list_counts_from_start() {
        let blocks = parse("3. three\n4. four\n5. five\n");
        assert_eq!(blocks, vec![item(0, "3.", "three"), item(0, "4.", "four"), item(0, "5.", "five")]);
    }

    #[test]
    fn test_loose_list_items() {
        let blocks = parse("1. first\n\n   more\n\n2. second\n");
        assert_eq!(blocks, vec![item(0, "1.", "first\nmore"), item(0, "2.", "second")]);
    }

    #[test]
    fn test_task_list_markers() {
        let blocks = parse("- [x] done\n- [ ] todo\n");
        assert_eq!(blocks, vec![item(0, "•", "[x] done"), item(0, "•", "[ ] todo")]);
    }

    #[test]
    fn test_heading_inside_list_item() {
        let blocks = parse("- # Title\n- plain\n");
        assert_eq!(blocks, vec![item(0, "•", "Title"), item(0, "•", "plain")]);
    }

    #[test]
    fn test_code_block_inside_list_item() {
        let blocks = parse("1. step\n\n   ```\n   cargo run\n   ```\n2. done\n");
        assert_eq!(
            blocks,
            vec![
                item(0, "1.", "step"),
                Block::Code("cargo run".to_string()),
                item(0, "2.", "done"),
            ]
        );
    }

    #[test]
    fn test_code_block_preserved() {
        let blocks = parse("```rust\nfn main() {\n    println!(\"hi\");\n}\n```\nAfter.");
        assert_eq!(
            blocks,
            vec![
                Block::Code("fn main() {\n    println!(\"hi\");\n}".to_string()),
                para("After."),
            ]
        );
    }

    #[test]
    fn test_quote_and_rule() {
        let blocks = parse("> quoted words\n\n---\n\ntail");
        assert_eq!(
            blocks,
            vec![
                Block::Quote(vec![Inline::plain("quoted words")]),
                Block::Rule,
                para("tail"),
            ]
        );
    }

    #[test]
    fn test_loading_placeholder_renders_as_text() {
        let blocks = parse(crate::session::LOADING_MESSAGE);
        assert_eq!(blocks, vec![para("Loading your answer... It might take up to 10 seconds")]);
    }

    #[test]
    fn test_view_builds_every_block_kind() {
        let answer = "# Heading\n\nText with [a link](https://example.com).\n\n\
                      - item\n\n> quote\n\n```\ncode\n```\n\n---\n";
        assert_eq!(parse(answer).len(), 6);
        let _element: Element<'_, String> = view(answer);
    }
}
