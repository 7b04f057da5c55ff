use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use crate::entry::{Entry, EntryKind, Group, GroupChild, PluralCategory, Segment, TextValue};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: usize, message: String },
    #[error("document has no <resources> root element")]
    MissingRoot,
    #[error("unexpected root element <{0}>, expected <resources>")]
    UnexpectedRoot(String),
    #[error("document ended inside {0}")]
    UnexpectedEof(String),
}

/// A parsed values file: everything before `<resources>`, the root start tag, the
/// entries, and everything from `</resources>` on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuesDocument {
    prologue: String,
    open: String,
    pub entries: Vec<Entry>,
    close: String,
}

impl ValuesDocument {
    /// A document with the standard XML declaration and an empty `<resources>` frame.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            prologue: "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n".to_string(),
            open: "<resources>".to_string(),
            entries,
            close: "\n</resources>\n".to_string(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Parser::new(input).parse()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn has_translatable_text(&self) -> bool {
        self.entries.iter().any(Entry::has_translatable_text)
    }

    pub fn render(&self) -> String {
        self.render_entries(&self.entries)
    }

    /// Renders `entries` inside this document's frame, each entry as its literal text.
    pub fn render_entries(&self, entries: &[Entry]) -> String {
        let mut out = String::with_capacity(self.prologue.len() + self.open.len() + 64);
        out.push_str(&self.prologue);
        out.push_str(&self.open);
        for entry in entries {
            entry.write_to(&mut out);
        }
        out.push_str(&self.close);
        out
    }
}

struct RawEvent<'a> {
    event: Event<'a>,
    start: usize,
    end: usize,
}

/// A reader for Android `values/*.xml` files.
///
/// The parser keeps byte offsets of every XML event so entries can hold the exact
/// source text instead of a re-serialized form.
pub struct Parser<'a> {
    input: &'a str,
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            reader: Reader::from_str(input),
        }
    }

    pub fn parse(mut self) -> Result<ValuesDocument, ParseError> {
        let (prologue, open) = loop {
            let raw = self.next_event()?;
            match &raw.event {
                Event::Start(e) if e.name().as_ref() == b"resources" => {
                    break (
                        self.input[..raw.start].to_string(),
                        self.slice(raw.start, raw.end),
                    );
                }
                Event::Empty(e) if e.name().as_ref() == b"resources" => {
                    return Ok(ValuesDocument {
                        prologue: self.input[..raw.start].to_string(),
                        open: self.slice(raw.start, raw.end),
                        entries: Vec::new(),
                        close: self.input[raw.end..].to_string(),
                    });
                }
                Event::Start(e) | Event::Empty(e) => {
                    return Err(ParseError::UnexpectedRoot(tag_name(e)));
                }
                Event::Eof => return Err(ParseError::MissingRoot),
                _ => continue,
            }
        };

        let mut entries = Vec::new();
        let close = loop {
            let raw = self.next_event()?;
            match &raw.event {
                Event::End(_) => break self.input[raw.start..].to_string(),
                Event::Start(e) => {
                    let entry = self.parse_element(e, raw.start, raw.end)?;
                    entries.push(entry);
                }
                Event::Empty(e) => entries.push(self.empty_element(e, raw.start, raw.end)?),
                Event::Eof => return Err(ParseError::UnexpectedEof("<resources>".to_string())),
                _ => push_verbatim(&mut entries, self.slice(raw.start, raw.end)),
            }
        };

        Ok(ValuesDocument {
            prologue,
            open,
            entries,
            close,
        })
    }

    fn next_event(&mut self) -> Result<RawEvent<'a>, ParseError> {
        let start = self.reader.buffer_position() as usize;
        let event = self.reader.read_event().map_err(|e| ParseError::Xml {
            position: start,
            message: e.to_string(),
        })?;
        let end = self.reader.buffer_position() as usize;
        Ok(RawEvent { event, start, end })
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.input[start..end].to_string()
    }

    fn parse_element(
        &mut self,
        e: &BytesStart<'a>,
        start: usize,
        end: usize,
    ) -> Result<Entry, ParseError> {
        let (name, translatable) = element_identity(e)?;
        let open = self.slice(start, end);
        let kind = match e.name().as_ref() {
            b"string" => EntryKind::Scalar(self.parse_text_value(open)?),
            b"string-array" => EntryKind::ArrayGroup(self.parse_group(open, false)?),
            b"plurals" => EntryKind::PluralGroup(self.parse_group(open, true)?),
            _ => {
                let element_end = self.skip_element(e)?;
                EntryKind::Other(self.slice(start, element_end))
            }
        };
        Ok(Entry::new(name, translatable, kind))
    }

    fn empty_element(
        &self,
        e: &BytesStart<'a>,
        start: usize,
        end: usize,
    ) -> Result<Entry, ParseError> {
        let (name, translatable) = element_identity(e)?;
        let raw = self.slice(start, end);
        let empty_group = |open: String| Group {
            open,
            children: Vec::new(),
            close: String::new(),
        };
        let kind = match e.name().as_ref() {
            b"string" => EntryKind::Scalar(TextValue::new(raw, Vec::new(), "")),
            b"string-array" => EntryKind::ArrayGroup(empty_group(raw)),
            b"plurals" => EntryKind::PluralGroup(empty_group(raw)),
            _ => EntryKind::Other(raw),
        };
        Ok(Entry::new(name, translatable, kind))
    }

    /// Reads the body of a `<string>` or `<item>` whose start tag was just consumed.
    fn parse_text_value(&mut self, open: String) -> Result<TextValue, ParseError> {
        let mut segments: Vec<Segment> = Vec::new();
        let close = self.parse_segments(&mut segments, &open)?;
        Ok(TextValue::new(open, segments, close))
    }

    /// Appends body segments up to the end tag of the enclosing element and returns
    /// that end tag. Inline styling tags are descended into so their text stays a
    /// leaf; `xliff:g` placeholders are kept whole.
    fn parse_segments(
        &mut self,
        segments: &mut Vec<Segment>,
        open: &str,
    ) -> Result<String, ParseError> {
        loop {
            let raw = self.next_event()?;
            match &raw.event {
                Event::Text(_) => match segments.last_mut() {
                    Some(Segment::Text(text)) => text.push_str(&self.input[raw.start..raw.end]),
                    _ => segments.push(Segment::Text(self.slice(raw.start, raw.end))),
                },
                Event::End(_) => return Ok(self.slice(raw.start, raw.end)),
                Event::Start(e) if e.name().as_ref() == b"xliff:g" => {
                    let end = self.skip_element(e)?;
                    push_markup(segments, &self.input[raw.start..end]);
                }
                Event::Start(_) => {
                    let inner_open = self.slice(raw.start, raw.end);
                    push_markup(segments, &inner_open);
                    let inner_close = self.parse_segments(segments, &inner_open)?;
                    push_markup(segments, &inner_close);
                }
                Event::Eof => return Err(ParseError::UnexpectedEof(open.to_string())),
                _ => push_markup(segments, &self.input[raw.start..raw.end]),
            }
        }
    }

    fn parse_group(&mut self, open: String, plural: bool) -> Result<Group, ParseError> {
        let mut children = Vec::new();
        loop {
            let raw = self.next_event()?;
            match &raw.event {
                Event::Start(e) if e.name().as_ref() == b"item" => {
                    let quantity = if plural { quantity_of(e)? } else { None };
                    let value = self.parse_text_value(self.slice(raw.start, raw.end))?;
                    children.push(GroupChild::Item { quantity, value });
                }
                Event::Empty(e) if e.name().as_ref() == b"item" => {
                    let quantity = if plural { quantity_of(e)? } else { None };
                    let value = TextValue::new(self.slice(raw.start, raw.end), Vec::new(), "");
                    children.push(GroupChild::Item { quantity, value });
                }
                Event::Start(e) => {
                    let end = self.skip_element(e)?;
                    push_filler(&mut children, &self.input[raw.start..end]);
                }
                Event::End(_) => {
                    return Ok(Group {
                        open,
                        children,
                        close: self.slice(raw.start, raw.end),
                    });
                }
                Event::Eof => return Err(ParseError::UnexpectedEof(open)),
                _ => push_filler(&mut children, &self.input[raw.start..raw.end]),
            }
        }
    }

    /// Consumes events up to the end tag matching an already-read start tag and
    /// returns the byte offset just past it.
    fn skip_element(&mut self, start: &BytesStart<'a>) -> Result<usize, ParseError> {
        let mut depth = 1usize;
        loop {
            let raw = self.next_event()?;
            match raw.event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(raw.end);
                    }
                }
                Event::Eof => return Err(ParseError::UnexpectedEof(format!("<{}>", tag_name(start)))),
                _ => {}
            }
        }
    }
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, ParseError> {
    let attr = e.try_get_attribute(key).map_err(|err| ParseError::Xml {
        position: 0,
        message: format!("bad attribute on <{}>: {}", tag_name(e), err),
    })?;
    match attr {
        Some(attr) => attr
            .unescape_value()
            .map(|value| Some(value.into_owned()))
            .map_err(|err| ParseError::Xml {
                position: 0,
                message: format!("bad value for {} on <{}>: {}", key, tag_name(e), err),
            }),
        None => Ok(None),
    }
}

/// The `name` attribute and the `translatable` flag (anything but "true" disables it).
fn element_identity(e: &BytesStart<'_>) -> Result<(Option<String>, bool), ParseError> {
    let name = attribute(e, "name")?;
    let translatable = attribute(e, "translatable")?
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(true);
    Ok((name, translatable))
}

fn quantity_of(e: &BytesStart<'_>) -> Result<Option<PluralCategory>, ParseError> {
    Ok(attribute(e, "quantity")?.and_then(|q| PluralCategory::from_quantity(&q)))
}

fn push_verbatim(entries: &mut Vec<Entry>, text: String) {
    if let Some(EntryKind::Verbatim(existing)) = entries.last_mut().map(Entry::kind_mut) {
        existing.push_str(&text);
        return;
    }
    entries.push(Entry::verbatim(text));
}

fn push_markup(segments: &mut Vec<Segment>, text: &str) {
    match segments.last_mut() {
        Some(Segment::Markup(existing)) => existing.push_str(text),
        _ => segments.push(Segment::Markup(text.to_string())),
    }
}

fn push_filler(children: &mut Vec<GroupChild>, text: &str) {
    match children.last_mut() {
        Some(GroupChild::Filler(existing)) => existing.push_str(text),
        _ => children.push(GroupChild::Filler(text.to_string())),
    }
}
