//! Pull-style XML reading for generated decoders.
//!
//! The body is tokenised up front into start, end and text events keyed by
//! local element names. Declarations, comments, processing instructions and
//! doctypes are dropped; self-closing tags become a start/end pair; entity
//! references are resolved into the surrounding text.
//!
//! Generated decoders drive an [`XmlReader`] recursively: each decoder
//! opens its own element, consumes its children and closes it again.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::Event;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum XmlEvent {
    Start(String),
    End(String),
    Text(String),
}

impl XmlEvent {
    fn describe(event: Option<&XmlEvent>) -> String {
        match event {
            Some(XmlEvent::Start(name)) => format!("<{name}>"),
            Some(XmlEvent::End(name)) => format!("</{name}>"),
            Some(XmlEvent::Text(text)) => format!("text '{}'", text.trim()),
            None => "end of document".to_string(),
        }
    }

    fn is_blank_text(&self) -> bool {
        matches!(self, XmlEvent::Text(text) if text.trim().is_empty())
    }
}

/// A cursor over the events of one XML document.
///
/// ## Examples
///
/// ```
/// use shapegen::XmlReader;
///
/// let mut stack = XmlReader::new(b"<Widget><Id>w-1</Id></Widget>").unwrap();
/// stack.start_element("Widget").unwrap();
/// assert_eq!(stack.peek_start().unwrap(), Some("Id"));
/// stack.start_element("Id").unwrap();
/// assert_eq!(stack.characters().unwrap(), "w-1");
/// stack.end_element("Id").unwrap();
/// assert_eq!(stack.peek_start().unwrap(), None);
/// stack.end_element("Widget").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct XmlReader {
    events: Vec<XmlEvent>,
    position: usize,
}

impl XmlReader {
    /// Tokenises a complete document.
    ///
    /// ## Errors
    ///
    /// Returns [`ParseError::Xml`] if the document is not well-formed.
    pub fn new(body: &[u8]) -> Result<Self, ParseError> {
        let mut reader = Reader::from_reader(body);
        let mut events: Vec<XmlEvent> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    events.push(XmlEvent::Start(utf8(start.local_name().as_ref())?.to_string()));
                }
                Event::End(end) => {
                    events.push(XmlEvent::End(utf8(end.local_name().as_ref())?.to_string()));
                }
                Event::Empty(empty) => {
                    let name = utf8(empty.local_name().as_ref())?.to_string();
                    events.push(XmlEvent::Start(name.clone()));
                    events.push(XmlEvent::End(name));
                }
                Event::Text(text) => push_text(&mut events, unescape_text(&text)?),
                Event::GeneralRef(reference) => {
                    let entity = format!("&{};", utf8(&reference)?);
                    push_text(&mut events, unescape_text(entity.as_bytes())?);
                }
                Event::CData(data) => push_text(&mut events, Cow::Owned(utf8(&data)?.to_string())),
                Event::Eof => break,
                // declarations, comments, processing instructions, doctypes
                _ => {}
            }
        }

        Ok(Self {
            events,
            position: 0,
        })
    }

    /// Tokenises a response body for decoding its document element.
    ///
    /// A body without any element is read as an empty `<default_root/>`,
    /// so output shapes whose members are all optional still decode.
    pub fn for_response(body: &[u8], default_root: &str) -> Result<Self, ParseError> {
        let mut reader = Self::new(body)?;
        if !reader.events.iter().any(|e| matches!(e, XmlEvent::Start(_))) {
            reader.events = vec![
                XmlEvent::Start(default_root.to_string()),
                XmlEvent::End(default_root.to_string()),
            ];
            reader.position = 0;
        }
        Ok(reader)
    }

    /// Name of the document element, or an empty string for an empty document.
    pub fn root_name(&self) -> String {
        self.events
            .iter()
            .find_map(|event| match event {
                XmlEvent::Start(name) => Some(name.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Returns the name of the next start tag without consuming it.
    ///
    /// Whitespace between elements is consumed. Returns `None` at an end tag
    /// or at the end of the document.
    ///
    /// ## Errors
    ///
    /// Returns [`ParseError::UnexpectedElement`] when non-whitespace text
    /// appears where an element was expected.
    pub fn peek_start(&mut self) -> Result<Option<&str>, ParseError> {
        self.skip_blank_text();
        match self.events.get(self.position) {
            Some(XmlEvent::Start(name)) => Ok(Some(name.as_str())),
            Some(XmlEvent::End(_)) | None => Ok(None),
            Some(text @ XmlEvent::Text(_)) => Err(ParseError::UnexpectedElement {
                expected: "an element".to_string(),
                found: XmlEvent::describe(Some(text)),
            }),
        }
    }

    /// Consumes the start tag `<name>`.
    pub fn start_element(&mut self, name: &str) -> Result<(), ParseError> {
        self.skip_blank_text();
        match self.events.get(self.position) {
            Some(XmlEvent::Start(found)) if found == name => {
                self.position += 1;
                Ok(())
            }
            other => Err(ParseError::UnexpectedElement {
                expected: name.to_string(),
                found: XmlEvent::describe(other),
            }),
        }
    }

    /// Consumes the end tag `</name>`.
    pub fn end_element(&mut self, name: &str) -> Result<(), ParseError> {
        self.skip_blank_text();
        match self.events.get(self.position) {
            Some(XmlEvent::End(found)) if found == name => {
                self.position += 1;
                Ok(())
            }
            None => Err(ParseError::UnclosedElement(name.to_string())),
            other => Err(ParseError::UnexpectedElement {
                expected: format!("/{name}"),
                found: XmlEvent::describe(other),
            }),
        }
    }

    /// Consumes and returns the text content of the current element.
    ///
    /// An element with no text yields an empty string.
    pub fn characters(&mut self) -> Result<String, ParseError> {
        match self.events.get(self.position) {
            Some(XmlEvent::Text(text)) => {
                let text = text.clone();
                self.position += 1;
                Ok(text)
            }
            Some(XmlEvent::End(_)) => Ok(String::new()),
            other => Err(ParseError::UnexpectedElement {
                expected: "text".to_string(),
                found: XmlEvent::describe(other),
            }),
        }
    }

    /// Consumes the next element with all of its children.
    pub fn skip_element(&mut self) -> Result<(), ParseError> {
        self.skip_blank_text();
        let name = match self.events.get(self.position) {
            Some(XmlEvent::Start(name)) => name.clone(),
            other => {
                return Err(ParseError::UnexpectedElement {
                    expected: "an element".to_string(),
                    found: XmlEvent::describe(other),
                });
            }
        };
        tracing::trace!(element = %name, "skipping unrecognised element");

        let mut depth = 0usize;
        while let Some(event) = self.events.get(self.position) {
            self.position += 1;
            match event {
                XmlEvent::Start(_) => depth += 1,
                XmlEvent::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                XmlEvent::Text(_) => {}
            }
        }
        Err(ParseError::UnclosedElement(name))
    }

    fn skip_blank_text(&mut self) {
        while self
            .events
            .get(self.position)
            .is_some_and(XmlEvent::is_blank_text)
        {
            self.position += 1;
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|e| ParseError::Xml(e.to_string()))
}

fn unescape_text(raw: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    unescape(utf8(raw)?).map_err(|e| ParseError::Xml(e.to_string()))
}

fn push_text(events: &mut Vec<XmlEvent>, text: Cow<'_, str>) {
    match events.last_mut() {
        Some(XmlEvent::Text(existing)) => existing.push_str(&text),
        _ => events.push(XmlEvent::Text(text.into_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_closing_tag_is_start_and_end() {
        let mut stack = XmlReader::new(b"<Root><Empty/></Root>").unwrap();
        stack.start_element("Root").unwrap();
        stack.start_element("Empty").unwrap();
        assert_eq!(stack.characters().unwrap(), "");
        stack.end_element("Empty").unwrap();
        stack.end_element("Root").unwrap();
    }

    #[test]
    fn resolves_entities_and_cdata() {
        let mut stack =
            XmlReader::new(b"<Note>a &amp; b &#60; <![CDATA[<raw>]]></Note>").unwrap();
        stack.start_element("Note").unwrap();
        assert_eq!(stack.characters().unwrap(), "a & b < <raw>");
    }

    #[test]
    fn namespaces_use_local_names() {
        let mut stack = XmlReader::new(
            br#"<?xml version="1.0"?><s:Widget xmlns:s="urn:widgets"><s:Id>1</s:Id></s:Widget>"#,
        )
        .unwrap();
        assert_eq!(stack.root_name(), "Widget");
        stack.start_element("Widget").unwrap();
        assert_eq!(stack.peek_start().unwrap(), Some("Id"));
    }

    #[test]
    fn skip_element_consumes_nested_children() {
        let mut stack =
            XmlReader::new(b"<Root><Unknown><A><B/></A>text</Unknown><Known/></Root>").unwrap();
        stack.start_element("Root").unwrap();
        stack.skip_element().unwrap();
        assert_eq!(stack.peek_start().unwrap(), Some("Known"));
    }

    #[test]
    fn peek_rejects_stray_text() {
        let mut stack = XmlReader::new(b"<Root>stray<A/></Root>").unwrap();
        stack.start_element("Root").unwrap();
        let err = stack.peek_start().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedElement { .. }));
    }

    #[test]
    fn peek_at_end_tag_is_none() {
        let mut stack = XmlReader::new(b"<Root>\n  </Root>").unwrap();
        stack.start_element("Root").unwrap();
        assert_eq!(stack.peek_start().unwrap(), None);
        stack.end_element("Root").unwrap();
        assert_eq!(stack.peek_start().unwrap(), None);
    }

    #[test]
    fn start_element_reports_mismatch() {
        let mut stack = XmlReader::new(b"<Gadget/>").unwrap();
        let err = stack.start_element("Widget").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedElement {
                expected: "Widget".to_string(),
                found: "<Gadget>".to_string(),
            }
        );
    }

    #[test]
    fn end_element_at_eof_is_unclosed() {
        let mut stack = XmlReader {
            events: vec![XmlEvent::Start("Root".to_string())],
            position: 0,
        };
        stack.start_element("Root").unwrap();
        let err = stack.end_element("Root").unwrap_err();
        assert_eq!(err, ParseError::UnclosedElement("Root".to_string()));
    }

    #[test]
    fn malformed_document_fails() {
        assert!(XmlReader::new(b"<Root></Other>").is_err());
    }

    #[test]
    fn blank_response_gets_default_root() {
        let mut stack = XmlReader::for_response(b"  ", "DescribeWidgetResult").unwrap();
        assert_eq!(stack.root_name(), "DescribeWidgetResult");
        stack.start_element("DescribeWidgetResult").unwrap();
        stack.end_element("DescribeWidgetResult").unwrap();
    }

    #[test]
    fn response_keeps_actual_root() {
        let stack = XmlReader::for_response(b"<Widget/>", "DescribeWidgetResult").unwrap();
        assert_eq!(stack.root_name(), "Widget");
    }

    #[tracing_test::traced_test]
    #[test]
    fn skip_element_is_traced() {
        let mut stack = XmlReader::new(b"<Root><Extra>1</Extra></Root>").unwrap();
        stack.start_element("Root").unwrap();
        stack.skip_element().unwrap();
        assert!(logs_contain("skipping unrecognised element"));
    }
}
