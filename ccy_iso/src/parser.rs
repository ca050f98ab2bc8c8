use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;

use crate::error::Error;
use crate::record::{Record, ENTRY_TAG};

enum Step {
    Entry,
    EmptyEntry,
    Sibling(Vec<u8>),
    Close,
    Eof,
    Other,
}

/// Lazily parses the entries of a list, one [`Record`] per entry element.
///
/// The input is scanned up to the first entry element, afterwards only its siblings
/// are visited: other sibling elements are skipped and the iteration ends when their
/// parent closes. On a malformed document a single error is yielded and the iteration
/// ends.
pub struct XmlRecords<R: BufRead> {
    reader: Reader<R>,
    resource: String,
    entry_tag: Vec<u8>,
    buf: Vec<u8>,
    skip: Vec<u8>,
    started: bool,
    done: bool,
}

impl<R: BufRead> XmlRecords<R> {
    /// Parse the entries of the ISO 4217 list read from `reader`.
    ///
    /// `resource` is only used in error messages.
    pub fn new(reader: R, resource: impl Into<String>) -> Self {
        Self::with_entry_tag(reader, resource, ENTRY_TAG)
    }

    pub fn with_entry_tag(reader: R, resource: impl Into<String>, entry_tag: &str) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            resource: resource.into(),
            entry_tag: entry_tag.as_bytes().to_vec(),
            buf: Vec::new(),
            skip: Vec::new(),
            started: false,
            done: false,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    fn next_entry(&mut self) -> Result<Option<Record>, Error> {
        loop {
            let step = match self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|e| Error::read_failed(&self.resource, e))?
            {
                Event::Start(e) if e.name().as_ref() == self.entry_tag.as_slice() => Step::Entry,
                Event::Empty(e) if e.name().as_ref() == self.entry_tag.as_slice() => Step::EmptyEntry,
                Event::Start(e) => Step::Sibling(e.name().as_ref().to_vec()),
                Event::End(_) => Step::Close,
                Event::Eof => Step::Eof,
                _ => Step::Other,
            };
            self.buf.clear();

            match step {
                Step::Entry => {
                    self.started = true;
                    return self.read_entry().map(Some);
                }
                Step::EmptyEntry => {
                    self.started = true;
                    return Ok(Some(Record::new()));
                }
                Step::Sibling(name) if self.started => {
                    self.reader
                        .read_to_end_into(QName(&name), &mut self.skip)
                        .map_err(|e| Error::read_failed(&self.resource, e))?;
                    self.skip.clear();
                }
                Step::Close if self.started => return Ok(None),
                Step::Eof => return Ok(None),
                Step::Sibling(_) | Step::Close | Step::Other => {}
            }
        }
    }

    // Reads the children of the entry whose start tag has just been consumed.
    fn read_entry(&mut self) -> Result<Record, Error> {
        let mut record = Record::new();
        let mut level = 0usize;
        let mut current: Option<(String, String)> = None;

        loop {
            match self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|e| Error::read_failed(&self.resource, e))?
            {
                Event::Start(e) => {
                    level += 1;
                    if level == 1 {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        current = Some((name, String::new()));
                    }
                }
                Event::Empty(e) => {
                    if level == 0 {
                        record.push(String::from_utf8_lossy(e.name().as_ref()), "");
                    }
                }
                // only the own text of a field, not of its descendants
                Event::Text(t) if level == 1 => {
                    if let Some((_, text)) = current.as_mut() {
                        let unescaped = t
                            .unescape()
                            .map_err(|e| Error::read_failed(&self.resource, e))?;
                        text.push_str(&unescaped);
                    }
                }
                Event::CData(c) if level == 1 => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::End(_) => {
                    if level == 0 {
                        self.buf.clear();
                        return Ok(record);
                    }
                    if level == 1 {
                        if let Some((name, text)) = current.take() {
                            record.push(name, text);
                        }
                    }
                    level -= 1;
                }
                Event::Eof => {
                    return Err(Error::read_failed(
                        &self.resource,
                        "unexpected end of document",
                    ))
                }
                _ => {}
            }
            self.buf.clear();
        }
    }
}

impl<R: BufRead> Iterator for XmlRecords<R> {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_entry() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                log::debug!("{e}");
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
