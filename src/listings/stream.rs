//! Pull-based reader over a top-level JSON array of listing records.
//!
//! Only the bytes of the element currently being decoded are buffered, so the
//! dataset file can be far larger than memory. Each call to [`ListingStream::open`]
//! starts a fresh pass over the file.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use thiserror::Error;

use crate::domain::ListingRecord;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to read listings: {0}")]
    Io(#[from] io::Error),
    #[error("listings file is malformed at byte {offset}: {reason}")]
    Malformed { offset: u64, reason: &'static str },
    #[error("listing #{index} could not be decoded: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl StreamError {
    /// Record errors leave the stream usable; everything else ends it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StreamError::Record { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Items { first: bool },
    Done,
}

pub struct ListingStream<R> {
    reader: R,
    peeked: Option<u8>,
    offset: u64,
    state: State,
    index: usize,
    buf: Vec<u8>,
}

impl ListingStream<BufReader<File>> {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> ListingStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            peeked: None,
            offset: 0,
            state: State::Start,
            index: 0,
            buf: Vec::new(),
        }
    }

    fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.peeked.is_none() {
            let available = self.reader.fill_buf()?;
            if let Some(&byte) = available.first() {
                self.reader.consume(1);
                self.peeked = Some(byte);
            }
        }
        Ok(self.peeked)
    }

    fn bump(&mut self) -> io::Result<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.peeked = None;
            self.offset += 1;
        }
        Ok(byte)
    }

    fn skip_whitespace(&mut self) -> io::Result<Option<u8>> {
        while let Some(byte) = self.peek()? {
            if !byte.is_ascii_whitespace() {
                return Ok(Some(byte));
            }
            self.bump()?;
        }
        Ok(None)
    }

    fn malformed(&mut self, reason: &'static str) -> StreamError {
        self.state = State::Done;
        StreamError::Malformed {
            offset: self.offset,
            reason,
        }
    }

    /// Copies one complete JSON value into `buf`.
    fn capture_value(&mut self) -> Result<(), StreamError> {
        self.buf.clear();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        loop {
            let Some(byte) = self.peek()? else {
                return Err(self.malformed("unexpected end of input inside a value"));
            };

            if !in_string && depth == 0 && !self.buf.is_empty() {
                let first = self.buf[0];
                let scalar = !matches!(first, b'{' | b'[' | b'"');
                if !scalar || matches!(byte, b',' | b']') || byte.is_ascii_whitespace() {
                    return Ok(());
                }
            }

            self.bump()?;
            self.buf.push(byte);

            if in_string {
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == b'"' {
                    in_string = false;
                }
                continue;
            }

            match byte {
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' => {
                    if depth == 0 {
                        return Err(self.malformed("unbalanced closing bracket"));
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    }

    fn next_record(&mut self) -> Result<Option<ListingRecord>, StreamError> {
        loop {
            match self.state {
                State::Done => return Ok(None),
                State::Start => match self.skip_whitespace()? {
                    Some(b'[') => {
                        self.bump()?;
                        self.state = State::Items { first: true };
                    }
                    Some(_) => return Err(self.malformed("expected a top-level array")),
                    None => return Err(self.malformed("listings file is empty")),
                },
                State::Items { first } => {
                    match self.skip_whitespace()? {
                        Some(b']') => {
                            self.bump()?;
                            self.state = State::Done;
                            return Ok(None);
                        }
                        Some(b',') if !first => {
                            self.bump()?;
                            if self.skip_whitespace()?.is_none() {
                                return Err(self.malformed("unexpected end of input after ','"));
                            }
                        }
                        Some(_) if first => {}
                        Some(_) => return Err(self.malformed("expected ',' between listings")),
                        None => return Err(self.malformed("unterminated array")),
                    }
                    self.state = State::Items { first: false };
                    self.capture_value()?;

                    let index = self.index;
                    self.index += 1;
                    return serde_json::from_slice::<ListingRecord>(&self.buf)
                        .map(Some)
                        .map_err(|source| StreamError::Record { index, source });
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for ListingStream<R> {
    type Item = Result<ListingRecord, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::domain::ListingId;

    fn stream(text: &str) -> ListingStream<Cursor<Vec<u8>>> {
        ListingStream::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn yields_each_record_in_order() {
        let json = r#"
            [
              {"id": "a", "title": "SWE Intern", "locations": ["NYC, NY", "Remote"]},
              {"id": 2, "title": "brackets ] and } and \" inside", "meta": {"nested": [1, 2]}}
            ]
        "#;
        let ids: Vec<ListingId> = stream(json).map(|r| r.unwrap().id).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], ListingId::from("a"));
        assert_eq!(ids[1].to_string(), "2");
    }

    #[test]
    fn empty_array_yields_nothing() {
        assert_eq!(stream(" [ ] ").count(), 0);
    }

    #[test]
    fn undecodable_record_is_skipped() {
        let json = r#"[{"title": "no id"}, {"id": "b"}]"#;
        let items: Vec<_> = stream(json).collect();
        assert_eq!(items.len(), 2);
        let err = items[0].as_ref().unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(items[1].as_ref().unwrap().id, ListingId::from("b"));
    }

    #[test]
    fn scalar_elements_are_reported_not_fatal() {
        let json = r#"[17, {"id": "c"}]"#;
        let items: Vec<_> = stream(json).collect();
        assert!(items[0].is_err());
        assert_eq!(items[1].as_ref().unwrap().id, ListingId::from("c"));
    }

    #[test]
    fn non_array_input_is_rejected() {
        let items: Vec<_> = stream(r#"{"id": "a"}"#).collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(StreamError::Malformed { .. })));
    }

    #[test]
    fn truncated_input_ends_the_stream() {
        let items: Vec<_> = stream(r#"[{"id": "a"}, {"id": "#).collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(StreamError::Malformed { .. })));
    }

    #[test]
    fn reopening_restarts_from_the_top() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.json");
        std::fs::write(&path, r#"[{"id":"x"},{"id":"y"}]"#).unwrap();
        let first: Vec<_> = ListingStream::open(&path).unwrap().collect();
        let second: Vec<_> = ListingStream::open(&path).unwrap().collect();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
    }
}
