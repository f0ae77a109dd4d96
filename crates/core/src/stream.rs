//! Line reading and batching for one output stream of a sub process.

use std::io::{BufRead, BufReader, ErrorKind, Read};

use log::{debug, trace};

use crate::error::Error;
use crate::event::{EventSink, StreamEvent, Target};
use crate::identity::CommandId;

/// Which pipe of the sub process a reader drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOrigin {
    Stdout,
    Stderr,
}

impl StreamOrigin {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StreamOrigin::Stdout => "stdout",
            StreamOrigin::Stderr => "stderr",
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self == StreamOrigin::Stderr
    }
}

/// Reads one stream to the end and forwards its lines in chunks.
pub struct StreamBatcher<S> {
    id: CommandId,
    target: Target,
    origin: StreamOrigin,
    batch_size: usize,
    sink: S,
}

impl<S: EventSink> StreamBatcher<S> {
    pub fn new(
        id: CommandId,
        target: Target,
        origin: StreamOrigin,
        batch_size: usize,
        sink: S,
    ) -> Self {
        Self {
            id,
            target,
            origin,
            batch_size: batch_size.max(1),
            sink,
        }
    }

    /// Drains `reader` until end of stream or a read error.
    ///
    /// Every `batch_size` lines are sent as one chunk and whatever is left at
    /// the end is flushed as a final, shorter chunk. A read error stops the
    /// reader after flushing and is reported as a single error line.
    ///
    /// Returns the number of lines read.
    pub fn drain<R: Read>(&self, reader: R) -> usize {
        let mut reader = BufReader::new(reader);
        let mut buffer = Vec::new();
        let mut batch = Vec::with_capacity(self.batch_size);
        let mut line_count = 0;

        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) => break,
                Ok(_) => {
                    trim_line_ending(&mut buffer);
                    batch.push(String::from_utf8_lossy(&buffer).into_owned());
                    line_count += 1;

                    if batch.len() >= self.batch_size {
                        let full = std::mem::replace(&mut batch, Vec::with_capacity(self.batch_size));
                        self.send_lines(full, self.origin.is_error());
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(original) => {
                    self.flush(batch);
                    let error = Error::StreamRead {
                        stream: self.origin.name(),
                        original,
                    };
                    debug!("{} {}", self.id, error);
                    self.send_lines(vec![error.to_string()], true);
                    return line_count;
                }
            }
        }

        self.flush(batch);
        trace!("{} {} closed after {} lines", self.id, self.origin.name(), line_count);
        line_count
    }

    fn flush(&self, batch: Vec<String>) {
        if !batch.is_empty() {
            self.send_lines(batch, self.origin.is_error());
        }
    }

    fn send_lines(&self, lines: Vec<String>, is_error: bool) {
        self.sink.emit(StreamEvent::Chunk {
            id: self.id,
            target: self.target,
            lines,
            is_error,
        });
    }
}

fn trim_line_ending(buffer: &mut Vec<u8>) {
    if buffer.last() == Some(&b'\n') {
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    struct BrokenPipe {
        data: Cursor<Vec<u8>>,
    }

    impl Read for BrokenPipe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let read = self.data.read(buf)?;
            if read == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "pipe broke"));
            }
            Ok(read)
        }
    }

    fn chunks(events: Vec<StreamEvent>) -> Vec<(Vec<String>, bool)> {
        events
            .into_iter()
            .map(|event| match event {
                StreamEvent::Chunk {
                    lines, is_error, ..
                } => (lines, is_error),
                other => panic!("Expected a chunk, got {other:?}"),
            })
            .collect()
    }

    fn drain(input: Vec<u8>, origin: StreamOrigin, batch_size: usize) -> (usize, Vec<StreamEvent>) {
        let (sender, receiver) = flume::unbounded();
        let batcher = StreamBatcher::new(
            CommandId::new(1),
            Target::PackageList,
            origin,
            batch_size,
            sender,
        );
        let count = batcher.drain(Cursor::new(input));
        drop(batcher);
        (count, receiver.drain().collect())
    }

    fn numbered_lines(count: usize) -> Vec<u8> {
        (1..=count)
            .map(|i| format!("line {i}\n"))
            .collect::<String>()
            .into_bytes()
    }

    #[test]
    fn test_batches_of_hundred() {
        let (count, events) = drain(numbered_lines(250), StreamOrigin::Stdout, 100);
        let chunks = chunks(events);

        assert_eq!(count, 250);
        let sizes: Vec<usize> = chunks.iter().map(|(lines, _)| lines.len()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert!(chunks.iter().all(|(_, is_error)| !is_error));
    }

    #[test]
    fn test_chunk_count_and_concatenation() {
        for (line_count, batch_size) in [(0, 3), (1, 3), (3, 3), (7, 3), (10, 1), (5, 100)] {
            let (_, events) = drain(numbered_lines(line_count), StreamOrigin::Stdout, batch_size);
            let chunks = chunks(events);

            assert_eq!(chunks.len(), line_count.div_ceil(batch_size));

            let joined: Vec<String> = chunks.into_iter().flat_map(|(lines, _)| lines).collect();
            let expected: Vec<String> = (1..=line_count).map(|i| format!("line {i}")).collect();
            assert_eq!(joined, expected);
        }
    }

    #[test]
    fn test_stderr_chunks_are_flagged() {
        let (_, events) = drain(b"warning: something\n".to_vec(), StreamOrigin::Stderr, 100);
        let chunks = chunks(events);
        assert_eq!(chunks, vec![(vec!["warning: something".to_string()], true)]);
    }

    #[test]
    fn test_last_line_without_newline_and_crlf() {
        let (_, events) = drain(b"first\r\nsecond".to_vec(), StreamOrigin::Stdout, 100);
        let chunks = chunks(events);
        assert_eq!(
            chunks,
            vec![(vec!["first".to_string(), "second".to_string()], false)]
        );
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let (count, events) = drain(b"a\n\nb\n".to_vec(), StreamOrigin::Stdout, 100);
        assert_eq!(count, 3);
        assert_eq!(chunks(events)[0].0, vec!["a", "", "b"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let (_, events) = drain(vec![b'o', b'k', 0xFF, b'\n'], StreamOrigin::Stdout, 100);
        assert_eq!(chunks(events)[0].0, vec!["ok\u{FFFD}"]);
    }

    #[test]
    fn test_read_error_flushes_then_reports() {
        let (sender, receiver) = flume::unbounded();
        let batcher = StreamBatcher::new(
            CommandId::new(9),
            Target::PackageInfo,
            StreamOrigin::Stdout,
            100,
            sender,
        );
        let count = batcher.drain(BrokenPipe {
            data: Cursor::new(b"one\ntwo\n".to_vec()),
        });
        drop(batcher);

        let chunks = chunks(receiver.drain().collect());
        assert_eq!(count, 2);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], (vec!["one".to_string(), "two".to_string()], false));
        assert!(chunks[1].1);
        assert_eq!(chunks[1].0.len(), 1);
        assert!(chunks[1].0[0].contains("pipe broke"));
        assert!(chunks[1].0[0].contains("stdout"));
    }

    #[test]
    fn test_zero_batch_size_is_treated_as_one() {
        let (_, events) = drain(numbered_lines(3), StreamOrigin::Stdout, 0);
        assert_eq!(chunks(events).len(), 3);
    }
}
