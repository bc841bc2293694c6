//! Incremental `text/event-stream` parser
//!
//! Feed raw transport chunks in, get complete events out. Chunk
//! boundaries carry no meaning: a field line, a UTF-8 sequence or a whole
//! event may be split across chunks and the parser holds the remainder
//! until it completes.

/// One server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name; "message" when the stream did not name it
    pub name: String,
    /// Data lines joined with `\n`
    pub data: String,
    pub id: Option<String>,
}

const DEFAULT_EVENT_NAME: &str = "message";

#[derive(Debug, Default)]
pub struct SseParser {
    buf: Vec<u8>,
    event_name: Option<String>,
    data_lines: Vec<String>,
    last_id: Option<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a transport chunk, returning every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop(); // the \n itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line).into_owned();
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        // blank line dispatches the accumulated event
        if line.is_empty() {
            return self.dispatch();
        }

        // comment lines double as keepalives
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event_name = Some(value.to_string()),
            "data" => self.data_lines.push(value.to_string()),
            "id" => self.last_id = Some(value.to_string()),
            // "retry" and unknown fields are ignored
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.event_name.is_none() && self.data_lines.is_empty() {
            return None;
        }
        let name = self
            .event_name
            .take()
            .unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string());
        let data = std::mem::take(&mut self.data_lines).join("\n");
        Some(SseEvent {
            name,
            data,
            id: self.last_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_event() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: payment-status\ndata: {\"orderId\":42}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "payment-status");
        assert_eq!(events[0].data, "{\"orderId\":42}");
    }

    #[test]
    fn test_unnamed_event_defaults_to_message() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: hello\n\n");
        assert_eq!(events[0].name, "message");
        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn test_multi_line_data_joined() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: order-status-changed\ndata: {\ndata: \"a\": 1}\n\n");
        assert_eq!(events[0].data, "{\n\"a\": 1}");
    }

    #[test]
    fn test_comment_keepalive_ignored() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b": ping\n\n").is_empty());
        // a comment does not break an event under construction
        let mut events = parser.feed(b"event: heartbeat\n: still here\ndata: ok\n\n");
        assert_eq!(events.len(), 1);
        let event = events.remove(0);
        assert_eq!(event.name, "heartbeat");
        assert_eq!(event.data, "ok");
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"event: connec").is_empty());
        assert!(parser.feed(b"ted\ndata: ack").is_empty());
        let events = parser.feed(b"\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "connected");
        assert_eq!(events[0].data, "ack");
    }

    #[test]
    fn test_crlf_lines() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: connected\r\ndata: ok\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "ok");
    }

    #[test]
    fn test_multiple_events_in_one_chunk() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: one\n\ndata: two\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "one");
        assert_eq!(events[1].data, "two");
    }

    #[test]
    fn test_id_is_sticky() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"id: 5\ndata: a\n\ndata: b\n\n");
        assert_eq!(events[0].id.as_deref(), Some("5"));
        assert_eq!(events[1].id.as_deref(), Some("5"));
    }

    #[test]
    fn test_event_name_without_data_dispatches() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: connected\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "connected");
        assert!(events[0].data.is_empty());
    }
}
