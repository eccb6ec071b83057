//! Newline-delimited JSON decoding across arbitrary chunk boundaries.

use serde::de::DeserializeOwned;
use tracing::warn;

/// Reassembles newline-delimited JSON objects from network chunks.
///
/// Raw bytes are buffered until a newline arrives, so objects and multi-byte
/// UTF-8 sequences split across chunks decode intact. Malformed lines are
/// logged and skipped.
///
/// # Examples
///
/// ```
/// use edugenie_models::NdjsonDecoder;
/// use serde_json::Value;
///
/// let mut decoder = NdjsonDecoder::new();
/// assert!(decoder.push::<Value>(b"{\"response\":\"Hel").is_empty());
///
/// let values = decoder.push::<Value>(b"lo\"}\n{\"response\":\"!\"}\n");
/// assert_eq!(values.len(), 2);
/// assert_eq!(values[0]["response"], "Hello");
/// assert!(decoder.finish::<Value>().is_none());
/// ```
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every object completed by it, in order.
    pub fn push<E: DeserializeOwned>(&mut self, chunk: &[u8]) -> Vec<E> {
        self.buffer.extend_from_slice(chunk);

        let mut decoded = Vec::new();
        while let Some(end) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            if let Some(value) = decode_line(&line[..end]) {
                decoded.push(value);
            }
        }
        decoded
    }

    /// Decodes whatever remains after the stream closed without a final newline.
    pub fn finish<E: DeserializeOwned>(&mut self) -> Option<E> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest)
    }
}

fn decode_line<E: DeserializeOwned>(line: &[u8]) -> Option<E> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_slice(line) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                error = %e,
                line = %String::from_utf8_lossy(line),
                "Skipping malformed stream line"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const PAYLOAD: &str = "{\"response\":\"Photo\",\"done\":false}\n\
                           {\"response\":\"synthèse\",\"done\":false}\n\
                           {\"response\":\" 🌱\",\"done\":false}\n\
                           {\"response\":\"\",\"done\":true}\n";

    fn fragments(values: &[Value]) -> String {
        values
            .iter()
            .filter_map(|v| v["response"].as_str())
            .collect()
    }

    #[test]
    fn every_split_point_matches_unsplit_decode() {
        let bytes = PAYLOAD.as_bytes();
        let whole = fragments(&NdjsonDecoder::new().push::<Value>(bytes));
        assert_eq!(whole, "Photosynthèse 🌱");

        for split in 0..=bytes.len() {
            let mut decoder = NdjsonDecoder::new();
            let mut values = decoder.push::<Value>(&bytes[..split]);
            values.extend(decoder.push::<Value>(&bytes[split..]));
            assert_eq!(fragments(&values), whole, "split at {split}");
        }
    }

    #[test]
    fn byte_at_a_time_preserves_order() {
        let mut decoder = NdjsonDecoder::new();
        let mut values = Vec::new();
        for byte in PAYLOAD.as_bytes() {
            values.extend(decoder.push::<Value>(std::slice::from_ref(byte)));
        }
        assert_eq!(values.len(), 4);
        assert_eq!(fragments(&values), "Photosynthèse 🌱");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let mut decoder = NdjsonDecoder::new();
        let values = decoder.push::<Value>(b"{\"response\":\"a\"}\nnot json\n\n{\"response\":\"b\"}\n");
        assert_eq!(fragments(&values), "ab");
    }

    #[test]
    fn trailing_line_decodes_on_finish() {
        let mut decoder = NdjsonDecoder::new();
        assert!(decoder.push::<Value>(b"{\"response\":\"tail\"}").is_empty());
        let last = decoder.finish::<Value>();
        assert_eq!(last.map(|v| v["response"].clone()), Some(Value::from("tail")));
    }

    #[test]
    fn crlf_line_endings_decode() {
        let mut decoder = NdjsonDecoder::new();
        let values = decoder.push::<Value>(b"{\"response\":\"x\"}\r\n");
        assert_eq!(fragments(&values), "x");
    }
}
