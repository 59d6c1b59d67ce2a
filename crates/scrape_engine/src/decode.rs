use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};
use scrape_logging::scrape_warn;

/// Incremental text decoder shared across all reads of one response body.
///
/// Bytes of a character split between two reads are held until the rest
/// arrives, so no character is dropped or duplicated at buffer boundaries.
/// Malformed sequences decode to U+FFFD.
pub struct StreamDecoder {
    decoder: Decoder,
    encoding: &'static Encoding,
    reported_malformed: bool,
}

impl StreamDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder(),
            encoding,
            reported_malformed: false,
        }
    }

    pub fn utf8() -> Self {
        Self::new(UTF_8)
    }

    /// Use the charset of a `Content-Type` header when it names a known encoding, UTF-8 otherwise.
    pub fn for_content_type(content_type: Option<&str>) -> Self {
        let encoding = content_type
            .and_then(extract_charset)
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        Self::new(encoding)
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode one buffer; an incomplete trailing character is kept for the next call.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.decode_inner(bytes, false)
    }

    /// Flush at end of stream. A dangling partial character becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        self.decode_inner(&[], true)
    }

    fn decode_inner(&mut self, bytes: &[u8], last: bool) -> String {
        let mut out = String::new();
        let mut src = bytes;
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(src.len())
                .unwrap_or(src.len() * 3 + 4);
            out.reserve(needed);
            let (result, read, had_errors) = self.decoder.decode_to_string(src, &mut out, last);
            if had_errors && !self.reported_malformed {
                scrape_warn!(
                    "Malformed {} sequence in stream; replaced",
                    self.encoding.name()
                );
                self.reported_malformed = true;
            }
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
        out
    }
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("charset") {
                Some(value.trim().trim_matches(['"', '\''].as_ref()).to_string())
            } else {
                None
            }
        })
        .next()
}
