// Text analysis for term extraction and indexing
use std::fmt;

/// Tokenization strategy.
///
/// Implementations must return a lazy stream: callers stop consuming after
/// a configured token ceiling, and the remainder of the text must never be
/// scanned in that case.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, field: &str, text: &str) -> Box<dyn Iterator<Item = String>>;
}

/// Default tokenizer: lowercases the input and splits on any
/// non-alphanumeric character. No length filtering is applied here; that is
/// the noise filter's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, _field: &str, text: &str) -> Box<dyn Iterator<Item = String>> {
        Box::new(TokenStream::new(text))
    }
}

/// Lazy token stream over a lowercased copy of the input.
///
/// One allocation up front for the buffer; tokens are produced on demand so
/// an early break stops all further scanning.
pub struct TokenStream {
    buffer: String,
    pos: usize,
}

impl TokenStream {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: text.to_lowercase(),
            pos: 0,
        }
    }
}

impl fmt::Debug for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStream").field("pos", &self.pos).finish()
    }
}

impl Iterator for TokenStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let rest = &self.buffer[self.pos..];
        let mut start = None;
        for (i, c) in rest.char_indices() {
            if c.is_alphanumeric() {
                if start.is_none() {
                    start = Some(i);
                }
            } else if let Some(s) = start {
                let token = rest[s..i].to_string();
                self.pos += i;
                return Some(token);
            }
        }
        if let Some(s) = start {
            let token = rest[s..].to_string();
            self.pos = self.buffer.len();
            return Some(token);
        }
        self.pos = self.buffer.len();
        None
    }
}
