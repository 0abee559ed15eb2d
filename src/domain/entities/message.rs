use std::fmt;

/// A single content part of an outbound message chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Image(String),
    Voice(String),
}

/// An outbound message: an ordered sequence of content parts.
///
/// Assembled by a chat backend from an upstream reply, then handed to the
/// transport as-is. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    parts: Vec<Part>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-part convenience for plain text replies
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new().add_text(text)
    }

    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    pub fn add_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text(text.into()));
        self
    }

    pub fn add_image(mut self, url: impl Into<String>) -> Self {
        self.parts.push(Part::Image(url.into()));
        self
    }

    pub fn add_voice(mut self, url: impl Into<String>) -> Self {
        self.parts.push(Part::Voice(url.into()));
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for Message {
    /// Plain-text rendering for console output and logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                Part::Text(text) => write!(f, "{}", text)?,
                Part::Image(url) => write!(f, "[image {}]", url)?,
                Part::Voice(url) => write!(f, "[voice {}]", url)?,
            }
        }
        Ok(())
    }
}
