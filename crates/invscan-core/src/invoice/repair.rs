//! Reattachment of OCR-split word fragments.
//!
//! OCR tends to break a word into a long head and a one or two character
//! tail (`WIDG ET`). A single forward pass glues each short tail onto the
//! token before it and throws away other short noise tokens.

/// Merges fragment tokens into uppercase words.
#[derive(Debug, Clone, Copy)]
pub struct DescriptionRepair {
    max_fragment_len: usize,
}

impl DescriptionRepair {
    /// Create a repairer with the default fragment length of 2.
    pub fn new() -> Self {
        Self {
            max_fragment_len: 2,
        }
    }

    /// Tokens up to `len` characters count as fragments.
    pub fn with_max_fragment_len(mut self, len: usize) -> Self {
        self.max_fragment_len = len;
        self
    }

    /// Rebuild a description from its tokens.
    ///
    /// Scanning left to right, a token whose successor is a fragment is
    /// emitted together with it and the successor is claimed; otherwise the
    /// token is emitted only if it is longer than a fragment. The last token
    /// is emitted if it is unclaimed and longer than one character. Claimed
    /// tokens are never looked at again, so merges never overlap.
    pub fn repair<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        let Some((last, head)) = tokens.split_last() else {
            return String::new();
        };

        let mut words: Vec<String> = Vec::with_capacity(tokens.len());
        let mut skip_next = false;

        for (i, token) in head.iter().enumerate() {
            if skip_next {
                skip_next = false;
                continue;
            }

            let token = token.as_ref();
            let next = tokens[i + 1].as_ref();

            if char_len(next) <= self.max_fragment_len {
                words.push(format!("{token}{next}"));
                skip_next = true;
            } else if char_len(token) > self.max_fragment_len {
                words.push(token.to_string());
            }
        }

        let last = last.as_ref();
        if !skip_next && char_len(last) > 1 {
            words.push(last.to_string());
        }

        words.join(" ").to_uppercase()
    }
}

impl Default for DescriptionRepair {
    fn default() -> Self {
        Self::new()
    }
}

/// Repair tokens with the default fragment length.
pub fn repair<S: AsRef<str>>(tokens: &[S]) -> String {
    DescriptionRepair::new().repair(tokens)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
