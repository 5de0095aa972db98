use crate::token::Token;

/// Result of writing realized forms back into a phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reassembly {
    /// Every token slot received exactly one form.
    Complete(String),
    /// Forms and slots did not line up. The first `filled` slots were replaced and the
    /// rest of the original text was kept as it was.
    Partial {
        text: String,
        filled: usize,
        slots: usize,
        forms: usize,
    },
}

impl Reassembly {
    pub fn text(&self) -> &str {
        match self {
            Reassembly::Complete(text) | Reassembly::Partial { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Reassembly::Complete(text) | Reassembly::Partial { text, .. } => text,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Reassembly::Partial { .. })
    }
}

/// Replaces the tokens of `input` with `forms`, one per slot, keeping everything between
/// tokens (whitespace, anything the tokenizer skipped) byte for byte.
pub fn substitute_forms<S: AsRef<str>>(input: &str, tokens: &[Token], forms: &[S]) -> Reassembly {
    let mut text = String::with_capacity(input.len());
    let mut cursor = 0;

    for (i, token) in tokens.iter().enumerate() {
        text.push_str(&input[cursor..token.span.start]);
        match forms.get(i) {
            Some(form) => text.push_str(form.as_ref()),
            None => text.push_str(token.text),
        }
        cursor = token.span.end;
    }
    text.push_str(&input[cursor..]);

    if forms.len() == tokens.len() {
        Reassembly::Complete(text)
    } else {
        Reassembly::Partial {
            text,
            filled: forms.len().min(tokens.len()),
            slots: tokens.len(),
            forms: forms.len(),
        }
    }
}
