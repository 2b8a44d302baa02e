use colored::Color;

/// Lexical class of a slice of a JSON line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonToken<'a> {
    Punctuation(&'a str),
    Key(&'a str),
    String(&'a str),
    Number(&'a str),
    Literal(&'a str),
    Whitespace(&'a str),
    Other(&'a str),
}

impl<'a> JsonToken<'a> {
    pub fn text(&self) -> &'a str {
        match *self {
            JsonToken::Punctuation(s)
            | JsonToken::Key(s)
            | JsonToken::String(s)
            | JsonToken::Number(s)
            | JsonToken::Literal(s)
            | JsonToken::Whitespace(s)
            | JsonToken::Other(s) => s,
        }
    }
}

/// Split a JSON line into tokens. Concatenating the token texts yields the input.
pub fn tokenize(line: &str) -> Vec<JsonToken<'_>> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        let token = match ch {
            '{' | '}' | '[' | ']' | ',' | ':' => JsonToken::Punctuation(&line[start..start + 1]),
            '"' => {
                let mut end = line.len();
                let mut escaped = false;
                for (idx, c) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '"' {
                        end = idx + 1;
                        break;
                    }
                }
                let text = &line[start..end];
                if line[end..].trim_start().starts_with(':') {
                    JsonToken::Key(text)
                } else {
                    JsonToken::String(text)
                }
            }
            '-' | '0'..='9' => {
                let end = consume_while(&mut chars, line.len(), |c| {
                    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
                });
                JsonToken::Number(&line[start..end])
            }
            c if c.is_ascii_alphabetic() => {
                let end = consume_while(&mut chars, line.len(), |c| c.is_ascii_alphabetic());
                match &line[start..end] {
                    text @ ("true" | "false" | "null") => JsonToken::Literal(text),
                    text => JsonToken::Other(text),
                }
            }
            c if c.is_whitespace() => {
                let end = consume_while(&mut chars, line.len(), char::is_whitespace);
                JsonToken::Whitespace(&line[start..end])
            }
            c => JsonToken::Other(&line[start..start + c.len_utf8()]),
        };
        tokens.push(token);
    }

    tokens
}

fn consume_while<I, F>(chars: &mut std::iter::Peekable<I>, len: usize, accept: F) -> usize
where
    I: Iterator<Item = (usize, char)>,
    F: Fn(char) -> bool,
{
    while let Some(&(idx, c)) = chars.peek() {
        if !accept(c) {
            return idx;
        }
        chars.next();
    }
    len
}

/// Decorates JSON lines with ANSI colors.
///
/// Escapes are written directly, so the global `colored` switch used for
/// stderr messages does not affect stdout records.
#[derive(Debug, Clone, Copy)]
pub struct JsonHighlighter;

impl JsonHighlighter {
    pub fn new() -> Self {
        Self
    }

    /// Highlight one serialized JSON line
    pub fn highlight(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len() * 2);
        for token in tokenize(line) {
            match token {
                JsonToken::Key(s) => paint(&mut out, s, Color::Blue, true),
                JsonToken::String(s) => paint(&mut out, s, Color::Green, false),
                JsonToken::Number(s) => paint(&mut out, s, Color::Cyan, false),
                JsonToken::Literal(s) => paint(&mut out, s, Color::Magenta, true),
                JsonToken::Punctuation(s) => paint(&mut out, s, Color::White, false),
                JsonToken::Whitespace(s) | JsonToken::Other(s) => out.push_str(s),
            }
        }
        out
    }
}

fn paint(out: &mut String, text: &str, color: Color, bold: bool) {
    let weight = if bold { "1;" } else { "" };
    out.push_str(&format!("\x1b[{}{}m{}\x1b[0m", weight, color.to_fg_str(), text));
}

impl Default for JsonHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
