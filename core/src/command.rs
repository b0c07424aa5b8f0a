//! Pasted command-line import.
//!
//! # Design
//! The command text is split into shell words first, then each word is
//! looked up in a flag rule table. Precedence lives in the table and in
//! `Scan`, not in the order of independent text searches:
//!
//! | flag                         | rule               |
//! |------------------------------|--------------------|
//! | `-X`, `--request`            | method (first wins)|
//! | `-H`, `--header`             | header (last value wins, first position kept) |
//! | `--data`, `--data-raw`       | body, primary      |
//! | `-d`, `--raw`                | body, secondary    |
//! | `--url`                      | url                |
//! | value flags curl knows (`-o`, `-u`, `-A`, ...) | consumed and ignored |
//!
//! A flag whose argument is missing or sits inside an unterminated quote is
//! not recognized; it never produces an error on its own. The only failure
//! is a command with no `http://` or `https://` token.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::ImportError;
use crate::http::{Headers, HttpMethod, RequestDescriptor};
use crate::json;

/// A shell word after quote removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub text: String,
    /// A quote opened inside this word was never closed.
    pub unterminated: bool,
}

/// Split `input` into words the way a POSIX shell would, minus expansion.
/// Bash's `$'...'` quoting is decoded as well, since browsers emit it when
/// copying a request as a command.
pub(crate) fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut unterminated = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        unterminated,
                    });
                    in_token = false;
                    unterminated = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => {
                            unterminated = true;
                            break;
                        }
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.peek().copied() {
                            Some(esc @ ('"' | '\\' | '$' | '`')) => {
                                current.push(esc);
                                chars.next();
                            }
                            Some('\n') => {
                                chars.next();
                            }
                            _ => current.push('\\'),
                        },
                        Some(ch) => current.push(ch),
                        None => {
                            unterminated = true;
                            break;
                        }
                    }
                }
            }
            '\\' => match chars.next() {
                // Line continuation.
                Some('\n') => {}
                Some('\r') if chars.peek() == Some(&'\n') => {
                    chars.next();
                }
                Some(ch) => {
                    in_token = true;
                    current.push(ch);
                }
                None => {
                    in_token = true;
                    current.push('\\');
                }
            },
            '$' if chars.peek() == Some(&'\'') => {
                chars.next();
                in_token = true;
                if !read_ansi_c_quoted(&mut chars, &mut current) {
                    unterminated = true;
                }
            }
            ch => {
                in_token = true;
                current.push(ch);
            }
        }
    }

    if in_token {
        tokens.push(Token {
            text: current,
            unterminated,
        });
    }
    tokens
}

/// Read the body of a `$'...'` word up to its closing quote, decoding
/// backslash escapes. Returns `false` if the input ends first.
fn read_ansi_c_quoted(chars: &mut Peekable<Chars<'_>>, out: &mut String) -> bool {
    loop {
        match chars.next() {
            Some('\'') => return true,
            Some('\\') => {
                let Some(esc) = chars.next() else {
                    return false;
                };
                match esc {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'e' | 'E' => out.push('\u{1b}'),
                    'f' => out.push('\u{0c}'),
                    'v' => out.push('\u{0b}'),
                    '\\' | '\'' | '"' | '?' => out.push(esc),
                    'x' => push_code_point(chars, out, 2, "\\x"),
                    'u' => push_code_point(chars, out, 4, "\\u"),
                    'U' => push_code_point(chars, out, 8, "\\U"),
                    '0'..='7' => {
                        let mut value = esc.to_digit(8).unwrap_or(0);
                        for _ in 0..2 {
                            match chars.peek().and_then(|c| c.to_digit(8)) {
                                Some(d) => {
                                    value = value * 8 + d;
                                    chars.next();
                                }
                                None => break,
                            }
                        }
                        if let Some(c) = char::from_u32(value) {
                            out.push(c);
                        }
                    }
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            }
            Some(ch) => out.push(ch),
            None => return false,
        }
    }
}

/// Decode up to `max_digits` hex digits after `\x`, `\u` or `\U`. With no
/// digits the escape is kept literally.
fn push_code_point(
    chars: &mut Peekable<Chars<'_>>,
    out: &mut String,
    max_digits: usize,
    literal: &str,
) {
    let mut value: u32 = 0;
    let mut digits = 0;
    while digits < max_digits {
        match chars.peek().and_then(|c| c.to_digit(16)) {
            Some(d) => {
                value = value * 16 + d;
                chars.next();
                digits += 1;
            }
            None => break,
        }
    }
    if digits == 0 {
        out.push_str(literal);
        return;
    }
    match char::from_u32(value) {
        Some(c) => out.push(c),
        None => out.push(char::REPLACEMENT_CHARACTER),
    }
}

/// Lower value means the group is consulted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum BodyPriority {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlagRule {
    Method,
    Header,
    Body(BodyPriority),
    Url,
    Ignored,
}

const FLAG_RULES: &[(&str, FlagRule)] = &[
    ("-X", FlagRule::Method),
    ("--request", FlagRule::Method),
    ("-H", FlagRule::Header),
    ("--header", FlagRule::Header),
    ("--data", FlagRule::Body(BodyPriority::Primary)),
    ("--data-raw", FlagRule::Body(BodyPriority::Primary)),
    ("-d", FlagRule::Body(BodyPriority::Secondary)),
    ("--raw", FlagRule::Body(BodyPriority::Secondary)),
    ("--url", FlagRule::Url),
    ("-A", FlagRule::Ignored),
    ("--user-agent", FlagRule::Ignored),
    ("-b", FlagRule::Ignored),
    ("--cookie", FlagRule::Ignored),
    ("-c", FlagRule::Ignored),
    ("--cookie-jar", FlagRule::Ignored),
    ("-e", FlagRule::Ignored),
    ("--referer", FlagRule::Ignored),
    ("-F", FlagRule::Ignored),
    ("--form", FlagRule::Ignored),
    ("-m", FlagRule::Ignored),
    ("--max-time", FlagRule::Ignored),
    ("--connect-timeout", FlagRule::Ignored),
    ("-o", FlagRule::Ignored),
    ("--output", FlagRule::Ignored),
    ("-T", FlagRule::Ignored),
    ("--upload-file", FlagRule::Ignored),
    ("-u", FlagRule::Ignored),
    ("--user", FlagRule::Ignored),
    ("-w", FlagRule::Ignored),
    ("--write-out", FlagRule::Ignored),
    ("-x", FlagRule::Ignored),
    ("--proxy", FlagRule::Ignored),
];

pub(crate) fn lookup_flag(spelling: &str) -> Option<FlagRule> {
    FLAG_RULES
        .iter()
        .find(|(name, _)| *name == spelling)
        .map(|(_, rule)| *rule)
}

/// How a single word relates to the rule table.
enum Word<'a> {
    /// Flag with its argument attached (`--data=x`, `-XPUT`).
    Attached(FlagRule, &'a str),
    /// Flag whose argument is the next word.
    Separate(FlagRule),
    UnknownFlag,
    Positional,
}

fn classify(text: &str) -> Word<'_> {
    if let Some(rule) = lookup_flag(text) {
        return Word::Separate(rule);
    }
    if let Some(long) = text.strip_prefix("--") {
        if let Some((name, value)) = long.split_once('=') {
            if let Some(rule) = lookup_flag(&text[..name.len() + 2]) {
                return Word::Attached(rule, value);
            }
        }
        return Word::UnknownFlag;
    }
    if text.starts_with('-') && text.len() > 2 {
        if let Some(rule) = text.get(..2).and_then(lookup_flag) {
            return Word::Attached(rule, &text[2..]);
        }
        return Word::UnknownFlag;
    }
    if text.starts_with('-') && text.len() == 2 {
        return Word::UnknownFlag;
    }
    Word::Positional
}

/// The `http(s)://...` prefix of `text`, cut at whitespace, quotes or a
/// backslash.
pub(crate) fn url_shaped(text: &str) -> Option<&str> {
    let rest = text
        .strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"))?;
    let host_len = rest
        .find(|c: char| c.is_whitespace() || matches!(c, '\'' | '"' | '\\'))
        .unwrap_or(rest.len());
    if host_len == 0 {
        return None;
    }
    let scheme_len = text.len() - rest.len();
    Some(&text[..scheme_len + host_len])
}

fn split_header(text: &str) -> Option<(&str, &str)> {
    let (name, value) = text.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

#[derive(Default)]
struct Scan {
    method: Option<HttpMethod>,
    url: Option<String>,
    headers: Headers,
    body: Option<(BodyPriority, String)>,
}

impl Scan {
    fn apply(&mut self, rule: FlagRule, value: &str) {
        match rule {
            FlagRule::Method => {
                if self.method.is_some() {
                    return;
                }
                match value.parse::<HttpMethod>() {
                    Ok(method) => self.method = Some(method),
                    Err(err) => tracing::debug!(error = %err, "ignoring request method"),
                }
            }
            FlagRule::Header => match split_header(value) {
                Some((name, value)) => self.headers.insert(name, value),
                None => tracing::debug!(header = value, "ignoring header without a name"),
            },
            FlagRule::Body(priority) => {
                let replace = match &self.body {
                    None => true,
                    Some((current, _)) => priority < *current,
                };
                if replace {
                    self.body = Some((priority, value.to_string()));
                }
            }
            FlagRule::Url => self.offer_url(value),
            FlagRule::Ignored => {}
        }
    }

    fn offer_url(&mut self, text: &str) {
        if self.url.is_none() {
            self.url = url_shaped(text).map(str::to_string);
        }
    }
}

/// Parse a pasted command line into a request descriptor.
///
/// A non-empty body always turns the method into `POST`, even when the
/// command named another method with `-X`.
pub fn parse_command(command: &str) -> Result<RequestDescriptor, ImportError> {
    let tokens = tokenize(command);
    let mut scan = Scan::default();
    let mut words = tokens.iter();

    while let Some(token) = words.next() {
        match classify(&token.text) {
            Word::Attached(rule, value) => {
                if token.unterminated {
                    tracing::debug!(flag = %token.text, "flag argument has an open quote");
                    continue;
                }
                scan.apply(rule, value);
            }
            Word::Separate(rule) => match words.next() {
                Some(arg) if !arg.unterminated => scan.apply(rule, &arg.text),
                Some(arg) => {
                    tracing::debug!(flag = %token.text, arg = %arg.text, "flag argument has an open quote")
                }
                None => tracing::debug!(flag = %token.text, "flag is missing its argument"),
            },
            Word::UnknownFlag => {}
            Word::Positional => scan.offer_url(&token.text),
        }
    }

    let url = scan.url.ok_or_else(ImportError::missing_url)?;
    let body = scan
        .body
        .map(|(_, raw)| json::canonicalize_or_keep(&raw, json::DEFAULT_INDENT));

    let method = match &body {
        Some(text) if !text.is_empty() => HttpMethod::Post,
        _ => scan.method.unwrap_or_default(),
    };

    Ok(RequestDescriptor {
        method,
        url,
        headers: scan.headers,
        body,
    })
}
