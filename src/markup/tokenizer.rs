use std::ops::Range;

use memchr::{memchr, memmem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Start,
    /// `</name>`
    End,
    /// `<name .../>`
    Empty,
    /// Comments, processing instructions, CDATA sections and declarations.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub kind: TagKind,
    /// Qualified name including any namespace prefix; empty for [`TagKind::Other`].
    pub name: &'a str,
    /// Byte span of the whole tag, `<` through `>` inclusive.
    pub span: Range<usize>,
}

impl Tag<'_> {
    #[inline]
    pub fn opens(&self, name: &str) -> bool {
        self.kind == TagKind::Start && self.name == name
    }

    #[inline]
    pub fn closes(&self, name: &str) -> bool {
        self.kind == TagKind::End && self.name == name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text(Range<usize>),
    Tag(Tag<'a>),
}

/// Streaming tag tokenizer.
///
/// Yields text runs and tags in source order; the spans of all tokens tile the
/// input with no gaps. Attribute values are honoured when looking for the end of a
/// tag, so `<a:t x=">">` is a single tag. A `<` that is never closed turns the rest
/// of the input into one text token.
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Tokenizer { src, pos: 0 }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        if start >= bytes.len() {
            return None;
        }

        if bytes[start] != b'<' {
            let end = memchr(b'<', &bytes[start..]).map_or(bytes.len(), |p| start + p);
            self.pos = end;
            return Some(Token::Text(start..end));
        }

        match find_tag_end(bytes, start) {
            Some(end) => {
                self.pos = end;
                Some(Token::Tag(classify(self.src, start..end)))
            }
            None => {
                self.pos = bytes.len();
                Some(Token::Text(start..bytes.len()))
            }
        }
    }
}

/// Exclusive end of the markup construct opening at `lt`.
fn find_tag_end(bytes: &[u8], lt: usize) -> Option<usize> {
    let rest = &bytes[lt..];
    let delimited: Option<(usize, &[u8])> = if rest.starts_with(b"<!--") {
        Some((4, b"-->"))
    } else if rest.starts_with(b"<![CDATA[") {
        Some((9, b"]]>"))
    } else if rest.starts_with(b"<?") {
        Some((2, b"?>"))
    } else {
        None
    };

    if let Some((opener_len, closer)) = delimited {
        let from = lt + opener_len;
        return memmem::find(&bytes[from..], closer).map(|p| from + p + closer.len());
    }

    let mut quote: Option<u8> = None;
    for (i, &b) in rest.iter().enumerate().skip(1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(lt + i + 1),
                _ => {}
            },
        }
    }
    None
}

fn classify(src: &str, span: Range<usize>) -> Tag<'_> {
    let inner = &src[span.start + 1..span.end - 1];
    if inner.starts_with('!') || inner.starts_with('?') {
        return Tag {
            kind: TagKind::Other,
            name: "",
            span,
        };
    }

    let (kind, body) = if let Some(rest) = inner.strip_prefix('/') {
        (TagKind::End, rest)
    } else if let Some(rest) = inner.strip_suffix('/') {
        (TagKind::Empty, rest)
    } else {
        (TagKind::Start, inner)
    };

    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(body.len());
    Tag {
        kind,
        name: &body[..name_end],
        span,
    }
}
