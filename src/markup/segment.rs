use super::tokenizer::{TagKind, Token, Tokenizer};

/// One slice of a segmented markup blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Markup between units, passed through verbatim.
    Filler(&'a str),
    /// A candidate unit, open tag through matching close tag.
    Unit(&'a str),
}

impl<'a> Segment<'a> {
    #[inline]
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Filler(s) | Segment::Unit(s) => s,
        }
    }
}

/// Splits `xml` into units bracketed by `unit_tag` and the filler around them.
///
/// Concatenating the returned slices reproduces `xml` exactly. Nested units of the
/// same name are tracked by depth and stay inside their outermost unit. Self-closing
/// unit tags and a unit left open at end of input are filler; a blob without units
/// comes back as a single filler slice.
pub fn segment<'a>(xml: &'a str, unit_tag: &str) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut emitted = 0usize;
    let mut open_at: Option<usize> = None;
    let mut depth = 0usize;

    for token in Tokenizer::new(xml) {
        let Token::Tag(tag) = token else {
            continue;
        };
        if tag.name != unit_tag {
            continue;
        }
        match tag.kind {
            TagKind::Start => {
                if depth == 0 {
                    open_at = Some(tag.span.start);
                }
                depth += 1;
            }
            TagKind::End if depth > 0 => {
                depth -= 1;
                if depth > 0 {
                    continue;
                }
                if let Some(start) = open_at.take() {
                    if start > emitted {
                        segments.push(Segment::Filler(&xml[emitted..start]));
                    }
                    segments.push(Segment::Unit(&xml[start..tag.span.end]));
                    emitted = tag.span.end;
                }
            }
            _ => {}
        }
    }

    if emitted < xml.len() {
        segments.push(Segment::Filler(&xml[emitted..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(segments: &[Segment<'_>]) -> String {
        segments.iter().map(Segment::as_str).collect()
    }

    #[test]
    fn splits_units_and_filler() {
        let xml = "<w:body><w:p><w:r><w:t>A</w:t></w:r></w:p><w:p><w:t>B</w:t></w:p><w:sectPr/></w:body>";
        let segments = segment(xml, "w:p");
        assert_eq!(
            segments,
            vec![
                Segment::Filler("<w:body>"),
                Segment::Unit("<w:p><w:r><w:t>A</w:t></w:r></w:p>"),
                Segment::Unit("<w:p><w:t>B</w:t></w:p>"),
                Segment::Filler("<w:sectPr/></w:body>"),
            ]
        );
        assert_eq!(rejoin(&segments), xml);
    }

    #[test]
    fn no_units_is_single_filler() {
        let xml = "<sst><x/></sst>";
        assert_eq!(segment(xml, "si"), vec![Segment::Filler(xml)]);
        assert!(segment("", "si").is_empty());
    }

    #[test]
    fn similar_names_are_not_units() {
        let xml = "<w:pPr><w:pStyle/></w:pPr>";
        assert_eq!(segment(xml, "w:p"), vec![Segment::Filler(xml)]);
    }

    #[test]
    fn nested_units_stay_in_outer_unit() {
        let xml = "<w:p><w:txbxContent><w:p><w:t>in</w:t></w:p></w:txbxContent></w:p>";
        assert_eq!(segment(xml, "w:p"), vec![Segment::Unit(xml)]);
    }

    #[test]
    fn self_closing_and_unterminated_units_are_filler() {
        let xml = "<w:p/><w:p><w:t>open";
        let segments = segment(xml, "w:p");
        assert_eq!(segments, vec![Segment::Filler(xml)]);
    }
}
