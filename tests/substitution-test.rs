use officeforge_rs::substitution::{substitute_markup, Diagnostic};
use officeforge_rs::{KeywordSet, MarkupConfig};

#[cfg(test)]
mod tests {
    use super::*;

    const PARAGRAPHS: &str = concat!(
        r#"<w:body>"#,
        r#"<w:p w:rsidR="00A1"><w:r><w:rPr><w:i/></w:rPr><w:t>{{GREETING}}, </w:t></w:r><w:r><w:t>{{NA</w:t></w:r><w:r><w:t>ME}}</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:t>Nothing to see</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:t>{{NAME}} owes {{AMOUNT}}</w:t></w:r></w:p>"#,
        r#"</w:body>"#
    );

    fn keywords() -> KeywordSet {
        [
            ("{{GREETING}}", "Hello"),
            ("{{NAME}}", "Grace Hopper"),
            ("{{AMOUNT}}", "$12"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn pass_through_without_keywords_test() {
        let result = substitute_markup(PARAGRAPHS, MarkupConfig::WORDPROCESSING, &KeywordSet::new());
        assert_eq!(result.output, PARAGRAPHS);
        assert!(!result.changed());
    }

    #[test]
    fn completeness_test() {
        let result = substitute_markup(PARAGRAPHS, MarkupConfig::WORDPROCESSING, &keywords());
        for token in ["{{GREETING}}", "{{NAME}}", "{{AMOUNT}}", "{{NA", "ME}}"] {
            assert!(!result.output.contains(token), "{token} left in output");
        }
        assert_eq!(result.report.replacements, 4);
        assert_eq!(result.report.units, 3);
        assert_eq!(result.report.units_rewritten, 2);
        assert!(result.report.diagnostics.is_empty());
    }

    #[test]
    fn surrounding_markup_is_preserved_test() {
        let result = substitute_markup(PARAGRAPHS, MarkupConfig::WORDPROCESSING, &keywords());
        let expected = concat!(
            r#"<w:body>"#,
            r#"<w:p w:rsidR="00A1"><w:r><w:rPr><w:i/></w:rPr><w:t>Hello, </w:t></w:r><w:r><w:t>Grace Hopper</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Nothing to see</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Grace Hopper owes $12</w:t></w:r></w:p>"#,
            r#"</w:body>"#
        );
        assert_eq!(result.output, expected);
    }

    #[test]
    fn cross_element_span_test() {
        let xml = "<a:p><a:r><a:t>AB</a:t></a:r><a:r><a:t>CD</a:t></a:r></a:p>";
        let result = substitute_markup(xml, MarkupConfig::PRESENTATION, &KeywordSet::single("BC", "X"));
        assert_eq!(result.output, "<a:p><a:r><a:t>AXD</a:t></a:r></a:p>");
    }

    #[test]
    fn absent_keyword_is_no_op_test() {
        let result = substitute_markup(
            PARAGRAPHS,
            MarkupConfig::WORDPROCESSING,
            &KeywordSet::single("{{UNKNOWN}}", "x"),
        );
        assert_eq!(result.output, PARAGRAPHS);
        assert_eq!(result.report.replacements, 0);
    }

    #[test]
    fn replacement_values_are_not_rescanned_test() {
        let keywords: KeywordSet = [("{{A}}", "{{B}}"), ("{{B}}", "b")].into_iter().collect();
        let result = substitute_markup("<si><t>{{A}}</t></si>", MarkupConfig::SPREADSHEET, &keywords);
        assert_eq!(result.output, "<si><t>{{B}}</t></si>");
    }

    #[test]
    fn overlapping_keywords_first_registered_wins_test() {
        let keywords: KeywordSet = [("{{NAME}}", "Ada"), ("NAME}} owes", "??")]
            .into_iter()
            .collect();
        let xml = "<w:p><w:t>{{NAME}} owes</w:t></w:p>";
        let result = substitute_markup(xml, MarkupConfig::WORDPROCESSING, &keywords);
        assert_eq!(result.output, "<w:p><w:t>Ada owes</w:t></w:p>");
        assert!(matches!(
            result.report.diagnostics.as_slice(),
            [Diagnostic::OverlappingMatch { kept, .. }] if kept == "{{NAME}}"
        ));
    }

    #[test]
    fn units_are_substituted_independently_test() {
        // A keyword spanning two paragraphs is not a match.
        let xml = "<w:p><w:t>{{SPL</w:t></w:p><w:p><w:t>IT}}</w:t></w:p>";
        let result = substitute_markup(xml, MarkupConfig::WORDPROCESSING, &KeywordSet::single("{{SPLIT}}", "x"));
        assert_eq!(result.output, xml);
    }

    #[test]
    fn markup_outside_text_elements_is_ignored_test() {
        let xml = r#"<w:p><w:pPr><w:rStyle w:val="{{NAME}}"/></w:pPr><w:r><w:t>{{NAME}}</w:t></w:r></w:p>"#;
        let result = substitute_markup(xml, MarkupConfig::WORDPROCESSING, &KeywordSet::single("{{NAME}}", "Ada"));
        assert_eq!(
            result.output,
            r#"<w:p><w:pPr><w:rStyle w:val="{{NAME}}"/></w:pPr><w:r><w:t>Ada</w:t></w:r></w:p>"#
        );
    }
}
