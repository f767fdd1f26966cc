#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

pub enum Entry<'a> {
    Dir(&'a str),
    File(&'a str, &'a [u8]),
    Stored(&'a str, &'a [u8]),
}

pub fn timestamp() -> DateTime {
    DateTime::from_date_and_time(2024, 3, 14, 15, 9, 26).unwrap()
}

pub fn build_archive(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(timestamp());
    for entry in entries {
        match entry {
            Entry::Dir(name) => writer.add_directory(*name, deflated).unwrap(),
            Entry::File(name, bytes) => {
                writer.start_file(*name, deflated).unwrap();
                writer.write_all(bytes).unwrap();
            }
            Entry::Stored(name, bytes) => {
                let stored = deflated.compression_method(CompressionMethod::Stored);
                writer.start_file(*name, stored).unwrap();
                writer.write_all(bytes).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

pub fn member_names(archive: &[u8]) -> Vec<String> {
    let zip = ZipArchive::new(Cursor::new(archive)).unwrap();
    zip.file_names().map(str::to_string).collect::<Vec<_>>()
}

/// Member names in central-directory order.
pub fn ordered_names(archive: &[u8]) -> Vec<String> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

pub fn read_member(archive: &[u8], name: &str) -> Vec<u8> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut file = zip.by_name(name).unwrap();
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).unwrap();
    buf
}

pub fn read_member_string(archive: &[u8], name: &str) -> String {
    String::from_utf8(read_member(archive, name)).unwrap()
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0x00, 0xfe];

/// `{{CLIENT_NAME}}` is split across two formatting runs the way Word saves it.
pub const DOCX_BODY: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Invoice {{INVOICE_NO}}</w:t></w:r></w:p>"#,
    r#"<w:p><w:r><w:t xml:space="preserve">Dear {{CLIENT_</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>NAME}},</w:t></w:r></w:p>"#,
    r#"<w:p><w:r><w:t>Total: {{TOTAL}} due {{DATE}}</w:t></w:r><w:r><w:tab/></w:r></w:p>"#,
    r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#,
    r#"</w:body></w:document>"#
);

pub const DOCX_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:hdr><w:p><w:r><w:t>{{COMPANY}}</w:t></w:r></w:p></w:hdr>"#;

pub fn docx_template() -> Vec<u8> {
    build_archive(&[
        Entry::File("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        Entry::Dir("word/"),
        Entry::File("word/document.xml", DOCX_BODY.as_bytes()),
        Entry::File("word/header1.xml", DOCX_HEADER.as_bytes()),
        Entry::File(
            "word/_rels/document.xml.rels",
            br#"<Relationships><Relationship Id="rId1" Target="{{NOT_A_TARGET}}"/></Relationships>"#,
        ),
        Entry::Dir("word/media/"),
        Entry::Stored("word/media/image1.png", PNG_BYTES),
    ])
}

pub const SLIDE_1: &str = concat!(
    r#"<p:sld><p:cSld><p:spTree><p:sp><p:txBody>"#,
    r#"<a:p><a:r><a:rPr lang="en-US"/><a:t>{{TITLE}}</a:t></a:r></a:p>"#,
    r#"<a:p><a:r><a:t>Presented by {{PRES</a:t></a:r><a:r><a:t>ENTER}}</a:t></a:r><a:endParaRPr/></a:p>"#,
    r#"</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
);

pub const SLIDE_2: &str = r#"<p:sld><a:p><a:r><a:t>{{TITLE}} (continued)</a:t></a:r></a:p></p:sld>"#;

pub const SLIDE_LAYOUT: &str = r#"<p:sldLayout><a:p><a:r><a:t>{{TITLE}}</a:t></a:r></a:p></p:sldLayout>"#;

pub fn pptx_template() -> Vec<u8> {
    build_archive(&[
        Entry::File("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        Entry::File("ppt/slides/slide1.xml", SLIDE_1.as_bytes()),
        Entry::File("ppt/slides/slide2.xml", SLIDE_2.as_bytes()),
        Entry::File(
            "ppt/slides/_rels/slide1.xml.rels",
            b"<Relationships>{{TITLE}}</Relationships>",
        ),
        Entry::File("ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes()),
    ])
}

pub const SHARED_STRINGS: &str = concat!(
    r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">"#,
    r#"<si><t>{{REGION}}</t></si>"#,
    r#"<si><r><rPr><b/></rPr><t>Q1 {{RE</t></r><r><t>VENUE}}</t></r></si>"#,
    r#"<si><t>Static</t></si>"#,
    r#"</sst>"#
);

pub const SHEET_1: &str = r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>{{INLINE}}</t></is></c></row></sheetData></worksheet>"#;

pub fn xlsx_template() -> Vec<u8> {
    build_archive(&[
        Entry::File("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        Entry::File("xl/workbook.xml", b"<workbook/>"),
        Entry::File("xl/sharedStrings.xml", SHARED_STRINGS.as_bytes()),
        Entry::File("xl/worksheets/sheet1.xml", SHEET_1.as_bytes()),
        Entry::File("xl/styles.xml", b"<styleSheet>{{REGION}}</styleSheet>"),
    ])
}
