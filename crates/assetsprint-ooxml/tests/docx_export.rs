//! DOCX Export Tests
//!
//! Exports complete assets and reads the packages back with zip + quick-xml
//! to check part order, styles, media and the running header/footer.

use std::io::{Cursor, Read};

use assetsprint_ast::{AssetPackage, Bonus, Chapter, CoverImage, ImageFormat, Oto, Workbook};
use assetsprint_core::config::DocxSettings;
use assetsprint_ooxml::{export_docx, Relationships};
use chrono::{TimeZone, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

fn part_names(bytes: &[u8]) -> Vec<String> {
    let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
    zip.file_names().map(String::from).collect()
}

fn read_part(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = zip.by_name(name).unwrap();
    let mut contents = Vec::new();
    part.read_to_end(&mut contents).unwrap();
    contents
}

fn read_part_string(bytes: &[u8], name: &str) -> String {
    String::from_utf8(read_part(bytes, name)).unwrap()
}

/// Paragraphs of word/document.xml for an exported asset
fn document(asset: &AssetPackage) -> Vec<Para> {
    let bytes = export_docx(asset, &DocxSettings::default()).unwrap();
    paragraphs(&read_part(&bytes, "word/document.xml"))
}

/// `(type, target)` of every relationship in a `.rels` part
fn relationship_targets(xml: &[u8]) -> Vec<(String, String)> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut targets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                let attr = |key: &[u8]| {
                    e.attributes()
                        .filter_map(|a| a.ok())
                        .find(|a| a.key.as_ref() == key)
                        .map(|a| a.unescape_value().unwrap().into_owned())
                        .unwrap_or_default()
                };
                targets.push((attr(b"Type"), attr(b"Target")));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    targets
}

/// A paragraph as seen in word/document.xml
#[derive(Debug, Default, Clone, PartialEq)]
struct Para {
    style: Option<String>,
    centered: bool,
    text: String,
    page_break: bool,
    drawing: bool,
}

fn paragraphs(xml: &[u8]) -> Vec<Para> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut paras = Vec::new();
    let mut current: Option<Para> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current = Some(Para::default()),
                b"w:t" => in_text = true,
                b"w:drawing" => {
                    if let Some(p) = current.as_mut() {
                        p.drawing = true;
                    }
                }
                _ => {}
            },
            Event::Empty(e) => {
                if let Some(p) = current.as_mut() {
                    let val = e
                        .attributes()
                        .filter_map(|a| a.ok())
                        .find(|a| a.key.as_ref() == b"w:val" || a.key.as_ref() == b"w:type")
                        .map(|a| String::from_utf8_lossy(&a.value).into_owned());
                    match e.name().as_ref() {
                        b"w:pStyle" => p.style = val,
                        b"w:jc" => p.centered = val.as_deref() == Some("center"),
                        b"w:br" => p.page_break = val.as_deref() == Some("page"),
                        _ => {}
                    }
                }
            }
            Event::Text(t) => {
                if in_text {
                    if let Some(p) = current.as_mut() {
                        p.text.push_str(&t.unescape().unwrap());
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paras.extend(current.take()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    paras
}

fn tiny_png() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(b"not-really-a-png");
    bytes
}

fn full_asset() -> AssetPackage {
    let created = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
    let mut asset = AssetPackage::new("Keto Diet", created);
    asset.title = "Keto Made Simple".to_string();
    asset.subtitle = "Eat well, feel better".to_string();
    asset.dream_outcome = "Effortless weight loss".to_string();
    asset.cover_image = Some(CoverImage::from_bytes(ImageFormat::Png, &tiny_png()));
    asset.chapters = vec![
        Chapter::new("Getting Started", "## Why keto\n- **Fast** results\nStart today."),
        Chapter::new("Meal Plans", "Breakfast matters."),
    ];
    asset.value_stack.workbook = Workbook {
        title: "Keto Workbook".to_string(),
        description: "Track your progress".to_string(),
        icon: "FileText".to_string(),
        value: "$47".to_string(),
        sections: vec!["Week 1".to_string(), "Week 2".to_string()],
    };
    asset.value_stack.bonuses = vec![Bonus {
        title: "Shopping List".to_string(),
        description: "Everything you need".to_string(),
        icon: "List".to_string(),
        value: "$27".to_string(),
    }];
    asset.value_stack.oto = Oto {
        title: "Coaching Call".to_string(),
        description: "One hour, one on one".to_string(),
        icon: "Crown".to_string(),
        price: "$97".to_string(),
        original_price: "$197".to_string(),
        bullets: vec!["Personal plan".to_string()],
    };
    asset
}

#[test]
fn test_package_parts_present() {
    let bytes = export_docx(&full_asset(), &DocxSettings::default()).unwrap();
    let names = part_names(&bytes);

    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "word/document.xml",
        "word/styles.xml",
        "word/numbering.xml",
        "word/header1.xml",
        "word/footer1.xml",
        "word/_rels/document.xml.rels",
        "word/media/cover.png",
    ] {
        assert!(names.iter().any(|n| n == part), "missing {}", part);
    }

    let rels = relationship_targets(&read_part(&bytes, "word/_rels/document.xml.rels"));
    let images: Vec<&str> = rels
        .iter()
        .filter(|(rel_type, _)| rel_type == Relationships::TYPE_IMAGE)
        .map(|(_, target)| target.as_str())
        .collect();
    assert_eq!(images, vec!["media/cover.png"]);
}

#[test]
fn test_heading_sequence() {
    let paras = document(&full_asset());

    let headings: Vec<(&str, &str)> = paras
        .iter()
        .filter_map(|p| p.style.as_deref().map(|s| (s, p.text.as_str())))
        .filter(|(s, _)| *s != "ListParagraph")
        .collect();

    assert_eq!(
        headings,
        vec![
            ("Title", "Keto Made Simple"),
            ("Heading2", "Eat well, feel better"),
            ("Heading3", "Dream Outcome: Effortless weight loss"),
            ("Heading1", "Getting Started"),
            ("Heading2", "Why keto"),
            ("Heading1", "Meal Plans"),
            ("Heading1", "COMMERCIAL VALUE STACK"),
            ("Heading2", "Workbook: Keto Workbook"),
            ("Heading2", "Exclusive Bonuses"),
            ("Heading3", "Shopping List ($27)"),
            ("Heading1", "One-Time Offer (OTO): Coaching Call"),
        ]
    );
}

#[test]
fn test_body_text_and_breaks() {
    let paras = document(&full_asset());

    // Cover image comes first, centred, followed by a break
    assert!(paras[0].drawing && paras[0].centered);
    assert!(paras[1].page_break);

    let texts: Vec<&str> = paras.iter().map(|p| p.text.as_str()).collect();
    assert!(texts.contains(&"Fast results"));
    assert!(texts.contains(&"Valued at: $47"));
    assert!(texts.contains(&"Price: $97 (Regular: $197)"));
    assert!(!texts.iter().any(|t| t.contains("**")));

    let bullets: Vec<&str> = paras
        .iter()
        .filter(|p| p.style.as_deref() == Some("ListParagraph"))
        .map(|p| p.text.as_str())
        .collect();
    assert_eq!(bullets, vec!["Fast results", "Week 1", "Week 2", "Personal plan"]);

    // cover, front matter, two chapters, value stack heading, before OTO
    assert_eq!(paras.iter().filter(|p| p.page_break).count(), 6);
}

#[test]
fn test_header_footer_and_properties() {
    let bytes = export_docx(&full_asset(), &DocxSettings::default()).unwrap();

    let header = paragraphs(&read_part(&bytes, "word/header1.xml"));
    assert_eq!(header[0].text, "Keto Made Simple");
    let footer = read_part_string(&bytes, "word/footer1.xml");
    assert!(footer.contains("Page "));
    assert!(footer.contains("PAGE"));

    let core = read_part_string(&bytes, "docProps/core.xml");
    assert!(core.contains("<dc:title>Keto Made Simple</dc:title>"));
    assert!(core.contains("<cp:keywords>Keto Diet</cp:keywords>"));
}

#[test]
fn test_broken_cover_still_exports() {
    let mut asset = full_asset();
    asset.replace_cover(Some(CoverImage::from_data_uri("data:image/jpeg;base64,%%%")));

    let bytes = export_docx(&asset, &DocxSettings::default()).unwrap();
    assert!(part_names(&bytes).iter().all(|n| !n.starts_with("word/media/")));

    let paras = paragraphs(&read_part(&bytes, "word/document.xml"));
    assert!(!paras[0].drawing);
    assert!(paras.iter().any(|p| p.text == "Getting Started"));
}

#[test]
fn test_empty_asset_exports() {
    let created = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
    let asset = AssetPackage::new("empty", created);
    let paras = document(&asset);
    assert!(paras.iter().any(|p| p.text == "COMMERCIAL VALUE STACK"));
}

#[test]
fn test_export_does_not_modify_asset() {
    let asset = full_asset();
    let before = asset.clone();
    export_docx(&asset, &DocxSettings::default()).unwrap();
    assert_eq!(asset, before);
}

/// One marker per structural paragraph: the cover drawing, forced breaks
/// and headings. Body text and bullets are skipped.
fn outline(paras: &[Para]) -> Vec<String> {
    paras
        .iter()
        .filter_map(|p| {
            if p.drawing {
                Some("[cover]".to_string())
            } else if p.page_break {
                Some("[break]".to_string())
            } else {
                match p.style.as_deref() {
                    Some("ListParagraph") | None => None,
                    Some(style) => Some(format!("{}: {}", style, p.text)),
                }
            }
        })
        .collect()
}

fn bonus(title: &str, value: &str) -> Bonus {
    Bonus {
        title: title.to_string(),
        description: format!("About {}", title),
        icon: "Gift".to_string(),
        value: value.to_string(),
    }
}

#[test]
fn test_full_document_order() {
    let mut asset = full_asset();
    asset.chapters = vec![
        Chapter::new("Basics", "Plain text."),
        Chapter::new("Advanced", "- one\n- two"),
    ];
    asset.value_stack.bonuses = vec![
        bonus("Shopping List", "$27"),
        bonus("Recipe Cards", "$19"),
        bonus("Macro Calculator", "$37"),
    ];

    assert_eq!(
        outline(&document(&asset)),
        vec![
            "[cover]",
            "[break]",
            "Title: Keto Made Simple",
            "Heading2: Eat well, feel better",
            "Heading3: Dream Outcome: Effortless weight loss",
            "[break]",
            "Heading1: Basics",
            "[break]",
            "Heading1: Advanced",
            "[break]",
            "Heading1: COMMERCIAL VALUE STACK",
            "[break]",
            "Heading2: Workbook: Keto Workbook",
            "Heading2: Exclusive Bonuses",
            "Heading3: Shopping List ($27)",
            "Heading3: Recipe Cards ($19)",
            "Heading3: Macro Calculator ($37)",
            "[break]",
            "Heading1: One-Time Offer (OTO): Coaching Call",
        ]
    );
}

#[test]
fn test_empty_chapter_is_heading_then_break() {
    let mut asset = full_asset();
    asset.chapters = vec![
        Chapter::new("Draft Chapter", ""),
        Chapter::new("Meal Plans", "Breakfast matters."),
    ];
    let paras = document(&asset);

    let heading = paras
        .iter()
        .position(|p| p.style.as_deref() == Some("Heading1") && p.text == "Draft Chapter")
        .unwrap();
    let next = &paras[heading + 1];
    assert!(next.page_break);
    assert!(next.text.is_empty());
    assert_eq!(next.style, None);

    assert_eq!(paras[heading + 2].text, "Meal Plans");
    assert!(!paras.iter().any(|p| p.text == "Content generation failed."));
}
