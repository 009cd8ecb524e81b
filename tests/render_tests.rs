#![cfg(feature = "html")]

use chrono::{NaiveDate, TimeZone, Utc};
use factuur::core::*;
use factuur::render::*;
use rust_decimal_macros::dec;

const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn invoice() -> Invoice {
    let items = vec![
        LineItem::new("Shirt", dec!(10.00), dec!(2)),
        LineItem::new("Cap", dec!(5.50), dec!(1)),
        LineItem::new("Hoodie", dec!(1249.95), dec!(1)),
    ];
    let totals = compute_totals(&items, dec!(21)).unwrap();
    Invoice {
        id: "a1".into(),
        number: "BOL-NLAB120001".into(),
        date: "2024-06-15".into(),
        due_date: "2024-07-15".into(),
        purpose: "BOL".into(),
        order_reference: Some("PO-77".into()),
        customer: CustomerBuilder::new("Jansen BV")
            .department("Inkoop")
            .postal_code("3511 AB")
            .city("Utrecht")
            .build(),
        items,
        subtotal: totals.subtotal,
        tax_amount: totals.tax_amount,
        total: totals.total,
        tax_rate: dec!(21),
        notes: Some("Bedankt voor uw bestelling.".into()),
        created_at: Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap(),
    }
}

fn settings() -> Settings {
    Settings::new()
        .with(Settings::COMPANY_NAME, "Shop BV")
        .with(Settings::ADDRESS, "Dorpsstraat 1")
        .with(Settings::POSTAL_CODE, "3811 AA")
        .with(Settings::CITY, "Amersfoort")
        .with(Settings::EMAIL, "info@shop.nl")
        .with(Settings::TAX_NUMBER, "NL001234567B01")
}

#[test]
fn no_logo_shows_company_name() {
    let html = render_invoice_html(&invoice(), &settings(), None, &EngineConfig::default());
    assert!(html.contains(r#"<div class="brand-name">Shop BV</div>"#));
    assert!(!html.contains("<img"));
}

#[test]
fn logo_is_inlined_as_data_uri() {
    let logo = LogoSource::Bytes {
        data: PNG_HEADER.to_vec(),
        extension: "png".into(),
    };
    let html = render_invoice_html(&invoice(), &settings(), Some(&logo), &EngineConfig::default());
    assert!(html.contains(r#"<img class="logo" src="data:image/png;base64,iVBORw0KGgo"#));
    assert!(!html.contains("brand-name\">"));
}

#[test]
fn corrupt_logo_falls_back_to_company_name() {
    let logo = LogoSource::DataUri("data:image/png;base64,%%%".into());
    let html = render_invoice_html(&invoice(), &settings(), Some(&logo), &EngineConfig::default());
    assert!(html.contains(r#"<div class="brand-name">Shop BV</div>"#));
}

#[test]
fn screen_rendering_is_deterministic() {
    let config = EngineConfig::default();
    let a = render_invoice_html(&invoice(), &settings(), None, &config);
    let b = render_invoice_html(&invoice(), &settings(), None, &config);
    assert_eq!(a, b);
}

#[test]
fn screen_rendering_contains_all_sections() {
    let html = render_invoice_html(&invoice(), &settings(), None, &EngineConfig::default());
    for expected in [
        "<title>Factuur BOL-NLAB120001</title>",
        "FACTUUR",
        "Factuurnummer:",
        "BOL-NLAB120001",
        "Bestelnummer:",
        "PO-77",
        "Jansen BV t.a.v. Inkoop",
        "3811 AA Amersfoort",
        "BTW: NL001234567B01",
        "€ 1.249,95",
        "BTW (21%):",
        r#"class="tot-grand""#,
        r#"<p class="notes">Bedankt voor uw bestelling.</p>"#,
        "Vragen over deze factuur? Mail ons via info@shop.nl",
    ] {
        assert!(html.contains(expected), "missing {expected:?}");
    }
}

#[test]
fn user_text_is_escaped() {
    let mut inv = invoice();
    inv.customer.company = "<script>alert('x')</script>".into();
    inv.items[0].name = "Tom & Jerry".into();
    let html = render_invoice_html(&inv, &settings(), None, &EngineConfig::default());
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert("));
    assert!(html.contains("Tom &amp; Jerry"));
}

#[test]
fn english_labels() {
    let config = EngineConfig {
        labels: Labels::english(),
        ..EngineConfig::default()
    };
    let doc = invoice_document(&invoice(), &settings(), None, &config);
    assert_eq!(doc.lang, "en");
    assert_eq!(doc.header.title, "INVOICE");
}

#[test]
fn money_formatting_snapshot() {
    let fmt = NumberFormat::default();
    let lines: Vec<String> = [dec!(0), dec!(0.005), dec!(21.07), dec!(1234.5), dec!(-1234.5), dec!(1000000)]
        .into_iter()
        .map(|v| fmt.money(v))
        .collect();
    insta::assert_snapshot!(lines.join("\n"), @r"
    € 0,00
    € 0,01
    € 21,07
    € 1.234,50
    € -1.234,50
    € 1.000.000,00
    ");
}

#[test]
fn report_page_for_empty_range() {
    let generated = NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let html = render_report_document(&aggregate(&[]), "Q3 2024", generated, &EngineConfig::default());
    assert!(html.contains("Geen gegevens"));
    assert!(html.contains("Periode: Q3 2024"));
    assert!(html.contains("01-07-2024 08:00"));
}

#[cfg(feature = "pdf")]
mod print {
    use super::*;
    use factuur::render::pdf::PdfBackend;
    use lopdf::content::Content;
    use lopdf::{Document, Object};

    fn win_ansi(text: &str) -> Vec<u8> {
        text.chars()
            .map(|c| if c == '€' { 0x80 } else { c as u8 })
            .collect()
    }

    fn shown_text(bytes: &[u8]) -> Vec<Vec<u8>> {
        let pdf = Document::load_mem(bytes).unwrap();
        let mut texts = Vec::new();
        for id in pdf.get_pages().into_values() {
            let content = Content::decode(&pdf.get_page_content(id).unwrap()).unwrap();
            for op in content.operations {
                if op.operator == "Tj" {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        texts.push(bytes.clone());
                    }
                }
            }
        }
        texts
    }

    #[test]
    fn print_and_screen_show_the_same_numbers() {
        let config = EngineConfig::default();
        let doc = invoice_document(&invoice(), &settings(), None, &config);
        let html = render_screen_document(&doc);
        let pdf = render_invoice_print(&PdfBackend::new(), &invoice(), &settings(), None, &config).unwrap();
        let texts = shown_text(&pdf);

        let values = doc
            .totals
            .rows
            .iter()
            .map(|r| r.value.clone())
            .chain(doc.items.rows.iter().map(|r| r.line_total.clone()));
        for value in values {
            assert!(html.contains(&value), "screen lacks {value}");
            assert!(texts.contains(&win_ansi(&value)), "print lacks {value}");
        }
    }

    fn png_logo(picture: image::DynamicImage) -> LogoSource {
        let mut data = Vec::new();
        picture
            .write_to(&mut std::io::Cursor::new(&mut data), image::ImageFormat::Png)
            .unwrap();
        LogoSource::Bytes {
            data,
            extension: "png".into(),
        }
    }

    fn image_dicts(bytes: &[u8]) -> Vec<lopdf::Dictionary> {
        let pdf = Document::load_mem(bytes).unwrap();
        pdf.objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .filter(|s| s.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Image".as_slice()))
            .map(|s| s.dict.clone())
            .collect()
    }

    #[test]
    fn transparent_png_logo_is_printed_as_valid_image() {
        let logo = png_logo(image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            40,
            20,
            image::Rgba([10, 120, 200, 0]),
        )));
        let config = EngineConfig::default();
        let html = render_invoice_html(&invoice(), &settings(), Some(&logo), &config);
        assert!(html.contains(r#"<img class="logo" src="data:image/png;base64,"#));

        let pdf = render_invoice_print(&PdfBackend::new(), &invoice(), &settings(), Some(&logo), &config).unwrap();
        let dicts = image_dicts(&pdf);
        assert_eq!(dicts.len(), 2);
        for dict in &dicts {
            assert_eq!(dict.get(b"BitsPerComponent").and_then(Object::as_i64).unwrap(), 8);
            let space = dict.get(b"ColorSpace").and_then(Object::as_name).unwrap();
            assert!(space == b"DeviceRGB" || space == b"DeviceGray");
        }
        assert!(dicts.iter().any(|d| d.has(b"SMask")));
        assert!(!shown_text(&pdf).contains(&win_ansi("Shop BV")));
    }

    #[test]
    fn undecodable_logo_prints_company_name() {
        let logo = LogoSource::Bytes {
            data: PNG_HEADER.to_vec(),
            extension: "png".into(),
        };
        let pdf = render_invoice_print(&PdfBackend::new(), &invoice(), &settings(), Some(&logo), &EngineConfig::default())
            .unwrap();
        assert!(image_dicts(&pdf).is_empty());
        assert!(shown_text(&pdf).contains(&win_ansi("Shop BV")));
    }

    #[test]
    fn print_rendering_is_deterministic() {
        let config = EngineConfig::default();
        let a = render_invoice_print(&PdfBackend::new(), &invoice(), &settings(), None, &config).unwrap();
        let b = render_invoice_print(&PdfBackend::new(), &invoice(), &settings(), None, &config).unwrap();
        assert_eq!(shown_text(&a), shown_text(&b));
    }
}
