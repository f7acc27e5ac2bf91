//! Integration tests for the cfdi2oc pipeline.
//!
//! These tests validate:
//! - End-to-end CFDI XML → PDF generation
//! - Placeholder behavior for missing optional fields
//! - Asset failures degrading to warnings, not errors
//! - Pagination across many line items

use std::io::Write;

use cfdi2oc::canvas::RecordingCanvas;
use cfdi2oc::cfdi::Invoice;
use cfdi2oc::compose::compose_order;
use cfdi2oc::edit::{apply_edits, BatchEdits, NoEdits, OrderFields};
use cfdi2oc::error::RenderWarning;
use cfdi2oc::pipeline::{generate_order, generate_order_to_file, OrderConfig};

// =====================================================================
// Helpers
// =====================================================================

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "Missing PDF header");
}

fn cfdi_with_items(items: &str) -> String {
    format!(
        r#"<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4"
                xmlns:tfd="http://www.sat.gob.mx/TimbreFiscalDigital"
                Fecha="2024-01-01" Serie="A" Folio="123">
            <cfdi:Conceptos>{items}</cfdi:Conceptos>
            <cfdi:Complemento>
                <tfd:TimbreFiscalDigital UUID="11111111-2222-3333-4444-555555555555"/>
            </cfdi:Complemento>
        </cfdi:Comprobante>"#
    )
}

// =====================================================================
// End-to-end scenarios
// =====================================================================

#[test]
fn single_short_item_renders_one_page() {
    let xml = cfdi_with_items(
        r#"<cfdi:Concepto Cantidad="10" Unidad="m^3" Descripcion="Tuberia PVC m^3"/>"#,
    );
    let (bytes, report) = generate_order(&xml, &OrderConfig::default(), &mut NoEdits).unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(report.pages, 1);
    assert!(report.warnings.is_empty());

    // The same input through the recording backend shows the normalized
    // unit and description.
    let invoice = Invoice::parse(&xml).unwrap();
    assert_eq!(invoice.items[0].unit, "m³");
    assert_eq!(invoice.items[0].description, "Tuberia PVC m³");
}

#[test]
fn no_conceptos_node_still_renders() {
    let xml = r#"<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4"
                     Fecha="2024-01-01"/>"#;
    let (bytes, report) = generate_order(xml, &OrderConfig::default(), &mut NoEdits).unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(report.pages, 1);

    let invoice = Invoice::parse(xml).unwrap();
    let mut canvas = RecordingCanvas::new();
    compose_order(
        &mut canvas,
        &invoice,
        &invoice.items,
        &OrderFields::default(),
        &OrderConfig::default(),
    );
    // Header, footer, and static fields are present; table region is empty.
    let texts = canvas.texts();
    assert!(texts.contains(&"ORDEN DE COMPRA"));
    assert!(texts.contains(&"CANT."));
    assert!(texts.contains(&"Página 1"));
    assert!(!texts.iter().any(|t| t.starts_with("Articulo")));
}

#[test]
fn missing_stamp_and_identifiers_render_placeholders() {
    let xml = r#"<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4"/>"#;
    let invoice = Invoice::parse(xml).unwrap();
    let mut canvas = RecordingCanvas::new();
    compose_order(
        &mut canvas,
        &invoice,
        &invoice.items,
        &OrderFields::default(),
        &OrderConfig::default(),
    );
    let texts = canvas.texts();
    assert!(texts.contains(&"Sin fecha"));
    // Folio fiscal and CFDI both degrade to N/A.
    assert_eq!(texts.iter().filter(|t| **t == "N/A").count(), 2);
}

#[test]
fn many_items_paginate_with_headers_on_each_page() {
    let items: String = (0..80)
        .map(|i| {
            format!(
                r#"<cfdi:Concepto Cantidad="{i}" Unidad="PZA"
                       Descripcion="Articulo {i} para mantenimiento de la red"/>"#
            )
        })
        .collect();
    let xml = cfdi_with_items(&items);
    let (bytes, report) = generate_order(&xml, &OrderConfig::default(), &mut NoEdits).unwrap();
    assert_valid_pdf(&bytes);
    assert!(report.pages > 1, "expected multiple pages, got {}", report.pages);

    let invoice = Invoice::parse(&xml).unwrap();
    let mut canvas = RecordingCanvas::new();
    compose_order(
        &mut canvas,
        &invoice,
        &invoice.items,
        &OrderFields::default(),
        &OrderConfig::default(),
    );
    let headers = canvas.texts().iter().filter(|t| **t == "CANT.").count();
    assert_eq!(headers, canvas.page_breaks() + 1, "one header per page");
}

// =====================================================================
// Asset handling
// =====================================================================

#[test]
fn corrupt_logo_file_warns_but_generates() {
    let dir = tempfile::tempdir().unwrap();
    let logo_path = dir.path().join("logo.jpg");
    let mut f = std::fs::File::create(&logo_path).unwrap();
    f.write_all(b"this is not an image").unwrap();

    let xml = cfdi_with_items(
        r#"<cfdi:Concepto Cantidad="1" Unidad="PZA" Descripcion="Codo 90"/>"#,
    );
    let config = OrderConfig {
        logo: Some(logo_path),
        ..OrderConfig::default()
    };
    let (bytes, report) = generate_order(&xml, &config, &mut NoEdits).unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(report.warnings[0], RenderWarning::Logo(_)));
}

#[test]
fn missing_signature_file_warns_but_generates() {
    let xml = cfdi_with_items(
        r#"<cfdi:Concepto Cantidad="1" Unidad="PZA" Descripcion="Codo 90"/>"#,
    );
    let config = OrderConfig {
        signature: Some("/no/such/firma.png".into()),
        ..OrderConfig::default()
    };
    let (bytes, report) = generate_order(&xml, &config, &mut NoEdits).unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(report.warnings[0], RenderWarning::Signature(_)));
}

// =====================================================================
// Operator edits
// =====================================================================

#[test]
fn batch_edits_override_and_normalize() {
    let xml = cfdi_with_items(
        r#"<cfdi:Concepto Cantidad="5" Unidad="KG" Descripcion="Cemento gris"/>"#,
    );
    let invoice = Invoice::parse(&xml).unwrap();
    let mut edits = BatchEdits {
        department: "OBRAS".to_string(),
        units: [(0usize, "m^2".to_string())].into_iter().collect(),
        ..BatchEdits::default()
    };
    let items = apply_edits(invoice.items.clone(), &mut edits);
    assert_eq!(items[0].unit, "m²");
    assert_eq!(items[0].description, "Cemento gris");
}

// =====================================================================
// File round-trip
// =====================================================================

#[test]
fn generate_to_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let xml_path = dir.path().join("factura.xml");
    let pdf_path = dir.path().join("orden.pdf");
    std::fs::write(
        &xml_path,
        cfdi_with_items(
            r#"<cfdi:Concepto Cantidad="10" Unidad="m^3" Descripcion="Tuberia PVC m^3"/>"#,
        ),
    )
    .unwrap();

    let report =
        generate_order_to_file(&xml_path, &pdf_path, &OrderConfig::default(), &mut NoEdits)
            .unwrap();
    assert_eq!(report.pages, 1);

    let bytes = std::fs::read(&pdf_path).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn missing_input_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = generate_order_to_file(
        &dir.path().join("nope.xml"),
        &dir.path().join("out.pdf"),
        &OrderConfig::default(),
        &mut NoEdits,
    );
    assert!(result.is_err());
}
