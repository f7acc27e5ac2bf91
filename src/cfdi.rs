//! CFDI invoice extraction.
//!
//! Pulls the handful of fields the purchase order needs out of a CFDI tax
//! document. Lookup is best-effort by local tag name so CFD/3 and CFD/4
//! documents both work; every optional field is an explicit `Option` with a
//! declared placeholder, resolved through the `*_display` accessors.

use crate::format::format_exponents;

/// Placeholder when the document carries no issue date.
pub const NO_DATE: &str = "Sin fecha";
/// Placeholder for a missing fiscal stamp or series/folio pair.
pub const NOT_AVAILABLE: &str = "N/A";

/// One row of the purchase-order table. Order follows the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub quantity: String,
    pub unit: String,
    pub description: String,
}

/// Fields extracted from the CFDI document.
#[derive(Debug, Clone, Default)]
pub struct Invoice {
    pub date: Option<String>,
    pub series: Option<String>,
    pub folio: Option<String>,
    /// UUID of the TimbreFiscalDigital stamp, when present.
    pub fiscal_uuid: Option<String>,
    pub items: Vec<LineItem>,
}

impl Invoice {
    /// Parse a CFDI document. Only a structurally malformed document is an
    /// error; absent fields degrade to `None` / empty strings.
    pub fn parse(xml: &str) -> Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();

        let date = non_empty_attr(root, "Fecha");
        let series = non_empty_attr(root, "Serie");
        let folio = non_empty_attr(root, "Folio");

        let mut items = Vec::new();
        if let Some(conceptos) = root
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "Conceptos")
        {
            for concepto in conceptos
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == "Concepto")
            {
                items.push(LineItem {
                    quantity: concepto.attribute("Cantidad").unwrap_or("").to_string(),
                    unit: format_exponents(concepto.attribute("Unidad").unwrap_or("")),
                    description: format_exponents(
                        concepto.attribute("Descripcion").unwrap_or(""),
                    ),
                });
            }
        }

        let fiscal_uuid = doc
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "TimbreFiscalDigital")
            .and_then(|n| n.attribute("UUID"))
            .map(str::to_string);

        log::info!(
            "parsed CFDI: {} item(s), stamp {}",
            items.len(),
            if fiscal_uuid.is_some() { "present" } else { "absent" }
        );

        Ok(Self {
            date,
            series,
            folio,
            fiscal_uuid,
            items,
        })
    }

    /// Issue date, or the "Sin fecha" placeholder.
    pub fn date_display(&self) -> &str {
        self.date.as_deref().unwrap_or(NO_DATE)
    }

    /// Fiscal-stamp UUID, or "N/A".
    pub fn fiscal_folio_display(&self) -> &str {
        self.fiscal_uuid.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Series and folio joined with a space; either alone if the other is
    /// missing; "N/A" when both are absent.
    pub fn cfdi_number_display(&self) -> String {
        match (self.series.as_deref(), self.folio.as_deref()) {
            (Some(s), Some(f)) => format!("{s} {f}"),
            (Some(s), None) => s.to_string(),
            (None, Some(f)) => f.to_string(),
            (None, None) => NOT_AVAILABLE.to_string(),
        }
    }
}

fn non_empty_attr(node: roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
