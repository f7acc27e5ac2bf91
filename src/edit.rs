//! Operator overrides for extracted line items.
//!
//! The original workflow interleaved console prompts with formatting; here
//! the prompts sit behind [`EditProvider`] so the layout path never touches
//! stdin and tests can drive edits from a fixture.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Deserialize;

use crate::cfdi::LineItem;
use crate::error::OrderError;
use crate::format::format_exponents;

/// The three free-text fields the operator supplies for every order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFields {
    pub department: String,
    pub requester: String,
    pub supplier: String,
}

/// Source of operator input: order fields, the two yes/no gates, and
/// per-item overrides. Per-item methods are only called when the matching
/// gate answered yes.
pub trait EditProvider {
    fn order_fields(&mut self) -> OrderFields;

    fn wants_unit_edits(&mut self) -> bool;

    /// Replacement unit for the item at `index`, or `None` to keep it.
    fn unit_override(&mut self, index: usize, item: &LineItem) -> Option<String>;

    fn wants_description_edits(&mut self) -> bool;

    /// Replacement description for the item at `index`, or `None` to keep it.
    fn description_override(&mut self, index: usize, item: &LineItem) -> Option<String>;
}

/// Run the gates and overrides over the extracted items. Every value that
/// passes through is exponent-normalized again, so an operator typing `m^3`
/// prints as `m³` just like extracted text.
pub fn apply_edits(mut items: Vec<LineItem>, edits: &mut dyn EditProvider) -> Vec<LineItem> {
    if edits.wants_unit_edits() {
        for (i, item) in items.iter_mut().enumerate() {
            if let Some(unit) = edits.unit_override(i, item) {
                item.unit = unit;
            }
            item.unit = format_exponents(&item.unit);
        }
    }
    if edits.wants_description_edits() {
        for (i, item) in items.iter_mut().enumerate() {
            if let Some(desc) = edits.description_override(i, item) {
                item.description = desc;
            }
            item.description = format_exponents(&item.description);
        }
    }
    items
}

// ---------------------------------------------------------------------------
// Interactive console provider
// ---------------------------------------------------------------------------

/// Prompts on an arbitrary reader/writer pair; [`ConsoleEdits::stdin`] wires
/// it to the terminal.
pub struct ConsoleEdits<R, W> {
    input: R,
    output: W,
}

impl ConsoleEdits<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> ConsoleEdits<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, message: &str) -> String {
        let _ = write!(self.output, "{message}");
        let _ = self.output.flush();
        let mut line = String::new();
        if self.input.read_line(&mut line).is_err() {
            return String::new();
        }
        line.trim().to_string()
    }

    fn yes_no(&mut self, message: &str) -> bool {
        self.prompt(message).eq_ignore_ascii_case("s")
    }
}

impl<R: BufRead, W: Write> EditProvider for ConsoleEdits<R, W> {
    fn order_fields(&mut self) -> OrderFields {
        OrderFields {
            department: self.prompt("Ingrese el Departamento que lo solicita: "),
            requester: self.prompt("Ingrese la Persona que lo solicita: "),
            supplier: self.prompt("Ingrese el Proveedor: "),
        }
    }

    fn wants_unit_edits(&mut self) -> bool {
        self.yes_no("¿Desea modificar la información de 'UNIDAD' extraída del XML? (S/N): ")
    }

    fn unit_override(&mut self, _index: usize, item: &LineItem) -> Option<String> {
        let answer = self.prompt(&format!(
            "Para el concepto con descripción '{}', la unidad es '{}'. \
             Ingrese nuevo valor (Enter para mantener): ",
            item.description, item.unit
        ));
        if answer.is_empty() {
            None
        } else {
            Some(answer)
        }
    }

    fn wants_description_edits(&mut self) -> bool {
        self.yes_no("¿Desea modificar la información de 'DESCRIPCIÓN' extraída del XML? (S/N): ")
    }

    fn description_override(&mut self, _index: usize, item: &LineItem) -> Option<String> {
        let answer = self.prompt(&format!(
            "Para el concepto con cantidad '{}' y unidad '{}', la descripción es '{}'. \
             Ingrese nuevo valor (Enter para mantener): ",
            item.quantity, item.unit, item.description
        ));
        if answer.is_empty() {
            None
        } else {
            Some(answer)
        }
    }
}

// ---------------------------------------------------------------------------
// Non-interactive providers
// ---------------------------------------------------------------------------

/// No prompting: keeps every extracted value and leaves the order fields
/// empty.
#[derive(Debug, Default)]
pub struct NoEdits;

impl EditProvider for NoEdits {
    fn order_fields(&mut self) -> OrderFields {
        OrderFields::default()
    }

    fn wants_unit_edits(&mut self) -> bool {
        false
    }

    fn unit_override(&mut self, _index: usize, _item: &LineItem) -> Option<String> {
        None
    }

    fn wants_description_edits(&mut self) -> bool {
        false
    }

    fn description_override(&mut self, _index: usize, _item: &LineItem) -> Option<String> {
        None
    }
}

/// Overrides loaded from a JSON file, keyed by zero-based item index:
///
/// ```json
/// {
///   "department": "OBRAS",
///   "requester": "J. Perez",
///   "supplier": "Ferretera del Norte",
///   "units": { "0": "m^2" },
///   "descriptions": { "1": "Valvula de 2 pulgadas" }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct BatchEdits {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub requester: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub units: BTreeMap<usize, String>,
    #[serde(default)]
    pub descriptions: BTreeMap<usize, String>,
}

impl BatchEdits {
    pub fn from_path(path: &Path) -> Result<Self, OrderError> {
        let text = std::fs::read_to_string(path).map_err(|source| OrderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl EditProvider for BatchEdits {
    fn order_fields(&mut self) -> OrderFields {
        OrderFields {
            department: self.department.clone(),
            requester: self.requester.clone(),
            supplier: self.supplier.clone(),
        }
    }

    fn wants_unit_edits(&mut self) -> bool {
        !self.units.is_empty()
    }

    fn unit_override(&mut self, index: usize, _item: &LineItem) -> Option<String> {
        self.units.get(&index).cloned()
    }

    fn wants_description_edits(&mut self) -> bool {
        !self.descriptions.is_empty()
    }

    fn description_override(&mut self, index: usize, _item: &LineItem) -> Option<String> {
        self.descriptions.get(&index).cloned()
    }
}
