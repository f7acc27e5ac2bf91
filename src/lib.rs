//! # cfdi2oc – CFDI invoice → purchase-order PDF
//!
//! Converts a CFDI tax-invoice XML document into a paginated, printable
//! purchase order on US-Letter paper. The pipeline stages are:
//!
//! 1. **Extract** – CFDI XML → [`cfdi::Invoice`] with best-effort fields
//! 2. **Edit** – operator overrides via an [`edit::EditProvider`]
//! 3. **Normalize** – exponent notation (`m^3` → `m³`) ([`format`])
//! 4. **Compose** – fixed-template fields plus the paginated item table
//!    ([`compose`], [`table`])
//! 5. **Render** – PDF bytes via printpdf ([`canvas`])
//!
//! Only structural XML failures abort; missing fields print placeholders and
//! broken assets print captioned boxes, reported back as warnings.

pub mod canvas;
pub mod cfdi;
pub mod compose;
pub mod edit;
pub mod error;
pub mod fonts;
pub mod format;
pub mod pipeline;
pub mod table;

// Re-exports for convenience
pub use error::{OrderError, RenderReport, RenderWarning};
pub use pipeline::{generate_order, generate_order_to_file, OrderConfig};
