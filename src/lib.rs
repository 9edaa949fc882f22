//! # reportbase – base framework for paginated PDF reports
//!
//! Concrete report types plug page styling, header/footer content, and body
//! content into a fixed generation pipeline; the framework owns the
//! lifecycle, temporary-resource management, and a declarative styling layer
//! for tabular layout. The pieces:
//!
//! 1. **Model** – plain-data document/section/table primitives ([`model`])
//! 2. **Format** – optional-field style descriptors ([`format`])
//! 3. **Table** – initialize-once formatted tables and separators ([`table`])
//! 4. **Images** – best-effort staging with guaranteed cleanup ([`images`])
//! 5. **Generate** – the four-hook template-method pipeline ([`generator`])
//! 6. **Render** – emit PDF bytes via printpdf ([`render`])

pub mod error;
pub mod format;
pub mod generator;
pub mod images;
pub mod model;
pub mod render;
pub mod table;

// Re-exports for convenience
pub use error::{Error, Result};
pub use format::{ColumnFormat, RowFormat, TableFormat};
pub use generator::{BuildContext, ReportContent, ReportGenerator};
pub use table::{add_separator, FormattedTable};
