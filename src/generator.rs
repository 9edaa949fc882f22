//! Report generator – the template-method pipeline that sequences document
//! construction and owns the temporary-resource lifecycle.
//!
//! A concrete report supplies a [`ReportContent`] implementation; the
//! generator runs its four hooks in fixed order (page styles → header →
//! footer → content), renders the assembled model with [`crate::render`],
//! and releases the temp-image directory on every exit path, whether the
//! pass succeeded or failed.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::images::TempImageStore;
use crate::model::{Color, Document, Section, Unit};
use crate::render;
use crate::table;

/// Hooks a concrete report type supplies to the pipeline.
///
/// The four build hooks run in declaration order on every generation pass
/// and must all be implemented, even if trivially empty — the sequence is
/// fixed and non-skippable.
pub trait ReportContent {
    /// Root directory under which the generator may create its private
    /// temp-image directory. Returning `None` (the default) makes any
    /// staging attempt fail with a configuration error.
    fn temp_image_root(&self) -> Option<PathBuf> {
        None
    }

    /// Define named styles and page geometry on the fresh document.
    fn define_page_styles(&mut self, ctx: &mut BuildContext<'_>) -> Result<()>;

    /// Populate the header of the initial section.
    fn build_header(&mut self, ctx: &mut BuildContext<'_>) -> Result<()>;

    /// Populate the footer of the initial section.
    fn build_footer(&mut self, ctx: &mut BuildContext<'_>) -> Result<()>;

    /// Build the body content.
    fn build_content(&mut self, ctx: &mut BuildContext<'_>) -> Result<()>;
}

/// Hook-side view of one generation pass: the document under construction
/// plus image staging.
pub struct BuildContext<'a> {
    document: &'a mut Document,
    images: &'a mut TempImageStore,
}

impl BuildContext<'_> {
    /// The document under construction.
    pub fn document(&mut self) -> &mut Document {
        self.document
    }

    /// The current section. Sections only ever grow, so this is the one
    /// most recently added.
    pub fn section(&mut self) -> &mut Section {
        self.document.last_section_mut()
    }

    /// Start a new page section; it becomes the current section.
    pub fn add_section(&mut self) -> &mut Section {
        self.document.add_section()
    }

    /// Stage the image behind `uri` into the pass's temp directory and
    /// return the local name to reference in content. See
    /// [`TempImageStore::stage`] for the error and best-effort contract.
    pub fn stage_image(&mut self, uri: &str, extension_override: Option<&str>) -> Result<String> {
        self.images.stage(self.document, uri, extension_override)
    }

    /// Add a spacer table to the current section, optionally with a ruled
    /// bottom edge in the given colour.
    pub fn add_separator(&mut self, width: Unit, height: Unit, rule: Option<Color>) {
        table::add_separator(self.section(), width, height, rule);
    }
}

/// Orchestrates the full generation lifecycle for one report type.
///
/// An instance is reusable: each pass recreates the document model from
/// scratch; only the title and the instance identity persist across passes.
pub struct ReportGenerator<C: ReportContent> {
    id: Uuid,
    title: String,
    file_name: String,
    content: C,
    images: TempImageStore,
    document: Option<Document>,
}

impl<C: ReportContent> ReportGenerator<C> {
    /// Create a generator for a report titled `title`. The title must
    /// contain at least one non-whitespace character.
    pub fn new(title: impl Into<String>, content: C) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "title must not be empty".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        let file_name = format!("{title}.pdf");
        Ok(ReportGenerator {
            id,
            title,
            file_name,
            content,
            images: TempImageStore::new(id),
            document: None,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Derived default output filename, `"<title>.pdf"`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Process-unique identity namespacing this instance's temp directory.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    /// Render the report and return the PDF bytes. The temp-image
    /// directory is released whether rendering succeeded or failed.
    pub fn export_bytes(&mut self) -> Result<Vec<u8>> {
        let result = self.render_to_bytes();
        self.release_temp_images();
        result
    }

    /// Render the report and write it to `path`. Filesystem errors surface
    /// to the caller after temp-image cleanup has run.
    pub fn save_to_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let result = self
            .render_to_bytes()
            .and_then(|bytes| fs::write(path, bytes).map_err(Error::from));
        self.release_temp_images();
        result
    }

    /// Render the report and write it to `stream`.
    pub fn save_to_stream<W: Write>(&mut self, stream: &mut W) -> Result<()> {
        let result = self.render_to_stream(stream);
        self.release_temp_images();
        result
    }

    /// Run one build pass: fresh document, title metadata, initial section,
    /// then the four hooks in fixed order.
    fn generate(&mut self) -> Result<()> {
        self.images
            .set_configured_root(self.content.temp_image_root());

        let mut document = Document::new(self.title.clone());
        document.add_section();
        log::debug!("generation pass started for {:?}", self.title);

        let mut ctx = BuildContext {
            document: &mut document,
            images: &mut self.images,
        };
        self.content.define_page_styles(&mut ctx)?;
        self.content.build_header(&mut ctx)?;
        self.content.build_footer(&mut ctx)?;
        self.content.build_content(&mut ctx)?;

        self.document = Some(document);
        Ok(())
    }

    fn render_to_bytes(&mut self) -> Result<Vec<u8>> {
        self.generate()?;
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| Error::InvalidState("document not initialized".to_string()))?;
        Ok(render::render_pdf(document))
    }

    fn render_to_stream<W: Write>(&mut self, stream: &mut W) -> Result<()> {
        let bytes = self.render_to_bytes()?;
        stream.write_all(&bytes)?;
        Ok(())
    }

    fn release_temp_images(&mut self) {
        self.images.cleanup(self.document.as_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockContainer;

    struct Empty;

    impl ReportContent for Empty {
        fn define_page_styles(&mut self, _ctx: &mut BuildContext<'_>) -> Result<()> {
            Ok(())
        }

        fn build_header(&mut self, _ctx: &mut BuildContext<'_>) -> Result<()> {
            Ok(())
        }

        fn build_footer(&mut self, _ctx: &mut BuildContext<'_>) -> Result<()> {
            Ok(())
        }

        fn build_content(&mut self, ctx: &mut BuildContext<'_>) -> Result<()> {
            ctx.section().add_paragraph("hello");
            Ok(())
        }
    }

    #[test]
    fn empty_title_is_rejected() {
        assert!(matches!(
            ReportGenerator::new("", Empty),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            ReportGenerator::new("   \t", Empty),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn file_name_derives_from_title() {
        let generator = ReportGenerator::new("Invoice", Empty).unwrap();
        assert_eq!(generator.file_name(), "Invoice.pdf");
        assert_eq!(generator.title(), "Invoice");
    }

    #[test]
    fn export_produces_pdf_bytes() {
        let mut generator = ReportGenerator::new("Invoice", Empty).unwrap();
        let bytes = generator.export_bytes().unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn instances_get_distinct_identities() {
        let a = ReportGenerator::new("Same", Empty).unwrap();
        let b = ReportGenerator::new("Same", Empty).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn generator_is_reusable_across_passes() {
        let mut generator = ReportGenerator::new("Invoice", Empty).unwrap();
        let first = generator.export_bytes().unwrap();
        let second = generator.export_bytes().unwrap();
        assert_eq!(&first[0..5], b"%PDF-");
        assert_eq!(&second[0..5], b"%PDF-");
    }

    #[test]
    fn save_to_stream_writes_the_rendered_bytes() {
        let mut generator = ReportGenerator::new("Invoice", Empty).unwrap();
        let mut buffer = Vec::new();
        generator.save_to_stream(&mut buffer).unwrap();
        assert_eq!(&buffer[0..5], b"%PDF-");
    }
}
