//! PDF conversation transcript generation.
//!
//! Renders an ordered set of (question, answer) pairs as a single-column,
//! word-wrapped, paginated letter-size PDF. This is deliberately "good
//! enough" text output, not a layout engine: wrapping uses an approximate
//! Helvetica character width rather than real font metrics.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use barrister_core::error::ReportError;
use barrister_core::model::ModelResponse;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Pt};
use tracing::info;

/// Fixed file name of the generated transcript, overwritten on each call.
pub const REPORT_FILE_NAME: &str = "AI_Lawyer_Report.pdf";

// Letter page, measured in points.
const PAGE_WIDTH_PT: f32 = 612.0;
const PAGE_HEIGHT_PT: f32 = 792.0;
const LEFT_MARGIN_PT: f32 = 100.0;
const TITLE_Y_PT: f32 = 750.0;
const SUBTITLE_Y_PT: f32 = 730.0;
const BODY_START_Y_PT: f32 = 700.0;
const BOTTOM_MARGIN_PT: f32 = 50.0;
const LINE_HEIGHT_PT: f32 = 15.0;
const WRAP_WIDTH_PT: f32 = 450.0;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;
const PAIR_GAP_PT: f32 = 20.0;

// Approximate Helvetica advance width: ~0.5 em per character.
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

/// Renders conversation transcripts to a fixed-name PDF file.
///
/// The output directory is configurable so concurrent callers (and tests)
/// can use distinct paths; the file name itself is fixed.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ReportWriter {
    /// Create a writer that places the report in `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// The path the report is written to.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE_NAME)
    }

    /// Render the transcript and return the output path.
    ///
    /// `questions` and `answers` must have equal length; answers may be
    /// plain strings or structured responses (both read via
    /// [`ModelResponse::text`]).
    pub fn generate(
        &self,
        questions: &[String],
        answers: &[ModelResponse],
    ) -> Result<PathBuf, ReportError> {
        if questions.len() != answers.len() {
            return Err(ReportError::LengthMismatch {
                questions: questions.len(),
                answers: answers.len(),
            });
        }

        let (doc, page, layer) = PdfDocument::new(
            "AI Lawyer Report",
            Mm::from(Pt(PAGE_WIDTH_PT)),
            Mm::from(Pt(PAGE_HEIGHT_PT)),
            "text",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Render(e.to_string()))?;

        let mut layer_ref = doc.get_page(page).get_layer(layer);

        draw_line(&layer_ref, "AI Lawyer Report", &bold, TITLE_SIZE, TITLE_Y_PT);
        draw_line(
            &layer_ref,
            "Below is a record of your conversation with AI Lawyer.",
            &regular,
            BODY_SIZE,
            SUBTITLE_Y_PT,
        );

        let wrap_chars = chars_per_line(BODY_SIZE);
        let mut y = BODY_START_Y_PT;

        for (question, answer) in questions.iter().zip(answers.iter()) {
            let q_lines = wrap_text(&format!("Q: {question}"), wrap_chars);
            let a_lines = wrap_text(&format!("A: {}", answer.text()), wrap_chars);

            for line in &q_lines {
                place_line(&doc, &mut layer_ref, &mut y, line, &bold);
            }
            for line in &a_lines {
                place_line(&doc, &mut layer_ref, &mut y, line, &regular);
            }

            y -= PAIR_GAP_PT;
        }

        let path = self.report_path();
        let file = File::create(&path).map_err(|e| ReportError::Io(e.to_string()))?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| ReportError::Render(e.to_string()))?;

        info!(path = %path.display(), pairs = questions.len(), "Report written");
        Ok(path)
    }
}

/// Draw one body line at the cursor, breaking to a fresh page first when the
/// cursor has dropped below the bottom margin.
fn place_line(
    doc: &printpdf::PdfDocumentReference,
    layer_ref: &mut PdfLayerReference,
    y: &mut f32,
    line: &str,
    font: &IndirectFontRef,
) {
    if *y < BOTTOM_MARGIN_PT {
        let (page, layer) =
            doc.add_page(Mm::from(Pt(PAGE_WIDTH_PT)), Mm::from(Pt(PAGE_HEIGHT_PT)), "text");
        *layer_ref = doc.get_page(page).get_layer(layer);
        *y = TITLE_Y_PT;
    }
    draw_line(layer_ref, line, font, BODY_SIZE, *y);
    *y -= LINE_HEIGHT_PT;
}

fn draw_line(layer: &PdfLayerReference, text: &str, font: &IndirectFontRef, size: f32, y_pt: f32) {
    layer.use_text(text, size, Mm::from(Pt(LEFT_MARGIN_PT)), Mm::from(Pt(y_pt)), font);
}

/// How many approximate characters fit in the wrap column at `size`.
fn chars_per_line(size: f32) -> usize {
    (WRAP_WIDTH_PT / (size * AVG_CHAR_WIDTH_EM)).floor() as usize
}

/// Greedy word wrap to at most `max_chars` characters per line. Explicit
/// newlines are honored; words longer than a line are hard-split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for raw_line in text.split('\n') {
        let mut current = String::new();
        let mut current_chars = 0;

        for word in raw_line.split_whitespace() {
            let word_chars = word.chars().count();

            if word_chars > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_chars = 0;
                }
                let mut chunk = String::new();
                for (i, c) in word.chars().enumerate() {
                    if i > 0 && i % max_chars == 0 {
                        lines.push(std::mem::take(&mut chunk));
                    }
                    chunk.push(c);
                }
                current = chunk;
                current_chars = current.chars().count();
                continue;
            }

            let needed = if current.is_empty() {
                word_chars
            } else {
                current_chars + 1 + word_chars
            };

            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
                current_chars = word_chars;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                    current_chars += 1;
                }
                current.push_str(word);
                current_chars += word_chars;
            }
        }

        lines.push(current);
    }

    lines
}
