//! Single-pass layout of a `CvData` onto A4 pages.
//!
//! `PdfDocumentReference` is not `Send`; callers on the async runtime must run
//! `render_cv_pdf` inside `tokio::task::spawn_blocking`.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};

use crate::cvs::cv_data::CvData;
use crate::render::font_metrics::{metrics_for, FontFace, MM_PER_PT};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const LINE_HEIGHT_FACTOR: f32 = 1.35;

const NAME_SIZE: f32 = 20.0;
const TITLE_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const META_SIZE: f32 = 9.0;

const BULLET_INDENT_MM: f32 = 4.0;
const SECTION_GAP_MM: f32 = 4.0;
const ENTRY_GAP_MM: f32 = 2.0;

const LAYER_NAME: &str = "Content";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Renders the CV into PDF bytes.
pub fn render_cv_pdf(cv: &CvData) -> Result<Vec<u8>, RenderError> {
    let title = if cv.full_name.trim().is_empty() {
        "Curriculum Vitae".to_string()
    } else {
        format!("{} - CV", cv.full_name.trim())
    };

    let mut writer = PageWriter::new(&title)?;

    writer.header(cv);

    if let Some(summary) = non_blank(&cv.summary) {
        writer.section("Summary");
        writer.paragraph(summary, FontFace::Regular, BODY_SIZE, 0.0);
    }

    if !cv.skills.is_empty() {
        writer.section("Skills");
        let skills = cv
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        writer.paragraph(&skills, FontFace::Regular, BODY_SIZE, 0.0);
    }

    if !cv.experiences.is_empty() {
        writer.section("Experience");
        for exp in &cv.experiences {
            writer.entry_header(
                &join_non_blank(&[exp.position.as_str(), exp.company.as_str()], ", "),
                &date_range(&exp.start_date, &exp.end_date),
            );
            for highlight in exp.highlights.iter().filter(|h| !h.trim().is_empty()) {
                writer.bullet(highlight);
            }
            writer.gap(ENTRY_GAP_MM);
        }
    }

    if !cv.education.is_empty() {
        writer.section("Education");
        for edu in &cv.education {
            writer.entry_header(
                &join_non_blank(&[edu.degree.as_str(), edu.institution.as_str()], ", "),
                &date_range(&edu.start_date, &edu.end_date),
            );
            if let Some(description) = non_blank(&edu.description) {
                writer.paragraph(description, FontFace::Regular, BODY_SIZE, 0.0);
            }
            writer.gap(ENTRY_GAP_MM);
        }
    }

    if !cv.projects.is_empty() {
        writer.section("Projects");
        for project in &cv.projects {
            writer.entry_header(&project.name, "");
            if let Some(description) = non_blank(&project.description) {
                writer.paragraph(description, FontFace::Regular, BODY_SIZE, 0.0);
            }
            if !project.technologies.is_empty() {
                let tech = format!("Technologies: {}", project.technologies.join(", "));
                writer.paragraph(&tech, FontFace::Regular, META_SIZE, 0.0);
            }
            writer.gap(ENTRY_GAP_MM);
        }
    }

    if !cv.activities.is_empty() {
        writer.section("Activities");
        for activity in &cv.activities {
            writer.entry_header(&activity.name, "");
            if let Some(description) = non_blank(&activity.description) {
                writer.paragraph(description, FontFace::Regular, BODY_SIZE, 0.0);
            }
            writer.gap(ENTRY_GAP_MM);
        }
    }

    if !cv.volunteering.is_empty() {
        writer.section("Volunteering");
        for vol in &cv.volunteering {
            let role = vol.role.as_deref().unwrap_or_default();
            writer.entry_header(
                &join_non_blank(&[role, vol.organization.as_str()], ", "),
                &date_range(&vol.start_date, &vol.end_date),
            );
            if let Some(description) = non_blank(&vol.description) {
                writer.paragraph(description, FontFace::Regular, BODY_SIZE, 0.0);
            }
            writer.gap(ENTRY_GAP_MM);
        }
    }

    writer.finish()
}

/// Owns the document and a top-down cursor on the current page.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance from the top edge of the page, in mm.
    cursor_mm: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor_mm: MARGIN_MM,
        })
    }

    fn header(&mut self, cv: &CvData) {
        self.paragraph(&cv.full_name, FontFace::Bold, NAME_SIZE, 0.0);

        if let Some(title) = non_blank(&cv.title) {
            self.set_color(0.25, 0.25, 0.25);
            self.paragraph(title, FontFace::Regular, TITLE_SIZE, 0.0);
            self.set_color(0.0, 0.0, 0.0);
        }

        let mut contact: Vec<String> = [&cv.contact.email, &cv.contact.phone, &cv.contact.location]
            .into_iter()
            .filter_map(|v| non_blank(v).map(str::to_string))
            .collect();
        contact.extend(
            cv.contact
                .links
                .iter()
                .filter(|l| !l.url.trim().is_empty())
                .map(|l| {
                    if l.label.trim().is_empty() {
                        l.url.trim().to_string()
                    } else {
                        format!("{}: {}", l.label.trim(), l.url.trim())
                    }
                }),
        );
        if !contact.is_empty() {
            self.paragraph(&contact.join(" | "), FontFace::Regular, META_SIZE, 0.0);
        }
    }

    fn section(&mut self, heading: &str) {
        self.gap(SECTION_GAP_MM);
        // Keep a heading together with at least one body line.
        self.ensure_space(line_height(HEADING_SIZE) + line_height(BODY_SIZE));
        self.set_color(0.12, 0.29, 0.55);
        self.line(&heading.to_uppercase(), FontFace::Bold, HEADING_SIZE, 0.0);
        self.set_color(0.0, 0.0, 0.0);
        self.gap(1.0);
    }

    /// Bold left label with an optional right-aligned date range.
    fn entry_header(&mut self, left: &str, right: &str) {
        let right_width = if right.is_empty() {
            0.0
        } else {
            metrics_for(FontFace::Regular).width_mm(right, META_SIZE) + 3.0
        };

        let lines = metrics_for(FontFace::Bold).wrap(left, BODY_SIZE, CONTENT_WIDTH_MM - right_width);
        self.ensure_space(line_height(BODY_SIZE));

        if !right.is_empty() {
            let x = PAGE_WIDTH_MM - MARGIN_MM - (right_width - 3.0);
            let y = self.baseline(BODY_SIZE);
            self.layer
                .use_text(right, META_SIZE, Mm(x), Mm(y), &self.regular);
        }

        if lines.is_empty() {
            self.cursor_mm += line_height(BODY_SIZE);
        }
        for line in lines {
            self.line(&line, FontFace::Bold, BODY_SIZE, 0.0);
        }
    }

    fn bullet(&mut self, text: &str) {
        let lines = metrics_for(FontFace::Regular).wrap(
            text,
            BODY_SIZE,
            CONTENT_WIDTH_MM - BULLET_INDENT_MM,
        );
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                self.ensure_space(line_height(BODY_SIZE));
                let y = self.baseline(BODY_SIZE);
                self.layer
                    .use_text("-", BODY_SIZE, Mm(MARGIN_MM + 1.0), Mm(y), &self.regular);
            }
            self.line(line, FontFace::Regular, BODY_SIZE, BULLET_INDENT_MM);
        }
    }

    fn paragraph(&mut self, text: &str, face: FontFace, size: f32, indent_mm: f32) {
        for line in metrics_for(face).wrap(text, size, CONTENT_WIDTH_MM - indent_mm) {
            self.line(&line, face, size, indent_mm);
        }
    }

    /// Writes one pre-wrapped line and advances the cursor.
    fn line(&mut self, text: &str, face: FontFace, size: f32, indent_mm: f32) {
        self.ensure_space(line_height(size));
        let y = self.baseline(size);
        let font = match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        };
        self.layer
            .use_text(text, size, Mm(MARGIN_MM + indent_mm), Mm(y), font);
        self.cursor_mm += line_height(size);
    }

    fn gap(&mut self, mm: f32) {
        self.cursor_mm += mm;
    }

    /// Starts a new page when `needed_mm` would cross the bottom margin.
    fn ensure_space(&mut self, needed_mm: f32) {
        if self.cursor_mm + needed_mm > PAGE_HEIGHT_MM - MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.cursor_mm = MARGIN_MM;
        }
    }

    /// PDF y coordinate (from the bottom edge) of the baseline for the next line.
    fn baseline(&self, size: f32) -> f32 {
        PAGE_HEIGHT_MM - self.cursor_mm - size * MM_PER_PT
    }

    fn set_color(&self, r: f32, g: f32, b: f32) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        Ok(self.doc.save_to_bytes()?)
    }
}

fn line_height(size: f32) -> f32 {
    size * MM_PER_PT * LINE_HEIGHT_FACTOR
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn join_non_blank(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// `start - end`, `start - Present`, `end`, or empty.
fn date_range(start: &Option<String>, end: &Option<String>) -> String {
    match (non_blank(start), non_blank(end)) {
        (Some(s), Some(e)) => format!("{s} - {e}"),
        (Some(s), None) => format!("{s} - Present"),
        (None, Some(e)) => e.to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cvs::cv_data::{CvContact, CvEducation, CvExperience, CvProject};

    fn sample_cv() -> CvData {
        CvData {
            full_name: "Ada Lovelace".to_string(),
            title: Some("Backend Engineer".to_string()),
            contact: CvContact {
                email: Some("ada@example.com".to_string()),
                location: Some("London".to_string()),
                ..Default::default()
            },
            summary: Some("Engineer who likes databases and correctness.".to_string()),
            skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            experiences: vec![CvExperience {
                company: "Engines Ltd".to_string(),
                position: "Engineer".to_string(),
                start_date: Some("2020".to_string()),
                end_date: None,
                highlights: vec!["Cut p99 latency by 40% by batching writes".to_string()],
            }],
            education: vec![CvEducation {
                institution: "UCL".to_string(),
                degree: "BSc Mathematics".to_string(),
                ..Default::default()
            }],
            projects: vec![CvProject {
                name: "Notes".to_string(),
                description: Some("Annotated translation tooling".to_string()),
                technologies: vec!["Rust".to_string()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let bytes = render_cv_pdf(&sample_cv()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_renders_empty_cv() {
        let bytes = render_cv_pdf(&CvData::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_cv_spills_onto_more_pages() {
        let short = render_cv_pdf(&sample_cv()).unwrap();

        let mut long = sample_cv();
        long.experiences = (0..40)
            .map(|i| CvExperience {
                company: format!("Company {i}"),
                position: "Engineer".to_string(),
                start_date: Some("2010".to_string()),
                end_date: Some("2011".to_string()),
                highlights: vec![
                    "Owned the ingestion pipeline end to end and reduced operational toil".to_string(),
                    "Migrated services to a shared PostgreSQL cluster without downtime".to_string(),
                ],
            })
            .collect();
        let long = render_cv_pdf(&long).unwrap();

        assert!(long.starts_with(b"%PDF"));
        assert!(long.len() > short.len());
    }

    #[test]
    fn test_date_range_variants() {
        let s = Some("2019".to_string());
        let e = Some("2021".to_string());
        assert_eq!(date_range(&s, &e), "2019 - 2021");
        assert_eq!(date_range(&s, &None), "2019 - Present");
        assert_eq!(date_range(&None, &e), "2021");
        assert_eq!(date_range(&None, &Some(" ".to_string())), "");
    }

    #[test]
    fn test_join_non_blank_skips_empty_parts() {
        assert_eq!(join_non_blank(&["Engineer", " ", "Engines Ltd"], ", "), "Engineer, Engines Ltd");
        assert_eq!(join_non_blank(&["", ""], ", "), "");
    }
}
