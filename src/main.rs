// ficha-pdf: Generate tailoring measurement sheets (fichas técnicas) for atelier clients

use chrono::{Datelike, Local, Locale, NaiveDate};
use clap::Parser;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// A4 dimensions in mm
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Margins
const MARGIN_MM: f32 = 18.0;

/// Vertical space kept clear above the bottom edge; crossing into it
/// triggers a page break
const BOTTOM_GUARD_MM: f32 = 20.0;

/// Cursor position at the top of every continuation page
const TOP_RESET_MM: f32 = 20.0;

/// Header band and its accent strip
const HEADER_BAND_MM: f32 = 36.0;
const ACCENT_STRIP_MM: f32 = 2.5;

/// Footer baseline, measured from the bottom edge
const FOOTER_OFFSET_MM: f32 = 12.0;

/// Section title bar
const SECTION_BAR_MM: f32 = 8.0;
const SECTION_GAP_MM: f32 = 4.0;

/// Measurement table geometry
const LABEL_COL_MM: f32 = 55.0;
const VALUE_COL_MM: f32 = 25.0;
const TABLE_HEAD_ROW_MM: f32 = 10.0;
const TABLE_ROW_MM: f32 = 9.0;
const TABLE_GAP_MM: f32 = 8.0;
const CELL_PAD_MM: f32 = 4.0;

/// Client info block
const FIELD_ROW_MM: f32 = 6.0;

/// Summary strip
const SUMMARY_STRIP_MM: f32 = 16.0;

/// Technical notes box
const NOTES_LINE_MM: f32 = 4.5;
const NOTES_MAX_LINES: usize = 8;
const NOTES_BOX_MIN_MM: f32 = 20.0;
const NOTES_BOX_MAX_MM: f32 = 50.0;

/// Font sizes in points
const TITLE_FONT_SIZE: f32 = 18.0;
const SUBTITLE_FONT_SIZE: f32 = 10.0;
const STAMP_FONT_SIZE: f32 = 8.5;
const CLIENT_TITLE_FONT_SIZE: f32 = 12.0;
const FIELD_FONT_SIZE: f32 = 9.5;
const SECTION_FONT_SIZE: f32 = 10.0;
const TABLE_FONT_SIZE: f32 = 9.0;
const SUMMARY_FONT_SIZE: f32 = 8.0;
const NOTES_FONT_SIZE: f32 = 9.0;
const FOOTER_FONT_SIZE: f32 = 7.5;

/// Builtin Helvetica carries no glyph metrics in printpdf, so text widths
/// are estimated with an average glyph width of half the font size
const CHAR_WIDTH_FACTOR: f32 = 0.5;
const PT_TO_MM: f32 = 0.352_778;

/// Distinct measurement fields across the four groups (14 + 6 + 6 + 8)
const TOTAL_MEASURE_FIELDS: usize = 34;

/// Rendered in place of an absent measurement or contact field
const PLACEHOLDER: &str = "—";

/// Studio name used when no branding record is supplied
const DEFAULT_STUDIO_NAME: &str = "Atelier Elizabeth";

// ============================================================================
// Color Palette
// ============================================================================

const OLIVE: [u8; 3] = [138, 125, 60];
const GOLD: [u8; 3] = [201, 122, 30];
const BLUE: [u8; 3] = [59, 130, 246];
const GREEN: [u8; 3] = [34, 150, 80];
const DARK: [u8; 3] = [31, 41, 55];
const GRAY: [u8; 3] = [107, 114, 128];
const LIGHT: [u8; 3] = [219, 210, 176];
const CREAM: [u8; 3] = [247, 246, 240];
const WHITE: [u8; 3] = [255, 255, 255];
const GRID: [u8; 3] = [229, 231, 235];

/// Per-section alternating row backgrounds
const ALT_OLIVE: [u8; 3] = [247, 246, 240];
const ALT_BLUE: [u8; 3] = [239, 246, 255];
const ALT_GREEN: [u8; 3] = [240, 253, 244];
const ALT_GOLD: [u8; 3] = [253, 248, 240];

fn color(c: [u8; 3]) -> Color {
    Color::Rgb(Rgb::new(
        c[0] as f32 / 255.0,
        c[1] as f32 / 255.0,
        c[2] as f32 / 255.0,
        None,
    ))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to read record file: {0}")]
    RecordError(String),
    #[error("Invalid date format: {0}")]
    DateError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate tailoring measurement sheets (fichas técnicas) as PDF")]
struct Args {
    /// Client record (JSON file)
    #[arg(short, long)]
    client: PathBuf,

    /// Measurement record (JSON file)
    #[arg(short, long)]
    measure: PathBuf,

    /// Studio branding (JSON file, optional)
    #[arg(short, long)]
    studio: Option<PathBuf>,

    /// Issue date (YYYY-MM-DD format, defaults to today)
    #[arg(short, long)]
    date: Option<String>,

    /// Output filename (defaults to ficha-<cliente>-<DDMMYYYY>.pdf)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Gender {
    Femenino,
    Masculino,
    Otro,
}

impl Gender {
    fn label(self) -> &'static str {
        match self {
            Gender::Femenino => "Femenino",
            Gender::Masculino => "Masculino",
            Gender::Otro => "Otro",
        }
    }
}

/// Client record from JSON file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClientRecord {
    name: Option<String>,
    gender: Option<Gender>,
    phone: Option<String>,
    email: Option<String>,
}

/// Measurement record from JSON file
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MeasurementRecord {
    label: Option<String>,
    fit_type: Option<String>,
    fabric_type: Option<String>,
    suggested_size: Option<String>,
    technical_notes: Option<String>,
    upper: UpperMeasures,
    arms: ArmMeasures,
    pants: PantsMeasures,
    lower: LowerMeasures,
}

/// Studio branding record, all fields optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StudioRecord {
    name: Option<String>,
    phone: Option<String>,
    website: Option<String>,
}

// ============================================================================
// Measurement Catalog
// ============================================================================

/// Front-body measurements (14 fields), values in cm
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct UpperMeasures {
    contorno_cuello: Option<f32>,
    contorno_sobre_busto: Option<f32>,
    contorno_busto: Option<f32>,
    contorno_bajo_busto: Option<f32>,
    contorno_cintura: Option<f32>,
    contorno_cadera: Option<f32>,
    hombros: Option<f32>,
    ancho_hombro: Option<f32>,
    caida_hombro: Option<f32>,
    ancho_busto: Option<f32>,
    altura_busto: Option<f32>,
    // the client app has always sent this key misspelled; keep the wire format
    #[serde(rename = "alturaCapdera")]
    altura_cadera: Option<f32>,
    largo_talle: Option<f32>,
    largo_talle_centro: Option<f32>,
}

impl UpperMeasures {
    fn rows(&self) -> Vec<(&'static str, Option<f32>)> {
        vec![
            ("Contorno de cuello", self.contorno_cuello),
            ("Contorno sobre busto", self.contorno_sobre_busto),
            ("Contorno de busto", self.contorno_busto),
            ("Contorno bajo busto", self.contorno_bajo_busto),
            ("Contorno de cintura", self.contorno_cintura),
            ("Contorno de cadera", self.contorno_cadera),
            ("Hombros", self.hombros),
            ("Ancho de hombro", self.ancho_hombro),
            ("Caída de hombro", self.caida_hombro),
            ("Ancho de busto", self.ancho_busto),
            ("Altura de busto", self.altura_busto),
            ("Altura de cadera", self.altura_cadera),
            ("Largo de talle", self.largo_talle),
            ("Largo de talle centro", self.largo_talle_centro),
        ]
    }
}

/// Arm measurements (6 fields)
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ArmMeasures {
    largo_brazo: Option<f32>,
    contorno_biceps: Option<f32>,
    bajo_el_brazo: Option<f32>,
    contorno_codo: Option<f32>,
    contorno_muneca: Option<f32>,
    contorno_puno: Option<f32>,
}

impl ArmMeasures {
    fn rows(&self) -> Vec<(&'static str, Option<f32>)> {
        vec![
            ("Largo de brazo", self.largo_brazo),
            ("Contorno de bíceps", self.contorno_biceps),
            ("Bajo el brazo", self.bajo_el_brazo),
            ("Contorno de codo", self.contorno_codo),
            ("Contorno de muñeca", self.contorno_muneca),
            ("Contorno de puño", self.contorno_puno),
        ]
    }
}

/// Trouser / skirt measurements (6 fields)
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PantsMeasures {
    contorno_cintura: Option<f32>,
    altura_cadera: Option<f32>,
    contorno_cadera: Option<f32>,
    altura_asiento: Option<f32>,
    largo_pantalon: Option<f32>,
    largo_falda: Option<f32>,
}

impl PantsMeasures {
    fn rows(&self) -> Vec<(&'static str, Option<f32>)> {
        vec![
            ("Contorno de cintura", self.contorno_cintura),
            ("Altura de cadera", self.altura_cadera),
            ("Contorno de cadera", self.contorno_cadera),
            ("Altura de asiento", self.altura_asiento),
            ("Largo de pantalón", self.largo_pantalon),
            ("Largo de falda", self.largo_falda),
        ]
    }
}

/// Back-body measurements (8 fields)
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LowerMeasures {
    largo_talle_trasero: Option<f32>,
    ancho_hombros_trasero: Option<f32>,
    largo_centro_trasero: Option<f32>,
    reboque_cuello_trasero: Option<f32>,
    largo_caida_trasero: Option<f32>,
    ancho_torax_trasero: Option<f32>,
    ancho_omoplatos_trasero: Option<f32>,
    ancho_cintura_trasero: Option<f32>,
}

impl LowerMeasures {
    fn rows(&self) -> Vec<(&'static str, Option<f32>)> {
        vec![
            ("Largo talle trasero", self.largo_talle_trasero),
            ("Ancho hombros trasero", self.ancho_hombros_trasero),
            ("Largo centro trasero", self.largo_centro_trasero),
            ("Reboque de cuello", self.reboque_cuello_trasero),
            ("Largo caída trasero", self.largo_caida_trasero),
            ("Ancho tórax trasero", self.ancho_torax_trasero),
            ("Ancho omóplatos trasero", self.ancho_omoplatos_trasero),
            ("Ancho cintura trasero", self.ancho_cintura_trasero),
        ]
    }
}

/// Visual identity of one measurement section
struct SectionStyle {
    accent: [u8; 3],
    alt_row: [u8; 3],
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    let issued = parse_date(&args.date)?;

    let client: ClientRecord = load_record(&args.client)?;
    let measure: MeasurementRecord = load_record(&args.measure)?;
    let studio: StudioRecord = match &args.studio {
        Some(path) => load_record(path)?,
        None => StudioRecord::default(),
    };

    let output_file = args
        .output
        .unwrap_or_else(|| default_filename(client.name.as_deref(), &issued));

    generate_pdf(&client, &measure, &studio, issued, &output_file)?;

    println!("✓ Generated: {}", output_file);
    println!("  Cliente: {}", client.name.as_deref().unwrap_or(PLACEHOLDER));
    println!("  Emitida: {}", format_issue_date(&issued));

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_date(date_str: &Option<String>) -> Result<NaiveDate, AppError> {
    match date_str {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AppError::DateError(s.clone())),
        None => Ok(Local::now().date_naive()),
    }
}

fn load_record<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::RecordError(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::RecordError(format!("{}: invalid JSON: {}", path.display(), e)))
}

/// Long-form Spanish issue stamp, e.g. "7 de agosto de 2026"
fn format_issue_date(date: &NaiveDate) -> String {
    date.format_localized("%-d de %B de %Y", Locale::es_ES).to_string()
}

/// Lowercase the client name and collapse whitespace runs into single
/// hyphens. Accented characters stay as-is.
fn slugify(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

fn default_filename(client_name: Option<&str>, issued: &NaiveDate) -> String {
    let slug = client_name
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "cliente".to_string());
    format!("ficha-{}-{}.pdf", slug, issued.format("%d%m%Y"))
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Join the studio contact fields that are present, e.g. "612 345 678 · atelier.es"
fn contact_line(studio: &StudioRecord) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(phone) = &studio.phone {
        parts.push(phone.as_str());
    }
    if let Some(website) = &studio.website {
        parts.push(strip_scheme(website));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

fn format_measure(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{} cm", v),
        None => PLACEHOLDER.to_string(),
    }
}

fn format_rows(rows: &[(&'static str, Option<f32>)]) -> Vec<(String, String)> {
    rows.iter()
        .map(|(label, value)| (label.to_string(), format_measure(*value)))
        .collect()
}

fn count_present(rows: &[(&'static str, Option<f32>)]) -> usize {
    rows.iter().filter(|(_, value)| value.is_some()).count()
}

fn display_or_placeholder(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Summary strip items; the total count always leads, the rest appear only
/// when the record supplies them
fn summary_items(measure: &MeasurementRecord, total_present: usize) -> Vec<String> {
    let mut items = vec![format!(
        "Total medidas: {} / {}",
        total_present, TOTAL_MEASURE_FIELDS
    )];
    if let Some(fit) = &measure.fit_type {
        items.push(format!("Ajuste: {}", fit));
    }
    if let Some(size) = &measure.suggested_size {
        items.push(format!("Talla: {}", size));
    }
    if let Some(fabric) = &measure.fabric_type {
        items.push(format!("Tela: {}", fabric));
    }
    items
}

// ============================================================================
// Layout Arithmetic
// ============================================================================

/// Estimated width of `text` in mm when set in builtin Helvetica
fn text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * font_size_pt * CHAR_WIDTH_FACTOR * PT_TO_MM
}

/// True when `needed_mm` of content no longer fits above the bottom guard
fn page_break_needed(cursor_mm: f32, needed_mm: f32) -> bool {
    cursor_mm > PAGE_HEIGHT_MM - needed_mm - BOTTOM_GUARD_MM
}

/// Notes box height, bounded regardless of text length
fn notes_box_height(line_count: usize) -> f32 {
    (line_count as f32 * NOTES_LINE_MM + 10.0).clamp(NOTES_BOX_MIN_MM, NOTES_BOX_MAX_MM)
}

/// Greedy word wrap against the estimated Helvetica width. Words wider than
/// a full line are hard-split; blank input lines are preserved.
fn wrap_text(text: &str, max_width_mm: f32, font_size_pt: f32) -> Vec<String> {
    let glyph_mm = font_size_pt * CHAR_WIDTH_FACTOR * PT_TO_MM;
    let max_chars = ((max_width_mm / glyph_mm) as usize).max(1);

    let mut lines = Vec::new();
    for raw in text.lines() {
        if raw.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let mut word = word;
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let head: String = word.chars().take(max_chars).collect();
                word = &word[head.len()..];
                lines.push(head);
            }
            if word.is_empty() {
                continue;
            }
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Pack a flat ordered list of (label, value) pairs into rows of two pairs
/// each (four visual columns). An odd tail leaves the second pair blank.
fn to_double_rows(rows: &[(String, String)]) -> Vec<[String; 4]> {
    rows.chunks(2)
        .map(|pair| {
            let (left_label, left_value) = pair[0].clone();
            let (right_label, right_value) = pair.get(1).cloned().unwrap_or_default();
            [left_label, left_value, right_label, right_value]
        })
        .collect()
}

// ============================================================================
// PDF Generation
// ============================================================================

/// Measurement table x coordinates: label, value, label, value columns
const TABLE_COLS: [f32; 5] = [
    MARGIN_MM,
    MARGIN_MM + LABEL_COL_MM,
    MARGIN_MM + LABEL_COL_MM + VALUE_COL_MM,
    MARGIN_MM + LABEL_COL_MM + VALUE_COL_MM + LABEL_COL_MM,
    MARGIN_MM + 2.0 * (LABEL_COL_MM + VALUE_COL_MM),
];

/// printpdf's origin is the bottom-left corner; the sheet cursor runs
/// top-down like the layout arithmetic
fn y_from_top(cursor_mm: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - cursor_mm)
}

/// Layout context for one render call: document handles, fonts, cursor and
/// page counter. Constructed per invocation, never shared.
struct SheetWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    font_regular: IndirectFontRef,
    font_bold: IndirectFontRef,
    studio: &'a StudioRecord,
    issued: NaiveDate,
    cursor: f32,
    page_num: u32,
}

fn generate_pdf(
    client: &ClientRecord,
    measure: &MeasurementRecord,
    studio: &StudioRecord,
    issued: NaiveDate,
    output_path: &str,
) -> Result<(), AppError> {
    let (doc, page1, layer1) = PdfDocument::new(
        "Ficha Técnica de Medidas",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let font_regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::PdfError(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    let mut sheet = SheetWriter {
        doc: &doc,
        layer: doc.get_page(page1).get_layer(layer1),
        font_regular,
        font_bold,
        studio,
        issued,
        cursor: 0.0,
        page_num: 1,
    };

    sheet.draw_header();
    sheet.draw_client_info(client, measure);

    let sections: [(&str, SectionStyle, Vec<(&'static str, Option<f32>)>); 4] = [
        (
            "Medidas Delanteras (14)",
            SectionStyle { accent: OLIVE, alt_row: ALT_OLIVE },
            measure.upper.rows(),
        ),
        (
            "Medidas de Brazo (6)",
            SectionStyle { accent: BLUE, alt_row: ALT_BLUE },
            measure.arms.rows(),
        ),
        (
            "Medidas de Pantalón / Falda (6)",
            SectionStyle { accent: GREEN, alt_row: ALT_GREEN },
            measure.pants.rows(),
        ),
        (
            "Medidas Traseras (8)",
            SectionStyle { accent: GOLD, alt_row: ALT_GOLD },
            measure.lower.rows(),
        ),
    ];

    let total_present: usize = sections
        .iter()
        .map(|(_, _, rows)| count_present(rows))
        .sum();

    for (index, (title, style, rows)) in sections.iter().enumerate() {
        sheet.draw_section_header(index as u32 + 1, title, style.accent);
        sheet.draw_measure_table(&format_rows(rows), style);
    }

    sheet.draw_summary(&summary_items(measure, total_present));

    if let Some(notes) = measure.technical_notes.as_deref().filter(|n| !n.trim().is_empty()) {
        sheet.draw_notes(notes);
    }

    // earlier pages got their footers flushed at each page break
    sheet.draw_footer();

    log::info!("saving {} ({} pages)", output_path, sheet.page_num);

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    Ok(())
}

impl<'a> SheetWriter<'a> {
    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    /// Break to a new page when fewer than `needed` mm remain above the
    /// bottom guard. Called by every stage before drawing a block of known
    /// height.
    fn ensure_space(&mut self, needed: f32) {
        if page_break_needed(self.cursor, needed) {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        self.draw_footer();
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_num += 1;
        self.cursor = TOP_RESET_MM;
        log::debug!("page break, starting page {}", self.page_num);
    }

    // ------------------------------------------------------------------
    // Header & Client Info
    // ------------------------------------------------------------------

    fn draw_header(&mut self) {
        let studio_name = self.studio.name.as_deref().unwrap_or(DEFAULT_STUDIO_NAME);

        self.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, HEADER_BAND_MM, OLIVE, None);

        self.set_text_color(WHITE);
        self.text(studio_name, TITLE_FONT_SIZE, MARGIN_MM, 14.0, true);
        self.text("Ficha Técnica de Medidas", SUBTITLE_FONT_SIZE, MARGIN_MM, 21.0, false);
        self.text_right(
            &format!("Emitida el {}", format_issue_date(&self.issued)),
            STAMP_FONT_SIZE,
            PAGE_WIDTH_MM - MARGIN_MM,
            21.0,
            false,
        );

        self.fill_rect(0.0, HEADER_BAND_MM, PAGE_WIDTH_MM, ACCENT_STRIP_MM, GOLD, None);

        self.cursor = 50.0;
    }

    fn draw_client_info(&mut self, client: &ClientRecord, measure: &MeasurementRecord) {
        self.set_text_color(DARK);
        self.text("Datos del Cliente", CLIENT_TITLE_FONT_SIZE, MARGIN_MM, self.cursor, true);

        self.cursor += 2.0;
        self.set_line_style(GOLD, 0.6);
        self.hline(MARGIN_MM, MARGIN_MM + 40.0, self.cursor);
        self.cursor += 6.0;

        let mut left: Vec<(&str, String)> =
            vec![("Nombre:", display_or_placeholder(&client.name))];
        if let Some(gender) = client.gender {
            left.push(("Género:", gender.label().to_string()));
        }
        left.push(("Teléfono:", display_or_placeholder(&client.phone)));
        left.push(("Email:", display_or_placeholder(&client.email)));

        let mut right: Vec<(&str, String)> = Vec::new();
        if let Some(label) = &measure.label {
            right.push(("Sesión:", label.clone()));
        }
        if let Some(fit) = &measure.fit_type {
            right.push(("Ajuste:", fit.clone()));
        }
        if let Some(fabric) = &measure.fabric_type {
            right.push(("Tela:", fabric.clone()));
        }
        if let Some(size) = &measure.suggested_size {
            right.push(("Talla sugerida:", size.clone()));
        }

        let col_left = MARGIN_MM;
        let col_left_value = MARGIN_MM + 28.0;
        let col_right = PAGE_WIDTH_MM / 2.0 + 5.0;
        let col_right_value = col_right + 32.0;

        let max_rows = left.len().max(right.len());
        for i in 0..max_rows {
            if let Some((label, value)) = left.get(i) {
                self.draw_field(label, value, col_left, col_left_value);
            }
            if let Some((label, value)) = right.get(i) {
                self.draw_field(label, value, col_right, col_right_value);
            }
            self.cursor += FIELD_ROW_MM;
        }

        self.cursor += 6.0;
    }

    fn draw_field(&self, label: &str, value: &str, label_x: f32, value_x: f32) {
        self.set_text_color(DARK);
        self.text(label, FIELD_FONT_SIZE, label_x, self.cursor, true);
        self.set_text_color(GRAY);
        self.text(value, FIELD_FONT_SIZE, value_x, self.cursor, false);
    }

    // ------------------------------------------------------------------
    // Measurement Sections
    // ------------------------------------------------------------------

    /// Accent-colored bar with section number and title
    fn draw_section_header(&mut self, number: u32, title: &str, accent: [u8; 3]) {
        self.ensure_space(30.0);

        self.fill_rect(
            MARGIN_MM,
            self.cursor,
            PAGE_WIDTH_MM - 2.0 * MARGIN_MM,
            SECTION_BAR_MM,
            accent,
            None,
        );

        self.set_text_color(WHITE);
        self.text(
            &format!("{}. {}", number, title),
            SECTION_FONT_SIZE,
            MARGIN_MM + 4.0,
            self.cursor + 5.8,
            true,
        );

        self.cursor += SECTION_BAR_MM + SECTION_GAP_MM;
    }

    /// Shared table routine for all four sections. The head is kept together
    /// with the first body row and redrawn after an in-table page break; the
    /// cursor ends at the actual rendered bottom plus a fixed gap.
    fn draw_measure_table(&mut self, rows: &[(String, String)], style: &SectionStyle) {
        let double = to_double_rows(rows);

        self.ensure_space(TABLE_HEAD_ROW_MM + TABLE_ROW_MM);
        self.draw_table_head(style);

        for (index, row) in double.iter().enumerate() {
            if page_break_needed(self.cursor, TABLE_ROW_MM) {
                self.break_page();
                self.draw_table_head(style);
            }
            self.draw_table_row(row, index % 2 == 1, style);
        }

        self.cursor += TABLE_GAP_MM;
    }

    fn draw_table_head(&mut self, style: &SectionStyle) {
        let width = TABLE_COLS[4] - TABLE_COLS[0];
        self.fill_rect(TABLE_COLS[0], self.cursor, width, TABLE_HEAD_ROW_MM, style.accent, None);

        self.set_text_color(WHITE);
        let baseline = self.cursor + TABLE_HEAD_ROW_MM / 2.0 + 1.5;
        for (i, header) in ["Medida", "Valor", "Medida", "Valor"].iter().enumerate() {
            self.text(header, TABLE_FONT_SIZE, TABLE_COLS[i] + CELL_PAD_MM, baseline, true);
        }

        self.set_line_style(GRID, 0.25);
        self.hline(TABLE_COLS[0], TABLE_COLS[4], self.cursor);
        self.rule_row(self.cursor, TABLE_HEAD_ROW_MM);

        self.cursor += TABLE_HEAD_ROW_MM;
    }

    fn draw_table_row(&mut self, row: &[String; 4], alternate: bool, style: &SectionStyle) {
        let width = TABLE_COLS[4] - TABLE_COLS[0];
        if alternate {
            self.fill_rect(TABLE_COLS[0], self.cursor, width, TABLE_ROW_MM, style.alt_row, None);
        }

        let baseline = self.cursor + TABLE_ROW_MM / 2.0 + 1.5;
        self.set_text_color(DARK);
        for pair in 0..2 {
            let label = &row[pair * 2];
            let value = &row[pair * 2 + 1];
            if !label.is_empty() {
                self.text(label, TABLE_FONT_SIZE, TABLE_COLS[pair * 2] + CELL_PAD_MM, baseline, false);
            }
            if !value.is_empty() {
                // value cells are centered and bold
                let center = TABLE_COLS[pair * 2 + 1] + VALUE_COL_MM / 2.0;
                self.text_centered(value, TABLE_FONT_SIZE, center, baseline, true);
            }
        }

        self.set_line_style(GRID, 0.25);
        self.rule_row(self.cursor, TABLE_ROW_MM);

        self.cursor += TABLE_ROW_MM;
    }

    /// Cell grid for one row: verticals at every column edge plus the bottom rule
    fn rule_row(&self, top: f32, height: f32) {
        for x in TABLE_COLS {
            self.vline(x, top, top + height);
        }
        self.hline(TABLE_COLS[0], TABLE_COLS[4], top + height);
    }

    // ------------------------------------------------------------------
    // Summary & Notes
    // ------------------------------------------------------------------

    /// Highlighted strip with the present-measure count and optional fit,
    /// size and fabric items, spread evenly across the width
    fn draw_summary(&mut self, items: &[String]) {
        self.ensure_space(25.0);

        let width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        self.set_line_style(LIGHT, 0.4);
        self.fill_rect(MARGIN_MM, self.cursor, width, SUMMARY_STRIP_MM, CREAM, Some(LIGHT));

        self.set_text_color(OLIVE);
        let gap = width / (items.len() + 1) as f32;
        for (i, item) in items.iter().enumerate() {
            self.text_centered(
                item,
                SUMMARY_FONT_SIZE,
                MARGIN_MM + gap * (i + 1) as f32,
                self.cursor + 10.0,
                true,
            );
        }

        self.cursor += 24.0;
    }

    /// Free-text notes in a bounded box; at most eight wrapped lines are
    /// shown, the rest is dropped
    fn draw_notes(&mut self, notes: &str) {
        self.ensure_space(45.0);

        self.set_text_color(DARK);
        self.text("Notas Técnicas", SUBTITLE_FONT_SIZE, MARGIN_MM, self.cursor, true);
        self.cursor += 5.0;

        let width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        let lines = wrap_text(notes, width - 10.0, NOTES_FONT_SIZE);
        let box_height = notes_box_height(lines.len());

        self.set_line_style(LIGHT, 0.4);
        self.fill_rect(MARGIN_MM, self.cursor, width, box_height, CREAM, Some(LIGHT));

        self.set_text_color(GRAY);
        for (i, line) in lines.iter().take(NOTES_MAX_LINES).enumerate() {
            self.text(
                line,
                NOTES_FONT_SIZE,
                MARGIN_MM + 5.0,
                self.cursor + 7.0 + i as f32 * NOTES_LINE_MM,
                false,
            );
        }

        self.cursor += box_height + 8.0;
    }

    // ------------------------------------------------------------------
    // Footer
    // ------------------------------------------------------------------

    /// Per-page footer: copyright line, optional studio contact, page number
    fn draw_footer(&self) {
        let footer_y = PAGE_HEIGHT_MM - FOOTER_OFFSET_MM;

        self.set_line_style(LIGHT, 0.4);
        self.hline(MARGIN_MM, PAGE_WIDTH_MM - MARGIN_MM, footer_y - 4.0);

        self.set_text_color(GRAY);
        let studio_name = self.studio.name.as_deref().unwrap_or(DEFAULT_STUDIO_NAME);
        self.text(
            &format!(
                "{} © {} — Ficha técnica confidencial",
                studio_name,
                self.issued.year()
            ),
            FOOTER_FONT_SIZE,
            MARGIN_MM,
            footer_y,
            false,
        );

        if let Some(contact) = contact_line(self.studio) {
            self.text_centered(&contact, FOOTER_FONT_SIZE, PAGE_WIDTH_MM / 2.0, footer_y, false);
        }

        self.text_right(
            &format!("Página {}", self.page_num),
            FOOTER_FONT_SIZE,
            PAGE_WIDTH_MM - MARGIN_MM,
            footer_y,
            false,
        );
    }

    // ------------------------------------------------------------------
    // Drawing Utilities
    // ------------------------------------------------------------------

    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.font_bold
        } else {
            &self.font_regular
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, cursor_y: f32, bold: bool) {
        self.layer
            .use_text(text, size, Mm(x), y_from_top(cursor_y), self.font(bold));
    }

    fn text_centered(&self, text: &str, size: f32, center_x: f32, cursor_y: f32, bold: bool) {
        let x = center_x - text_width_mm(text, size) / 2.0;
        self.text(text, size, x, cursor_y, bold);
    }

    fn text_right(&self, text: &str, size: f32, right_x: f32, cursor_y: f32, bold: bool) {
        let x = right_x - text_width_mm(text, size);
        self.text(text, size, x, cursor_y, bold);
    }

    /// Text glyphs are filled, so the fill color doubles as the text color
    fn set_text_color(&self, c: [u8; 3]) {
        self.layer.set_fill_color(color(c));
    }

    fn set_line_style(&self, c: [u8; 3], thickness: f32) {
        self.layer.set_outline_color(color(c));
        self.layer.set_outline_thickness(thickness);
    }

    /// Axis-aligned rectangle with `top` measured from the top edge;
    /// stroked as well when a border color is given
    fn fill_rect(&self, x: f32, top: f32, w: f32, h: f32, fill: [u8; 3], border: Option<[u8; 3]>) {
        let bottom = PAGE_HEIGHT_MM - top - h;
        let points = vec![
            (Point::new(Mm(x), Mm(bottom)), false),
            (Point::new(Mm(x + w), Mm(bottom)), false),
            (Point::new(Mm(x + w), Mm(bottom + h)), false),
            (Point::new(Mm(x), Mm(bottom + h)), false),
        ];
        self.layer.set_fill_color(color(fill));
        let mode = if let Some(border_color) = border {
            self.layer.set_outline_color(color(border_color));
            PaintMode::FillStroke
        } else {
            PaintMode::Fill
        };
        self.layer.add_polygon(Polygon {
            rings: vec![points],
            mode,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn hline(&self, x1: f32, x2: f32, cursor_y: f32) {
        let points = vec![
            (Point::new(Mm(x1), y_from_top(cursor_y)), false),
            (Point::new(Mm(x2), y_from_top(cursor_y)), false),
        ];
        self.layer.add_line(Line { points, is_closed: false });
    }

    fn vline(&self, x: f32, top: f32, bottom: f32) {
        let points = vec![
            (Point::new(Mm(x), y_from_top(top)), false),
            (Point::new(Mm(x), y_from_top(bottom)), false),
        ];
        self.layer.add_line(Line { points, is_closed: false });
    }
}

// ============================================================================
// Tests
// ============================================================================
