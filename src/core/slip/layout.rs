//! Fixed-position drawing for the single-page A4 slip.
//!
//! Coordinates passed to [`Canvas`] are measured from the top-left corner
//! of the page; they are flipped to PDF user space when emitted.

use super::assets::EmbeddedImage;
use super::qr::{QrMatrix, QUIET_ZONE};
use crate::utils::error::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 40.0;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const PHOTO_XOBJECT: &str = "Photo";
const LOGO_XOBJECT: &str = "Logo";

pub type Rgb = (f32, f32, f32);

pub const NAVY: Rgb = (0.07, 0.20, 0.42);
pub const WHITE: Rgb = (1.0, 1.0, 1.0);
pub const BLACK: Rgb = (0.0, 0.0, 0.0);
pub const GRAY: Rgb = (0.45, 0.45, 0.45);
pub const TINT: Rgb = (0.93, 0.95, 0.99);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

impl Weight {
    fn resource(self) -> &'static str {
        match self {
            Weight::Regular => FONT_REGULAR,
            Weight::Bold => FONT_BOLD,
        }
    }

    /// Average Helvetica glyph advance as a fraction of the font size.
    fn advance(self) -> f32 {
        match self {
            Weight::Regular => 0.52,
            Weight::Bold => 0.58,
        }
    }
}

/// Estimated rendered width of `text` in points.
pub fn text_width(text: &str, size: f32, weight: Weight) -> f32 {
    text.chars().count() as f32 * size * weight.advance()
}

/// Shortens `text` with a trailing ellipsis so it fits in `max_width`.
/// Roll number as printed inside its box, shortened when it would overflow.
fn fit_roll_number(roll_number: &str) -> String {
    fit_text(roll_number, ROLL_NUMBER_SIZE, Weight::Bold, TABLE_WIDTH - 24.0)
}

pub fn fit_text(text: &str, size: f32, weight: Weight, max_width: f32) -> String {
    if text_width(text, size, weight) <= max_width {
        return text.to_string();
    }
    let max_chars = (max_width / (size * weight.advance())) as usize;
    let keep = max_chars.saturating_sub(3);
    let mut shortened: String = text.chars().take(keep).collect();
    shortened.push_str("...");
    shortened
}

/// Standard 14 fonts use WinAnsi; anything outside Latin-1 is replaced.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

#[derive(Debug, Default)]
pub struct Canvas {
    operations: Vec<Operation>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn pdf_y(top: f32) -> f32 {
        PAGE_HEIGHT - top
    }

    fn fill_color(&mut self, (r, g, b): Rgb) {
        self.push("rg", vec![r.into(), g.into(), b.into()]);
    }

    fn stroke_color(&mut self, (r, g, b): Rgb) {
        self.push("RG", vec![r.into(), g.into(), b.into()]);
    }

    fn rect_path(&mut self, x: f32, top: f32, width: f32, height: f32) {
        let y = Self::pdf_y(top + height);
        self.push("re", vec![x.into(), y.into(), width.into(), height.into()]);
    }

    pub fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: Rgb) {
        self.fill_color(color);
        self.rect_path(x, top, width, height);
        self.push("f", vec![]);
    }

    pub fn stroke_rect(&mut self, x: f32, top: f32, width: f32, height: f32, line_width: f32) {
        self.push("w", vec![line_width.into()]);
        self.stroke_color(BLACK);
        self.rect_path(x, top, width, height);
        self.push("S", vec![]);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb) {
        self.push("w", vec![0.75_f32.into()]);
        self.stroke_color(color);
        self.push("m", vec![x1.into(), Self::pdf_y(y1).into()]);
        self.push("l", vec![x2.into(), Self::pdf_y(y2).into()]);
        self.push("S", vec![]);
    }

    /// Draws text with its baseline at `baseline`.
    pub fn text(&mut self, x: f32, baseline: f32, size: f32, weight: Weight, color: Rgb, text: &str) {
        self.fill_color(color);
        self.push("BT", vec![]);
        self.push(
            "Tf",
            vec![Object::Name(weight.resource().as_bytes().to_vec()), size.into()],
        );
        self.push("Td", vec![x.into(), Self::pdf_y(baseline).into()]);
        self.push("Tj", vec![Object::string_literal(win_ansi(text))]);
        self.push("ET", vec![]);
    }

    pub fn text_centered(
        &mut self,
        center_x: f32,
        baseline: f32,
        size: f32,
        weight: Weight,
        color: Rgb,
        text: &str,
    ) {
        let x = center_x - text_width(text, size, weight) / 2.0;
        self.text(x, baseline, size, weight, color, text);
    }

    fn image(&mut self, name: &str, x: f32, top: f32, width: f32, height: f32) {
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                width.into(),
                0.0_f32.into(),
                0.0_f32.into(),
                height.into(),
                x.into(),
                Self::pdf_y(top + height).into(),
            ],
        );
        self.push("Do", vec![Object::Name(name.as_bytes().to_vec())]);
        self.push("Q", vec![]);
    }

    /// Draws `image` centered inside the given box.
    pub fn image_in_box(&mut self, name: &str, image: &EmbeddedImage, x: f32, top: f32, w: f32, h: f32) {
        let (width, height) = image.fit_within(w, h);
        let left = x + (w - width) / 2.0;
        let upper = top + (h - height) / 2.0;
        self.image(name, left, upper, width, height);
    }

    /// Draws the QR symbol, quiet zone included, as a `size` x `size` square.
    pub fn qr_code(&mut self, matrix: &QrMatrix, x: f32, top: f32, size: f32) {
        let modules = matrix.width() + 2 * QUIET_ZONE;
        let module = size / modules as f32;
        self.fill_rect(x, top, size, size, WHITE);
        self.fill_color(BLACK);
        for (mx, my) in matrix.dark_modules() {
            let left = x + (mx + QUIET_ZONE) as f32 * module;
            let upper = top + (my + QUIET_ZONE) as f32 * module;
            self.rect_path(left, upper, module, module);
        }
        self.push("f", vec![]);
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }
}

/// Everything drawn on the slip, already resolved and formatted for display.
#[derive(Debug, Default)]
pub struct SlipContent {
    pub school_name: String,
    pub school_address: Option<String>,
    pub school_phone: Option<String>,
    pub subtitle: String,
    pub roll_number: String,
    pub details: Vec<(&'static str, String)>,
    pub logistics: Vec<(&'static str, String)>,
    pub instructions: Vec<String>,
    pub footer: String,
    pub photo: Option<EmbeddedImage>,
    pub logo: Option<EmbeddedImage>,
    pub qr: Option<QrMatrix>,
}

const ROW_HEIGHT: f32 = 22.0;
const LABEL_WIDTH: f32 = 130.0;
const TABLE_WIDTH: f32 = 370.0;
const PHOTO_X: f32 = 435.0;
const PHOTO_WIDTH: f32 = 120.0;
const PHOTO_HEIGHT: f32 = 150.0;
const QR_TOP: f32 = 320.0;
const ROLL_NUMBER_SIZE: f32 = 20.0;

fn draw_rows(canvas: &mut Canvas, rows: &[(&'static str, String)], top: f32) -> f32 {
    let value_width = TABLE_WIDTH - LABEL_WIDTH;
    let mut y = top;
    for (label, value) in rows {
        canvas.fill_rect(MARGIN, y, LABEL_WIDTH, ROW_HEIGHT, TINT);
        canvas.stroke_rect(MARGIN, y, LABEL_WIDTH, ROW_HEIGHT, 0.5);
        canvas.stroke_rect(MARGIN + LABEL_WIDTH, y, value_width, ROW_HEIGHT, 0.5);
        canvas.text(MARGIN + 8.0, y + 15.0, 10.0, Weight::Bold, BLACK, label);
        let shown = fit_text(value, 10.0, Weight::Regular, value_width - 16.0);
        canvas.text(MARGIN + LABEL_WIDTH + 8.0, y + 15.0, 10.0, Weight::Regular, BLACK, &shown);
        y += ROW_HEIGHT;
    }
    y
}

fn draw_page(content: &SlipContent) -> Canvas {
    let mut canvas = Canvas::new();
    let center = PAGE_WIDTH / 2.0;

    // Header band
    canvas.fill_rect(0.0, 0.0, PAGE_WIDTH, 95.0, NAVY);
    let text_left = if let Some(logo) = &content.logo {
        canvas.image_in_box(LOGO_XOBJECT, logo, MARGIN, 15.0, 65.0, 65.0);
        MARGIN + 80.0
    } else {
        MARGIN
    };
    let header_width = PAGE_WIDTH - text_left - MARGIN;
    let name = fit_text(&content.school_name, 20.0, Weight::Bold, header_width);
    canvas.text(text_left, 42.0, 20.0, Weight::Bold, WHITE, &name);
    if let Some(address) = &content.school_address {
        let address = fit_text(address, 9.0, Weight::Regular, header_width);
        canvas.text(text_left, 62.0, 9.0, Weight::Regular, WHITE, &address);
    }
    if let Some(phone) = &content.school_phone {
        canvas.text(text_left, 76.0, 9.0, Weight::Regular, WHITE, &format!("Phone: {}", phone));
    }

    canvas.text_centered(center, 125.0, 16.0, Weight::Bold, NAVY, "ROLL NUMBER SLIP");
    canvas.text_centered(center, 140.0, 10.0, Weight::Regular, GRAY, &content.subtitle);

    // Photo
    canvas.stroke_rect(PHOTO_X, 150.0, PHOTO_WIDTH, PHOTO_HEIGHT, 1.0);
    match &content.photo {
        Some(photo) => {
            canvas.image_in_box(PHOTO_XOBJECT, photo, PHOTO_X + 2.0, 152.0, PHOTO_WIDTH - 4.0, PHOTO_HEIGHT - 4.0)
        }
        None => canvas.text_centered(
            PHOTO_X + PHOTO_WIDTH / 2.0,
            150.0 + PHOTO_HEIGHT / 2.0,
            10.0,
            Weight::Regular,
            GRAY,
            "PHOTO",
        ),
    }

    // Roll number
    canvas.fill_rect(MARGIN, 150.0, TABLE_WIDTH, 50.0, TINT);
    canvas.stroke_rect(MARGIN, 150.0, TABLE_WIDTH, 50.0, 1.0);
    canvas.text(MARGIN + 12.0, 166.0, 9.0, Weight::Regular, GRAY, "Roll Number");
    canvas.text(
        MARGIN + 12.0,
        191.0,
        ROLL_NUMBER_SIZE,
        Weight::Bold,
        NAVY,
        &fit_roll_number(&content.roll_number),
    );

    let details_end = draw_rows(&mut canvas, &content.details, 215.0);

    // Test details
    let logistics_top = details_end + 18.0;
    canvas.fill_rect(MARGIN, logistics_top, TABLE_WIDTH, ROW_HEIGHT, NAVY);
    canvas.text(MARGIN + 8.0, logistics_top + 15.0, 10.0, Weight::Bold, WHITE, "TEST DETAILS");
    let logistics_end = draw_rows(&mut canvas, &content.logistics, logistics_top + ROW_HEIGHT);

    // Verification code
    if let Some(qr) = &content.qr {
        let top = QR_TOP;
        canvas.qr_code(qr, PHOTO_X, top, PHOTO_WIDTH);
        canvas.text_centered(
            PHOTO_X + PHOTO_WIDTH / 2.0,
            top + PHOTO_WIDTH + 14.0,
            8.0,
            Weight::Regular,
            GRAY,
            "Scan to verify",
        );
    }

    // Instructions
    let mut y = logistics_end.max(470.0) + 32.0;
    canvas.text(MARGIN, y, 12.0, Weight::Bold, NAVY, "Instructions");
    for (i, line) in content.instructions.iter().enumerate() {
        y += 17.0;
        let line = fit_text(line, 10.0, Weight::Regular, PAGE_WIDTH - 2.0 * MARGIN - 16.0);
        canvas.text(MARGIN, y, 10.0, Weight::Regular, BLACK, &format!("{}. {}", i + 1, line));
    }

    // Footer
    canvas.line(MARGIN, 790.0, PAGE_WIDTH - MARGIN, 790.0, GRAY);
    canvas.text_centered(center, 806.0, 8.0, Weight::Regular, GRAY, &content.footer);

    canvas
}

fn font(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Lays out `content` on one A4 page and returns the serialized PDF.
pub fn compose(content: &SlipContent) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));

    let mut xobjects = Dictionary::new();
    if let Some(photo) = &content.photo {
        xobjects.set(PHOTO_XOBJECT, doc.add_object(photo.to_xobject()));
    }
    if let Some(logo) = &content.logo {
        xobjects.set(LOGO_XOBJECT, doc.add_object(logo.to_xobject()));
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
        "XObject" => xobjects,
    });

    let operations = draw_page(content).into_operations();
    let encoded = Content { operations }.encode()?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.0_f32.into(), 0.0_f32.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1_i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(win_ansi(&format!("Roll Number Slip {}", content.roll_number))),
        "Creator" => Object::string_literal(win_ansi(&content.school_name)),
    });
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
