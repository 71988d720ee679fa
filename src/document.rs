use crate::dates::range_caption;
use crate::errors::ExportError;
use crate::journal::NoteMap;
use crate::models::DateEntry;
use crate::sanitize::sanitize_note;
use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rgb};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;
pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - MARGIN_MM * 2.0;
/// Content past this baseline moves to the next page.
pub const BOTTOM_LIMIT_MM: f32 = PAGE_HEIGHT_MM - 20.0;
pub const LINE_PITCH_MM: f32 = 5.0;
pub const ENTRY_GAP_MM: f32 = 8.0;
pub const BODY_SIZE_PT: f32 = 10.0;

const TITLE: &str = "UL - The Journey";
const BYLINE: &str = "Created By Uday";
const ROSE: (u8, u8, u8) = (225, 29, 72);
const GREY: (u8, u8, u8) = (80, 80, 80);
const BLACK: (u8, u8, u8) = (0, 0, 0);

const MM_PER_PT: f32 = 0.352_778;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_pt: f32,
    pub weight: Weight,
    pub color: (u8, u8, u8),
}

#[derive(Debug, Clone, PartialEq, Default)]
// Millimetres, `y` grows down the page to the text baseline.
pub struct DocumentLayout {
    pub pages: Vec<Vec<TextRun>>,
}

struct Cursor {
    pages: Vec<Vec<TextRun>>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: MARGIN_MM,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = MARGIN_MM;
    }

    fn text(
        &mut self,
        text: impl Into<String>,
        y: f32,
        size_pt: f32,
        weight: Weight,
        color: (u8, u8, u8),
    ) {
        if let Some(page) = self.pages.last_mut() {
            page.push(TextRun {
                text: text.into(),
                x_mm: MARGIN_MM,
                y_mm: y,
                size_pt,
                weight,
                color,
            });
        }
    }
}

pub fn layout_journal(dates: &[DateEntry], notes: &NoteMap) -> DocumentLayout {
    let mut cursor = Cursor::new();

    cursor.text(TITLE, cursor.y, 22.0, Weight::Bold, ROSE);
    cursor.y += 10.0;
    cursor.text(BYLINE, cursor.y, 12.0, Weight::Regular, GREY);
    cursor.y += 6.0;
    cursor.text(range_caption(), cursor.y, 12.0, Weight::Regular, GREY);
    cursor.y += 15.0;

    for entry in dates {
        if cursor.y > BOTTOM_LIMIT_MM {
            cursor.new_page();
        }
        let header = format!("{} - {}", entry.display_text, entry.label);
        cursor.text(header, cursor.y, BODY_SIZE_PT, Weight::Bold, ROSE);

        let note = notes.get(&entry.id).map(|raw| sanitize_note(raw)).unwrap_or_default();
        if note.is_empty() {
            cursor.y += ENTRY_GAP_MM;
            continue;
        }

        cursor.y += LINE_PITCH_MM;
        let lines = wrap_text(&note, CONTENT_WIDTH_MM, BODY_SIZE_PT);
        let block = lines.len() as f32 * LINE_PITCH_MM;
        let fits_fresh_page = MARGIN_MM + block <= BOTTOM_LIMIT_MM;

        if cursor.y + block > BOTTOM_LIMIT_MM && fits_fresh_page {
            cursor.new_page();
        }

        let mut line_y = cursor.y;
        for line in lines {
            // Only a note taller than a whole page flows line by line.
            if line_y > BOTTOM_LIMIT_MM {
                cursor.new_page();
                line_y = cursor.y;
            }
            cursor.text(line, line_y, BODY_SIZE_PT, Weight::Regular, BLACK);
            line_y += LINE_PITCH_MM;
        }
        cursor.y = line_y + ENTRY_GAP_MM;
    }

    DocumentLayout { pages: cursor.pages }
}

/// Helvetica advance widths in 1/1000 em for `' '..='~'`.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];
const FALLBACK_WIDTH: u32 = 556;

fn advance(ch: char) -> u32 {
    (ch as usize)
        .checked_sub(' ' as usize)
        .and_then(|idx| HELVETICA_WIDTHS.get(idx))
        .map_or(FALLBACK_WIDTH, |&width| u32::from(width))
}

fn units_to_mm(units: u32, size_pt: f32) -> f32 {
    units as f32 / 1000.0 * size_pt * MM_PER_PT
}

pub fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    units_to_mm(text.chars().map(advance).sum(), size_pt)
}

/// Word-wraps `text` so no line is wider than `width_mm` at `size_pt`.
/// Explicit newlines are kept and words wider than a line are split.
pub fn wrap_text(text: &str, width_mm: f32, size_pt: f32) -> Vec<String> {
    let fits = |units: u32| units_to_mm(units, size_pt) <= width_mm;
    let space = advance(' ');
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_units = 0;

        for word in paragraph.split_whitespace() {
            let mut rest = word;
            let mut rest_units: u32 = rest.chars().map(advance).sum();

            while !fits(rest_units) {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_units = 0;
                }
                let split = fitting_prefix(rest, &fits);
                lines.push(rest[..split].to_string());
                rest = &rest[split..];
                rest_units = rest.chars().map(advance).sum();
            }
            if rest.is_empty() {
                continue;
            }

            if !line.is_empty() && !fits(line_units + space + rest_units) {
                lines.push(std::mem::take(&mut line));
                line_units = 0;
            }
            if !line.is_empty() {
                line.push(' ');
                line_units += space;
            }
            line.push_str(rest);
            line_units += rest_units;
        }

        lines.push(line);
    }

    lines
}

/// Byte length of the longest prefix of `word` that fits, at least one char.
fn fitting_prefix(word: &str, fits: &impl Fn(u32) -> bool) -> usize {
    let mut used = 0;
    for (idx, ch) in word.char_indices() {
        used += advance(ch);
        if !fits(used) {
            return if idx == 0 { ch.len_utf8() } else { idx };
        }
    }
    word.len()
}

pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

    let mut targets = vec![(first_page, first_layer)];
    for _ in 1..layout.pages.len() {
        targets.push(doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1"));
    }

    for (runs, (page, layer)) in layout.pages.iter().zip(targets) {
        let canvas = doc.get_page(page).get_layer(layer);
        for run in runs {
            let (r, g, b) = run.color;
            canvas.set_fill_color(Color::Rgb(Rgb::new(
                f32::from(r) / 255.0,
                f32::from(g) / 255.0,
                f32::from(b) / 255.0,
                None,
            )));
            let font = match run.weight {
                Weight::Regular => &regular,
                Weight::Bold => &bold,
            };
            canvas.use_text(
                run.text.clone(),
                run.size_pt,
                Mm(run.x_mm),
                Mm(PAGE_HEIGHT_MM - run.y_mm),
                font,
            );
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn pdf_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::journey_dates;

    fn headers(layout: &DocumentLayout) -> Vec<&TextRun> {
        layout
            .pages
            .iter()
            .flatten()
            .filter(|run| run.weight == Weight::Bold && run.size_pt == BODY_SIZE_PT)
            .collect()
    }

    #[test]
    fn title_block_comes_first() {
        let layout = layout_journal(&journey_dates(), &NoteMap::new());
        let first = &layout.pages[0];
        assert_eq!(first[0].text, "UL - The Journey");
        assert_eq!(first[1].text, "Created By Uday");
        assert_eq!(first[2].text, "15/11/2025 - 26/02/2026");
        assert_eq!(first[3].text, "15/11/2025 - Saturday, Nov 15");
        assert_eq!(first[3].y_mm, 51.0);
    }

    #[test]
    fn every_day_gets_a_header_and_pages_stay_in_bounds() {
        let layout = layout_journal(&journey_dates(), &NoteMap::new());
        assert_eq!(headers(&layout).len(), 104);
        assert!(layout.pages.len() > 1);
        for run in layout.pages.iter().flatten() {
            assert!(run.y_mm >= MARGIN_MM);
            assert!(run.y_mm <= BOTTOM_LIMIT_MM + ENTRY_GAP_MM);
        }
        // Header pagination: each page after the first starts at the margin.
        for page in &layout.pages[1..] {
            assert_eq!(page[0].y_mm, MARGIN_MM);
        }
    }

    #[test]
    fn notes_follow_their_header() {
        let dates = journey_dates();
        let notes = NoteMap::from([(
            "2025-11-16".to_string(),
            "Day two “was” café".to_string(),
        )]);
        let layout = layout_journal(&dates, &notes);
        let first = &layout.pages[0];

        let header = first.iter().position(|r| r.text.starts_with("16/11/2025")).unwrap();
        let note = &first[header + 1];
        assert_eq!(note.text, "Day two \"was\" cafe");
        assert_eq!(note.weight, Weight::Regular);
        assert_eq!(note.y_mm, first[header].y_mm + LINE_PITCH_MM);
        // Next header leaves one line plus the entry gap.
        assert_eq!(first[header + 2].y_mm, note.y_mm + LINE_PITCH_MM + ENTRY_GAP_MM);
    }

    #[test]
    fn emoji_only_note_reserves_space_without_text() {
        let dates = journey_dates();
        let notes = NoteMap::from([("2025-11-15".to_string(), "🥰🥰".to_string())]);
        let with = layout_journal(&dates, &notes);
        let without = layout_journal(&dates, &NoteMap::new());
        assert_eq!(with, without);
    }

    #[test]
    fn a_note_that_does_not_fit_moves_to_the_next_page() {
        let dates = journey_dates();
        let long = "word ".repeat(400);
        let notes: NoteMap = dates[..30].iter().map(|d| (d.id.clone(), long.clone())).collect();
        let layout = layout_journal(&dates, &notes);

        for page in &layout.pages {
            for run in page {
                assert!(run.y_mm <= BOTTOM_LIMIT_MM + LINE_PITCH_MM);
            }
        }
        // A moved note opens its page.
        let moved = layout.pages[1..]
            .iter()
            .any(|page| page[0].weight == Weight::Regular && page[0].y_mm == MARGIN_MM);
        assert!(moved);
    }

    #[test]
    fn note_taller_than_a_page_flows_across_pages() {
        let dates = journey_dates();
        let huge = "line\n".repeat(120);
        let notes = NoteMap::from([(dates[0].id.clone(), huge)]);
        let layout = layout_journal(&dates, &notes);

        let note_lines = layout
            .pages
            .iter()
            .flatten()
            .filter(|run| run.weight == Weight::Regular && run.text == "line")
            .count();
        assert_eq!(note_lines, 120);
        for run in layout.pages.iter().flatten() {
            assert!(run.y_mm <= BOTTOM_LIMIT_MM + LINE_PITCH_MM);
        }
    }

    #[test]
    fn wrap_respects_width_and_newlines() {
        let width = text_width_mm("one two three", BODY_SIZE_PT) - 1.0;
        assert_eq!(wrap_text("one two three", width, BODY_SIZE_PT), vec!["one two", "three"]);
        assert_eq!(wrap_text("a\n\nb", 50.0, BODY_SIZE_PT), vec!["a", "", "b"]);

        let width = text_width_mm("abcd", BODY_SIZE_PT) + 0.5;
        assert_eq!(
            wrap_text("abcdefghij", width, BODY_SIZE_PT),
            vec!["abcd", "efghi", "j"]
        );
        assert_eq!(
            wrap_text("hi abcdefghij", width, BODY_SIZE_PT),
            vec!["hi", "abcd", "efghi", "j"]
        );
    }

    #[test]
    fn wide_glyphs_stay_inside_the_content_width() {
        let shouting = sanitize_note(&"WE MADE IT THROUGH ANOTHER WINTER MOMENT ".repeat(6));
        let lines = wrap_text(&shouting, CONTENT_WIDTH_MM, BODY_SIZE_PT);
        assert!(lines.len() > 2);
        for line in &lines {
            assert!(text_width_mm(line, BODY_SIZE_PT) <= CONTENT_WIDTH_MM);
        }

        // 51 capital Ws are 169.8 mm wide at 10 pt, 52 are not.
        let ws = wrap_text(&"W".repeat(120), CONTENT_WIDTH_MM, BODY_SIZE_PT);
        let lengths: Vec<usize> = ws.iter().map(|line| line.len()).collect();
        assert_eq!(lengths, vec![51, 51, 18]);
    }

    #[test]
    fn laid_out_notes_end_before_the_right_margin() {
        let dates = journey_dates();
        let notes = NoteMap::from([(dates[2].id.clone(), "MMMM WWWW ".repeat(40))]);
        let layout = layout_journal(&dates, &notes);
        let note_runs: Vec<&TextRun> = layout
            .pages
            .iter()
            .flatten()
            .filter(|run| run.weight == Weight::Regular && run.size_pt == BODY_SIZE_PT)
            .collect();
        assert!(note_runs.len() > 1);
        for run in note_runs {
            let right = run.x_mm + text_width_mm(&run.text, run.size_pt);
            assert!(right <= PAGE_WIDTH_MM - MARGIN_MM);
        }
    }

    #[test]
    fn lowercase_text_uses_narrow_metrics() {
        // "il" is 444 units, "WM" is 1777.
        assert!(text_width_mm("il", BODY_SIZE_PT) < text_width_mm("WM", BODY_SIZE_PT) / 3.0);
        assert_eq!(text_width_mm("", BODY_SIZE_PT), 0.0);
    }

    #[test]
    fn renders_a_pdf() {
        let dates = journey_dates();
        let notes = NoteMap::from([(dates[3].id.clone(), "hello".to_string())]);
        let bytes = render_pdf(&layout_journal(&dates, &notes)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
