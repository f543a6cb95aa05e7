use std::collections::BTreeMap;

use lopdf::content::Operation;
use lopdf::{Document, Encoding, Object, ObjectId};

use crate::error::ImportError;
use crate::fragment::{Page, TextFragment};
use crate::logging::PDF_TEXT;

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Average glyph width as a fraction of the font size. Without font metrics
/// this only keeps consecutive `Tj` runs from sharing an origin.
const APPROX_GLYPH_WIDTH: f32 = 0.5;

/// `TJ` adjustments at or below this (thousandths of an em) read as a space.
const TJ_SPACE_THRESHOLD: f32 = -250.0;

const MAX_PAGE_TREE_DEPTH: usize = 32;

#[derive(Clone, Debug)]
struct GraphicsState {
    ctm: [f32; 6],
    text_state: TextState,
}

impl Default for GraphicsState {
    fn default() -> Self {
        GraphicsState {
            ctm: IDENTITY,
            text_state: TextState::default(),
        }
    }
}

#[derive(Clone, Debug)]
struct TextState {
    text_matrix: [f32; 6],      // Tm
    text_line_matrix: [f32; 6], // Tlm
    font_key: Option<Vec<u8>>,
    font_size: f32,
    horizontal_scaling: f32, // Tz as a fraction
    leading: f32,            // TL
    rise: f32,               // Ts
}

impl Default for TextState {
    fn default() -> Self {
        TextState {
            text_matrix: IDENTITY,
            text_line_matrix: IDENTITY,
            font_key: None,
            font_size: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

impl TextState {
    fn reset(&mut self) {
        self.text_matrix = IDENTITY;
        self.text_line_matrix = IDENTITY;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.text_matrix = multiply_matrices(&translate_matrix(tx, ty), &self.text_line_matrix);
        self.text_line_matrix = self.text_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.move_line(0.0, -leading);
    }
}

/// Extract positioned text fragments from every page of a PDF.
///
/// `y` is flipped against the page's MediaBox so it grows downward.
pub fn pdf_pages(doc: &Document) -> Result<Vec<Page>, ImportError> {
    let mut pages = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        let fragments = page_fragments(doc, page_id).map_err(|source| ImportError::PageExtraction {
            page: page_number,
            source,
        })?;

        tracing::debug!(
            target: PDF_TEXT,
            page = page_number,
            fragments = fragments.len(),
            "Extracted page text"
        );
        pages.push(Page::new(page_number, fragments));
    }

    Ok(pages)
}

pub fn load_pdf_pages(pdf_bytes: &[u8]) -> Result<Vec<Page>, ImportError> {
    let doc = Document::load_mem(pdf_bytes)?;
    pdf_pages(&doc)
}

fn page_fragments(doc: &Document, page_id: ObjectId) -> Result<Vec<TextFragment>, lopdf::Error> {
    let content = doc.get_and_decode_page_content(page_id)?;
    let page_height = media_box(doc, page_id).map_or(0.0, |[_, y0, _, y1]| y1 - y0);

    let fonts = doc.get_page_fonts(page_id)?;
    let encodings: BTreeMap<Vec<u8>, Encoding> = fonts
        .iter()
        .filter_map(|(name, font)| match font.get_font_encoding(doc) {
            Ok(encoding) => Some((name.clone(), encoding)),
            Err(e) => {
                tracing::warn!(target: PDF_TEXT, font = %String::from_utf8_lossy(name), "Unreadable font encoding: {e}");
                None
            }
        })
        .collect();

    let mut gs_stack = vec![GraphicsState::default()];
    let mut fragments = Vec::new();

    for op in &content.operations {
        handle_operator(&mut gs_stack, op, &encodings, page_height, &mut fragments);
    }

    Ok(fragments)
}

/// MediaBox is inheritable, so walk up through `Parent` until one is found.
fn media_box(doc: &Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(array) = dict.get(b"MediaBox").and_then(Object::as_array) {
            let mut media_box = [0.0; 4];
            for (i, obj) in array.iter().take(4).enumerate() {
                media_box[i] = operand_as_float(obj);
            }
            return Some(media_box);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn handle_operator(
    gs_stack: &mut Vec<GraphicsState>,
    op: &Operation,
    encodings: &BTreeMap<Vec<u8>, Encoding>,
    page_height: f32,
    fragments: &mut Vec<TextFragment>,
) {
    if op.operator == "q" {
        if let Some(current) = gs_stack.last().cloned() {
            gs_stack.push(current);
        }
        return;
    }
    if op.operator == "Q" {
        if gs_stack.len() > 1 {
            gs_stack.pop();
        }
        return;
    }

    let Some(gs) = gs_stack.last_mut() else {
        return;
    };
    let ts = &mut gs.text_state;

    match op.operator.as_str() {
        "cm" => gs.ctm = multiply_matrices(&matrix_from_operands(op), &gs.ctm),
        "BT" | "ET" => ts.reset(),
        "Tf" => {
            if let (Some(Object::Name(font_key)), Some(size)) = (op.operands.first(), op.operands.get(1)) {
                ts.font_key = Some(font_key.clone());
                ts.font_size = operand_as_float(size);
            }
        }
        "Tz" => {
            if let Some(scale) = op.operands.first() {
                ts.horizontal_scaling = operand_as_float(scale) / 100.0;
            }
        }
        "TL" => {
            if let Some(leading) = op.operands.first() {
                ts.leading = operand_as_float(leading);
            }
        }
        "Ts" => {
            if let Some(rise) = op.operands.first() {
                ts.rise = operand_as_float(rise);
            }
        }
        "Tm" => {
            let m = matrix_from_operands(op);
            ts.text_matrix = m;
            ts.text_line_matrix = m;
        }
        "Td" | "TD" => {
            if let (Some(tx), Some(ty)) = (op.operands.first(), op.operands.get(1)) {
                let (tx, ty) = (operand_as_float(tx), operand_as_float(ty));
                if op.operator == "TD" {
                    ts.leading = -ty;
                }
                ts.move_line(tx, ty);
            }
        }
        "T*" => ts.next_line(),
        "Tj" | "TJ" => show_text(gs, &op.operands, encodings, page_height, fragments),
        "'" => {
            gs.text_state.next_line();
            show_text(gs, &op.operands, encodings, page_height, fragments);
        }
        "\"" => {
            gs.text_state.next_line();
            show_text(gs, op.operands.get(2..).unwrap_or(&[]), encodings, page_height, fragments);
        }
        _ => {}
    }
}

fn show_text(
    gs: &mut GraphicsState,
    operands: &[Object],
    encodings: &BTreeMap<Vec<u8>, Encoding>,
    page_height: f32,
    fragments: &mut Vec<TextFragment>,
) {
    let encoding = gs
        .text_state
        .font_key
        .as_ref()
        .and_then(|key| encodings.get(key));

    let mut text = String::new();
    collect_text(operands, encoding, &mut text);

    let (x, y) = transform_point(&gs.ctm, &gs.text_state.text_matrix, 0.0, gs.text_state.rise);

    let advance = text.chars().count() as f32
        * gs.text_state.font_size
        * APPROX_GLYPH_WIDTH
        * gs.text_state.horizontal_scaling;
    gs.text_state.text_matrix =
        multiply_matrices(&translate_matrix(advance, 0.0), &gs.text_state.text_matrix);

    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return;
    }

    tracing::trace!(target: PDF_TEXT, text = %text, x, y, "Text run");
    fragments.push(TextFragment::new(text, x, page_height - y));
}

fn collect_text(operands: &[Object], encoding: Option<&Encoding>, out: &mut String) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => out.push_str(&decode_bytes(bytes, encoding)),
            Object::Array(items) => collect_text(items, encoding, out),
            Object::Integer(_) | Object::Real(_) => {
                if operand_as_float(operand) <= TJ_SPACE_THRESHOLD && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn decode_bytes(bytes: &[u8], encoding: Option<&Encoding>) -> String {
    match encoding.map(|encoding| Document::decode_text(encoding, bytes)) {
        Some(Ok(text)) => text,
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn matrix_from_operands(op: &Operation) -> [f32; 6] {
    op.operands
        .iter()
        .map(operand_as_float)
        .collect::<Vec<f32>>()
        .try_into()
        .unwrap_or(IDENTITY)
}

fn operand_as_float(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(f) => *f,
        _ => 0.0,
    }
}

fn transform_point(ctm: &[f32; 6], text_matrix: &[f32; 6], x: f32, y: f32) -> (f32, f32) {
    let tx = text_matrix[0] * x + text_matrix[2] * y + text_matrix[4];
    let ty = text_matrix[1] * x + text_matrix[3] * y + text_matrix[5];

    let px = ctm[0] * tx + ctm[2] * ty + ctm[4];
    let py = ctm[1] * tx + ctm[3] * ty + ctm[5];
    (px, py)
}

pub fn multiply_matrices(a: &[f32; 6], b: &[f32; 6]) -> [f32; 6] {
    [
        a[0] * b[0] + a[1] * b[2],
        a[0] * b[1] + a[1] * b[3],
        a[2] * b[0] + a[3] * b[2],
        a[2] * b[1] + a[3] * b[3],
        a[4] * b[0] + a[5] * b[2] + b[4],
        a[4] * b[1] + a[5] * b[3] + b[5],
    ]
}

pub fn translate_matrix(x: f32, y: f32) -> [f32; 6] {
    [1.0, 0.0, 0.0, 1.0, x, y]
}
