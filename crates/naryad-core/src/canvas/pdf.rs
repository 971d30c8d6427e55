//! PDF output built from template pages with lopdf.
//!
//! Template pages are copied into a fresh document together with every
//! object they reach. Text is drawn with an embedded TrueType font
//! (Type0 / Identity-H), so any script the font covers can be placed.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::canvas::recording::Placement;
use crate::canvas::{Canvas, PageHandle, TemplateKind, TextBlock};
use crate::error::NaryadError;

/// Resource name the embedded font is registered under on every page.
const FONT_RESOURCE: &str = "FNaryad";

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITED_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// A4 portrait, used when a page declares no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 595.0, 842.0];

struct Template {
    doc: Document,
    pages: Vec<ObjectId>,
}

impl Template {
    fn load(kind: TemplateKind, bytes: &[u8]) -> Result<Self, NaryadError> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| NaryadError::Pdf(format!("{kind} template: {e}")))?;
        let pages = doc.get_pages().into_values().collect();
        Ok(Template { doc, pages })
    }
}

struct ImportedPage {
    id: ObjectId,
    /// Lower-left x and upper-right y of the MediaBox.
    origin: (f32, f32),
    placements: Vec<Placement>,
}

/// Canvas that writes a real PDF document.
pub struct PdfCanvas {
    doc: Document,
    pages_id: ObjectId,
    order: Template,
    list: Template,
    font: Vec<u8>,
    pages: Vec<ImportedPage>,
    /// Template objects already copied into the output, shared by later imports.
    copied: HashMap<(TemplateKind, ObjectId), ObjectId>,
}

impl PdfCanvas {
    /// Load both templates and keep the TrueType font for embedding.
    pub fn new(order_template: &[u8], list_template: &[u8], font: Vec<u8>) -> Result<Self, NaryadError> {
        let order = Template::load(TemplateKind::Order, order_template)?;
        let list = Template::load(TemplateKind::List, list_template)?;
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Ok(PdfCanvas {
            doc,
            pages_id,
            order,
            list,
            font,
            pages: Vec::new(),
            copied: HashMap::new(),
        })
    }

    /// Number of pages imported so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Embed the font, render all placed text and write the document.
    pub fn save_to<W: Write>(self, out: &mut W) -> Result<(), NaryadError> {
        let PdfCanvas {
            mut doc,
            pages_id,
            font,
            pages,
            ..
        } = self;

        let face = ttf_parser::Face::parse(&font, 0)
            .map_err(|e| NaryadError::Pdf(format!("font: {e}")))?;

        let mut glyphs = BTreeMap::new();
        for page in &pages {
            for ch in page.placements.iter().flat_map(|p| p.text.chars()) {
                glyphs.entry(glyph_id(&face, ch)).or_insert(ch);
            }
        }
        let font_id = embed_font(&mut doc, &face, &font, &glyphs);

        for page in &pages {
            render_page(&mut doc, &face, page, font_id)?;
        }

        let mut tree = Dictionary::new();
        tree.set("Type", Object::Name(b"Pages".to_vec()));
        tree.set(
            "Kids",
            Object::Array(pages.iter().map(|p| Object::Reference(p.id)).collect()),
        );
        tree.set("Count", Object::Integer(pages.len() as i64));
        doc.objects.insert(pages_id, Object::Dictionary(tree));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        doc.compress();
        doc.save_to(out)?;
        debug!(pages = pages.len(), "wrote pdf");
        Ok(())
    }
}

impl Canvas for PdfCanvas {
    type Block<'a> = PdfBlock<'a>;

    fn template_page_count(&self, template: TemplateKind) -> usize {
        match template {
            TemplateKind::Order => self.order.pages.len(),
            TemplateKind::List => self.list.pages.len(),
        }
    }

    fn import_page(
        &mut self,
        template: TemplateKind,
        index: usize,
    ) -> Result<PageHandle, NaryadError> {
        let PdfCanvas {
            doc,
            pages_id,
            order,
            list,
            pages,
            copied,
            ..
        } = self;
        let source = match template {
            TemplateKind::Order => &*order,
            TemplateKind::List => &*list,
        };
        let source_id = *source.pages.get(index).ok_or_else(|| {
            NaryadError::Layout(format!("{template} template has no page {}", index + 1))
        })?;

        let mut page = source.doc.get_dictionary(source_id)?.clone();
        for key in INHERITED_KEYS {
            if page.get(key).is_err() {
                if let Some(value) = inherited(&source.doc, source_id, key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        page.remove(b"Parent");

        let mut reachable = BTreeSet::new();
        for (key, value) in page.iter() {
            if key.as_slice() != b"Parent" {
                collect_references(&source.doc, value, &mut reachable);
            }
        }
        let mut fresh = Vec::new();
        let remap: BTreeMap<ObjectId, ObjectId> = reachable
            .into_iter()
            .map(|old| {
                let new = *copied.entry((template, old)).or_insert_with(|| {
                    fresh.push(old);
                    doc.new_object_id()
                });
                (old, new)
            })
            .collect();
        for old in &fresh {
            if let Ok(object) = source.doc.get_object(*old) {
                let mut object = object.clone();
                rewrite_references(&mut object, &remap);
                doc.objects.insert(remap[old], object);
            }
        }

        let origin = media_origin(source_media_box(&source.doc, &page));
        let mut page = Object::Dictionary(page);
        rewrite_references(&mut page, &remap);
        if let Object::Dictionary(dict) = &mut page {
            dict.set("Parent", Object::Reference(*pages_id));
        }
        let id = doc.add_object(page);

        debug!(
            %template,
            index,
            copied = fresh.len(),
            shared = remap.len() - fresh.len(),
            "imported template page"
        );
        pages.push(ImportedPage {
            id,
            origin,
            placements: Vec::new(),
        });
        Ok(PageHandle(pages.len() - 1))
    }

    fn begin_text(&mut self, page: PageHandle) -> Result<PdfBlock<'_>, NaryadError> {
        let page = self
            .pages
            .get_mut(page.0)
            .ok_or_else(|| NaryadError::Layout(format!("unknown page handle {}", page.0)))?;
        Ok(PdfBlock { page })
    }
}

/// Text context on an imported page; placements are rendered on save.
pub struct PdfBlock<'a> {
    page: &'a mut ImportedPage,
}

impl TextBlock for PdfBlock<'_> {
    fn place_text(&mut self, x: f32, y: f32, text: &str, font_size: f32) {
        self.page.placements.push(Placement {
            x,
            y,
            text: text.to_string(),
            font_size,
        });
    }
}

fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    // page trees are shallow; the bound guards against cycles
    for _ in 0..64 {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn collect_references(doc: &Document, object: &Object, seen: &mut BTreeSet<ObjectId>) {
    match object {
        Object::Reference(id) => {
            if seen.insert(*id) {
                if let Ok(target) = doc.get_object(*id) {
                    collect_references(doc, target, seen);
                }
            }
        }
        Object::Array(items) => {
            for item in items {
                collect_references(doc, item, seen);
            }
        }
        Object::Dictionary(dict) => collect_dictionary(doc, dict, seen),
        Object::Stream(stream) => collect_dictionary(doc, &stream.dict, seen),
        _ => {}
    }
}

fn collect_dictionary(doc: &Document, dict: &Dictionary, seen: &mut BTreeSet<ObjectId>) {
    for (key, value) in dict.iter() {
        if key.as_slice() != b"Parent" {
            collect_references(doc, value, seen);
        }
    }
}

fn rewrite_references(object: &mut Object, remap: &BTreeMap<ObjectId, ObjectId>) {
    match object {
        Object::Reference(id) => {
            if let Some(new) = remap.get(id) {
                *id = *new;
            }
        }
        Object::Array(items) => {
            for item in items {
                rewrite_references(item, remap);
            }
        }
        Object::Dictionary(dict) => rewrite_dictionary(dict, remap),
        Object::Stream(stream) => rewrite_dictionary(&mut stream.dict, remap),
        _ => {}
    }
}

fn rewrite_dictionary(dict: &mut Dictionary, remap: &BTreeMap<ObjectId, ObjectId>) {
    for (_, value) in dict.iter_mut() {
        rewrite_references(value, remap);
    }
}

fn source_media_box(doc: &Document, page: &Dictionary) -> [f32; 4] {
    let array = match page.get(b"MediaBox") {
        Ok(Object::Array(items)) => Some(items.clone()),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .ok()
            .and_then(|o| o.as_array().ok())
            .cloned(),
        _ => None,
    };
    let numbers: Vec<f32> = array
        .unwrap_or_default()
        .iter()
        .filter_map(number)
        .collect();
    match numbers.as_slice() {
        [a, b, c, d] => [*a, *b, *c, *d],
        _ => DEFAULT_MEDIA_BOX,
    }
}

fn media_origin(media_box: [f32; 4]) -> (f32, f32) {
    let llx = media_box[0].min(media_box[2]);
    let ury = media_box[1].max(media_box[3]);
    (llx, ury)
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn glyph_id(face: &ttf_parser::Face<'_>, ch: char) -> u16 {
    face.glyph_index(ch).map(|g| g.0).unwrap_or(0)
}

fn encode_text(face: &ttf_parser::Face<'_>, text: &str) -> Vec<u8> {
    text.chars()
        .flat_map(|ch| glyph_id(face, ch).to_be_bytes())
        .collect()
}

fn scaled(face: &ttf_parser::Face<'_>, value: f32) -> i64 {
    (value * 1000.0 / f32::from(face.units_per_em())).round() as i64
}

fn postscript_name(face: &ttf_parser::Face<'_>) -> String {
    face.names()
        .into_iter()
        .find(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME && name.is_unicode())
        .and_then(|name| name.to_string())
        .map(|name| name.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "NaryadFont".to_string())
}

/// Embed the font program and return the Type0 font object id.
fn embed_font(
    doc: &mut Document,
    face: &ttf_parser::Face<'_>,
    program: &[u8],
    glyphs: &BTreeMap<u16, char>,
) -> ObjectId {
    let base_font = postscript_name(face);

    let mut file_dict = Dictionary::new();
    file_dict.set("Length1", Object::Integer(program.len() as i64));
    let file_id = doc.add_object(Stream::new(file_dict, program.to_vec()));

    let bbox = face.global_bounding_box();
    let mut descriptor = Dictionary::new();
    descriptor.set("Type", Object::Name(b"FontDescriptor".to_vec()));
    descriptor.set("FontName", Object::Name(base_font.clone().into_bytes()));
    descriptor.set("Flags", Object::Integer(32));
    descriptor.set(
        "FontBBox",
        Object::Array(
            [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]
                .iter()
                .map(|v| Object::Integer(scaled(face, f32::from(*v))))
                .collect(),
        ),
    );
    descriptor.set("ItalicAngle", Object::Integer(0));
    descriptor.set("Ascent", Object::Integer(scaled(face, f32::from(face.ascender()))));
    descriptor.set("Descent", Object::Integer(scaled(face, f32::from(face.descender()))));
    descriptor.set(
        "CapHeight",
        Object::Integer(scaled(
            face,
            f32::from(face.capital_height().unwrap_or(face.ascender())),
        )),
    );
    descriptor.set("StemV", Object::Integer(80));
    descriptor.set("FontFile2", Object::Reference(file_id));
    let descriptor_id = doc.add_object(descriptor);

    let mut widths = Vec::new();
    for gid in glyphs.keys() {
        let advance = face
            .glyph_hor_advance(ttf_parser::GlyphId(*gid))
            .unwrap_or(0);
        widths.push(Object::Integer(i64::from(*gid)));
        widths.push(Object::Array(vec![Object::Integer(scaled(
            face,
            f32::from(advance),
        ))]));
    }

    let mut system_info = Dictionary::new();
    system_info.set("Registry", Object::string_literal("Adobe"));
    system_info.set("Ordering", Object::string_literal("Identity"));
    system_info.set("Supplement", Object::Integer(0));

    let mut cid_font = Dictionary::new();
    cid_font.set("Type", Object::Name(b"Font".to_vec()));
    cid_font.set("Subtype", Object::Name(b"CIDFontType2".to_vec()));
    cid_font.set("BaseFont", Object::Name(base_font.clone().into_bytes()));
    cid_font.set("CIDSystemInfo", Object::Dictionary(system_info));
    cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
    cid_font.set("CIDToGIDMap", Object::Name(b"Identity".to_vec()));
    cid_font.set("W", Object::Array(widths));
    let cid_font_id = doc.add_object(cid_font);
    let to_unicode_id = doc.add_object(Stream::new(Dictionary::new(), to_unicode_cmap(glyphs)));

    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type0".to_vec()));
    font.set("BaseFont", Object::Name(base_font.into_bytes()));
    font.set("Encoding", Object::Name(b"Identity-H".to_vec()));
    font.set(
        "DescendantFonts",
        Object::Array(vec![Object::Reference(cid_font_id)]),
    );
    font.set("ToUnicode", Object::Reference(to_unicode_id));
    doc.add_object(font)
}

/// CMap mapping the 2-byte glyph codes back to text, so the output can be
/// searched and copied. The missing glyph (0) maps to nothing.
fn to_unicode_cmap(glyphs: &BTreeMap<u16, char>) -> Vec<u8> {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );
    let entries: Vec<(u16, char)> = glyphs
        .iter()
        .filter(|(gid, _)| **gid != 0)
        .map(|(gid, ch)| (*gid, *ch))
        .collect();
    // a bfchar block holds at most 100 entries
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            cmap.push_str(&format!("<{gid:04X}> <{hex}>\n"));
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap.into_bytes()
}

/// Wrap the template content in q/Q and append the placed text after it.
fn render_page(
    doc: &mut Document,
    face: &ttf_parser::Face<'_>,
    page: &ImportedPage,
    font_id: ObjectId,
) -> Result<(), NaryadError> {
    let (llx, ury) = page.origin;
    let mut operations = vec![Operation::new("Q", vec![])];
    for placement in &page.placements {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                    Object::Real(placement.font_size.into()),
                ],
            ),
            Operation::new(
                "rg",
                vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
            ),
            Operation::new(
                "Td",
                vec![
                    Object::Real((llx + placement.x).into()),
                    Object::Real((ury - placement.y).into()),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(
                    encode_text(face, &placement.text),
                    StringFormat::Hexadecimal,
                )],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    let prefix = Content {
        operations: vec![Operation::new("q", vec![])],
    }
    .encode()?;
    let suffix = Content { operations }.encode()?;
    let prefix_id = doc.add_object(Stream::new(Dictionary::new(), prefix));
    let suffix_id = doc.add_object(Stream::new(Dictionary::new(), suffix));

    let (contents, resources) = {
        let dict = doc.get_dictionary(page.id)?;
        let mut contents = vec![Object::Reference(prefix_id)];
        contents.extend(content_parts(doc, dict));
        contents.push(Object::Reference(suffix_id));
        (contents, page_resources(doc, dict, font_id)?)
    };

    let dict = doc.get_object_mut(page.id)?.as_dict_mut()?;
    dict.set("Contents", Object::Array(contents));
    dict.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// The page's content streams as a flat list of references. `Contents` may
/// be a stream, an array of streams, or a reference to such an array.
fn content_parts(doc: &Document, page: &Dictionary) -> Vec<Object> {
    match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        _ => Vec::new(),
    }
}

/// The page's resources, inlined, with the embedded font registered.
fn page_resources(
    doc: &Document,
    page: &Dictionary,
    font_id: ObjectId,
) -> Result<Dictionary, NaryadError> {
    let mut resources = match page.get(b"Resources") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id)?.clone(),
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id)?.clone(),
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    fonts.set(FONT_RESOURCE, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));
    Ok(resources)
}
