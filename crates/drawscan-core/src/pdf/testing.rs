//! In-memory PDF fixtures for tests.
//!
//! Every page shares these font resources:
//! - `F1` Courier
//! - `F2` Helvetica
//! - `F3` Helvetica with `/Differences [65 /R /E /V]`
//! - `F4` a Type0 font, Identity-H, whose ToUnicode maps CIDs 1, 2, 3 to `R`, `E`, `V`

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

const TO_UNICODE_CMAP: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CMapName /Drafting-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
3 beginbfchar
<0001> <0052>
<0002> <0045>
<0003> <0056>
endbfchar
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

/// Text drawn at a baseline position with the Courier font.
struct TestText {
    x: f32,
    y: f32,
    size: f32,
    text: String,
}

/// One page of a fixture document.
#[derive(Default)]
pub(crate) struct TestPage {
    texts: Vec<TestText>,
    form_texts: Vec<(f32, f32, TestText)>,
    operations: Vec<Operation>,
    image: bool,
    annotations: Vec<(Vec<u8>, [f32; 4])>,
}

impl TestPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw text directly in the page content.
    pub fn text(mut self, x: f32, y: f32, size: f32, text: &str) -> Self {
        self.texts.push(TestText {
            x,
            y,
            size,
            text: text.to_string(),
        });
        self
    }

    /// Draw text inside a form XObject placed with a translation.
    pub fn form_text(mut self, dx: f32, dy: f32, x: f32, y: f32, size: f32, text: &str) -> Self {
        self.form_texts.push((
            dx,
            dy,
            TestText {
                x,
                y,
                size,
                text: text.to_string(),
            },
        ));
        self
    }

    /// Append raw content stream operations.
    pub fn operations(mut self, operations: Vec<Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    /// Paint a one-pixel image XObject.
    pub fn image(mut self) -> Self {
        self.image = true;
        self
    }

    pub fn annotation(self, content: &str, rect: [f32; 4]) -> Self {
        self.annotation_bytes(content.as_bytes(), rect)
    }

    /// Annotation whose `/Contents` string holds these exact bytes.
    pub fn annotation_bytes(mut self, content: &[u8], rect: [f32; 4]) -> Self {
        self.annotations.push((content.to_vec(), rect));
        self
    }
}

pub(crate) fn op(operator: &str, operands: Vec<Object>) -> Operation {
    Operation::new(operator, operands)
}

pub(crate) fn hex_string(bytes: &[u8]) -> Object {
    Object::String(bytes.to_vec(), StringFormat::Hexadecimal)
}

fn text_operations(texts: &[&TestText]) -> Vec<Operation> {
    let mut ops = Vec::new();
    for t in texts {
        ops.push(op("BT", vec![]));
        ops.push(op("Tf", vec!["F1".into(), Object::Real(t.size)]));
        ops.push(op("Td", vec![Object::Real(t.x), Object::Real(t.y)]));
        ops.push(op("Tj", vec![Object::string_literal(t.text.as_str())]));
        ops.push(op("ET", vec![]));
    }
    ops
}

fn font_resources(doc: &mut Document) -> Dictionary {
    let courier = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let helvetica = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let remapped = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => dictionary! {
            "Type" => "Encoding",
            "BaseEncoding" => "WinAnsiEncoding",
            "Differences" => vec![
                65.into(),
                Object::Name(b"R".to_vec()),
                Object::Name(b"E".to_vec()),
                Object::Name(b"V".to_vec()),
            ],
        },
    });

    let to_unicode = doc.add_object(Stream::new(dictionary! {}, TO_UNICODE_CMAP.to_vec()));
    let descendant = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "Drafting",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => "Drafting",
            "Flags" => 32,
        },
        "DW" => 1000,
        "W" => vec![
            1.into(),
            Object::Array(vec![500.into(), 500.into(), 500.into()]),
        ],
    });
    let composite = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "Drafting",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(descendant)],
        "ToUnicode" => to_unicode,
    });

    dictionary! {
        "F1" => courier,
        "F2" => helvetica,
        "F3" => remapped,
        "F4" => composite,
    }
}

/// Build a PDF with the given pages and return its bytes.
pub(crate) fn build_pdf(pages: &[TestPage]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let fonts = font_resources(&mut doc);
    let form_resources_id = doc.add_object(dictionary! {
        "Font" => fonts.clone(),
    });

    let mut kids = Vec::new();
    for page in pages {
        let mut ops = text_operations(&page.texts.iter().collect::<Vec<_>>());
        ops.extend(page.operations.iter().cloned());
        let mut xobjects = Dictionary::new();

        for (i, (dx, dy, text)) in page.form_texts.iter().enumerate() {
            let form = Content {
                operations: text_operations(&[text]),
            };
            let form_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Form",
                    "BBox" => vec![0.into(), 0.into(), 1000.into(), 1000.into()],
                    "Resources" => form_resources_id,
                },
                form.encode().unwrap(),
            ));
            let name = format!("X{}", i + 1);
            xobjects.set(name.as_bytes().to_vec(), form_id);
            ops.push(op("q", vec![]));
            ops.push(op(
                "cm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    Object::Real(*dx),
                    Object::Real(*dy),
                ],
            ));
            ops.push(op("Do", vec![Object::Name(name.into_bytes())]));
            ops.push(op("Q", vec![]));
        }

        if page.image {
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => 1,
                    "Height" => 1,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                vec![0x80],
            ));
            xobjects.set("Im1", image_id);
            ops.push(op("q", vec![]));
            ops.push(op(
                "cm",
                vec![50.into(), 0.into(), 0.into(), 50.into(), 10.into(), 10.into()],
            ));
            ops.push(op("Do", vec!["Im1".into()]));
            ops.push(op("Q", vec![]));
        }

        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let annots: Vec<Object> = page
            .annotations
            .iter()
            .map(|(content, rect)| {
                let id = doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Square",
                    "Rect" => rect.iter().map(|v| Object::Real(*v)).collect::<Vec<_>>(),
                    "Contents" => Object::String(content.clone(), StringFormat::Literal),
                });
                Object::Reference(id)
            })
            .collect();

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => fonts.clone(),
                "XObject" => xobjects,
            },
            "Annots" => annots,
            "MediaBox" => vec![0.into(), 0.into(), 842.into(), 595.into()],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}
