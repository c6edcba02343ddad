use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

pub struct TestImage {
    pub bytes: Vec<u8>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl TestImage {
    /// Uncompressed 8-bit RGB samples with dimensions declared in the
    /// image dictionary.
    pub fn rgb(width: i64, height: i64) -> Self {
        let byte_count = usize::try_from(width * height * 3).expect("fixture size fits usize");
        Self {
            bytes: vec![0x7F; byte_count],
            width: Some(width),
            height: Some(height),
        }
    }

    /// Undecodable bytes and no declared dimensions.
    pub fn corrupt() -> Self {
        Self {
            bytes: vec![0xDE, 0xAD, 0xBE, 0xEF],
            width: None,
            height: None,
        }
    }
}

pub struct TestPage {
    lines: Vec<String>,
    images: Vec<TestImage>,
}

impl TestPage {
    pub fn text(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(ToString::to_string).collect(),
            images: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            images: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: TestImage) -> Self {
        self.images.push(image);
        self
    }
}

pub fn create_test_pdf(path: &Path, pages: &[TestPage]) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut page_ids = Vec::new();

    for page in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TL", vec![16.into()]),
            Operation::new("Td", vec![50.into(), 780.into()]),
        ];

        for (index, line) in page.lines.iter().enumerate() {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.as_str())],
            ));
            if index + 1 < page.lines.len() {
                operations.push(Operation::new("T*", vec![]));
            }
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let mut xobjects = Dictionary::new();
        for (index, image) in page.images.iter().enumerate() {
            let mut image_dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            };
            if let Some(width) = image.width {
                image_dict.set("Width", width);
            }
            if let Some(height) = image.height {
                image_dict.set("Height", height);
            }
            let mut stream = Stream::new(image_dict, image.bytes.clone());
            // keep stored sample bytes verbatim
            stream.allows_compression = false;
            let image_id = doc.add_object(stream);
            xobjects.set(format!("Im{index}").into_bytes(), Object::Reference(image_id));
        }

        let mut resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };
        if !page.images.is_empty() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }
        let resources_id = doc.add_object(resources);

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)?;
    Ok(())
}
