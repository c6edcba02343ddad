use std::fs;
use std::io::Cursor;

use image::ImageReader;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

use crate::model::PageImage;
use crate::options::{ExtractOptions, ImageMode};
use crate::warning::{ExtractWarning, WarningCode};

fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    let mut object = object;
    let mut depth = 0;
    while let Object::Reference(id) = object {
        let Ok(target) = document.get_object(*id) else {
            return object;
        };
        object = target;
        depth += 1;
        if depth > 8 {
            break;
        }
    }
    object
}

/// Image XObject streams reachable from the page's resources, in dictionary
/// order. Form XObjects and unresolvable entries are skipped.
fn image_entries<'a>(document: &'a Document, page_id: ObjectId) -> Vec<&'a Stream> {
    let (direct, resource_ids) = document.get_page_resources(page_id);

    let mut dicts: Vec<&Dictionary> = Vec::new();
    if let Some(dict) = direct {
        dicts.push(dict);
    }
    for id in resource_ids {
        if let Ok(object) = document.get_object(id)
            && let Ok(dict) = object.as_dict()
        {
            dicts.push(dict);
        }
    }

    let mut streams = Vec::new();
    for resources in dicts {
        let Ok(xobjects) = resources.get(b"XObject") else {
            continue;
        };
        let Ok(xobjects) = resolve(document, xobjects).as_dict() else {
            continue;
        };
        for (_name, entry) in xobjects.iter() {
            let Ok(stream) = resolve(document, entry).as_stream() else {
                continue;
            };
            if stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .is_ok_and(|name| name == b"Image")
            {
                streams.push(stream);
            }
        }
    }
    streams
}

fn filter_names(document: &Document, dict: &Dictionary) -> Vec<String> {
    let Ok(filter) = dict.get(b"Filter") else {
        return Vec::new();
    };
    match resolve(document, filter) {
        Object::Name(name) => vec![String::from_utf8_lossy(name).into_owned()],
        Object::Array(items) => items
            .iter()
            .filter_map(|item| resolve(document, item).as_name().ok())
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .collect(),
        _ => Vec::new(),
    }
}

/// The image codec is the last filter in the chain. Everything that is not a
/// recognized codec is tagged "raw": the stored bytes are the sample data in
/// whatever stream encoding the producer used.
fn format_tag(filters: &[String]) -> &'static str {
    match filters.last().map(String::as_str) {
        Some("DCTDecode") => "jpeg",
        Some("JPXDecode") => "jp2",
        Some("JBIG2Decode") => "jbig2",
        Some("CCITTFaxDecode") => "fax",
        _ => "raw",
    }
}

fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    reader.into_dimensions().ok()
}

fn dict_dimensions(document: &Document, dict: &Dictionary) -> Option<(u32, u32)> {
    let width = resolve(document, dict.get(b"Width").ok()?).as_i64().ok()?;
    let height = resolve(document, dict.get(b"Height").ok()?).as_i64().ok()?;
    Some((u32::try_from(width).ok()?, u32::try_from(height).ok()?))
}

fn full_fidelity(
    document: &Document,
    entries: &[&Stream],
    page_no: u32,
    options: &ExtractOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> Vec<PageImage> {
    let mut images = Vec::new();

    for (position, stream) in entries.iter().enumerate() {
        let index = position + 1;
        let bytes = &stream.content;
        let filters = filter_names(document, &stream.dict);
        let format = format_tag(&filters);

        let Some((width, height)) =
            probe_dimensions(bytes).or_else(|| dict_dimensions(document, &stream.dict))
        else {
            warn!(page = page_no, image = index, "image dimensions unreadable");
            warnings.push(
                ExtractWarning::new(
                    WarningCode::ImageDimensionsUnknown,
                    "image dimensions could not be determined",
                )
                .with_page(page_no)
                .with_image_index(index),
            );
            continue;
        };

        let mut saved_path = None;
        if options.save_images {
            let path = options
                .image_dir
                .join(format!("page{page_no}_img{index}.{format}"));
            if let Err(error) = fs::write(&path, bytes) {
                warn!(page = page_no, image = index, %error, "failed to save image");
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::ImageSaveFailed,
                        format!("failed to save image: {error}"),
                    )
                    .with_page(page_no)
                    .with_image_index(index),
                );
                continue;
            }
            saved_path = Some(path);
        }

        images.push(PageImage {
            page: page_no,
            index,
            format: format.to_string(),
            width,
            height,
            byte_size: bytes.len(),
            saved_path,
        });
    }

    images
}

fn lightweight(
    document: &Document,
    entries: &[&Stream],
    page_no: u32,
    options: &ExtractOptions,
) -> Vec<PageImage> {
    if !options.save_images {
        return Vec::new();
    }

    entries
        .iter()
        .enumerate()
        .map(|(position, stream)| {
            let index = position + 1;
            let (width, height) = dict_dimensions(document, &stream.dict).unwrap_or((0, 0));
            PageImage {
                page: page_no,
                index,
                format: "png".to_string(),
                width,
                height,
                byte_size: 0,
                saved_path: Some(
                    options
                        .image_dir
                        .join(format!("page{page_no}_img{index}.png")),
                ),
            }
        })
        .collect()
}

pub(crate) fn extract_page_images(
    document: &Document,
    page_id: ObjectId,
    page_no: u32,
    options: &ExtractOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> Vec<PageImage> {
    let entries = image_entries(document, page_id);
    debug!(
        page = page_no,
        count = entries.len(),
        "found embedded images"
    );

    match options.image_mode {
        ImageMode::FullFidelity => full_fidelity(document, &entries, page_no, options, warnings),
        ImageMode::Lightweight => lightweight(document, &entries, page_no, options),
    }
}
