//! Insert URI link annotations into PDF pages

use crate::error::PdfLinkError;
use crate::request::LinkRequest;
use crate::{load_document, page_id_at, read_pdf};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::Path;
use tracing::{debug, info};

/// Add a link annotation to a PDF file and write the result to `destination`.
///
/// The output is fully built in memory first, so a missing source, a
/// malformed document or a bad page index never creates `destination`.
pub fn add_link(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    request: &LinkRequest,
) -> Result<(), PdfLinkError> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    let pdf_bytes = read_pdf(source)?;
    let output = add_link_to_bytes(&pdf_bytes, request)?;

    std::fs::write(destination, &output).map_err(|source| PdfLinkError::Write {
        path: destination.to_path_buf(),
        source,
    })?;

    info!(
        source = %source.display(),
        destination = %destination.display(),
        page_index = request.page_index,
        uri = %request.uri,
        "Added link annotation"
    );
    Ok(())
}

/// Add a link annotation to in-memory PDF bytes, returning the new PDF
pub fn add_link_to_bytes(pdf_bytes: &[u8], request: &LinkRequest) -> Result<Vec<u8>, PdfLinkError> {
    let mut doc = load_document(pdf_bytes)?;
    add_link_to_document(&mut doc, request)?;

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| PdfLinkError::SerializationError(format!("Save failed: {}", e)))?;

    Ok(output)
}

/// Add a link annotation to a loaded document.
///
/// Returns the object id of the new annotation. The annotation is always
/// appended after any annotations already on the page.
pub fn add_link_to_document(
    doc: &mut Document,
    request: &LinkRequest,
) -> Result<ObjectId, PdfLinkError> {
    let bounds = request.rect.to_pdf_bounds()?;
    let page_id = page_id_at(doc, request.page_index)?;
    debug!(page_index = request.page_index, ?page_id, "Selected page");

    let annot_id = doc.add_object(Object::Dictionary(link_annotation(bounds, &request.uri)));
    add_annotation_to_page(doc, page_id, annot_id)?;
    debug!(?annot_id, ?bounds, "Appended link annotation");

    Ok(annot_id)
}

fn link_annotation(bounds: [f64; 4], uri: &str) -> Dictionary {
    let mut action = Dictionary::new();
    action.set("S", Object::Name(b"URI".to_vec()));
    action.set(
        "URI",
        Object::String(uri.as_bytes().to_vec(), lopdf::StringFormat::Literal),
    );

    let mut annot = Dictionary::new();
    annot.set("Type", Object::Name(b"Annot".to_vec()));
    annot.set("Subtype", Object::Name(b"Link".to_vec()));
    annot.set(
        "Rect",
        Object::Array(bounds.iter().map(|v| pdf_number(*v)).collect()),
    );
    annot.set("A", Object::Dictionary(action));
    annot
}

/// Integral values within `i64` range are written as integers; anything
/// else becomes an `f32` real, the widest real lopdf writes.
fn pdf_number(value: f64) -> Object {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Object::Integer(value as i64)
    } else {
        Object::Real(value as f32)
    }
}

/// Append `annot_id` to the page's `/Annots`, creating the array when absent.
/// An `/Annots` stored as an indirect array is extended in place.
fn add_annotation_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    annot_id: ObjectId,
) -> Result<(), PdfLinkError> {
    let page = doc
        .get_object_mut(page_id)
        .map_err(|e| PdfLinkError::OperationError(e.to_string()))?;

    let Object::Dictionary(page_dict) = page else {
        return Err(PdfLinkError::OperationError(format!(
            "Page object {:?} is not a dictionary",
            page_id
        )));
    };

    if !page_dict.has(b"Annots") {
        page_dict.set("Annots", Object::Array(vec![Object::Reference(annot_id)]));
        return Ok(());
    }

    let annots_id = match page_dict.get_mut(b"Annots") {
        Ok(Object::Array(ref mut arr)) => {
            arr.push(Object::Reference(annot_id));
            return Ok(());
        }
        Ok(Object::Reference(id)) => *id,
        _ => {
            return Err(PdfLinkError::OperationError(
                "/Annots is neither an array nor a reference to one".into(),
            ))
        }
    };

    match doc.get_object_mut(annots_id) {
        Ok(Object::Array(ref mut arr)) => {
            arr.push(Object::Reference(annot_id));
            Ok(())
        }
        _ => Err(PdfLinkError::OperationError(format!(
            "/Annots reference {:?} does not point to an array",
            annots_id
        ))),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::inspect::page_links;
    use crate::request::PdfRect;
    use crate::test_support::create_test_pdf;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: indexes inside [0, N) succeed, indexes at or past N fail
        #[test]
        fn page_index_bounds(num_pages in 1u32..6, index in 0usize..10) {
            let pdf = create_test_pdf(num_pages);
            let request = LinkRequest::new(index, PdfRect::new(10.0, 10.0, 20.0, 20.0), "http://example.com");
            let result = add_link_to_bytes(&pdf, &request);
            if index < num_pages as usize {
                prop_assert!(result.is_ok());
            } else {
                let is_out_of_range = matches!(result, Err(PdfLinkError::PageOutOfRange { .. }));
                prop_assert!(is_out_of_range);
            }
        }

        /// Property: the stored rect is [x, y, x+width, y+height] for integral coordinates
        #[test]
        fn stored_rect_matches_request(
            x in 0i32..1000,
            y in 0i32..1000,
            width in 1i32..500,
            height in 1i32..500,
            path in "[a-z]{1,12}"
        ) {
            let pdf = create_test_pdf(1);
            let uri = format!("https://example.com/{}", path);
            let rect = PdfRect::new(x as f64, y as f64, width as f64, height as f64);
            let result = add_link_to_bytes(&pdf, &LinkRequest::new(0, rect, uri.clone())).unwrap();

            let links = page_links(&crate::load_document(&result).unwrap(), 0).unwrap();
            prop_assert_eq!(links.len(), 1);
            prop_assert_eq!(
                links[0].rect,
                [x as f64, y as f64, (x + width) as f64, (y + height) as f64]
            );
            prop_assert_eq!(&links[0].uri, &uri);
        }

        /// Property: quarter-point coordinates are exact in f32 and round-trip unchanged
        #[test]
        fn fractional_rect_round_trips(
            x in -4000i32..4000,
            y in -4000i32..4000,
            width in 1i32..2000,
            height in 1i32..2000
        ) {
            let pdf = create_test_pdf(1);
            let rect = PdfRect::new(
                x as f64 / 4.0,
                y as f64 / 4.0,
                width as f64 / 4.0,
                height as f64 / 4.0,
            );
            let expected = rect.to_pdf_bounds().unwrap();
            let result = add_link_to_bytes(&pdf, &LinkRequest::new(0, rect, "https://example.com")).unwrap();

            let links = page_links(&crate::load_document(&result).unwrap(), 0).unwrap();
            prop_assert_eq!(links[0].rect, expected);
        }

        /// Property: integers past 2^24 are stored as PDF integers without loss
        #[test]
        fn large_integral_rect_round_trips(
            x in (1i64 << 24)..(1i64 << 40),
            y in -(1i64 << 40)..-(1i64 << 24),
            width in 1i64..1000,
            height in 1i64..1000
        ) {
            let pdf = create_test_pdf(1);
            let rect = PdfRect::new(x as f64, y as f64, width as f64, height as f64);
            let result = add_link_to_bytes(&pdf, &LinkRequest::new(0, rect, "https://example.com")).unwrap();

            let links = page_links(&crate::load_document(&result).unwrap(), 0).unwrap();
            prop_assert_eq!(
                links[0].rect,
                [x as f64, y as f64, (x + width) as f64, (y + height) as f64]
            );
        }
    }
}
