//! Read annotations back from a page

use crate::error::PdfLinkError;
use crate::page_id_at;
use lopdf::{Dictionary, Document, Object};
use serde::Serialize;
use tracing::warn;

/// An annotation as found on a page, in `/Annots` order
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageAnnotation {
    pub subtype: Option<String>,
    pub rect: Option<[f64; 4]>,
    /// Target of a `/URI` action, if the annotation has one
    pub uri: Option<String>,
}

/// A `/Link` annotation with a `/URI` action
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinkAnnotation {
    pub rect: [f64; 4],
    pub uri: String,
}

/// All annotations on the page at a zero-based index.
///
/// Entries of `/Annots` that do not resolve to a dictionary are skipped.
pub fn page_annotations(
    doc: &Document,
    page_index: usize,
) -> Result<Vec<PageAnnotation>, PdfLinkError> {
    let page_id = page_id_at(doc, page_index)?;
    let page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| PdfLinkError::OperationError(e.to_string()))?;

    let annots = match page.get(b"Annots") {
        Ok(annots) => match resolve(doc, annots) {
            Some(Object::Array(arr)) => arr,
            _ => {
                return Err(PdfLinkError::OperationError(
                    "/Annots is neither an array nor a reference to one".into(),
                ))
            }
        },
        Err(_) => return Ok(Vec::new()),
    };

    let mut result = Vec::with_capacity(annots.len());
    for entry in annots {
        match resolve(doc, entry) {
            Some(Object::Dictionary(dict)) => result.push(read_annotation(doc, dict)),
            _ => warn!(page_index, ?entry, "Skipping /Annots entry that is not a dictionary"),
        }
    }
    Ok(result)
}

/// URI links on the page at a zero-based index
pub fn page_links(doc: &Document, page_index: usize) -> Result<Vec<LinkAnnotation>, PdfLinkError> {
    Ok(page_annotations(doc, page_index)?
        .into_iter()
        .filter(|a| a.subtype.as_deref() == Some("Link"))
        .filter_map(|a| {
            Some(LinkAnnotation {
                rect: a.rect?,
                uri: a.uri?,
            })
        })
        .collect())
}

fn read_annotation(doc: &Document, annot: &Dictionary) -> PageAnnotation {
    let subtype = annot
        .get(b"Subtype")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned());

    let rect = annot
        .get(b"Rect")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| read_rect(doc, o));

    let uri = annot
        .get(b"A")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|action| read_uri_action(doc, action));

    PageAnnotation { subtype, rect, uri }
}

fn read_uri_action(doc: &Document, action: &Dictionary) -> Option<String> {
    let kind = action.get(b"S").ok().and_then(|o| resolve(doc, o))?;
    if kind.as_name().ok()? != b"URI" {
        return None;
    }
    match resolve(doc, action.get(b"URI").ok()?)? {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn read_rect(doc: &Document, rect: &Object) -> Option<[f64; 4]> {
    let values = rect.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let mut bounds = [0.0; 4];
    for (slot, value) in bounds.iter_mut().zip(values) {
        *slot = match resolve(doc, value)? {
            Object::Integer(v) => *v as f64,
            Object::Real(v) => *v as f64,
            _ => return None,
        };
    }
    Some(bounds)
}

/// Follow a single indirect reference, or return the object itself
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}
