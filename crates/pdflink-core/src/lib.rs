//! PDF link annotation insertion
//!
//! This crate adds clickable URI link annotations to existing PDF pages
//! using lopdf, and reads them back for verification.
//!
//! Three entry points share one implementation:
//! - `add_link`: path to path, the destination is only written on success
//! - `add_link_to_bytes`: in-memory PDF bytes
//! - `add_link_to_document`: an already loaded `lopdf::Document`

pub mod error;
pub mod inspect;
pub mod insert;
pub mod request;

pub use error::PdfLinkError;
pub use insert::{add_link, add_link_to_bytes, add_link_to_document};
pub use inspect::{page_annotations, page_links, LinkAnnotation, PageAnnotation};
pub use request::{LinkRequest, PdfRect};

use lopdf::{Document, ObjectId};
use std::path::Path;

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<usize, PdfLinkError> {
    let doc = load_document(bytes)?;
    Ok(doc.get_pages().len())
}

/// Parse PDF bytes into a document
pub fn load_document(bytes: &[u8]) -> Result<Document, PdfLinkError> {
    Document::load_mem(bytes).map_err(|e| PdfLinkError::ParseError(e.to_string()))
}

/// Read a PDF file from disk, distinguishing a missing file from other I/O failures
pub fn read_pdf(path: impl AsRef<Path>) -> Result<Vec<u8>, PdfLinkError> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            PdfLinkError::NotFound(path.to_path_buf())
        } else {
            PdfLinkError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Object id of the page at a zero-based index, in document page order
pub fn page_id_at(doc: &Document, index: usize) -> Result<ObjectId, PdfLinkError> {
    let pages = doc.get_pages();
    let page_count = pages.len();
    pages
        .into_values()
        .nth(index)
        .ok_or(PdfLinkError::PageOutOfRange { index, page_count })
}


#[cfg(test)]
mod tests {
    use super::test_support::create_test_pdf;
    use super::*;

    #[test]
    fn test_get_page_count() {
        assert_eq!(get_page_count(&create_test_pdf(3)).unwrap(), 3);
    }

    #[test]
    fn test_get_page_count_rejects_garbage() {
        let result = get_page_count(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfLinkError::ParseError(_))));
    }

    #[test]
    fn test_page_id_at_follows_page_order() {
        let doc = load_document(&create_test_pdf(3)).unwrap();
        let expected: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for (index, id) in expected.iter().enumerate() {
            assert_eq!(page_id_at(&doc, index).unwrap(), *id);
        }
    }

    #[test]
    fn test_page_id_at_out_of_range() {
        let doc = load_document(&create_test_pdf(2)).unwrap();
        let err = page_id_at(&doc, 2).unwrap_err();
        assert!(matches!(
            err,
            PdfLinkError::PageOutOfRange {
                index: 2,
                page_count: 2
            }
        ));
    }

    #[test]
    fn test_read_pdf_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        let err = read_pdf(&missing).unwrap_err();
        assert!(matches!(err, PdfLinkError::NotFound(path) if path == missing));
    }
}
