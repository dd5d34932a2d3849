//! Document coverage: does a signature cover every end-user document?

use std::collections::HashSet;

/// True iff every path in `documents` appears in `signed`.
///
/// Vacuously true for an empty document list. False when documents exist but
/// the signature references nothing.
pub fn all_documents_signed(documents: &[String], signed: &[String]) -> bool {
    if documents.is_empty() {
        return true;
    }
    if signed.is_empty() {
        return false;
    }
    let signed: HashSet<&str> = signed.iter().map(String::as_str).collect();
    documents.iter().all(|doc| signed.contains(doc.as_str()))
}

/// Documents not referenced by the signature, in document order.
pub fn unsigned_documents(documents: &[String], signed: &[String]) -> Vec<String> {
    let signed: HashSet<&str> = signed.iter().map(String::as_str).collect();
    documents
        .iter()
        .filter(|doc| !signed.contains(doc.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_coverage() {
        let docs = paths(&["a.pdf", "b.docx"]);
        let signed = paths(&["b.docx", "a.pdf", "META-INF/manifest.xml"]);
        assert!(all_documents_signed(&docs, &signed));
        assert!(unsigned_documents(&docs, &signed).is_empty());
    }

    #[test]
    fn partial_coverage_lists_missing_in_order() {
        let docs = paths(&["a.pdf", "b.docx", "c.txt"]);
        let signed = paths(&["b.docx"]);
        assert!(!all_documents_signed(&docs, &signed));
        assert_eq!(unsigned_documents(&docs, &signed), paths(&["a.pdf", "c.txt"]));
    }

    #[test]
    fn no_documents_is_vacuously_covered() {
        assert!(all_documents_signed(&[], &[]));
    }

    #[test]
    fn nothing_signed_with_documents_present() {
        assert!(!all_documents_signed(&paths(&["a.pdf"]), &[]));
    }
}
