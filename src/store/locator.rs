//! Resolution of `db` references to document URLs.
//!
//! A reference is either a bare document identifier, which is appended to
//! the store base, or an absolute URL, which must point at a document
//! directly under that base. Nothing else is accepted.

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("'{0}' is not a valid URL")]
    InvalidUrl(String),

    #[error("'{0}' is not a document of the configured store")]
    ForeignUrl(String),

    #[error("'{0}' is not a valid document identifier")]
    InvalidId(String),
}

/// Maps `db` references onto the configured store.
#[derive(Debug, Clone)]
pub struct DocumentLocator {
    base: Url,
}

impl DocumentLocator {
    /// `base` is the collection endpoint, e.g. `https://jsonblob.com/api/jsonBlob`.
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Resolve a `db` reference to the URL of its document.
    pub fn resolve(&self, db: &str) -> Result<Url, LocateError> {
        if db.contains("://") {
            let url = Url::parse(db).map_err(|_| LocateError::InvalidUrl(db.to_string()))?;
            if self.is_document_url(&url) {
                Ok(url)
            } else {
                Err(LocateError::ForeignUrl(db.to_string()))
            }
        } else {
            self.document_url(db)
        }
    }

    /// URL of the document with the bare identifier `id`.
    pub fn document_url(&self, id: &str) -> Result<Url, LocateError> {
        if id.is_empty() || id.contains(['/', '?', '#', '\\']) || id == "." || id == ".." {
            return Err(LocateError::InvalidId(id.to_string()));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| LocateError::InvalidId(id.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn is_document_url(&self, url: &Url) -> bool {
        if url.scheme() != self.base.scheme()
            || url.host_str() != self.base.host_str()
            || url.port_or_known_default() != self.base.port_or_known_default()
            || url.query().is_some()
            || url.fragment().is_some()
        {
            return false;
        }

        let mut base_segments = segments(&self.base);
        if base_segments.last() == Some(&"") {
            base_segments.pop();
        }
        let segments = segments(url);
        segments.len() == base_segments.len() + 1
            && segments.starts_with(&base_segments)
            && !segments.contains(&"")
    }
}

fn segments(url: &Url) -> Vec<&str> {
    url.path_segments().map(Iterator::collect).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> DocumentLocator {
        DocumentLocator::new(Url::parse("https://jsonblob.com/api/jsonBlob").unwrap())
    }

    #[test]
    fn test_bare_identifier() {
        let url = locator().resolve("abc123").unwrap();
        assert_eq!(url.as_str(), "https://jsonblob.com/api/jsonBlob/abc123");
    }

    #[test]
    fn test_base_with_trailing_slash() {
        let locator = DocumentLocator::new(Url::parse("http://127.0.0.1:9000/blobs/").unwrap());
        assert_eq!(
            locator.resolve("x1").unwrap().as_str(),
            "http://127.0.0.1:9000/blobs/x1"
        );
    }

    #[test]
    fn test_full_url_accepted() {
        let db = "https://jsonblob.com/api/jsonBlob/abc123";
        assert_eq!(locator().resolve(db).unwrap().as_str(), db);
    }

    #[test]
    fn test_foreign_urls_rejected() {
        for db in [
            "https://evil.example/api/jsonBlob/abc123",
            "http://jsonblob.com/api/jsonBlob/abc123",
            "https://jsonblob.com/api/other/abc123",
            "https://jsonblob.com/api/jsonBlob",
            "https://jsonblob.com/api/jsonBlob/a/b",
            "https://jsonblob.com/api/jsonBlob/abc?x=1",
            "https://jsonblob.com/api/jsonBlob//abc",
            "https://jsonblob.com/api/jsonBlob/abc/",
            "https://jsonblob.com/api/jsonBlob/",
            "https://jsonblob.com//api/jsonBlob/abc",
        ] {
            assert!(
                matches!(locator().resolve(db), Err(LocateError::ForeignUrl(_))),
                "{db} should be rejected"
            );
        }
    }

    #[test]
    fn test_full_url_under_trailing_slash_base() {
        let locator = DocumentLocator::new(Url::parse("http://127.0.0.1:9000/blobs/").unwrap());
        let db = "http://127.0.0.1:9000/blobs/x1";
        assert_eq!(locator.resolve(db).unwrap().as_str(), db);
        assert!(matches!(
            locator.resolve("http://127.0.0.1:9000/blobs//x1"),
            Err(LocateError::ForeignUrl(_))
        ));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(matches!(locator().resolve("a/b"), Err(LocateError::InvalidId(_))));
        assert!(matches!(locator().resolve(".."), Err(LocateError::InvalidId(_))));
        assert!(matches!(locator().resolve("x?y"), Err(LocateError::InvalidId(_))));
        assert!(matches!(locator().resolve("http://"), Err(LocateError::InvalidUrl(_))));
    }
}
