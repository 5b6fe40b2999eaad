//! Static route enumeration.

use crate::slug::Slug;
use crate::source::ContentSource;

/// Every route a static build produces, sorted.
pub fn enumerate_routes(source: &dyn ContentSource) -> Vec<Slug> {
    let mut routes = source.slugs();
    routes.sort();
    routes.dedup();
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ContentEntry;
    use crate::source::DocsSource;
    use folio_mdx::parse_mdx;
    use std::path::PathBuf;

    #[test]
    fn lists_every_page_once_in_order() {
        let mut source = DocsSource::new();
        for (segments, file) in [
            (vec!["guides", "uploads"], "guides/uploads.mdx"),
            (vec![], "index.mdx"),
            (vec!["api"], "api.mdx"),
        ] {
            source
                .insert(ContentEntry::from_parsed(
                    Slug::new(segments).unwrap(),
                    PathBuf::from(file),
                    parse_mdx("# Page\n").unwrap(),
                ))
                .unwrap();
        }

        let routes = enumerate_routes(&source);
        let again = enumerate_routes(&source);

        let rendered: Vec<_> = routes.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["", "api", "guides/uploads"]);
        assert_eq!(routes, again);
    }

    #[test]
    fn empty_source_has_no_routes() {
        assert!(enumerate_routes(&DocsSource::new()).is_empty());
    }
}
