use crate::canonical::{CandidateUrl, CanonicalKey, Canonicalizer, Provenance};
use crate::fetch::Fetcher;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Route names commonly served by client-side routers. The catalog size is
/// the bound on probing; there is no open-ended guessing.
const ROUTE_CATALOG: &[&str] = &[
    "about",
    "über-uns",
    "ueber-uns",
    "contact",
    "kontakt",
    "services",
    "dienstleistungen",
    "products",
    "produkte",
    "team",
    "unternehmen",
    "blog",
    "news",
    "impressum",
    "imprint",
    "datenschutz",
    "privacy",
    "faq",
    "help",
    "hilfe",
];

/// Probe the route catalog against the site and return the routes that
/// exist. Only called when the seed page was classified as a single-page
/// application; client-rendered routes are absent from server markup, so
/// link crawling cannot see them.
pub async fn probe<F: Fetcher>(
    fetcher: &F,
    origin: &Url,
    existing: &HashSet<CanonicalKey>,
    canonicalizer: &Canonicalizer,
    timeout: Duration,
) -> Vec<CandidateUrl> {
    let mut found = Vec::new();

    for route in ROUTE_CATALOG {
        let Ok(candidate) = origin.join(route) else {
            continue;
        };
        let Some(key) = canonicalizer.canonicalize(&candidate) else {
            continue;
        };
        if existing.contains(&key) {
            continue;
        }

        match fetcher.head(&candidate, timeout).await {
            Ok(status) if (200..300).contains(&status) => {
                ::log::info!("SPA route exists: /{}", route);
                found.push(CandidateUrl::new(candidate, Provenance::SpaProbe));
            }
            Ok(_) => {}
            Err(err) => {
                ::log::debug!("SPA probe failed for /{}: {}", route, err);
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StubFetcher;

    fn setup() -> (Url, Canonicalizer) {
        let origin = Url::parse("https://example.com").unwrap();
        let codes: Vec<String> = vec!["en".to_string(), "de".to_string()];
        let canonicalizer = Canonicalizer::new(origin.clone(), &codes, false);
        (origin, canonicalizer)
    }

    #[tokio::test]
    async fn includes_only_routes_that_answer_2xx() {
        let (origin, canonicalizer) = setup();
        let mut fetcher = StubFetcher::new();
        fetcher.insert("https://example.com/about", 200, "");
        fetcher.insert("https://example.com/contact", 301, "");
        fetcher.insert("https://example.com/blog", 204, "");

        let existing = HashSet::new();
        let found = probe(
            &fetcher,
            &origin,
            &existing,
            &canonicalizer,
            Duration::from_secs(5),
        )
        .await;

        let urls: Vec<&str> = found.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/about", "https://example.com/blog"]);
        assert!(found.iter().all(|c| c.provenance == Provenance::SpaProbe));
    }

    #[tokio::test]
    async fn skips_routes_already_discovered() {
        let (origin, canonicalizer) = setup();
        let mut fetcher = StubFetcher::new();
        fetcher.insert("https://example.com/about", 200, "");

        let mut existing = HashSet::new();
        existing.insert(
            canonicalizer
                .canonicalize(&Url::parse("https://example.com/about").unwrap())
                .unwrap(),
        );

        let found = probe(
            &fetcher,
            &origin,
            &existing,
            &canonicalizer,
            Duration::from_secs(5),
        )
        .await;
        assert!(found.is_empty());
        // The known route must not even be probed.
        assert!(
            !fetcher
                .requests
                .borrow()
                .iter()
                .any(|u| u == "https://example.com/about")
        );
    }

    #[tokio::test]
    async fn probe_volume_is_bounded_by_the_catalog() {
        let (origin, canonicalizer) = setup();
        let fetcher = StubFetcher::new();
        let existing = HashSet::new();

        probe(
            &fetcher,
            &origin,
            &existing,
            &canonicalizer,
            Duration::from_secs(5),
        )
        .await;
        assert!(fetcher.request_count() <= ROUTE_CATALOG.len());
    }
}
