use crate::canonical::{CandidateUrl, CanonicalKey, Canonicalizer, Provenance};
use crate::discovery::{DiscoveryBudget, DiscoveryStats};
use crate::fetch::Fetcher;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// Links whose anchor text or href mention one of these are enqueued ahead
/// of the other links on the same page, so important pages survive budget
/// pressure.
const PRIORITY_KEYWORDS: &[&str] = &[
    "home",
    "about",
    "über",
    "contact",
    "kontakt",
    "services",
    "dienstleistungen",
    "impressum",
    "datenschutz",
    "privacy",
    "team",
    "portfolio",
    "produkte",
    "products",
    "blog",
    "news",
    "faq",
    "support",
    "help",
    "pricing",
    "preise",
];

/// Breadth-first traversal of same-origin hyperlinks starting from the seed.
///
/// The frontier is FIFO and links are taken in document order (priority
/// links first), so results are reproducible for a given site snapshot.
/// Visited-set membership is tested by canonical key, not raw URL, so
/// link-text variants of the same page are not re-crawled. A page that fails
/// to fetch contributes no links but does not halt the crawl.
pub async fn crawl<F: Fetcher>(
    fetcher: &F,
    seed: &Url,
    canonicalizer: &Canonicalizer,
    visited: &mut HashSet<CanonicalKey>,
    budget: &mut DiscoveryBudget,
    stats: &mut DiscoveryStats,
    timeout: Duration,
) -> Vec<CandidateUrl> {
    let mut admitted = Vec::new();
    let mut frontier: VecDeque<Url> = VecDeque::from([seed.clone()]);

    'crawl: while let Some(page_url) = frontier.pop_front() {
        let body = match fetcher.fetch(&page_url, timeout).await {
            Ok(response) if response.is_success() => response.body,
            Ok(response) => {
                ::log::warn!("crawl skipped {} (HTTP {})", page_url, response.status);
                continue;
            }
            Err(err) => {
                ::log::warn!("crawl skipped {}: {}", page_url, err);
                continue;
            }
        };

        for link in extract_links(&body, &page_url) {
            let Some(key) = canonicalizer.canonicalize(&link) else {
                continue;
            };
            if visited.contains(&key) {
                stats.duplicates_collapsed += 1;
                continue;
            }
            if !budget.admit() {
                stats.budget_rejected += 1;
                ::log::info!("crawl budget exhausted, stopping discovery");
                break 'crawl;
            }

            visited.insert(key);
            let mut variant = link;
            variant.set_fragment(None);
            ::log::debug!("crawl admitted {}", variant);
            admitted.push(CandidateUrl::new(variant.clone(), Provenance::CrawlLink));
            frontier.push_back(variant);
        }
    }

    admitted
}

/// Extract anchor targets in document order, priority links first.
fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("a[href]").unwrap();

    let mut priority = Vec::new();
    let mut regular = Vec::new();

    for anchor in doc.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("javascript:")
        {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            continue;
        };

        let text = anchor.text().collect::<String>().to_lowercase();
        let href_lower = href.to_lowercase();
        if PRIORITY_KEYWORDS
            .iter()
            .any(|keyword| text.contains(keyword) || href_lower.contains(keyword))
        {
            priority.push(resolved);
        } else {
            regular.push(resolved);
        }
    }

    priority.extend(regular);
    priority
}
