use crate::canonical::{CandidateUrl, Provenance};
use crate::fetch::Fetcher;
use std::time::Duration;
use url::Url;

/// Sitemap locations tried in order; the first one that yields URLs wins
const SITEMAP_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/page-sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-pages.xml",
];

/// Bounds on sitemap-index expansion. A misconfigured or malicious index
/// must not be able to amplify into an unbounded number of fetches.
const MAX_CHILD_FETCHES: usize = 20;
const MAX_INDEX_DEPTH: usize = 2;

/// Read the site's sitemap into candidate URLs.
///
/// This source is optional: any fetch or parse failure yields an empty list,
/// never an error.
pub async fn discover<F: Fetcher>(
    fetcher: &F,
    origin: &Url,
    timeout: Duration,
) -> Vec<CandidateUrl> {
    for path in SITEMAP_PATHS {
        let Ok(sitemap_url) = origin.join(path) else {
            continue;
        };

        let candidates = read_sitemap_tree(fetcher, sitemap_url, timeout).await;
        if !candidates.is_empty() {
            ::log::info!("sitemap {} yielded {} URLs", path, candidates.len());
            return candidates;
        }
    }

    ::log::debug!("no usable sitemap found for {}", origin);
    Vec::new()
}

/// Fetch a sitemap and, if it is an index, its children breadth-first within
/// the depth and fetch bounds.
async fn read_sitemap_tree<F: Fetcher>(
    fetcher: &F,
    root: Url,
    timeout: Duration,
) -> Vec<CandidateUrl> {
    let mut candidates = Vec::new();
    let mut frontier: std::collections::VecDeque<(Url, usize)> =
        std::collections::VecDeque::from([(root, 0)]);
    let mut child_fetches = 0usize;

    while let Some((sitemap_url, depth)) = frontier.pop_front() {
        let body = match fetcher.fetch(&sitemap_url, timeout).await {
            Ok(response) if response.is_success() => response.body,
            Ok(response) => {
                ::log::debug!("sitemap {} returned HTTP {}", sitemap_url, response.status);
                continue;
            }
            Err(err) => {
                ::log::debug!("sitemap fetch failed for {}: {}", sitemap_url, err);
                continue;
            }
        };

        let locs = tag_values(&body, "loc");
        if body.contains("<sitemapindex") {
            if depth >= MAX_INDEX_DEPTH {
                ::log::warn!("sitemap index nesting exceeds depth {}", MAX_INDEX_DEPTH);
                continue;
            }
            for loc in locs {
                if child_fetches >= MAX_CHILD_FETCHES {
                    ::log::warn!(
                        "sitemap index expansion stopped at {} child fetches",
                        MAX_CHILD_FETCHES
                    );
                    break;
                }
                if let Ok(child) = Url::parse(&loc) {
                    child_fetches += 1;
                    frontier.push_back((child, depth + 1));
                }
            }
        } else {
            for loc in locs {
                if let Ok(url) = Url::parse(&loc) {
                    candidates.push(CandidateUrl::new(url, Provenance::Sitemap));
                }
            }
        }
    }

    candidates
}

/// Extract the text contents of every `<tag>...</tag>` pair.
///
/// Sitemaps are namespaced XML that an HTML parser mangles, so plain tag
/// splitting is used instead.
fn tag_values(content: &str, tag: &str) -> Vec<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    content
        .split(&open)
        .skip(1)
        .filter_map(|chunk| {
            chunk
                .find(&close)
                .map(|end| chunk[..end].trim().to_string())
        })
        .filter(|value| !value.is_empty())
        .collect()
}
