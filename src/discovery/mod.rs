pub mod crawl;
pub mod sitemap;
pub mod spa;

use crate::canonical::{CandidateUrl, CanonicalKey, Canonicalizer, Provenance};
use crate::config::AuditConfig;
use crate::fetch::Fetcher;
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// Shared cap on the total number of pages admitted for analysis.
///
/// Once exhausted no new candidate is admitted regardless of source; only
/// the seed bypasses it.
#[derive(Debug)]
pub struct DiscoveryBudget {
    remaining: Option<usize>,
}

impl DiscoveryBudget {
    pub fn bounded(limit: usize) -> Self {
        Self {
            remaining: Some(limit),
        }
    }

    pub fn unbounded() -> Self {
        Self { remaining: None }
    }

    /// Claim one admission slot. Returns false once the budget is spent.
    pub fn admit(&mut self) -> bool {
        match &mut self.remaining {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

/// Diagnostic counters accumulated during discovery
#[derive(Debug, Default, Clone, Serialize)]
pub struct DiscoveryStats {
    /// Candidates dropped because their canonical key was already admitted
    pub duplicates_collapsed: usize,
    /// Candidates dropped because the page budget was spent
    pub budget_rejected: usize,
    pub from_sitemap: usize,
    pub from_spa_probe: usize,
    pub from_crawl: usize,
}

/// A page admitted for analysis: the first-encountered URL variant, its
/// canonical key and a display label.
#[derive(Debug, Clone)]
pub struct PageSkeleton {
    pub url: Url,
    pub key: CanonicalKey,
    pub label: String,
    pub provenance: Provenance,
}

impl PageSkeleton {
    fn new(candidate: CandidateUrl, key: CanonicalKey) -> Self {
        let mut url = candidate.url;
        url.set_fragment(None);
        let label = label_for(&key);
        Self {
            url,
            key,
            label,
            provenance: candidate.provenance,
        }
    }
}

fn label_for(key: &CanonicalKey) -> String {
    match key.path() {
        "/" => "Homepage".to_string(),
        path => path.to_string(),
    }
}

/// Build the ordered page list by merging the seed, sitemap entries,
/// SPA-probed routes and crawler-discovered links, in that order.
///
/// The order matters under budget pressure: explicitly declared pages
/// (sitemap) beat heuristically guessed ones. Deduplication is by canonical
/// key across all sources combined.
pub async fn discover<F: Fetcher>(
    fetcher: &F,
    seed: &Url,
    config: &AuditConfig,
    seed_is_spa: bool,
) -> (Vec<PageSkeleton>, DiscoveryStats) {
    let canonicalizer = Canonicalizer::new(
        seed.clone(),
        &config.language_codes,
        config.strip_root_language,
    );
    let mut budget = if config.analyze_all {
        DiscoveryBudget::unbounded()
    } else {
        DiscoveryBudget::bounded(config.max_pages)
    };
    let mut stats = DiscoveryStats::default();
    let mut visited: HashSet<CanonicalKey> = HashSet::new();
    let mut pages: Vec<PageSkeleton> = Vec::new();

    let mut root = seed.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);

    // The seed is always admitted first, even on a zero budget.
    if let Some(key) = canonicalizer.canonicalize(seed) {
        budget.admit();
        visited.insert(key.clone());
        pages.push(PageSkeleton::new(
            CandidateUrl::new(seed.clone(), Provenance::Seed),
            key,
        ));
    }

    for candidate in sitemap::discover(fetcher, &root, config.probe_timeout()).await {
        if admit(
            candidate,
            &canonicalizer,
            &mut visited,
            &mut budget,
            &mut stats,
            &mut pages,
        ) {
            stats.from_sitemap += 1;
        }
    }

    // A spent budget admits nothing more, so further source requests are
    // skipped entirely.
    if seed_is_spa && !budget.is_exhausted() {
        ::log::info!("seed classified as SPA, probing common routes");
        let probed =
            spa::probe(fetcher, &root, &visited, &canonicalizer, config.probe_timeout()).await;
        for candidate in probed {
            if admit(
                candidate,
                &canonicalizer,
                &mut visited,
                &mut budget,
                &mut stats,
                &mut pages,
            ) {
                stats.from_spa_probe += 1;
            }
        }
    }

    let crawled = if budget.is_exhausted() {
        Vec::new()
    } else {
        crawl::crawl(
            fetcher,
            seed,
            &canonicalizer,
            &mut visited,
            &mut budget,
            &mut stats,
            config.fetch_timeout(),
        )
        .await
    };
    for candidate in crawled {
        // The crawler already performed canonicalization, dedup and budget
        // admission for everything it returns.
        let key = match canonicalizer.canonicalize(&candidate.url) {
            Some(key) => key,
            None => continue,
        };
        pages.push(PageSkeleton::new(candidate, key));
        stats.from_crawl += 1;
    }

    ::log::info!(
        "discovery finished: {} pages ({} sitemap, {} spa, {} crawl), {} duplicates collapsed",
        pages.len(),
        stats.from_sitemap,
        stats.from_spa_probe,
        stats.from_crawl,
        stats.duplicates_collapsed
    );
    (pages, stats)
}

/// Pass one candidate through canonicalization, dedup and budget admission.
fn admit(
    candidate: CandidateUrl,
    canonicalizer: &Canonicalizer,
    visited: &mut HashSet<CanonicalKey>,
    budget: &mut DiscoveryBudget,
    stats: &mut DiscoveryStats,
    pages: &mut Vec<PageSkeleton>,
) -> bool {
    let Some(key) = canonicalizer.canonicalize(&candidate.url) else {
        return false;
    };
    if visited.contains(&key) {
        stats.duplicates_collapsed += 1;
        return false;
    }
    if !budget.admit() {
        stats.budget_rejected += 1;
        return false;
    }
    visited.insert(key.clone());
    pages.push(PageSkeleton::new(candidate, key));
    true
}
