use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Where a candidate URL came from. Retained for diagnostics only; it never
/// affects deduplication identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Seed,
    Sitemap,
    SpaProbe,
    CrawlLink,
}

/// A discovered URL plus its provenance.
#[derive(Debug, Clone)]
pub struct CandidateUrl {
    pub url: Url,
    pub provenance: Provenance,
}

impl CandidateUrl {
    pub fn new(url: Url, provenance: Provenance) -> Self {
        Self { url, provenance }
    }
}

/// Normalized identity of a URL used for deduplication.
///
/// Two URLs with equal keys are treated as the same page and only one is
/// analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path component of the key, used for display labels
    pub fn path(&self) -> &str {
        let after_scheme = self.0.split_once("://").map(|(_, rest)| rest).unwrap_or("");
        match after_scheme.find('/') {
            Some(idx) => &after_scheme[idx..],
            None => "/",
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File extensions that never point at analyzable pages
const ASSET_EXTENSIONS: &str = r"(?i)\.(jpg|jpeg|png|gif|webp|css|js|ico|svg|woff|woff2|ttf|eot|pdf|doc|docx|zip|xml|json|txt|mp3|mp4)$";

/// Normalizes and compares URLs for page identity within one site.
///
/// Rejects URLs outside the seed origin, non-http(s) schemes and asset
/// resources. Collapses locale-prefixed paths (`/en/about`, `/de/about`) onto
/// the unprefixed key (`/about`).
#[derive(Debug)]
pub struct Canonicalizer {
    origin: Url,
    language_codes: HashSet<String>,
    strip_root_language: bool,
    asset_pattern: Regex,
}

impl Canonicalizer {
    pub fn new(origin: Url, language_codes: &[String], strip_root_language: bool) -> Self {
        let language_codes = language_codes
            .iter()
            .map(|code| code.to_lowercase())
            .collect();
        Self {
            origin,
            language_codes,
            strip_root_language,
            asset_pattern: Regex::new(ASSET_EXTENSIONS).expect("asset extension pattern"),
        }
    }

    /// Compute the canonical key for a URL, or `None` if the URL is not an
    /// analyzable page of this site.
    pub fn canonicalize(&self, url: &Url) -> Option<CanonicalKey> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return None;
        }
        if !self.is_same_origin(url) {
            return None;
        }
        if self.asset_pattern.is_match(url.path()) {
            return None;
        }

        let host = url.host_str()?.to_lowercase();
        let scheme = url.scheme().to_lowercase();
        let port = match url.port() {
            Some(port) => format!(":{port}"),
            None => String::new(),
        };

        let path = self.normalize_path(url.path());
        Some(CanonicalKey(format!("{scheme}://{host}{port}{path}")))
    }

    fn is_same_origin(&self, url: &Url) -> bool {
        url.scheme() == self.origin.scheme()
            && url.host_str().map(|h| h.to_lowercase())
                == self.origin.host_str().map(|h| h.to_lowercase())
            && url.port_or_known_default() == self.origin.port_or_known_default()
    }

    /// Strip a recognized locale prefix and the trailing slash (the root path
    /// keeps its slash).
    fn normalize_path(&self, path: &str) -> String {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if let Some(first) = segments.first() {
            let has_remainder = segments.len() > 1;
            if self.is_language_code(first) && (has_remainder || self.strip_root_language) {
                segments.remove(0);
            }
        }

        if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", segments.join("/"))
        }
    }

    /// A segment is a locale prefix if it is a recognized code, optionally
    /// carrying a region suffix (`de-DE`).
    fn is_language_code(&self, segment: &str) -> bool {
        let lowered = segment.to_lowercase();
        let base = lowered.split('-').next().unwrap_or(&lowered);
        self.language_codes.contains(&lowered) || self.language_codes.contains(base)
    }
}
