//! Readability-style content extraction over the `scraper` DOM.
//!
//! Paragraph-like blocks are scored by text length and comma count, scores
//! are propagated to their ancestors, and the best-scoring container (plus
//! qualifying siblings) becomes the article body. Navigation, scripts,
//! hidden elements and, on the first pass, unlikely candidates such as
//! comment sections and sidebars are pruned before scoring.

use ego_tree::NodeId;
use ego_tree::iter::Edge;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::extractor::{Article, ContentExtractor, ExtractionError, Result};
use crate::fetcher::Document;

/// Minimum body length, in characters, before the relaxed retry is skipped.
pub const DEFAULT_CHAR_THRESHOLD: usize = 500;

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid"));

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("BUG: hardcoded CSS selector 'title' is invalid"));

static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("BUG: hardcoded CSS selector 'meta' is invalid"));

static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("BUG: hardcoded CSS selector 'h1' is invalid"));

static H2_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("BUG: hardcoded CSS selector 'h2' is invalid"));

static UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
    )
    .expect("BUG: unlikely candidates pattern is invalid")
});

static MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|content|main|shadow")
        .expect("BUG: maybe candidate pattern is invalid")
});

static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story")
        .expect("BUG: positive class pattern is invalid")
});

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|footer|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|widget",
    )
    .expect("BUG: negative class pattern is invalid")
});

static TITLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" [|\-–—\\/>»] ").expect("BUG: title separator pattern is invalid")
});

static HIERARCHICAL_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" [\\/>»] ").expect("BUG: hierarchical separator pattern is invalid")
});

static SEPARATOR_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[|\-–—\\/>»]+").expect("BUG: separator characters pattern is invalid")
});

static JSON_LD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#)
        .expect("BUG: hardcoded CSS selector for JSON-LD scripts is invalid")
});

/// Checked in order; the first one present wins.
const META_TITLE_KEYS: [&str; 8] = [
    "dc:title",
    "dcterm:title",
    "og:title",
    "weibo:article:title",
    "weibo:webpage:title",
    "title",
    "twitter:title",
    "parsely-title",
];

/// schema.org types whose `headline`/`name` is taken as the article title.
const JSON_LD_ARTICLE_TYPES: [&str; 19] = [
    "Article",
    "AdvertiserContentArticle",
    "NewsArticle",
    "AnalysisNewsArticle",
    "AskPublicNewsArticle",
    "BackgroundNewsArticle",
    "OpinionNewsArticle",
    "ReportageNewsArticle",
    "ReviewNewsArticle",
    "Report",
    "SatiricalArticle",
    "ScholarlyArticle",
    "MedicalScholarlyArticle",
    "SocialMediaPosting",
    "BlogPosting",
    "LiveBlogPosting",
    "DiscussionForumPosting",
    "TechArticle",
    "APIReference",
];

/// Never contribute text, whatever the pass.
const SKIPPED_TAGS: [&str; 17] = [
    "script", "style", "noscript", "template", "iframe", "object", "embed", "svg", "canvas",
    "nav", "aside", "footer", "input", "textarea", "select", "button", "link",
];

const UNLIKELY_ROLES: [&str; 7] = [
    "menu", "menubar", "complementary", "navigation", "alert", "alertdialog", "dialog",
];

const TAGS_TO_SCORE: [&str; 9] = ["section", "h2", "h3", "h4", "h5", "h6", "p", "td", "pre"];

/// A `div` containing none of these is scored like a paragraph.
const DIV_TO_P_ELEMENTS: [&str; 9] = [
    "blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul",
];

const BLOCK_TAGS: [&str; 32] = [
    "address", "article", "blockquote", "br", "dd", "details", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "ol", "p", "pre", "section", "summary", "table", "td", "th", "tr", "ul",
];

const COMMAS: [char; 9] = [
    '\u{002C}', '\u{060C}', '\u{FE50}', '\u{FE10}', '\u{FE11}', '\u{2E41}', '\u{2E34}', '\u{2E32}',
    '\u{FF0C}',
];

const MIN_PARAGRAPH_CHARS: usize = 25;
const ANCESTOR_DEPTH: usize = 5;
const CLASS_WEIGHT: f64 = 25.0;

/// The default [`ContentExtractor`].
#[derive(Debug, Clone)]
pub struct Readability {
    char_threshold: usize,
}

impl Default for Readability {
    fn default() -> Self {
        Self {
            char_threshold: DEFAULT_CHAR_THRESHOLD,
        }
    }
}

impl Readability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_char_threshold(mut self, char_threshold: usize) -> Self {
        self.char_threshold = char_threshold;
        self
    }
}

impl ContentExtractor for Readability {
    fn extract(&self, document: &Document) -> Result<Article> {
        let html = document.html();
        let body = html
            .select(&BODY_SELECTOR)
            .next()
            .ok_or(ExtractionError::NoBody)?;

        let title = article_title(html);

        let mut best = String::new();
        for flags in [Flags::STRICT, Flags::RELAXED] {
            let text = Attempt::new(body, flags, &title).run();
            let length = text.trim().chars().count();

            if length > best.trim().chars().count() {
                best = text;
            }
            if length >= self.char_threshold {
                break;
            }
            debug!(length, threshold = self.char_threshold, ?flags, "article text below threshold");
        }

        if best.trim().is_empty() {
            return Err(ExtractionError::NoContent);
        }

        info!(
            title = %title,
            body_chars = best.chars().count(),
            "extracted article"
        );

        Ok(Article { title, body: best })
    }
}

#[derive(Debug, Clone, Copy)]
struct Flags {
    strip_unlikely: bool,
    weight_classes: bool,
}

impl Flags {
    const STRICT: Flags = Flags {
        strip_unlikely: true,
        weight_classes: true,
    };
    const RELAXED: Flags = Flags {
        strip_unlikely: false,
        weight_classes: false,
    };
}

struct Candidate<'a> {
    element: ElementRef<'a>,
    score: f64,
}

/// One extraction pass over the body with a fixed set of flags.
struct Attempt<'a> {
    body: ElementRef<'a>,
    flags: Flags,
    title: String,
    pruned: HashSet<NodeId>,
    visible: Vec<ElementRef<'a>>,
    candidates: Vec<Candidate<'a>>,
    index: HashMap<NodeId, usize>,
}

impl<'a> Attempt<'a> {
    fn new(body: ElementRef<'a>, flags: Flags, title: &str) -> Self {
        Self {
            body,
            flags,
            title: comparable(title),
            pruned: HashSet::new(),
            visible: Vec::new(),
            candidates: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn run(mut self) -> String {
        self.prune(self.body);
        self.score_paragraphs();
        self.apply_link_density();

        let top = self.top_candidate();
        let selected = self.with_siblings(top);

        let mut collector = TextCollector::default();
        for element in selected {
            collector.block_break();
            self.collect_text(element, &mut collector);
        }
        collector.out
    }

    /// Walks the tree below `root` in document order, recording pruned
    /// subtrees and every element that survives.
    fn prune(&mut self, root: ElementRef<'a>) {
        let mut skipping: Option<NodeId> = None;

        for edge in root.traverse() {
            match edge {
                Edge::Open(node) if skipping.is_none() && node.id() != root.id() => {
                    let Some(element) = ElementRef::wrap(node) else {
                        continue;
                    };
                    if self.is_pruned(element) {
                        self.pruned.insert(element.id());
                        skipping = Some(element.id());
                    } else {
                        self.visible.push(element);
                    }
                }
                Edge::Close(node) if skipping == Some(node.id()) => skipping = None,
                _ => {}
            }
        }
    }

    fn is_pruned(&self, element: ElementRef<'a>) -> bool {
        let el = element.value();
        let tag = el.name();

        if SKIPPED_TAGS.contains(&tag) || is_hidden(element) {
            return true;
        }

        if matches!(tag, "h1" | "h2")
            && !self.title.is_empty()
            && comparable(&element.text().collect::<String>()) == self.title
        {
            return true;
        }

        if !self.flags.strip_unlikely {
            return false;
        }

        if let Some(role) = el.attr("role") {
            if UNLIKELY_ROLES.contains(&role.trim().to_ascii_lowercase().as_str()) {
                return true;
            }
        }

        let match_string = format!("{} {}", el.attr("class").unwrap_or_default(), el.id().unwrap_or_default());
        UNLIKELY_CANDIDATES.is_match(&match_string)
            && !MAYBE_CANDIDATE.is_match(&match_string)
            && !matches!(tag, "body" | "a")
            && !has_ancestor_tag(element, &["table", "code"])
    }

    fn score_paragraphs(&mut self) {
        let scorable: Vec<ElementRef<'a>> = self
            .visible
            .iter()
            .copied()
            .filter(|el| is_scorable(*el))
            .collect();

        for element in scorable {
            let text = self.inner_text(element);
            let text = text.trim();
            let length = text.chars().count();
            if length < MIN_PARAGRAPH_CHARS {
                continue;
            }

            let mut content_score = 1.0;
            content_score += text.split(&COMMAS[..]).count() as f64;
            content_score += (length / 100).min(3) as f64;

            let ancestors = element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .take(ANCESTOR_DEPTH)
                .filter(|a| a.parent().and_then(ElementRef::wrap).is_some());

            for (level, ancestor) in ancestors.enumerate() {
                let divider = match level {
                    0 => 1.0,
                    1 => 2.0,
                    _ => level as f64 * 3.0,
                };
                let initial = self.initial_score(ancestor);
                let slot = *self.index.entry(ancestor.id()).or_insert_with(|| {
                    self.candidates.push(Candidate {
                        element: ancestor,
                        score: initial,
                    });
                    self.candidates.len() - 1
                });
                self.candidates[slot].score += content_score / divider;
            }
        }
    }

    fn apply_link_density(&mut self) {
        let densities: Vec<f64> = self
            .candidates
            .iter()
            .map(|c| self.link_density(c.element))
            .collect();

        for (candidate, density) in self.candidates.iter_mut().zip(densities) {
            candidate.score *= 1.0 - density;
        }
    }

    fn score_of(&self, element: ElementRef<'a>) -> Option<f64> {
        self.index.get(&element.id()).map(|&i| self.candidates[i].score)
    }

    /// Best candidate, promoted to a better-scoring or wrapping ancestor.
    fn top_candidate(&self) -> Candidate<'a> {
        let best = self
            .candidates
            .iter()
            .fold(None::<&Candidate<'a>>, |best, c| match best {
                Some(b) if b.score >= c.score => Some(b),
                _ => Some(c),
            });

        let Some(best) = best else {
            return Candidate {
                element: self.body,
                score: 0.0,
            };
        };

        debug!(
            candidates = self.candidates.len(),
            tag = best.element.value().name(),
            score = best.score,
            "selected top candidate"
        );

        let mut top = best.element;
        let mut top_score = best.score;
        let threshold = top_score / 3.0;
        let mut last_score = top_score;

        let mut parent = parent_element(top);
        while let Some(p) = parent.filter(|p| !is_root(*p)) {
            let Some(parent_score) = self.score_of(p) else {
                parent = parent_element(p);
                continue;
            };
            if parent_score < threshold {
                break;
            }
            if parent_score > last_score {
                top = p;
                top_score = parent_score;
                break;
            }
            last_score = parent_score;
            parent = parent_element(p);
        }

        while let Some(p) = parent_element(top).filter(|p| !is_root(*p)) {
            if p.children().filter_map(ElementRef::wrap).count() != 1 {
                break;
            }
            top = p;
            top_score = self.score_of(p).unwrap_or(top_score);
        }

        Candidate {
            element: top,
            score: top_score,
        }
    }

    fn with_siblings(&self, top: Candidate<'a>) -> Vec<ElementRef<'a>> {
        let Some(parent) = parent_element(top.element).filter(|_| !is_root(top.element)) else {
            return vec![top.element];
        };

        let threshold = (top.score * 0.2).max(10.0);
        let top_class = top.element.value().attr("class").unwrap_or_default();

        parent
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|sibling| !self.pruned.contains(&sibling.id()))
            .filter(|sibling| {
                if sibling.id() == top.element.id() {
                    return true;
                }

                let mut bonus = 0.0;
                if !top_class.is_empty() && sibling.value().attr("class") == Some(top_class) {
                    bonus += top.score * 0.2;
                }
                if let Some(score) = self.score_of(*sibling) {
                    if score + bonus >= threshold {
                        return true;
                    }
                }

                if sibling.value().name() != "p" {
                    return false;
                }
                let density = self.link_density(*sibling);
                let text = self.inner_text(*sibling);
                let text = text.trim();
                let length = text.chars().count();

                (length > 80 && density < 0.25)
                    || (length > 0
                        && length < 80
                        && density == 0.0
                        && (text.contains(". ") || text.ends_with('.')))
            })
            .collect()
    }

    fn initial_score(&self, element: ElementRef<'a>) -> f64 {
        let tag_score = match element.value().name() {
            "div" => 5.0,
            "pre" | "td" | "blockquote" => 3.0,
            "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
            _ => 0.0,
        };
        tag_score + self.class_weight(element)
    }

    fn class_weight(&self, element: ElementRef<'a>) -> f64 {
        if !self.flags.weight_classes {
            return 0.0;
        }

        let el = element.value();
        [el.attr("class"), el.id()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .map(|s| {
                let mut weight = 0.0;
                if NEGATIVE.is_match(s) {
                    weight -= CLASS_WEIGHT;
                }
                if POSITIVE.is_match(s) {
                    weight += CLASS_WEIGHT;
                }
                weight
            })
            .sum()
    }

    fn inner_text(&self, element: ElementRef<'a>) -> String {
        let mut collector = TextCollector::default();
        self.collect_text(element, &mut collector);
        collector.out
    }

    fn collect_text(&self, root: ElementRef<'a>, collector: &mut TextCollector) {
        let mut skipping: Option<NodeId> = None;

        for edge in root.traverse() {
            match edge {
                Edge::Open(node) if skipping.is_none() => match node.value() {
                    Node::Text(text) => collector.push(text),
                    Node::Element(el) if node.id() != root.id() => {
                        if self.pruned.contains(&node.id()) {
                            skipping = Some(node.id());
                        } else if BLOCK_TAGS.contains(&el.name()) {
                            collector.block_break();
                        }
                    }
                    _ => {}
                },
                Edge::Close(node) if skipping == Some(node.id()) => skipping = None,
                Edge::Close(node) if skipping.is_none() && node.id() != root.id() => {
                    if let Node::Element(el) = node.value() {
                        if BLOCK_TAGS.contains(&el.name()) {
                            collector.block_break();
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Share of the visible text under `root` that sits inside links.
    fn link_density(&self, root: ElementRef<'a>) -> f64 {
        let mut total = 0usize;
        let mut linked = 0usize;
        let mut open_links = 0usize;
        let mut skipping: Option<NodeId> = None;

        for edge in root.traverse() {
            match edge {
                Edge::Open(node) if skipping.is_none() => match node.value() {
                    Node::Text(text) => {
                        let length = text.trim().chars().count();
                        total += length;
                        if open_links > 0 {
                            linked += length;
                        }
                    }
                    Node::Element(el) if node.id() != root.id() => {
                        if self.pruned.contains(&node.id()) {
                            skipping = Some(node.id());
                        } else if el.name() == "a" {
                            open_links += 1;
                        }
                    }
                    _ => {}
                },
                Edge::Close(node) if skipping == Some(node.id()) => skipping = None,
                Edge::Close(node) if skipping.is_none() && node.id() != root.id() => {
                    if matches!(node.value(), Node::Element(el) if el.name() == "a") {
                        open_links -= 1;
                    }
                }
                _ => {}
            }
        }

        if total == 0 {
            return 0.0;
        }
        (linked as f64 / total as f64).min(1.0)
    }
}

/// Concatenates text nodes, separating block elements with a newline only
/// where the text would otherwise run together.
#[derive(Default)]
struct TextCollector {
    out: String,
    pending_break: bool,
}

impl TextCollector {
    fn block_break(&mut self) {
        self.pending_break = true;
    }

    fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.pending_break
            && !self.out.is_empty()
            && !self.out.ends_with(char::is_whitespace)
            && !text.starts_with(char::is_whitespace)
        {
            self.out.push('\n');
        }
        self.pending_break = false;
        self.out.push_str(text);
    }
}

fn is_scorable(element: ElementRef<'_>) -> bool {
    let tag = element.value().name();
    if TAGS_TO_SCORE.contains(&tag) {
        return true;
    }
    tag == "div"
        && !element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .any(|d| DIV_TO_P_ELEMENTS.contains(&d.value().name()))
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    let el = element.value();
    if el.attr("hidden").is_some() || el.attr("aria-hidden") == Some("true") {
        return true;
    }
    el.attr("style").is_some_and(|style| {
        let style: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        style.contains("display:none") || style.contains("visibility:hidden")
    })
}

fn has_ancestor_tag(element: ElementRef<'_>, tags: &[&str]) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| tags.contains(&a.value().name()))
}

fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

fn is_root(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "body" | "html")
}

/// Lowercased, whitespace-collapsed form used for title comparisons.
fn comparable(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn heading_texts(html: &Html, selector: &Selector) -> Vec<String> {
    html.select(selector)
        .map(|h| h.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|h| !h.is_empty())
        .collect()
}

fn article_title(html: &Html) -> String {
    let original = html
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    if let Some(title) = json_ld_title(html, &original).or_else(|| meta_title(html)) {
        return title;
    }

    let h1s = heading_texts(html, &H1_SELECTOR);
    if original.is_empty() {
        return h1s.into_iter().next().unwrap_or_default();
    }

    let h2s = heading_texts(html, &H2_SELECTOR);
    clean_title(&original, &h1s, &h2s)
}

fn meta_title(html: &Html) -> Option<String> {
    let mut values: HashMap<String, String> = HashMap::new();

    for meta in html.select(&META_SELECTOR) {
        let el = meta.value();
        let Some(content) = el.attr("content").map(str::trim).filter(|c| !c.is_empty()) else {
            continue;
        };
        let keys = el.attr("property").into_iter().chain(el.attr("name"));
        for key in keys.flat_map(str::split_whitespace) {
            values
                .entry(key.to_ascii_lowercase())
                .or_insert_with(|| content.to_string());
        }
    }

    META_TITLE_KEYS.iter().find_map(|key| values.remove(*key))
}

/// Title of the first schema.org article found in a JSON-LD script.
fn json_ld_title(html: &Html, document_title: &str) -> Option<String> {
    for script in html.select(&JSON_LD_SELECTOR) {
        let source: String = script.text().collect();
        let source = source
            .trim()
            .trim_start_matches("<![CDATA[")
            .trim_end_matches("]]>");

        let value: Value = match serde_json::from_str(source) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "skipping unparsable JSON-LD");
                continue;
            }
        };

        if let Some(title) = find_json_ld_article(&value).and_then(|a| json_ld_article_title(a, document_title)) {
            return Some(title);
        }
    }
    None
}

fn find_json_ld_article(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_json_ld_article),
        Value::Object(map) => {
            let is_article = match map.get("@type") {
                Some(Value::String(t)) => JSON_LD_ARTICLE_TYPES.contains(&t.as_str()),
                Some(Value::Array(types)) => types
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|t| JSON_LD_ARTICLE_TYPES.contains(&t)),
                _ => false,
            };
            if is_article {
                Some(value)
            } else {
                map.get("@graph").and_then(find_json_ld_article)
            }
        }
        _ => None,
    }
}

/// `name`, or `headline` when the two differ and only the headline
/// resembles the document's `<title>`.
fn json_ld_article_title(article: &Value, document_title: &str) -> Option<String> {
    let field = |key: &str| {
        article
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let title = match (field("name"), field("headline")) {
        (Some(name), Some(headline)) if name != headline => {
            let document_title = comparable(document_title);
            let name_matches = document_title.contains(&comparable(name));
            let headline_matches = document_title.contains(&comparable(headline));
            if headline_matches && !name_matches { headline } else { name }
        }
        (Some(name), _) => name,
        (None, headline) => headline?,
    };
    Some(title.to_string())
}

/// Strips site names and breadcrumbs from a `<title>`.
fn clean_title(original: &str, h1s: &[String], h2s: &[String]) -> String {
    let hierarchical = HIERARCHICAL_SEPARATOR.is_match(original);
    let separators: Vec<_> = TITLE_SEPARATOR.find_iter(original).collect();

    let mut title = original.to_string();

    if let (Some(first), Some(last)) = (separators.first(), separators.last()) {
        title = original[..last.start()].to_string();
        if word_count(&title) < 3 {
            title = original[first.end()..].to_string();
        }
    } else if original.contains(": ") {
        let matches_heading = h1s.iter().chain(h2s).any(|h| h.trim() == original);
        if !matches_heading {
            if let (Some(first), Some(last)) = (original.find(':'), original.rfind(':')) {
                title = original[last + 1..].to_string();
                if word_count(&title) < 3 {
                    title = original[first + 1..].to_string();
                } else if word_count(&original[..first]) > 5 {
                    title = original.to_string();
                }
            }
        }
    } else {
        let length = original.chars().count();
        if (length > 150 || length < 15) && h1s.len() == 1 {
            title = h1s[0].clone();
        }
    }

    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    let words = word_count(&title);
    if words <= 4
        && (!hierarchical || words + 1 != word_count(&SEPARATOR_CHARS.replace_all(original, "")))
    {
        return original.to_string();
    }
    title
}
