//! Wiki page parsing.
//!
//! Year pages are a flat run of blocks: an `h3` per series (anchor to the
//! MyAnimeList entry), an optional `p` with alternative titles, then a table
//! of themes. The index page lists one `h3 > a` per year page.

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use shared::{Anime, Theme};
use tracing::{debug, warn};

/// How many blocks after the table candidate are probed for a table
/// before the series is treated as having no themes.
pub const MAX_TABLE_PROBE: usize = 4;

/// Undo the tag escaping applied to `content_html`.
///
/// Only `&lt;` and `&gt;` are touched. Everything else (`&amp;`, `&quot;`)
/// is left for the HTML parser, and quotes in theme names are handled again
/// by [`theme_from_row`].
pub fn normalize_html(content_html: &str) -> String {
    content_html.replace("&lt;", "<").replace("&gt;", ">")
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {:?}: {}", css, e))
}

/// Typed view over the block-level elements of a wiki page
#[derive(Debug, Clone, Copy)]
pub enum Block<'a> {
    Heading(ElementRef<'a>),
    Paragraph(ElementRef<'a>),
    Table(ElementRef<'a>),
    Other(ElementRef<'a>),
}

impl<'a> Block<'a> {
    pub fn classify(element: ElementRef<'a>) -> Self {
        match element.value().name() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Block::Heading(element),
            "p" => Block::Paragraph(element),
            "table" => Block::Table(element),
            _ => Block::Other(element),
        }
    }
}

/// Element siblings after `element`, text nodes skipped
fn following_blocks<'a>(element: ElementRef<'a>) -> impl Iterator<Item = Block<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .map(Block::classify)
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Locate the theme table belonging to a series heading.
///
/// An alternative-titles paragraph directly after the heading is skipped.
/// From there at most [`MAX_TABLE_PROBE`] blocks are examined; the search
/// stops early at the next heading, since that starts another series.
pub fn find_theme_table<'a>(heading: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let mut blocks = following_blocks(heading).peekable();
    if let Some(Block::Paragraph(_)) = blocks.peek() {
        blocks.next();
    }

    blocks
        .take(MAX_TABLE_PROBE)
        .take_while(|block| !matches!(block, Block::Heading(_)))
        .find_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
}

/// Extract one theme per body row of a theme table, in row order.
///
/// Rows without `td` cells (header rows) are skipped.
pub fn extract_themes(table: ElementRef<'_>) -> Vec<Theme> {
    child_elements(table)
        .filter(|e| e.value().name() == "tbody")
        .flat_map(child_elements)
        .filter(|e| e.value().name() == "tr")
        .filter_map(theme_from_row)
        .collect()
}

/// Columns: name, link cell, episodes, notes. Missing cells read as empty.
fn theme_from_row(row: ElementRef<'_>) -> Option<Theme> {
    let cells: Vec<ElementRef<'_>> = child_elements(row)
        .filter(|e| e.value().name() == "td")
        .collect();

    if cells.is_empty() {
        return None;
    }

    let cell_text = |idx: usize| cells.get(idx).map(|c| text_of(*c)).unwrap_or_default();

    let name = cell_text(0).replace("&quot;", "\"");
    let link = cells.get(1).and_then(|cell| {
        child_elements(*cell)
            .find(|e| e.value().name() == "a")
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string)
    });

    Some(Theme::new(name, link, cell_text(2), cell_text(3)))
}

/// MyAnimeList id: the fifth `/`-separated segment of the link
pub fn mal_id_from_href(href: &str) -> String {
    href.split('/').nth(4).unwrap_or_default().to_string()
}

/// Year label from a wiki page link, absolute or site-relative.
///
/// Query and fragment are dropped before taking the fifth path segment,
/// so `/r/AnimeThemes/wiki/2010#wiki_2010` gives `2010`.
pub fn year_from_href(href: &str) -> Option<String> {
    let path = match url::Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    path.split('/')
        .nth(4)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Build the record for one series heading. `year` is left empty.
pub fn extract_anime(heading: ElementRef<'_>) -> Anime {
    let anchor = child_elements(heading).find(|e| e.value().name() == "a");

    let (id, title) = match anchor {
        Some(a) => (
            mal_id_from_href(a.value().attr("href").unwrap_or_default()),
            text_of(a),
        ),
        None => {
            let title = text_of(heading);
            warn!(title = %title, "Series heading has no link, id left empty");
            (String::new(), title)
        }
    };

    let themes = match find_theme_table(heading) {
        Some(table) => extract_themes(table),
        None => {
            warn!(anime = %title, "No theme table found for series");
            Vec::new()
        }
    };

    debug!(anime = %title, id = %id, themes = themes.len(), "Parsed series");

    Anime {
        id,
        title,
        year: String::new(),
        themes,
    }
}

/// Parse every series on a year page, in document order
pub fn parse_year_page(content_html: &str, year: &str) -> Result<Vec<Anime>> {
    let document = Html::parse_document(&normalize_html(content_html));
    let headings = selector("h3")?;

    let animes = document
        .select(&headings)
        .map(|heading| Anime {
            year: year.to_string(),
            ..extract_anime(heading)
        })
        .collect();

    Ok(animes)
}

/// Parse the year labels linked from the index page, in document order
pub fn parse_year_links(content_html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(&normalize_html(content_html));
    let links = selector("h3 a")?;

    let mut years = Vec::new();
    for anchor in document.select(&links) {
        let href = anchor.value().attr("href").unwrap_or_default();
        match year_from_href(href) {
            Some(year) => years.push(year),
            None => warn!(href = %href, "Index link has no year segment, skipping"),
        }
    }

    Ok(years)
}
