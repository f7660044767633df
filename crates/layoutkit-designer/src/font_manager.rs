use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{point, Font, Scale};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

/// Average glyph advance as a fraction of the font size, used when no font
/// can be loaded.
const ESTIMATED_ADVANCE: f64 = 0.6;

/// Default line height as a multiple of the font size.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        db
    })
}

/// Looks up a system font, caching hits and misses.
pub fn get_font_for(family: &str, bold: bool, italic: bool) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = FontKey {
        family: family.to_string(),
        bold,
        italic,
    };

    if let Some(font) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(&key) {
        return *font;
    }

    let loaded = load_font_from_system(family, bold, italic)
        .map(|font| &*Box::leak(Box::new(font)));
    if loaded.is_none() {
        tracing::warn!(family, bold, italic, "no system font found, text will not be drawn");
    }

    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(key, loaded);
    loaded
}

/// Loads a font file, caching by path.
pub fn get_font_from_file(path: &Path) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<PathBuf, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    if let Some(font) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(path) {
        return *font;
    }

    let loaded = fs::read(path)
        .ok()
        .and_then(Font::try_from_vec)
        .map(|font| &*Box::leak(Box::new(font)));
    if loaded.is_none() {
        tracing::warn!(path = %path.display(), "font file could not be loaded");
    }

    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(path.to_path_buf(), loaded);
    loaded
}

/// An explicit font file wins over the system lookup.
pub fn resolve_font(
    explicit: Option<&Path>,
    family: &str,
    bold: bool,
    italic: bool,
) -> Option<&'static Font<'static>> {
    explicit
        .and_then(get_font_from_file)
        .or_else(|| get_font_for(family, bold, italic))
}

fn load_font_from_system(family: &str, bold: bool, italic: bool) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other), Family::SansSerif],
    };

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::Binary(bytes) => Font::try_from_vec(bytes.as_ref().as_ref().to_vec()),
    }
}

/// Advance width of one line of text at `size`.
pub fn line_width(font: Option<&Font<'_>>, text: &str, size: f64) -> f64 {
    match font {
        Some(font) => {
            let scale = Scale::uniform(size as f32);
            font.layout(text, scale, point(0.0, 0.0))
                .last()
                .map(|g| (g.position().x + g.unpositioned().h_metrics().advance_width) as f64)
                .unwrap_or(0.0)
        }
        None => text.chars().count() as f64 * size * ESTIMATED_ADVANCE,
    }
}

/// Splits `text` into lines, wrapping words greedily at `max_width` when given.
pub fn wrap_lines(font: Option<&Font<'_>>, text: &str, size: f64, max_width: Option<f64>) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let Some(max_width) = max_width else {
            lines.push(paragraph.to_string());
            continue;
        };
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && line_width(font, &candidate, size) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

/// Size of a text block: widest line by line count times line height.
pub fn measure_text(
    font: Option<&Font<'_>>,
    text: &str,
    size: f64,
    line_height: f64,
    max_width: Option<f64>,
) -> (f64, f64) {
    let lines = wrap_lines(font, text, size, max_width);
    let width = lines
        .iter()
        .map(|l| line_width(font, l, size))
        .fold(0.0, f64::max);
    (width, lines.len() as f64 * size * line_height)
}
