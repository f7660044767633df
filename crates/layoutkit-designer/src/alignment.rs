//! Multi-element alignment and distribution.
//!
//! Operations read bounds through a lookup closure (normally
//! [`crate::bounds::BoundsProvider::bounds_of`]) and return the new origins of
//! the elements that move. Elements whose bounds cannot be resolved are left
//! out of the computation entirely.

use layoutkit_core::Bounds;
use serde::{Deserialize, Serialize};

/// Edge or centre alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    CenterHorizontal,
    CenterVertical,
}

impl Alignment {
    pub fn name(&self) -> &'static str {
        match self {
            Alignment::Left => "Align Left",
            Alignment::Right => "Align Right",
            Alignment::Top => "Align Top",
            Alignment::Bottom => "Align Bottom",
            Alignment::CenterHorizontal => "Align Horizontal Center",
            Alignment::CenterVertical => "Align Vertical Center",
        }
    }
}

/// Even spacing along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Distribution {
    Horizontal,
    Vertical,
}

/// A new origin for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reposition {
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

const EPSILON: f64 = 1e-9;

fn collect<I, S, F>(keys: I, bounds_of: F) -> Vec<(String, Bounds)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&str) -> Option<Bounds>,
{
    keys.into_iter()
        .filter_map(|key| {
            let key = key.as_ref();
            match bounds_of(key) {
                Some(b) => Some((key.to_string(), b)),
                None => {
                    tracing::warn!(element = key, "skipping element with unresolvable bounds");
                    None
                }
            }
        })
        .collect()
}

fn moved(key: String, from: &Bounds, x: f64, y: f64) -> Option<Reposition> {
    let (dx, dy) = (x - from.x, y - from.y);
    if dx.abs() < EPSILON && dy.abs() < EPSILON {
        return None;
    }
    Some(Reposition { key, x, y, dx, dy })
}

/// Computes the repositions for an alignment.
///
/// Needs at least two resolvable elements; returns only elements that move.
pub fn align<I, S, F>(keys: I, alignment: Alignment, bounds_of: F) -> Vec<Reposition>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&str) -> Option<Bounds>,
{
    let resolved = collect(keys, bounds_of);
    if resolved.len() < 2 {
        return Vec::new();
    }
    let count = resolved.len() as f64;

    let target = match alignment {
        Alignment::Left => resolved.iter().map(|(_, b)| b.x).fold(f64::INFINITY, f64::min),
        Alignment::Right => resolved
            .iter()
            .map(|(_, b)| b.right)
            .fold(f64::NEG_INFINITY, f64::max),
        Alignment::Top => resolved.iter().map(|(_, b)| b.y).fold(f64::INFINITY, f64::min),
        Alignment::Bottom => resolved
            .iter()
            .map(|(_, b)| b.bottom)
            .fold(f64::NEG_INFINITY, f64::max),
        Alignment::CenterHorizontal => {
            resolved.iter().map(|(_, b)| b.center_x).sum::<f64>() / count
        }
        Alignment::CenterVertical => resolved.iter().map(|(_, b)| b.center_y).sum::<f64>() / count,
    };

    resolved
        .into_iter()
        .filter_map(|(key, b)| {
            let (x, y) = match alignment {
                Alignment::Left => (target, b.y),
                Alignment::Right => (target - b.width, b.y),
                Alignment::Top => (b.x, target),
                Alignment::Bottom => (b.x, target - b.height),
                Alignment::CenterHorizontal => (target - b.width / 2.0, b.y),
                Alignment::CenterVertical => (b.x, target - b.height / 2.0),
            };
            moved(key, &b, x, y)
        })
        .collect()
}

/// Computes the repositions that space elements evenly along an axis.
///
/// The first and last element along the axis stay put; interior elements are
/// placed so every gap between consecutive extents is equal. Needs at least
/// three resolvable elements.
pub fn distribute<I, S, F>(keys: I, distribution: Distribution, bounds_of: F) -> Vec<Reposition>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&str) -> Option<Bounds>,
{
    let mut resolved = collect(keys, bounds_of);
    if resolved.len() < 3 {
        return Vec::new();
    }

    let start = |b: &Bounds| match distribution {
        Distribution::Horizontal => b.x,
        Distribution::Vertical => b.y,
    };
    let size = |b: &Bounds| match distribution {
        Distribution::Horizontal => b.width,
        Distribution::Vertical => b.height,
    };

    resolved.sort_by(|(ka, a), (kb, b)| start(a).total_cmp(&start(b)).then_with(|| ka.cmp(kb)));

    let (first, last) = (&resolved[0].1, &resolved[resolved.len() - 1].1);
    let interior = &resolved[1..resolved.len() - 1];
    let interior_size: f64 = interior.iter().map(|(_, b)| size(b)).sum();
    let gap = (start(last) - (start(first) + size(first)) - interior_size)
        / (resolved.len() - 1) as f64;

    let mut cursor = start(first) + size(first) + gap;
    let mut result = Vec::new();
    for (key, b) in interior {
        let (x, y) = match distribution {
            Distribution::Horizontal => (cursor, b.y),
            Distribution::Vertical => (b.x, cursor),
        };
        cursor += size(b) + gap;
        if let Some(r) = moved(key.clone(), b, x, y) {
            result.push(r);
        }
    }
    result
}
