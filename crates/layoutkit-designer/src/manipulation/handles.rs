use std::fmt;
use std::str::FromStr;

/// One of the eight resize handles around a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    /// Moves the left edge; the right edge stays fixed.
    pub fn moves_west(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    /// Moves the top edge; the bottom edge stays fixed.
    pub fn moves_north(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }

    pub fn is_horizontal(self) -> bool {
        self.moves_west() || self.moves_east()
    }

    pub fn is_vertical(self) -> bool {
        self.moves_north() || self.moves_south()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::S => "s",
            ResizeHandle::E => "e",
            ResizeHandle::W => "w",
            ResizeHandle::NE => "ne",
            ResizeHandle::NW => "nw",
            ResizeHandle::SE => "se",
            ResizeHandle::SW => "sw",
        }
    }

    /// Handle anchor point on `(x, y, width, height)`.
    pub fn anchor(self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        let hx = if self.moves_west() {
            x
        } else if self.moves_east() {
            x + width
        } else {
            x + width / 2.0
        };
        let hy = if self.moves_north() {
            y
        } else if self.moves_south() {
            y + height
        } else {
            y + height / 2.0
        };
        (hx, hy)
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeHandle::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resize handle '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        assert!(ResizeHandle::NW.moves_west() && ResizeHandle::NW.moves_north());
        assert!(!ResizeHandle::SE.moves_west() && !ResizeHandle::SE.moves_north());
        assert!(!ResizeHandle::N.is_horizontal());
        assert!(!ResizeHandle::E.is_vertical());
    }

    #[test]
    fn test_parse() {
        assert_eq!("se".parse::<ResizeHandle>(), Ok(ResizeHandle::SE));
        assert_eq!("NW".parse::<ResizeHandle>(), Ok(ResizeHandle::NW));
        assert!("x".parse::<ResizeHandle>().is_err());
    }

    #[test]
    fn test_anchor() {
        assert_eq!(ResizeHandle::S.anchor(0.0, 0.0, 100.0, 50.0), (50.0, 50.0));
        assert_eq!(ResizeHandle::NE.anchor(10.0, 10.0, 100.0, 50.0), (110.0, 10.0));
    }
}
