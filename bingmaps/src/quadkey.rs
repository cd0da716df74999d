//! Quadkey addressing used by Bing Maps.
//! <https://learn.microsoft.com/en-us/bingmaps/articles/bing-maps-tile-system>

/// Coordinates of a tile, as handed over by the tile-rendering pipeline.
///
/// Rows follow the pipeline's convention: the topmost row is `-1`, and rows get more negative
/// going south. Bing counts rows from `0` at the top, see [`TileCoord::provider_row`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct TileCoord {
    /// Zoom level, where 0 means a single tile covering the whole world.
    pub zoom: u8,

    /// Column of the tile, growing east.
    pub x: i64,

    /// Row of the tile, `-1` being the topmost one.
    pub y: i64,
}

impl TileCoord {
    pub fn new(zoom: u8, x: i64, y: i64) -> Self {
        Self { zoom, x, y }
    }

    /// Row counted from the top, starting at 0, i.e. `-y - 1`.
    pub fn provider_row(&self) -> i64 {
        // Two's complement: !y == -y - 1, without overflowing on i64::MIN.
        !self.y
    }

    /// Bing quadkey of this tile.
    pub fn quadkey(&self) -> String {
        quadkey(self.zoom, self.x, self.y)
    }
}

/// Encode the tile into a quadkey: one base-4 digit per zoom level, the most significant (zoom 1)
/// first. Coordinates outside of the valid range for the zoom level are not rejected, the
/// resulting key will simply be refused by the tile server.
pub fn quadkey(zoom: u8, x: i64, y: i64) -> String {
    let row = TileCoord::new(zoom, x, y).provider_row();
    let mut key = String::with_capacity(usize::from(zoom));

    for level in (1..=zoom).rev() {
        let mask = 1i64.checked_shl(u32::from(level - 1)).unwrap_or(0);
        let mut digit = b'0';
        if x & mask != 0 {
            digit += 1;
        }
        if row & mask != 0 {
            digit += 2;
        }
        key.push(char::from(digit));
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_zero_has_empty_quadkey() {
        assert_eq!("", quadkey(0, 0, -1));
        assert_eq!("", quadkey(0, 123, 456));
    }

    #[test]
    fn quadkey_matches_bing_reference() {
        // Tile X=3, Y=5 at level 3 from the Bing Maps tile system article.
        assert_eq!("213", quadkey(3, 3, -5 - 1));
        assert_eq!("213", TileCoord::new(3, 3, -6).quadkey());
    }

    #[test]
    fn rows_are_inverted_before_encoding() {
        // Topmost row of the pipeline is the provider's row 0.
        assert_eq!(0, TileCoord::new(1, 0, -1).provider_row());
        assert_eq!("0", quadkey(1, 0, -1));
        assert_eq!("1", quadkey(1, 1, -1));
        assert_eq!("2", quadkey(1, 0, -2));
        assert_eq!("3", quadkey(1, 1, -2));

        // Without inversion we would end up in the mirrored hemisphere.
        assert_ne!(quadkey(3, 3, 5), quadkey(3, 3, -6));
    }

    #[test]
    fn quadkey_length_equals_zoom() {
        for zoom in 0..=23 {
            for (x, y) in [(0, -1), (7, -3), (-5, 12), (i64::MAX, i64::MIN)] {
                let key = quadkey(zoom, x, y);
                assert_eq!(usize::from(zoom), key.len());
                assert!(key.chars().all(|c| ('0'..='3').contains(&c)));
                assert_eq!(key, quadkey(zoom, x, y));
            }
        }
    }

    #[test]
    fn deepest_tile_of_the_world() {
        let last = (1 << 19) - 1;
        assert_eq!("3".repeat(19), quadkey(19, last, -last - 1));
        assert_eq!("0".repeat(19), quadkey(19, 0, -1));
    }
}
