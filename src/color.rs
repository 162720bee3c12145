//! Hex color parsing for color form fields.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?.as_bytes();
    match hex {
        [r, g, b] => {
            let (r, g, b) = (nibble(*r)?, nibble(*g)?, nibble(*b)?);
            Some((r * 17, g * 17, b * 17))
        }
        [r1, r2, g1, g2, b1, b2] => Some((byte(*r1, *r2)?, byte(*g1, *g2)?, byte(*b1, *b2)?)),
        _ => None,
    }
}

fn nibble(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

fn byte(hi: u8, lo: u8) -> Option<u8> {
    Some((nibble(hi)? << 4) | nibble(lo)?)
}

/// Canonical lowercase `#rrggbb`, or `None` when `value` is not a hex color.
pub fn canonical_hex(value: &str) -> Option<String> {
    parse_hex_rgb(value).map(|(r, g, b)| format!("#{r:02x}{g:02x}{b:02x}"))
}
