//! Parser for the compact sign-prefixed coordinate encoding used by
//! zone1970.tab, e.g. `-3652+17446` or `+404251-0740023`.
//!
//! The format is `±DDMM[SS]±DDDMM[SS]`: a latitude component immediately
//! followed by a longitude component, each starting with an explicit sign.
//! Minutes-only and minutes-plus-seconds variants are distinguished purely by
//! digit count.

use super::GeoCoordinate;

/// Parse an ISO 6709 style coordinate string into decimal degrees.
///
/// Returns None for any malformed input: a missing second sign, non-numeric
/// content, an unexpected digit count, or a decoded value outside geodetic
/// bounds.
pub fn parse_iso6709(coord_str: &str) -> Option<GeoCoordinate> {
    // The longitude starts at the second sign (skipping the leading one)
    let split_idx = coord_str
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i)?;

    let latitude = parse_component(&coord_str[..split_idx])?;
    let longitude = parse_component(&coord_str[split_idx..])?;

    GeoCoordinate::new(latitude, longitude)
}

/// Decode one signed component into decimal degrees.
///
/// Digit count selects the layout: 4-5 digits are DDMM/DDDMM, 6-7 digits are
/// DDMMSS/DDDMMSS.
fn parse_component(part: &str) -> Option<f64> {
    let mut chars = part.chars();
    let sign = match chars.next()? {
        '+' => 1.0,
        '-' => -1.0,
        _ => return None,
    };

    let digits = chars.as_str();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (degrees, minutes, seconds) = match digits.len() {
        4 | 5 => {
            let split = digits.len() - 2;
            (
                digits[..split].parse::<u32>().ok()?,
                digits[split..].parse::<u32>().ok()?,
                0,
            )
        }
        6 | 7 => {
            let split = digits.len() - 4;
            (
                digits[..split].parse::<u32>().ok()?,
                digits[split..split + 2].parse::<u32>().ok()?,
                digits[split + 2..].parse::<u32>().ok()?,
            )
        }
        _ => return None,
    };

    Some(sign * (f64::from(degrees) + f64::from(minutes) / 60.0 + f64::from(seconds) / 3600.0))
}
