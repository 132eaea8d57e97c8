//! Reading the CSS-style shadow descriptors carried by card poses.

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    /// Straight (non-premultiplied) RGBA, each channel in 0..=1.
    pub color: [f64; 4],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShadowParseError {
    #[error("expected four lengths followed by an rgba() color in '{0}'")]
    Malformed(String),
    #[error("invalid number '{0}'")]
    Number(String),
}

impl FromStr for BoxShadow {
    type Err = ShadowParseError;

    /// Accepts `"<x> <y> <blur> <spread> rgba(r, g, b, a)"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ShadowParseError::Malformed(s.to_string());

        let (lengths, color) = s.split_once("rgba(").ok_or_else(malformed)?;
        let color = color.trim().strip_suffix(')').ok_or_else(malformed)?;

        let lengths = lengths
            .split_whitespace()
            .map(parse_length)
            .collect::<Result<Vec<_>, _>>()?;
        let channels = color
            .split(',')
            .map(|c| parse_number(c.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        match (lengths.as_slice(), channels.as_slice()) {
            (&[offset_x, offset_y, blur, spread], &[r, g, b, a]) => Ok(Self {
                offset_x,
                offset_y,
                blur,
                spread,
                color: [r / 255.0, g / 255.0, b / 255.0, a],
            }),
            _ => Err(malformed()),
        }
    }
}

fn parse_length(token: &str) -> Result<f64, ShadowParseError> {
    parse_number(token.strip_suffix("px").unwrap_or(token))
}

fn parse_number(token: &str) -> Result<f64, ShadowParseError> {
    token
        .parse()
        .map_err(|_| ShadowParseError::Number(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{SHADOW_REVEALED, compute_metrics};

    #[test]
    fn test_parse_stacked_shadows() {
        let m = compute_metrics(1024.0);
        for pose in &m.stacked_poses {
            assert!(pose.shadow.parse::<BoxShadow>().is_ok(), "{}", pose.shadow);
        }

        let top: BoxShadow = m.stacked_poses[3].shadow.parse().unwrap();
        assert_eq!(top.offset_x, 0.0);
        assert_eq!(top.offset_y, 40.0);
        assert_eq!(top.blur, 120.0);
        assert_eq!(top.spread, -45.0);
        assert_eq!(top.color[0], 1.0);
        assert_eq!(top.color[3], 0.85);
    }

    #[test]
    fn test_parse_revealed_shadow() {
        let s: BoxShadow = SHADOW_REVEALED.parse().unwrap();
        assert_eq!(s.offset_y, 45.0);
        assert_eq!(s.color[3], 0.75);
    }

    #[test]
    fn test_reject_malformed() {
        assert!(matches!(
            "0 4px 8px".parse::<BoxShadow>(),
            Err(ShadowParseError::Malformed(_))
        ));
        assert!(matches!(
            "0 4px 8px 1px rgba(1, 2, x, 1)".parse::<BoxShadow>(),
            Err(ShadowParseError::Number(_))
        ));
        assert!(matches!(
            "0 4px rgba(1, 2, 3, 1)".parse::<BoxShadow>(),
            Err(ShadowParseError::Malformed(_))
        ));
    }
}
