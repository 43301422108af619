// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Parse and carry the three-color specifications used by bars and borders.
// Author: Lukas Bower

//! Color specifications.
//!
//! A spec is three hash-prefixed six-digit hex colors separated by single
//! spaces: foreground, background, border. Bars may prefix their text with
//! one; the root control's color verbs take exactly one.

use rift_9p::Error;

/// Length of one `#RRGGBB #RRGGBB #RRGGBB` specification.
pub const SPEC_LEN: usize = 23;

/// One parsed foreground/background/border triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpec {
    /// Foreground pixel value.
    pub fg: u32,
    /// Background pixel value.
    pub bg: u32,
    /// Border pixel value.
    pub border: u32,
    text: String,
}

impl ColorSpec {
    /// Parse a spec that must span the whole input.
    pub fn parse(input: &str) -> Result<Self, Error> {
        match Self::parse_prefix(input) {
            Some((spec, rest)) if rest.is_empty() => Ok(spec),
            _ => Err(Error::BadValue),
        }
    }

    /// Parse a spec off the front of `input`, returning it and the
    /// remainder. The remainder keeps any separator that followed.
    #[must_use]
    pub fn parse_prefix(input: &str) -> Option<(Self, &str)> {
        if input.len() < SPEC_LEN || !input.is_char_boundary(SPEC_LEN) {
            return None;
        }
        let (head, rest) = input.split_at(SPEC_LEN);
        let mut parts = head.split(' ');
        let fg = hex_color(parts.next()?)?;
        let bg = hex_color(parts.next()?)?;
        let border = hex_color(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }
        Some((
            Self {
                fg,
                bg,
                border,
                text: head.to_owned(),
            },
            rest,
        ))
    }

    /// The canonical textual form.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn hex_color(part: &str) -> Option<u32> {
    let digits = part.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_spec() {
        let spec = ColorSpec::parse("#ffffff #335577 #447799").expect("spec");
        assert_eq!(spec.fg, 0xffffff);
        assert_eq!(spec.bg, 0x335577);
        assert_eq!(spec.border, 0x447799);
        assert_eq!(spec.text(), "#ffffff #335577 #447799");
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(ColorSpec::parse("#fff #335577 #447799").is_err());
        assert!(ColorSpec::parse("#gggggg #335577 #447799").is_err());
        assert!(ColorSpec::parse("#ffffff #335577").is_err());
        assert!(ColorSpec::parse("#ffffff #335577 #447799 junk").is_err());
    }

    #[test]
    fn prefix_parse_returns_the_tail() {
        let (spec, rest) =
            ColorSpec::parse_prefix("#000000 #111111 #222222 cpu: 42%").expect("prefix");
        assert_eq!(spec.bg, 0x111111);
        assert_eq!(rest, " cpu: 42%");
    }
}
