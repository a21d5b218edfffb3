use serde::{Deserialize, Serialize};

/// A colour as exported by the design tool: channels normalized to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}
impl Rgba {
    pub fn to_hex(&self) -> String {
        rgb_to_hex(self.r, self.g, self.b)
    }
}

/// Uppercase `RRGGBB` without a leading `#`.
///
/// Each channel is scaled to 255 and rounded half-to-even, independently.
///
/// Channels outside `0.0..=1.0` clamp to `00`/`FF` rather than printing the
/// raw rounded integer (`1.2` would be `132`), so the result is always six
/// digits.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    format!("{:02X}{:02X}{:02X}", channel(r), channel(g), channel(b))
}

fn channel(value: f64) -> u8 {
    (value * 255.0).round_ties_even() as u8
}

/// Last `/` separated segment of an alias path.
pub fn alias_suffix(alias: &str) -> &str {
    alias.rsplit('/').next().unwrap_or(alias)
}

#[test]
fn hex() {
    assert_eq!(rgb_to_hex(1.0, 0.0, 0.0), "FF0000");
    assert_eq!(rgb_to_hex(0.0, 0.0, 0.0), "000000");
    assert_eq!(rgb_to_hex(1.0, 1.0, 1.0), "FFFFFF");
    assert_eq!(rgb_to_hex(0.2, 0.4, 0.6), "336699");
    // 0.5 * 255 = 127.5 rounds to the even neighbour
    assert_eq!(rgb_to_hex(0.5, 0.5, 0.5), "808080");
    assert_eq!(
        Rgba {
            r: 0.9019607843137255,
            g: 0.8941176470588236,
            b: 0.8509803921568627,
            a: Some(1.0)
        }
        .to_hex(),
        "E6E4D9"
    );
}

#[test]
fn rounding_matches_byte_boundaries() {
    assert_eq!(channel(0.5), 128);
    assert_eq!(channel(0.498), 127);
    assert_eq!(channel(1.2), 255);
    assert_eq!(channel(-0.1), 0);
    assert_eq!(rgb_to_hex(1.2, -0.1, 0.5), "FF0080");
}

#[test]
fn alias() {
    assert_eq!(alias_suffix("color/background/primary"), "primary");
    assert_eq!(alias_suffix("primary"), "primary");
    assert_eq!(alias_suffix("base/"), "");
}
