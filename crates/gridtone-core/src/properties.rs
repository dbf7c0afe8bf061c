//! Grading parameter model.
//!
//! [`ImageProperties`] is the complete set of grading parameters for one
//! image: eight global scalars, an optional LUT selector and eighteen
//! per-band HSL offsets (six [`Band`]s times hue/saturation/lightness).
//!
//! Values are stored in UI units (percent, degrees, raw offsets). The
//! grading kernel converts them to kernel units itself.
//!
//! # Wire Format
//!
//! Persistence exchanges the record as flat `name -> value` pairs
//! ([`ImageProperties::to_form`] / [`ImageProperties::from_form`]) or as a
//! flat JSON object via serde. In both forms a missing field takes its
//! default and an explicit `0` stays `0`.
//!
//! ```rust
//! use gridtone_core::{Field, ImageProperties};
//!
//! let mut props = ImageProperties::default();
//! props.set(Field::Brightness, 250.0); // clamped to the slider domain
//! assert_eq!(props.brightness, 200.0);
//!
//! let decoded = ImageProperties::from_form([("brightness", "0")]).unwrap();
//! assert_eq!(decoded.brightness, 0.0);
//! assert_eq!(decoded.contrast, 100.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};

/// A hue band targeted by the six-band HSL adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// Centered at 0°.
    Red,
    /// Centered at 30°.
    Orange,
    /// Centered at 60°.
    Yellow,
    /// Centered at 120°.
    Green,
    /// Centered at 240°.
    Blue,
    /// Centered at 300°.
    Magenta,
}

impl Band {
    /// All bands in evaluation order.
    pub const ALL: [Band; 6] = [
        Band::Red,
        Band::Orange,
        Band::Yellow,
        Band::Green,
        Band::Blue,
        Band::Magenta,
    ];

    /// Lowercase band name, used as the wire-name prefix.
    pub fn name(self) -> &'static str {
        match self {
            Band::Red => "red",
            Band::Orange => "orange",
            Band::Yellow => "yellow",
            Band::Green => "green",
            Band::Blue => "blue",
            Band::Magenta => "magenta",
        }
    }

    /// Band center in degrees.
    pub fn center_degrees(self) -> f32 {
        match self {
            Band::Red => 0.0,
            Band::Orange => 30.0,
            Band::Yellow => 60.0,
            Band::Green => 120.0,
            Band::Blue => 240.0,
            Band::Magenta => 300.0,
        }
    }

    /// Band center in radians.
    pub fn center_radians(self) -> f32 {
        self.center_degrees().to_radians()
    }

    /// Position of the band in [`Band::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One of the three offsets a band carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandChannel {
    /// Hue offset (radians in the kernel).
    Hue,
    /// Saturation offset.
    Saturation,
    /// Lightness offset.
    Lightness,
}

impl BandChannel {
    /// All channels in wire order.
    pub const ALL: [BandChannel; 3] = [
        BandChannel::Hue,
        BandChannel::Saturation,
        BandChannel::Lightness,
    ];

    fn name(self) -> &'static str {
        match self {
            BandChannel::Hue => "hue",
            BandChannel::Saturation => "saturation",
            BandChannel::Lightness => "lightness",
        }
    }
}

/// Hue/saturation/lightness offsets of one band.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandAdjust {
    /// Hue offset
    pub hue: f32,
    /// Saturation offset
    pub saturation: f32,
    /// Lightness offset
    pub lightness: f32,
}

impl BandAdjust {
    /// Returns `true` when all three offsets are zero.
    pub fn is_zero(&self) -> bool {
        self.hue == 0.0 && self.saturation == 0.0 && self.lightness == 0.0
    }
}

/// A numeric field of [`ImageProperties`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Exposure multiplier, percent.
    Brightness,
    /// Contrast around mid-grey, percent.
    Contrast,
    /// Saturation around luma, percent.
    Saturation,
    /// Global hue rotation, degrees.
    Hue,
    /// Fine detail gain.
    Sharpness,
    /// Midtone local-contrast gain.
    Structure,
    /// Vignette darkness extent.
    VignetteSize,
    /// Vignette falloff offset.
    VignetteSharpness,
    /// Per-band HSL offset.
    Band(Band, BandChannel),
}

const GLOBALS: [Field; 8] = [
    Field::Brightness,
    Field::Contrast,
    Field::Saturation,
    Field::Hue,
    Field::Sharpness,
    Field::Structure,
    Field::VignetteSize,
    Field::VignetteSharpness,
];

impl Field {
    /// Number of numeric fields.
    pub const COUNT: usize = 26;

    /// Iterates every numeric field: the globals, then bands in
    /// [`Band::ALL`] order with hue/saturation/lightness each.
    pub fn all() -> impl Iterator<Item = Field> {
        GLOBALS.into_iter().chain(
            Band::ALL
                .into_iter()
                .flat_map(|b| BandChannel::ALL.into_iter().map(move |c| Field::Band(b, c))),
        )
    }

    /// Wire name, e.g. `"brightness"` or `"orange_lightness"`.
    pub fn name(self) -> String {
        match self {
            Field::Brightness => "brightness".into(),
            Field::Contrast => "contrast".into(),
            Field::Saturation => "saturation".into(),
            Field::Hue => "hue".into(),
            Field::Sharpness => "sharpness".into(),
            Field::Structure => "structure".into(),
            Field::VignetteSize => "vignette_size".into(),
            Field::VignetteSharpness => "vignette_sharpness".into(),
            Field::Band(b, c) => format!("{}_{}", b.name(), c.name()),
        }
    }

    /// Looks a field up by wire name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::all().find(|f| f.name() == name)
    }

    /// Slider domain `(min, max)`.
    pub fn range(self) -> (f32, f32) {
        match self {
            Field::Brightness
            | Field::Contrast
            | Field::Saturation
            | Field::Sharpness
            | Field::Structure => (0.0, 200.0),
            Field::Hue => (0.0, 360.0),
            Field::VignetteSize | Field::VignetteSharpness => (0.0, 1.0),
            Field::Band(..) => (-0.5, 0.5),
        }
    }

    /// Default value.
    pub fn default_value(self) -> f32 {
        match self {
            Field::Brightness | Field::Contrast | Field::Saturation => 100.0,
            _ => 0.0,
        }
    }

    /// Slider step.
    pub fn step(self) -> f32 {
        match self {
            Field::VignetteSize | Field::VignetteSharpness => 0.01,
            Field::Band(..) => 0.001,
            _ => 1.0,
        }
    }
}

/// The complete grading parameter set for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageProperties {
    /// Exposure multiplier, percent (default 100)
    pub brightness: f32,
    /// Contrast, percent (default 100)
    pub contrast: f32,
    /// Saturation, percent (default 100)
    pub saturation: f32,
    /// Global hue rotation, degrees
    pub hue: f32,
    /// Fine detail gain
    pub sharpness: f32,
    /// Midtone local-contrast gain
    pub structure: f32,
    /// Vignette darkness extent
    pub vignette_size: f32,
    /// Vignette falloff offset
    pub vignette_sharpness: f32,
    /// Selected LUT name, `None` for no LUT
    pub lut: Option<String>,

    #[allow(missing_docs)]
    pub red_hue: f32,
    #[allow(missing_docs)]
    pub red_saturation: f32,
    #[allow(missing_docs)]
    pub red_lightness: f32,
    #[allow(missing_docs)]
    pub orange_hue: f32,
    #[allow(missing_docs)]
    pub orange_saturation: f32,
    #[allow(missing_docs)]
    pub orange_lightness: f32,
    #[allow(missing_docs)]
    pub yellow_hue: f32,
    #[allow(missing_docs)]
    pub yellow_saturation: f32,
    #[allow(missing_docs)]
    pub yellow_lightness: f32,
    #[allow(missing_docs)]
    pub green_hue: f32,
    #[allow(missing_docs)]
    pub green_saturation: f32,
    #[allow(missing_docs)]
    pub green_lightness: f32,
    #[allow(missing_docs)]
    pub blue_hue: f32,
    #[allow(missing_docs)]
    pub blue_saturation: f32,
    #[allow(missing_docs)]
    pub blue_lightness: f32,
    #[allow(missing_docs)]
    pub magenta_hue: f32,
    #[allow(missing_docs)]
    pub magenta_saturation: f32,
    #[allow(missing_docs)]
    pub magenta_lightness: f32,
}

impl Default for ImageProperties {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            hue: 0.0,
            sharpness: 0.0,
            structure: 0.0,
            vignette_size: 0.0,
            vignette_sharpness: 0.0,
            lut: None,
            red_hue: 0.0,
            red_saturation: 0.0,
            red_lightness: 0.0,
            orange_hue: 0.0,
            orange_saturation: 0.0,
            orange_lightness: 0.0,
            yellow_hue: 0.0,
            yellow_saturation: 0.0,
            yellow_lightness: 0.0,
            green_hue: 0.0,
            green_saturation: 0.0,
            green_lightness: 0.0,
            blue_hue: 0.0,
            blue_saturation: 0.0,
            blue_lightness: 0.0,
            magenta_hue: 0.0,
            magenta_saturation: 0.0,
            magenta_lightness: 0.0,
        }
    }
}

/// Wire name of the LUT selector.
pub const LUT_FIELD: &str = "lut";

/// Parses a LUT selector value; `""`, `"none"` and `"null"` mean no LUT.
pub fn parse_lut_name(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("none") || v.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(v.to_string())
    }
}

impl ImageProperties {
    fn band_slots(&self, band: Band) -> [&f32; 3] {
        match band {
            Band::Red => [&self.red_hue, &self.red_saturation, &self.red_lightness],
            Band::Orange => [&self.orange_hue, &self.orange_saturation, &self.orange_lightness],
            Band::Yellow => [&self.yellow_hue, &self.yellow_saturation, &self.yellow_lightness],
            Band::Green => [&self.green_hue, &self.green_saturation, &self.green_lightness],
            Band::Blue => [&self.blue_hue, &self.blue_saturation, &self.blue_lightness],
            Band::Magenta => [&self.magenta_hue, &self.magenta_saturation, &self.magenta_lightness],
        }
    }

    fn band_slots_mut(&mut self, band: Band) -> [&mut f32; 3] {
        match band {
            Band::Red => [&mut self.red_hue, &mut self.red_saturation, &mut self.red_lightness],
            Band::Orange => [
                &mut self.orange_hue,
                &mut self.orange_saturation,
                &mut self.orange_lightness,
            ],
            Band::Yellow => [
                &mut self.yellow_hue,
                &mut self.yellow_saturation,
                &mut self.yellow_lightness,
            ],
            Band::Green => [
                &mut self.green_hue,
                &mut self.green_saturation,
                &mut self.green_lightness,
            ],
            Band::Blue => [&mut self.blue_hue, &mut self.blue_saturation, &mut self.blue_lightness],
            Band::Magenta => [
                &mut self.magenta_hue,
                &mut self.magenta_saturation,
                &mut self.magenta_lightness,
            ],
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut f32 {
        match field {
            Field::Brightness => &mut self.brightness,
            Field::Contrast => &mut self.contrast,
            Field::Saturation => &mut self.saturation,
            Field::Hue => &mut self.hue,
            Field::Sharpness => &mut self.sharpness,
            Field::Structure => &mut self.structure,
            Field::VignetteSize => &mut self.vignette_size,
            Field::VignetteSharpness => &mut self.vignette_sharpness,
            Field::Band(b, c) => {
                let [h, s, l] = self.band_slots_mut(b);
                match c {
                    BandChannel::Hue => h,
                    BandChannel::Saturation => s,
                    BandChannel::Lightness => l,
                }
            }
        }
    }

    /// Returns the stored value of a numeric field.
    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::Brightness => self.brightness,
            Field::Contrast => self.contrast,
            Field::Saturation => self.saturation,
            Field::Hue => self.hue,
            Field::Sharpness => self.sharpness,
            Field::Structure => self.structure,
            Field::VignetteSize => self.vignette_size,
            Field::VignetteSharpness => self.vignette_sharpness,
            Field::Band(b, c) => {
                let [h, s, l] = self.band_slots(b);
                *match c {
                    BandChannel::Hue => h,
                    BandChannel::Saturation => s,
                    BandChannel::Lightness => l,
                }
            }
        }
    }

    /// Sets a numeric field, clamping to its slider domain.
    ///
    /// Non-finite input leaves the field unchanged.
    pub fn set(&mut self, field: Field, value: f32) {
        if !value.is_finite() {
            return;
        }
        let (lo, hi) = field.range();
        *self.slot_mut(field) = value.clamp(lo, hi);
    }

    /// Sets a numeric field without clamping.
    ///
    /// Used when restoring persisted records, which must round-trip as-is.
    pub fn set_raw(&mut self, field: Field, value: f32) {
        *self.slot_mut(field) = value;
    }

    /// Returns the offsets of one band.
    pub fn band(&self, band: Band) -> BandAdjust {
        let [h, s, l] = self.band_slots(band);
        BandAdjust {
            hue: *h,
            saturation: *s,
            lightness: *l,
        }
    }

    /// Replaces the offsets of one band (unclamped).
    pub fn set_band(&mut self, band: Band, adjust: BandAdjust) {
        let [h, s, l] = self.band_slots_mut(band);
        *h = adjust.hue;
        *s = adjust.saturation;
        *l = adjust.lightness;
    }

    /// Returns `true` if the field differs from its default.
    pub fn is_modified(&self, field: Field) -> bool {
        self.get(field) != field.default_value()
    }

    /// Fields whose values differ from their defaults.
    pub fn modified_fields(&self) -> Vec<Field> {
        Field::all().filter(|&f| self.is_modified(f)).collect()
    }

    /// Returns `true` if every field holds its default and no LUT is set.
    pub fn is_default(&self) -> bool {
        self.lut.is_none() && Field::all().all(|f| !self.is_modified(f))
    }

    /// Encodes the record as flat `name -> value` pairs.
    ///
    /// Numbers use the shortest representation that parses back to the same
    /// `f32`. A missing LUT is written as an empty string.
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = Field::all()
            .map(|f| (f.name(), self.get(f).to_string()))
            .collect();
        out.push((LUT_FIELD.to_string(), self.lut.clone().unwrap_or_default()));
        out
    }

    /// Decodes flat `name -> value` pairs.
    ///
    /// Keys that are not parameter fields are ignored, so a whole upload form
    /// can be passed in. Missing or empty numeric fields take their default;
    /// explicit zeros are kept. Values are not clamped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] for a value that is not a finite number.
    pub fn from_form<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut props = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key == LUT_FIELD {
                props.lut = parse_lut_name(value);
                continue;
            }
            let Some(field) = Field::from_name(key) else {
                trace!(key, "ignoring non-parameter form key");
                continue;
            };
            let raw = value.trim();
            if raw.is_empty() {
                continue;
            }
            let parsed: f32 = raw
                .parse()
                .map_err(|_| Error::invalid_field(key, value))?;
            if !parsed.is_finite() {
                return Err(Error::invalid_field(key, value));
            }
            props.set_raw(field, parsed);
        }
        Ok(props)
    }

    /// Applies a single `name=value` assignment with slider clamping.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownField`] for an unknown name, [`Error::InvalidField`]
    /// for a non-numeric value.
    pub fn assign(&mut self, name: &str, value: &str) -> Result<()> {
        if name == LUT_FIELD {
            self.lut = parse_lut_name(value);
            return Ok(());
        }
        let field = Field::from_name(name).ok_or_else(|| Error::UnknownField(name.to_string()))?;
        let parsed: f32 = value
            .trim()
            .parse()
            .map_err(|_| Error::invalid_field(name, value))?;
        if !parsed.is_finite() {
            return Err(Error::invalid_field(name, value));
        }
        self.set(field, parsed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_table_is_complete() {
        assert_eq!(Field::all().count(), Field::COUNT);
        let names: std::collections::HashSet<String> = Field::all().map(Field::name).collect();
        assert_eq!(names.len(), Field::COUNT);
        assert!(names.contains("magenta_lightness"));
        assert!(names.contains("vignette_sharpness"));
    }

    #[test]
    fn defaults_match_table() {
        let p = ImageProperties::default();
        for f in Field::all() {
            assert_eq!(p.get(f), f.default_value(), "{}", f.name());
        }
        assert!(p.lut.is_none());
        assert!(p.is_default());
    }

    #[test]
    fn set_clamps_to_slider_domain() {
        let mut p = ImageProperties::default();
        p.set(Field::Hue, 400.0);
        assert_eq!(p.hue, 360.0);
        p.set(Field::Band(Band::Green, BandChannel::Saturation), -2.0);
        assert_eq!(p.green_saturation, -0.5);
        p.set(Field::Contrast, f32::NAN);
        assert_eq!(p.contrast, 100.0);
    }

    #[test]
    fn band_accessor_maps_named_fields() {
        let mut p = ImageProperties::default();
        p.set_band(
            Band::Blue,
            BandAdjust {
                hue: 0.1,
                saturation: -0.2,
                lightness: 0.3,
            },
        );
        assert_eq!(p.blue_hue, 0.1);
        assert_eq!(p.blue_saturation, -0.2);
        assert_eq!(p.blue_lightness, 0.3);
        assert!(p.band(Band::Red).is_zero());
        assert_eq!(p.get(Field::Band(Band::Blue, BandChannel::Lightness)), 0.3);
    }

    #[test]
    fn modified_fields_tracks_edits() {
        let mut p = ImageProperties::default();
        p.brightness = 150.0;
        p.orange_hue = 0.01;
        assert_eq!(
            p.modified_fields(),
            vec![Field::Brightness, Field::Band(Band::Orange, BandChannel::Hue)]
        );
        assert!(!p.is_default());
    }

    #[test]
    fn form_round_trip_preserves_values() {
        let mut p = ImageProperties::default();
        p.brightness = 0.0;
        p.hue = 123.0;
        p.vignette_size = 0.37;
        p.magenta_lightness = -0.123;
        p.lut = Some("vivid".into());
        let back = ImageProperties::from_form(p.to_form()).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn form_missing_fields_default_and_zero_is_kept() {
        let p = ImageProperties::from_form([("contrast", "0"), ("post_id", "abc")]).unwrap();
        assert_eq!(p.contrast, 0.0);
        assert_eq!(p.brightness, 100.0);
        assert_eq!(p.saturation, 100.0);
    }

    #[test]
    fn form_rejects_non_numeric() {
        let err = ImageProperties::from_form([("brightness", "bright")]).unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "brightness"));
        assert!(ImageProperties::from_form([("hue", "inf")]).is_err());
    }

    #[test]
    fn lut_none_spellings() {
        for v in ["", "none", "null", "None"] {
            let p = ImageProperties::from_form([("lut", v)]).unwrap();
            assert!(p.lut.is_none(), "{v:?}");
        }
    }

    #[test]
    fn json_is_flat_and_defaults_missing() {
        let p: ImageProperties = serde_json::from_str(r#"{"brightness": 0, "lut": "film"}"#).unwrap();
        assert_eq!(p.brightness, 0.0);
        assert_eq!(p.contrast, 100.0);
        assert_eq!(p.lut.as_deref(), Some("film"));
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("red_hue").is_some());
    }

    #[test]
    fn assign_parses_and_clamps() {
        let mut p = ImageProperties::default();
        p.assign("saturation", "500").unwrap();
        assert_eq!(p.saturation, 200.0);
        assert!(matches!(p.assign("gamma", "1"), Err(Error::UnknownField(_))));
        p.assign("lut", "none").unwrap();
        assert!(p.lut.is_none());
    }
}
