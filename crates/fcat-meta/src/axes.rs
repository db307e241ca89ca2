//! Variable font axes
//!
//! Reads `fvar` axis records into catalog descriptors. Axes whose range
//! is empty or inverted are dropped.

use crate::reader::FontHandle;
use crate::record::VariableAxisDescriptor;

/// Common registered axis tags
pub mod axis_tags {
    pub const WEIGHT: [u8; 4] = *b"wght";
    pub const WIDTH: [u8; 4] = *b"wdth";
    pub const SLANT: [u8; 4] = *b"slnt";
    pub const ITALIC: [u8; 4] = *b"ital";
    pub const OPTICAL_SIZE: [u8; 4] = *b"opsz";
}

/// Result of reading the `fvar` table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisExtraction {
    /// Whether an `fvar` table was parsed
    pub has_fvar: bool,
    /// Well-formed axes, in table order
    pub axes: Vec<VariableAxisDescriptor>,
    /// Tags of the axes that were dropped
    pub dropped: Vec<String>,
}

impl AxisExtraction {
    /// Whether any usable axis survived
    pub fn is_variable(&self) -> bool {
        self.has_fvar && !self.axes.is_empty()
    }
}

/// Human name of a registered axis, or the tag itself
pub fn axis_name(tag: &[u8; 4]) -> String {
    match tag {
        b"wght" => "Weight".to_string(),
        b"wdth" => "Width".to_string(),
        b"slnt" => "Slant".to_string(),
        b"ital" => "Italic".to_string(),
        b"opsz" => "Optical Size".to_string(),
        _ => String::from_utf8_lossy(tag).into_owned(),
    }
}

/// Build a descriptor, rejecting degenerate ranges
pub fn descriptor(tag: [u8; 4], min: f32, default: f32, max: f32) -> Option<VariableAxisDescriptor> {
    if !(min < max) || !(min..=max).contains(&default) {
        return None;
    }
    Some(VariableAxisDescriptor {
        human_name: axis_name(&tag),
        tag: String::from_utf8_lossy(&tag).into_owned(),
        min,
        max,
        default,
    })
}

/// Collect the variation axes of a font
pub fn extract(handle: &FontHandle<'_>) -> AxisExtraction {
    let Some(fvar) = handle.fvar() else {
        return AxisExtraction::default();
    };

    let mut extraction = AxisExtraction {
        has_fvar: true,
        ..Default::default()
    };
    for axis in fvar.axes {
        let tag = axis.tag.to_bytes();
        match descriptor(tag, axis.min_value, axis.def_value, axis.max_value) {
            Some(descriptor) => extraction.axes.push(descriptor),
            None => {
                tracing::debug!(
                    "Dropping degenerate axis {} ({}..{})",
                    axis.tag,
                    axis.min_value,
                    axis.max_value
                );
                extraction.dropped.push(axis.tag.to_string());
            }
        }
    }
    extraction
}

/// Range of the weight axis, if present
pub fn weight_range(axes: &[VariableAxisDescriptor]) -> Option<f32> {
    axes.iter()
        .find(|axis| axis.tag.as_bytes() == axis_tags::WEIGHT)
        .map(|axis| axis.max - axis.min)
}
