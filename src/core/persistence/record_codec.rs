//=========================================================================
// Part Record Codec
//=========================================================================
//
// Compact single-line text form of a part record.
//
// Layout:
//   <in_engine>|<part ordinal>|<p1> <p2> ... <pn>|<x>|<y>|<z>
//
// Booleans are written `True`/`False` and read case-insensitively.
// Floats use Rust's shortest round-trip formatting, which is locale
// independent and parses back to the identical bit pattern.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::PartType;
use crate::error::CodecError;

//=== Constants ===========================================================

const FIELD_SEPARATOR: char = '|';
const PARAM_SEPARATOR: char = ' ';
const FIELD_COUNT: usize = 6;

//=== PartRecord ==========================================================

/// Persistable projection of a live part.
///
/// `parameters` is empty for plain pickups and holds the condition value
/// for engine components. `storage_position` is the local position of the
/// storage slot and is zero for in-engine parts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartRecord {
    pub in_engine: bool,
    pub part_type: PartType,
    pub parameters: Vec<f32>,
    pub storage_position: Vec3,
}

impl PartRecord {
    /// Record for a part bolted into its engine mount.
    pub fn mounted(part_type: PartType, parameters: Vec<f32>) -> Self {
        Self {
            in_engine: true,
            part_type,
            parameters,
            storage_position: Vec3::ZERO,
        }
    }

    /// Record for a part resting in a storage slot.
    pub fn stored(part_type: PartType, parameters: Vec<f32>, storage_position: Vec3) -> Self {
        Self {
            in_engine: false,
            part_type,
            parameters,
            storage_position,
        }
    }

    /// Condition value, if the record carries one.
    pub fn condition(&self) -> Option<f32> {
        self.parameters.first().copied()
    }
}

//--- Encoding ------------------------------------------------------------

/// Encodes a record into its single-line form.
pub fn encode(record: &PartRecord) -> String {
    record.to_string()
}

impl fmt::Display for PartRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = if self.in_engine { "True" } else { "False" };
        write!(f, "{flag}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}", self.part_type.ordinal())?;

        for (i, value) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, "{PARAM_SEPARATOR}")?;
            }
            write!(f, "{value}")?;
        }

        let p = self.storage_position;
        write!(f, "{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}", p.x, p.y, p.z)
    }
}

//--- Decoding ------------------------------------------------------------

/// Decodes a single-line record.
///
/// # Errors
///
/// Returns [`CodecError::MalformedRecord`] if the field count is wrong or
/// any field fails to parse.
pub fn decode(line: &str) -> Result<PartRecord, CodecError> {
    line.parse()
}

impl FromStr for PartRecord {
    type Err = CodecError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(CodecError::malformed(
                line,
                format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
            ));
        }

        let in_engine = parse_bool(fields[0])
            .ok_or_else(|| CodecError::malformed(line, format!("bad flag `{}`", fields[0])))?;

        let ordinal: i32 = fields[1]
            .trim()
            .parse()
            .map_err(|_| CodecError::malformed(line, format!("bad part ordinal `{}`", fields[1])))?;
        let part_type = PartType::from_ordinal(ordinal)
            .ok_or_else(|| CodecError::malformed(line, format!("unknown part ordinal {ordinal}")))?;

        let parameters = fields[2]
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f32>()
                    .map_err(|_| CodecError::malformed(line, format!("bad parameter `{token}`")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let axis = |text: &str| {
            text.trim()
                .parse::<f32>()
                .map_err(|_| CodecError::malformed(line, format!("bad coordinate `{text}`")))
        };
        let storage_position = Vec3::new(axis(fields[3])?, axis(fields[4])?, axis(fields[5])?);

        Ok(Self {
            in_engine,
            part_type,
            parameters,
            storage_position,
        })
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
