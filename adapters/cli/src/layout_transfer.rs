#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use arcane_defenders_core::{CellCoord, TowerKind};
use arcane_defenders_world::{query, World};
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

const LAYOUT_DOMAIN: &str = "arcane";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "arcane:v1";
const FIELD_DELIMITER: char = ':';

/// Towers a player built on a map, with the tier each one reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TowerLayout {
    /// Columns of the map the layout was captured on.
    pub columns: u32,
    /// Rows of the map the layout was captured on.
    pub rows: u32,
    /// Towers in build order.
    pub towers: Vec<LayoutTower>,
}

impl TowerLayout {
    /// Captures the towers standing in the world, ordered by id.
    #[must_use]
    pub(crate) fn capture(world: &World) -> Self {
        let grid = query::grid(world);
        let mut towers: Vec<_> = query::towers(world)
            .map(|tower| {
                (
                    tower.id(),
                    LayoutTower {
                        kind: tower.kind(),
                        cell: tower.cell(),
                        tier: tower.level(),
                    },
                )
            })
            .collect();
        towers.sort_by_key(|(id, _)| *id);
        Self {
            columns: grid.columns(),
            rows: grid.rows(),
            towers: towers.into_iter().map(|(_, tower)| tower).collect(),
        }
    }

    /// Encodes the layout into a single line suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(&self.towers).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{LAYOUT_HEADER}:{}x{}:{encoded}",
            self.columns, self.rows
        ))
    }

    /// Decodes a layout from its transfer string.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let towers =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            columns,
            rows,
            towers,
        })
    }

    /// Reports whether the layout was captured on a map of the same size.
    #[must_use]
    pub(crate) fn fits(&self, columns: u32, rows: u32) -> bool {
        self.columns == columns && self.rows == rows
    }
}

/// One tower within a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LayoutTower {
    /// Type of the tower.
    pub kind: TowerKind,
    /// Build spot the tower stands on.
    pub cell: CellCoord,
    /// Zero-based upgrade tier to reach after placement.
    #[serde(default)]
    pub tier: usize,
}

/// Errors that can occur while decoding layout transfer strings.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The map dimensions were missing.
    MissingDimensions,
    /// The payload segment was missing.
    MissingPayload,
    /// The layout used an unexpected prefix.
    InvalidPrefix(String),
    /// The layout used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The map dimensions could not be parsed.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "layout string was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingDimensions => write!(f, "layout string is missing the map dimensions"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse map dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => write!(f, "could not decode layout payload: {error}"),
            Self::InvalidPayload(error) => write!(f, "could not read layout payload: {error}"),
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }
    Ok((columns, rows))
}
