//! Snapshotting the body set to JSON and back.
//!
//! The on-disk shape is an ordered array of
//! `{ "position": [x,y,z], "velocity": [x,y,z], "radius", "color": [r,g,b], "mass" }`
//! with no version field. Older saves that spell the vectors `pos`/`vel` are
//! read as well.
//!
//! Loading is fail-soft: a missing, unreadable or malformed save yields
//! `None`, and the caller starts from a fresh constellation instead.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Vec3;
use crate::error::PersistError;
use crate::models::bodies::{Body, BodySet, Rgb};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    #[serde(alias = "pos")]
    pub position: [f64; 3],
    #[serde(alias = "vel")]
    pub velocity: [f64; 3],
    pub radius: f64,
    pub color: Rgb,
    pub mass: f64,
}

impl BodyRecord {
    pub fn from_body(body: &Body) -> Self {
        Self {
            position: [body.position.x, body.position.y, body.position.z],
            velocity: [body.velocity.x, body.velocity.y, body.velocity.z],
            radius: body.radius(),
            color: body.color(),
            mass: body.mass(),
        }
    }

    /// Every number finite, radius and mass positive, colors in `[0, 1]`.
    pub fn is_valid(&self) -> bool {
        let finite = self
            .position
            .iter()
            .chain(self.velocity.iter())
            .chain([self.radius, self.mass].iter())
            .all(|v| v.is_finite());
        finite
            && self.radius > 0.0
            && self.mass > 0.0
            && self.color.iter().all(|c| (0.0..=1.0).contains(c))
    }

    /// `None` unless the record [`is_valid`](BodyRecord::is_valid).
    pub fn to_body(&self) -> Option<Body> {
        if !self.is_valid() {
            return None;
        }
        Some(Body::new(
            Vec3::from(self.position),
            Vec3::from(self.velocity),
            self.radius,
            self.color,
            Some(self.mass),
        ))
    }
}

/// Records in body order.
pub fn serialize(set: &BodySet) -> Vec<BodyRecord> {
    set.bodies().iter().map(BodyRecord::from_body).collect()
}

/// All-or-nothing: one bad record discards the whole snapshot.
pub fn deserialize(records: &[BodyRecord]) -> Option<Vec<Body>> {
    records.iter().map(BodyRecord::to_body).collect()
}

/// Refuses to encode a set that [`from_json`] could not read back, e.g. one
/// where a body has diverged to NaN.
pub fn to_json(set: &BodySet) -> Result<String, PersistError> {
    let records = serialize(set);
    if let Some(index) = records.iter().position(|r| !r.is_valid()) {
        return Err(PersistError::Unloadable { index });
    }
    Ok(serde_json::to_string_pretty(&records)?)
}

pub fn from_json(text: &str) -> Option<Vec<Body>> {
    match serde_json::from_str::<Vec<BodyRecord>>(text) {
        Ok(records) => {
            let bodies = deserialize(&records);
            if bodies.is_none() {
                log::warn!("discarding saved universe: a body record is out of range");
            }
            bodies
        }
        Err(e) => {
            log::warn!("discarding saved universe: {}", e);
            None
        }
    }
}

/// Write the snapshot to `path`, creating parent directories as needed.
pub fn save_universe(path: impl AsRef<Path>, set: &BodySet) -> Result<(), PersistError> {
    let path = path.as_ref();
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    let json = to_json(set)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, json).map_err(io_err)?;
    log::info!("saved {} bodies to {:?}", set.len(), path);
    Ok(())
}

/// Read a snapshot back. `None` means "no prior state".
pub fn load_universe(path: impl AsRef<Path>) -> Option<Vec<Body>> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no saved universe at {:?}", path);
            return None;
        }
        Err(e) => {
            log::warn!("unable to read {:?}: {}", path, e);
            return None;
        }
    };
    let bodies = from_json(&text)?;
    log::info!("loaded {} bodies from {:?}", bodies.len(), path);
    Some(bodies)
}
