//! Single-call FFI for railsweep.
//!
//! Functions:
//! - `rail_placement_count` - how many placements a railway produces
//! - `rail_build` - takes a layout document, writes one railway's placements
//!
//! # Error Codes
//! - `0`: Success
//! - `-1`: Null pointer
//! - `-2`: Malformed input (bad JSON, bad parameters, non-UTF-8 name)
//! - `-3`: Buffer overflow (resize and retry)
//! - `-4`: Unknown command
//! - `-5`: Invalid segment
//! - `-6`: Unknown railway name
//!
//! Builds always start from the canonical frame, so the library's `-7`
//! (degenerate start frame) never crosses this boundary.

use std::ffi::{c_char, CStr};

use crate::sim::Frame;
use crate::track::{LayoutDocument, Path, RawPlacement, Track, TrackError};

pub const RAIL_OK: i32 = 0;
pub const RAIL_NULL_POINTER: i32 = -1;
pub const RAIL_BUFFER_OVERFLOW: i32 = -3;

/// Output buffers for one railway.
#[repr(C)]
pub struct RailOutput {
    pub placements: *mut RawPlacement,
    pub placements_capacity: usize,

    /// Optional; receives the frame after the last placement.
    pub end_frame: *mut Frame,

    /// Written by `rail_build`, also on buffer overflow.
    pub placements_count: *mut usize,
}

/// Number of placements `rail_build` would write, or a negative error code.
///
/// Only parses and validates the document; nothing is propagated.
///
/// # Safety
///
/// - `json` must be valid for reads of `json_len` bytes
/// - `name` must be a valid NUL-terminated string
#[no_mangle]
pub unsafe extern "C" fn rail_placement_count(
    json: *const u8,
    json_len: usize,
    name: *const c_char,
) -> i64 {
    if json.is_null() || name.is_null() {
        return RAIL_NULL_POINTER as i64;
    }
    let count = load(json, json_len, name)
        .and_then(|(document, name)| document.railway(name).map(Path::total_length));
    match count {
        Ok(count) => count as i64,
        Err(err) => err.code() as i64,
    }
}

/// Build one railway from a JSON layout document.
///
/// Single FFI call: document in → placements out. Placements are column-major
/// 4x4 matrices plus position, in path order.
///
/// # Safety
///
/// - `json` must be valid for reads of `json_len` bytes
/// - `name` must be a valid NUL-terminated string
/// - `output` must be a valid pointer to a `RailOutput` whose `placements`
///   buffer holds at least `placements_capacity` elements, and whose
///   `placements_count` is valid for writes
/// - `output.end_frame` may be null
#[no_mangle]
pub unsafe extern "C" fn rail_build(
    json: *const u8,
    json_len: usize,
    name: *const c_char,
    output: *mut RailOutput,
) -> i32 {
    if json.is_null() || name.is_null() || output.is_null() {
        return RAIL_NULL_POINTER;
    }
    let output = &mut *output;
    if output.placements_count.is_null()
        || (output.placements.is_null() && output.placements_capacity > 0)
    {
        return RAIL_NULL_POINTER;
    }

    let track = match build(json, json_len, name) {
        Ok(track) => track,
        Err(err) => return err.code(),
    };

    *output.placements_count = track.len();
    if track.len() > output.placements_capacity {
        return RAIL_BUFFER_OVERFLOW;
    }

    for (i, placement) in track.placements().iter().enumerate() {
        *output.placements.add(i) = RawPlacement::from(placement);
    }
    if !output.end_frame.is_null() {
        *output.end_frame = track.end_frame();
    }

    RAIL_OK
}

// --- Helpers ---

unsafe fn load<'a>(
    json: *const u8,
    json_len: usize,
    name: *const c_char,
) -> Result<(LayoutDocument, &'a str), TrackError> {
    let bytes = if json_len == 0 {
        &[][..]
    } else {
        std::slice::from_raw_parts(json, json_len)
    };
    let name = CStr::from_ptr(name)
        .to_str()
        .map_err(|e| TrackError::malformed("railway name", e.to_string()))?;

    Ok((LayoutDocument::from_slice(bytes)?, name))
}

unsafe fn build(json: *const u8, json_len: usize, name: *const c_char) -> Result<Track, TrackError> {
    let (document, name) = load(json, json_len, name)?;
    let path = document.railway(name)?;
    Track::from_canonical(path, &document.config)
}
