//! Issue timestamp handling.

use crate::models::record::NOT_AVAILABLE;

/// Split a CFDI `Fecha` timestamp (`2025-11-27T20:15:41`) into date and time.
///
/// Both parts are `None` when the value is absent, is the sentinel, or has no `T`.
pub fn split_timestamp(fecha: Option<&str>) -> (Option<String>, Option<String>) {
    match fecha {
        Some(value) if value != NOT_AVAILABLE => match value.split_once('T') {
            Some((date, time)) => (Some(date.to_string()), Some(time.to_string())),
            None => (None, None),
        },
        _ => (None, None),
    }
}
