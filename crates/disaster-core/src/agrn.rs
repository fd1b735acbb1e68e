//! Australian Government Reference Number (AGRN) handling.
//!
//! The listing shows identifiers in several shapes: `"AGRN-1,023"`,
//! `"1023"`, or `"AGRN-1023"`. All of them collapse to one canonical key,
//! `AGRN-<digits>`, used for de-duplication and as the storage natural key.

/// Canonical prefix carried by every stored AGRN.
pub const AGRN_PREFIX: &str = "AGRN-";

/// Strips the `AGRN-` prefix and thousands separators, leaving the bare
/// reference (e.g. `"AGRN-1,023"` → `"1023"`).
#[must_use]
pub fn strip_agrn(raw: &str) -> String {
    raw.trim().replace(AGRN_PREFIX, "").replace(',', "")
}

/// Returns the canonical `AGRN-<digits>` form of `raw`.
///
/// Idempotent: normalizing an already-normalized key returns it unchanged.
#[must_use]
pub fn normalize_agrn(raw: &str) -> String {
    format!("{AGRN_PREFIX}{}", strip_agrn(raw))
}
