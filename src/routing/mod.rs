/*!
 * Provider routers.
 *
 * A router resolves a logical driver name to a concrete provider, executes
 * it, and walks a deterministic fallback chain when it fails, so a single
 * provider outage does not fail the job. Three instances exist with
 * materially different failure policies:
 *
 * - [`text::TextRouter`] and [`voice::VoiceRouter`] make one pass through
 *   default + fallback chain and fail terminally on exhaustion.
 * - [`image::ImageRouter`] wraps the whole resolution in a bounded retry
 *   loop with a cooldown and writes a placeholder artifact instead of
 *   failing.
 */

use std::io;
use std::path::Path;

/// Build the fallback chain for a resolution.
///
/// The explicit fallback, if present, comes before the static preference
/// order; duplicates are removed preserving first-seen order; the default
/// driver is always excluded from its own chain.
pub fn build_fallback_chain<D>(default: D, explicit: Option<D>, static_order: &[D]) -> Vec<D>
where
    D: PartialEq + Copy,
{
    let mut chain: Vec<D> = Vec::with_capacity(static_order.len() + 1);

    let candidates = explicit.into_iter().chain(static_order.iter().copied());
    for driver in candidates {
        if driver != default && !chain.contains(&driver) {
            chain.push(driver);
        }
    }

    chain
}

/// Write a generated payload to its artifact location, creating parents
pub(crate) fn write_artifact(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
}

pub mod image;
pub mod text;
pub mod voice;
