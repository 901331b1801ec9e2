use sha2::{Digest, Sha256};

use crate::{Media, MediaError, MediaResult};

/// Maps a media to the directory prefix its artifacts are stored under.
///
/// The prefix must be stable for the lifetime of the media: every key is
/// recomputed from it rather than persisted.
pub trait PathGenerator: Send + Sync {
    fn path_for(&self, media: &Media) -> MediaResult<String>;
}

/// Shards media into `{context}/{first:04}/{second:02}`.
///
/// Numeric ids are split by magnitude so that each directory holds at most
/// `second_level` media per `first_level` block. Other ids are spread by the
/// leading hex digits of their SHA-256 digest.
#[derive(Debug, Clone)]
pub struct DefaultPathGenerator {
    first_level: u64,
    second_level: u64,
}

impl Default for DefaultPathGenerator {
    fn default() -> Self {
        Self {
            first_level: 100_000,
            second_level: 1_000,
        }
    }
}

impl DefaultPathGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom shard sizes; `second_level` must not exceed `first_level`
    pub fn with_levels(first_level: u64, second_level: u64) -> MediaResult<Self> {
        if first_level == 0 || second_level == 0 || second_level > first_level {
            return Err(MediaError::config(format!(
                "invalid shard levels {}/{}",
                first_level, second_level
            )));
        }
        Ok(Self {
            first_level,
            second_level,
        })
    }
}

impl PathGenerator for DefaultPathGenerator {
    fn path_for(&self, media: &Media) -> MediaResult<String> {
        let id = media
            .id
            .as_ref()
            .ok_or_else(|| MediaError::precondition("media has no id yet"))?;

        match id.as_str().parse::<u64>() {
            Ok(n) => {
                let first = n / self.first_level;
                let second = (n - first * self.first_level) / self.second_level;
                Ok(format!("{}/{:04}/{:02}", media.context, first + 1, second + 1))
            }
            Err(_) => {
                let digest = format!("{:x}", Sha256::digest(id.as_str().as_bytes()));
                Ok(format!("{}/{}/{}", media.context, &digest[0..4], &digest[4..6]))
            }
        }
    }
}

/// Stores every media of a context in one flat directory
#[derive(Debug, Clone, Default)]
pub struct ContextPathGenerator;

impl PathGenerator for ContextPathGenerator {
    fn path_for(&self, media: &Media) -> MediaResult<String> {
        Ok(media.context.clone())
    }
}
