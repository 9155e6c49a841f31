//! Storage key generation
//!
//! A key is one uniform draw in `[0, 1)` scaled into `[2^40, 2^41)`,
//! rendered as hex, with the leading `1` dropped: always 10 hex digits.
//! Keys are storage handles, not secrets.

use std::sync::Mutex;
use thiserror::Error;

const KEY_SCALE: f64 = 1_099_511_627_776.0; // 0x10000000000

#[derive(Debug, Error)]
#[error("random source failed: {0}")]
pub struct RandomError(String);

/// A source of uniform draws in `[0, 1)`
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> Result<f64, RandomError>;
}

/// Draws from the operating system's entropy source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn next_f64(&self) -> Result<f64, RandomError> {
        let mut buf = [0u8; 8];
        getrandom::getrandom(&mut buf).map_err(|e| RandomError(e.to_string()))?;
        // 53 high bits give every representable step in [0, 1)
        Ok((u64::from_le_bytes(buf) >> 11) as f64 / (1u64 << 53) as f64)
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted (testing).
#[derive(Debug)]
pub struct FixedRandom {
    draws: Vec<f64>,
    next: Mutex<usize>,
}

impl FixedRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        Self {
            draws,
            next: Mutex::new(0),
        }
    }

    pub fn constant(draw: f64) -> Self {
        Self::new(vec![draw])
    }
}

impl RandomSource for FixedRandom {
    fn next_f64(&self) -> Result<f64, RandomError> {
        if self.draws.is_empty() {
            return Err(RandomError("no draws configured".to_string()));
        }
        let mut next = self
            .next
            .lock()
            .map_err(|_| RandomError("draw counter poisoned".to_string()))?;
        let draw = self.draws[*next % self.draws.len()];
        *next += 1;
        Ok(draw)
    }
}

/// Render a single draw as a storage key.
pub fn key_from_draw(draw: f64) -> String {
    let draw = if draw.is_finite() { draw.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = ((1.0 + draw) * KEY_SCALE).floor() as u64;
    // A draw of exactly 1.0 would carry into a 12th digit
    let scaled = scaled.min((KEY_SCALE as u64) * 2 - 1);
    let hex = format!("{:x}", scaled);
    hex[1..].to_string()
}

/// Draw a fresh storage key from `source`.
pub fn generate_key(source: &dyn RandomSource) -> Result<String, RandomError> {
    Ok(key_from_draw(source.next_f64()?))
}
