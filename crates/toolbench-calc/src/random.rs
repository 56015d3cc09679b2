//! Random strings and numbers drawn from the OS CSPRNG.

use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use toolbench_core::{ToolbenchError, ToolbenchResult};

pub const MAX_STRING_LENGTH: usize = 4096;
pub const MAX_NUMBER_COUNT: usize = 10_000;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.<>?/~";

/// Characters easily confused with one another in most fonts.
pub const AMBIGUOUS: &str = "0Oo1lI";

/// Below this span, unique draws sample indices directly
const DENSE_SPAN: u128 = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharsetOptions {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub exclude_ambiguous: bool,
}

impl Default for CharsetOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: false,
            exclude_ambiguous: false,
        }
    }
}

impl CharsetOptions {
    /// The pool characters are drawn from, in a fixed order.
    pub fn alphabet(&self) -> Vec<char> {
        [
            (self.lowercase, LOWERCASE),
            (self.uppercase, UPPERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .flat_map(|(_, chars)| chars.chars())
        .filter(|c| !(self.exclude_ambiguous && AMBIGUOUS.contains(*c)))
        .collect()
    }
}

/// A string of `len` characters drawn uniformly from the selected classes.
pub fn random_string(len: usize, options: &CharsetOptions) -> ToolbenchResult<String> {
    if len == 0 || len > MAX_STRING_LENGTH {
        return Err(ToolbenchError::invalid(format!(
            "length must be between 1 and {MAX_STRING_LENGTH}"
        )));
    }
    let alphabet = options.alphabet();
    if alphabet.is_empty() {
        return Err(ToolbenchError::invalid(
            "select at least one character class",
        ));
    }

    let mut rng = OsRng;
    let out: String = (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect();
    tracing::debug!(len, pool = alphabet.len(), "generated random string");
    Ok(out)
}

/// `count` integers from the inclusive range `min..=max`.
///
/// With `unique`, no value repeats and the range must hold at least `count`
/// values. Output order is random either way.
pub fn random_numbers(min: i64, max: i64, count: usize, unique: bool) -> ToolbenchResult<Vec<i64>> {
    if min > max {
        return Err(ToolbenchError::invalid("minimum must not exceed maximum"));
    }
    if count == 0 || count > MAX_NUMBER_COUNT {
        return Err(ToolbenchError::invalid(format!(
            "count must be between 1 and {MAX_NUMBER_COUNT}"
        )));
    }
    let span = (i128::from(max) - i128::from(min) + 1) as u128;
    if unique && count as u128 > span {
        return Err(ToolbenchError::invalid(format!(
            "cannot draw {count} unique numbers from a range of {span}"
        )));
    }

    let mut rng = OsRng;
    let numbers = if !unique {
        (0..count).map(|_| rng.gen_range(min..=max)).collect()
    } else if span <= DENSE_SPAN {
        rand::seq::index::sample(&mut rng, span as usize, count)
            .into_iter()
            .map(|offset| min + offset as i64)
            .collect()
    } else {
        // Sparse range: collisions are rare, so rejection terminates quickly
        let mut seen = HashSet::with_capacity(count);
        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            let n = rng.gen_range(min..=max);
            if seen.insert(n) {
                out.push(n);
            }
        }
        out
    };
    tracing::debug!(min, max, count, unique, "generated random numbers");
    Ok(numbers)
}
