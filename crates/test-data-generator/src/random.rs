//! Random primitives.
//!
//! Bounded generators use an inclusive lower and exclusive upper bound.

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;

/// Length of strings produced by [`default_string`].
pub const DEFAULT_STRING_LENGTH: usize = 16;

/// Exclusive upper bound of generated characters; keeps clear of the surrogate range.
const CHARACTER_UPPER_BOUND: u32 = 0xD800;

pub fn boolean<R: Rng>(rng: &mut R) -> bool {
    rng.gen_bool(0.5)
}

/// Random byte in `[0, i8::MAX)`.
pub fn byte<R: Rng>(rng: &mut R) -> i8 {
    rng.gen_range(0..i8::MAX)
}

/// Random short in `[0, i16::MAX)`.
pub fn short<R: Rng>(rng: &mut R) -> i16 {
    rng.gen_range(0..i16::MAX)
}

/// Random integer in `[0, i32::MAX)`.
pub fn integer<R: Rng>(rng: &mut R) -> i32 {
    integer_in(rng, 0, i32::MAX)
}

/// Random integer in `[lower, upper)`.
pub fn integer_in<R: Rng>(rng: &mut R, lower: i32, upper: i32) -> i32 {
    rng.gen_range(lower..upper)
}

/// Random long in `[0, i64::MAX)`.
pub fn long<R: Rng>(rng: &mut R) -> i64 {
    rng.gen_range(0..i64::MAX)
}

/// Random float in `[0, f32::MAX)`.
pub fn float<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..f32::MAX)
}

/// Random double in `[0, f64::MAX)`.
pub fn double<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..f64::MAX)
}

/// Random character below the surrogate range.
pub fn character<R: Rng>(rng: &mut R) -> char {
    let code = rng.gen_range(0..CHARACTER_UPPER_BOUND);
    char::from_u32(code).unwrap_or('\0')
}

/// Random alphanumeric string of the given length.
pub fn string<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Random alphanumeric string of [`DEFAULT_STRING_LENGTH`] characters.
pub fn default_string<R: Rng>(rng: &mut R) -> String {
    string(rng, DEFAULT_STRING_LENGTH)
}

/// Number of items for a collection, in `[min, max]` inclusive.
pub fn items_count<R: Rng>(rng: &mut R, min: usize, max: usize) -> usize {
    rng.gen_range(min..=max)
}

/// Random index into a slice of `len` items, `None` when empty.
pub fn index<R: Rng>(rng: &mut R, len: usize) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}

/// Random item of a slice, `None` when empty.
pub fn item<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}
