use super::types::StudentRecord;
use crate::error::{LabError, LabResult};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

pub const NAMES: [&str; 10] = [
    "Münip Utandı",
    "Nağme Yarkın",
    "Aysun Gültekin",
    "Deniz Aksoy",
    "Ece Yıldırım",
    "Mehmet Karaca",
    "Elif Demir",
    "Ahmet Yılmaz",
    "Zeynep Kaya",
    "Can Koç",
];

pub const DEPARTMENTS: [&str; 7] = [
    "Classical Turkish Music",
    "Turkish Folk Music",
    "Computer Engineering",
    "Electrical Engineering",
    "Medicine",
    "Mathematics",
    "Physics",
];

/// Generates `count` students numbered `base, base + 1, ...`.
///
/// Each record consumes exactly two draws from the seeded generator: the name
/// index first, then the department index.
pub fn generate(count: usize, base: u64, seed: u64) -> LabResult<Vec<StudentRecord>> {
    if count == 0 {
        return Err(LabError::InvalidArgument(
            "dataset size must be greater than zero".to_string(),
        ));
    }
    let last_offset = u64::try_from(count - 1)
        .map_err(|_| LabError::InvalidArgument(format!("dataset size {} is too large", count)))?;
    if base.checked_add(last_offset).is_none() {
        return Err(LabError::InvalidArgument(format!(
            "student numbers starting at {} overflow for {} records",
            base, count
        )));
    }

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let records = (0..last_offset + 1)
        .map(|offset| {
            let name = NAMES[rng.gen_range(0..NAMES.len())];
            let department = DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())];
            StudentRecord::new((base + offset).to_string(), name, department)
        })
        .collect();

    Ok(records)
}
