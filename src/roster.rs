//! Roster import: player names in seed order from CSV (`name` column, optional `seed` column).

use crate::models::TournamentError;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    seed: Option<u32>,
}

/// Read player names ordered by seed. Without a `seed` column the file order is the seeding;
/// with one, every row needs a seed and the seeds must be exactly `1..=N`.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<String>, TournamentError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (i, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record
            .map_err(|e| TournamentError::validation(format!("roster row {}: {}", i + 1, e)))?;
        rows.push(row);
    }

    let seeded = rows.iter().filter(|r| r.seed.is_some()).count();
    if seeded == 0 {
        return Ok(rows.into_iter().map(|r| r.name).collect());
    }
    if seeded != rows.len() {
        return Err(TournamentError::validation("either every roster row has a seed or none does"));
    }

    let expected: HashSet<u32> = (1..=rows.len() as u32).collect();
    let given: HashSet<u32> = rows.iter().filter_map(|r| r.seed).collect();
    if given != expected {
        return Err(TournamentError::validation(format!(
            "roster seeds must be 1..={} without gaps or repeats",
            rows.len()
        )));
    }
    rows.sort_by_key(|r| r.seed);
    Ok(rows.into_iter().map(|r| r.name).collect())
}
