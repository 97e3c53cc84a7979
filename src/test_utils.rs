//! Test utilities: forest generators and temporary input files.
//!
//! Only compiled with the `test-utils` feature, for tests and benchmarks.
//! Generated rows use integer ids starting at 1 and the integer root
//! sentinel `0`.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tempfile::TempDir;

use crate::record::{Record, record};

/// Rows for a forest given each node's parent.
///
/// Node `i + 1` gets `parents[i]` as its parent; `0` marks a root. Every row
/// also carries a `title` column.
pub fn forest_from_parents(parents: &[u64]) -> Vec<Record> {
    parents
        .iter()
        .enumerate()
        .map(|(i, &parent)| {
            let id = i as u64 + 1;
            record([
                ("id", json!(id)),
                ("parent", json!(parent)),
                ("title", json!(format!("Node {}", id))),
            ])
        })
        .collect()
}

/// A pseudo-random forest of `size` nodes, deterministic for a given seed.
///
/// Each node's parent is a lower id or the root sentinel, and the rows are
/// shuffled so that no row order can be relied on.
pub fn random_forest(size: usize, seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    let parents: Vec<u64> = (0..size as u64).map(|i| rng.gen_range(0..=i)).collect();
    let mut rows = forest_from_parents(&parents);
    rows.shuffle(&mut rng);
    rows
}

/// `roots` complete trees, each node having `width` children, `depth`
/// levels below the roots. Rows are in breadth-first order.
pub fn balanced_forest(roots: usize, width: usize, depth: u32) -> Vec<Record> {
    let mut parents: Vec<u64> = vec![0; roots];
    let mut level_start = 0;
    for _ in 0..depth {
        let level_end = parents.len();
        for parent in level_start..level_end {
            for _ in 0..width {
                parents.push(parent as u64 + 1);
            }
        }
        level_start = level_end;
    }
    forest_from_parents(&parents)
}

/// A rooted tree `1 -> 2 -> 4` plus a parent cycle `3 -> 5 -> 3` that no
/// root reaches.
pub fn detached_cycle() -> Vec<Record> {
    forest_from_parents(&[0, 1, 5, 2, 3])
}

/// Every node's parent exists, so there is no root at all.
pub fn rootless_cycle() -> Vec<Record> {
    forest_from_parents(&[3, 1, 2])
}

/// A temporary directory for input and config files.
///
/// The directory is removed when dropped.
pub struct TestInput {
    dir: TempDir,
}

impl TestInput {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `rows` as a JSON array.
    pub fn add_rows(&self, name: &str, rows: &[Record]) -> PathBuf {
        let content = serde_json::to_string_pretty(rows).expect("Failed to serialize rows");
        self.add_file(name, &content)
    }

    pub fn add_file(&self, name: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(name);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }
}

impl Default for TestInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Key;

    #[test]
    fn test_balanced_forest_size() {
        // 2 roots, 2 + 6 + 18 nodes below them
        assert_eq!(balanced_forest(2, 3, 2).len(), 2 + 6 + 18);
    }

    #[test]
    fn test_random_forest_is_deterministic() {
        assert_eq!(random_forest(50, 7), random_forest(50, 7));
        assert_eq!(random_forest(50, 7).len(), 50);
    }

    #[test]
    fn test_random_forest_seeds_differ() {
        assert_ne!(random_forest(50, 1), random_forest(50, 2));
    }

    #[test]
    fn test_random_forest_is_shuffled_permutation() {
        let rows = random_forest(30, 11);
        let mut ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_ne!(ids, (1..=30).collect::<Vec<_>>());
        ids.sort_unstable();
        assert_eq!(ids, (1..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_forest_parents_exist() {
        let rows = random_forest(40, 3);
        let ids: Vec<Key> = rows.iter().map(|r| Key::from_value(&r["id"]).unwrap()).collect();
        for row in &rows {
            let parent = Key::from_value(&row["parent"]).unwrap();
            assert!(parent == Key::Int(0) || ids.contains(&parent));
        }
    }

    #[test]
    fn test_input_writes_rows() {
        let input = TestInput::new();
        let path = input.add_rows("rows.json", &detached_cycle());
        let text = fs::read_to_string(path).unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 5);
    }
}
