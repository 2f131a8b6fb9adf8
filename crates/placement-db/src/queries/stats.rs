use std::fmt::Write;

use anyhow::{Result, anyhow};
use placement_types::models::PackageBucket;

use crate::Database;
use crate::models::{PlacementSummary, TopCompanyRow};

impl Database {
    pub fn placement_summary(&self) -> Result<PlacementSummary> {
        self.with_conn(|conn| {
            let summary = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM students),
                    (SELECT COUNT(DISTINCT student_id) FROM placements),
                    (SELECT AVG(package_lpa) FROM placements),
                    (SELECT MAX(package_lpa) FROM placements),
                    (SELECT COUNT(*) FROM companies)",
                [],
                |row| {
                    Ok(PlacementSummary {
                        total_students: row.get(0)?,
                        placed_students: row.get(1)?,
                        avg_package: row.get(2)?,
                        max_package: row.get(3)?,
                        companies: row.get(4)?,
                    })
                },
            )?;
            Ok(summary)
        })
    }

    pub fn count_placements(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM placements", [], |row| row.get(0))?)
        })
    }

    /// Placement counts per [`PackageBucket`], indexed by `PackageBucket::index`.
    pub fn package_histogram(&self) -> Result<[u64; 5]> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} AS bucket, COUNT(*) FROM placements GROUP BY bucket",
                bucket_case("package_lpa")
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut counts = [0u64; 5];
            for (bucket, count) in rows {
                let slot = usize::try_from(bucket)
                    .ok()
                    .and_then(|i| counts.get_mut(i))
                    .ok_or_else(|| anyhow!("bucket index {} out of range", bucket))?;
                *slot = count as u64;
            }
            Ok(counts)
        })
    }

    /// First `limit` companies in insertion order with their placement count.
    pub fn top_companies(&self, limit: u32) -> Result<Vec<TopCompanyRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.name, c.avg_package, c.difficulty, COUNT(p.id)
                 FROM companies c
                 LEFT JOIN placements p ON p.company_id = c.id
                 GROUP BY c.id
                 ORDER BY c.rowid
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], |row| {
                    Ok(TopCompanyRow {
                        name: row.get(0)?,
                        avg_package: row.get(1)?,
                        difficulty: row.get(2)?,
                        hired: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

/// SQL `CASE` mapping a package column to its bucket index, built from
/// `PackageBucket::BOUNDS` so SQL and Rust agree on the ranges.
fn bucket_case(column: &str) -> String {
    let mut sql = String::from("CASE");
    for (idx, bound) in PackageBucket::BOUNDS.iter().enumerate() {
        let _ = write!(sql, " WHEN {} < {:?} THEN {}", column, bound, idx);
    }
    let _ = write!(sql, " ELSE {} END", PackageBucket::BOUNDS.len());
    sql
}
