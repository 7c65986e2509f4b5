use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use comfy_table::{presets, Cell, ContentArrangement, Table};
use thiserror::Error;

use crate::models::Recommendation;

const REPORT_FILE: &str = "recommendations.json";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("report serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write the ranked list as indented JSON, replacing any previous report.
pub fn write_json(recs: &[Recommendation], out_dir: &Path) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(REPORT_FILE);
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), recs)?;
    Ok(path)
}

/// Console table over the fixed report columns. The freshness-window title
/// line is printed by the caller above it.
pub fn render_table(recs: &[Recommendation]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Name"),
        Cell::new("TVL"),
        Cell::new("Vol24h"),
        Cell::new("Fees24h"),
        Cell::new("Vol/min"),
        Cell::new("Fees/min"),
        Cell::new("Move%"),
        Cell::new("Age(h)"),
        Cell::new("Score"),
        Cell::new("Strategy"),
        Cell::new("Hold"),
        Cell::new("Pair Address"),
    ]);

    for (idx, rec) in recs.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&rec.name),
            Cell::new(format!("{:.2}", rec.tvl)),
            Cell::new(format!("{:.2}", rec.volume_24h)),
            Cell::new(format!("{:.2}", rec.fees_24h)),
            Cell::new(format!("{:.2}", rec.vol_per_min)),
            Cell::new(format!("{:.2}", rec.fees_per_min)),
            Cell::new(format!("{:.2}", rec.move_pct)),
            Cell::new(format!("{:.1}", rec.age_hours)),
            Cell::new(format!("{:.1}", rec.score)),
            Cell::new(&rec.strategy),
            Cell::new(&rec.hold),
            Cell::new(&rec.pair_address),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rec(address: &str, score: f64) -> Recommendation {
        Recommendation {
            name: format!("POOL-{}", address),
            pair_address: address.to_string(),
            mint_x: String::new(),
            mint_y: String::new(),
            tvl: 10_000.0,
            volume_24h: 5_000.0,
            fees_24h: 50.0,
            current_price: 1.0,
            apr_24h: 0.0,
            apy_24h: 0.0,
            base_fee_pct: 0.0,
            bin_step: 0,
            vol_per_min: 3.47,
            fees_per_min: 0.03,
            move_pct: 0.0,
            age_hours: 0.1,
            is_new: true,
            score,
            strategy: "Bid-Ask (DCA style)".to_string(),
            hold: "2-8 hours (farm early chaos)".to_string(),
        }
    }

    #[test]
    fn write_json_creates_dir_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("out");
        let path = write_json(&[rec("p1", 30.0)], &out_dir).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let parsed: Vec<Recommendation> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].pair_address, "p1");
    }

    #[test]
    fn table_has_one_row_per_recommendation() {
        let table = render_table(&[rec("p1", 30.0), rec("p2", 20.0)]);
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("POOL-p1"));
        assert!(rendered.contains("Pair Address"));
    }
}
