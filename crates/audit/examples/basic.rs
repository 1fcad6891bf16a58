//! Basic example demonstrating a transaction audit
//!
//! Run with: cargo run --example basic -p audit

use audit::{AuditConfig, Auditor, CellValue, Contamination, Dataset, Outcome};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== audit Basic Example ===\n");

    let amounts = [
        1250.0, 189.5, 23.0, 1420.0, 310.0, 17.25, 112.0, 2890.0, 145.0, 0.0, 96.0, 1310.0,
        48.0, 250000.0, 175.0, 33.0, 1999.0, 120.0, 61.0, 1105.0,
    ];
    let mut dataset = Dataset::new(["id", "amount"]);
    for (i, &amount) in amounts.iter().enumerate() {
        dataset.push_row(vec![
            CellValue::Text(format!("INV-{:03}", i + 1)),
            CellValue::Number(amount),
        ])?;
    }

    let config = AuditConfig::builder()
        .contamination(Contamination::Fraction(0.05))
        .build()?;
    let report = Auditor::new(config)?.run(&dataset, "amount")?;

    println!(
        "Rows: {}  Columns: {}  Total: {:.2}\n",
        report.summary.row_count, report.summary.column_count, report.summary.column_total
    );

    // 1. First-digit test
    println!("1. Benford first-digit test ({} values)", report.analysed_rows);
    match &report.digits {
        Outcome::Completed(dist) => {
            for d in &dist.digits {
                println!(
                    "   {}  expected {:5.1}%  observed {:5.1}%",
                    d.digit,
                    d.expected * 100.0,
                    d.observed * 100.0
                );
            }
            println!("   MAD: {:.4}", dist.mad);
            if let Some(verdict) = report.verdict {
                println!("   Verdict: {}\n", verdict);
            }
        }
        Outcome::Failed(err) => println!("   {}\n", err),
    }

    // 2. Isolation forest
    println!("2. Isolation forest");
    match &report.outliers {
        Outcome::Completed(result) => {
            println!(
                "   {} of {} rows isolated",
                result.anomaly_count(),
                result.rows.len()
            );
            for row in result.anomalies() {
                println!(
                    "   row {:>3}  amount {:>12.2}  score {:.3}",
                    row.row_index, row.value, row.score
                );
            }
        }
        Outcome::Failed(err) => println!("   {}", err),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
