//! Audits two models along one feature: build a probe, fit both models'
//! predictions and report the Epe metrics.
//!
//! Debug events from the library are printed through the fmt subscriber.

use epes::{
    compare_fits, fit_poly, make_probe, slice_plot, EpeConfig, NormOrder, ReferenceDataset,
    DEFAULT_LABELS, DEFAULT_PROBE_POINTS,
};

const TRAIN: &str = "\
age,income,city
23,31000,lyon
35,52000,paris
41,61000,paris
52,58000,lille
60,47000,paris
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Epe audit example ===\n");

    let reference = ReferenceDataset::from_reader(TRAIN.as_bytes())?;
    for col in reference.columns() {
        println!("reference {:<8} {:?}", col.name, col.value);
    }

    let probe = make_probe(&reference, "age", 18.0, 70.0, DEFAULT_PROBE_POINTS)?;
    let ages = probe.probe_values();
    let income = probe
        .column("income")
        .and_then(|c| c.as_numeric())
        .map(|v| v[0])
        .unwrap_or_default();

    // Stand-ins for two trained regressors evaluated on the probe
    let linear: Vec<f64> = ages.iter().map(|&a| 5.0 + 0.8 * a + income * 1e-4).collect();
    let curved: Vec<f64> = ages
        .iter()
        .map(|&a| 2.0 + 1.1 * a - 0.004 * a * a + income * 1e-4)
        .collect();

    println!("\n1. Fitted coefficients (degree 2):");
    println!("   A: {:?}", fit_poly(ages, &linear, 2)?.as_slice());
    println!("   B: {:?}", fit_poly(ages, &curved, 2)?.as_slice());

    println!("\n2. Metrics with default weights:");
    let m = compare_fits(ages, &linear, &curved, 2, &EpeConfig::default())?;
    println!("   phi = {:.6}, dphi = {:.6}, phi* = {:.6}", m.phi, m.dphi, m.phi_star);

    println!("\n3. Metrics under the maximum norm, equal weights:");
    let config = EpeConfig::default()
        .with_weights(0.5, 0.5)
        .with_norm(NormOrder::Infinity);
    let m = compare_fits(ages, &linear, &curved, 2, &config)?;
    println!("   phi = {:.6}, dphi = {:.6}, phi* = {:.6}", m.phi, m.dphi, m.phi_star);

    println!("\n4. Slice data (first rows):");
    let series = slice_plot(ages, &linear, &curved, probe.feature(), DEFAULT_LABELS)?;
    let mut out = Vec::new();
    series.write_csv(&mut out)?;
    for line in String::from_utf8(out)?.lines().take(6) {
        println!("   {}", line);
    }

    Ok(())
}
