use vigil_config::VigilConfig;
use vigil_core::VigilError;
use vigil_engine::summary::compute_summary;

pub fn run(config: &VigilConfig, json: bool) -> Result<(), VigilError> {
    let (doc, records) = super::fetch_normalized(config);

    // Documents without an upstream summary get one computed locally.
    let summary = doc
        .summary
        .clone()
        .unwrap_or_else(|| compute_summary(&records));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_default()
        );
        return Ok(());
    }

    if doc.is_fallback() {
        println!("[vigil] Upstream unavailable, showing fallback data");
    }

    println!("Threat Overview");
    println!("{}", summary.summary);
    if !summary.common_patterns.is_empty() {
        println!("Common Patterns: {}", summary.common_patterns.join(", "));
    }
    if !summary.key_findings.is_empty() {
        println!("Key Findings: {}", summary.key_findings.join(", "));
    }
    println!(
        "Total Logs: {} | Normal: {} | Abnormal: {}",
        summary.total_logs, summary.normal_logs, summary.abnormal_logs
    );

    if !doc.metrics.is_empty() {
        let anomalies: f64 = doc.metrics.iter().map(|m| m.anomalies).sum();
        println!(
            "Metrics: {} points, {} anomalies over the window",
            doc.metrics.len(),
            anomalies
        );
    }

    Ok(())
}
