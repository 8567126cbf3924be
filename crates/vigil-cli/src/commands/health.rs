use vigil_config::VigilConfig;
use vigil_core::VigilError;

pub fn run(config: &VigilConfig, json: bool) -> Result<(), VigilError> {
    let client = super::source_client(config);
    let probe = client.fetch_document();
    let status = if probe.is_ok() { "healthy" } else { "degraded" };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "status": status,
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "buckets": {
                    "raw": config.source.raw_alerts_url,
                    "results": config.source.base_url,
                }
            })
        );
        return Ok(());
    }

    match probe {
        Ok(doc) => {
            println!(
                "[vigil] Source healthy: {} ({} logs, summary {})",
                client.object_url(),
                doc.logs.len(),
                if doc.summary.is_some() { "present" } else { "missing" }
            );
        }
        Err(e) => {
            println!("[vigil] Source degraded: {e}");
        }
    }

    Ok(())
}
