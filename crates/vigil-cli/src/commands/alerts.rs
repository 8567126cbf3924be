use tabled::{Table, Tabled};
use vigil_config::VigilConfig;
use vigil_core::VigilError;
use vigil_engine::ack::AckStore;
use vigil_engine::{visible, NormalizedLogRecord};

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Source IP")]
    src_ip: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Message")]
    message: String,
}

pub fn run(config: &VigilConfig, json: bool) -> Result<(), VigilError> {
    let (_, records) = super::fetch_normalized(config);
    let acks = AckStore::load(config.ack_store_path());

    let abnormal_total = records.iter().filter(|r| r.is_abnormal()).count();
    let shown: Vec<&NormalizedLogRecord> = visible(&records, &acks)
        .into_iter()
        .filter(|r| r.is_abnormal())
        .collect();
    let acknowledged = abnormal_total - shown.len();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown).unwrap_or_default());
        return Ok(());
    }

    println!(
        "[vigil] {} abnormal logs | {} acknowledged",
        shown.len(),
        acknowledged
    );

    if shown.is_empty() {
        println!("[vigil] No unacknowledged abnormal logs");
        return Ok(());
    }

    let rows: Vec<AlertRow> = shown
        .iter()
        .map(|r| AlertRow {
            id: r.id.clone(),
            time: r.time.clone(),
            src_ip: r.display.get("src_ip").cloned().unwrap_or_default(),
            reason: r.reason.clone(),
            message: super::truncate(&r.message, 60),
        })
        .collect();
    println!("{}", Table::new(rows));

    Ok(())
}
