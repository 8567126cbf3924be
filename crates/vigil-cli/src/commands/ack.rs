use vigil_config::VigilConfig;
use vigil_core::VigilError;
use vigil_engine::ack::AckStore;
use vigil_engine::abnormal;

pub fn run(
    config: &VigilConfig,
    ids: Vec<String>,
    all: bool,
    json: bool,
) -> Result<(), VigilError> {
    let mut store = AckStore::load(config.ack_store_path());

    let targets: Vec<String> = if all {
        let (_, records) = super::fetch_normalized(config);
        abnormal(&records)
            .into_iter()
            .filter(|r| !store.is_acknowledged(&r.id))
            .map(|r| r.id.clone())
            .collect()
    } else {
        ids
    };

    let count = targets.len();
    store.acknowledge_all(targets)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "acknowledged": count, "total": store.len() })
        );
    } else if count == 0 {
        println!("[vigil] Nothing to acknowledge");
    } else {
        println!(
            "[vigil] Acknowledged {count} log(s) ({} total)",
            store.len()
        );
    }

    Ok(())
}
