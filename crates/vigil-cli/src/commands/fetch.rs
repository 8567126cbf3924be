use vigil_config::VigilConfig;
use vigil_core::VigilError;

pub fn run(config: &VigilConfig) -> Result<(), VigilError> {
    let doc = super::source_client(config).fetch_document_or_fallback();
    println!("{}", serde_json::to_string_pretty(&doc).unwrap_or_default());
    Ok(())
}
