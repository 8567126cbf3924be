use vigil_api::ApiState;
use vigil_config::VigilConfig;
use vigil_core::VigilError;

pub fn run(config: &VigilConfig, port: Option<u16>) -> Result<(), VigilError> {
    let port = port.unwrap_or(config.api.port);
    let state = ApiState {
        client: super::source_client(config),
        raw_bucket: config.source.raw_alerts_url.clone(),
        results_bucket: config.source.base_url.clone(),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(vigil_api::start_server(port, state))
}
