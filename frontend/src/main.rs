use despesas_frontend::config::AppConfig;
use despesas_frontend::logging;
use despesas_frontend::view::{App, AppProps};

fn main() {
    let config = AppConfig::from_env();
    logging::init(&config.log_filter);
    tracing::info!(api = config.api.base_url(), "starting expense tracker");

    yew::Renderer::<App>::with_props(AppProps { api: config.api }).render();
}
