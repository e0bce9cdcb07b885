use tasvideos_api::PublicationsModule;
use tasvideos_core::logging::init_logging_with_format;
use tasvideos_core::{App, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_logging_with_format(config.log_format);

    App::with_config(config)
        .await?
        .mount_module(PublicationsModule)
        .run()
        .await
}
