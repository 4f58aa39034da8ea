use miette::*;
use rainview::{config::Config, RainStatusView};

#[tokio::main]
async fn main() -> Result<()> {
    let cpath = "./config.rainview.toml";
    let config = Config::read_or_default(cpath).await?;
    init_logging(config.log_level)?;
    log::info!("✅ read in config from {cpath}");

    let mut view = RainStatusView::new(&config).wrap_err("failed to set up the rain view")?;
    log::debug!("last rain endpoint: {}", view.url());

    view.initialize().await;
    view.wait().await;

    // request failures are already logged; show whatever we have
    let snapshot = view.teardown().await;
    println!("{}", snapshot.text);

    Ok(())
}

fn init_logging(level: log::LevelFilter) -> Result<()> {
    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::default()
            .add_filter_allow_str("rainview")
            .build(),
        Default::default(),
        simplelog::ColorChoice::Auto,
    )
    .into_diagnostic()
    .wrap_err("initialising logging failed")
}
