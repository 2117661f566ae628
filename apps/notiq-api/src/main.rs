use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = notiq_api::Args::parse();

	notiq_api::run(args).await
}
