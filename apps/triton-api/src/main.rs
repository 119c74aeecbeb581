use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = triton_api::Args::parse();
	triton_api::run(args).await
}
