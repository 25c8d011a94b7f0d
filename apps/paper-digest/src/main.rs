use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = paper_digest::Args::parse();

	paper_digest::run(args).await
}
