use anyhow::Result;
use tfx::cli::App;

#[tokio::main]
async fn main() -> Result<()> {
    let args = tfx::cli::Args::parse_args();
    let mut app = App::from_args(&args)?;

    app.run(args).await?;

    Ok(())
}
