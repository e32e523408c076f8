#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mindmatch_backend::run().await
}
