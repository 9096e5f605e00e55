use anyhow::Result;

fn main() -> Result<()> {
    api_client_migrate::run_cli()
}
