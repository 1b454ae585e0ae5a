use anyhow::Result;

use connect_notify::cli::CliApp;

fn main() -> Result<()> {
    CliApp::run()
}
