use crate::installer;
use crate::models::WorkspaceConfig;
use crate::Result;
use colored::Colorize;
use std::env;

pub async fn run() -> Result<()> {
    let project_root = env::current_dir()?;
    let config = WorkspaceConfig::load(&project_root)?;

    installer::install_all(&config, &project_root)?;

    println!();
    println!("{}", "✅ Dependencies installed!".green().bold());
    Ok(())
}
