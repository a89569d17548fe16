use crate::launcher;
use crate::models::WorkspaceConfig;
use crate::Result;
use colored::Colorize;
use std::env;

pub async fn run() -> Result<()> {
    let project_root = env::current_dir()?;
    let config = WorkspaceConfig::load(&project_root)?;

    let prompts = launcher::prompt_files(&config, &project_root);
    if !prompts.is_empty() {
        println!("{}", "📋 Available task prompts:".cyan());
        for prompt in &prompts {
            println!("   {}/{}", config.prompts_dir.display(), prompt);
        }
        println!("   Reference one in your instruction to the agent.");
        println!();
    }

    println!(
        "{}",
        format!("🚀 Launching {}...", config.agent.command).cyan().bold()
    );

    let status = launcher::launch(&config, &project_root)?;

    if !status.success() {
        println!();
        println!("{}", format!("⚠️  Agent exited with {}", status).yellow());
    }
    Ok(())
}
