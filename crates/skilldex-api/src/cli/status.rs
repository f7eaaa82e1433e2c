//! Directory status command.

use anyhow::Result;
use console::style;

use skilldex_core::repository::member::MemberRepository;
use skilldex_core::repository::skill::SkillRepository;

use crate::state::AppState;

/// Display directory counts, data dir, and listener configuration.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let skills = state.skill_repo.count().await?;
    let members = state.member_repo.count().await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "skills": skills,
            "members": members,
            "listen": format!("{}:{}", state.config.host, state.config.port),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Skilldex v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("  Skills declared:   {}", style(skills).cyan());
    println!("  Members:           {}", style(members).cyan());
    println!(
        "  Data directory:    {}",
        style(state.data_dir.display()).dim()
    );
    println!(
        "  Listener:          {}",
        style(format!("{}:{}", state.config.host, state.config.port)).dim()
    );
    println!();

    Ok(())
}
