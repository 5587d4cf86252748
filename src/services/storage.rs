use crate::domain::models::GuildState;
use std::path::PathBuf;

pub fn audit(action: &str, data: serde_json::Value) {
    let path = match config_dir() {
        Ok(dir) => dir.join("audit.jsonl"),
        Err(_) => return,
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/gifter"))
}

pub fn config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

fn guild_path(guild: &str) -> anyhow::Result<PathBuf> {
    if guild.is_empty() || guild.contains(['/', '\\']) || guild.starts_with('.') {
        anyhow::bail!("invalid guild name: {:?}", guild);
    }
    Ok(config_dir()?.join("guilds").join(format!("{}.json", guild)))
}

/// Loads a sandbox guild; `None` when it was never initialised.
pub fn load_guild(guild: &str) -> anyhow::Result<Option<GuildState>> {
    let p = guild_path(guild)?;
    if !p.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn save_guild(state: &GuildState) -> anyhow::Result<()> {
    let p = guild_path(&state.name)?;
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(state)?)?;
    Ok(())
}
