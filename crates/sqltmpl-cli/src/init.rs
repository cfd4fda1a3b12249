use crate::cli::InitArgs;
use std::path::Path;

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    write_template(&args.config)?;
    println!("wrote {}", args.config.display());
    Ok(())
}

fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("failed to create directory {}: {e}", parent.display())
            })?;
        }
    }

    let content = r#"version = "1"

[escape]
style = "mysql" # mysql | standard

# Named templates for `sqltmpl render --name <NAME>`.
# `${VAR}` is replaced from the environment when the config is loaded.
[templates]
find_user = "SELECT ?# FROM users WHERE user_id = ?d {AND block = ?d}"
update_user = "UPDATE users SET ?a WHERE user_id = ?d"
"#;

    std::fs::write(path, content)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    Ok(())
}
