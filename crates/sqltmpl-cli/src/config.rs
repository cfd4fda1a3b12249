use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "invalid config file {}: {e:#}",
                config_path.display()
            )
        })?;

        Ok(Self { config_path, file })
    }

    /// Load the config if present. A missing default config is not an error;
    /// a missing explicitly requested one is.
    pub fn load_optional(config_path: &Path, explicit: bool) -> anyhow::Result<Option<Self>> {
        if !explicit && !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(None);
        }
        Self::load(config_path.to_path_buf()).map(Some)
    }

    pub fn template(&self, name: &str) -> anyhow::Result<&str> {
        self.file.templates.get(name).map(String::as_str).ok_or_else(|| {
            anyhow::anyhow!(
                "no template named '{name}' in {}",
                self.config_path.display()
            )
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub escape: EscapeConfig,

    #[serde(default)]
    pub templates: BTreeMap<String, String>,
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        for t in self.templates.values_mut() {
            *t = expand_env_vars(t)?;
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }

        for (name, text) in &self.templates {
            if name.trim().is_empty() {
                anyhow::bail!("templates: name must not be empty");
            }
            if text.is_empty() {
                anyhow::bail!("templates.{name} must not be empty");
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EscapeConfig {
    #[serde(default)]
    pub style: EscapeStyle,
}

/// Literal escaping flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeStyle {
    /// Backslash escapes, as `mysql_real_escape_string`.
    #[default]
    Mysql,
    /// Doubled single quotes.
    Standard,
}

impl FromStr for EscapeStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "mysql" => Ok(Self::Mysql),
            "standard" => Ok(Self::Standard),
            other => anyhow::bail!("unknown escape style: {other} (expected mysql or standard)"),
        }
    }
}

/// Replace `${VAR}` references with environment values.
///
/// Text inside single-quoted SQL literals is copied as is, so `'${x}'` stays
/// a literal string. A doubled `''` reads as close-then-reopen, which keeps
/// the literal state right.
fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut in_literal = false;
    let mut rest = input;

    while let Some(pos) = rest.find(['\'', '$']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with('\'') {
            in_literal = !in_literal;
            out.push('\'');
            rest = &tail[1..];
            continue;
        }
        if in_literal || !tail.starts_with("${") {
            out.push('$');
            rest = &tail[1..];
            continue;
        }

        let Some(close) = tail.find('}') else {
            anyhow::bail!("unterminated env var reference: {tail}");
        };
        let key = &tail[2..close];
        if key.is_empty() {
            anyhow::bail!("invalid env var reference: ${{}}");
        }
        let value = std::env::var(key)
            .map_err(|_| anyhow::anyhow!("missing env var for template expansion: {key}"))?;
        out.push_str(&value);
        rest = &tail[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
