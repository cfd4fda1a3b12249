use crate::cli::{ArgsInput, CommonArgs, TemplateInput};
use crate::config::ProjectConfig;
use sqltmpl::Value;

pub fn load_config(common: &CommonArgs) -> anyhow::Result<Option<ProjectConfig>> {
    let required = common.config_explicit || matches!(common.template, TemplateInput::Named(_));
    ProjectConfig::load_optional(&common.config, required)
}

pub fn load_template(
    common: &CommonArgs,
    config: Option<&ProjectConfig>,
) -> anyhow::Result<String> {
    match &common.template {
        TemplateInput::Inline(t) => Ok(t.clone()),
        TemplateInput::File(path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                anyhow::anyhow!("failed to read template file {}: {e}", path.display())
            })?;
            // Editors add a final newline; it is never part of the query.
            Ok(raw.trim_end_matches(['\n', '\r']).to_string())
        }
        TemplateInput::Named(name) => {
            let Some(config) = config else {
                anyhow::bail!("--name requires a config file");
            };
            Ok(config.template(name)?.to_string())
        }
    }
}

pub fn load_args(input: &ArgsInput) -> anyhow::Result<Vec<Value>> {
    let raw = match input {
        ArgsInput::None => return Ok(Vec::new()),
        ArgsInput::Inline(s) => s.clone(),
        ArgsInput::File(path) => std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("failed to read args file {}: {e}", path.display())
        })?,
    };
    Value::args_from_json_str(&raw).map_err(|e| anyhow::anyhow!("invalid arguments: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn common(template: TemplateInput) -> CommonArgs {
        CommonArgs {
            config: PathBuf::from("does-not-exist/sqltmpl.toml"),
            config_explicit: false,
            template,
            verbose: false,
        }
    }

    #[test]
    fn missing_default_config_is_fine() {
        let c = common(TemplateInput::Inline("SELECT 1".into()));
        assert!(load_config(&c).unwrap().is_none());
        assert_eq!(load_template(&c, None).unwrap(), "SELECT 1");
    }

    #[test]
    fn named_template_needs_config() {
        let c = common(TemplateInput::Named("q".into()));
        assert!(load_config(&c).is_err());
        assert!(load_template(&c, None).is_err());
    }

    #[test]
    fn args_parse_from_json() {
        let args = load_args(&ArgsInput::Inline(r#"[1, {"$skip": true}]"#.into())).unwrap();
        assert_eq!(args, vec![Value::Int(1), Value::Skip]);
        assert!(load_args(&ArgsInput::None).unwrap().is_empty());
        assert!(load_args(&ArgsInput::Inline("{}".into())).is_err());
    }
}
