use crate::config::EscapeStyle;
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "sqltmpl.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Render,
    Inspect,
    Init,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Render(RenderArgs),
    Inspect(InspectArgs),
    Init(InitArgs),
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Render(args) => args.common.verbose,
            Command::Inspect(args) => args.common.verbose,
            Command::Init(args) => args.verbose,
            Command::Help(_) => false,
        }
    }

    fn set_verbose(&mut self) {
        match self {
            Command::Render(args) => args.common.verbose = true,
            Command::Inspect(args) => args.common.verbose = true,
            Command::Init(args) => args.verbose = true,
            Command::Help(_) => {}
        }
    }
}

/// Where the template text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateInput {
    Inline(String),
    File(PathBuf),
    Named(String),
}

/// Where the JSON argument array comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArgsInput {
    #[default]
    None,
    Inline(String),
    File(PathBuf),
}

/// Options shared by `render` and `inspect`.
#[derive(Debug, Clone)]
pub struct CommonArgs {
    pub config: PathBuf,
    /// `--config` was given, so a missing file is an error.
    pub config_explicit: bool,
    pub template: TemplateInput,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub common: CommonArgs,
    pub args: ArgsInput,
    pub escape: Option<EscapeStyle>,
}

#[derive(Debug, Clone)]
pub struct InspectArgs {
    pub common: CommonArgs,
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub config: PathBuf,
    pub verbose: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(String::as_str);

    // `-v` may also come before the command.
    let mut verbose = false;
    let first = loop {
        match it.next() {
            Some("-v" | "--verbose") => verbose = true,
            Some(token) => break token,
            None => return Ok(Command::Help(HelpTopic::Root)),
        }
    };

    let mut cmd = match first {
        "-h" | "--help" | "help" => Command::Help(HelpTopic::Root),
        "render" => parse_render(it)?,
        "inspect" => parse_inspect(it)?,
        "init" => parse_init(it)?,
        _ => anyhow::bail!("unknown command: {first}"),
    };
    if verbose {
        cmd.set_verbose();
    }
    Ok(cmd)
}

/// Value of `--flag <v>` or `--flag=<v>`.
fn take_value<'a>(
    flag: &str,
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<&'a str>> {
    if token == flag {
        let Some(v) = it.next() else {
            anyhow::bail!("{flag} requires a value");
        };
        return Ok(Some(v));
    }
    if let Some(v) = token.strip_prefix(flag).and_then(|rest| rest.strip_prefix('=')) {
        return Ok(Some(v));
    }
    Ok(None)
}

#[derive(Default)]
struct TemplateOptions {
    config: Option<PathBuf>,
    file: Option<PathBuf>,
    name: Option<String>,
    inline: Option<String>,
    args: ArgsInput,
    escape: Option<EscapeStyle>,
    verbose: bool,
}

impl TemplateOptions {
    fn into_common(self) -> anyhow::Result<(CommonArgs, ArgsInput, Option<EscapeStyle>)> {
        let template = match (self.inline, self.file, self.name) {
            (Some(t), None, None) => TemplateInput::Inline(t),
            (None, Some(f), None) => TemplateInput::File(f),
            (None, None, Some(n)) => TemplateInput::Named(n),
            (None, None, None) => {
                anyhow::bail!("a template is required (TEMPLATE, --file or --name)")
            }
            _ => anyhow::bail!("TEMPLATE, --file and --name are mutually exclusive"),
        };
        let config_explicit = self.config.is_some();
        let common = CommonArgs {
            config: self.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG)),
            config_explicit,
            template,
            verbose: self.verbose,
        };
        Ok((common, self.args, self.escape))
    }
}

/// Parse options shared by `render` and `inspect`; `None` means help was
/// requested. `with_args` enables `--args`, `--args-file` and `--escape`.
fn parse_template_options<'a>(
    mut it: impl Iterator<Item = &'a str>,
    with_args: bool,
) -> anyhow::Result<Option<TemplateOptions>> {
    let mut opts = TemplateOptions::default();

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(None);
        }
        if matches!(token, "-v" | "--verbose") {
            opts.verbose = true;
            continue;
        }
        if let Some(v) = take_value("--config", token, &mut it)? {
            opts.config = Some(PathBuf::from(v));
            continue;
        }
        if let Some(v) = take_value("--file", token, &mut it)? {
            opts.file = Some(PathBuf::from(v));
            continue;
        }
        if let Some(v) = take_value("--name", token, &mut it)? {
            opts.name = Some(v.to_string());
            continue;
        }
        if with_args {
            if let Some(v) = take_value("--args-file", token, &mut it)? {
                opts.args = ArgsInput::File(PathBuf::from(v));
                continue;
            }
            if let Some(v) = take_value("--args", token, &mut it)? {
                opts.args = ArgsInput::Inline(v.to_string());
                continue;
            }
            if let Some(v) = take_value("--escape", token, &mut it)? {
                opts.escape = Some(v.parse()?);
                continue;
            }
        }
        if token.starts_with("--") {
            anyhow::bail!("unknown option: {token}");
        }
        if opts.inline.is_some() {
            anyhow::bail!("unexpected argument: {token}");
        }
        opts.inline = Some(token.to_string());
    }

    Ok(Some(opts))
}

fn parse_render<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let Some(opts) = parse_template_options(it, true)? else {
        return Ok(Command::Help(HelpTopic::Render));
    };
    let (common, args, escape) = opts.into_common()?;
    Ok(Command::Render(RenderArgs {
        common,
        args,
        escape,
    }))
}

fn parse_inspect<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let Some(opts) = parse_template_options(it, false)? else {
        return Ok(Command::Help(HelpTopic::Inspect));
    };
    let (common, _, _) = opts.into_common()?;
    Ok(Command::Inspect(InspectArgs { common }))
}

fn parse_init<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut verbose = false;

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Init));
        }
        if matches!(token, "-v" | "--verbose") {
            verbose = true;
            continue;
        }
        if let Some(v) = take_value("--config", token, &mut it)? {
            config = PathBuf::from(v);
            continue;
        }
        anyhow::bail!("unexpected argument: {token}");
    }

    Ok(Command::Init(InitArgs { config, verbose }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
sqltmpl - render SQL query templates

USAGE:
  sqltmpl [-v] <COMMAND> [OPTIONS]

COMMANDS:
  render        Render a template with JSON arguments
  inspect       List the placeholders of a template
  init          Write a starter sqltmpl.toml

OPTIONS:
  -v, --verbose         Log to stderr (also accepted after the command)

Run `sqltmpl <command> --help` for more."
            );
        }
        HelpTopic::Render => {
            println!(
                "\
USAGE:
  sqltmpl render [OPTIONS] [TEMPLATE]

OPTIONS:
  --file <FILE>         Read the template from a file
  --name <NAME>         Use a named template from the config
  --args <JSON>         JSON array of arguments (default: [])
  --args-file <FILE>    Read the JSON argument array from a file
  --escape <STYLE>      Literal escaping: mysql | standard (overrides config)
  --config <FILE>       Config file path (default: sqltmpl.toml)
  -v, --verbose         Log build details to stderr
  -h, --help            Print help

ARGUMENTS:
  Use {{\"$skip\": true}} in the JSON array to drop an optional block."
            );
        }
        HelpTopic::Inspect => {
            println!(
                "\
USAGE:
  sqltmpl inspect [OPTIONS] [TEMPLATE]

OPTIONS:
  --file <FILE>         Read the template from a file
  --name <NAME>         Use a named template from the config
  --config <FILE>       Config file path (default: sqltmpl.toml)
  -v, --verbose         Log scan details to stderr
  -h, --help            Print help"
            );
        }
        HelpTopic::Init => {
            println!(
                "\
USAGE:
  sqltmpl init [OPTIONS]

OPTIONS:
  --config <FILE>       Output config path (default: sqltmpl.toml)
  -v, --verbose         Log to stderr
  -h, --help            Print help"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        std::iter::once("sqltmpl")
            .chain(parts.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_args_prints_root_help() {
        let cmd = parse_args(&argv(&[])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
    }

    #[test]
    fn parse_render_inline() {
        let cmd = parse_args(&argv(&[
            "render",
            "SELECT ?d",
            "--args",
            "[1]",
            "--escape=standard",
            "-v",
        ]))
        .unwrap();
        let Command::Render(r) = cmd else {
            panic!("expected render");
        };
        assert_eq!(r.common.template, TemplateInput::Inline("SELECT ?d".into()));
        assert_eq!(r.args, ArgsInput::Inline("[1]".into()));
        assert_eq!(r.escape, Some(EscapeStyle::Standard));
        assert!(r.common.verbose);
        assert!(!r.common.config_explicit);
        assert_eq!(r.common.config, PathBuf::from(DEFAULT_CONFIG));
    }

    #[test]
    fn parse_render_named_with_config() {
        let cmd = parse_args(&argv(&[
            "render",
            "--name",
            "find_user",
            "--config",
            "db/sqltmpl.toml",
            "--args-file=args.json",
        ]))
        .unwrap();
        let Command::Render(r) = cmd else {
            panic!("expected render");
        };
        assert_eq!(r.common.template, TemplateInput::Named("find_user".into()));
        assert_eq!(r.args, ArgsInput::File(PathBuf::from("args.json")));
        assert!(r.common.config_explicit);
    }

    #[test]
    fn render_requires_single_template_source() {
        assert!(parse_args(&argv(&["render"])).is_err());
        assert!(parse_args(&argv(&["render", "SELECT 1", "--file", "a.sql"])).is_err());
    }

    #[test]
    fn inspect_rejects_args_option() {
        assert!(parse_args(&argv(&["inspect", "SELECT ?", "--args", "[1]"])).is_err());
        let cmd = parse_args(&argv(&["inspect", "--file", "q.sql"])).unwrap();
        let Command::Inspect(i) = cmd else {
            panic!("expected inspect");
        };
        assert_eq!(i.common.template, TemplateInput::File(PathBuf::from("q.sql")));
    }

    #[test]
    fn subcommand_help() {
        let cmd = parse_args(&argv(&["render", "--help"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Render)));
        let cmd = parse_args(&argv(&["init", "-h"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Init)));
    }

    #[test]
    fn verbose_is_accepted_before_and_after_command() {
        let cmd = parse_args(&argv(&["-v", "render", "SELECT 1"])).unwrap();
        assert!(matches!(&cmd, Command::Render(_)));
        assert!(cmd.verbose());

        let cmd = parse_args(&argv(&["--verbose", "inspect", "SELECT 1"])).unwrap();
        assert!(cmd.verbose());

        let cmd = parse_args(&argv(&["init", "-v", "--config", "x.toml"])).unwrap();
        let Command::Init(i) = &cmd else {
            panic!("expected init");
        };
        assert_eq!(i.config, PathBuf::from("x.toml"));
        assert!(cmd.verbose());

        assert!(!parse_args(&argv(&["init"])).unwrap().verbose());
        assert!(matches!(
            parse_args(&argv(&["-v"])).unwrap(),
            Command::Help(HelpTopic::Root)
        ));
    }

    #[test]
    fn unknown_escape_style() {
        assert!(parse_args(&argv(&["render", "x", "--escape", "oracle"])).is_err());
    }
}
