use crate::cli::RenderArgs;
use crate::config::EscapeStyle;
use crate::source::{load_args, load_config, load_template};
use sqltmpl::{Escaper, MysqlEscaper, QueryBuilder, StandardEscaper, Value};

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(&args.common)?;
    let template = load_template(&args.common, config.as_ref())?;
    let values = load_args(&args.args)?;

    let style = args
        .escape
        .or_else(|| config.as_ref().map(|c| c.file.escape.style))
        .unwrap_or_default();

    let sql = render(&template, &values, style)?;
    println!("{sql}");
    Ok(())
}

fn builder_for(style: EscapeStyle) -> QueryBuilder<Box<dyn Escaper>> {
    let escaper: Box<dyn Escaper> = match style {
        EscapeStyle::Mysql => Box::new(MysqlEscaper),
        EscapeStyle::Standard => Box::new(StandardEscaper),
    };
    QueryBuilder::new(escaper)
}

fn render(template: &str, values: &[Value], style: EscapeStyle) -> anyhow::Result<String> {
    tracing::debug!(?style, args = values.len(), "rendering template");
    builder_for(style)
        .build_query(template, values)
        .map_err(|e| anyhow::anyhow!("failed to render template: {e}"))
}
