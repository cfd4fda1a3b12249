use crate::cli::InspectArgs;
use crate::source::{load_config, load_template};
use colored::Colorize;
use sqltmpl::{MysqlEscaper, Placeholder, QueryBuilder, TemplateError, TemplateResult, Value};

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let config = load_config(&args.common)?;
    let template = load_template(&args.common, config.as_ref())?;

    let builder = QueryBuilder::new(MysqlEscaper);
    let placeholders = builder.scan(&template);

    for (i, p) in placeholders.iter().enumerate() {
        println!(
            "{:>3}  {:>6}  {:<3} {}",
            i,
            p.offset,
            p.as_str(&template).cyan(),
            p.specifier.name()
        );
    }
    println!("placeholders: {}", placeholders.len());

    match check_blocks(&builder, &template, &placeholders) {
        Ok(()) => println!("blocks: {}", "ok".green()),
        Err(e) => {
            println!("blocks: {}", e.to_string().red());
            return Err(check_error(&e));
        }
    }
    Ok(())
}

fn check_error(e: &TemplateError) -> anyhow::Error {
    if e.is_block_error() {
        anyhow::anyhow!("template has malformed blocks: {e}")
    } else {
        anyhow::anyhow!("invalid template: {e}")
    }
}

/// Render with every placeholder skipped: no value is formatted, so only the
/// template's own structure can fail.
fn check_blocks(
    builder: &QueryBuilder<MysqlEscaper>,
    template: &str,
    placeholders: &[Placeholder],
) -> TemplateResult<()> {
    let skipped = vec![Value::Skip; placeholders.len()];
    builder.build_query(template, &skipped).map(|_| ())
}
