use super::load_config;
use crate::rewrite::PatternTable;
use anyhow::Result;
use std::path::Path;

/// Execute the patterns command
pub fn patterns(config: Option<&Path>) -> Result<()> {
    let cfg = load_config(config, None)?;
    let rewriter = cfg.rewriter();

    println!("== Pattern table ==");
    print!("{}", render_table(rewriter.table()));
    println!();
    println!("import module : {}", rewriter.injector().module_path());
    Ok(())
}

fn render_table(table: &PatternTable) -> String {
    let mut out = String::new();
    for (idx, entry) in table.entries().iter().enumerate() {
        out.push_str(&format!(
            "{:>2} [{:<7}] {}\n   -> {}\n",
            idx + 1,
            entry.feature(),
            entry.pattern(),
            entry.replacement()
        ));
    }
    out
}
