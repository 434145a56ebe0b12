use anyhow::Result;
use itertools::Itertools;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::ast::AccessPath;
use crate::report;
use crate::Evaluator;

/// Read access paths (`facts["bad"][0]`) and print what they resolve to,
/// until `exit`, `quit` or end of input.
pub fn run(evaluator: &Evaluator) -> Result<()> {
    let mut rl = rl_editor()?;
    loop {
        let input = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => return Err(err.into()),
        };
        let input = input.trim();
        match input {
            "" => continue,
            "exit" | "quit" => break,
            ":names" => {
                println!("{}", evaluator.scope().names().iter().join(" "));
                continue;
            },
            _ => {},
        }

        println!("{}", eval_line(evaluator, input));
    }
    Ok(())
}

/// Resolve and render one line of input.
pub fn eval_line(evaluator: &Evaluator, input: &str) -> String {
    let path = match input.parse::<AccessPath>() {
        Ok(path) => path,
        Err(err) => return format!("Parse error: {err}"),
    };
    debug!(%path, "resolving");

    let value = match evaluator.resolve_path(&path) {
        Ok(value) => value,
        Err(err) => return format!("Eval error: {err}"),
    };

    let report = report::render(evaluator, &path, &value);
    let mut out = report.text.trim_end().to_string();
    for err in &report.diagnostics {
        out.push_str(&format!("\nerror: {err}"));
    }
    out
}

fn rl_editor() -> Result<rustyline::DefaultEditor> {
    let cfg = rustyline::Config::builder()
        .tab_stop(2)
        .auto_add_history(true)
        .bracketed_paste(true)
        .build();

    rustyline::DefaultEditor::with_config(cfg).map_err(anyhow::Error::from)
}
