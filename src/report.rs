use std::fmt::Write;

use crate::ast::{AccessPath, EResult, ErrorKind, EvalError, Value};
use crate::heap::ObjId;
use crate::Evaluator;

const INDENT: &str = "  ";

/// Rendered text plus every failure met while rendering it.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub text: String,
    pub diagnostics: Vec<EvalError>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Render `value`, found at `path`, as indented text.
///
/// Members are read one at a time. A member that fails shows up as
/// `<error>` and its sibling members still render. Failures that concern
/// the whole expression (cycles, eager union mismatches) stop the
/// container they were met in. So does a container that contains itself.
pub fn render(
    evaluator: &Evaluator,
    path: &AccessPath,
    value: &Value,
) -> Report {
    let mut renderer = Renderer {
        evaluator,
        report: Report::default(),
        open: Vec::new(),
    };
    if let Err(err) = renderer.value(path, value, 0) {
        renderer.line(0, "<aborted>");
        renderer.report.diagnostics.push(err);
    }
    renderer.report
}

struct Renderer<'a> {
    evaluator: &'a Evaluator,
    report: Report,
    /// Uncast containers whose members are being rendered.
    open: Vec<ObjId>,
}

impl Renderer<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        // writing to a String cannot fail
        let _ = writeln!(self.report.text, "{}{text}", INDENT.repeat(depth));
    }

    fn value(
        &mut self,
        path: &AccessPath,
        value: &Value,
        depth: usize,
    ) -> EResult<()> {
        if value.as_container().is_none() {
            self.line(depth, &value.to_string());
            return Ok(());
        }
        let header = format!("{} {{", self.evaluator.effective_type(value)?);
        self.line(depth, &header);
        self.members(path, value, depth + 1)?;
        self.line(depth, "}");
        Ok(())
    }

    fn members(
        &mut self,
        path: &AccessPath,
        container: &Value,
        depth: usize,
    ) -> EResult<()> {
        let evaluator = self.evaluator;
        let Some((_, id)) = container.as_container() else {
            return Ok(());
        };
        let source = evaluator.uncast(id);
        if self.open.contains(&source) {
            let err = EvalError::from(ErrorKind::CyclicEvaluation);
            return Err(err.within(path));
        }

        self.open.push(source);
        let rendered = self.render_members(path, container, depth);
        self.open.pop();
        rendered
    }

    fn render_members(
        &mut self,
        path: &AccessPath,
        container: &Value,
        depth: usize,
    ) -> EResult<()> {
        let evaluator = self.evaluator;
        for member in evaluator.members(container)? {
            let label = member.accessor().to_string();
            match member.value {
                Ok(value) if value.as_container().is_some() => {
                    let header = format!(
                        "{label} = {} {{",
                        evaluator
                            .effective_type(&value)
                            .map_err(|err| err.within(path))?
                    );
                    self.line(depth, &header);
                    let child = path.member(member.forced_key.clone());
                    self.members(&child, &value, depth + 1)?;
                    self.line(depth, "}");
                },
                Ok(value) => self.line(depth, &format!("{label} = {value}")),
                Err(err) => {
                    let err = err.within(path);
                    if !err.is_local() {
                        return Err(err);
                    }
                    self.line(depth, &format!("{label} = <error>"));
                    self.report.diagnostics.push(err);
                },
            }
        }
        Ok(())
    }
}
