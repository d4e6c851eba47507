//! Statement interpretation and taint propagation
//!
//! The engine walks the top-level statement sequence once, evaluating each
//! expression to a `TaintValue` and reporting a finding wherever a value
//! classifies as a vulnerability. Calls to user-defined functions are
//! inlined on demand: the callee body is interpreted against a fresh table
//! built from the argument taint. Conditionals and loops reconcile tables
//! through confidence-weighted merges rather than a fixpoint.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::ast::{ExprId, ExprKind, Program, StmtId, StmtKind};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::semantic::{AliasChain, SymbolTable};

use super::AnalysisOptions;
use super::finding::Finding;
use super::sanitizers::SanitizersRegistry;
use super::sinks::SinksRegistry;
use super::sources::SourcesRegistry;
use super::value::{SourceCategory, TaintKind, TaintValue, neutralizes};

/// Result of one analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub findings: Vec<Finding>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisReport {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone)]
struct UserFunction {
    params: Vec<String>,
    body: Vec<StmtId>,
}

/// One analysis run over a program. Owns every mutable map for the run, so
/// concurrent analyses never share state.
pub struct TaintInterpreter<'a> {
    program: &'a Program,
    sources: &'a SourcesRegistry,
    sinks: &'a SinksRegistry,
    sanitizers: &'a SanitizersRegistry,
    options: AnalysisOptions,
    user_funcs: HashMap<String, UserFunction>,
    aliases: AliasChain,
    instance_aliases: AliasChain,
    instances: HashSet<String>,
    depth: usize,
    findings: Vec<Finding>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TaintInterpreter<'a> {
    pub fn new(
        program: &'a Program,
        sources: &'a SourcesRegistry,
        sinks: &'a SinksRegistry,
        sanitizers: &'a SanitizersRegistry,
        options: AnalysisOptions,
    ) -> Self {
        // Declaration pass: user-defined functions are visible to calls that
        // precede them in the statement order.
        let mut user_funcs = HashMap::new();
        for &sid in program.body() {
            if let StmtKind::FunctionDecl { name, params, body } = &program.stmt(sid).kind {
                user_funcs.insert(
                    name.clone(),
                    UserFunction {
                        params: params.clone(),
                        body: body.clone(),
                    },
                );
            }
        }

        Self {
            program,
            sources,
            sinks,
            sanitizers,
            options,
            user_funcs,
            aliases: AliasChain::new(),
            instance_aliases: AliasChain::new(),
            instances: HashSet::new(),
            depth: 0,
            findings: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Interprets the top-level statement sequence against a fresh table.
    pub fn run_program(&mut self) -> TaintValue {
        let program = self.program;
        let mut table = SymbolTable::new();
        self.run(program.body(), &mut table)
    }

    pub fn into_report(self) -> AnalysisReport {
        AnalysisReport {
            findings: self.findings,
            diagnostics: self.diagnostics,
        }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Interprets a statement sequence. A `return` short-circuits the
    /// remaining statements and yields its expression's value; a sequence
    /// that runs to the end yields clean.
    fn run(&mut self, stmts: &[StmtId], table: &mut SymbolTable) -> TaintValue {
        let program = self.program;
        for &sid in stmts {
            let stmt = program.stmt(sid);
            match &stmt.kind {
                StmtKind::Expr(expr) => {
                    self.eval(*expr, table);
                }
                StmtKind::FunctionDecl { .. } => {
                    // collected in the declaration pass
                }
                StmtKind::If {
                    cond,
                    then_branch,
                    else_branch,
                } => self.run_conditional(*cond, then_branch, else_branch.as_deref(), table),
                StmtKind::While { cond, body } => self.run_loop(*cond, body, table),
                StmtKind::Return(expr) => {
                    trace!("return at line {}", stmt.line);
                    return match expr {
                        Some(expr) => self.eval(*expr, table),
                        None => TaintValue::clean(),
                    };
                }
                StmtKind::Unsupported(what) => self.diagnose(
                    DiagnosticKind::UnsupportedConstruct,
                    stmt.line,
                    format!("unsupported statement `{what}`"),
                ),
            }
        }
        TaintValue::clean()
    }

    /// Branch merge strategy: statically decided conditions run the taken
    /// branch in place; anything uncertain runs on table copies and is
    /// folded back with the condition's confidence.
    fn run_conditional(
        &mut self,
        cond: ExprId,
        then_branch: &[StmtId],
        else_branch: Option<&[StmtId]>,
        table: &mut SymbolTable,
    ) {
        let confidence = self.condition_confidence(cond);
        trace!("branch confidence {confidence}");
        match else_branch {
            None => {
                let before = table.clone();
                let mut branch = table.clone();
                self.run(then_branch, &mut branch);
                *table = SymbolTable::augment(before, &branch, confidence);
            }
            Some(else_stmts) => {
                if confidence == 0.0 {
                    self.run(else_stmts, table);
                } else if confidence == 1.0 {
                    self.run(then_branch, table);
                } else {
                    let before = table.clone();
                    let mut then_table = table.clone();
                    let mut else_table = table.clone();
                    self.run(then_branch, &mut then_table);
                    self.run(else_stmts, &mut else_table);
                    let merged = SymbolTable::union(then_table, else_table);
                    *table = SymbolTable::augment(before, &merged, confidence);
                }
            }
        }
    }

    /// Loops are approximated by one extra unrolling, not a fixpoint: the
    /// body runs twice against the live table to catch second-iteration
    /// effects, then the result is folded back against the pre-loop
    /// snapshot with the condition's confidence.
    fn run_loop(&mut self, cond: ExprId, body: &[StmtId], table: &mut SymbolTable) {
        let confidence = self.condition_confidence(cond);
        let before = table.clone();
        self.run(body, table);
        self.run(body, table);
        let after = std::mem::take(table);
        *table = SymbolTable::augment(before, &after, confidence);
    }

    /// Syntactic confidence heuristic for a condition: literal integers and
    /// the `true`/`false` constants decide the branch statically, unknown
    /// constants are assumed true, and any other expression is maximally
    /// uncertain. The condition's own taint is never consulted.
    fn condition_confidence(&self, cond: ExprId) -> f64 {
        match &self.program.expr(cond).kind {
            ExprKind::IntLit(value) => {
                if *value != 0 {
                    1.0
                } else {
                    0.0
                }
            }
            ExprKind::Const(name) => match name.as_str() {
                "true" => 1.0,
                "false" => 0.0,
                _ => 1.0,
            },
            _ => 0.5,
        }
    }

    /// Evaluates an expression to its taint value, reporting a finding when
    /// the value classifies as a vulnerability. Assignment forms return
    /// their handler's result directly.
    fn eval(&mut self, id: ExprId, table: &mut SymbolTable) -> TaintValue {
        let program = self.program;
        let node = program.expr(id);
        let line = node.line;
        let value = match &node.kind {
            ExprKind::Var(name) => self.read_var(name, table, line),
            ExprKind::IntLit(_) | ExprKind::StrLit(_) | ExprKind::InterpPart(_) => {
                TaintValue::clean()
            }
            ExprKind::ArrayDim { base, .. } => self.eval_array_dim(*base, table),
            ExprKind::PropFetch { object, property } => {
                self.eval_prop_fetch(object, property, table, line)
            }
            ExprKind::Binary { left, right } => {
                let left = self.eval(*left, table);
                let right = self.eval(*right, table);
                TaintValue::combine(left, right)
            }
            ExprKind::Interp(parts) => self.eval_interp(parts, table),
            ExprKind::Const(name) => {
                self.diagnose(
                    DiagnosticKind::UnsupportedConstruct,
                    line,
                    format!("named constant `{name}` used as a value"),
                );
                TaintValue::clean()
            }
            ExprKind::Call { name, args } => self.eval_call(name, args, line, table),
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                let name = compose_key(receiver, method);
                self.eval_call(&name, args, line, table)
            }
            ExprKind::Arg(inner) => self.eval(*inner, table),
            ExprKind::ArrayLit => TaintValue::clean(),
            ExprKind::Assign { target, value } => return self.assign(*target, *value, table),
            ExprKind::AssignRef { target, value } => {
                return self.assign_ref(*target, *value, table, line);
            }
            ExprKind::Unsupported(what) => {
                self.diagnose(
                    DiagnosticKind::UnsupportedConstruct,
                    line,
                    format!("unsupported expression `{what}`"),
                );
                TaintValue::clean()
            }
        };
        self.report_if_vulnerable(value, line);
        value
    }

    fn read_var(&mut self, name: &str, table: &SymbolTable, line: u32) -> TaintValue {
        let target = self.resolve_alias(name, line);
        trace!("read `{name}` as `{target}`");
        table.get(&target)
    }

    /// Array element access. A registered source as the base is read as
    /// direct input taint at full certainty; any other base loses half its
    /// certainty through the index.
    fn eval_array_dim(&mut self, base: ExprId, table: &mut SymbolTable) -> TaintValue {
        if let ExprKind::Var(name) = &self.program.expr(base).kind {
            if self.sources.kind_of(name).is_some() {
                return TaintValue::tainted(SourceCategory::Input, 1.0);
            }
        }
        self.eval(base, table).halved()
    }

    fn eval_prop_fetch(
        &mut self,
        object: &str,
        property: &str,
        table: &SymbolTable,
        line: u32,
    ) -> TaintValue {
        self.instances.insert(object.to_string());
        let canonical = self.resolve_instance(object, line);
        let key = compose_key(&canonical, property);
        let target = self.resolve_alias(&key, line);
        table.get(&target)
    }

    /// An interpolated string is input-tainted at full certainty as soon as
    /// any part evaluates non-clean; parts after the first tainted one are
    /// not evaluated.
    fn eval_interp(&mut self, parts: &[ExprId], table: &mut SymbolTable) -> TaintValue {
        for &part in parts {
            if !self.eval(part, table).is_clean() {
                return TaintValue::tainted(SourceCategory::Input, 1.0);
            }
        }
        TaintValue::clean()
    }

    /// Call dispatcher: sinks classify their first tainted argument, sources
    /// produce fresh taint, user-defined functions are inlined, and anything
    /// else is a built-in that forwards or sanitizes its argument taint.
    fn eval_call(
        &mut self,
        name: &str,
        args: &[ExprId],
        line: u32,
        table: &mut SymbolTable,
    ) -> TaintValue {
        if let Some(sink) = self.sinks.kind_of(name) {
            trace!("sink call `{name}`");
            let taint = self.first_tainted_arg(args, table);
            return taint.classify_at_sink(sink);
        }

        if let Some(source) = self.sources.kind_of(name) {
            trace!("source call `{name}`");
            return TaintValue::tainted(source, 1.0);
        }

        if let Some(func) = self.user_funcs.get(name).cloned() {
            if self.depth >= self.options.max_call_depth {
                self.diagnose(
                    DiagnosticKind::CallDepthExceeded,
                    line,
                    format!("call depth limit exceeded while inlining `{name}`"),
                );
                return TaintValue::clean();
            }
            trace!("inlining user function `{name}`");
            let mut callee_table = self.bind_callee_table(&func.params, args, table);
            self.depth += 1;
            let result = self.run(&func.body, &mut callee_table);
            self.depth -= 1;
            return result;
        }

        self.eval_builtin_call(name, args, line, table)
    }

    /// Unclassified built-ins: array append stores the pushed value under
    /// the array's identity; everything else forwards its first tainted
    /// argument unless a matching-category sanitizer cancels it.
    fn eval_builtin_call(
        &mut self,
        name: &str,
        args: &[ExprId],
        line: u32,
        table: &mut SymbolTable,
    ) -> TaintValue {
        if name == "array_push" && args.len() >= 2 {
            let value = self.eval(args[1], table);
            if let Some(identity) = self.identity_of(args[0]) {
                let target = self.resolve_alias(&identity, line);
                table.set(&target, value);
            }
            return value;
        }

        let info = self.first_tainted_arg(args, table);
        if !info.is_tainted() {
            return TaintValue::clean();
        }
        if let Some(category) = self.sanitizers.kind_of(name) {
            if let TaintKind::Tainted(source) = info.kind {
                if neutralizes(source, category) {
                    trace!("sanitizer `{name}` cancels {} taint", source.as_str());
                    return TaintValue::clean();
                }
            }
        }
        info
    }

    /// First non-clean argument value, left to right; later arguments are
    /// not evaluated once one is found.
    fn first_tainted_arg(&mut self, args: &[ExprId], table: &mut SymbolTable) -> TaintValue {
        for &arg in args {
            let value = self.eval(arg, table);
            if !value.is_clean() {
                return value;
            }
        }
        TaintValue::clean()
    }

    /// Callee-local table for inlining: each parameter binds to its
    /// argument's taint, with the array-indexing penalty compounded for
    /// element-access arguments. Untainted arguments stay unbound.
    fn bind_callee_table(
        &mut self,
        params: &[String],
        args: &[ExprId],
        table: &mut SymbolTable,
    ) -> SymbolTable {
        let mut callee = SymbolTable::new();
        for (param, &arg) in params.iter().zip(args) {
            let value = self.eval(arg, table);
            if !value.is_tainted() {
                continue;
            }
            let value = if self.is_array_dim_arg(arg) {
                value.halved()
            } else {
                value
            };
            callee.set(param, value);
        }
        callee
    }

    fn is_array_dim_arg(&self, arg: ExprId) -> bool {
        match &self.program.expr(arg).kind {
            ExprKind::ArrayDim { .. } => true,
            ExprKind::Arg(inner) => {
                matches!(&self.program.expr(*inner).kind, ExprKind::ArrayDim { .. })
            }
            _ => false,
        }
    }

    /// Assignment: a non-clean right-hand side is stored at the target's
    /// resolved identity; a clean one clears any stale taint there. Plain
    /// object-to-object assignments additionally record an instance alias so
    /// both handles share property state.
    fn assign(&mut self, target: ExprId, value_expr: ExprId, table: &mut SymbolTable) -> TaintValue {
        let program = self.program;
        if let (ExprKind::Var(left), ExprKind::Var(right)) = (
            &program.expr(target).kind,
            &program.expr(value_expr).kind,
        ) {
            if self.instances.contains(right) {
                self.instances.insert(left.clone());
                self.instance_aliases.link(left, right);
            }
        }

        let line = program.expr(target).line;
        let taint = self.eval(value_expr, table);
        let Some(identity) = self.identity_of(target) else {
            return taint;
        };
        let slot = self.resolve_alias(&identity, line);
        if !taint.is_clean() {
            trace!("set `{slot}`");
            table.set(&slot, taint);
        } else if !table.get(&slot).is_clean() {
            trace!("clear `{slot}`");
            table.remove(&slot);
        }
        taint
    }

    /// Reference assignment: the left name now denotes the right name's
    /// storage. Yields the right-hand side's current taint.
    fn assign_ref(
        &mut self,
        target: ExprId,
        value_expr: ExprId,
        table: &mut SymbolTable,
        line: u32,
    ) -> TaintValue {
        let ExprKind::Var(right) = &self.program.expr(value_expr).kind else {
            self.diagnose(
                DiagnosticKind::UnsupportedConstruct,
                line,
                "reference assignment from a non-variable expression".to_string(),
            );
            return TaintValue::clean();
        };
        let right = right.clone();
        if let Some(left) = self.identity_of(target) {
            self.aliases.link(&left, &right);
        }
        let slot = self.resolve_alias(&right, line);
        table.get(&slot)
    }

    /// The storage identity an expression assigns to: a plain name, the base
    /// name of an element access, or the canonicalized `instance::property`
    /// key of a property access.
    fn identity_of(&mut self, id: ExprId) -> Option<String> {
        let program = self.program;
        let node = program.expr(id);
        match &node.kind {
            ExprKind::Var(name) => Some(name.clone()),
            ExprKind::ArrayDim { base, .. } => match &program.expr(*base).kind {
                ExprKind::Var(name) => Some(name.clone()),
                _ => {
                    self.diagnose(
                        DiagnosticKind::UnsupportedConstruct,
                        node.line,
                        "unsupported assignment target".to_string(),
                    );
                    None
                }
            },
            ExprKind::PropFetch { object, property } => {
                self.instances.insert(object.clone());
                let canonical = self.resolve_instance(object, node.line);
                Some(compose_key(&canonical, property))
            }
            ExprKind::Arg(inner) => self.identity_of(*inner),
            _ => {
                self.diagnose(
                    DiagnosticKind::UnsupportedConstruct,
                    node.line,
                    "unsupported assignment target".to_string(),
                );
                None
            }
        }
    }

    fn resolve_alias(&mut self, name: &str, line: u32) -> String {
        match self.aliases.resolve(name) {
            Ok(resolved) => resolved,
            Err(cycle) => {
                self.diagnose(DiagnosticKind::AliasCycle, line, cycle.to_string());
                name.to_string()
            }
        }
    }

    fn resolve_instance(&mut self, name: &str, line: u32) -> String {
        match self.instance_aliases.resolve(name) {
            Ok(resolved) => resolved,
            Err(cycle) => {
                self.diagnose(DiagnosticKind::AliasCycle, line, cycle.to_string());
                name.to_string()
            }
        }
    }

    fn report_if_vulnerable(&mut self, value: TaintValue, line: u32) {
        if let TaintKind::Vulnerable(sink) = value.kind {
            let finding = Finding::new(sink.into(), line, value.certainty);
            warn!("{finding}");
            self.findings.push(finding);
        }
    }

    fn diagnose(&mut self, kind: DiagnosticKind, line: u32, message: String) {
        debug!("line {line}: {message}");
        self.diagnostics.push(Diagnostic::new(kind, line, message));
    }
}

fn compose_key(object: &str, member: &str) -> String {
    format!("{object}::{member}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Program;
    use crate::taint::FindingCategory;

    fn analyze_with(program: &Program, options: AnalysisOptions) -> AnalysisReport {
        let sources = SourcesRegistry::with_defaults();
        let sinks = SinksRegistry::with_defaults();
        let sanitizers = SanitizersRegistry::with_defaults();
        let mut interpreter =
            TaintInterpreter::new(program, &sources, &sinks, &sanitizers, options);
        interpreter.run_program();
        interpreter.into_report()
    }

    fn analyze(program: &Program) -> AnalysisReport {
        analyze_with(program, AnalysisOptions::default())
    }

    fn superglobal_read(program: &mut Program, global: &str, key: &str, line: u32) -> ExprId {
        let base = program.var(global, line);
        let index = program.str_lit(key, line);
        program.array_dim(base, Some(index), line)
    }

    fn assign_var(program: &mut Program, name: &str, value: ExprId, line: u32) -> StmtId {
        let target = program.var(name, line);
        let assign = program.assign(target, value, line);
        program.expr_stmt(assign, line)
    }

    fn call_stmt(program: &mut Program, name: &str, args: Vec<ExprId>, line: u32) -> StmtId {
        let call = program.call(name, args, line);
        program.expr_stmt(call, line)
    }

    #[test]
    fn taint_flows_through_assignment_chain() {
        let mut p = Program::new();
        let src = superglobal_read(&mut p, "_GET", "id", 1);
        let s1 = assign_var(&mut p, "x", src, 1);
        let x = p.var("x", 2);
        let s2 = assign_var(&mut p, "y", x, 2);
        let y = p.var("y", 3);
        let s3 = call_stmt(&mut p, "mysql_query", vec![y], 3);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.category, FindingCategory::Sql);
        assert_eq!(finding.line, 3);
        assert_eq!(finding.certainty, 100);
    }

    #[test]
    fn clean_overwrite_clears_stale_taint() {
        let mut p = Program::new();
        let src = superglobal_read(&mut p, "_GET", "id", 1);
        let s1 = assign_var(&mut p, "x", src, 1);
        let safe = p.str_lit("safe", 2);
        let s2 = assign_var(&mut p, "x", safe, 2);
        let x = p.var("x", 3);
        let s3 = call_stmt(&mut p, "mysql_query", vec![x], 3);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert!(report.findings.is_empty());
    }

    #[test]
    fn element_access_halves_certainty() {
        let mut p = Program::new();
        let src = superglobal_read(&mut p, "_GET", "id", 1);
        let s1 = assign_var(&mut p, "a", src, 1);
        let a = p.var("a", 2);
        let zero = p.int_lit(0, 2);
        let element = p.array_dim(a, Some(zero), 2);
        let s2 = assign_var(&mut p, "b", element, 2);
        let b = p.var("b", 3);
        let s3 = call_stmt(&mut p, "system", vec![b], 3);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].category, FindingCategory::Cmd);
        assert_eq!(report.findings[0].certainty, 50);
    }

    #[test]
    fn uncertain_branch_degrades_certainty() {
        let mut p = Program::new();
        let src = superglobal_read(&mut p, "_GET", "id", 1);
        let s1 = assign_var(&mut p, "x", src, 1);
        let cond = p.var("cond", 2);
        let x = p.var("x", 3);
        let branch_body = assign_var(&mut p, "y", x, 3);
        let s2 = p.if_stmt(cond, vec![branch_body], None, 2);
        let y = p.var("y", 5);
        let s3 = call_stmt(&mut p, "system", vec![y], 5);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.category, FindingCategory::Cmd);
        assert_eq!(finding.line, 5);
        assert_eq!(finding.certainty, 50);
    }

    #[test]
    fn both_branches_of_uncertain_conditional_run() {
        let mut p = Program::new();
        let cond = p.var("cond", 1);
        let then_src = superglobal_read(&mut p, "_GET", "a", 2);
        let then_body = assign_var(&mut p, "y", then_src, 2);
        let else_src = superglobal_read(&mut p, "_GET", "b", 4);
        let else_body = assign_var(&mut p, "y", else_src, 4);
        let s1 = p.if_stmt(cond, vec![then_body], Some(vec![else_body]), 1);
        let y = p.var("y", 6);
        let s2 = call_stmt(&mut p, "system", vec![y], 6);
        p.push(s1);
        p.push(s2);

        let report = analyze(&p);

        // both branches taint y; the union saturates and the branch
        // confidence scales it back down
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].certainty, 50);
    }

    #[test]
    fn statically_true_condition_runs_then_branch_in_place() {
        let mut p = Program::new();
        let cond = p.constant("true", 1);
        let src = superglobal_read(&mut p, "_GET", "id", 2);
        let then_body = assign_var(&mut p, "y", src, 2);
        let safe = p.str_lit("safe", 4);
        let else_body = assign_var(&mut p, "y", safe, 4);
        let s1 = p.if_stmt(cond, vec![then_body], Some(vec![else_body]), 1);
        let y = p.var("y", 6);
        let s2 = call_stmt(&mut p, "system", vec![y], 6);
        p.push(s1);
        p.push(s2);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].certainty, 100);
    }

    #[test]
    fn statically_false_condition_runs_else_branch_only() {
        let mut p = Program::new();
        let cond = p.constant("false", 1);
        let src = superglobal_read(&mut p, "_GET", "id", 2);
        let then_body = assign_var(&mut p, "y", src, 2);
        let safe = p.str_lit("safe", 4);
        let else_body = assign_var(&mut p, "y", safe, 4);
        let s1 = p.if_stmt(cond, vec![then_body], Some(vec![else_body]), 1);
        let y = p.var("y", 6);
        let s2 = call_stmt(&mut p, "system", vec![y], 6);
        p.push(s1);
        p.push(s2);

        let report = analyze(&p);

        assert!(report.findings.is_empty());
    }

    #[test]
    fn statically_false_branch_without_else_is_discarded() {
        let mut p = Program::new();
        let cond = p.int_lit(0, 1);
        let src = superglobal_read(&mut p, "_GET", "id", 2);
        let then_body = assign_var(&mut p, "y", src, 2);
        let s1 = p.if_stmt(cond, vec![then_body], None, 1);
        let y = p.var("y", 4);
        let s2 = call_stmt(&mut p, "system", vec![y], 4);
        p.push(s1);
        p.push(s2);

        let report = analyze(&p);

        assert!(report.findings.is_empty());
    }

    #[test]
    fn uncertain_loop_scales_introduced_taint() {
        let mut p = Program::new();
        let cond = p.var("more", 1);
        let src = superglobal_read(&mut p, "_GET", "id", 2);
        let body = assign_var(&mut p, "x", src, 2);
        let s1 = p.while_stmt(cond, vec![body], 1);
        let x = p.var("x", 4);
        let s2 = call_stmt(&mut p, "system", vec![x], 4);
        p.push(s1);
        p.push(s2);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].certainty, 50);
    }

    #[test]
    fn certain_loop_keeps_full_certainty() {
        let mut p = Program::new();
        let cond = p.int_lit(1, 1);
        let src = superglobal_read(&mut p, "_GET", "id", 2);
        let body = assign_var(&mut p, "x", src, 2);
        let s1 = p.while_stmt(cond, vec![body], 1);
        let x = p.var("x", 4);
        let s2 = call_stmt(&mut p, "system", vec![x], 4);
        p.push(s1);
        p.push(s2);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].certainty, 100);
    }

    #[test]
    fn clean_loop_body_leaves_table_unchanged() {
        let mut p = Program::new();
        let src = superglobal_read(&mut p, "_GET", "id", 1);
        let s1 = assign_var(&mut p, "x", src, 1);
        let cond = p.var("more", 2);
        let safe = p.str_lit("safe", 3);
        let body = assign_var(&mut p, "tmp", safe, 3);
        let s2 = p.while_stmt(cond, vec![body], 2);
        let x = p.var("x", 5);
        let s3 = call_stmt(&mut p, "system", vec![x], 5);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].certainty, 100);
    }

    #[test]
    fn user_function_return_propagates_taint() {
        let mut p = Program::new();
        let a = p.var("a", 2);
        let ret = p.return_stmt(Some(a), 2);
        let decl = p.function_decl("pass", &["a"], vec![ret], 1);
        let src = superglobal_read(&mut p, "_GET", "id", 4);
        let s1 = assign_var(&mut p, "x", src, 4);
        let x = p.var("x", 5);
        let inlined = p.call("pass", vec![x], 5);
        let s2 = call_stmt(&mut p, "mysql_query", vec![inlined], 5);
        p.push(decl);
        p.push(s1);
        p.push(s2);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].category, FindingCategory::Sql);
        assert_eq!(report.findings[0].certainty, 100);
    }

    #[test]
    fn element_access_argument_compounds_the_penalty() {
        let mut p = Program::new();
        let a = p.var("a", 2);
        let ret = p.return_stmt(Some(a), 2);
        let decl = p.function_decl("pass", &["a"], vec![ret], 1);
        let src = superglobal_read(&mut p, "_GET", "id", 4);
        let inlined = p.call("pass", vec![src], 4);
        let s1 = call_stmt(&mut p, "mysql_query", vec![inlined], 4);
        p.push(decl);
        p.push(s1);

        let report = analyze(&p);

        // the superglobal read is full-certainty input taint, and the
        // element-access binding penalty halves it once more
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].certainty, 50);
    }

    #[test]
    fn function_without_return_evaluates_clean() {
        let mut p = Program::new();
        let a = p.var("a", 2);
        let body = assign_var(&mut p, "b", a, 2);
        let decl = p.function_decl("swallow", &["a"], vec![body], 1);
        let src = superglobal_read(&mut p, "_GET", "id", 4);
        let s1 = assign_var(&mut p, "x", src, 4);
        let x = p.var("x", 5);
        let inlined = p.call("swallow", vec![x], 5);
        let s2 = call_stmt(&mut p, "mysql_query", vec![inlined], 5);
        p.push(decl);
        p.push(s1);
        p.push(s2);

        let report = analyze(&p);

        assert!(report.findings.is_empty());
    }

    #[test]
    fn recursion_stops_at_the_depth_budget() {
        let mut p = Program::new();
        let a = p.var("a", 2);
        let recur = p.call("loopy", vec![a], 2);
        let ret = p.return_stmt(Some(recur), 2);
        let decl = p.function_decl("loopy", &["a"], vec![ret], 1);
        let src = superglobal_read(&mut p, "_GET", "id", 4);
        let call = p.call("loopy", vec![src], 4);
        let s1 = p.expr_stmt(call, 4);
        p.push(decl);
        p.push(s1);

        let report = analyze_with(&p, AnalysisOptions { max_call_depth: 4 });

        assert!(report.findings.is_empty());
        assert!(
            report
                .diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::CallDepthExceeded)
        );
    }

    #[test]
    fn writes_through_an_alias_are_visible_everywhere() {
        let mut p = Program::new();
        let b = p.var("b", 1);
        let a = p.var("a", 1);
        let bind = p.assign_ref(b, a, 1);
        let s1 = p.expr_stmt(bind, 1);
        let src = superglobal_read(&mut p, "_GET", "id", 2);
        let s2 = assign_var(&mut p, "b", src, 2);
        let a_read = p.var("a", 3);
        let s3 = call_stmt(&mut p, "system", vec![a_read], 3);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].category, FindingCategory::Cmd);
    }

    #[test]
    fn aliased_object_handles_share_property_taint() {
        let mut p = Program::new();
        let src = superglobal_read(&mut p, "_GET", "id", 1);
        let prop = p.prop_fetch("o", "field", 1);
        let store = p.assign(prop, src, 1);
        let s1 = p.expr_stmt(store, 1);
        let o = p.var("o", 2);
        let s2 = assign_var(&mut p, "q", o, 2);
        let read = p.prop_fetch("q", "field", 3);
        let s3 = call_stmt(&mut p, "mysql_query", vec![read], 3);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].category, FindingCategory::Sql);
    }

    #[test]
    fn array_push_taints_the_array_identity() {
        let mut p = Program::new();
        let src = superglobal_read(&mut p, "_GET", "id", 1);
        let s1 = assign_var(&mut p, "x", src, 1);
        let arr = p.var("arr", 2);
        let x = p.var("x", 2);
        let s2 = call_stmt(&mut p, "array_push", vec![arr, x], 2);
        let arr_read = p.var("arr", 3);
        let s3 = call_stmt(&mut p, "mysql_query", vec![arr_read], 3);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].category, FindingCategory::Sql);
    }

    #[test]
    fn interpolated_string_with_tainted_part_is_tainted() {
        let mut p = Program::new();
        let src = superglobal_read(&mut p, "_GET", "name", 1);
        let s1 = assign_var(&mut p, "x", src, 1);
        let head = p.interp_part("SELECT * FROM users WHERE name = ", 2);
        let x = p.var("x", 2);
        let interp = p.interp(vec![head, x], 2);
        let s2 = assign_var(&mut p, "query", interp, 2);
        let query = p.var("query", 3);
        let s3 = call_stmt(&mut p, "mysql_query", vec![query], 3);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].certainty, 100);
    }

    #[test]
    fn method_call_matches_the_composite_sink_key() {
        let mut p = Program::new();
        let src = superglobal_read(&mut p, "_GET", "id", 1);
        let s1 = assign_var(&mut p, "x", src, 1);
        let x = p.var("x", 2);
        let call = p.method_call("mysqli", "query", vec![x], 2);
        let s2 = p.expr_stmt(call, 2);
        p.push(s1);
        p.push(s2);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].category, FindingCategory::Sql);
    }

    #[test]
    fn unclassified_builtin_forwards_taint() {
        let mut p = Program::new();
        let src = superglobal_read(&mut p, "_GET", "id", 1);
        let s1 = assign_var(&mut p, "x", src, 1);
        let x = p.var("x", 2);
        let upper = p.call("strtoupper", vec![x], 2);
        let s2 = assign_var(&mut p, "y", upper, 2);
        let y = p.var("y", 3);
        let s3 = call_stmt(&mut p, "mysql_query", vec![y], 3);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].certainty, 100);
    }

    #[test]
    fn unsupported_nodes_degrade_to_diagnostics() {
        let mut p = Program::new();
        let expr = p.add_expr(ExprKind::Unsupported("closure".to_string()), 1);
        let s1 = p.expr_stmt(expr, 1);
        let s2 = p.add_stmt(StmtKind::Unsupported("switch".to_string()), 2);
        let src = superglobal_read(&mut p, "_GET", "id", 3);
        let s3 = assign_var(&mut p, "x", src, 3);
        let x = p.var("x", 4);
        let s4 = call_stmt(&mut p, "mysql_query", vec![x], 4);
        p.push(s1);
        p.push(s2);
        p.push(s3);
        p.push(s4);

        let report = analyze(&p);

        // analysis continues past the unsupported nodes
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.diagnostics.len(), 2);
        assert!(
            report
                .diagnostics
                .iter()
                .all(|d| d.kind == DiagnosticKind::UnsupportedConstruct)
        );
    }

    #[test]
    fn database_source_triggers_xss_but_not_sql() {
        let mut p = Program::new();
        let file = p.str_lit("data.txt", 1);
        let read = p.call("file_get_contents", vec![file], 1);
        let s1 = assign_var(&mut p, "d", read, 1);
        let d1 = p.var("d", 2);
        let s2 = call_stmt(&mut p, "mysql_query", vec![d1], 2);
        let d2 = p.var("d", 3);
        let s3 = call_stmt(&mut p, "print_", vec![d2], 3);
        p.push(s1);
        p.push(s2);
        p.push(s3);

        let report = analyze(&p);

        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.category, FindingCategory::Xss);
        assert_eq!(finding.line, 3);
        assert_eq!(finding.certainty, 100);
    }
}
