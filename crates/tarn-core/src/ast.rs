//! Program tree consumed by the taint analyzer
//!
//! Parsing is an external collaborator: a front end hands the analyzer an
//! already-built tree of typed nodes carrying source line numbers. This
//! module owns the definition of that tree - arena-allocated expression and
//! statement nodes, each a tagged union restricted to the constructs taint
//! tracking needs. Front-end constructs outside that subset arrive as
//! `Unsupported` nodes and degrade gracefully during analysis.

use id_arena::{Arena, Id};

pub type ExprId = Id<ExprNode>;
pub type StmtId = Id<StmtNode>;

#[derive(Debug, Clone)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Variable read, e.g. `$x`.
    Var(String),
    IntLit(i64),
    StrLit(String),
    /// Array element access, e.g. `$arr[$i]`. The index never influences
    /// taint; it is kept for front-end fidelity only.
    ArrayDim {
        base: ExprId,
        index: Option<ExprId>,
    },
    /// Property access on a simple object handle, e.g. `$obj->field`.
    PropFetch { object: String, property: String },
    /// Binary operation. The operator itself never influences taint.
    Binary { left: ExprId, right: ExprId },
    /// Interpolated string: literal fragments and embedded expressions.
    Interp(Vec<ExprId>),
    /// Literal fragment of an interpolated string.
    InterpPart(String),
    /// Named constant such as `true` or `false`.
    Const(String),
    Call { name: String, args: Vec<ExprId> },
    MethodCall {
        receiver: String,
        method: String,
        args: Vec<ExprId>,
    },
    /// Call-argument wrapper; evaluation forwards the inner expression.
    Arg(ExprId),
    /// Array literal; element taint is not tracked individually.
    ArrayLit,
    Assign { target: ExprId, value: ExprId },
    /// Reference assignment, e.g. `$a = &$b`.
    AssignRef { target: ExprId, value: ExprId },
    /// Front-end construct outside the taint subset.
    Unsupported(String),
}

#[derive(Debug, Clone)]
pub struct StmtNode {
    pub kind: StmtKind,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Expr(ExprId),
    FunctionDecl {
        name: String,
        params: Vec<String>,
        body: Vec<StmtId>,
    },
    If {
        cond: ExprId,
        then_branch: Vec<StmtId>,
        else_branch: Option<Vec<StmtId>>,
    },
    While { cond: ExprId, body: Vec<StmtId> },
    Return(Option<ExprId>),
    /// Front-end construct outside the taint subset.
    Unsupported(String),
}

/// An analyzable program: node arenas plus the top-level statement sequence.
#[derive(Debug, Default)]
pub struct Program {
    exprs: Arena<ExprNode>,
    stmts: Arena<StmtNode>,
    body: Vec<StmtId>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expr(&self, id: ExprId) -> &ExprNode {
        &self.exprs[id]
    }

    pub fn stmt(&self, id: StmtId) -> &StmtNode {
        &self.stmts[id]
    }

    pub fn body(&self) -> &[StmtId] {
        &self.body
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn add_expr(&mut self, kind: ExprKind, line: u32) -> ExprId {
        self.exprs.alloc(ExprNode { kind, line })
    }

    pub fn add_stmt(&mut self, kind: StmtKind, line: u32) -> StmtId {
        self.stmts.alloc(StmtNode { kind, line })
    }

    /// Appends a statement to the top-level sequence.
    pub fn push(&mut self, stmt: StmtId) {
        self.body.push(stmt);
    }

    // Typed constructors, the surface a front end builds trees through.

    pub fn var(&mut self, name: &str, line: u32) -> ExprId {
        self.add_expr(ExprKind::Var(name.to_string()), line)
    }

    pub fn int_lit(&mut self, value: i64, line: u32) -> ExprId {
        self.add_expr(ExprKind::IntLit(value), line)
    }

    pub fn str_lit(&mut self, value: &str, line: u32) -> ExprId {
        self.add_expr(ExprKind::StrLit(value.to_string()), line)
    }

    pub fn array_dim(&mut self, base: ExprId, index: Option<ExprId>, line: u32) -> ExprId {
        self.add_expr(ExprKind::ArrayDim { base, index }, line)
    }

    pub fn prop_fetch(&mut self, object: &str, property: &str, line: u32) -> ExprId {
        self.add_expr(
            ExprKind::PropFetch {
                object: object.to_string(),
                property: property.to_string(),
            },
            line,
        )
    }

    pub fn binary(&mut self, left: ExprId, right: ExprId, line: u32) -> ExprId {
        self.add_expr(ExprKind::Binary { left, right }, line)
    }

    pub fn interp(&mut self, parts: Vec<ExprId>, line: u32) -> ExprId {
        self.add_expr(ExprKind::Interp(parts), line)
    }

    pub fn interp_part(&mut self, text: &str, line: u32) -> ExprId {
        self.add_expr(ExprKind::InterpPart(text.to_string()), line)
    }

    pub fn constant(&mut self, name: &str, line: u32) -> ExprId {
        self.add_expr(ExprKind::Const(name.to_string()), line)
    }

    pub fn call(&mut self, name: &str, args: Vec<ExprId>, line: u32) -> ExprId {
        self.add_expr(
            ExprKind::Call {
                name: name.to_string(),
                args,
            },
            line,
        )
    }

    pub fn method_call(
        &mut self,
        receiver: &str,
        method: &str,
        args: Vec<ExprId>,
        line: u32,
    ) -> ExprId {
        self.add_expr(
            ExprKind::MethodCall {
                receiver: receiver.to_string(),
                method: method.to_string(),
                args,
            },
            line,
        )
    }

    pub fn arg(&mut self, inner: ExprId, line: u32) -> ExprId {
        self.add_expr(ExprKind::Arg(inner), line)
    }

    pub fn array_lit(&mut self, line: u32) -> ExprId {
        self.add_expr(ExprKind::ArrayLit, line)
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId, line: u32) -> ExprId {
        self.add_expr(ExprKind::Assign { target, value }, line)
    }

    pub fn assign_ref(&mut self, target: ExprId, value: ExprId, line: u32) -> ExprId {
        self.add_expr(ExprKind::AssignRef { target, value }, line)
    }

    pub fn expr_stmt(&mut self, expr: ExprId, line: u32) -> StmtId {
        self.add_stmt(StmtKind::Expr(expr), line)
    }

    pub fn function_decl(
        &mut self,
        name: &str,
        params: &[&str],
        body: Vec<StmtId>,
        line: u32,
    ) -> StmtId {
        self.add_stmt(
            StmtKind::FunctionDecl {
                name: name.to_string(),
                params: params.iter().map(|p| p.to_string()).collect(),
                body,
            },
            line,
        )
    }

    pub fn if_stmt(
        &mut self,
        cond: ExprId,
        then_branch: Vec<StmtId>,
        else_branch: Option<Vec<StmtId>>,
        line: u32,
    ) -> StmtId {
        self.add_stmt(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            line,
        )
    }

    pub fn while_stmt(&mut self, cond: ExprId, body: Vec<StmtId>, line: u32) -> StmtId {
        self.add_stmt(StmtKind::While { cond, body }, line)
    }

    pub fn return_stmt(&mut self, expr: Option<ExprId>, line: u32) -> StmtId {
        self.add_stmt(StmtKind::Return(expr), line)
    }
}
