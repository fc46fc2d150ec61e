use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Free variables an expression may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Var {
    /// Normalized progress through the clip, `frame_index / total_frames`.
    Progress,
    /// Source frame width in pixels.
    InputWidth,
    /// Source frame height in pixels.
    InputHeight,
    /// Zoom factor at the current frame (only valid inside offset expressions).
    Zoom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub(crate) fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }

    pub(crate) fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

/// Expression tree over [`Var`]s and constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Expr {
    Const(f64),
    Var(Var),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Variable bindings for numeric evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Env {
    pub progress: f64,
    pub input_width: f64,
    pub input_height: f64,
    pub zoom: Option<f64>,
}

impl Expr {
    pub fn constant(v: f64) -> Self {
        Self::Const(v)
    }

    pub fn var(v: Var) -> Self {
        Self::Var(v)
    }

    pub fn progress() -> Self {
        Self::Var(Var::Progress)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `true` if `v` occurs anywhere in the tree.
    pub fn references(&self, v: Var) -> bool {
        match self {
            Self::Const(_) => false,
            Self::Var(x) => *x == v,
            Self::Binary { left, right, .. } => left.references(v) || right.references(v),
        }
    }

    /// Evaluate numerically. Non-finite results (e.g. division by zero) are errors.
    pub fn eval(&self, env: &Env) -> StoryreelResult<f64> {
        let v = match self {
            Self::Const(c) => *c,
            Self::Var(Var::Progress) => env.progress,
            Self::Var(Var::InputWidth) => env.input_width,
            Self::Var(Var::InputHeight) => env.input_height,
            Self::Var(Var::Zoom) => env
                .zoom
                .ok_or_else(|| StoryreelError::validation("expression references unbound zoom"))?,
            Self::Binary { op, left, right } => {
                let a = left.eval(env)?;
                let b = right.eval(env)?;
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                }
            }
        };
        if !v.is_finite() {
            return Err(StoryreelError::validation(format!(
                "expression evaluated to non-finite value at progress {}",
                env.progress
            )));
        }
        Ok(v)
    }
}

impl std::ops::Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Add, self, rhs)
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Sub, self, rhs)
    }
}

impl std::ops::Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Mul, self, rhs)
    }
}

impl std::ops::Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Div, self, rhs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/ast.rs"]
mod tests;
