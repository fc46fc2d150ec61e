use std::fmt::Write as _;

use crate::expression::ast::{Expr, Var};

/// Context needed to lower an [`Expr`] to ffmpeg expression syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LowerCtx {
    /// Frame count that `Var::Progress` is normalized against.
    pub total_frames: u64,
}

impl Expr {
    /// Render as an ffmpeg `zoompan` expression (`on`, `iw`, `ih`, `zoom`).
    pub fn lower(&self, ctx: LowerCtx) -> String {
        let mut out = String::new();
        lower_into(self, ctx, &mut out);
        out
    }
}

fn lower_into(e: &Expr, ctx: LowerCtx, out: &mut String) {
    match e {
        Expr::Const(c) => {
            if *c < 0.0 {
                let _ = write!(out, "({c})");
            } else {
                let _ = write!(out, "{c}");
            }
        }
        Expr::Var(Var::Progress) => {
            let _ = write!(out, "(on/{})", ctx.total_frames);
        }
        Expr::Var(Var::InputWidth) => out.push_str("iw"),
        Expr::Var(Var::InputHeight) => out.push_str("ih"),
        Expr::Var(Var::Zoom) => out.push_str("zoom"),
        Expr::Binary { op, left, right } => {
            let prec = op.precedence();
            lower_operand(left, prec, false, ctx, out);
            out.push(op.symbol());
            lower_operand(right, prec, true, ctx, out);
        }
    }
}

fn lower_operand(e: &Expr, parent_prec: u8, is_right: bool, ctx: LowerCtx, out: &mut String) {
    let needs_parens = match e {
        Expr::Binary { op, .. } => {
            let prec = op.precedence();
            // Right operands of equal precedence keep their grouping: `a-(b-c)`, `a/(b*c)`.
            prec < parent_prec || (is_right && prec == parent_prec)
        }
        _ => false,
    };
    if needs_parens {
        out.push('(');
        lower_into(e, ctx, out);
        out.push(')');
    } else {
        lower_into(e, ctx, out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/lower.rs"]
mod tests;
