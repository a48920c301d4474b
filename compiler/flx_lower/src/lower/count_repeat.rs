//! Counting loop canonicalization.
//!
//! `repeat [var] [from START] to END [step STEP] body` becomes
//! `For { init, cond, step, body }`. Temporaries appear only where a value
//! would otherwise be evaluated more than once or could change under the
//! body: an unnamed loop variable (`_idx_`), a start that reads the loop
//! variable or has side effects (`_start_`), a limit that is neither
//! constant nor an unmodified variable (`_limit_`), and a step whose sign is
//! only known at run time (`_step_`).

use flx_diagnostic::{ErrorCode, InternalError};
use flx_ir::{BinaryOp, ForKind, Name, NodeId, NodeKind, NodeList, Span, UnaryOp};

use super::Lowerer;

const IDX_PREFIX: &str = "_idx_";
const START_PREFIX: &str = "_start_";
const LIMIT_PREFIX: &str = "_limit_";
const STEP_PREFIX: &str = "_step_";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    const fn sign(self) -> i64 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum LoopVar {
    Named(Name),
    Result,
}

/// A loop bound referenced from more than one place.
#[derive(Copy, Clone, Debug)]
enum Operand {
    /// Side-effect-free expression, copied at every use.
    Expr(NodeId),
    Temp(Name),
}

#[derive(Copy, Clone, Debug)]
enum Step {
    Const(i64),
    Temp(Name),
}

impl Lowerer<'_, '_> {
    /// Replace the `CountRepeat` at `id` by a `For`.
    pub(super) fn lower_count_repeat(&mut self, id: NodeId) -> Result<(), InternalError> {
        let NodeKind::CountRepeat {
            var,
            from,
            to,
            step,
            body,
        } = *self.sema.program.nodes.kind(id)
        else {
            return Ok(());
        };
        let span = self.span(id);
        if !to.is_valid() {
            return Err(InternalError::UnexpectedNode {
                expected: "loop limit",
                found: "nothing",
                span,
            });
        }
        let named = match self.sema.program.nodes.get(var).cloned() {
            None => None,
            Some(NodeKind::Ident(name)) => Some(LoopVar::Named(name)),
            Some(NodeKind::Result) => Some(LoopVar::Result),
            Some(_) => {
                self.sema
                    .error(ErrorCode::E2011, id, "Need a variable name for the loop");
                self.sema.program.nodes.replace(id, NodeKind::Nop);
                return Ok(());
            }
        };

        let cx = self.cx;
        let c_like = self.sema.config.c_like();
        let step = if step.is_valid() { step } else { self.int(1, span) };
        let step_const = self
            .sema
            .eval_const(cx, step)
            .map(i64::from)
            .filter(|&k| k != 0);
        let magnitude = step_const.map(i64::abs);

        // Direction and loop shape from the bounds.
        let (mut from, mut to) = (from, to);
        let mut test = None;
        let mut dir = None;
        let mut kind = ForKind::TestFirst;
        if from.is_valid() {
            let bounds = (self.sema.eval_const(cx, from), self.sema.eval_const(cx, to));
            if let (Some(a), Some(b)) = bounds {
                dir = Some(if a > b { Direction::Down } else { Direction::Up });
                if !c_like {
                    kind = ForKind::AtLeastOnce;
                }
            }
        } else {
            let count = self.sema.eval_const(cx, to);
            if c_like && count.is_some() {
                from = self.int(0, span);
                test = Some(BinaryOp::Lt);
                dir = Some(Direction::Up);
            } else {
                from = to;
                to = self.int(0, span);
                test = Some(if magnitude == Some(1) {
                    BinaryOp::Ne
                } else {
                    BinaryOp::Gt
                });
                dir = Some(Direction::Down);
                if !c_like && count.is_some_and(|n| n > 0) {
                    kind = ForKind::AtLeastOnce;
                }
            }
        }

        let (var, loop_var) = match named {
            Some(v) => (var, v),
            None => {
                let name = self.temp(IDX_PREFIX)?;
                (self.ident(name, span), LoopVar::Named(name))
            }
        };

        // Initialization: the loop variable, then saved bounds.
        let mut init = NodeList::new();
        let from_const = self.sema.is_const_expr(cx, from);
        let start = if !from_const
            && (self.mentions(from, loop_var) || self.sema.program.nodes.has_side_effects(from))
        {
            let name = self.temp(START_PREFIX)?;
            let slot = self.ident(name, span);
            let saved = self.assign(slot, from, span);
            init.push(self.assign(var, saved, span));
            Operand::Temp(name)
        } else {
            init.push(self.assign(var, from, span));
            Operand::Expr(from)
        };

        let to_const = self.sema.eval_const(cx, to);
        let mut limit = match to_const {
            Some(v) if self.sema.config.expand_constants => {
                Operand::Expr(self.int(i64::from(v), span))
            }
            Some(_) => Operand::Expr(to),
            None if self.is_invariant(to, body) => Operand::Expr(to),
            None => {
                let name = self.temp(LIMIT_PREFIX)?;
                let slot = self.ident(name, span);
                init.push(self.assign(slot, to, span));
                Operand::Temp(name)
            }
        };

        let step_value = match (step_const, dir) {
            (Some(k), Some(d)) => Step::Const(d.sign() * k.abs()),
            _ => {
                let name = self.temp(STEP_PREFIX)?;
                let (up, down) = match step_const {
                    Some(k) => (self.int(k.abs(), span), self.int(-k.abs(), span)),
                    None => {
                        let copy = self.sema.program.nodes.deep_copy(step);
                        let negated = self.sema.program.nodes.unary(UnaryOp::Negate, copy, span);
                        (step, negated)
                    }
                };
                let end = self.operand(limit, span);
                let begin = self.operand(start, span);
                let rising = self.sema.program.nodes.binary(BinaryOp::Gt, end, begin, span);
                let choice = self.sema.program.nodes.alloc(
                    NodeKind::Cond {
                        cond: rising,
                        then_val: up,
                        else_val: down,
                    },
                    span,
                );
                let slot = self.ident(name, span);
                init.push(self.assign(slot, choice, span));
                Step::Temp(name)
            }
        };

        let step_stmt = self.step_statement(loop_var, step_value, span);

        // Termination test.
        let cond = if let Some(op) = test {
            let v = self.var_ref(loop_var, span);
            let end = self.operand(limit, span);
            self.sema.program.nodes.binary(op, v, end, span)
        } else if magnitude == Some(1) {
            // Test against the first value past the end.
            let op = match (dir, step_value) {
                (Some(d), _) => {
                    limit = match to_const {
                        Some(v) => Operand::Expr(self.int(i64::from(v) + d.sign(), span)),
                        None => {
                            let one = self.int(1, span);
                            let adjust = if d == Direction::Up {
                                BinaryOp::Add
                            } else {
                                BinaryOp::Sub
                            };
                            self.adjust_limit(limit, adjust, one, &mut init, span)?
                        }
                    };
                    if d == Direction::Up {
                        BinaryOp::Lt
                    } else {
                        BinaryOp::Ne
                    }
                }
                (None, Step::Temp(step_temp)) => {
                    let delta = self.ident(step_temp, span);
                    limit = self.adjust_limit(limit, BinaryOp::Add, delta, &mut init, span)?;
                    BinaryOp::Ne
                }
                (None, Step::Const(_)) => BinaryOp::Ne,
            };
            if op == BinaryOp::Ne && !c_like {
                kind = ForKind::AtLeastOnce;
            }
            let v = self.var_ref(loop_var, span);
            let end = self.operand(limit, span);
            self.sema.program.nodes.binary(op, v, end, span)
        } else {
            let value = self.var_ref(loop_var, span);
            let low = self.operand(start, span);
            let high = self.operand(limit, span);
            if !c_like {
                kind = ForKind::AtLeastOnce;
            }
            self.sema
                .program
                .nodes
                .alloc(NodeKind::IsBetween { value, low, high }, span)
        };

        let init = if init.len() == 1 {
            init[0]
        } else {
            self.sema.program.nodes.alloc(NodeKind::Seq(init), span)
        };
        self.sema.program.nodes.replace(
            id,
            NodeKind::For {
                kind,
                init,
                cond,
                step: step_stmt,
                body,
            },
        );
        tracing::debug!(?kind, ?dir, ?step_value, "lowered counting loop");
        Ok(())
    }

    fn step_statement(&mut self, var: LoopVar, step: Step, span: Span) -> NodeId {
        let target = self.var_ref(var, span);
        let (op, amount) = match step {
            Step::Const(1) => {
                return self.sema.program.nodes.unary(UnaryOp::Increment, target, span);
            }
            Step::Const(-1) => {
                return self.sema.program.nodes.unary(UnaryOp::Decrement, target, span);
            }
            Step::Const(s) if s < 0 => (BinaryOp::Sub, self.int(-s, span)),
            Step::Const(s) => (BinaryOp::Add, self.int(s, span)),
            Step::Temp(name) => (BinaryOp::Add, self.ident(name, span)),
        };
        let current = self.var_ref(var, span);
        let next = self.sema.program.nodes.binary(op, current, amount, span);
        self.assign(target, next, span)
    }

    /// Set a limit temporary to `limit op delta` and return it. An existing
    /// limit temporary is reused.
    fn adjust_limit(
        &mut self,
        limit: Operand,
        op: BinaryOp,
        delta: NodeId,
        init: &mut NodeList,
        span: Span,
    ) -> Result<Operand, InternalError> {
        let name = match limit {
            Operand::Temp(name) => name,
            Operand::Expr(_) => self.temp(LIMIT_PREFIX)?,
        };
        let current = self.operand(limit, span);
        let adjusted = self.sema.program.nodes.binary(op, current, delta, span);
        let slot = self.ident(name, span);
        init.push(self.assign(slot, adjusted, span));
        Ok(Operand::Temp(name))
    }

    /// A fresh node reading `operand`.
    fn operand(&mut self, operand: Operand, span: Span) -> NodeId {
        match operand {
            Operand::Expr(expr) => self.sema.program.nodes.deep_copy(expr),
            Operand::Temp(name) => self.ident(name, span),
        }
    }

    fn var_ref(&mut self, var: LoopVar, span: Span) -> NodeId {
        match var {
            LoopVar::Named(name) => self.ident(name, span),
            LoopVar::Result => self.sema.program.nodes.alloc(NodeKind::Result, span),
        }
    }

    fn mentions(&self, expr: NodeId, var: LoopVar) -> bool {
        let nodes = &self.sema.program.nodes;
        match var {
            LoopVar::Named(name) => nodes.uses_name(expr, name),
            LoopVar::Result => nodes
                .descendants(expr)
                .any(|id| matches!(nodes.kind(id), NodeKind::Result)),
        }
    }

    /// A plain variable the body never assigns.
    fn is_invariant(&self, expr: NodeId, body: NodeId) -> bool {
        let nodes = &self.sema.program.nodes;
        nodes
            .ident_name(expr)
            .is_some_and(|name| !nodes.modifies_name(body, name))
    }
}
