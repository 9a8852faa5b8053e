use super::{Context, Interpreter, RuntimeInterrupt};
use crate::prelude::*;

type ExecResult = Result<(), RuntimeInterrupt>;

impl Interpreter {
    /// Runs the instructions in order and stops at the first terminating one.
    pub fn execute_block(&mut self, block: &Block, context: &Shared<Context>) -> ExecResult {
        for instruction in block.instructions() {
            self.line = instruction.line();
            self.tick()?;
            self.execute(instruction, context)?;
        }

        Ok(())
    }

    pub fn execute(&mut self, instruction: &Instruction, context: &Shared<Context>) -> ExecResult {
        self.line = instruction.line();

        match instruction {
            Instruction::Expression { expr, .. } => {
                self.evaluate_expression(expr, context)?;
            }
            Instruction::Declaration { name, value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate_expression(expr, context)?,
                    None => Object::Undefined,
                };

                context.borrow_mut().declare(name, value);
            }
            Instruction::Assignment { name, operator, value, .. } => {
                self.execute_assignment(name, *operator, value, context)?
            }
            Instruction::Return { line, value } => {
                let value = match value {
                    Some(expr) => self.evaluate_expression(expr, context)?,
                    None => Object::Undefined,
                };

                return Err(RuntimeInterrupt::Return { line: *line, value });
            }
            Instruction::Break { line } => return Err(RuntimeInterrupt::Break { line: *line }),
            Instruction::Continue { line } => {
                return Err(RuntimeInterrupt::Continue { line: *line })
            }
            Instruction::If(instruction) => self.execute_if(instruction, context)?,
            Instruction::While(instruction) => self.execute_while(instruction, context)?,
        };

        Ok(())
    }

    fn execute_assignment(
        &mut self,
        name: &str,
        operator: AssignOp,
        value: &Expression,
        context: &Shared<Context>,
    ) -> ExecResult {
        let value = self.evaluate_expression(value, context)?;

        let value = match operator {
            AssignOp::Assign => value,
            _ => {
                let lookup = context.borrow().get(name);
                match lookup {
                    Ok(current) => operator.apply(&current, value),
                    Err(_) => {
                        self.undeclared_assignment(name);
                        return Ok(());
                    }
                }
            }
        };

        let result = context.borrow_mut().set(name, value);
        if result.is_err() {
            self.undeclared_assignment(name);
        }

        Ok(())
    }

    fn undeclared_assignment(&mut self, name: &str) {
        self.diagnose(
            DiagnosticKind::UndeclaredAssignment,
            format!("Assignment to undeclared variable: {name}"),
        );
    }

    /// Both branches run in the context of the `if` itself.
    fn execute_if(&mut self, instruction: &IfInstruction, context: &Shared<Context>) -> ExecResult {
        let condition = self.evaluate_expression(&instruction.condition, context)?;

        if condition.is_truthy() {
            self.execute_block(&instruction.then_block, context)
        } else if let Some(ref else_block) = instruction.else_block {
            self.execute_block(else_block, context)
        } else {
            Ok(())
        }
    }

    fn execute_while(
        &mut self,
        instruction: &WhileInstruction,
        context: &Shared<Context>,
    ) -> ExecResult {
        loop {
            self.line = instruction.line;
            let condition = self.evaluate_expression(&instruction.condition, context)?;
            if !condition.is_truthy() {
                break;
            }

            self.tick()?;

            // `break` and `continue` end their journey here, anything else is
            // propagated up.
            match self.execute_block(&instruction.body, context) {
                Ok(()) | Err(RuntimeInterrupt::Continue { .. }) => {}
                Err(RuntimeInterrupt::Break { .. }) => break,
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}
