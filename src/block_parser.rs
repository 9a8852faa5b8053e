use crate::prelude::*;

/// A parsed script: the root block, the functions it defines and any warnings
/// noticed while parsing.
#[derive(Debug, Default)]
pub struct Script {
    pub block: Block,
    pub functions: Vec<Function>,
    pub warnings: Vec<Diagnostic>,
}

/// A block that is still collecting instructions, together with the construct that
/// will own it once its `end` is reached.
enum OpenBlock {
    Function { line: usize, name: String, params: Vec<String>, body: Block },
    Then { line: usize, condition: Expression, block: Block },
    Else { instruction: IfInstruction, block: Block },
    While { line: usize, condition: Expression, body: Block },
}

impl OpenBlock {
    fn line(&self) -> usize {
        match self {
            OpenBlock::Function { line, .. }
            | OpenBlock::Then { line, .. }
            | OpenBlock::While { line, .. } => *line,
            OpenBlock::Else { instruction, .. } => instruction.line,
        }
    }

    fn block_mut(&mut self) -> &mut Block {
        match self {
            OpenBlock::Function { body, .. } | OpenBlock::While { body, .. } => body,
            OpenBlock::Then { block, .. } | OpenBlock::Else { block, .. } => block,
        }
    }
}

/// Builds the block tree of a script one line at a time.
#[derive(Default)]
pub struct BlockParser {
    root: Block,
    open: Vec<OpenBlock>,
    functions: Vec<Function>,
    warnings: Vec<Diagnostic>,
}

impl BlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(mut self, source: &str) -> Result<Script, ParseError> {
        for (index, text) in source.lines().enumerate() {
            let line = index + 1;
            let text = text.trim();
            if text.is_empty() || text.starts_with("//") {
                continue;
            }

            self.parse_line(line, text)?;
        }

        // Blocks left open at the end of the input are closed implicitly.
        while let Some(open) = self.open.pop() {
            let line = open.line();
            self.warnings.push(Diagnostic::new(
                DiagnosticKind::UnclosedBlock,
                line,
                format!("Block opened on line {line} is never closed with 'end'"),
            ));
            self.close(open);
        }

        Ok(Script { block: self.root, functions: self.functions, warnings: self.warnings })
    }

    fn parse_line(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        if text == "end" {
            let open = self.open.pop().ok_or(ParseError::UnmatchedBlock { line })?;
            log::trace!("line {line}: closing block opened on line {}", open.line());
            self.close(open);
        } else if text == "else" {
            match self.open.pop() {
                Some(OpenBlock::Then { line: if_line, condition, block }) => {
                    let instruction = IfInstruction {
                        line: if_line,
                        condition,
                        then_block: block,
                        else_block: None,
                    };
                    self.open.push(OpenBlock::Else { instruction, block: Block::new() });
                }
                Some(_) => return Err(ParseError::DanglingElse { line }),
                None => return Err(ParseError::UnmatchedBlock { line }),
            }
        } else if let Some(header) = strip_keyword(text, "function") {
            let (name, params) = parse_function_header(header)
                .ok_or_else(|| ParseError::MalformedFunction { line, header: text.to_owned() })?;
            log::trace!("line {line}: function {name}({})", params.join(", "));
            self.open.push(OpenBlock::Function { line, name, params, body: Block::new() });
        } else if let Some(rest) = strip_keyword(text, "if") {
            let condition = parse_condition(line, text, rest)?;
            self.open.push(OpenBlock::Then { line, condition, block: Block::new() });
        } else if let Some(rest) = strip_keyword(text, "while") {
            let condition = parse_condition(line, text, rest)?;
            self.open.push(OpenBlock::While { line, condition, body: Block::new() });
        } else {
            let instruction = parse_instruction(line, text)?;
            self.current_block().push(instruction);
        }

        Ok(())
    }

    fn current_block(&mut self) -> &mut Block {
        match self.open.last_mut() {
            Some(open) => open.block_mut(),
            None => &mut self.root,
        }
    }

    /// Hands a finished block to the construct that owns it.
    fn close(&mut self, open: OpenBlock) {
        let instruction = match open {
            OpenBlock::Function { name, params, body, .. } => {
                self.functions.push(Function::new(&name, params, body));
                return;
            }
            OpenBlock::Then { line, condition, block } => Instruction::If(IfInstruction {
                line,
                condition,
                then_block: block,
                else_block: None,
            }),
            OpenBlock::Else { mut instruction, block } => {
                instruction.else_block = Some(block);
                Instruction::If(instruction)
            }
            OpenBlock::While { line, condition, body } => {
                Instruction::While(WhileInstruction { line, condition, body })
            }
        };

        self.current_block().push(instruction);
    }
}

/// Returns what follows `keyword` when `text` starts with it as a whole word.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '(' => Some(rest.trim_start()),
        Some(_) => None,
    }
}

/// `name(p1, p2, ...)` into the name and the parameter list.
fn parse_function_header(header: &str) -> Option<(String, Vec<String>)> {
    let open = header.find('(')?;
    let inner = header.strip_suffix(')')?.get(open + 1..)?;

    let name = header[..open].trim();
    if name.is_empty() || !is_identifier(name) {
        return None;
    }

    let params = inner
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect();

    Some((name.to_owned(), params))
}

/// The condition of `if`/`while` is everything after the keyword, which must be
/// wrapped in parentheses.
fn parse_condition(line: usize, text: &str, rest: &str) -> Result<Expression, ParseError> {
    if rest.starts_with('(') && rest.ends_with(')') {
        Ok(Expression::compile(rest))
    } else {
        Err(ParseError::MalformedCondition { line, header: text.to_owned() })
    }
}

fn parse_instruction(line: usize, text: &str) -> Result<Instruction, ParseError> {
    if text == "break" {
        return Ok(Instruction::Break { line });
    }
    if text == "continue" {
        return Ok(Instruction::Continue { line });
    }
    if let Some(rest) = strip_keyword(text, "return") {
        let value = if rest.is_empty() { None } else { Some(Expression::compile(rest)) };
        return Ok(Instruction::Return { line, value });
    }
    if let Some(rest) = strip_keyword(text, "let") {
        let (name, value) = match rest.split_once('=') {
            Some((name, value)) => (name.trim(), Some(Expression::compile(value))),
            None => (rest, None),
        };

        if !is_identifier(name) {
            return Err(ParseError::MalformedDeclaration { line, text: text.to_owned() });
        }

        return Ok(Instruction::Declaration { line, name: name.to_owned(), value });
    }
    if let Some((name, operator, value)) = split_assignment(text) {
        return Ok(Instruction::Assignment {
            line,
            name: name.to_owned(),
            operator,
            value: Expression::compile(value),
        });
    }

    Ok(Instruction::Expression { line, expr: Expression::compile(text) })
}

/// Recognizes `name = value` and `name op= value`, but not `name == value`.
fn split_assignment(text: &str) -> Option<(&str, AssignOp, &str)> {
    let name_end = text
        .char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
        .map_or(text.len(), |(i, _)| i);
    let name = &text[..name_end];
    if !is_identifier(name) {
        return None;
    }

    let rest = text[name_end..].trim_start();
    let mut chars = rest.chars();
    let (operator, value) = match chars.next()? {
        '=' => (AssignOp::Assign, &rest[1..]),
        c => {
            let operator = AssignOp::from_char(c)?;
            (operator, rest[1..].strip_prefix('=')?)
        }
    };

    if value.trim_start().starts_with('=') {
        return None;
    }

    Some((name, operator, value))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Script {
        BlockParser::new().parse(source).expect("failed to parse the source")
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        let script = parse("\n  \n// nothing here\nlet x = 1\n\n");
        assert_eq!(script.block.len(), 1);
        assert_eq!(script.block.instructions()[0].line(), 4);
    }

    #[test]
    fn statements_are_classified() {
        let script = parse(
            "let a = 1\na = 2\na += 3\na %= 2\nreturn a\nbreak\ncontinue\ndebug(a == 1)\nreturn",
        );
        let kinds: Vec<_> = script
            .block
            .instructions()
            .iter()
            .map(|i| match i {
                Instruction::Declaration { .. } => "let",
                Instruction::Assignment { operator: AssignOp::Assign, .. } => "=",
                Instruction::Assignment { operator: AssignOp::Add, .. } => "+=",
                Instruction::Assignment { operator: AssignOp::Remainder, .. } => "%=",
                Instruction::Return { value: Some(_), .. } => "return value",
                Instruction::Return { value: None, .. } => "return",
                Instruction::Break { .. } => "break",
                Instruction::Continue { .. } => "continue",
                Instruction::Expression { .. } => "expr",
                _ => "other",
            })
            .collect();

        assert_eq!(
            kinds,
            vec!["let", "=", "+=", "%=", "return value", "break", "continue", "expr", "return"]
        );
    }

    #[test]
    fn equality_is_not_an_assignment() {
        assert!(split_assignment("a == b").is_none());
        assert!(split_assignment("a += = b").is_none());
        assert!(split_assignment("f(a = 1)").is_none());
        assert_eq!(split_assignment("width*=2"), Some(("width", AssignOp::Multiply, "2")));
    }

    #[test]
    fn keywords_are_whole_words() {
        let script = parse("let iffy = 1\niffy = 2\nendless = 3");
        assert_eq!(script.block.len(), 3);
        assert!(matches!(script.block.instructions()[1], Instruction::Assignment { .. }));
    }

    #[test]
    fn nested_blocks() {
        let source = "
            let x = 0
            while (x < 10)
                if (x == 3)
                    break
                else
                    x += 1
                end
            end
        ";
        let script = parse(source);
        assert_eq!(script.block.len(), 2);
        let Instruction::While(ref w) = script.block.instructions()[1] else {
            panic!("expected a while loop");
        };
        assert_eq!(w.line, 3);
        let Instruction::If(ref i) = w.body.instructions()[0] else {
            panic!("expected an if");
        };
        assert_eq!(i.then_block.len(), 1);
        assert_eq!(i.else_block.as_ref().map(Block::len), Some(1));
        assert!(script.warnings.is_empty());
    }

    #[test]
    fn functions_are_collected_separately() {
        let script = parse("function add(a, b)\nreturn a + b\nend\nadd(1, 2)\nfunction none()\nend");
        assert_eq!(script.block.len(), 1);
        assert_eq!(script.functions.len(), 2);
        assert_eq!(script.functions[0].name(), "add");
        assert_eq!(script.functions[0].params(), ["a".to_owned(), "b".to_owned()]);
        assert!(script.functions[1].params().is_empty());
    }

    #[test]
    fn unmatched_end_aborts() {
        let result = BlockParser::new().parse("let x = 1\nend\nlet y = 2");
        assert_eq!(result.unwrap_err(), ParseError::UnmatchedBlock { line: 2 });
    }

    #[test]
    fn else_without_if() {
        let result = BlockParser::new().parse("while (true)\nelse\nend");
        assert_eq!(result.unwrap_err(), ParseError::DanglingElse { line: 2 });

        let result = BlockParser::new().parse("if (true)\nelse\nelse\nend");
        assert_eq!(result.unwrap_err(), ParseError::DanglingElse { line: 3 });

        let result = BlockParser::new().parse("else");
        assert_eq!(result.unwrap_err(), ParseError::UnmatchedBlock { line: 1 });
    }

    #[test]
    fn malformed_headers() {
        assert!(matches!(
            BlockParser::new().parse("function (a)\nend"),
            Err(ParseError::MalformedFunction { line: 1, .. })
        ));
        assert!(matches!(
            BlockParser::new().parse("if x > 1\nend"),
            Err(ParseError::MalformedCondition { line: 1, .. })
        ));
        assert!(matches!(
            BlockParser::new().parse("let = 4"),
            Err(ParseError::MalformedDeclaration { line: 1, .. })
        ));
    }

    #[test]
    fn unclosed_blocks_are_closed_with_a_warning() {
        let script = parse("if (true)\nwhile (false)\nlet x = 1");
        assert_eq!(script.block.len(), 1);
        assert_eq!(script.warnings.len(), 2);
        assert!(script.warnings.iter().all(|w| w.kind == DiagnosticKind::UnclosedBlock));
        assert_eq!(script.warnings[0].line, 2);
    }

    #[test]
    fn bad_expressions_are_kept() {
        let script = parse("let x = (1 +");
        let Instruction::Declaration { value: Some(ref value), .. } = script.block.instructions()[0]
        else {
            panic!("expected a declaration");
        };
        assert!(value.compiled.is_err());
    }
}
