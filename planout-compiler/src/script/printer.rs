//! # Printer 模块
//!
//! 把 AST 打印回脚本源码。输出全括号化，重新解析（宽松字面量模式）得到结构相同的树。
//!
//! 几处固定写法：
//!
//! - 取负与逻辑非总是带括号：`-(x)`、`!(x)`，避免 `-1` 被读成带符号的常量
//! - 条件链的分支体带括号，避免悬挂 `else`
//! - `if`、`return` 与赋值作为操作数时整体加括号
//! - switch 守卫以名为 `case` 的调用开头时加括号，避免被读成分支关键字

use std::fmt::{self, Display, Formatter};

use crate::script::ast::{CallArgs, Guard, Node};

/// 打印完整脚本：每条顶层语句一行
pub fn print_script(root: &Node) -> String {
    match root {
        Node::Sequence(rules) => rules.iter().map(|rule| format!("{rule};\n")).collect(),
        other => format!("{other};\n"),
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Sequence(rules) => {
                f.write_str("{")?;
                for rule in rules {
                    write!(f, " {rule};")?;
                }
                f.write_str(" }")
            }
            Node::Assign { var, value } => write!(f, "{var} = {}", Operand(value)),
            Node::VarRef(name) => f.write_str(name),
            Node::Literal(value) => write!(f, "{value}"),
            Node::EmbeddedLiteral(value) => write!(f, "@{value}"),
            Node::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Node::Index { base, index } => match **base {
                Node::Negate(_) | Node::Not(_) => write!(f, "({base})[{}]", Operand(index)),
                _ => write!(f, "{}[{}]", Operand(base), Operand(index)),
            },
            Node::Call { name, args } => {
                write!(f, "{name}(")?;
                match args {
                    CallArgs::Positional(values) => write_list(f, values)?,
                    CallArgs::Named(named) => {
                        for (i, (key, value)) in named.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            write!(f, "{key} = {}", Operand(value))?;
                        }
                    }
                }
                f.write_str(")")
            }
            Node::Negate(value) => write!(f, "-({value})"),
            Node::Not(value) => write!(f, "!({value})"),
            Node::Binary { op, left, right } => {
                write!(f, "({} {} {})", Operand(left), op.symbol(), Operand(right))
            }
            Node::Variadic { op, values } => {
                f.write_str("(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.symbol())?;
                    }
                    write!(f, "{}", Operand(value))?;
                }
                f.write_str(")")
            }
            Node::Switch(cases) => {
                f.write_str("switch {")?;
                for case in cases {
                    if starts_with_case_call(&case.guard) {
                        write!(f, " ({}) => {};", case.guard, Operand(&case.result))?;
                    } else {
                        write!(f, " {} => {};", Operand(&case.guard), Operand(&case.result))?;
                    }
                }
                f.write_str(" }")
            }
            Node::Cond(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" else ")?;
                    }
                    match &branch.guard {
                        Guard::When(guard) => write!(f, "if ({guard}) ({})", branch.then)?,
                        Guard::Always => write!(f, "({})", branch.then)?,
                    }
                }
                Ok(())
            }
            Node::Return(value) => write!(f, "return {}", Operand(value)),
        }
    }
}

/// 操作数位置上的节点：开放式的形式加括号
struct Operand<'n>(&'n Node);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            node @ (Node::Cond(_) | Node::Return(_) | Node::Assign { .. }) => write!(f, "({node})"),
            node => write!(f, "{node}"),
        }
    }
}

/// 以 `case(` 开头的守卫会被读成分支关键字，需要整体加括号
fn starts_with_case_call(node: &Node) -> bool {
    match node {
        Node::Call { name, .. } => name == "case",
        Node::Index { base, .. } => starts_with_case_call(base),
        _ => false,
    }
}

fn write_list(f: &mut Formatter<'_>, items: &[Node]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", Operand(item))?;
    }
    Ok(())
}
