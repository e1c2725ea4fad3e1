//! # AST 模块
//!
//! 定义脚本的抽象语法树（Abstract Syntax Tree）。
//!
//! ## 设计说明
//!
//! AST 是解析器的输出，也是前端与外部解释器之间的契约。
//! 树是纯值：每个节点独占其子节点，无共享、无环。
//!
//! 有两处编码必须与解释器保持一致：
//!
//! - 减法 `a - b` 表示为 `Sum([a, Negate(b)])`，没有独立的差节点
//! - 不等 `a != b` 表示为 `Not(Equals(a, b))`

use serde_json::Value;

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mod,
    Div,
    Gt,
    Lt,
    Equals,
    Lte,
    Gte,
}

impl BinaryOp {
    /// 线格式中的 `op` 名称
    pub fn wire_name(self) -> &'static str {
        match self {
            BinaryOp::Mod => "%",
            BinaryOp::Div => "/",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::Equals => "equals",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
        }
    }

    /// 源码中的运算符
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mod => "%",
            BinaryOp::Div => "/",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::Equals => "==",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
        }
    }
}

/// 变长运算符：操作数列表从左到右组合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariadicOp {
    Sum,
    Product,
    Or,
    And,
    Coalesce,
}

impl VariadicOp {
    pub fn wire_name(self) -> &'static str {
        match self {
            VariadicOp::Sum => "sum",
            VariadicOp::Product => "product",
            VariadicOp::Or => "or",
            VariadicOp::And => "and",
            VariadicOp::Coalesce => "coalesce",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            VariadicOp::Sum => "+",
            VariadicOp::Product => "*",
            VariadicOp::Or => "||",
            VariadicOp::And => "&&",
            VariadicOp::Coalesce => "??",
        }
    }
}

/// 命名参数表
///
/// 保持首次出现的顺序；重复的键后者覆盖前者的值，不报错。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedArgs(Vec<(String, Node)>);

impl NamedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入参数；键已存在时原位替换
    pub fn insert(&mut self, name: impl Into<String>, value: Node) {
        let name = name.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for NamedArgs {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        let mut args = NamedArgs::new();
        for (key, value) in iter {
            args.insert(key, value);
        }
        args
    }
}

/// 运算符调用的参数
///
/// 空参数列表解析为空的 `Named`；两种形式不能混用。
#[derive(Debug, Clone, PartialEq)]
pub enum CallArgs {
    /// `name(a, b, c)`
    Positional(Vec<Node>),
    /// `name(key = a, other = b)`
    Named(NamedArgs),
}

impl Default for CallArgs {
    fn default() -> Self {
        CallArgs::Named(NamedArgs::new())
    }
}

/// switch 分支
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub guard: Node,
    pub result: Node,
}

/// 条件链分支的守卫
#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    /// `else` 分支，线格式中为字面量 `true`
    Always,
    When(Node),
}

/// 条件链中的一个分支
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub guard: Guard,
    pub then: Node,
}

/// AST 节点
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// 语句序列：脚本根节点或 `{ ... }` 块
    Sequence(Vec<Node>),

    /// 赋值，`name = expr` 与 `name <- expr` 均产生此节点
    Assign { var: String, value: Box<Node> },

    /// 变量读取
    VarRef(String),

    /// 常量：布尔、null、数字或字符串
    Literal(Value),

    /// `@` 内嵌字面量
    EmbeddedLiteral(Value),

    /// 数组表达式 `[a, b]`
    Array(Vec<Node>),

    /// 下标访问 `base[index]`
    Index { base: Box<Node>, index: Box<Node> },

    /// 运算符调用 `name(args)`
    Call { name: String, args: CallArgs },

    /// 算术取负
    Negate(Box<Node>),

    /// 逻辑非
    Not(Box<Node>),

    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    /// 至少两个操作数
    Variadic { op: VariadicOp, values: Vec<Node> },

    Switch(Vec<Case>),

    /// 展平后的 if / else if / else 链，至少一个分支
    Cond(Vec<Branch>),

    Return(Box<Node>),
}

impl Node {
    pub fn var(name: impl Into<String>) -> Self {
        Self::VarRef(name.into())
    }

    pub fn assign(var: impl Into<String>, value: Node) -> Self {
        Self::Assign {
            var: var.into(),
            value: Box::new(value),
        }
    }

    pub fn number(n: impl Into<serde_json::Number>) -> Self {
        Self::Literal(Value::Number(n.into()))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::Literal(Value::String(s.into()))
    }

    pub fn bool(b: bool) -> Self {
        Self::Literal(Value::Bool(b))
    }

    pub fn null() -> Self {
        Self::Literal(Value::Null)
    }

    pub fn index(base: Node, index: Node) -> Self {
        Self::Index {
            base: Box::new(base),
            index: Box::new(index),
        }
    }

    pub fn call(name: impl Into<String>, args: CallArgs) -> Self {
        Self::Call {
            name: name.into(),
            args,
        }
    }

    pub fn negate(value: Node) -> Self {
        Self::Negate(Box::new(value))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(value: Node) -> Self {
        Self::Not(Box::new(value))
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn variadic(op: VariadicOp, values: Vec<Node>) -> Self {
        Self::Variadic { op, values }
    }

    /// `a != b` 的编码
    pub fn not_equals(left: Node, right: Node) -> Self {
        Self::not(Self::binary(BinaryOp::Equals, left, right))
    }

    /// `a - b` 的编码
    pub fn difference(left: Node, right: Node) -> Self {
        Self::variadic(VariadicOp::Sum, vec![left, Self::negate(right)])
    }

    pub fn ret(value: Node) -> Self {
        Self::Return(Box::new(value))
    }

    /// 直接子节点，按源码顺序
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Sequence(items) | Node::Array(items) => items.iter().collect(),
            Node::Variadic { values, .. } => values.iter().collect(),
            Node::Assign { value, .. }
            | Node::Negate(value)
            | Node::Not(value)
            | Node::Return(value) => vec![&**value],
            Node::VarRef(_) | Node::Literal(_) | Node::EmbeddedLiteral(_) => Vec::new(),
            Node::Index { base, index } => vec![&**base, &**index],
            Node::Call { args, .. } => match args {
                CallArgs::Positional(values) => values.iter().collect(),
                CallArgs::Named(named) => named.iter().map(|(_, v)| v).collect(),
            },
            Node::Binary { left, right, .. } => vec![&**left, &**right],
            Node::Switch(cases) => cases
                .iter()
                .flat_map(|case| [&case.guard, &case.result])
                .collect(),
            Node::Cond(branches) => branches
                .iter()
                .flat_map(|branch| match &branch.guard {
                    Guard::Always => vec![&branch.then],
                    Guard::When(guard) => vec![guard, &branch.then],
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_args_later_key_wins_in_place() {
        let args: NamedArgs = [
            ("a", Node::number(1)),
            ("b", Node::number(2)),
            ("a", Node::number(3)),
        ]
        .into_iter()
        .collect();

        let keys: Vec<&str> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(args.get("a"), Some(&Node::number(3)));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_encoding_helpers() {
        assert_eq!(
            Node::difference(Node::var("a"), Node::var("b")),
            Node::Variadic {
                op: VariadicOp::Sum,
                values: vec![Node::var("a"), Node::Negate(Box::new(Node::var("b")))],
            }
        );
        assert_eq!(
            Node::not_equals(Node::var("a"), Node::var("b")),
            Node::Not(Box::new(Node::Binary {
                op: BinaryOp::Equals,
                left: Box::new(Node::var("a")),
                right: Box::new(Node::var("b")),
            }))
        );
    }

    #[test]
    fn test_children_order() {
        let node = Node::Cond(vec![
            Branch {
                guard: Guard::When(Node::var("c")),
                then: Node::number(1),
            },
            Branch {
                guard: Guard::Always,
                then: Node::number(2),
            },
        ]);
        assert_eq!(
            node.children(),
            vec![&Node::var("c"), &Node::number(1), &Node::number(2)]
        );
    }

    #[test]
    fn test_default_call_args_is_empty_named() {
        assert_eq!(CallArgs::default(), CallArgs::Named(NamedArgs::new()));
    }
}
