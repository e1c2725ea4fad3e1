//! # Wire 模块
//!
//! 把 AST 编码为解释器读取的 JSON。每个节点是一个带 `op` 字段的对象，
//! 常量直接编码为 JSON 标量。对象键按插入顺序输出，`op` 总在最前。

use serde_json::{Map, Value};

use crate::options::CompileOptions;
use crate::script::ast::{CallArgs, Guard, Node};

/// 编码 AST 节点
pub fn to_json(node: &Node, options: &CompileOptions) -> Value {
    WireEncoder { options }.encode(node)
}

struct WireEncoder<'o> {
    options: &'o CompileOptions,
}

impl WireEncoder<'_> {
    fn encode(&self, node: &Node) -> Value {
        match node {
            Node::Sequence(items) => op("seq", [("seq", self.encode_all(items))]),
            Node::Assign { var, value } => op(
                "set",
                [("var", Value::String(var.clone())), ("value", self.encode(value))],
            ),
            Node::VarRef(name) => op("get", [("var", Value::String(name.clone()))]),
            Node::Literal(value) => value.clone(),
            Node::EmbeddedLiteral(value) => op("literal", [("value", value.clone())]),
            Node::Array(items) => op("array", [("values", self.encode_all(items))]),
            Node::Index { base, index } => op(
                "index",
                [("base", self.encode(base)), ("index", self.encode(index))],
            ),
            Node::Call { name, args } => self.encode_call(name, args),
            Node::Negate(value) => op("negative", [("value", self.encode(value))]),
            Node::Not(value) => op("not", [("value", self.encode(value))]),
            Node::Binary { op: bin, left, right } => op(
                bin.wire_name(),
                [("left", self.encode(left)), ("right", self.encode(right))],
            ),
            Node::Variadic { op: var, values } => {
                op(var.wire_name(), [("values", self.encode_all(values))])
            }
            Node::Switch(cases) => {
                let field = self.options.case_field.field_name();
                let cases = cases
                    .iter()
                    .map(|case| {
                        op(
                            "case",
                            [(field, self.encode(&case.guard)), ("result", self.encode(&case.result))],
                        )
                    })
                    .collect();
                op("switch", [("cases", Value::Array(cases))])
            }
            Node::Cond(branches) => {
                let branches = branches
                    .iter()
                    .map(|branch| {
                        let guard = match &branch.guard {
                            Guard::Always => Value::Bool(true),
                            Guard::When(guard) => self.encode(guard),
                        };
                        let mut map = Map::new();
                        map.insert("if".to_string(), guard);
                        map.insert("then".to_string(), self.encode(&branch.then));
                        Value::Object(map)
                    })
                    .collect();
                op("cond", [("cond", Value::Array(branches))])
            }
            Node::Return(value) => op("return", [("value", self.encode(value))]),
        }
    }

    fn encode_all(&self, nodes: &[Node]) -> Value {
        Value::Array(nodes.iter().map(|n| self.encode(n)).collect())
    }

    /// 命名参数按键展开；单个位置参数写入 `value`，多个写入 `values`。
    /// 名为 `op` 的参数被运算符名覆盖。
    fn encode_call(&self, name: &str, args: &CallArgs) -> Value {
        let mut map = Map::new();
        map.insert("op".to_string(), Value::String(name.to_string()));

        match args {
            CallArgs::Named(named) => {
                for (key, value) in named.iter().filter(|(key, _)| *key != "op") {
                    map.insert(key.to_string(), self.encode(value));
                }
            }
            CallArgs::Positional(values) => match values.as_slice() {
                [] => {}
                [single] => {
                    map.insert("value".to_string(), self.encode(single));
                }
                many => {
                    map.insert("values".to_string(), self.encode_all(many));
                }
            },
        }

        Value::Object(map)
    }
}

fn op<const N: usize>(name: &str, fields: [(&str, Value); N]) -> Value {
    let mut map = Map::new();
    map.insert("op".to_string(), Value::String(name.to_string()));
    for (key, value) in fields {
        map.insert(key.to_string(), value);
    }
    Value::Object(map)
}
