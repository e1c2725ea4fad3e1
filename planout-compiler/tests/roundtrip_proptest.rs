//! 打印与解析的往返性质测试
//!
//! 随机生成 AST，打印为源码后重新解析，应得到结构相同的树。

use planout_compiler::script::ast::{BinaryOp, Branch, CallArgs, Case, Guard, VariadicOp};
use planout_compiler::{Node, compile, print_script, tokenize};
use proptest::prelude::*;
use serde_json::Value;

fn ident_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "a", "b", "x", "userid", "unit", "choices", "weights", "case", "then",
    ])
    .prop_map(str::to_string)
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (0u32..1000).prop_map(Value::from),
        "[a-zA-Z0-9 _\"\\\\]{0,8}".prop_map(Value::String),
    ]
}

fn embedded_strategy() -> impl Strategy<Value = Node> {
    scalar_strategy()
        .prop_recursive(2, 8, 3, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
                prop::collection::vec((ident_strategy(), inner), 0..3)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
        .prop_map(Node::EmbeddedLiteral)
}

fn binary_op_strategy() -> impl Strategy<Value = BinaryOp> {
    prop::sample::select(vec![
        BinaryOp::Mod,
        BinaryOp::Div,
        BinaryOp::Gt,
        BinaryOp::Lt,
        BinaryOp::Equals,
        BinaryOp::Lte,
        BinaryOp::Gte,
    ])
}

fn variadic_op_strategy() -> impl Strategy<Value = VariadicOp> {
    prop::sample::select(vec![
        VariadicOp::Sum,
        VariadicOp::Product,
        VariadicOp::Or,
        VariadicOp::And,
        VariadicOp::Coalesce,
    ])
}

fn statement_strategy(expr: BoxedStrategy<Node>) -> impl Strategy<Value = Node> {
    prop_oneof![
        (ident_strategy(), expr.clone()).prop_map(|(var, value)| Node::assign(var, value)),
        expr,
    ]
}

fn cond(guarded: Vec<(Node, Node)>, otherwise: Option<Node>) -> Node {
    let mut branches: Vec<Branch> = guarded
        .into_iter()
        .map(|(guard, then)| Branch {
            guard: Guard::When(guard),
            then,
        })
        .collect();
    if let Some(then) = otherwise {
        branches.push(Branch {
            guard: Guard::Always,
            then,
        });
    }
    Node::Cond(branches)
}

fn switch(arms: Vec<(Node, Node)>) -> Node {
    Node::Switch(
        arms.into_iter()
            .map(|(guard, result)| Case { guard, result })
            .collect(),
    )
}

fn expr_strategy() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        ident_strategy().prop_map(Node::VarRef),
        scalar_strategy().prop_map(Node::Literal),
        embedded_strategy(),
    ];

    leaf.prop_recursive(4, 48, 4, |inner| {
        let operators = prop_oneof![
            inner.clone().prop_map(Node::negate),
            inner.clone().prop_map(Node::not),
            (binary_op_strategy(), inner.clone(), inner.clone())
                .prop_map(|(op, left, right)| Node::binary(op, left, right)),
            (variadic_op_strategy(), prop::collection::vec(inner.clone(), 2..4))
                .prop_map(|(op, values)| Node::variadic(op, values)),
            (inner.clone(), inner.clone()).prop_map(|(base, index)| Node::index(base, index)),
        ];

        let calls = prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Node::Array),
            (ident_strategy(), prop::collection::vec(inner.clone(), 1..3))
                .prop_map(|(name, values)| Node::call(name, CallArgs::Positional(values))),
            (
                ident_strategy(),
                prop::collection::vec((ident_strategy(), inner.clone()), 0..3)
            )
                .prop_map(|(name, args)| Node::call(
                    name,
                    CallArgs::Named(args.into_iter().collect())
                )),
        ];

        let control = prop_oneof![
            (
                prop::collection::vec((inner.clone(), inner.clone()), 1..3),
                prop::option::of(inner.clone())
            )
                .prop_map(|(guarded, otherwise)| cond(guarded, otherwise)),
            prop::collection::vec((inner.clone(), inner.clone()), 0..3).prop_map(switch),
            inner.clone().prop_map(Node::ret),
            prop::collection::vec(statement_strategy(inner.clone()), 0..3)
                .prop_map(Node::Sequence),
        ];

        prop_oneof![operators, calls, control]
    })
}

fn script_strategy() -> impl Strategy<Value = Node> {
    prop::collection::vec(statement_strategy(expr_strategy().boxed()), 0..4).prop_map(Node::Sequence)
}

proptest! {
    #[test]
    fn test_printed_script_parses_to_same_tree(root in script_strategy()) {
        let printed = print_script(&root);
        let reparsed = compile(&printed);
        prop_assert!(reparsed.is_ok(), "无法解析打印结果:\n{}\n{:?}", printed, reparsed);
        prop_assert_eq!(reparsed.unwrap(), root);
    }

    #[test]
    fn test_parse_is_deterministic(root in script_strategy()) {
        let printed = print_script(&root);
        prop_assert_eq!(compile(&printed), compile(&printed));
    }

    #[test]
    fn test_printing_is_stable(root in script_strategy()) {
        let printed = print_script(&root);
        let reparsed = compile(&printed).unwrap();
        prop_assert_eq!(print_script(&reparsed), printed);
    }

    #[test]
    fn test_arbitrary_input_never_panics(input in "\\PC{0,64}") {
        let _ = tokenize(&input);
        let _ = compile(&input);
    }
}
