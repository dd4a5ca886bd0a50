//! Property checks: splitting only moves whitespace around.

use core_actions::{SplitPolicy, Splitter};
use core_config::ArgumentStyle;
use proptest::prelude::*;

fn non_blank(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn call_splitter() -> Splitter {
    Splitter::new(SplitPolicy::call().unwrap(), "  ", ArgumentStyle::Balanced)
}

fn arg() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        "[a-z]{1,4}: [A-Z][a-z]{0,4}",
        "[a-z]{1,3}\\([a-z]{1,3}, [0-9]{1,2}\\)",
        "\"[a-z ,]{0,6}\"",
    ]
}

fn call_line() -> impl Strategy<Value = (String, Vec<String>)> {
    (
        " {0,8}",
        "[a-z][a-z_.]{0,8}",
        prop::collection::vec(arg(), 1..6),
        "(| \\{|;)",
    )
        .prop_map(|(indent, name, args, tail)| {
            (format!("{indent}{name}({}){tail}", args.join(", ")), args)
        })
}

proptest! {
    #[test]
    fn split_preserves_non_whitespace((line, args) in call_line()) {
        let out = call_splitter().split_line(&line).expect("generated line is a call");
        prop_assert_eq!(non_blank(&out.concat()), non_blank(&line));
        prop_assert_eq!(out.len(), args.len() + 2);
    }

    #[test]
    fn every_output_line_keeps_base_indent((line, _args) in call_line()) {
        let indent: String = line.chars().take_while(|c| *c == ' ').collect();
        let out = call_splitter().split_line(&line).expect("generated line is a call");
        for emitted in &out {
            prop_assert!(emitted.starts_with(&indent));
        }
        for emitted in &out[1..out.len() - 1] {
            let arg_indent = format!("{indent}  ");
            prop_assert!(emitted.starts_with(&arg_indent));
        }
    }

    #[test]
    fn lines_without_open_paren_never_split(line in "[^(]{0,40}") {
        prop_assert!(call_splitter().split_line(&line).is_none());
    }
}
