// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn splits_literal_and_macro() {
    let tokens = scan("check $HOSTNAME$ is $HOSTSTATE$");
    assert_eq!(
        tokens,
        vec![
            Token::Literal("check "),
            Token::Macro {
                name: "HOSTNAME",
                args: vec![]
            },
            Token::Literal(" is "),
            Token::Macro {
                name: "HOSTSTATE",
                args: vec![]
            },
        ]
    );
}

#[test]
fn on_demand_macro_splits_args_on_colon() {
    let tokens = scan("$SERVICESTATE:web1:http$");
    assert_eq!(
        tokens,
        vec![Token::Macro {
            name: "SERVICESTATE",
            args: vec!["web1", "http"]
        }]
    );
}

#[test]
fn doubled_dollar_is_a_literal_dollar() {
    let tokens = scan("cost is $$5");
    assert_eq!(tokens, vec![Token::Literal("cost is "), Token::Literal("$"), Token::Literal("5")]);
}

#[test]
fn unmatched_dollar_is_left_as_literal() {
    let tokens = scan("no close $HOSTNAME");
    assert_eq!(
        tokens,
        vec![Token::Literal("no close "), Token::Literal("$HOSTNAME")]
    );
}

#[test]
fn plain_text_with_no_macros_is_one_literal() {
    let tokens = scan("nothing to expand here");
    assert_eq!(tokens, vec![Token::Literal("nothing to expand here")]);
}
