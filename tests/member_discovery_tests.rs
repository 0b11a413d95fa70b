//! Integration tests for the member discovery engine.
//!
//! Verifies that a single traversal of the syntax tree collects:
//! - Assignments to `Constructor.prototype.member`
//! - Assignments of function literals to `this.member` / `<alias>.member`
//! - Plain `this.member` / `<alias>.member` accesses anywhere in the tree
//! and that alias gating, first-wins dedup, and the classification
//! heuristic behave as the completion provider expects.

use indoc::indoc;
use jsthis_language_server::completion::{MemberKind, MemberRecord, discover};
use jsthis_language_server::parser::JsParser;

fn alias_names() -> Vec<String> {
    vec!["self".to_string(), "that".to_string(), "me".to_string()]
}

fn members(source: &str) -> Vec<MemberRecord> {
    let parser = JsParser::new().expect("grammar should load");
    let parsed = parser.parse(source).expect("fixture should parse");
    discover(&parsed.tree, &parsed.text, &alias_names())
}

fn check(actual: &[MemberRecord], expected: &[(&str, MemberKind, &str)]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "wrong number of members: {actual:?}"
    );
    for (record, (label, kind, insert_text)) in actual.iter().zip(expected) {
        assert_eq!(record.label, *label, "unexpected label");
        assert_eq!(record.kind, *kind, "unexpected kind for {label}");
        assert_eq!(
            record.insert_text, *insert_text,
            "unexpected insert text for {label}"
        );
    }
}

#[test]
fn constant_defined_on_this_in_constructor() {
    let source = indoc! {r#"
        function MyConstructor() {
            this.MY_CONSTANT = 1;
        }
    "#};
    check(
        &members(source),
        &[("MY_CONSTANT", MemberKind::Enum, "MY_CONSTANT")],
    );
}

#[test]
fn method_and_field_defined_on_prototype() {
    let source = indoc! {r#"
        function MyConstructor() {}
        MyConstructor.prototype.myField = 0;
        MyConstructor.prototype.myPrMethod = function () {};
    "#};
    check(
        &members(source),
        &[
            ("myField", MemberKind::Field, "myField"),
            ("myPrMethod", MemberKind::Method, "myPrMethod()"),
        ],
    );
}

#[test]
fn prototype_assignment_of_identifier_uses_constant_name_rule() {
    let source = indoc! {r#"
        Queue.prototype.MAX_DEPTH = limit;
        Queue.prototype.compare = defaultCompare;
    "#};
    check(
        &members(source),
        &[
            ("MAX_DEPTH", MemberKind::Enum, "MAX_DEPTH"),
            ("compare", MemberKind::Field, "compare"),
        ],
    );
}

#[test]
fn method_defined_on_this_in_constructor() {
    let source = indoc! {r#"
        function MyConstructor() {
            this.myMethod = function () {};
        }
    "#};
    check(
        &members(source),
        &[("myMethod", MemberKind::Method, "myMethod()")],
    );
}

#[test]
fn property_defined_on_this_in_constructor() {
    let source = indoc! {r#"
        function MyConstructor() {
            this.testProperty = 1;
        }
    "#};
    check(
        &members(source),
        &[("testProperty", MemberKind::Field, "testProperty")],
    );
}

#[test]
fn method_and_property_keep_declaration_order() {
    let source = indoc! {r#"
        function MyConstructor() {
            this.myMethod = function () {};
            this.testProperty = 1;
        }
    "#};
    check(
        &members(source),
        &[
            ("myMethod", MemberKind::Method, "myMethod()"),
            ("testProperty", MemberKind::Field, "testProperty"),
        ],
    );
}

#[test]
fn method_defined_on_bound_self_is_merged() {
    let source = indoc! {r#"
        function MyConstructor() {
            var self = this;
            self.myMethodSelf = function () {};
        }
    "#};
    check(
        &members(source),
        &[("myMethodSelf", MemberKind::Method, "myMethodSelf()")],
    );
}

#[test]
fn property_defined_on_bound_self_is_merged() {
    let source = indoc! {r#"
        function MyConstructor() {
            var self = this;
            self.testPropertySelf = 2;
        }
    "#};
    check(
        &members(source),
        &[("testPropertySelf", MemberKind::Field, "testPropertySelf")],
    );
}

#[test]
fn alias_members_are_absent_without_a_local_binding() {
    // `self` here is never declared equal to anything in this scope, so it
    // is not actually a `this` reference.
    let source = indoc! {r#"
        self.hidden = function () {};
        self.alsoHidden = 1;
    "#};
    assert!(members(source).is_empty());
}

#[test]
fn removing_the_alias_binding_removes_alias_members() {
    let with_binding = indoc! {r#"
        function C() {
            var that = this;
            that.fromAlias = function () {};
        }
    "#};
    let without_binding = indoc! {r#"
        function C() {
            that.fromAlias = function () {};
        }
    "#};
    assert_eq!(members(with_binding).len(), 1);
    assert!(members(without_binding).is_empty());
}

#[test]
fn direct_members_precede_merged_alias_members() {
    let source = indoc! {r#"
        function C() {
            var self = this;
            this.direct = 1;
            self.aliased = function () {};
        }
    "#};
    check(
        &members(source),
        &[
            ("direct", MemberKind::Field, "direct"),
            ("aliased", MemberKind::Method, "aliased()"),
        ],
    );
}

#[test]
fn call_callee_is_a_method_call_argument_is_not() {
    let source = indoc! {r#"
        function C() {
            this.run();
            notify(this.count);
        }
    "#};
    check(
        &members(source),
        &[
            ("run", MemberKind::Method, "run()"),
            ("count", MemberKind::Field, "count"),
        ],
    );
}

#[test]
fn uppercase_call_argument_is_enum_like() {
    let source = indoc! {r#"
        function C() {
            notify(this.STATE);
        }
    "#};
    check(&members(source), &[("STATE", MemberKind::Enum, "STATE")]);
}

#[test]
fn chained_access_classifies_the_base_member() {
    // In `this.conf.load()` only `conf` hangs off `this`; from this position
    // alone it cannot be a call site.
    let source = indoc! {r#"
        function C() {
            this.conf.load();
        }
    "#};
    check(&members(source), &[("conf", MemberKind::Field, "conf")]);
}

#[test]
fn read_access_in_another_method_is_discovered() {
    let source = indoc! {r#"
        function C() {}
        C.prototype.report = function () {
            return this.total;
        };
    "#};
    check(
        &members(source),
        &[
            ("report", MemberKind::Method, "report()"),
            ("total", MemberKind::Field, "total"),
        ],
    );
}

#[test]
fn first_discovery_of_a_label_wins() {
    let source = indoc! {r#"
        MyConstructor.prototype.shared = function () {};
        function MyConstructor() {
            this.shared = 1;
        }
    "#};
    check(&members(source), &[("shared", MemberKind::Method, "shared()")]);
}

#[test]
fn repeated_accesses_yield_a_single_record() {
    let source = indoc! {r#"
        function C() {
            this.value = 1;
            this.value = 2;
            use(this.value);
        }
    "#};
    check(&members(source), &[("value", MemberKind::Field, "value")]);
}

#[test]
fn discovery_is_idempotent_over_an_unchanged_tree() {
    let source = indoc! {r#"
        function C() {
            var self = this;
            this.a = 1;
            self.b = function () {};
            this.run();
        }
    "#};
    let parser = JsParser::new().expect("grammar should load");
    let parsed = parser.parse(source).expect("fixture should parse");
    let first = discover(&parsed.tree, &parsed.text, &alias_names());
    let second = discover(&parsed.tree, &parsed.text, &alias_names());
    assert_eq!(first, second);
}

#[test]
fn computed_member_access_is_ignored() {
    let source = indoc! {r#"
        function C() {
            this[key] = 1;
            this.named = 2;
        }
    "#};
    check(&members(source), &[("named", MemberKind::Field, "named")]);
}

#[test]
fn members_of_unrelated_objects_are_ignored() {
    let source = indoc! {r#"
        function C() {
            console.log(other.thing);
            this.mine = 1;
        }
    "#};
    check(&members(source), &[("mine", MemberKind::Field, "mine")]);
}

#[test]
fn empty_alias_set_still_discovers_this_members() {
    let source = indoc! {r#"
        function C() {
            var self = this;
            this.a = 1;
            self.b = 2;
        }
    "#};
    let parser = JsParser::new().expect("grammar should load");
    let parsed = parser.parse(source).expect("fixture should parse");
    let records = discover(&parsed.tree, &parsed.text, &[]);
    check(&records, &[("a", MemberKind::Field, "a")]);
}
