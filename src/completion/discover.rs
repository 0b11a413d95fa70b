use rustc_hash::FxHashSet;
use tree_sitter::{Node, Tree};

use super::MemberRecord;

const PROTOTYPE: &str = "prototype";

/// Per-request accumulator for the discovery traversal. Constructed fresh for
/// every call so no labels, records, or flags leak across requests or
/// documents.
struct DiscoveryState<'a> {
    alias_names: &'a [String],
    direct: Vec<MemberRecord>,
    aliased: Vec<MemberRecord>,
    processed: FxHashSet<String>,
    alias_bound: bool,
}

/// Collects member definitions reachable through `this` or a configured
/// alias: assignments to `Constructor.prototype.member`, assignments of
/// function literals to `this.member`/`<alias>.member`, and plain
/// member accesses anywhere in the tree (which cover members defined outside
/// the visible window, e.g. in another method).
///
/// Alias-discovered members are appended to the result iff some local
/// declaration in the tree binds one of the alias names; an alias that is
/// never bound is not actually a `this` reference.
pub fn discover(tree: &Tree, source: &str, alias_names: &[String]) -> Vec<MemberRecord> {
    let mut state = DiscoveryState {
        alias_names,
        direct: Vec::new(),
        aliased: Vec::new(),
        processed: FxHashSet::default(),
        alias_bound: false,
    };
    walk(tree.root_node(), None, source, &mut state);
    let mut members = state.direct;
    if state.alias_bound {
        members.extend(state.aliased);
    }
    members
}

/// Pre-order traversal visiting every node with its immediate parent.
/// Traversal order decides which classification wins when the same label is
/// discoverable through more than one rule.
fn walk(node: Node, parent: Option<Node>, source: &str, state: &mut DiscoveryState) {
    match node.kind() {
        "variable_declarator" => state.visit_variable_declarator(node, source),
        "assignment_expression" => state.visit_assignment(node, source),
        "member_expression" => state.visit_member_access(node, parent, source),
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, Some(node), source, state);
    }
}

fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

fn is_function_literal(node: Node) -> bool {
    matches!(
        node.kind(),
        "function_expression" | "function" | "arrow_function" | "generator_function"
    )
}

/// Constant-name rule: an all-uppercase label reads as an enum-like constant,
/// anything else as an ordinary field.
fn classify_by_name(label: &str) -> MemberRecord {
    if label.to_uppercase() == label {
        MemberRecord::enum_like(label)
    } else {
        MemberRecord::field(label)
    }
}

impl DiscoveryState<'_> {
    fn is_alias(&self, name: &str) -> bool {
        self.alias_names.iter().any(|alias| alias == name)
    }

    /// First occurrence of a label wins; later discoveries are discarded.
    /// The set is shared across every rule and both record categories.
    fn seen(&mut self, label: &str) -> bool {
        !self.processed.insert(label.to_string())
    }

    /// A local declaration binding one of the alias names gates whether
    /// alias-scoped members are merged into the result set.
    fn visit_variable_declarator(&mut self, node: Node, source: &str) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        if name.kind() == "identifier" && self.is_alias(node_text(name, source)) {
            self.alias_bound = true;
        }
    }

    /// Handles `Constructor.prototype.member = ...` and
    /// `this.member = function ...` / `<alias>.member = function ...`.
    /// The assignment node is visited before its left-hand member access, so
    /// the classification chosen here wins the first-occurrence dedup.
    fn visit_assignment(&mut self, node: Node, source: &str) {
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "member_expression" {
            return;
        }
        let Some(property) = left.child_by_field_name("property") else {
            return;
        };
        if property.kind() != "property_identifier" {
            return;
        }
        let Some(object) = left.child_by_field_name("object") else {
            return;
        };
        let label = node_text(property, source);
        let right = node.child_by_field_name("right");

        if object.kind() == "member_expression" {
            // Identifier.prototype.member = <value>
            let Some(base_property) = object.child_by_field_name("property") else {
                return;
            };
            if base_property.kind() != "property_identifier"
                || node_text(base_property, source) != PROTOTYPE
            {
                return;
            }
            if self.seen(label) {
                return;
            }
            let record = match right {
                Some(value) if value.kind() == "identifier" => classify_by_name(label),
                Some(value) if is_function_literal(value) => MemberRecord::method(label),
                _ => MemberRecord::field(label),
            };
            self.direct.push(record);
            return;
        }

        // this.member = function ... / <alias>.member = function ...
        if !right.is_some_and(is_function_literal) {
            return;
        }
        match object.kind() {
            "this" => {
                if !self.seen(label) {
                    self.direct.push(MemberRecord::method(label));
                }
            }
            "identifier" if self.is_alias(node_text(object, source)) => {
                if !self.seen(label) {
                    self.aliased.push(MemberRecord::method(label));
                }
            }
            _ => {}
        }
    }

    /// Any `this.member` / `<alias>.member` access, classified by the
    /// syntactic role its parent implies. tree-sitter's member_expression is
    /// always the non-computed `a.b` form; computed access parses as a
    /// subscript_expression and never reaches here.
    fn visit_member_access(&mut self, node: Node, parent: Option<Node>, source: &str) {
        let Some(property) = node.child_by_field_name("property") else {
            return;
        };
        if property.kind() != "property_identifier" {
            return;
        }
        let Some(object) = node.child_by_field_name("object") else {
            return;
        };
        match object.kind() {
            "this" => {
                if let Some(record) = self.make_record(node, parent, property, source) {
                    self.direct.push(record);
                }
            }
            "identifier" if self.is_alias(node_text(object, source)) => {
                if let Some(record) = self.make_record(node, parent, property, source) {
                    self.aliased.push(record);
                }
            }
            _ => {}
        }
    }

    /// A member access that is the callee of a call is a method; everything
    /// else falls through to the constant-name rule. A call argument
    /// (`fn(this.field)`) has the `arguments` node as its parent, not the
    /// call itself, so it takes the fallthrough path.
    fn make_record(
        &mut self,
        node: Node,
        parent: Option<Node>,
        property: Node,
        source: &str,
    ) -> Option<MemberRecord> {
        let label = node_text(property, source);
        if label.is_empty() || self.seen(label) {
            return None;
        }
        let is_call_callee = parent.is_some_and(|p| {
            p.kind() == "call_expression"
                && p.child_by_field_name("function")
                    .is_some_and(|callee| callee.id() == node.id())
        });
        if is_call_callee {
            Some(MemberRecord::method(label))
        } else {
            Some(classify_by_name(label))
        }
    }
}
