//! Lowering of tree-sitter-java CSTs into `NodeKind` trees
//!
//! Type syntax, modifiers, annotations, imports and comments carry no
//! evaluation order and are dropped. Constructs without a rule become
//! `NodeKind::Unsupported` so the flow graph reports them instead of
//! guessing.
//!
//! Required grammar fields are checked before any child is lowered: a
//! half-lowered construct would leave orphan nodes in the arena.

use tree_sitter::Node;

use crate::features::parsing::domain::{NodeId, NodeKind, SyntaxTree, SyntaxTreeBuilder};
use crate::shared::limits::ensure_stack;
use crate::shared::models::{Result, Span};

const TYPE_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

const LITERALS: &[&str] = &[
    "decimal_integer_literal",
    "hex_integer_literal",
    "octal_integer_literal",
    "binary_integer_literal",
    "decimal_floating_point_literal",
    "hex_floating_point_literal",
    "true",
    "false",
    "character_literal",
    "string_literal",
    "text_block",
    "null_literal",
    "class_literal",
];

pub(crate) struct JavaLowering<'s> {
    source: &'s str,
    builder: SyntaxTreeBuilder,
}

impl<'s> JavaLowering<'s> {
    pub(crate) fn new(source: &'s str, file_path: &str) -> Self {
        Self {
            source,
            builder: SyntaxTreeBuilder::new(source, file_path),
        }
    }

    pub(crate) fn add_error(&mut self, message: String, span: Span) {
        self.builder.add_error(message, span);
    }

    pub(crate) fn lower(mut self, program: Node<'_>) -> Result<SyntaxTree> {
        let unit = self.lower_program(program);
        self.builder.finish(unit)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Helpers
    // ═══════════════════════════════════════════════════════════════════

    fn text(&self, node: Node<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
            .unwrap_or_default()
    }

    fn push(&mut self, kind: NodeKind, node: Node<'_>) -> NodeId {
        self.builder.push_raw(kind, node.byte_range(), node.kind())
    }

    fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| !c.is_extra())
            .collect()
    }

    fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.children_by_field_name(field, &mut cursor)
            .filter(|c| !c.is_extra())
            .collect()
    }

    fn first_named_child<'t>(node: Node<'t>) -> Option<Node<'t>> {
        Self::named_children(node).into_iter().next()
    }

    fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        Self::named_children(node)
            .into_iter()
            .find(|c| c.kind() == kind)
    }

    /// Declared name of parameters, declarators and resources
    fn declared_name(&self, node: Node<'_>) -> String {
        if let Some(name) = node.child_by_field_name("name") {
            return self.text(name).to_string();
        }
        match Self::child_of_kind(node, "variable_declarator") {
            Some(declarator) => self.field_text(declarator, "name"),
            None => self.text(node).to_string(),
        }
    }

    /// Parameter-like declarator without initializer
    fn push_parameter(&mut self, node: Node<'_>) -> NodeId {
        let name = self.declared_name(node);
        self.push(
            NodeKind::VariableDeclarator {
                name,
                initializer: None,
            },
            node,
        )
    }

    // ═══════════════════════════════════════════════════════════════════
    // Declarations
    // ═══════════════════════════════════════════════════════════════════

    fn lower_program(&mut self, program: Node<'_>) -> NodeId {
        let members = Self::named_children(program)
            .into_iter()
            .filter(|c| {
                !matches!(
                    c.kind(),
                    "package_declaration" | "import_declaration" | "module_declaration"
                )
            })
            .map(|c| self.lower_statement(c))
            .collect();
        self.push(NodeKind::CompilationUnit { members }, program)
    }

    fn lower_type_declaration(&mut self, node: Node<'_>) -> NodeId {
        let name = self.field_text(node, "name");
        let members = match node.child_by_field_name("body") {
            Some(body) => self.lower_class_body(body),
            None => Vec::new(),
        };
        self.push(NodeKind::ClassDeclaration { name, members }, node)
    }

    fn lower_class_body(&mut self, body: Node<'_>) -> Vec<NodeId> {
        let mut members = Vec::new();
        for child in Self::named_children(body) {
            match child.kind() {
                "field_declaration" | "constant_declaration" => {
                    members.push(self.lower_variable_declarations(child));
                }
                "method_declaration"
                | "constructor_declaration"
                | "compact_constructor_declaration" => {
                    members.push(self.lower_method(child));
                }
                kind if TYPE_DECLARATIONS.contains(&kind) => {
                    members.push(self.lower_type_declaration(child));
                }
                // instance initializer
                "block" => members.push(self.lower_block(child)),
                "static_initializer" => {
                    if let Some(block) = Self::child_of_kind(child, "block") {
                        members.push(self.lower_block(block));
                    }
                }
                "enum_body_declarations" => members.extend(self.lower_class_body(child)),
                // enum constants, annotation elements, modifiers
                _ => {}
            }
        }
        members
    }

    fn lower_method(&mut self, node: Node<'_>) -> NodeId {
        let name = self.field_text(node, "name");
        let parameters = match node.child_by_field_name("parameters") {
            Some(list) => Self::named_children(list)
                .into_iter()
                .filter(|p| matches!(p.kind(), "formal_parameter" | "spread_parameter"))
                .map(|p| self.push_parameter(p))
                .collect(),
            None => Vec::new(),
        };
        let body = node
            .child_by_field_name("body")
            .map(|body| self.lower_block(body));
        self.push(
            NodeKind::MethodDeclaration {
                name,
                parameters,
                body,
            },
            node,
        )
    }

    fn lower_variable_declarations(&mut self, node: Node<'_>) -> NodeId {
        let declarators = Self::field_children(node, "declarator")
            .into_iter()
            .map(|d| self.lower_declarator(d))
            .collect();
        self.push(NodeKind::VariableDeclarations { declarators }, node)
    }

    fn lower_declarator(&mut self, node: Node<'_>) -> NodeId {
        let name = self.field_text(node, "name");
        let initializer = node
            .child_by_field_name("value")
            .map(|value| self.lower_expression(value));
        self.push(NodeKind::VariableDeclarator { name, initializer }, node)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════

    /// Block, constructor body or any other `{ ... }` statement list
    fn lower_block(&mut self, node: Node<'_>) -> NodeId {
        let statements = Self::named_children(node)
            .into_iter()
            .map(|s| self.lower_statement(s))
            .collect();
        self.push(NodeKind::Block { statements }, node)
    }

    fn lower_statement(&mut self, node: Node<'_>) -> NodeId {
        ensure_stack(|| self.lower_statement_kind(node))
    }

    fn lower_statement_kind(&mut self, node: Node<'_>) -> NodeId {
        match node.kind() {
            "block" => self.lower_block(node),
            "local_variable_declaration" => self.lower_variable_declarations(node),
            kind if TYPE_DECLARATIONS.contains(&kind) => self.lower_type_declaration(node),
            ";" | "empty_statement" => self.push(NodeKind::Empty, node),
            "expression_statement" => match Self::first_named_child(node) {
                Some(expr) => {
                    let expression = self.lower_expression(expr);
                    self.push(NodeKind::ExpressionStatement { expression }, node)
                }
                None => self.lower_unsupported(node),
            },
            "if_statement" => self.lower_if(node),
            "while_statement" => match (
                node.child_by_field_name("condition"),
                node.child_by_field_name("body"),
            ) {
                (Some(cond), Some(body)) => {
                    let condition = self.lower_condition(cond);
                    let body = self.lower_statement(body);
                    self.push(NodeKind::WhileLoop { condition, body }, node)
                }
                _ => self.lower_unsupported(node),
            },
            "do_statement" => match (
                node.child_by_field_name("body"),
                node.child_by_field_name("condition"),
            ) {
                (Some(body), Some(cond)) => {
                    let body = self.lower_statement(body);
                    let condition = self.lower_condition(cond);
                    self.push(NodeKind::DoWhileLoop { body, condition }, node)
                }
                _ => self.lower_unsupported(node),
            },
            "for_statement" => self.lower_for(node),
            "enhanced_for_statement" => self.lower_for_each(node),
            "switch_expression" | "switch_statement" => self.lower_switch(node),
            "try_statement" | "try_with_resources_statement" => self.lower_try(node),
            "labeled_statement" => {
                let parts = Self::named_children(node);
                match (parts.first(), parts.get(1)) {
                    (Some(&label), Some(&statement)) => {
                        let label = self.text(label).to_string();
                        let statement = self.lower_statement(statement);
                        self.push(NodeKind::Labeled { label, statement }, node)
                    }
                    _ => self.lower_unsupported(node),
                }
            }
            "synchronized_statement" => match (
                Self::child_of_kind(node, "parenthesized_expression"),
                node.child_by_field_name("body"),
            ) {
                (Some(lock), Some(body)) => {
                    let lock = self.lower_condition(lock);
                    let body = self.lower_block(body);
                    self.push(NodeKind::Synchronized { lock, body }, node)
                }
                _ => self.lower_unsupported(node),
            },
            "return_statement" => {
                let expression = Self::first_named_child(node).map(|e| self.lower_expression(e));
                self.push(NodeKind::Return { expression }, node)
            }
            "throw_statement" => match Self::first_named_child(node) {
                Some(e) => {
                    let expression = self.lower_expression(e);
                    self.push(NodeKind::Throw { expression }, node)
                }
                None => self.lower_unsupported(node),
            },
            "yield_statement" => match Self::first_named_child(node) {
                Some(e) => {
                    let expression = self.lower_expression(e);
                    self.push(NodeKind::Yield { expression }, node)
                }
                None => self.lower_unsupported(node),
            },
            "break_statement" => {
                let label = Self::first_named_child(node).map(|l| self.text(l).to_string());
                self.push(NodeKind::Break { label }, node)
            }
            "continue_statement" => {
                let label = Self::first_named_child(node).map(|l| self.text(l).to_string());
                self.push(NodeKind::Continue { label }, node)
            }
            "assert_statement" => {
                let parts = Self::named_children(node);
                match parts.first() {
                    Some(&cond) => {
                        let condition = self.lower_expression(cond);
                        let detail = parts.get(1).map(|&d| self.lower_expression(d));
                        self.push(NodeKind::Assert { condition, detail }, node)
                    }
                    None => self.lower_unsupported(node),
                }
            }
            "explicit_constructor_invocation" => self.lower_invocation(node, "constructor"),
            _ => self.lower_expression(node),
        }
    }

    /// Condition wrapped in `( )`; the parentheses are syntax only
    fn lower_condition(&mut self, node: Node<'_>) -> NodeId {
        if node.kind() == "parenthesized_expression" {
            if let Some(inner) = Self::first_named_child(node) {
                return self.lower_expression(inner);
            }
        }
        self.lower_expression(node)
    }

    fn lower_if(&mut self, node: Node<'_>) -> NodeId {
        let (Some(cond), Some(then)) = (
            node.child_by_field_name("condition"),
            node.child_by_field_name("consequence"),
        ) else {
            return self.lower_unsupported(node);
        };
        let condition = self.lower_condition(cond);
        let then_branch = self.lower_statement(then);
        let else_branch = node
            .child_by_field_name("alternative")
            .map(|alt| self.lower_statement(alt));
        self.push(
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            },
            node,
        )
    }

    fn lower_for(&mut self, node: Node<'_>) -> NodeId {
        let Some(body) = node.child_by_field_name("body") else {
            return self.lower_unsupported(node);
        };
        let init = Self::field_children(node, "init")
            .into_iter()
            .map(|i| {
                if i.kind() == "local_variable_declaration" {
                    self.lower_variable_declarations(i)
                } else {
                    self.lower_expression(i)
                }
            })
            .collect();
        let condition = node
            .child_by_field_name("condition")
            .map(|c| self.lower_expression(c));
        let update = Self::field_children(node, "update")
            .into_iter()
            .map(|u| self.lower_expression(u))
            .collect();
        let body = self.lower_statement(body);
        self.push(
            NodeKind::ForLoop {
                init,
                condition,
                update,
                body,
            },
            node,
        )
    }

    fn lower_for_each(&mut self, node: Node<'_>) -> NodeId {
        let (Some(name), Some(value), Some(body)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("value"),
            node.child_by_field_name("body"),
        ) else {
            return self.lower_unsupported(node);
        };
        let variable = self.push_parameter(name);
        let iterable = self.lower_expression(value);
        let body = self.lower_statement(body);
        self.push(
            NodeKind::ForEachLoop {
                variable,
                iterable,
                body,
            },
            node,
        )
    }

    fn lower_switch(&mut self, node: Node<'_>) -> NodeId {
        let (Some(cond), Some(block)) = (
            node.child_by_field_name("condition"),
            node.child_by_field_name("body"),
        ) else {
            return self.lower_unsupported(node);
        };
        let selector = self.lower_condition(cond);
        let mut cases = Vec::new();
        for entry in Self::named_children(block) {
            let arrow = match entry.kind() {
                "switch_block_statement_group" => false,
                "switch_rule" => true,
                _ => continue,
            };
            let mut labels = Vec::new();
            let mut body = Vec::new();
            for part in Self::named_children(entry) {
                if part.kind() == "switch_label" {
                    labels.push(self.text(part).split_whitespace().collect::<Vec<_>>().join(" "));
                } else {
                    body.push(self.lower_statement(part));
                }
            }
            let is_default = labels.iter().any(|label| {
                label
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .any(|word| word == "default")
            });
            cases.push(self.push(
                NodeKind::Case {
                    labels,
                    is_default,
                    arrow,
                    body,
                },
                entry,
            ));
        }
        self.push(NodeKind::Switch { selector, cases }, node)
    }

    fn lower_try(&mut self, node: Node<'_>) -> NodeId {
        let Some(block) = node.child_by_field_name("body") else {
            return self.lower_unsupported(node);
        };
        let resources = match node.child_by_field_name("resources") {
            Some(spec) => Self::named_children(spec)
                .into_iter()
                .filter(|r| r.kind() == "resource")
                .map(|r| self.lower_resource(r))
                .collect(),
            None => Vec::new(),
        };
        let body = self.lower_block(block);
        let mut catches = Vec::new();
        let mut finally = None;
        for part in Self::named_children(node) {
            match part.kind() {
                "catch_clause" => {
                    if let Some(catch) = self.lower_catch(part) {
                        catches.push(catch);
                    }
                }
                "finally_clause" => {
                    finally = Self::child_of_kind(part, "block").map(|b| self.lower_block(b));
                }
                _ => {}
            }
        }
        self.push(
            NodeKind::Try {
                resources,
                body,
                catches,
                finally,
            },
            node,
        )
    }

    /// `Type name = value` declares; a bare `name` or `a.b` is just evaluated
    fn lower_resource(&mut self, node: Node<'_>) -> NodeId {
        match node.child_by_field_name("value") {
            Some(value) => {
                let name = self.field_text(node, "name");
                let initializer = Some(self.lower_expression(value));
                self.push(NodeKind::VariableDeclarator { name, initializer }, node)
            }
            None => match Self::first_named_child(node) {
                Some(expr) => self.lower_expression(expr),
                None => self.lower_unsupported(node),
            },
        }
    }

    fn lower_catch(&mut self, node: Node<'_>) -> Option<NodeId> {
        let param = Self::child_of_kind(node, "catch_formal_parameter")?;
        let block = node.child_by_field_name("body")?;
        let parameter = self.push_parameter(param);
        let body = self.lower_block(block);
        Some(self.push(NodeKind::Catch { parameter, body }, node))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════

    fn lower_expression(&mut self, node: Node<'_>) -> NodeId {
        ensure_stack(|| self.lower_expression_kind(node))
    }

    fn lower_expression_kind(&mut self, node: Node<'_>) -> NodeId {
        match node.kind() {
            "identifier" => {
                let name = self.text(node).to_string();
                self.push(NodeKind::Identifier { name }, node)
            }
            kind if LITERALS.contains(&kind) => self.push(NodeKind::Literal, node),
            "this" | "super" => self.push(NodeKind::This, node),
            "method_reference" => self.push(NodeKind::MethodReference, node),
            "parenthesized_expression" => match Self::first_named_child(node) {
                Some(inner) => {
                    let expression = self.lower_expression(inner);
                    self.push(NodeKind::Parentheses { expression }, node)
                }
                None => self.lower_unsupported(node),
            },
            "binary_expression" => match (
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) {
                (Some(l), Some(r)) => {
                    let operator = self.field_text(node, "operator");
                    let left = self.lower_expression(l);
                    let right = self.lower_expression(r);
                    self.push(
                        NodeKind::Binary {
                            operator,
                            left,
                            right,
                        },
                        node,
                    )
                }
                _ => self.lower_unsupported(node),
            },
            "unary_expression" => match node.child_by_field_name("operand") {
                Some(o) => {
                    let operator = self.field_text(node, "operator");
                    let operand = self.lower_expression(o);
                    self.push(
                        NodeKind::Unary {
                            operator,
                            operand,
                            postfix: false,
                        },
                        node,
                    )
                }
                None => self.lower_unsupported(node),
            },
            "update_expression" => match Self::first_named_child(node) {
                Some(o) => {
                    let postfix = o.start_byte() == node.start_byte();
                    let token = if postfix {
                        o.end_byte()..node.end_byte()
                    } else {
                        node.start_byte()..o.start_byte()
                    };
                    let operator = self.source.get(token).unwrap_or_default().trim();
                    let operand = self.lower_expression(o);
                    self.push(
                        NodeKind::Unary {
                            operator: operator.to_string(),
                            operand,
                            postfix,
                        },
                        node,
                    )
                }
                None => self.lower_unsupported(node),
            },
            "cast_expression" => match node.child_by_field_name("value") {
                Some(v) => {
                    let expression = self.lower_expression(v);
                    self.push(NodeKind::Cast { expression }, node)
                }
                None => self.lower_unsupported(node),
            },
            "instanceof_expression" => match node.child_by_field_name("left") {
                Some(l) => {
                    let expression = self.lower_expression(l);
                    self.push(NodeKind::InstanceOf { expression }, node)
                }
                None => self.lower_unsupported(node),
            },
            "assignment_expression" => match (
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) {
                (Some(l), Some(r)) => {
                    let operator = self.field_text(node, "operator");
                    let target = self.lower_expression(l);
                    let value = self.lower_expression(r);
                    self.push(
                        NodeKind::Assignment {
                            operator,
                            target,
                            value,
                        },
                        node,
                    )
                }
                _ => self.lower_unsupported(node),
            },
            "method_invocation" => self.lower_invocation(node, "name"),
            "object_creation_expression" => self.lower_object_creation(node),
            "array_creation_expression" => {
                let dimensions = Self::named_children(node)
                    .into_iter()
                    .filter(|d| d.kind() == "dimensions_expr")
                    .filter_map(|d| Self::named_children(d).into_iter().last())
                    .map(|e| self.lower_expression(e))
                    .collect();
                let initializer = node
                    .child_by_field_name("value")
                    .map(|v| self.lower_expression(v));
                self.push(
                    NodeKind::NewArray {
                        dimensions,
                        initializer,
                    },
                    node,
                )
            }
            "array_initializer" => {
                let elements = Self::named_children(node)
                    .into_iter()
                    .map(|e| self.lower_expression(e))
                    .collect();
                self.push(NodeKind::ArrayInitializer { elements }, node)
            }
            "array_access" => match (
                node.child_by_field_name("array"),
                node.child_by_field_name("index"),
            ) {
                (Some(a), Some(i)) => {
                    let array = self.lower_expression(a);
                    let index = self.lower_expression(i);
                    self.push(NodeKind::ArrayAccess { array, index }, node)
                }
                _ => self.lower_unsupported(node),
            },
            "field_access" => match node.child_by_field_name("object") {
                Some(o) => {
                    let name = self.field_text(node, "field");
                    let target = self.lower_expression(o);
                    self.push(NodeKind::FieldAccess { target, name }, node)
                }
                None => self.lower_unsupported(node),
            },
            "ternary_expression" => match (
                node.child_by_field_name("condition"),
                node.child_by_field_name("consequence"),
                node.child_by_field_name("alternative"),
            ) {
                (Some(c), Some(t), Some(e)) => {
                    let condition = self.lower_expression(c);
                    let then_value = self.lower_expression(t);
                    let else_value = self.lower_expression(e);
                    self.push(
                        NodeKind::Ternary {
                            condition,
                            then_value,
                            else_value,
                        },
                        node,
                    )
                }
                _ => self.lower_unsupported(node),
            },
            "lambda_expression" => self.lower_lambda(node),
            "switch_expression" => self.lower_switch(node),
            _ => self.lower_unsupported(node),
        }
    }

    /// `select.name(args)`; `name_field` is "constructor" for `this(..)`
    /// and `super(..)`
    fn lower_invocation(&mut self, node: Node<'_>, name_field: &str) -> NodeId {
        let Some(args) = node.child_by_field_name("arguments") else {
            return self.lower_unsupported(node);
        };
        let name = self.field_text(node, name_field);
        let select = node
            .child_by_field_name("object")
            .map(|o| self.lower_expression(o));
        let arguments = Self::named_children(args)
            .into_iter()
            .map(|a| self.lower_expression(a))
            .collect();
        self.push(
            NodeKind::MethodInvocation {
                select,
                name,
                arguments,
            },
            node,
        )
    }

    fn lower_object_creation(&mut self, node: Node<'_>) -> NodeId {
        let Some(args) = node.child_by_field_name("arguments") else {
            return self.lower_unsupported(node);
        };
        let arguments = Self::named_children(args)
            .into_iter()
            .map(|a| self.lower_expression(a))
            .collect();
        let body = Self::child_of_kind(node, "class_body").map(|class_body| {
            let name = self.field_text(node, "type");
            let members = self.lower_class_body(class_body);
            self.push(NodeKind::ClassDeclaration { name, members }, class_body)
        });
        self.push(NodeKind::NewClass { arguments, body }, node)
    }

    fn lower_lambda(&mut self, node: Node<'_>) -> NodeId {
        let (Some(params), Some(body)) = (
            node.child_by_field_name("parameters"),
            node.child_by_field_name("body"),
        ) else {
            return self.lower_unsupported(node);
        };
        let parameters = match params.kind() {
            "identifier" => vec![self.push_parameter(params)],
            _ => Self::named_children(params)
                .into_iter()
                .filter(|p| {
                    matches!(
                        p.kind(),
                        "identifier" | "formal_parameter" | "spread_parameter"
                    )
                })
                .map(|p| self.push_parameter(p))
                .collect(),
        };
        let body = if body.kind() == "block" {
            self.lower_block(body)
        } else {
            self.lower_expression(body)
        };
        self.push(NodeKind::Lambda { parameters, body }, node)
    }

    fn lower_unsupported(&mut self, node: Node<'_>) -> NodeId {
        let children = Self::named_children(node)
            .into_iter()
            .map(|c| self.lower_statement(c))
            .collect();
        self.push(
            NodeKind::Unsupported {
                raw_kind: node.kind().to_string(),
                children,
            },
            node,
        )
    }
}
